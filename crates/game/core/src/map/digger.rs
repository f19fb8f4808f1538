//! Room-and-corridor digger.
//!
//! Starting from one centred room, the digger repeatedly picks a connector on
//! the perimeter of an existing room, runs a straight corridor out of it and
//! places a new room at the far end. Every room is therefore connected to the
//! room it grew from. Digging stops once the target share of the carvable area
//! is floor and at least two rooms exist, the attempt budget is spent, or no
//! connector is left.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::{DiggerConfig, ItemSpawnConfig};
use crate::ecs::{MapDimensions, Position};
use crate::rng::GameRng;

use super::room::Room;
use super::tile::TileKind;

/// A generated level: terrain grid plus the spots the session needs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dungeon {
    pub dimensions: MapDimensions,
    cells: Vec<TileKind>,
    pub rooms: Vec<Room>,
    pub player_start: Position,
    pub stairs_down: Position,
    pub item_spawn_points: Vec<Position>,
}

impl Dungeon {
    /// Smallest grid the digger will work on; smaller requests are enlarged.
    pub const MIN_WIDTH: u32 = 20;
    pub const MIN_HEIGHT: u32 = 15;

    pub fn tile(&self, position: Position) -> TileKind {
        self.dimensions
            .index_of(position)
            .map_or(TileKind::Wall, |index| self.cells[index])
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).walkable()
    }

    /// Row-major cell iterator.
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, kind)| (self.dimensions.position_of(index), *kind))
    }

    pub fn room_containing(&self, position: Position) -> Option<usize> {
        self.rooms.iter().position(|room| room.contains(position))
    }

    pub fn floor_count(&self) -> usize {
        self.cells.iter().filter(|kind| kind.walkable()).count()
    }

    /// Breadth-first walkability check over terrain only.
    pub fn is_reachable(&self, from: Position, to: Position) -> bool {
        if !self.is_walkable(from) || !self.is_walkable(to) {
            return false;
        }

        let mut visited = vec![false; self.dimensions.area()];
        let mut frontier = VecDeque::from([from]);
        if let Some(index) = self.dimensions.index_of(from) {
            visited[index] = true;
        }

        while let Some(current) = frontier.pop_front() {
            if current == to {
                return true;
            }
            for next in current.neighbors() {
                let Some(index) = self.dimensions.index_of(next) else {
                    continue;
                };
                if !visited[index] && self.cells[index].walkable() {
                    visited[index] = true;
                    frontier.push_back(next);
                }
            }
        }
        false
    }

    fn set(&mut self, position: Position, kind: TileKind) {
        if let Some(index) = self.dimensions.index_of(position) {
            self.cells[index] = kind;
        }
    }
}

/// Carving state shared by the digging passes.
struct Digger<'a> {
    config: &'a DiggerConfig,
    dimensions: MapDimensions,
    cells: Vec<TileKind>,
    rooms: Vec<Room>,
    connectors: Vec<(Position, (i32, i32))>,
    dug: usize,
}

impl<'a> Digger<'a> {
    fn new(dimensions: MapDimensions, config: &'a DiggerConfig) -> Self {
        Self {
            config,
            dimensions,
            cells: vec![TileKind::Wall; dimensions.area()],
            rooms: Vec::new(),
            connectors: Vec::new(),
            dug: 0,
        }
    }

    fn in_interior(&self, position: Position) -> bool {
        position.x >= 1
            && position.y >= 1
            && position.x <= self.dimensions.width as i32 - 2
            && position.y <= self.dimensions.height as i32 - 2
    }

    fn interior_area(&self) -> usize {
        (self.dimensions.width as usize - 2) * (self.dimensions.height as usize - 2)
    }

    fn is_wall(&self, position: Position) -> bool {
        self.dimensions
            .index_of(position)
            .is_some_and(|index| self.cells[index] == TileKind::Wall)
    }

    fn carve(&mut self, position: Position) {
        if let Some(index) = self.dimensions.index_of(position)
            && self.cells[index] == TileKind::Wall
        {
            self.cells[index] = TileKind::Floor;
            self.dug += 1;
        }
    }

    fn room_size(&self, rng: &mut GameRng) -> (i32, i32) {
        let max_w = (self.config.room_max as i32).min(self.dimensions.width as i32 - 4);
        let max_h = (self.config.room_max as i32).min(self.dimensions.height as i32 - 4);
        let min = self.config.room_min.max(1) as i32;
        (
            rng.range_i32(min.min(max_w), max_w),
            rng.range_i32(min.min(max_h), max_h),
        )
    }

    fn add_room(&mut self, room: Room) {
        for cell in room.cells() {
            self.carve(cell);
        }
        self.connectors.extend(room.connectors());
        self.rooms.push(room);
    }

    /// Centred starting room, narrowed when needed so a corridor and a
    /// minimum-size room still fit to its east.
    fn place_first_room(&mut self, rng: &mut GameRng) {
        let (mut w, h) = self.room_size(rng);
        let min = self.config.room_min.max(1) as i32;
        let needed = 1 + self.config.corridor_min as i32 + min;
        let east_margin = |w: i32| {
            let right = (self.dimensions.width as i32 - w) / 2 + w - 1;
            self.dimensions.width as i32 - 2 - right
        };
        while w > min && east_margin(w) < needed {
            w -= 1;
        }

        let left = (self.dimensions.width as i32 - w) / 2;
        let top = (self.dimensions.height as i32 - h) / 2;
        self.add_room(Room::new(left, top, left + w - 1, top + h - 1));
    }

    /// Room bounds for a room whose first cell along `dir` is `entry`.
    ///
    /// `offset` shifts the room sideways so `entry` need not sit on its edge.
    fn room_beyond(entry: Position, dir: (i32, i32), w: i32, h: i32, offset: i32) -> Room {
        match dir {
            (1, 0) | (-1, 0) => {
                let top = entry.y - offset;
                let (left, right) = if dir.0 > 0 {
                    (entry.x, entry.x + w - 1)
                } else {
                    (entry.x - w + 1, entry.x)
                };
                Room::new(left, top, right, top + h - 1)
            }
            _ => {
                let left = entry.x - offset;
                let (top, bottom) = if dir.1 > 0 {
                    (entry.y, entry.y + h - 1)
                } else {
                    (entry.y - h + 1, entry.y)
                };
                Room::new(left, top, left + w - 1, bottom)
            }
        }
    }

    /// Whether `room` plus a one-cell wall margin is untouched and inside the interior.
    fn room_fits(&self, room: &Room) -> bool {
        if !self.in_interior(Position::new(room.left, room.top))
            || !self.in_interior(Position::new(room.right, room.bottom))
        {
            return false;
        }
        let margin = Room::new(room.left - 1, room.top - 1, room.right + 1, room.bottom + 1);
        margin.cells().all(|cell| self.is_wall(cell))
    }

    /// Whether a straight corridor of `length` out of `start` runs through
    /// untouched rock only.
    fn corridor_clear(&self, start: Position, dir: (i32, i32), length: i32) -> bool {
        let perpendicular = (dir.1, dir.0);
        for step in 1..length {
            let cell = start.offset(dir.0 * step, dir.1 * step);
            let left = cell.offset(perpendicular.0, perpendicular.1);
            let right = cell.offset(-perpendicular.0, -perpendicular.1);
            if !self.in_interior(cell)
                || !self.is_wall(cell)
                || !self.is_wall(left)
                || !self.is_wall(right)
            {
                return false;
            }
        }
        let end = start.offset(dir.0 * length, dir.1 * length);
        self.in_interior(end) && self.is_wall(end)
    }

    /// Tries to grow a corridor and room out of connector `index`.
    fn try_feature(&mut self, index: usize, rng: &mut GameRng) -> bool {
        let (start, dir) = self.connectors[index];
        if !self.is_wall(start) || !self.in_interior(start) {
            self.connectors.swap_remove(index);
            return false;
        }

        let length = rng.range_i32(
            self.config.corridor_min as i32,
            self.config.corridor_max as i32,
        );
        if !self.corridor_clear(start, dir, length) {
            return false;
        }

        let (w, h) = self.room_size(rng);
        let span = if dir.0 != 0 { h } else { w };
        let offset = rng.range_i32(0, span - 1);
        let end = start.offset(dir.0 * length, dir.1 * length);
        let room = Self::room_beyond(end.offset(dir.0, dir.1), dir, w, h, offset);
        self.attach(index, length, room)
    }

    /// Carves the corridor out of connector `index` and the room at its end.
    fn attach(&mut self, index: usize, length: i32, mut room: Room) -> bool {
        if !self.room_fits(&room) {
            return false;
        }
        let (start, dir) = self.connectors[index];
        for step in 0..=length {
            self.carve(start.offset(dir.0 * step, dir.1 * step));
        }
        self.connectors.swap_remove(index);

        let inside = start.offset(-dir.0, -dir.1);
        if let Some(source) = self.rooms.iter_mut().find(|r| r.contains(inside)) {
            source.doors.push(start);
        }
        room.doors.push(start.offset(dir.0 * length, dir.1 * length));
        self.add_room(room);
        true
    }

    /// Sweeps every connector with the shortest corridor and smallest room.
    fn attach_smallest(&mut self) -> bool {
        let length = self.config.corridor_min as i32;
        let size = self.config.room_min.max(1) as i32;
        for index in 0..self.connectors.len() {
            let (start, dir) = self.connectors[index];
            if !self.is_wall(start)
                || !self.in_interior(start)
                || !self.corridor_clear(start, dir, length)
            {
                continue;
            }
            let entry = start.offset(dir.0 * (length + 1), dir.1 * (length + 1));
            for offset in 0..size {
                let room = Self::room_beyond(entry, dir, size, size, offset);
                if self.attach(index, length, room) {
                    return true;
                }
            }
        }
        false
    }

    /// Digs until the target is met and the stairs have a room of their own.
    fn dig(&mut self, rng: &mut GameRng) {
        self.place_first_room(rng);

        let target = (self.interior_area() as f32 * self.config.dug_percentage) as usize;
        let mut attempts = 0;
        while (self.dug < target || self.rooms.len() < 2)
            && attempts < self.config.iteration_budget
        {
            attempts += 1;
            if self.connectors.is_empty() {
                debug!(attempts, "digger ran out of connectors");
                break;
            }
            let index = rng.range(0, self.connectors.len() as u32 - 1) as usize;
            self.try_feature(index, rng);
        }

        // a zero budget keeps the lone first room
        if self.rooms.len() < 2 && self.config.iteration_budget > 0 && !self.attach_smallest() {
            warn!("no second room fits");
        }

        if self.dug < target {
            debug!(
                dug = self.dug,
                target, attempts, "digger stopped before reaching target"
            );
        }
    }
}

/// Generates a dungeon of `width` x `height` cells.
///
/// Never fails: budget exhaustion keeps whatever was carved, and item spots
/// that cannot be placed are skipped.
pub fn generate(
    width: u32,
    height: u32,
    digger_config: &DiggerConfig,
    item_config: &ItemSpawnConfig,
    rng: &mut GameRng,
) -> Dungeon {
    let dimensions = MapDimensions::new(
        width.max(Dungeon::MIN_WIDTH),
        height.max(Dungeon::MIN_HEIGHT),
    );
    if dimensions.width != width || dimensions.height != height {
        warn!(
            width,
            height,
            used_width = dimensions.width,
            used_height = dimensions.height,
            "map too small, enlarging"
        );
    }

    let mut digger = Digger::new(dimensions, digger_config);
    digger.dig(rng);

    let Digger { cells, rooms, .. } = digger;
    let mut dungeon = Dungeon {
        dimensions,
        cells,
        player_start: Position::ORIGIN,
        stairs_down: Position::ORIGIN,
        item_spawn_points: Vec::new(),
        rooms,
    };

    let (player_start, stairs_down) = pick_endpoints(&dungeon);
    dungeon.player_start = player_start;
    dungeon.stairs_down = stairs_down;
    dungeon.set(stairs_down, TileKind::StairsDown);

    dungeon.item_spawn_points = pick_item_spots(&dungeon, item_config, rng);
    place_doors(&mut dungeon, digger_config.door_chance, rng);

    debug!(
        rooms = dungeon.rooms.len(),
        floor = dungeon.floor_count(),
        items = dungeon.item_spawn_points.len(),
        start = %dungeon.player_start,
        stairs = %dungeon.stairs_down,
        "dungeon generated"
    );
    dungeon
}

/// Start in the centre of the first room, stairs in the centre of the last.
///
/// With a single room the stairs go to the room cell farthest from the start.
fn pick_endpoints(dungeon: &Dungeon) -> (Position, Position) {
    let Some(first) = dungeon.rooms.first() else {
        let centre = Position::new(
            dungeon.dimensions.width as i32 / 2,
            dungeon.dimensions.height as i32 / 2,
        );
        return (centre, centre);
    };
    let start = first.center();

    match dungeon.rooms.last() {
        Some(last) if dungeon.rooms.len() > 1 => (start, last.center()),
        _ => {
            warn!("only one room carved, placing stairs in the start room");
            let stairs = first
                .cells()
                .max_by_key(|cell| (cell.manhattan(start), std::cmp::Reverse(*cell)))
                .unwrap_or(start);
            (start, stairs)
        }
    }
}

fn pick_item_spots(dungeon: &Dungeon, config: &ItemSpawnConfig, rng: &mut GameRng) -> Vec<Position> {
    let count = rng.range(config.min_items, config.max_items);
    let mut spots = Vec::with_capacity(count as usize);
    if dungeon.rooms.is_empty() {
        return spots;
    }

    for _ in 0..count {
        let mut placed = false;
        for _ in 0..config.placement_retries.max(1) {
            let Some(room) = rng.choose(&dungeon.rooms) else {
                break;
            };
            let cell = room.random_cell(rng);
            if cell != dungeon.player_start
                && cell != dungeon.stairs_down
                && dungeon.tile(cell) == TileKind::Floor
                && !spots.contains(&cell)
            {
                spots.push(cell);
                placed = true;
                break;
            }
        }
        if !placed {
            debug!("no free cell for item spawn point, skipping");
        }
    }
    spots
}

fn place_doors(dungeon: &mut Dungeon, chance: f32, rng: &mut GameRng) {
    let connectors: Vec<Position> = dungeon
        .rooms
        .iter()
        .flat_map(|room| room.doors.iter().copied())
        .collect();
    for cell in connectors {
        if rng.chance(chance) && dungeon.tile(cell) == TileKind::Floor {
            dungeon.set(cell, TileKind::Door);
        }
    }
}
