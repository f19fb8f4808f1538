//! Recursive shadowcasting over eight octants.
//!
//! Each visited cell is reported with the fraction of its angular span (within
//! the octant) that is not in shadow, in `[0, 1]`. Cells on octant boundaries may be reported more
//! than once; callers keep the maximum.

use crate::ecs::{MapDimensions, Position, Tile, Transparent, World};

/// Snapshot of which cells stop sight, taken once per recompute.
///
/// A cell is opaque when any occupant has `Tile { blocks_light: true }` or
/// `Transparent(false)`. Out-of-bounds cells are opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpacityGrid {
    dimensions: MapDimensions,
    opaque: Vec<bool>,
}

impl OpacityGrid {
    /// All-transparent grid.
    pub fn open(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            opaque: vec![false; dimensions.area()],
        }
    }

    pub fn from_world(world: &World, dimensions: MapDimensions) -> Self {
        let mut grid = Self::open(dimensions);
        for (id, tile) in world.iter::<Tile>() {
            if tile.blocks_light
                && let Some(position) = world.position(id)
            {
                grid.set_opaque(position, true);
            }
        }
        for (id, transparent) in world.iter::<Transparent>() {
            if !transparent.0
                && let Some(position) = world.position(id)
            {
                grid.set_opaque(position, true);
            }
        }
        grid
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn set_opaque(&mut self, position: Position, opaque: bool) {
        if let Some(index) = self.dimensions.index_of(position) {
            self.opaque[index] = opaque;
        }
    }

    pub fn is_opaque(&self, position: Position) -> bool {
        self.dimensions
            .index_of(position)
            .is_none_or(|index| self.opaque[index])
    }
}

/// Octant transforms `(xx, xy, yx, yy)`.
const OCTANTS: [(i32, i32, i32, i32); 8] = [
    (1, 0, 0, 1),
    (0, 1, 1, 0),
    (0, -1, 1, 0),
    (-1, 0, 0, 1),
    (-1, 0, 0, -1),
    (0, -1, -1, 0),
    (0, 1, -1, 0),
    (1, 0, 0, -1),
];

/// Reports every cell within `radius` (Euclidean) of `origin` that is lit from
/// it, together with its visible fraction. The origin itself is always reported
/// with fraction 1.
pub fn compute<F>(grid: &OpacityGrid, origin: Position, radius: u32, mut visit: F)
where
    F: FnMut(Position, f32),
{
    if !grid.dimensions.contains(origin) {
        return;
    }
    visit(origin, 1.0);
    if radius == 0 {
        return;
    }

    let caster = Caster {
        grid,
        origin,
        radius: radius as i32,
    };
    for transform in OCTANTS {
        caster.cast(1, 1.0, 0.0, transform, &mut visit);
    }
}

struct Caster<'a> {
    grid: &'a OpacityGrid,
    origin: Position,
    radius: i32,
}

impl Caster<'_> {
    fn cast<F>(
        &self,
        row: i32,
        mut start: f32,
        end: f32,
        (xx, xy, yx, yy): (i32, i32, i32, i32),
        visit: &mut F,
    ) where
        F: FnMut(Position, f32),
    {
        if start < end {
            return;
        }
        let radius_sq = self.radius * self.radius;
        let mut next_start = start;

        for distance in row..=self.radius {
            let dy = -distance;
            let mut blocked = false;

            for dx in -distance..=0 {
                let left = (dx as f32 - 0.5) / (dy as f32 + 0.5);
                let right = (dx as f32 + 0.5) / (dy as f32 - 0.5);
                if start < right {
                    continue;
                }
                if end > left {
                    break;
                }

                let cell = Position::new(
                    self.origin.x + dx * xx + dy * xy,
                    self.origin.y + dx * yx + dy * yy,
                );
                if dx * dx + dy * dy <= radius_sq && self.grid.dimensions.contains(cell) {
                    // unshadowed share of the cell's span inside this octant
                    let lit = start.min(left) - end.max(right);
                    let span = left.min(1.0) - right.max(0.0);
                    let fraction = if span > 0.0 { lit / span } else { 1.0 };
                    visit(cell, fraction.clamp(0.0, 1.0));
                }

                let opaque = self.grid.is_opaque(cell);
                if blocked {
                    if opaque {
                        next_start = right;
                    } else {
                        blocked = false;
                        start = next_start;
                    }
                } else if opaque && distance < self.radius {
                    blocked = true;
                    self.cast(distance + 1, start, left, (xx, xy, yx, yy), visit);
                    next_start = right;
                }
            }

            if blocked {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(grid: &OpacityGrid, origin: Position, radius: u32) -> Vec<bool> {
        let dims = grid.dimensions();
        let mut out = vec![false; dims.area()];
        compute(grid, origin, radius, |cell, _| {
            if let Some(index) = dims.index_of(cell) {
                out[index] = true;
            }
        });
        out
    }

    #[test]
    fn open_room_is_lit_within_radius() {
        let dims = MapDimensions::new(11, 11);
        let grid = OpacityGrid::open(dims);
        let out = lit(&grid, Position::new(5, 5), 3);

        assert!(out[dims.index_of(Position::new(5, 2)).unwrap()]);
        assert!(out[dims.index_of(Position::new(7, 7)).unwrap()]);
        assert!(!out[dims.index_of(Position::new(5, 1)).unwrap()]);
        assert!(!out[dims.index_of(Position::new(8, 8)).unwrap()]);
    }

    #[test]
    fn walls_cast_shadows() {
        let dims = MapDimensions::new(11, 3);
        let mut grid = OpacityGrid::open(dims);
        for y in 0..3 {
            grid.set_opaque(Position::new(4, y), true);
        }
        let out = lit(&grid, Position::new(1, 1), 10);

        // the wall itself is seen, the cells behind it are not
        assert!(out[dims.index_of(Position::new(4, 1)).unwrap()]);
        assert!(!out[dims.index_of(Position::new(6, 1)).unwrap()]);
    }

    #[test]
    fn doors_are_opaque_to_sight_and_light() {
        use crate::map::TileKind;

        let dims = MapDimensions::new(5, 1);
        let mut world = World::new();
        for x in 0..5 {
            let kind = if x == 2 { TileKind::Door } else { TileKind::Floor };
            let id = world.create();
            world.add(id, Position::new(x, 0)).unwrap();
            world.add(id, kind.tile()).unwrap();
            world.add(id, Transparent(kind.transparent())).unwrap();
        }

        let grid = OpacityGrid::from_world(&world, dims);
        assert!(grid.is_opaque(Position::new(2, 0)));
        assert!(!grid.is_opaque(Position::new(1, 0)));

        let out = lit(&grid, Position::new(0, 0), 4);
        assert!(out[dims.index_of(Position::new(2, 0)).unwrap()]);
        assert!(!out[dims.index_of(Position::new(3, 0)).unwrap()]);
    }

    #[test]
    fn origin_is_always_fully_visible() {
        let dims = MapDimensions::new(3, 3);
        let mut grid = OpacityGrid::open(dims);
        grid.set_opaque(Position::new(1, 1), true);
        let mut origin_fraction = None;
        compute(&grid, Position::new(1, 1), 0, |cell, fraction| {
            if cell == Position::new(1, 1) {
                origin_fraction = Some(fraction);
            }
        });
        assert_eq!(origin_fraction, Some(1.0));
    }
}
