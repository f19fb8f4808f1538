use crate::ecs::Position;
use crate::rng::GameRng;

/// Axis-aligned rectangular room with inclusive bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// Connector cells on the room's perimeter where corridors attach.
    pub doors: Vec<Position>,
}

impl Room {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            doors: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left + 1
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top + 1
    }

    pub fn center(&self) -> Position {
        Position::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.left..=self.right).contains(&position.x)
            && (self.top..=self.bottom).contains(&position.y)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (self.top..=self.bottom)
            .flat_map(move |y| (self.left..=self.right).map(move |x| Position::new(x, y)))
    }

    /// Wall cells just outside each side (corners excluded), paired with the
    /// outward direction.
    pub fn connectors(&self) -> Vec<(Position, (i32, i32))> {
        let mut out = Vec::with_capacity(2 * (self.width() + self.height()) as usize);
        for x in self.left..=self.right {
            out.push((Position::new(x, self.top - 1), (0, -1)));
            out.push((Position::new(x, self.bottom + 1), (0, 1)));
        }
        for y in self.top..=self.bottom {
            out.push((Position::new(self.left - 1, y), (-1, 0)));
            out.push((Position::new(self.right + 1, y), (1, 0)));
        }
        out
    }

    /// Random cell away from the walls when the room is large enough, else any cell.
    pub fn random_cell(&self, rng: &mut GameRng) -> Position {
        let (min_x, max_x) = if self.width() > 2 {
            (self.left + 1, self.right - 1)
        } else {
            (self.left, self.right)
        };
        let (min_y, max_y) = if self.height() > 2 {
            (self.top + 1, self.bottom - 1)
        } else {
            (self.top, self.bottom)
        };
        Position::new(rng.range_i32(min_x, max_x), rng.range_i32(min_y, max_y))
    }
}
