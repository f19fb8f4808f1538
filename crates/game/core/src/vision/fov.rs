use crate::ecs::{MapDimensions, Position};

use super::shadowcast::{self, OpacityGrid};

/// Player sight: cells visible this turn plus cells ever seen on this floor.
///
/// Derived state. Call [`FieldOfView::mark_dirty`] when the viewer moves or the
/// terrain changes; [`FieldOfView::update`] is a no-op while clean.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOfView {
    dimensions: MapDimensions,
    radius: u32,
    visible: Vec<bool>,
    seen: Vec<bool>,
    dirty: bool,
}

impl FieldOfView {
    pub fn new(dimensions: MapDimensions, radius: u32) -> Self {
        Self {
            dimensions,
            radius,
            visible: vec![false; dimensions.area()],
            seen: vec![false; dimensions.area()],
            dirty: true,
        }
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forgets everything seen, e.g. on a floor change. Also resizes to `dimensions`.
    pub fn clear_memory(&mut self, dimensions: MapDimensions) {
        self.dimensions = dimensions;
        self.visible = vec![false; dimensions.area()];
        self.seen = vec![false; dimensions.area()];
        self.dirty = true;
    }

    /// Recomputes from `origin` if dirty. Returns whether work was done.
    pub fn update(&mut self, grid: &OpacityGrid, origin: Position) -> bool {
        if !self.dirty {
            return false;
        }

        self.visible.fill(false);
        let dimensions = self.dimensions;
        let (visible, seen) = (&mut self.visible, &mut self.seen);
        shadowcast::compute(grid, origin, self.radius, |cell, _| {
            if let Some(index) = dimensions.index_of(cell) {
                visible[index] = true;
                seen[index] = true;
            }
        });

        self.dirty = false;
        tracing::trace!(%origin, visible = self.visible_count(), "fov recomputed");
        true
    }

    pub fn is_visible(&self, position: Position) -> bool {
        self.dimensions
            .index_of(position)
            .is_some_and(|index| self.visible[index])
    }

    pub fn is_seen(&self, position: Position) -> bool {
        self.dimensions
            .index_of(position)
            .is_some_and(|index| self.seen[index])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    pub fn visible_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(index, _)| self.dimensions.position_of(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> OpacityGrid {
        let dims = MapDimensions::new(12, 5);
        let mut grid = OpacityGrid::open(dims);
        for x in 0..12 {
            grid.set_opaque(Position::new(x, 0), true);
            grid.set_opaque(Position::new(x, 4), true);
        }
        grid.set_opaque(Position::new(6, 1), true);
        grid.set_opaque(Position::new(6, 2), true);
        grid.set_opaque(Position::new(6, 3), true);
        grid
    }

    #[test]
    fn recompute_with_unchanged_inputs_is_idempotent() {
        let grid = corridor();
        let mut fov = FieldOfView::new(grid.dimensions(), 10);
        assert!(fov.update(&grid, Position::new(2, 2)));
        let first: Vec<_> = fov.visible_cells().collect();

        fov.mark_dirty();
        assert!(fov.update(&grid, Position::new(2, 2)));
        let second: Vec<_> = fov.visible_cells().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn clean_update_is_a_no_op() {
        let grid = corridor();
        let mut fov = FieldOfView::new(grid.dimensions(), 10);
        fov.update(&grid, Position::new(2, 2));
        assert!(!fov.update(&grid, Position::new(9, 2)));
        assert!(fov.is_visible(Position::new(2, 2)));
    }

    #[test]
    fn seen_outlives_visible_until_cleared() {
        let grid = corridor();
        let mut fov = FieldOfView::new(grid.dimensions(), 10);
        fov.update(&grid, Position::new(2, 2));
        assert!(fov.is_visible(Position::new(4, 2)));
        assert!(!fov.is_visible(Position::new(8, 2)));

        fov.mark_dirty();
        fov.update(&grid, Position::new(9, 2));
        assert!(!fov.is_visible(Position::new(4, 2)));
        assert!(fov.is_seen(Position::new(4, 2)));

        fov.clear_memory(grid.dimensions());
        assert!(!fov.is_seen(Position::new(4, 2)));
        assert!(fov.is_dirty());
    }
}
