use crate::ecs::{Light, MapDimensions, Position};

use super::shadowcast::{self, OpacityGrid};

/// Brightest light reaching a cell and the colour of its source.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightLevel {
    pub intensity: f32,
    pub color: u32,
}

/// Per-cell light levels from every light source.
///
/// Each source contributes `intensity * (1 - distance / radius) * visibility`
/// to the cells it reaches; overlapping sources keep the maximum.
#[derive(Clone, Debug, PartialEq)]
pub struct LightMap {
    dimensions: MapDimensions,
    levels: Vec<Option<LightLevel>>,
    dirty: bool,
}

impl LightMap {
    pub fn new(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            levels: vec![None; dimensions.area()],
            dirty: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drops all levels and resizes, leaving the map dirty.
    pub fn reset(&mut self, dimensions: MapDimensions) {
        self.dimensions = dimensions;
        self.levels = vec![None; dimensions.area()];
        self.dirty = true;
    }

    /// Recomputes from `lights` if dirty. Returns whether work was done.
    pub fn update<I>(&mut self, grid: &OpacityGrid, lights: I) -> bool
    where
        I: IntoIterator<Item = (Position, Light)>,
    {
        if !self.dirty {
            return false;
        }

        self.levels.fill(None);
        let dimensions = self.dimensions;
        for (origin, light) in lights {
            if light.radius == 0 {
                continue;
            }
            let radius = light.radius as f32;
            let levels = &mut self.levels;
            shadowcast::compute(grid, origin, light.radius, |cell, visibility| {
                let Some(index) = dimensions.index_of(cell) else {
                    return;
                };
                let falloff = (1.0 - origin.euclidean(cell) / radius).max(0.0);
                let intensity = light.intensity * falloff * visibility;
                let brighter = levels[index].is_none_or(|level| level.intensity < intensity);
                if brighter {
                    levels[index] = Some(LightLevel {
                        intensity,
                        color: light.color,
                    });
                }
            });
        }

        self.dirty = false;
        true
    }

    pub fn light_at(&self, position: Position) -> Option<LightLevel> {
        self.dimensions
            .index_of(position)
            .and_then(|index| self.levels[index])
    }
}

/// Linear blend of two `0xRRGGBB` colours; `ratio` 0 yields `a`, 1 yields `b`.
pub fn mix_colors(a: u32, b: u32, ratio: f32) -> u32 {
    let ratio = ratio.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - ratio) + cb * ratio).floor() as u32).min(0xFF) << shift
    };
    channel(16) | channel(8) | channel(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torch(radius: u32, color: u32) -> Light {
        Light {
            radius,
            intensity: 1.0,
            color,
        }
    }

    #[test]
    fn intensity_falls_off_linearly() {
        let dims = MapDimensions::new(21, 3);
        let grid = OpacityGrid::open(dims);
        let mut map = LightMap::new(dims);
        map.update(&grid, [(Position::new(0, 1), torch(10, 0xFF0000))]);

        let at_source = map.light_at(Position::new(0, 1)).unwrap();
        let halfway = map.light_at(Position::new(5, 1)).unwrap();
        assert_eq!(at_source.intensity, 1.0);
        assert!((halfway.intensity - 0.5).abs() < 1e-4);
        assert!(map.light_at(Position::new(12, 1)).is_none());
    }

    #[test]
    fn overlapping_lights_keep_the_brightest() {
        let dims = MapDimensions::new(11, 1);
        let grid = OpacityGrid::open(dims);
        let mut map = LightMap::new(dims);
        map.update(
            &grid,
            [
                (Position::new(0, 0), torch(10, 0xFF0000)),
                (Position::new(10, 0), torch(10, 0x0000FF)),
            ],
        );

        assert_eq!(map.light_at(Position::new(2, 0)).unwrap().color, 0xFF0000);
        assert_eq!(map.light_at(Position::new(8, 0)).unwrap().color, 0x0000FF);
    }

    #[test]
    fn clean_map_skips_recompute() {
        let dims = MapDimensions::new(5, 5);
        let grid = OpacityGrid::open(dims);
        let mut map = LightMap::new(dims);
        assert!(map.update(&grid, [(Position::new(2, 2), torch(3, 0xFFFFFF))]));
        assert!(!map.update(&grid, std::iter::empty()));
        assert!(map.light_at(Position::new(2, 2)).is_some());
    }

    #[test]
    fn mix_colors_blends_channels() {
        assert_eq!(mix_colors(0x000000, 0xFFFFFF, 0.0), 0x000000);
        assert_eq!(mix_colors(0x000000, 0xFFFFFF, 1.0), 0xFFFFFF);
        assert_eq!(mix_colors(0xFF0000, 0x0000FF, 0.5), 0x7F007F);
    }
}
