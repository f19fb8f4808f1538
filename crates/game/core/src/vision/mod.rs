//! Field of view and dynamic lighting.
//!
//! Both computations read the same [`OpacityGrid`] snapshot and share the
//! recursive shadowcaster in [`shadowcast`]. Results are cached and only
//! recomputed after being marked dirty.

mod fov;
mod lighting;
pub mod shadowcast;

pub use fov::FieldOfView;
pub use lighting::{LightLevel, LightMap, mix_colors};
pub use shadowcast::OpacityGrid;
