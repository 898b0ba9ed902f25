// Export main modules
pub mod error;
pub mod export;
pub mod grid;
pub mod ocean;
pub mod spectrum;
pub mod surface;
pub mod transform;

/// Complex sample used throughout the transforms
pub type Complex = num_complex::Complex64;

// Re-export everything for public use
pub use error::{ExportError, OceanError, OceanResult};
pub use export::{save_height_tga, save_normal_tga, save_surface_glb, write_height_tga, write_normal_tga};
pub use grid::Grid;
pub use ocean::{generate, Ocean};
pub use spectrum::{phillips, synthesize, ParamErrors, SpectrumParameters};
pub use surface::{derive_surface, GradientMode, Surface};
pub use transform::{Backend, Direction, TransformEngine};

pub mod prelude {
    pub use crate::grid::Grid;
    pub use crate::ocean::Ocean;
    pub use crate::spectrum::SpectrumParameters;
    pub use crate::surface::{GradientMode, Surface};
    pub use crate::transform::{Backend, Direction, TransformEngine};
    pub use crate::Complex;
}
