use std::time::Instant;

use log::{debug, info};

use crate::error::OceanResult;
use crate::spectrum::{synthesize, SpectrumParameters};
use crate::surface::{derive_surface, GradientMode, Surface};
use crate::transform::Backend;

/// Full pipeline: validate, synthesize the spectrum, derive height and normals.
///
/// Holds no state between calls beyond its configuration; every intermediate
/// grid lives only for the duration of [`Ocean::generate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ocean {
    pub backend: Backend,
    pub gradient_mode: GradientMode,
}

impl Ocean {
    pub fn new(backend: Backend, gradient_mode: GradientMode) -> Self {
        Self {
            backend,
            gradient_mode,
        }
    }

    pub fn generate(&self, params: &SpectrumParameters) -> OceanResult<Surface> {
        params.check()?;

        let engine = self.backend.engine();
        debug!(
            "Generating {}x{} ocean with the {} engine, {:?} gradient, seed {}",
            params.nx,
            params.ny,
            engine.name(),
            self.gradient_mode,
            params.seed
        );

        let start = Instant::now();
        let spectrum = synthesize(params);
        debug!("Spectrum synthesized in {:.2?}", start.elapsed());

        let start = Instant::now();
        let surface = derive_surface(&spectrum, params, self.gradient_mode, engine);
        debug!("Surface derived in {:.2?}", start.elapsed());

        info!(
            "Ocean height range: min = {:.4}, max = {:.4}",
            surface.min_height, surface.max_height
        );

        Ok(surface)
    }
}

/// Generate with the default backend
pub fn generate(params: &SpectrumParameters, gradient_mode: GradientMode) -> OceanResult<Surface> {
    Ocean::new(Backend::default(), gradient_mode).generate(params)
}
