use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::effects::{color, composite, convolve, geometry};
use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::model::{EffectSpec, parse_effect};
use crate::raster::buffer::PixelBuffer;

/// What to do with an effect name outside the supported set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownEffectPolicy {
    /// Drop the step with a warning and keep going.
    #[default]
    Skip,
    /// Fail the whole request with [`RasterFxError::UnsupportedEffect`].
    Reject,
}

/// Options for an [`EffectPipeline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineOpts {
    /// Seed for the noise generator. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub unknown_effects: UnknownEffectPolicy,
    /// Worker threads for row-parallel effects. `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl PipelineOpts {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_unknown_effects(mut self, policy: UnknownEffectPolicy) -> Self {
        self.unknown_effects = policy;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}

/// Runs ordered effect lists over images.
///
/// A pipeline holds only configuration and a worker pool; every [`EffectPipeline::run`] gets its
/// own noise generator, so one pipeline can serve concurrent requests.
pub struct EffectPipeline {
    opts: PipelineOpts,
    pool: rayon::ThreadPool,
}

impl EffectPipeline {
    pub fn new(opts: PipelineOpts) -> RasterFxResult<Self> {
        let pool = build_thread_pool(opts.threads)?;
        Ok(Self { opts, pool })
    }

    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    /// Parse a wire effect list, applying the configured [`UnknownEffectPolicy`].
    pub fn parse(&self, effects: &serde_json::Value) -> RasterFxResult<Vec<EffectSpec>> {
        parse_effect_list(effects, self.opts.unknown_effects)
    }

    /// Apply `specs` in order, returning the final image.
    #[tracing::instrument(
        skip_all,
        fields(width = image.width(), height = image.height(), steps = specs.len())
    )]
    pub fn run(&self, image: PixelBuffer, specs: &[EffectSpec]) -> RasterFxResult<PixelBuffer> {
        let mut rng = match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.pool.install(|| apply(image, specs, &mut rng))
    }
}

/// Fold `specs` over `image` left to right, drawing noise from `rng`.
///
/// An empty list returns `image` untouched.
pub fn apply<R: Rng + ?Sized>(
    image: PixelBuffer,
    specs: &[EffectSpec],
    rng: &mut R,
) -> RasterFxResult<PixelBuffer> {
    specs
        .iter()
        .enumerate()
        .try_fold(image, |img, (step, spec)| {
            tracing::debug!(step, effect = %spec.kind(), "applying effect");
            apply_one(&img, spec, &mut *rng)
        })
}

/// Dispatch one step to its engine.
pub fn apply_one<R: Rng + ?Sized>(
    img: &PixelBuffer,
    spec: &EffectSpec,
    rng: &mut R,
) -> RasterFxResult<PixelBuffer> {
    let out = match *spec {
        EffectSpec::Invert => color::invert(img),
        EffectSpec::Grayscale => color::grayscale(img),
        EffectSpec::Sepia => color::sepia(img),
        EffectSpec::Solarize => color::solarize(img),
        EffectSpec::Posterize { levels } => color::posterize(img, levels),
        EffectSpec::Brightness { amount } => color::brightness(img, amount),
        EffectSpec::Contrast { amount } => color::contrast(img, amount),
        EffectSpec::Noise => color::noise(img, rng),
        EffectSpec::Blur => convolve::blur(img),
        EffectSpec::Sharpen => convolve::sharpen(img),
        EffectSpec::Edge => convolve::edge(img),
        EffectSpec::Emboss => convolve::emboss(img),
        EffectSpec::Neon => convolve::neon(img),
        EffectSpec::Outline => convolve::outline(img),
        EffectSpec::Scanlines => geometry::scanlines(img),
        EffectSpec::Vhs { strength } => geometry::vhs(img, strength),
        EffectSpec::Heatwave => geometry::heatwave(img),
        EffectSpec::Warp => geometry::warp(img),
        EffectSpec::Pixelate { size } => geometry::pixelate(img, size),
        EffectSpec::Stretch => geometry::stretch(img)?,
        EffectSpec::Swirl => geometry::swirl(img),
        EffectSpec::Rotate { angle } => geometry::rotate(img, angle),
        EffectSpec::SpinCube { angle } => geometry::spin_cube(img, angle),
        EffectSpec::Ghost => composite::ghost(img),
        EffectSpec::Glow => composite::glow(img),
    };
    Ok(out)
}

/// Parse a JSON array of wire effects.
pub fn parse_effect_list(
    effects: &serde_json::Value,
    policy: UnknownEffectPolicy,
) -> RasterFxResult<Vec<EffectSpec>> {
    let Some(items) = effects.as_array() else {
        return Err(RasterFxError::validation("effects must be a JSON array"));
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_effect(item) {
            Ok(spec) => out.push(spec),
            Err(RasterFxError::UnsupportedEffect(name)) if policy == UnknownEffectPolicy::Skip => {
                tracing::warn!(index, effect = %name, "skipping unsupported effect");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

fn build_thread_pool(threads: Option<usize>) -> RasterFxResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RasterFxError::validation(
            "pipeline 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RasterFxError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
