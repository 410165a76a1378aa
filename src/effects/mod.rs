//! Filter implementations and the ordered chain dispatcher.
//!
//! Two filter capabilities exist:
//!
//! - **pixel transforms** consume and produce the working buffer in place and
//!   compose freely (color transforms, dithering, pixelate, grain, light leak);
//! - **surface painters** own the destination surface for their step and
//!   repaint it from the working buffer (ascii, crt, vintage, frame).
//!
//! A painter that fails its preconditions aborts only its own paint; the tick
//! continues with the buffer the previous step produced.

pub mod ascii;
pub mod block;
pub mod color;
pub mod crt;
pub mod dither;
pub mod frame;
pub mod light_leak;
pub mod vintage;

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::RetroResult;
use crate::foundation::math::Rng64;
use crate::settings::{EffectChain, EffectKind, EffectSettings};

pub use dither::DitherScratch;

/// How an effect consumes its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectStage {
    /// Transforms the working buffer in place; freely composable.
    PixelTransform,
    /// Owns and fully repaints the destination surface for its step.
    SurfacePainter,
}

/// Capability of an effect kind.
pub fn stage_of(kind: EffectKind) -> EffectStage {
    match kind {
        EffectKind::Ascii | EffectKind::Crt | EffectKind::Vintage | EffectKind::Frame => {
            EffectStage::SurfacePainter
        }
        EffectKind::FilmGrain
        | EffectKind::Dithering
        | EffectKind::Pixelate
        | EffectKind::Invert
        | EffectKind::Film
        | EffectKind::LightLeak
        | EffectKind::Sepia
        | EffectKind::Grayscale => EffectStage::PixelTransform,
    }
}

/// Apply the active chain to `buf` in insertion order.
///
/// `aux` is the painter destination surface (resized as needed); `scratch`
/// and `rng` are the pooled dither arena and the injected randomness source.
pub fn apply_chain(
    chain: &EffectChain,
    settings: &EffectSettings,
    buf: &mut PixelBuffer,
    aux: &mut PixelBuffer,
    scratch: &mut DitherScratch,
    rng: &mut Rng64,
) -> RetroResult<()> {
    for kind in chain.iter() {
        match stage_of(kind) {
            EffectStage::PixelTransform => apply_pixel_transform(kind, settings, buf, scratch, rng),
            EffectStage::SurfacePainter => {
                aux.resize(buf.width(), buf.height());
                let painted = match kind {
                    EffectKind::Ascii => ascii::paint(aux, buf, &settings.ascii),
                    EffectKind::Crt => crt::paint(aux, buf, &settings.crt),
                    EffectKind::Vintage => vintage::paint(aux, buf, &settings.vintage, rng),
                    EffectKind::Frame => frame::paint(aux, buf, &settings.frame),
                    _ => unreachable!("stage_of classified {kind:?} as a painter"),
                };
                match painted {
                    Ok(()) => std::mem::swap(buf, aux),
                    Err(err) => {
                        // The failed painter's output is discarded; the tick
                        // continues with the previous step's buffer.
                        tracing::warn!(effect = ?kind, %err, "surface painter aborted");
                    }
                }
            }
        }
    }
    Ok(())
}

fn apply_pixel_transform(
    kind: EffectKind,
    settings: &EffectSettings,
    buf: &mut PixelBuffer,
    scratch: &mut DitherScratch,
    rng: &mut Rng64,
) {
    match kind {
        EffectKind::FilmGrain => block::film_grain(
            buf,
            settings.film_grain.intensity,
            settings.film_grain.grain_size,
            rng,
        ),
        EffectKind::Dithering => dither::apply(buf, &settings.dithering, scratch, rng),
        EffectKind::Pixelate => block::pixelate(buf, settings.pixelate.pixel_size),
        EffectKind::Invert => color::invert(buf, settings.invert.intensity),
        EffectKind::Film => color::film(buf, settings.film.mode, settings.film.intensity),
        EffectKind::LightLeak => light_leak::apply(buf, &settings.light_leak),
        EffectKind::Sepia => color::sepia(buf, settings.sepia.intensity),
        EffectKind::Grayscale => color::grayscale(buf, settings.grayscale.intensity),
        EffectKind::Ascii | EffectKind::Crt | EffectKind::Vintage | EffectKind::Frame => {
            unreachable!("painters are dispatched separately")
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chain.rs"]
mod tests;
