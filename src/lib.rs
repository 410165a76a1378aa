//! Retrolens is a real-time camera-frame effects pipeline.
//!
//! It consumes raw RGBA8 frames from an external video source, applies an
//! ordered, user-composable chain of image filters (film grain, dithering,
//! ASCII art, pixelation, CRT, vintage, color inversion, film-stock
//! emulation, light leaks, framing) plus compositional guide overlays, and
//! presents the result once per display-refresh tick.
//!
//! # Pipeline overview
//!
//! 1. **Crop**: the source frame is cropped to the selected [`AspectRatio`]
//! 2. **Compose**: the active [`EffectChain`] runs in insertion order over
//!    the working [`PixelBuffer`]; surface painters repaint a sibling surface
//! 3. **Overlay**: the selected [`OverlayKind`] guide is drawn on top
//! 4. **Present**: the completed buffer is handed to the presentation sink
//!    and stays readable for still capture and clip recording
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded ticks**: every step of a tick runs synchronously;
//!   an unready source skips the tick, frames are dropped, never queued.
//! - **Deterministic-by-default**: the randomized filters draw from an
//!   injected, seedable [`Rng64`]; everything else is pure.
//! - **Clamped output**: every filter leaves all channels in `[0, 255]`.
#![forbid(unsafe_code)]

mod foundation;
mod raster;

pub mod capture;
pub mod effects;
pub mod overlay;
pub mod palette;
pub mod pipeline;
pub mod settings;

pub use crate::foundation::core::{AspectRatio, PixelBuffer, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{RetroError, RetroResult};
pub use crate::foundation::math::Rng64;

pub use crate::capture::{
    FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, Recorder, SinkConfig, encode_png,
    is_ffmpeg_on_path, write_png,
};
pub use crate::effects::{DitherScratch, EffectStage, apply_chain, stage_of};
pub use crate::overlay::{OverlayKind, draw_overlay};
pub use crate::pipeline::{Controls, FrameScheduler, FrameSource, PresentSink, TickOutcome};
pub use crate::settings::{
    AsciiBackground, DitherMethod, EffectChain, EffectKind, EffectSettings, FilmStock, LeakColor,
    LeakPosition, ParamValue, declared_range,
};
