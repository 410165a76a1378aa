//! The per-frame driver: crop, effect chain, overlay, present.
//!
//! The scheduler is single-threaded and cooperative: the embedder invokes
//! [`FrameScheduler::tick`] once per display-refresh opportunity and every
//! step runs synchronously inside that call. Nothing blocks; when the source
//! has no frame ready the tick is skipped and retried on the next refresh,
//! and when processing cannot keep up frames are naturally dropped, never
//! queued.

use crate::effects::{self, DitherScratch};
use crate::foundation::core::{AspectRatio, PixelBuffer};
use crate::foundation::error::RetroResult;
use crate::foundation::math::Rng64;
use crate::overlay::{self, OverlayKind};
use crate::settings::{EffectChain, EffectSettings};

/// External producer of raw video frames.
///
/// The scheduler reads whatever frame is currently decoded; it never awaits
/// one. Returning `None` (not yet decoded, paused, zero dimensions upstream)
/// is expected warm-up behavior, not an error.
pub trait FrameSource {
    /// Borrow the current decoded frame, if one is ready.
    fn frame(&mut self) -> Option<&PixelBuffer>;
}

/// External consumer of presented frames (on-screen draw).
pub trait PresentSink {
    fn present(&mut self, frame: &PixelBuffer) -> RetroResult<()>;
}

/// Per-tick control snapshot supplied by the control surface.
///
/// Values are read fresh each tick; the scheduler performs no memoization
/// across frames.
#[derive(Clone, Debug, Default)]
pub struct Controls {
    pub chain: EffectChain,
    pub settings: EffectSettings,
    pub aspect: AspectRatio,
    pub overlay: OverlayKind,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was processed and presented.
    Rendered,
    /// The source had nothing ready; retry next tick.
    Skipped,
}

/// Drives the processing pipeline, owning the working surfaces across ticks.
///
/// Cross-tick state is limited to buffer allocations (reused while
/// dimensions are unchanged) and the pooled dither scratch; no pixel content
/// or filter state survives from one frame to the next.
pub struct FrameScheduler {
    dst: PixelBuffer,
    aux: PixelBuffer,
    scratch: DitherScratch,
    rng: Rng64,
    ticks_rendered: u64,
    has_frame: bool,
}

impl FrameScheduler {
    /// `seed` drives the randomized filters (grain, random dithering,
    /// vintage scratches); pass a fixed value for reproducible runs.
    pub fn new(seed: u64) -> RetroResult<Self> {
        Ok(Self {
            dst: PixelBuffer::new(1, 1)?,
            aux: PixelBuffer::new(1, 1)?,
            scratch: DitherScratch::new(),
            rng: Rng64::new(seed),
            ticks_rendered: 0,
            has_frame: false,
        })
    }

    /// Process one tick: crop the source frame per the aspect ratio, apply
    /// the active effect chain in insertion order, draw the overlay, and
    /// leave the result as the presented buffer.
    #[tracing::instrument(skip(self, source, controls))]
    pub fn tick(
        &mut self,
        source: &mut dyn FrameSource,
        controls: &Controls,
    ) -> RetroResult<TickOutcome> {
        let Some(frame) = source.frame() else {
            tracing::trace!("source not ready, skipping tick");
            return Ok(TickOutcome::Skipped);
        };
        if frame.width() == 0 || frame.height() == 0 {
            tracing::trace!("source has zero dimensions, skipping tick");
            return Ok(TickOutcome::Skipped);
        }

        let (cx, cy, cw, ch) = controls.aspect.crop_rect(frame.width(), frame.height());
        self.dst.resize(cw, ch);
        self.dst.copy_rect_from(frame, cx, cy)?;

        if !controls.chain.is_empty() {
            effects::apply_chain(
                &controls.chain,
                &controls.settings,
                &mut self.dst,
                &mut self.aux,
                &mut self.scratch,
                &mut self.rng,
            )?;
        }

        if controls.overlay != OverlayKind::None {
            overlay::draw_overlay(&mut self.dst, controls.overlay);
        }

        self.ticks_rendered += 1;
        self.has_frame = true;
        Ok(TickOutcome::Rendered)
    }

    /// Like [`Self::tick`], additionally pushing a rendered frame to `sink`.
    pub fn tick_and_present(
        &mut self,
        source: &mut dyn FrameSource,
        controls: &Controls,
        sink: &mut dyn PresentSink,
    ) -> RetroResult<TickOutcome> {
        let outcome = self.tick(source, controls)?;
        if outcome == TickOutcome::Rendered {
            sink.present(&self.dst)?;
        }
        Ok(outcome)
    }

    /// The most recently completed frame.
    ///
    /// This is what capture consumers read; each tick fully owns and
    /// completes its buffer before presentation, so there is no cross-tick
    /// tearing.
    pub fn presented(&self) -> Option<&PixelBuffer> {
        self.has_frame.then_some(&self.dst)
    }

    /// Number of ticks that rendered a frame (skipped ticks excluded).
    pub fn ticks_rendered(&self) -> u64 {
        self.ticks_rendered
    }
}
