//! Capture consumers: still snapshots and clip recording.
//!
//! Both read the presented buffer of the most recently completed tick; they
//! never pause or lock the scheduler. Still capture encodes a lossless PNG;
//! clip recording streams sequential frames into a [`FrameSink`], with the
//! MP4 container produced by the system `ffmpeg` binary (a runtime
//! prerequisite, never a build dependency).

use std::io::{Cursor, Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{RetroError, RetroResult};

/// Encode the frame as lossless PNG bytes.
pub fn encode_png(frame: &PixelBuffer) -> RetroResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or_else(|| RetroError::evaluation("frame data does not match its dimensions"))?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| RetroError::evaluation(format!("png encode failed: {e}")))?;
    Ok(out.into_inner())
}

/// Write the frame to `path` as PNG.
pub fn write_png(frame: &PixelBuffer, path: impl AsRef<Path>) -> RetroResult<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path.as_ref(), bytes).map_err(|e| {
        RetroError::evaluation(format!(
            "failed to write '{}': {e}",
            path.as_ref().display()
        ))
    })
}

/// Configuration provided to a [`FrameSink`] when recording starts.
#[derive(Clone, Copy, Debug)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    /// Fixed sampling rate of the recording, frames per second.
    pub fps: u32,
}

/// Sink contract for consuming recorded frames.
///
/// `push_frame` is called in strictly increasing frame-index order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> RetroResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: u64, frame: &PixelBuffer) -> RetroResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> RetroResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, PixelBuffer)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u64, PixelBuffer)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> RetroResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &PixelBuffer) -> RetroResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> RetroResult<()> {
        Ok(())
    }
}

/// Samples presented frames into a sink at a fixed rate.
///
/// The recorder is a pure consumer: it clones nothing, blocks nothing, and
/// reads only the frame handed to [`Self::record`].
pub struct Recorder {
    sink: Box<dyn FrameSink>,
    cfg: Option<SinkConfig>,
    next_idx: u64,
}

impl Recorder {
    pub fn new(sink: Box<dyn FrameSink>) -> Self {
        Self {
            sink,
            cfg: None,
            next_idx: 0,
        }
    }

    /// Start a recording of `width x height` frames at `fps`.
    pub fn begin(&mut self, width: u32, height: u32, fps: u32) -> RetroResult<()> {
        if self.cfg.is_some() {
            return Err(RetroError::evaluation("recorder already started"));
        }
        if width == 0 || height == 0 || fps == 0 {
            return Err(RetroError::validation(
                "recorder dimensions and fps must be non-zero",
            ));
        }
        let cfg = SinkConfig { width, height, fps };
        self.sink.begin(cfg)?;
        self.cfg = Some(cfg);
        self.next_idx = 0;
        Ok(())
    }

    /// Append one presented frame to the recording.
    pub fn record(&mut self, frame: &PixelBuffer) -> RetroResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(RetroError::evaluation("recorder not started"));
        };
        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(RetroError::validation(format!(
                "frame size mismatch: got {}x{}, recording {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        let idx = self.next_idx;
        self.next_idx += 1;
        self.sink.push_frame(idx, frame)
    }

    /// Finish the recording and finalize the sink.
    pub fn finish(&mut self) -> RetroResult<()> {
        if self.cfg.take().is_none() {
            return Err(RetroError::evaluation("recorder not started"));
        }
        self.sink.end()
    }

    /// Frames recorded so far.
    pub fn frames_recorded(&self) -> u64 {
        self.next_idx
    }
}

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGBA frames to its
/// stdin for H.264/yuv420p MP4 output.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<u64>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> RetroResult<()> {
        if cfg.width == 0 || cfg.height == 0 || cfg.fps == 0 {
            return Err(RetroError::validation(
                "ffmpeg sink width/height/fps must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(RetroError::validation(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(RetroError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(RetroError::evaluation(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(&self.opts.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            RetroError::evaluation(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RetroError::evaluation("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| RetroError::evaluation("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &PixelBuffer) -> RetroResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| RetroError::evaluation("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(RetroError::evaluation(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(RetroError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(RetroError::evaluation("ffmpeg sink is already finalized"));
        };
        stdin.write_all(frame.data()).map_err(|e| {
            RetroError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> RetroResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| RetroError::evaluation("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            RetroError::evaluation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| RetroError::evaluation("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| RetroError::evaluation(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(RetroError::evaluation(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RetroResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8;

    fn uniform(w: u32, h: u32, color: Rgba8) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        buf.fill(color);
        buf
    }

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let mut frame = PixelBuffer::new(5, 3).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                frame.put_pixel(x, y, [x as u8 * 40, y as u8 * 70, 200, 255]);
            }
        }
        let bytes = encode_png(&frame).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.width(), 5);
        assert_eq!(decoded.height(), 3);
        assert_eq!(decoded.as_raw().as_slice(), frame.data());
    }

    #[test]
    fn recorder_pushes_in_order() {
        let mut recorder = Recorder::new(Box::new(InMemorySink::new()));
        recorder.begin(4, 4, 30).unwrap();
        let frame = uniform(4, 4, Rgba8::opaque(1, 2, 3));
        recorder.record(&frame).unwrap();
        recorder.record(&frame).unwrap();
        recorder.finish().unwrap();
        assert_eq!(recorder.frames_recorded(), 2);
    }

    #[test]
    fn recorder_rejects_size_mismatch_and_double_begin() {
        let mut recorder = Recorder::new(Box::new(InMemorySink::new()));
        recorder.begin(8, 8, 30).unwrap();
        let wrong = uniform(4, 4, Rgba8::BLACK);
        assert!(recorder.record(&wrong).is_err());
        assert!(recorder.begin(8, 8, 30).is_err());
    }

    #[test]
    fn recorder_requires_begin() {
        let mut recorder = Recorder::new(Box::new(InMemorySink::new()));
        let frame = uniform(4, 4, Rgba8::BLACK);
        assert!(recorder.record(&frame).is_err());
        assert!(recorder.finish().is_err());
    }

    #[test]
    fn in_memory_sink_captures_config_and_frames() {
        let mut sink = InMemorySink::new();
        sink.begin(SinkConfig {
            width: 2,
            height: 2,
            fps: 24,
        })
        .unwrap();
        let frame = uniform(2, 2, Rgba8::WHITE);
        sink.push_frame(0, &frame).unwrap();
        sink.end().unwrap();
        assert_eq!(sink.config().unwrap().fps, 24);
        assert_eq!(sink.frames().len(), 1);
        assert_eq!(sink.frames()[0].1, frame);
    }

    #[test]
    fn ffmpeg_sink_validates_dimensions_before_spawning() {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("/tmp/retrolens-test.mp4"));
        let err = sink.begin(SinkConfig {
            width: 3,
            height: 2,
            fps: 30,
        });
        assert!(err.is_err(), "odd width must be rejected");
    }
}
