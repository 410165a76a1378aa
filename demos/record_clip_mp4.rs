use retrolens::{
    Controls, EffectKind, FfmpegSink, FfmpegSinkOpts, FrameScheduler, FrameSource, ParamValue,
    PixelBuffer, Recorder, is_ffmpeg_on_path,
};

struct SweepCamera {
    frame: PixelBuffer,
    phase: u32,
}

impl SweepCamera {
    fn new(w: u32, h: u32) -> anyhow::Result<Self> {
        let mut camera = Self {
            frame: PixelBuffer::new(w, h)?,
            phase: 0,
        };
        camera.redraw();
        Ok(camera)
    }

    fn advance(&mut self) {
        self.phase = self.phase.wrapping_add(4);
        self.redraw();
    }

    fn redraw(&mut self) {
        let w = self.frame.width();
        let h = self.frame.height();
        for y in 0..h {
            for x in 0..w {
                let r = (((x + self.phase) * 255) / w % 256) as u8;
                let g = ((y * 255) / h) as u8;
                self.frame.put_pixel(x, y, [r, g, 128, 255]);
            }
        }
    }
}

impl FrameSource for SweepCamera {
    fn frame(&mut self) -> Option<&PixelBuffer> {
        Some(&self.frame)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    if !is_ffmpeg_on_path() {
        eprintln!("ffmpeg not found on PATH; skipping mp4 recording demo");
        return Ok(());
    }

    let mut controls = Controls::default();
    controls.chain.toggle(EffectKind::Film);
    controls.chain.toggle(EffectKind::FilmGrain);
    controls
        .settings
        .set_parameter(EffectKind::Film, "mode", ParamValue::Text("portra".into()))?;

    let (w, h, fps) = (320u32, 240u32, 30u32);
    let out = "out/clip.mp4";
    let mut recorder = Recorder::new(Box::new(FfmpegSink::new(FfmpegSinkOpts::new(out))));
    recorder.begin(w, h, fps)?;

    let mut scheduler = FrameScheduler::new(7)?;
    let mut camera = SweepCamera::new(w, h)?;
    for _ in 0..90 {
        camera.advance();
        scheduler.tick(&mut camera, &controls)?;
        let frame = scheduler
            .presented()
            .ok_or_else(|| anyhow::anyhow!("no frame presented"))?;
        recorder.record(frame)?;
    }
    recorder.finish()?;

    println!("wrote {out} ({} frames at {fps} fps)", recorder.frames_recorded());
    Ok(())
}
