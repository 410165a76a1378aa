use std::path::Path;

use retrolens::{
    AspectRatio, Controls, EffectKind, FrameScheduler, FrameSource, OverlayKind, ParamValue,
    PixelBuffer,
};

struct GradientCamera {
    frame: PixelBuffer,
}

impl GradientCamera {
    fn new(w: u32, h: u32) -> anyhow::Result<Self> {
        let mut frame = PixelBuffer::new(w, h)?;
        for y in 0..h {
            for x in 0..w {
                let r = ((x * 255) / w) as u8;
                let g = ((y * 255) / h) as u8;
                frame.put_pixel(x, y, [r, g, 96, 255]);
            }
        }
        Ok(Self { frame })
    }
}

impl FrameSource for GradientCamera {
    fn frame(&mut self) -> Option<&PixelBuffer> {
        Some(&self.frame)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut controls = Controls::default();
    controls.aspect = AspectRatio::Square;
    controls.overlay = OverlayKind::RuleOfThirds;
    controls.chain.toggle(EffectKind::Pixelate);
    controls.chain.toggle(EffectKind::Dithering);
    controls.settings.set_parameter(
        EffectKind::Dithering,
        "palette",
        ParamValue::Text("gameboy".into()),
    )?;

    let mut scheduler = FrameScheduler::new(42)?;
    let mut camera = GradientCamera::new(640, 480)?;
    scheduler.tick(&mut camera, &controls)?;

    let frame = scheduler
        .presented()
        .ok_or_else(|| anyhow::anyhow!("no frame presented"))?;

    let out = "out/frame.png";
    retrolens::capture::ensure_parent_dir(Path::new(out))?;
    retrolens::write_png(frame, out)?;
    println!("wrote {out} ({}x{})", frame.width(), frame.height());

    Ok(())
}
