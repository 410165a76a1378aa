use retrolens::{
    AspectRatio, Controls, EffectKind, FrameScheduler, FrameSource, InMemorySink, OverlayKind,
    ParamValue, PixelBuffer, Recorder, TickOutcome, encode_png,
};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

struct TestCamera {
    frame: Option<PixelBuffer>,
}

impl TestCamera {
    fn with_gradient(w: u32, h: u32) -> Self {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let r = ((x * 255) / w) as u8;
                let g = ((y * 255) / h) as u8;
                buf.put_pixel(x, y, [r, g, 128, 255]);
            }
        }
        Self { frame: Some(buf) }
    }
}

impl FrameSource for TestCamera {
    fn frame(&mut self) -> Option<&PixelBuffer> {
        self.frame.as_ref()
    }
}

#[test]
fn warm_up_then_render_then_capture() {
    let mut scheduler = FrameScheduler::new(1).unwrap();
    let mut camera = TestCamera { frame: None };
    let controls = Controls::default();

    for _ in 0..3 {
        assert_eq!(
            scheduler.tick(&mut camera, &controls).unwrap(),
            TickOutcome::Skipped
        );
    }
    assert!(scheduler.presented().is_none());

    camera.frame = TestCamera::with_gradient(320, 240).frame;
    assert_eq!(
        scheduler.tick(&mut camera, &controls).unwrap(),
        TickOutcome::Rendered
    );

    let png = encode_png(scheduler.presented().unwrap()).unwrap();
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn full_chain_render_is_deterministic_for_seed() {
    let mut controls = Controls::default();
    controls.aspect = AspectRatio::Square;
    controls.overlay = OverlayKind::RuleOfThirds;
    controls.chain.toggle(EffectKind::Pixelate);
    controls.chain.toggle(EffectKind::FilmGrain);
    controls.chain.toggle(EffectKind::Vintage);
    controls
        .settings
        .set_parameter(EffectKind::Vintage, "scratch", ParamValue::Number(1.0))
        .unwrap();

    let render = || {
        let mut scheduler = FrameScheduler::new(42).unwrap();
        let mut camera = TestCamera::with_gradient(200, 160);
        scheduler.tick(&mut camera, &controls).unwrap();
        digest_u64(scheduler.presented().unwrap().data())
    };

    assert_eq!(render(), render());
}

#[test]
fn aspect_crop_and_effects_compose_end_to_end() {
    let mut controls = Controls::default();
    controls.aspect = AspectRatio::Square;
    controls.chain.toggle(EffectKind::Frame);
    controls
        .settings
        .set_parameter(EffectKind::Frame, "thickness", ParamValue::Number(10.0))
        .unwrap();

    let mut scheduler = FrameScheduler::new(1).unwrap();
    let mut camera = TestCamera::with_gradient(1920, 1080);
    scheduler.tick(&mut camera, &controls).unwrap();

    let out = scheduler.presented().unwrap();
    assert_eq!((out.width(), out.height()), (1080, 1080));
    assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(out.pixel(1079, 1079), [255, 255, 255, 255]);
    assert_ne!(out.pixel(540, 540), [255, 255, 255, 255]);
}

#[test]
fn recording_samples_presented_frames() {
    let mut scheduler = FrameScheduler::new(1).unwrap();
    let mut camera = TestCamera::with_gradient(64, 64);
    let controls = Controls::default();

    let mut recorder = Recorder::new(Box::new(InMemorySink::new()));
    recorder.begin(64, 64, 30).unwrap();

    for _ in 0..5 {
        scheduler.tick(&mut camera, &controls).unwrap();
        recorder.record(scheduler.presented().unwrap()).unwrap();
    }
    recorder.finish().unwrap();
    assert_eq!(recorder.frames_recorded(), 5);
}

#[test]
fn controls_are_read_fresh_each_tick() {
    let mut scheduler = FrameScheduler::new(1).unwrap();
    let mut camera = TestCamera::with_gradient(64, 64);

    let mut controls = Controls::default();
    controls.chain.toggle(EffectKind::Invert);
    scheduler.tick(&mut camera, &controls).unwrap();
    let inverted = scheduler.presented().unwrap().pixel(32, 32);

    controls.chain.clear();
    scheduler.tick(&mut camera, &controls).unwrap();
    let plain = scheduler.presented().unwrap().pixel(32, 32);

    assert_eq!(inverted[0], 255 - plain[0]);
    assert_eq!(inverted[1], 255 - plain[1]);
}
