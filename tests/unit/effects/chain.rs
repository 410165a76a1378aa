use super::*;
use crate::foundation::core::Rgba8;

fn uniform(w: u32, h: u32, color: Rgba8) -> PixelBuffer {
    let mut buf = PixelBuffer::new(w, h).unwrap();
    buf.fill(color);
    buf
}

fn run_chain(chain: &EffectChain, settings: &EffectSettings, buf: &mut PixelBuffer, seed: u64) {
    let mut aux = PixelBuffer::new(1, 1).unwrap();
    let mut scratch = DitherScratch::new();
    let mut rng = Rng64::new(seed);
    apply_chain(chain, settings, buf, &mut aux, &mut scratch, &mut rng).unwrap();
}

#[test]
fn painters_and_transforms_are_classified() {
    assert_eq!(stage_of(EffectKind::Ascii), EffectStage::SurfacePainter);
    assert_eq!(stage_of(EffectKind::Crt), EffectStage::SurfacePainter);
    assert_eq!(stage_of(EffectKind::Vintage), EffectStage::SurfacePainter);
    assert_eq!(stage_of(EffectKind::Frame), EffectStage::SurfacePainter);
    assert_eq!(stage_of(EffectKind::Dithering), EffectStage::PixelTransform);
    assert_eq!(stage_of(EffectKind::LightLeak), EffectStage::PixelTransform);
}

#[test]
fn empty_chain_is_identity() {
    let mut buf = uniform(16, 16, Rgba8::opaque(12, 34, 56));
    let orig = buf.clone();
    run_chain(&EffectChain::new(), &EffectSettings::default(), &mut buf, 1);
    assert_eq!(buf, orig);
}

#[test]
fn deterministic_chain_is_reproducible() {
    let mut chain = EffectChain::new();
    chain.toggle(EffectKind::Pixelate);
    chain.toggle(EffectKind::Invert);
    chain.toggle(EffectKind::Frame);
    let settings = EffectSettings::default();

    let mut gradient = PixelBuffer::new(40, 30).unwrap();
    for y in 0..30 {
        for x in 0..40 {
            gradient.put_pixel(x, y, [(x * 6) as u8, (y * 8) as u8, 77, 255]);
        }
    }

    let mut a = gradient.clone();
    run_chain(&chain, &settings, &mut a, 1);
    let mut b = gradient.clone();
    run_chain(&chain, &settings, &mut b, 99);
    assert_eq!(a, b, "deterministic chain must not depend on the rng seed");
}

#[test]
fn composition_order_matters() {
    let settings = EffectSettings::default();

    let mut gradient = PixelBuffer::new(32, 32).unwrap();
    for y in 0..32 {
        for x in 0..32 {
            gradient.put_pixel(x, y, [(x * 8) as u8, (y * 8) as u8, 0, 255]);
        }
    }

    let mut invert_then_frame = EffectChain::new();
    invert_then_frame.toggle(EffectKind::Invert);
    invert_then_frame.toggle(EffectKind::Frame);

    let mut frame_then_invert = EffectChain::new();
    frame_then_invert.toggle(EffectKind::Frame);
    frame_then_invert.toggle(EffectKind::Invert);

    let mut a = gradient.clone();
    run_chain(&invert_then_frame, &settings, &mut a, 1);
    let mut b = gradient.clone();
    run_chain(&frame_then_invert, &settings, &mut b, 1);

    // Frame-then-invert inverts the white border to black; the other order
    // leaves it white.
    assert_eq!(a.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(b.pixel(0, 0), [0, 0, 0, 255]);
}

#[test]
fn painter_output_replaces_working_buffer() {
    let mut chain = EffectChain::new();
    chain.toggle(EffectKind::Frame);
    let settings = EffectSettings::default();

    let mut buf = uniform(64, 64, Rgba8::BLACK);
    run_chain(&chain, &settings, &mut buf, 1);
    assert_eq!(buf.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(buf.pixel(32, 32), [0, 0, 0, 255]);
}

#[test]
fn chain_output_channels_stay_in_range() {
    let mut chain = EffectChain::new();
    chain.toggle(EffectKind::FilmGrain);
    chain.toggle(EffectKind::Dithering);
    chain.toggle(EffectKind::LightLeak);
    chain.toggle(EffectKind::Crt);
    let settings = EffectSettings::default();

    let mut buf = uniform(48, 48, Rgba8::opaque(250, 5, 128));
    run_chain(&chain, &settings, &mut buf, 7);
    // All storage is u8, so the clamp invariant holds by construction; check
    // the buffer kept its dimensions through the painter swap.
    assert_eq!((buf.width(), buf.height()), (48, 48));
}
