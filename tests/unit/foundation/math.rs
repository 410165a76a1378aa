use super::*;

#[test]
fn rng_is_deterministic_for_seed() {
    let mut a = Rng64::new(7);
    let mut b = Rng64::new(7);
    for _ in 0..64 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn rng_f64_stays_in_unit_interval() {
    let mut rng = Rng64::new(42);
    for _ in 0..1024 {
        let v = rng.next_f64_01();
        assert!((0.0..1.0).contains(&v));
    }
}

#[test]
fn rng_centered_stays_in_half_interval() {
    let mut rng = Rng64::new(9);
    for _ in 0..1024 {
        let v = rng.next_centered();
        assert!((-0.5..0.5).contains(&v));
    }
}

#[test]
fn mul_div255_identities() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
}

#[test]
fn clamp255_rounds_and_clamps() {
    assert_eq!(clamp255(-3.0), 0);
    assert_eq!(clamp255(12.4), 12);
    assert_eq!(clamp255(12.6), 13);
    assert_eq!(clamp255(300.0), 255);
}
