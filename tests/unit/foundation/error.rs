use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RetroError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RetroError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(RetroError::serde("x").to_string().contains("serialization error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RetroError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
