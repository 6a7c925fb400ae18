use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KeyloomError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KeyloomError::spline("x").to_string().contains("spline error:"));
    assert!(
        KeyloomError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        KeyloomError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KeyloomError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err = serde_json::from_str::<u32>("not json").unwrap_err();
    let err = KeyloomError::from(err);
    assert!(matches!(err, KeyloomError::Serde(_)));
}
