use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LineError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        LineError::service("x")
            .to_string()
            .contains("cad service error:")
    );
    assert!(
        LineError::viewport("x")
            .to_string()
            .contains("viewport error:")
    );
    assert!(LineError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_config());
}

#[test]
fn only_config_is_config() {
    assert!(LineError::config("bad scale").is_config());
    assert!(!LineError::encode("ffmpeg").is_config());
}
