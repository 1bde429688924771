use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(PrismError::config("x").to_string().contains("config error:"));
    assert!(PrismError::state("x").to_string().contains("state error:"));
    assert!(PrismError::asset("x").to_string().contains("asset error:"));
    assert!(PrismError::render("x").to_string().contains("render error:"));
    assert!(
        PrismError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PrismError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn errors_cross_threads() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<PrismError>();
}
