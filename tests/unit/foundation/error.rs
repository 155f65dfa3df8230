use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CinematicError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CinematicError::track("x").to_string().contains("track error:"));
    assert!(
        CinematicError::effect("x")
            .to_string()
            .contains("effect error:")
    );
    assert!(CinematicError::asset("x").to_string().contains("asset error:"));
    assert!(
        CinematicError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn structured_variants_render_their_fields() {
    let full = CinematicError::TrackFull { capacity: 4 };
    assert_eq!(full.to_string(), "track is full (4 keyframes)");

    let cap = CinematicError::VertexCapacity {
        needed: 10,
        capacity: 8,
    };
    assert!(cap.to_string().contains("need 10, capacity 8"));
}

#[test]
fn render_error_converts_transparently() {
    let err: CinematicError = RenderError::draw("device lost").into();
    assert!(matches!(err, CinematicError::Render(_)));
    assert!(err.to_string().contains("device lost"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CinematicError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
