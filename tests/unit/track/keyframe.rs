use super::*;

#[test]
fn new_key_uses_authoring_defaults() {
    let k = Keyframe::new(FrameIndex(12));
    assert_eq!(k.frame, FrameIndex(12));
    assert_eq!(k.interp, InterpMode::Bezier);
    assert!(k.force.cross_dissolve());
    assert_eq!(k.color.to_argb(), 0x00FF_FFFF);
    assert_eq!(k.speed, 1.0);
    assert_eq!(k.track_speed, 1.0);
    assert!(k.bitmap.is_none());
    assert!(k.light.is_none());
    assert!(k.validate().is_ok());
}

#[test]
fn sparse_json_fills_defaults() {
    let k: Keyframe = serde_json::from_value(serde_json::json!({
        "frame": 5,
        "force": 0,
        "sounds": { "french": 3 }
    }))
    .unwrap();
    assert_eq!(k.frame, FrameIndex(5));
    assert!(!k.force.cross_dissolve());
    assert_eq!(k.sounds.get(Language::French), Some(SoundId(3)));
    assert_eq!(k.sounds.get(Language::English), None);
    assert_eq!(k.color_dest, Rgba8::from_argb(0x00FF_FFFF));
    assert_eq!(k.interp, InterpMode::Bezier);
}

#[test]
fn invalid_numbers_are_rejected() {
    let mut k = Keyframe::new(FrameIndex(0));
    k.track_speed = 0.0;
    assert!(k.validate().is_err());

    let mut k = Keyframe::new(FrameIndex(0));
    k.pos = Vec3::new(f64::INFINITY, 0.0, 0.0);
    assert!(k.validate().is_err());

    let mut k = Keyframe::new(FrameIndex(0));
    k.speed = -1.0;
    assert!(k.validate().is_err());
}

#[test]
fn sound_table_single() {
    let t = SoundTable::single(Language::German, SoundId(9));
    assert_eq!(t.get(Language::German), Some(SoundId(9)));
    assert_eq!(t.get(Language::Russian), None);
}
