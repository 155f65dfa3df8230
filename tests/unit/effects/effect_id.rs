use super::*;

#[test]
fn zero_decodes_to_no_effects() {
    assert_eq!(EffectId::NONE.decode().unwrap(), EffectSet::default());
}

#[test]
fn sub_fields_are_independent_bytes() {
    let set = EffectId(0x0102_0103).decode().unwrap();
    assert_eq!(set.pre, PreEffect::Blur);
    assert_eq!(set.draw, DrawEffect::Dream);
    assert_eq!(set.post, PostEffect::Appear);
    assert_eq!(set.distortion, DistortionKind::Ripple);

    let flash_only = EffectId(0x0001_0000).decode().unwrap();
    assert_eq!(
        flash_only,
        EffectSet {
            post: PostEffect::Flash,
            ..EffectSet::default()
        }
    );
}

#[test]
fn encode_matches_byte_layout() {
    let set = EffectSet {
        pre: PreEffect::FadeOut,
        draw: DrawEffect::Dream,
        post: PostEffect::AppearReverse,
        distortion: DistortionKind::Dream,
    };
    assert_eq!(set.encode(), EffectId(0x0003_0102));
    assert_eq!(set.encode().decode().unwrap(), set);
}

#[test]
fn unknown_codes_fail_strict_decode() {
    let err = EffectId(0x0000_0009).decode().unwrap_err();
    assert!(err.to_string().contains("unknown pre-effect code 9"));
    assert!(EffectId(0x0009_0000).decode().is_err());
}

#[test]
fn lossy_decode_keeps_known_fields() {
    let (set, unknown) = EffectId(0x0001_0907).decode_lossy();
    assert!(unknown);
    assert_eq!(set.pre, PreEffect::None);
    assert_eq!(set.draw, DrawEffect::None);
    assert_eq!(set.post, PostEffect::Flash);

    let (_, had_unknown) = EffectId(0x0001_0001).decode_lossy();
    assert!(!had_unknown);
}

#[test]
fn post_effect_families() {
    assert!(PostEffect::Flash.is_flash());
    assert_eq!(PostEffect::Flash.wipe_kind(), None);
    assert_eq!(PostEffect::Appear.wipe_kind(), Some(WipeKind::Appear));
    assert_eq!(
        PostEffect::AppearReverse.wipe_kind(),
        Some(WipeKind::AppearReverse)
    );
}
