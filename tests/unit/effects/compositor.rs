use super::*;

fn req(post: PostEffect, speed: f64) -> PostRequest {
    PostRequest {
        post,
        speed,
        color_flash: Rgba8::new(255, 240, 200, 255),
    }
}

#[test]
fn flash_arms_on_key_change_and_decays() {
    let mut fx = EffectCompositor::default();
    let out = fx.step_post(true, req(PostEffect::Flash, 0.25), 0.0);
    let flash = out.flash.unwrap();
    assert_eq!(flash.alpha, 1.0);
    assert_eq!(flash.color, Rgba8::new(255, 240, 200, 255));
    assert_eq!(fx.flash().phase, FxPhase::InProgress);
    assert!(out.wipe.is_none());

    let out = fx.step_post(false, req(PostEffect::Flash, 0.25), 1.0);
    assert_eq!(out.flash.unwrap().alpha, 1.0);
    assert_eq!(fx.flash().alpha, 0.75);
}

#[test]
fn flash_without_key_change_does_not_arm() {
    let mut fx = EffectCompositor::default();
    let out = fx.step_post(false, req(PostEffect::Flash, 0.25), 1.0);
    assert!(out.flash.is_none());
    assert_eq!(fx.flash().phase, FxPhase::Idle);
}

#[test]
fn flash_continues_across_a_key_requesting_another_effect() {
    let mut fx = EffectCompositor::default();
    fx.step_post(true, req(PostEffect::Flash, 0.05), 0.0);
    for _ in 0..10 {
        fx.step_post(false, req(PostEffect::Flash, 0.05), 1.0);
    }
    let before = fx.flash().alpha;
    assert!((before - 0.5).abs() < 1e-9);

    // Next key asks for a wipe at a very different speed.
    let out = fx.step_post(true, req(PostEffect::Appear, 20.0), 1.0);
    let flash = out.flash.unwrap();
    assert!((flash.alpha - before).abs() < 1e-12);
    assert_eq!(fx.flash().phase, FxPhase::InProgress);
    assert_eq!(fx.flash().speed, 0.05);
    assert!((fx.flash().alpha - (before - 0.05)).abs() < 1e-9);

    // The wipe armed independently.
    let wipe = out.wipe.unwrap();
    assert_eq!(wipe.kind, WipeKind::Appear);
    assert_eq!(wipe.progress, 0.0);
    assert_eq!(fx.wipe().phase, FxPhase::InProgress);
}

#[test]
fn finished_flash_returns_to_idle_with_zero_accumulator() {
    let mut fx = EffectCompositor::default();
    fx.step_post(true, req(PostEffect::Flash, 0.5), 0.0);
    fx.step_post(false, req(PostEffect::Flash, 0.5), 1.0);
    let out = fx.step_post(false, req(PostEffect::Flash, 0.5), 1.0);
    assert!(out.flash.is_some());
    assert_eq!(fx.flash().phase, FxPhase::Idle);
    assert_eq!(fx.flash().alpha, 0.0);

    // Same key still requests the flash, but nothing re-arms without a key change.
    let out = fx.step_post(false, req(PostEffect::Flash, 0.5), 1.0);
    assert!(out.flash.is_none());
}

#[test]
fn rearming_restarts_the_flash() {
    let mut fx = EffectCompositor::default();
    fx.step_post(true, req(PostEffect::Flash, 0.1), 0.0);
    fx.step_post(false, req(PostEffect::Flash, 0.1), 5.0);
    assert!(fx.flash().alpha < 1.0);
    let out = fx.step_post(true, req(PostEffect::Flash, 0.3), 0.0);
    assert_eq!(out.flash.unwrap().alpha, 1.0);
    assert_eq!(fx.flash().speed, 0.3);
}

#[test]
fn idle_family_refreshes_capture_on_key_change() {
    let mut fx = EffectCompositor::default();
    fx.step_post(true, req(PostEffect::None, 7.0), 1.0);
    assert_eq!(fx.flash().speed, 7.0);
    assert_eq!(fx.wipe().speed, 7.0);
    assert_eq!(fx.flash().alpha, 0.0);
    assert_eq!(fx.wipe().dx, 0.0);
}

#[test]
fn wipe_runs_to_completion() {
    let mut fx = EffectCompositor::default();
    let out = fx.step_post(true, req(PostEffect::AppearReverse, 25.0), 0.0);
    assert_eq!(out.wipe.unwrap().kind, WipeKind::AppearReverse);
    let mut frames = 0;
    while fx.wipe().phase == FxPhase::InProgress {
        fx.step_post(false, req(PostEffect::None, 25.0), 1.0);
        frames += 1;
        assert!(frames < 10);
    }
    assert_eq!(frames, 4);
    assert_eq!(fx.wipe().dx, 0.0);
}

#[test]
fn reset_drops_in_flight_effects() {
    let mut fx = EffectCompositor::new(2);
    fx.step_post(true, req(PostEffect::Flash, 0.01), 0.0);
    fx.reset();
    assert_eq!(fx.flash().phase, FxPhase::Idle);
    assert_eq!(fx.flash().alpha, 0.0);
    assert!(fx.blur_mut().is_empty());
    assert!(fx.dream_mut().is_empty());
}

#[test]
fn layer_alphas_are_complementary() {
    for i in 0..=1000 {
        let a = f64::from(i) / 1000.0;
        let alphas = layer_alphas(ForceFlags(1), a);
        let secondary = alphas.secondary.unwrap();
        assert_eq!(u16::from(alphas.primary) + u16::from(secondary), 255);
    }
    assert_eq!(layer_alphas(ForceFlags(1), 1.0).primary, 255);
    assert_eq!(layer_alphas(ForceFlags(1), 0.5).primary, 127);
    assert_eq!(layer_alphas(ForceFlags(1), f64::NAN).primary, 0);
    assert_eq!(
        layer_alphas(ForceFlags(0), 0.3),
        LayerAlphas {
            primary: 255,
            secondary: None
        }
    );
}

#[test]
fn fades_ramp_between_dest_and_base() {
    let base = Rgba8::new(200, 100, 0, 255);
    let dest = Rgba8::new(0, 0, 0, 255);
    assert_eq!(
        layer_tint(PreEffect::FadeIn, 0.0, base, dest),
        Rgba8::new(0, 0, 0, 0)
    );
    assert_eq!(
        layer_tint(PreEffect::FadeIn, 1.0, base, dest),
        Rgba8::new(200, 100, 0, 0)
    );
    assert_eq!(
        layer_tint(PreEffect::FadeOut, 0.25, base, dest),
        Rgba8::new(150, 75, 0, 0)
    );
    assert_eq!(
        layer_tint(PreEffect::None, 0.5, base, dest),
        Rgba8::new(255, 255, 255, 0)
    );
}
