use super::*;

#[test]
fn flash_decays_to_completion() {
    let mut alpha = FLASH_START_ALPHA;
    assert!(flash_step(&mut alpha, 0.25, 1.0));
    assert_eq!(alpha, 0.75);
    assert!(flash_step(&mut alpha, 0.25, 2.0));
    assert_eq!(alpha, 0.25);
    assert!(!flash_step(&mut alpha, 0.25, 1.0));
    assert!(alpha <= 0.0);
}

#[test]
fn wipe_progresses_in_hundredths() {
    let mut dx = 0.0;
    assert!(wipe_step(&mut dx, 10.0, 5.0));
    assert!((dx - 0.5).abs() < 1e-12);
    assert!(!wipe_step(&mut dx, 10.0, 5.0));
}

#[test]
fn paused_or_bogus_steps_do_not_move() {
    let mut alpha = 0.5;
    assert!(flash_step(&mut alpha, 1.0, 0.0));
    assert!(flash_step(&mut alpha, f64::NAN, 1.0));
    assert!(flash_step(&mut alpha, -3.0, 1.0));
    assert_eq!(alpha, 0.5);
}
