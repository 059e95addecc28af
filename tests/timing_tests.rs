use rstest::rstest;
use syllaforge::config::{DelayDistribution, TyperConfig};
use syllaforge::keyboard::KeyboardModel;
use syllaforge::timing::{delay_params, inter_key_delay, sample_gaussian, sample_phase};

#[rstest]
#[case('a')]
#[case('z')]
#[case('7')]
fn test_first_key_uses_base_delay(#[case] to: char) {
    let kb = KeyboardModel::qwerty();
    let mut rng = fastrand::Rng::with_seed(1);
    let cfg = TyperConfig::default();
    assert_eq!(inter_key_delay(&mut rng, &kb, None, to, &cfg), cfg.base_delay);
}

#[test]
fn test_off_layout_pair_uses_base_delay() {
    let kb = KeyboardModel::qwerty();
    let mut rng = fastrand::Rng::with_seed(1);
    let cfg = TyperConfig {
        base_delay: 77.0,
        ..TyperConfig::default()
    };
    assert_eq!(inter_key_delay(&mut rng, &kb, Some('a'), '!', &cfg), 77.0);
    assert_eq!(inter_key_delay(&mut rng, &kb, Some('?'), 'a', &cfg), 77.0);
}

#[test]
fn test_far_keys_have_larger_mean() {
    let kb = KeyboardModel::qwerty();
    let cfg = TyperConfig::default();
    let (near, near_sd) = delay_params(&kb, Some('a'), 's', &cfg).unwrap();
    let (far, far_sd) = delay_params(&kb, Some('q'), 'p', &cfg).unwrap();
    assert!((near - 72.5).abs() < 1e-9);
    assert!((far - (60.0 + 9.0 * 12.5)).abs() < 1e-9);
    assert!((near_sd - 72.5 * 0.2).abs() < 1e-9);
    assert!(far_sd > near_sd);
}

#[test]
fn test_delay_floor_with_huge_variation() {
    let kb = KeyboardModel::qwerty();
    let mut rng = fastrand::Rng::with_seed(42);
    let cfg = TyperConfig {
        delay_variation: 5.0,
        ..TyperConfig::default()
    };
    for _ in 0..2_000 {
        let d = inter_key_delay(&mut rng, &kb, Some('q'), 'm', &cfg);
        assert!(d >= cfg.min_delay, "{} below floor", d);
    }
}

#[test]
fn test_zero_deviation_is_exact() {
    let mut rng = fastrand::Rng::with_seed(3);
    for _ in 0..100 {
        assert_eq!(sample_gaussian(&mut rng, 12.0, 0.0), 12.0);
    }
}

#[test]
fn test_sample_mean_converges() {
    let mut rng = fastrand::Rng::with_seed(7);
    let n = 20_000;
    let sum: f64 = (0..n).map(|_| sample_gaussian(&mut rng, 100.0, 10.0)).sum();
    let mean = sum / n as f64;
    assert!((mean - 100.0).abs() < 0.5, "mean {}", mean);
}

#[test]
fn test_phase_delay_never_negative() {
    let mut rng = fastrand::Rng::with_seed(11);
    let dist = DelayDistribution::new(0.0, 100.0);
    for _ in 0..1_000 {
        assert!(sample_phase(&mut rng, &dist) >= 0.0);
    }
}
