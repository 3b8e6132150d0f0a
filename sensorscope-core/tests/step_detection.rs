//! Integration tests for step detection
//!
//! Covers:
//! - Synthetic single steps land on the transition (property based)
//! - Flat series never fail and report index 0
//! - Short series are rejected
//! - The O(N) response equals the literal valid convolution

mod common;

use proptest::prelude::*;
use sensorscope_core::{
    signal, AnalysisError, SampleSeries, StepDetector, StepPolarity,
};

use common::{noisy_step_series, step_series, TestRng, WINDOW_MS};

proptest! {
    #[test]
    fn rising_step_found_within_one_sample(
        len in 4usize..400,
        split in 0.1f64..0.9,
        before in -1_000.0f64..1_000.0,
        rise in 0.5f64..5_000.0,
    ) {
        let step_at = ((len as f64 * split) as usize).clamp(1, len - 1);
        let series = step_series(len, step_at, before, before + rise);

        let detection = StepDetector::default().detect(&series).unwrap();
        prop_assert!(detection.index.abs_diff(step_at) <= 1,
            "len={} step_at={} got={}", len, step_at, detection.index);
    }

    #[test]
    fn any_step_found_with_either_polarity(
        len in 4usize..300,
        split in 0.1f64..0.9,
        a in -100.0f64..100.0,
        b in -100.0f64..100.0,
    ) {
        prop_assume!((a - b).abs() > 1e-3);
        let step_at = ((len as f64 * split) as usize).clamp(1, len - 1);
        let series = step_series(len, step_at, a, b);

        let detector = StepDetector::new().with_polarity(StepPolarity::Either);
        let detection = detector.detect(&series).unwrap();
        prop_assert!(detection.index.abs_diff(step_at) <= 1);
    }

    #[test]
    fn flat_series_returns_index_zero(len in 2usize..500, level in -1e6f64..1e6) {
        let series = step_series(len, 0, level, level);
        let detection = StepDetector::default().detect(&series).unwrap();
        prop_assert_eq!(detection.index, 0);
        prop_assert_eq!(detection.response.len(), len + 1);
    }
}

#[test]
fn noisy_load_step_is_located() {
    let mut rng = TestRng::new(42);
    for &(len, step_at) in &[(144usize, 60usize), (500, 321), (60, 12)] {
        let series = noisy_step_series(&mut rng, len, step_at, 35.0, 1_200.0, 20.0);
        let detection = StepDetector::default().detect(&series).unwrap();
        assert!(detection.index.abs_diff(step_at) <= 1);
        assert_eq!(detection.timestamp, detection.index as u64 * WINDOW_MS);
    }
}

#[test]
fn short_series_are_invalid_input() {
    let detector = StepDetector::default();

    let empty = SampleSeries::default();
    assert!(matches!(
        detector.detect(&empty),
        Err(AnalysisError::InvalidInput { available: 0, .. })
    ));

    let single = SampleSeries::from_values(0, WINDOW_MS, &[230.0]).unwrap();
    assert!(matches!(
        detector.detect(&single),
        Err(AnalysisError::InvalidInput { available: 1, .. })
    ));
}

#[test]
fn response_equals_valid_convolution_with_step_kernel() {
    let mut rng = TestRng::new(7);
    let series = noisy_step_series(&mut rng, 97, 40, 3.0, 9.0, 1.5);
    let detection = StepDetector::default().detect(&series).unwrap();

    let values: Vec<f64> = series.values().collect();
    let centered = signal::center(&values);
    let direct = signal::convolve_valid(&centered, &signal::step_kernel(centered.len()));

    assert_eq!(direct.len(), detection.response.len());
    for (fast, slow) in detection.response.iter().zip(&direct) {
        assert!((fast - slow).abs() < 1e-6, "{} vs {}", fast, slow);
    }
    assert_eq!(signal::argmax(&direct), Some(detection.index));
}
