// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Threshold-pace and VO2max estimation
//!
//! ETP (estimated threshold pace, seconds per 400 m lap) is the engine's core
//! scalar. A single test effort overstates true threshold pace, so it is
//! corrected through the distance-factor curve; with two or more efforts the
//! two most recent results fit a critical-speed model instead of averaging.
//! The same factor curve anchors race predictions, so an ETP derived from one
//! result predicts that result's time back exactly.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::limiter;
use crate::models::{CurrentMetrics, Profile, TestResult};
use crate::pace::LAP_METERS;

/// Linear critical-speed fit from two timed efforts:
/// `distance = cs * time + d_prime`.
#[derive(Debug, Clone, Copy)]
struct CriticalSpeed {
    /// Sustainable speed in meters per second
    cs: f64,
    /// Distance capacity above critical speed, meters
    d_prime: f64,
}

impl CriticalSpeed {
    fn fit(a: &TestResult, b: &TestResult) -> Option<Self> {
        let (short, long) = if a.time_s <= b.time_s { (a, b) } else { (b, a) };
        let dt = long.time_s - short.time_s;
        let dd = long.distance_m - short.distance_m;
        if dt <= 0.0 || dd <= 0.0 {
            return None;
        }
        let cs = dd / dt;
        Some(Self {
            cs,
            d_prime: short.distance_m - cs * short.time_s,
        })
    }

    fn time_at(&self, distance_m: f64) -> f64 {
        (distance_m - self.d_prime) / self.cs
    }
}

/// Estimate threshold pace from the recorded test efforts.
///
/// Fails with [`EngineError::InsufficientData`] on an empty slice. One
/// result uses the distance-corrected average pace; two or more fit the
/// critical-speed model from the two most recent results, falling back to
/// the single-result path when the pair is degenerate (same distance or a
/// non-physical fit). Deterministic for identical inputs.
pub fn estimate_etp(results: &[TestResult], config: &EngineConfig) -> Result<f64> {
    let latest = results.last().ok_or(EngineError::InsufficientData {
        required: 1,
        actual: 0,
    })?;

    if results.len() >= 2 {
        let previous = &results[results.len() - 2];
        if let Some(etp) = etp_from_pair(previous, latest, config) {
            debug!(etp, "ETP from two-point critical-speed fit");
            return Ok(etp);
        }
    }

    let etp = etp_from_single(latest, config);
    debug!(etp, distance_m = latest.distance_m, "ETP from single result");
    Ok(etp)
}

fn etp_from_single(result: &TestResult, config: &EngineConfig) -> f64 {
    // The factor removes what the test distance overstates: short tests run
    // faster than threshold, long tests slower.
    result.pace_per_lap() / config.distance_factor(result.distance_m)
}

fn etp_from_pair(a: &TestResult, b: &TestResult, config: &EngineConfig) -> Option<f64> {
    let model = CriticalSpeed::fit(a, b)?;
    let reference = config.metrics.reference_distance_m;
    let reference_time = model.time_at(reference);
    if reference_time <= 0.0 || !reference_time.is_finite() {
        return None;
    }
    let reference_pace = reference_time / (reference / LAP_METERS);
    Some(reference_pace / config.distance_factor(reference))
}

/// Estimate VO2max from ETP using a Daniels-style closed form.
///
/// The age-category ETP correction is applied first, then the projected
/// 1500 m velocity feeds the oxygen-cost polynomial. Clamped to the
/// configured physiological bounds. Faster threshold pace (lower seconds)
/// always yields an equal-or-higher estimate.
pub fn estimate_vo2max(etp: f64, profile: &Profile, config: &EngineConfig) -> f64 {
    let age_adjustment = config
        .metrics
        .age_etp_adjustment
        .get(&profile.age_category)
        .copied()
        .unwrap_or(0.0);
    let effective_etp = etp + age_adjustment;

    let predicted_1500 = effective_etp * config.distance_factor(1500.0) * (1500.0 / LAP_METERS);
    let velocity_m_min = 1500.0 / predicted_1500 * 60.0;
    let vo2max = -4.6 + 0.182 * velocity_m_min + 0.000104 * velocity_m_min * velocity_m_min;

    vo2max.clamp(config.metrics.vo2max_min, config.metrics.vo2max_max)
}

impl Profile {
    /// Append a test result and recompute ETP and limiter together.
    ///
    /// The pair is written atomically into `current`; when classification
    /// still lacks two distinct-distance results the limiter stays at the
    /// neutral default rather than guessing.
    pub fn record_test_result(&mut self, result: TestResult, config: &EngineConfig) -> Result<()> {
        self.test_results.push(result);

        let etp = estimate_etp(&self.test_results, config)?;
        let limiter = limiter::classify(&self.test_results, config)
            .unwrap_or_else(|_| self.effective_metrics().limiter);

        self.current = Some(CurrentMetrics { etp, limiter });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeCategory, Level};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_estimate_etp_requires_data() {
        assert!(matches!(
            estimate_etp(&[], &config()),
            Err(EngineError::InsufficientData {
                required: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_single_result_corrects_for_distance() {
        // 5000 m in 20:00 is 96 s/lap raw; the 5000 m factor pulls the
        // threshold estimate slightly faster than race pace.
        let etp = estimate_etp(&[TestResult::new(5000.0, 1200.0)], &config()).unwrap();
        assert!((etp - 96.0 / 1.02).abs() < 1e-9);

        // A short test overstates pace the other way: 1500 m in 4:00 is
        // 64 s/lap raw but threshold is slower than that.
        let etp = estimate_etp(&[TestResult::new(1500.0, 240.0)], &config()).unwrap();
        assert!(etp > 64.0);
    }

    #[test]
    fn test_two_point_fit_uses_critical_speed() {
        // 1500 in 4:00 and 5000 in 20:00: cs = 3500/960 m/s, giving a model
        // time of exactly 1200 s at the 5000 m reference.
        let results = vec![
            TestResult::new(1500.0, 240.0),
            TestResult::new(5000.0, 1200.0),
        ];
        let etp = estimate_etp(&results, &config()).unwrap();
        assert!((etp - 96.0 / 1.02).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_pair_falls_back_to_latest_single() {
        let results = vec![
            TestResult::new(3000.0, 600.0),
            TestResult::new(3000.0, 590.0),
        ];
        let etp = estimate_etp(&results, &config()).unwrap();
        let single = estimate_etp(&[TestResult::new(3000.0, 590.0)], &config()).unwrap();
        assert!((etp - single).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let results = vec![
            TestResult::new(1500.0, 250.0),
            TestResult::new(3000.0, 560.0),
        ];
        let first = estimate_etp(&results, &config()).unwrap();
        let second = estimate_etp(&results, &config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_vo2max_rises_as_pace_gets_faster() {
        let profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
        let cfg = config();
        let slow = estimate_vo2max(110.0, &profile, &cfg);
        let fast = estimate_vo2max(80.0, &profile, &cfg);
        assert!(fast > slow);
    }

    #[test]
    fn test_vo2max_clamped_to_bounds() {
        let profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
        let cfg = config();
        assert!(estimate_vo2max(400.0, &profile, &cfg) >= cfg.metrics.vo2max_min);
        assert!(estimate_vo2max(20.0, &profile, &cfg) <= cfg.metrics.vo2max_max);
    }

    #[test]
    fn test_vo2max_masters_adjustment() {
        let cfg = config();
        let senior = Profile::new(Level::Advanced, AgeCategory::Senior);
        let masters = Profile::new(Level::Advanced, AgeCategory::Masters60);
        // Same measured pace reads as a slightly lower aerobic ceiling for a
        // masters athlete running it.
        assert!(estimate_vo2max(90.0, &masters, &cfg) < estimate_vo2max(90.0, &senior, &cfg));
    }

    #[test]
    fn test_record_test_result_updates_pair_together() {
        let cfg = config();
        let mut profile = Profile::new(Level::Intermediate, AgeCategory::Senior);

        profile
            .record_test_result(TestResult::new(5000.0, 1200.0), &cfg)
            .unwrap();
        let first = profile.current.unwrap();
        assert!(first.etp > 0.0);
        // One distance only: limiter stays neutral.
        assert_eq!(first.limiter, crate::models::Limiter::Balanced);

        profile
            .record_test_result(TestResult::new(1500.0, 240.0), &cfg)
            .unwrap();
        let second = profile.current.unwrap();
        assert_ne!(first.etp, second.etp);
    }
}
