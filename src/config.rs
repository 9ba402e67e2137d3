// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Engine configuration: the product-tuned coefficient, phase and workout
//! tables every component consumes.
//!
//! The numeric thresholds here are product constants verified against the
//! reference tables, not derivable from structure; they load from an optional
//! TOML file and fall back to embedded defaults. The tables are immutable
//! after load and passed explicitly into the engines so every computation
//! stays deterministic and testable in isolation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::EngineError;
use crate::models::{AgeCategory, HrRange, Level, Limiter, PhaseKind, WorkoutKind, ZoneKey};

/// Default config file name probed in the working directory
const DEFAULT_CONFIG_FILE: &str = "stride_engine.toml";

/// Main engine configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub zones: ZonesConfig,
    #[serde(default)]
    pub race: RaceConfig,
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default)]
    pub workouts: WorkoutsConfig,
}

/// ETP / VO2max estimation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Pace factors relative to threshold pace at standard test distances.
    /// Shared between estimation and prediction so the anchor identity holds.
    pub distance_factors: Vec<DistanceFactor>,
    /// Reference distance the ETP scalar is anchored at, meters
    pub reference_distance_m: f64,
    /// Additive ETP correction (seconds per lap) by age bracket
    pub age_etp_adjustment: HashMap<AgeCategory, f64>,
    /// VO2max clamp bounds
    pub vo2max_min: f64,
    pub vo2max_max: f64,
}

/// One point of the pace-versus-distance correction curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceFactor {
    pub distance_m: f64,
    pub factor: f64,
}

/// Limiter classification thresholds.
///
/// The normalized long/short pace ratio is compared against this band;
/// inside the band the athlete is balanced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Ratio above which endurance decay marks the athlete cardio-limited
    pub cardio_ratio: f64,
    /// Ratio below which fatigue resistance marks the athlete muscular-limited
    pub muscular_ratio: f64,
}

/// Zone coefficient tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZonesConfig {
    /// Pace multiplier per zone, applied to ETP
    pub coefficients: HashMap<ZoneKey, f64>,
    /// Additive coefficient shift per limiter and zone
    pub limiter_adjustments: HashMap<Limiter, HashMap<ZoneKey, f64>>,
    /// Heart-rate-equivalent band per zone, percent of max HR
    pub hr_bands: HashMap<ZoneKey, HrRange>,
    /// Half-width of the outermost zone bounds as a fraction of target pace
    pub end_margin: f64,
}

/// Race prediction windows and race-specific zone shifts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Prediction windows at the standard race distances
    pub windows: Vec<RaceWindow>,
    /// Threshold-zone coefficient shift for race-specific target distances
    pub threshold_adjustments: Vec<RaceZoneAdjustment>,
}

/// Min/max pace factors plus limiter time offsets for one race distance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RaceWindow {
    pub distance_m: f64,
    pub min_factor: f64,
    pub max_factor: f64,
    /// Whole-race time offset in seconds for a cardio-limited athlete
    pub cardio_offset_s: f64,
    /// Whole-race time offset in seconds for a muscular-limited athlete
    pub muscular_offset_s: f64,
}

/// Race-distance-specific threshold shift (longer races run slower)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RaceZoneAdjustment {
    pub distance_m: f64,
    /// Fractional shift applied to the threshold-zone pace
    pub threshold_shift: f64,
}

/// Periodization parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Minimum viable plan length in weeks
    pub min_weeks: u32,
    /// Fixed taper length; never grows with total plan length
    pub taper_weeks: u32,
    /// Proportional week weights for the non-taper phases
    pub phase_weights: HashMap<PhaseKind, f64>,
    /// Ramp-test cadence in weeks (tests never land in the taper)
    pub test_interval_weeks: u32,
    /// Recovery-week cadence by age bracket, weeks
    pub recovery_cycle: HashMap<AgeCategory, u32>,
    /// Key-session focus categories per phase, primary first
    pub phase_focus: HashMap<PhaseKind, Vec<FocusCategory>>,
    /// Easy-run distance per phase, meters
    pub easy_distance: HashMap<PhaseKind, f64>,
    /// Long-run distance per phase, meters
    pub long_run_distance: HashMap<PhaseKind, f64>,
}

/// Physiological focus a key session targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusCategory {
    Aerobic,
    Threshold,
    Vo2max,
    Speed,
}

/// Workout template library and selection/parametrization rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutsConfig {
    pub templates: Vec<WorkoutTemplate>,
    /// Repeat/recovery variants applied per limiter
    pub limiter_variants: HashMap<Limiter, LimiterVariant>,
    /// Volume and repeat ceilings per experience tier
    pub level_caps: HashMap<Level, LevelCaps>,
}

/// One selectable session blueprint.
///
/// `max_etp` gates selection within a category: faster athletes (lower ETP)
/// take the longer-interval variants, so the first template whose gate the
/// athlete passes wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: String,
    pub category: FocusCategory,
    pub kind: WorkoutKind,
    pub zone: ZoneKey,
    pub secondary_zone: Option<ZoneKey>,
    pub repeats: u32,
    pub interval_distance_m: f64,
    pub recovery_s: u32,
    pub warmup_m: f64,
    pub cooldown_m: f64,
    pub max_etp: Option<f64>,
}

/// Per-limiter session modulation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimiterVariant {
    /// Added to the template repeat count (floored at one)
    pub repeat_adjust: i32,
    /// Multiplier on between-repeat recovery duration
    pub recovery_multiplier: f64,
    /// Multiplier on easy/long-run distance
    pub volume_multiplier: f64,
}

/// Experience-tier ceilings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LevelCaps {
    pub max_repeats: u32,
    pub volume_factor: f64,
}

impl EngineConfig {
    /// Load engine configuration from file or use defaults
    pub fn load(path: Option<String>) -> Result<Self> {
        let config = if let Some(config_path) = path {
            Self::load_from_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config
            .validate()
            .context("engine configuration failed validation")?;
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config file: {path}"))?;

        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse engine config file: {path}"))?;

        Ok(config)
    }

    /// Verify the packaged tables are internally consistent.
    ///
    /// A failure here is a packaged-data defect, not a user error.
    pub fn validate(&self) -> std::result::Result<(), EngineError> {
        if self.metrics.distance_factors.len() < 2 {
            return Err(EngineError::InvalidTable(
                "distance_factors needs at least two points".into(),
            ));
        }
        let mut previous = 0.0;
        for point in &self.metrics.distance_factors {
            if point.distance_m <= previous || point.factor <= 0.0 {
                return Err(EngineError::InvalidTable(
                    "distance_factors must be sorted by distance with positive factors".into(),
                ));
            }
            previous = point.distance_m;
        }

        if self.classifier.muscular_ratio >= self.classifier.cardio_ratio {
            return Err(EngineError::InvalidTable(
                "classifier band is inverted".into(),
            ));
        }

        // Zone coefficients must stay strictly ordered under every limiter
        // adjustment, or the monotonicity invariant cannot hold.
        for limiter in [Limiter::Cardio, Limiter::Muscular, Limiter::Balanced] {
            let mut last: Option<f64> = None;
            for key in ZoneKey::ORDERED {
                let coefficient = self.zone_coefficient(key, limiter)?;
                if let Some(previous) = last {
                    if coefficient >= previous {
                        return Err(EngineError::InvalidTable(format!(
                            "zone coefficients not monotonic for {limiter:?} at {key:?}"
                        )));
                    }
                }
                last = Some(coefficient);
            }
        }

        let weight_sum: f64 = self.plan.phase_weights.values().sum();
        if weight_sum <= 0.0 {
            return Err(EngineError::InvalidTable(
                "phase weights must sum to a positive value".into(),
            ));
        }
        if self.plan.taper_weeks == 0 || self.plan.min_weeks < self.plan.taper_weeks + 2 {
            return Err(EngineError::InvalidTable(
                "taper/min week settings leave no room for training phases".into(),
            ));
        }

        for phase in PhaseKind::ORDERED {
            let focus = self.plan.phase_focus.get(&phase).ok_or_else(|| {
                EngineError::InvalidTable(format!("no focus categories for phase {phase:?}"))
            })?;
            if focus.is_empty() {
                return Err(EngineError::InvalidTable(format!(
                    "empty focus list for phase {phase:?}"
                )));
            }
            for category in focus {
                if !self
                    .workouts
                    .templates
                    .iter()
                    .any(|template| template.category == *category)
                {
                    return Err(EngineError::InvalidTable(format!(
                        "no workout template for category {category:?}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Effective pace coefficient for one zone under one limiter
    pub fn zone_coefficient(
        &self,
        key: ZoneKey,
        limiter: Limiter,
    ) -> std::result::Result<f64, EngineError> {
        let base = self.zones.coefficients.get(&key).ok_or_else(|| {
            EngineError::InvalidTable(format!("missing zone coefficient for {key:?}"))
        })?;
        let adjustment = self
            .zones
            .limiter_adjustments
            .get(&limiter)
            .and_then(|adjustments| adjustments.get(&key))
            .copied()
            .unwrap_or(0.0);
        Ok(base + adjustment)
    }

    /// Pace factor at an arbitrary distance, log-interpolated between the
    /// configured standard distances and clamped at the table ends.
    pub fn distance_factor(&self, distance_m: f64) -> f64 {
        let points = &self.metrics.distance_factors;
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            // Unreachable after validation; neutral factor keeps callers total.
            return 1.0;
        };

        if distance_m <= first.distance_m {
            return first.factor;
        }
        if distance_m >= last.distance_m {
            return last.factor;
        }
        for pair in points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if distance_m <= hi.distance_m {
                let span = (hi.distance_m / lo.distance_m).ln();
                let position = (distance_m / lo.distance_m).ln() / span;
                return lo.factor + (hi.factor - lo.factor) * position;
            }
        }
        last.factor
    }

    /// Recovery-week cadence for an age bracket (defaults to every 3 weeks)
    pub fn recovery_cycle(&self, age: AgeCategory) -> u32 {
        self.plan.recovery_cycle.get(&age).copied().unwrap_or(3)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metrics: MetricsConfig::default(),
            classifier: ClassifierConfig::default(),
            zones: ZonesConfig::default(),
            race: RaceConfig::default(),
            plan: PlanConfig::default(),
            workouts: WorkoutsConfig::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        let age_etp_adjustment = HashMap::from([
            (AgeCategory::JuniorHigh, 0.0),
            (AgeCategory::HighSchool, 0.0),
            (AgeCategory::Collegiate, 0.0),
            (AgeCategory::Senior, 0.0),
            (AgeCategory::Masters40, 2.0),
            (AgeCategory::Masters50, 4.0),
            (AgeCategory::Masters60, 6.0),
        ]);
        Self {
            distance_factors: vec![
                DistanceFactor {
                    distance_m: 800.0,
                    factor: 0.835,
                },
                DistanceFactor {
                    distance_m: 1500.0,
                    factor: 0.90,
                },
                DistanceFactor {
                    distance_m: 3000.0,
                    factor: 0.98,
                },
                DistanceFactor {
                    distance_m: 5000.0,
                    factor: 1.02,
                },
            ],
            reference_distance_m: 5000.0,
            age_etp_adjustment,
            vo2max_min: 30.0,
            vo2max_max: 85.0,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cardio_ratio: 1.06,
            muscular_ratio: 0.95,
        }
    }
}

impl Default for ZonesConfig {
    fn default() -> Self {
        let coefficients = HashMap::from([
            (ZoneKey::Jog, 1.40),
            (ZoneKey::Easy, 1.275),
            (ZoneKey::Marathon, 1.125),
            (ZoneKey::Threshold, 1.025),
            (ZoneKey::Interval, 0.945),
            (ZoneKey::Repetition, 0.875),
        ]);

        let cardio = HashMap::from([
            (ZoneKey::Jog, 0.0),
            (ZoneKey::Easy, 0.05),
            (ZoneKey::Marathon, 0.03),
            (ZoneKey::Threshold, 0.02),
            (ZoneKey::Interval, 0.03),
            (ZoneKey::Repetition, 0.03),
        ]);
        let muscular = HashMap::from([
            (ZoneKey::Jog, 0.05),
            (ZoneKey::Easy, 0.08),
            (ZoneKey::Marathon, 0.06),
            (ZoneKey::Threshold, 0.04),
            (ZoneKey::Interval, 0.03),
            (ZoneKey::Repetition, -0.02),
        ]);
        let balanced: HashMap<ZoneKey, f64> =
            ZoneKey::ORDERED.iter().map(|key| (*key, 0.0)).collect();

        let hr_bands = HashMap::from([
            (
                ZoneKey::Jog,
                HrRange {
                    lower_pct: 50.0,
                    upper_pct: 60.0,
                },
            ),
            (
                ZoneKey::Easy,
                HrRange {
                    lower_pct: 60.0,
                    upper_pct: 70.0,
                },
            ),
            (
                ZoneKey::Marathon,
                HrRange {
                    lower_pct: 70.0,
                    upper_pct: 80.0,
                },
            ),
            (
                ZoneKey::Threshold,
                HrRange {
                    lower_pct: 80.0,
                    upper_pct: 90.0,
                },
            ),
            (
                ZoneKey::Interval,
                HrRange {
                    lower_pct: 90.0,
                    upper_pct: 97.0,
                },
            ),
        ]);

        Self {
            coefficients,
            limiter_adjustments: HashMap::from([
                (Limiter::Cardio, cardio),
                (Limiter::Muscular, muscular),
                (Limiter::Balanced, balanced),
            ]),
            hr_bands,
            end_margin: 0.03,
        }
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            windows: vec![
                RaceWindow {
                    distance_m: 800.0,
                    min_factor: 0.82,
                    max_factor: 0.85,
                    cardio_offset_s: -3.0,
                    muscular_offset_s: 3.0,
                },
                RaceWindow {
                    distance_m: 1500.0,
                    min_factor: 0.88,
                    max_factor: 0.92,
                    cardio_offset_s: 1.5,
                    muscular_offset_s: -1.5,
                },
                RaceWindow {
                    distance_m: 3000.0,
                    min_factor: 0.96,
                    max_factor: 1.00,
                    cardio_offset_s: 11.5,
                    muscular_offset_s: -11.5,
                },
                RaceWindow {
                    distance_m: 5000.0,
                    min_factor: 1.00,
                    max_factor: 1.04,
                    cardio_offset_s: 27.5,
                    muscular_offset_s: -27.5,
                },
            ],
            threshold_adjustments: vec![
                RaceZoneAdjustment {
                    distance_m: 800.0,
                    threshold_shift: -0.02,
                },
                RaceZoneAdjustment {
                    distance_m: 1500.0,
                    threshold_shift: 0.0,
                },
                RaceZoneAdjustment {
                    distance_m: 3000.0,
                    threshold_shift: 0.02,
                },
                RaceZoneAdjustment {
                    distance_m: 5000.0,
                    threshold_shift: 0.04,
                },
            ],
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            min_weeks: 4,
            taper_weeks: 2,
            phase_weights: HashMap::from([
                (PhaseKind::Base, 0.40),
                (PhaseKind::Build, 0.35),
                (PhaseKind::Peak, 0.25),
            ]),
            test_interval_weeks: 4,
            recovery_cycle: HashMap::from([
                (AgeCategory::JuniorHigh, 2),
                (AgeCategory::HighSchool, 3),
                (AgeCategory::Collegiate, 3),
                (AgeCategory::Senior, 3),
                (AgeCategory::Masters40, 3),
                (AgeCategory::Masters50, 2),
                (AgeCategory::Masters60, 2),
            ]),
            phase_focus: HashMap::from([
                (
                    PhaseKind::Base,
                    vec![FocusCategory::Aerobic, FocusCategory::Threshold],
                ),
                (
                    PhaseKind::Build,
                    vec![
                        FocusCategory::Vo2max,
                        FocusCategory::Threshold,
                        FocusCategory::Speed,
                    ],
                ),
                (
                    PhaseKind::Peak,
                    vec![FocusCategory::Vo2max, FocusCategory::Threshold],
                ),
                (
                    PhaseKind::Taper,
                    vec![FocusCategory::Aerobic, FocusCategory::Speed],
                ),
            ]),
            easy_distance: HashMap::from([
                (PhaseKind::Base, 6000.0),
                (PhaseKind::Build, 8000.0),
                (PhaseKind::Peak, 8000.0),
                (PhaseKind::Taper, 5000.0),
            ]),
            long_run_distance: HashMap::from([
                (PhaseKind::Base, 10000.0),
                (PhaseKind::Build, 12000.0),
                (PhaseKind::Peak, 10000.0),
                (PhaseKind::Taper, 8000.0),
            ]),
        }
    }
}

impl Default for WorkoutsConfig {
    fn default() -> Self {
        let templates = vec![
            WorkoutTemplate {
                id: "tempo-4000".into(),
                category: FocusCategory::Threshold,
                kind: WorkoutKind::Tempo,
                zone: ZoneKey::Threshold,
                secondary_zone: None,
                repeats: 1,
                interval_distance_m: 4000.0,
                recovery_s: 0,
                warmup_m: 1200.0,
                cooldown_m: 1200.0,
                max_etp: Some(80.0),
            },
            WorkoutTemplate {
                id: "cruise-1600x3".into(),
                category: FocusCategory::Threshold,
                kind: WorkoutKind::Tempo,
                zone: ZoneKey::Threshold,
                secondary_zone: None,
                repeats: 3,
                interval_distance_m: 1600.0,
                recovery_s: 120,
                warmup_m: 1200.0,
                cooldown_m: 1200.0,
                max_etp: None,
            },
            WorkoutTemplate {
                id: "vo2max-1000x5".into(),
                category: FocusCategory::Vo2max,
                kind: WorkoutKind::Intervals,
                zone: ZoneKey::Interval,
                secondary_zone: None,
                repeats: 5,
                interval_distance_m: 1000.0,
                recovery_s: 180,
                warmup_m: 1600.0,
                cooldown_m: 1200.0,
                max_etp: Some(80.0),
            },
            WorkoutTemplate {
                id: "vo2max-800x6".into(),
                category: FocusCategory::Vo2max,
                kind: WorkoutKind::Intervals,
                zone: ZoneKey::Interval,
                secondary_zone: None,
                repeats: 6,
                interval_distance_m: 800.0,
                recovery_s: 150,
                warmup_m: 1600.0,
                cooldown_m: 1200.0,
                max_etp: None,
            },
            WorkoutTemplate {
                id: "reps-200x10".into(),
                category: FocusCategory::Speed,
                kind: WorkoutKind::Repetitions,
                zone: ZoneKey::Repetition,
                secondary_zone: None,
                repeats: 10,
                interval_distance_m: 200.0,
                recovery_s: 90,
                warmup_m: 1600.0,
                cooldown_m: 1200.0,
                max_etp: None,
            },
            WorkoutTemplate {
                id: "steady-aerobic".into(),
                category: FocusCategory::Aerobic,
                kind: WorkoutKind::LongRun,
                zone: ZoneKey::Easy,
                secondary_zone: Some(ZoneKey::Marathon),
                repeats: 1,
                interval_distance_m: 8000.0,
                recovery_s: 0,
                warmup_m: 800.0,
                cooldown_m: 800.0,
                max_etp: None,
            },
        ];

        Self {
            templates,
            limiter_variants: HashMap::from([
                (
                    Limiter::Cardio,
                    LimiterVariant {
                        repeat_adjust: -1,
                        recovery_multiplier: 1.5,
                        volume_multiplier: 1.15,
                    },
                ),
                (
                    Limiter::Muscular,
                    LimiterVariant {
                        repeat_adjust: 1,
                        recovery_multiplier: 0.75,
                        volume_multiplier: 1.0,
                    },
                ),
                (
                    Limiter::Balanced,
                    LimiterVariant {
                        repeat_adjust: 0,
                        recovery_multiplier: 1.0,
                        volume_multiplier: 1.0,
                    },
                ),
            ]),
            level_caps: HashMap::from([
                (
                    Level::Beginner,
                    LevelCaps {
                        max_repeats: 6,
                        volume_factor: 0.75,
                    },
                ),
                (
                    Level::Intermediate,
                    LevelCaps {
                        max_repeats: 8,
                        volume_factor: 0.9,
                    },
                ),
                (
                    Level::Advanced,
                    LevelCaps {
                        max_repeats: 12,
                        volume_factor: 1.0,
                    },
                ),
                (
                    Level::Elite,
                    LevelCaps {
                        max_repeats: 14,
                        volume_factor: 1.0,
                    },
                ),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_validates() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_distance_factor_at_table_points() {
        let config = EngineConfig::default();
        assert!((config.distance_factor(800.0) - 0.835).abs() < 1e-9);
        assert!((config.distance_factor(5000.0) - 1.02).abs() < 1e-9);
    }

    #[test]
    fn test_distance_factor_interpolates_and_clamps() {
        let config = EngineConfig::default();
        let mid = config.distance_factor(2000.0);
        assert!(mid > 0.90 && mid < 0.98);
        // Outside the table the factor clamps at the end values
        assert!((config.distance_factor(400.0) - 0.835).abs() < 1e-9);
        assert!((config.distance_factor(10000.0) - 1.02).abs() < 1e-9);
    }

    #[test]
    fn test_zone_coefficient_includes_limiter_adjustment() {
        let config = EngineConfig::default();
        let balanced = config
            .zone_coefficient(ZoneKey::Threshold, Limiter::Balanced)
            .unwrap();
        let muscular = config
            .zone_coefficient(ZoneKey::Threshold, Limiter::Muscular)
            .unwrap();
        assert!((balanced - 1.025).abs() < 1e-9);
        assert!((muscular - 1.065).abs() < 1e-9);
    }

    #[test]
    fn test_validation_rejects_inverted_classifier_band() {
        let mut config = EngineConfig::default();
        config.classifier.cardio_ratio = 0.90;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_validation_rejects_non_monotonic_zone_table() {
        let mut config = EngineConfig::default();
        config.zones.coefficients.insert(ZoneKey::Easy, 0.5);
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_config_file_loading() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(
            temp_file,
            r#"
[classifier]
cardio_ratio = 1.08
muscular_ratio = 0.93

[plan]
min_weeks = 5
taper_weeks = 1
test_interval_weeks = 4

[plan.phase_weights]
base = 0.5
build = 0.3
peak = 0.2

[plan.recovery_cycle]
senior = 3

[plan.phase_focus]
base = ["aerobic", "threshold"]
build = ["vo2max", "threshold"]
peak = ["vo2max", "threshold"]
taper = ["aerobic", "speed"]

[plan.easy_distance]
base = 6000.0
build = 8000.0
peak = 8000.0
taper = 5000.0

[plan.long_run_distance]
base = 10000.0
build = 12000.0
peak = 10000.0
taper = 8000.0
        "#
        )?;

        let config = EngineConfig::load_from_file(temp_file.path().to_str().unwrap())?;

        // Overridden sections take effect; omitted ones keep defaults
        assert!((config.classifier.cardio_ratio - 1.08).abs() < 1e-9);
        assert_eq!(config.plan.min_weeks, 5);
        assert_eq!(config.plan.taper_weeks, 1);
        assert!((config.metrics.reference_distance_m - 5000.0).abs() < 1e-9);
        assert!(config.validate().is_ok());

        Ok(())
    }
}
