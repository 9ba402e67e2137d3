// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core value types shared by every engine component: athlete profile, test
//! results, pace zones, periodization phases and the generated training plan.
//!
//! ## Design Principles
//!
//! - **Plain values**: No behavior beyond accessors; safe to serialize for
//!   display or persistence by the calling layer
//! - **Derived stays paired**: ETP and limiter live in one [`CurrentMetrics`]
//!   so they can never be independently stale
//! - **Value semantics**: Workout specs and plans are owned values; two
//!   identical sessions on different days are independent, never shared

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pace::LAP_METERS;

/// One timed field-test effort. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test distance in meters
    pub distance_m: f64,
    /// Elapsed time in seconds
    pub time_s: f64,
    /// Date the effort was run, when known
    pub date: Option<NaiveDate>,
}

impl TestResult {
    pub fn new(distance_m: f64, time_s: f64) -> Self {
        Self {
            distance_m,
            time_s,
            date: None,
        }
    }

    pub fn on_date(distance_m: f64, time_s: f64, date: NaiveDate) -> Self {
        Self {
            distance_m,
            time_s,
            date: Some(date),
        }
    }

    /// Average pace of this effort in seconds per 400 m lap
    pub fn pace_per_lap(&self) -> f64 {
        self.time_s / (self.distance_m / LAP_METERS)
    }
}

/// Experience tier of the athlete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

/// Age bracket, used for small metric corrections and recovery cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    JuniorHigh,
    HighSchool,
    Collegiate,
    Senior,
    Masters40,
    Masters50,
    Masters60,
}

/// Which physiological system constrains the athlete's performance more
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limiter {
    Cardio,
    Muscular,
    #[default]
    Balanced,
}

/// Derived metric pair, always recomputed together from the same test-result
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    /// Estimated threshold pace in seconds per lap
    pub etp: f64,
    pub limiter: Limiter,
}

/// Target race for the generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEvent {
    pub name: String,
    pub distance_m: f64,
    pub date: NaiveDate,
}

/// Days-of-week the athlete can train, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyAvailability(pub [bool; 7]);

impl WeeklyAvailability {
    pub fn every_day() -> Self {
        Self([true; 7])
    }

    pub fn is_available(&self, day: usize) -> bool {
        self.0.get(day).copied().unwrap_or(false)
    }

    pub fn days_available(&self) -> usize {
        self.0.iter().filter(|available| **available).count()
    }
}

impl Default for WeeklyAvailability {
    fn default() -> Self {
        Self::every_day()
    }
}

/// Athlete profile as supplied by the calling layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub level: Level,
    pub age_category: AgeCategory,
    /// Append-only, chronological, most recent last
    pub test_results: Vec<TestResult>,
    /// Cached derived metrics; `None` until the first test result lands
    pub current: Option<CurrentMetrics>,
    pub target_event: Option<TargetEvent>,
    pub availability: WeeklyAvailability,
}

impl Profile {
    pub fn new(level: Level, age_category: AgeCategory) -> Self {
        Self {
            level,
            age_category,
            test_results: Vec::new(),
            current: None,
            target_event: None,
            availability: WeeklyAvailability::default(),
        }
    }

    /// Current ETP and limiter, falling back to the neutral defaults the
    /// product uses before any measurement exists.
    pub fn effective_metrics(&self) -> CurrentMetrics {
        self.current.unwrap_or(CurrentMetrics {
            etp: 100.0,
            limiter: Limiter::Balanced,
        })
    }
}

/// Named training-intensity band, ordered easiest to hardest pace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKey {
    Jog,
    Easy,
    Marathon,
    Threshold,
    Interval,
    Repetition,
}

impl ZoneKey {
    /// All zones in order, easiest (slowest pace) first
    pub const ORDERED: [ZoneKey; 6] = [
        ZoneKey::Jog,
        ZoneKey::Easy,
        ZoneKey::Marathon,
        ZoneKey::Threshold,
        ZoneKey::Interval,
        ZoneKey::Repetition,
    ];
}

/// Pace band in seconds per lap; `lower_s` is the faster bound
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaceRange {
    pub lower_s: f64,
    pub upper_s: f64,
}

/// Heart-rate band as percent of maximum heart rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HrRange {
    pub lower_pct: f64,
    pub upper_pct: f64,
}

/// One computed training zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Midpoint target pace in seconds per lap
    pub target_s: f64,
    pub pace: PaceRange,
    pub hr: Option<HrRange>,
}

/// Full set of training zones for one (ETP, limiter) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    zones: BTreeMap<ZoneKey, Zone>,
}

impl ZoneSet {
    pub(crate) fn from_map(zones: BTreeMap<ZoneKey, Zone>) -> Self {
        Self { zones }
    }

    pub fn get(&self, key: ZoneKey) -> Option<&Zone> {
        self.zones.get(&key)
    }

    /// Zones in intensity order, easiest first
    pub fn iter(&self) -> impl Iterator<Item = (ZoneKey, &Zone)> {
        ZoneKey::ORDERED
            .iter()
            .filter_map(|key| self.zones.get(key).map(|zone| (*key, zone)))
    }

    pub(crate) fn replace(&self, key: ZoneKey, zone: Zone) -> Self {
        let mut zones = self.zones.clone();
        zones.insert(key, zone);
        Self { zones }
    }
}

/// Periodization stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Base,
    Build,
    Peak,
    Taper,
}

impl PhaseKind {
    pub const ORDERED: [PhaseKind; 4] = [
        PhaseKind::Base,
        PhaseKind::Build,
        PhaseKind::Peak,
        PhaseKind::Taper,
    ];
}

/// One allocated phase within a generated plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub weeks: u32,
}

/// Session tag carried by each day of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Rest,
    Easy,
    Recovery,
    LongRun,
    Tempo,
    Intervals,
    Repetitions,
    RampTest,
}

/// Structured parameters for one concrete session.
///
/// Built fresh per day; never shared by reference across days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSpec {
    pub repeats: u32,
    pub interval_distance_m: f64,
    /// Primary intensity zone for the work segments
    pub zone: ZoneKey,
    /// Secondary zone for mixed sessions (e.g. progressive long runs)
    pub secondary_zone: Option<ZoneKey>,
    /// Recovery jog duration between repeats, seconds
    pub recovery_s: u32,
    /// Session distance including warm-up and cool-down, meters
    pub total_distance_m: f64,
}

/// One calendar day of the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub kind: WorkoutKind,
    /// `None` when `kind` is `Rest` or `RampTest`
    pub spec: Option<WorkoutSpec>,
    /// Key (quality) session for the week
    pub is_key: bool,
}

/// Seven consecutive day schedules tagged with their owning phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// 1-based index within the whole plan
    pub week_number: u32,
    pub phase: PhaseKind,
    /// 0-based index within the owning phase
    pub week_in_phase: u32,
    pub days: Vec<DaySchedule>,
    pub is_recovery_week: bool,
    pub is_test_week: bool,
}

impl WeeklyPlan {
    pub fn non_rest_days(&self) -> usize {
        self.days
            .iter()
            .filter(|day| day.kind != WorkoutKind::Rest)
            .count()
    }
}

/// The full generated artifact. Created once per generation and superseded
/// wholesale (never patched) whenever its inputs change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPlan {
    pub id: String,
    /// Profile state the plan was generated from
    pub profile_snapshot: Profile,
    pub target_event: TargetEvent,
    pub phases: Vec<Phase>,
    pub weeks: Vec<WeeklyPlan>,
    pub generated_at: DateTime<Utc>,
}

impl TrainingPlan {
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|phase| phase.weeks).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pace_per_lap() {
        let result = TestResult::new(5000.0, 1200.0);
        assert!((result.pace_per_lap() - 96.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_availability_counts() {
        let availability = WeeklyAvailability([true, true, false, true, true, false, true]);
        assert_eq!(availability.days_available(), 5);
        assert!(availability.is_available(0));
        assert!(!availability.is_available(2));
        assert!(!availability.is_available(9));
    }

    #[test]
    fn test_effective_metrics_defaults_to_balanced() {
        let profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
        let metrics = profile.effective_metrics();
        assert_eq!(metrics.limiter, Limiter::Balanced);
        assert!((metrics.etp - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zone_key_ordering_easiest_first() {
        assert!(ZoneKey::Jog < ZoneKey::Repetition);
        assert_eq!(ZoneKey::ORDERED[0], ZoneKey::Jog);
        assert_eq!(ZoneKey::ORDERED[5], ZoneKey::Repetition);
    }

    #[test]
    fn test_limiter_serialization_names() {
        assert_eq!(
            serde_json::to_string(&Limiter::Cardio).unwrap(),
            "\"cardio\""
        );
        assert_eq!(
            serde_json::to_string(&Limiter::Balanced).unwrap(),
            "\"balanced\""
        );
    }
}
