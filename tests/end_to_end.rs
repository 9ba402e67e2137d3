// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end integration tests
//!
//! These tests verify complete workflows from a stored profile record
//! through migration, metric estimation and zone calculation to a fully
//! generated training plan.

use anyhow::Result;
use chrono::{Days, NaiveDate};
use serde_json::json;
use stride_engine::config::EngineConfig;
use stride_engine::migration::{migrate, CURRENT_SCHEMA_VERSION};
use stride_engine::models::{
    AgeCategory, Level, Limiter, Profile, TargetEvent, TestResult, WeeklyAvailability,
    WorkoutKind, ZoneKey,
};
use stride_engine::planner::generate_plan;
use stride_engine::predictions::predict;
use stride_engine::zones::compute_zones;

// Monday
fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn weekdays_only() -> WeeklyAvailability {
    WeeklyAvailability([true, true, true, true, true, false, false])
}

/// Complete workflow: a v1 stored record is migrated to the current schema,
/// its test results feed metric estimation, and the derived metrics drive
/// zone calculation and plan generation.
#[test]
fn test_full_pipeline_from_stored_record() -> Result<()> {
    let config = EngineConfig::load(None)?;

    // 1. Migrate the stored record to the current schema
    let stored = json!({
        "etp": 300,
        "results": [{ "distance_m": 5000.0, "time_s": 1200.0 }],
    });
    let record = migrate(stored, 1)?;
    assert_eq!(record["version"], json!(CURRENT_SCHEMA_VERSION));
    assert_eq!(record["limiter"], json!("balanced"));

    // 2. Rebuild the profile and recompute metrics from the migrated results
    let results: Vec<TestResult> = serde_json::from_value(record["test_results"].clone())?;
    let mut profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
    for result in results {
        profile.record_test_result(result, &config)?;
    }
    let metrics = profile.effective_metrics();
    assert!(metrics.etp > 0.0);
    assert_eq!(metrics.limiter, Limiter::Balanced);

    // 3. Zones derive purely from (ETP, limiter)
    let zones = compute_zones(metrics.etp, metrics.limiter, &config)?;
    assert_eq!(zones.iter().count(), 6);

    // 4. Generate the plan for a 12-week target
    let event = TargetEvent {
        name: "5000m final".into(),
        distance_m: 5000.0,
        date: start_date() + Days::new(12 * 7),
    };
    let plan = generate_plan(&profile, &event, weekdays_only(), start_date(), &config)?;
    assert_eq!(plan.weeks.len(), 12);
    Ok(())
}

/// An intermediate, balanced-limiter profile with one 5000m result and a
/// target event 12 weeks out on a 5-day week yields 12 weekly plans of
/// exactly 5 non-rest days, with phase weeks summing to 12.
#[test]
fn test_twelve_week_balanced_plan_shape() -> Result<()> {
    let config = EngineConfig::load(None)?;
    let mut profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
    profile.record_test_result(TestResult::new(5000.0, 1200.0), &config)?;
    assert_eq!(profile.effective_metrics().limiter, Limiter::Balanced);

    let event = TargetEvent {
        name: "5000m final".into(),
        distance_m: 5000.0,
        date: start_date() + Days::new(12 * 7),
    };
    let plan = generate_plan(&profile, &event, weekdays_only(), start_date(), &config)?;

    assert_eq!(plan.weeks.len(), 12);
    assert_eq!(plan.total_weeks(), 12);
    for week in &plan.weeks {
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.non_rest_days(), 5);
        for day in &week.days {
            let expects_spec = !matches!(day.kind, WorkoutKind::Rest | WorkoutKind::RampTest);
            assert_eq!(day.spec.is_some(), expects_spec);
        }
    }
    Ok(())
}

/// Regenerating with identical inputs yields a bit-for-bit identical plan.
#[test]
fn test_plan_regeneration_is_identical() -> Result<()> {
    let config = EngineConfig::load(None)?;
    let mut profile = Profile::new(Level::Advanced, AgeCategory::Collegiate);
    profile.record_test_result(TestResult::new(1500.0, 252.0), &config)?;
    profile.record_test_result(TestResult::new(5000.0, 1005.0), &config)?;

    let event = TargetEvent {
        name: "1500m heats".into(),
        distance_m: 1500.0,
        date: start_date() + Days::new(10 * 7),
    };
    let first = generate_plan(&profile, &event, weekdays_only(), start_date(), &config)?;
    let second = generate_plan(&profile, &event, weekdays_only(), start_date(), &config)?;
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first)?;
    let second_json = serde_json::to_string(&second)?;
    assert_eq!(first_json, second_json);
    Ok(())
}

/// Prediction agrees with estimation at the distance the ETP came from.
#[test]
fn test_prediction_matches_estimation_anchor() -> Result<()> {
    let config = EngineConfig::load(None)?;
    let mut profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
    profile.record_test_result(TestResult::new(5000.0, 1200.0), &config)?;

    let metrics = profile.effective_metrics();
    let predicted = predict(metrics.etp, 5000.0, &config);
    assert!((predicted - 1200.0).abs() < 1.0);
    Ok(())
}

/// Zone paces stay strictly ordered easiest to hardest for every limiter
/// once real test data has flowed through the whole estimation path.
#[test]
fn test_zones_monotonic_for_all_limiters() -> Result<()> {
    let config = EngineConfig::load(None)?;
    for limiter in [Limiter::Cardio, Limiter::Muscular, Limiter::Balanced] {
        let zones = compute_zones(94.1, limiter, &config)?;
        let targets: Vec<f64> = zones.iter().map(|(_, zone)| zone.target_s).collect();
        for pair in targets.windows(2) {
            assert!(pair[0] > pair[1], "zones must get faster: {targets:?}");
        }
        let jog = zones.get(ZoneKey::Jog).unwrap();
        let rep = zones.get(ZoneKey::Repetition).unwrap();
        assert!(jog.target_s > rep.target_s);
    }
    Ok(())
}

/// A plan serializes and deserializes without loss, as the storage layer
/// relies on.
#[test]
fn test_plan_json_round_trip() -> Result<()> {
    let config = EngineConfig::load(None)?;
    let mut profile = Profile::new(Level::Beginner, AgeCategory::Masters40);
    profile.record_test_result(TestResult::new(3000.0, 780.0), &config)?;

    let event = TargetEvent {
        name: "3000m club race".into(),
        distance_m: 3000.0,
        date: start_date() + Days::new(8 * 7),
    };
    let plan = generate_plan(&profile, &event, weekdays_only(), start_date(), &config)?;

    let serialized = serde_json::to_string(&plan)?;
    let restored: stride_engine::models::TrainingPlan = serde_json::from_str(&serialized)?;
    assert_eq!(plan, restored);
    Ok(())
}
