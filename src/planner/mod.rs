// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Periodized plan generation
//!
//! Turns a profile, a target event and a weekly availability mask into a
//! complete [`TrainingPlan`]: weeks are counted from the Monday of the start
//! week to the event, allocated across base/build/peak proportionally with a
//! fixed-length taper, then each week is filled day by day through the
//! workout selector. Plans are always regenerated wholesale; any change to
//! ETP, limiter, target event or availability invalidates the previous plan
//! entirely.
//!
//! Generation is deterministic. The caller supplies the start date, the
//! generation timestamp is derived from it, and the plan id is a v5 UUID
//! over the plan's identifying inputs, so identical inputs yield bit-for-bit
//! identical plans.

pub mod workout_selector;

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{
    DaySchedule, Phase, PhaseKind, Profile, TargetEvent, TrainingPlan, WeeklyAvailability,
    WeeklyPlan, WorkoutKind,
};
use workout_selector::{select_workout, SelectionContext};

/// Build a full periodized plan from the Monday of `start_date`'s week up to
/// the target event.
///
/// Fails with [`EngineError::InvalidTarget`] when the event date is not in
/// the future, closer than the configured minimum viable plan length, or no
/// training day is available. Storage of the returned plan is the caller's
/// responsibility.
pub fn generate_plan(
    profile: &Profile,
    target_event: &TargetEvent,
    availability: WeeklyAvailability,
    start_date: NaiveDate,
    config: &EngineConfig,
) -> Result<TrainingPlan> {
    if target_event.date <= start_date {
        return Err(EngineError::InvalidTarget(format!(
            "target event date {} is not in the future",
            target_event.date
        )));
    }
    if availability.days_available() == 0 {
        return Err(EngineError::InvalidTarget(
            "no training day available in the weekly schedule".into(),
        ));
    }

    let week_start = monday_of(start_date);
    let total_weeks = ((target_event.date - week_start).num_days() / 7) as u32;
    if total_weeks < config.plan.min_weeks {
        return Err(EngineError::InvalidTarget(format!(
            "only {total_weeks} full weeks until the event; at least {} required",
            config.plan.min_weeks
        )));
    }

    let metrics = profile.effective_metrics();
    let phases = allocate_phases(total_weeks, config);
    let recovery_cycle = config.recovery_cycle(profile.age_category);
    let test_weeks = ramp_test_weeks(&phases, config);

    let slot_count = availability.days_available();
    let mut weeks = Vec::with_capacity(total_weeks as usize);
    for (week_number, phase, week_in_phase) in week_index(&phases) {
        let is_recovery_week = matches!(phase, PhaseKind::Base | PhaseKind::Build)
            && week_in_phase > 0
            && week_in_phase % recovery_cycle == 0;
        let is_test_week = test_weeks.contains(&week_number);

        let mut days = Vec::with_capacity(7);
        let mut slot = 0;
        for day_of_week in 0..7 {
            let date =
                week_start + Days::new(u64::from(week_number - 1) * 7 + day_of_week as u64);
            if !availability.is_available(day_of_week) {
                days.push(DaySchedule {
                    date,
                    kind: WorkoutKind::Rest,
                    spec: None,
                    is_key: false,
                });
                continue;
            }
            let ctx = SelectionContext {
                phase,
                week_in_phase,
                slot,
                slot_count,
                limiter: metrics.limiter,
                level: profile.level,
                etp: metrics.etp,
                is_recovery_week,
                is_test_week,
            };
            let (kind, spec, is_key) = select_workout(&ctx, config);
            days.push(DaySchedule {
                date,
                kind,
                spec,
                is_key,
            });
            slot += 1;
        }

        weeks.push(WeeklyPlan {
            week_number,
            phase,
            week_in_phase,
            days,
            is_recovery_week,
            is_test_week,
        });
    }

    let mut snapshot = profile.clone();
    snapshot.target_event = Some(target_event.clone());
    snapshot.availability = availability;

    // Every input that changes the generated schedule feeds the id, so two
    // distinct plans never collide and identical inputs reproduce the id.
    let availability_mask: String = (0..7)
        .map(|day| if availability.is_available(day) { '1' } else { '0' })
        .collect();
    let id = Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!(
            "{week_start}|{}|{}|{}|{}|{:?}|{:?}|{availability_mask}",
            target_event.date,
            target_event.distance_m,
            target_event.name,
            metrics.etp,
            metrics.limiter,
            profile.level,
        )
        .as_bytes(),
    )
    .to_string();

    debug!(
        total_weeks,
        etp = metrics.etp,
        limiter = ?metrics.limiter,
        "generated training plan"
    );

    Ok(TrainingPlan {
        id,
        profile_snapshot: snapshot,
        target_event: target_event.clone(),
        phases,
        weeks,
        generated_at: week_start.and_time(NaiveTime::MIN).and_utc(),
    })
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// Split `total_weeks` across the phase sequence.
///
/// Taper length is fixed by configuration, clamped so the other phases keep
/// at least three weeks between them. The rest is allocated proportionally
/// to the configured phase weights; fractional remainders go to base first,
/// then build, and every phase ends up with at least one week.
fn allocate_phases(total_weeks: u32, config: &EngineConfig) -> Vec<Phase> {
    let taper = config
        .plan
        .taper_weeks
        .min(total_weeks.saturating_sub(3))
        .max(1);
    let remaining = total_weeks - taper;

    let weight = |kind: PhaseKind| config.plan.phase_weights.get(&kind).copied().unwrap_or(0.0);
    let mut base = (f64::from(remaining) * weight(PhaseKind::Base)).floor() as u32;
    let mut build = (f64::from(remaining) * weight(PhaseKind::Build)).floor() as u32;
    let mut peak = (f64::from(remaining) * weight(PhaseKind::Peak)).floor() as u32;

    let mut remainder = remaining.saturating_sub(base + build + peak);
    if remainder > 0 {
        base += 1;
        remainder -= 1;
    }
    if remainder > 0 {
        build += 1;
        remainder -= 1;
    }
    base += remainder;

    // Proportional rounding can starve a phase on short plans.
    if peak == 0 {
        if base >= build {
            base -= 1;
        } else {
            build -= 1;
        }
        peak = 1;
    }
    if build == 0 {
        base -= 1;
        build = 1;
    }

    vec![
        Phase {
            kind: PhaseKind::Base,
            weeks: base,
        },
        Phase {
            kind: PhaseKind::Build,
            weeks: build,
        },
        Phase {
            kind: PhaseKind::Peak,
            weeks: peak,
        },
        Phase {
            kind: PhaseKind::Taper,
            weeks: taper,
        },
    ]
}

/// Weeks carrying a ramp test: every configured interval outside the taper,
/// plus the final base week unless a test already sits within one week of it.
fn ramp_test_weeks(phases: &[Phase], config: &EngineConfig) -> Vec<u32> {
    let interval = config.plan.test_interval_weeks.max(1);
    let total: u32 = phases.iter().map(|phase| phase.weeks).sum();
    let taper_start = total - phases.last().map_or(0, |phase| phase.weeks) + 1;

    let mut weeks: Vec<u32> = (1..taper_start)
        .filter(|week| week % interval == 0)
        .collect();

    let base_end = phases.first().map_or(0, |phase| phase.weeks);
    if base_end >= 2 && !weeks.iter().any(|week| week.abs_diff(base_end) <= 1) {
        weeks.push(base_end);
        weeks.sort_unstable();
    }
    weeks
}

/// Iterate (1-based week number, phase, 0-based week-in-phase) over the
/// allocated phase sequence.
fn week_index(phases: &[Phase]) -> impl Iterator<Item = (u32, PhaseKind, u32)> + '_ {
    let mut week_number = 0;
    phases.iter().flat_map(move |phase| {
        let start = week_number;
        week_number += phase.weeks;
        (0..phase.weeks).map(move |offset| (start + offset + 1, phase.kind, offset))
    })
}
