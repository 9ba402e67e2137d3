// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Workout selection and parametrization
//!
//! Fills one available day of a training week. The week's available slots
//! are laid out deterministically (up to two key quality sessions mid-week,
//! the long run on the last slot, easy running elsewhere, recovery jogs the
//! day after a key session); each key session's focus follows the phase
//! weighting table modulated by limiter and capped by athlete level. No
//! hidden randomness anywhere, so regenerating a plan with unchanged inputs
//! reproduces it exactly.

use crate::config::{EngineConfig, FocusCategory, WorkoutTemplate};
use crate::models::{Level, Limiter, PhaseKind, WorkoutKind, WorkoutSpec, ZoneKey};

/// Everything the selector needs to fill one available day.
///
/// Workouts reference zones by key; resolution to concrete paces happens
/// against the plan's zone set when the session is displayed.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext {
    pub phase: PhaseKind,
    pub week_in_phase: u32,
    /// Index of this day among the week's available days
    pub slot: usize,
    /// Number of available days this week
    pub slot_count: usize,
    pub limiter: Limiter,
    pub level: Level,
    pub etp: f64,
    pub is_recovery_week: bool,
    pub is_test_week: bool,
}

/// Role a slot plays within its week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotRole {
    Key(usize),
    LongRun,
    Easy,
    Recovery,
    RampTest,
}

/// Select and parametrize the session for one available day.
///
/// Returns the day's workout tag, its spec, and whether the day counts as a
/// key session. The workout spec is `None` only for the ramp test, whose
/// protocol is fixed by the test itself rather than the zone table.
pub fn select_workout(ctx: &SelectionContext, config: &EngineConfig) -> (WorkoutKind, Option<WorkoutSpec>, bool) {
    let roles = week_roles(ctx.slot_count, ctx.is_recovery_week, ctx.is_test_week);
    let role = roles.get(ctx.slot).copied().unwrap_or(SlotRole::Easy);

    match role {
        SlotRole::RampTest => (WorkoutKind::RampTest, None, true),
        SlotRole::Key(index) => {
            let category = key_category(ctx.phase, index, ctx.limiter, config);
            let (kind, spec) = key_session(category, ctx, config);
            (kind, Some(spec), true)
        }
        SlotRole::LongRun => {
            let spec = steady_session(
                long_run_distance(ctx, config),
                ZoneKey::Easy,
                Some(ZoneKey::Marathon),
            );
            (WorkoutKind::LongRun, Some(spec), !ctx.is_recovery_week)
        }
        SlotRole::Recovery => {
            let distance = easy_distance(ctx, config) * 0.6;
            let spec = steady_session(distance, ZoneKey::Jog, None);
            (WorkoutKind::Recovery, Some(spec), false)
        }
        SlotRole::Easy => {
            let spec = steady_session(easy_distance(ctx, config), ZoneKey::Easy, None);
            (WorkoutKind::Easy, Some(spec), false)
        }
    }
}

/// Deterministic slot layout for one week.
///
/// Mirrors the product's weekly template: with four or more slots the two
/// key sessions land mid-week and the long run takes the last slot; smaller
/// weeks degrade gracefully. Recovery weeks drop key sessions entirely; test
/// weeks replace the first quality slot with the ramp test. The slot after
/// a key session always becomes a recovery jog.
fn week_roles(slot_count: usize, is_recovery_week: bool, is_test_week: bool) -> Vec<SlotRole> {
    let mut roles = vec![SlotRole::Easy; slot_count];
    if slot_count == 0 {
        return roles;
    }

    match slot_count {
        1 => roles[0] = SlotRole::LongRun,
        2 => {
            roles[0] = SlotRole::Key(0);
            roles[1] = SlotRole::LongRun;
        }
        3 => {
            roles[0] = SlotRole::Key(0);
            roles[1] = SlotRole::Key(1);
            roles[2] = SlotRole::LongRun;
        }
        n => {
            let mid = n / 2;
            let first_key = mid / 2;
            let second_key = (mid + (n - mid) / 2).min(n - 2);
            roles[first_key] = SlotRole::Key(0);
            if second_key > first_key {
                roles[second_key] = SlotRole::Key(1);
            }
            roles[n - 1] = SlotRole::LongRun;
        }
    }

    if is_recovery_week {
        for role in roles.iter_mut() {
            if matches!(role, SlotRole::Key(_)) {
                *role = SlotRole::Easy;
            }
        }
    }

    if is_test_week {
        let test_slot = roles
            .iter()
            .position(|role| matches!(role, SlotRole::Key(0)))
            .unwrap_or(0);
        roles[test_slot] = SlotRole::RampTest;
    }

    // The slot after a quality session absorbs it as a recovery jog.
    for index in 1..roles.len() {
        let previous_hard = matches!(roles[index - 1], SlotRole::Key(_) | SlotRole::RampTest);
        if previous_hard && roles[index] == SlotRole::Easy {
            roles[index] = SlotRole::Recovery;
        }
    }

    roles
}

/// Focus category for the `index`-th key session of a week.
///
/// Muscular-limited athletes trade the secondary focus for threshold work;
/// cardio-limited athletes trade it for aerobic volume in the low-intensity
/// phases.
fn key_category(
    phase: PhaseKind,
    index: usize,
    limiter: Limiter,
    config: &EngineConfig,
) -> FocusCategory {
    let focus = config
        .plan
        .phase_focus
        .get(&phase)
        .map(Vec::as_slice)
        .unwrap_or(&[FocusCategory::Aerobic]);
    let base = focus
        .get(index)
        .or_else(|| focus.first())
        .copied()
        .unwrap_or(FocusCategory::Aerobic);

    if index == 0 {
        return base;
    }
    match limiter {
        Limiter::Muscular => FocusCategory::Threshold,
        Limiter::Cardio if matches!(phase, PhaseKind::Base | PhaseKind::Taper) => {
            FocusCategory::Aerobic
        }
        _ => base,
    }
}

fn key_session(
    category: FocusCategory,
    ctx: &SelectionContext,
    config: &EngineConfig,
) -> (WorkoutKind, WorkoutSpec) {
    let template = pick_template(category, ctx.etp, config);
    let Some(template) = template else {
        // Validated config guarantees a template per category; fall back to
        // an aerobic session rather than panicking on a hand-edited table.
        return (
            WorkoutKind::Easy,
            steady_session(easy_distance(ctx, config), ZoneKey::Easy, None),
        );
    };

    if template.kind == WorkoutKind::LongRun {
        return (
            WorkoutKind::LongRun,
            steady_session(
                long_run_distance(ctx, config),
                template.zone,
                template.secondary_zone,
            ),
        );
    }

    let variant = config.workouts.limiter_variants.get(&ctx.limiter);
    let caps = config.workouts.level_caps.get(&ctx.level);

    let mut repeats = template.repeats;
    if repeats > 1 {
        // Mild progression across a phase, then limiter adjustment, with the
        // level cap applied last.
        repeats += ctx.week_in_phase / 3;
        if let Some(variant) = variant {
            repeats = (repeats as i64 + variant.repeat_adjust as i64).max(1) as u32;
        }
        if let Some(caps) = caps {
            repeats = repeats.min(caps.max_repeats);
        }
    }

    let recovery_multiplier = variant.map_or(1.0, |v| v.recovery_multiplier);
    let recovery_s = (template.recovery_s as f64 * recovery_multiplier).round() as u32;

    let spec = WorkoutSpec {
        repeats,
        interval_distance_m: template.interval_distance_m,
        zone: template.zone,
        secondary_zone: template.secondary_zone,
        recovery_s,
        total_distance_m: template.warmup_m
            + repeats as f64 * template.interval_distance_m
            + template.cooldown_m,
    };
    (template.kind, spec)
}

/// First template of the category whose ETP gate the athlete passes;
/// faster athletes (lower ETP) take the longer-interval variants.
fn pick_template<'a>(
    category: FocusCategory,
    etp: f64,
    config: &'a EngineConfig,
) -> Option<&'a WorkoutTemplate> {
    let mut candidates = config
        .workouts
        .templates
        .iter()
        .filter(|template| template.category == category);

    let mut fallback = None;
    for template in candidates.by_ref() {
        match template.max_etp {
            Some(gate) if etp <= gate => return Some(template),
            _ => fallback = Some(template),
        }
    }
    fallback
}

fn steady_session(
    distance_m: f64,
    zone: ZoneKey,
    secondary_zone: Option<ZoneKey>,
) -> WorkoutSpec {
    let distance_m = distance_m.round();
    WorkoutSpec {
        repeats: 1,
        interval_distance_m: distance_m,
        zone,
        secondary_zone,
        recovery_s: 0,
        total_distance_m: distance_m,
    }
}

fn easy_distance(ctx: &SelectionContext, config: &EngineConfig) -> f64 {
    scaled_distance(
        config
            .plan
            .easy_distance
            .get(&ctx.phase)
            .copied()
            .unwrap_or(6000.0),
        ctx,
        config,
    )
}

fn long_run_distance(ctx: &SelectionContext, config: &EngineConfig) -> f64 {
    scaled_distance(
        config
            .plan
            .long_run_distance
            .get(&ctx.phase)
            .copied()
            .unwrap_or(10000.0),
        ctx,
        config,
    )
}

fn scaled_distance(base_m: f64, ctx: &SelectionContext, config: &EngineConfig) -> f64 {
    let level_factor = config
        .workouts
        .level_caps
        .get(&ctx.level)
        .map_or(1.0, |caps| caps.volume_factor);
    let limiter_factor = config
        .workouts
        .limiter_variants
        .get(&ctx.limiter)
        .map_or(1.0, |variant| variant.volume_multiplier);
    let recovery_factor = if ctx.is_recovery_week { 0.7 } else { 1.0 };
    (base_m * level_factor * limiter_factor * recovery_factor / 100.0).round() * 100.0
}
