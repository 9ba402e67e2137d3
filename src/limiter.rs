// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Limiter classification
//!
//! Decides which physiological system constrains the athlete more by
//! comparing how much they slow down between a short and a long test
//! distance, relative to the expected endurance curve. Slowing more than
//! expected marks aerobic capacity as the bottleneck (cardio-limited);
//! slowing less marks fatigue resistance (muscular-limited).

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{Limiter, TestResult};

/// Classify the athlete's dominant limiter from their test results.
///
/// Requires at least two results at distinct distances; callers must supply
/// the neutral `Balanced` default themselves when this returns
/// [`EngineError::InsufficientData`]; the classifier never guesses.
pub fn classify(results: &[TestResult], config: &EngineConfig) -> Result<Limiter> {
    let (short, long) = distance_extremes(results).ok_or(EngineError::InsufficientData {
        required: 2,
        actual: results.len(),
    })?;

    // Normalizing each pace by its distance factor puts both efforts on the
    // same scale; a balanced athlete lands near ratio 1.0.
    let short_index = short.pace_per_lap() / config.distance_factor(short.distance_m);
    let long_index = long.pace_per_lap() / config.distance_factor(long.distance_m);
    let ratio = long_index / short_index;

    let limiter = if ratio > config.classifier.cardio_ratio {
        Limiter::Cardio
    } else if ratio < config.classifier.muscular_ratio {
        Limiter::Muscular
    } else {
        Limiter::Balanced
    };

    debug!(
        ratio,
        short_m = short.distance_m,
        long_m = long.distance_m,
        ?limiter,
        "classified limiter from decay ratio"
    );
    Ok(limiter)
}

/// Shortest- and longest-distance results, `None` unless two distinct
/// distances exist. Ties keep the most recent effort at each distance.
fn distance_extremes(results: &[TestResult]) -> Option<(&TestResult, &TestResult)> {
    let mut short: Option<&TestResult> = None;
    let mut long: Option<&TestResult> = None;

    for result in results {
        if short.map_or(true, |current| result.distance_m <= current.distance_m) {
            short = Some(result);
        }
        if long.map_or(true, |current| result.distance_m >= current.distance_m) {
            long = Some(result);
        }
    }

    match (short, long) {
        (Some(s), Some(l)) if s.distance_m < l.distance_m => Some((s, l)),
        _ => None,
    }
}
