// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Race-time prediction
//!
//! Projects finishing times at arbitrary distances from ETP using the same
//! distance-factor curve the metric engine corrects with. Because estimation
//! divides by the factor and prediction multiplies by it, an ETP derived
//! from a single test predicts that test's own time back exactly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::models::Limiter;
use crate::pace::LAP_METERS;

/// Predicted finishing window for one race distance, seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionWindow {
    pub distance_m: f64,
    pub min_s: f64,
    pub max_s: f64,
}

/// Predicted finishing time at an arbitrary distance, seconds.
///
/// `predict(etp, d) = etp * factor(d) * d / 400`; at the distance a
/// single-result ETP was derived from this reproduces the source time
/// within floating rounding.
pub fn predict(etp: f64, distance_m: f64, config: &EngineConfig) -> f64 {
    let laps = distance_m / LAP_METERS;
    let time = etp * config.distance_factor(distance_m) * laps;
    debug!(etp, distance_m, time, "predicted race time");
    time
}

/// Min/max finishing windows at the standard race distances, with the
/// limiter's whole-race second offsets applied (a cardio-limited athlete
/// gives up time the longer the race runs; a muscular-limited athlete the
/// opposite).
pub fn predict_standard(etp: f64, limiter: Limiter, config: &EngineConfig) -> Vec<PredictionWindow> {
    config
        .race
        .windows
        .iter()
        .map(|window| {
            let laps = window.distance_m / LAP_METERS;
            let offset = match limiter {
                Limiter::Cardio => window.cardio_offset_s,
                Limiter::Muscular => window.muscular_offset_s,
                Limiter::Balanced => 0.0,
            };
            PredictionWindow {
                distance_m: window.distance_m,
                min_s: etp * window.min_factor * laps + offset,
                max_s: etp * window.max_factor * laps + offset,
            }
        })
        .collect()
}
