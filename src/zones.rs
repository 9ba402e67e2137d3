// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Training zone computation
//!
//! Maps (ETP, limiter) through the coefficient table into the six named pace
//! zones. Coefficients differ by limiter: a muscular-limited athlete's easy
//! zone sits proportionally wider, a cardio-limited athlete's quality zones
//! sit slightly softer. Zone bounds are built from midpoints between adjacent
//! target paces, so the set is monotonic by construction; a table that breaks
//! that ordering is rejected as a packaged-data defect.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{Limiter, PaceRange, Zone, ZoneKey, ZoneSet};

/// Compute the full zone set for one (ETP, limiter) pair.
///
/// Pure: identical inputs always produce identical zones. Fails only on a
/// malformed coefficient table.
pub fn compute_zones(etp: f64, limiter: Limiter, config: &EngineConfig) -> Result<ZoneSet> {
    let mut targets = Vec::with_capacity(ZoneKey::ORDERED.len());
    for key in ZoneKey::ORDERED {
        let coefficient = config.zone_coefficient(key, limiter)?;
        targets.push((key, etp * coefficient));
    }

    // Easiest-first means target paces must strictly fall along the list.
    for pair in targets.windows(2) {
        if pair[1].1 >= pair[0].1 {
            return Err(EngineError::InvalidTable(format!(
                "zone paces not monotonic between {:?} and {:?}",
                pair[0].0, pair[1].0
            )));
        }
    }

    let margin = config.zones.end_margin;
    let mut zones = BTreeMap::new();
    for (index, (key, target)) in targets.iter().enumerate() {
        // Faster bound: midpoint toward the next harder zone, or a fixed
        // margin at the hard end of the table.
        let lower = match targets.get(index + 1) {
            Some((_, harder)) => (target + harder) / 2.0,
            None => target * (1.0 - margin),
        };
        let upper = if index == 0 {
            target * (1.0 + margin)
        } else {
            (target + targets[index - 1].1) / 2.0
        };

        zones.insert(
            *key,
            Zone {
                target_s: *target,
                pace: PaceRange {
                    lower_s: lower,
                    upper_s: upper,
                },
                hr: config.zones.hr_bands.get(key).copied(),
            },
        );
    }

    debug!(etp, ?limiter, "computed training zones");
    Ok(ZoneSet::from_map(zones))
}

/// Adjust a zone set for a specific target race distance.
///
/// Longer target races shift the effective threshold pace slower; the input
/// set is never mutated and the returned set keeps the monotonic ordering
/// (the configured shifts are small relative to the zone gaps).
pub fn apply_race_adjustment(
    zones: &ZoneSet,
    event_distance_m: f64,
    config: &EngineConfig,
) -> ZoneSet {
    let shift = config
        .race
        .threshold_adjustments
        .iter()
        .min_by(|a, b| {
            let da = (a.distance_m - event_distance_m).abs();
            let db = (b.distance_m - event_distance_m).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|adjustment| adjustment.threshold_shift)
        .unwrap_or(0.0);

    let Some(threshold) = zones.get(ZoneKey::Threshold) else {
        return zones.clone();
    };

    let scale = 1.0 + shift;
    let adjusted = Zone {
        target_s: threshold.target_s * scale,
        pace: PaceRange {
            lower_s: threshold.pace.lower_s * scale,
            upper_s: threshold.pace.upper_s * scale,
        },
        hr: threshold.hr,
    };
    zones.replace(ZoneKey::Threshold, adjusted)
}
