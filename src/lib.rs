// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Stride Engine
//!
//! A training engine for mid-distance runners. From a handful of timed test
//! efforts the engine estimates a threshold pace (ETP), classifies the
//! athlete's dominant physiological limiter, derives named training pace
//! zones, predicts race times at arbitrary distances and generates a fully
//! periodized multi-week training plan.
//!
//! ## Features
//!
//! - **Threshold pace estimation**: Critical-speed fit over multiple test
//!   results, endurance-curve correction for a single result
//! - **Limiter classification**: Cardio / muscular / balanced, from pace
//!   decay between short and long test distances
//! - **Pace zones**: Six named zones with limiter-specific coefficients and
//!   optional heart-rate bands
//! - **Race predictions**: Time windows at standard distances, consistent
//!   with the estimation model at its anchor distance
//! - **Plan generation**: Base/build/peak/taper periodization, recovery and
//!   ramp-test weeks, deterministic workout selection per available day
//! - **Schema migration**: Versioned upgrades for persisted profile records
//!
//! Everything is pure computation over plain values: no I/O beyond optional
//! configuration loading, no clocks, no randomness. Storage and display
//! belong to the caller.
//!
//! ## Example Usage
//!
//! ```rust
//! use stride_engine::config::EngineConfig;
//! use stride_engine::models::{AgeCategory, Level, Profile, TestResult};
//! use stride_engine::zones::compute_zones;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::load(None)?;
//!
//!     let mut profile = Profile::new(Level::Intermediate, AgeCategory::Senior);
//!     profile.record_test_result(TestResult::new(5000.0, 1200.0), &config)?;
//!
//!     let metrics = profile.effective_metrics();
//!     let zones = compute_zones(metrics.etp, metrics.limiter, &config)?;
//!     for (key, zone) in zones.iter() {
//!         println!("{key:?}: {:.0}s per lap", zone.target_s);
//!     }
//!     Ok(())
//! }
//! ```

/// Error types shared across the engine
pub mod error;

/// Time and pace parsing/formatting
pub mod pace;

/// Common data models: profile, test results, zones, plans
pub mod models;

/// Tuned coefficient tables and engine configuration
pub mod config;

/// Threshold pace and VO2max estimation
pub mod metrics;

/// Physiological limiter classification
pub mod limiter;

/// Training pace zone calculation
pub mod zones;

/// Race time prediction
pub mod predictions;

/// Periodized plan generation and workout selection
pub mod planner;

/// Schema migration for persisted records
pub mod migration;

pub use error::{EngineError, Result};
