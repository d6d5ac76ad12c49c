use crate::link::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DISTANCE_KM_RANGE: RangeInclusive<f64> = 1_000.0..=1_000_000_000.0;
pub const BANDWIDTH_BPS_RANGE: RangeInclusive<u32> = 256..=1_000_000;
pub const LATENCY_SCALE_RANGE: RangeInclusive<f64> = 0.001..=1.0;

/// Earth-Moon distance
pub const DEFAULT_DISTANCE_KM: f64 = 384_400.0;

/// Link parameters. Read by the scheduler when each packet is dispatched.
///
/// All fields are required when deserializing: an update replaces the
/// whole configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkConfig {
    pub distance_km: f64,
    pub bandwidth_bps: u32,
    pub compression_enabled: bool,
    pub latency_scale_factor: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            distance_km: DEFAULT_DISTANCE_KM,
            bandwidth_bps: 2048,
            compression_enabled: true,
            latency_scale_factor: 0.01,
        }
    }
}

impl LinkConfig {
    /// Check every field; the first out-of-range field rejects the whole config
    pub fn validate(&self) -> ConfigResult<()> {
        check_f64("distance_km", self.distance_km, &DISTANCE_KM_RANGE)?;

        if !BANDWIDTH_BPS_RANGE.contains(&self.bandwidth_bps) {
            return Err(ConfigError::OutOfRange {
                field: "bandwidth_bps",
                value: f64::from(self.bandwidth_bps),
                min: f64::from(*BANDWIDTH_BPS_RANGE.start()),
                max: f64::from(*BANDWIDTH_BPS_RANGE.end()),
            });
        }

        check_f64(
            "latency_scale_factor",
            self.latency_scale_factor,
            &LATENCY_SCALE_RANGE,
        )
    }
}

// NaN fails `contains`, so it is rejected like any other out-of-range value
fn check_f64(field: &'static str, value: f64, range: &RangeInclusive<f64>) -> ConfigResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
