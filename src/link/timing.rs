//! Per-packet timing on the simulated link

use crate::link::config::LinkConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// One-way light-time over `distance_km`, scaled for demo runs
pub fn propagation_delay(distance_km: f64, latency_scale_factor: f64) -> f64 {
    (distance_km * 1000.0 / SPEED_OF_LIGHT_M_S) * latency_scale_factor
}

/// Time to clock `size_bytes` onto a link of `bandwidth_bps`
pub fn serialization_delay(size_bytes: usize, bandwidth_bps: u32) -> f64 {
    if bandwidth_bps == 0 {
        return 0.0;
    }
    (size_bytes as f64 * 8.0) / f64::from(bandwidth_bps)
}

/// Timing committed for one transmission, in simulated seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LinkTiming {
    pub propagation_delay: f64,
    pub serialization_delay: f64,
}

impl LinkTiming {
    pub fn for_packet(config: &LinkConfig, compressed_size: usize) -> Self {
        Self {
            propagation_delay: propagation_delay(
                config.distance_km,
                config.latency_scale_factor,
            ),
            serialization_delay: serialization_delay(compressed_size, config.bandwidth_bps),
        }
    }

    pub fn total_seconds(&self) -> f64 {
        self.propagation_delay + self.serialization_delay
    }

    pub fn total(&self) -> Duration {
        Duration::from_secs_f64(self.total_seconds().max(0.0))
    }
}
