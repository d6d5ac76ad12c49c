use crate::engine::{LinkEngine, LinkResult};
use crate::events::DEFAULT_EVENT_CAPACITY;
use crate::scheduler::{FailurePolicy, TokioClock};
use clap::Parser;
use std::sync::Arc;

/// Process settings for the link server. Every flag can also come from
/// the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Simulated deep-space link server", long_about = None)]
pub struct ServerSettings {
    #[arg(long, env = "DEEPSPACE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Simulated seconds per wall-clock second
    #[arg(long, env = "DEEPSPACE_TIME_RATE", default_value_t = 1.0)]
    pub time_rate: f64,

    /// Chance that any single transmission fails, in [0, 1]
    #[arg(long, env = "DEEPSPACE_FAILURE_PROBABILITY", default_value_t = 0.0)]
    pub failure_probability: f64,

    /// Seed for the failure draws. Random when unset.
    #[arg(long, env = "DEEPSPACE_FAILURE_SEED")]
    pub failure_seed: Option<u64>,

    /// Serve Prometheus metrics on /metrics
    #[arg(long, env = "DEEPSPACE_METRICS", default_value_t = false)]
    pub metrics: bool,

    #[arg(long, env = "DEEPSPACE_EVENT_CAPACITY", default_value_t = DEFAULT_EVENT_CAPACITY)]
    pub event_capacity: usize,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.failure_probability == 0.0 {
            return FailurePolicy::Never;
        }
        FailurePolicy::Probability {
            probability: self.failure_probability,
            seed: self.failure_seed.unwrap_or_else(rand::random),
        }
    }

    /// Engine wired to a real-time clock running at `time_rate`
    pub fn build_engine(&self) -> LinkResult<LinkEngine> {
        let clock = TokioClock::with_rate(self.time_rate)?;
        LinkEngine::builder()
            .clock(Arc::new(clock))
            .failure_policy(self.failure_policy())
            .event_capacity(self.event_capacity)
            .build()
    }
}
