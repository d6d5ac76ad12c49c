use crate::scheduler::error::{SchedulerError, SchedulerResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// When a finished transmission is reported as lost.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum FailurePolicy {
    /// Every transmission succeeds
    #[default]
    Never,
    /// Each transmission fails independently with `probability`, drawn
    /// from an RNG seeded with `seed`
    Probability { probability: f64, seed: u64 },
}

/// Runtime state for a [`FailurePolicy`]
#[derive(Debug)]
pub struct FailureModel {
    policy: FailurePolicy,
    rng: Option<StdRng>,
}

impl Default for FailureModel {
    fn default() -> Self {
        Self {
            policy: FailurePolicy::Never,
            rng: None,
        }
    }
}

impl FailureModel {
    pub fn new(policy: FailurePolicy) -> SchedulerResult<Self> {
        let rng = match policy {
            FailurePolicy::Never => None,
            FailurePolicy::Probability { probability, seed } => {
                if !(0.0..=1.0).contains(&probability) {
                    return Err(SchedulerError::InvalidFailureProbability(probability));
                }
                Some(StdRng::seed_from_u64(seed))
            }
        };
        Ok(Self { policy, rng })
    }

    /// Decide the fate of one transmission
    pub fn should_fail(&mut self) -> bool {
        match (self.policy, self.rng.as_mut()) {
            (FailurePolicy::Probability { probability, .. }, Some(rng)) => {
                rng.gen_bool(probability)
            }
            _ => false,
        }
    }
}
