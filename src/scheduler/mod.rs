pub mod clock;
pub mod error;
pub mod failure;
pub mod scheduler;
pub mod state;
pub mod state_machine;

pub use clock::{Clock, ManualClock, TokioClock};
pub use error::{SchedulerError, SchedulerResult};
pub use failure::{FailureModel, FailurePolicy};
pub use scheduler::{StartOutcome, TransmissionScheduler};
pub use state::{InFlight, LinkState};
