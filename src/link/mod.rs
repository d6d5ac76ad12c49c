pub mod config;
pub mod error;
pub mod timing;

pub use config::LinkConfig;
pub use error::{ConfigError, ConfigResult};
pub use timing::{propagation_delay, serialization_delay, LinkTiming, SPEED_OF_LIGHT_M_S};
