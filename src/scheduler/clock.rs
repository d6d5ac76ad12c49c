//! Time sources for the scheduler
//!
//! The scheduler only ever asks for "simulated time now" and "wake me at
//! this simulated instant". [`TokioClock`] maps that onto the Tokio timer,
//! optionally running faster than wall time. [`ManualClock`] only moves when
//! a test advances it.

use crate::scheduler::error::{SchedulerError, SchedulerResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub trait Clock: Send + Sync + fmt::Debug {
    /// Simulated time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Resolve once simulated time reaches `deadline`
    fn sleep_until(&self, deadline: Duration) -> BoxFuture<'static, ()>;

    /// Resolve once `duration` of simulated time has passed
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.sleep_until(self.now().saturating_add(duration))
    }
}

/// Tokio-backed clock. `rate` is simulated seconds per wall-clock second.
///
/// Under `tokio::time::pause` this clock follows Tokio's mocked time.
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
    rate: f64,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            rate: 1.0,
        }
    }

    pub fn with_rate(rate: f64) -> SchedulerResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SchedulerError::InvalidClockRate(rate));
        }
        Ok(Self {
            origin: tokio::time::Instant::now(),
            rate,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        let wall = self.origin.elapsed().as_secs_f64();
        Duration::try_from_secs_f64(wall * self.rate).unwrap_or(Duration::MAX)
    }

    fn sleep_until(&self, deadline: Duration) -> BoxFuture<'static, ()> {
        let wall = Duration::try_from_secs_f64(deadline.as_secs_f64() / self.rate)
            .unwrap_or(Duration::MAX);
        match self.origin.checked_add(wall) {
            Some(at) => tokio::time::sleep_until(at).boxed(),
            None => futures::future::pending().boxed(),
        }
    }
}

/// Virtual clock advanced explicitly with [`ManualClock::advance`].
///
/// Cloning yields a handle to the same clock.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<watch::Sender<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Duration::ZERO);
        Self { now: Arc::new(tx) }
    }

    /// Move time forward, waking every sleeper whose deadline has passed
    pub fn advance(&self, by: Duration) {
        self.now.send_modify(|now| *now = now.saturating_add(by));
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.borrow()
    }

    fn sleep_until(&self, deadline: Duration) -> BoxFuture<'static, ()> {
        let mut rx = self.now.subscribe();

        async move {
            loop {
                if *rx.borrow_and_update() >= deadline {
                    return;
                }
                if rx.changed().await.is_err() {
                    return;
                }
            }
        }
        .boxed()
    }
}
