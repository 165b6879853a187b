use std::{
    thread,
    time::{Duration, Instant},
};

use crate::constants::MIN_GEOCODE_INTERVAL_MS;

type Sleeper = Box<dyn FnMut(Duration) + Send>;

/// Keeps at least `interval` between the end of one outbound request and the
/// start of the next.
pub(crate) struct Throttle {
    interval: Duration,
    last_request: Option<Instant>,
    sleeper: Sleeper,
}

impl Throttle {
    /// Intervals below the service's policy floor are raised to it.
    pub(crate) fn new(interval: Duration) -> Self {
        let floor = Duration::from_millis(MIN_GEOCODE_INTERVAL_MS);
        if interval < floor {
            log::warn!(
                "geocoder.throttle: interval_ms={} below floor, using {}",
                interval.as_millis(),
                floor.as_millis()
            );
        }
        Self {
            interval: interval.max(floor),
            last_request: None,
            sleeper: Box::new(thread::sleep),
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until the next request may go out. Returns the pause taken.
    pub(crate) fn wait(&mut self) -> Duration {
        let Some(last) = self.last_request else {
            return Duration::ZERO;
        };
        let pause = self.interval.saturating_sub(last.elapsed());
        if !pause.is_zero() {
            log::trace!("geocoder.throttle: sleep_ms={}", pause.as_millis());
            (self.sleeper)(pause);
        }
        pause
    }

    /// Marks the end of a request, successful or not.
    pub(crate) fn record(&mut self) {
        self.last_request = Some(Instant::now());
    }

    #[cfg(test)]
    pub(crate) fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + Send + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }
}
