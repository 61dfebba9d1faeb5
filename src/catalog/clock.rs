use std::time::{Duration, SystemTime};

pub type ClockType = Box<dyn Clock + Send + Sync>;

#[derive(Clone)]
pub struct SystemClock {}

pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;

    /// Returns the time elapsed between `time` and now.
    /// A `time` that lies in the future (the clock moved backwards) is treated as zero elapsed time.
    fn elapsed_since(&self, time: &SystemTime) -> Duration {
        self.now().duration_since(*time).unwrap_or(Duration::ZERO)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {}
    }

    pub fn boxed() -> ClockType {
        Box::new(SystemClock::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::{Add, Sub};
    use std::time::{Duration, SystemTime};

    use crate::catalog::clock::{Clock, SystemClock};
    use crate::catalog::clock::tests::setup::UnixEpochClock;

    mod setup {
        use std::time::SystemTime;

        use crate::catalog::clock::Clock;

        #[derive(Clone)]
        pub(crate) struct UnixEpochClock;

        impl Clock for UnixEpochClock {
            fn now(&self) -> SystemTime {
                SystemTime::UNIX_EPOCH
            }
        }
    }

    #[test]
    fn elapsed_since_a_past_time() {
        let clock = SystemClock::new();
        let elapsed = clock.elapsed_since(&SystemTime::now().sub(Duration::from_secs(60)));

        assert!(elapsed >= Duration::from_secs(60));
    }

    #[test]
    fn elapsed_since_a_future_time_is_zero() {
        let clock = UnixEpochClock {};
        let elapsed = clock.elapsed_since(&SystemTime::UNIX_EPOCH.add(Duration::from_secs(10)));

        assert_eq!(Duration::ZERO, elapsed);
    }
}
