//! Wall-clock implementation of the `Clock` port.

use crate::application::ports::Clock;

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
