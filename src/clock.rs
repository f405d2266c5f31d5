// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Duration, Utc};

/// A source of elapsed time.
///
/// The generator never assumes the clock is monotonic: a reading that goes
/// backwards is treated as a rollback and waited out.
pub trait Clock: Send + Sync {
    /// Returns the time elapsed since `instant`. May be negative.
    fn since(&self, instant: DateTime<Utc>) -> Duration;
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn since(&self, instant: DateTime<Utc>) -> Duration {
        Utc::now() - instant
    }
}

/// Whole milliseconds elapsed since `epoch` according to `clock`.
pub(crate) fn elapsed_millis(clock: &dyn Clock, epoch: DateTime<Utc>) -> i64 {
    clock.since(epoch).num_milliseconds()
}
