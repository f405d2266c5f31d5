// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::builder::Builder;
use crate::clock::{Clock, elapsed_millis};
use crate::error::*;
use chrono::{DateTime, Duration, Utc};
use std::{
    hint,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// bit length of time
pub const BIT_LEN_TIME: u32 = 41;
/// bit length of machine id
pub const BIT_LEN_MACHINE_ID: u32 = 16;
/// bit length of sequence number
pub const BIT_LEN_SEQUENCE: u32 = 7;
/// largest sequence number that fits an id
pub const MAX_SEQUENCE: u64 = (1 << BIT_LEN_SEQUENCE) - 1;
/// largest elapsed time, in milliseconds, that fits an id
pub const MAX_TIMESTAMP: i64 = (1 << BIT_LEN_TIME) - 1;

/// shift of the machine id inside an id
const MACHINE_ID_SHIFT: u32 = BIT_LEN_SEQUENCE;
/// shift of the time inside an id
const TIME_SHIFT: u32 = BIT_LEN_MACHINE_ID + BIT_LEN_SEQUENCE;

/// Width of the sequence inside the packed state word. One bit wider than an id's
/// sequence so an exhausted counter is representable.
const STATE_BIT_LEN_SEQUENCE: u32 = BIT_LEN_SEQUENCE + 1;
const STATE_MASK_SEQUENCE: u64 = (1 << STATE_BIT_LEN_SEQUENCE) - 1;

/// Packs the last used elapsed time and sequence into one word.
pub(crate) fn pack_state(elapsed: u64, sequence: u64) -> u64 {
    (elapsed << STATE_BIT_LEN_SEQUENCE) | (sequence & STATE_MASK_SEQUENCE)
}

pub(crate) fn unpack_state(state: u64) -> (u64, u64) {
    (
        state >> STATE_BIT_LEN_SEQUENCE,
        state & STATE_MASK_SEQUENCE,
    )
}

/// State shared between clones of an [`Unqid`].
pub(crate) struct SharedUnqid {
    /// `(elapsed << 8) | sequence`, see [`pack_state`].
    pub(crate) state: AtomicU64,
    pub(crate) epoch: DateTime<Utc>,
    /// Already shifted into place.
    pub(crate) machine_id: u64,
    pub(crate) clock: Box<dyn Clock>,
}

/// Unqid is a unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads.
pub struct Unqid(pub(crate) Arc<SharedUnqid>);

impl Unqid {
    /// Create a new Unqid with the default configuration.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Unqid.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct an Unqid.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }

    pub(crate) fn new_inner(shared: Arc<SharedUnqid>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    ///
    /// Waits out clock rollbacks and sequence exhaustion. Fails only once the
    /// clock has passed [`end_of_life`](Self::end_of_life).
    pub fn next_id(&self) -> Result<u64, Error> {
        let mut rollback_seen = false;
        loop {
            let now = elapsed_millis(self.0.clock.as_ref(), self.0.epoch);
            if now > MAX_TIMESTAMP {
                return Err(Error::OverTimeLimit(now));
            }

            let current = self.0.state.load(Ordering::Acquire);
            let (elapsed, sequence) = unpack_state(current);

            if now < elapsed as i64 {
                if !rollback_seen {
                    rollback_seen = true;
                    tracing::debug!(now, elapsed, "clock moved backwards, waiting");
                }
                hint::spin_loop();
                continue;
            }

            let now = now as u64;
            let sequence = if now > elapsed {
                0
            } else if sequence < MAX_SEQUENCE {
                sequence + 1
            } else {
                // sequence exhausted for this millisecond
                hint::spin_loop();
                continue;
            };

            if self
                .0
                .state
                .compare_exchange_weak(
                    current,
                    pack_state(now, sequence),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .is_ok()
            {
                return Ok((now << TIME_SHIFT) | self.0.machine_id | sequence);
            }
        }
    }

    /// The machine id embedded in every id, unshifted.
    pub fn machine_id(&self) -> u16 {
        (self.0.machine_id >> MACHINE_ID_SHIFT) as u16
    }

    /// The instant all timestamps are measured from.
    pub fn epoch(&self) -> DateTime<Utc> {
        self.0.epoch
    }

    /// The first instant at which [`next_id`](Self::next_id) fails.
    pub fn end_of_life(&self) -> DateTime<Utc> {
        self.0.epoch + Duration::milliseconds(MAX_TIMESTAMP + 1)
    }
}

/// Returns a new `Unqid` referencing the same state as `self`.
impl Clone for Unqid {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// DecomposedId is the parts of an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedId {
    pub id: u64,
    pub time: u64,
    pub machine_id: u64,
    pub sequence: u64,
}

impl DecomposedId {
    /// Break an id up into its parts.
    pub fn decompose(id: u64) -> Self {
        Self {
            id,
            time: id >> TIME_SHIFT,
            machine_id: (id & MASK_MACHINE_ID) >> MACHINE_ID_SHIFT,
            sequence: id & MASK_SEQUENCE,
        }
    }

    /// The instant encoded in the id, given the epoch it was generated against.
    pub fn datetime(&self, epoch: DateTime<Utc>) -> DateTime<Utc> {
        epoch + Duration::milliseconds(self.time as i64)
    }
}

/// The mask for sequence.
const MASK_SEQUENCE: u64 = MAX_SEQUENCE;
/// The mask for machine ID.
const MASK_MACHINE_ID: u64 = ((1 << BIT_LEN_MACHINE_ID) - 1) << MACHINE_ID_SHIFT;

/// Break an id up into its parts.
pub fn decompose(id: u64) -> DecomposedId {
    DecomposedId::decompose(id)
}
