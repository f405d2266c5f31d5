use crate::Unqid;
use crate::clock::{Clock, SystemClock, elapsed_millis};
use crate::error::{BoxDynError, Error};
use crate::generator::{BIT_LEN_SEQUENCE, MAX_TIMESTAMP, SharedUnqid, pack_state};
use crate::machine::{InterfaceAddr, interface_addrs, private_ipv4_machine_id};
use chrono::prelude::*;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

/// A builder for building the ['Unqid'] generator.
///
/// [`Unqid`]: struct.Unqid.html
pub struct Builder<'a> {
    epoch: Option<DateTime<Utc>>,
    machine_id: Option<&'a dyn Fn() -> Result<u16, BoxDynError>>,
    check_machine_id: Option<&'a dyn Fn(u16) -> bool>,
    interface_addrs: Option<&'a dyn Fn() -> Result<Vec<InterfaceAddr>, BoxDynError>>,
    clock: Option<Box<dyn Clock>>,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

/// Default epoch, 2021-01-01T00:00:00Z.
pub fn default_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::milliseconds(1_609_459_200_000)
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of ['Unqid'].
    ///
    /// [`Unqid`]: struct.Unqid.html
    pub fn new() -> Self {
        Self {
            epoch: None,
            machine_id: None,
            check_machine_id: None,
            interface_addrs: None,
            clock: None,
        }
    }

    /// Set the epoch.
    /// If the epoch is later than the current time, 'finalize' will fail.
    pub fn epoch(mut self, epoch: DateTime<Utc>) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Set the machine ID instead of deriving it from the host's private IPv4 address.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn machine_id(mut self, machine_id: &'a dyn Fn() -> Result<u16, BoxDynError>) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Set up a function to check the machine ID.
    /// If the function returns 'false', 'finalize' will fail.
    pub fn check_machine_id(mut self, check_machine_id: &'a dyn Fn(u16) -> bool) -> Self {
        self.check_machine_id = Some(check_machine_id);
        self
    }

    /// Replace the interface enumerator used to derive the machine ID.
    pub fn interface_addrs(
        mut self,
        interface_addrs: &'a dyn Fn() -> Result<Vec<InterfaceAddr>, BoxDynError>,
    ) -> Self {
        self.interface_addrs = Some(interface_addrs);
        self
    }

    /// Replace the clock. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Finish building and create an Unqid instance.
    /// This method will return an error if any of the configured functions return an error or if validation fails.
    pub fn finalize(self) -> Result<Unqid, Error> {
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let epoch = self.epoch.unwrap_or_else(default_epoch);

        let machine_id = if let Some(machine_id_fn) = self.machine_id {
            machine_id_fn().map_err(Error::MachineIdFailed)?
        } else if let Some(interface_addrs_fn) = self.interface_addrs {
            private_ipv4_machine_id(interface_addrs_fn)?
        } else {
            private_ipv4_machine_id(&interface_addrs)?
        };

        // an address whose low 16 bits are zero is indistinguishable from "not set"
        if machine_id == 0 {
            return Err(Error::ZeroMachineId);
        }

        if let Some(check_machine_id) = self.check_machine_id
            && !check_machine_id(machine_id)
        {
            return Err(Error::CheckMachineIdFailed);
        }

        let elapsed = elapsed_millis(clock.as_ref(), epoch);
        if elapsed < 0 {
            return Err(Error::EpochAheadOfCurrentTime(epoch));
        }
        if elapsed > MAX_TIMESTAMP {
            return Err(Error::OverTimeLimit(elapsed));
        }

        tracing::info!(machine_id, %epoch, elapsed, "unqid generator initialized");

        let shared = Arc::new(SharedUnqid {
            state: AtomicU64::new(pack_state(elapsed as u64, 0)),
            epoch,
            machine_id: u64::from(machine_id) << BIT_LEN_SEQUENCE,
            clock,
        });
        Ok(Unqid::new_inner(shared))
    }
}
