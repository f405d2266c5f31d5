// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::generator::MAX_TIMESTAMP;
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for collaborator failures.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
///
/// Every variant is fatal for the allocator that produced it. Clock rollbacks and
/// sequence overflows are absorbed by waiting and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("epoch `{0}` is ahead of current time")]
    EpochAheadOfCurrentTime(DateTime<Utc>),
    #[error("could not enumerate network interfaces: {0}")]
    InterfaceEnumerationFailed(#[source] BoxDynError),
    #[error("invalid interface address `{0}`")]
    InvalidAddress(String),
    #[error("no private ip address")]
    NoPrivateIPv4,
    #[error("machine_id returned an error: {0}")]
    MachineIdFailed(#[source] BoxDynError),
    #[error("check_machine_id returned false")]
    CheckMachineIdFailed,
    #[error("invalid machine id: 0")]
    ZeroMachineId,
    #[error("max time exceeded: {0}, maxtime: {max}", max = MAX_TIMESTAMP)]
    OverTimeLimit(i64),
    #[error("the global generator has not been initialized")]
    NotInitialized,
}
