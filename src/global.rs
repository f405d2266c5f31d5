// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The process-wide generator.

use crate::{Unqid, error::Error};
use std::sync::OnceLock;

static GLOBAL: OnceLock<Unqid> = OnceLock::new();

/// Initialize the process-wide generator with the default configuration.
///
/// Any error is fatal: the caller is expected to abort rather than carry on
/// without ids. Calling `init` again after a success is a no-op.
pub fn init() -> Result<(), Error> {
    install(Unqid::new)
}

/// Initialize the process-wide generator from a custom [`Builder`](crate::Builder).
pub fn init_with(builder: crate::Builder<'_>) -> Result<(), Error> {
    install(|| builder.finalize())
}

fn install(build: impl FnOnce() -> Result<Unqid, Error>) -> Result<(), Error> {
    if GLOBAL.get().is_some() {
        tracing::warn!("global unqid generator already initialized");
        return Ok(());
    }
    let unqid = build()?;
    if GLOBAL.set(unqid).is_err() {
        tracing::warn!("global unqid generator initialized concurrently, keeping the first");
    }
    Ok(())
}

/// The process-wide generator, if [`init`] has succeeded.
pub fn global() -> Option<&'static Unqid> {
    GLOBAL.get()
}

/// Generate the next id from the process-wide generator.
pub fn next() -> Result<u64, Error> {
    GLOBAL.get().ok_or(Error::NotInitialized)?.next_id()
}
