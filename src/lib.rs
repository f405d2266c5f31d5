//! A monotonic 64-bit unique ID generator in the spirit of [Twitter's Snowflake].
//!
//! An id is laid out as
//!
//! ```text
//! | 41 bits: ms since epoch | 16 bits: machine id | 7 bits: sequence |
//! ```
//!
//! The machine id is the low 16 bits of the host's first private IPv4 address, so
//! processes on different hosts need no coordination. The default epoch is
//! 2021-01-01T00:00:00Z, which puts the end of life at 2090-09-07. Ids stay
//! below `i64::MAX` until 2055-11-04, after which the top bit is set.
//!
//! At most 128 ids are issued per millisecond; further callers wait for the next
//! millisecond. If the clock moves backwards, callers wait until it catches up with
//! the last issued timestamp.
//!
//! ## Quickstart
//!
//! ```no_run
//! # fn main() -> Result<(), unqid::Error> {
//! unqid::init()?;
//! let id = unqid::next()?;
//! println!("{}", id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrent use
//!
//! Unqid is thread safe. `clone` it before moving to another thread:
//! ```
//! use unqid::Unqid;
//! use std::thread;
//!
//! let sf = Unqid::builder().machine_id(&|| Ok(42)).finalize().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod clock;
mod error;
mod generator;
mod global;
mod machine;

pub use crate::generator::*;
pub use builder::*;
pub use clock::{Clock, SystemClock};
pub use error::*;
pub use global::*;
pub use machine::*;
