//! The minimal record model the DNSSEC core operates on.
//!
//! The core consumes and produces fully structured records; parsing and
//! composing complete DNS messages is outside its remit. This module
//! provides the handful of base types those records are made of.

pub mod iana;
pub mod name;
pub mod record;
pub mod serial;
pub mod wire;

pub use self::name::Name;
pub use self::record::{Record, Rrset, RrsetError, Ttl};
pub use self::serial::Serial;
