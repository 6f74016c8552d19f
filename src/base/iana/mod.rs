//! IANA definitions for the parts of the DNS this crate deals with.

#[macro_use]
mod macros;

pub mod class;
pub mod digestalg;
pub mod rtype;
pub mod secalg;

pub use self::class::Class;
pub use self::digestalg::DigestAlgorithm;
pub use self::rtype::Rtype;
pub use self::secalg::SecurityAlgorithm;

use core::fmt;

//------------ FromStrError --------------------------------------------------

/// A value could not be parsed from its string representation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FromStrError;

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unknown value")
    }
}

impl std::error::Error for FromStrError {}
