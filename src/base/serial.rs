//! Serial numbers.
//!
//! DNS uses 32 bit serial numbers with sequence space arithmetic defined in
//! [RFC 1982] in various places, most relevantly for this crate in the
//! inception and expiration fields of RRSIG records.
//!
//! [RFC 1982]: https://tools.ietf.org/html/rfc1982

use core::cmp;
use core::fmt;
use core::str::FromStr;

use std::time::{SystemTime, UNIX_EPOCH};

//------------ Serial --------------------------------------------------------

/// A serial number.
///
/// Serial numbers are 32 bit unsigned integers with a circular order: a
/// serial is considered smaller than another if the wrapping distance to it
/// is less than half the sequence space. Two serials exactly half the space
/// apart are not comparable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Serial(pub u32);

impl Serial {
    /// Returns a serial number for the current Unix time.
    #[must_use]
    pub fn now() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before Unix epoch");
        Serial(now.as_secs() as u32)
    }

    /// Returns the raw integer value of the serial number.
    #[must_use]
    pub fn into_int(self) -> u32 {
        self.0
    }

    /// Returns the serial number increased by `other` seconds.
    ///
    /// Addition wraps around the end of the sequence space.
    #[must_use]
    pub fn add(self, other: u32) -> Self {
        Serial(self.0.wrapping_add(other))
    }
}

//--- From and FromStr

impl From<u32> for Serial {
    fn from(value: u32) -> Self {
        Serial(value)
    }
}

impl From<Serial> for u32 {
    fn from(value: Serial) -> Self {
        value.0
    }
}

impl FromStr for Serial {
    type Err = <u32 as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u32::from_str(s).map(Serial)
    }
}

//--- PartialOrd

impl cmp::PartialOrd for Serial {
    fn partial_cmp(&self, other: &Serial) -> Option<cmp::Ordering> {
        match self.0.cmp(&other.0) {
            cmp::Ordering::Equal => Some(cmp::Ordering::Equal),
            _ => match other.0.wrapping_sub(self.0) {
                0x8000_0000 => None,
                d if d < 0x8000_0000 => Some(cmp::Ordering::Less),
                _ => Some(cmp::Ordering::Greater),
            },
        }
    }
}

//--- Display

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequence_space_order() {
        assert!(Serial(12) < Serial(13));
        assert!(Serial(0xFFFF_FFFF) < Serial(0));
        assert!(Serial(0) > Serial(0xFFFF_FFFF));
        assert!(Serial(0x7FFF_FFFF) < Serial(0x8000_0000));
        assert_eq!(
            Serial(0).partial_cmp(&Serial(0x8000_0000)),
            None
        );
    }

    #[test]
    fn add_wraps() {
        assert_eq!(Serial(0xFFFF_FFFF).add(2), Serial(1));
    }
}
