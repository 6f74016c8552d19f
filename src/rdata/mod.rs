//! Record data types.
//!
//! This module collects the record data types the DNSSEC core works with:
//! the DNSSEC record types themselves plus the few ordinary types needed to
//! exercise the canonical form rules (types whose record data embeds domain
//! names are canonicalized differently from those that do not).

pub mod dnssec;

pub use self::dnssec::{Dnskey, Ds, ProtoRrsig, Rrsig, Timestamp};

use core::fmt;

use std::vec::Vec;

use crate::base::iana::Rtype;
use crate::base::name::Name;
use crate::base::wire::Compose;

//------------ RecordData ----------------------------------------------------

/// A type representing record data.
pub trait RecordData {
    /// Returns the record type associated with this record data instance.
    fn rtype(&self) -> Rtype;
}

//------------ ComposeRecordData ---------------------------------------------

/// Record data that can be composed into its wire format.
pub trait ComposeRecordData: RecordData {
    /// Appends the wire format of the record data to the target.
    fn compose_rdata(&self, target: &mut Vec<u8>);

    /// Appends the canonical wire format of the record data to the target.
    ///
    /// For most record types this is identical to the plain wire format;
    /// types listed in [RFC 4034, section 6.2] lowercase the domain names
    /// embedded in their record data.
    ///
    /// [RFC 4034, section 6.2]: https://tools.ietf.org/html/rfc4034#section-6.2
    fn compose_canonical_rdata(&self, target: &mut Vec<u8>) {
        self.compose_rdata(target)
    }
}

//------------ Mx ------------------------------------------------------------

/// MX record data.
///
/// The mail exchange record is carried along mainly because its record data
/// contains a domain name and therefore exercises the name lowercasing rule
/// of the canonical form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mx {
    /// The preference value of this exchange.
    preference: u16,

    /// The name of the mail exchange.
    exchange: Name,
}

impl Mx {
    /// Creates new MX record data.
    pub fn new(preference: u16, exchange: Name) -> Self {
        Mx {
            preference,
            exchange,
        }
    }

    /// Returns the preference value.
    pub fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the name of the mail exchange.
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }
}

//--- RecordData and ComposeRecordData

impl RecordData for Mx {
    fn rtype(&self) -> Rtype {
        Rtype::MX
    }
}

impl ComposeRecordData for Mx {
    fn compose_rdata(&self, target: &mut Vec<u8>) {
        self.preference.compose(target);
        self.exchange.compose(target);
    }

    fn compose_canonical_rdata(&self, target: &mut Vec<u8>) {
        self.preference.compose(target);
        self.exchange.compose_canonical(target);
    }
}

//--- Display

impl fmt::Display for Mx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

//------------ Txt -----------------------------------------------------------

/// TXT record data.
///
/// The data is stored in wire format: a sequence of character strings, each
/// prefixed by its length.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Txt(Vec<u8>);

impl Txt {
    /// Builds TXT record data from a byte slice.
    ///
    /// The text is split into character strings of up to 255 octets each.
    pub fn build(text: &[u8]) -> Result<Self, LongRecordData> {
        let mut data = Vec::with_capacity(text.len() + 1);
        if text.is_empty() {
            data.push(0);
        } else {
            for chunk in text.chunks(255) {
                data.push(chunk.len() as u8);
                data.extend_from_slice(chunk);
            }
        }
        LongRecordData::check_len(data.len())?;
        Ok(Txt(data))
    }

    /// Returns the wire format record data.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

//--- RecordData and ComposeRecordData

impl RecordData for Txt {
    fn rtype(&self) -> Rtype {
        Rtype::TXT
    }
}

impl ComposeRecordData for Txt {
    fn compose_rdata(&self, target: &mut Vec<u8>) {
        target.extend_from_slice(&self.0)
    }
}

//--- Display

impl fmt::Display for Txt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut data = self.0.as_slice();
        let mut first = true;
        while let Some((&len, rest)) = data.split_first() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            let (string, rest) = rest.split_at(usize::from(len));
            f.write_str("\"")?;
            for &ch in string {
                if ch.is_ascii_graphic() && ch != b'"' && ch != b'\\' {
                    write!(f, "{}", ch as char)?;
                } else {
                    write!(f, "\\{:03}", ch)?;
                }
            }
            f.write_str("\"")?;
            data = rest;
        }
        Ok(())
    }
}

//============ Error Types ===================================================

//------------ LongRecordData ------------------------------------------------

/// The octets of a record data value are longer than 65,535 octets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LongRecordData(());

impl LongRecordData {
    /// Checks that the given length fits into record data.
    pub fn check_len(len: usize) -> Result<(), Self> {
        if len > usize::from(u16::MAX) {
            Err(LongRecordData(()))
        } else {
            Ok(())
        }
    }
}

//--- Display and Error

impl fmt::Display for LongRecordData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("record data too long")
    }
}

impl std::error::Error for LongRecordData {}
