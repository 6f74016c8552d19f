//! Resource records and RRsets.
//!
//! Records enter and leave the DNSSEC core as fully structured values; this
//! module provides the record and RRset shapes the engine operates on,
//! including the construction of the canonical byte form that signatures
//! are computed over.

use core::fmt;

use std::vec::Vec;

use crate::base::iana::{Class, Rtype};
use crate::base::name::Name;
use crate::base::wire::Compose;
use crate::rdata::ComposeRecordData;

//------------ Ttl -----------------------------------------------------------

/// A time-to-live value.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ttl(u32);

impl Ttl {
    /// Creates a value from a number of seconds.
    #[must_use]
    pub const fn from_secs(secs: u32) -> Self {
        Ttl(secs)
    }

    /// Returns the value as a number of seconds.
    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//------------ Record --------------------------------------------------------

/// A DNS resource record.
///
/// A record combines an owner name, class, and time-to-live with record
/// data of some type `D`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record<D> {
    /// The owner name of the record.
    owner: Name,

    /// The class of the record.
    class: Class,

    /// The time-to-live of the record.
    ttl: Ttl,

    /// The record data.
    data: D,
}

impl<D> Record<D> {
    /// Creates a new record from its parts.
    pub fn new(owner: Name, class: Class, ttl: Ttl, data: D) -> Self {
        Record {
            owner,
            class,
            ttl,
            data,
        }
    }

    /// Returns a reference to the owner name.
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// Returns the class of the record.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Returns the time-to-live of the record.
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Returns a reference to the record data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Converts the record into its data.
    pub fn into_data(self) -> D {
        self.data
    }
}

//--- Display

impl<D: ComposeRecordData + fmt::Display> fmt::Display for Record<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.owner,
            self.ttl,
            self.class,
            self.data.rtype(),
            self.data
        )
    }
}

//------------ Rrset ---------------------------------------------------------

/// A set of records sharing an owner name, class, and record type.
///
/// An RRset is a view over a slice of records. Construction checks that
/// every record indeed belongs to the set declared by the first record;
/// a record that differs in owner name, class, or record type makes the
/// input malformed.
#[derive(Clone, Debug)]
pub struct Rrset<'a, D> {
    /// The records of the RRset.
    records: &'a [Record<D>],
}

impl<'a, D: ComposeRecordData> Rrset<'a, D> {
    /// Creates an RRset from a slice of records.
    pub fn new(records: &'a [Record<D>]) -> Result<Self, RrsetError> {
        let Some(first) = records.first() else {
            return Err(RrsetError::Empty);
        };
        for record in &records[1..] {
            if record.owner() != first.owner()
                || record.class() != first.class()
                || record.data().rtype() != first.data().rtype()
            {
                return Err(RrsetError::MalformedRecord);
            }
        }
        Ok(Rrset { records })
    }

    /// Returns the owner name of the RRset.
    pub fn owner(&self) -> &Name {
        self.records[0].owner()
    }

    /// Returns the class of the RRset.
    pub fn class(&self) -> Class {
        self.records[0].class()
    }

    /// Returns the record type of the RRset.
    pub fn rtype(&self) -> Rtype {
        self.records[0].data().rtype()
    }

    /// Returns the time-to-live of the RRset.
    pub fn ttl(&self) -> Ttl {
        self.records[0].ttl()
    }

    /// Returns an iterator over the records of the RRset.
    pub fn iter(&self) -> impl Iterator<Item = &'a Record<D>> + '_ {
        self.records.iter()
    }

    /// Appends the canonical form of the RRset to the target.
    ///
    /// This is the `RR(1) | RR(2)...` portion of the signed data defined by
    /// [RFC 4034, section 6] and [RFC 4035, section 5.3.2]: for every record
    /// the owner name in canonical form, type, class, the *original* TTL
    /// taken from the covering RRSIG, the RDATA length, and the RDATA in
    /// canonical form.
    ///
    /// The records are ordered by their canonical RDATA, compared octet by
    /// octet as unsigned values; records with identical RDATA are treated
    /// as a single record ([RFC 4034, section 6.3]).
    ///
    /// If `rrsig_labels` is smaller than the number of labels in the owner
    /// name, the owner is replaced by the wildcard name the RRSIG was
    /// produced for, as demanded for expanded wildcards by [RFC 4035,
    /// section 5.3.2].
    ///
    /// [RFC 4034, section 6]: https://tools.ietf.org/html/rfc4034#section-6
    /// [RFC 4034, section 6.3]: https://tools.ietf.org/html/rfc4034#section-6.3
    /// [RFC 4035, section 5.3.2]: https://tools.ietf.org/html/rfc4035#section-5.3.2
    pub fn compose_canonical_form(
        &self,
        original_ttl: Ttl,
        rrsig_labels: u8,
        target: &mut Vec<u8>,
    ) {
        // The owner is the same for every record; build it once.
        let mut owner = Vec::new();
        let rrsig_labels = usize::from(rrsig_labels);
        if rrsig_labels < self.owner().label_count() {
            // name = "*." | the rightmost rrsig_labels labels of the owner
            owner.extend_from_slice(b"\x01*");
            self.owner()
                .suffix(rrsig_labels)
                .compose_canonical(&mut owner);
        } else {
            self.owner().compose_canonical(&mut owner);
        }

        let mut rdata: Vec<Vec<u8>> = self
            .records
            .iter()
            .map(|record| {
                let mut buf = Vec::new();
                record.data().compose_canonical_rdata(&mut buf);
                buf
            })
            .collect();
        rdata.sort();
        rdata.dedup();

        for data in rdata {
            target.extend_from_slice(&owner);
            self.rtype().compose(target);
            self.class().compose(target);
            original_ttl.as_secs().compose(target);
            u16::try_from(data.len()).expect("long record data")
                .compose(target);
            target.extend_from_slice(&data);
        }
    }
}

//============ Error Types ===================================================

//------------ RrsetError ----------------------------------------------------

/// A slice of records did not form a well-formed RRset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RrsetError {
    /// The record slice was empty.
    Empty,

    /// A record did not match the RRset's owner, class, or record type.
    MalformedRecord,
}

//--- Display and Error

impl fmt::Display for RrsetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            RrsetError::Empty => "empty record set",
            RrsetError::MalformedRecord => {
                "record does not match the record set"
            }
        })
    }
}

impl std::error::Error for RrsetError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::rdata::Txt;
    use core::str::FromStr;

    fn txt_record(owner: &str, text: &[u8]) -> Record<Txt> {
        Record::new(
            Name::from_str(owner).unwrap(),
            Class::IN,
            Ttl::from_secs(3600),
            Txt::build(text).unwrap(),
        )
    }

    #[test]
    fn mismatched_records() {
        let records = [
            txt_record("example.com.", b"foo"),
            txt_record("example.org.", b"bar"),
        ];
        assert_eq!(
            Rrset::new(&records).unwrap_err(),
            RrsetError::MalformedRecord
        );
        assert_eq!(
            Rrset::<Txt>::new(&[]).unwrap_err(),
            RrsetError::Empty
        );
    }

    #[test]
    fn canonical_order_and_dedup() {
        let records = [
            txt_record("example.com.", b"zz"),
            txt_record("Example.Com.", b"aa"),
            txt_record("example.com.", b"zz"),
        ];
        let rrset = Rrset::new(&records).unwrap();
        let mut buf = Vec::new();
        rrset.compose_canonical_form(Ttl::from_secs(3600), 2, &mut buf);

        let mut expected = Vec::new();
        for text in [&b"aa"[..], &b"zz"[..]] {
            expected.extend_from_slice(b"\x07example\x03com\x00");
            expected.extend_from_slice(b"\x00\x10"); // TXT
            expected.extend_from_slice(b"\x00\x01"); // IN
            expected.extend_from_slice(&3600u32.to_be_bytes());
            expected.extend_from_slice(&[0, 3, 2]);
            expected.extend_from_slice(text);
        }
        assert_eq!(buf, expected);
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let records = [
            txt_record("example.com.", b"b"),
            txt_record("example.com.", b"a"),
        ];
        let sorted = [
            txt_record("example.com.", b"a"),
            txt_record("example.com.", b"b"),
        ];
        let mut first = Vec::new();
        Rrset::new(&records).unwrap().compose_canonical_form(
            Ttl::from_secs(60),
            2,
            &mut first,
        );
        let mut second = Vec::new();
        Rrset::new(&sorted).unwrap().compose_canonical_form(
            Ttl::from_secs(60),
            2,
            &mut second,
        );
        assert_eq!(first, second);
    }

    #[test]
    fn wildcard_owner() {
        let records = [txt_record("a.z.w.example.", b"x")];
        let rrset = Rrset::new(&records).unwrap();
        let mut buf = Vec::new();
        rrset.compose_canonical_form(Ttl::from_secs(60), 2, &mut buf);
        assert!(buf.starts_with(b"\x01*\x01w\x07example\x00"));
    }
}
