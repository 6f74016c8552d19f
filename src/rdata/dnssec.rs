//! Record data for the DNSSEC record types.
//!
//! This module provides the record data types defined in [RFC 4034]:
//! DNSKEY, RRSIG, and DS, together with the [`Timestamp`] type used for
//! signature inception and expiration times.
//!
//! [RFC 4034]: https://tools.ietf.org/html/rfc4034

use core::cmp;
use core::fmt;
use core::hash;
use core::str::FromStr;

use std::vec::Vec;

use time::{Date, Month, PrimitiveDateTime, Time};

use crate::base::iana::{DigestAlgorithm, Rtype, SecurityAlgorithm};
use crate::base::name::Name;
use crate::base::record::Ttl;
use crate::base::serial::Serial;
use crate::base::wire::Compose;
use crate::rdata::{ComposeRecordData, LongRecordData, RecordData};
use crate::utils::base64;

//------------ Dnskey --------------------------------------------------------

/// DNSKEY record data.
///
/// The DNSKEY record stores a public key used to verify RRSIG records.
/// See [RFC 4034, section 2].
///
/// [RFC 4034, section 2]: https://tools.ietf.org/html/rfc4034#section-2
#[derive(Clone)]
pub struct Dnskey<Octs> {
    flags: u16,
    protocol: u8,
    algorithm: SecurityAlgorithm,
    public_key: Octs,
}

impl Dnskey<()> {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::DNSKEY;
}

impl<Octs> Dnskey<Octs> {
    /// Creates new DNSKEY record data from its parts.
    pub fn new(
        flags: u16,
        protocol: u8,
        algorithm: SecurityAlgorithm,
        public_key: Octs,
    ) -> Result<Self, LongRecordData>
    where
        Octs: AsRef<[u8]>,
    {
        LongRecordData::check_len(
            usize::from(
                u16::COMPOSE_LEN
                    + u8::COMPOSE_LEN
                    + SecurityAlgorithm::COMPOSE_LEN,
            )
            .checked_add(public_key.as_ref().len())
            .expect("long key"),
        )?;
        Ok(Dnskey {
            flags,
            protocol,
            algorithm,
            public_key,
        })
    }

    /// Returns the flags field.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Returns the protocol field.
    ///
    /// For DNSSEC the value must be 3.
    pub fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Returns the algorithm of the key.
    pub fn algorithm(&self) -> SecurityAlgorithm {
        self.algorithm
    }

    /// Returns a reference to the public key field.
    pub fn public_key(&self) -> &Octs {
        &self.public_key
    }

    /// Converts the record data into the public key field.
    pub fn into_public_key(self) -> Octs {
        self.public_key
    }

    /// Returns whether the Revoke flag is set.
    ///
    /// See [RFC 5011, Section 3].
    ///
    /// [RFC 5011, Section 3]: https://tools.ietf.org/html/rfc5011#section-3
    pub fn is_revoked(&self) -> bool {
        self.flags() & 0b0000_0000_1000_0000 != 0
    }

    /// Returns whether the the Secure Entry Point (SEP) flag is set.
    ///
    /// See [RFC 4034, Section 2.1.1]:
    ///
    /// > This flag is only intended to be a hint to zone signing or
    /// > debugging software as to the intended use of this DNSKEY record;
    /// > validators MUST NOT alter their behavior during the signature
    /// > validation process in any way based on the setting of this bit.
    ///
    /// [RFC 4034, Section 2.1.1]: https://tools.ietf.org/html/rfc4034#section-2.1.1
    pub fn is_secure_entry_point(&self) -> bool {
        self.flags() & 0b0000_0000_0000_0001 != 0
    }

    /// Returns whether the Zone Key flag is set.
    ///
    /// If the flag is not set, the key MUST NOT be used to verify RRSIGs
    /// that cover RRsets. See [RFC 4034, Section 2.1.1].
    ///
    /// [RFC 4034, Section 2.1.1]: https://tools.ietf.org/html/rfc4034#section-2.1.1
    pub fn is_zone_key(&self) -> bool {
        self.flags() & 0b0000_0001_0000_0000 != 0
    }

    /// Returns the key tag for this DNSKEY data.
    ///
    /// The key tag is a checksum over the record data defined in
    /// [RFC 4034, appendix B]. It is a pure function of the record data
    /// octets and identifies a key only approximately: distinct keys can
    /// share a tag.
    ///
    /// [RFC 4034, appendix B]: https://tools.ietf.org/html/rfc4034#appendix-B
    pub fn key_tag(&self) -> u16
    where
        Octs: AsRef<[u8]>,
    {
        if self.algorithm == SecurityAlgorithm::RSAMD5 {
            // The key tag is third-to-last and second-to-last octets of the
            // key as a big-endian u16. If we don't have enough octets in the
            // key, we return 0.
            let len = self.public_key.as_ref().len();
            if len > 2 {
                u16::from_be_bytes(
                    self.public_key.as_ref()[len - 3..len - 1]
                        .try_into()
                        .unwrap(),
                )
            } else {
                0
            }
        } else {
            // Treat record data as an octet sequence. Add octets at odd
            // indexes as they are, add octets at even indexes shifted left
            // by 8 bits.
            let mut res = u32::from(self.flags);
            res += u32::from(self.protocol) << 8;
            res += u32::from(self.algorithm.to_int());
            let mut iter = self.public_key.as_ref().iter();
            loop {
                match iter.next() {
                    Some(&x) => res += u32::from(x) << 8,
                    None => break,
                }
                match iter.next() {
                    Some(&x) => res += u32::from(x),
                    None => break,
                }
            }
            res += (res >> 16) & 0xFFFF;
            (res & 0xFFFF) as u16
        }
    }

    /// Converts the octets of the public key into a vec.
    pub fn to_vec(&self) -> Dnskey<Vec<u8>>
    where
        Octs: AsRef<[u8]>,
    {
        Dnskey {
            flags: self.flags,
            protocol: self.protocol,
            algorithm: self.algorithm,
            public_key: self.public_key.as_ref().to_vec(),
        }
    }
}

//--- PartialEq and Eq

impl<Octs, Other> PartialEq<Dnskey<Other>> for Dnskey<Octs>
where
    Octs: AsRef<[u8]>,
    Other: AsRef<[u8]>,
{
    fn eq(&self, other: &Dnskey<Other>) -> bool {
        self.flags == other.flags
            && self.protocol == other.protocol
            && self.algorithm == other.algorithm
            && self.public_key.as_ref() == other.public_key.as_ref()
    }
}

impl<Octs: AsRef<[u8]>> Eq for Dnskey<Octs> {}

//--- Hash

impl<Octs: AsRef<[u8]>> hash::Hash for Dnskey<Octs> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.flags.hash(state);
        self.protocol.hash(state);
        self.algorithm.hash(state);
        self.public_key.as_ref().hash(state);
    }
}

//--- RecordData and ComposeRecordData

impl<Octs> RecordData for Dnskey<Octs> {
    fn rtype(&self) -> Rtype {
        Dnskey::RTYPE
    }
}

impl<Octs: AsRef<[u8]>> ComposeRecordData for Dnskey<Octs> {
    fn compose_rdata(&self, target: &mut Vec<u8>) {
        self.flags.compose(target);
        self.protocol.compose(target);
        self.algorithm.compose(target);
        target.extend_from_slice(self.public_key.as_ref());
    }
}

//--- Display and Debug

impl<Octs: AsRef<[u8]>> fmt::Display for Dnskey<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {} ", self.flags, self.protocol, self.algorithm)?;
        base64::display(&self.public_key, f)
    }
}

impl<Octs: AsRef<[u8]>> fmt::Debug for Dnskey<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Dnskey")
            .field("flags", &self.flags)
            .field("protocol", &self.protocol)
            .field("algorithm", &self.algorithm)
            .field("public_key", &self.public_key.as_ref())
            .finish()
    }
}

//------------ ProtoRrsig ----------------------------------------------------

/// The RRSIG RDATA to be included when creating the signature.
///
/// This is an RRSIG without its signature field. Composing its canonical
/// form produces the `RRSIG_RDATA` prefix of the signed data of [RFC 4035,
/// section 5.3.2]; once the signature octets exist, [`into_rrsig`] completes
/// the record data.
///
/// [`into_rrsig`]: ProtoRrsig::into_rrsig
/// [RFC 4035, section 5.3.2]: https://tools.ietf.org/html/rfc4035#section-5.3.2
#[derive(Clone, Debug)]
pub struct ProtoRrsig {
    type_covered: Rtype,
    algorithm: SecurityAlgorithm,
    labels: u8,
    original_ttl: Ttl,
    expiration: Timestamp,
    inception: Timestamp,
    key_tag: u16,
    signer_name: Name,
}

impl ProtoRrsig {
    /// Creates a new prototype RRSIG from its parts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: Rtype,
        algorithm: SecurityAlgorithm,
        labels: u8,
        original_ttl: Ttl,
        expiration: Timestamp,
        inception: Timestamp,
        key_tag: u16,
        signer_name: Name,
    ) -> Self {
        ProtoRrsig {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
        }
    }

    /// Appends the canonical form of the record data to the target.
    ///
    /// The signer name is composed in canonical form as required by
    /// [RFC 4034, section 3.1.7].
    ///
    /// [RFC 4034, section 3.1.7]: https://tools.ietf.org/html/rfc4034#section-3.1.7
    pub fn compose_canonical(&self, target: &mut Vec<u8>) {
        self.type_covered.compose(target);
        self.algorithm.compose(target);
        self.labels.compose(target);
        self.original_ttl.as_secs().compose(target);
        self.expiration.compose(target);
        self.inception.compose(target);
        self.key_tag.compose(target);
        self.signer_name.compose_canonical(target);
    }

    /// Converts the prototype into a complete RRSIG.
    pub fn into_rrsig<Octs: AsRef<[u8]>>(
        self,
        signature: Octs,
    ) -> Result<Rrsig<Octs>, LongRecordData> {
        Rrsig::new(
            self.type_covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer_name,
            signature,
        )
    }
}

//------------ Timestamp -----------------------------------------------------

/// The inception and expiration times of an RRSIG record.
///
/// The times are given as seconds since the Unix epoch, stored as a
/// [`Serial`] so that the sequence space arithmetic of [RFC 4034, section
/// 3.1.5] applies.
///
/// [RFC 4034, section 3.1.5]: https://tools.ietf.org/html/rfc4034#section-3.1.5
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timestamp(Serial);

impl Timestamp {
    /// Returns a timestamp for the current time.
    #[must_use]
    pub fn now() -> Self {
        Timestamp(Serial::now())
    }

    /// Returns the timestamp as a raw integer.
    #[must_use]
    pub fn into_int(self) -> u32 {
        self.0.into_int()
    }

    /// Returns the timestamp increased by `secs` seconds.
    #[must_use]
    pub fn add(self, secs: u32) -> Self {
        Timestamp(self.0.add(secs))
    }

    /// Appends the wire format of the timestamp to the target.
    pub fn compose(&self, target: &mut Vec<u8>) {
        self.0.into_int().compose(target)
    }
}

//--- From and FromStr

impl From<u32> for Timestamp {
    fn from(value: u32) -> Self {
        Timestamp(Serial(value))
    }
}

impl FromStr for Timestamp {
    type Err = IllegalSignatureTime;

    /// Parses a timestamp value from a string.
    ///
    /// The presentation format can either be their integer value or a
    /// specific date in `YYYYMMDDHHmmSS` format.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        if !src.is_ascii() {
            return Err(IllegalSignatureTime(()));
        }
        if src.len() == 14 {
            let year = u32::from_str(&src[0..4])
                .map_err(|_| IllegalSignatureTime(()))?
                as i32;
            let month = Month::try_from(
                u8::from_str(&src[4..6])
                    .map_err(|_| IllegalSignatureTime(()))?,
            )
            .map_err(|_| IllegalSignatureTime(()))?;
            let day = u8::from_str(&src[6..8])
                .map_err(|_| IllegalSignatureTime(()))?;
            let hour = u8::from_str(&src[8..10])
                .map_err(|_| IllegalSignatureTime(()))?;
            let minute = u8::from_str(&src[10..12])
                .map_err(|_| IllegalSignatureTime(()))?;
            let second = u8::from_str(&src[12..14])
                .map_err(|_| IllegalSignatureTime(()))?;
            Ok(Timestamp(Serial(
                PrimitiveDateTime::new(
                    Date::from_calendar_date(year, month, day)
                        .map_err(|_| IllegalSignatureTime(()))?,
                    Time::from_hms(hour, minute, second)
                        .map_err(|_| IllegalSignatureTime(()))?,
                )
                .assume_utc()
                .unix_timestamp() as u32,
            )))
        } else {
            Serial::from_str(src)
                .map(Timestamp)
                .map_err(|_| IllegalSignatureTime(()))
        }
    }
}

//--- PartialOrd

impl cmp::PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

//--- Display

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//------------ Rrsig ---------------------------------------------------------

/// RRSIG record data.
///
/// The RRSIG record carries the signature for an RRset together with the
/// information necessary to reconstruct the signed data. See [RFC 4034,
/// section 3].
///
/// [RFC 4034, section 3]: https://tools.ietf.org/html/rfc4034#section-3
#[derive(Clone)]
pub struct Rrsig<Octs> {
    type_covered: Rtype,
    algorithm: SecurityAlgorithm,
    labels: u8,
    original_ttl: Ttl,
    expiration: Timestamp,
    inception: Timestamp,
    key_tag: u16,
    signer_name: Name,
    signature: Octs,
}

impl Rrsig<()> {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::RRSIG;
}

impl<Octs> Rrsig<Octs> {
    /// Creates new RRSIG record data from its parts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: Rtype,
        algorithm: SecurityAlgorithm,
        labels: u8,
        original_ttl: Ttl,
        expiration: Timestamp,
        inception: Timestamp,
        key_tag: u16,
        signer_name: Name,
        signature: Octs,
    ) -> Result<Self, LongRecordData>
    where
        Octs: AsRef<[u8]>,
    {
        LongRecordData::check_len(
            18usize
                .checked_add(signer_name.as_octets().len())
                .and_then(|len| len.checked_add(signature.as_ref().len()))
                .expect("long signature"),
        )?;
        Ok(Rrsig {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer_name,
            signature,
        })
    }

    /// Returns the record type covered by the signature.
    pub fn type_covered(&self) -> Rtype {
        self.type_covered
    }

    /// Returns the algorithm of the signature.
    pub fn algorithm(&self) -> SecurityAlgorithm {
        self.algorithm
    }

    /// Returns the label count of the signed owner name.
    pub fn labels(&self) -> u8 {
        self.labels
    }

    /// Returns the original TTL of the signed RRset.
    pub fn original_ttl(&self) -> Ttl {
        self.original_ttl
    }

    /// Returns the expiration time of the signature.
    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    /// Returns the inception time of the signature.
    pub fn inception(&self) -> Timestamp {
        self.inception
    }

    /// Returns the key tag of the key the signature was made with.
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns a reference to the signer name.
    pub fn signer_name(&self) -> &Name {
        &self.signer_name
    }

    /// Returns a reference to the signature octets.
    pub fn signature(&self) -> &Octs {
        &self.signature
    }
}

//--- PartialEq and Eq

impl<Octs, Other> PartialEq<Rrsig<Other>> for Rrsig<Octs>
where
    Octs: AsRef<[u8]>,
    Other: AsRef<[u8]>,
{
    fn eq(&self, other: &Rrsig<Other>) -> bool {
        self.type_covered == other.type_covered
            && self.algorithm == other.algorithm
            && self.labels == other.labels
            && self.original_ttl == other.original_ttl
            && self.expiration == other.expiration
            && self.inception == other.inception
            && self.key_tag == other.key_tag
            && self.signer_name == other.signer_name
            && self.signature.as_ref() == other.signature.as_ref()
    }
}

impl<Octs: AsRef<[u8]>> Eq for Rrsig<Octs> {}

//--- RecordData and ComposeRecordData

impl<Octs> RecordData for Rrsig<Octs> {
    fn rtype(&self) -> Rtype {
        Rrsig::RTYPE
    }
}

impl<Octs: AsRef<[u8]>> ComposeRecordData for Rrsig<Octs> {
    fn compose_rdata(&self, target: &mut Vec<u8>) {
        self.type_covered.compose(target);
        self.algorithm.compose(target);
        self.labels.compose(target);
        self.original_ttl.as_secs().compose(target);
        self.expiration.compose(target);
        self.inception.compose(target);
        self.key_tag.compose(target);
        // The signer name is not lowercased here. RFC 4034 asked for the
        // canonical form but this was reversed by RFC 6840, section 5.1.
        self.signer_name.compose(target);
        target.extend_from_slice(self.signature.as_ref());
    }
}

//--- Display and Debug

impl<Octs: AsRef<[u8]>> fmt::Display for Rrsig<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} ",
            self.type_covered,
            self.algorithm.to_int(),
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer_name
        )?;
        base64::display(self.signature.as_ref(), f)
    }
}

impl<Octs: AsRef<[u8]>> fmt::Debug for Rrsig<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Rrsig")
            .field("type_covered", &self.type_covered)
            .field("algorithm", &self.algorithm)
            .field("labels", &self.labels)
            .field("original_ttl", &self.original_ttl)
            .field("expiration", &self.expiration)
            .field("inception", &self.inception)
            .field("key_tag", &self.key_tag)
            .field("signer_name", &self.signer_name)
            .field("signature", &self.signature.as_ref())
            .finish()
    }
}

//------------ Ds ------------------------------------------------------------

/// DS record data.
///
/// The delegation signer record holds a digest of a DNSKEY record published
/// by a child zone. See [RFC 4034, section 5]. DS records are derived from
/// DNSKEY records, never constructed from independent parts.
///
/// [RFC 4034, section 5]: https://tools.ietf.org/html/rfc4034#section-5
#[derive(Clone)]
pub struct Ds<Octs> {
    key_tag: u16,
    algorithm: SecurityAlgorithm,
    digest_type: DigestAlgorithm,
    digest: Octs,
}

impl Ds<()> {
    /// The rtype of this record data type.
    pub(crate) const RTYPE: Rtype = Rtype::DS;
}

impl<Octs> Ds<Octs> {
    /// Creates new DS record data from its parts.
    pub fn new(
        key_tag: u16,
        algorithm: SecurityAlgorithm,
        digest_type: DigestAlgorithm,
        digest: Octs,
    ) -> Result<Self, LongRecordData>
    where
        Octs: AsRef<[u8]>,
    {
        LongRecordData::check_len(
            4usize
                .checked_add(digest.as_ref().len())
                .expect("long digest"),
        )?;
        Ok(Ds {
            key_tag,
            algorithm,
            digest_type,
            digest,
        })
    }

    /// Returns the key tag of the key the digest is for.
    pub fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns the algorithm of the key the digest is for.
    pub fn algorithm(&self) -> SecurityAlgorithm {
        self.algorithm
    }

    /// Returns the digest type used for the digest.
    pub fn digest_type(&self) -> DigestAlgorithm {
        self.digest_type
    }

    /// Returns a reference to the digest octets.
    pub fn digest(&self) -> &Octs {
        &self.digest
    }
}

//--- PartialEq and Eq

impl<Octs, Other> PartialEq<Ds<Other>> for Ds<Octs>
where
    Octs: AsRef<[u8]>,
    Other: AsRef<[u8]>,
{
    fn eq(&self, other: &Ds<Other>) -> bool {
        self.key_tag == other.key_tag
            && self.algorithm == other.algorithm
            && self.digest_type == other.digest_type
            && self.digest.as_ref() == other.digest.as_ref()
    }
}

impl<Octs: AsRef<[u8]>> Eq for Ds<Octs> {}

//--- RecordData and ComposeRecordData

impl<Octs> RecordData for Ds<Octs> {
    fn rtype(&self) -> Rtype {
        Ds::RTYPE
    }
}

impl<Octs: AsRef<[u8]>> ComposeRecordData for Ds<Octs> {
    fn compose_rdata(&self, target: &mut Vec<u8>) {
        self.key_tag.compose(target);
        self.algorithm.compose(target);
        self.digest_type.compose(target);
        target.extend_from_slice(self.digest.as_ref());
    }
}

//--- Display and Debug

impl<Octs: AsRef<[u8]>> fmt::Display for Ds<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            self.key_tag,
            self.algorithm.to_int(),
            self.digest_type.to_int()
        )?;
        for ch in self.digest.as_ref() {
            write!(f, "{:02X}", ch)?
        }
        Ok(())
    }
}

impl<Octs: AsRef<[u8]>> fmt::Debug for Ds<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Ds")
            .field("key_tag", &self.key_tag)
            .field("algorithm", &self.algorithm)
            .field("digest_type", &self.digest_type)
            .field("digest", &self.digest.as_ref())
            .finish()
    }
}

//============ Error Types ===================================================

//------------ IllegalSignatureTime ------------------------------------------

/// A signature time was not a valid timestamp.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IllegalSignatureTime(());

impl fmt::Display for IllegalSignatureTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("illegal signature time")
    }
}

impl std::error::Error for IllegalSignatureTime {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_tag_is_pure() {
        let key = base64::decode("AwEAAaz/tAm8").unwrap();
        let dnskey = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::RSASHA256,
            key.clone(),
        )
        .unwrap();
        let copy =
            Dnskey::new(256, 3, SecurityAlgorithm::RSASHA256, key).unwrap();
        assert_eq!(dnskey.key_tag(), copy.key_tag());
    }

    #[test]
    fn key_tag_rsamd5() {
        let dnskey = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::RSAMD5,
            vec![1, 2, 3, 4, 5],
        )
        .unwrap();
        assert_eq!(dnskey.key_tag(), u16::from_be_bytes([3, 4]));
    }

    #[test]
    fn timestamp_from_str() {
        assert_eq!(
            Timestamp::from_str("20210921162830").unwrap(),
            Timestamp::from(1632241710)
        );
        assert_eq!(
            Timestamp::from_str("1560211200").unwrap(),
            Timestamp::from(1560211200)
        );
        assert!(Timestamp::from_str("20211321162830").is_err());
        assert!(Timestamp::from_str("not a time").is_err());
    }

    #[test]
    fn timestamp_order() {
        let late = Timestamp::from_str("20210921162830").unwrap();
        let early = Timestamp::from_str("20210906162330").unwrap();
        assert!(early < late);
    }
}
