//! DNSSEC signing.
//!
//! Signatures are at the heart of DNSSEC — they confirm the authenticity
//! of a DNS record served by a security-aware name server. Signatures can
//! be made "online" (in an authoritative name server while it is running)
//! or "offline" (outside of a name server). Once generated, signatures can
//! be serialized as DNS records and stored alongside the authenticated
//! records.
//!
//! The signing side of the engine produces exactly the byte stream the
//! validating side reconstructs, hands it to a [`SignRaw`] implementation,
//! and wraps the resulting signature into an RRSIG record. Whether the
//! private key lives in process memory or in an external signing device
//! makes no difference to the output.

#![cfg(any(feature = "ring", feature = "openssl"))]
#![cfg_attr(
    docsrs,
    doc(cfg(any(feature = "ring", feature = "openssl")))
)]

use core::fmt;

use std::vec::Vec;

use tracing::debug;

use crate::base::iana::{Rtype, SecurityAlgorithm};
use crate::base::name::Name;
use crate::base::record::{Record, Rrset};
use crate::crypto::device::DeviceKeyPair;
use crate::crypto::sign::{KeyPair, SignError, SignRaw, Signature};
use crate::rdata::{
    ComposeRecordData, Dnskey, ProtoRrsig, Rrsig, Timestamp,
};

//----------- SigningConfig --------------------------------------------------

/// The default signature validity, in seconds.
///
/// Thirty days, matching the validity interval BIND uses by default.
const DEFAULT_VALIDITY: u32 = 30 * 24 * 60 * 60;

/// Configuration for generating signatures.
///
/// All fields are optional; signing with the default configuration
/// produces signatures valid from the current time for thirty days.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SigningConfig {
    /// The inception time of produced signatures.
    ///
    /// Defaults to the current time.
    pub inception: Option<Timestamp>,

    /// The expiration time of produced signatures.
    ///
    /// Defaults to the inception time plus a thirty day validity window.
    pub expiration: Option<Timestamp>,

    /// Overrides the label count stored in produced signatures.
    ///
    /// Defaults to the label count of the signed RRset's owner name,
    /// computed as demanded by RFC 4034, section 3.1.3. Overriding it is
    /// only useful when signing records on behalf of a wildcard.
    pub labels: Option<u8>,
}

impl SigningConfig {
    /// Creates a configuration with the given validity period.
    pub fn new(inception: Timestamp, expiration: Timestamp) -> Self {
        SigningConfig {
            inception: Some(inception),
            expiration: Some(expiration),
            labels: None,
        }
    }

    /// Sets the label count override.
    pub fn with_labels(mut self, labels: u8) -> Self {
        self.labels = Some(labels);
        self
    }
}

//----------- SignerKey ------------------------------------------------------

/// The private half used to produce signatures.
///
/// A signature can be produced either from key material held in process
/// memory or by asking an external signing device that holds the key. The
/// two behave identically from the caller's point of view; the engine
/// branches on the variant once, at the start of the signing operation.
#[derive(Debug)]
pub enum SignerKey {
    /// Key material held in process memory.
    Local(KeyPair),

    /// A key held by an external signing device.
    Device(DeviceKeyPair),
}

//--- SignRaw

impl SignRaw for SignerKey {
    fn algorithm(&self) -> SecurityAlgorithm {
        match self {
            Self::Local(key) => key.algorithm(),
            Self::Device(key) => key.algorithm(),
        }
    }

    fn dnskey(&self) -> Result<Dnskey<Vec<u8>>, SignError> {
        match self {
            Self::Local(key) => key.dnskey(),
            Self::Device(key) => key.dnskey(),
        }
    }

    fn sign_raw(&self, data: &[u8]) -> Result<Signature, SignError> {
        match self {
            Self::Local(key) => key.sign_raw(data),
            Self::Device(key) => key.sign_raw(data),
        }
    }
}

//----------- SigningKey -----------------------------------------------------

/// A signing key.
///
/// This associates important metadata with a raw cryptographic secret key.
#[derive(Debug)]
pub struct SigningKey<Inner = SignerKey> {
    /// The owner of the key.
    owner: Name,

    /// The flags associated with the key.
    ///
    /// These flags are stored in the DNSKEY record.
    flags: u16,

    /// The raw private key.
    inner: Inner,

    /// When the key pair was created, if known.
    created: Option<Timestamp>,
}

//--- Construction

impl<Inner> SigningKey<Inner> {
    /// Construct a new signing key manually.
    pub fn new(owner: Name, flags: u16, inner: Inner) -> Self {
        Self {
            owner,
            flags,
            inner,
            created: None,
        }
    }

    /// Sets the creation time of the key pair.
    pub fn with_created(mut self, created: Timestamp) -> Self {
        self.created = Some(created);
        self
    }
}

//--- Inspection

impl<Inner> SigningKey<Inner> {
    /// The owner name attached to the key.
    pub fn owner(&self) -> &Name {
        &self.owner
    }

    /// The flags attached to the key.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// The raw secret key.
    pub fn raw_secret_key(&self) -> &Inner {
        &self.inner
    }

    /// When the key pair was created, if known.
    pub fn created(&self) -> Option<Timestamp> {
        self.created
    }

    /// Whether this is a zone signing key.
    ///
    /// From [RFC 4034, section 2.1.1]:
    ///
    /// > Bit 7 of the Flags field is the Zone Key flag.  If bit 7 has value
    /// > 1, then the DNSKEY record holds a DNS zone key, and the DNSKEY RR's
    /// > owner name MUST be the name of a zone.  If bit 7 has value 0, then
    /// > the DNSKEY record holds some other type of DNS public key and MUST
    /// > NOT be used to verify RRSIGs that cover RRsets.
    ///
    /// [RFC 4034, section 2.1.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-2.1.1
    pub fn is_zone_signing_key(&self) -> bool {
        self.flags & (1 << 8) != 0
    }

    /// Whether this key has been revoked.
    ///
    /// From [RFC 5011, section 3]:
    ///
    /// > Bit 8 of the DNSKEY Flags field is designated as the 'REVOKE' flag.
    /// > If this bit is set to '1', AND the resolver sees an RRSIG(DNSKEY)
    /// > signed by the associated key, then the resolver MUST consider this
    /// > key permanently invalid for all purposes except for validating the
    /// > revocation.
    ///
    /// [RFC 5011, section 3]: https://datatracker.ietf.org/doc/html/rfc5011#section-3
    pub fn is_revoked(&self) -> bool {
        self.flags & (1 << 7) != 0
    }

    /// Whether this is a secure entry point.
    ///
    /// From [RFC 4034, section 2.1.1]:
    ///
    /// > Bit 15 of the Flags field is the Secure Entry Point flag, described
    /// > in [RFC3757].  If bit 15 has value 1, then the DNSKEY record holds a
    /// > key intended for use as a secure entry point.  This flag is only
    /// > intended to be a hint to zone signing or debugging software as to
    /// > the intended use of this DNSKEY record; validators MUST NOT alter
    /// > their behavior during the signature validation process in any way
    /// > based on the setting of this bit.
    ///
    /// [RFC 4034, section 2.1.1]: https://datatracker.ietf.org/doc/html/rfc4034#section-2.1.1
    /// [RFC3757]: https://datatracker.ietf.org/doc/html/rfc3757
    pub fn is_secure_entry_point(&self) -> bool {
        self.flags & 1 != 0
    }

    /// The signing algorithm used.
    pub fn algorithm(&self) -> SecurityAlgorithm
    where
        Inner: SignRaw,
    {
        self.inner.algorithm()
    }

    /// The associated public key as DNSKEY record data.
    ///
    /// The record data carries the key's flags, not the flags the inner
    /// key was created with.
    pub fn dnskey(&self) -> Result<Dnskey<Vec<u8>>, SignError>
    where
        Inner: SignRaw,
    {
        let key = self.inner.dnskey()?;
        Dnskey::new(
            self.flags,
            key.protocol(),
            key.algorithm(),
            key.into_public_key(),
        )
        .map_err(|_| "long public key".into())
    }
}

//----------- sign_rrset -----------------------------------------------------

/// Generates an RRSIG record for the given RRset.
///
/// The signature is produced according to the rules defined in [RFC 4034,
/// section 3] _"The RRSIG Resource Record"_ and [RFC 4035, section 2.2]
/// _"Including RRSIG RRs in a Zone"_: the RRset is brought into canonical
/// form, prefixed with the RRSIG record data minus the signature field,
/// and signed with the given key — locally or on an external device,
/// depending on the key.
///
/// No checks are done on the given signing key; any key with any
/// algorithm, owner, and flags may be used to sign the given RRset.
///
/// [RFC 4034, section 3]: https://www.rfc-editor.org/rfc/rfc4034.html#section-3
/// [RFC 4035, section 2.2]: https://www.rfc-editor.org/rfc/rfc4035.html#section-2.2
pub fn sign_rrset<D, Inner>(
    key: &SigningKey<Inner>,
    rrset: &Rrset<'_, D>,
    config: &SigningConfig,
) -> Result<Record<Rrsig<Vec<u8>>>, SigningError>
where
    D: ComposeRecordData,
    Inner: SignRaw,
{
    // RFC 4035
    // 2.2.  Including RRSIG RRs in a Zone
    //   ...
    //   "An RRSIG RR itself MUST NOT be signed"
    if rrset.rtype() == Rtype::RRSIG {
        return Err(SigningError::RrsigRrsMustNotBeSigned);
    }

    let inception = config.inception.unwrap_or_else(Timestamp::now);
    let expiration = config
        .expiration
        .unwrap_or_else(|| inception.add(DEFAULT_VALIDITY));
    if expiration < inception {
        return Err(SigningError::InvalidSignatureValidityPeriod(
            inception, expiration,
        ));
    }

    let labels = config
        .labels
        .unwrap_or_else(|| rrset.owner().rrsig_label_count());

    let dnskey = key.dnskey()?;

    // RFC 4034
    // 3.  The RRSIG Resource Record
    //   "The TTL value of an RRSIG RR MUST match the TTL value of the
    //    RRset it covers."
    let rrsig = ProtoRrsig::new(
        rrset.rtype(),
        key.algorithm(),
        labels,
        rrset.ttl(),
        expiration,
        inception,
        dnskey.key_tag(),
        // RFC 4034, section 3.1.7 requires the signer's name to be
        // transmitted uncompressed; composing the canonical form below
        // also takes care of lowercasing it.
        key.owner().clone(),
    );

    let mut buf = Vec::new();
    rrsig.compose_canonical(&mut buf);
    rrset.compose_canonical_form(rrset.ttl(), labels, &mut buf);

    let signature = key.raw_secret_key().sign_raw(&buf)?;

    debug!(
        "signed {} RRset at {} with key tag {}",
        rrset.rtype(),
        rrset.owner(),
        dnskey.key_tag()
    );

    let rrsig = rrsig
        .into_rrsig(signature.as_ref().to_vec())
        .map_err(|_| SigningError::LongSignature)?;
    Ok(Record::new(
        rrset.owner().clone(),
        rrset.class(),
        rrset.ttl(),
        rrsig,
    ))
}

//============ Error Types ===================================================

//------------ SigningError --------------------------------------------------

/// An error while generating signatures.
#[derive(Clone, Debug, PartialEq)]
pub enum SigningError {
    /// RRSIG records must not be signed.
    ///
    /// See [RFC 4035, section 2.2].
    ///
    /// [RFC 4035, section 2.2]: https://www.rfc-editor.org/rfc/rfc4035.html#section-2.2
    RrsigRrsMustNotBeSigned,

    /// The requested validity period ends before it starts.
    InvalidSignatureValidityPeriod(Timestamp, Timestamp),

    /// The produced signature does not fit into record data.
    LongSignature,

    /// The underlying signing operation failed.
    Sign(SignError),
}

//--- Conversion

impl From<SignError> for SigningError {
    fn from(value: SignError) -> Self {
        Self::Sign(value)
    }
}

//--- Display and Error

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RrsigRrsMustNotBeSigned => {
                f.write_str("RRSIG RRs must not be signed")
            }
            Self::InvalidSignatureValidityPeriod(inception, expiration) => {
                write!(
                    f,
                    "invalid validity period: {} to {}",
                    inception, expiration
                )
            }
            Self::LongSignature => {
                f.write_str("signature does not fit record data")
            }
            Self::Sign(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for SigningError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::Class;
    use crate::base::record::Ttl;
    use crate::crypto::sign::{generate, GenerateParams};
    use crate::rdata::Txt;
    use crate::validate::verify_rrset;

    use core::str::FromStr;

    fn generate_params() -> Vec<GenerateParams> {
        let mut params = vec![
            GenerateParams::RsaSha256 { bits: 2048 },
            GenerateParams::EcdsaP256Sha256,
            GenerateParams::EcdsaP384Sha384,
            GenerateParams::Ed25519,
        ];
        // The legacy algorithms and Ed448 need OpenSSL.
        #[cfg(feature = "openssl")]
        params.extend([
            GenerateParams::Dsa,
            GenerateParams::RsaSha512 { bits: 2048 },
            GenerateParams::Ed448,
        ]);
        params
    }

    fn hello_rrset(owner: &Name) -> Vec<Record<Txt>> {
        vec![Record::new(
            owner.clone(),
            Class::IN,
            Ttl::from_secs(3600),
            Txt::build(b"Hello world").unwrap(),
        )]
    }

    fn fixed_config() -> SigningConfig {
        SigningConfig::new(
            Timestamp::from_str("20260101000000").unwrap(),
            Timestamp::from_str("20260201000000").unwrap(),
        )
    }

    #[test]
    fn sign_and_verify() {
        let owner = Name::from_str("example.org.").unwrap();
        for params in generate_params() {
            let (secret, public) = generate(params, 257).unwrap();
            let key_pair = KeyPair::from_bytes(&secret, &public).unwrap();
            let key = SigningKey::new(
                owner.clone(),
                257,
                SignerKey::Local(key_pair),
            );

            let records = hello_rrset(&owner);
            let rrset = Rrset::new(&records).unwrap();
            let rrsig =
                sign_rrset(&key, &rrset, &fixed_config()).unwrap();

            assert_eq!(rrsig.ttl(), rrset.ttl());
            assert_eq!(
                verify_rrset(rrsig.data(), &public, &rrset),
                Ok(true),
                "verification failed for {:?}",
                public.algorithm(),
            );
        }
    }

    #[test]
    fn mutated_rrset_does_not_verify() {
        let owner = Name::from_str("example.org.").unwrap();
        for params in generate_params() {
            let (secret, public) = generate(params, 257).unwrap();
            let key_pair = KeyPair::from_bytes(&secret, &public).unwrap();
            let key = SigningKey::new(
                owner.clone(),
                257,
                SignerKey::Local(key_pair),
            );

            let records = hello_rrset(&owner);
            let rrset = Rrset::new(&records).unwrap();
            let rrsig =
                sign_rrset(&key, &rrset, &fixed_config()).unwrap();

            // A single octet difference in the record data must break the
            // signature.
            let mutated = vec![Record::new(
                owner.clone(),
                Class::IN,
                Ttl::from_secs(3600),
                Txt::build(b"Hello worle").unwrap(),
            )];
            let mutated = Rrset::new(&mutated).unwrap();
            assert_eq!(
                verify_rrset(rrsig.data(), &public, &mutated),
                Ok(false),
                "mutated RRset verified for {:?}",
                public.algorithm(),
            );
        }
    }

    #[test]
    fn rrsig_rrsets_are_refused() {
        let owner = Name::from_str("example.org.").unwrap();
        let (secret, public) =
            generate(GenerateParams::Ed25519, 256).unwrap();
        let key_pair = KeyPair::from_bytes(&secret, &public).unwrap();
        let key =
            SigningKey::new(owner.clone(), 256, SignerKey::Local(key_pair));

        let records = hello_rrset(&owner);
        let rrset = Rrset::new(&records).unwrap();
        let rrsig = sign_rrset(&key, &rrset, &fixed_config()).unwrap();

        let rrsigs = vec![rrsig];
        let rrset = Rrset::new(&rrsigs).unwrap();
        assert_eq!(
            sign_rrset(&key, &rrset, &fixed_config()),
            Err(SigningError::RrsigRrsMustNotBeSigned)
        );
    }

    #[test]
    fn validity_period_must_be_ordered() {
        let owner = Name::from_str("example.org.").unwrap();
        let (secret, public) =
            generate(GenerateParams::Ed25519, 256).unwrap();
        let key_pair = KeyPair::from_bytes(&secret, &public).unwrap();
        let key =
            SigningKey::new(owner.clone(), 256, SignerKey::Local(key_pair));

        let records = hello_rrset(&owner);
        let rrset = Rrset::new(&records).unwrap();
        let config = SigningConfig::new(
            Timestamp::from_str("20260201000000").unwrap(),
            Timestamp::from_str("20260101000000").unwrap(),
        );
        assert!(matches!(
            sign_rrset(&key, &rrset, &config),
            Err(SigningError::InvalidSignatureValidityPeriod(_, _))
        ));
    }

    #[test]
    fn key_roles() {
        let owner = Name::from_str("example.org.").unwrap();
        let (secret, public) =
            generate(GenerateParams::Ed25519, 257).unwrap();
        let key_pair = KeyPair::from_bytes(&secret, &public).unwrap();
        let key =
            SigningKey::new(owner, 257, SignerKey::Local(key_pair));
        assert!(key.is_zone_signing_key());
        assert!(key.is_secure_entry_point());
        assert!(!key.is_revoked());
        assert_eq!(key.algorithm(), SecurityAlgorithm::ED25519);
        assert_eq!(key.dnskey().unwrap(), public);
    }
}
