//! Generic representations of public and private key material.
//!
//! The types in this module hold key material as raw bytes, independent of
//! any cryptographic backend. They know the two serializations the DNS
//! world uses for keys: the algorithm-specific DNSKEY RDATA layouts for
//! public keys, and the private-key text file format popularized by BIND
//! for secret keys.

#![cfg(any(feature = "ring", feature = "openssl"))]
#![cfg_attr(
    docsrs,
    doc(cfg(any(feature = "ring", feature = "openssl")))
)]

use core::fmt;

use std::boxed::Box;
use std::vec::Vec;

use secrecy::{ExposeSecret, SecretBox};

use crate::base::iana::SecurityAlgorithm;
use crate::rdata::Dnskey;
use crate::utils::base64;

//------------ PublicKeyBytes ------------------------------------------------

/// A public key expressed as raw bytes.
///
/// This is the decoded form of the public key field of a DNSKEY record: the
/// algorithm-specific structure has been parsed and the byte lengths have
/// been checked, but no cryptographic validation has taken place.
///
/// The per-algorithm layouts are:
///
/// - RSA ([RFC 3110]): a one or three octet exponent length, the public
///   exponent, and the modulus.
///
/// - DSA ([RFC 2536]): a size octet T, the 20 octet subprime Q, and the
///   prime P, base G, and public value Y of 64 + 8·T octets each.
///
/// - ECDSA ([RFC 6605]): the uncompressed curve point as the plain
///   concatenation of X and Y, without the SEC 1 compression prefix.
///
/// - EdDSA ([RFC 8080]): the raw encoded point.
///
/// [RFC 2536]: https://tools.ietf.org/html/rfc2536
/// [RFC 3110]: https://tools.ietf.org/html/rfc3110
/// [RFC 6605]: https://tools.ietf.org/html/rfc6605
/// [RFC 8080]: https://tools.ietf.org/html/rfc8080
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PublicKeyBytes {
    /// An RSA/MD5 public key.
    RsaMd5(RsaPublicKeyBytes),

    /// An RSA/SHA-1 public key.
    RsaSha1(RsaPublicKeyBytes),

    /// An RSA/SHA-1 public key signalling support for NSEC3.
    RsaSha1Nsec3Sha1(RsaPublicKeyBytes),

    /// An RSA/SHA-256 public key.
    RsaSha256(RsaPublicKeyBytes),

    /// An RSA/SHA-512 public key.
    RsaSha512(RsaPublicKeyBytes),

    /// A DSA public key.
    Dsa(DsaPublicKeyBytes),

    /// A DSA public key signalling support for NSEC3.
    DsaNsec3Sha1(DsaPublicKeyBytes),

    /// An ECDSA P-256/SHA-256 public key.
    ///
    /// The key is the uncompressed point, i.e. `X || Y`.
    EcdsaP256Sha256(Box<[u8; 64]>),

    /// An ECDSA P-384/SHA-384 public key.
    ///
    /// The key is the uncompressed point, i.e. `X || Y`.
    EcdsaP384Sha384(Box<[u8; 96]>),

    /// An Ed25519 public key.
    Ed25519(Box<[u8; 32]>),

    /// An Ed448 public key.
    Ed448(Box<[u8; 57]>),
}

impl PublicKeyBytes {
    /// The algorithm used by this key.
    pub fn algorithm(&self) -> SecurityAlgorithm {
        match self {
            Self::RsaMd5(_) => SecurityAlgorithm::RSAMD5,
            Self::RsaSha1(_) => SecurityAlgorithm::RSASHA1,
            Self::RsaSha1Nsec3Sha1(_) => {
                SecurityAlgorithm::RSASHA1_NSEC3_SHA1
            }
            Self::RsaSha256(_) => SecurityAlgorithm::RSASHA256,
            Self::RsaSha512(_) => SecurityAlgorithm::RSASHA512,
            Self::Dsa(_) => SecurityAlgorithm::DSA,
            Self::DsaNsec3Sha1(_) => SecurityAlgorithm::DSA_NSEC3_SHA1,
            Self::EcdsaP256Sha256(_) => SecurityAlgorithm::ECDSAP256SHA256,
            Self::EcdsaP384Sha384(_) => SecurityAlgorithm::ECDSAP384SHA384,
            Self::Ed25519(_) => SecurityAlgorithm::ED25519,
            Self::Ed448(_) => SecurityAlgorithm::ED448,
        }
    }

    /// Decodes the public key field of a DNSKEY record.
    pub fn from_dnskey(
        dnskey: &Dnskey<impl AsRef<[u8]>>,
    ) -> Result<Self, FromDnskeyError> {
        if dnskey.protocol() != 3 {
            return Err(FromDnskeyError::UnsupportedProtocol);
        }

        let data = dnskey.public_key().as_ref();
        let rsa = RsaPublicKeyBytes::parse_dnskey_format;
        let dsa = DsaPublicKeyBytes::parse_dnskey_format;
        match dnskey.algorithm() {
            SecurityAlgorithm::RSAMD5 => rsa(data).map(Self::RsaMd5),
            SecurityAlgorithm::RSASHA1 => rsa(data).map(Self::RsaSha1),
            SecurityAlgorithm::RSASHA1_NSEC3_SHA1 => {
                rsa(data).map(Self::RsaSha1Nsec3Sha1)
            }
            SecurityAlgorithm::RSASHA256 => rsa(data).map(Self::RsaSha256),
            SecurityAlgorithm::RSASHA512 => rsa(data).map(Self::RsaSha512),
            SecurityAlgorithm::DSA => dsa(data).map(Self::Dsa),
            SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                dsa(data).map(Self::DsaNsec3Sha1)
            }
            SecurityAlgorithm::ECDSAP256SHA256 => {
                parse_fixed(data).map(Self::EcdsaP256Sha256)
            }
            SecurityAlgorithm::ECDSAP384SHA384 => {
                parse_fixed(data).map(Self::EcdsaP384Sha384)
            }
            SecurityAlgorithm::ED25519 => {
                parse_fixed(data).map(Self::Ed25519)
            }
            SecurityAlgorithm::ED448 => parse_fixed(data).map(Self::Ed448),
            _ => Err(FromDnskeyError::UnsupportedAlgorithm),
        }
    }

    /// Encodes the key into the public key field of a DNSKEY record.
    ///
    /// For every supported algorithm, decoding followed by encoding
    /// reproduces the original field octet for octet.
    pub fn to_dnskey_format(&self) -> Vec<u8> {
        match self {
            Self::RsaMd5(k)
            | Self::RsaSha1(k)
            | Self::RsaSha1Nsec3Sha1(k)
            | Self::RsaSha256(k)
            | Self::RsaSha512(k) => k.to_dnskey_format(),
            Self::Dsa(k) | Self::DsaNsec3Sha1(k) => k.to_dnskey_format(),
            Self::EcdsaP256Sha256(k) => k.as_slice().into(),
            Self::EcdsaP384Sha384(k) => k.as_slice().into(),
            Self::Ed25519(k) => k.as_slice().into(),
            Self::Ed448(k) => k.as_slice().into(),
        }
    }

    /// Returns the key as DNSKEY record data with the given flags.
    pub fn dnskey(&self, flags: u16) -> Dnskey<Vec<u8>> {
        Dnskey::new(flags, 3, self.algorithm(), self.to_dnskey_format())
            .expect("long public key")
    }

    /// The size of this key, in bits.
    ///
    /// For RSA keys, this measures the size of the public modulus. For all
    /// other algorithms, it is the size of the fixed-width public key.
    pub fn key_size(&self) -> usize {
        match self {
            Self::RsaMd5(k)
            | Self::RsaSha1(k)
            | Self::RsaSha1Nsec3Sha1(k)
            | Self::RsaSha256(k)
            | Self::RsaSha512(k) => k.key_size(),
            Self::Dsa(k) | Self::DsaNsec3Sha1(k) => k.p.len() * 8,
            // ECDSA public keys have two points.
            Self::EcdsaP256Sha256(k) => k.len() / 2 * 8,
            Self::EcdsaP384Sha384(k) => k.len() / 2 * 8,
            // EdDSA public key sizes are measured in encoded form.
            Self::Ed25519(k) => k.len() * 8,
            Self::Ed448(k) => k.len() * 8,
        }
    }
}

/// Parses a fixed-width public key.
fn parse_fixed<const N: usize>(
    data: &[u8],
) -> Result<Box<[u8; N]>, FromDnskeyError> {
    let data: Box<[u8]> = data.into();
    data.try_into()
        .map_err(|_| FromDnskeyError::InvalidKeyLength)
}

//------------ RsaPublicKeyBytes ---------------------------------------------

/// An RSA public key expressed as raw bytes.
///
/// The exponent and modulus are arbitrary-precision integers in big-endian
/// format, without leading zeros.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPublicKeyBytes {
    /// The public exponent.
    pub e: Box<[u8]>,

    /// The public modulus.
    pub n: Box<[u8]>,
}

impl RsaPublicKeyBytes {
    /// Parses the public key from DNSKEY record data format.
    pub fn parse_dnskey_format(
        data: &[u8],
    ) -> Result<Self, FromDnskeyError> {
        if data.len() <= 3 {
            return Err(FromDnskeyError::InvalidKeyLength);
        }

        let (pos, exp_len) = match data[0] {
            0 => (
                3,
                (usize::from(data[1]) << 8) | usize::from(data[2]),
            ),
            len => (1, usize::from(len)),
        };

        if exp_len == 0 || data.len() <= pos + exp_len {
            return Err(FromDnskeyError::InvalidKeyLength);
        }

        let (e, n) = data[pos..].split_at(exp_len);
        Ok(RsaPublicKeyBytes {
            e: e.into(),
            n: n.into(),
        })
    }

    /// Encodes the public key into DNSKEY record data format.
    pub fn to_dnskey_format(&self) -> Vec<u8> {
        super::common::rsa_encode(&self.e, &self.n)
    }

    /// The size of the public modulus, in bits.
    pub fn key_size(&self) -> usize {
        self.n.len() * 8
            - usize::try_from(self.n[0].leading_zeros()).unwrap()
    }
}

//------------ DsaPublicKeyBytes ---------------------------------------------

/// A DSA public key expressed as raw bytes.
///
/// All components are big-endian integers. The prime, base, and public
/// value have the same width, 64 + 8·T octets, where T is the size octet
/// stored in the record data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DsaPublicKeyBytes {
    /// The subprime, always 20 octets.
    pub q: Box<[u8; 20]>,

    /// The prime.
    pub p: Box<[u8]>,

    /// The base.
    pub g: Box<[u8]>,

    /// The public value.
    pub y: Box<[u8]>,
}

impl DsaPublicKeyBytes {
    /// The largest permitted value of the size octet.
    const MAX_T: usize = 8;

    /// Parses the public key from DNSKEY record data format.
    pub fn parse_dnskey_format(
        data: &[u8],
    ) -> Result<Self, FromDnskeyError> {
        let Some(&t) = data.first() else {
            return Err(FromDnskeyError::InvalidKeyLength);
        };
        let t = usize::from(t);
        if t > Self::MAX_T {
            return Err(FromDnskeyError::InvalidKey);
        }
        let width = 64 + t * 8;
        if data.len() != 1 + 20 + 3 * width {
            return Err(FromDnskeyError::InvalidKeyLength);
        }

        let (q, rest) = data[1..].split_at(20);
        let (p, rest) = rest.split_at(width);
        let (g, y) = rest.split_at(width);
        Ok(DsaPublicKeyBytes {
            q: Box::<[u8]>::from(q).try_into().unwrap(),
            p: p.into(),
            g: g.into(),
            y: y.into(),
        })
    }

    /// Encodes the public key into DNSKEY record data format.
    pub fn to_dnskey_format(&self) -> Vec<u8> {
        let width = self.p.len();
        let t = (width - 64) / 8;
        let mut data = Vec::with_capacity(1 + 20 + 3 * width);
        data.push(t as u8);
        data.extend_from_slice(self.q.as_slice());
        data.extend_from_slice(&self.p);
        data.extend_from_slice(&self.g);
        data.extend_from_slice(&self.y);
        data
    }
}

//------------ SecretKeyBytes ------------------------------------------------

/// A secret key expressed as raw bytes.
///
/// This is a low-level generic representation of a secret key from any one
/// of the commonly supported signature algorithms. It is useful for
/// abstracting over most cryptographic implementations, and it provides
/// functionality for importing and exporting keys from and to the disk.
///
/// # Serialization
///
/// This type can be used to interact with private keys stored in the format
/// popularized by BIND. The format is rather under-specified, but examples
/// of it are available in [RFC 5702], [RFC 6605], and [RFC 8080].
///
/// [RFC 5702]: https://www.rfc-editor.org/rfc/rfc5702
/// [RFC 6605]: https://www.rfc-editor.org/rfc/rfc6605
/// [RFC 8080]: https://www.rfc-editor.org/rfc/rfc8080
///
/// In this format, a private key is a line-oriented text file. Each line is
/// either blank (having only whitespace) or a key-value entry. Entries have
/// three components: a key, an ASCII colon, and a value. Keys contain ASCII
/// text (except for colons) and values contain any data up to the end of
/// the line. Whitespace at either end of the key and the value will be
/// ignored.
///
/// Every file begins with two entries:
///
/// - `Private-key-format` specifies the format of the file. The RFC
///   examples above use version 1.2 (serialized `v1.2`), but recent
///   versions of BIND have defined a new version 1.3 (serialized `v1.3`).
///
///   This value should be treated akin to Semantic Versioning principles.
///   If the major version (the first number) is unknown to a parser, it
///   should fail, since it does not know the layout of the following
///   fields. If the minor version is greater than what a parser is
///   expecting, it should ignore any following fields it did not expect.
///
/// - `Algorithm` specifies the signing algorithm used by the private key.
///   This can affect the format of later fields. The value consists of two
///   whitespace-separated words: the first is the ASCII decimal number of
///   the algorithm (see [`SecurityAlgorithm`]); the second is the name of
///   the algorithm in ASCII parentheses (with no whitespace inside).
///
/// The value of every following entry is a Base64-encoded string of
/// variable length, using the RFC 4648 variant (i.e. with `+` and `/`, and
/// `=` for padding). It is unclear whether padding is required or optional.
///
/// In the case of RSA (algorithms 1, 5, 7, 8, and 10), the following fields
/// are defined (their conventional symbolic names are also provided):
///
/// - `Modulus` (n)
/// - `PublicExponent` (e)
/// - `PrivateExponent` (d)
/// - `Prime1` (p)
/// - `Prime2` (q)
/// - `Exponent1` (d_p)
/// - `Exponent2` (d_q)
/// - `Coefficient` (q_inv)
///
/// In the case of DSA (algorithms 3 and 6), the fields are:
///
/// - `Prime(p)`
/// - `Subprime(q)`
/// - `Base(g)`
/// - `Private_value(x)`
/// - `Public_value(y)`
///
/// For all other algorithms, there is a single `PrivateKey` field, whose
/// contents should be interpreted as:
///
/// - For ECDSA, the private scalar of the key, as a fixed-width byte string
///   interpreted as a big-endian integer.
///
/// - For EdDSA, the private scalar of the key, as a fixed-width byte
///   string.
#[derive(Debug)]
pub enum SecretKeyBytes {
    /// An RSA/MD5 keypair.
    RsaMd5(RsaSecretKeyBytes),

    /// An RSA/SHA-1 keypair.
    RsaSha1(RsaSecretKeyBytes),

    /// An RSA/SHA-1 keypair signalling support for NSEC3.
    RsaSha1Nsec3Sha1(RsaSecretKeyBytes),

    /// An RSA/SHA-256 keypair.
    RsaSha256(RsaSecretKeyBytes),

    /// An RSA/SHA-512 keypair.
    RsaSha512(RsaSecretKeyBytes),

    /// A DSA keypair.
    Dsa(DsaSecretKeyBytes),

    /// A DSA keypair signalling support for NSEC3.
    DsaNsec3Sha1(DsaSecretKeyBytes),

    /// An ECDSA P-256/SHA-256 keypair.
    ///
    /// The private key is a single 32-byte big-endian integer.
    EcdsaP256Sha256(SecretBox<[u8; 32]>),

    /// An ECDSA P-384/SHA-384 keypair.
    ///
    /// The private key is a single 48-byte big-endian integer.
    EcdsaP384Sha384(SecretBox<[u8; 48]>),

    /// An Ed25519 keypair.
    ///
    /// The private key is a single 32-byte string.
    Ed25519(SecretBox<[u8; 32]>),

    /// An Ed448 keypair.
    ///
    /// The private key is a single 57-byte string.
    Ed448(SecretBox<[u8; 57]>),
}

//--- Inspection

impl SecretKeyBytes {
    /// The algorithm used by this key.
    pub fn algorithm(&self) -> SecurityAlgorithm {
        match self {
            Self::RsaMd5(_) => SecurityAlgorithm::RSAMD5,
            Self::RsaSha1(_) => SecurityAlgorithm::RSASHA1,
            Self::RsaSha1Nsec3Sha1(_) => {
                SecurityAlgorithm::RSASHA1_NSEC3_SHA1
            }
            Self::RsaSha256(_) => SecurityAlgorithm::RSASHA256,
            Self::RsaSha512(_) => SecurityAlgorithm::RSASHA512,
            Self::Dsa(_) => SecurityAlgorithm::DSA,
            Self::DsaNsec3Sha1(_) => SecurityAlgorithm::DSA_NSEC3_SHA1,
            Self::EcdsaP256Sha256(_) => SecurityAlgorithm::ECDSAP256SHA256,
            Self::EcdsaP384Sha384(_) => SecurityAlgorithm::ECDSAP384SHA384,
            Self::Ed25519(_) => SecurityAlgorithm::ED25519,
            Self::Ed448(_) => SecurityAlgorithm::ED448,
        }
    }
}

//--- Converting to and from the BIND format

impl SecretKeyBytes {
    /// Serialize this secret key in the conventional format used by BIND.
    ///
    /// The key is formatted in the private key v1.2 format and written to
    /// the given formatter. See the type-level documentation for a
    /// description of this format.
    pub fn format_as_bind(&self, mut w: impl fmt::Write) -> fmt::Result {
        writeln!(w, "Private-key-format: v1.2")?;
        match self {
            Self::RsaMd5(k) => {
                writeln!(w, "Algorithm: 1 (RSAMD5)")?;
                k.format_as_bind(w)
            }

            Self::RsaSha1(k) => {
                writeln!(w, "Algorithm: 5 (RSASHA1)")?;
                k.format_as_bind(w)
            }

            Self::RsaSha1Nsec3Sha1(k) => {
                writeln!(w, "Algorithm: 7 (NSEC3RSASHA1)")?;
                k.format_as_bind(w)
            }

            Self::RsaSha256(k) => {
                writeln!(w, "Algorithm: 8 (RSASHA256)")?;
                k.format_as_bind(w)
            }

            Self::RsaSha512(k) => {
                writeln!(w, "Algorithm: 10 (RSASHA512)")?;
                k.format_as_bind(w)
            }

            Self::Dsa(k) => {
                writeln!(w, "Algorithm: 3 (DSA)")?;
                k.format_as_bind(w)
            }

            Self::DsaNsec3Sha1(k) => {
                writeln!(w, "Algorithm: 6 (NSEC3DSA)")?;
                k.format_as_bind(w)
            }

            Self::EcdsaP256Sha256(s) => {
                let s = s.expose_secret();
                writeln!(w, "Algorithm: 13 (ECDSAP256SHA256)")?;
                writeln!(w, "PrivateKey: {}", base64::encode_display(s))
            }

            Self::EcdsaP384Sha384(s) => {
                let s = s.expose_secret();
                writeln!(w, "Algorithm: 14 (ECDSAP384SHA384)")?;
                writeln!(w, "PrivateKey: {}", base64::encode_display(s))
            }

            Self::Ed25519(s) => {
                let s = s.expose_secret();
                writeln!(w, "Algorithm: 15 (ED25519)")?;
                writeln!(w, "PrivateKey: {}", base64::encode_display(s))
            }

            Self::Ed448(s) => {
                let s = s.expose_secret();
                writeln!(w, "Algorithm: 16 (ED448)")?;
                writeln!(w, "PrivateKey: {}", base64::encode_display(s))
            }
        }
    }

    /// Display this secret key in the conventional format used by BIND.
    ///
    /// This is a simple wrapper around [`Self::format_as_bind()`].
    pub fn display_as_bind(&self) -> impl fmt::Display + '_ {
        /// Display type to return from this function.
        struct Display<'a>(&'a SecretKeyBytes);
        impl fmt::Display for Display<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.format_as_bind(f)
            }
        }
        Display(self)
    }

    /// Parse a secret key from the conventional format used by BIND.
    ///
    /// This parser supports the private key v1.2 format, but it should be
    /// compatible with any future v1.x key. See the type-level
    /// documentation for a description of this format.
    pub fn parse_from_bind(data: &str) -> Result<Self, BindFormatError> {
        /// Parse private keys for most algorithms (except RSA and DSA).
        fn parse_pkey<const N: usize>(
            mut data: &str,
        ) -> Result<SecretBox<[u8; N]>, BindFormatError> {
            // Look for the 'PrivateKey' field.
            while let Some((key, val, rest)) = parse_bind_entry(data)? {
                data = rest;

                if key != "PrivateKey" {
                    continue;
                }

                let val: Vec<u8> = base64::decode(val)
                    .map_err(|_| BindFormatError::Misformatted)?;
                let val: Box<[u8]> = val.into_boxed_slice();
                let val: Box<[u8; N]> = val
                    .try_into()
                    .map_err(|_| BindFormatError::Misformatted)?;

                return Ok(val.into());
            }

            // The 'PrivateKey' field was not found.
            Err(BindFormatError::Misformatted)
        }

        // The first line should specify the key format.
        let (_, _, data) = parse_bind_entry(data)?
            .filter(|&(k, v, _)| {
                k == "Private-key-format"
                    && v.strip_prefix("v1.")
                        .and_then(|minor| minor.parse::<u8>().ok())
                        .is_some_and(|minor| minor >= 2)
            })
            .ok_or(BindFormatError::UnsupportedFormat)?;

        // The second line should specify the algorithm.
        let (_, val, data) = parse_bind_entry(data)?
            .filter(|&(k, _, _)| k == "Algorithm")
            .ok_or(BindFormatError::Misformatted)?;

        // Parse the algorithm.
        let mut words = val.split_whitespace();
        let code = words
            .next()
            .and_then(|code| code.parse::<u8>().ok())
            .ok_or(BindFormatError::Misformatted)?;
        let name = words.next().ok_or(BindFormatError::Misformatted)?;
        if words.next().is_some() {
            return Err(BindFormatError::Misformatted);
        }

        match (code, name) {
            (1, "(RSAMD5)") => {
                RsaSecretKeyBytes::parse_from_bind(data).map(Self::RsaMd5)
            }
            (5, "(RSASHA1)") => {
                RsaSecretKeyBytes::parse_from_bind(data).map(Self::RsaSha1)
            }
            (7, "(NSEC3RSASHA1)") => RsaSecretKeyBytes::parse_from_bind(data)
                .map(Self::RsaSha1Nsec3Sha1),
            (8, "(RSASHA256)") => {
                RsaSecretKeyBytes::parse_from_bind(data).map(Self::RsaSha256)
            }
            (10, "(RSASHA512)") => {
                RsaSecretKeyBytes::parse_from_bind(data).map(Self::RsaSha512)
            }
            (3, "(DSA)") => {
                DsaSecretKeyBytes::parse_from_bind(data).map(Self::Dsa)
            }
            (6, "(NSEC3DSA)") => DsaSecretKeyBytes::parse_from_bind(data)
                .map(Self::DsaNsec3Sha1),
            (13, "(ECDSAP256SHA256)") => {
                parse_pkey(data).map(Self::EcdsaP256Sha256)
            }
            (14, "(ECDSAP384SHA384)") => {
                parse_pkey(data).map(Self::EcdsaP384Sha384)
            }
            (15, "(ED25519)") => parse_pkey(data).map(Self::Ed25519),
            (16, "(ED448)") => parse_pkey(data).map(Self::Ed448),
            _ => Err(BindFormatError::UnsupportedAlgorithm),
        }
    }
}

//------------ Helpers for parsing the BIND format ---------------------------

/// Extract the next key-value pair in a BIND-format private key file.
pub(crate) fn parse_bind_entry(
    data: &str,
) -> Result<Option<(&str, &str, &str)>, BindFormatError> {
    // Trim any pending newlines.
    let data = data.trim_start();

    // Stop if there's no more data.
    if data.is_empty() {
        return Ok(None);
    }

    // Get the first line (NOTE: CR LF is handled later).
    let (line, rest) = data.split_once('\n').unwrap_or((data, ""));

    // Skip comment lines.
    if line.starts_with(';') {
        return parse_bind_entry(rest);
    }

    // Split the line by a colon.
    let (key, val) =
        line.split_once(':').ok_or(BindFormatError::Misformatted)?;

    // Trim the key and value (incl. for CR LFs).
    Ok(Some((key.trim(), val.trim(), rest)))
}

//------------ RsaSecretKeyBytes ---------------------------------------------

/// An RSA secret key expressed as raw bytes.
///
/// All fields here are arbitrary-precision integers in big-endian format.
/// The public values, `n` and `e`, must not have leading zeros; the
/// remaining values may be padded with leading zeros.
#[derive(Debug)]
pub struct RsaSecretKeyBytes {
    /// The public modulus.
    pub n: Box<[u8]>,

    /// The public exponent.
    pub e: Box<[u8]>,

    /// The private exponent.
    pub d: SecretBox<[u8]>,

    /// The first prime factor of `d`.
    pub p: SecretBox<[u8]>,

    /// The second prime factor of `d`.
    pub q: SecretBox<[u8]>,

    /// The exponent corresponding to the first prime factor of `d`.
    pub d_p: SecretBox<[u8]>,

    /// The exponent corresponding to the second prime factor of `d`.
    pub d_q: SecretBox<[u8]>,

    /// The inverse of the second prime factor modulo the first.
    pub q_i: SecretBox<[u8]>,
}

//--- Conversion to and from the BIND format

impl RsaSecretKeyBytes {
    /// Serialize this secret key in the conventional format used by BIND.
    ///
    /// The key is formatted in the private key v1.2 format and written to
    /// the given formatter. Note that the header and algorithm lines are
    /// not written. See the type-level documentation of [`SecretKeyBytes`]
    /// for a description of this format.
    pub fn format_as_bind(&self, mut w: impl fmt::Write) -> fmt::Result {
        w.write_str("Modulus: ")?;
        writeln!(w, "{}", base64::encode_display(&self.n))?;
        w.write_str("PublicExponent: ")?;
        writeln!(w, "{}", base64::encode_display(&self.e))?;
        w.write_str("PrivateExponent: ")?;
        writeln!(w, "{}", base64::encode_display(&self.d.expose_secret()))?;
        w.write_str("Prime1: ")?;
        writeln!(w, "{}", base64::encode_display(&self.p.expose_secret()))?;
        w.write_str("Prime2: ")?;
        writeln!(w, "{}", base64::encode_display(&self.q.expose_secret()))?;
        w.write_str("Exponent1: ")?;
        writeln!(
            w,
            "{}",
            base64::encode_display(&self.d_p.expose_secret())
        )?;
        w.write_str("Exponent2: ")?;
        writeln!(
            w,
            "{}",
            base64::encode_display(&self.d_q.expose_secret())
        )?;
        w.write_str("Coefficient: ")?;
        writeln!(
            w,
            "{}",
            base64::encode_display(&self.q_i.expose_secret())
        )?;
        Ok(())
    }

    /// Display this secret key in the conventional format used by BIND.
    ///
    /// This is a simple wrapper around [`Self::format_as_bind()`].
    pub fn display_as_bind(&self) -> impl fmt::Display + '_ {
        /// Display type to return from this function.
        struct Display<'a>(&'a RsaSecretKeyBytes);
        impl fmt::Display for Display<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.format_as_bind(f)
            }
        }
        Display(self)
    }

    /// Parse a secret key from the conventional format used by BIND.
    ///
    /// This parser supports the private key v1.2 format, but it should be
    /// compatible with any future v1.x key. Note that the header and
    /// algorithm lines are ignored. See the type-level documentation of
    /// [`SecretKeyBytes`] for a description of this format.
    pub fn parse_from_bind(mut data: &str) -> Result<Self, BindFormatError> {
        let mut n = None;
        let mut e = None;
        let mut d = None;
        let mut p = None;
        let mut q = None;
        let mut d_p = None;
        let mut d_q = None;
        let mut q_i = None;

        while let Some((key, val, rest)) = parse_bind_entry(data)? {
            let field = match key {
                "Modulus" => &mut n,
                "PublicExponent" => &mut e,
                "PrivateExponent" => &mut d,
                "Prime1" => &mut p,
                "Prime2" => &mut q,
                "Exponent1" => &mut d_p,
                "Exponent2" => &mut d_q,
                "Coefficient" => &mut q_i,
                _ => {
                    data = rest;
                    continue;
                }
            };

            if field.is_some() {
                // This field has already been filled.
                return Err(BindFormatError::Misformatted);
            }

            let buffer: Vec<u8> = base64::decode(val)
                .map_err(|_| BindFormatError::Misformatted)?;

            *field = Some(buffer.into_boxed_slice());
            data = rest;
        }

        for field in [&n, &e, &d, &p, &q, &d_p, &d_q, &q_i] {
            if field.is_none() {
                // A field was missing.
                return Err(BindFormatError::Misformatted);
            }
        }

        Ok(Self {
            n: n.unwrap(),
            e: e.unwrap(),
            d: d.unwrap().into(),
            p: p.unwrap().into(),
            q: q.unwrap().into(),
            d_p: d_p.unwrap().into(),
            d_q: d_q.unwrap().into(),
            q_i: q_i.unwrap().into(),
        })
    }
}

//--- From<&RsaSecretKeyBytes> for RsaPublicKeyBytes

impl<'a> From<&'a RsaSecretKeyBytes> for RsaPublicKeyBytes {
    fn from(value: &'a RsaSecretKeyBytes) -> Self {
        RsaPublicKeyBytes {
            e: value.e.clone(),
            n: value.n.clone(),
        }
    }
}

//------------ DsaSecretKeyBytes ---------------------------------------------

/// A DSA secret key expressed as raw bytes.
///
/// The group parameters and the public value are public data; only the
/// private value `x` is secret. All components are big-endian integers.
#[derive(Debug)]
pub struct DsaSecretKeyBytes {
    /// The prime.
    pub p: Box<[u8]>,

    /// The subprime.
    pub q: Box<[u8]>,

    /// The base.
    pub g: Box<[u8]>,

    /// The private value.
    pub x: SecretBox<[u8]>,

    /// The public value.
    pub y: Box<[u8]>,
}

//--- Conversion to and from the BIND format

impl DsaSecretKeyBytes {
    /// Serialize this secret key in the conventional format used by BIND.
    ///
    /// The key is formatted in the private key v1.2 format and written to
    /// the given formatter. Note that the header and algorithm lines are
    /// not written.
    pub fn format_as_bind(&self, mut w: impl fmt::Write) -> fmt::Result {
        w.write_str("Prime(p): ")?;
        writeln!(w, "{}", base64::encode_display(&self.p))?;
        w.write_str("Subprime(q): ")?;
        writeln!(w, "{}", base64::encode_display(&self.q))?;
        w.write_str("Base(g): ")?;
        writeln!(w, "{}", base64::encode_display(&self.g))?;
        w.write_str("Private_value(x): ")?;
        writeln!(w, "{}", base64::encode_display(&self.x.expose_secret()))?;
        w.write_str("Public_value(y): ")?;
        writeln!(w, "{}", base64::encode_display(&self.y))?;
        Ok(())
    }

    /// Display this secret key in the conventional format used by BIND.
    ///
    /// This is a simple wrapper around [`Self::format_as_bind()`].
    pub fn display_as_bind(&self) -> impl fmt::Display + '_ {
        /// Display type to return from this function.
        struct Display<'a>(&'a DsaSecretKeyBytes);
        impl fmt::Display for Display<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.format_as_bind(f)
            }
        }
        Display(self)
    }

    /// Parse a secret key from the conventional format used by BIND.
    ///
    /// This parser supports the private key v1.2 format, but it should be
    /// compatible with any future v1.x key. Note that the header and
    /// algorithm lines are ignored.
    pub fn parse_from_bind(mut data: &str) -> Result<Self, BindFormatError> {
        let mut p = None;
        let mut q = None;
        let mut g = None;
        let mut x = None;
        let mut y = None;

        while let Some((key, val, rest)) = parse_bind_entry(data)? {
            let field = match key {
                "Prime(p)" => &mut p,
                "Subprime(q)" => &mut q,
                "Base(g)" => &mut g,
                "Private_value(x)" => &mut x,
                "Public_value(y)" => &mut y,
                _ => {
                    data = rest;
                    continue;
                }
            };

            if field.is_some() {
                // This field has already been filled.
                return Err(BindFormatError::Misformatted);
            }

            let buffer: Vec<u8> = base64::decode(val)
                .map_err(|_| BindFormatError::Misformatted)?;

            *field = Some(buffer.into_boxed_slice());
            data = rest;
        }

        for field in [&p, &q, &g, &x, &y] {
            if field.is_none() {
                // A field was missing.
                return Err(BindFormatError::Misformatted);
            }
        }

        Ok(Self {
            p: p.unwrap(),
            q: q.unwrap(),
            g: g.unwrap(),
            x: x.unwrap().into(),
            y: y.unwrap(),
        })
    }
}

//--- From<&DsaSecretKeyBytes> for DsaPublicKeyBytes

impl<'a> From<&'a DsaSecretKeyBytes> for DsaPublicKeyBytes {
    fn from(value: &'a DsaSecretKeyBytes) -> Self {
        let width = 64 + (value.p.len().saturating_sub(64) + 7) / 8 * 8;
        let mut q = Box::new([0u8; 20]);
        let start = 20usize.saturating_sub(value.q.len());
        q[start..].copy_from_slice(&value.q[value.q.len().saturating_sub(20)..]);
        DsaPublicKeyBytes {
            q,
            p: pad_to(&value.p, width),
            g: pad_to(&value.g, width),
            y: pad_to(&value.y, width),
        }
    }
}

/// Left-pads an integer with zeros to the given width.
pub(crate) fn pad_to(data: &[u8], width: usize) -> Box<[u8]> {
    if data.len() >= width {
        data[data.len() - width..].into()
    } else {
        let mut out = vec![0u8; width];
        out[width - data.len()..].copy_from_slice(data);
        out.into_boxed_slice()
    }
}

//============ Error Types ===================================================

//------------ FromDnskeyError -----------------------------------------------

/// An error in decoding the public key of a DNSKEY record.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FromDnskeyError {
    /// The key's algorithm is not supported.
    UnsupportedAlgorithm,

    /// The key's protocol is not supported.
    UnsupportedProtocol,

    /// The key's length does not match the algorithm's key sizes.
    InvalidKeyLength,

    /// The key is otherwise malformed.
    InvalidKey,
}

//--- Display, Error

impl fmt::Display for FromDnskeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedAlgorithm => "unsupported algorithm",
            Self::UnsupportedProtocol => "unsupported protocol",
            Self::InvalidKeyLength => "invalid key length",
            Self::InvalidKey => "malformed key",
        })
    }
}

impl std::error::Error for FromDnskeyError {}

//------------ BindFormatError -----------------------------------------------

/// An error in loading a [`SecretKeyBytes`] from the conventional DNS
/// format.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindFormatError {
    /// The key file uses an unsupported version of the format.
    UnsupportedFormat,

    /// The key file did not follow the DNS format correctly.
    Misformatted,

    /// The key file used an unsupported algorithm.
    UnsupportedAlgorithm,
}

//--- Display, Error

impl fmt::Display for BindFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedFormat => "unsupported format",
            Self::Misformatted => "misformatted key file",
            Self::UnsupportedAlgorithm => "unsupported algorithm",
        })
    }
}

impl std::error::Error for BindFormatError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::string::ToString;

    #[test]
    fn rsa_public_roundtrip() {
        let mut rdata = vec![3u8, 1, 0, 1];
        rdata.extend_from_slice(&[0xC0; 128]);
        let dnskey = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::RSASHA256,
            rdata.clone(),
        )
        .unwrap();
        let key = PublicKeyBytes::from_dnskey(&dnskey).unwrap();
        assert_eq!(key.algorithm(), SecurityAlgorithm::RSASHA256);
        assert_eq!(key.to_dnskey_format(), rdata);
        assert_eq!(key.key_size(), 1024);
    }

    #[test]
    fn dsa_public_roundtrip() {
        let t = 8usize;
        let width = 64 + 8 * t;
        let mut rdata = vec![t as u8];
        rdata.extend_from_slice(&[0x11; 20]);
        rdata.extend_from_slice(&vec![0x22; width]);
        rdata.extend_from_slice(&vec![0x33; width]);
        rdata.extend_from_slice(&vec![0x44; width]);
        let dnskey =
            Dnskey::new(256, 3, SecurityAlgorithm::DSA, rdata.clone())
                .unwrap();
        let key = PublicKeyBytes::from_dnskey(&dnskey).unwrap();
        assert_eq!(key.to_dnskey_format(), rdata);

        // A truncated key must be rejected.
        let dnskey = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::DSA,
            rdata[..rdata.len() - 1].to_vec(),
        )
        .unwrap();
        assert_eq!(
            PublicKeyBytes::from_dnskey(&dnskey),
            Err(FromDnskeyError::InvalidKeyLength)
        );
    }

    #[test]
    fn fixed_width_lengths() {
        let dnskey =
            Dnskey::new(256, 3, SecurityAlgorithm::ED25519, vec![0u8; 31])
                .unwrap();
        assert_eq!(
            PublicKeyBytes::from_dnskey(&dnskey),
            Err(FromDnskeyError::InvalidKeyLength)
        );

        let dnskey =
            Dnskey::new(256, 3, SecurityAlgorithm::ED25519, vec![0u8; 32])
                .unwrap();
        assert!(PublicKeyBytes::from_dnskey(&dnskey).is_ok());
    }

    #[test]
    fn bad_protocol() {
        let dnskey =
            Dnskey::new(256, 2, SecurityAlgorithm::ED25519, vec![0u8; 32])
                .unwrap();
        assert_eq!(
            PublicKeyBytes::from_dnskey(&dnskey),
            Err(FromDnskeyError::UnsupportedProtocol)
        );
    }

    #[test]
    fn ed25519_secret_from_bind() {
        let text = "Private-key-format: v1.2\n\
                    Algorithm: 15 (ED25519)\n\
                    PrivateKey: AQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE=\n";
        let key = SecretKeyBytes::parse_from_bind(text).unwrap();
        assert_eq!(key.algorithm(), SecurityAlgorithm::ED25519);
        let SecretKeyBytes::Ed25519(secret) = &key else {
            panic!("wrong variant");
        };
        assert_eq!(secret.expose_secret(), &[1u8; 32]);
        assert_eq!(key.display_as_bind().to_string(), text);
    }

    #[test]
    fn dsa_secret_roundtrip() {
        let key = SecretKeyBytes::Dsa(DsaSecretKeyBytes {
            p: vec![0xAA; 128].into(),
            q: vec![0xBB; 20].into(),
            g: vec![0xCC; 128].into(),
            x: Box::<[u8]>::from(&[0xDD; 20][..]).into(),
            y: vec![0xEE; 128].into(),
        });
        let text = key.display_as_bind().to_string();
        let same = SecretKeyBytes::parse_from_bind(&text).unwrap();
        assert_eq!(same.algorithm(), SecurityAlgorithm::DSA);
        assert_eq!(same.display_as_bind().to_string(), text);
    }

    #[test]
    fn unknown_algorithm() {
        let text = "Private-key-format: v1.2\n\
                    Algorithm: 2 (DH)\n\
                    PrivateKey: AQEB\n";
        assert_eq!(
            SecretKeyBytes::parse_from_bind(text).unwrap_err(),
            BindFormatError::UnsupportedAlgorithm
        );
    }

    #[test]
    fn unsupported_format() {
        let text = "Private-key-format: v2.0\n\
                    Algorithm: 15 (ED25519)\n";
        assert_eq!(
            SecretKeyBytes::parse_from_bind(text).unwrap_err(),
            BindFormatError::UnsupportedFormat
        );
    }
}
