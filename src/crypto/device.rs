//! Signing with keys held by an external device.
//!
//! Hardware security modules and other key stores expose a narrow signing
//! capability: given an opaque reference to a key they hold, they produce
//! raw signature bytes over a digest or message, and they can export the
//! public attributes of the key. The private key material itself never
//! enters process memory.
//!
//! The [`SignDevice`] trait captures exactly that capability; the session,
//! slot, and object management of the actual device protocol is the
//! responsibility of the implementing type. [`DeviceKeyPair`] turns a
//! device-held key into a [`SignRaw`] implementation, so that signing code
//! cannot tell it apart from a key pair held in process memory.
//!
//! # Input conventions
//!
//! Devices typically implement the raw signature primitive, not the DNSSEC
//! signature scheme, so the division of labour follows the PKCS#11
//! mechanism conventions:
//!
//! - For the RSA algorithms, the device receives the complete ASN.1
//!   `DigestInfo` — the digest-algorithm prefix followed by the hash — and
//!   applies PKCS#1 v1.5 padding and the private-key operation itself
//!   (`CKM_RSA_PKCS`). Computing the hash and prepending the prefix bytes
//!   is the caller's job and happens here.
//!
//! - For ECDSA, the device receives the bare hash and returns either the
//!   fixed-width `r || s` form or an ASN.1 DER `ECDSA-Sig-Value`; the DER
//!   form is converted here.
//!
//! - For DSA, the device receives the full message (`CKM_DSA_SHA1`) and
//!   returns `r || s` or DER; the key's size octet is prepended here.
//!
//! - For Ed25519 and Ed448, the device receives the full message.

#![cfg(any(feature = "ring", feature = "openssl"))]
#![cfg_attr(
    docsrs,
    doc(cfg(any(feature = "ring", feature = "openssl")))
)]

use core::fmt;

use std::string::String;
use std::sync::Arc;
use std::vec::Vec;

use crate::base::iana::SecurityAlgorithm;
use crate::crypto::bytes::{pad_to, FromDnskeyError, PublicKeyBytes};
use crate::crypto::common::{rsa_encode, DigestContext, DigestType};
use crate::crypto::sign::{SignError, SignRaw, Signature};
use crate::rdata::Dnskey;

//------------ KeyHandle -----------------------------------------------------

/// An opaque reference to a key held by an external device.
///
/// The handle is only meaningful to the device that issued it; it carries
/// no key material.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyHandle(String);

impl KeyHandle {
    /// Creates a handle from its device-specific identifier.
    pub fn new(id: impl Into<String>) -> Self {
        KeyHandle(id.into())
    }

    /// Returns the device-specific identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//------------ SignInput -----------------------------------------------------

/// The input handed to a device for signing.
///
/// Which form an algorithm uses is fixed by the module-level conventions.
#[derive(Clone, Copy, Debug)]
pub enum SignInput<'a> {
    /// The full message to be signed.
    Message(&'a [u8]),

    /// A digest computed over the message, including any algorithm prefix
    /// the signature scheme demands.
    Digest(&'a [u8]),
}

impl AsRef<[u8]> for SignInput<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Message(data) => data,
            Self::Digest(data) => data,
        }
    }
}

//------------ PublicAttributes ----------------------------------------------

/// The public attributes of a device-held key.
///
/// These are the raw public fields as the device exports them; encoding
/// them into DNSKEY record data happens on this side of the boundary.
#[derive(Clone, Debug)]
pub enum PublicAttributes {
    /// An RSA public key.
    Rsa {
        /// The public exponent.
        public_exponent: Vec<u8>,

        /// The public modulus.
        modulus: Vec<u8>,
    },

    /// A DSA public key.
    Dsa {
        /// The prime.
        prime: Vec<u8>,

        /// The subprime.
        subprime: Vec<u8>,

        /// The base.
        base: Vec<u8>,

        /// The public value.
        value: Vec<u8>,
    },

    /// An elliptic curve point.
    ///
    /// The point may carry the SEC 1 uncompressed-form prefix `0x04`;
    /// it is stripped during encoding.
    EcPoint {
        /// The encoded point.
        point: Vec<u8>,
    },

    /// An Edwards curve point.
    Edwards {
        /// The encoded point.
        point: Vec<u8>,
    },
}

//------------ SignDevice ----------------------------------------------------

/// The signing capability of an external device.
///
/// Implementations are expected to block for the duration of a device
/// operation; callers that need timeouts or cancellation must apply them
/// around these calls.
pub trait SignDevice {
    /// Signs the given input with the key behind the handle.
    ///
    /// The returned bytes are the raw signature in the device's output
    /// format; conversion to the DNSSEC wire form happens in
    /// [`DeviceKeyPair`].
    fn sign(
        &self,
        handle: &KeyHandle,
        input: SignInput<'_>,
        algorithm: SecurityAlgorithm,
    ) -> Result<Vec<u8>, DeviceError>;

    /// Exports the public attributes of the key behind the handle.
    fn export_public_attributes(
        &self,
        handle: &KeyHandle,
    ) -> Result<PublicAttributes, DeviceError>;
}

//------------ DeviceKeyPair -------------------------------------------------

/// A key pair whose private half lives in an external device.
///
/// The type implements [`SignRaw`], so the signing code treats it exactly
/// like a key pair held in process memory: for the same key material, the
/// produced RRSIG records are identical regardless of which path created
/// them.
#[derive(Clone)]
pub struct DeviceKeyPair {
    /// The algorithm of the key.
    algorithm: SecurityAlgorithm,

    /// The handle of the private key on the device.
    handle: KeyHandle,

    /// The device holding the key.
    device: Arc<dyn SignDevice + Send + Sync>,

    /// The public key, encoded at construction from the attributes the
    /// device exported.
    dnskey: Dnskey<Vec<u8>>,

    /// The size octet of a DSA key, zero for other algorithms.
    dsa_t: u8,
}

impl DeviceKeyPair {
    /// Creates a key pair from a device-held key.
    ///
    /// The device is asked for the key's public attributes, which are
    /// validated against the algorithm and encoded into DNSKEY form.
    pub fn new(
        algorithm: SecurityAlgorithm,
        flags: u16,
        handle: KeyHandle,
        device: Arc<dyn SignDevice + Send + Sync>,
    ) -> Result<Self, FromDeviceError> {
        let attributes = device.export_public_attributes(&handle)?;
        let data = match attributes {
            PublicAttributes::Rsa {
                public_exponent,
                modulus,
            } => rsa_encode(&public_exponent, &modulus),
            PublicAttributes::Dsa {
                prime,
                subprime,
                base,
                value,
            } => {
                let t = (prime.len().saturating_sub(64) + 7) / 8;
                let width = 64 + 8 * t;
                let mut data = Vec::with_capacity(21 + 3 * width);
                data.push(t as u8);
                data.extend_from_slice(&pad_to(&subprime, 20));
                data.extend_from_slice(&pad_to(&prime, width));
                data.extend_from_slice(&pad_to(&base, width));
                data.extend_from_slice(&pad_to(&value, width));
                data
            }
            PublicAttributes::EcPoint { point } => {
                // Strip the SEC 1 uncompressed-form prefix if present.
                if point.len() % 2 == 1 && point.first() == Some(&0x04) {
                    point[1..].to_vec()
                } else {
                    point
                }
            }
            PublicAttributes::Edwards { point } => point,
        };

        let dnskey = Dnskey::new(flags, 3, algorithm, data)
            .map_err(|_| FromDeviceError::InvalidAttributes)?;

        // Validate the encoding against the algorithm's layout rules.
        let key = PublicKeyBytes::from_dnskey(&dnskey)
            .map_err(FromDeviceError::from)?;
        let dsa_t = match &key {
            PublicKeyBytes::Dsa(k) | PublicKeyBytes::DsaNsec3Sha1(k) => {
                ((k.p.len() - 64) / 8) as u8
            }
            _ => 0,
        };

        Ok(DeviceKeyPair {
            algorithm,
            handle,
            device,
            dnskey,
            dsa_t,
        })
    }

    /// Returns the handle of the key on the device.
    pub fn handle(&self) -> &KeyHandle {
        &self.handle
    }

    /// Computes the hash an RSA variant signs, with its `DigestInfo`
    /// prefix.
    fn rsa_digest_info(&self, data: &[u8]) -> Result<Vec<u8>, SignError> {
        /// ASN.1 prefixes from PKCS #1 v2.1, section 9.2.
        const MD5_PREFIX: &[u8] = &[
            0x30, 0x20, 0x30, 0x0c, 0x06, 0x08, 0x2a, 0x86, 0x48, 0x86,
            0xf7, 0x0d, 0x02, 0x05, 0x05, 0x00, 0x04, 0x10,
        ];
        const SHA1_PREFIX: &[u8] = &[
            0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02,
            0x1a, 0x05, 0x00, 0x04, 0x14,
        ];
        const SHA256_PREFIX: &[u8] = &[
            0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01,
            0x65, 0x03, 0x04, 0x02, 0x01, 0x05, 0x00, 0x04, 0x20,
        ];
        const SHA512_PREFIX: &[u8] = &[
            0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01,
            0x65, 0x03, 0x04, 0x02, 0x03, 0x05, 0x00, 0x04, 0x40,
        ];

        match self.algorithm {
            SecurityAlgorithm::RSAMD5 => {
                // Only the OpenSSL backend provides MD5.
                #[cfg(feature = "openssl")]
                {
                    let hash = openssl::hash::hash(
                        openssl::hash::MessageDigest::md5(),
                        data,
                    )
                    .map_err(|_| SignError::new("MD5 digest failed"))?;
                    let mut info = MD5_PREFIX.to_vec();
                    info.extend_from_slice(hash.as_ref());
                    Ok(info)
                }
                #[cfg(not(feature = "openssl"))]
                Err(SignError::new("RSA/MD5 needs the openssl feature"))
            }
            SecurityAlgorithm::RSASHA1
            | SecurityAlgorithm::RSASHA1_NSEC3_SHA1 => {
                Ok(digest_info(SHA1_PREFIX, DigestType::Sha1, data))
            }
            SecurityAlgorithm::RSASHA256 => {
                Ok(digest_info(SHA256_PREFIX, DigestType::Sha256, data))
            }
            SecurityAlgorithm::RSASHA512 => {
                Ok(digest_info(SHA512_PREFIX, DigestType::Sha512, data))
            }
            _ => unreachable!(),
        }
    }
}

/// Computes a digest and prepends the given `DigestInfo` prefix.
fn digest_info(
    prefix: &[u8],
    digest_type: DigestType,
    data: &[u8],
) -> Vec<u8> {
    let mut ctx = DigestContext::new(digest_type);
    ctx.update(data);
    let hash = ctx.finish();
    let mut info = prefix.to_vec();
    info.extend_from_slice(hash.as_ref());
    info
}

/// Brings an ECDSA or DSA device signature into the fixed `r || s` form.
///
/// Devices return either the fixed form directly (PKCS#11 style) or an
/// ASN.1 DER `Dss-Sig-Value` (KMIP style).
fn normalize_split_signature(
    signature: Vec<u8>,
    half_len: usize,
) -> Result<Vec<u8>, SignError> {
    if signature.len() == 2 * half_len {
        return Ok(signature);
    }

    #[cfg(feature = "openssl")]
    {
        let signature = openssl::ecdsa::EcdsaSig::from_der(&signature)
            .map_err(|_| {
                SignError::new("malformed signature from device")
            })?;
        let mut out = signature
            .r()
            .to_vec_padded(half_len as i32)
            .map_err(|_| SignError::new("signature integer too large"))?;
        let mut s = signature
            .s()
            .to_vec_padded(half_len as i32)
            .map_err(|_| SignError::new("signature integer too large"))?;
        out.append(&mut s);
        Ok(out)
    }

    #[cfg(not(feature = "openssl"))]
    Err(SignError::new("malformed signature from device"))
}

//--- SignRaw

impl SignRaw for DeviceKeyPair {
    fn algorithm(&self) -> SecurityAlgorithm {
        self.algorithm
    }

    fn dnskey(&self) -> Result<Dnskey<Vec<u8>>, SignError> {
        Ok(self.dnskey.clone())
    }

    fn sign_raw(&self, data: &[u8]) -> Result<Signature, SignError> {
        match self.algorithm {
            SecurityAlgorithm::RSAMD5
            | SecurityAlgorithm::RSASHA1
            | SecurityAlgorithm::RSASHA1_NSEC3_SHA1
            | SecurityAlgorithm::RSASHA256
            | SecurityAlgorithm::RSASHA512 => {
                let info = self.rsa_digest_info(data)?;
                let sig = self.device.sign(
                    &self.handle,
                    SignInput::Digest(&info),
                    self.algorithm,
                )?;
                let sig = sig.into_boxed_slice();
                Ok(match self.algorithm {
                    SecurityAlgorithm::RSAMD5 => Signature::RsaMd5(sig),
                    SecurityAlgorithm::RSASHA1 => Signature::RsaSha1(sig),
                    SecurityAlgorithm::RSASHA1_NSEC3_SHA1 => {
                        Signature::RsaSha1Nsec3Sha1(sig)
                    }
                    SecurityAlgorithm::RSASHA256 => {
                        Signature::RsaSha256(sig)
                    }
                    SecurityAlgorithm::RSASHA512 => {
                        Signature::RsaSha512(sig)
                    }
                    _ => unreachable!(),
                })
            }

            SecurityAlgorithm::DSA
            | SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                let sig = self.device.sign(
                    &self.handle,
                    SignInput::Message(data),
                    self.algorithm,
                )?;
                let sig = normalize_split_signature(sig, 20)?;
                let mut out = Vec::with_capacity(41);
                out.push(self.dsa_t);
                out.extend_from_slice(&sig);
                let out: Box<[u8; 41]> = Box::<[u8]>::from(out)
                    .try_into()
                    .map_err(|_| {
                        SignError::new("DSA signature has wrong size")
                    })?;
                Ok(match self.algorithm {
                    SecurityAlgorithm::DSA => Signature::Dsa(out),
                    _ => Signature::DsaNsec3Sha1(out),
                })
            }

            SecurityAlgorithm::ECDSAP256SHA256
            | SecurityAlgorithm::ECDSAP384SHA384 => {
                let (digest_type, half_len) = match self.algorithm {
                    SecurityAlgorithm::ECDSAP256SHA256 => {
                        (DigestType::Sha256, 32)
                    }
                    _ => (DigestType::Sha384, 48),
                };
                let mut ctx = DigestContext::new(digest_type);
                ctx.update(data);
                let hash = ctx.finish();
                let sig = self.device.sign(
                    &self.handle,
                    SignInput::Digest(hash.as_ref()),
                    self.algorithm,
                )?;
                let sig = normalize_split_signature(sig, half_len)?;
                let sig: Box<[u8]> = sig.into_boxed_slice();
                match self.algorithm {
                    SecurityAlgorithm::ECDSAP256SHA256 => sig
                        .try_into()
                        .map(Signature::EcdsaP256Sha256)
                        .map_err(|_| {
                            "ECDSA signature has wrong size".into()
                        }),
                    _ => sig
                        .try_into()
                        .map(Signature::EcdsaP384Sha384)
                        .map_err(|_| {
                            "ECDSA signature has wrong size".into()
                        }),
                }
            }

            SecurityAlgorithm::ED25519 | SecurityAlgorithm::ED448 => {
                let sig = self.device.sign(
                    &self.handle,
                    SignInput::Message(data),
                    self.algorithm,
                )?;
                let sig: Box<[u8]> = sig.into_boxed_slice();
                match self.algorithm {
                    SecurityAlgorithm::ED25519 => sig
                        .try_into()
                        .map(Signature::Ed25519)
                        .map_err(|_| {
                            "Ed25519 signature has wrong size".into()
                        }),
                    _ => sig.try_into().map(Signature::Ed448).map_err(
                        |_| "Ed448 signature has wrong size".into(),
                    ),
                }
            }

            _ => Err(SignError::new("unsupported device algorithm")),
        }
    }
}

//--- Debug

impl fmt::Debug for DeviceKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("DeviceKeyPair")
            .field("algorithm", &self.algorithm)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

//============ Error Types ===================================================

//------------ DeviceError ---------------------------------------------------

/// A failure reported by an external signing device.
///
/// The message is the device's own; it is passed through to callers
/// unmodified.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeviceError(String);

impl DeviceError {
    /// Creates a new error with the device's message.
    pub fn new(message: impl Into<String>) -> Self {
        DeviceError(message.into())
    }

    /// Returns the device's message.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DeviceError {}

impl From<DeviceError> for SignError {
    fn from(value: DeviceError) -> Self {
        SignError::new(value.0)
    }
}

//------------ FromDeviceError -----------------------------------------------

/// An error in importing a device-held key.
#[derive(Clone, Debug)]
pub enum FromDeviceError {
    /// The device reported a failure.
    Device(DeviceError),

    /// The exported public attributes do not fit the algorithm.
    InvalidAttributes,

    /// The algorithm is not supported.
    UnsupportedAlgorithm,
}

//--- Conversions

impl From<DeviceError> for FromDeviceError {
    fn from(value: DeviceError) -> Self {
        Self::Device(value)
    }
}

impl From<FromDnskeyError> for FromDeviceError {
    fn from(value: FromDnskeyError) -> Self {
        match value {
            FromDnskeyError::UnsupportedAlgorithm => {
                Self::UnsupportedAlgorithm
            }
            _ => Self::InvalidAttributes,
        }
    }
}

//--- Display, Error

impl fmt::Display for FromDeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(err) => err.fmt(f),
            Self::InvalidAttributes => {
                f.write_str("invalid public key attributes")
            }
            Self::UnsupportedAlgorithm => {
                f.write_str("unsupported algorithm")
            }
        }
    }
}

impl std::error::Error for FromDeviceError {}

//============ Tests =========================================================

#[cfg(all(test, feature = "openssl"))]
mod test {
    use super::*;

    use std::collections::HashMap;

    use openssl::bn::{BigNum, BigNumContext};
    use openssl::ec::{EcGroup, EcKey, EcPoint};
    use openssl::ecdsa::EcdsaSig;
    use openssl::hash::MessageDigest;
    use openssl::nid::Nid;
    use openssl::pkey::PKey;
    use openssl::sign::Signer;

    use secrecy::ExposeSecret;

    use crate::crypto::bytes::{
        DsaPublicKeyBytes, PublicKeyBytes, SecretKeyBytes,
    };
    use crate::crypto::common::PublicKey;
    use crate::crypto::sign::{generate, GenerateParams, KeyPair};

    /// An in-process device for testing.
    ///
    /// It holds raw key material and implements the exact input and output
    /// conventions a PKCS#11 or KMIP backed device would: raw PKCS#1
    /// signing over a caller-provided `DigestInfo` for RSA, DER output for
    /// the split-integer algorithms.
    struct MemoryDevice {
        keys: HashMap<KeyHandle, (SecretKeyBytes, Dnskey<Vec<u8>>)>,
    }

    impl MemoryDevice {
        fn new() -> Self {
            MemoryDevice {
                keys: HashMap::new(),
            }
        }

        fn insert(
            &mut self,
            handle: &KeyHandle,
            secret: SecretKeyBytes,
            public: Dnskey<Vec<u8>>,
        ) {
            self.keys.insert(handle.clone(), (secret, public));
        }

        fn key(
            &self,
            handle: &KeyHandle,
        ) -> Result<&(SecretKeyBytes, Dnskey<Vec<u8>>), DeviceError> {
            self.keys
                .get(handle)
                .ok_or_else(|| DeviceError::new("no such key"))
        }
    }

    impl SignDevice for MemoryDevice {
        fn sign(
            &self,
            handle: &KeyHandle,
            input: SignInput<'_>,
            algorithm: SecurityAlgorithm,
        ) -> Result<Vec<u8>, DeviceError> {
            let err = |_| DeviceError::new("device operation failed");
            let (secret, _) = self.key(handle)?;
            match secret {
                SecretKeyBytes::RsaSha256(s) => {
                    assert_eq!(algorithm, SecurityAlgorithm::RSASHA256);
                    let SignInput::Digest(info) = input else {
                        return Err(DeviceError::new("expected a digest"));
                    };
                    let rsa = openssl::rsa::Rsa::from_private_components(
                        BigNum::from_slice(&s.n).map_err(err)?,
                        BigNum::from_slice(&s.e).map_err(err)?,
                        BigNum::from_slice(s.d.expose_secret())
                            .map_err(err)?,
                        BigNum::from_slice(s.p.expose_secret())
                            .map_err(err)?,
                        BigNum::from_slice(s.q.expose_secret())
                            .map_err(err)?,
                        BigNum::from_slice(s.d_p.expose_secret())
                            .map_err(err)?,
                        BigNum::from_slice(s.d_q.expose_secret())
                            .map_err(err)?,
                        BigNum::from_slice(s.q_i.expose_secret())
                            .map_err(err)?,
                    )
                    .map_err(err)?;
                    let mut buf = vec![0u8; rsa.size() as usize];
                    let len = rsa
                        .private_encrypt(
                            info,
                            &mut buf,
                            openssl::rsa::Padding::PKCS1,
                        )
                        .map_err(err)?;
                    buf.truncate(len);
                    Ok(buf)
                }

                SecretKeyBytes::Dsa(s) => {
                    assert_eq!(algorithm, SecurityAlgorithm::DSA);
                    let SignInput::Message(message) = input else {
                        return Err(DeviceError::new("expected a message"));
                    };
                    let key = openssl::dsa::Dsa::from_private_components(
                        BigNum::from_slice(&s.p).map_err(err)?,
                        BigNum::from_slice(&s.q).map_err(err)?,
                        BigNum::from_slice(&s.g).map_err(err)?,
                        BigNum::from_slice(s.x.expose_secret())
                            .map_err(err)?,
                        BigNum::from_slice(&s.y).map_err(err)?,
                    )
                    .map_err(err)?;
                    let pkey = PKey::from_dsa(key).map_err(err)?;
                    let mut signer =
                        Signer::new(MessageDigest::sha1(), &pkey)
                            .map_err(err)?;
                    // The device answers in DER form.
                    signer.sign_oneshot_to_vec(message).map_err(err)
                }

                SecretKeyBytes::EcdsaP256Sha256(s) => {
                    assert_eq!(
                        algorithm,
                        SecurityAlgorithm::ECDSAP256SHA256
                    );
                    let SignInput::Digest(hash) = input else {
                        return Err(DeviceError::new("expected a digest"));
                    };
                    let group =
                        EcGroup::from_curve_name(Nid::X9_62_PRIME256V1)
                            .map_err(err)?;
                    let n = BigNum::from_slice(s.expose_secret())
                        .map_err(err)?;
                    let ctx = BigNumContext::new().map_err(err)?;
                    let mut point = EcPoint::new(&group).map_err(err)?;
                    point
                        .mul_generator(&group, &n, &ctx)
                        .map_err(err)?;
                    let key =
                        EcKey::from_private_components(&group, &n, &point)
                            .map_err(err)?;
                    // The device answers in DER form.
                    EcdsaSig::sign(hash, &key)
                        .and_then(|sig| sig.to_der())
                        .map_err(err)
                }

                SecretKeyBytes::Ed25519(s) => {
                    assert_eq!(algorithm, SecurityAlgorithm::ED25519);
                    let SignInput::Message(message) = input else {
                        return Err(DeviceError::new("expected a message"));
                    };
                    let pkey = PKey::private_key_from_raw_bytes(
                        s.expose_secret(),
                        openssl::pkey::Id::ED25519,
                    )
                    .map_err(err)?;
                    let mut signer =
                        Signer::new_without_digest(&pkey).map_err(err)?;
                    signer.sign_oneshot_to_vec(message).map_err(err)
                }

                _ => Err(DeviceError::new("unsupported algorithm")),
            }
        }

        fn export_public_attributes(
            &self,
            handle: &KeyHandle,
        ) -> Result<PublicAttributes, DeviceError> {
            let (_, public) = self.key(handle)?;
            let key = PublicKeyBytes::from_dnskey(public)
                .map_err(|_| DeviceError::new("malformed key"))?;
            Ok(match key {
                PublicKeyBytes::RsaSha256(k) => PublicAttributes::Rsa {
                    public_exponent: k.e.to_vec(),
                    modulus: k.n.to_vec(),
                },
                PublicKeyBytes::Dsa(DsaPublicKeyBytes {
                    q,
                    p,
                    g,
                    y,
                }) => PublicAttributes::Dsa {
                    prime: p.to_vec(),
                    subprime: q.to_vec(),
                    base: g.to_vec(),
                    value: y.to_vec(),
                },
                PublicKeyBytes::EcdsaP256Sha256(k) => {
                    // Export in SEC 1 uncompressed form, as devices do.
                    let mut point = vec![0x04];
                    point.extend_from_slice(k.as_slice());
                    PublicAttributes::EcPoint { point }
                }
                PublicKeyBytes::Ed25519(k) => PublicAttributes::Edwards {
                    point: k.to_vec(),
                },
                _ => {
                    return Err(DeviceError::new("unsupported algorithm"))
                }
            })
        }
    }

    fn device_with_key(
        params: GenerateParams,
    ) -> (Arc<MemoryDevice>, KeyHandle, KeyPair, Dnskey<Vec<u8>>) {
        let (secret, public) = generate(params, 256).unwrap();
        let local = KeyPair::from_bytes(&secret, &public).unwrap();
        let handle = KeyHandle::new("key-1");
        let mut device = MemoryDevice::new();
        device.insert(&handle, secret, public.clone());
        (Arc::new(device), handle, local, public)
    }

    #[test]
    fn device_key_exports_same_dnskey() {
        for params in [
            GenerateParams::RsaSha256 { bits: 2048 },
            GenerateParams::Dsa,
            GenerateParams::EcdsaP256Sha256,
            GenerateParams::Ed25519,
        ] {
            let algorithm = params.algorithm();
            let (device, handle, _, public) = device_with_key(params);
            let key =
                DeviceKeyPair::new(algorithm, 256, handle, device).unwrap();
            assert_eq!(key.dnskey().unwrap(), public);
        }
    }

    #[test]
    fn device_signatures_verify() {
        for params in [
            GenerateParams::RsaSha256 { bits: 2048 },
            GenerateParams::Dsa,
            GenerateParams::EcdsaP256Sha256,
            GenerateParams::Ed25519,
        ] {
            let algorithm = params.algorithm();
            let (device, handle, local, public) = device_with_key(params);
            let key =
                DeviceKeyPair::new(algorithm, 256, handle, device).unwrap();

            let data = b"Hello, World!";
            let sig = key.sign_raw(data).unwrap();
            let public_key = PublicKey::from_dnskey(&public).unwrap();
            public_key.verify(data, sig.as_ref()).unwrap();

            // The local path must accept the same signature shape.
            let local_sig = SignRaw::sign_raw(&local, data).unwrap();
            public_key.verify(data, local_sig.as_ref()).unwrap();
        }
    }

    #[test]
    fn deterministic_algorithms_match_local_path() {
        for params in [
            GenerateParams::RsaSha256 { bits: 2048 },
            GenerateParams::Ed25519,
        ] {
            let algorithm = params.algorithm();
            let (device, handle, local, _) = device_with_key(params);
            let key =
                DeviceKeyPair::new(algorithm, 256, handle, device).unwrap();

            let data = b"Hello, World!";
            let device_sig = key.sign_raw(data).unwrap();
            let local_sig = SignRaw::sign_raw(&local, data).unwrap();
            assert_eq!(device_sig, local_sig);
        }
    }

    #[test]
    fn rrsig_via_device_matches_local_path() {
        use crate::base::iana::Class;
        use crate::base::name::Name;
        use crate::base::record::{Record, Rrset, Ttl};
        use crate::rdata::{Timestamp, Txt};
        use crate::sign::{sign_rrset, SignerKey, SigningConfig, SigningKey};
        use crate::validate::verify_rrset;

        use core::str::FromStr;

        let (device, handle, local, public) =
            device_with_key(GenerateParams::Ed25519);
        let device_key = DeviceKeyPair::new(
            SecurityAlgorithm::ED25519,
            256,
            handle,
            device,
        )
        .unwrap();

        let owner = Name::from_str("example.org.").unwrap();
        let records = vec![Record::new(
            owner.clone(),
            Class::IN,
            Ttl::from_secs(3600),
            Txt::build(b"Hello world").unwrap(),
        )];
        let rrset = Rrset::new(&records).unwrap();
        let config = SigningConfig::new(
            Timestamp::from_str("20260101000000").unwrap(),
            Timestamp::from_str("20260201000000").unwrap(),
        );

        let local_key = SigningKey::new(
            owner.clone(),
            256,
            SignerKey::Local(local),
        );
        let device_key =
            SigningKey::new(owner, 256, SignerKey::Device(device_key));

        // Ed25519 signatures are deterministic: the two paths must
        // produce the identical RRSIG record.
        let local_sig = sign_rrset(&local_key, &rrset, &config).unwrap();
        let device_sig = sign_rrset(&device_key, &rrset, &config).unwrap();
        assert_eq!(local_sig, device_sig);
        assert_eq!(
            verify_rrset(device_sig.data(), &public, &rrset),
            Ok(true)
        );
    }

    #[test]
    fn device_failure_passes_through() {
        let device = Arc::new(MemoryDevice::new());
        let handle = KeyHandle::new("no-such-key");
        let err = DeviceKeyPair::new(
            SecurityAlgorithm::ED25519,
            256,
            handle,
            device,
        )
        .unwrap_err();
        let FromDeviceError::Device(err) = err else {
            panic!("expected a device error");
        };
        assert_eq!(err.message(), "no such key");
    }
}
