//! DNSSEC signing and verification using OpenSSL.
//!
//! This backend supports the full algorithm table, including the legacy
//! algorithms Ring does not implement:
//!
//! - RSA/MD5
//! - DSA
//! - RSA/SHA-1
//! - RSA/SHA-256 (512-bit keys or larger)
//! - RSA/SHA-512
//! - ECDSA P-256/SHA-256
//! - ECDSA P-384/SHA-384
//! - Ed25519
//! - Ed448

#![cfg(feature = "openssl")]
#![cfg_attr(docsrs, doc(cfg(feature = "openssl")))]

use core::fmt;

use std::vec::Vec;

use openssl::bn::{BigNum, BigNumContext};
use openssl::dsa::{Dsa, DsaSig};
use openssl::ec::{EcGroup, EcKey, EcPoint, PointConversionForm};
use openssl::ecdsa::EcdsaSig;
use openssl::error::ErrorStack;
use openssl::hash::{DigestBytes, Hasher, MessageDigest};
use openssl::nid::Nid;
use openssl::pkey::{Id, PKey, Public};
use openssl::rsa::Rsa;
use openssl::sign::Verifier;

use super::bytes::DsaPublicKeyBytes;
use super::common::{
    rsa_encode, rsa_exponent_modulus, AlgorithmError, DigestType,
};
use crate::base::iana::SecurityAlgorithm;
use crate::rdata::Dnskey;

//============ Error Types ===================================================

//----------- FromBytesError -------------------------------------------------

/// An error in importing a key pair from bytes into OpenSSL.
#[derive(Clone, Debug)]
pub enum FromBytesError {
    /// The requested algorithm was not supported.
    UnsupportedAlgorithm,

    /// The key's parameters were invalid.
    InvalidKey,

    /// An implementation failure occurred.
    ///
    /// This includes memory allocation failures.
    Implementation,
}

//--- Conversion

impl From<ErrorStack> for FromBytesError {
    fn from(_: ErrorStack) -> Self {
        Self::Implementation
    }
}

//--- Formatting

impl fmt::Display for FromBytesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedAlgorithm => "algorithm not supported",
            Self::InvalidKey => "malformed or insecure private key",
            Self::Implementation => "an internal error occurred",
        })
    }
}

//--- Error

impl std::error::Error for FromBytesError {}

//----------- GenerateError --------------------------------------------------

/// An error in generating a key pair with OpenSSL.
#[derive(Clone, Debug)]
pub enum GenerateError {
    /// The requested algorithm was not supported.
    UnsupportedAlgorithm,

    /// An implementation failure occurred.
    ///
    /// This includes memory allocation failures.
    Implementation,
}

//--- Conversion

impl From<ErrorStack> for GenerateError {
    fn from(_: ErrorStack) -> Self {
        Self::Implementation
    }
}

//--- Formatting

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedAlgorithm => "algorithm not supported",
            Self::Implementation => "an internal error occurred",
        })
    }
}

//--- Error

impl std::error::Error for GenerateError {}

//----------- DigestContext --------------------------------------------------

/// Context for computing a message digest.
pub struct DigestContext(Hasher);

impl DigestContext {
    /// Create a new context for a specified digest type.
    pub fn new(digest_type: DigestType) -> Self {
        Self(
            match digest_type {
                DigestType::Sha1 => Hasher::new(MessageDigest::sha1()),
                DigestType::Sha256 => Hasher::new(MessageDigest::sha256()),
                DigestType::Sha384 => Hasher::new(MessageDigest::sha384()),
                DigestType::Sha512 => Hasher::new(MessageDigest::sha512()),
            }
            .expect("assume that new cannot fail"),
        )
    }

    /// Add input to the digest computation.
    pub fn update(&mut self, data: &[u8]) {
        self.0
            .update(data)
            .expect("assume that update does not fail")
    }

    /// Finish computing the digest.
    pub fn finish(mut self) -> Digest {
        Digest(self.0.finish().expect("assume that finish does not fail"))
    }
}

//----------- Digest ---------------------------------------------------------

/// A computed message digest.
pub struct Digest(DigestBytes);

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

//----------- Helpers --------------------------------------------------------

/// Returns the message digest an RSA variant signs with.
fn rsa_digest(algorithm: SecurityAlgorithm) -> Option<MessageDigest> {
    match algorithm {
        SecurityAlgorithm::RSAMD5 => Some(MessageDigest::md5()),
        SecurityAlgorithm::RSASHA1
        | SecurityAlgorithm::RSASHA1_NSEC3_SHA1 => {
            Some(MessageDigest::sha1())
        }
        SecurityAlgorithm::RSASHA256 => Some(MessageDigest::sha256()),
        SecurityAlgorithm::RSASHA512 => Some(MessageDigest::sha512()),
        _ => None,
    }
}

/// Returns the size octet T for a DSA prime of the given width in octets.
fn dsa_t(prime_len: usize) -> u8 {
    ((prime_len.saturating_sub(64) + 7) / 8) as u8
}

/// Encodes a DSA public key into DNSKEY record data format.
fn dsa_encode(dsa: &openssl::dsa::DsaRef<impl openssl::pkey::HasPublic>)
    -> Result<Vec<u8>, ErrorStack>
{
    let t = dsa_t(dsa.p().num_bytes() as usize);
    let width = 64 + 8 * usize::from(t);
    let key = DsaPublicKeyBytes {
        q: {
            let q: Box<[u8]> =
                dsa.q().to_vec_padded(20)?.into_boxed_slice();
            q.try_into().expect("padded to 20 octets")
        },
        p: dsa.p().to_vec_padded(width as i32)?.into_boxed_slice(),
        g: dsa.g().to_vec_padded(width as i32)?.into_boxed_slice(),
        y: dsa
            .pub_key()
            .to_vec_padded(width as i32)?
            .into_boxed_slice(),
    };
    Ok(key.to_dnskey_format())
}

//----------- PublicKey ------------------------------------------------------

/// A public key for verifying a signature.
pub enum PublicKey {
    /// Variant for RSA public keys.
    Rsa {
        /// The algorithm of the key.
        algorithm: SecurityAlgorithm,

        /// The digest the algorithm signs with.
        digest: MessageDigest,

        /// The key itself.
        pkey: PKey<Public>,

        /// Flags from [`Dnskey`].
        flags: u16,
    },

    /// Variant for DSA public keys.
    Dsa {
        /// The algorithm of the key.
        algorithm: SecurityAlgorithm,

        /// The key itself.
        pkey: PKey<Public>,

        /// Flags from [`Dnskey`].
        flags: u16,
    },

    /// Variant for ECDSA public keys.
    EcDsa {
        /// The algorithm of the key.
        algorithm: SecurityAlgorithm,

        /// The digest the algorithm signs with.
        digest: MessageDigest,

        /// The key itself.
        key: EcKey<Public>,

        /// Flags from [`Dnskey`].
        flags: u16,
    },

    /// Variant for Ed25519 and Ed448, which hash internally.
    NoDigest {
        /// The algorithm of the key.
        algorithm: SecurityAlgorithm,

        /// The key itself.
        pkey: PKey<Public>,

        /// Flags from [`Dnskey`].
        flags: u16,
    },
}

impl PublicKey {
    /// Create a public key from a [`Dnskey`].
    pub fn from_dnskey(
        dnskey: &Dnskey<impl AsRef<[u8]>>,
    ) -> Result<Self, AlgorithmError> {
        let sec_alg = dnskey.algorithm();
        match sec_alg {
            SecurityAlgorithm::RSAMD5
            | SecurityAlgorithm::RSASHA1
            | SecurityAlgorithm::RSASHA1_NSEC3_SHA1
            | SecurityAlgorithm::RSASHA256
            | SecurityAlgorithm::RSASHA512 => {
                let digest = rsa_digest(sec_alg).expect("RSA variant");
                let min_bytes = match sec_alg {
                    SecurityAlgorithm::RSAMD5 => 512 / 8,
                    _ => 1024 / 8,
                };

                // The key isn't available in either PEM or DER, so use the
                // components directly.
                let (e, n) = rsa_exponent_modulus(dnskey, min_bytes)?;
                let e = BigNum::from_slice(&e)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let n = BigNum::from_slice(&n)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let public_key = Rsa::from_public_components(n, e)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let pkey = PKey::from_rsa(public_key)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                Ok(PublicKey::Rsa {
                    algorithm: sec_alg,
                    digest,
                    pkey,
                    flags: dnskey.flags(),
                })
            }
            SecurityAlgorithm::DSA
            | SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                let key = DsaPublicKeyBytes::parse_dnskey_format(
                    dnskey.public_key().as_ref(),
                )
                .map_err(|_| AlgorithmError::InvalidData)?;
                let p = BigNum::from_slice(&key.p)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let q = BigNum::from_slice(key.q.as_slice())
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let g = BigNum::from_slice(&key.g)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let y = BigNum::from_slice(&key.y)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let public_key = Dsa::from_public_components(p, q, g, y)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let pkey = PKey::from_dsa(public_key)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                Ok(PublicKey::Dsa {
                    algorithm: sec_alg,
                    pkey,
                    flags: dnskey.flags(),
                })
            }
            SecurityAlgorithm::ECDSAP256SHA256
            | SecurityAlgorithm::ECDSAP384SHA384 => {
                let (digest, group_id) = match sec_alg {
                    SecurityAlgorithm::ECDSAP256SHA256 => {
                        (MessageDigest::sha256(), Nid::X9_62_PRIME256V1)
                    }
                    SecurityAlgorithm::ECDSAP384SHA384 => {
                        (MessageDigest::sha384(), Nid::SECP384R1)
                    }
                    _ => unreachable!(),
                };

                let group = EcGroup::from_curve_name(group_id)
                    .expect("should not fail");
                let mut ctx = BigNumContext::new().expect("should not fail");

                // Add 0x4 identifier to the ECDSA pubkey as expected by
                // openssl.
                let public_key = dnskey.public_key().as_ref();
                let mut key = Vec::with_capacity(public_key.len() + 1);
                key.push(0x4);
                key.extend_from_slice(public_key);
                let point = EcPoint::from_bytes(&group, &key, &mut ctx)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let key = EcKey::from_public_key(&group, &point)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                key.check_key().map_err(|_| AlgorithmError::InvalidData)?;

                Ok(PublicKey::EcDsa {
                    algorithm: sec_alg,
                    digest,
                    key,
                    flags: dnskey.flags(),
                })
            }
            SecurityAlgorithm::ED25519 | SecurityAlgorithm::ED448 => {
                let id = match sec_alg {
                    SecurityAlgorithm::ED25519 => Id::ED25519,
                    SecurityAlgorithm::ED448 => Id::ED448,
                    _ => unreachable!(),
                };
                let pkey = PKey::public_key_from_raw_bytes(
                    dnskey.public_key().as_ref(),
                    id,
                )
                .map_err(|_| AlgorithmError::InvalidData)?;
                Ok(PublicKey::NoDigest {
                    algorithm: sec_alg,
                    pkey,
                    flags: dnskey.flags(),
                })
            }
            _ => Err(AlgorithmError::Unsupported),
        }
    }

    /// Verify a signature.
    pub fn verify(
        &self,
        signed_data: &[u8],
        signature: &[u8],
    ) -> Result<(), AlgorithmError> {
        let valid = match self {
            PublicKey::Rsa { digest, pkey, .. } => {
                let mut verifier = Verifier::new(*digest, pkey.as_ref())
                    .map_err(|_| AlgorithmError::InvalidData)?;
                verifier
                    .verify_oneshot(signature, signed_data)
                    .map_err(|_| AlgorithmError::InvalidData)?
            }
            PublicKey::Dsa { pkey, .. } => {
                // The DNS signature is [T][R; 20][S; 20]; OpenSSL wants the
                // DER form.
                if signature.len() != 41 {
                    return Err(AlgorithmError::InvalidData);
                }
                let r = BigNum::from_slice(&signature[1..21])
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let s = BigNum::from_slice(&signature[21..41])
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let der = DsaSig::from_private_components(r, s)
                    .and_then(|sig| sig.to_der())
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let mut verifier =
                    Verifier::new(MessageDigest::sha1(), pkey.as_ref())
                        .map_err(|_| AlgorithmError::InvalidData)?;
                verifier
                    .verify_oneshot(&der, signed_data)
                    .map_err(|_| AlgorithmError::InvalidData)?
            }
            PublicKey::EcDsa { digest, key, .. } => {
                let half_len = signature.len() / 2;
                let mut hasher = Hasher::new(*digest)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                hasher
                    .update(signed_data)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let hash = hasher
                    .finish()
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let r = BigNum::from_slice(&signature[0..half_len])
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let s = BigNum::from_slice(&signature[half_len..])
                    .map_err(|_| AlgorithmError::InvalidData)?;
                let ecdsa_sig = EcdsaSig::from_private_components(r, s)
                    .map_err(|_| AlgorithmError::InvalidData)?;
                ecdsa_sig
                    .verify(hash.as_ref(), key)
                    .map_err(|_| AlgorithmError::InvalidData)?
            }
            PublicKey::NoDigest { pkey, .. } => {
                let mut verifier =
                    Verifier::new_without_digest(pkey.as_ref())
                        .map_err(|_| AlgorithmError::InvalidData)?;
                verifier
                    .verify_oneshot(signature, signed_data)
                    .map_err(|_| AlgorithmError::InvalidData)?
            }
        };
        if valid {
            Ok(())
        } else {
            Err(AlgorithmError::BadSig)
        }
    }

    /// Convert to a [`Dnskey`].
    pub fn dnskey(&self) -> Dnskey<Vec<u8>> {
        match self {
            PublicKey::Rsa {
                algorithm,
                pkey,
                flags,
                ..
            } => {
                let rsa = pkey.rsa().expect("should not fail");
                let e = rsa.e().to_vec();
                let n = rsa.n().to_vec();
                let key = rsa_encode(&e, &n);
                Dnskey::new(*flags, 3, *algorithm, key)
                    .expect("should not fail")
            }
            PublicKey::Dsa {
                algorithm,
                pkey,
                flags,
            } => {
                let dsa = pkey.dsa().expect("should not fail");
                let key = dsa_encode(&dsa).expect("should not fail");
                Dnskey::new(*flags, 3, *algorithm, key)
                    .expect("should not fail")
            }
            PublicKey::EcDsa {
                algorithm,
                key,
                flags,
                ..
            } => {
                let point = key.public_key();
                let group = key.group();
                let mut ctx = BigNumContext::new().expect("should not fail");
                let key = point
                    .to_bytes(
                        group,
                        PointConversionForm::UNCOMPRESSED,
                        &mut ctx,
                    )
                    .expect("should not fail");

                // Openssl has an extra byte with the value 4 in front.
                let key = key[1..].to_vec();

                Dnskey::new(*flags, 3, *algorithm, key)
                    .expect("should not fail")
            }
            PublicKey::NoDigest {
                algorithm,
                pkey,
                flags,
            } => {
                let key =
                    pkey.raw_public_key().expect("should not fail");
                Dnskey::new(*flags, 3, *algorithm, key)
                    .expect("should not fail")
            }
        }
    }
}

/// Submodule for private keys and signing.
pub mod sign {
    use std::boxed::Box;
    use std::vec::Vec;

    use crate::base::iana::SecurityAlgorithm;
    use crate::crypto::bytes::{
        DsaPublicKeyBytes, DsaSecretKeyBytes, RsaSecretKeyBytes,
        SecretKeyBytes,
    };
    use crate::crypto::common::rsa_encode;
    use crate::crypto::sign::{
        GenerateParams, SignError, SignRaw, Signature,
    };
    use crate::rdata::Dnskey;

    use super::{
        dsa_encode, dsa_t, rsa_digest, FromBytesError, GenerateError,
        PublicKey,
    };

    use openssl::bn::BigNum;
    use openssl::dsa::{Dsa, DsaSig};
    use openssl::ecdsa::EcdsaSig;
    use openssl::error::ErrorStack;
    use openssl::hash::MessageDigest;
    use openssl::pkey::{self, PKey, Private};

    use secrecy::ExposeSecret;

    //----------- KeyPair ----------------------------------------------------

    /// A key pair backed by OpenSSL.
    #[derive(Clone, Debug)]
    pub struct KeyPair {
        /// The algorithm used by the key.
        algorithm: SecurityAlgorithm,

        /// Flags from [`Dnskey`].
        flags: u16,

        /// The private key.
        pkey: PKey<Private>,
    }

    //--- Conversion to and from bytes

    impl KeyPair {
        /// Import a key pair from bytes into OpenSSL.
        pub fn from_bytes<Octs>(
            secret: &SecretKeyBytes,
            public: &Dnskey<Octs>,
        ) -> Result<Self, FromBytesError>
        where
            Octs: AsRef<[u8]>,
        {
            fn num(slice: &[u8]) -> Result<BigNum, FromBytesError> {
                let mut v = BigNum::new()?;
                v.copy_from_slice(slice)?;
                Ok(v)
            }

            fn secure_num(slice: &[u8]) -> Result<BigNum, FromBytesError> {
                let mut v = BigNum::new_secure()?;
                v.copy_from_slice(slice)?;
                Ok(v)
            }

            if secret.algorithm() != public.algorithm() {
                return Err(FromBytesError::InvalidKey);
            }

            let pkey = match secret {
                SecretKeyBytes::RsaMd5(s)
                | SecretKeyBytes::RsaSha1(s)
                | SecretKeyBytes::RsaSha1Nsec3Sha1(s)
                | SecretKeyBytes::RsaSha256(s)
                | SecretKeyBytes::RsaSha512(s) => {
                    // Ensure that the public and private key match.
                    if rsa_encode(&s.e, &s.n)
                        != public.public_key().as_ref()
                    {
                        return Err(FromBytesError::InvalidKey);
                    }

                    let n = num(&s.n)?;
                    let e = num(&s.e)?;
                    let d = secure_num(s.d.expose_secret())?;
                    let p = secure_num(s.p.expose_secret())?;
                    let q = secure_num(s.q.expose_secret())?;
                    let d_p = secure_num(s.d_p.expose_secret())?;
                    let d_q = secure_num(s.d_q.expose_secret())?;
                    let q_i = secure_num(s.q_i.expose_secret())?;

                    let key = openssl::rsa::Rsa::from_private_components(
                        n, e, d, p, q, d_p, d_q, q_i,
                    )?;

                    if !key.check_key()? {
                        return Err(FromBytesError::InvalidKey);
                    }

                    PKey::from_rsa(key)?
                }

                SecretKeyBytes::Dsa(s)
                | SecretKeyBytes::DsaNsec3Sha1(s) => {
                    // Ensure that the public and private key match.
                    if DsaPublicKeyBytes::from(s).to_dnskey_format()
                        != public.public_key().as_ref()
                    {
                        return Err(FromBytesError::InvalidKey);
                    }

                    let p = num(&s.p)?;
                    let q = num(&s.q)?;
                    let g = num(&s.g)?;
                    let x = secure_num(s.x.expose_secret())?;
                    let y = num(&s.y)?;

                    let key = Dsa::from_private_components(p, q, g, x, y)?;
                    PKey::from_dsa(key)?
                }

                SecretKeyBytes::EcdsaP256Sha256(s) => {
                    use openssl::{ec, nid};

                    let group = nid::Nid::X9_62_PRIME256V1;
                    let group = ec::EcGroup::from_curve_name(group)?;
                    let n = secure_num(s.expose_secret().as_slice())?;

                    let public_key = PublicKey::from_dnskey(public)
                        .map_err(|_| FromBytesError::InvalidKey)?;
                    let PublicKey::EcDsa { key: eckey, .. } = public_key
                    else {
                        return Err(FromBytesError::InvalidKey);
                    };
                    let p = eckey.public_key();

                    let k =
                        ec::EcKey::from_private_components(&group, &n, p)?;
                    k.check_key().map_err(|_| FromBytesError::InvalidKey)?;
                    PKey::from_ec_key(k)?
                }

                SecretKeyBytes::EcdsaP384Sha384(s) => {
                    use openssl::{ec, nid};

                    let group = nid::Nid::SECP384R1;
                    let group = ec::EcGroup::from_curve_name(group)?;
                    let n = secure_num(s.expose_secret().as_slice())?;

                    let public_key = PublicKey::from_dnskey(public)
                        .map_err(|_| FromBytesError::InvalidKey)?;
                    let PublicKey::EcDsa { key: eckey, .. } = public_key
                    else {
                        return Err(FromBytesError::InvalidKey);
                    };
                    let p = eckey.public_key();

                    let k =
                        ec::EcKey::from_private_components(&group, &n, p)?;
                    k.check_key().map_err(|_| FromBytesError::InvalidKey)?;
                    PKey::from_ec_key(k)?
                }

                SecretKeyBytes::Ed25519(s) => {
                    use openssl::memcmp;

                    let id = pkey::Id::ED25519;
                    let s = s.expose_secret();
                    let k = PKey::private_key_from_raw_bytes(s, id)?;
                    if memcmp::eq(
                        &k.raw_public_key().expect("should not fail"),
                        public.public_key().as_ref(),
                    ) {
                        k
                    } else {
                        return Err(FromBytesError::InvalidKey);
                    }
                }

                SecretKeyBytes::Ed448(s) => {
                    use openssl::memcmp;

                    let id = pkey::Id::ED448;
                    let s = s.expose_secret();
                    let k = PKey::private_key_from_raw_bytes(s, id)?;
                    if memcmp::eq(
                        &k.raw_public_key().expect("should not fail"),
                        public.public_key().as_ref(),
                    ) {
                        k
                    } else {
                        return Err(FromBytesError::InvalidKey);
                    }
                }
            };

            Ok(Self {
                algorithm: secret.algorithm(),
                flags: public.flags(),
                pkey,
            })
        }

        /// Export the secret key into bytes.
        ///
        /// # Panics
        ///
        /// Panics if OpenSSL fails or if memory could not be allocated.
        pub fn to_bytes(&self) -> SecretKeyBytes {
            match self.algorithm {
                SecurityAlgorithm::RSAMD5
                | SecurityAlgorithm::RSASHA1
                | SecurityAlgorithm::RSASHA1_NSEC3_SHA1
                | SecurityAlgorithm::RSASHA256
                | SecurityAlgorithm::RSASHA512 => {
                    let key = self.pkey.rsa().unwrap();
                    let key = RsaSecretKeyBytes {
                        n: key.n().to_vec().into(),
                        e: key.e().to_vec().into(),
                        d: key.d().to_vec().into_boxed_slice().into(),
                        p: key
                            .p()
                            .unwrap()
                            .to_vec()
                            .into_boxed_slice()
                            .into(),
                        q: key
                            .q()
                            .unwrap()
                            .to_vec()
                            .into_boxed_slice()
                            .into(),
                        d_p: key
                            .dmp1()
                            .unwrap()
                            .to_vec()
                            .into_boxed_slice()
                            .into(),
                        d_q: key
                            .dmq1()
                            .unwrap()
                            .to_vec()
                            .into_boxed_slice()
                            .into(),
                        q_i: key
                            .iqmp()
                            .unwrap()
                            .to_vec()
                            .into_boxed_slice()
                            .into(),
                    };
                    match self.algorithm {
                        SecurityAlgorithm::RSAMD5 => {
                            SecretKeyBytes::RsaMd5(key)
                        }
                        SecurityAlgorithm::RSASHA1 => {
                            SecretKeyBytes::RsaSha1(key)
                        }
                        SecurityAlgorithm::RSASHA1_NSEC3_SHA1 => {
                            SecretKeyBytes::RsaSha1Nsec3Sha1(key)
                        }
                        SecurityAlgorithm::RSASHA256 => {
                            SecretKeyBytes::RsaSha256(key)
                        }
                        SecurityAlgorithm::RSASHA512 => {
                            SecretKeyBytes::RsaSha512(key)
                        }
                        _ => unreachable!(),
                    }
                }
                SecurityAlgorithm::DSA
                | SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                    let key = self.pkey.dsa().unwrap();
                    let key = DsaSecretKeyBytes {
                        p: key.p().to_vec().into(),
                        q: key.q().to_vec().into(),
                        g: key.g().to_vec().into(),
                        x: key
                            .priv_key()
                            .to_vec()
                            .into_boxed_slice()
                            .into(),
                        y: key.pub_key().to_vec().into(),
                    };
                    match self.algorithm {
                        SecurityAlgorithm::DSA => SecretKeyBytes::Dsa(key),
                        SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                            SecretKeyBytes::DsaNsec3Sha1(key)
                        }
                        _ => unreachable!(),
                    }
                }
                SecurityAlgorithm::ECDSAP256SHA256 => {
                    let key = self.pkey.ec_key().unwrap();
                    let key = key.private_key().to_vec_padded(32).unwrap();
                    let key: Box<[u8; 32]> = key.try_into().unwrap();
                    SecretKeyBytes::EcdsaP256Sha256(key.into())
                }
                SecurityAlgorithm::ECDSAP384SHA384 => {
                    let key = self.pkey.ec_key().unwrap();
                    let key = key.private_key().to_vec_padded(48).unwrap();
                    let key: Box<[u8; 48]> = key.try_into().unwrap();
                    SecretKeyBytes::EcdsaP384Sha384(key.into())
                }
                SecurityAlgorithm::ED25519 => {
                    let key = self.pkey.raw_private_key().unwrap();
                    let key: Box<[u8; 32]> = key.try_into().unwrap();
                    SecretKeyBytes::Ed25519(key.into())
                }
                SecurityAlgorithm::ED448 => {
                    let key = self.pkey.raw_private_key().unwrap();
                    let key: Box<[u8; 57]> = key.try_into().unwrap();
                    SecretKeyBytes::Ed448(key.into())
                }
                _ => unreachable!(),
            }
        }
    }

    //--- Signing

    impl KeyPair {
        fn sign(&self, data: &[u8]) -> Result<Vec<u8>, ErrorStack> {
            use openssl::sign::Signer;

            match self.algorithm {
                SecurityAlgorithm::RSAMD5
                | SecurityAlgorithm::RSASHA1
                | SecurityAlgorithm::RSASHA1_NSEC3_SHA1
                | SecurityAlgorithm::RSASHA256
                | SecurityAlgorithm::RSASHA512 => {
                    let digest =
                        rsa_digest(self.algorithm).expect("RSA variant");
                    let mut s = Signer::new(digest, &self.pkey)?;
                    s.set_rsa_padding(openssl::rsa::Padding::PKCS1)?;
                    s.sign_oneshot_to_vec(data)
                }

                SecurityAlgorithm::DSA
                | SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                    let mut s =
                        Signer::new(MessageDigest::sha1(), &self.pkey)?;
                    let signature = s.sign_oneshot_to_vec(data)?;
                    // Convert from DER to the fixed representation,
                    // prefixed by the key's size octet.
                    let signature = DsaSig::from_der(&signature)?;
                    let dsa = self.pkey.dsa()?;
                    let mut out =
                        vec![dsa_t(dsa.p().num_bytes() as usize)];
                    out.append(&mut signature.r().to_vec_padded(20)?);
                    out.append(&mut signature.s().to_vec_padded(20)?);
                    Ok(out)
                }

                SecurityAlgorithm::ECDSAP256SHA256 => {
                    let mut s =
                        Signer::new(MessageDigest::sha256(), &self.pkey)?;
                    let signature = s.sign_oneshot_to_vec(data)?;
                    // Convert from DER to the fixed representation.
                    let signature = EcdsaSig::from_der(&signature)?;
                    let mut r = signature.r().to_vec_padded(32)?;
                    let mut s = signature.s().to_vec_padded(32)?;
                    r.append(&mut s);
                    Ok(r)
                }
                SecurityAlgorithm::ECDSAP384SHA384 => {
                    let mut s =
                        Signer::new(MessageDigest::sha384(), &self.pkey)?;
                    let signature = s.sign_oneshot_to_vec(data)?;
                    // Convert from DER to the fixed representation.
                    let signature = EcdsaSig::from_der(&signature)?;
                    let mut r = signature.r().to_vec_padded(48)?;
                    let mut s = signature.s().to_vec_padded(48)?;
                    r.append(&mut s);
                    Ok(r)
                }

                SecurityAlgorithm::ED25519
                | SecurityAlgorithm::ED448 => {
                    let mut s = Signer::new_without_digest(&self.pkey)?;
                    s.sign_oneshot_to_vec(data)
                }

                _ => unreachable!(),
            }
        }
    }

    //--- SignRaw

    impl SignRaw for KeyPair {
        fn algorithm(&self) -> SecurityAlgorithm {
            self.algorithm
        }

        fn dnskey(&self) -> Result<Dnskey<Vec<u8>>, SignError> {
            match self.algorithm {
                SecurityAlgorithm::RSAMD5
                | SecurityAlgorithm::RSASHA1
                | SecurityAlgorithm::RSASHA1_NSEC3_SHA1
                | SecurityAlgorithm::RSASHA256
                | SecurityAlgorithm::RSASHA512 => {
                    let key = self.pkey.rsa().expect("should not fail");
                    let e = key.e().to_vec();
                    let n = key.n().to_vec();
                    Dnskey::new(
                        self.flags,
                        3,
                        self.algorithm,
                        rsa_encode(&e, &n),
                    )
                    .map_err(|_| "long RSA public key".into())
                }
                SecurityAlgorithm::DSA
                | SecurityAlgorithm::DSA_NSEC3_SHA1 => {
                    let key = self.pkey.dsa().expect("should not fail");
                    let key = dsa_encode(&key)
                        .map_err(|_| "cannot encode DSA public key")?;
                    Dnskey::new(self.flags, 3, self.algorithm, key)
                        .map_err(|_| "long DSA public key".into())
                }
                SecurityAlgorithm::ECDSAP256SHA256
                | SecurityAlgorithm::ECDSAP384SHA384 => {
                    use openssl::bn::BigNumContext;
                    use openssl::ec::PointConversionForm;

                    let key = self.pkey.ec_key().expect("should not fail");
                    let group = key.group();
                    let mut ctx =
                        BigNumContext::new().expect("should not fail");
                    let point = key
                        .public_key()
                        .to_bytes(
                            group,
                            PointConversionForm::UNCOMPRESSED,
                            &mut ctx,
                        )
                        .expect("should not fail");

                    // Openssl has an extra byte with the value 4 in front.
                    Dnskey::new(
                        self.flags,
                        3,
                        self.algorithm,
                        point[1..].to_vec(),
                    )
                    .map_err(|_| "long ECDSA public key".into())
                }
                SecurityAlgorithm::ED25519 | SecurityAlgorithm::ED448 => {
                    let key = self
                        .pkey
                        .raw_public_key()
                        .expect("should not fail");
                    Dnskey::new(self.flags, 3, self.algorithm, key)
                        .map_err(|_| "long EdDSA public key".into())
                }
                _ => unreachable!(),
            }
        }

        fn sign_raw(&self, data: &[u8]) -> Result<Signature, SignError> {
            let signature = self
                .sign(data)
                .map(Vec::into_boxed_slice)
                .map_err(|_| SignError::new("OpenSSL signing failed"))?;

            match self.algorithm {
                SecurityAlgorithm::RSAMD5 => {
                    Ok(Signature::RsaMd5(signature))
                }
                SecurityAlgorithm::RSASHA1 => {
                    Ok(Signature::RsaSha1(signature))
                }
                SecurityAlgorithm::RSASHA1_NSEC3_SHA1 => {
                    Ok(Signature::RsaSha1Nsec3Sha1(signature))
                }
                SecurityAlgorithm::RSASHA256 => {
                    Ok(Signature::RsaSha256(signature))
                }
                SecurityAlgorithm::RSASHA512 => {
                    Ok(Signature::RsaSha512(signature))
                }

                SecurityAlgorithm::DSA => signature
                    .try_into()
                    .map(Signature::Dsa)
                    .map_err(|_| "DSA signature has wrong size".into()),
                SecurityAlgorithm::DSA_NSEC3_SHA1 => signature
                    .try_into()
                    .map(Signature::DsaNsec3Sha1)
                    .map_err(|_| "DSA signature has wrong size".into()),

                SecurityAlgorithm::ECDSAP256SHA256 => signature
                    .try_into()
                    .map(Signature::EcdsaP256Sha256)
                    .map_err(|_| "ECDSA signature has wrong size".into()),
                SecurityAlgorithm::ECDSAP384SHA384 => signature
                    .try_into()
                    .map(Signature::EcdsaP384Sha384)
                    .map_err(|_| "ECDSA signature has wrong size".into()),

                SecurityAlgorithm::ED25519 => signature
                    .try_into()
                    .map(Signature::Ed25519)
                    .map_err(|_| "Ed25519 signature has wrong size".into()),
                SecurityAlgorithm::ED448 => signature
                    .try_into()
                    .map(Signature::Ed448)
                    .map_err(|_| "Ed448 signature has wrong size".into()),

                _ => unreachable!(),
            }
        }
    }

    //----------- generate() -------------------------------------------------

    /// Generate a new secret key for the given algorithm.
    pub fn generate(
        params: GenerateParams,
        flags: u16,
    ) -> Result<KeyPair, GenerateError> {
        let algorithm = params.algorithm();
        let pkey = match params {
            GenerateParams::RsaSha256 { bits }
            | GenerateParams::RsaSha512 { bits } => {
                openssl::rsa::Rsa::generate(bits).and_then(PKey::from_rsa)?
            }
            GenerateParams::Dsa => {
                // DNSSEC DSA keys use a 1024-bit prime and a 160-bit
                // subprime (RFC 2536).
                Dsa::generate(1024).and_then(PKey::from_dsa)?
            }
            GenerateParams::EcdsaP256Sha256 => {
                let group = openssl::nid::Nid::X9_62_PRIME256V1;
                let group = openssl::ec::EcGroup::from_curve_name(group)?;
                PKey::from_ec_key(openssl::ec::EcKey::generate(&group)?)?
            }
            GenerateParams::EcdsaP384Sha384 => {
                let group = openssl::nid::Nid::SECP384R1;
                let group = openssl::ec::EcGroup::from_curve_name(group)?;
                PKey::from_ec_key(openssl::ec::EcKey::generate(&group)?)?
            }
            GenerateParams::Ed25519 => PKey::generate_ed25519()?,
            GenerateParams::Ed448 => PKey::generate_ed448()?,
        };

        Ok(KeyPair {
            algorithm,
            flags,
            pkey,
        })
    }

    //============ Tests =====================================================

    #[cfg(test)]
    mod tests {
        use crate::base::iana::SecurityAlgorithm;
        use crate::crypto::sign::{GenerateParams, SignRaw};

        use super::KeyPair;

        fn params_for(algorithm: SecurityAlgorithm) -> GenerateParams {
            match algorithm {
                SecurityAlgorithm::RSASHA256 => {
                    GenerateParams::RsaSha256 { bits: 2048 }
                }
                SecurityAlgorithm::RSASHA512 => {
                    GenerateParams::RsaSha512 { bits: 2048 }
                }
                SecurityAlgorithm::DSA => GenerateParams::Dsa,
                SecurityAlgorithm::ECDSAP256SHA256 => {
                    GenerateParams::EcdsaP256Sha256
                }
                SecurityAlgorithm::ECDSAP384SHA384 => {
                    GenerateParams::EcdsaP384Sha384
                }
                SecurityAlgorithm::ED25519 => GenerateParams::Ed25519,
                SecurityAlgorithm::ED448 => GenerateParams::Ed448,
                _ => unreachable!(),
            }
        }

        const ALGORITHMS: &[SecurityAlgorithm] = &[
            SecurityAlgorithm::RSASHA256,
            SecurityAlgorithm::RSASHA512,
            SecurityAlgorithm::DSA,
            SecurityAlgorithm::ECDSAP256SHA256,
            SecurityAlgorithm::ECDSAP384SHA384,
            SecurityAlgorithm::ED25519,
            SecurityAlgorithm::ED448,
        ];

        #[test]
        fn generated_roundtrip() {
            for &algorithm in ALGORITHMS {
                let key =
                    super::generate(params_for(algorithm), 256).unwrap();
                let gen_key = key.to_bytes();
                let pub_key = key.dnskey().unwrap();
                let equiv = KeyPair::from_bytes(&gen_key, &pub_key).unwrap();
                assert!(key.pkey.public_eq(&equiv.pkey));
            }
        }

        #[test]
        fn secret_roundtrip_via_bind_format() {
            use crate::crypto::bytes::SecretKeyBytes;
            use std::string::ToString;

            for &algorithm in ALGORITHMS {
                let key =
                    super::generate(params_for(algorithm), 256).unwrap();
                let text = key.to_bytes().display_as_bind().to_string();
                let same = SecretKeyBytes::parse_from_bind(&text).unwrap();
                assert_eq!(same.algorithm(), algorithm);
                assert_eq!(same.display_as_bind().to_string(), text);

                let pub_key = key.dnskey().unwrap();
                let equiv = KeyPair::from_bytes(&same, &pub_key).unwrap();
                assert!(key.pkey.public_eq(&equiv.pkey));
            }
        }

        #[test]
        fn sign_and_verify_raw() {
            use crate::crypto::openssl::PublicKey;

            for &algorithm in ALGORITHMS {
                let key =
                    super::generate(params_for(algorithm), 256).unwrap();
                let sig = key.sign_raw(b"Hello, World!").unwrap();
                let public =
                    PublicKey::from_dnskey(&key.dnskey().unwrap()).unwrap();
                public.verify(b"Hello, World!", sig.as_ref()).unwrap();
                assert!(public
                    .verify(b"Hello, World?", sig.as_ref())
                    .is_err());
            }
        }
    }
}
