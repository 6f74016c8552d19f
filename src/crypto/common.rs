//! DNSSEC message digests and signature verification using built-in
//! backends.
//!
//! This backend supports all the algorithms supported by Ring and OpenSSL,
//! depending on whether the respective crate features are enabled. See the
//! documentation for each backend for more information.

#![cfg(any(feature = "ring", feature = "openssl"))]
#![cfg_attr(
    docsrs,
    doc(cfg(any(feature = "ring", feature = "openssl")))
)]

use core::fmt;
use std::error;
use std::vec::Vec;

use crate::rdata::Dnskey;

//------------ DigestType ----------------------------------------------------

/// Type of message digest to compute.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestType {
    /// [FIPS Secure Hash Standard] Section 6.1.
    ///
    /// [FIPS Secure Hash Standard]: http://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf
    Sha1,

    /// [FIPS Secure Hash Standard] Section 6.2.
    ///
    /// [FIPS Secure Hash Standard]: http://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf
    Sha256,

    /// [FIPS Secure Hash Standard] Section 6.5.
    ///
    /// [FIPS Secure Hash Standard]: http://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf
    Sha384,

    /// [FIPS Secure Hash Standard] Section 6.4.
    ///
    /// [FIPS Secure Hash Standard]: http://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf
    Sha512,
}

//------------ DigestContext -------------------------------------------------

/// Context for computing a message digest.
#[cfg(feature = "ring")]
pub type DigestContext = super::ring::DigestBuilder;
#[cfg(all(feature = "openssl", not(feature = "ring")))]
pub type DigestContext = super::openssl::DigestContext;

//------------ Digest --------------------------------------------------------

/// A computed message digest.
#[cfg(feature = "ring")]
pub type Digest = super::ring::Digest;
#[cfg(all(feature = "openssl", not(feature = "ring")))]
pub type Digest = super::openssl::Digest;

//------------ PublicKey -----------------------------------------------------

/// A public key for verifying signatures.
#[cfg(feature = "openssl")]
pub type PublicKey = super::openssl::PublicKey;
#[cfg(all(feature = "ring", not(feature = "openssl")))]
pub type PublicKey = super::ring::PublicKey;

//------------ RSA helpers ---------------------------------------------------

/// Return the RSA exponent and modulus components from DNSKEY record data.
///
/// The RDATA layout is defined in [RFC 3110, section 2]: a one or three
/// octet exponent length, the exponent, and the modulus filling the rest of
/// the data.
///
/// [RFC 3110, section 2]: https://tools.ietf.org/html/rfc3110#section-2
pub fn rsa_exponent_modulus(
    dnskey: &Dnskey<impl AsRef<[u8]>>,
    min_len: usize,
) -> Result<(Vec<u8>, Vec<u8>), AlgorithmError> {
    let public_key = dnskey.public_key().as_ref();
    if public_key.len() <= 3 {
        return Err(AlgorithmError::InvalidData);
    }

    let (pos, exp_len) = match public_key[0] {
        0 => (
            3,
            (usize::from(public_key[1]) << 8) | usize::from(public_key[2]),
        ),
        len => (1, usize::from(len)),
    };

    // Check if there's enough space for exponent and modulus.
    if public_key.len() <= pos + exp_len {
        return Err(AlgorithmError::InvalidData);
    };

    let (e, n) = public_key[pos..].split_at(exp_len);

    // Check for minimum supported key size.
    if n.len() < min_len {
        return Err(AlgorithmError::Unsupported);
    }

    Ok((e.to_vec(), n.to_vec()))
}

/// Encode an RSA exponent and modulus into DNSKEY record data.
///
/// This is the inverse of [`rsa_exponent_modulus`].
///
/// # Panics
///
/// Panics if the exponent is longer than 65,535 octets.
pub fn rsa_encode(e: &[u8], n: &[u8]) -> Vec<u8> {
    let mut key = Vec::new();

    // Encode the exponent length.
    if let Ok(exp_len) = u8::try_from(e.len()) {
        key.reserve_exact(1 + e.len() + n.len());
        key.push(exp_len);
    } else if let Ok(exp_len) = u16::try_from(e.len()) {
        key.reserve_exact(3 + e.len() + n.len());
        key.push(0u8);
        key.extend(&exp_len.to_be_bytes());
    } else {
        unreachable!("RSA exponents are (much) shorter than 64KiB")
    }

    key.extend(e);
    key.extend(n);
    key
}

//============ Error Types ===================================================

//------------ AlgorithmError ------------------------------------------------

/// An algorithm error during verification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlgorithmError {
    /// Unsupported algorithm.
    Unsupported,

    /// Bad signature.
    BadSig,

    /// Invalid data.
    InvalidData,
}

//--- Display, Error

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            AlgorithmError::Unsupported => "unsupported algorithm",
            AlgorithmError::BadSig => "bad signature",
            AlgorithmError::InvalidData => "invalid data",
        })
    }
}

impl error::Error for AlgorithmError {}

//------------ DigestError ---------------------------------------------------

/// An error when computing a digest.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestError {
    /// The requested digest algorithm is not provided by the backends.
    UnsupportedAlgorithm,
}

//--- Display, Error

impl fmt::Display for DigestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnsupportedAlgorithm => "unsupported digest algorithm",
        })
    }
}

impl error::Error for DigestError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::SecurityAlgorithm;

    #[test]
    fn rsa_roundtrip() {
        let e = [1, 0, 1];
        let n = [0xAB; 256];
        let rdata = rsa_encode(&e, &n);
        assert_eq!(rdata[0], 3);

        let dnskey = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::RSASHA256,
            rdata,
        )
        .unwrap();
        let (e2, n2) = rsa_exponent_modulus(&dnskey, 1024 / 8).unwrap();
        assert_eq!(e2, e);
        assert_eq!(n2, n);
    }

    #[test]
    fn rsa_truncated() {
        let dnskey = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::RSASHA256,
            vec![200, 1, 2, 3],
        )
        .unwrap();
        assert_eq!(
            rsa_exponent_modulus(&dnskey, 1024 / 8),
            Err(AlgorithmError::InvalidData)
        );
    }
}
