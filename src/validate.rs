//! DNSSEC signature verification and delegation digests.
//!
//! This module implements the validating half of the signature engine:
//! reconstructing the signed data for an RRset, checking an RRSIG record
//! against a DNSKEY, and deriving DS record data from DNSKEY records.
//!
//! Note that [`verify_rrset`] deliberately does *not* check the inception
//! and expiration times of the signature. Whether an expired but
//! cryptographically valid signature is acceptable is a policy decision
//! that belongs to the caller; keeping it out of the core also keeps
//! verification testable against fixed vectors.

#![cfg(any(feature = "ring", feature = "openssl"))]
#![cfg_attr(
    docsrs,
    doc(cfg(any(feature = "ring", feature = "openssl")))
)]

use core::fmt;

use std::vec::Vec;

use crate::base::iana::{DigestAlgorithm, SecurityAlgorithm};
use crate::base::name::Name;
use crate::base::record::{Record, Rrset};
use crate::crypto::common::{
    AlgorithmError, DigestContext, DigestError, DigestType, PublicKey,
};
use crate::rdata::{ComposeRecordData, Dnskey, Ds, Rrsig};

//------------ Dnskey --------------------------------------------------------

/// Extensions for the DNSKEY record type.
pub trait DnskeyExt {
    /// Calculates a digest from DNSKEY.
    ///
    /// See [RFC 4034, Section 5.1.4]:
    ///
    /// ```text
    /// 5.1.4.  The Digest Field
    ///   The digest is calculated by concatenating the canonical form of the
    ///   fully qualified owner name of the DNSKEY RR with the DNSKEY RDATA,
    ///   and then applying the digest algorithm.
    ///
    ///     digest = digest_algorithm( DNSKEY owner name | DNSKEY RDATA);
    ///
    ///      "|" denotes concatenation
    ///
    ///     DNSKEY RDATA = Flags | Protocol | Algorithm | Public Key.
    /// ```
    ///
    /// [RFC 4034, Section 5.1.4]: https://tools.ietf.org/html/rfc4034#section-5.1.4
    fn digest(
        &self,
        name: &Name,
        algorithm: DigestAlgorithm,
    ) -> Result<Vec<u8>, DigestError>;
}

impl<Octs> DnskeyExt for Dnskey<Octs>
where
    Octs: AsRef<[u8]>,
{
    fn digest(
        &self,
        name: &Name,
        algorithm: DigestAlgorithm,
    ) -> Result<Vec<u8>, DigestError> {
        let mut buf: Vec<u8> = Vec::new();
        name.compose_canonical(&mut buf);
        self.compose_rdata(&mut buf);

        let mut ctx = match algorithm {
            DigestAlgorithm::SHA1 => DigestContext::new(DigestType::Sha1),
            DigestAlgorithm::SHA256 => {
                DigestContext::new(DigestType::Sha256)
            }
            DigestAlgorithm::SHA384 => {
                DigestContext::new(DigestType::Sha384)
            }
            // The GOST R 34.11-94 digest is an optional capability that
            // neither built-in backend provides.
            _ => return Err(DigestError::UnsupportedAlgorithm),
        };

        ctx.update(&buf);
        Ok(ctx.finish().as_ref().to_vec())
    }
}

/// Return whether a digest algorithm is supported or not.
// This needs to match the digests supported in `DnskeyExt::digest`.
pub fn supported_digest(d: &DigestAlgorithm) -> bool {
    *d == DigestAlgorithm::SHA1
        || *d == DigestAlgorithm::SHA256
        || *d == DigestAlgorithm::SHA384
}

//------------ create_ds -----------------------------------------------------

/// Creates DS record data for a DNSKEY record.
///
/// The digest is computed over the canonical owner name concatenated with
/// the DNSKEY record data; key tag and algorithm are copied from the key
/// ([RFC 4034, section 5.1]). The operation is pure and performs no I/O.
///
/// [RFC 4034, section 5.1]: https://tools.ietf.org/html/rfc4034#section-5.1
pub fn create_ds(
    owner: &Name,
    dnskey: &Dnskey<impl AsRef<[u8]>>,
    digest_type: DigestAlgorithm,
) -> Result<Ds<Vec<u8>>, DigestError> {
    let digest = dnskey.digest(owner, digest_type)?;
    Ok(Ds::new(
        dnskey.key_tag(),
        dnskey.algorithm(),
        digest_type,
        digest,
    )
    .expect("digest fits record data"))
}

//------------ Rrsig ---------------------------------------------------------

/// Extensions for the RRSIG record type.
pub trait RrsigExt {
    /// Compose the signed data according to [RFC 4035, Section 5.3.2].
    ///
    /// ```text
    ///    Once the RRSIG RR has met the validity requirements described in
    ///    Section 5.3.1, the validator has to reconstruct the original signed
    ///    data.  The original signed data includes RRSIG RDATA (excluding the
    ///    Signature field) and the canonical form of the RRset.  Aside from
    ///    being ordered, the canonical form of the RRset might also differ from
    ///    the received RRset due to DNS name compression, decremented TTLs, or
    ///    wildcard expansion.
    /// ```
    ///
    /// [RFC 4035, Section 5.3.2]: https://tools.ietf.org/html/rfc4035#section-5.3.2
    fn signed_data<D>(&self, buf: &mut Vec<u8>, rrset: &Rrset<'_, D>)
    where
        D: ComposeRecordData;

    /// Return the name the RRset was expanded from, if the information in
    /// this signature says its records are wildcard expansions.
    fn wildcard_closest_encloser<D>(
        &self,
        rr: &Record<D>,
    ) -> Option<Name>;

    /// Attempt to use the cryptographic signature to authenticate the
    /// signed data, and thus authenticate the RRset. The signed data is
    /// expected to be calculated as per [RFC 4035, Section 5.3.2].
    ///
    /// [RFC 4035, Section 5.3.2]: https://tools.ietf.org/html/rfc4035#section-5.3.2
    fn verify_signed_data(
        &self,
        dnskey: &Dnskey<impl AsRef<[u8]>>,
        signed_data: &impl AsRef<[u8]>,
    ) -> Result<(), AlgorithmError>;
}

impl<Octs: AsRef<[u8]>> RrsigExt for Rrsig<Octs> {
    fn signed_data<D>(&self, buf: &mut Vec<u8>, rrset: &Rrset<'_, D>)
    where
        D: ComposeRecordData,
    {
        // signed_data = RRSIG_RDATA | RR(1) | RR(2)...  where
        //    "|" denotes concatenation
        // RRSIG_RDATA is the wire format of the RRSIG RDATA fields
        //    with the Signature field excluded and the Signer's Name
        //    in canonical form.
        crate::rdata::ProtoRrsig::new(
            self.type_covered(),
            self.algorithm(),
            self.labels(),
            self.original_ttl(),
            self.expiration(),
            self.inception(),
            self.key_tag(),
            self.signer_name().clone(),
        )
        .compose_canonical(buf);

        // The RRset is appended in canonical form, under the original TTL
        // and with wildcard expansion undone.
        // See https://tools.ietf.org/html/rfc4034#section-6.3
        rrset.compose_canonical_form(
            self.original_ttl(),
            self.labels(),
            buf,
        );
    }

    fn wildcard_closest_encloser<D>(
        &self,
        rr: &Record<D>,
    ) -> Option<Name> {
        // Handle expanded wildcards as per [RFC4035, Section 5.3.2]
        // (https://tools.ietf.org/html/rfc4035#section-5.3.2).
        let rrsig_labels = usize::from(self.labels());
        let fqdn_labels = rr.owner().label_count();
        if rrsig_labels < fqdn_labels {
            Some(rr.owner().suffix(rrsig_labels))
        } else {
            None
        }
    }

    fn verify_signed_data(
        &self,
        dnskey: &Dnskey<impl AsRef<[u8]>>,
        signed_data: &impl AsRef<[u8]>,
    ) -> Result<(), AlgorithmError> {
        // Caller needs to ensure that the signature matches the key, but
        // enforce the algorithm match.
        if self.algorithm() != dnskey.algorithm() {
            return Err(AlgorithmError::InvalidData);
        }

        let public_key = PublicKey::from_dnskey(dnskey)?;
        public_key.verify(signed_data.as_ref(), self.signature().as_ref())
    }
}

/// Report whether an algorithm is supported or not.
// This needs to match the algorithms supported by the verification
// backends.
pub fn supported_algorithm(a: &SecurityAlgorithm) -> bool {
    matches!(
        *a,
        SecurityAlgorithm::RSAMD5
            | SecurityAlgorithm::DSA
            | SecurityAlgorithm::DSA_NSEC3_SHA1
            | SecurityAlgorithm::RSASHA1
            | SecurityAlgorithm::RSASHA1_NSEC3_SHA1
            | SecurityAlgorithm::RSASHA256
            | SecurityAlgorithm::RSASHA512
            | SecurityAlgorithm::ECDSAP256SHA256
            | SecurityAlgorithm::ECDSAP384SHA384
            | SecurityAlgorithm::ED25519
            | SecurityAlgorithm::ED448
    )
}

//------------ verify_rrset --------------------------------------------------

/// Verifies the signature over an RRset.
///
/// The function checks that the RRSIG record belongs to the given DNSKEY —
/// matching key tag, algorithm, and covered type — reconstructs the signed
/// data, and verifies the signature cryptographically.
///
/// Any mismatch, structural or cryptographic, makes the function return
/// `Ok(false)`; it is safe to call on adversarial input. Errors are
/// reserved for keys the engine cannot process at all: an algorithm
/// without verification support, or key data that does not decode.
///
/// Signature inception and expiration are *not* inspected; temporal
/// validity is the caller's policy decision.
pub fn verify_rrset<D: ComposeRecordData>(
    rrsig: &Rrsig<impl AsRef<[u8]>>,
    dnskey: &Dnskey<impl AsRef<[u8]>>,
    rrset: &Rrset<'_, D>,
) -> Result<bool, VerifyError> {
    // RFC 4035, section 5.3.1: the RRSIG and the key must match and the
    // RRSIG must fit the RRset it claims to cover.
    if rrsig.key_tag() != dnskey.key_tag()
        || rrsig.algorithm() != dnskey.algorithm()
        || rrsig.type_covered() != rrset.rtype()
        || usize::from(rrsig.labels()) > rrset.owner().label_count()
        || !rrset.owner().ends_with(rrsig.signer_name())
    {
        return Ok(false);
    }

    let mut signed_data = Vec::new();
    rrsig.signed_data(&mut signed_data, rrset);

    let public_key = PublicKey::from_dnskey(dnskey).map_err(|err| {
        match err {
            AlgorithmError::Unsupported => VerifyError::UnsupportedAlgorithm,
            _ => VerifyError::InvalidKey,
        }
    })?;

    match public_key.verify(&signed_data, rrsig.signature().as_ref()) {
        Ok(()) => Ok(true),
        Err(AlgorithmError::Unsupported) => {
            Err(VerifyError::UnsupportedAlgorithm)
        }
        // A signature of the wrong shape fails verification the same way
        // a wrong signature does.
        Err(_) => Ok(false),
    }
}

//============ Error Types ===================================================

//------------ VerifyError ---------------------------------------------------

/// Verification could not be performed at all.
///
/// Note that a signature that merely does not match is not an error; see
/// [`verify_rrset`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VerifyError {
    /// The key's algorithm has no verification support.
    UnsupportedAlgorithm,

    /// The key data does not decode for its algorithm.
    InvalidKey,
}

//--- Display and Error

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            VerifyError::UnsupportedAlgorithm => "unsupported algorithm",
            VerifyError::InvalidKey => "malformed key",
        })
    }
}

impl std::error::Error for VerifyError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::{Class, Rtype};
    use crate::base::record::{Record, Ttl};
    use crate::rdata::{Mx, Timestamp};
    use crate::utils::base64;

    use core::str::FromStr;

    type Dnskey = crate::rdata::Dnskey<Vec<u8>>;
    type Ds = crate::rdata::Ds<Vec<u8>>;
    type Rrsig = crate::rdata::Rrsig<Vec<u8>>;

    // Returns the root KSK/ZSK for testing (2048b).
    fn root_pubkey() -> (Dnskey, Dnskey) {
        let ksk = base64::decode(
            "\
            AwEAAaz/tAm8yTn4Mfeh5eyI96WSVexTBAvkMgJzkKTOiW1vkIbzxeF3+/\
            4RgWOq7HrxRixHlFlExOLAJr5emLvN7SWXgnLh4+B5xQlNVz8Og8kvArMt\
            NROxVQuCaSnIDdD5LKyWbRd2n9WGe2R8PzgCmr3EgVLrjyBxWezF0jLHwV\
            N8efS3rCj/EWgvIWgb9tarpVUDK/b58Da+sqqls3eNbuv7pr+eoZG+SrDK\
            6nWeL3c6H5Apxz7LjVc1uTIdsIXxuOLYA4/ilBmSVIzuDWfdRUfhHdY6+c\
            n8HFRm+2hM8AnXGXws9555KrUB5qihylGa8subX2Nn6UwNR1AkUTV74bU=",
        )
        .unwrap();
        let zsk = base64::decode(
            "\
            AwEAAeVDC34GZILwsQJy97K2Fst4P3XYZrXLyrkausYzSqEjSUulgh+iLgH\
            g0y7FIF890+sIjXsk7KLJUmCOWfYWPorNKEOKLk5Zx/4M6D3IHZE3O3m/Ea\
            hrc28qQzmTLxiMZAW65MvR2UO3LxVtYOPBEBiDgAQD47x2JLsJYtavCzNL5\
            WiUk59OgvHmDqmcC7VXYBhK8V8Tic089XJgExGeplKWUt9yyc31ra1swJX5\
            1XsOaQz17+vyLVH8AZP26KvKFiZeoRbaq6vl+hc8HQnI2ug5rA2zoz3MsSQ\
            BvP1f/HvqsWxLqwXXKyDD1QM639U+XzVB8CYigyscRP22QCnwKIU=",
        )
        .unwrap();
        (
            Dnskey::new(257, 3, SecurityAlgorithm::RSASHA256, ksk).unwrap(),
            Dnskey::new(256, 3, SecurityAlgorithm::RSASHA256, zsk).unwrap(),
        )
    }

    #[test]
    fn dnskey_digest() {
        let (dnskey, _) = root_pubkey();
        let owner = Name::root();
        let expected = Ds::new(
            20326,
            SecurityAlgorithm::RSASHA256,
            DigestAlgorithm::SHA256,
            base64::decode("4G1EuAuPHTmpXAsNfGXQhFjogECbvGg0VxBCN8f47I0=")
                .unwrap(),
        )
        .unwrap();
        assert_eq!(dnskey.key_tag(), 20326);
        assert_eq!(
            create_ds(&owner, &dnskey, DigestAlgorithm::SHA256).unwrap(),
            expected
        );
    }

    #[test]
    fn dnskey_digest_is_deterministic() {
        let (dnskey, _) = root_pubkey();
        let owner = Name::root();
        assert_eq!(
            create_ds(&owner, &dnskey, DigestAlgorithm::SHA256).unwrap(),
            create_ds(&owner, &dnskey, DigestAlgorithm::SHA256).unwrap(),
        );
    }

    #[test]
    fn dnskey_digest_unsupported() {
        let (dnskey, _) = root_pubkey();
        let owner = Name::root();
        assert_eq!(
            create_ds(&owner, &dnskey, DigestAlgorithm::GOST),
            Err(DigestError::UnsupportedAlgorithm)
        );
    }

    fn rrsig_verify_dnskey(ksk: Dnskey, zsk: Dnskey, rrsig: Rrsig) {
        let records: Vec<_> = [&ksk, &zsk]
            .iter()
            .map(|x| {
                Record::new(
                    rrsig.signer_name().clone(),
                    Class::IN,
                    rrsig.original_ttl(),
                    (*x).clone(),
                )
            })
            .collect();
        let rrset = Rrset::new(&records).unwrap();

        // The signature was made with the KSK.
        assert_eq!(ksk.key_tag(), rrsig.key_tag());
        assert_eq!(verify_rrset(&rrsig, &ksk, &rrset), Ok(true));

        // The ZSK has a different key tag, so verification must fail
        // without erroring.
        assert_eq!(verify_rrset(&rrsig, &zsk, &rrset), Ok(false));
    }

    #[test]
    fn rrsig_verify_rsa_sha256() {
        let (ksk, zsk) = root_pubkey();
        let rrsig = Rrsig::new(
            Rtype::DNSKEY,
            SecurityAlgorithm::RSASHA256,
            0,
            Ttl::from_secs(172800),
            1560211200.into(),
            1558396800.into(),
            20326,
            Name::root(),
            base64::decode(
                "otBkINZAQu7AvPKjr/xWIEE7+SoZtKgF8bzVynX6bfJMJuPay8jPvNmwXk\
                ZOdSoYlvFp0bk9JWJKCh8y5uoNfMFkN6OSrDkr3t0E+c8c0Mnmwkk5CETH3\
                Gqxthi0yyRX5T4VlHU06/Ks4zI+XAgl3FBpOc554ivdzez8YCjAIGx7Xgzz\
                ooEb7heMSlLc7S7/HNjw51TPRs4RxrAVcezieKCzPPpeWBhjE6R3oiSwrl0\
                SBD4/yplrDlr7UHs/Atcm3MSgemdyr2sOoOUkVQCVpcj3SQQezoD2tCM786\
                1CXEQdg5fjeHDtz285xHt5HJpA5cOcctRo4ihybfow/+V7AQ==",
            )
            .unwrap(),
        )
        .unwrap();
        rrsig_verify_dnskey(ksk, zsk, rrsig);
    }

    #[test]
    fn rrsig_verify_rsa_sha256_short_key() {
        // The .net KSK/ZSK of 2021, a 1024 bit ZSK.
        let ksk = base64::decode(
            "AQOYBnzqWXIEj6mlgXg4LWC0HP2n8eK8XqgHlmJ/69iuIHsa1TrHDG6TcOra\
            /pyeGKwH0nKZhTmXSuUFGh9BCNiwVDuyyb6OBGy2Nte9Kr8NwWg4q+zhSoOf\
            4D+gC9dEzg0yFdwT0DKEvmNPt0K4jbQDS4Yimb+uPKuF6yieWWrPYYCrv8C9\
            KC8JMze2uT6NuWBfsl2fDUoV4l65qMww06D7n+p7RbdwWkAZ0fA63mXVXBZF\
            6kpDtsYD7SUB9jhhfLQE/r85bvg3FaSs5Wi2BaqN06SzGWI1DHu7axthIOeH\
            wg00zxlhTpoYCH0ldoQz+S65zWYi/fRJiyLSBb6JZOvn",
        )
        .unwrap();
        let zsk = base64::decode(
            "AQPW36Zs2vsDFGgdXBlg8RXSr1pSJ12NK+u9YcWfOr85we2z5A04SKQlIfyT\
            K37dItGFcldtF7oYwPg11T3R33viKV6PyASvnuRl8QKiLk5FfGUDt1sQJv3S\
            /9wT22Le1vnoE/6XFRyeb8kmJgz0oQB1VAO9b0l6Vm8KAVeOGJ+Qsjaq0O0a\
            VzwPvmPtYm/i3qoAhkaMBUpg6RrF5NKhRyG3",
        )
        .unwrap();
        let ksk =
            Dnskey::new(257, 3, SecurityAlgorithm::RSASHA256, ksk).unwrap();
        let zsk =
            Dnskey::new(256, 3, SecurityAlgorithm::RSASHA256, zsk).unwrap();

        let rrsig = Rrsig::new(
            Rtype::DNSKEY,
            SecurityAlgorithm::RSASHA256,
            1,
            Ttl::from_secs(86400),
            Timestamp::from_str("20210921162830").unwrap(),
            Timestamp::from_str("20210906162330").unwrap(),
            35886,
            Name::from_str("net.").unwrap(),
            base64::decode(
                "j1s1IPMoZd0mbmelNVvcbYNe2tFCdLsLpNCnQ8xW6d91ujwPZ2yDlc3lU3\
                hb+Jq3sPoj+5lVgB7fZzXQUQTPFWLF7zvW49da8pWuqzxFtg6EjXRBIWH5r\
                pEhOcr+y3QolJcPOTx+/utCqt2tBKUUy3LfM6WgvopdSGaryWdwFJPW7qKH\
                jyyLYxIGx5AEuLfzsA5XZf8CmpUheSRH99GRZoIB+sQzHuelWGMQ5A42DPv\
                OVZFmTpIwiT2QaIpid4nJ7jNfahfwFrCoS+hvqjK9vktc5/6E/Mt7DwCQDa\
                Pt5cqDfYltUitQy+YA5YP5sOhINChYadZe+2N80OA+RKz0mA==",
            )
            .unwrap(),
        )
        .unwrap();
        rrsig_verify_dnskey(ksk, zsk, rrsig);
    }

    #[test]
    fn rrsig_verify_ecdsap256_sha256() {
        let (ksk, zsk) = (
            Dnskey::new(
                257,
                3,
                SecurityAlgorithm::ECDSAP256SHA256,
                base64::decode(
                    "mdsswUyr3DPW132mOi8V9xESWE8jTo0dxCjjnopKl+GqJxpVXckHAe\
                    F+KkxLbxILfDLUT0rAK9iUzy1L53eKGQ==",
                )
                .unwrap(),
            )
            .unwrap(),
            Dnskey::new(
                256,
                3,
                SecurityAlgorithm::ECDSAP256SHA256,
                base64::decode(
                    "oJMRESz5E4gYzS/q6XDrvU1qMPYIjCWzJaOau8XNEZeqCYKD5ar0IR\
                    d8KqXXFJkqmVfRvMGPmM1x8fGAa2XhSA==",
                )
                .unwrap(),
            )
            .unwrap(),
        );

        let owner = Name::from_str("cloudflare.com.").unwrap();
        let rrsig = Rrsig::new(
            Rtype::DNSKEY,
            SecurityAlgorithm::ECDSAP256SHA256,
            2,
            Ttl::from_secs(3600),
            1560314494.into(),
            1555130494.into(),
            2371,
            owner,
            base64::decode(
                "8jnAGhG7O52wmL065je10XQztRX1vK8P8KBSyo71Z6h5wAT9+GFxKBaE\
                zcJBLvRmofYFDAhju21p1uTfLaYHrg==",
            )
            .unwrap(),
        )
        .unwrap();
        rrsig_verify_dnskey(ksk, zsk, rrsig);
    }

    #[test]
    fn rrsig_verify_ed25519() {
        let (ksk, zsk) = (
            Dnskey::new(
                257,
                3,
                SecurityAlgorithm::ED25519,
                base64::decode(
                    "m1NELLVVQKl4fHVn/KKdeNO0PrYKGT3IGbYseT8XcKo=",
                )
                .unwrap(),
            )
            .unwrap(),
            Dnskey::new(
                256,
                3,
                SecurityAlgorithm::ED25519,
                base64::decode(
                    "2tstZAjgmlDTePn0NVXrAHBJmg84LoaFVxzLl1anjGI=",
                )
                .unwrap(),
            )
            .unwrap(),
        );

        let owner =
            Name::from_octets(b"\x07ED25519\x02nl\x00".to_vec()).unwrap();
        let rrsig = Rrsig::new(
            Rtype::DNSKEY,
            SecurityAlgorithm::ED25519,
            2,
            Ttl::from_secs(3600),
            1559174400.into(),
            1557360000.into(),
            45515,
            owner,
            base64::decode(
                "hvPSS3E9Mx7lMARqtv6IGiw0NE0uz0mZewndJCHTkhwSYqlasUq7KfO5\
                QdtgPXja7YkTaqzrYUbYk01J8ICsAA==",
            )
            .unwrap(),
        )
        .unwrap();
        rrsig_verify_dnskey(ksk, zsk, rrsig);
    }

    #[test]
    fn rrsig_verify_wildcard() {
        // RFC 4035, appendix B.6: a response synthesized from the
        // wildcard *.w.example.
        let key = Dnskey::new(
            256,
            3,
            SecurityAlgorithm::RSASHA1,
            base64::decode(
                "AQOy1bZVvpPqhg4j7EJoM9rI3ZmyEx2OzDBVrZy/lvI5CQePxX\
                HZS4i8dANH4DX3tbHol61ek8EFMcsGXxKciJFHyhl94C+NwILQd\
                zsUlSFovBZsyl/NX6yEbtw/xN9ZNcrbYvgjjZ/UVPZIySFNsgEY\
                vh0z2542lzMKR4Dh8uZffQ==",
            )
            .unwrap(),
        )
        .unwrap();
        let rrsig = Rrsig::new(
            Rtype::MX,
            SecurityAlgorithm::RSASHA1,
            2,
            Ttl::from_secs(3600),
            Timestamp::from_str("20040509183619").unwrap(),
            Timestamp::from_str("20040409183619").unwrap(),
            38519,
            Name::from_str("example.").unwrap(),
            base64::decode(
                "OMK8rAZlepfzLWW75Dxd63jy2wswESzxDKG2f9AMN1CytCd10cYI\
                 SAxfAdvXSZ7xujKAtPbctvOQ2ofO7AZJ+d01EeeQTVBPq4/6KCWhq\
                 e2XTjnkVLNvvhnc0u28aoSsG0+4InvkkOHknKxw4kX18MMR34i8lC\
                 36SR5xBni8vHI=",
            )
            .unwrap(),
        )
        .unwrap();
        let record = Record::new(
            Name::from_str("a.z.w.example.").unwrap(),
            Class::IN,
            Ttl::from_secs(3600),
            Mx::new(1, Name::from_str("ai.example.").unwrap()),
        );
        let records = [record.clone()];
        let rrset = Rrset::new(&records).unwrap();

        // Test that the key matches the RRSIG.
        assert_eq!(key.key_tag(), rrsig.key_tag());

        assert_eq!(verify_rrset(&rrsig, &key, &rrset), Ok(true));
        assert_eq!(
            rrsig.wildcard_closest_encloser(&record),
            Some(Name::from_str("w.example.").unwrap())
        );
    }

    #[test]
    fn rrsig_verify_mismatches() {
        let (ksk, zsk) = root_pubkey();
        let signature = base64::decode(
            "otBkINZAQu7AvPKjr/xWIEE7+SoZtKgF8bzVynX6bfJMJuPay8jPvNmwXk\
            ZOdSoYlvFp0bk9JWJKCh8y5uoNfMFkN6OSrDkr3t0E+c8c0Mnmwkk5CETH3\
            Gqxthi0yyRX5T4VlHU06/Ks4zI+XAgl3FBpOc554ivdzez8YCjAIGx7Xgzz\
            ooEb7heMSlLc7S7/HNjw51TPRs4RxrAVcezieKCzPPpeWBhjE6R3oiSwrl0\
            SBD4/yplrDlr7UHs/Atcm3MSgemdyr2sOoOUkVQCVpcj3SQQezoD2tCM786\
            1CXEQdg5fjeHDtz285xHt5HJpA5cOcctRo4ihybfow/+V7AQ==",
        )
        .unwrap();
        let rrsig = |type_covered, key_tag| {
            Rrsig::new(
                type_covered,
                SecurityAlgorithm::RSASHA256,
                0,
                Ttl::from_secs(172800),
                1560211200.into(),
                1558396800.into(),
                key_tag,
                Name::root(),
                signature.clone(),
            )
            .unwrap()
        };

        let records: Vec<_> = [&ksk, &zsk]
            .iter()
            .map(|x| {
                Record::new(
                    Name::root(),
                    Class::IN,
                    Ttl::from_secs(172800),
                    (*x).clone(),
                )
            })
            .collect();
        let rrset = Rrset::new(&records).unwrap();

        // A wrong key tag is a verification failure, not an error.
        assert_eq!(
            verify_rrset(&rrsig(Rtype::DNSKEY, 20327), &ksk, &rrset),
            Ok(false)
        );

        // A wrong covered type is a verification failure as well.
        assert_eq!(
            verify_rrset(&rrsig(Rtype::TXT, 20326), &ksk, &rrset),
            Ok(false)
        );

        // An unknown algorithm is an error: the engine cannot judge the
        // signature at all.
        let bogus = Dnskey::new(
            257,
            3,
            SecurityAlgorithm::PRIVATEDNS,
            ksk.public_key().clone(),
        )
        .unwrap();
        let bogus_rrsig = Rrsig::new(
            Rtype::DNSKEY,
            SecurityAlgorithm::PRIVATEDNS,
            0,
            Ttl::from_secs(172800),
            1560211200.into(),
            1558396800.into(),
            bogus.key_tag(),
            Name::root(),
            signature.clone(),
        )
        .unwrap();
        assert_eq!(
            verify_rrset(&bogus_rrsig, &bogus, &rrset),
            Err(VerifyError::UnsupportedAlgorithm)
        );
    }
}
