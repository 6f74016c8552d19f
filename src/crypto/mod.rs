//! Cryptographic backends, key material and signing.
//!
//! This crate supports OpenSSL and Ring for performing cryptography. These
//! cryptographic backends are gated on the `openssl` and `ring` features.
//! They offer mostly equivalent functionality, but OpenSSL supports a
//! larger set of signing algorithms (and, for RSA keys, supports weaker
//! key sizes); the legacy algorithms RSA/MD5, DSA, and Ed448 are only
//! available through OpenSSL.
//!
//! Each backend module exposes a `KeyPair` type, representing a
//! cryptographic key that can be used for signing, and the facade in
//! [`sign`] picks the preferred backend for a key automatically. Users can
//! choose to bring their own cryptography by providing their own type that
//! implements the [`sign::SignRaw`] trait. Keys held by an external
//! signing device take part through the same trait via the [`device`]
//! module.
//!
//! In addition to private key operations, this module provides the
//! [`common::PublicKey`] type for signature verification and the
//! [`common::DigestContext`] type for computing message digests.
//!
//! # Importing keys
//!
//! Keys can be imported from files stored on disk in the conventional BIND
//! format.
//!
//! ```no_run
//! use zonesign::crypto::bytes::SecretKeyBytes;
//! use zonesign::crypto::sign::KeyPair;
//! use zonesign::keystore;
//!
//! // Load an Ed25519 key named 'Kexample.org.+015+31967'.
//! let base = "keys/Kexample.org.+015+31967";
//! let sec_text = std::fs::read_to_string(format!("{base}.private")).unwrap();
//! let sec_bytes = SecretKeyBytes::parse_from_bind(&sec_text).unwrap();
//! let pub_text = std::fs::read_to_string(format!("{base}.key")).unwrap();
//! let pub_key = keystore::parse_from_bind(&pub_text).unwrap();
//!
//! // Parse the key into Ring or OpenSSL.
//! let key_pair = KeyPair::from_bytes(&sec_bytes, pub_key.record.data())
//!     .unwrap();
//! ```
//!
//! # Generating keys
//!
//! ```
//! use zonesign::crypto::sign::{generate, GenerateParams, KeyPair};
//!
//! // Generate a new Ed25519 key.
//! let (sec_bytes, pub_key) = generate(GenerateParams::Ed25519, 257).unwrap();
//!
//! // Parse the key into Ring or OpenSSL.
//! let key_pair = KeyPair::from_bytes(&sec_bytes, &pub_key).unwrap();
//! ```
//!
//! # Signing data
//!
//! ```
//! use zonesign::crypto::sign::{generate, GenerateParams, KeyPair, SignRaw};
//!
//! let (sec_bytes, pub_key) =
//!     generate(GenerateParams::Ed25519, 256).unwrap();
//! let key_pair = KeyPair::from_bytes(&sec_bytes, &pub_key).unwrap();
//!
//! // Sign arbitrary byte sequences with the key.
//! let sig = key_pair.sign_raw(b"Hello, World!").unwrap();
//! println!("{:?}", sig);
//! ```

pub mod bytes;
pub mod common;
pub mod device;
pub mod openssl;
pub mod ring;
pub mod sign;
