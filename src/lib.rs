//! A DNSSEC engine for Rust.
//!
//! This crate implements the cryptographic core of DNSSEC: it
//! authenticates DNS resource record sets for validators and produces
//! signatures for zone signers, and it manages the key pairs those
//! operations revolve around. It deliberately does not speak the DNS
//! wire protocol — records enter and leave as structured values — and it
//! implements no cryptographic primitives of its own, delegating to the
//! Ring and OpenSSL backends.
//!
//! The crate consists of the following modules:
//!
//! * [`base`] holds the record model the engine operates on: domain
//!   names, IANA number types, records and RRsets, and the canonical
//!   byte form signatures are computed over.
//! * [`rdata`] provides the DNSSEC record data types — DNSKEY, RRSIG,
//!   and DS — plus the handful of ordinary types the canonical form
//!   rules distinguish.
//! * [`crypto`] contains the cryptographic backends, the codecs for
//!   public and private key material, and the interface to external
//!   signing devices.
//! * [`sign`] generates RRSIG records from an RRset and a signing key,
//!   whether the key is held locally or by an external device.
//! * [`validate`] verifies RRSIG records against DNSKEY records and
//!   derives DS record data.
//! * [`keystore`] persists key pairs as the conventional pair of `.key`
//!   and `.private` files, with blocking and non-blocking variants.
//!
//! # Crate features
//!
//! * `ring`: cryptography via [Ring](https://docs.rs/ring), preferred
//!   where it supports the algorithm in question. Enabled by default.
//! * `openssl`: cryptography via [OpenSSL](https://docs.rs/openssl),
//!   required for the legacy algorithms (RSA/MD5, DSA, RSA/SHA-1) and
//!   Ed448. Enabled by default.
//! * `tokio`: the non-blocking key store. Enabled by default.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod base;
pub mod crypto;
pub mod keystore;
pub mod rdata;
pub mod sign;
pub mod utils;
pub mod validate;
