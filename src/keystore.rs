//! Key pairs on disk.
//!
//! DNSSEC key pairs are conventionally stored as two sibling files whose
//! shared base name is derived from the owner name, the algorithm number,
//! and the key tag — `Kexample.org.+015+31967` — so that a key can be
//! located without any directory index. The `.key` file holds the DNSKEY
//! record in presentation format; the `.private` file holds the secret
//! key parameters in the BIND private-key text format.
//!
//! This module reads and writes both artifacts. Writes go through a
//! temporary file in the target directory followed by a rename, so a
//! concurrent reader never observes a partially written key file. All
//! functions take the target directory as an explicit argument; there is
//! no implicit working-directory state. Blocking functions live at the
//! module level, and the [`nonblocking`] submodule provides asynchronous
//! equivalents with identical observable results.

#![cfg(any(feature = "ring", feature = "openssl"))]
#![cfg_attr(
    docsrs,
    doc(cfg(any(feature = "ring", feature = "openssl")))
)]

use core::fmt;
use core::str::FromStr;

use std::io;
use std::path::{Path, PathBuf};
use std::string::String;
use std::vec::Vec;

use tracing::debug;

use crate::base::iana::{Class, SecurityAlgorithm};
use crate::base::name::Name;
use crate::base::record::{Record, Ttl};
use crate::crypto::bytes::{BindFormatError, SecretKeyBytes};
use crate::crypto::common::DigestError;
use crate::rdata::{Dnskey, Ds, Timestamp};
use crate::utils::base64;
use crate::validate::DnskeyExt;

//------------ StoredKey -----------------------------------------------------

/// The public half of a key pair as read from a `.key` file.
#[derive(Clone, Debug)]
pub struct StoredKey {
    /// The DNSKEY record.
    pub record: Record<Dnskey<Vec<u8>>>,

    /// When the key pair was created, if recorded in the file.
    pub created: Option<Timestamp>,
}

//------------ key_file_base -------------------------------------------------

/// Returns the base file name for a key.
///
/// The name follows the convention popularized by BIND's dnssec-keygen:
/// `K<owner>+<algorithm>+<key tag>`, with the algorithm as three and the
/// key tag as five decimal digits. Both the `.key` and the `.private`
/// artifact use this base, so the name is reconstructible from the fields
/// of a DS record.
pub fn key_file_base(
    owner: &Name,
    algorithm: SecurityAlgorithm,
    key_tag: u16,
) -> String {
    let mut owner = owner.to_string();
    owner.make_ascii_lowercase();
    format!("K{}+{:03}+{:05}", owner, algorithm.to_int(), key_tag)
}

//------------ Reading and writing the DNSKEY presentation format ------------

/// Parses the contents of a `.key` file.
///
/// The file consists of optional comment lines introduced by a semicolon
/// — a `; Created: <timestamp>` comment records the creation time — and a
/// single DNSKEY record in presentation format: the owner name, an
/// optional TTL, an optional class, the `DNSKEY` type, and the flags,
/// protocol, algorithm, and base64 key data fields.
pub fn parse_from_bind(
    data: &str,
) -> Result<StoredKey, ParseDnskeyTextError> {
    use ParseDnskeyTextError::Misformatted;

    let mut created = None;
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix(';') {
            if let Some(value) = comment.trim().strip_prefix("Created:") {
                created = Timestamp::from_str(value.trim()).ok();
            }
            continue;
        }

        let mut words = line.split_whitespace();
        let owner = words
            .next()
            .and_then(|word| Name::from_str(word).ok())
            .ok_or(Misformatted)?;

        let mut word = words.next().ok_or(Misformatted)?;
        let mut ttl = None;
        if let Ok(value) = word.parse::<u32>() {
            ttl = Some(value);
            word = words.next().ok_or(Misformatted)?;
        }
        if word.eq_ignore_ascii_case("IN") {
            word = words.next().ok_or(Misformatted)?;
        }
        if !word.eq_ignore_ascii_case("DNSKEY") {
            return Err(Misformatted);
        }

        let flags = words
            .next()
            .and_then(|word| word.parse::<u16>().ok())
            .ok_or(Misformatted)?;
        let protocol = words
            .next()
            .and_then(|word| word.parse::<u8>().ok())
            .ok_or(Misformatted)?;
        let algorithm = words
            .next()
            .and_then(|word| word.parse::<u8>().ok())
            .map(SecurityAlgorithm::from_int)
            .ok_or(Misformatted)?;

        let mut key_data = String::new();
        for word in words {
            key_data.push_str(word);
        }
        let public_key =
            base64::decode(&key_data).map_err(|_| Misformatted)?;

        let dnskey = Dnskey::new(flags, protocol, algorithm, public_key)
            .map_err(|_| Misformatted)?;
        return Ok(StoredKey {
            record: Record::new(
                owner,
                Class::IN,
                Ttl::from_secs(ttl.unwrap_or(3600)),
                dnskey,
            ),
            created,
        });
    }

    // No record line was found.
    Err(Misformatted)
}

/// Formats the contents of a `.key` file.
fn format_as_bind(
    record: &Record<Dnskey<Vec<u8>>>,
    created: Timestamp,
) -> String {
    format!("; Created: {}\n{}\n", created, record)
}

//------------ Writing key pairs ---------------------------------------------

/// Writes a key pair into the given directory.
///
/// The public half is written as `<base>.key`, the secret parameters as
/// `<base>.private`; the given timestamp is recorded in the public file.
/// Both files are written atomically: a reader concurrently looking up
/// the key either sees a complete file or none at all. Concurrent writes
/// of the *same* key are not coordinated; the last writer wins.
pub fn write_key(
    directory: &Path,
    record: &Record<Dnskey<Vec<u8>>>,
    secret: &SecretKeyBytes,
    created: Timestamp,
) -> Result<(), KeyStoreError> {
    let (public_path, secret_path) = key_paths(directory, record)?;
    if secret.algorithm() != record.data().algorithm() {
        return Err(KeyStoreError::AlgorithmMismatch);
    }

    write_atomic(
        &public_path,
        format_as_bind(record, created).as_bytes(),
    )?;
    write_atomic(
        &secret_path,
        secret.display_as_bind().to_string().as_bytes(),
    )?;

    debug!(
        "wrote key pair for {} with key tag {} to {}",
        record.owner(),
        record.data().key_tag(),
        directory.display()
    );
    Ok(())
}

/// Reads the public key matching a DS record from the given directory.
///
/// The expected file name is reconstructed from the owner name and the
/// key tag and algorithm fields of the DS record; the file's key is then
/// checked against the DS record by recomputing the key tag and the
/// digest. A missing file and a key that does not match the digest both
/// count as the key not being present.
pub fn read_public_key(
    directory: &Path,
    owner: &Name,
    ds: &Ds<impl AsRef<[u8]>>,
) -> Result<StoredKey, KeyStoreError> {
    let base = key_file_base(owner, ds.algorithm(), ds.key_tag());
    let path = directory.join(format!("{}.key", base));
    let data = read_file(&path)?;
    let stored = parse_from_bind(&data)?;
    check_against_ds(&stored, owner, ds)?;
    Ok(stored)
}

/// Reads the secret key parameters for a key from the given directory.
pub fn read_secret_key(
    directory: &Path,
    owner: &Name,
    algorithm: SecurityAlgorithm,
    key_tag: u16,
) -> Result<SecretKeyBytes, KeyStoreError> {
    let base = key_file_base(owner, algorithm, key_tag);
    let path = directory.join(format!("{}.private", base));
    let data = read_file(&path)?;
    Ok(SecretKeyBytes::parse_from_bind(&data)?)
}

//------------ Helpers -------------------------------------------------------

/// Returns the paths of the two artifacts of a key pair.
fn key_paths(
    directory: &Path,
    record: &Record<Dnskey<Vec<u8>>>,
) -> Result<(PathBuf, PathBuf), KeyStoreError> {
    let base = key_file_base(
        record.owner(),
        record.data().algorithm(),
        record.data().key_tag(),
    );
    Ok((
        directory.join(format!("{}.key", base)),
        directory.join(format!("{}.private", base)),
    ))
}

/// Checks a stored key against the DS record used to look it up.
fn check_against_ds(
    stored: &StoredKey,
    owner: &Name,
    ds: &Ds<impl AsRef<[u8]>>,
) -> Result<(), KeyStoreError> {
    let dnskey = stored.record.data();
    if stored.record.owner() != owner
        || dnskey.algorithm() != ds.algorithm()
        || dnskey.key_tag() != ds.key_tag()
    {
        return Err(KeyStoreError::KeyNotFound);
    }
    let digest = dnskey.digest(owner, ds.digest_type())?;
    if digest != ds.digest().as_ref() {
        return Err(KeyStoreError::KeyNotFound);
    }
    Ok(())
}

/// Reads a file, mapping a missing file to [`KeyStoreError::KeyNotFound`].
fn read_file(path: &Path) -> Result<String, KeyStoreError> {
    std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            KeyStoreError::KeyNotFound
        } else {
            KeyStoreError::Io(err)
        }
    })
}

/// Writes a file atomically.
///
/// The data goes into a temporary file in the same directory first, which
/// is then renamed over the final path.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), KeyStoreError> {
    let temp_path = temp_path(path);
    std::fs::write(&temp_path, data).map_err(KeyStoreError::Io)?;
    std::fs::rename(&temp_path, path).map_err(KeyStoreError::Io)
}

/// Returns the temporary path used for atomically writing to a path.
fn temp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

//------------ nonblocking ---------------------------------------------------

/// Asynchronous variants of the key store operations.
///
/// The functions mirror their blocking counterparts exactly: the same
/// file layout, the same atomic-write discipline, and byte-identical
/// decoded results for the same artifacts.
#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub mod nonblocking {
    use super::*;

    /// Writes a key pair into the given directory.
    ///
    /// See the blocking [`write_key`][super::write_key] for the file
    /// layout and atomicity guarantees.
    pub async fn write_key(
        directory: &Path,
        record: &Record<Dnskey<Vec<u8>>>,
        secret: &SecretKeyBytes,
        created: Timestamp,
    ) -> Result<(), KeyStoreError> {
        let (public_path, secret_path) = key_paths(directory, record)?;
        if secret.algorithm() != record.data().algorithm() {
            return Err(KeyStoreError::AlgorithmMismatch);
        }

        write_atomic(
            &public_path,
            format_as_bind(record, created).into_bytes(),
        )
        .await?;
        write_atomic(
            &secret_path,
            secret.display_as_bind().to_string().into_bytes(),
        )
        .await?;

        debug!(
            "wrote key pair for {} with key tag {} to {}",
            record.owner(),
            record.data().key_tag(),
            directory.display()
        );
        Ok(())
    }

    /// Reads the public key matching a DS record from the given
    /// directory.
    ///
    /// See the blocking [`read_public_key`][super::read_public_key] for
    /// the lookup rules.
    pub async fn read_public_key(
        directory: &Path,
        owner: &Name,
        ds: &Ds<impl AsRef<[u8]>>,
    ) -> Result<StoredKey, KeyStoreError> {
        let base = key_file_base(owner, ds.algorithm(), ds.key_tag());
        let path = directory.join(format!("{}.key", base));
        let data = read_file(&path).await?;
        let stored = parse_from_bind(&data)?;
        check_against_ds(&stored, owner, ds)?;
        Ok(stored)
    }

    /// Reads the secret key parameters for a key from the given
    /// directory.
    pub async fn read_secret_key(
        directory: &Path,
        owner: &Name,
        algorithm: SecurityAlgorithm,
        key_tag: u16,
    ) -> Result<SecretKeyBytes, KeyStoreError> {
        let base = key_file_base(owner, algorithm, key_tag);
        let path = directory.join(format!("{}.private", base));
        let data = read_file(&path).await?;
        Ok(SecretKeyBytes::parse_from_bind(&data)?)
    }

    /// Reads a file, mapping a missing file to
    /// [`KeyStoreError::KeyNotFound`].
    async fn read_file(path: &Path) -> Result<String, KeyStoreError> {
        tokio::fs::read_to_string(path).await.map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                KeyStoreError::KeyNotFound
            } else {
                KeyStoreError::Io(err)
            }
        })
    }

    /// Writes a file atomically.
    async fn write_atomic(
        path: &Path,
        data: Vec<u8>,
    ) -> Result<(), KeyStoreError> {
        let temp_path = temp_path(path);
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(KeyStoreError::Io)?;
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(KeyStoreError::Io)
    }
}

//============ Error Types ===================================================

//------------ ParseDnskeyTextError ------------------------------------------

/// An error parsing a DNSKEY record in presentation format.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseDnskeyTextError {
    /// The text did not contain a well-formed DNSKEY record.
    Misformatted,
}

//--- Display, Error

impl fmt::Display for ParseDnskeyTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Misformatted => "misformatted DNSKEY record",
        })
    }
}

impl std::error::Error for ParseDnskeyTextError {}

//------------ KeyStoreError -------------------------------------------------

/// An error while reading or writing key files.
#[derive(Debug)]
pub enum KeyStoreError {
    /// No key matching the lookup exists in the directory.
    KeyNotFound,

    /// The secret and public halves use different algorithms.
    AlgorithmMismatch,

    /// A `.key` file could not be parsed.
    ParseDnskeyText(ParseDnskeyTextError),

    /// A `.private` file could not be parsed.
    Bind(BindFormatError),

    /// The digest type of the DS record is not supported.
    Digest(DigestError),

    /// An I/O operation failed.
    Io(io::Error),
}

//--- Conversions

impl From<ParseDnskeyTextError> for KeyStoreError {
    fn from(value: ParseDnskeyTextError) -> Self {
        Self::ParseDnskeyText(value)
    }
}

impl From<BindFormatError> for KeyStoreError {
    fn from(value: BindFormatError) -> Self {
        Self::Bind(value)
    }
}

impl From<DigestError> for KeyStoreError {
    fn from(value: DigestError) -> Self {
        Self::Digest(value)
    }
}

//--- Display, Error

impl fmt::Display for KeyStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => f.write_str("key not found"),
            Self::AlgorithmMismatch => {
                f.write_str("secret and public key algorithms differ")
            }
            Self::ParseDnskeyText(err) => err.fmt(f),
            Self::Bind(err) => err.fmt(f),
            Self::Digest(err) => err.fmt(f),
            Self::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for KeyStoreError {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::DigestAlgorithm;
    use crate::crypto::sign::{generate, GenerateParams};
    use crate::validate::create_ds;

    use std::string::ToString;

    fn test_params() -> Vec<GenerateParams> {
        let mut params = vec![
            GenerateParams::RsaSha256 { bits: 2048 },
            GenerateParams::EcdsaP256Sha256,
            GenerateParams::Ed25519,
        ];
        // DSA needs OpenSSL.
        #[cfg(feature = "openssl")]
        params.push(GenerateParams::Dsa);
        params
    }

    fn owner() -> Name {
        "example.org.".parse().unwrap()
    }

    fn dnskey_record(dnskey: Dnskey<Vec<u8>>) -> Record<Dnskey<Vec<u8>>> {
        Record::new(owner(), Class::IN, Ttl::from_secs(3600), dnskey)
    }

    #[test]
    fn file_base_is_deterministic() {
        let owner: Name = "Example.ORG".parse().unwrap();
        assert_eq!(
            key_file_base(&owner, SecurityAlgorithm::ED25519, 31967),
            "Kexample.org.+015+31967"
        );
    }

    #[test]
    fn public_text_roundtrip() {
        let (_, public) = generate(GenerateParams::Ed25519, 257).unwrap();
        let record = dnskey_record(public);
        let created = Timestamp::from(1700000000);
        let text = format_as_bind(&record, created);
        let stored = parse_from_bind(&text).unwrap();
        assert_eq!(stored.record, record);
        assert_eq!(stored.created, Some(created));

        // A record without TTL, class, or comment parses as well.
        let stored =
            parse_from_bind("example.org. DNSKEY 257 3 15 AQEBAQ==\n")
                .unwrap();
        assert_eq!(stored.record.data().flags(), 257);
        assert_eq!(stored.created, None);

        assert_eq!(
            parse_from_bind("example.org. IN A 192.0.2.1").unwrap_err(),
            ParseDnskeyTextError::Misformatted
        );
    }

    #[test]
    fn write_then_read_back() {
        for params in test_params() {
            let dir = tempfile::tempdir().unwrap();
            let (secret, public) = generate(params, 257).unwrap();
            let record = dnskey_record(public.clone());
            let created = Timestamp::from(1700000000);

            write_key(dir.path(), &record, &secret, created).unwrap();

            let ds = create_ds(&owner(), &public, DigestAlgorithm::SHA256)
                .unwrap();
            let stored =
                read_public_key(dir.path(), &owner(), &ds).unwrap();
            assert_eq!(stored.record.data(), &public);
            assert_eq!(stored.created, Some(created));

            let read_secret = read_secret_key(
                dir.path(),
                &owner(),
                public.algorithm(),
                public.key_tag(),
            )
            .unwrap();
            assert_eq!(
                read_secret.display_as_bind().to_string(),
                secret.display_as_bind().to_string()
            );
        }
    }

    #[test]
    fn missing_and_mismatching_keys() {
        let dir = tempfile::tempdir().unwrap();
        let (secret, public) =
            generate(GenerateParams::Ed25519, 257).unwrap();
        let record = dnskey_record(public.clone());
        write_key(dir.path(), &record, &secret, Timestamp::from(0))
            .unwrap();

        // A DS record with a different key tag points at a file that does
        // not exist.
        let ds = Ds::new(
            public.key_tag().wrapping_add(1),
            public.algorithm(),
            DigestAlgorithm::SHA256,
            vec![0u8; 32],
        )
        .unwrap();
        assert!(matches!(
            read_public_key(dir.path(), &owner(), &ds),
            Err(KeyStoreError::KeyNotFound)
        ));

        // A DS record with the right name but a wrong digest must not
        // match the stored key.
        let ds = Ds::new(
            public.key_tag(),
            public.algorithm(),
            DigestAlgorithm::SHA256,
            vec![0u8; 32],
        )
        .unwrap();
        assert!(matches!(
            read_public_key(dir.path(), &owner(), &ds),
            Err(KeyStoreError::KeyNotFound)
        ));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn nonblocking_matches_blocking() {
        for params in test_params() {
            let dir = tempfile::tempdir().unwrap();
            let (secret, public) = generate(params, 256).unwrap();
            let record = dnskey_record(public.clone());
            let created = Timestamp::from(1700000000);

            nonblocking::write_key(dir.path(), &record, &secret, created)
                .await
                .unwrap();

            let ds = create_ds(&owner(), &public, DigestAlgorithm::SHA256)
                .unwrap();
            let sync_key =
                read_public_key(dir.path(), &owner(), &ds).unwrap();
            let async_key =
                nonblocking::read_public_key(dir.path(), &owner(), &ds)
                    .await
                    .unwrap();
            assert_eq!(sync_key.record, async_key.record);
            assert_eq!(sync_key.created, async_key.created);

            let sync_secret = read_secret_key(
                dir.path(),
                &owner(),
                public.algorithm(),
                public.key_tag(),
            )
            .unwrap();
            let async_secret = nonblocking::read_secret_key(
                dir.path(),
                &owner(),
                public.algorithm(),
                public.key_tag(),
            )
            .await
            .unwrap();
            assert_eq!(
                sync_secret.display_as_bind().to_string(),
                async_secret.display_as_bind().to_string()
            );
        }
    }
}
