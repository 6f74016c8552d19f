//! Composing wire-format DNS data.
//!
//! The DNSSEC core only ever builds octet sequences — canonical signing
//! input, record data, digests — and never parses full messages, so the
//! composition target is simply a growable octet vector.

use std::vec::Vec;

//------------ Compose -------------------------------------------------------

/// An extension trait for writing data in its wire format.
pub trait Compose {
    /// The length in octets of the wire format.
    const COMPOSE_LEN: u16;

    /// Appends the wire format of the value to the target.
    fn compose(&self, target: &mut Vec<u8>);
}

impl Compose for u8 {
    const COMPOSE_LEN: u16 = 1;

    fn compose(&self, target: &mut Vec<u8>) {
        target.push(*self)
    }
}

impl Compose for u16 {
    const COMPOSE_LEN: u16 = 2;

    fn compose(&self, target: &mut Vec<u8>) {
        target.extend_from_slice(&self.to_be_bytes())
    }
}

impl Compose for u32 {
    const COMPOSE_LEN: u16 = 4;

    fn compose(&self, target: &mut Vec<u8>) {
        target.extend_from_slice(&self.to_be_bytes())
    }
}

/// Appends data prefixed with its length as a 16 bit integer.
///
/// The closure composes the data; the length prefix is patched in
/// afterwards.
///
/// # Panics
///
/// Panics if the composed data is longer than 65,535 octets.
pub fn compose_len_prefixed<F: FnOnce(&mut Vec<u8>)>(
    target: &mut Vec<u8>,
    op: F,
) {
    let pos = target.len();
    target.extend_from_slice(&[0, 0]);
    op(target);
    let len = u16::try_from(target.len() - pos - 2).expect("long data");
    target[pos..pos + 2].copy_from_slice(&len.to_be_bytes());
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compose_ints() {
        let mut buf = Vec::new();
        1u8.compose(&mut buf);
        0x1234u16.compose(&mut buf);
        0x5678_9abcu32.compose(&mut buf);
        assert_eq!(buf, b"\x01\x12\x34\x56\x78\x9a\xbc");
    }

    #[test]
    fn len_prefixed() {
        let mut buf = Vec::new();
        compose_len_prefixed(&mut buf, |buf| {
            buf.extend_from_slice(b"foo")
        });
        assert_eq!(buf, b"\x00\x03foo");
    }
}
