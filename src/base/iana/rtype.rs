//! Resource record types.

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource record types.
    ///
    /// Each resource record has a 16 bit type value indicating what kind of
    /// information is conveyed in the record's data. This type covers the
    /// record types the DNSSEC core deals with; unknown values are carried
    /// as their raw integer.
    ///
    /// For the currently registered values see the [IANA registration].
    ///
    /// [IANA registration]: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    =>
    Rtype, u16;

    /// A host address.
    (A => 1, b"A")

    /// An authoritative name server.
    (NS => 2, b"NS")

    /// The canonical name for an alias.
    (CNAME => 5, b"CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, b"SOA")

    /// A domain name pointer.
    (PTR => 12, b"PTR")

    /// Mail exchange.
    (MX => 15, b"MX")

    /// Text strings.
    (TXT => 16, b"TXT")

    /// IPv6 address.
    (AAAA => 28, b"AAAA")

    /// Server selection.
    (SRV => 33, b"SRV")

    /// Delegation signer.
    (DS => 43, b"DS")

    /// A DNSSEC signature.
    (RRSIG => 46, b"RRSIG")

    /// Denial of existence.
    (NSEC => 47, b"NSEC")

    /// A DNSSEC public key.
    (DNSKEY => 48, b"DNSKEY")

    /// Hashed denial of existence.
    (NSEC3 => 50, b"NSEC3")

    /// NSEC3 parameters.
    (NSEC3PARAM => 51, b"NSEC3PARAM")

    /// Child copy of a DS record.
    (CDS => 59, b"CDS")

    /// Child copy of a DNSKEY record.
    (CDNSKEY => 60, b"CDNSKEY")
}

int_enum_str_with_prefix!(Rtype, "TYPE", u16);
