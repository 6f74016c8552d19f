//! DNS CLASSes.

//------------ Class ---------------------------------------------------------

int_enum! {
    /// DNS CLASSes.
    ///
    /// The domain name space is partitioned into separate classes for
    /// different network types. In practice, only the Internet class is
    /// relevant.
    ///
    /// See [RFC 1035] and the [IANA registration].
    ///
    /// [RFC 1035]: https://tools.ietf.org/html/rfc1035
    /// [IANA registration]: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-2
    =>
    Class, u16;

    /// The Internet class.
    (IN => 1, b"IN")

    /// The CHAOS class.
    (CH => 3, b"CH")

    /// The Hesiod class.
    (HS => 4, b"HS")

    /// Query class None, defined in RFC 2136.
    (NONE => 254, b"NONE")

    /// Query class Any.
    (ANY => 255, b"ANY")
}

int_enum_str_with_prefix!(Class, "CLASS", u16);
