//! Types common to all things X.509.
//!
//! This module contains the building blocks shared by certificates, CRLs,
//! OCSP responses and CMS messages: distinguished names, serial numbers,
//! algorithm identifiers, signed data and time values.

use std::{error, fmt, io, ops, str};
use bcder::{decode, encode};
use bcder::{BitString, Captured, ConstOid, Mode, Oid, Tag, Unsigned};
use bcder::decode::{ContentError, DecodeError, IntoSource, Source};
use bcder::encode::PrimitiveContent;
use bytes::Bytes;
use chrono::{DateTime, LocalResult, TimeDelta, TimeZone, Utc};
use crate::oid;
use crate::crypto::{
    PublicKey, SignatureAlgorithm, SignatureVerificationError,
};
use crate::uid::{UniqueId, UniqueIdError};
use crate::util::hex::Hex;


//------------ Name ----------------------------------------------------------

/// A distinguished name.
///
/// The name keeps its encoded form for comparison and hashing as well as
/// the parsed sequence of relative distinguished names for access to the
/// individual attributes. Relative distinguished names are kept in encoding
/// order, i.e., the least specific one comes first.
#[derive(Clone, Debug)]
pub struct Name {
    raw: Captured,
    rdns: Vec<Vec<NameAttribute>>,
}

impl Name {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let mut rdns = Vec::new();
        let raw = cons.capture(|cons| {
            cons.take_sequence(|cons| { // RDNSequence
                while let Some(rdn) = cons.take_opt_set(|cons| {
                    let mut rdn = Vec::new();
                    while let Some(attr) = cons.take_opt_sequence(
                        NameAttribute::from_constructed
                    )? {
                        rdn.push(attr)
                    }
                    if rdn.is_empty() {
                        return Err(cons.content_err(
                            "empty relative distinguished name"
                        ));
                    }
                    Ok(rdn)
                })? {
                    rdns.push(rdn)
                }
                Ok(())
            })
        })?;
        Ok(Name { raw, rdns })
    }

    /// Returns the encoded name.
    pub fn as_slice(&self) -> &[u8] {
        self.raw.as_slice()
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        &self.raw
    }

    /// Returns whether the name has no attributes at all.
    pub fn is_empty(&self) -> bool {
        self.rdns.is_empty()
    }

    /// Returns the relative distinguished names in encoding order.
    pub fn rdns(&self) -> &[Vec<NameAttribute>] {
        &self.rdns
    }

    /// Returns an iterator over all attributes in encoding order.
    pub fn attributes(&self) -> impl Iterator<Item = &NameAttribute> + '_ {
        self.rdns.iter().flatten()
    }

    /// Returns an iterator over all attributes of the given type.
    pub fn attributes_of<'a>(
        &'a self, attr_type: &'a Oid<impl AsRef<[u8]>>
    ) -> impl Iterator<Item = &'a NameAttribute> + 'a {
        self.attributes().filter(move |attr| attr.oid == *attr_type)
    }

    /// Returns all `serialNumber` attributes of the name.
    pub fn serial_number_attributes(&self) -> Vec<&NameAttribute> {
        self.attributes_of(&oid::AT_SERIAL_NUMBER).collect()
    }

    /// Returns the value of the most specific common name, if any.
    pub fn common_name(&self) -> Option<&str> {
        self.attributes_of(&oid::AT_COMMON_NAME).last().and_then(|attr| {
            attr.value()
        })
    }

    /// Returns the unique identifier embedded in the name.
    ///
    /// The identifier is taken from the one and only `serialNumber`
    /// attribute of the name.
    pub fn unique_identifier(&self) -> Result<UniqueId, UniqueIdError> {
        UniqueId::from_name(self)
    }
}


//--- PartialEq and Eq

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.raw.as_slice() == other.raw.as_slice()
    }
}

impl Eq for Name {}


//--- Display

/// Formats the name as described in RFC 4514.
///
/// The most specific relative distinguished name comes first.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for rdn in self.rdns.iter().rev() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            let mut first_attr = true;
            for attr in rdn {
                if !first_attr {
                    f.write_str("+")?;
                }
                first_attr = false;
                attr.fmt(f)?;
            }
        }
        Ok(())
    }
}


//------------ NameAttribute -------------------------------------------------

/// A single attribute of a distinguished name.
#[derive(Clone, Debug)]
pub struct NameAttribute {
    /// The attribute type.
    oid: Oid<Bytes>,

    /// The encoded attribute value.
    raw: Captured,

    /// The attribute value if it is one of the known string types.
    value: Option<String>,
}

impl NameAttribute {
    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let oid = Oid::take_from(cons)?;
        let raw = cons.capture_one()?;
        let value = decode_directory_string(raw.as_slice());
        Ok(NameAttribute { oid, raw, value })
    }

    /// Returns the attribute type.
    pub fn oid(&self) -> &Oid<Bytes> {
        &self.oid
    }

    /// Returns the value if it is a string.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the encoded value.
    pub fn raw_value(&self) -> &[u8] {
        self.raw.as_slice()
    }

    /// Returns the short name of the attribute type if there is one.
    pub fn short_name(&self) -> Option<&'static str> {
        ATTRIBUTE_NAMES.iter().find_map(|(oid, name)| {
            if self.oid == *oid {
                Some(*name)
            }
            else {
                None
            }
        })
    }
}

impl fmt::Display for NameAttribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.short_name() {
            Some(name) => f.write_str(name)?,
            None => write!(f, "{}", self.oid)?,
        }
        f.write_str("=")?;
        match self.value {
            Some(ref value) => write_escaped(value, f),
            None => write!(f, "#{}", Hex::new(self.raw.as_slice())),
        }
    }
}

const ATTRIBUTE_NAMES: &[(ConstOid, &str)] = &[
    (oid::AT_COMMON_NAME, "CN"),
    (oid::AT_SURNAME, "SURNAME"),
    (oid::AT_SERIAL_NUMBER, "SERIALNUMBER"),
    (oid::AT_COUNTRY_NAME, "C"),
    (oid::AT_LOCALITY_NAME, "L"),
    (oid::AT_STATE_OR_PROVINCE_NAME, "ST"),
    (oid::AT_STREET_ADDRESS, "STREET"),
    (oid::AT_ORGANIZATION_NAME, "O"),
    (oid::AT_ORGANIZATIONAL_UNIT_NAME, "OU"),
    (oid::AT_TITLE, "T"),
    (oid::AT_GIVEN_NAME, "GIVENNAME"),
    (oid::AT_PSEUDONYM, "PSEUDONYM"),
    (oid::AT_EMAIL_ADDRESS, "EMAILADDRESS"),
];

/// Decodes an encoded attribute value if it is a string.
fn decode_directory_string(raw: &[u8]) -> Option<String> {
    Mode::Ber.decode(raw, |cons| {
        cons.take_value(|tag, content| {
            let octets = match *content {
                decode::Content::Primitive(ref mut prim) => prim.take_all()?,
                decode::Content::Constructed(ref mut cons) => {
                    cons.skip_all()?;
                    return Ok(None)
                }
            };
            Ok(string_from_octets(tag, &octets))
        })
    }).ok().flatten()
}

fn string_from_octets(tag: Tag, octets: &[u8]) -> Option<String> {
    match tag {
        Tag::UTF8_STRING | Tag::PRINTABLE_STRING | Tag::IA5_STRING |
        Tag::VISIBLE_STRING | Tag::NUMERIC_STRING => {
            match str::from_utf8(octets) {
                Ok(s) => Some(s.into()),
                Err(_) => Some(latin1(octets)),
            }
        }
        Tag::TELETEX_STRING => Some(latin1(octets)),
        Tag::BMP_STRING => {
            if octets.len() % 2 != 0 {
                return None
            }
            char::decode_utf16(
                octets.chunks(2).map(|ch| u16::from_be_bytes([ch[0], ch[1]]))
            ).collect::<Result<String, _>>().ok()
        }
        Tag::UNIVERSAL_STRING => {
            if octets.len() % 4 != 0 {
                return None
            }
            octets.chunks(4).map(|ch| {
                char::from_u32(u32::from_be_bytes([ch[0], ch[1], ch[2], ch[3]]))
            }).collect()
        }
        _ => None
    }
}

fn latin1(octets: &[u8]) -> String {
    octets.iter().map(|&ch| char::from(ch)).collect()
}

/// Writes an attribute value with the escaping of RFC 4514.
fn write_escaped(value: &str, f: &mut fmt::Formatter) -> fmt::Result {
    let len = value.chars().count();
    for (idx, ch) in value.chars().enumerate() {
        match ch {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' => {
                write!(f, "\\{}", ch)?
            }
            '#' if idx == 0 => f.write_str("\\#")?,
            ' ' if idx == 0 || idx + 1 == len => f.write_str("\\ ")?,
            '\0' => f.write_str("\\00")?,
            _ => write!(f, "{}", ch)?,
        }
    }
    Ok(())
}


//------------ Serial --------------------------------------------------------

/// A certificate serial number.
///
/// Serial numbers are unsigned integers of arbitrary size. The value keeps
/// the big-endian octets of the number without leading zeros.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct Serial(Bytes);

impl Serial {
    pub fn from_slice(s: &[u8]) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(s))
    }

    fn from_bytes(mut bytes: Bytes) -> Self {
        let start = bytes.iter().position(|&ch| ch != 0).unwrap_or(
            bytes.len()
        );
        let _ = bytes.split_to(start);
        Serial(bytes)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        Unsigned::take_from(cons).map(|value| {
            Self::from_bytes(value.into_bytes())
        })
    }

    /// Returns the big-endian octets of the serial without leading zeros.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the serial as a string of upper case hex digits.
    pub fn to_hex(&self) -> String {
        if self.is_zero() {
            return "00".into()
        }
        Hex::new(self.as_slice()).to_string()
    }

    /// Whether the encoded integer needs an extra zero octet.
    fn needs_pad(&self) -> bool {
        match self.0.first() {
            Some(first) => first & 0x80 != 0,
            None => true,
        }
    }
}


//--- From

impl From<u64> for Serial {
    fn from(value: u64) -> Self {
        Self::from_slice(&value.to_be_bytes())
    }
}


//--- Display and Debug

/// Formats the serial as a decimal number.
impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0")
        }
        let mut num = self.0.to_vec();
        let mut digits = Vec::new();
        while num.iter().any(|&ch| ch != 0) {
            let mut rem = 0u16;
            for octet in num.iter_mut() {
                let step = (rem << 8) | u16::from(*octet);
                *octet = (step / 10) as u8;
                rem = step % 10;
            }
            digits.push(char::from(b'0' + rem as u8));
        }
        let res: String = digits.iter().rev().collect();
        f.write_str(&res)
    }
}

impl fmt::Debug for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Serial(0x{})", self.to_hex())
    }
}


//--- PrimitiveContent

impl PrimitiveContent for Serial {
    const TAG: Tag = Tag::INTEGER;

    fn encoded_len(&self, _mode: Mode) -> usize {
        self.0.len() + usize::from(self.needs_pad())
    }

    fn write_encoded<W: io::Write>(
        &self,
        _mode: Mode,
        target: &mut W
    ) -> Result<(), io::Error> {
        if self.needs_pad() {
            target.write_all(&[0])?;
        }
        target.write_all(self.0.as_ref())
    }
}


//------------ AlgorithmIdentifier -------------------------------------------

/// An algorithm identifier with its optional parameters.
///
/// Identifiers are kept as they appear in the data. They are only
/// translated into one of the algorithms we support when needed.
#[derive(Clone, Debug)]
pub struct AlgorithmIdentifier {
    algorithm: Oid<Bytes>,
    parameters: Option<Captured>,
}

impl AlgorithmIdentifier {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(Self::from_constructed)
    }

    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let algorithm = Oid::take_from(cons)?;
        let parameters = cons.capture_all()?;
        Ok(AlgorithmIdentifier {
            algorithm,
            parameters: if parameters.as_slice().is_empty() {
                None
            }
            else {
                Some(parameters)
            }
        })
    }

    pub fn algorithm(&self) -> &Oid<Bytes> {
        &self.algorithm
    }

    pub fn parameters(&self) -> Option<&Captured> {
        self.parameters.as_ref()
    }

    /// Returns whether the parameters are either absent or NULL.
    pub fn has_empty_parameters(&self) -> bool {
        match self.parameters {
            Some(ref params) => params.as_slice() == b"\x05\x00",
            None => true
        }
    }
}


//------------ SignedData ----------------------------------------------------

/// Some data together with a signature over it.
///
/// This is the common structure of certificates, CRLs and OCSP responses.
#[derive(Clone, Debug)]
pub struct SignedData {
    data: Captured,
    algorithm: AlgorithmIdentifier,
    signature: Bytes,
}

impl SignedData {
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        Ok(SignedData {
            data: cons.capture_one()?,
            algorithm: AlgorithmIdentifier::take_from(cons)?,
            signature: {
                let bits = BitString::take_from(cons)?;
                if bits.unused() != 0 {
                    return Err(cons.content_err(
                        "signature with unused bits"
                    ))
                }
                bits.octet_bytes()
            }
        })
    }

    /// Returns the encoded signed data.
    pub fn data(&self) -> &Captured {
        &self.data
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// Verifies the signature using the given public key.
    pub fn verify_signature(
        &self,
        public_key: &PublicKey
    ) -> Result<(), SignatureVerificationError> {
        let algorithm = SignatureAlgorithm::from_x509_identifier(
            &self.algorithm
        )?;
        public_key.verify(self.data.as_slice(), algorithm, &self.signature)
    }
}


//------------ Time ----------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(DateTime<Utc>);

impl Time {
    pub fn new(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Creates a time value from its components.
    ///
    /// Returns `None` if the components don’t form a valid time.
    pub fn utc_opt(
        year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32
    ) -> Option<Self> {
        match Utc.with_ymd_and_hms(year, month, day, hour, min, sec) {
            LocalResult::Single(dt) => Some(Time(dt)),
            _ => None
        }
    }

    /// Creates a time value from its components.
    ///
    /// # Panics
    ///
    /// The function panics if the components don’t form a valid time.
    pub fn utc(
        year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32
    ) -> Self {
        match Self::utc_opt(year, month, day, hour, min, sec) {
            Some(res) => res,
            None => panic!("invalid time components")
        }
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive(|tag, prim| {
            match tag {
                Tag::UTC_TIME => Self::from_utc_time(prim),
                Tag::GENERALIZED_TIME => Self::from_generalized_time(prim),
                _ => {
                    Err(prim.content_err(
                        "malformed time value"
                    ))
                }
            }
        })
    }

    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        let res = cons.take_opt_primitive_if(
            Tag::UTC_TIME, Self::from_utc_time
        )?;
        if let Some(res) = res {
            return Ok(Some(res))
        }
        cons.take_opt_primitive_if(
            Tag::GENERALIZED_TIME, Self::from_generalized_time
        )
    }

    /// Takes a value that has to be a `GeneralizedTime`.
    pub fn take_generalized_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive_if(
            Tag::GENERALIZED_TIME, Self::from_generalized_time
        )
    }

    fn from_utc_time<S: decode::Source>(
        prim: &mut decode::Primitive<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        // RFC 5280 requires the format YYMMDDHHMMSSZ
        let year = read_two_char(prim)? as i32;
        let year = if year >= 50 { year + 1900 }
                   else { year + 2000 };
        let res = (
            year,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
        );
        if prim.take_u8()? != b'Z' {
            return Err(prim.content_err(
                "malformed time value"
            ))
        }
        Self::from_parts(res).map_err(|err| prim.content_err(err))
    }

    fn from_generalized_time<S: decode::Source>(
        prim: &mut decode::Primitive<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        // RFC 5280 requires the format YYYYMMDDHHMMSSZ. Some OCSP
        // responders add fractional seconds which we accept and drop.
        let res = (
            read_four_char(prim)? as i32,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
        );
        let mut ch = prim.take_u8()?;
        if ch == b'.' {
            let mut digits = 0;
            loop {
                ch = prim.take_u8()?;
                if !ch.is_ascii_digit() {
                    break
                }
                digits += 1;
            }
            if digits == 0 {
                return Err(prim.content_err("malformed time value"))
            }
        }
        if ch != b'Z' {
            return Err(prim.content_err(
                "malformed time value"
            ))
        }
        Self::from_parts(res).map_err(|err| prim.content_err(err))
    }

    fn from_parts(
        parts: (i32, u32, u32, u32, u32, u32)
    ) -> Result<Self, ContentError> {
        Self::utc_opt(
            parts.0, parts.1, parts.2, parts.3, parts.4, parts.5
        ).ok_or_else(|| ContentError::from_static("malformed time value"))
    }

    /// Returns the time `delta` after this time or `None` on overflow.
    pub fn checked_add(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Self::new)
    }

    /// Returns the time `delta` before this time or `None` on overflow.
    pub fn checked_sub(self, delta: TimeDelta) -> Option<Self> {
        self.0.checked_sub_signed(delta).map(Self::new)
    }

    pub fn verify_not_before(
        &self,
        now: Time
    ) -> Result<(), ValidityPeriodError> {
        if now.0 < self.0 {
            Err(ValidityPeriodError::too_new())
        }
        else {
            Ok(())
        }
    }

    pub fn verify_not_after(
        &self,
        now: Time
    ) -> Result<(), ValidityPeriodError> {
        if now.0 > self.0 {
            Err(ValidityPeriodError::too_old())
        }
        else {
            Ok(())
        }
    }
}


//--- Deref

impl ops::Deref for Time {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}


//--- From

impl From<DateTime<Utc>> for Time {
    fn from(time: DateTime<Utc>) -> Self {
        Time(time)
    }
}

impl From<Time> for DateTime<Utc> {
    fn from(time: Time) -> Self {
        time.0
    }
}


//--- Display

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}


fn read_two_char<S: decode::Source>(
    source: &mut S
) -> Result<u32, DecodeError<S::Error>> {
    let mut s = [0u8; 2];
    s[0] = source.take_u8()?;
    s[1] = source.take_u8()?;
    read_digits(source, &s)
}

fn read_four_char<S: decode::Source>(
    source: &mut S
) -> Result<u32, DecodeError<S::Error>> {
    let mut s = [0u8; 4];
    for ch in s.iter_mut() {
        *ch = source.take_u8()?;
    }
    read_digits(source, &s)
}

fn read_digits<S: decode::Source>(
    source: &mut S, digits: &[u8]
) -> Result<u32, DecodeError<S::Error>> {
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(source.content_err("malformed time value"))
    }
    Ok(digits.iter().fold(0, |res, ch| res * 10 + u32::from(ch - b'0')))
}


//------------ Validity ------------------------------------------------------

/// The validity period of a certificate.
///
/// Both ends of the period are inclusive.
#[derive(Clone, Debug, Copy, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Validity {
    not_before: Time,
    not_after: Time,
}

impl Validity {
    pub fn new(not_before: Time, not_after: Time) -> Self {
        Validity { not_before, not_after }
    }

    pub fn not_before(self) -> Time {
        self.not_before
    }

    pub fn not_after(self) -> Time {
        self.not_after
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            Ok(Validity::new(
                Time::take_from(cons)?,
                Time::take_from(cons)?,
            ))
        })
    }

    pub fn verify_at(self, now: Time) -> Result<(), ValidityPeriodError> {
        self.not_before.verify_not_before(now)?;
        self.not_after.verify_not_after(now)?;
        Ok(())
    }

    pub fn contains(self, now: Time) -> bool {
        self.verify_at(now).is_ok()
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} to {}", self.not_before, self.not_after)
    }
}


//------------ ValidityPeriodError -------------------------------------------

/// An object is outside of its period of validity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidityPeriodError {
    /// Is the object too new?
    ///
    /// It is too old otherwise.
    too_new: bool,
}

impl ValidityPeriodError {
    fn too_new() -> Self {
        ValidityPeriodError { too_new: true }
    }

    fn too_old() -> Self {
        ValidityPeriodError { too_new: false }
    }

    /// Returns whether the object is not valid yet.
    pub fn is_too_new(self) -> bool {
        self.too_new
    }

    /// Returns whether the object has expired.
    pub fn is_expired(self) -> bool {
        !self.too_new
    }
}

impl fmt::Display for ValidityPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(
            if self.too_new {
                "object is not yet valid"
            }
            else {
                "object has expired"
            }
        )
    }
}

impl error::Error for ValidityPeriodError { }


//------------ Testing. One. Two. Three --------------------------------------

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::*;
    use bcder::encode::Values;

    #[test]
    fn signed_data_decode() {
        let data = include_bytes!("../test-data/root-ca.der");
        let obj = SignedData::decode(data.as_ref()).unwrap();
        assert_eq!(
            obj.algorithm().algorithm(), &oid::SHA256_WITH_RSA_ENCRYPTION
        );
        assert!(obj.algorithm().has_empty_parameters());
        assert_eq!(obj.signature().len(), 256);
    }

    #[test]
    fn serial_display() {
        assert_eq!(Serial::from(0xC0FFEE).to_string(), "12648430");
        assert_eq!(Serial::from(0xC0FFEE).to_hex(), "C0FFEE");
        assert_eq!(Serial::from(0).to_string(), "0");
        assert_eq!(
            Serial::from_slice(
                b"\x00\x1a\x2b\x3c\x4d\x5e\x6f\x70\x81\
                  \x92\xa3\xb4\xc5\xd6\xe7\xf8\x01"
            ).to_string(),
            "34784419729695855966531441567273056257"
        );
        assert_eq!(Serial::from_slice(b"\x00\x00\x02"), Serial::from(2));
    }

    #[test]
    fn serial_encode() {
        fn der(serial: Serial) -> Vec<u8> {
            serial.encode().to_captured(Mode::Der).into_bytes().to_vec()
        }

        assert_eq!(der(Serial::from(0x7F)), b"\x02\x01\x7F");
        assert_eq!(der(Serial::from(0x80)), b"\x02\x02\x00\x80");
        assert_eq!(der(Serial::from(0)), b"\x02\x01\x00");
        assert_eq!(
            Mode::Der.decode(
                b"\x02\x02\x00\x80".as_ref(), Serial::take_from
            ).unwrap(),
            Serial::from(0x80)
        );
    }

    #[test]
    fn name_display() {
        let cert = include_bytes!("../test-data/signer-2014.der");
        let name = Mode::Der.decode(cert.as_ref(), |cons| {
            cons.take_sequence(|cons| {
                let subject = cons.take_sequence(|cons| {
                    cons.take_opt_constructed_if(
                        Tag::CTX_0, |cons| cons.skip_all()
                    )?;
                    Serial::take_from(cons)?;
                    AlgorithmIdentifier::take_from(cons)?;
                    Name::take_from(cons)?;
                    Validity::take_from(cons)?;
                    let subject = Name::take_from(cons)?;
                    cons.skip_all()?;
                    Ok(subject)
                })?;
                // Signature algorithm and value.
                cons.skip_all()?;
                Ok(subject)
            })
        }).unwrap();
        assert_eq!(
            name.to_string(),
            "SERIALNUMBER=MIDCHE5HR8NAWUB3,PSEUDONYM=MIDCHE,\
             CN=MIDCHE5HR8NAWUB3:PN,C=CH"
        );
        assert_eq!(name.common_name(), Some("MIDCHE5HR8NAWUB3:PN"));
        assert_eq!(name.serial_number_attributes().len(), 1);
        assert_eq!(name.attributes().count(), 4);
    }

    #[test]
    fn name_escaping() {
        let mut name = Vec::new();
        encode::sequence(
            encode::set(
                encode::sequence((
                    oid::AT_COMMON_NAME.encode(),
                    bcder::Utf8String::from_str(
                        " Doe, John+#1 "
                    ).unwrap().encode(),
                ))
            )
        ).write_encoded(Mode::Der, &mut name).unwrap();
        let name = Mode::Der.decode(name.as_ref(), Name::take_from).unwrap();
        assert_eq!(name.to_string(), "CN=\\ Doe\\, John\\+#1\\ ");
    }

    #[test]
    fn string_types() {
        assert_eq!(
            string_from_octets(Tag::BMP_STRING, b"\x00M\x00\xfc"),
            Some("Mü".into())
        );
        assert_eq!(
            string_from_octets(Tag::TELETEX_STRING, b"Z\xfcrich"),
            Some("Zürich".into())
        );
        assert_eq!(
            string_from_octets(Tag::UNIVERSAL_STRING, b"\x00\x00\x00A"),
            Some("A".into())
        );
        assert_eq!(string_from_octets(Tag::OCTET_STRING, b"A"), None);
    }

    #[test]
    fn time_take_from() {
        fn decode(
            data: &[u8]
        ) -> Result<Time, DecodeError<std::convert::Infallible>> {
            Mode::Der.decode(data, Time::take_from)
        }

        assert_eq!(
            decode(b"\x17\x0d141224093012Z").unwrap(),
            Time::utc(2014, 12, 24, 9, 30, 12)
        );
        assert_eq!(
            decode(b"\x17\x0d491231000000Z").unwrap(),
            Time::utc(2049, 12, 31, 0, 0, 0)
        );
        assert_eq!(
            decode(b"\x17\x0d500101000000Z").unwrap(),
            Time::utc(1950, 1, 1, 0, 0, 0)
        );
        assert_eq!(
            decode(b"\x18\x0f20240602120000Z").unwrap(),
            Time::utc(2024, 6, 2, 12, 0, 0)
        );
        assert_eq!(
            decode(b"\x18\x1320240602120000.123Z").unwrap(),
            Time::utc(2024, 6, 2, 12, 0, 0)
        );
        assert!(decode(b"\x17\x0d141324093012Z").is_err());
        assert!(decode(b"\x17\x0d1412240930+2Z").is_err());
        assert!(decode(b"\x18\x1020240602120000.Z").is_err());
    }

    #[test]
    fn time_checked_arithmetic() {
        let time = Time::utc(2024, 6, 2, 0, 0, 0);
        assert_eq!(
            time.checked_add(TimeDelta::minutes(5)),
            Some(Time::utc(2024, 6, 2, 0, 5, 0))
        );
        assert_eq!(
            time.checked_sub(TimeDelta::days(1)),
            Some(Time::utc(2024, 6, 1, 0, 0, 0))
        );
        assert_eq!(time.checked_add(TimeDelta::MAX), None);
        assert_eq!(time.checked_sub(TimeDelta::MAX), None);
    }

    #[test]
    fn validity_verify_at() {
        let validity = Validity::new(
            Time::utc(2014, 12, 24, 9, 30, 12),
            Time::utc(2017, 12, 24, 9, 30, 12),
        );
        assert!(validity.contains(Time::utc(2014, 12, 24, 9, 30, 12)));
        assert!(validity.contains(Time::utc(2017, 12, 24, 9, 30, 12)));
        assert!(
            validity.verify_at(
                Time::utc(2014, 12, 24, 9, 30, 11)
            ).unwrap_err().is_too_new()
        );
        assert!(
            validity.verify_at(
                Time::utc(2024, 6, 2, 0, 0, 0)
            ).unwrap_err().is_expired()
        );
        assert_eq!(
            validity.to_string(),
            "2014-12-24T09:30:12Z to 2017-12-24T09:30:12Z"
        );
    }
}
