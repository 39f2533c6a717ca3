//! The unique identifier of a Mobile ID subscriber.
//!
//! Certificates issued to Mobile ID subscribers carry a fixed-format
//! identifier of sixteen characters in the `serialNumber` attribute of their
//! subject name. The identifier stays the same across certificate renewals
//! and therefore identifies the subscriber rather than the certificate.

use std::{error, fmt, str};
use std::str::FromStr;
use bcder::decode::ContentError;
use crate::x509::Name;


//------------ UniqueId ------------------------------------------------------

/// A validated unique identifier.
///
/// The identifier consists of exactly sixteen characters none of which is
/// white space. It is always kept in upper case.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UniqueId(String);

impl UniqueId {
    /// The length of the identifier in characters.
    pub const LEN: usize = 16;

    /// Extracts the identifier from a subject name.
    pub fn from_name(name: &Name) -> Result<Self, UniqueIdError> {
        let attrs = name.serial_number_attributes();
        let attr = match attrs.as_slice() {
            [] => return Err(UniqueIdError::Missing),
            [attr] => attr,
            _ => return Err(UniqueIdError::Multiple),
        };
        match attr.value() {
            Some(value) => value.parse(),
            None => Err(UniqueIdError::NotAString),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}


//--- FromStr

impl FromStr for UniqueId {
    type Err = UniqueIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_uppercase();
        let len = s.chars().count();
        if len != Self::LEN {
            return Err(UniqueIdError::Length(len))
        }
        if s.chars().any(char::is_whitespace) {
            return Err(UniqueIdError::WhiteSpace)
        }
        Ok(UniqueId(s))
    }
}


//--- AsRef and Display

impl AsRef<str> for UniqueId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}


//------------ UniqueIdError -------------------------------------------------

/// The subject name does not contain a valid unique identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UniqueIdError {
    /// There is no `serialNumber` attribute.
    Missing,

    /// There is more than one `serialNumber` attribute.
    Multiple,

    /// The attribute value is not a string.
    NotAString,

    /// The identifier has the given number of characters instead of 16.
    Length(usize),

    /// The identifier contains white space.
    WhiteSpace,
}

impl From<UniqueIdError> for ContentError {
    fn from(err: UniqueIdError) -> Self {
        ContentError::from_boxed(Box::new(err))
    }
}

impl fmt::Display for UniqueIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            UniqueIdError::Missing => {
                f.write_str("subject has no serial number attribute")
            }
            UniqueIdError::Multiple => {
                f.write_str("subject has multiple serial number attributes")
            }
            UniqueIdError::NotAString => {
                f.write_str("subject serial number is not a string")
            }
            UniqueIdError::Length(len) => {
                write!(
                    f,
                    "unique identifier has {} characters instead of {}",
                    len, UniqueId::LEN
                )
            }
            UniqueIdError::WhiteSpace => {
                f.write_str("unique identifier contains white space")
            }
        }
    }
}

impl error::Error for UniqueIdError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bcder::{encode, Mode, PrintableString};
    use bcder::encode::{PrimitiveContent, Values};
    use crate::cert::Cert;
    use crate::oid;

    fn serial_number_rdn(value: &str) -> impl encode::Values {
        encode::set(
            encode::sequence((
                oid::AT_SERIAL_NUMBER.encode(),
                PrintableString::from_str(value).unwrap().encode(),
            ))
        )
    }

    fn name(values: &[&str]) -> Name {
        let encoded = encode::sequence(
            values.iter().map(|value| {
                serial_number_rdn(value)
            }).collect::<Vec<_>>()
        ).to_captured(Mode::Der);
        Mode::Der.decode(encoded.as_slice(), Name::take_from).unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            UniqueId::from_str("MIDCHE5HR8NAWUB3").unwrap().as_str(),
            "MIDCHE5HR8NAWUB3"
        );
        assert_eq!(
            UniqueId::from_str("midche5hr8nawub3").unwrap().as_str(),
            "MIDCHE5HR8NAWUB3"
        );
        assert_eq!(
            UniqueId::from_str("MIDCHE5HR8NAWUB"),
            Err(UniqueIdError::Length(15))
        );
        assert_eq!(
            UniqueId::from_str("MIDCHE5HR8NAWUB34"),
            Err(UniqueIdError::Length(17))
        );
        assert_eq!(
            UniqueId::from_str("MIDCHE5H 8NAWUB3"),
            Err(UniqueIdError::WhiteSpace)
        );
        assert_eq!(
            UniqueId::from_str("MIDCHE5H\t8NAWUB3"),
            Err(UniqueIdError::WhiteSpace)
        );
        assert_eq!(UniqueId::from_str(""), Err(UniqueIdError::Length(0)));
    }

    #[test]
    fn from_name() {
        assert_eq!(
            name(&["midcheq0a6rs1tb7"]).unique_identifier().unwrap().as_str(),
            "MIDCHEQ0A6RS1TB7"
        );
        assert_eq!(
            name(&["MIDCHEQ0A6RS1TB7", "MIDCHE5HR8NAWUB3"]).unique_identifier(),
            Err(UniqueIdError::Multiple)
        );
        assert_eq!(
            name(&["MIDCHE 0A6RS1TB7"]).unique_identifier(),
            Err(UniqueIdError::WhiteSpace)
        );
        assert_eq!(
            name(&["MIDCHEQ0A6RS1TB7XX"]).unique_identifier(),
            Err(UniqueIdError::Length(18))
        );
        assert_eq!(name(&[]).unique_identifier(), Err(UniqueIdError::Missing));
    }

    #[test]
    fn from_subject() {
        let cert = Cert::decode(
            include_bytes!("../test-data/signer-2014.der").as_ref()
        ).unwrap();
        assert_eq!(
            cert.subject().unique_identifier().unwrap().as_str(),
            "MIDCHE5HR8NAWUB3"
        );
    }

    #[test]
    fn missing_serial_number() {
        let cert = Cert::decode(
            include_bytes!("../test-data/issuing-ca.der").as_ref()
        ).unwrap();
        assert_eq!(
            cert.subject().unique_identifier(),
            Err(UniqueIdError::Missing)
        );
    }
}
