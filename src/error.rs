//! Error handling.
//!
//! The verifier distinguishes between input it cannot make sense of and
//! input that uses algorithms it does not support. Both are fatal: a
//! message that produces either of them is never verified any further.
//! Negative outcomes of the actual checks such as an invalid signature or a
//! revoked certificate are not errors but are reported as part of a
//! [`ValidationResult`][crate::trust::ValidationResult] or a
//! [`SignatureStatus`][crate::signer::SignatureStatus].

use std::{error, fmt};
use std::convert::Infallible;
use bcder::Oid;
use bcder::decode::{ContentError, DecodeError};
use bytes::Bytes;


//------------ MalformedInput ------------------------------------------------

/// The input could not be understood.
///
/// This covers encoding errors of the CMS message and the certificates
/// included in it as well as structural problems such as a missing signer
/// certificate.
#[derive(Debug)]
pub struct MalformedInput {
    inner: MalformedInputKind,
}

#[derive(Debug)]
enum MalformedInputKind {
    Decoding(DecodeError<Infallible>),
    Content(ContentError),
}

impl MalformedInput {
    pub fn new(err: impl Into<ContentError>) -> Self {
        MalformedInput { inner: MalformedInputKind::Content(err.into()) }
    }
}

impl From<DecodeError<Infallible>> for MalformedInput {
    fn from(err: DecodeError<Infallible>) -> Self {
        MalformedInput { inner: MalformedInputKind::Decoding(err) }
    }
}

impl From<ContentError> for MalformedInput {
    fn from(err: ContentError) -> Self {
        MalformedInput { inner: MalformedInputKind::Content(err) }
    }
}

impl fmt::Display for MalformedInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.inner {
            MalformedInputKind::Decoding(ref inner) => inner.fmt(f),
            MalformedInputKind::Content(ref inner) => inner.fmt(f),
        }
    }
}

impl error::Error for MalformedInput { }


//------------ UnsupportedAlgorithm ------------------------------------------

/// An algorithm used by the input is not supported.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsupportedAlgorithm {
    /// What kind of algorithm this is.
    what: &'static str,

    /// The object identifier of the algorithm.
    oid: Oid<Bytes>,

    /// The size of the key in bits if only the size is the problem.
    key_bits: Option<usize>,
}

impl UnsupportedAlgorithm {
    pub fn new(what: &'static str, oid: Oid<Bytes>) -> Self {
        UnsupportedAlgorithm { what, oid, key_bits: None }
    }

    pub fn digest(oid: Oid<Bytes>) -> Self {
        Self::new("digest", oid)
    }

    pub fn signature(oid: Oid<Bytes>) -> Self {
        Self::new("signature", oid)
    }

    pub fn public_key(oid: Oid<Bytes>) -> Self {
        Self::new("public key", oid)
    }

    /// Creates a value for a signature algorithm used with a key size
    /// that the algorithm doesn’t support.
    pub fn key_size(oid: Oid<Bytes>, key_bits: usize) -> Self {
        UnsupportedAlgorithm {
            what: "signature", oid, key_bits: Some(key_bits)
        }
    }

    /// Returns the object identifier of the offending algorithm.
    pub fn oid(&self) -> &Oid<Bytes> {
        &self.oid
    }

    /// Returns the key size if the algorithm was rejected for it.
    pub fn key_bits(&self) -> Option<usize> {
        self.key_bits
    }
}

impl fmt::Display for UnsupportedAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported {} algorithm {}", self.what, self.oid)?;
        if let Some(bits) = self.key_bits {
            write!(f, " with {} bit key", bits)?;
        }
        Ok(())
    }
}

impl error::Error for UnsupportedAlgorithm { }


//------------ Error ---------------------------------------------------------

/// A fatal error while processing a message.
#[derive(Debug)]
pub enum Error {
    MalformedInput(MalformedInput),
    UnsupportedAlgorithm(UnsupportedAlgorithm),
}

impl Error {
    pub fn malformed(err: impl Into<ContentError>) -> Self {
        Error::MalformedInput(MalformedInput::new(err))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(*self, Error::MalformedInput(_))
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(*self, Error::UnsupportedAlgorithm(_))
    }
}

impl From<MalformedInput> for Error {
    fn from(err: MalformedInput) -> Self {
        Error::MalformedInput(err)
    }
}

impl From<UnsupportedAlgorithm> for Error {
    fn from(err: UnsupportedAlgorithm) -> Self {
        Error::UnsupportedAlgorithm(err)
    }
}

impl From<DecodeError<Infallible>> for Error {
    fn from(err: DecodeError<Infallible>) -> Self {
        Error::MalformedInput(err.into())
    }
}

impl From<ContentError> for Error {
    fn from(err: ContentError) -> Self {
        Error::MalformedInput(err.into())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::MalformedInput(ref inner) => {
                write!(f, "malformed input: {}", inner)
            }
            Error::UnsupportedAlgorithm(ref inner) => inner.fmt(f),
        }
    }
}

impl error::Error for Error { }
