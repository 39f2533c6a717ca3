//! URIs.
//!
//! Certificates reference OCSP responders, CRLs and issuer certificates via
//! URIs. Only HTTP and HTTPS URIs are fetched, all other schemes such as
//! `ldap` are recognized as such and skipped.

use std::{error, fmt, str};
use bytes::{Buf, Bytes};


//------------ Http ----------------------------------------------------------

/// A simple HTTP(s) URI.
///
/// This supports only what we need for the references in certificates. In
/// particular, this does not support the fragment component of URIs. The
/// authority may contain a port and the path may be followed by a query.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Http {
    scheme: Scheme,
    authority: Bytes,

    /// The path including the query if there is one.
    path: Bytes,
}

impl Http {
    pub fn from_string(s: String) -> Result<Self, Error> {
        Self::from_bytes(Bytes::from(s))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(Bytes::copy_from_slice(slice))
    }

    pub fn from_bytes(mut bytes: Bytes) -> Result<Self, Error> {
        if !is_uri_ascii(&bytes) {
            return Err(Error::NotAscii)
        }
        let scheme = Scheme::take(&mut bytes)?;
        let authority_len = bytes.iter().position(|&ch| {
            ch == b'/' || ch == b'?'
        }).unwrap_or(bytes.len());
        if authority_len == 0 {
            return Err(Error::BadUri)
        }
        let authority = bytes.split_to(authority_len);
        let path = if bytes.is_empty() {
            Bytes::from_static(b"/")
        }
        else if bytes[0] == b'?' {
            Bytes::from([&b"/"[..], &bytes[..]].concat())
        }
        else {
            bytes
        };
        Ok(Http { scheme, authority, path })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the authority part, i.e., the host and an optional port.
    pub fn authority(&self) -> &str {
        // We checked for ASCII during construction.
        str::from_utf8(self.authority.as_ref()).unwrap_or_default()
    }

    /// Returns the host part of the authority.
    pub fn host(&self) -> &str {
        let authority = self.authority();
        if authority.starts_with('[') {
            return match authority.find(']') {
                Some(end) => &authority[..=end],
                None => authority,
            }
        }
        match authority.rfind(':') {
            Some(idx) => &authority[..idx],
            None => authority,
        }
    }

    /// Returns the path without the query.
    pub fn path(&self) -> &str {
        let path = self.path_and_query();
        match path.find('?') {
            Some(idx) => &path[..idx],
            None => path,
        }
    }

    /// Returns the query without the leading question mark.
    pub fn query(&self) -> Option<&str> {
        let path = self.path_and_query();
        path.find('?').map(|idx| &path[idx + 1..])
    }

    pub fn path_and_query(&self) -> &str {
        str::from_utf8(self.path.as_ref()).unwrap_or_default()
    }

    pub fn as_string(&self) -> String {
        format!("{}", self)
    }
}


//--- FromStr

impl str::FromStr for Http {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Http::from_str(s)
    }
}


//--- Display

impl fmt::Display for Http {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{}{}{}", self.scheme, self.authority(), self.path_and_query()
        )
    }
}


//------------ Scheme --------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    fn take_if_matches(bytes: &mut Bytes, s: &str) -> bool {
        let l = s.len();
        if bytes.len() > l && bytes[..l].eq_ignore_ascii_case(s.as_ref()) {
            bytes.advance(l);
            return true
        }
        false
    }

    fn take(bytes: &mut Bytes) -> Result<Scheme, Error> {
        if Scheme::take_if_matches(bytes, "https://") {
            return Ok(Scheme::Https)
        }
        if Scheme::take_if_matches(bytes, "http://") {
            return Ok(Scheme::Http)
        }
        Err(Error::BadScheme)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Scheme::Http => "http://",
            Scheme::Https => "https://",
        })
    }
}


//------------ Helper Functions ----------------------------------------------

pub fn is_uri_ascii<S: AsRef<[u8]>>(slice: S) -> bool {
    slice.as_ref().iter().all(|&ch| {
        ch > b' ' && ch != b'"' && ch != b'#' && ch != b'<' && ch != b'>'
            && ch != b'\\' && ch != b'^' && ch != b'`'
            && ch != b'{' && ch != b'|' && ch != b'}' && ch < 0x7F
    })
}


//------------ Error ---------------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    NotAscii,
    BadUri,
    BadScheme,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            Error::NotAscii => "invalid characters",
            Error::BadUri => "bad URI",
            Error::BadScheme => "bad URI scheme",
        })
    }
}

impl error::Error for Error { }


//============ Tests =========================================================
