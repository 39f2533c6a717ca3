//! Trust anchors.

use std::slice;
use crate::cert::Cert;
use crate::error::MalformedInput;
use crate::util::base64::Pem;


//------------ TrustAnchorSet ------------------------------------------------

/// The set of certificates trusted unconditionally.
///
/// The set is immutable once created. It can be shared between concurrent
/// validations by wrapping it in an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct TrustAnchorSet {
    anchors: Vec<Cert>,
}

impl TrustAnchorSet {
    /// Creates a new set from certificates.
    pub fn new(anchors: impl IntoIterator<Item = Cert>) -> Self {
        TrustAnchorSet { anchors: anchors.into_iter().collect() }
    }

    /// Creates a new set from DER encoded certificates.
    pub fn from_der<'a>(
        anchors: impl IntoIterator<Item = &'a [u8]>
    ) -> Result<Self, MalformedInput> {
        anchors.into_iter().map(|der| {
            Cert::decode(der).map_err(MalformedInput::from)
        }).collect::<Result<Vec<_>, _>>().map(Self::new)
    }

    /// Creates a new set from all the PEM certificates in a text.
    ///
    /// Any text outside of `CERTIFICATE` blocks is ignored.
    pub fn from_pem(text: &str) -> Result<Self, MalformedInput> {
        let blocks = Pem("CERTIFICATE").decode_all(text).map_err(|err| {
            MalformedInput::new(format!("invalid PEM: {}", err))
        })?;
        Self::from_der(blocks.iter().map(Vec::as_slice))
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Cert> {
        self.anchors.iter()
    }

    /// Returns whether the set contains the given certificate.
    ///
    /// Certificates are considered the same if they have the same subject
    /// and public key.
    pub fn contains(&self, cert: &Cert) -> bool {
        self.anchors.iter().any(|anchor| {
            anchor.has_same_key_and_subject(cert)
        })
    }

    /// Returns the anchors that may have issued the given certificate.
    ///
    /// This only compares names and key identifiers. The signature still
    /// needs to be checked.
    pub fn issuers_of<'a>(
        &'a self, cert: &'a Cert
    ) -> impl Iterator<Item = &'a Cert> + 'a {
        self.anchors.iter().filter(move |anchor| cert.is_issued_by(anchor))
    }
}


//--- IntoIterator

impl<'a> IntoIterator for &'a TrustAnchorSet {
    type Item = &'a Cert;
    type IntoIter = slice::Iter<'a, Cert>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


//============ Tests =========================================================
