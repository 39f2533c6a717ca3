//! Building certification paths.
//!
//! A path starts at the certificate to be validated and follows the
//! issuers until it reaches a trust anchor. How far it has to go depends
//! on the [`ChainMode`]. Every link is checked on the way: the signature
//! has to verify with the issuer’s key and issuing CAs that aren’t trust
//! anchors need to be valid CA certificates.
//!
//! Paths are built greedily. The first issuer whose signature verifies is
//! taken and there is no backtracking if the path dead-ends later on.

use std::{error, fmt};
use bcder::Oid;
use bytes::Bytes;
use log::debug;
use crate::cert::{Cert, CertSummary};
use crate::x509::Time;
use super::anchor::TrustAnchorSet;
use super::policy::ChainMode;


//------------ CertPath ------------------------------------------------------

/// A certification path from a certificate to a trust anchor.
///
/// The path contains at least the target certificate and the anchor. These
/// can be the same if the target is a self-signed anchor itself.
#[derive(Clone, Debug)]
pub struct CertPath<'a> {
    /// The certificates starting with the target and ending in the anchor.
    certs: Vec<&'a Cert>,
}

impl<'a> CertPath<'a> {
    /// The maximum number of certificates in a path.
    pub const MAX_LEN: usize = 8;

    /// Builds a path for `target`.
    ///
    /// Intermediate CA certificates are taken from `intermediates`, which
    /// usually are the certificates included in a message, and `anchors`.
    /// The target itself is only checked for unsupported critical
    /// extensions. Its validity needs to be checked separately.
    pub fn build(
        target: &'a Cert,
        intermediates: &'a [Cert],
        anchors: &'a TrustAnchorSet,
        mode: ChainMode,
        now: Time,
    ) -> Result<Self, PathError> {
        if let Some(oid) = target.unsupported_critical_extension() {
            return Err(PathError::new(
                target, PathFailure::UnsupportedCriticalExtension(oid.clone())
            ))
        }
        let mut certs = vec![target];
        loop {
            let current = certs[certs.len() - 1];
            if certs.len() >= Self::MAX_LEN {
                return Err(PathError::new(current, PathFailure::TooLong))
            }

            match find_issuer(current, anchors.iter())? {
                Some(anchor) => {
                    debug!(
                        "Found trust anchor '{}' for '{}'.",
                        anchor.subject(), current.subject()
                    );
                    if mode == ChainMode::IssuerAnchor {
                        certs.push(anchor);
                        return Ok(CertPath { certs })
                    }
                    if anchor.is_self_signed() {
                        if !anchor.has_same_key_and_subject(current) {
                            certs.push(anchor);
                        }
                        return Ok(CertPath { certs })
                    }
                    // A non-root anchor is just another intermediate CA.
                    check_ca(anchor, certs.len() - 1, now)?;
                    certs.push(anchor);
                    continue;
                }
                None if mode == ChainMode::IssuerAnchor => {
                    return Err(
                        PathError::new(current, PathFailure::NoTrustedIssuer)
                    )
                }
                None => { }
            }

            let candidates = intermediates.iter().filter(|cert| {
                !certs.iter().any(|item| item.subject() == cert.subject())
            });
            match find_issuer(current, candidates)? {
                Some(issuer) => {
                    debug!(
                        "Found intermediate CA '{}' for '{}'.",
                        issuer.subject(), current.subject()
                    );
                    check_ca(issuer, certs.len() - 1, now)?;
                    certs.push(issuer);
                }
                None => {
                    return Err(
                        PathError::new(current, PathFailure::NoTrustedIssuer)
                    )
                }
            }
        }
    }

    /// Returns the target certificate.
    pub fn target(&self) -> &'a Cert {
        self.certs[0]
    }

    /// Returns the trust anchor the path ends in.
    pub fn anchor(&self) -> &'a Cert {
        self.certs[self.certs.len() - 1]
    }

    /// Returns all certificates of the path, starting with the target.
    pub fn certs(&self) -> &[&'a Cert] {
        &self.certs
    }

    /// Returns the certificates that need a revocation check.
    ///
    /// These are all certificates except the anchor and self-signed
    /// certificates, each paired with its issuer.
    pub fn revocation_links(
        &self
    ) -> impl Iterator<Item = (&'a Cert, &'a Cert)> + '_ {
        self.certs.windows(2).filter_map(|pair| {
            if pair[0].is_self_signed() {
                None
            }
            else {
                Some((pair[0], pair[1]))
            }
        })
    }
}


//------------ Helper Functions ----------------------------------------------

/// Finds the certificate among `candidates` that issued `cert`.
///
/// Returns an error if there were candidates with the right name but none
/// of them had produced the signature.
fn find_issuer<'a>(
    cert: &Cert,
    candidates: impl Iterator<Item = &'a Cert>,
) -> Result<Option<&'a Cert>, PathError> {
    let mut bad_signature = false;
    for candidate in candidates {
        if !cert.is_issued_by(candidate) {
            continue
        }
        if cert.verify_signature(candidate.public_key()).is_ok() {
            return Ok(Some(candidate))
        }
        debug!(
            "Signature of '{}' doesn’t verify with key of '{}'.",
            cert.subject(), candidate.subject()
        );
        bad_signature = true;
    }
    if bad_signature {
        Err(PathError::new(cert, PathFailure::BadSignature))
    }
    else {
        Ok(None)
    }
}

/// Checks that a certificate can act as an intermediate CA.
///
/// The `depth` is the number of intermediate CA certificates between the
/// target certificate and this one.
fn check_ca(cert: &Cert, depth: usize, now: Time) -> Result<(), PathError> {
    if !cert.is_ca() {
        return Err(PathError::new(cert, PathFailure::NotCa))
    }
    if !cert.may_sign_certs() {
        return Err(PathError::new(cert, PathFailure::KeyUsage))
    }
    if let Some(path_len) = cert.path_len() {
        if depth as u64 > path_len {
            return Err(PathError::new(cert, PathFailure::PathLength))
        }
    }
    if let Err(err) = cert.validity().verify_at(now) {
        let failure = if err.is_expired() {
            PathFailure::Expired
        }
        else {
            PathFailure::NotYetValid
        };
        return Err(PathError::new(cert, failure))
    }
    if let Some(oid) = cert.unsupported_critical_extension() {
        return Err(PathError::new(
            cert, PathFailure::UnsupportedCriticalExtension(oid.clone())
        ))
    }
    Ok(())
}


//------------ PathError -----------------------------------------------------

/// No valid path could be built.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathError {
    /// The certificate at which path building failed.
    cert: CertSummary,

    /// What went wrong.
    reason: PathFailure,
}

impl PathError {
    fn new(cert: &Cert, reason: PathFailure) -> Self {
        PathError { cert: cert.summary(), reason }
    }

    pub fn cert(&self) -> &CertSummary {
        &self.cert
    }

    pub fn reason(&self) -> &PathFailure {
        &self.reason
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.cert)
    }
}

impl error::Error for PathError { }


//------------ PathFailure ---------------------------------------------------

/// The reason why building a path failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PathFailure {
    /// No trusted issuer was found.
    NoTrustedIssuer,

    /// The signature didn’t verify with the issuer’s key.
    BadSignature,

    /// An issuing certificate is not a CA certificate.
    NotCa,

    /// An issuing certificate’s key usage doesn’t allow signing certs.
    KeyUsage,

    /// The path length constraint was violated.
    PathLength,

    /// An intermediate CA certificate has expired.
    Expired,

    /// An intermediate CA certificate is not yet valid.
    NotYetValid,

    /// The certificate has an unsupported critical extension.
    UnsupportedCriticalExtension(Oid<Bytes>),

    /// The path exceeds the maximum length.
    TooLong,
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PathFailure::NoTrustedIssuer => f.write_str("no trusted issuer"),
            PathFailure::BadSignature => f.write_str("invalid signature"),
            PathFailure::NotCa => f.write_str("issuer is not a CA"),
            PathFailure::KeyUsage => {
                f.write_str("issuer not allowed to sign certificates")
            }
            PathFailure::PathLength => {
                f.write_str("path length constraint violated")
            }
            PathFailure::Expired => f.write_str("CA certificate expired"),
            PathFailure::NotYetValid => {
                f.write_str("CA certificate not yet valid")
            }
            PathFailure::UnsupportedCriticalExtension(ref oid) => {
                write!(f, "unsupported critical extension {}", oid)
            }
            PathFailure::TooLong => f.write_str("path too long"),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn cert(der: &[u8]) -> Cert {
        Cert::decode(der).unwrap()
    }

    fn root() -> Cert {
        cert(include_bytes!("../../test-data/root-ca.der"))
    }

    fn issuing() -> Cert {
        cert(include_bytes!("../../test-data/issuing-ca.der"))
    }

    fn unrelated() -> Cert {
        cert(include_bytes!("../../test-data/unrelated-ca.der"))
    }

    fn signer() -> Cert {
        cert(include_bytes!("../../test-data/signer-current.der"))
    }

    fn now() -> Time {
        Time::utc(2024, 6, 2, 0, 0, 0)
    }

    #[test]
    fn issuer_anchor() {
        let signer = signer();
        let anchors = TrustAnchorSet::new([issuing()]);
        let path = CertPath::build(
            &signer, &[], &anchors, ChainMode::IssuerAnchor, now()
        ).unwrap();
        assert_eq!(path.certs().len(), 2);
        assert_eq!(path.anchor().subject(), issuing().subject());
        let links: Vec<_> = path.revocation_links().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0.serial_number(), signer.serial_number());
    }

    #[test]
    fn issuer_anchor_requires_direct_issuer() {
        let signer = signer();
        let envelope = [issuing()];
        let anchors = TrustAnchorSet::new([root()]);
        let err = CertPath::build(
            &signer, &envelope, &anchors, ChainMode::IssuerAnchor, now()
        ).unwrap_err();
        assert_eq!(err.reason(), &PathFailure::NoTrustedIssuer);
        assert_eq!(err.cert().serial, *signer.serial_number());
    }

    #[test]
    fn full_chain() {
        let signer = signer();
        let envelope = [signer.clone(), issuing()];
        let anchors = TrustAnchorSet::new([root()]);
        let path = CertPath::build(
            &signer, &envelope, &anchors, ChainMode::FullChain, now()
        ).unwrap();
        assert_eq!(path.certs().len(), 3);
        assert_eq!(path.anchor().subject(), root().subject());
        assert_eq!(path.revocation_links().count(), 2);

        // A non-root anchor doesn’t end the path.
        let anchors = TrustAnchorSet::new([issuing(), root()]);
        let path = CertPath::build(
            &signer, &[], &anchors, ChainMode::FullChain, now()
        ).unwrap();
        assert_eq!(path.certs().len(), 3);
    }

    #[test]
    fn full_chain_without_root() {
        let signer = signer();
        let envelope = [issuing()];
        let anchors = TrustAnchorSet::new([unrelated()]);
        let err = CertPath::build(
            &signer, &envelope, &anchors, ChainMode::FullChain, now()
        ).unwrap_err();
        assert_eq!(err.reason(), &PathFailure::NoTrustedIssuer);
        assert_eq!(err.cert().serial, *issuing().serial_number());
    }

    #[test]
    fn expired_intermediate() {
        let signer = signer();
        let envelope = [issuing()];
        let anchors = TrustAnchorSet::new([root()]);
        let err = CertPath::build(
            &signer, &envelope, &anchors, ChainMode::FullChain,
            Time::utc(2045, 1, 1, 0, 0, 0)
        ).unwrap_err();
        assert_eq!(err.reason(), &PathFailure::Expired);
    }

    #[test]
    fn root_not_anchored() {
        let issuing = issuing();
        let envelope = [signer(), root()];
        let anchors = TrustAnchorSet::new([unrelated()]);
        let err = CertPath::build(
            &issuing, &envelope, &anchors, ChainMode::FullChain, now()
        ).unwrap_err();
        assert_eq!(err.reason(), &PathFailure::NoTrustedIssuer);
        assert_eq!(err.cert().serial, *root().serial_number());
    }

    #[test]
    fn self_signed_anchor() {
        let root = root();
        let anchors = TrustAnchorSet::new([root.clone()]);
        let path = CertPath::build(
            &root, &[], &anchors, ChainMode::FullChain, now()
        ).unwrap();
        assert_eq!(path.certs().len(), 1);
        assert_eq!(path.revocation_links().count(), 0);
    }
}
