//! Establishing trust in signer certificates.
//!
//! A [`TrustValidator`] decides whether a certificate can be trusted based
//! on a set of trust anchors. It runs through three steps in order and
//! stops at the first one that fails:
//!
//! * the certificate has to be valid at the current time,
//! * a path from the certificate to a trust anchor has to exist, see
//!   [`CertPath`], and
//! * no certificate on that path may have been revoked, see
//!   [`RevocationChecker`].
//!
//! The outcome is a [`ValidationResult`]. Only the last step needs network
//! access which happens through a [`Fetcher`].

pub use self::anchor::TrustAnchorSet;
pub use self::fetch::{FetchError, Fetcher, HttpFetcher};
pub use self::path::{CertPath, PathError, PathFailure};
pub use self::policy::{ChainMode, RevocationPolicy, ValidationConfig};
pub use self::revocation::{
    FailureKind, Revocation, RevocationChecker, RevocationError,
    RevocationFailure, RevocationSource, RevocationStatus,
};

pub mod anchor;
pub mod fetch;
pub mod path;
pub mod policy;
pub mod revocation;

use std::fmt;
use std::sync::Arc;
use log::{debug, info};
use crate::cert::{Cert, CertSummary};
use crate::signer::SignatureFailure;
use crate::x509::Time;


//------------ TrustValidator ------------------------------------------------

/// Validates certificates against a set of trust anchors.
///
/// The validator itself holds no mutable state. It can be used for any
/// number of validations, concurrently if the fetcher allows it.
#[derive(Clone, Debug)]
pub struct TrustValidator<F = HttpFetcher> {
    anchors: Arc<TrustAnchorSet>,
    config: ValidationConfig,
    fetcher: F,
}

impl TrustValidator<HttpFetcher> {
    /// Creates a validator fetching revocation information via HTTP.
    pub fn new(
        anchors: Arc<TrustAnchorSet>, config: ValidationConfig
    ) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_policy(&config.revocation)?;
        Ok(Self::with_fetcher(anchors, config, fetcher))
    }
}

impl<F: Fetcher> TrustValidator<F> {
    /// Creates a validator using the given fetcher.
    pub fn with_fetcher(
        anchors: Arc<TrustAnchorSet>, config: ValidationConfig, fetcher: F
    ) -> Self {
        TrustValidator { anchors, config, fetcher }
    }

    pub fn anchors(&self) -> &TrustAnchorSet {
        &self.anchors
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates a certificate at the current time.
    ///
    /// The `envelope` certificates are used as intermediate CAs if the
    /// chain mode asks for a full chain.
    pub async fn validate(
        &self, cert: &Cert, envelope: &[Cert]
    ) -> ValidationResult {
        self.validate_at(cert, envelope, Time::now()).await
    }

    /// Validates a certificate at the given time.
    pub async fn validate_at(
        &self, cert: &Cert, envelope: &[Cert], now: Time
    ) -> ValidationResult {
        if let Err(err) = cert.validity().verify_at(now) {
            debug!("'{}' not valid at {}.", cert.subject(), now);
            return if err.is_expired() {
                ValidationResult::Expired {
                    cert: cert.summary(), not_after: cert.not_after()
                }
            }
            else {
                ValidationResult::NotYetValid {
                    cert: cert.summary(), not_before: cert.not_before()
                }
            }
        }

        let path = match CertPath::build(
            cert, envelope, &self.anchors, self.config.chain_mode, now
        ) {
            Ok(path) => path,
            Err(err) => {
                debug!("No path for '{}': {}", cert.subject(), err);
                return ValidationResult::PathInvalid(err)
            }
        };

        let policy = &self.config.revocation;
        if !policy.is_enabled() {
            info!(
                "Revocation checking disabled, skipping for '{}'.",
                cert.subject()
            );
            return ValidationResult::Valid
        }
        let checker = RevocationChecker::new(&self.fetcher, policy);
        for (cert, issuer) in path.revocation_links() {
            match checker.check(cert, issuer, now).await {
                Ok(RevocationStatus::Good(_)) => { }
                Ok(RevocationStatus::Revoked(revocation)) => {
                    return ValidationResult::Revoked {
                        cert: cert.summary(), revocation
                    }
                }
                Err(error) => {
                    return ValidationResult::RevocationCheckFailed {
                        cert: cert.summary(), error
                    }
                }
            }
        }
        ValidationResult::Valid
    }
}


//------------ ValidationResult ----------------------------------------------

/// The outcome of validating a signed message or certificate.
///
/// Each failure carries the certificate at fault and the details of what
/// went wrong.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationResult {
    /// All checks passed.
    Valid,

    /// The certificate has expired.
    Expired { cert: CertSummary, not_after: Time },

    /// The certificate is not yet valid.
    NotYetValid { cert: CertSummary, not_before: Time },

    /// No valid path to a trust anchor exists.
    PathInvalid(PathError),

    /// A certificate of the path has been revoked.
    Revoked { cert: CertSummary, revocation: Revocation },

    /// The revocation status of a certificate could not be determined.
    RevocationCheckFailed { cert: CertSummary, error: RevocationError },

    /// The signature over the content is invalid.
    SignatureInvalid(SignatureFailure),

    /// The signer’s identity could not be determined.
    MalformedInput(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(*self, ValidationResult::Valid)
    }

    /// Returns the step that failed, if any.
    pub fn failed_step(&self) -> Option<ValidationStep> {
        match *self {
            ValidationResult::Valid => None,
            ValidationResult::Expired { .. }
            | ValidationResult::NotYetValid { .. } => {
                Some(ValidationStep::TimeCheck)
            }
            ValidationResult::PathInvalid(_) => {
                Some(ValidationStep::PathBuild)
            }
            ValidationResult::Revoked { .. }
            | ValidationResult::RevocationCheckFailed { .. } => {
                Some(ValidationStep::RevocationCheck)
            }
            ValidationResult::SignatureInvalid(_) => {
                Some(ValidationStep::Signature)
            }
            ValidationResult::MalformedInput(_) => {
                Some(ValidationStep::Identity)
            }
        }
    }

    /// Returns the certificate the result is about, if any.
    pub fn cert(&self) -> Option<&CertSummary> {
        match *self {
            ValidationResult::Expired { ref cert, .. }
            | ValidationResult::NotYetValid { ref cert, .. }
            | ValidationResult::Revoked { ref cert, .. }
            | ValidationResult::RevocationCheckFailed { ref cert, .. } => {
                Some(cert)
            }
            ValidationResult::PathInvalid(ref err) => Some(err.cert()),
            _ => None
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidationResult::Valid => f.write_str("valid"),
            ValidationResult::Expired { ref cert, not_after } => {
                write!(f, "expired at {}: {}", not_after, cert)
            }
            ValidationResult::NotYetValid { ref cert, not_before } => {
                write!(f, "not valid before {}: {}", not_before, cert)
            }
            ValidationResult::PathInvalid(ref err) => {
                write!(f, "path invalid: {}", err)
            }
            ValidationResult::Revoked { ref cert, ref revocation } => {
                write!(f, "{}: {}", revocation, cert)
            }
            ValidationResult::RevocationCheckFailed {
                ref cert, ref error
            } => {
                write!(f, "revocation check failed for {}: {}", cert, error)
            }
            ValidationResult::SignatureInvalid(reason) => {
                write!(f, "signature invalid: {}", reason)
            }
            ValidationResult::MalformedInput(ref err) => {
                write!(f, "malformed input: {}", err)
            }
        }
    }
}


//------------ ValidationStep ------------------------------------------------

/// The step of validation that failed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValidationStep {
    Signature,
    Identity,
    TimeCheck,
    PathBuild,
    RevocationCheck,
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use self::revocation::test::{
        MockFetcher, ISSUING_CRL_URI, OCSP_URI, ROOT_CRL_URI
    };

    fn cert(der: &[u8]) -> Cert {
        Cert::decode(der).unwrap()
    }

    fn root() -> Cert {
        cert(include_bytes!("../../test-data/root-ca.der"))
    }

    fn issuing() -> Cert {
        cert(include_bytes!("../../test-data/issuing-ca.der"))
    }

    fn signer() -> Cert {
        cert(include_bytes!("../../test-data/signer-current.der"))
    }

    fn now() -> Time {
        Time::utc(2024, 6, 2, 0, 0, 0)
    }

    fn validator(
        anchors: Vec<Cert>, mode: ChainMode, fetcher: MockFetcher
    ) -> TrustValidator<MockFetcher> {
        TrustValidator::with_fetcher(
            Arc::new(TrustAnchorSet::new(anchors)),
            ValidationConfig::default().with_chain_mode(mode),
            fetcher
        )
    }

    fn good_fetcher() -> MockFetcher {
        MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-good.der")
        ).with(
            ISSUING_CRL_URI, include_bytes!("../../test-data/issuing.crl")
        ).with(
            ROOT_CRL_URI, include_bytes!("../../test-data/root.crl")
        )
    }

    #[tokio::test]
    async fn valid_issuer_anchor() {
        let validator = validator(
            vec![issuing()], ChainMode::IssuerAnchor, good_fetcher()
        );
        let res = validator.validate_at(&signer(), &[], now()).await;
        assert_eq!(res, ValidationResult::Valid);
        assert_eq!(res.failed_step(), None);
    }

    #[tokio::test]
    async fn valid_full_chain() {
        let validator = validator(
            vec![root()], ChainMode::FullChain, good_fetcher()
        );
        let envelope = [signer(), issuing()];
        assert_eq!(
            validator.validate_at(&signer(), &envelope, now()).await,
            ValidationResult::Valid
        );
        assert_eq!(
            validator.fetcher.requests(), [OCSP_URI, ROOT_CRL_URI]
        );
    }

    #[tokio::test]
    async fn time_check_comes_first() {
        // No anchors and no fetcher responses: only the time matters.
        let validator = validator(
            vec![], ChainMode::IssuerAnchor, MockFetcher::default()
        );
        let res = validator.validate_at(
            &signer(), &[], Time::utc(2050, 1, 1, 0, 0, 0)
        ).await;
        assert_eq!(
            res,
            ValidationResult::Expired {
                cert: signer().summary(),
                not_after: Time::utc(2049, 12, 31, 0, 0, 0),
            }
        );
        assert_eq!(res.failed_step(), Some(ValidationStep::TimeCheck));

        let res = validator.validate_at(
            &signer(), &[], Time::utc(2019, 1, 1, 0, 0, 0)
        ).await;
        assert!(matches!(res, ValidationResult::NotYetValid { .. }));
        assert!(validator.fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn path_invalid() {
        let validator = validator(
            vec![root()], ChainMode::IssuerAnchor, good_fetcher()
        );
        let res = validator.validate_at(
            &signer(), &[issuing()], now()
        ).await;
        assert_eq!(res.failed_step(), Some(ValidationStep::PathBuild));
        assert_eq!(res.cert(), Some(&signer().summary()));
        assert!(validator.fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn revoked_intermediate() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-good.der")
        ).with(
            ROOT_CRL_URI, include_bytes!("../../test-data/root-revoked.crl")
        );
        let validator = validator(vec![root()], ChainMode::FullChain, fetcher);
        let res = validator.validate_at(
            &signer(), &[issuing()], now()
        ).await;
        assert_eq!(
            res,
            ValidationResult::Revoked {
                cert: issuing().summary(),
                revocation: Revocation {
                    source: RevocationSource::Crl,
                    time: Time::utc(2024, 3, 1, 0, 0, 0),
                    reason: None,
                }
            }
        );
    }

    #[tokio::test]
    async fn revocation_check_failed() {
        let validator = validator(
            vec![issuing()], ChainMode::IssuerAnchor, MockFetcher::default()
        );
        let res = validator.validate_at(&signer(), &[], now()).await;
        match res {
            ValidationResult::RevocationCheckFailed { ref error, .. } => {
                assert_eq!(error.failures().len(), 2);
            }
            _ => panic!("unexpected result {:?}", res)
        }
        assert_eq!(res.failed_step(), Some(ValidationStep::RevocationCheck));
    }

    #[tokio::test]
    async fn revocation_disabled() {
        let validator = TrustValidator::with_fetcher(
            Arc::new(TrustAnchorSet::new([issuing()])),
            ValidationConfig::default().with_revocation(
                RevocationPolicy::default()
                    .with_ocsp(false)
                    .with_crl_distribution_points(false)
            ),
            MockFetcher::default()
        );
        assert!(
            validator.validate_at(&signer(), &[], now()).await.is_valid()
        );
        assert!(validator.fetcher.requests().is_empty());
    }
}
