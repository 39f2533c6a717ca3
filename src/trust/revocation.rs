//! Checking the revocation status of certificates.
//!
//! The status of a certificate is determined by asking the OCSP responders
//! listed in the certificate’s authority information access extension. If
//! none of them provides a definite answer, the CRLs listed in the CRL
//! distribution points extension are consulted. If this fails, too, the
//! status is considered unknown and the certificate is rejected.

use std::{error, fmt};
use std::future::Future;
use bytes::Bytes;
use log::{debug, warn};
use crate::cert::Cert;
use crate::crl::{Crl, CrlError};
use crate::ocsp::{CertId, CertStatus, OcspError, OcspResponse};
use crate::uri;
use crate::x509::Time;
use super::fetch::{FetchError, Fetcher};
use super::policy::RevocationPolicy;


//------------ RevocationChecker ---------------------------------------------

/// Determines the revocation status of certificates.
#[derive(Clone, Copy, Debug)]
pub struct RevocationChecker<'a, F> {
    fetcher: &'a F,
    policy: &'a RevocationPolicy,
}

impl<'a, F: Fetcher> RevocationChecker<'a, F> {
    pub fn new(fetcher: &'a F, policy: &'a RevocationPolicy) -> Self {
        RevocationChecker { fetcher, policy }
    }

    /// Checks the status of `cert` issued by `issuer`.
    ///
    /// Returns an error if the status could not be determined by any
    /// means.
    pub async fn check(
        &self, cert: &Cert, issuer: &Cert, now: Time
    ) -> Result<RevocationStatus, RevocationError> {
        let mut failures = Vec::new();

        if self.policy.ocsp {
            let cert_id = CertId::new(cert, issuer);
            for uri in cert.ocsp_uris() {
                match self.check_ocsp(uri, &cert_id, issuer, now).await {
                    Ok(CertStatus::Good) => {
                        debug!("OCSP: '{}' is good.", cert.subject());
                        return Ok(RevocationStatus::Good(
                            RevocationSource::Ocsp
                        ))
                    }
                    Ok(CertStatus::Revoked { time, reason }) => {
                        debug!("OCSP: '{}' is revoked.", cert.subject());
                        return Ok(RevocationStatus::Revoked(Revocation {
                            source: RevocationSource::Ocsp,
                            time,
                            reason,
                        }))
                    }
                    Ok(CertStatus::Unknown) => {
                        failures.push(RevocationFailure::new(
                            uri, FailureKind::UnknownCert
                        ));
                    }
                    Err(kind) => {
                        failures.push(RevocationFailure::new(uri, kind));
                    }
                }
            }
        }

        if self.policy.crl_distribution_points {
            for uri in cert.crl_uris() {
                match self.check_crl(uri, cert, issuer, now).await {
                    Ok(status) => {
                        debug!(
                            "CRL: '{}' is {}.",
                            cert.subject(),
                            if status.is_revoked() {
                                "revoked"
                            }
                            else {
                                "good"
                            }
                        );
                        return Ok(status)
                    }
                    Err(kind) => {
                        failures.push(RevocationFailure::new(uri, kind));
                    }
                }
            }
        }

        for failure in &failures {
            warn!("Revocation check for '{}': {}", cert.subject(), failure);
        }
        if failures.is_empty() {
            warn!(
                "No usable revocation source for '{}'.", cert.subject()
            );
        }
        Err(RevocationError { failures })
    }

    async fn check_ocsp(
        &self,
        uri: &uri::Http,
        cert_id: &CertId,
        issuer: &Cert,
        now: Time,
    ) -> Result<CertStatus, FailureKind> {
        let request = cert_id.encode_request();
        let bytes = self.fetch(
            self.fetcher.post_ocsp(uri, request)
        ).await?;
        let response = OcspResponse::decode(bytes.as_ref()).map_err(|err| {
            FailureKind::Malformed(err.to_string())
        })?;
        response.verify(
            cert_id, issuer, now, self.policy.skew(), self.policy.ocsp_age()
        ).map_err(FailureKind::Ocsp)
    }

    async fn check_crl(
        &self,
        uri: &uri::Http,
        cert: &Cert,
        issuer: &Cert,
        now: Time,
    ) -> Result<RevocationStatus, FailureKind> {
        let bytes = self.fetch(self.fetcher.get_crl(uri)).await?;
        let crl = Crl::decode(bytes.as_ref()).map_err(|err| {
            FailureKind::Malformed(err.to_string())
        })?;
        crl.verify(
            issuer, now, self.policy.skew()
        ).map_err(FailureKind::Crl)?;
        match crl.find(cert.serial_number()) {
            Some(entry) => Ok(RevocationStatus::Revoked(Revocation {
                source: RevocationSource::Crl,
                time: entry.revocation_date(),
                reason: entry.reason(),
            })),
            None => Ok(RevocationStatus::Good(RevocationSource::Crl))
        }
    }

    /// Runs a fetch operation, enforcing the timeout and size limit.
    async fn fetch(
        &self, fut: impl Future<Output = Result<Bytes, FetchError>>
    ) -> Result<Bytes, FailureKind> {
        let bytes = tokio::time::timeout(
            self.policy.timeout, fut
        ).await.map_err(|_| {
            FailureKind::Fetch(FetchError::Timeout)
        })?.map_err(FailureKind::Fetch)?;
        if bytes.len() > self.policy.max_response_size {
            return Err(FailureKind::Fetch(
                FetchError::TooLarge(self.policy.max_response_size)
            ))
        }
        Ok(bytes)
    }
}


//------------ RevocationStatus ----------------------------------------------

/// The definite revocation status of a certificate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RevocationStatus {
    /// The certificate is not revoked.
    Good(RevocationSource),

    /// The certificate has been revoked.
    Revoked(Revocation),
}

impl RevocationStatus {
    pub fn is_revoked(self) -> bool {
        matches!(self, RevocationStatus::Revoked(_))
    }
}


//------------ Revocation ----------------------------------------------------

/// Information about the revocation of a certificate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Revocation {
    /// Where the information came from.
    pub source: RevocationSource,

    /// The time of revocation.
    pub time: Time,

    /// The CRLReason code if given.
    pub reason: Option<u8>,
}

impl fmt::Display for Revocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "revoked at {} according to {}", self.time, self.source)?;
        if let Some(reason) = self.reason {
            write!(f, " (reason {})", reason)?;
        }
        Ok(())
    }
}


//------------ RevocationSource ----------------------------------------------

/// The mechanism that provided revocation information.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RevocationSource {
    Ocsp,
    Crl,
}

impl fmt::Display for RevocationSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            RevocationSource::Ocsp => "OCSP",
            RevocationSource::Crl => "CRL",
        })
    }
}


//------------ RevocationError -----------------------------------------------

/// The revocation status could not be determined.
///
/// Contains all the attempts that failed. If there are none, the
/// certificate didn’t list any source usable under the policy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevocationError {
    failures: Vec<RevocationFailure>,
}

impl RevocationError {
    pub fn failures(&self) -> &[RevocationFailure] {
        &self.failures
    }
}

impl fmt::Display for RevocationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("no revocation information available")
        }
        for (idx, failure) in self.failures.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            failure.fmt(f)?;
        }
        Ok(())
    }
}

impl error::Error for RevocationError { }


//------------ RevocationFailure ---------------------------------------------

/// A single failed attempt at determining revocation status.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevocationFailure {
    uri: uri::Http,
    kind: FailureKind,
}

impl RevocationFailure {
    fn new(uri: &uri::Http, kind: FailureKind) -> Self {
        RevocationFailure { uri: uri.clone(), kind }
    }

    pub fn uri(&self) -> &uri::Http {
        &self.uri
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }
}

impl fmt::Display for RevocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.uri, self.kind)
    }
}


//------------ FailureKind ---------------------------------------------------

/// What went wrong when trying a revocation source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FailureKind {
    /// The information could not be retrieved.
    Fetch(FetchError),

    /// The retrieved data could not be parsed.
    Malformed(String),

    /// The OCSP response could not be used.
    Ocsp(OcspError),

    /// The CRL could not be used.
    Crl(CrlError),

    /// The OCSP responder doesn’t know the certificate.
    UnknownCert,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FailureKind::Fetch(ref err) => err.fmt(f),
            FailureKind::Malformed(ref err) => {
                write!(f, "malformed response: {}", err)
            }
            FailureKind::Ocsp(ref err) => err.fmt(f),
            FailureKind::Crl(ref err) => err.fmt(f),
            FailureKind::UnknownCert => {
                f.write_str("certificate unknown to OCSP responder")
            }
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
pub(crate) mod test {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use super::*;

    /// A fetcher serving canned responses.
    #[derive(Debug, Default)]
    pub struct MockFetcher {
        responses: HashMap<String, Result<Bytes, FetchError>>,
        requests: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl MockFetcher {
        pub fn with(mut self, uri: &str, data: &'static [u8]) -> Self {
            self.responses.insert(uri.into(), Ok(Bytes::from_static(data)));
            self
        }

        pub fn with_err(mut self, uri: &str, err: FetchError) -> Self {
            self.responses.insert(uri.into(), Err(err));
            self
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        async fn get(&self, uri: &uri::Http) -> Result<Bytes, FetchError> {
            let uri = uri.as_string();
            self.requests.lock().unwrap().push(uri.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses.get(&uri).cloned().unwrap_or(
                Err(FetchError::Status(404))
            )
        }
    }

    impl Fetcher for MockFetcher {
        async fn post_ocsp(
            &self, uri: &uri::Http, _request: Bytes
        ) -> Result<Bytes, FetchError> {
            self.get(uri).await
        }

        async fn get_crl(
            &self, uri: &uri::Http
        ) -> Result<Bytes, FetchError> {
            self.get(uri).await
        }
    }

    pub const OCSP_URI: &str = "http://ocsp.example.test/";
    pub const ISSUING_CRL_URI: &str = "http://crl.example.test/issuing.crl";
    pub const ROOT_CRL_URI: &str = "http://crl.example.test/root.crl";

    fn signer() -> Cert {
        Cert::decode(
            include_bytes!("../../test-data/signer-current.der").as_ref()
        ).unwrap()
    }

    fn issuer() -> Cert {
        Cert::decode(
            include_bytes!("../../test-data/issuing-ca.der").as_ref()
        ).unwrap()
    }

    fn now() -> Time {
        Time::utc(2024, 6, 2, 0, 0, 0)
    }

    async fn check(
        fetcher: &MockFetcher, policy: &RevocationPolicy
    ) -> Result<RevocationStatus, RevocationError> {
        RevocationChecker::new(fetcher, policy).check(
            &signer(), &issuer(), now()
        ).await
    }

    #[tokio::test]
    async fn ocsp_good() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-good.der")
        );
        assert_eq!(
            check(&fetcher, &RevocationPolicy::default()).await.unwrap(),
            RevocationStatus::Good(RevocationSource::Ocsp)
        );
        assert_eq!(fetcher.requests(), [OCSP_URI]);
    }

    #[tokio::test]
    async fn ocsp_revoked() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-revoked.der")
        ).with(
            ISSUING_CRL_URI, include_bytes!("../../test-data/issuing.crl")
        );
        assert_eq!(
            check(&fetcher, &RevocationPolicy::default()).await.unwrap(),
            RevocationStatus::Revoked(Revocation {
                source: RevocationSource::Ocsp,
                time: Time::utc(2024, 5, 1, 12, 0, 0),
                reason: None,
            })
        );
        assert_eq!(fetcher.requests(), [OCSP_URI]);
    }

    #[tokio::test]
    async fn crl_fallback() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-unknown.der")
        ).with(
            ISSUING_CRL_URI,
            include_bytes!("../../test-data/issuing-revoked.crl")
        );
        assert_eq!(
            check(&fetcher, &RevocationPolicy::default()).await.unwrap(),
            RevocationStatus::Revoked(Revocation {
                source: RevocationSource::Crl,
                time: Time::utc(2024, 4, 1, 8, 0, 0),
                reason: None,
            })
        );
        assert_eq!(fetcher.requests(), [OCSP_URI, ISSUING_CRL_URI]);

        let fetcher = MockFetcher::default().with_err(
            OCSP_URI, FetchError::Status(500)
        ).with(
            ISSUING_CRL_URI, include_bytes!("../../test-data/issuing.crl")
        );
        assert_eq!(
            check(&fetcher, &RevocationPolicy::default()).await.unwrap(),
            RevocationStatus::Good(RevocationSource::Crl)
        );
    }

    #[tokio::test]
    async fn ocsp_disabled() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-good.der")
        ).with(
            ISSUING_CRL_URI, include_bytes!("../../test-data/issuing.crl")
        );
        let policy = RevocationPolicy::default().with_ocsp(false);
        assert_eq!(
            check(&fetcher, &policy).await.unwrap(),
            RevocationStatus::Good(RevocationSource::Crl)
        );
        assert_eq!(fetcher.requests(), [ISSUING_CRL_URI]);
    }

    #[tokio::test]
    async fn fail_closed() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-stale.der")
        ).with(
            ISSUING_CRL_URI,
            include_bytes!("../../test-data/issuing-forged.crl")
        );
        let err = check(
            &fetcher, &RevocationPolicy::default()
        ).await.unwrap_err();
        assert_eq!(err.failures().len(), 2);
        assert_eq!(
            err.failures()[0].kind(), &FailureKind::Ocsp(OcspError::Stale)
        );
        assert!(matches!(
            err.failures()[1].kind(),
            FailureKind::Crl(CrlError::BadSignature(_))
        ));

        let fetcher = MockFetcher::default().with(
            OCSP_URI, b"garbage"
        );
        let policy = RevocationPolicy::default().with_crl_distribution_points(
            false
        );
        let err = check(&fetcher, &policy).await.unwrap_err();
        assert!(matches!(
            err.failures()[0].kind(), FailureKind::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn timeout() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-good.der")
        ).with_delay(Duration::from_secs(10));
        let policy = RevocationPolicy::default()
            .with_timeout(Duration::from_millis(50))
            .with_crl_distribution_points(false);
        let err = check(&fetcher, &policy).await.unwrap_err();
        assert_eq!(
            err.failures()[0].kind(), &FailureKind::Fetch(FetchError::Timeout)
        );
    }

    #[tokio::test]
    async fn size_limit() {
        let fetcher = MockFetcher::default().with(
            OCSP_URI, include_bytes!("../../test-data/ocsp-good.der")
        );
        let policy = RevocationPolicy::default()
            .with_max_response_size(16)
            .with_crl_distribution_points(false);
        let err = check(&fetcher, &policy).await.unwrap_err();
        assert_eq!(
            err.failures()[0].kind(),
            &FailureKind::Fetch(FetchError::TooLarge(16))
        );
    }
}
