//! Configuration of certificate validation.

use std::time::Duration;
use chrono::TimeDelta;


//------------ RevocationPolicy ----------------------------------------------

/// How the revocation status of certificates is determined.
///
/// OCSP is always tried first if enabled. CRLs from the distribution
/// points listed in a certificate are used if OCSP is disabled or didn’t
/// produce a definite answer. If neither results in an answer, the
/// certificate is rejected.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevocationPolicy {
    /// Whether to ask the OCSP responders listed in certificates.
    pub ocsp: bool,

    /// Whether to fetch CRLs from the listed distribution points.
    pub crl_distribution_points: bool,

    /// The time after which a single request is abandoned.
    pub timeout: Duration,

    /// The amount of clock skew tolerated when checking freshness.
    pub clock_skew: Duration,

    /// The maximum size of an OCSP response or CRL in octets.
    pub max_response_size: usize,

    /// How long an OCSP response without a next update time is used.
    pub max_ocsp_age: Duration,
}

impl RevocationPolicy {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_CLOCK_SKEW: Duration = Duration::from_secs(300);
    pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 4 * 1024 * 1024;
    pub const DEFAULT_MAX_OCSP_AGE: Duration = Duration::from_secs(3600);

    pub fn with_ocsp(mut self, ocsp: bool) -> Self {
        self.ocsp = ocsp;
        self
    }

    pub fn with_crl_distribution_points(mut self, crldp: bool) -> Self {
        self.crl_distribution_points = crldp;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    pub fn with_max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size;
        self
    }

    pub fn with_max_ocsp_age(mut self, age: Duration) -> Self {
        self.max_ocsp_age = age;
        self
    }

    /// Returns whether any revocation source is enabled.
    pub fn is_enabled(&self) -> bool {
        self.ocsp || self.crl_distribution_points
    }

    /// Returns the clock skew for time calculations.
    pub fn skew(&self) -> TimeDelta {
        TimeDelta::from_std(self.clock_skew).unwrap_or(TimeDelta::MAX)
    }

    /// Returns the maximum age of OCSP responses for time calculations.
    pub fn ocsp_age(&self) -> TimeDelta {
        TimeDelta::from_std(self.max_ocsp_age).unwrap_or(TimeDelta::MAX)
    }
}

impl Default for RevocationPolicy {
    fn default() -> Self {
        RevocationPolicy {
            ocsp: true,
            crl_distribution_points: true,
            timeout: Self::DEFAULT_TIMEOUT,
            clock_skew: Self::DEFAULT_CLOCK_SKEW,
            max_response_size: Self::DEFAULT_MAX_RESPONSE_SIZE,
            max_ocsp_age: Self::DEFAULT_MAX_OCSP_AGE,
        }
    }
}


//------------ ChainMode -----------------------------------------------------

/// How a path from the signer certificate to a trust anchor is built.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChainMode {
    /// The signer certificate must have been issued by a trust anchor.
    ///
    /// Any certificate in the anchor set terminates the path, whether it
    /// is self-signed or not.
    #[default]
    IssuerAnchor,

    /// The path must end in a self-signed trust anchor.
    ///
    /// Intermediate CA certificates are taken from the envelope and the
    /// anchor set.
    FullChain,
}


//------------ ValidationConfig ----------------------------------------------

/// The complete configuration of a trust validator.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationConfig {
    pub chain_mode: ChainMode,
    pub revocation: RevocationPolicy,
}

impl ValidationConfig {
    pub fn with_chain_mode(mut self, mode: ChainMode) -> Self {
        self.chain_mode = mode;
        self
    }

    pub fn with_revocation(mut self, policy: RevocationPolicy) -> Self {
        self.revocation = policy;
        self
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.chain_mode, ChainMode::IssuerAnchor);
        assert!(config.revocation.ocsp);
        assert!(config.revocation.crl_distribution_points);
        assert_eq!(config.revocation.timeout, Duration::from_secs(5));
        assert_eq!(config.revocation.skew(), TimeDelta::minutes(5));
        assert_eq!(config.revocation.ocsp_age(), TimeDelta::hours(1));
    }

    #[test]
    fn builder() {
        let policy = RevocationPolicy::default()
            .with_ocsp(false)
            .with_crl_distribution_points(false)
            .with_clock_skew(Duration::from_secs(u64::MAX))
            .with_max_ocsp_age(Duration::from_secs(60));
        assert!(!policy.is_enabled());
        assert_eq!(policy.skew(), TimeDelta::MAX);
        assert_eq!(policy.ocsp_age(), TimeDelta::minutes(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_config() {
        let config = ValidationConfig::default().with_chain_mode(
            ChainMode::FullChain
        );
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            serde_json::from_str::<ValidationConfig>(&json).unwrap(),
            config
        );
    }
}
