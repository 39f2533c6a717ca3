//! Verifying a signed message in one go.
//!
//! The [`Verifier`] ties together all the individual steps. It decodes a
//! message, resolves its signer, extracts the signer’s identity, checks the
//! signature over the detached content and validates the signer’s
//! certificate. The outcome of all these steps is collected in a
//! [`Verification`].

use std::fmt;
use std::sync::Arc;
use bcder::Oid;
use bytes::Bytes;
use log::{debug, info};
use crate::cert::CertSummary;
use crate::cms::SignedMessage;
use crate::error::Error;
use crate::signer::SignatureStatus;
use crate::trust::{
    FetchError, Fetcher, HttpFetcher, TrustAnchorSet, TrustValidator,
    ValidationConfig, ValidationResult,
};
use crate::uid::{UniqueId, UniqueIdError};
use crate::x509::{Time, Validity};


//------------ Verifier ------------------------------------------------------

/// Verifies signed messages.
#[derive(Clone, Debug)]
pub struct Verifier<F = HttpFetcher> {
    validator: TrustValidator<F>,
}

impl Verifier<HttpFetcher> {
    /// Creates a verifier using the given trust anchors and configuration.
    pub fn new(
        anchors: Arc<TrustAnchorSet>, config: ValidationConfig
    ) -> Result<Self, FetchError> {
        TrustValidator::new(anchors, config).map(Self::from_validator)
    }
}

impl<F: Fetcher> Verifier<F> {
    /// Creates a verifier from a trust validator.
    pub fn from_validator(validator: TrustValidator<F>) -> Self {
        Verifier { validator }
    }

    pub fn validator(&self) -> &TrustValidator<F> {
        &self.validator
    }

    /// Verifies a DER or BER encoded message over the given content.
    pub async fn verify(
        &self, message: &[u8], content: &[u8]
    ) -> Result<Verification, Error> {
        self.verify_at(message, content, Time::now()).await
    }

    /// Verifies a base64 encoded message over the given content.
    pub async fn verify_base64(
        &self, message: &str, content: &[u8]
    ) -> Result<Verification, Error> {
        let message = SignedMessage::from_base64(message)?;
        self.verify_message(&message, content, Time::now()).await
    }

    /// Verifies an encoded message as if the current time were `now`.
    pub async fn verify_at(
        &self, message: &[u8], content: &[u8], now: Time
    ) -> Result<Verification, Error> {
        let message = SignedMessage::decode(message)?;
        self.verify_message(&message, content, now).await
    }

    /// Verifies an already decoded message.
    ///
    /// Returns an error if the signer cannot be resolved or its algorithms
    /// aren’t supported. Otherwise both the signature and the certificate
    /// are checked and the outcome is returned even if one of them fails.
    pub async fn verify_message(
        &self, message: &SignedMessage, content: &[u8], now: Time
    ) -> Result<Verification, Error> {
        let signer = message.resolve_signer()?;
        let cert = signer.cert();
        let signature = signer.verify_signature(content)?;
        debug!("Signature of '{}': {}", cert.subject(), signature);
        let trust = self.validator.validate_at(
            cert, message.certificates(), now
        ).await;
        info!("Certificate '{}': {}", cert.subject(), trust);

        Ok(Verification {
            certificates: message.certificates().iter().map(|item| {
                EnvelopeCert {
                    summary: item.summary(),
                    is_signer: item.serial_number() == cert.serial_number()
                        && item.issuer() == cert.issuer(),
                }
            }).collect(),
            signer: cert.summary(),
            validity: cert.validity(),
            valid_now: cert.is_valid_at(now),
            unique_id: cert.unique_identifier(),
            content_type: message.content_type().clone(),
            signing_time: signer.info().signing_time(),
            signature,
            trust,
        })
    }
}


//------------ Verification --------------------------------------------------

/// The outcome of verifying a signed message.
#[derive(Clone, Debug)]
pub struct Verification {
    certificates: Vec<EnvelopeCert>,
    signer: CertSummary,
    validity: Validity,
    valid_now: bool,
    unique_id: Result<UniqueId, UniqueIdError>,
    content_type: Oid<Bytes>,
    signing_time: Option<Time>,
    signature: SignatureStatus,
    trust: ValidationResult,
}

impl Verification {
    /// Returns all certificates included in the message.
    pub fn certificates(&self) -> &[EnvelopeCert] {
        &self.certificates
    }

    /// Returns the signer’s certificate.
    pub fn signer(&self) -> &CertSummary {
        &self.signer
    }

    /// Returns the validity period of the signer’s certificate.
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Returns whether the signer’s certificate was valid at check time.
    pub fn is_currently_valid(&self) -> bool {
        self.valid_now
    }

    /// Returns the unique identifier of the signer.
    pub fn unique_id(&self) -> Result<&UniqueId, UniqueIdError> {
        self.unique_id.as_ref().map_err(|err| *err)
    }

    /// Returns the signed content type.
    pub fn content_type(&self) -> &Oid<Bytes> {
        &self.content_type
    }

    /// Returns the signing time if the signer included one.
    pub fn signing_time(&self) -> Option<Time> {
        self.signing_time
    }

    pub fn signature(&self) -> SignatureStatus {
        self.signature
    }

    pub fn trust(&self) -> &ValidationResult {
        &self.trust
    }

    /// Returns the overall outcome.
    ///
    /// An invalid signature trumps everything else, followed by a missing
    /// or malformed unique identifier. Otherwise the outcome of certificate
    /// validation is returned.
    pub fn verdict(&self) -> ValidationResult {
        if let SignatureStatus::Invalid(reason) = self.signature {
            return ValidationResult::SignatureInvalid(reason)
        }
        if let Err(err) = self.unique_id {
            return ValidationResult::MalformedInput(err.to_string())
        }
        self.trust.clone()
    }

    /// Returns whether the message is fully valid.
    pub fn is_valid(&self) -> bool {
        self.verdict().is_valid()
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Signer: {}", self.signer)?;
        writeln!(f, "Validity: {}", self.validity)?;
        match self.unique_id {
            Ok(ref id) => writeln!(f, "Unique ID: {}", id)?,
            Err(err) => writeln!(f, "Unique ID: {}", err)?,
        }
        if let Some(time) = self.signing_time {
            writeln!(f, "Signing time: {}", time)?;
        }
        writeln!(f, "Signature: {}", self.signature)?;
        write!(f, "Verdict: {}", self.verdict())
    }
}


//------------ EnvelopeCert --------------------------------------------------

/// A certificate included in a message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnvelopeCert {
    pub summary: CertSummary,

    /// Whether this is the signer’s certificate.
    pub is_signer: bool,
}


//============ Tests =========================================================
