//! Resolving and verifying the signer of a message.
//!
//! A [`SignedMessage`] may in principle carry any number of signers. We only
//! support messages with exactly one signer whose certificate is included
//! in the message. [`SignedMessage::resolve_signer`] picks that signer and
//! its certificate and returns them as a [`ResolvedSigner`] which can then
//! be used to verify the signature over the detached content.

use std::fmt;
use log::debug;
use crate::cert::Cert;
use crate::cms::{SignedMessage, SignerInfo};
use crate::crypto::{DigestAlgorithm, PublicKeyFormat, SignatureAlgorithm};
use crate::error::{Error, MalformedInput, UnsupportedAlgorithm};


//------------ SignedMessage -------------------------------------------------

impl SignedMessage {
    /// Resolves the signer of the message.
    ///
    /// Fails if the message has more than one signer or if the signer’s
    /// certificate is not included in the message. Certificates are
    /// searched by issuer and serial number or by subject key identifier,
    /// depending on how the signer info identifies the signer.
    pub fn resolve_signer(
        &self
    ) -> Result<ResolvedSigner<'_>, MalformedInput> {
        let info = match self.signer_infos() {
            [] => {
                return Err(MalformedInput::new("message without signer"))
            }
            [info] => info,
            _ => {
                return Err(MalformedInput::new(
                    "multiple signers not supported"
                ))
            }
        };
        let cert = self.certificates().iter().find(|cert| {
            info.sid().matches(cert)
        }).ok_or_else(|| {
            MalformedInput::new("signer certificate not found in envelope")
        })?;
        Ok(ResolvedSigner { message: self, info, cert })
    }
}


//------------ ResolvedSigner ------------------------------------------------

/// The signer of a message together with its certificate.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedSigner<'a> {
    message: &'a SignedMessage,
    info: &'a SignerInfo,
    cert: &'a Cert,
}

impl<'a> ResolvedSigner<'a> {
    /// Returns the message this signer was resolved from.
    pub fn message(&self) -> &'a SignedMessage {
        self.message
    }

    /// Returns the signer info.
    pub fn info(&self) -> &'a SignerInfo {
        self.info
    }

    /// Returns the signer’s certificate.
    pub fn cert(&self) -> &'a Cert {
        self.cert
    }

    /// Verifies the signature over the detached content.
    ///
    /// The content is digested with the digest algorithm declared by the
    /// signer info. If signed attributes are present, the digest has to
    /// match the message digest attribute, the content type attribute has
    /// to match the content type of the message, and the signature is
    /// calculated over the attributes. Otherwise the signature is over the
    /// content itself.
    ///
    /// An invalid signature is not an error but results in
    /// [`SignatureStatus::Invalid`]. Errors are returned if the algorithms
    /// are not supported or are inconsistent.
    pub fn verify_signature(
        &self, content: &[u8]
    ) -> Result<SignatureStatus, Error> {
        let digest_algorithm = DigestAlgorithm::from_identifier(
            self.info.digest_algorithm()
        )?;
        let signature_algorithm = SignatureAlgorithm::from_cms_identifier(
            self.info.signature_algorithm(), digest_algorithm
        )?;
        let public_key = self.cert.public_key();
        if public_key.format() != PublicKeyFormat::Rsa {
            return Err(UnsupportedAlgorithm::public_key(
                public_key.algorithm().algorithm().clone()
            ).into())
        }

        let digest = digest_algorithm.digest(content);
        let signed_attrs;
        let message = match self.info.signed_attrs() {
            Some(attrs) => {
                if attrs.message_digest() != digest.as_ref() {
                    debug!("Message digest attribute doesn’t match content.");
                    return Ok(SignatureStatus::Invalid(
                        SignatureFailure::MessageDigestMismatch
                    ))
                }
                if attrs.content_type() != self.message.content_type() {
                    debug!(
                        "Content type attribute {} differs from {}.",
                        attrs.content_type(), self.message.content_type()
                    );
                    return Ok(SignatureStatus::Invalid(
                        SignatureFailure::ContentTypeMismatch
                    ))
                }
                signed_attrs = attrs.encode_verify();
                signed_attrs.as_slice()
            }
            None => content
        };

        match public_key.verify(
            message, signature_algorithm, self.info.signature()
        ) {
            Ok(()) => Ok(SignatureStatus::Valid),
            Err(err) => match err.unsupported_algorithm() {
                Some(alg) => Err(alg.clone().into()),
                None => {
                    debug!("Signature verification failed.");
                    Ok(SignatureStatus::Invalid(
                        SignatureFailure::BadSignature
                    ))
                }
            }
        }
    }
}


//------------ SignatureStatus -----------------------------------------------

/// The outcome of verifying a signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignatureStatus {
    /// The signature is valid.
    Valid,

    /// The signature is invalid for the given reason.
    Invalid(SignatureFailure),
}

impl SignatureStatus {
    pub fn is_valid(self) -> bool {
        matches!(self, SignatureStatus::Valid)
    }
}

impl fmt::Display for SignatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SignatureStatus::Valid => f.write_str("signature valid"),
            SignatureStatus::Invalid(reason) => {
                write!(f, "signature invalid: {}", reason)
            }
        }
    }
}


//------------ SignatureFailure ----------------------------------------------

/// The reason why a signature is invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignatureFailure {
    /// The content digest differs from the message digest attribute.
    MessageDigestMismatch,

    /// The content type attribute differs from the content type.
    ContentTypeMismatch,

    /// The signature value doesn’t verify.
    BadSignature,
}

impl fmt::Display for SignatureFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            SignatureFailure::MessageDigestMismatch => {
                "message digest mismatch"
            }
            SignatureFailure::ContentTypeMismatch => {
                "content type mismatch"
            }
            SignatureFailure::BadSignature => "bad signature",
        })
    }
}


//============ Tests =========================================================
