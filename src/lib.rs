//! Verification of Mobile ID signatures.
//!
//! The Swisscom Mobile ID service creates signatures on a subscriber’s
//! mobile phone and returns them as CMS SignedData messages with detached
//! content. This crate verifies such messages: it finds the signer’s
//! certificate in the message, checks the signature over the content,
//! extracts the subscriber’s unique identifier from the certificate, and
//! validates the certificate against a set of trust anchors including its
//! revocation status.
//!
//! The individual steps are available through the types in the modules of
//! the crate. The [`Verifier`] performs all of them and collects the
//! outcome in a [`Verification`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use mobileid_verifier::{TrustAnchorSet, ValidationConfig, Verifier};
//!
//! # async fn verify(
//! #     anchors: &str, message: &str, content: &[u8]
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let anchors = Arc::new(TrustAnchorSet::from_pem(anchors)?);
//! let verifier = Verifier::new(anchors, ValidationConfig::default())?;
//! let verification = verifier.verify_base64(message, content).await?;
//! println!("{}", verification.verdict());
//! # Ok(())
//! # }
//! ```

pub use self::cert::{Cert, CertSummary};
pub use self::cms::SignedMessage;
pub use self::error::{Error, MalformedInput, UnsupportedAlgorithm};
pub use self::report::{EnvelopeCert, Verification, Verifier};
pub use self::signer::{ResolvedSigner, SignatureFailure, SignatureStatus};
pub use self::trust::{
    ChainMode, RevocationPolicy, TrustAnchorSet, TrustValidator,
    ValidationConfig, ValidationResult,
};
pub use self::uid::{UniqueId, UniqueIdError};

pub mod cert;
pub mod cms;
pub mod crl;
pub mod crypto;
pub mod error;
pub mod ocsp;
pub mod oid;
pub mod report;
pub mod signer;
pub mod trust;
pub mod uid;
pub mod uri;
pub mod util;
pub mod x509;
