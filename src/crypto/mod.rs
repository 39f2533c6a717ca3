//! Digests, keys, and signature verification.
//!

pub use self::digest::{Digest, DigestAlgorithm};
pub use self::keys::{
    KeyIdentifier, PublicKey, PublicKeyFormat, SignatureVerificationError,
};
pub use self::signature::SignatureAlgorithm;

pub mod digest;
pub mod keys;
pub mod signature;
