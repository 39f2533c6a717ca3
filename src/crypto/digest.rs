//! Digest algorithm and operations.

use ring::digest;
use crate::oid;
use crate::error::UnsupportedAlgorithm;
use crate::x509::AlgorithmIdentifier;

// Re-export the things from ring for actual digest generation.
pub use ring::digest::Digest;


//------------ DigestAlgorithm -----------------------------------------------

/// The digest algorithms supported for signature verification.
///
/// SHA-1 is only supported because older signers and OCSP request
/// identifiers still use it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

/// # Creating Digest Values
///
impl DigestAlgorithm {
    /// Returns the digest of `data` using this algorithm.
    pub fn digest(self, data: &[u8]) -> Digest {
        digest::digest(self.ring_algorithm(), data)
    }

    /// Returns the length of a digest value in octets.
    pub fn digest_len(self) -> usize {
        self.ring_algorithm().output_len()
    }

    fn ring_algorithm(self) -> &'static digest::Algorithm {
        match self {
            DigestAlgorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            DigestAlgorithm::Sha256 => &digest::SHA256,
            DigestAlgorithm::Sha384 => &digest::SHA384,
            DigestAlgorithm::Sha512 => &digest::SHA512,
        }
    }
}


/// # ASN.1 Values
///
/// Digest algorithms appear in CMS either alone or in sets with the following
/// syntax:
///
/// ```txt
/// DigestAlgorithmIdentifiers ::= SET OF DigestAlgorithmIdentifier
/// DigestAlgorithmIdentifier  ::= AlgorithmIdentifier
/// AlgorithmIdentifier        ::= SEQUENCE {
///      algorithm                 OBJECT IDENTIFIER,
///      parameters                ANY DEFINED BY algorithm OPTIONAL }
/// ```
///
/// The identifiers are defined in [RFC 3370] and [RFC 5754]. The
/// _parameters_ field may either be absent or `NULL`.
///
/// Identifiers are kept as they are when decoding a message and are only
/// translated into a digest algorithm when used, so that a message using an
/// unknown algorithm can be reported as such rather than as malformed.
///
/// [RFC 3370]: https://tools.ietf.org/html/rfc3370
/// [RFC 5754]: https://tools.ietf.org/html/rfc5754
impl DigestAlgorithm {
    /// Resolves an algorithm identifier.
    pub fn from_identifier(
        ident: &AlgorithmIdentifier
    ) -> Result<Self, UnsupportedAlgorithm> {
        let alg = ident.algorithm();
        let res = if *alg == oid::SHA1 {
            DigestAlgorithm::Sha1
        }
        else if *alg == oid::SHA256 {
            DigestAlgorithm::Sha256
        }
        else if *alg == oid::SHA384 {
            DigestAlgorithm::Sha384
        }
        else if *alg == oid::SHA512 {
            DigestAlgorithm::Sha512
        }
        else {
            return Err(UnsupportedAlgorithm::digest(alg.clone()))
        };
        if !ident.has_empty_parameters() {
            return Err(UnsupportedAlgorithm::digest(alg.clone()))
        }
        Ok(res)
    }

    /// Returns the object identifier of the algorithm.
    pub fn oid(self) -> &'static bcder::ConstOid {
        match self {
            DigestAlgorithm::Sha1 => &oid::SHA1,
            DigestAlgorithm::Sha256 => &oid::SHA256,
            DigestAlgorithm::Sha384 => &oid::SHA384,
            DigestAlgorithm::Sha512 => &oid::SHA512,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn digest_len() {
        assert_eq!(DigestAlgorithm::Sha1.digest(b"").as_ref().len(), 20);
        assert_eq!(DigestAlgorithm::Sha256.digest_len(), 32);
        assert_eq!(DigestAlgorithm::Sha384.digest_len(), 48);
        assert_eq!(DigestAlgorithm::Sha512.digest(b"").as_ref().len(), 64);
    }
}
