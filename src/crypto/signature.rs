//! Signature algorithms and operations.

use bcder::{Mode, Tag};
use ring::signature::{self, VerificationAlgorithm};
use crate::oid;
use crate::error::{Error, UnsupportedAlgorithm};
use crate::x509::AlgorithmIdentifier;
use super::digest::DigestAlgorithm;
use super::keys::PublicKeyFormat;


//------------ SignatureAlgorithm --------------------------------------------

/// The signature algorithms supported for verification.
///
/// Only RSA signatures are supported, either with the PKCS #1 version 1.5
/// padding or with RSASSA-PSS. The PSS variant is limited to parameters
/// where hash and mask generation use the same digest and the salt is as
/// long as the digest.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// RSA with PKCS #1 v1.5 padding and the given digest.
    RsaPkcs1(DigestAlgorithm),

    /// RSASSA-PSS using the given digest for both hash and MGF1.
    RsaPss(DigestAlgorithm),
}

impl SignatureAlgorithm {
    /// Returns the digest algorithm used by the signature algorithm.
    pub fn digest_algorithm(self) -> DigestAlgorithm {
        match self {
            SignatureAlgorithm::RsaPkcs1(digest) => digest,
            SignatureAlgorithm::RsaPss(digest) => digest,
        }
    }

    /// Returns the public key format for the algorithm.
    pub fn public_key_format(self) -> PublicKeyFormat {
        PublicKeyFormat::Rsa
    }

    /// Returns the object identifier naming the algorithm in X.509.
    pub fn oid(self) -> &'static bcder::ConstOid {
        match self {
            SignatureAlgorithm::RsaPkcs1(digest) => match digest {
                DigestAlgorithm::Sha1 => &oid::SHA1_WITH_RSA_ENCRYPTION,
                DigestAlgorithm::Sha256 => &oid::SHA256_WITH_RSA_ENCRYPTION,
                DigestAlgorithm::Sha384 => &oid::SHA384_WITH_RSA_ENCRYPTION,
                DigestAlgorithm::Sha512 => &oid::SHA512_WITH_RSA_ENCRYPTION,
            }
            SignatureAlgorithm::RsaPss(_) => &oid::RSASSA_PSS,
        }
    }

    /// Returns the algorithm to use with _ring_ for a key of the given size.
    ///
    /// Returns `None` for combinations that _ring_ doesn’t do. PKCS #1
    /// signatures with SHA-1, SHA-256, and SHA-512 work with keys of at
    /// least 1024 bits, everything else needs at least 2048 bits. Keys
    /// longer than 8192 bits are never supported.
    pub(crate) fn ring_algorithm(
        self, modulus_bits: usize,
    ) -> Option<&'static dyn VerificationAlgorithm> {
        if !(1024..=8192).contains(&modulus_bits) {
            return None
        }
        if modulus_bits < 2048 {
            return match self {
                SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha1) => Some(
                    &signature::RSA_PKCS1_1024_8192_SHA1_FOR_LEGACY_USE_ONLY
                ),
                SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha256) => Some(
                    &signature::RSA_PKCS1_1024_8192_SHA256_FOR_LEGACY_USE_ONLY
                ),
                SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha512) => Some(
                    &signature::RSA_PKCS1_1024_8192_SHA512_FOR_LEGACY_USE_ONLY
                ),
                _ => None,
            }
        }
        match self {
            SignatureAlgorithm::RsaPkcs1(digest) => Some(match digest {
                DigestAlgorithm::Sha1 => {
                    &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY
                }
                DigestAlgorithm::Sha256 => {
                    &signature::RSA_PKCS1_2048_8192_SHA256
                }
                DigestAlgorithm::Sha384 => {
                    &signature::RSA_PKCS1_2048_8192_SHA384
                }
                DigestAlgorithm::Sha512 => {
                    &signature::RSA_PKCS1_2048_8192_SHA512
                }
            }),
            SignatureAlgorithm::RsaPss(digest) => match digest {
                DigestAlgorithm::Sha1 => None,
                DigestAlgorithm::Sha256 => {
                    Some(&signature::RSA_PSS_2048_8192_SHA256)
                }
                DigestAlgorithm::Sha384 => {
                    Some(&signature::RSA_PSS_2048_8192_SHA384)
                }
                DigestAlgorithm::Sha512 => {
                    Some(&signature::RSA_PSS_2048_8192_SHA512)
                }
            }
        }
    }
}


/// # ASN.1 Algorithm Identifiers
///
/// Signature algorithm identifiers appear in certificates, CRLs and OCSP
/// responses from [RFC 5280] as well as in the signer infos of CMS messages.
///
/// ```txt
/// SignatureAlgorithmIdentifier ::= AlgorithmIdentifier
/// AlgorithmIdentifier          ::= SEQUENCE {
///      algorithm                   OBJECT IDENTIFIER,
///      parameters                  ANY DEFINED BY algorithm OPTIONAL }
/// ```
///
/// In X.509 objects, the identifier names both the signature and the digest
/// algorithm, e.g., `sha256WithRSAEncryption` from [RFC 4055]. In CMS,
/// the digest algorithm is given separately and the signature algorithm
/// may just be `rsaEncryption`. If it does name a digest, the two must
/// agree.
///
/// [RFC 4055]: https://tools.ietf.org/html/rfc4055
/// [RFC 5280]: https://tools.ietf.org/html/rfc5280
impl SignatureAlgorithm {
    /// Resolves the signature algorithm of an X.509 object.
    pub fn from_x509_identifier(
        ident: &AlgorithmIdentifier
    ) -> Result<Self, UnsupportedAlgorithm> {
        if let Some(digest) = pkcs1_digest(ident)? {
            Ok(SignatureAlgorithm::RsaPkcs1(digest))
        }
        else if *ident.algorithm() == oid::RSASSA_PSS {
            pss_digest(ident).map(SignatureAlgorithm::RsaPss)
        }
        else {
            Err(UnsupportedAlgorithm::signature(ident.algorithm().clone()))
        }
    }

    /// Resolves the signature algorithm of a CMS signer info.
    ///
    /// The `digest` is the digest algorithm declared by the signer info.
    /// An identifier that names a different digest is rejected as
    /// malformed.
    pub fn from_cms_identifier(
        ident: &AlgorithmIdentifier,
        digest: DigestAlgorithm,
    ) -> Result<Self, Error> {
        if *ident.algorithm() == oid::RSA_ENCRYPTION {
            if !ident.has_empty_parameters() {
                return Err(UnsupportedAlgorithm::signature(
                    ident.algorithm().clone()
                ).into())
            }
            Ok(SignatureAlgorithm::RsaPkcs1(digest))
        }
        else if let Some(named) = pkcs1_digest(ident)? {
            if named != digest {
                return Err(Error::malformed(
                    "signature algorithm does not match digest algorithm"
                ))
            }
            Ok(SignatureAlgorithm::RsaPkcs1(digest))
        }
        else if *ident.algorithm() == oid::RSASSA_PSS {
            let named = pss_digest(ident)?;
            if named != digest {
                return Err(UnsupportedAlgorithm::signature(
                    ident.algorithm().clone()
                ).into())
            }
            Ok(SignatureAlgorithm::RsaPss(digest))
        }
        else {
            Err(UnsupportedAlgorithm::signature(
                ident.algorithm().clone()
            ).into())
        }
    }
}

/// Returns the digest of a `shaXXXWithRSAEncryption` identifier.
///
/// Returns `Ok(None)` if the identifier is something else.
fn pkcs1_digest(
    ident: &AlgorithmIdentifier
) -> Result<Option<DigestAlgorithm>, UnsupportedAlgorithm> {
    let alg = ident.algorithm();
    let res = if *alg == oid::SHA1_WITH_RSA_ENCRYPTION {
        DigestAlgorithm::Sha1
    }
    else if *alg == oid::SHA256_WITH_RSA_ENCRYPTION {
        DigestAlgorithm::Sha256
    }
    else if *alg == oid::SHA384_WITH_RSA_ENCRYPTION {
        DigestAlgorithm::Sha384
    }
    else if *alg == oid::SHA512_WITH_RSA_ENCRYPTION {
        DigestAlgorithm::Sha512
    }
    else {
        return Ok(None)
    };
    if !ident.has_empty_parameters() {
        return Err(UnsupportedAlgorithm::signature(alg.clone()))
    }
    Ok(Some(res))
}

/// Returns the digest of an acceptable RSASSA-PSS identifier.
///
/// ```txt
/// RSASSA-PSS-params  ::=  SEQUENCE  {
///     hashAlgorithm      [0] HashAlgorithm DEFAULT sha1Identifier,
///     maskGenAlgorithm   [1] MaskGenAlgorithm DEFAULT mgf1SHA1Identifier,
///     saltLength         [2] INTEGER DEFAULT 20,
///     trailerField       [3] INTEGER DEFAULT 1  }
/// ```
///
/// Parameters that cannot be decoded are treated like parameters we don’t
/// support.
fn pss_digest(
    ident: &AlgorithmIdentifier
) -> Result<DigestAlgorithm, UnsupportedAlgorithm> {
    let unsupported = || {
        UnsupportedAlgorithm::signature(ident.algorithm().clone())
    };
    let params = ident.parameters().ok_or_else(unsupported)?;
    let (hash, mgf, salt, trailer) = params.clone().decode(|cons| {
        cons.take_sequence(|cons| {
            Ok((
                cons.take_opt_constructed_if(
                    Tag::CTX_0, AlgorithmIdentifier::take_from
                )?,
                cons.take_opt_constructed_if(
                    Tag::CTX_1, AlgorithmIdentifier::take_from
                )?,
                cons.take_opt_constructed_if(
                    Tag::CTX_2, |cons| cons.take_u64()
                )?,
                cons.take_opt_constructed_if(
                    Tag::CTX_3, |cons| cons.take_u8()
                )?,
            ))
        })
    }).map_err(|_| unsupported())?;

    let digest = match hash {
        Some(hash) => DigestAlgorithm::from_identifier(&hash)?,
        None => DigestAlgorithm::Sha1,
    };
    let mgf_digest = match mgf {
        Some(mgf) => {
            if *mgf.algorithm() != oid::MGF1 {
                return Err(unsupported())
            }
            let mgf_hash = mgf.parameters().ok_or_else(unsupported)?;
            let mgf_hash = Mode::Der.decode(
                mgf_hash.as_slice(), AlgorithmIdentifier::take_from
            ).map_err(|_| unsupported())?;
            DigestAlgorithm::from_identifier(&mgf_hash)?
        }
        None => DigestAlgorithm::Sha1
    };
    if mgf_digest != digest {
        return Err(unsupported())
    }
    if salt.unwrap_or(20) != digest.digest_len() as u64 {
        return Err(unsupported())
    }
    if trailer.unwrap_or(1) != 1 {
        return Err(unsupported())
    }
    if digest == DigestAlgorithm::Sha1 {
        return Err(unsupported())
    }
    Ok(digest)
}


//============ Tests =========================================================
