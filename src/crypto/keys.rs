//! Types and parameters of keys.

use std::{error, fmt};
use bcder::{decode, BitString, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bytes::Bytes;
use ring::error::Unspecified;
use ring::signature::UnparsedPublicKey;
use crate::oid;
use crate::error::UnsupportedAlgorithm;
use crate::util::hex::Hex;
use crate::x509::AlgorithmIdentifier;
use super::digest::DigestAlgorithm;
use super::signature::SignatureAlgorithm;


//------------ PublicKeyFormat -----------------------------------------------

/// The formats of public keys we can tell apart.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PublicKeyFormat {
    /// An RSA public key.
    ///
    /// This is the only format we can verify signatures with.
    Rsa,

    /// An elliptic curve public key.
    Ec,

    /// Some other key.
    Other,
}

impl PublicKeyFormat {
    fn from_identifier(ident: &AlgorithmIdentifier) -> Self {
        let alg = ident.algorithm();
        if *alg == oid::RSA_ENCRYPTION || *alg == oid::RSASSA_PSS {
            PublicKeyFormat::Rsa
        }
        else if *alg == oid::EC_PUBLIC_KEY {
            PublicKeyFormat::Ec
        }
        else {
            PublicKeyFormat::Other
        }
    }
}


//------------ PublicKey -----------------------------------------------------

/// A public key.
#[derive(Clone, Debug)]
pub struct PublicKey {
    algorithm: AlgorithmIdentifier,
    format: PublicKeyFormat,
    bits: Bytes,
}

impl PublicKey {
    /// Returns the algorithm identifier of this public key.
    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    /// Returns the format of this public key.
    pub fn format(&self) -> PublicKeyFormat {
        self.format
    }

    /// Returns the bits of this public key.
    pub fn bits(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns a key identifier for this key.
    ///
    /// The identifier will be the SHA1 hash of the key’s bits. This is
    /// method (1) of section 4.2.1.2 of RFC 5280 and also the key hash used
    /// by OCSP.
    pub fn key_identifier(&self) -> KeyIdentifier {
        KeyIdentifier(Bytes::copy_from_slice(
            DigestAlgorithm::Sha1.digest(self.bits()).as_ref()
        ))
    }

    /// Verifies a signature using this public key.
    ///
    /// Only RSA keys can be used for verification. All other keys will
    /// always result in an unsupported algorithm error.
    pub fn verify(
        &self,
        message: &[u8],
        algorithm: SignatureAlgorithm,
        signature: &[u8],
    ) -> Result<(), SignatureVerificationError> {
        if self.format != algorithm.public_key_format() {
            return Err(UnsupportedAlgorithm::public_key(
                self.algorithm.algorithm().clone()
            ).into())
        }
        let key_bits = self.rsa_modulus_bits().ok_or(Unspecified)?;
        let ring_alg = match algorithm.ring_algorithm(key_bits) {
            Some(alg) => alg,
            None => {
                return Err(UnsupportedAlgorithm::key_size(
                    Oid(Bytes::from_static(algorithm.oid().0)), key_bits
                ).into())
            }
        };
        UnparsedPublicKey::new(
            ring_alg, self.bits()
        ).verify(message, signature).map_err(Into::into)
    }

    /// Returns the length of the modulus of an RSA key in bits.
    ///
    /// ```text
    /// RSAPublicKey ::= SEQUENCE {
    ///     modulus           INTEGER,
    ///     publicExponent    INTEGER }
    /// ```
    ///
    /// Returns `None` if the key isn’t a well-formed RSA key.
    pub fn rsa_modulus_bits(&self) -> Option<usize> {
        if self.format != PublicKeyFormat::Rsa {
            return None
        }
        let modulus = Mode::Der.decode(self.bits.clone(), |cons| {
            cons.take_sequence(|cons| {
                let modulus = cons.take_primitive_if(
                    Tag::INTEGER, |prim| prim.take_all()
                )?;
                cons.take_primitive_if(Tag::INTEGER, |prim| prim.skip_all())?;
                Ok(modulus)
            })
        }).ok()?;
        let first = modulus.iter().position(|&octet| octet != 0)?;
        let len = modulus.len() - first;
        Some(
            len * 8 - modulus[first].leading_zeros() as usize
        )
    }
}


/// # As `SubjectPublicKeyInfo`
///
/// Public keys are included in X.509 certificates as `SubjectPublicKeyInfo`
/// structures. As these contain the same information as `PublicKey`,
/// it can be decoded from such sequences.
impl PublicKey {
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let algorithm = AlgorithmIdentifier::take_from(cons)?;
            let bits = BitString::take_from(cons)?;
            if bits.unused() != 0 {
                return Err(cons.content_err(
                    "public key with unused bits"
                ))
            }
            Ok(PublicKey {
                format: PublicKeyFormat::from_identifier(&algorithm),
                algorithm,
                bits: bits.octet_bytes(),
            })
        })
    }
}


//--- PartialEq and Eq

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm.algorithm() == other.algorithm.algorithm()
            && self.bits == other.bits
    }
}

impl Eq for PublicKey { }


//------------ KeyIdentifier -------------------------------------------------

/// A key identifier.
///
/// Certificates generated by CAs following RFC 5280 use the SHA-1 hash of
/// the key’s bits but other methods exist, so the identifier can be of
/// any length.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct KeyIdentifier(Bytes);

impl KeyIdentifier {
    pub fn from_slice(slice: &[u8]) -> Self {
        KeyIdentifier(Bytes::copy_from_slice(slice))
    }

    /// Returns an octet slice of the key identifer’s value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Takes an encoded key identifier from a constructed value.
    ///
    /// ```text
    /// KeyIdentifier ::= OCTET STRING
    /// ```
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_value_if(Tag::OCTET_STRING, Self::from_content)
    }

    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_value_if(Tag::OCTET_STRING, Self::from_content)
    }

    /// Parses an encoded key identifer from encoded content.
    pub fn from_content<S: decode::Source>(
        content: &mut decode::Content<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let octets = OctetString::from_content(content)?;
        if octets.is_empty() {
            return Err(content.content_err("empty key identifier"))
        }
        Ok(KeyIdentifier(octets.into_bytes()))
    }
}


//--- AsRef

impl AsRef<[u8]> for KeyIdentifier {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}


//--- Display and Debug

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Hex::with_separator(self.as_slice(), ':'))
    }
}

impl fmt::Debug for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyIdentifier({})", self)
    }
}


//------------ SignatureVerificationError ------------------------------------

/// An error happened while verifying a signature.
///
/// Apart from telling whether the algorithm was supported at all, no
/// further information is provided.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureVerificationError {
    unsupported: Option<UnsupportedAlgorithm>,
}

impl SignatureVerificationError {
    fn unsupported(err: UnsupportedAlgorithm) -> Self {
        SignatureVerificationError { unsupported: Some(err) }
    }

    /// Returns the unsupported algorithm if that was the problem.
    pub fn unsupported_algorithm(&self) -> Option<&UnsupportedAlgorithm> {
        self.unsupported.as_ref()
    }
}

impl From<Unspecified> for SignatureVerificationError {
    fn from(_: Unspecified) -> Self {
        SignatureVerificationError { unsupported: None }
    }
}

impl From<UnsupportedAlgorithm> for SignatureVerificationError {
    fn from(err: UnsupportedAlgorithm) -> Self {
        Self::unsupported(err)
    }
}

impl fmt::Display for SignatureVerificationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.unsupported {
            Some(ref err) => err.fmt(f),
            None => f.write_str("signature verification failed")
        }
    }
}

impl error::Error for SignatureVerificationError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::cert::Cert;

    #[test]
    fn key_identifier_matches_extension() {
        let cert = Cert::decode(
            include_bytes!("../../test-data/issuing-ca.der").as_ref()
        ).unwrap();
        assert_eq!(cert.public_key().format(), PublicKeyFormat::Rsa);
        assert_eq!(
            Some(&cert.public_key().key_identifier()),
            cert.subject_key_identifier()
        );
        assert_eq!(cert.public_key().key_identifier().as_slice().len(), 20);
    }

    #[test]
    fn verify_bad_signature() {
        let cert = Cert::decode(
            include_bytes!("../../test-data/root-ca.der").as_ref()
        ).unwrap();
        let err = cert.public_key().verify(
            b"message",
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha256),
            &[0u8; 256]
        ).unwrap_err();
        assert!(err.unsupported_algorithm().is_none());
    }

    #[test]
    fn small_key_rejects_sha384() {
        let cert = Cert::decode(
            include_bytes!("../../test-data/root-ca.der").as_ref()
        ).unwrap();
        assert_eq!(cert.public_key().rsa_modulus_bits(), Some(2048));

        let mut small = cert.public_key().clone();
        small.bits = Bytes::from_static(&[
            0x30, 0x0a,
            0x02, 0x05, 0x00, 0x80, 0x00, 0x00, 0x01,
            0x02, 0x01, 0x03,
        ]);
        assert_eq!(small.rsa_modulus_bits(), Some(32));
        let err = small.verify(
            b"message",
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha384),
            &[0u8; 4]
        ).unwrap_err();
        let unsupported = err.unsupported_algorithm().unwrap();
        assert_eq!(unsupported.key_bits(), Some(32));
        assert_eq!(*unsupported.oid(), oid::SHA384_WITH_RSA_ENCRYPTION);
    }

    #[test]
    fn key_identifier_display() {
        assert_eq!(
            KeyIdentifier::from_slice(b"\x0a\xbc\xff").to_string(),
            "0A:BC:FF"
        );
    }
}
