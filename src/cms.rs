//! CMS signed messages.
//!
//! The Mobile ID service returns its signatures as CMS SignedData messages
//! defined in [RFC 5652] with detached content. This module parses such a
//! message into a [`SignedMessage`] that keeps everything needed to verify
//! the signature later on.
//!
//! Parsing is done in BER mode since some signers produce indefinite
//! length encodings for the outer structure. The certificates and signed
//! attributes inside the message are expected to be in DER.
//!
//! [RFC 5652]: https://tools.ietf.org/html/rfc5652

use bcder::{decode, Captured, Mode, OctetString, Oid, Tag};
use bcder::decode::DecodeError;
use bytes::Bytes;
use crate::oid;
use crate::cert::Cert;
use crate::crypto::KeyIdentifier;
use crate::error::MalformedInput;
use crate::util::base64;
use crate::x509::{AlgorithmIdentifier, Name, Serial, Time};


//------------ SignedMessage -------------------------------------------------

/// A CMS SignedData message.
///
/// ```text
/// ContentInfo ::= SEQUENCE {
///     contentType ContentType,
///     content [0] EXPLICIT ANY DEFINED BY contentType }
///
/// SignedData ::= SEQUENCE {
///     version CMSVersion,
///     digestAlgorithms DigestAlgorithmIdentifiers,
///     encapContentInfo EncapsulatedContentInfo,
///     certificates [0] IMPLICIT CertificateSet OPTIONAL,
///     crls [1] IMPLICIT RevocationInfoChoices OPTIONAL,
///     signerInfos SignerInfos }
///
/// EncapsulatedContentInfo ::= SEQUENCE {
///     eContentType ContentType,
///     eContent [0] EXPLICIT OCTET STRING OPTIONAL }
/// ```
///
/// A value can only be created from a complete, well-formed message. It
/// contains at least one signer info.
#[derive(Clone, Debug)]
pub struct SignedMessage {
    version: u8,
    digest_algorithms: Vec<AlgorithmIdentifier>,
    content_type: Oid<Bytes>,
    content: Option<Bytes>,
    certificates: Vec<Cert>,
    signer_infos: Vec<SignerInfo>,
}

impl SignedMessage {
    /// Decodes a signed message from its BER encoding.
    pub fn decode(data: &[u8]) -> Result<Self, MalformedInput> {
        Mode::Ber.decode(data, Self::take_from).map_err(Into::into)
    }

    /// Decodes a signed message from its base64 encoding.
    ///
    /// White space in the input is ignored.
    pub fn from_base64(data: &str) -> Result<Self, MalformedInput> {
        let data = base64::Cms.decode(data).map_err(|err| {
            MalformedInput::new(format!("invalid base64 encoding: {}", err))
        })?;
        Self::decode(&data)
    }

    /// Takes a signed message from the beginning of a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| { // ContentInfo
            let content_type = Oid::take_from(cons)?;
            if content_type != oid::SIGNED_DATA {
                return Err(cons.content_err("not a CMS SignedData message"))
            }
            cons.take_constructed_if(Tag::CTX_0, |cons| {
                cons.take_sequence(Self::from_signed_data)
            })
        })
    }

    fn from_signed_data<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let version = cons.take_u8()?;
        let digest_algorithms = cons.take_set(|cons| {
            let mut res = Vec::new();
            while let Some(alg) = AlgorithmIdentifier::take_opt_from(cons)? {
                res.push(alg)
            }
            Ok(res)
        })?;
        let (content_type, content) = cons.take_sequence(|cons| {
            Ok((
                Oid::take_from(cons)?,
                cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                    OctetString::take_from(cons)
                })?.map(OctetString::into_bytes)
            ))
        })?;
        let certificates = cons.take_opt_constructed_if(
            Tag::CTX_0, Self::take_certificates
        )?.unwrap_or_default();
        // We don’t use the CRLs included in the message.
        cons.take_opt_constructed_if(Tag::CTX_1, |cons| cons.skip_all())?;
        let signer_infos = cons.take_set(|cons| {
            let mut res = Vec::new();
            while let Some(info) = SignerInfo::take_opt_from(cons)? {
                res.push(info)
            }
            Ok(res)
        })?;
        if signer_infos.is_empty() {
            return Err(cons.content_err("message without signer infos"))
        }
        Ok(SignedMessage {
            version,
            digest_algorithms,
            content_type,
            content,
            certificates,
            signer_infos,
        })
    }

    /// Parses the content of the certificates set.
    ///
    /// ```text
    /// CertificateChoices ::= CHOICE {
    ///     certificate Certificate,
    ///     extendedCertificate [0] IMPLICIT ExtendedCertificate,
    ///     v1AttrCert [1] IMPLICIT AttributeCertificateV1,
    ///     v2AttrCert [2] IMPLICIT AttributeCertificateV2,
    ///     other [3] IMPLICIT OtherCertificateFormat }
    /// ```
    ///
    /// Only plain certificates are kept, all other choices are skipped.
    fn take_certificates<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Vec<Cert>, DecodeError<S::Error>> {
        let mut res = Vec::new();
        while let Some(cert) = cons.take_opt_value(|tag, content| {
            let cons = content.as_constructed()?;
            if tag == Tag::SEQUENCE {
                Cert::from_constructed(cons).map(Some)
            }
            else {
                cons.skip_all()?;
                Ok(None)
            }
        })? {
            if let Some(cert) = cert {
                res.push(cert)
            }
        }
        Ok(res)
    }
}

/// # Data Access
///
impl SignedMessage {
    /// Returns the version of the SignedData structure.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the digest algorithms declared for the whole message.
    pub fn digest_algorithms(&self) -> &[AlgorithmIdentifier] {
        &self.digest_algorithms
    }

    /// Returns the content type of the signed content.
    pub fn content_type(&self) -> &Oid<Bytes> {
        &self.content_type
    }

    /// Returns the encapsulated content if present.
    ///
    /// This is `None` for messages with detached content.
    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Returns whether the message has detached content.
    pub fn is_detached(&self) -> bool {
        self.content.is_none()
    }

    /// Returns the certificates included in the message.
    pub fn certificates(&self) -> &[Cert] {
        &self.certificates
    }

    /// Returns the signer infos of the message.
    ///
    /// There is always at least one.
    pub fn signer_infos(&self) -> &[SignerInfo] {
        &self.signer_infos
    }
}


//------------ SignerInfo ----------------------------------------------------

/// The information about one signer of a message.
///
/// ```text
/// SignerInfo ::= SEQUENCE {
///     version CMSVersion,
///     sid SignerIdentifier,
///     digestAlgorithm DigestAlgorithmIdentifier,
///     signedAttrs [0] IMPLICIT SignedAttributes OPTIONAL,
///     signatureAlgorithm SignatureAlgorithmIdentifier,
///     signature SignatureValue,
///     unsignedAttrs [1] IMPLICIT UnsignedAttributes OPTIONAL }
/// ```
#[derive(Clone, Debug)]
pub struct SignerInfo {
    version: u8,
    sid: SignerIdentifier,
    digest_algorithm: AlgorithmIdentifier,
    signed_attrs: Option<SignedAttrs>,
    signature_algorithm: AlgorithmIdentifier,
    signature: Bytes,
}

impl SignerInfo {
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let version = cons.take_u8()?;
            let sid = SignerIdentifier::take_from(cons)?;
            let digest_algorithm = AlgorithmIdentifier::take_from(cons)?;
            let signed_attrs = SignedAttrs::take_opt_from(cons)?;
            let signature_algorithm = AlgorithmIdentifier::take_from(cons)?;
            let signature = OctetString::take_from(cons)?.into_bytes();
            cons.take_opt_constructed_if(Tag::CTX_1, |cons| {
                cons.skip_all()
            })?;
            Ok(SignerInfo {
                version,
                sid,
                digest_algorithm,
                signed_attrs,
                signature_algorithm,
                signature,
            })
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Returns the identifier of the signer’s certificate.
    pub fn sid(&self) -> &SignerIdentifier {
        &self.sid
    }

    pub fn digest_algorithm(&self) -> &AlgorithmIdentifier {
        &self.digest_algorithm
    }

    pub fn signed_attrs(&self) -> Option<&SignedAttrs> {
        self.signed_attrs.as_ref()
    }

    pub fn signature_algorithm(&self) -> &AlgorithmIdentifier {
        &self.signature_algorithm
    }

    /// Returns the raw signature value.
    pub fn signature(&self) -> &Bytes {
        &self.signature
    }

    /// Returns the signing time if the signed attributes contain one.
    pub fn signing_time(&self) -> Option<Time> {
        self.signed_attrs.as_ref().and_then(SignedAttrs::signing_time)
    }
}


//------------ SignerIdentifier ----------------------------------------------

/// The identifier of the signer’s certificate.
///
/// ```text
/// SignerIdentifier ::= CHOICE {
///     issuerAndSerialNumber IssuerAndSerialNumber,
///     subjectKeyIdentifier [0] SubjectKeyIdentifier }
///
/// IssuerAndSerialNumber ::= SEQUENCE {
///     issuer Name,
///     serialNumber CertificateSerialNumber }
/// ```
#[derive(Clone, Debug)]
pub enum SignerIdentifier {
    IssuerAndSerial(Name, Serial),
    KeyIdentifier(KeyIdentifier),
}

impl SignerIdentifier {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_value(|tag, content| {
            if tag == Tag::SEQUENCE {
                let cons = content.as_constructed()?;
                Ok(SignerIdentifier::IssuerAndSerial(
                    Name::take_from(cons)?,
                    Serial::take_from(cons)?,
                ))
            }
            else if tag == Tag::CTX_0 {
                KeyIdentifier::from_content(content).map(
                    SignerIdentifier::KeyIdentifier
                )
            }
            else {
                Err(content.content_err("invalid signer identifier"))
            }
        })
    }

    /// Returns whether the identifier matches the given certificate.
    ///
    /// Issuer names are compared by their encoding.
    pub fn matches(&self, cert: &Cert) -> bool {
        match *self {
            SignerIdentifier::IssuerAndSerial(ref issuer, ref serial) => {
                cert.issuer() == issuer && cert.serial_number() == serial
            }
            SignerIdentifier::KeyIdentifier(ref key_id) => {
                cert.subject_key_identifier() == Some(key_id)
            }
        }
    }
}


//------------ SignedAttrs ---------------------------------------------------

/// The signed attributes of a signer info.
///
/// These attributes, in their DER encoded form, are what the signature is
/// calculated over. The encoding uses the tag for SET OF, not \[0\] as
/// found in the actual data. We keep the captured content of the
/// attributes and only put the tag and length in front for verification.
///
/// The content type and message digest attributes must be present as
/// required by section 5.3 of RFC 5652. The signing time is optional.
/// Other attributes are skipped.
#[derive(Clone, Debug)]
pub struct SignedAttrs {
    raw: Captured,
    content_type: Oid<Bytes>,
    message_digest: Bytes,
    signing_time: Option<Time>,
}

impl SignedAttrs {
    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        let mut content_type = None;
        let mut message_digest = None;
        let mut signing_time = None;
        let raw = cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
            cons.capture(|cons| {
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    let oid = Oid::take_from(cons)?;
                    if oid == oid::CONTENT_TYPE {
                        Self::take_content_type(cons, &mut content_type)
                    }
                    else if oid == oid::MESSAGE_DIGEST {
                        Self::take_message_digest(cons, &mut message_digest)
                    }
                    else if oid == oid::SIGNING_TIME {
                        Self::take_signing_time(cons, &mut signing_time)
                    }
                    else {
                        cons.skip_all()
                    }
                })? { }
                Ok(())
            })
        })?;
        let raw = match raw {
            Some(raw) => raw,
            None => return Ok(None)
        };
        let Some(content_type) = content_type else {
            return Err(cons.content_err(
                "missing content type in signed attributes"
            ))
        };
        let Some(message_digest) = message_digest else {
            return Err(cons.content_err(
                "missing message digest in signed attributes"
            ))
        };
        Ok(Some(SignedAttrs {
            raw, content_type, message_digest, signing_time
        }))
    }

    /// Parses the Content Type attribute.
    ///
    /// This attribute is defined in section 11.1. of RFC 5652. The attribute
    /// value is a SET of exactly one OBJECT IDENTIFIER.
    fn take_content_type<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        content_type: &mut Option<Oid<Bytes>>
    ) -> Result<(), DecodeError<S::Error>> {
        if content_type.is_some() {
            return Err(cons.content_err("duplicate Content Type attribute"))
        }
        *content_type = Some(cons.take_set(Oid::take_from)?);
        Ok(())
    }

    fn take_message_digest<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        message_digest: &mut Option<Bytes>
    ) -> Result<(), DecodeError<S::Error>> {
        if message_digest.is_some() {
            return Err(cons.content_err("duplicate Message Digest attribute"))
        }
        *message_digest = Some(
            cons.take_set(OctetString::take_from)?.into_bytes()
        );
        Ok(())
    }

    fn take_signing_time<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        signing_time: &mut Option<Time>
    ) -> Result<(), DecodeError<S::Error>> {
        if signing_time.is_some() {
            return Err(cons.content_err("duplicate Signing Time attribute"))
        }
        *signing_time = Some(cons.take_set(Time::take_from)?);
        Ok(())
    }

    pub fn content_type(&self) -> &Oid<Bytes> {
        &self.content_type
    }

    pub fn message_digest(&self) -> &[u8] {
        self.message_digest.as_ref()
    }

    pub fn signing_time(&self) -> Option<Time> {
        self.signing_time
    }

    /// Creates the message for verification.
    ///
    /// This is the content of the attributes with the tag and length of a
    /// SET OF in front.
    pub fn encode_verify(&self) -> Vec<u8> {
        let content = self.raw.as_slice();
        let len = content.len();
        let mut res = Vec::with_capacity(len + 10);
        res.push(0x31); // SET
        if len < 0x80 {
            res.push(len as u8)
        }
        else {
            let octets = len.to_be_bytes();
            let skip = octets.iter().take_while(|&&ch| ch == 0).count();
            res.push(0x80 | (octets.len() - skip) as u8);
            res.extend_from_slice(&octets[skip..]);
        }
        res.extend_from_slice(content);
        res
    }
}

impl AsRef<[u8]> for SignedAttrs {
    fn as_ref(&self) -> &[u8] {
        self.raw.as_slice()
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decode_signed_2014() {
        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-2014.p7s")
        ).unwrap();
        assert_eq!(msg.version(), 1);
        assert!(msg.is_detached());
        assert_eq!(msg.content_type(), &oid::DATA);
        assert_eq!(msg.digest_algorithms().len(), 1);
        assert_eq!(msg.digest_algorithms()[0].algorithm(), &oid::SHA256);
        assert_eq!(msg.certificates().len(), 1);
        assert_eq!(msg.signer_infos().len(), 1);

        let info = &msg.signer_infos()[0];
        assert_eq!(info.version(), 1);
        assert!(info.sid().matches(&msg.certificates()[0]));
        assert_eq!(info.signature_algorithm().algorithm(), &oid::RSA_ENCRYPTION);
        assert_eq!(info.signature().len(), 256);
        let attrs = info.signed_attrs().unwrap();
        assert_eq!(attrs.content_type(), &oid::DATA);
        assert_eq!(attrs.message_digest().len(), 32);
        assert_eq!(
            info.signing_time(), Some(Time::utc(2026, 10, 19, 3, 26, 0))
        );
    }

    #[test]
    fn decode_base64() {
        let msg = SignedMessage::from_base64(
            include_str!("../test-data/signed-2014.b64")
        ).unwrap();
        let der = SignedMessage::decode(
            include_bytes!("../test-data/signed-2014.p7s")
        ).unwrap();
        assert_eq!(
            msg.signer_infos()[0].signature(),
            der.signer_infos()[0].signature()
        );
        assert!(SignedMessage::from_base64("not base64!").is_err());
    }

    #[test]
    fn decode_variants() {
        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-current.p7s")
        ).unwrap();
        assert_eq!(msg.certificates().len(), 2);

        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-keyid.p7s")
        ).unwrap();
        let info = &msg.signer_infos()[0];
        assert_eq!(info.version(), 3);
        assert!(matches!(info.sid(), SignerIdentifier::KeyIdentifier(_)));
        assert!(info.sid().matches(&msg.certificates()[0]));

        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-noattrs.p7s")
        ).unwrap();
        assert!(msg.signer_infos()[0].signed_attrs().is_none());
        assert!(msg.signer_infos()[0].signing_time().is_none());

        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-nocerts.p7s")
        ).unwrap();
        assert!(msg.certificates().is_empty());

        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-two-signers.p7s")
        ).unwrap();
        assert_eq!(msg.signer_infos().len(), 2);
    }

    #[test]
    fn reject_malformed() {
        // A certificate is not a CMS message.
        assert!(SignedMessage::decode(
            include_bytes!("../test-data/root-ca.der")
        ).is_err());
        assert!(SignedMessage::decode(b"").is_err());

        let der = include_bytes!("../test-data/signed-2014.p7s");
        assert!(SignedMessage::decode(&der[..der.len() - 10]).is_err());
    }

    #[test]
    fn reject_incomplete_signed_attrs() {
        let der = include_bytes!("../test-data/signed-current.p7s");

        // The content type and message digest attribute types both end
        // in the given octet. Replacing it with 7 makes them
        // challengePassword attributes which are skipped.
        let prefix: &[u8] = &[
            0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x09
        ];
        for (idx, last) in [(2197usize, 0x03u8), (2253, 0x04)] {
            let mut der = der.to_vec();
            assert_eq!(der[idx], last);
            assert_eq!(&der[idx - 10..idx], prefix);
            assert!(SignedMessage::decode(der.as_slice()).is_ok());
            der[idx] = 0x07;
            assert!(SignedMessage::decode(der.as_slice()).is_err());
        }
    }

    #[test]
    fn encode_verify_long_form() {
        let msg = SignedMessage::decode(
            include_bytes!("../test-data/signed-2014.p7s")
        ).unwrap();
        let attrs = msg.signer_infos()[0].signed_attrs().unwrap();
        let encoded = attrs.encode_verify();
        assert_eq!(encoded[0], 0x31);
        let len = attrs.as_ref().len();
        if len < 0x80 {
            assert_eq!(encoded[1] as usize, len);
            assert_eq!(encoded.len(), len + 2);
        }
        else {
            assert_eq!(encoded[1], 0x81);
            assert_eq!(encoded[2] as usize, len);
            assert_eq!(encoded.len(), len + 3);
        }
    }
}
