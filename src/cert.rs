//! X.509 certificates.
//!
//! This module contains the [`Cert`] type which represents a parsed
//! certificate of the Mobile ID PKI: the signer certificates included in
//! CMS messages, the CA certificates above them, and OCSP responder
//! certificates.
//!
//! Parsing follows RFC 5280 but only interprets the extensions needed for
//! path building and revocation checking. Unknown non-critical extensions
//! are ignored. Unknown critical extensions are remembered so that path
//! validation can reject a certificate carrying them.

use std::fmt;
use bcder::{decode, BitString, Ia5String, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bytes::Bytes;
use log::debug;
use crate::oid;
use crate::crypto::{KeyIdentifier, PublicKey, SignatureVerificationError};
use crate::uid::{UniqueId, UniqueIdError};
use crate::uri;
use crate::x509::{Name, Serial, SignedData, Time, Validity};


//------------ Cert ----------------------------------------------------------

/// A parsed certificate.
///
/// If a certificate is stored on its own, you can use the [`decode`]
/// function to parse it. If the certificate is part of some other
/// structure, the [`take_from`] and [`from_constructed`] functions can be
/// used during parsing of that structure.
///
/// A certificate is only a container for the data. Nothing is checked
/// during parsing beyond the encoding. Signatures, validity and
/// constraints are checked during path validation.
///
/// [`decode`]: #method.decode
/// [`take_from`]: #method.take_from
/// [`from_constructed`]: #method.from_constructed
#[derive(Clone, Debug)]
pub struct Cert {
    /// The outer structure of the certificate.
    signed_data: SignedData,

    /// The actual data of the certificate.
    tbs: TbsCert,
}

/// # Decoding
///
impl Cert {
    /// Decodes a source as a certificate.
    pub fn decode<S: IntoSource>(
        source: S,
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    /// Takes an encoded certificate from the beginning of a value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    /// Takes an optional certificate from the beginning of a value.
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(Self::from_constructed)
    }

    /// Parses the content of a Certificate sequence.
    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let signed_data = SignedData::from_constructed(cons)?;
        let tbs = Mode::Der.decode(
            signed_data.data().as_slice(), TbsCert::take_from
        ).map_err(DecodeError::convert)?;
        Ok(Self { signed_data, tbs })
    }
}

/// # Data Access
///
impl Cert {
    /// Returns the serial number of the certificate.
    pub fn serial_number(&self) -> &Serial {
        &self.tbs.serial_number
    }

    /// Returns the issuer name.
    pub fn issuer(&self) -> &Name {
        &self.tbs.issuer
    }

    /// Returns the subject name.
    pub fn subject(&self) -> &Name {
        &self.tbs.subject
    }

    /// Returns the validity period.
    pub fn validity(&self) -> Validity {
        self.tbs.validity
    }

    /// Returns the beginning of the validity period.
    pub fn not_before(&self) -> Time {
        self.tbs.validity.not_before()
    }

    /// Returns the end of the validity period.
    pub fn not_after(&self) -> Time {
        self.tbs.validity.not_after()
    }

    /// Returns whether the certificate is valid at the given time.
    ///
    /// Both ends of the validity period are included.
    pub fn is_valid_at(&self, now: Time) -> bool {
        self.tbs.validity.contains(now)
    }

    /// Returns whether the certificate is valid right now.
    pub fn is_currently_valid(&self) -> bool {
        self.is_valid_at(Time::now())
    }

    /// Returns the public key of the subject.
    pub fn public_key(&self) -> &PublicKey {
        &self.tbs.subject_public_key_info
    }

    /// Returns whether the certificate is a CA certificate.
    ///
    /// This is the case if the Basic Constraints extension is present and
    /// has the cA flag set. A certificate without the extension is an
    /// end-entity certificate.
    pub fn is_ca(&self) -> bool {
        matches!(self.tbs.basic_ca, Some(BasicCa { ca: true, .. }))
    }

    /// Returns the path length constraint of a CA certificate if present.
    pub fn path_len(&self) -> Option<u64> {
        self.tbs.basic_ca.and_then(|basic| basic.path_len)
    }

    /// Returns the key usage if the extension is present.
    pub fn key_usage(&self) -> Option<KeyUsage> {
        self.tbs.key_usage
    }

    /// Returns whether the key may be used for signing certificates.
    ///
    /// A certificate without the Key Usage extension may be used for any
    /// purpose.
    pub fn may_sign_certs(&self) -> bool {
        self.tbs.key_usage.map(KeyUsage::key_cert_sign).unwrap_or(true)
    }

    /// Returns whether the key may be used for signing CRLs.
    pub fn may_sign_crls(&self) -> bool {
        self.tbs.key_usage.map(KeyUsage::crl_sign).unwrap_or(true)
    }

    /// Returns the extended key usage purposes if the extension is present.
    pub fn ext_key_usage(&self) -> Option<&[Oid<Bytes>]> {
        self.tbs.extended_key_usage.as_deref()
    }

    /// Returns whether the certificate is allowed to sign OCSP responses.
    pub fn is_ocsp_signer(&self) -> bool {
        match self.tbs.extended_key_usage {
            Some(ref purposes) => {
                purposes.iter().any(|purpose| {
                    *purpose == oid::KP_OCSP_SIGNING
                })
            }
            None => false
        }
    }

    /// Returns the subject key identifier if present.
    pub fn subject_key_identifier(&self) -> Option<&KeyIdentifier> {
        self.tbs.subject_key_identifier.as_ref()
    }

    /// Returns the authority key identifier if present.
    pub fn authority_key_identifier(&self) -> Option<&KeyIdentifier> {
        self.tbs.authority_key_identifier.as_ref()
    }

    /// Returns the HTTP URIs of the CRL distribution points.
    pub fn crl_uris(&self) -> &[uri::Http] {
        &self.tbs.crl_uris
    }

    /// Returns the HTTP URIs of the OCSP responders.
    pub fn ocsp_uris(&self) -> &[uri::Http] {
        &self.tbs.ocsp_uris
    }

    /// Returns the HTTP URIs for the issuer’s certificate.
    pub fn ca_issuer_uris(&self) -> &[uri::Http] {
        &self.tbs.ca_issuer_uris
    }

    /// Returns the first unsupported critical extension if there is one.
    pub fn unsupported_critical_extension(&self) -> Option<&Oid<Bytes>> {
        self.tbs.unsupported_critical.as_ref()
    }

    /// Returns whether the certificate claims to be self-issued.
    ///
    /// This is the case if subject and issuer are the same and, if both
    /// key identifiers are present, they are the same, too. The signature
    /// is not checked.
    pub fn is_self_signed(&self) -> bool {
        if self.tbs.subject != self.tbs.issuer {
            return false
        }
        match (self.subject_key_identifier(), self.authority_key_identifier()) {
            (Some(ski), Some(aki)) => ski == aki,
            _ => true
        }
    }

    /// Returns whether `issuer` may have issued this certificate.
    ///
    /// Compares the names and, if available, the key identifiers. Doesn’t
    /// check the signature.
    pub fn is_issued_by(&self, issuer: &Cert) -> bool {
        if self.issuer() != issuer.subject() {
            return false
        }
        match (
            self.authority_key_identifier(), issuer.subject_key_identifier()
        ) {
            (Some(aki), Some(ski)) => aki == ski,
            _ => true
        }
    }

    /// Returns whether `other` has the same subject and public key.
    pub fn has_same_key_and_subject(&self, other: &Cert) -> bool {
        self.subject() == other.subject()
            && self.public_key() == other.public_key()
    }

    /// Verifies the certificate’s signature with the issuer’s key.
    pub fn verify_signature(
        &self, issuer_key: &PublicKey
    ) -> Result<(), SignatureVerificationError> {
        self.signed_data.verify_signature(issuer_key)
    }

    /// Extracts the unique identifier from the subject name.
    pub fn unique_identifier(&self) -> Result<UniqueId, UniqueIdError> {
        self.tbs.subject.unique_identifier()
    }

    /// Returns a short summary of the certificate for reporting.
    pub fn summary(&self) -> CertSummary {
        CertSummary {
            subject: self.tbs.subject.to_string(),
            issuer: self.tbs.issuer.to_string(),
            serial: self.tbs.serial_number.clone(),
            is_ca: self.is_ca(),
        }
    }
}


//------------ TbsCert -------------------------------------------------------

/// The data of the certificate.
#[derive(Clone, Debug)]
struct TbsCert {
    serial_number: Serial,
    issuer: Name,
    validity: Validity,
    subject: Name,
    subject_public_key_info: PublicKey,

    basic_ca: Option<BasicCa>,
    subject_key_identifier: Option<KeyIdentifier>,
    authority_key_identifier: Option<KeyIdentifier>,
    key_usage: Option<KeyUsage>,
    extended_key_usage: Option<Vec<Oid<Bytes>>>,
    crl_uris: Vec<uri::Http>,
    ocsp_uris: Vec<uri::Http>,
    ca_issuer_uris: Vec<uri::Http>,
    unsupported_critical: Option<Oid<Bytes>>,
}

impl TbsCert {
    /// Parses a TBSCertificate.
    ///
    /// ```text
    /// TBSCertificate  ::=  SEQUENCE  {
    ///      version         [0]  EXPLICIT Version DEFAULT v1,
    ///      serialNumber         CertificateSerialNumber,
    ///      signature            AlgorithmIdentifier,
    ///      issuer               Name,
    ///      validity             Validity,
    ///      subject              Name,
    ///      subjectPublicKeyInfo SubjectPublicKeyInfo,
    ///      issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
    ///      subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
    ///      extensions      [3]  EXPLICIT Extensions OPTIONAL }
    /// ```
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let version = cons.take_opt_constructed_if(
                Tag::CTX_0, |c| c.take_u8()
            )?.unwrap_or(0);
            if version > 2 {
                return Err(cons.content_err("unknown certificate version"))
            }

            let serial_number = Serial::take_from(cons)?;
            // The inner signature algorithm must equal the outer one. We
            // only ever use the outer one, so we don’t check.
            cons.skip_one()?;
            let issuer = Name::take_from(cons)?;
            let validity = Validity::take_from(cons)?;
            let subject = Name::take_from(cons)?;
            let subject_public_key_info = PublicKey::take_from(cons)?;

            cons.take_opt_primitive_if(Tag::CTX_1, |prim| prim.skip_all())?;
            cons.take_opt_primitive_if(Tag::CTX_2, |prim| prim.skip_all())?;

            let mut basic_ca = None;
            let mut subject_key_id = None;
            let mut authority_key_id = None;
            let mut key_usage = None;
            let mut extended_key_usage = None;
            let mut crl_uris = None;
            let mut aia = None;
            let mut unsupported_critical = None;

            cons.take_opt_constructed_if(Tag::CTX_3, |c| c.take_sequence(|cons| {
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    let id = Oid::take_from(cons)?;
                    let critical = cons.take_opt_bool()?.unwrap_or(false);
                    let value = OctetString::take_from(cons)?;
                    Mode::Der.decode(value, |content| {
                        if id == oid::CE_BASIC_CONSTRAINTS {
                            Self::take_basic_constraints(
                                content, &mut basic_ca
                            )
                        } else if id == oid::CE_SUBJECT_KEY_IDENTIFIER {
                            Self::take_subject_key_identifier(
                                content, &mut subject_key_id
                            )
                        } else if id == oid::CE_AUTHORITY_KEY_IDENTIFIER {
                            Self::take_authority_key_identifier(
                                content, &mut authority_key_id
                            )
                        } else if id == oid::CE_KEY_USAGE {
                            Self::take_key_usage(
                                content, &mut key_usage
                            )
                        } else if id == oid::CE_EXTENDED_KEY_USAGE {
                            Self::take_extended_key_usage(
                                content, &mut extended_key_usage
                            )
                        } else if id == oid::CE_CRL_DISTRIBUTION_POINTS {
                            Self::take_crl_distribution_points(
                                content, &mut crl_uris
                            )
                        } else if id == oid::PE_AUTHORITY_INFO_ACCESS {
                            Self::take_authority_info_access(
                                content, &mut aia
                            )
                        } else {
                            if critical && unsupported_critical.is_none() {
                                unsupported_critical = Some(id.clone());
                            }
                            // RFC 5280 says we can ignore non-critical
                            // extensions we don’t know of.
                            content.skip_all()
                        }
                    }).map_err(DecodeError::convert)?;
                    Ok(())
                })? { }
                Ok(())
            }))?;

            let (ocsp_uris, ca_issuer_uris) = aia.unwrap_or_default();

            Ok(Self {
                serial_number,
                issuer,
                validity,
                subject,
                subject_public_key_info,
                basic_ca,
                subject_key_identifier: subject_key_id,
                authority_key_identifier: authority_key_id,
                key_usage,
                extended_key_usage,
                crl_uris: crl_uris.unwrap_or_default(),
                ocsp_uris,
                ca_issuer_uris,
                unsupported_critical,
            })
        })
    }

    /// Parses the Basic Constraints extension.
    ///
    /// ```text
    /// BasicConstraints        ::= SEQUENCE {
    ///     cA                      BOOLEAN DEFAULT FALSE,
    ///     pathLenConstraint       INTEGER (0..MAX) OPTIONAL
    /// }
    /// ```
    fn take_basic_constraints<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        basic_ca: &mut Option<BasicCa>,
    ) -> Result<(), DecodeError<S::Error>> {
        if basic_ca.is_some() {
            return Err(cons.content_err("duplicate Basic Constraints extension"))
        }
        cons.take_sequence(|cons| {
            *basic_ca = Some(BasicCa {
                ca: cons.take_opt_bool()?.unwrap_or(false),
                path_len: cons.take_opt_u64()?,
            });
            Ok(())
        })
    }

    /// Parses the Subject Key Identifier extension.
    ///
    /// ```text
    /// SubjectKeyIdentifier ::= KeyIdentifier
    /// ```
    fn take_subject_key_identifier<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        subject_key_id: &mut Option<KeyIdentifier>,
    ) -> Result<(), DecodeError<S::Error>> {
        if subject_key_id.is_some() {
            return Err(cons.content_err(
                "duplicate Subject Key Identifier extension"
            ))
        }
        *subject_key_id = Some(KeyIdentifier::take_from(cons)?);
        Ok(())
    }

    /// Parses the Authority Key Identifier extension.
    ///
    /// ```text
    /// AuthorityKeyIdentifier ::= SEQUENCE {
    ///   keyIdentifier             [0] KeyIdentifier           OPTIONAL,
    ///   authorityCertIssuer       [1] GeneralNames            OPTIONAL,
    ///   authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL  }
    /// ```
    ///
    /// We only use the keyIdentifier field. If it is missing, the
    /// extension is treated as absent.
    fn take_authority_key_identifier<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        authority_key_id: &mut Option<KeyIdentifier>,
    ) -> Result<(), DecodeError<S::Error>> {
        if authority_key_id.is_some() {
            return Err(cons.content_err(
                "duplicate Authority Key Identifier extension"
            ))
        }
        *authority_key_id = cons.take_sequence(|cons| {
            let res = cons.take_opt_value_if(
                Tag::CTX_0, KeyIdentifier::from_content
            )?;
            cons.skip_all()?;
            Ok(res)
        })?;
        Ok(())
    }

    /// Parses the Key Usage extension.
    ///
    /// ```text
    /// KeyUsage ::= BIT STRING {
    ///      digitalSignature        (0),
    ///      nonRepudiation          (1),
    ///      keyEncipherment         (2),
    ///      dataEncipherment        (3),
    ///      keyAgreement            (4),
    ///      keyCertSign             (5),
    ///      cRLSign                 (6),
    ///      encipherOnly            (7),
    ///      decipherOnly            (8) }
    /// ```
    fn take_key_usage<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        key_usage: &mut Option<KeyUsage>
    ) -> Result<(), DecodeError<S::Error>> {
        if key_usage.is_some() {
            return Err(cons.content_err("duplicate Key Usage extension"))
        }
        let bits = BitString::take_from(cons)?;
        *key_usage = Some(KeyUsage::from_bits(&bits));
        Ok(())
    }

    /// Parses the Extended Key Usage extension.
    ///
    /// ```text
    /// ExtKeyUsageSyntax ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
    /// KeyPurposeId ::= OBJECT IDENTIFIER
    /// ```
    fn take_extended_key_usage<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        extended_key_usage: &mut Option<Vec<Oid<Bytes>>>
    ) -> Result<(), DecodeError<S::Error>> {
        if extended_key_usage.is_some() {
            return Err(cons.content_err(
                "duplicate Extended Key Usage extension"
            ))
        }
        let purposes = cons.take_sequence(|cons| {
            let mut res = Vec::new();
            while let Some(oid) = Oid::take_opt_from(cons)? {
                res.push(oid);
            }
            Ok(res)
        })?;
        if purposes.is_empty() {
            return Err(cons.content_err(
                "empty Extended Key Usage extension"
            ))
        }
        *extended_key_usage = Some(purposes);
        Ok(())
    }

    /// Parses the CRL Distribution Points extension.
    ///
    /// ```text
    /// CRLDistributionPoints ::= SEQUENCE SIZE (1..MAX) OF DistributionPoint
    ///
    /// DistributionPoint ::= SEQUENCE {
    ///    distributionPoint       [0]     DistributionPointName OPTIONAL,
    ///    reasons                 [1]     ReasonFlags OPTIONAL,
    ///    cRLIssuer               [2]     GeneralNames OPTIONAL }
    ///
    /// DistributionPointName ::= CHOICE {
    ///    fullName                [0]     GeneralNames,
    ///    nameRelativeToCRLIssuer [1]     RelativeDistinguishedName }
    /// ```
    ///
    /// Only the HTTP URIs of fullName choices are collected. Distribution
    /// points with a cRLIssuer are skipped since we only accept CRLs
    /// issued by the certificate’s issuer.
    fn take_crl_distribution_points<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        crl_uris: &mut Option<Vec<uri::Http>>
    ) -> Result<(), DecodeError<S::Error>> {
        if crl_uris.is_some() {
            return Err(cons.content_err(
                "duplicate CRL Distribution Points extension"
            ))
        }
        let mut res = Vec::new();
        cons.take_sequence(|cons| {
            while let Some(()) = cons.take_opt_sequence(|cons| {
                let mut uris = Vec::new();
                cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                    cons.take_value(|tag, content| {
                        if tag == Tag::CTX_0 {
                            let cons = content.as_constructed()?;
                            take_general_names_uris(cons, &mut uris)
                        }
                        else {
                            skip_content(content)
                        }
                    })
                })?;
                cons.take_opt_primitive_if(Tag::CTX_1, |prim| {
                    prim.skip_all()
                })?;
                let indirect = cons.take_opt_constructed_if(Tag::CTX_2, |c| {
                    c.skip_all()
                })?.is_some();
                if !indirect {
                    res.append(&mut uris);
                }
                Ok(())
            })? { }
            Ok(())
        })?;
        *crl_uris = Some(res);
        Ok(())
    }

    /// Parses the Authority Information Access extension.
    ///
    /// ```text
    /// AuthorityInfoAccessSyntax  ::=
    ///         SEQUENCE SIZE (1..MAX) OF AccessDescription
    ///
    /// AccessDescription  ::=  SEQUENCE {
    ///         accessMethod          OBJECT IDENTIFIER,
    ///         accessLocation        GeneralName  }
    /// ```
    ///
    /// Collects the HTTP URIs of the id-ad-ocsp and id-ad-caIssuers
    /// access descriptions.
    #[allow(clippy::type_complexity)]
    fn take_authority_info_access<S: decode::Source>(
        cons: &mut decode::Constructed<S>,
        aia: &mut Option<(Vec<uri::Http>, Vec<uri::Http>)>
    ) -> Result<(), DecodeError<S::Error>> {
        if aia.is_some() {
            return Err(cons.content_err(
                "duplicate Authority Information Access extension"
            ))
        }
        let mut ocsp = Vec::new();
        let mut ca_issuers = Vec::new();
        cons.take_sequence(|cons| {
            while let Some(()) = cons.take_opt_sequence(|cons| {
                let method = Oid::take_from(cons)?;
                let location = take_general_name_uri(cons)?;
                if let Some(location) = location {
                    if method == oid::AD_OCSP {
                        ocsp.push(location)
                    }
                    else if method == oid::AD_CA_ISSUERS {
                        ca_issuers.push(location)
                    }
                }
                Ok(())
            })? { }
            Ok(())
        })?;
        *aia = Some((ocsp, ca_issuers));
        Ok(())
    }
}


//------------ Helpers for Decoding ------------------------------------------

/// Parses the HTTP URIs from the content of a GeneralNames sequence.
///
/// ```text
/// GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName
///
/// GeneralName ::= CHOICE {
///    ...
///    uniformResourceIdentifier       [6]     IA5String,
///    ... }
/// ```
///
/// Names of other choices and URIs with schemes other than HTTP or HTTPS
/// are skipped.
fn take_general_names_uris<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
    uris: &mut Vec<uri::Http>,
) -> Result<(), DecodeError<S::Error>> {
    while let Some(uri) = cons.take_opt_value(general_name_uri)? {
        if let Some(uri) = uri {
            uris.push(uri)
        }
    }
    Ok(())
}

/// Takes a single GeneralName and returns it if it is an HTTP URI.
fn take_general_name_uri<S: decode::Source>(
    cons: &mut decode::Constructed<S>,
) -> Result<Option<uri::Http>, DecodeError<S::Error>> {
    cons.take_value(general_name_uri)
}

fn general_name_uri<S: decode::Source>(
    tag: Tag, content: &mut decode::Content<S>
) -> Result<Option<uri::Http>, DecodeError<S::Error>> {
    if tag == Tag::CTX_6 {
        let uri = Ia5String::from_content(content)?.into_bytes();
        match uri::Http::from_bytes(uri.clone()) {
            Ok(uri) => Ok(Some(uri)),
            Err(err) => {
                debug!(
                    "Skipping URI '{}' in certificate: {}",
                    String::from_utf8_lossy(&uri), err
                );
                Ok(None)
            }
        }
    }
    else {
        skip_content(content)?;
        Ok(None)
    }
}

fn skip_content<S: decode::Source>(
    content: &mut decode::Content<S>
) -> Result<(), DecodeError<S::Error>> {
    match *content {
        decode::Content::Primitive(ref mut inner) => inner.skip_all(),
        decode::Content::Constructed(ref mut inner) => inner.skip_all(),
    }
}


//------------ BasicCa -------------------------------------------------------

/// The content of the Basic Constraints extension.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct BasicCa {
    ca: bool,
    path_len: Option<u64>,
}


//------------ KeyUsage ------------------------------------------------------

/// The key usage bits of a certificate.
///
/// Only the bits we care about are kept.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeyUsage {
    digital_signature: bool,
    non_repudiation: bool,
    key_cert_sign: bool,
    crl_sign: bool,
}

impl KeyUsage {
    fn from_bits(bits: &BitString) -> Self {
        KeyUsage {
            digital_signature: bits.bit(0),
            non_repudiation: bits.bit(1),
            key_cert_sign: bits.bit(5),
            crl_sign: bits.bit(6),
        }
    }

    pub fn digital_signature(self) -> bool {
        self.digital_signature
    }

    /// Returns the nonRepudiation bit, also known as contentCommitment.
    pub fn non_repudiation(self) -> bool {
        self.non_repudiation
    }

    pub fn key_cert_sign(self) -> bool {
        self.key_cert_sign
    }

    pub fn crl_sign(self) -> bool {
        self.crl_sign
    }
}


//------------ CertSummary ---------------------------------------------------

/// The identifying data of a certificate for reporting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertSummary {
    /// The subject name in its string representation.
    pub subject: String,

    /// The issuer name in its string representation.
    pub issuer: String,

    /// The serial number.
    pub serial: Serial,

    /// Whether the certificate is a CA certificate.
    pub is_ca: bool,
}

impl fmt::Display for CertSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{} (serial {}, issuer {}{})",
            self.subject, self.serial, self.issuer,
            if self.is_ca { ", CA" } else { "" }
        )
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn cert(der: &'static [u8]) -> Cert {
        Cert::decode(der).unwrap()
    }

    #[test]
    fn decode_signer_2014() {
        let cert = cert(include_bytes!("../test-data/signer-2014.der"));
        assert_eq!(
            cert.serial_number().to_string(),
            "34784419729695855966531441567273056257"
        );
        assert_eq!(
            cert.subject().to_string(),
            "SERIALNUMBER=MIDCHE5HR8NAWUB3,PSEUDONYM=MIDCHE,\
             CN=MIDCHE5HR8NAWUB3:PN,C=CH"
        );
        assert_eq!(cert.not_before().to_string(), "2014-12-24T09:30:12Z");
        assert_eq!(cert.not_after().to_string(), "2017-12-24T09:30:12Z");
        assert!(!cert.is_ca());
        assert!(!cert.is_self_signed());
        assert!(cert.unsupported_critical_extension().is_none());

        let usage = cert.key_usage().unwrap();
        assert!(usage.digital_signature());
        assert!(usage.non_repudiation());
        assert!(!usage.key_cert_sign());

        assert_eq!(
            cert.ocsp_uris(),
            &[uri::Http::from_str("http://ocsp.example.test/").unwrap()]
        );
        assert_eq!(
            cert.ca_issuer_uris(),
            &[uri::Http::from_str(
                "http://aia.example.test/issuing.crt"
            ).unwrap()]
        );
        assert_eq!(
            cert.crl_uris(),
            &[uri::Http::from_str(
                "http://crl.example.test/issuing.crl"
            ).unwrap()]
        );
        assert_eq!(
            cert.unique_identifier().unwrap().as_str(), "MIDCHE5HR8NAWUB3"
        );
    }

    #[test]
    fn validity() {
        let cert = cert(include_bytes!("../test-data/signer-2014.der"));
        assert!(cert.is_valid_at(Time::utc(2015, 6, 1, 0, 0, 0)));
        assert!(cert.is_valid_at(cert.not_before()));
        assert!(cert.is_valid_at(cert.not_after()));
        assert!(!cert.is_valid_at(Time::utc(2014, 12, 24, 9, 30, 11)));
        assert!(!cert.is_valid_at(Time::utc(2024, 6, 2, 0, 0, 0)));
        assert!(!cert.is_currently_valid());
    }

    #[test]
    fn ca_chain() {
        let root = cert(include_bytes!("../test-data/root-ca.der"));
        let issuing = cert(include_bytes!("../test-data/issuing-ca.der"));
        let signer = cert(include_bytes!("../test-data/signer-current.der"));
        let unrelated = cert(include_bytes!("../test-data/unrelated-ca.der"));

        assert!(root.is_ca());
        assert!(root.is_self_signed());
        assert!(root.may_sign_certs());
        root.verify_signature(root.public_key()).unwrap();

        assert!(issuing.is_ca());
        assert!(!issuing.is_self_signed());
        assert!(issuing.is_issued_by(&root));
        assert!(!issuing.is_issued_by(&unrelated));
        issuing.verify_signature(root.public_key()).unwrap();
        assert!(issuing.verify_signature(unrelated.public_key()).is_err());
        assert_eq!(
            issuing.crl_uris(),
            &[uri::Http::from_str("http://crl.example.test/root.crl").unwrap()]
        );

        assert!(signer.is_issued_by(&issuing));
        assert!(!signer.is_issued_by(&root));
        signer.verify_signature(issuing.public_key()).unwrap();
        assert_eq!(signer.serial_number(), &Serial::from(0xC0FFEE));
    }

    #[test]
    fn ocsp_responder() {
        let responder = cert(include_bytes!("../test-data/ocsp-responder.der"));
        assert!(responder.is_ocsp_signer());
        assert!(!cert(
            include_bytes!("../test-data/signer-current.der")
        ).is_ocsp_signer());
    }

    #[test]
    fn summary() {
        let summary = cert(
            include_bytes!("../test-data/issuing-ca.der")
        ).summary();
        assert!(summary.is_ca);
        assert_eq!(summary.serial, Serial::from(2));
    }

    #[test]
    fn reject_garbage() {
        assert!(Cert::decode(b"\x30\x03\x02\x01\x01".as_ref()).is_err());
        let der = include_bytes!("../test-data/root-ca.der");
        assert!(Cert::decode(&der[..der.len() - 1]).is_err());
    }

    #[test]
    fn general_names_uris() {
        fn name(tag: u8, value: &[u8]) -> Vec<u8> {
            let mut res = vec![tag, value.len() as u8];
            res.extend_from_slice(value);
            res
        }

        let mut content = Vec::new();
        content.extend(name(0x86, b"http://crl.example.test/get?ca=1"));
        content.extend(name(0x86, b"ldap://ldap.example.test/cn=CA?crl"));
        content.extend(name(0x82, b"crl.example.test"));
        content.extend(name(0x86, b"https://crl.example.test/ca.crl"));
        let der = name(0x30, &content);

        let uris = Mode::Der.decode(der.as_slice(), |cons| {
            cons.take_sequence(|cons| {
                let mut uris = Vec::new();
                take_general_names_uris(cons, &mut uris)?;
                Ok(uris)
            })
        }).unwrap();
        assert_eq!(
            uris,
            [
                uri::Http::from_str(
                    "http://crl.example.test/get?ca=1"
                ).unwrap(),
                uri::Http::from_str(
                    "https://crl.example.test/ca.crl"
                ).unwrap(),
            ]
        );
    }
}
