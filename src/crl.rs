//! Certificate Revocation Lists.
//!
//! CRLs are the fallback for checking whether a certificate has been
//! revoked when its issuer’s OCSP responder cannot provide an answer. The
//! format is defined in RFC 5280.
//!
//! This module implements the CRLs themselves via the type [`Crl`]. Only
//! complete CRLs issued directly by the certificate issuer are supported.
//! Delta CRLs and indirect CRLs are rejected.

use std::{error, fmt};
use bcder::{decode, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bytes::Bytes;
use chrono::TimeDelta;
use crate::oid;
use crate::cert::Cert;
use crate::crypto::{KeyIdentifier, PublicKey, SignatureVerificationError};
use crate::x509::{Name, Serial, SignedData, Time};


//------------ Crl -----------------------------------------------------------

/// A certificate revocation list.
///
/// ```text
/// TBSCertList  ::=  SEQUENCE  {
///      version                 Version OPTIONAL,
///                                   -- if present, MUST be v2
///      signature               AlgorithmIdentifier,
///      issuer                  Name,
///      thisUpdate              Time,
///      nextUpdate              Time OPTIONAL,
///      revokedCertificates     SEQUENCE OF SEQUENCE  {
///           userCertificate         CertificateSerialNumber,
///           revocationDate          Time,
///           crlEntryExtensions      Extensions OPTIONAL
///      }  OPTIONAL,
///      crlExtensions           [0]  EXPLICIT Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug)]
pub struct Crl {
    /// The outer structure of the CRL.
    signed_data: SignedData,

    /// The name of the issuer.
    issuer: Name,

    /// The time this version of the CRL was created.
    this_update: Time,

    /// The time the next version of the CRL is likely to be created.
    next_update: Option<Time>,

    /// The list of revoked certificates.
    revoked_certs: Vec<CrlEntry>,

    /// The key identifier of the issuer’s key if present.
    authority_key_id: Option<KeyIdentifier>,

    /// The CRL number if present.
    crl_number: Option<Serial>,

    /// The first critical extension we don’t support.
    unsupported_critical: Option<Oid<Bytes>>,
}

impl Crl {
    /// Parses a source as a certificate revocation list.
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    /// Takes an encoded CRL from the beginning of a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    /// Parses the content of a certificate revocation list.
    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let signed_data = SignedData::from_constructed(cons)?;
        Mode::Der.decode(signed_data.data().as_slice(), |cons| {
            cons.take_sequence(|cons| {
                if let Some(version) = cons.take_opt_u8()? {
                    if version != 1 {
                        return Err(cons.content_err("invalid CRL version"))
                    }
                }
                cons.skip_one()?; // signature
                let issuer = Name::take_from(cons)?;
                let this_update = Time::take_from(cons)?;
                let next_update = Time::take_opt_from(cons)?;
                let revoked_certs = cons.take_opt_sequence(|cons| {
                    let mut res = Vec::new();
                    while let Some(entry) = CrlEntry::take_opt_from(cons)? {
                        res.push(entry)
                    }
                    Ok(res)
                })?.unwrap_or_default();
                let extensions = cons.take_opt_constructed_if(
                    Tag::CTX_0, Extensions::take_from
                )?.unwrap_or_default();
                Ok(Crl {
                    signed_data: signed_data.clone(),
                    issuer,
                    this_update,
                    next_update,
                    revoked_certs,
                    authority_key_id: extensions.authority_key_id,
                    crl_number: extensions.crl_number,
                    unsupported_critical: extensions.unsupported_critical,
                })
            })
        }).map_err(DecodeError::convert)
    }

    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    pub fn this_update(&self) -> Time {
        self.this_update
    }

    pub fn next_update(&self) -> Option<Time> {
        self.next_update
    }

    pub fn authority_key_identifier(&self) -> Option<&KeyIdentifier> {
        self.authority_key_id.as_ref()
    }

    pub fn crl_number(&self) -> Option<&Serial> {
        self.crl_number.as_ref()
    }

    /// Returns the entries of the list.
    pub fn entries(&self) -> &[CrlEntry] {
        &self.revoked_certs
    }

    /// Returns the entry for the given serial number if it is on the list.
    pub fn find(&self, serial: &Serial) -> Option<&CrlEntry> {
        self.revoked_certs.iter().find(|entry| entry.serial() == serial)
    }

    /// Returns whether the given serial number is on the list.
    pub fn contains(&self, serial: &Serial) -> bool {
        self.find(serial).is_some()
    }

    /// Verifies the list’s signature against the provided public key.
    pub fn verify_signature(
        &self,
        public_key: &PublicKey
    ) -> Result<(), SignatureVerificationError> {
        self.signed_data.verify_signature(public_key)
    }

    /// Checks that the list can be used for certificates of `issuer`.
    ///
    /// The list must have been issued and signed by `issuer`. It must not
    /// contain critical extensions we don’t understand and it must be
    /// current at `now`, allowing for the given clock skew. A list without
    /// a next update time never gets stale.
    pub fn verify(
        &self, issuer: &Cert, now: Time, skew: TimeDelta
    ) -> Result<(), CrlError> {
        if self.issuer != *issuer.subject() {
            return Err(CrlError::IssuerMismatch)
        }
        if let (Some(aki), Some(ski)) = (
            self.authority_key_identifier(), issuer.subject_key_identifier()
        ) {
            if aki != ski {
                return Err(CrlError::IssuerMismatch)
            }
        }
        if !issuer.may_sign_crls() {
            return Err(CrlError::NotAuthorized)
        }
        if let Some(oid) = self.unsupported_critical.as_ref() {
            return Err(CrlError::UnsupportedCriticalExtension(oid.clone()))
        }
        self.verify_signature(issuer.public_key())?;
        // Overflowing bounds are treated as no bound at all.
        if now.checked_add(skew).is_some_and(|latest| {
            self.this_update > latest
        }) {
            return Err(CrlError::NotYetValid)
        }
        if let Some(next_update) = self.next_update {
            if now.checked_sub(skew).is_some_and(|earliest| {
                next_update < earliest
            }) {
                return Err(CrlError::Stale)
            }
        }
        Ok(())
    }
}


//------------ CrlEntry ------------------------------------------------------

/// An entry in the revoked certificates list.
#[derive(Clone, Debug)]
pub struct CrlEntry {
    /// The serial number of the revoked certificate.
    user_certificate: Serial,

    /// The time of revocation.
    revocation_date: Time,

    /// The reason code if present.
    reason: Option<u8>,
}

impl CrlEntry {
    /// Takes an optional CRL entry from the beginning of a contructed value.
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(Self::from_constructed)
    }

    /// Parses the content of a CRL entry.
    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let user_certificate = Serial::take_from(cons)?;
        let revocation_date = Time::take_from(cons)?;
        let mut reason = None;
        cons.take_opt_sequence(|cons| {
            while let Some(()) = cons.take_opt_sequence(|cons| {
                let id = Oid::take_from(cons)?;
                let _critical = cons.take_opt_bool()?;
                let value = OctetString::take_from(cons)?;
                if id == oid::CE_CRL_REASONS {
                    reason = Some(Mode::Der.decode(value, |cons| {
                        cons.take_primitive_if(Tag::ENUMERATED, |prim| {
                            prim.to_u8()
                        })
                    }).map_err(DecodeError::convert)?);
                }
                Ok(())
            })? { }
            Ok(())
        })?;
        Ok(CrlEntry { user_certificate, revocation_date, reason })
    }

    pub fn serial(&self) -> &Serial {
        &self.user_certificate
    }

    pub fn revocation_date(&self) -> Time {
        self.revocation_date
    }

    /// Returns the CRLReason code of the entry if present.
    pub fn reason(&self) -> Option<u8> {
        self.reason
    }
}


//------------ Extensions ----------------------------------------------------

/// The extensions of a CRL we care about.
#[derive(Clone, Debug, Default)]
struct Extensions {
    authority_key_id: Option<KeyIdentifier>,
    crl_number: Option<Serial>,
    unsupported_critical: Option<Oid<Bytes>>,
}

impl Extensions {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let mut res = Extensions::default();
        cons.take_sequence(|cons| {
            while let Some(()) = cons.take_opt_sequence(|cons| {
                let id = Oid::take_from(cons)?;
                let critical = cons.take_opt_bool()?.unwrap_or(false);
                let value = OctetString::take_from(cons)?;
                Mode::Der.decode(value, |cons| {
                    if id == oid::CE_AUTHORITY_KEY_IDENTIFIER {
                        res.authority_key_id = cons.take_sequence(|cons| {
                            let id = cons.take_opt_value_if(
                                Tag::CTX_0, KeyIdentifier::from_content
                            )?;
                            cons.skip_all()?;
                            Ok(id)
                        })?;
                        Ok(())
                    }
                    else if id == oid::CE_CRL_NUMBER {
                        res.crl_number = Some(Serial::take_from(cons)?);
                        Ok(())
                    }
                    else {
                        // Delta and indirect CRLs are never usable.
                        let unsupported = critical
                            || id == oid::CE_DELTA_CRL_INDICATOR
                            || id == oid::CE_ISSUING_DISTRIBUTION_POINT;
                        if unsupported && res.unsupported_critical.is_none() {
                            res.unsupported_critical = Some(id.clone());
                        }
                        cons.skip_all()
                    }
                }).map_err(DecodeError::convert)
            })? { }
            Ok(())
        })?;
        Ok(res)
    }
}


//------------ CrlError ------------------------------------------------------

/// A CRL cannot be used to determine revocation status.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CrlError {
    /// The CRL was not issued by the certificate’s issuer.
    IssuerMismatch,

    /// The issuer’s key usage does not allow signing CRLs.
    NotAuthorized,

    /// The CRL contains a critical extension we don’t support.
    UnsupportedCriticalExtension(Oid<Bytes>),

    /// The signature of the CRL is invalid.
    BadSignature(SignatureVerificationError),

    /// The CRL was issued in the future.
    NotYetValid,

    /// The next update time of the CRL has passed.
    Stale,
}

impl From<SignatureVerificationError> for CrlError {
    fn from(err: SignatureVerificationError) -> Self {
        CrlError::BadSignature(err)
    }
}

impl fmt::Display for CrlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CrlError::IssuerMismatch => {
                f.write_str("CRL issued by a different CA")
            }
            CrlError::NotAuthorized => {
                f.write_str("CRL issuer not authorized to sign CRLs")
            }
            CrlError::UnsupportedCriticalExtension(ref oid) => {
                write!(f, "unsupported critical CRL extension {}", oid)
            }
            CrlError::BadSignature(ref err) => {
                write!(f, "invalid CRL signature: {}", err)
            }
            CrlError::NotYetValid => f.write_str("CRL not yet valid"),
            CrlError::Stale => f.write_str("CRL is stale"),
        }
    }
}

impl error::Error for CrlError { }


//============ Tests =========================================================
