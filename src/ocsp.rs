//! The Online Certificate Status Protocol.
//!
//! This module implements the client side of OCSP as defined in RFC 6960.
//! Requests are identified by a [`CertId`] which is always built using
//! SHA-1, as responders are only required to support this algorithm. The
//! encoded request can be created via [`CertId::encode_request`] and the
//! DER-encoded response parsed with [`OcspResponse::decode`].
//!
//! Before its content can be trusted, a response needs to be checked via
//! [`OcspResponse::verify`]. This makes sure that the response was signed
//! either by the issuer of the certificate in question or by a responder
//! the issuer has delegated this task to, and that it is current.

use std::{error, fmt};
use bcder::{decode, encode, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use chrono::TimeDelta;
use log::debug;
use crate::oid;
use crate::cert::Cert;
use crate::crypto::{
    DigestAlgorithm, KeyIdentifier, PublicKey, SignatureVerificationError
};
use crate::x509::{Name, Serial, SignedData, Time};


//------------ CertId --------------------------------------------------------

/// The identifier of a certificate in OCSP requests and responses.
///
/// ```text
/// CertID          ::=     SEQUENCE {
///     hashAlgorithm       AlgorithmIdentifier,
///     issuerNameHash      OCTET STRING, -- Hash of issuer's DN
///     issuerKeyHash       OCTET STRING, -- Hash of issuer's public key
///     serialNumber        CertificateSerialNumber }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CertId {
    hash_algorithm: Oid<Bytes>,
    issuer_name_hash: Bytes,
    issuer_key_hash: Bytes,
    serial_number: Serial,
}

impl CertId {
    /// Creates the identifier for `cert` issued by `issuer`.
    pub fn new(cert: &Cert, issuer: &Cert) -> Self {
        let name_hash = DigestAlgorithm::Sha1.digest(
            issuer.subject().as_slice()
        );
        let key_hash = issuer.public_key().key_identifier();
        CertId {
            hash_algorithm: Oid(Bytes::from_static(oid::SHA1.0)),
            issuer_name_hash: Bytes::copy_from_slice(name_hash.as_ref()),
            issuer_key_hash: Bytes::copy_from_slice(key_hash.as_slice()),
            serial_number: cert.serial_number().clone(),
        }
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let hash_algorithm = cons.take_sequence(|cons| {
                let oid = Oid::take_from(cons)?;
                cons.skip_all()?;
                Ok(oid)
            })?;
            Ok(CertId {
                hash_algorithm,
                issuer_name_hash: OctetString::take_from(cons)?.into_bytes(),
                issuer_key_hash: OctetString::take_from(cons)?.into_bytes(),
                serial_number: Serial::take_from(cons)?,
            })
        })
    }

    pub fn serial_number(&self) -> &Serial {
        &self.serial_number
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            encode::sequence((
                self.hash_algorithm.encode_ref(),
                ().encode(),
            )),
            OctetString::encode_slice(self.issuer_name_hash.as_ref()),
            OctetString::encode_slice(self.issuer_key_hash.as_ref()),
            self.serial_number.encode_ref(),
        ))
    }

    /// Returns the DER encoded OCSP request for this identifier.
    ///
    /// ```text
    /// OCSPRequest     ::=     SEQUENCE {
    ///     tbsRequest                  TBSRequest,
    ///     optionalSignature   [0]     EXPLICIT Signature OPTIONAL }
    ///
    /// TBSRequest      ::=     SEQUENCE {
    ///     version             [0]     EXPLICIT Version DEFAULT v1,
    ///     requestorName       [1]     EXPLICIT GeneralName OPTIONAL,
    ///     requestList                 SEQUENCE OF Request,
    ///     requestExtensions   [2]     EXPLICIT Extensions OPTIONAL }
    ///
    /// Request         ::=     SEQUENCE {
    ///     reqCert                     CertID,
    ///     singleRequestExtensions     [0] EXPLICIT Extensions OPTIONAL }
    /// ```
    pub fn encode_request(&self) -> Bytes {
        encode::sequence( // OCSPRequest
            encode::sequence( // TBSRequest
                encode::sequence( // requestList
                    encode::sequence( // Request
                        self.encode_ref()
                    )
                )
            )
        ).to_captured(Mode::Der).into_bytes()
    }
}


//------------ OcspResponse --------------------------------------------------

/// A parsed OCSP response.
///
/// ```text
/// OCSPResponse ::= SEQUENCE {
///    responseStatus         OCSPResponseStatus,
///    responseBytes          [0] EXPLICIT ResponseBytes OPTIONAL }
///
/// ResponseBytes ::=       SEQUENCE {
///    responseType   OBJECT IDENTIFIER,
///    response       OCTET STRING }
/// ```
///
/// Only basic responses are supported.
#[derive(Clone, Debug)]
pub struct OcspResponse {
    status: ResponseStatus,
    basic: Option<BasicResponse>,
}

impl OcspResponse {
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let status = ResponseStatus::take_from(cons)?;
            let basic = cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                cons.take_sequence(|cons| {
                    oid::PKIX_OCSP_BASIC.skip_if(cons)?;
                    let bytes = OctetString::take_from(cons)?;
                    Mode::Der.decode(
                        bytes, BasicResponse::take_from
                    ).map_err(DecodeError::convert)
                })
            })?;
            if status == ResponseStatus::Successful && basic.is_none() {
                return Err(cons.content_err(
                    "successful OCSP response without response bytes"
                ))
            }
            Ok(OcspResponse { status, basic })
        })
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Returns the responses for individual certificates.
    pub fn responses(&self) -> &[SingleResponse] {
        match self.basic {
            Some(ref basic) => &basic.responses,
            None => &[]
        }
    }

    /// Returns the certificates included in the response.
    pub fn certs(&self) -> &[Cert] {
        match self.basic {
            Some(ref basic) => &basic.certs,
            None => &[]
        }
    }

    /// Verifies the response and returns the status of a certificate.
    ///
    /// The response must be successful and signed by either `issuer`
    /// itself or a delegated responder, i.e., a certificate included in
    /// the response that was issued by `issuer`, carries the OCSP signing
    /// extended key usage, and is valid at `now`. It must contain a
    /// response for `cert_id` that is current at `now`, allowing for
    /// `skew` in both directions. A response without a next update time
    /// is considered stale once it is older than `max_age`.
    pub fn verify(
        &self,
        cert_id: &CertId,
        issuer: &Cert,
        now: Time,
        skew: TimeDelta,
        max_age: TimeDelta,
    ) -> Result<CertStatus, OcspError> {
        let basic = match self.basic {
            Some(ref basic) if self.status == ResponseStatus::Successful => {
                basic
            }
            _ => return Err(OcspError::Unsuccessful(self.status)),
        };
        let single = basic.responses.iter().find(|single| {
            single.cert_id == *cert_id
        }).ok_or(OcspError::NoMatchingResponse)?;

        let public_key = basic.responder_key(issuer, now)?;
        basic.signed_data.verify_signature(public_key)?;

        // Overflowing bounds are treated as no bound at all.
        if now.checked_add(skew).is_some_and(|latest| {
            single.this_update > latest
        }) {
            return Err(OcspError::NotYetValid)
        }
        let expires = match single.next_update {
            Some(next_update) => Some(next_update),
            None => single.this_update.checked_add(max_age),
        };
        if let Some(expires) = expires {
            if now.checked_sub(skew).is_some_and(|earliest| {
                expires < earliest
            }) {
                return Err(OcspError::Stale)
            }
        }
        Ok(single.status)
    }
}


//------------ ResponseStatus ------------------------------------------------

/// The status of an OCSP response.
///
/// ```text
/// OCSPResponseStatus ::= ENUMERATED {
///     successful            (0),  -- Response has valid confirmations
///     malformedRequest      (1),  -- Illegal confirmation request
///     internalError         (2),  -- Internal error in issuer
///     tryLater              (3),  -- Try again later
///                                 -- (4) is not used
///     sigRequired           (5),  -- Must sign the request
///     unauthorized          (6)   -- Request unauthorized
/// }
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseStatus {
    Successful,
    MalformedRequest,
    InternalError,
    TryLater,
    SigRequired,
    Unauthorized,
}

impl ResponseStatus {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive_if(Tag::ENUMERATED, |prim| {
            match prim.to_u8()? {
                0 => Ok(ResponseStatus::Successful),
                1 => Ok(ResponseStatus::MalformedRequest),
                2 => Ok(ResponseStatus::InternalError),
                3 => Ok(ResponseStatus::TryLater),
                5 => Ok(ResponseStatus::SigRequired),
                6 => Ok(ResponseStatus::Unauthorized),
                _ => Err(prim.content_err("invalid OCSP response status"))
            }
        })
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ResponseStatus::Successful => "successful",
            ResponseStatus::MalformedRequest => "malformedRequest",
            ResponseStatus::InternalError => "internalError",
            ResponseStatus::TryLater => "tryLater",
            ResponseStatus::SigRequired => "sigRequired",
            ResponseStatus::Unauthorized => "unauthorized",
        })
    }
}


//------------ BasicResponse -------------------------------------------------

/// The content of a basic OCSP response.
///
/// ```text
/// BasicOCSPResponse       ::= SEQUENCE {
///    tbsResponseData      ResponseData,
///    signatureAlgorithm   AlgorithmIdentifier,
///    signature            BIT STRING,
///    certs            [0] EXPLICIT SEQUENCE OF Certificate OPTIONAL }
///
/// ResponseData ::= SEQUENCE {
///    version              [0] EXPLICIT Version DEFAULT v1,
///    responderID              ResponderID,
///    producedAt               GeneralizedTime,
///    responses                SEQUENCE OF SingleResponse,
///    responseExtensions   [1] EXPLICIT Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug)]
struct BasicResponse {
    signed_data: SignedData,
    responder_id: ResponderId,
    produced_at: Time,
    responses: Vec<SingleResponse>,
    certs: Vec<Cert>,
}

impl BasicResponse {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let signed_data = SignedData::from_constructed(cons)?;
            let certs = cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                cons.take_sequence(|cons| {
                    let mut certs = Vec::new();
                    while let Some(cert) = Cert::take_opt_from(cons)? {
                        certs.push(cert)
                    }
                    Ok(certs)
                })
            })?.unwrap_or_default();
            let (responder_id, produced_at, responses) = Mode::Der.decode(
                signed_data.data().as_slice(),
                |cons| {
                    cons.take_sequence(|cons| {
                        if let Some(version) = cons.take_opt_constructed_if(
                            Tag::CTX_0, |cons| cons.take_u8()
                        )? {
                            if version != 0 {
                                return Err(cons.content_err(
                                    "invalid OCSP response version"
                                ))
                            }
                        }
                        let responder_id = ResponderId::take_from(cons)?;
                        let produced_at = Time::take_generalized_from(cons)?;
                        let responses = cons.take_sequence(|cons| {
                            let mut res = Vec::new();
                            while let Some(single) =
                                SingleResponse::take_opt_from(cons)?
                            {
                                res.push(single)
                            }
                            Ok(res)
                        })?;
                        cons.take_opt_constructed_if(Tag::CTX_1, |cons| {
                            cons.skip_all()
                        })?;
                        Ok((responder_id, produced_at, responses))
                    })
                }
            ).map_err(DecodeError::convert)?;
            Ok(BasicResponse {
                signed_data, responder_id, produced_at, responses, certs
            })
        })
    }

    /// Determines the key that should have signed the response.
    fn responder_key<'a>(
        &'a self, issuer: &'a Cert, now: Time
    ) -> Result<&'a PublicKey, OcspError> {
        if self.responder_id.matches(issuer) {
            debug!("OCSP response signed by certificate issuer.");
            return Ok(issuer.public_key())
        }
        let responder = self.certs.iter().find(|cert| {
            self.responder_id.matches(cert)
        }).ok_or(OcspError::UnknownResponder)?;
        if !responder.is_issued_by(issuer)
            || responder.verify_signature(issuer.public_key()).is_err()
        {
            debug!(
                "OCSP responder '{}' not issued by '{}'.",
                responder.subject(), issuer.subject()
            );
            return Err(OcspError::UnauthorizedResponder)
        }
        if !responder.is_ocsp_signer() {
            debug!(
                "OCSP responder '{}' lacks OCSP signing key usage.",
                responder.subject()
            );
            return Err(OcspError::UnauthorizedResponder)
        }
        if !responder.is_valid_at(now) {
            return Err(OcspError::UnauthorizedResponder)
        }
        debug!(
            "OCSP response signed by delegated responder '{}' at {}.",
            responder.subject(), self.produced_at
        );
        Ok(responder.public_key())
    }
}


//------------ ResponderId ---------------------------------------------------

/// The identity of an OCSP responder.
///
/// ```text
/// ResponderID ::= CHOICE {
///    byName               [1] Name,
///    byKey                [2] KeyHash }
/// ```
#[derive(Clone, Debug)]
enum ResponderId {
    ByName(Name),
    ByKey(KeyIdentifier),
}

impl ResponderId {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_value(|tag, content| {
            let cons = content.as_constructed()?;
            if tag == Tag::CTX_1 {
                Name::take_from(cons).map(ResponderId::ByName)
            }
            else if tag == Tag::CTX_2 {
                KeyIdentifier::take_from(cons).map(ResponderId::ByKey)
            }
            else {
                Err(cons.content_err("invalid OCSP responder ID"))
            }
        })
    }

    fn matches(&self, cert: &Cert) -> bool {
        match *self {
            ResponderId::ByName(ref name) => name == cert.subject(),
            ResponderId::ByKey(ref key_id) => {
                *key_id == cert.public_key().key_identifier()
            }
        }
    }
}


//------------ SingleResponse ------------------------------------------------

/// The response for a single certificate.
///
/// ```text
/// SingleResponse ::= SEQUENCE {
///    certID                       CertID,
///    certStatus                   CertStatus,
///    thisUpdate                   GeneralizedTime,
///    nextUpdate         [0]       EXPLICIT GeneralizedTime OPTIONAL,
///    singleExtensions   [1]       EXPLICIT Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug)]
pub struct SingleResponse {
    cert_id: CertId,
    status: CertStatus,
    this_update: Time,
    next_update: Option<Time>,
}

impl SingleResponse {
    fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(|cons| {
            let cert_id = CertId::take_from(cons)?;
            let status = CertStatus::take_from(cons)?;
            let this_update = Time::take_generalized_from(cons)?;
            let next_update = cons.take_opt_constructed_if(
                Tag::CTX_0, Time::take_generalized_from
            )?;
            cons.take_opt_constructed_if(Tag::CTX_1, |cons| cons.skip_all())?;
            Ok(SingleResponse { cert_id, status, this_update, next_update })
        })
    }

    pub fn cert_id(&self) -> &CertId {
        &self.cert_id
    }

    pub fn status(&self) -> CertStatus {
        self.status
    }

    pub fn this_update(&self) -> Time {
        self.this_update
    }

    pub fn next_update(&self) -> Option<Time> {
        self.next_update
    }
}


//------------ CertStatus ----------------------------------------------------

/// The revocation status of a certificate.
///
/// ```text
/// CertStatus ::= CHOICE {
///     good        [0]     IMPLICIT NULL,
///     revoked     [1]     IMPLICIT RevokedInfo,
///     unknown     [2]     IMPLICIT UnknownInfo }
///
/// RevokedInfo ::= SEQUENCE {
///     revocationTime              GeneralizedTime,
///     revocationReason    [0]     EXPLICIT CRLReason OPTIONAL }
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertStatus {
    Good,
    Revoked { time: Time, reason: Option<u8> },
    Unknown,
}

impl CertStatus {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_value(|tag, content| {
            if tag == Tag::CTX_0 {
                content.as_primitive()?.skip_all()?;
                Ok(CertStatus::Good)
            }
            else if tag == Tag::CTX_1 {
                let cons = content.as_constructed()?;
                let time = Time::take_generalized_from(cons)?;
                let reason = cons.take_opt_constructed_if(
                    Tag::CTX_0, |cons| {
                        cons.take_primitive_if(Tag::ENUMERATED, |prim| {
                            prim.to_u8()
                        })
                    }
                )?;
                Ok(CertStatus::Revoked { time, reason })
            }
            else if tag == Tag::CTX_2 {
                content.as_primitive()?.skip_all()?;
                Ok(CertStatus::Unknown)
            }
            else {
                Err(content.content_err("invalid OCSP certificate status"))
            }
        })
    }
}


//------------ OcspError -----------------------------------------------------

/// An OCSP response cannot be used to determine revocation status.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OcspError {
    /// The responder did not return a successful response.
    Unsuccessful(ResponseStatus),

    /// The response does not contain the certificate we asked for.
    NoMatchingResponse,

    /// The responder certificate is not part of the response.
    UnknownResponder,

    /// The responder is not authorized to answer for the issuer.
    UnauthorizedResponder,

    /// The signature of the response is invalid.
    BadSignature(SignatureVerificationError),

    /// The response was issued in the future.
    NotYetValid,

    /// The next update time of the response has passed.
    Stale,
}

impl From<SignatureVerificationError> for OcspError {
    fn from(err: SignatureVerificationError) -> Self {
        OcspError::BadSignature(err)
    }
}

impl fmt::Display for OcspError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OcspError::Unsuccessful(status) => {
                write!(f, "OCSP responder returned status '{}'", status)
            }
            OcspError::NoMatchingResponse => {
                f.write_str("no response for certificate in OCSP response")
            }
            OcspError::UnknownResponder => {
                f.write_str("OCSP responder certificate not found")
            }
            OcspError::UnauthorizedResponder => {
                f.write_str("OCSP responder not authorized by issuer")
            }
            OcspError::BadSignature(ref err) => {
                write!(f, "invalid OCSP response signature: {}", err)
            }
            OcspError::NotYetValid => {
                f.write_str("OCSP response not yet valid")
            }
            OcspError::Stale => f.write_str("OCSP response is stale"),
        }
    }
}

impl error::Error for OcspError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn now() -> Time {
        Time::utc(2024, 6, 2, 0, 0, 0)
    }

    fn skew() -> TimeDelta {
        TimeDelta::minutes(5)
    }

    fn max_age() -> TimeDelta {
        TimeDelta::hours(1)
    }

    fn issuer() -> Cert {
        Cert::decode(
            include_bytes!("../test-data/issuing-ca.der").as_ref()
        ).unwrap()
    }

    fn cert_id() -> CertId {
        let cert = Cert::decode(
            include_bytes!("../test-data/signer-current.der").as_ref()
        ).unwrap();
        CertId::new(&cert, &issuer())
    }

    fn verify(der: &[u8]) -> Result<CertStatus, OcspError> {
        OcspResponse::decode(der).unwrap().verify(
            &cert_id(), &issuer(), now(), skew(), max_age()
        )
    }

    #[test]
    fn cert_id_matches_response() {
        let response = OcspResponse::decode(
            include_bytes!("../test-data/ocsp-good.der").as_ref()
        ).unwrap();
        assert_eq!(response.status(), ResponseStatus::Successful);
        assert_eq!(response.responses().len(), 1);
        assert_eq!(response.responses()[0].cert_id(), &cert_id());
        assert_eq!(
            response.responses()[0].cert_id().serial_number(),
            &Serial::from(0xC0FFEE)
        );
        assert!(response.certs().is_empty());
    }

    #[test]
    fn encode_request() {
        let request = cert_id().encode_request();
        let decoded = Mode::Der.decode(request.as_ref(), |cons| {
            cons.take_sequence(|cons| {
                cons.take_sequence(|cons| {
                    cons.take_sequence(|cons| {
                        cons.take_sequence(CertId::take_from)
                    })
                })
            })
        }).unwrap();
        assert_eq!(decoded, cert_id());
    }

    #[test]
    fn verify_good() {
        assert_eq!(
            verify(include_bytes!("../test-data/ocsp-good.der")).unwrap(),
            CertStatus::Good
        );
    }

    #[test]
    fn verify_revoked() {
        assert_eq!(
            verify(include_bytes!("../test-data/ocsp-revoked.der")).unwrap(),
            CertStatus::Revoked {
                time: Time::utc(2024, 5, 1, 12, 0, 0),
                reason: None,
            }
        );
    }

    #[test]
    fn verify_unknown() {
        assert_eq!(
            verify(include_bytes!("../test-data/ocsp-unknown.der")).unwrap(),
            CertStatus::Unknown
        );
    }

    #[test]
    fn verify_delegated() {
        let response = OcspResponse::decode(
            include_bytes!("../test-data/ocsp-delegated.der").as_ref()
        ).unwrap();
        assert_eq!(response.certs().len(), 1);
        assert_eq!(
            response.verify(
                &cert_id(), &issuer(), now(), skew(), max_age()
            ).unwrap(),
            CertStatus::Good
        );
        assert!(matches!(
            verify(include_bytes!("../test-data/ocsp-not-delegated.der")),
            Err(OcspError::UnauthorizedResponder)
        ));
    }

    #[test]
    fn verify_failures() {
        assert!(matches!(
            verify(include_bytes!("../test-data/ocsp-stale.der")),
            Err(OcspError::Stale)
        ));
        assert!(matches!(
            verify(include_bytes!("../test-data/ocsp-other-cert.der")),
            Err(OcspError::NoMatchingResponse)
        ));
        assert!(matches!(
            verify(include_bytes!("../test-data/ocsp-wrong-signer.der")),
            Err(OcspError::UnknownResponder)
        ));
        assert!(matches!(
            verify(include_bytes!("../test-data/ocsp-unauthorized.der")),
            Err(OcspError::Unsuccessful(ResponseStatus::Unauthorized))
        ));
        assert!(matches!(
            OcspResponse::decode(include_bytes!(
                "../test-data/ocsp-good.der"
            ).as_ref()).unwrap().verify(
                &cert_id(), &issuer(), Time::utc(2024, 5, 1, 0, 0, 0),
                skew(), max_age()
            ),
            Err(OcspError::NotYetValid)
        ));
    }

    #[test]
    fn verify_without_next_update() {
        let response = OcspResponse::decode(
            include_bytes!("../test-data/ocsp-no-next-update.der").as_ref()
        ).unwrap();
        assert!(response.responses()[0].next_update().is_none());

        // Produced a day before now.
        assert!(matches!(
            response.verify(
                &cert_id(), &issuer(), now(), skew(), max_age()
            ),
            Err(OcspError::Stale)
        ));
        assert_eq!(
            response.verify(
                &cert_id(), &issuer(), now(), skew(), TimeDelta::days(2)
            ),
            Ok(CertStatus::Good)
        );
        assert_eq!(
            response.verify(
                &cert_id(), &issuer(), now(), skew(), TimeDelta::MAX
            ),
            Ok(CertStatus::Good)
        );
    }

    #[test]
    fn verify_with_huge_skew() {
        for der in [
            &include_bytes!("../test-data/ocsp-good.der")[..],
            &include_bytes!("../test-data/ocsp-stale.der")[..],
        ] {
            assert_eq!(
                OcspResponse::decode(der).unwrap().verify(
                    &cert_id(), &issuer(), now(), TimeDelta::MAX, max_age()
                ),
                Ok(CertStatus::Good)
            );
        }
    }
}
