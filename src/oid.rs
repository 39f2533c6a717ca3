//! The object identifiers used in this crate.
//!
//! This module collects all the object indentifiers used at various places
//! in this crate in one central place. They are public so you can refer to
//! them should that ever become necessary.

use bcder::{ConstOid, Oid};


//------------ Digest Algorithms ---------------------------------------------

/// [RFC 3279](https://tools.ietf.org/html/rfc3279) `id-sha1`
pub const SHA1: ConstOid = Oid(&[43, 14, 3, 2, 26]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha224`
///
/// Recognized so it can be reported as unsupported by name.
pub const SHA224: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 4]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha256`
///
/// Identifies the SHA-256 one-way hash function.
pub const SHA256: ConstOid
    = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha384`
pub const SHA384: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 2]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-sha512`
pub const SHA512: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 3]);


//------------ Signature and Key Algorithms ----------------------------------

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `rsaEncryption`
///
/// Identifies an RSA public key with no limitation to either RSASSA-PSS or
/// RSAES-OEAP.
pub const RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-mgf1`
pub const MGF1: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 8]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `id-RSASSA-PSS`
pub const RSASSA_PSS: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 10]);

/// [RFC 3279](https://tools.ietf.org/html/rfc3279) `sha1WithRSAEncryption`
pub const SHA1_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha256WithRSAEncryption`
///
/// Identifies the PKCS #1 version 1.5 signature algorithm with SHA-256.
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha384WithRSAEncryption`
pub const SHA384_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);

/// [RFC 4055](https://tools.ietf.org/html/rfc4055) `sha512WithRSAEncryption`
pub const SHA512_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);

/// [RFC 5480](https://tools.ietf.org/html/rfc5480) `id-ecPublicKey`
pub const EC_PUBLIC_KEY: ConstOid = Oid(&[42, 134, 72, 206, 61, 2, 1]);


//------------ CMS Content Types and Attributes ------------------------------

pub const DATA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 1]);
pub const SIGNED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 2]);
pub const CONTENT_TYPE: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 3]);
pub const MESSAGE_DIGEST: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 4]);
pub const SIGNING_TIME: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 5]);


//------------ Name Attributes -----------------------------------------------

pub const AT_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]); // 2 5 4 3
pub const AT_SURNAME: ConstOid = Oid(&[85, 4, 4]);
pub const AT_SERIAL_NUMBER: ConstOid = Oid(&[85, 4, 5]); // 2 5 4 5
pub const AT_COUNTRY_NAME: ConstOid = Oid(&[85, 4, 6]);
pub const AT_LOCALITY_NAME: ConstOid = Oid(&[85, 4, 7]);
pub const AT_STATE_OR_PROVINCE_NAME: ConstOid = Oid(&[85, 4, 8]);
pub const AT_STREET_ADDRESS: ConstOid = Oid(&[85, 4, 9]);
pub const AT_ORGANIZATION_NAME: ConstOid = Oid(&[85, 4, 10]);
pub const AT_ORGANIZATIONAL_UNIT_NAME: ConstOid = Oid(&[85, 4, 11]);
pub const AT_TITLE: ConstOid = Oid(&[85, 4, 12]);
pub const AT_GIVEN_NAME: ConstOid = Oid(&[85, 4, 42]);
pub const AT_PSEUDONYM: ConstOid = Oid(&[85, 4, 65]);
pub const AT_EMAIL_ADDRESS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 1]);


//------------ Certificate Extensions ----------------------------------------

pub const CE_AUTHORITY_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 35]);
pub const CE_BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);
pub const CE_CRL_DISTRIBUTION_POINTS: ConstOid = Oid(&[85, 29, 31]);
pub const CE_EXTENDED_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);
pub const CE_KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);
pub const CE_SUBJECT_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 14]);


//------------ CRL Extensions ------------------------------------------------

pub const CE_CRL_NUMBER: ConstOid = Oid(&[85, 29, 20]);
pub const CE_CRL_REASONS: ConstOid = Oid(&[85, 29, 21]);
pub const CE_DELTA_CRL_INDICATOR: ConstOid = Oid(&[85, 29, 27]);
pub const CE_ISSUING_DISTRIBUTION_POINT: ConstOid = Oid(&[85, 29, 28]);

pub const PE_AUTHORITY_INFO_ACCESS: ConstOid
    = Oid(&[43, 6, 1, 5, 5, 7, 1, 1]);

pub const AD_OCSP: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 48, 1]);
pub const AD_CA_ISSUERS: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 48, 2]);

pub const KP_OCSP_SIGNING: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 3, 9]);


//------------ OCSP ----------------------------------------------------------

/// [RFC 6960](https://tools.ietf.org/html/rfc6960) `id-pkix-ocsp-basic`
pub const PKIX_OCSP_BASIC: ConstOid
    = Oid(&[43, 6, 1, 5, 5, 7, 48, 1, 1]);

