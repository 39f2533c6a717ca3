//! Fetching OCSP responses and CRLs.
//!
//! Revocation checking talks to the outside world through the [`Fetcher`]
//! trait. The default implementation [`HttpFetcher`] uses `reqwest`.

use std::{error, fmt};
use std::future::Future;
use std::time::Duration;
use bytes::{Bytes, BytesMut};
use log::debug;
use reqwest::header;
use crate::uri;
use super::policy::RevocationPolicy;


//------------ Fetcher -------------------------------------------------------

/// A type that can retrieve revocation information.
pub trait Fetcher {
    /// Posts a DER encoded OCSP request and returns the response.
    fn post_ocsp(
        &self, uri: &uri::Http, request: Bytes
    ) -> impl Future<Output = Result<Bytes, FetchError>> + Send;

    /// Retrieves a DER encoded CRL.
    fn get_crl(
        &self, uri: &uri::Http
    ) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}


//------------ HttpFetcher ---------------------------------------------------

/// A fetcher using HTTP.
///
/// OCSP requests are sent via POST as described in appendix A of RFC 6960.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_size: usize,
}

impl HttpFetcher {
    const USER_AGENT: &'static str = concat!(
        "mobileid-verifier/", env!("CARGO_PKG_VERSION")
    );

    /// Creates a new fetcher.
    ///
    /// Each request is abandoned after `timeout`. Responses larger than
    /// `max_size` octets are rejected.
    pub fn new(
        timeout: Duration, max_size: usize
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()?;
        Ok(HttpFetcher { client, max_size })
    }

    /// Creates a new fetcher using the limits of the policy.
    pub fn from_policy(
        policy: &RevocationPolicy
    ) -> Result<Self, FetchError> {
        Self::new(policy.timeout, policy.max_response_size)
    }

    /// Reads the body of a response, enforcing the size limit.
    async fn read_body(
        &self, mut response: reqwest::Response
    ) -> Result<Bytes, FetchError> {
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()))
        }
        if let Some(len) = response.content_length() {
            if len > self.max_size as u64 {
                return Err(FetchError::TooLarge(self.max_size))
            }
        }
        let mut res = BytesMut::new();
        while let Some(chunk) = response.chunk().await? {
            if res.len() + chunk.len() > self.max_size {
                return Err(FetchError::TooLarge(self.max_size))
            }
            res.extend_from_slice(&chunk);
        }
        Ok(res.freeze())
    }
}

impl Fetcher for HttpFetcher {
    async fn post_ocsp(
        &self, uri: &uri::Http, request: Bytes
    ) -> Result<Bytes, FetchError> {
        debug!("Sending OCSP request to {}.", uri);
        let response = self.client.post(uri.as_string())
            .header(header::CONTENT_TYPE, "application/ocsp-request")
            .header(header::ACCEPT, "application/ocsp-response")
            .body(request)
            .send().await?;
        self.read_body(response).await
    }

    async fn get_crl(&self, uri: &uri::Http) -> Result<Bytes, FetchError> {
        debug!("Fetching CRL from {}.", uri);
        let response = self.client.get(uri.as_string()).send().await?;
        self.read_body(response).await
    }
}


//------------ FetchError ----------------------------------------------------

/// Retrieving revocation information failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchError {
    /// The request failed on the transport level.
    Transport(String),

    /// The server responded with a non-success status code.
    Status(u16),

    /// The response exceeded the given size limit.
    TooLarge(usize),

    /// The request didn’t finish in time.
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        }
        else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FetchError::Transport(ref err) => f.write_str(err),
            FetchError::Status(status) => {
                write!(f, "server responded with status {}", status)
            }
            FetchError::TooLarge(limit) => {
                write!(f, "response larger than {} octets", limit)
            }
            FetchError::Timeout => f.write_str("request timed out"),
        }
    }
}

impl error::Error for FetchError { }
