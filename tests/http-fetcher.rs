//! Tests for fetching revocation information over HTTP.

use std::convert::Infallible;
use std::time::Duration;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use mobileid_verifier::crl::Crl;
use mobileid_verifier::ocsp::{CertId, CertStatus, OcspResponse};
use mobileid_verifier::trust::{FetchError, Fetcher, HttpFetcher};
use mobileid_verifier::{uri, Cert};
use mobileid_verifier::x509::Time;
use tokio::net::TcpListener;

const OCSP_GOOD: &[u8] = include_bytes!("../test-data/ocsp-good.der");
const ISSUING_CRL: &[u8] = include_bytes!("../test-data/issuing.crl");

async fn serve(
    req: Request<Incoming>
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_owned();
    let (status, body) = if req.method() == Method::POST && path == "/ocsp" {
        let content_type = req.headers().get(CONTENT_TYPE).map(|value| {
            value.as_bytes().to_vec()
        });
        let body = req.into_body().collect().await.unwrap().to_bytes();
        if content_type.as_deref() != Some(&b"application/ocsp-request"[..])
            || body.first() != Some(&0x30)
        {
            (StatusCode::BAD_REQUEST, Bytes::new())
        }
        else {
            (StatusCode::OK, Bytes::from_static(OCSP_GOOD))
        }
    }
    else if req.method() != Method::GET {
        (StatusCode::METHOD_NOT_ALLOWED, Bytes::new())
    }
    else {
        match path.as_str() {
            "/issuing.crl" => (StatusCode::OK, Bytes::from_static(ISSUING_CRL)),
            "/huge.crl" => {
                (StatusCode::OK, Bytes::from(vec![0u8; 64 * 1024]))
            }
            "/slow.crl" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                (StatusCode::OK, Bytes::from_static(ISSUING_CRL))
            }
            _ => (StatusCode::NOT_FOUND, Bytes::new())
        }
    };
    Ok(Response::builder()
        .status(status)
        .body(Full::new(body))
        .unwrap())
}

/// Starts a server on a local port and returns its base URI.
async fn start() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::task::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::task::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(serve))
                    .await;
            });
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn uri(base: &str, path: &str) -> uri::Http {
    uri::Http::from_string(format!("{}{}", base, path)).unwrap()
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(1), 16 * 1024).unwrap()
}

fn cert(der: &[u8]) -> Cert {
    Cert::decode(der).unwrap()
}

#[tokio::test]
async fn post_ocsp() {
    let base = start().await;
    let signer = cert(include_bytes!("../test-data/signer-current.der"));
    let issuer = cert(include_bytes!("../test-data/issuing-ca.der"));
    let cert_id = CertId::new(&signer, &issuer);

    let data = fetcher().post_ocsp(
        &uri(&base, "/ocsp"), cert_id.encode_request()
    ).await.unwrap();
    let response = OcspResponse::decode(data).unwrap();
    assert_eq!(
        response.verify(
            &cert_id, &issuer, Time::utc(2024, 6, 2, 0, 0, 0),
            chrono::TimeDelta::zero(), chrono::TimeDelta::hours(1)
        ),
        Ok(CertStatus::Good)
    );
}

#[tokio::test]
async fn get_crl() {
    let base = start().await;
    let data = fetcher().get_crl(&uri(&base, "/issuing.crl")).await.unwrap();
    assert_eq!(data.as_ref(), ISSUING_CRL);
    let crl = Crl::decode(data).unwrap();
    assert_eq!(crl.entries().len(), 1);
}

#[tokio::test]
async fn failures() {
    let base = start().await;
    let fetcher = fetcher();
    assert_eq!(
        fetcher.get_crl(&uri(&base, "/missing.crl")).await,
        Err(FetchError::Status(404))
    );
    assert_eq!(
        fetcher.post_ocsp(&uri(&base, "/ocsp"), Bytes::new()).await,
        Err(FetchError::Status(400))
    );
    assert_eq!(
        fetcher.get_crl(&uri(&base, "/huge.crl")).await,
        Err(FetchError::TooLarge(16 * 1024))
    );
    assert_eq!(
        fetcher.get_crl(&uri(&base, "/slow.crl")).await,
        Err(FetchError::Timeout)
    );
}
