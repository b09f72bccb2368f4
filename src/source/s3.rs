//! S3-compatible object store backend.
//!
//! Lists bucket objects with `ListObjectsV2` (paginated via
//! continuation tokens), keeps the keys ending in the designated
//! document name, and reads each one with `GetObject`. Requests are
//! signed with [AWS Signature Version 4](https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-auth-using-authorization-header.html)
//! using pure-Rust primitives (`hmac` + `sha2`), so the backend works
//! against AWS as well as MinIO/LocalStack via `endpoint_url`.
//!
//! # Credentials
//!
//! Read from environment variables:
//! - `AWS_ACCESS_KEY_ID` — required
//! - `AWS_SECRET_ACCESS_KEY` — required
//! - `AWS_SESSION_TOKEN` — optional (temporary credentials)

use super::{ContentSource, ContentUnit, SourceError};
use crate::config::S3Config;
use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use quick_xml::{Reader, events::Event};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Content source over an S3-compatible bucket.
pub struct S3Source {
    config: S3Config,
    document: String,
    client: reqwest::Client,
}

impl S3Source {
    pub fn new(config: S3Config, document: impl Into<String>) -> Self {
        Self {
            config,
            document: document.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Scheme, host and path prefix for the configured endpoint.
    ///
    /// AWS uses virtual-hosted addressing; a custom endpoint (MinIO,
    /// LocalStack) uses path-style addressing, so the bucket moves
    /// into the path.
    fn endpoint(&self) -> (String, String, String) {
        match &self.config.endpoint_url {
            Some(endpoint) => {
                let (scheme, host) = endpoint
                    .split_once("://")
                    .unwrap_or(("https", endpoint.as_str()));
                (
                    scheme.to_string(),
                    host.trim_end_matches('/').to_string(),
                    format!("/{}", self.config.bucket),
                )
            }
            None => (
                "https".to_string(),
                format!("{}.s3.{}.amazonaws.com", self.config.bucket, self.config.region),
                String::new(),
            ),
        }
    }

    /// Issue one SigV4-signed GET and fail on non-success status.
    async fn signed_get(
        &self,
        creds: &Credentials,
        path: &str,
        query: &[(String, String)],
        context: &str,
    ) -> Result<reqwest::Response, SourceError> {
        let (scheme, host, _) = self.endpoint();

        let now = Utc::now();
        let date_stamp = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = hex_sha256(b"");

        // Canonical query string must be key-sorted.
        let mut sorted = query.to_vec();
        sorted.sort();
        let query_string = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", uri_encode(k), uri_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut headers = vec![
            ("host".to_string(), host.clone()),
            ("x-amz-content-sha256".to_string(), payload_hash.clone()),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = &creds.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers.sort();

        let signed_headers = headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let canonical_headers: String =
            headers.iter().map(|(k, v)| format!("{k}:{v}\n")).collect();

        let canonical_request = format!(
            "GET\n{path}\n{query_string}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
        );

        let scope = format!("{date_stamp}/{}/s3/aws4_request", self.config.region);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
            hex_sha256(canonical_request.as_bytes())
        );

        let key = derive_signing_key(
            &creds.secret_access_key,
            &date_stamp,
            &self.config.region,
            "s3",
        );
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            creds.access_key_id
        );

        let url = if query_string.is_empty() {
            format!("{scheme}://{host}{path}")
        } else {
            format!("{scheme}://{host}{path}?{query_string}")
        };

        let mut request = self
            .client
            .get(&url)
            .header("Authorization", &authorization)
            .header("x-amz-content-sha256", &payload_hash)
            .header("x-amz-date", &amz_date);
        if let Some(token) = &creds.session_token {
            request = request.header("x-amz-security-token", token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Api {
                status: response.status().as_u16(),
                context: context.to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ContentSource for S3Source {
    fn describe(&self) -> String {
        format!("s3://{}/{}", self.config.bucket, self.config.prefix)
    }

    async fn list_units(&self) -> Result<Vec<ContentUnit>, SourceError> {
        let creds = Credentials::from_env()?;
        let (_, _, path_prefix) = self.endpoint();
        let list_path = format!("{path_prefix}/");

        let mut units = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut query = vec![
                ("list-type".to_string(), "2".to_string()),
                ("max-keys".to_string(), "1000".to_string()),
            ];
            if !self.config.prefix.is_empty() {
                query.push(("prefix".to_string(), self.config.prefix.clone()));
            }
            if let Some(token) = &continuation {
                query.push(("continuation-token".to_string(), token.clone()));
            }

            let response = self
                .signed_get(&creds, &list_path, &query, &self.describe())
                .await?;
            let body = response.bytes().await?;

            let listing = parse_listing(&body).map_err(SourceError::BadListing)?;
            units.extend(
                listing
                    .keys
                    .into_iter()
                    .filter(|key| key.ends_with(&self.document))
                    .map(ContentUnit::new),
            );

            match (listing.truncated, listing.next_token) {
                (true, Some(token)) => continuation = Some(token),
                _ => break,
            }
        }

        units.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(units)
    }

    async fn read_unit(&self, unit: &ContentUnit) -> Result<Vec<u8>, SourceError> {
        let creds = Credentials::from_env()?;
        let (_, _, path_prefix) = self.endpoint();

        let encoded_key = unit
            .name
            .split('/')
            .map(uri_encode)
            .collect::<Vec<_>>()
            .join("/");
        let path = format!("{path_prefix}/{encoded_key}");

        let response = self.signed_get(&creds, &path, &[], &unit.name).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// AWS credentials loaded from environment variables.
struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl Credentials {
    fn from_env() -> Result<Self, SourceError> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| SourceError::Credentials("AWS_ACCESS_KEY_ID"))?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .map_err(|_| SourceError::Credentials("AWS_SECRET_ACCESS_KEY"))?;
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }
}

// ============================================================================
// SigV4 Helpers
// ============================================================================

fn hex_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the SigV4 signing key:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, dateStamp)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// RFC 3986 URI encoding as SigV4 canonical requests require: every
/// byte except unreserved characters is percent-encoded.
fn uri_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

// ============================================================================
// Listing Decode
// ============================================================================

/// One decoded `ListObjectsV2` page.
struct Listing {
    keys: Vec<String>,
    truncated: bool,
    next_token: Option<String>,
}

/// Decode the object keys and pagination state from a `ListObjectsV2`
/// XML response.
fn parse_listing(xml: &[u8]) -> Result<Listing, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut listing = Listing {
        keys: Vec::new(),
        truncated: false,
        next_token: None,
    };
    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(elem) => stack.push(elem.name().as_ref().to_vec()),
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let value = text.unescape().unwrap_or_default();
                let in_contents = stack.iter().any(|n| n.as_slice() == b"Contents");
                match stack.last().map(Vec::as_slice) {
                    Some(b"Key") if in_contents => listing.keys.push(value.into_owned()),
                    Some(b"IsTruncated") => listing.truncated = value == "true",
                    Some(b"NextContinuationToken") => {
                        listing.next_token = Some(value.into_owned());
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>posts-bucket</Name>
  <IsTruncated>true</IsTruncated>
  <NextContinuationToken>token-123</NextContinuationToken>
  <Contents>
    <Key>blog/first-post/index.md</Key>
    <Size>512</Size>
  </Contents>
  <Contents>
    <Key>blog/first-post/media/pic.png</Key>
    <Size>2048</Size>
  </Contents>
  <Contents>
    <Key>blog/second-post/index.md</Key>
    <Size>640</Size>
  </Contents>
</ListBucketResult>"#;

    #[test]
    fn test_parse_listing() {
        let listing = parse_listing(LISTING.as_bytes()).unwrap();

        assert_eq!(
            listing.keys,
            vec![
                "blog/first-post/index.md",
                "blog/first-post/media/pic.png",
                "blog/second-post/index.md",
            ]
        );
        assert!(listing.truncated);
        assert_eq!(listing.next_token.as_deref(), Some("token-123"));
    }

    #[test]
    fn test_parse_listing_last_page() {
        let xml = r#"<ListBucketResult><IsTruncated>false</IsTruncated></ListBucketResult>"#;
        let listing = parse_listing(xml.as_bytes()).unwrap();

        assert!(listing.keys.is_empty());
        assert!(!listing.truncated);
        assert!(listing.next_token.is_none());
    }

    #[test]
    fn test_document_suffix_filter() {
        let listing = parse_listing(LISTING.as_bytes()).unwrap();
        let units: Vec<_> = listing
            .keys
            .iter()
            .filter(|k| k.ends_with("index.md"))
            .collect();

        assert_eq!(units.len(), 2);
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("simple-key_1.md~"), "simple-key_1.md~");
        assert_eq!(uri_encode("a b"), "a%20b");
        assert_eq!(uri_encode("a/b"), "a%2Fb");
        assert_eq!(uri_encode("prefix="), "prefix%3D");
    }

    #[test]
    fn test_derive_signing_key_aws_reference_vector() {
        // Worked example from the AWS SigV4 documentation.
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            "20150830",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "c4afb1cc5771d871763a393e44b703571b55cc28424d1a5e86da6ed3c154a4b9"
        );
    }

    #[test]
    fn test_endpoint_shapes() {
        let source = S3Source::new(
            S3Config {
                bucket: "posts-bucket".into(),
                region: "eu-west-1".into(),
                prefix: String::new(),
                endpoint_url: None,
            },
            "index.md",
        );
        let (scheme, host, prefix) = source.endpoint();
        assert_eq!(scheme, "https");
        assert_eq!(host, "posts-bucket.s3.eu-west-1.amazonaws.com");
        assert_eq!(prefix, "");

        let source = S3Source::new(
            S3Config {
                bucket: "posts-bucket".into(),
                region: "us-east-1".into(),
                prefix: String::new(),
                endpoint_url: Some("http://localhost:9000".into()),
            },
            "index.md",
        );
        let (scheme, host, prefix) = source.endpoint();
        assert_eq!(scheme, "http");
        assert_eq!(host, "localhost:9000");
        assert_eq!(prefix, "/posts-bucket");
    }
}
