//! HTTP client abstraction for testability.
//!
//! Every external call in the pipeline goes through [`HttpClient`]: one
//! synchronous attempt, no retry. Callers that need resilience must add it
//! themselves; the pipeline deliberately does not.

use thiserror::Error;

/// Content type sent with JSON requests.
///
/// The place-search endpoint requires the charset parameter.
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Default User-Agent string for HTTP requests.
/// Required by some map servers that reject requests without a User-Agent.
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Errors from the network primitive.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetError {
    /// The request never produced a response (connection, DNS, timeout).
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

/// Trait for blocking HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, NetError>;

    /// Performs an HTTP POST request with a JSON body.
    ///
    /// The request is sent with `Content-Type: application/json; charset=utf-8`.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `json_body` - JSON body as a string
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, NetError>;
}

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, NetError> {
        Self::with_timeout(30)
    }

    /// Creates a new ReqwestClient with a custom construction-time timeout.
    ///
    /// The timeout bounds how long a hung server can block the caller; it is
    /// not exposed per call and there is no retry.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| NetError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default HTTP client")
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, NetError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| NetError::Request(format!("Request failed: {}", e)))?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(NetError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        // Read response body
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| NetError::Request(format!("Failed to read response: {}", e)))
    }

    fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, NetError> {
        let response = self
            .client
            .post(url)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(json_body.to_string())
            .send()
            .map_err(|e| NetError::Request(format!("POST request failed: {}", e)))?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(NetError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        // Read response body
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| NetError::Request(format!("Failed to read response: {}", e)))
    }
}
