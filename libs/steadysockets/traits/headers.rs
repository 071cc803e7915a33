use async_trait::async_trait;
use std::collections::HashMap;

/// HTTP headers to send with the WebSocket upgrade request
pub type Headers = HashMap<String, String>;

/// Trait for providing HTTP headers dynamically
///
/// Called on every connection attempt (including reconnections), so
/// implementations can produce fresh tokens, nonces, or timestamps.
///
/// # Example
/// ```ignore
/// struct BrowserHeaders {
///     user_agent: String,
/// }
///
/// #[async_trait::async_trait]
/// impl HeaderProvider for BrowserHeaders {
///     async fn get_headers(&self) -> Headers {
///         let mut headers = HashMap::new();
///         headers.insert("User-Agent".to_string(), self.user_agent.clone());
///         headers
///     }
/// }
/// ```
#[async_trait]
pub trait HeaderProvider: Send + Sync {
    /// Generate headers for the next WebSocket upgrade request
    async fn get_headers(&self) -> Headers;
}

/// A no-op header provider that doesn't add any headers
pub struct NoHeaders;

#[async_trait]
impl HeaderProvider for NoHeaders {
    async fn get_headers(&self) -> Headers {
        HashMap::new()
    }
}
