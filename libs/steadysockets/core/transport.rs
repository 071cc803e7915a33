//! Proxy-aware stream establishment and WebSocket upgrade.

use crate::core::route::{ProxyEndpoint, ProxyScheme, Route};
use crate::core::session::SessionConfig;
use crate::error::{Result, SteadyError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_socks::tcp::{Socks4Stream, Socks5Stream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http;
use tokio_tungstenite::{client_async_tls_with_config, MaybeTlsStream, WebSocketStream};
use tracing::warn;
use url::Url;

/// A raw byte stream the WebSocket can be layered on, proxied or not
pub trait RawStream: AsyncRead + AsyncWrite + Send + Unpin {}
impl<T: AsyncRead + AsyncWrite + Send + Unpin> RawStream for T {}

/// The established WebSocket stream type for a session
pub type WsStream = WebSocketStream<MaybeTlsStream<Box<dyn RawStream>>>;

/// Open the route's raw stream and perform the WebSocket upgrade
///
/// TLS is applied according to the URL scheme (`wss://`). Headers come
/// from the session's `HeaderProvider`; invalid header names or values
/// are skipped with a warning rather than failing the connection.
pub(crate) async fn connect(config: &SessionConfig) -> Result<WsStream> {
    let (host, port) = endpoint_addr(&config.url)?;
    let raw = open_raw_stream(&config.route, &host, port).await?;

    let mut request = config
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| SteadyError::Connect(format!("invalid websocket url: {e}")))?;

    for (key, value) in config.headers.get_headers().await {
        match (
            key.parse::<http::header::HeaderName>(),
            value.parse::<http::header::HeaderValue>(),
        ) {
            (Ok(name), Ok(value)) => {
                request.headers_mut().insert(name, value);
            }
            _ => warn!("Skipping invalid header `{}`", key),
        }
    }

    let (ws, _response) = client_async_tls_with_config(request, raw, None, None)
        .await
        .map_err(|e| SteadyError::WebSocket(format!("upgrade failed: {e}")))?;
    Ok(ws)
}

/// Resolve the target host and port from the WebSocket URL
fn endpoint_addr(url: &str) -> Result<(String, u16)> {
    let parsed =
        Url::parse(url).map_err(|e| SteadyError::Configuration(format!("invalid url: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| SteadyError::Configuration(format!("url `{url}` has no host")))?
        .to_string();
    let port = parsed
        .port_or_known_default()
        .ok_or_else(|| SteadyError::Configuration(format!("url `{url}` has no port")))?;
    Ok((host, port))
}

async fn open_raw_stream(route: &Route, host: &str, port: u16) -> Result<Box<dyn RawStream>> {
    match route {
        Route::Direct => {
            let tcp = TcpStream::connect((host, port))
                .await
                .map_err(|e| SteadyError::Connect(e.to_string()))?;
            Ok(Box::new(tcp))
        }
        Route::Proxied(proxy) => match proxy.scheme {
            ProxyScheme::Socks5 => {
                let stream = match &proxy.credentials {
                    Some((user, pass)) => {
                        Socks5Stream::connect_with_password(
                            (proxy.host.as_str(), proxy.port),
                            (host, port),
                            user,
                            pass,
                        )
                        .await
                    }
                    None => {
                        Socks5Stream::connect((proxy.host.as_str(), proxy.port), (host, port)).await
                    }
                }
                .map_err(|e| SteadyError::Proxy(e.to_string()))?;
                Ok(Box::new(stream))
            }
            ProxyScheme::Socks4 => {
                let stream = match &proxy.credentials {
                    Some((user, _)) => {
                        Socks4Stream::connect_with_userid(
                            (proxy.host.as_str(), proxy.port),
                            (host, port),
                            user,
                        )
                        .await
                    }
                    None => {
                        Socks4Stream::connect((proxy.host.as_str(), proxy.port), (host, port)).await
                    }
                }
                .map_err(|e| SteadyError::Proxy(e.to_string()))?;
                Ok(Box::new(stream))
            }
            ProxyScheme::Http => http_connect_tunnel(proxy, host, port).await,
        },
    }
}

/// Establish an HTTP CONNECT tunnel through the proxy
async fn http_connect_tunnel(
    proxy: &ProxyEndpoint,
    host: &str,
    port: u16,
) -> Result<Box<dyn RawStream>> {
    let mut stream = TcpStream::connect((proxy.host.as_str(), proxy.port))
        .await
        .map_err(|e| SteadyError::Proxy(e.to_string()))?;

    let mut connect = format!("CONNECT {host}:{port} HTTP/1.1\r\nHost: {host}:{port}\r\n");
    if let Some((user, pass)) = &proxy.credentials {
        let token = BASE64.encode(format!("{user}:{pass}"));
        connect.push_str(&format!("Proxy-Authorization: Basic {token}\r\n"));
    }
    connect.push_str("\r\n");

    stream
        .write_all(connect.as_bytes())
        .await
        .map_err(|e| SteadyError::Proxy(e.to_string()))?;

    // Read the response head byte by byte so nothing past the header
    // terminator is consumed from the tunnel.
    let mut head = Vec::with_capacity(256);
    while !head.ends_with(b"\r\n\r\n") {
        if head.len() > 8192 {
            return Err(SteadyError::Proxy("oversized CONNECT response".into()));
        }
        let byte = stream
            .read_u8()
            .await
            .map_err(|e| SteadyError::Proxy(e.to_string()))?;
        head.push(byte);
    }

    let head = String::from_utf8_lossy(&head);
    let status_line = head.lines().next().unwrap_or("");
    if !(status_line.contains(" 200 ") || status_line.ends_with(" 200")) {
        return Err(SteadyError::Proxy(format!(
            "CONNECT rejected: {status_line}"
        )));
    }

    Ok(Box::new(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_addr_uses_known_defaults() {
        assert_eq!(
            endpoint_addr("wss://proxy.example.com/path").unwrap(),
            ("proxy.example.com".to_string(), 443)
        );
        assert_eq!(
            endpoint_addr("ws://proxy.example.com").unwrap(),
            ("proxy.example.com".to_string(), 80)
        );
    }

    #[test]
    fn endpoint_addr_prefers_explicit_port() {
        assert_eq!(
            endpoint_addr("ws://127.0.0.1:9001").unwrap(),
            ("127.0.0.1".to_string(), 9001)
        );
    }
}
