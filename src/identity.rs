//! Stable per-route session identity.
//!
//! The server tracks a `browser_id` per client. Deriving it as a
//! name-based UUID of the proxy URL keeps it stable across reconnects
//! and process restarts, so each route always presents the same device.

use steadysockets::Route;
use uuid::Uuid;

/// Name hashed for the unproxied route
pub const DIRECT_ROUTE_NAME: &str = "local";

/// Derive the stable session identity for a route
///
/// UUID v3 (name-based) over the DNS namespace of the proxy URL, or of
/// `"local"` for the direct route. Pure: the same route always yields
/// the same identity.
pub fn derive_session_identity(route: &Route) -> String {
    let name = route.proxy_url().unwrap_or(DIRECT_ROUTE_NAME);
    Uuid::new_v3(&Uuid::NAMESPACE_DNS, name.as_bytes()).to_string()
}
