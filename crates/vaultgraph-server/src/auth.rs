//! HTTP Basic authentication

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use crate::{Credentials, ServerState};

const CHALLENGE: &str = r#"Basic realm="Knowledge Base""#;

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Compare both fields without short-circuiting on the first mismatch.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }
}

/// Reject requests without valid Basic credentials. A no-op when the
/// server has none configured.
pub async fn require_basic_auth(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.credentials.as_ref() else {
        return next.run(request).await;
    };

    let supplied = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic);

    match supplied {
        Some((username, password)) if expected.matches(&username, &password) => {
            next.run(request).await
        }
        _ => {
            debug!("Rejected unauthenticated request to {}", request.uri().path());
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, CHALLENGE)],
        "Unauthorized",
    )
        .into_response()
}

/// Decode an `Authorization: Basic ...` header value into its user and
/// password. The password may itself contain `:`.
fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let header = format!("Basic {}", BASE64.encode("admin:pa:ss"));
        assert_eq!(
            parse_basic(&header),
            Some(("admin".to_string(), "pa:ss".to_string()))
        );

        let lower = format!("basic {}", BASE64.encode("u:p"));
        assert!(parse_basic(&lower).is_some());

        assert_eq!(parse_basic("Bearer abc"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
        assert_eq!(parse_basic(&format!("Basic {}", BASE64.encode("nocolon"))), None);
    }

    #[test]
    fn test_credentials_match() {
        let creds = Credentials::new("admin", "changeme");
        assert!(creds.matches("admin", "changeme"));
        assert!(!creds.matches("admin", "changemf"));
        assert!(!creds.matches("admin", "change"));
        assert!(!creds.matches("root", "changeme"));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("admin", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));
    }
}
