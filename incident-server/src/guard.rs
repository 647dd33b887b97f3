use axum::extract::Request;
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use incident_core::token::cookie_value;
use incident_core::TOKEN_COOKIE;

/// Prefixes the guard never looks at: API traffic, the compiled UI bundle
/// and static files.
const UNGUARDED_PREFIXES: &[&str] = &["/api", "/pkg", "/static", "/favicon.ico", "/health"];

/// Prefixes reachable without a credential even inside the guarded space.
const PUBLIC_PREFIXES: &[&str] = &["/login", "/api/auth"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

pub fn is_guarded(path: &str) -> bool {
    !UNGUARDED_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

pub fn decide(path: &str, token: Option<&str>) -> GuardDecision {
    if !is_guarded(path) || is_public(path) {
        return GuardDecision::Allow;
    }
    match token {
        Some(t) if !t.is_empty() => GuardDecision::Allow,
        _ => GuardDecision::Redirect(login_redirect(path)),
    }
}

pub fn login_redirect(path: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", path)
        .finish();
    format!("/login?{query}")
}

/// Cookie first, then the second word of `Authorization`.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| cookie_value(raw, TOKEN_COOKIE));
    if from_cookie.is_some() {
        return from_cookie;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(' ').nth(1))
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

pub async fn require_token(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let token = token_from_headers(req.headers());
    match decide(&path, token.as_deref()) {
        GuardDecision::Allow => next.run(req).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %path, "no credential, redirecting to login");
            Redirect::temporary(&to).into_response()
        }
    }
}
