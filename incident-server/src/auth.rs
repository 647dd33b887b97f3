use crate::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use incident_core::{ApiError, MemoryTokenStore, TOKEN_COOKIE, TOKEN_MAX_AGE_SECS};
use serde::Deserialize;
use std::sync::Arc;

pub const DEFAULT_LANDING: &str = "/incidents";

const UNUSABLE_TOKEN: &str = "Login failed";

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(render_login(query.redirect.as_deref(), None))
}

/// Trades the submitted credentials for a token at the incident API and
/// hands it to the browser as the `jwt_token` cookie.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let client = state.api.with_tokens(Arc::new(MemoryTokenStore::default()));
    match client.login(&form.username, &form.password).await {
        Ok(session) if !is_cookie_value(&session.jwt) => {
            tracing::error!(username = %form.username, "incident api issued a token that cannot be stored as a cookie");
            (
                StatusCode::BAD_GATEWAY,
                Html(render_login(form.redirect.as_deref(), Some(UNUSABLE_TOKEN))),
            )
                .into_response()
        }
        Ok(session) => {
            tracing::info!(username = %form.username, "login succeeded");
            let target = safe_redirect(form.redirect.as_deref());
            (
                [(header::SET_COOKIE, session_cookie(&session.jwt))],
                Redirect::to(&target),
            )
                .into_response()
        }
        Err(err) => {
            let status = login_failure_status(&err);
            if status == StatusCode::BAD_GATEWAY {
                tracing::error!(error = %err, "incident api unreachable during login");
            } else {
                tracing::warn!(username = %form.username, error = %err, "login rejected");
            }
            (
                status,
                Html(render_login(form.redirect.as_deref(), Some(&err.to_string()))),
            )
                .into_response()
        }
    }
}

pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, expired_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

fn login_failure_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::Transport(_) | ApiError::Decode(_) => StatusCode::BAD_GATEWAY,
        ApiError::Status { status, .. } if *status >= 500 => StatusCode::BAD_GATEWAY,
        _ => StatusCode::UNAUTHORIZED,
    }
}

/// Only same-site absolute paths are followed after login.
pub fn safe_redirect(target: Option<&str>) -> String {
    match target {
        Some(t) if t.starts_with('/') && !t.starts_with("//") && !t.contains('\\') => {
            t.to_string()
        }
        _ => DEFAULT_LANDING.to_string(),
    }
}

/// Non-empty and made only of cookie-octets, so the token cannot end the
/// value early or smuggle in attributes.
pub fn is_cookie_value(token: &str) -> bool {
    !token.is_empty()
        && token.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

pub fn session_cookie(token: &str) -> String {
    format!("{TOKEN_COOKIE}={token}; Path=/; Max-Age={TOKEN_MAX_AGE_SECS}; SameSite=Lax")
}

pub fn expired_cookie() -> String {
    format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; SameSite=Lax")
}

fn render_login(redirect: Option<&str>, error: Option<&str>) -> String {
    let redirect = escape_html(&safe_redirect(redirect));
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>", escape_html(e)))
        .unwrap_or_default();
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>Sign in</title></head>\n<body>\n\
         <h1>Sign in</h1>\n{error}\n\
         <form method=\"post\" action=\"/api/auth/login\">\n\
         <input type=\"hidden\" name=\"redirect\" value=\"{redirect}\">\n\
         <input name=\"username\" placeholder=\"Username\" required>\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required>\n\
         <button type=\"submit\">Sign in</button>\n\
         </form>\n</body>\n</html>\n"
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
