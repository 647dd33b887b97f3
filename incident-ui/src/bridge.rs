//! Typed wrappers over the incident API for the components, plus the few
//! browser calls they need (cookie jar, location, history).

use incident_core::model::{Incident, IncidentAction, IncidentDetail};
use incident_core::token::cookie_value;
use incident_core::{
    ApiClient, IncidentFilter, TokenStore, DEFAULT_API_BASE_URL, TOKEN_COOKIE,
    TOKEN_MAX_AGE_SECS,
};
use std::sync::Arc;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;

/// `document.cookie` backed credential store, shared with the login page
/// the server renders.
pub struct CookieTokenStore;

fn html_document() -> Option<web_sys::HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

impl TokenStore for CookieTokenStore {
    fn get(&self) -> Option<String> {
        let raw = html_document()?.cookie().ok()?;
        cookie_value(&raw, TOKEN_COOKIE)
    }

    fn set(&self, token: &str) {
        if let Some(doc) = html_document() {
            let _ = doc.set_cookie(&format!(
                "{TOKEN_COOKIE}={token}; path=/; max-age={TOKEN_MAX_AGE_SECS}; samesite=lax"
            ));
        }
    }

    fn clear(&self) {
        if let Some(doc) = html_document() {
            let _ = doc.set_cookie(&format!("{TOKEN_COOKIE}=; path=/; max-age=0"));
        }
    }
}

fn client() -> ApiClient {
    let base = option_env!("INCIDENT_API_URL").unwrap_or(DEFAULT_API_BASE_URL);
    ApiClient::new(base, Arc::new(CookieTokenStore))
}

pub async fn fetch_incidents(filter: IncidentFilter) -> Result<Vec<Incident>, String> {
    client()
        .list_incidents(&filter)
        .await
        .map_err(|e| e.to_string())
}

pub async fn fetch_detail(id: &str) -> Result<IncidentDetail, String> {
    client()
        .load_incident_detail(id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn run_action(id: &str, action: IncidentAction) -> Result<IncidentDetail, String> {
    client()
        .apply_action(id, action)
        .await
        .map_err(|e| e.to_string())
}

pub fn location_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

pub fn location_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Mirrors the active filter into the address bar without a reload.
pub fn push_query(query: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let current = window.location().search().unwrap_or_default();
    let next = if query.is_empty() {
        String::new()
    } else {
        format!("?{query}")
    };
    if current == next {
        return;
    }
    let url = if next.is_empty() {
        location_path()
    } else {
        next
    };
    if let Ok(history) = window.history() {
        let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}
