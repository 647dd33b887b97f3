use std::sync::{Arc, Mutex};

/// Name of the cookie the bearer credential travels in.
pub const TOKEN_COOKIE: &str = "jwt_token";

/// Lifetime of a stored credential, one day.
pub const TOKEN_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Where the API client keeps its bearer credential between requests.
pub trait TokenStore: Send + Sync + 'static {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Value of cookie `name` in a `Cookie` header or `document.cookie` string.
pub fn cookie_value(raw: &str, name: &str) -> Option<String> {
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::default();
        store.set(&token.into());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
            .filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }
}
