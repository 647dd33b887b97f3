//! Shared pieces of the incident dashboard: the API wire model, the
//! authenticated client, list filters and the view models both the
//! server and the browser app render from.

pub mod api;
pub mod evidence;
pub mod filter;
pub mod model;
pub mod token;
pub mod view;

pub use api::{ApiClient, ApiError, DEFAULT_API_BASE_URL};
pub use filter::IncidentFilter;
pub use token::{MemoryTokenStore, TokenStore, TOKEN_COOKIE, TOKEN_MAX_AGE_SECS};
