pub mod credential;

// Re-export commonly used items
pub use credential::{API_KEY_PLACEHOLDER, resolve_api_key, usable_api_key};
