//! Structured error types for scrollspy.
//!
//! Runtime DOM problems never surface here; a missing element just disables
//! the feature that needed it. These errors cover construction and I/O.

/// All errors that can occur while configuring or driving scrollspy.
#[derive(Debug, thiserror::Error)]
pub enum ScrollspyError {
    /// Options object failed to deserialize or validate.
    #[error("Invalid options: {0}")]
    Options(String),

    /// JSON error (options or replay scenario).
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A browser global (`window`, `document`) is unavailable.
    #[error("Missing browser global: {0}")]
    MissingGlobal(&'static str),

    /// A DOM call threw.
    #[error("DOM error: {0}")]
    Dom(String),

    /// Preference storage rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrollspyError>;

#[cfg(target_arch = "wasm32")]
impl From<ScrollspyError> for wasm_bindgen::JsValue {
    fn from(e: ScrollspyError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
