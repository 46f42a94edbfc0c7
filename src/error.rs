use thiserror::Error;

/// Failures a visualization can run into. None of them are fatal to the page:
/// the affected instance is skipped or stopped and its siblings keep running.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VizError {
    #[error("mount point `{key}` not found")]
    MissingMount { key: String },

    #[error("drawing surface unavailable: {0}")]
    Surface(String),

    #[error("host refused request: {0}")]
    Host(String),

    #[error("frame {frame} failed: {reason}")]
    Frame { frame: u64, reason: String },
}

impl VizError {
    pub fn missing_mount(key: impl Into<String>) -> Self {
        Self::MissingMount { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for VizError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
