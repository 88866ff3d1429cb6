use thiserror::Error;

/// Failures inside the browser glue. None of these reach the visitor: the page
/// composition logs them and leaves the affected section static.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("element not found: {0}")]
    MissingElement(String),
    #[error("unknown scene kind {0:?}")]
    UnknownScene(String),
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("shader error: {0}")]
    Shader(String),
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SiteError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SiteError::Js(format!("{value:?}"))
    }
}

pub type Result<T, E = SiteError> = std::result::Result<T, E>;
