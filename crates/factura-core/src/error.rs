//! Error types for the factura-core library.
//!
//! Field extraction itself is total and never fails; these errors belong to
//! the collaborators around it (configuration, image input, the OCR service).

use thiserror::Error;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// Missing or invalid configuration, e.g. OCR service credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or HTTP failure while talking to the OCR service.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The OCR service reported a failure or answered with garbage.
    #[error("OCR service error: {0}")]
    Service(#[from] ServiceError),

    /// Unreadable or unsupported uploaded image.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reaching the OCR service.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP request could not be sent or the response not read.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The analyze call was accepted but carried no operation URL.
    #[error("response has no Operation-Location header")]
    MissingOperationLocation,

    /// Polling gave up before the analysis finished.
    #[error("analysis did not finish after {attempts} poll attempts")]
    Timeout { attempts: u32 },
}

/// Errors reported by the OCR service itself.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The analysis finished with a failed status.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors related to the uploaded image.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file extension is not an accepted image format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The upload contained no bytes.
    #[error("image is empty")]
    Empty,

    /// The bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The decoded image could not be re-encoded for upload.
    #[error("failed to encode image: {0}")]
    Encode(String),
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;
