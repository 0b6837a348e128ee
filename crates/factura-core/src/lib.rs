//! Core library for invoice OCR processing.
//!
//! This crate provides:
//! - A recognized text model for OCR output (lines plus full text)
//! - Rule-based invoice field extraction (invoice number, date, RUC/NIT,
//!   totals, company name, line items)
//! - The invoice record model with validation and JSON export shapes
//! - An Azure Computer Vision Read API client with bounded polling

pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;

pub use error::{FacturaError, InputError, Result, ServiceError, TransportError};
pub use invoice::{extract, extract_text, ExtractionResult, InvoiceExtractor, RuleBasedExtractor};
pub use models::config::{FacturaConfig, OcrServiceConfig, OutputConfig, PollConfig};
pub use models::invoice::{Field, InvoiceRecord};
pub use ocr::{ImageUpload, RecognizedText};

#[cfg(feature = "azure")]
pub use ocr::AzureReadClient;
