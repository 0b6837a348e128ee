//! Data models: the extracted invoice record and configuration.

pub mod config;
pub mod invoice;
