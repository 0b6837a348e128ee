//! Read API response model.
//!
//! Only the parts the extractor needs are modeled; unknown fields (bounding
//! boxes, words, confidences) are ignored.

use serde::{Deserialize, Serialize};

/// Status document returned when polling an analyze operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperation {
    pub status: OperationStatus,

    /// Present once the status is `succeeded`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyze_result: Option<AnalyzeResult>,

    /// Present on some failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceErrorBody>,
}

impl ReadOperation {
    /// Best available description of a failed analysis.
    pub fn failure_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| "the OCR service reported a failed analysis".to_string())
    }
}

/// Lifecycle of an analyze operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Any status string this client does not know.
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    /// No further polling will change the outcome.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub read_results: Vec<ReadPage>,
}

/// One page of recognized text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadPage {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub lines: Vec<ReadLine>,
}

/// One recognized line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadLine {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}
