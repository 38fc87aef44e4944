use std::fmt;

pub type ReportId = u64;

/// Lifecycle status as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Anything the server sends that this client does not recognize.
    Unknown,
}

impl RawStatus {
    /// Decodes a wire status string. Never fails; unrecognized values become `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => RawStatus::Pending,
            "processing" => RawStatus::Processing,
            "completed" => RawStatus::Completed,
            "failed" => RawStatus::Failed,
            _ => RawStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RawStatus::Pending => "pending",
            RawStatus::Processing => "processing",
            RawStatus::Completed => "completed",
            RawStatus::Failed => "failed",
            RawStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report as last seen by the client. Only the server changes these fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub status: RawStatus,
    /// Only meaningful while `status` is `Processing`.
    pub retry_count: u32,
    pub result_url: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl Report {
    /// A freshly created report, the way the server returns it from a create call.
    pub fn new(id: ReportId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            status: RawStatus::Pending,
            retry_count: 0,
            result_url: None,
            created_at: String::new(),
            completed_at: None,
        }
    }

    pub fn with_status(mut self, status: RawStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }
}
