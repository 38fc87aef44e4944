//! Display status projection.
//!
//! The server only knows four raw statuses. The client adds `Retrying` for a
//! report that is processing again after an internal failure, and `Unknown`
//! for anything it cannot decode.
use std::fmt;

use crate::report::{RawStatus, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    Pending,
    Processing,
    Retrying,
    Completed,
    Failed,
    Unknown,
}

/// Color token and icon glyph for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

pub const NEUTRAL_STYLE: StatusStyle = StatusStyle {
    color: "#6b7280",
    icon: "•",
};

/// Pure and total: every report maps to exactly one display status.
pub fn derive_display_status(report: &Report) -> DisplayStatus {
    match report.status {
        RawStatus::Processing if report.retry_count > 0 => DisplayStatus::Retrying,
        RawStatus::Processing => DisplayStatus::Processing,
        RawStatus::Pending => DisplayStatus::Pending,
        RawStatus::Completed => DisplayStatus::Completed,
        RawStatus::Failed => DisplayStatus::Failed,
        RawStatus::Unknown => DisplayStatus::Unknown,
    }
}

impl DisplayStatus {
    pub fn label(self) -> &'static str {
        match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::Processing => "processing",
            DisplayStatus::Retrying => "retrying",
            DisplayStatus::Completed => "completed",
            DisplayStatus::Failed => "failed",
            DisplayStatus::Unknown => "unknown",
        }
    }

    pub fn style(self) -> StatusStyle {
        match self {
            DisplayStatus::Pending => StatusStyle {
                color: "#f59e0b",
                icon: "⏳",
            },
            DisplayStatus::Processing => StatusStyle {
                color: "#3b82f6",
                icon: "⚙️",
            },
            DisplayStatus::Retrying => StatusStyle {
                color: "#f97316",
                icon: "🔁",
            },
            DisplayStatus::Completed => StatusStyle {
                color: "#10b981",
                icon: "✅",
            },
            DisplayStatus::Failed => StatusStyle {
                color: "#ef4444",
                icon: "❌",
            },
            DisplayStatus::Unknown => NEUTRAL_STYLE,
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl StatusStyle {
    /// Looks up a style by display label. Unrecognized labels get the neutral style.
    pub fn for_label(label: &str) -> StatusStyle {
        match label {
            "pending" => DisplayStatus::Pending.style(),
            "processing" => DisplayStatus::Processing.style(),
            "retrying" => DisplayStatus::Retrying.style(),
            "completed" => DisplayStatus::Completed.style(),
            "failed" => DisplayStatus::Failed.style(),
            _ => NEUTRAL_STYLE,
        }
    }
}
