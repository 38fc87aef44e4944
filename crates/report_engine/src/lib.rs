//! Report engine: HTTP access to the report service and async command execution.
mod client;
mod engine;
mod types;

pub use client::{ClientSettings, ReportApi, ReqwestReportApi};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use types::{
    EngineError, EngineEvent, ReportId, ReportRecord, Ticket, TransportError, TransportErrorKind,
};
