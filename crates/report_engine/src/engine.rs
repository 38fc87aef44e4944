use std::sync::{mpsc, Arc};
use std::thread;

use report_logging::{report_debug, report_warn};

use crate::client::{ClientSettings, ReportApi, ReqwestReportApi};
use crate::{EngineError, EngineEvent, ReportId, Ticket};

/// Receives engine events. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    List { request: Ticket },
    Create { mutation: Ticket, title: String },
    Delete { mutation: Ticket, id: ReportId },
}

/// Runs remote calls on a background tokio runtime and reports each result
/// to the sink, tagged with the ticket of the command that caused it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = ReqwestReportApi::new(settings)?;
        Self::with_api(Arc::new(api), sink)
    }

    pub fn with_api(api: Arc<dyn ReportApi>, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(api.as_ref(), command).await;
                    sink.emit(event);
                });
            }
            report_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    pub fn list(&self, request: Ticket) {
        self.submit(EngineCommand::List { request });
    }

    pub fn create(&self, mutation: Ticket, title: impl Into<String>) {
        self.submit(EngineCommand::Create {
            mutation,
            title: title.into(),
        });
    }

    pub fn delete(&self, mutation: Ticket, id: ReportId) {
        self.submit(EngineCommand::Delete { mutation, id });
    }

    fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            report_warn!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(api: &dyn ReportApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::List { request } => EngineEvent::Listed {
            request,
            result: api.list_reports().await,
        },
        EngineCommand::Create { mutation, title } => EngineEvent::Created {
            mutation,
            result: api.create_report(&title).await,
        },
        EngineCommand::Delete { mutation, id } => EngineEvent::Deleted {
            mutation,
            result: api.delete_report(id).await,
        },
    }
}
