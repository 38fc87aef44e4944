use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Local;
use report_core::{update, AppState, Msg, ReportId};
use report_logging::{report_debug, report_info, report_warn};

use super::config::{self, AppConfig, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::input::{self, Confirmations, Inbox};
use super::logging;
use super::ui;

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let loaded = config::load_config(&config_path);
    let config = loaded.as_ref().cloned().unwrap_or_default();

    logging::initialize(config.log_destination, config.log_level());
    match &loaded {
        Ok(_) => report_info!("Loaded config from {:?}", config_path),
        Err(err) => report_warn!("{err}; using defaults"),
    }

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let mut confirmations = Confirmations::default();
    let runner = EffectRunner::new(config.client_settings(), inbox_tx.clone())?;

    input::spawn_reader(inbox_tx.clone());

    // Poll ticker; the first tick fires immediately so the list loads at startup.
    let interval = config.poll_interval();
    thread::spawn(move || {
        while inbox_tx.send(Inbox::Msg(Msg::PollTick)).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut screen = Screen::new(&config);
    let mut state = AppState::new();
    let mut cycle = 0_u64;
    screen.draw(&state, confirmations.front())?;

    while let Ok(event) = inbox_rx.recv() {
        let msg = match event {
            Inbox::Msg(msg) => msg,
            Inbox::Line(line) => match confirmations.interpret(&line, &config.default_title) {
                Some(Inbox::Msg(msg)) => msg,
                Some(_) => break,
                None => {
                    eprintln!("{}", input::HELP);
                    continue;
                }
            },
            Inbox::Quit => break,
        };
        let redraw_prompt = matches!(
            msg,
            Msg::DeleteClicked { .. } | Msg::DeleteConfirmed { .. } | Msg::DeleteCancelled { .. }
        );
        if msg == Msg::PollTick {
            cycle += 1;
            report_logging::set_poll_cycle(cycle);
        }

        let (next, effects) = update(state, msg);
        state = next;
        if !effects.is_empty() {
            report_debug!("dispatching {} effect(s)", effects.len());
        }
        runner.enqueue(effects, &mut confirmations);

        if state.consume_dirty() || redraw_prompt {
            screen.draw(&state, confirmations.front())?;
        }
    }

    report_info!("Shutting down");
    Ok(())
}

struct Screen {
    base_url: String,
    color: bool,
    refreshed_at: String,
    last_version: u64,
}

impl Screen {
    fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            color: io::stdout().is_terminal(),
            refreshed_at: "never".to_string(),
            last_version: 0,
        }
    }

    fn draw(&mut self, state: &AppState, prompt: Option<ReportId>) -> io::Result<()> {
        let view = state.view();
        if view.cache_version != self.last_version {
            self.last_version = view.cache_version;
            self.refreshed_at = Local::now().format("%H:%M:%S").to_string();
        }
        let frame = ui::render::Frame {
            base_url: &self.base_url,
            refreshed_at: &self.refreshed_at,
            prompt,
            color: self.color,
        };

        let mut out = io::stdout().lock();
        if self.color {
            // Clear screen and home the cursor.
            write!(out, "\x1b[2J\x1b[H")?;
        }
        for line in ui::render::render(&view, &frame) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}
