use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use analysis_core::{update, AppState, Msg};
use analysis_engine::{EngineConfig, EngineHandle};
use anyhow::Context;
use engine_logging::{engine_info, engine_warn};

use super::effects::EffectRunner;
use super::logging::{self, LogDestination, LOG_DESTINATION_VAR};
use super::selection::validate_selection;
use super::ui::input::{parse_command, Command, HELP};
use super::ui::render::render;

/// How long the loop waits for user input before checking engine events.
const EVENT_POLL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    let destination = std::env::var(LOG_DESTINATION_VAR).ok();
    logging::initialize(LogDestination::from_setting(destination.as_deref()));

    let config = EngineConfig::from_env().context("resolving backend configuration")?;
    engine_info!(
        "Backend {} probe_timeout={:?} poll_interval={:?}",
        config.base_url,
        config.probe_timeout,
        config.poll_interval
    );
    let engine = EngineHandle::new(config).context("starting analysis engine")?;
    let mut shell = Shell::new(EffectRunner::new(engine));

    let (input_tx, input_rx) = mpsc::channel::<Inbound>();
    spawn_input_reader(input_tx);

    println!("{HELP}");
    shell.dispatch(Msg::HealthViewActivated);
    shell.render_now();

    loop {
        match input_rx.recv_timeout(EVENT_POLL) {
            Ok(Inbound::Msg(Msg::SubmitClicked)) if !shell.can_submit() => {
                println!("  Nothing to submit: select four videos, or wait for the running analysis");
            }
            Ok(Inbound::Msg(msg)) => shell.dispatch(msg),
            Ok(Inbound::Notice(text)) => println!("  {text}"),
            Ok(Inbound::Quit) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }
        shell.pump_engine();
    }

    shell.dispatch(Msg::HealthViewDeactivated);
    engine_info!("Shell stopped");
    Ok(())
}

/// What the input thread hands to the dispatch loop.
enum Inbound {
    Msg(Msg),
    Notice(String),
    Quit,
}

/// Owns the application state; every transition runs to completion here.
struct Shell {
    state: AppState,
    effects: EffectRunner,
}

impl Shell {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.effects.enqueue(effects);
        if was_dirty {
            self.render_now();
        }
    }

    fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    fn pump_engine(&mut self) {
        for msg in self.effects.drain() {
            self.dispatch(msg);
        }
    }

    fn render_now(&self) {
        let mut stdout = io::stdout().lock();
        for line in render(&self.state.view()) {
            let _ = writeln!(stdout, "{line}");
        }
        let _ = stdout.flush();
    }
}

fn spawn_input_reader(tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let inbound = match parse_command(&line) {
                Ok(Some(command)) => to_inbound(command),
                Ok(None) => continue,
                Err(err) => Inbound::Notice(err.to_string()),
            };
            let quit = matches!(inbound, Inbound::Quit);
            if tx.send(inbound).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(Inbound::Quit);
    });
}

fn to_inbound(command: Command) -> Inbound {
    match command {
        Command::Tab(tab) => Inbound::Msg(Msg::TabSelected(tab)),
        Command::Select(paths) => match validate_selection(&paths) {
            Ok(files) => Inbound::Msg(Msg::FilesSelected(files)),
            Err(err) => {
                engine_warn!("Rejected selection: {}", err);
                Inbound::Notice(err.to_string())
            }
        },
        Command::Submit => Inbound::Msg(Msg::SubmitClicked),
        Command::Refresh => Inbound::Msg(Msg::HealthRefreshClicked),
        Command::Clear => Inbound::Msg(Msg::ResultCleared),
        Command::Help => Inbound::Notice(HELP.to_string()),
        Command::Quit => Inbound::Quit,
    }
}
