use std::{
    error::Error,
    fs,
    io::{self, stdin},
    path::PathBuf,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};

use wordpace::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::Controller,
    logging,
    narrator::{CommandNarrator, Narrator},
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, Runner, SystemClock, TickSchedule},
    samples::SampleSet,
    session::TimeBudget,
    ui::screen::current_screen,
    App, KeyOutcome, RuntimeSettings,
};

/// word-by-word typing practice with live wpm, cpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a passage one word at a time against the clock. Words are scored as they are completed with a space, and the session ends when the time budget runs out or the text is exhausted."
)]
pub struct Cli {
    /// time budget in seconds (10, 15, 30, 45, 60, 120 or 300)
    #[clap(short = 's', long = "secs", value_parser = parse_budget)]
    budget: Option<TimeBudget>,

    /// custom text to practice with
    #[clap(short = 'p', long, conflicts_with = "file")]
    prompt: Option<String>,

    /// read the practice text from a file
    #[clap(long)]
    file: Option<PathBuf>,

    /// speak each word as it comes up
    #[clap(long, conflicts_with = "mute")]
    voice: bool,

    /// never speak words
    #[clap(long)]
    mute: bool,

    /// skip the setup screen and start typing right away
    #[clap(long)]
    start: bool,

    /// write logs here instead of the default state directory
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn parse_budget(value: &str) -> Result<TimeBudget, String> {
    let secs: u32 = value.parse().map_err(|e| format!("{e}"))?;
    TimeBudget::new(secs).map_err(|e| e.to_string())
}

impl Cli {
    /// Command line flags win over the saved config.
    fn to_runtime_settings(&self, config: &Config) -> io::Result<RuntimeSettings> {
        let custom_text = match (&self.prompt, &self.file) {
            (Some(prompt), _) => prompt.clone(),
            (None, Some(path)) => fs::read_to_string(path)?,
            (None, None) => String::new(),
        };

        let voice_enabled = if self.voice {
            true
        } else if self.mute {
            false
        } else {
            config.voice_enabled
        };

        Ok(RuntimeSettings {
            budget: self.budget.unwrap_or_else(|| config.time_budget()),
            voice_enabled,
            custom_text,
            start_immediately: self.start,
            speech_command: config.speech_command.clone(),
        })
    }
}

fn build_narrator(settings: &RuntimeSettings) -> Box<dyn Narrator> {
    let narrator = settings
        .speech_command
        .as_deref()
        .and_then(CommandNarrator::from_command_line)
        .unwrap_or_else(CommandNarrator::system_default);
    tracing::debug!(program = narrator.program(), "speech engine selected");
    Box::new(narrator)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    if let Err(err) = logging::init(&log_path) {
        eprintln!("logging disabled: {err}");
    }

    let store = FileConfigStore::new();
    let config = store.load();
    let settings = cli.to_runtime_settings(&config)?;
    let samples = SampleSet::builtin()?;

    let schedule = TickSchedule::default();
    let controller = Controller::new(
        samples,
        build_narrator(&settings),
        Box::new(schedule.timer()),
        Box::new(SystemClock),
    );
    let mut app = App::new(settings, controller);
    let runner = Runner::new(CrosstermEventSource::new(), schedule);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = store.save(&Config::from(&app.settings())) {
        tracing::warn!(%err, "unable to save preferences");
    }

    result
}

fn start_tui<B: Backend, E: AppEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        let Some(event) = runner.step() else {
            tracing::info!("event source closed");
            break;
        };

        match event {
            AppEvent::Tick => {
                app.on_tick();
            }
            AppEvent::Paste(text) => app.on_paste(&text),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    current_screen(app.phase()).render(app, f);
}
