use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use tracing::debug;

use foia_core::engine::{CorpusSeed, EngineEvent, QueryResult};
use foia_core::record::{Document, Email};
use foia_core::scripted::{Scenario, ScriptedEngine};
use foia_core::session::Session;
use foia_tui::app::{BrowserApp, KeyOutcome};
use foia_tui::input::Key;

fn main() {
    init_logging();

    // Phase 1: asynchronous bootstrap producing the engine handle.
    let engine = match bootstrap_engine() {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    // Phase 2: purely synchronous session.
    let mut session = Session::new(engine);
    let mut app = BrowserApp::new();
    match session.start() {
        Ok(commands) => app.apply(commands),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }

    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    if interactive {
        if let Err(err) = run_interactive(&mut session, &mut app) {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    } else {
        let mut text = app.render().join("\n");
        text.push('\n');
        print!("{text}");
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn bootstrap_engine() -> Result<ScriptedEngine, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("build bootstrap runtime: {err}"))?;
    // The runtime does not outlive bootstrap; per-intent dispatch never
    // suspends.
    runtime.block_on(load_engine())
}

async fn load_engine() -> Result<ScriptedEngine, String> {
    let seed = match std::env::var_os("FOIA_CORPUS_DIR") {
        Some(dir) => load_corpus_seed(Path::new(&dir)).await?,
        None => demo_seed(),
    };
    let scenario = match std::env::var_os("FOIA_SCENARIO_PATH") {
        Some(path) => load_scenario(Path::new(&path)).await?,
        None => demo_scenario(),
    };
    debug!(blocks = seed.blocks.len(), "engine bootstrap complete");
    Ok(ScriptedEngine::new(seed, scenario))
}

/// One corpus block per file, in file-name order. Block contents stay
/// opaque on this side of the engine boundary.
async fn load_corpus_seed(dir: &Path) -> Result<CorpusSeed, String> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|err| format!("read corpus dir {}: {err}", dir.display()))?;
    let mut paths: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| format!("read corpus dir {}: {err}", dir.display()))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|err| format!("stat corpus entry {}: {err}", entry.path().display()))?;
        if file_type.is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    let mut blocks = Vec::with_capacity(paths.len());
    for path in paths {
        let block = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| format!("read corpus block {}: {err}", path.display()))?;
        blocks.push(block);
    }
    Ok(CorpusSeed::new(blocks))
}

async fn load_scenario(path: &Path) -> Result<Scenario, String> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("read scenario {}: {err}", path.display()))?;
    Scenario::from_json(&data).map_err(|err| format!("parse scenario {}: {err}", path.display()))
}

fn demo_seed() -> CorpusSeed {
    CorpusSeed::new(vec![
        "GLASSLIGHT interim report\n1983-06-14\n\nfield office summary".to_owned(),
        "GLASSLIGHT closure memo\n1983-11-02\n\nprogram wind-down notes".to_owned(),
    ])
}

fn demo_scenario() -> Scenario {
    Scenario {
        startup_events: vec![EngineEvent {
            emails: vec![Email::new(
                "your records request account",
                "Your reading-room account is active.\nStart with the glasslight program, 1983.",
            )],
        }],
        query_results: vec![
            QueryResult {
                email: Email::new(
                    "2 new results for \"glasslight\" (1983)",
                    "Hello,\n\nHere are the new results for your query:\n  - GLASSLIGHT interim report\n  - GLASSLIGHT closure memo",
                ),
                docs: vec![
                    Document::new(
                        "GLASSLIGHT interim report",
                        "1983-06-14",
                        "Summary of ████████ activity at the ███████ field office.",
                    ),
                    Document::new(
                        "GLASSLIGHT closure memo",
                        "1983-11-02",
                        "The ████████ program is discontinued effective ██ November.",
                    ),
                ],
            },
            QueryResult {
                email: Email::new(
                    "0 new results for your query",
                    "Hello,\n\nThere were no new results for your query.",
                ),
                docs: vec![],
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Interactive loop
// ---------------------------------------------------------------------------

fn run_interactive(
    session: &mut Session<ScriptedEngine>,
    app: &mut BrowserApp,
) -> Result<(), String> {
    crossterm::terminal::enable_raw_mode().map_err(|err| format!("enable raw mode: {err}"))?;
    let result = event_loop(session, app);
    let _ = crossterm::terminal::disable_raw_mode();
    result
}

fn event_loop(
    session: &mut Session<ScriptedEngine>,
    app: &mut BrowserApp,
) -> Result<(), String> {
    let mut out = std::io::stdout();
    let mut painter = LinePainter::default();
    write!(out, "\x1b[2J\x1b[H").map_err(|err| format!("clear screen: {err}"))?;
    painter
        .repaint(&mut out, &app.render())
        .map_err(|err| format!("repaint: {err}"))?;

    loop {
        let input = event::read().map_err(|err| format!("read input: {err}"))?;
        if is_ctrl_c(&input) {
            break;
        }
        let Some(key) = translate_key(&input) else {
            continue;
        };

        match app.handle_key(key) {
            KeyOutcome::Quit => break,
            KeyOutcome::Intent(intent) => match session.handle_intent(intent) {
                Ok(commands) => app.apply(commands),
                Err(err) => app.set_status(&err.to_string()),
            },
            KeyOutcome::None => {}
        }
        painter
            .repaint(&mut out, &app.render())
            .map_err(|err| format!("repaint: {err}"))?;
    }
    Ok(())
}

fn is_ctrl_c(input: &Event) -> bool {
    matches!(
        input,
        Event::Key(key_event)
            if key_event.code == KeyCode::Char('c')
                && key_event.modifiers.contains(KeyModifiers::CONTROL)
    )
}

fn translate_key(input: &Event) -> Option<Key> {
    let Event::Key(key_event) = input else {
        return None;
    };
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    match key_event.code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Tab => Some(Key::Tab),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Incremental repaint
// ---------------------------------------------------------------------------

/// Rewrites only the rows that changed since the previous frame, clearing
/// any tail rows the new frame no longer covers.
#[derive(Debug, Default)]
struct LinePainter {
    previous: Vec<String>,
}

impl LinePainter {
    fn repaint<W: Write>(&mut self, mut out: W, next: &[String]) -> std::io::Result<()> {
        let shared = self.previous.len().min(next.len());
        let mut dirty = false;

        for (row, line) in next.iter().enumerate() {
            if row < shared && self.previous[row] == *line {
                continue;
            }
            write!(out, "\x1b[{};1H\x1b[2K{line}", row + 1)?;
            dirty = true;
        }
        for row in next.len()..self.previous.len() {
            write!(out, "\x1b[{};1H\x1b[2K", row + 1)?;
            dirty = true;
        }

        if dirty {
            write!(out, "\x1b[{};1H", next.len() + 1)?;
            out.flush()?;
            self.previous = next.to_vec();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
