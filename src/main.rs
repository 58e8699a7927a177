mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use zombie_shooter::compute::{init_state, restart, tick};
use zombie_shooter::config::{Difficulty, GameConfig};
use zombie_shooter::entities::GameState;
use zombie_shooter::input::InputSnapshot;
use zombie_shooter::leaderboard::{
    submit_score, JsonFileStore, Leaderboard, PlayerName, ScoreStore, NAME_LEN,
};
use zombie_shooter::snapshot;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Longest step fed to the core, so a stalled terminal doesn't teleport
/// everything.
const MAX_STEP_MS: u64 = 100;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

/// Terminal zombie shooter.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Skip the menu and start at this difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// JSON file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the top-five table is kept.
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn default_scores_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".zombie_shooter_scores.json")
}

fn load_board(store: &JsonFileStore) -> Leaderboard {
    store.load().unwrap_or_else(|err| {
        warn!(%err, "leaderboard unreadable, starting empty");
        Leaderboard::new()
    })
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Difficulty),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    board: &Leaderboard,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "☠  ZOMBIE  SHOOTER  ☠";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(8),
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(6)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, Difficulty, Color, &str)] = &[
        ("1", Difficulty::Easy, Color::Green, "slow horde, short levels"),
        ("2", Difficulty::Medium, Color::Yellow, "balanced"),
        ("3", Difficulty::Hard, Color::Red, "fast and relentless"),
    ];
    for (i, (key, difficulty, color, desc)) in options.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(5) + i as u16))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", difficulty.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print("Top scores:"))?;
    if board.is_empty() {
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 1))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("(none yet)"))?;
    }
    for (rank, entry) in board.entries().iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 1 + rank as u16))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(format!("{}. {:<3} {:>6}", rank + 1, entry.name, entry.score)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 7))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups: » speed  Ψ triple fire  ◊ shield"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    loop {
        if let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv() {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Difficulty::Easy)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Difficulty::Medium)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Difficulty::Hard)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game over ─────────────────────────────────────────────────────────────────

enum AfterGame {
    Quit,
    Menu,
    Restart,
}

/// Ask for initials if the score made the table, save it, then wait for the
/// player to pick what happens next.
fn game_over_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    store: &mut JsonFileStore,
    score: u32,
) -> Result<AfterGame> {
    let mut board = load_board(store);

    if score > 0 && board.qualifies(score) {
        let mut typed = String::new();
        loop {
            display::draw_game_over(out, score, &board, Some(&typed))?;
            let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv()
            else {
                continue;
            };
            match code {
                KeyCode::Char(c) if c.is_ascii_alphabetic() && typed.len() < NAME_LEN => {
                    typed.push(c.to_ascii_uppercase());
                }
                KeyCode::Backspace => {
                    typed.pop();
                }
                KeyCode::Enter => match PlayerName::parse(&typed) {
                    Ok(name) => {
                        match submit_score(store, &name, score) {
                            Ok(updated) => board = updated,
                            Err(err) => warn!(%err, "could not save score"),
                        }
                        info!(name = name.as_str(), score, "score recorded");
                        break;
                    }
                    Err(err) => debug!(%err, "name rejected"),
                },
                KeyCode::Esc => break,
                _ => {}
            }
        }
    }

    display::draw_game_over(out, score, &board, None)?;
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) = rx.recv() {
            match code {
                KeyCode::Char('r') | KeyCode::Char('R') => return Ok(AfterGame::Restart),
                KeyCode::Char('m') | KeyCode::Char('M') => return Ok(AfterGame::Menu),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(AfterGame::Quit)
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the game ends or the player quits. Returns `true` to quit the
/// program.
///
/// Input model: a `key_frame` map records the frame of the last press/repeat
/// for every key. Movement keys count as held while fresh, so several can be
/// combined with shooting. Space and P only register on the frame they were
/// pressed; the core acts on their rising edge.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<bool> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut fire = false;
        let mut pause = false;

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            info!("restart requested");
                            restart(state);
                        }
                        KeyCode::Char(' ') => fire = true,
                        KeyCode::Char('p') | KeyCode::Char('P') => pause = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = InputSnapshot {
            up: any_held(&key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
            down: any_held(
                &key_frame,
                &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
                frame,
            ),
            left: any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            right: any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
            fire,
            pause,
        };

        let now = Instant::now();
        let dt_ms = (now.duration_since(last).as_millis() as u64).min(MAX_STEP_MS);
        last = now;
        tick(state, &input, dt_ms, rng);
        for ev in &state.events {
            trace!(?ev, "game event");
        }

        display::render(out, &snapshot::build(state))?;

        if state.is_over() {
            return Ok(false);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let mut store = JsonFileStore::new(cli.scores.clone().unwrap_or_else(default_scores_path));
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(scores = %store.path().display(), seed = ?cli.seed, "starting");

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without the kitty protocol
    // fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &cli, base_config, &mut store, &mut rng);

    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    cli: &Cli,
    base_config: GameConfig,
    store: &mut JsonFileStore,
    rng: &mut StdRng,
) -> Result<()> {
    let mut preset = cli.difficulty.map(Difficulty::from);

    loop {
        let difficulty = match preset.take() {
            Some(d) => d,
            None => match show_menu(out, rx, &load_board(store))? {
                MenuResult::Quit => break,
                MenuResult::Start(d) => d,
            },
        };

        let config = base_config
            .tuned_for(difficulty)
            .with_context(|| format!("retuning for {}", difficulty.label()))?;
        let mut state = init_state(config);
        info!(difficulty = difficulty.label(), "new game");

        loop {
            if game_loop(out, &mut state, rx, rng)? {
                return Ok(());
            }
            match game_over_screen(out, rx, store, state.score)? {
                AfterGame::Quit => return Ok(()),
                AfterGame::Menu => break,
                AfterGame::Restart => restart(&mut state),
            }
        }
    }
    Ok(())
}
