mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use eyedrop_invaders::compute;
use eyedrop_invaders::drivers::Drivers;
use eyedrop_invaders::entities::{Difficulty, EnemyKind, Phase, Session, ShotKind};

/// Frame cadence of the outer loop.  The loop only polls input and the
/// driver set; actual simulation rates live in `drivers`.
const FRAME: Duration = Duration::from_millis(8);

/// Smallest terminal the HUD and selector rows fit into.
const MIN_COLS: u16 = 64;
const MIN_ROWS: u16 = 16;

// ── Held-key detection ────────────────────────────────────────────────────────

/// A key counts as "held" if its last press/repeat event arrived within this
/// window.  Covers terminals without key-release events: the OS key-repeat
/// rate is ≥ 15 Hz, so the window is always refreshed before it expires.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

fn is_held(key_seen: &HashMap<KeyCode, Instant>, key: KeyCode, now: Instant) -> bool {
    key_seen
        .get(&key)
        .map(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "eyedrop_invaders")]
#[command(about = "Educational eye-drop arcade game for the terminal")]
struct Cli {
    /// Skip the menu and start the first session at this difficulty.
    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Write diagnostics to this file (the terminal itself is in raw mode,
    /// so logs can never go to stdout).  Filtered via RUST_LOG.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
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

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Difficulty),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "◉  EYE  DROP  INVADERS  ◉";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(8),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let tagline = "Match each falling eye condition with its treatment";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(tagline.chars().count() as u16 / 2),
        cy.saturating_sub(7),
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(tagline))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(5)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green, "Slow drift, sparse spawns"),
        ("2", "Medium", Color::Yellow, "Balanced challenge"),
        ("3", "Hard  ", Color::Red, "Fast and relentless!"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(4) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    // Treatment legend — the whole point of the game
    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Know your treatments:"))?;

    for (i, kind) in EnemyKind::ALL.iter().enumerate() {
        let row = cy + 1 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print(format!("{:<15}", kind.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("→ "))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(kind.correct_shot().label()))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 7))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   1-5 : Treatment   Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the player makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
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

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu (the session has
/// been reset to Idle).
///
/// Input model: a `key_seen` map records when every key was last pressed or
/// repeated.  Each frame we check which movement keys are still fresh and
/// mirror them into the session's hold flags, so movement and shooting work
/// simultaneously.  Terminals with keyboard-enhancement support deliver real
/// release events; classic terminals fall back to the hold window expiring.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> Result<bool> {
    let mut rng = thread_rng();
    let mut drivers = Drivers::start(&session.difficulty, Instant::now());

    let mut key_seen: HashMap<KeyCode, Instant> = HashMap::new();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    key_seen.insert(code, Instant::now());

                    if kind == KeyEventKind::Press {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                drivers.stop();
                                return Ok(true);
                            }
                            KeyCode::Char('c')
                                if modifiers.contains(KeyModifiers::CONTROL) =>
                            {
                                drivers.stop();
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if session.phase == Phase::Ended =>
                            {
                                drivers.stop();
                                *session = compute::reset_session(session);
                                return Ok(false);
                            }
                            KeyCode::Char(c @ '1'..='5') => {
                                let idx = c as usize - '1' as usize;
                                *session = compute::select_shot(session, ShotKind::ALL[idx]);
                            }
                            _ => {}
                        }
                    }

                    // Fire on press and on autorepeat, like holding the button
                    if matches!(code, KeyCode::Char(' ') | KeyCode::Enter) {
                        *session = compute::fire_shot(session);
                    }
                }
                KeyEventKind::Release => {
                    key_seen.remove(&code);
                }
            }
        }

        // ── Mirror held movement keys into the session's hold flags ───────────
        let now = Instant::now();
        let left = is_held(&key_seen, KeyCode::Left, now)
            || is_held(&key_seen, KeyCode::Char('a'), now)
            || is_held(&key_seen, KeyCode::Char('A'), now);
        let right = is_held(&key_seen, KeyCode::Right, now)
            || is_held(&key_seen, KeyCode::Char('d'), now)
            || is_held(&key_seen, KeyCode::Char('D'), now);
        *session = compute::set_move_left(session, left);
        *session = compute::set_move_right(session, right);

        // ── Apply every driver tick that came due ──────────────────────────────
        let due = drivers.poll(now);
        for _ in 0..due.sim {
            *session = compute::tick(session);
        }
        for _ in 0..due.timer {
            *session = compute::second_tick(session);
        }
        for _ in 0..due.spawn {
            *session = compute::spawn_enemy(session, &mut rng);
        }

        // The end transition flips the phase from inside compute; the driver
        // set is ours to stop (idempotent, so checking every frame is fine).
        if session.phase == Phase::Ended {
            drivers.stop();
        }

        display::render(out, session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let (cols, rows) = terminal::size().context("querying terminal size")?;
    if cols < MIN_COLS || rows < MIN_ROWS {
        bail!("terminal too small: need at least {MIN_COLS}x{MIN_ROWS} cells, got {cols}x{rows}");
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, cli.difficulty.map(Difficulty::from));

    // Always restore the terminal
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
    mut preset: Option<Difficulty>,
) -> Result<()> {
    loop {
        let difficulty = match preset.take() {
            Some(d) => d,
            None => match show_menu(out, rx)? {
                MenuResult::Quit => break,
                MenuResult::Start(d) => d,
            },
        };

        let (cols, rows) = terminal::size().context("querying terminal size")?;
        let bounds = display::play_bounds(cols, rows);
        let mut session = compute::start_session(difficulty, bounds);

        // On play-again the loop hands the session back reset to Idle.
        let quit = game_loop(out, &mut session, rx)?;
        if quit {
            break;
        }
    }
    Ok(())
}
