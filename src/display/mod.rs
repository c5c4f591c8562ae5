/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only translates
/// simulation state (positions in logical pixels, visual categories) into
/// terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use eyedrop_invaders::compute::{player_top, MAX_HEALTH, SHOT_WIDTH};
use eyedrop_invaders::entities::{Badge, Bounds, EnemyKind, Phase, Session, ShotKind};

// ── Pixel ↔ cell mapping ──────────────────────────────────────────────────────
//
// The simulation runs in a continuous pixel space; one terminal cell covers
// a 10×20 px patch (cells are roughly twice as tall as they are wide).

const CELL_W: f32 = 10.0;
const CELL_H: f32 = 20.0;

// Fixed chrome rows: HUD (0), top border (1), …, bottom border, treatment
// selector, controls hint.
const PLAY_TOP_ROW: u16 = 2;
const CHROME_ROWS: u16 = 5;

/// Logical play-area size for a terminal of `cols`×`rows` cells.
pub fn play_bounds(cols: u16, rows: u16) -> Bounds {
    Bounds {
        width: cols.saturating_sub(2) as f32 * CELL_W,
        height: rows.saturating_sub(CHROME_ROWS) as f32 * CELL_H,
    }
}

/// Terminal geometry recovered from the session's play bounds.
struct Grid {
    cols: u16,
    rows: u16,
}

impl Grid {
    fn of(bounds: &Bounds) -> Grid {
        Grid {
            cols: (bounds.width / CELL_W).round() as u16 + 2,
            rows: (bounds.height / CELL_H).round() as u16 + CHROME_ROWS,
        }
    }

    fn bottom_border_row(&self) -> u16 {
        self.rows.saturating_sub(3)
    }

    /// Column for a pixel x, clamped inside the side walls.
    fn col(&self, x: f32) -> u16 {
        let c = 1 + (x.max(0.0) / CELL_W) as u16;
        c.min(self.cols.saturating_sub(2))
    }

    /// Row for a pixel y, or None while the entity is still above the view.
    fn row(&self, y: f32) -> Option<u16> {
        if y < 0.0 {
            return None;
        }
        let r = PLAY_TOP_ROW + (y / CELL_H) as u16;
        if r >= self.bottom_border_row() {
            None
        } else {
            Some(r)
        }
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

/// One colour per treatment; the matching condition wears the same colour,
/// which doubles as a gameplay hint.
fn shot_color(kind: &ShotKind) -> Color {
    match kind {
        ShotKind::Lubricant => Color::Cyan,
        ShotKind::Antihistamine => Color::Yellow,
        ShotKind::Decongestant => Color::DarkYellow,
        ShotKind::Corticosteroid => Color::Red,
        ShotKind::Antiglaucoma => Color::Magenta,
    }
}

fn enemy_color(kind: &EnemyKind) -> Color {
    shot_color(&kind.correct_shot())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame of an Active or Ended session.
pub fn render<W: Write>(out: &mut W, state: &Session) -> std::io::Result<()> {
    let grid = Grid::of(&state.bounds);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &grid)?;
    draw_hud(out, &grid, state)?;

    for enemy in &state.enemies {
        if let Some(row) = grid.row(enemy.y) {
            let col = grid.col(enemy.x);
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(enemy_color(&enemy.kind)))?;
            out.queue(Print(fit(enemy.kind.label(), &grid, col)))?;
        }
    }

    for shot in &state.shots {
        if let Some(row) = grid.row(shot.y) {
            out.queue(cursor::MoveTo(grid.col(shot.x + SHOT_WIDTH / 2.0), row))?;
            out.queue(style::SetForegroundColor(shot_color(&shot.kind)))?;
            out.queue(Print("║"))?;
        }
    }

    for flash in &state.explosions {
        if let Some(row) = grid.row(flash.y) {
            out.queue(cursor::MoveTo(grid.col(flash.x), row))?;
            out.queue(style::SetForegroundColor(enemy_color(&flash.kind)))?;
            out.queue(Print("✦"))?;
        }
    }

    draw_player(out, &grid, state)?;
    draw_selector(out, &grid, state)?;
    draw_controls_hint(out, &grid)?;

    if state.phase == Phase::Ended {
        draw_end_screen(out, &grid, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, grid.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Truncate a label so it never runs into the right wall.
fn fit<'a>(label: &'a str, grid: &Grid, col: u16) -> &'a str {
    let room = grid.cols.saturating_sub(1).saturating_sub(col) as usize;
    &label[..label.len().min(room)]
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    let w = grid.cols as usize;
    let bottom = grid.bottom_border_row();

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in PLAY_TOP_ROW..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(grid.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, grid: &Grid, state: &Session) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score)))?;

    // Timer — centre, turning red for the last ten seconds
    let time_str = format!("Time {:02}:{:02}", state.time_left / 60, state.time_left % 60);
    let time_color = if state.time_left <= 10 {
        Color::Red
    } else {
        Color::White
    };
    let tx = (grid.cols / 2).saturating_sub(time_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(time_color))?;
    out.queue(Print(&time_str))?;

    // Health — right, as a ten-segment bar
    let filled = ((state.health + 9) / 10).min(10) as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(10 - filled);
    let health_text = format!("Health {} {:>3}", bar, state.health);
    let health_color = match state.health {
        h if h > MAX_HEALTH / 2 => Color::Green,
        h if h > MAX_HEALTH / 4 => Color::Yellow,
        _ => Color::Red,
    };
    let rx = grid
        .cols
        .saturating_sub(health_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(health_color))?;
    out.queue(Print(&health_text))?;

    Ok(())
}

// ── Player ────────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, grid: &Grid, state: &Session) -> std::io::Result<()> {
    // Dropper-bottle sprite (2 rows, 3 cols):
    //   ▲       ← nozzle, where shots appear
    //  ▐█▌      ← bottle body
    let center_px = state.player_x / 100.0 * state.bounds.width;
    let ccol = grid.col(center_px);
    let top = grid
        .row(player_top(&state.bounds))
        .unwrap_or_else(|| grid.bottom_border_row().saturating_sub(2));

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(ccol, top))?;
    out.queue(Print("▲"))?;
    if top + 1 < grid.bottom_border_row() {
        out.queue(cursor::MoveTo(ccol.saturating_sub(1).max(1), top + 1))?;
        out.queue(Print("▐█▌"))?;
    }

    Ok(())
}

// ── Treatment selector (second-to-last row) ───────────────────────────────────

fn draw_selector<W: Write>(out: &mut W, grid: &Grid, state: &Session) -> std::io::Result<()> {
    let row = grid.rows.saturating_sub(2);
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Treatment "))?;
    for (i, kind) in ShotKind::ALL.iter().enumerate() {
        if *kind == state.selected_shot {
            out.queue(style::SetForegroundColor(shot_color(kind)))?;
            out.queue(Print(format!("[{}]", i + 1)))?;
        } else {
            out.queue(style::SetForegroundColor(C_HINT))?;
            out.queue(Print(format!(" {} ", i + 1)))?;
        }
    }
    out.queue(style::SetForegroundColor(shot_color(&state.selected_shot)))?;
    out.queue(Print(format!(" ▶ {}", state.selected_shot.label())))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, grid.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Shoot   1-5 : Treatment   Q : Quit",
    ))?;
    Ok(())
}

// ── End-of-session overlay ────────────────────────────────────────────────────

fn badge_color(badge: &Badge) -> Color {
    match badge {
        Badge::Legend => Color::Yellow,
        Badge::Hero => Color::Cyan,
        Badge::Novice => Color::DarkGrey,
    }
}

fn draw_end_screen<W: Write>(out: &mut W, grid: &Grid, state: &Session) -> std::io::Result<()> {
    let Some(summary) = &state.summary else {
        return Ok(());
    };

    let score_line = format!("Final Score: {}", summary.score);
    let hits_line = format!("Correct: {}   Wrong: {}", summary.correct, summary.wrong);
    let acc_line = format!("Accuracy: {:.1}%", summary.accuracy);
    let badge_line = format!("★ {} ★", summary.badge.label());

    let lines: &[(&str, Color)] = &[
        ("╔══════════════════════╗", Color::Cyan),
        ("║   SESSION COMPLETE   ║", Color::Cyan),
        ("╚══════════════════════╝", Color::Cyan),
        (&score_line, Color::Yellow),
        (&hits_line, Color::White),
        (&acc_line, Color::White),
        (&badge_line, badge_color(&summary.badge)),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = grid.cols / 2;
    let start_row = (grid.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
