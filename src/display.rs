/// Rendering layer, all terminal I/O lives here.
///
/// Each function receives a mutable writer and a `RenderSnapshot`. World
/// coordinates are scaled onto whatever terminal size is available; no game
/// logic runs here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use zombie_shooter::boss::BossPhase;
use zombie_shooter::entities::PowerUpKind;
use zombie_shooter::leaderboard::{Leaderboard, NAME_LEN};
use zombie_shooter::snapshot::{RenderSnapshot, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkGreen;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_COMBO: Color = Color::Magenta;
const C_POWERUP_ACTIVE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Terminal cell rectangle of the play field (inside the border).
#[derive(Clone, Copy)]
struct Field {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
    sx: f32,
    sy: f32,
}

impl Field {
    fn new(snapshot: &RenderSnapshot, width: u16, height: u16) -> Self {
        // Row 0 HUD, row 1 top border, row h-2 bottom border, row h-1 hint.
        let cols = width.saturating_sub(2).max(1);
        let rows = height.saturating_sub(4).max(1);
        Self {
            left: 1,
            top: 2,
            cols,
            rows,
            sx: cols as f32 / snapshot.world_width.max(1.0),
            sy: rows as f32 / snapshot.world_height.max(1.0),
        }
    }

    /// Cell span covered by a sprite, clipped to the field. `None` if the
    /// sprite lies entirely outside.
    fn cells(&self, s: &Sprite) -> Option<(u16, u16, u16, u16)> {
        let x0 = (s.x * self.sx).floor() as i32;
        let y0 = (s.y * self.sy).floor() as i32;
        let x1 = ((s.x + s.w) * self.sx).ceil() as i32 - 1;
        let y1 = ((s.y + s.h) * self.sy).ceil() as i32 - 1;
        let (max_x, max_y) = (self.cols as i32 - 1, self.rows as i32 - 1);
        if x1 < 0 || y1 < 0 || x0 > max_x || y0 > max_y {
            return None;
        }
        let clip = |v: i32, max: i32| v.clamp(0, max) as u16;
        Some((
            self.left + clip(x0, max_x),
            self.top + clip(y0, max_y),
            self.left + clip(x1.max(x0), max_x),
            self.top + clip(y1.max(y0), max_y),
        ))
    }
}

fn glyph(texture: &str) -> (&'static str, Color) {
    match texture {
        "zombie" => ("Z", Color::Green),
        "mini_boss" => ("M", Color::DarkYellow),
        "mega_boss" => ("█", Color::Red),
        "mega_boss_shielded" => ("▓", Color::Blue),
        "bullet" => ("║", Color::Cyan),
        "shard" => ("*", Color::Magenta),
        "powerup_speed" => ("»", Color::Yellow),
        "powerup_triple" => ("Ψ", Color::Cyan),
        "powerup_shield" => ("◊", Color::Blue),
        "player" => ("A", Color::White),
        "player_shielded" => ("@", Color::Cyan),
        _ => ("?", Color::DarkGrey),
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snapshot: &RenderSnapshot) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let field = Field::new(snapshot, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, width, height)?;
    draw_hud(out, snapshot, width)?;

    for sprite in snapshot.sprites.iter().filter(|s| s.visible) {
        draw_sprite(out, &field, sprite)?;
    }

    draw_controls_hint(out, height)?;

    if snapshot.hud.paused {
        draw_banner(out, width, height, &[("║   PAUSED   ║", Color::Yellow)])?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snapshot: &RenderSnapshot, width: u16) -> std::io::Result<()> {
    let hud = &snapshot.hud;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score:{:>6}  Lv {:>2}  {}/{}",
        hud.score, hud.level, hud.kills_this_level, hud.kills_to_advance
    )))?;
    if hud.combo > 1 {
        out.queue(style::SetForegroundColor(C_HUD_COMBO))?;
        out.queue(Print(format!("  x{}", hud.combo)))?;
    }

    if let Some(boss) = &hud.boss {
        let tag = match boss.phase {
            BossPhase::Vulnerable => "OPEN",
            BossPhase::Entering => "INCOMING",
            _ => "SHIELD",
        };
        let label = format!("[BOSS {} {}/{}]", tag, boss.hits, boss.required_hits);
        let color = if boss.phase.accepts_damage() {
            Color::Red
        } else {
            Color::Blue
        };
        out.queue(cursor::MoveTo(
            (width / 2).saturating_sub(label.len() as u16 / 2),
            0,
        ))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(label))?;
    }

    let power_tag: String = hud
        .power_ups
        .iter()
        .map(|p| {
            let name = match p.kind {
                PowerUpKind::Speed => "SPD",
                PowerUpKind::TripleFire => "TRI",
                PowerUpKind::Shield => "SHD",
            };
            format!("[{} {}s] ", name, p.remaining_ms / 1000 + 1)
        })
        .collect();
    let lives_str = format!("Lives:{}", "♥".repeat(hud.lives as usize));
    let total = power_tag.chars().count() + lives_str.chars().count();

    out.queue(cursor::MoveTo(width.saturating_sub(total as u16 + 1), 0))?;
    if !power_tag.is_empty() {
        out.queue(style::SetForegroundColor(C_POWERUP_ACTIVE))?;
        out.queue(Print(&power_tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_sprite<W: Write>(out: &mut W, field: &Field, sprite: &Sprite) -> std::io::Result<()> {
    let Some((x0, y0, x1, y1)) = field.cells(sprite) else {
        return Ok(());
    };
    let (ch, color) = glyph(sprite.texture);
    out.queue(style::SetForegroundColor(color))?;

    // Bosses fill their footprint; everything else is one glyph at the centre.
    if sprite.texture.starts_with("mega_boss") {
        let row = ch.repeat((x1 - x0 + 1) as usize);
        for y in y0..=y1 {
            out.queue(cursor::MoveTo(x0, y))?;
            out.queue(Print(&row))?;
        }
    } else {
        out.queue(cursor::MoveTo(x0 + (x1 - x0) / 2, y0 + (y1 - y0) / 2))?;
        out.queue(Print(ch))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD/arrows: Move  SPACE: Shoot  P: Pause  Q: Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

/// Game-over box with the final score and the current table. While
/// `name_entry` is `Some`, a prompt for the player's initials is shown.
pub fn draw_game_over<W: Write>(
    out: &mut W,
    score: u32,
    board: &Leaderboard,
    name_entry: Option<&str>,
) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;

    let score_line = format!("Final Score: {:>6}", score);
    let mut lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".into(), Color::Red),
        ("║    GAME  OVER      ║".into(), Color::Red),
        ("╚════════════════════╝".into(), Color::Red),
        (score_line, Color::Yellow),
        (String::new(), Color::Reset),
    ];
    for (rank, entry) in board.entries().iter().enumerate() {
        lines.push((
            format!("{}. {:<3} {:>6}", rank + 1, entry.name, entry.score),
            Color::White,
        ));
    }
    lines.push((String::new(), Color::Reset));

    match name_entry {
        Some(typed) => {
            let blanks = "_".repeat(NAME_LEN.saturating_sub(typed.chars().count()));
            lines.push((format!("New high score! Name: {}{}", typed, blanks), Color::Cyan));
            lines.push(("ENTER - Save".into(), C_HINT));
        }
        None => lines.push(("R - Play Again  M - Menu  Q - Quit".into(), Color::White)),
    }

    let borrowed: Vec<(&str, Color)> = lines.iter().map(|(s, c)| (s.as_str(), *c)).collect();
    draw_banner(out, width, height, &borrowed)?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
