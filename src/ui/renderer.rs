/// Presentation layer: text frames built from a `State`.
///
/// How it works:
///   1. `TextRenderer::render` maps every cell to one glyph
///   2. `write_frame` prints a status line, then the glyph rows, switching
///      foreground colour only when it changes
///   3. All commands are batched with `queue!`, flushed once at the end
///
/// Rendering reads snapshots only; it never touches the simulation.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{GhostMode, Position};
use crate::domain::rules::Grid;
use crate::domain::tile::Cell;
use crate::error::RenderError;
use crate::sim::env::Environment;
use crate::sim::lifecycle::Outcome;
use crate::sim::snapshot::State;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Text,
    /// Reserved for external front ends. Not produced here.
    Graphical,
}

// ── Glyphs ──

/// Glyph legend:
///   '#' wall   'G' den door   '.' pellet   '@' power pellet
///   'P' Pac-Man   '0'..'9' ghost by id   'f' frightened ghost
pub struct TextRenderer;

impl TextRenderer {
    /// One string per grid row.
    pub fn render(state: &State, grid: &Grid) -> Vec<String> {
        (0..grid.height())
            .map(|y| (0..grid.width()).map(|x| glyph(state, grid, Position::new(x, y))).collect())
            .collect()
    }
}

fn glyph(state: &State, grid: &Grid, p: Position) -> char {
    if state.pacman_location == p {
        return 'P';
    }
    let ghosts = state.ghost_locations.iter().zip(&state.ghost_ids).zip(&state.ghost_modes);
    for ((&at, &id), &mode) in ghosts {
        if at == p {
            return match mode {
                GhostMode::Frightened => 'f',
                _ => char::from(b'0' + id % 10),
            };
        }
    }
    match state.pellets.get(p) {
        Some(item) if item.is_power() => '@',
        Some(_) => '.',
        None => match grid.cell(p) {
            Cell::Wall => '#',
            Cell::DenDoor => 'G',
            Cell::Floor => ' ',
        },
    }
}

fn glyph_color(ch: char) -> Color {
    match ch {
        '#' => Color::Rgb { r: 40, g: 60, b: 200 },
        'G' => Color::Rgb { r: 255, g: 160, b: 200 },
        '.' => Color::Rgb { r: 230, g: 200, b: 170 },
        '@' => Color::Rgb { r: 255, g: 240, b: 120 },
        'P' => Color::Yellow,
        'f' => Color::Rgb { r: 60, g: 60, b: 255 },
        '0' => Color::Red,
        '1' => Color::Magenta,
        '2' => Color::Cyan,
        '3' => Color::DarkYellow,
        c if c.is_ascii_digit() => Color::Green,
        _ => Color::White,
    }
}

fn status_line(state: &State) -> String {
    let tail = match state.outcome {
        Outcome::Running => "",
        Outcome::Won => "  CLEARED",
        Outcome::Lost => "  GAME OVER",
        Outcome::Truncated => "  TIME UP",
    };
    format!(
        "Lives: {}  Step: {}  Score: {}{}",
        state.lives_remaining, state.steps_taken, state.score, tail
    )
}

/// Write one coloured frame: status line, then the board.
pub fn write_frame<W: Write>(out: &mut W, state: &State, grid: &Grid) -> io::Result<()> {
    queue!(out, SetForegroundColor(Color::White), Print(status_line(state)), Print("\r\n"))?;

    let mut last_fg = Color::White;
    for line in TextRenderer::render(state, grid) {
        for ch in line.chars() {
            let fg = glyph_color(ch);
            if fg != last_fg {
                queue!(out, SetForegroundColor(fg))?;
                last_fg = fg;
            }
            queue!(out, Print(ch))?;
        }
        queue!(out, Print("\r\n"))?;
    }

    queue!(out, ResetColor)?;
    out.flush()
}

// ── Terminal ──

/// Alternate-screen terminal for the demo driver.
pub struct Renderer {
    writer: BufWriter<io::Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
    }

    /// Redraw the whole frame from the top-left corner.
    pub fn present(&mut self, env: &Environment) -> Result<(), RenderError> {
        queue!(self.writer, MoveTo(0, 0), Clear(ClearType::All))?;
        env.render(&mut self.writer)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
