use crate::game::ClientGameState;
use macroquad::prelude::*;
use shared::{Attr, Cell, ParticipantView};

const BACKGROUND: Color = Color::new(0.1, 0.1, 0.1, 1.0);
const STATUS_HEIGHT: f32 = 28.0;

pub struct Renderer {
    cell_size: f32,
}

impl Renderer {
    pub fn new(cell_size: f32) -> Self {
        Renderer { cell_size }
    }

    /// Window size needed for a grid of the given dimensions
    pub fn window_size(&self, columns: usize, rows: usize) -> (i32, i32) {
        let width = (columns.max(20) as f32 * self.cell_size).ceil() as i32;
        let height = (rows.max(10) as f32 * self.cell_size + STATUS_HEIGHT).ceil() as i32;
        (width, height)
    }

    pub fn render(&self, game: &ClientGameState) {
        clear_background(BACKGROUND);

        for (y, row) in game.snapshot.grid.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                self.draw_cell(x as f32, y as f32, cell);
            }
        }

        for participant in game.participants() {
            let is_me = participant.id == game.participant_id;
            self.draw_participant(participant, is_me);
        }

        self.draw_status(&game.status_line());
    }

    fn draw_cell(&self, x: f32, y: f32, cell: &Cell) {
        let size = self.cell_size;
        let (px, py) = (x * size, y * size);

        if cell.bg != Attr::DEFAULT {
            draw_rectangle(px, py, size, size, attr_color(cell.bg, BACKGROUND));
        }
        self.draw_glyph(px, py, cell.symbol, attr_color(cell.fg, WHITE));
    }

    /// The default font only covers ASCII; other glyphs become a dot
    fn draw_glyph(&self, px: f32, py: f32, symbol: char, color: Color) {
        let size = self.cell_size;
        if symbol == ' ' {
            return;
        }

        if symbol.is_ascii_graphic() {
            draw_text(&symbol.to_string(), px + size * 0.2, py + size * 0.8, size, color);
        } else {
            draw_circle(px + size / 2.0, py + size / 2.0, size * 0.3, color);
        }
    }

    fn draw_participant(&self, participant: &ParticipantView, is_me: bool) {
        let size = self.cell_size;
        let cx = participant.x as f32 * size + size / 2.0;
        let cy = participant.y as f32 * size + size / 2.0;

        draw_circle(cx, cy, size * 0.45, attr_color(participant.appearance.fg, WHITE));
        if is_me {
            draw_circle_lines(cx, cy, size * 0.45, 2.0, YELLOW);
        }

        draw_text(
            &participant.id.to_string(),
            cx - size * 0.2,
            cy + size * 0.2,
            size * 0.6,
            BLACK,
        );
    }

    fn draw_status(&self, line: &str) {
        let y = screen_height() - STATUS_HEIGHT / 3.0;
        draw_text(line, 6.0, y, 20.0, LIGHTGRAY);
    }
}

/// Converts a display attribute to a color; `Attr::DEFAULT` uses `fallback`
pub fn attr_color(attr: Attr, fallback: Color) -> Color {
    let base = match attr.color() {
        Attr::BLACK => Color::from_rgba(0, 0, 0, 255),
        Attr::RED => Color::from_rgba(205, 49, 49, 255),
        Attr::GREEN => Color::from_rgba(13, 188, 121, 255),
        Attr::YELLOW => Color::from_rgba(229, 229, 16, 255),
        Attr::BLUE => Color::from_rgba(36, 114, 200, 255),
        Attr::MAGENTA => Color::from_rgba(188, 63, 188, 255),
        Attr::CYAN => Color::from_rgba(17, 168, 205, 255),
        Attr::WHITE => Color::from_rgba(229, 229, 229, 255),
        Attr::DARK_GRAY => Color::from_rgba(102, 102, 102, 255),
        _ => fallback,
    };

    if attr.has(Attr::DIM) {
        Color::new(base.r * 0.6, base.g * 0.6, base.b * 0.6, base.a)
    } else {
        base
    }
}
