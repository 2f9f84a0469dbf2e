use ratatui::prelude::*;
use ratatui::widgets::*;

use super::board::{HEIGHT, WIDTH};
use super::piece::Shape;
use super::session::Session;
use crate::games::Phase;

const BG: Color = Color::Rgb(10, 10, 20);
const FRAME: Color = Color::Rgb(0, 210, 255);
const GHOST: Color = Color::Rgb(70, 70, 90);
const DIM: Color = Color::Rgb(136, 136, 136);

fn shape_color(shape: Shape) -> Color {
    match shape {
        Shape::I => Color::Rgb(0, 255, 65),
        Shape::O => Color::Rgb(255, 221, 0),
        Shape::T => Color::Rgb(255, 71, 87),
        Shape::S => Color::Rgb(0, 210, 255),
        Shape::Z => Color::Rgb(255, 99, 72),
        Shape::J => Color::Rgb(95, 39, 205),
        Shape::L => Color::Rgb(255, 159, 243),
    }
}

pub struct View<'a> {
    pub session: &'a Session,
    pub phase: Phase,
    pub paused: bool,
    pub level: u32,
    /// Points of the latest clear while its flash is showing.
    pub flash: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Empty,
    Locked(Shape),
    Ghost,
    Active(Shape),
}

/// What every board cell shows this frame. The falling piece and its
/// landing preview are only drawn while a round is in play.
fn paint(view: &View) -> Vec<[Paint; WIDTH]> {
    let mut grid: Vec<[Paint; WIDTH]> = view
        .session
        .board
        .rows()
        .map(|&row| row.map(|cell| cell.map_or(Paint::Empty, Paint::Locked)))
        .collect();
    if view.phase != Phase::Playing {
        return grid;
    }

    let piece = view.session.piece;
    let drop = view.session.ghost_y() - piece.y;
    let mut mark = |col: i32, row: i32, paint: Paint| {
        if (0..WIDTH as i32).contains(&col) && (0..HEIGHT as i32).contains(&row) {
            grid[row as usize][col as usize] = paint;
        }
    };
    for (col, row) in piece.absolute() {
        mark(col, row + drop, Paint::Ghost);
    }
    for (col, row) in piece.absolute() {
        mark(col, row, Paint::Active(piece.shape));
    }
    grid
}

fn cell_span(paint: Paint) -> Span<'static> {
    match paint {
        Paint::Empty => Span::styled(" ·", Style::default().fg(Color::Rgb(30, 30, 45)).bg(BG)),
        Paint::Ghost => Span::styled("░░", Style::default().fg(GHOST).bg(BG)),
        Paint::Locked(shape) => Span::styled("██", Style::default().fg(shape_color(shape)).bg(BG)),
        Paint::Active(shape) => Span::styled(
            "██",
            Style::default().fg(shape_color(shape)).bg(BG).add_modifier(Modifier::BOLD),
        ),
    }
}

pub fn draw(frame: &mut Frame, area: Rect, view: &View) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(FRAME))
        .title(" 🟪 Tetris ")
        .title_style(Style::default().fg(FRAME).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(view)), chunks[0]);

    // two terminal columns per cell, plus the well's side walls
    let well_w = (WIDTH as u16 * 2 + 2).min(chunks[1].width);
    let well_h = (HEIGHT as u16 + 2).min(chunks[1].height);
    let well = Rect::new(
        chunks[1].x + (chunks[1].width - well_w) / 2,
        chunks[1].y + (chunks[1].height - well_h) / 2,
        well_w,
        well_h,
    );
    let well_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Color::Rgb(60, 60, 90)));
    let field = well_block.inner(well);
    frame.render_widget(well_block, well);

    let lines: Vec<Line> = paint(view)
        .into_iter()
        .map(|row| Line::from(row.into_iter().map(cell_span).collect::<Vec<_>>()))
        .collect();
    frame.render_widget(Paragraph::new(lines), field);

    if let Some(text) = overlay(view) {
        let h = (text.len() as u16).min(field.height);
        let panel = Rect::new(field.x, field.y + field.height.saturating_sub(h) / 2, field.width, h);
        frame.render_widget(Clear, panel);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).style(Style::default().bg(BG)),
            panel,
        );
    }

    frame.render_widget(Paragraph::new(help_line(view.phase)), chunks[2]);
}

fn overlay(view: &View) -> Option<Vec<Line<'static>>> {
    let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    match view.phase {
        Phase::Playing if view.paused => Some(vec![Line::styled("⏸ PAUSED", bold(Color::Yellow))]),
        Phase::Playing => None,
        Phase::Lost | Phase::Won => Some(vec![
            Line::styled("GAME OVER", bold(shape_color(Shape::T))),
            Line::from(""),
            Line::styled(format!("Score: {}", view.session.score), Style::default().fg(Color::White)),
            Line::styled(format!("Lines: {}", view.session.lines), Style::default().fg(Color::White)),
            Line::from(""),
            Line::styled("Press any key", Style::default().fg(DIM)),
        ]),
        Phase::Menu => Some(vec![
            Line::styled("TETRIS", bold(FRAME)),
            Line::from(""),
            Line::styled("Press any key", Style::default().fg(DIM)),
            Line::styled("to start", Style::default().fg(DIM)),
        ]),
    }
}

fn status_line(view: &View) -> Line<'static> {
    let sep = || Span::styled(" │ ", Style::default().fg(Color::DarkGray));
    let mut spans = vec![
        Span::styled(
            format!(" Score: {}", view.session.score),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        sep(),
        Span::styled(format!("Lines: {}", view.session.lines), Style::default().fg(Color::Green)),
        sep(),
        Span::styled(format!("Level: {}", view.level), Style::default().fg(Color::Cyan)),
    ];
    if let Some(points) = view.flash {
        spans.push(sep());
        spans.push(Span::styled(
            format!("+{points}!"),
            Style::default().fg(shape_color(Shape::O)).add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

fn help_line(phase: Phase) -> Line<'static> {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::DarkGray);
    let sep = Style::default().fg(Color::Rgb(60, 60, 60));
    if phase != Phase::Playing {
        return Line::from(vec![
            Span::styled(" Any key ", key),
            Span::styled("Play ", text),
            Span::styled("│ ", sep),
            Span::styled("Esc ", key),
            Span::styled("Menu", text),
        ]);
    }
    Line::from(vec![
        Span::styled(" ←→/AD ", key),
        Span::styled("Move ", text),
        Span::styled("│ ", sep),
        Span::styled("↑/W ", key),
        Span::styled("Rotate ", text),
        Span::styled("│ ", sep),
        Span::styled("↓/S ", key),
        Span::styled("Soft drop ", text),
        Span::styled("│ ", sep),
        Span::styled("SPACE ", key),
        Span::styled("Hard drop ", text),
        Span::styled("│ ", sep),
        Span::styled("P ", key),
        Span::styled("Pause ", text),
        Span::styled("│ ", sep),
        Span::styled("R ", key),
        Span::styled("Restart", text),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(session: &Session, phase: Phase) -> View<'_> {
        View {
            session,
            phase,
            paused: false,
            level: 1,
            flash: None,
        }
    }

    #[test]
    fn playing_shows_piece_and_landing_spot() {
        let mut session = Session::new(1);
        session.spawn_shape(Shape::O);
        let grid = paint(&view(&session, Phase::Playing));
        assert_eq!(grid[0][3], Paint::Active(Shape::O));
        assert_eq!(grid[1][4], Paint::Active(Shape::O));
        assert_eq!(grid[HEIGHT - 1][3], Paint::Ghost);
        assert_eq!(grid[HEIGHT - 2][4], Paint::Ghost);
        assert_eq!(grid[10][3], Paint::Empty);
    }

    #[test]
    fn menu_hides_the_falling_piece() {
        let mut session = Session::new(2);
        session.board.set(0, HEIGHT - 1, Some(Shape::J));
        let grid = paint(&view(&session, Phase::Menu));
        assert_eq!(grid[HEIGHT - 1][0], Paint::Locked(Shape::J));
        let drawn = grid.iter().flatten().filter(|p| **p != Paint::Empty).count();
        assert_eq!(drawn, 1);
    }

    #[test]
    fn flash_appears_in_status() {
        let session = Session::new(3);
        let mut v = view(&session, Phase::Playing);
        v.flash = Some(300);
        let text: String = status_line(&v).spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.contains("+300!"));
        assert!(text.contains("Level: 1"));
    }
}
