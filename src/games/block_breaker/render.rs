use ratatui::prelude::*;
use ratatui::widgets::*;

use super::state::{
    PowerupKind, Session, BALL_SIZE, BLOCK_COLS, BLOCK_HEIGHT, BLOCK_ROWS, BLOCK_WIDTH, HEIGHT,
    PADDLE_HEIGHT, PADDLE_Y, POWERUP_SIZE, WIDTH,
};
use crate::games::Phase;
use crate::ui::canvas::Canvas;

const BG: Color = Color::Rgb(26, 26, 46);
const PADDLE: Color = Color::Rgb(79, 172, 254);
const PADDLE_GLOW: Color = Color::Rgb(58, 143, 217);
const BALL: Color = Color::Rgb(245, 245, 245);
const DIM: Color = Color::Rgb(136, 136, 136);
const ROW_COLORS: [Color; BLOCK_ROWS] = [
    Color::Rgb(255, 71, 87),
    Color::Rgb(255, 99, 72),
    Color::Rgb(255, 165, 2),
    Color::Rgb(255, 221, 89),
    Color::Rgb(38, 222, 129),
    Color::Rgb(32, 191, 107),
];

fn powerup_color(kind: PowerupKind) -> Color {
    match kind {
        PowerupKind::Expand => Color::Rgb(79, 172, 254),
        PowerupKind::Multi => Color::Rgb(155, 89, 182),
        PowerupKind::Slow => Color::Rgb(52, 152, 219),
        PowerupKind::Fast => Color::Rgb(231, 76, 60),
    }
}

/// Draw the whole tab. Returns the playfield rect so the pointer can be
/// mapped back into world units.
pub fn draw(frame: &mut Frame, area: Rect, session: &Session, phase: Phase, paused: bool) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PADDLE))
        .title(" 🧱 Block Breaker ")
        .title_style(Style::default().fg(PADDLE).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(session)), chunks[0]);

    let field = fit_field(chunks[1]);
    let mut canvas = Canvas::new(field.width as usize, field.height as usize, WIDTH, HEIGHT, BG);
    match phase {
        Phase::Playing => draw_play(&mut canvas, session),
        _ => draw_screen(&mut canvas, session, phase),
    }
    if paused {
        let row = canvas.height() / 2;
        canvas.text_centered(
            row,
            " ⏸ PAUSED - P to resume ",
            Style::default().fg(Color::Yellow).bg(BG).add_modifier(Modifier::BOLD),
        );
    }
    frame.render_widget(Paragraph::new(canvas.into_lines()), field);

    frame.render_widget(Paragraph::new(help_line(phase)), chunks[2]);
    field
}

/// Keep the 5:6 world roughly in proportion; terminal cells are about
/// twice as tall as they are wide.
fn fit_field(area: Rect) -> Rect {
    let ideal = (area.height as f32 * 2.0 * WIDTH / HEIGHT) as u16;
    let width = ideal.clamp(1, area.width.max(1));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    Rect::new(x, area.y, width, area.height)
}

fn draw_play(canvas: &mut Canvas, session: &Session) {
    for block in session.blocks.iter().filter(|b| b.visible) {
        let style = canvas.fg(ROW_COLORS[block.row % ROW_COLORS.len()]);
        canvas.fill_rect(block.x, block.y, BLOCK_WIDTH, BLOCK_HEIGHT, '█', style);
        if let Some(kind) = block.powerup {
            let marker = Style::default()
                .fg(Color::White)
                .bg(ROW_COLORS[block.row % ROW_COLORS.len()])
                .add_modifier(Modifier::BOLD);
            canvas.ellipse(block.x, block.y, BLOCK_WIDTH, BLOCK_HEIGHT, kind.symbol(), marker);
        }
    }

    for p in &session.powerups {
        let color = powerup_color(p.kind);
        canvas.fill_rect(p.x, p.y, POWERUP_SIZE, POWERUP_SIZE, '▒', canvas.fg(color));
        let marker = Style::default().fg(Color::White).bg(color).add_modifier(Modifier::BOLD);
        canvas.ellipse(p.x, p.y, POWERUP_SIZE, POWERUP_SIZE, p.kind.symbol(), marker);
    }

    let paddle = session.paddle;
    let glow = if paddle.is_expanded() { Color::Rgb(120, 200, 255) } else { PADDLE_GLOW };
    canvas.fill_rect(
        paddle.x,
        PADDLE_Y,
        paddle.width,
        PADDLE_HEIGHT,
        '═',
        Style::default().fg(glow).bg(PADDLE).add_modifier(Modifier::BOLD),
    );

    for ball in &session.balls {
        let n = ball.trail.len();
        for (i, &(tx, ty)) in ball.trail.iter().enumerate() {
            let v = (200.0 * (i + 1) as f32 / n as f32 * 0.5) as u8;
            canvas.ellipse(tx, ty, BALL_SIZE, BALL_SIZE, '·', canvas.fg(Color::Rgb(v, v, v)));
        }
        let style = canvas.fg(BALL).add_modifier(Modifier::BOLD);
        canvas.ellipse(ball.x, ball.y, BALL_SIZE, BALL_SIZE, '●', style);
    }
}

fn draw_screen(canvas: &mut Canvas, session: &Session, phase: Phase) {
    let (title, color, subtitle, prompt) = match phase {
        Phase::Won => (
            "YOU WIN!",
            PADDLE,
            format!("Final Score: {}", session.score),
            "Press SPACE to play again",
        ),
        Phase::Lost => (
            "GAME OVER",
            ROW_COLORS[0],
            format!("Final Score: {}", session.score),
            "Press SPACE to try again",
        ),
        _ => (
            "BLOCK BREAKER",
            PADDLE,
            "Arrow keys, A/D or mouse to move".to_string(),
            "Press SPACE to start",
        ),
    };
    let mid = canvas.height() / 2;
    canvas.text_centered(
        mid.saturating_sub(3),
        title,
        canvas.fg(color).add_modifier(Modifier::BOLD),
    );
    canvas.text_centered(mid, &subtitle, canvas.fg(Color::White));
    canvas.text_centered(mid + 2, prompt, canvas.fg(DIM));
}

fn status_line(session: &Session) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!(" Score: {} ", session.score),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Lives: {}", "♥ ".repeat(session.lives as usize)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Blocks: {}/{} ", session.blocks_left(), BLOCK_ROWS * BLOCK_COLS),
            Style::default().fg(Color::Green),
        ),
    ];
    if session.expand_timer.is_active() {
        spans.push(Span::styled(
            format!("│ ↔ {} ", session.expand_timer.remaining()),
            Style::default().fg(powerup_color(PowerupKind::Expand)),
        ));
    }
    if session.speed_timer.is_active() {
        let kind = if session.speed_modifier < 1.0 { PowerupKind::Slow } else { PowerupKind::Fast };
        spans.push(Span::styled(
            format!("│ {} {} ", kind.symbol(), session.speed_timer.remaining()),
            Style::default().fg(powerup_color(kind)),
        ));
    }
    Line::from(spans)
}

fn help_line(phase: Phase) -> Line<'static> {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = Style::default().fg(Color::DarkGray);
    let sep = Style::default().fg(Color::Rgb(60, 60, 60));
    if phase == Phase::Playing {
        Line::from(vec![
            Span::styled(" ←→/AD/Mouse ", key),
            Span::styled("Move ", text),
            Span::styled("│ ", sep),
            Span::styled("P ", key),
            Span::styled("Pause ", text),
            Span::styled("│ ", sep),
            Span::styled("R ", key),
            Span::styled("Restart ", text),
            Span::styled("│ ", sep),
            Span::styled("Esc ", key),
            Span::styled("Menu", text),
        ])
    } else {
        Line::from(vec![
            Span::styled(" SPACE ", key),
            Span::styled("Play ", text),
            Span::styled("│ ", sep),
            Span::styled("Esc ", key),
            Span::styled("Menu", text),
        ])
    }
}
