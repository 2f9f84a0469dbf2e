use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{Tab, GAMES};

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════╗
 ║   ▚▚  B  R  E  A  K  F  A  L  L  ▞▞           ║
 ║        bricks above, blocks below             ║
 ╚═══════════════════════════════════════════════╝"#;

const KEY: Color = Color::Rgb(80, 200, 255);
const DESC: Color = Color::Rgb(140, 140, 140);
const HEADING: Color = Color::Rgb(255, 220, 80);

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

fn tile(tab: Tab) -> GameTile {
    match tab {
        Tab::Tetris => GameTile {
            key: "2",
            icon: "🟪",
            name: "Tetris",
            desc: "Stack the falling\npieces, clear lines!",
            color: Color::Rgb(0, 210, 255),
            border_color: Color::Rgb(20, 100, 130),
        },
        _ => GameTile {
            key: "1",
            icon: "🧱",
            name: "Block Breaker",
            desc: "Bounce the ball,\nbreak every block!",
            color: Color::Rgb(79, 172, 254),
            border_color: Color::Rgb(40, 86, 127),
        },
    }
}

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool, score: u32) {
    let border_color = if selected { HEADING } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let name_color = if selected { Color::White } else { tile.color };
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("[{}] ", tile.key), Style::default().fg(HEADING).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} ", tile.icon)),
            Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
        ]),
    ];
    lines.extend(
        tile.desc
            .split('\n')
            .map(|text| Line::styled(text, Style::default().fg(desc_color))),
    );
    if score > 0 {
        lines.push(Line::styled(
            format!("Score: {score}"),
            Style::default().fg(Color::Rgb(255, 215, 0)),
        ));
    }
    if selected {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "▶ Enter to play",
            Style::default().fg(HEADING).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// One "key   description" row of a controls panel.
fn control(keys: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {keys:<17}"), Style::default().fg(KEY)),
        Span::styled(desc, Style::default().fg(DESC)),
    ])
}

fn heading(text: &'static str, color: Color) -> Line<'static> {
    Line::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn game_controls(tab: Tab) -> Vec<Line<'static>> {
    let tile = tile(tab);
    let mut lines = vec![Line::from("")];
    match tab {
        Tab::Tetris => {
            lines.push(heading("  🟪 Tetris", tile.color));
            lines.push(Line::styled("  Clear lines, the drop speeds up every ten.", Style::default().fg(Color::Rgb(100, 100, 120))));
            lines.push(Line::from(""));
            lines.push(control("← → / A D", "Move piece"));
            lines.push(control("↑ / W", "Rotate"));
            lines.push(control("↓ / S", "Soft drop"));
            lines.push(control("Space", "Hard drop"));
            lines.push(control("Any key", "Start"));
        }
        _ => {
            lines.push(heading("  🧱 Block Breaker", tile.color));
            lines.push(Line::styled("  Catch powerups, keep at least one ball alive.", Style::default().fg(Color::Rgb(100, 100, 120))));
            lines.push(Line::from(""));
            lines.push(control("← → / A D", "Move paddle"));
            lines.push(control("Mouse", "Steer paddle"));
            lines.push(control("Space / Enter", "Start"));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("    ↔ ", Style::default().fg(Color::Rgb(79, 172, 254))),
                Span::styled("Wide  ", Style::default().fg(DESC)),
                Span::styled("∴ ", Style::default().fg(Color::Rgb(155, 89, 182))),
                Span::styled("Multi  ", Style::default().fg(DESC)),
                Span::styled("◷ ", Style::default().fg(Color::Rgb(52, 152, 219))),
                Span::styled("Slow  ", Style::default().fg(DESC)),
                Span::styled("⚡ ", Style::default().fg(Color::Rgb(231, 76, 60))),
                Span::styled("Fast", Style::default().fg(DESC)),
            ]));
        }
    }
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize, scores: [u32; 2]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Banner
            Constraint::Length(2), // Subtitle
            Constraint::Length(9), // Game tiles
            Constraint::Min(10),   // Controls area
            Constraint::Length(2), // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(KEY))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::styled(
        "  ⚡ Two games, one terminal ⚡  ",
        Style::default().fg(HEADING).add_modifier(Modifier::BOLD | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games: ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);
    for (i, tab) in GAMES.iter().enumerate() {
        render_game_tile(frame, cols[i], &tile(*tab), selected_game == i, scores[i]);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let navigation = Paragraph::new(vec![
        Line::from(""),
        heading("  🔧 Navigation", HEADING),
        control("Tab / Shift+Tab", "Switch tabs"),
        control("1 / 2", "Launch game"),
        control("← →", "Select game"),
        control("Enter", "Play selected"),
        control("Esc", "Return to Home"),
        control("q / Ctrl+C", "Quit"),
        Line::from(""),
        heading("  🎮 In game", HEADING),
        control("R", "Restart round"),
        control("P", "Pause / Unpause"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(navigation, ctrl_cols[0]);

    let selected = GAMES[selected_game.min(GAMES.len() - 1)];
    let selected_tile = tile(selected);
    let game_ctrl = Paragraph::new(game_controls(selected)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(selected_tile.border_color))
            .title(format!(" 🎮 {} Control ", selected_tile.name))
            .title_style(Style::default().fg(selected_tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(
            concat!("v", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Rgb(80, 80, 100)),
        ),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);
}
