//! Cell canvas the games paint into before handing rows to ratatui.
//!
//! Shapes are given in world units and scaled onto the terminal grid.

use ratatui::prelude::*;

pub struct Canvas {
    width: usize,
    height: usize,
    sx: f32,
    sy: f32,
    bg: Color,
    cells: Vec<Vec<(char, Style)>>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, world_width: f32, world_height: f32, bg: Color) -> Self {
        Self {
            width,
            height,
            sx: width as f32 / world_width,
            sy: height as f32 / world_height,
            bg,
            cells: vec![vec![(' ', Style::default().bg(bg)); width]; height],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Foreground style over the canvas background.
    pub fn fg(&self, color: Color) -> Style {
        Style::default().fg(color).bg(self.bg)
    }

    #[cfg(test)]
    pub fn cell(&self, col: usize, row: usize) -> Option<(char, Style)> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn put(&mut self, col: usize, row: usize, ch: char, style: Style) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = (ch, style);
        }
    }

    /// Cell span covered by a world-space interval. Never empty, so small
    /// shapes stay visible on a coarse grid.
    fn span(start: f32, len: f32, scale: f32) -> (usize, usize) {
        let a = (start * scale).floor().max(0.0) as usize;
        let b = ((start + len) * scale).floor().max(0.0) as usize;
        (a, b.max(a + 1))
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, style: Style) {
        let (c0, c1) = Self::span(x, w, self.sx);
        let (r0, r1) = Self::span(y, h, self.sy);
        for row in r0..r1.min(self.height) {
            for col in c0..c1.min(self.width) {
                self.cells[row][col] = (ch, style);
            }
        }
    }

    /// Terminal cells are too coarse for a real ellipse; mark the cell
    /// under its center.
    pub fn ellipse(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, style: Style) {
        let col = ((x + w / 2.0) * self.sx).floor();
        let row = ((y + h / 2.0) * self.sy).floor();
        if col >= 0.0 && row >= 0.0 {
            self.put(col as usize, row as usize, ch, style);
        }
    }

    pub fn text(&mut self, col: usize, row: usize, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i, row, ch, style);
        }
    }

    pub fn text_centered(&mut self, row: usize, text: &str, style: Style) {
        let len = text.chars().count();
        let col = self.width.saturating_sub(len) / 2;
        self.text(col, row, text, style);
    }

    /// World x under a terminal column inside `area`, clamped to the area.
    pub fn column_to_world(area: Rect, column: u16, world_width: f32) -> Option<f32> {
        if area.width == 0 {
            return None;
        }
        let local = column.saturating_sub(area.x).min(area.width - 1);
        Some((local as f32 + 0.5) / area.width as f32 * world_width)
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
