use std::io::{self, Write};
use log::info;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, SetForegroundColor},
};

use crate::constants::{WHITE, WORLD_HEIGHT, WORLD_WIDTH};
use crate::types::Vector2D;

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: (u8, u8, u8),
}

impl Cell {
    fn blank() -> Self {
        Cell { glyph: ' ', color: WHITE }
    }
}

/// Combines a base color with a fade factor in [0, 1], the cell-terminal
/// equivalent of alpha blending over a black background.
pub fn shade(color: (u8, u8, u8), fade: f64) -> (u8, u8, u8) {
    let fade = fade.clamp(0.0, 1.0);
    let scaled = |channel: u8| (channel as f64 * fade).round() as u8;
    (scaled(color.0), scaled(color.1), scaled(color.2))
}

// --- Surface: fixed 800x600 world projected onto the terminal cell grid ---
pub struct Surface {
    cells: Vec<Vec<Cell>>,
    pub cols: u16,
    pub rows: u16,
}

impl Surface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Surface {
            cells: vec![vec![Cell::blank(); cols as usize]; rows as usize],
            cols,
            rows,
        }
    }

    /// Terminal resize changes the viewport mapping only; world bounds stay fixed.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![vec![Cell::blank(); cols as usize]; rows as usize];
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::blank());
        }
    }

    // Multiply before dividing so integer-valued world coordinates land on
    // exact cell boundaries.
    fn col_at(&self, x: f64) -> i32 {
        (x * self.cols as f64 / WORLD_WIDTH).floor() as i32
    }

    fn row_at(&self, y: f64) -> i32 {
        (y * self.rows as f64 / WORLD_HEIGHT).floor() as i32
    }

    fn cell_of(&self, point: Vector2D) -> (i32, i32) {
        (self.col_at(point.x), self.row_at(point.y))
    }

    fn cell_center(&self, col: i32, row: i32) -> (f64, f64) {
        (
            (col as f64 + 0.5) * WORLD_WIDTH / self.cols as f64,
            (row as f64 + 0.5) * WORLD_HEIGHT / self.rows as f64,
        )
    }

    fn set_cell(&mut self, col: i32, row: i32, glyph: char, color: (u8, u8, u8)) {
        if col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32 {
            self.cells[row as usize][col as usize] = Cell { glyph, color };
        }
    }

    /// Fills a circle given in world coordinates. The cell under the center is
    /// always painted so sub-cell circles stay visible.
    pub fn fill_circle(&mut self, center: Vector2D, radius: f64, glyph: char, color: (u8, u8, u8)) {
        let (center_col, center_row) = self.cell_of(center);
        self.set_cell(center_col, center_row, glyph, color);

        let col_span = (radius * self.cols as f64 / WORLD_WIDTH).ceil() as i32;
        let row_span = (radius * self.rows as f64 / WORLD_HEIGHT).ceil() as i32;
        for row in (center_row - row_span)..=(center_row + row_span) {
            for col in (center_col - col_span)..=(center_col + col_span) {
                let (wx, wy) = self.cell_center(col, row);
                let dx = wx - center.x;
                let dy = wy - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.set_cell(col, row, glyph, color);
                }
            }
        }
    }

    /// Fills a polygon given in world coordinates, testing each candidate
    /// cell's world-space center against the outline.
    pub fn fill_polygon(&mut self, points: &[Vector2D], glyph: char, color: (u8, u8, u8)) {
        if points.len() < 3 {
            return;
        }
        let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let col_start = self.col_at(min_x);
        let col_end = (max_x * self.cols as f64 / WORLD_WIDTH).ceil() as i32;
        let row_start = self.row_at(min_y);
        let row_end = (max_y * self.rows as f64 / WORLD_HEIGHT).ceil() as i32;

        for row in row_start..=row_end {
            for col in col_start..=col_end {
                let (wx, wy) = self.cell_center(col, row);
                if point_in_polygon(points, wx, wy) {
                    self.set_cell(col, row, glyph, color);
                }
            }
        }
    }

    /// Queues every cell to the output and flushes once, presenting the frame.
    pub fn present(&self, out: &mut OutputTarget) -> io::Result<()> {
        let mut run = String::with_capacity(self.cols as usize);
        for row in 0..self.rows {
            out.queue_move_to(0, row)?;
            let mut active: Option<(u8, u8, u8)> = None;
            run.clear();
            for cell in &self.cells[row as usize] {
                if cell.glyph != ' ' && active != Some(cell.color) {
                    if !run.is_empty() {
                        out.write_all(run.as_bytes())?;
                        run.clear();
                    }
                    out.queue_color(cell.color)?;
                    active = Some(cell.color);
                }
                run.push(cell.glyph);
            }
            if !run.is_empty() {
                out.write_all(run.as_bytes())?;
            }
        }
        out.flush()
    }
}

// Even-odd crossing test against the polygon outline.
fn point_in_polygon(points: &[Vector2D], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if (a.y > y) != (b.y > y) {
            let crossing = (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x;
            if x < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// --- ScreenBuffer: captures presented frames for headless runs ---
pub struct ScreenBuffer {
    buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    cursor_x: u16,
    cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn write_char(&mut self, c: char) {
        if self.cursor_y < self.height && self.cursor_x < self.width {
            self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
        }
        self.cursor_x += 1;
    }

    pub fn row_string(&self, row: u16) -> String {
        self.buffer[row as usize].iter().collect()
    }

    pub fn print_to_log(&self) {
        info!("--- frame ---");
        for row in 0..self.height {
            info!("{}", self.row_string(row));
        }
    }
}

impl Write for ScreenBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for c in String::from_utf8_lossy(buf).chars() {
            self.write_char(c);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// --- OutputTarget: the live terminal or an in-memory capture buffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    Buffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn queue_move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(s, MoveTo(col, row)),
            OutputTarget::Buffer(sb) => {
                sb.move_to(col, row);
                Ok(())
            }
        }
    }

    pub fn queue_color(&mut self, color: (u8, u8, u8)) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => queue!(
                s,
                SetForegroundColor(Color::Rgb { r: color.0, g: color.1, b: color.2 })
            ),
            // Captured frames are monochrome
            OutputTarget::Buffer(_) => Ok(()),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::Buffer(sb) => sb.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::Buffer(sb) => sb.flush(),
        }
    }
}
