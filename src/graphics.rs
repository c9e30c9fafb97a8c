use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
};

pub const BACKGROUND: Color = Color::Rgb { r: 0, g: 0, b: 0 };

/// Pixel buffer shown two pixels per terminal cell (upper and lower half)
pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![BACKGROUND; width * height],
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Sets one pixel; out-of-range coordinates are ignored
    pub fn plot(&mut self, x: isize, y: isize, color: Color) {
        if x >= 0 && x < self.width as isize && y >= 0 && y < self.height as isize {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes the buffer to the terminal starting at the top-left cell
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut last: Option<(Color, Color)> = None;
        for row in 0..self.height.div_ceil(2) {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..self.width {
                let top = self.pixels[2 * row * self.width + col];
                let bottom = self.get(col, 2 * row + 1).unwrap_or(BACKGROUND);
                if last != Some((top, bottom)) {
                    queue!(out, SetForegroundColor(top), SetBackgroundColor(bottom))?;
                    last = Some((top, bottom));
                }
                queue!(out, Print('▀'))?;
            }
        }
        Ok(())
    }
}

/// Draws a line between two points in the canvas using Bresenham's algorithm
pub fn draw_line(x0: f64, y0: f64, x1: f64, y1: f64, canvas: &mut Canvas, color: Color) {
    if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
        return;
    }
    let (mut x0, mut y0, x1, y1) = (
        x0.floor() as isize,
        y0.floor() as isize,
        x1.floor() as isize,
        y1.floor() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    loop {
        canvas.plot(x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fills every pixel whose center lies within `radius` of (`cx`, `cy`)
pub fn fill_disk(cx: f64, cy: f64, radius: f64, canvas: &mut Canvas, color: Color) {
    if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) || radius <= 0.0 {
        return;
    }
    let min_x = (cx - radius).floor().max(0.0) as isize;
    let max_x = (cx + radius).ceil().min(canvas.width as f64) as isize;
    let min_y = (cy - radius).floor().max(0.0) as isize;
    let max_y = (cy + radius).ceil().min(canvas.height as f64) as isize;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let px = x as f64 + 0.5 - cx;
            let py = y as f64 + 0.5 - cy;
            if px * px + py * py <= radius * radius {
                canvas.plot(x, y, color);
            }
        }
    }
}

/// Path color graded by distance from the center in body radii:
/// deep orange at the horizon fading to pale yellow ten radii out
pub fn path_color(distance: f64) -> Color {
    let t = ((distance - 1.0) / 9.0).clamp(0.0, 1.0);
    Color::Rgb {
        r: 255,
        g: (80.0 + 175.0 * t) as u8,
        b: (20.0 + 140.0 * t) as u8,
    }
}
