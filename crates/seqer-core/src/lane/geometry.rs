use serde::{Deserialize, Serialize};

/// Pixel position inside a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel rectangle with non-negative size. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Rectangle spanned by two corners in any drag direction
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Horizontal time axis shared by every lane of a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    pub ppq: u16,
    pub pixels_per_beat: f64,
    /// Horizontal scroll in pixels
    pub scroll_x: f64,
}

impl TimeScale {
    pub fn new(ppq: u16, pixels_per_beat: f64) -> Self {
        Self {
            ppq: ppq.max(1),
            pixels_per_beat,
            scroll_x: 0.0,
        }
    }

    fn pixels_per_tick(&self) -> f64 {
        self.pixels_per_beat / self.ppq as f64
    }

    pub fn x_from_tick(&self, tick: u64) -> i32 {
        (tick as f64 * self.pixels_per_tick() - self.scroll_x).round() as i32
    }

    /// Tick under `x`, clamped to the start of the sequence
    pub fn tick_from_x(&self, x: i32) -> u64 {
        ((x as f64 + self.scroll_x) / self.pixels_per_tick()).round().max(0.0) as u64
    }

    /// Tick distance covered by a horizontal pixel offset
    pub fn ticks_from_dx(&self, dx: i32) -> i64 {
        (dx as f64 / self.pixels_per_tick()).round() as i64
    }

    /// Scale the time axis by `factor`, keeping the tick under `anchor_x` in
    /// place. Returns the anchor's new x.
    pub fn zoom_by(&mut self, factor: f64, anchor_x: i32) -> i32 {
        let anchor_tick = self.tick_from_x(anchor_x);
        self.pixels_per_beat *= factor;
        tracing::debug!("Time zoom: {:.2} pixels per beat", self.pixels_per_beat);
        self.x_from_tick(anchor_tick)
    }
}

/// Offset `tick` by a signed delta without going below zero
pub(crate) fn offset_tick(tick: u64, delta: i64) -> u64 {
    tick.saturating_add_signed(delta)
}

/// Map a value in `0..=max` onto a lane of `height` pixels, max at the top
pub(crate) fn y_from_value(value: u8, max: u8, height: i32) -> i32 {
    height - (value as i32 * height + max as i32 / 2) / max as i32
}

pub(crate) fn value_from_y(y: i32, max: u8, height: i32) -> u8 {
    let height = height.max(1);
    let value = ((height - y) * max as i32 + height / 2) / height;
    value.clamp(0, max as i32) as u8
}

/// Value delta for a vertical pixel offset (upwards increases the value)
pub(crate) fn value_delta_from_dy(dy: i32, max: u8, height: i32) -> i32 {
    let height = height.max(1);
    (-(dy as f64) * max as f64 / height as f64).round() as i32
}
