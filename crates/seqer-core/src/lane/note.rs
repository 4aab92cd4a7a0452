use crate::config::InsertionConfig;
use crate::event::{Event, EventId, EventKind};

use super::geometry::offset_tick;
use super::{Lane, LaneContext, PixelRect, Point, TimeScale, selected_on_lane};

/// Piano-roll lane: time across, pitch upwards
#[derive(Debug, Clone)]
pub struct NoteLane {
    pub key_height: i32,
    /// Vertical scroll in pixels
    pub scroll_y: i32,
    pub insertion: InsertionConfig,
}

impl NoteLane {
    pub fn new(key_height: i32, insertion: InsertionConfig) -> Self {
        Self {
            key_height: key_height.max(1),
            scroll_y: 0,
            insertion,
        }
    }

    /// Top edge of the key row for `note`
    pub fn y_from_note(&self, note: u8) -> i32 {
        (127 - note as i32) * self.key_height - self.scroll_y
    }

    pub fn note_from_y(&self, y: i32) -> u8 {
        let row = (y + self.scroll_y).div_euclid(self.key_height);
        (127 - row).clamp(0, 127) as u8
    }
}

impl Lane for NoteLane {
    fn name(&self) -> &str {
        "Notes"
    }

    fn position(&self, time: &TimeScale, event: &Event) -> Option<Point> {
        let note = event.kind.note()?;
        Some(Point::new(
            time.x_from_tick(event.tick),
            self.y_from_note(note) + self.key_height / 2,
        ))
    }

    fn hit_box(&self, time: &TimeScale, event: &Event) -> Option<PixelRect> {
        let note = event.kind.note()?;
        let x = time.x_from_tick(event.tick);
        let width = (time.x_from_tick(event.end_tick()) - x).max(2);
        Some(PixelRect::new(x, self.y_from_note(note), width - 1, self.key_height - 1))
    }

    fn create_at(&self, ctx: &mut LaneContext<'_>, point: Point) -> Option<EventId> {
        let tick = ctx.time.tick_from_x(point.x);
        let kind = EventKind::Note {
            channel: self.insertion.channel,
            note: self.note_from_y(point.y),
            velocity: self.insertion.velocity,
            duration: ctx.sequence.ppq as u64,
        };
        Some(ctx.sequence.create(tick, self.insertion.track, kind))
    }

    fn move_by(&self, ctx: &mut LaneContext<'_>, dx: i32, dy: i32) {
        let ticks = ctx.time.ticks_from_dx(dx);
        let notes = -(dy as f64 / self.key_height as f64).round() as i32;

        for id in selected_on_lane(self, ctx.sequence, ctx.time) {
            let Some(event) = ctx.sequence.get_mut(id) else { continue };
            if let EventKind::Note { note, .. } = &mut event.kind {
                *note = (*note as i32 + notes).clamp(0, 127) as u8;
            }
            let tick = offset_tick(event.tick, ticks);
            if let Err(e) = ctx.sequence.set_tick(id, tick) {
                tracing::warn!("Failed to move note: {}", e);
            }
        }
    }
}
