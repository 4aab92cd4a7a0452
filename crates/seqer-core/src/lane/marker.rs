use crate::event::{Event, EventId, EventKind};

use super::geometry::offset_tick;
use super::{Axes, Lane, LaneContext, PixelRect, Point, TimeScale, selected_on_lane};

/// Approximate label glyph width in pixels
const CHAR_WIDTH: i32 = 7;
const LABEL_PADDING: i32 = 4;

/// Named markers along the time axis
#[derive(Debug, Clone)]
pub struct MarkerLane {
    pub height: i32,
}

impl MarkerLane {
    pub fn new(height: i32) -> Self {
        Self { height: height.max(1) }
    }
}

impl Lane for MarkerLane {
    fn name(&self) -> &str {
        "Markers"
    }

    fn axes(&self) -> Axes {
        Axes::HORIZONTAL
    }

    fn position(&self, time: &TimeScale, event: &Event) -> Option<Point> {
        match event.kind {
            EventKind::Marker(_) => Some(Point::new(time.x_from_tick(event.tick), self.height / 2)),
            _ => None,
        }
    }

    fn hit_box(&self, time: &TimeScale, event: &Event) -> Option<PixelRect> {
        let EventKind::Marker(name) = &event.kind else { return None };
        let x = time.x_from_tick(event.tick);
        let width = name.chars().count() as i32 * CHAR_WIDTH + LABEL_PADDING * 2;
        Some(PixelRect::new(x, 0, width, self.height - 1))
    }

    fn create_at(&self, ctx: &mut LaneContext<'_>, point: Point) -> Option<EventId> {
        let count = ctx
            .sequence
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Marker(_)))
            .count();
        let tick = ctx.time.tick_from_x(point.x);
        Some(ctx.sequence.create(tick, 0, EventKind::Marker(format!("Marker {}", count + 1))))
    }

    fn move_by(&self, ctx: &mut LaneContext<'_>, dx: i32, _dy: i32) {
        let ticks = ctx.time.ticks_from_dx(dx);
        for id in selected_on_lane(self, ctx.sequence, ctx.time) {
            let Some(tick) = ctx.sequence.get(id).map(|e| offset_tick(e.tick, ticks)) else { continue };
            if let Err(e) = ctx.sequence.set_tick(id, tick) {
                tracing::warn!("Failed to move marker: {}", e);
            }
        }
    }
}
