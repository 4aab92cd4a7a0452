use crate::event::{Event, EventId, EventKind};

use super::geometry::{value_delta_from_dy, y_from_value};
use super::{Axes, Lane, LaneContext, PixelRect, Point, TimeScale, selected_on_lane};

const HANDLE_RADIUS: i32 = 3;

/// Note velocities as stems; only vertical edits
#[derive(Debug, Clone)]
pub struct VelocityLane {
    pub height: i32,
}

impl VelocityLane {
    pub fn new(height: i32) -> Self {
        Self { height: height.max(1) }
    }
}

impl Lane for VelocityLane {
    fn name(&self) -> &str {
        "Velocity"
    }

    fn axes(&self) -> Axes {
        Axes::VERTICAL
    }

    fn position(&self, time: &TimeScale, event: &Event) -> Option<Point> {
        match event.kind {
            EventKind::Note { velocity, .. } => Some(Point::new(
                time.x_from_tick(event.tick),
                y_from_value(velocity, 127, self.height),
            )),
            _ => None,
        }
    }

    fn hit_box(&self, time: &TimeScale, event: &Event) -> Option<PixelRect> {
        let p = self.position(time, event)?;
        Some(PixelRect::new(
            p.x - HANDLE_RADIUS,
            p.y - HANDLE_RADIUS,
            HANDLE_RADIUS * 2,
            HANDLE_RADIUS * 2,
        ))
    }

    /// Velocities belong to notes; they are created in the note lane
    fn create_at(&self, _ctx: &mut LaneContext<'_>, _point: Point) -> Option<EventId> {
        None
    }

    fn move_by(&self, ctx: &mut LaneContext<'_>, _dx: i32, dy: i32) {
        let delta = value_delta_from_dy(dy, 127, self.height);
        for id in selected_on_lane(self, ctx.sequence, ctx.time) {
            if let Some(EventKind::Note { velocity, .. }) = ctx.sequence.get_mut(id).map(|e| &mut e.kind) {
                *velocity = (*velocity as i32 + delta).clamp(1, 127) as u8;
            }
        }
    }
}
