use crate::config::InsertionConfig;
use crate::event::{Event, EventId, EventKind};

use super::geometry::{offset_tick, value_delta_from_dy, value_from_y, y_from_value};
use super::{Lane, LaneContext, PixelRect, Point, TimeScale, selected_on_lane};

const HANDLE_RADIUS: i32 = 3;

/// Values of one control change number over time
#[derive(Debug, Clone)]
pub struct ControllerLane {
    pub number: u8,
    pub height: i32,
    pub insertion: InsertionConfig,
}

impl ControllerLane {
    pub fn new(number: u8, height: i32, insertion: InsertionConfig) -> Self {
        Self {
            number,
            height: height.max(1),
            insertion,
        }
    }
}

impl Lane for ControllerLane {
    fn name(&self) -> &str {
        "Controller"
    }

    fn position(&self, time: &TimeScale, event: &Event) -> Option<Point> {
        match event.kind {
            EventKind::ControlChange { number, value, .. } if number == self.number => Some(Point::new(
                time.x_from_tick(event.tick),
                y_from_value(value, 127, self.height),
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

    fn create_at(&self, ctx: &mut LaneContext<'_>, point: Point) -> Option<EventId> {
        let kind = EventKind::ControlChange {
            channel: self.insertion.channel,
            number: self.number,
            value: value_from_y(point.y, 127, self.height),
        };
        let tick = ctx.time.tick_from_x(point.x);
        Some(ctx.sequence.create(tick, self.insertion.track, kind))
    }

    fn move_by(&self, ctx: &mut LaneContext<'_>, dx: i32, dy: i32) {
        let ticks = ctx.time.ticks_from_dx(dx);
        let delta = value_delta_from_dy(dy, 127, self.height);

        for id in selected_on_lane(self, ctx.sequence, ctx.time) {
            let Some(event) = ctx.sequence.get_mut(id) else { continue };
            if let EventKind::ControlChange { value, .. } = &mut event.kind {
                *value = (*value as i32 + delta).clamp(0, 127) as u8;
            }
            let tick = offset_tick(event.tick, ticks);
            if let Err(e) = ctx.sequence.set_tick(id, tick) {
                tracing::warn!("Failed to move controller event: {}", e);
            }
        }
    }
}
