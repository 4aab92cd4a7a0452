//! Lanes: pixel projections of the sequence and pointer editing on them

mod controller;
mod geometry;
mod interaction;
mod marker;
mod note;
mod velocity;

pub use controller::ControllerLane;
pub use geometry::{PixelRect, Point, TimeScale};
pub use interaction::{LaneFeedback, LaneInteraction, LaneResponse, Modifiers, Operation};
pub use marker::MarkerLane;
pub use note::NoteLane;
pub use velocity::VelocityLane;

use crate::event::{Event, EventId};
use crate::sequence::Sequence;

/// Which drag directions a lane responds to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub x: bool,
    pub y: bool,
}

impl Axes {
    pub const BOTH: Self = Self { x: true, y: true };
    pub const HORIZONTAL: Self = Self { x: true, y: false };
    pub const VERTICAL: Self = Self { x: false, y: true };
}

/// Everything a lane operation may touch
pub struct LaneContext<'a> {
    pub sequence: &'a mut Sequence,
    pub time: &'a TimeScale,
}

impl<'a> LaneContext<'a> {
    pub fn new(sequence: &'a mut Sequence, time: &'a TimeScale) -> Self {
        Self { sequence, time }
    }
}

/// Per-kind behavior of a lane. Implementors describe where events sit and
/// how pixel edits translate to event edits; [`LaneInteraction`] drives them.
pub trait Lane {
    fn name(&self) -> &str;

    /// Drag directions that can latch
    fn axes(&self) -> Axes {
        Axes::BOTH
    }

    /// Anchor point of `event`, or `None` if this lane does not show it
    fn position(&self, time: &TimeScale, event: &Event) -> Option<Point>;

    /// Clickable area of `event`
    fn hit_box(&self, time: &TimeScale, event: &Event) -> Option<PixelRect>;

    /// Create an event at `point`, or `None` if this lane cannot create events
    fn create_at(&self, ctx: &mut LaneContext<'_>, point: Point) -> Option<EventId>;

    /// Apply a pixel offset to every selected event this lane shows
    fn move_by(&self, ctx: &mut LaneContext<'_>, dx: i32, dy: i32);

    /// Topmost (latest drawn) event under `point`
    fn event_at(&self, sequence: &Sequence, time: &TimeScale, point: Point) -> Option<EventId> {
        sequence
            .iter()
            .filter(|e| self.hit_box(time, e).is_some_and(|r| r.contains(point)))
            .last()
            .map(|e| e.id)
    }

    fn point_of(&self, sequence: &Sequence, time: &TimeScale, id: EventId) -> Option<Point> {
        sequence.get(id).and_then(|e| self.position(time, e))
    }

    /// Events whose anchor point lies inside `rect`
    fn events_in_rect(&self, sequence: &Sequence, time: &TimeScale, rect: PixelRect) -> Vec<EventId> {
        sequence
            .iter()
            .filter(|e| self.position(time, e).is_some_and(|p| rect.contains(p)))
            .map(|e| e.id)
            .collect()
    }
}

/// Ids of the selected events that `lane` shows
pub(crate) fn selected_on_lane(lane: &dyn Lane, sequence: &Sequence, time: &TimeScale) -> Vec<EventId> {
    sequence
        .iter()
        .filter(|e| e.selected && lane.position(time, e).is_some())
        .map(|e| e.id)
        .collect()
}
