//! Pointer gesture state machine shared by every lane kind

use crate::error::{Result, SeqerError};
use crate::event::EventId;
use crate::sequence::Sequence;

use super::{Lane, LaneContext, PixelRect, Point, TimeScale};

/// What the current gesture will do on release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operation {
    /// Gesture already fully handled on press (shift toggles)
    #[default]
    None,
    RectSelect,
    AddEvent,
    DragEvents,
    DragEventsAndMoveCursor,
}

impl Operation {
    fn drags_events(self) -> bool {
        matches!(self, Self::AddEvent | Self::DragEvents | Self::DragEventsAndMoveCursor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false };
    pub const SHIFT: Self = Self { shift: true };
}

/// What the host should do after a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaneResponse {
    /// Sequence or selection changed: rebuild views and repaint
    pub refresh: bool,
    /// Selection exists and was clicked without moving; show its details
    pub focus_inspector: bool,
    pub created: Option<EventId>,
    /// Pixel offset applied to the selection
    pub moved: Option<(i32, i32)>,
}

impl LaneResponse {
    fn refresh() -> Self {
        Self { refresh: true, ..Default::default() }
    }
}

/// Transient drawing state while a gesture is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneFeedback {
    None,
    SelectionRect(PixelRect),
    /// Draw selected events shifted by this much
    SelectedOffset { dx: i32, dy: i32 },
}

/// One pointer-down..pointer-up sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gesture {
    operation: Operation,
    down: Point,
    drag: Point,
    x_allowed: bool,
    y_allowed: bool,
}

impl Gesture {
    fn new(down: Point) -> Self {
        Self {
            operation: Operation::None,
            down,
            drag: down,
            x_allowed: false,
            y_allowed: false,
        }
    }

    fn allowed_offset(&self, to: Point) -> (i32, i32) {
        (
            if self.x_allowed { to.x - self.down.x } else { 0 },
            if self.y_allowed { to.y - self.down.y } else { 0 },
        )
    }
}

/// Pointer and keyboard editing for one lane: a pixel cursor plus the open gesture
#[derive(Debug, Clone)]
pub struct LaneInteraction {
    cursor: Point,
    drag_threshold: i32,
    gesture: Option<Gesture>,
}

impl LaneInteraction {
    pub fn new(drag_threshold: i32) -> Self {
        Self {
            cursor: Point::default(),
            drag_threshold: drag_threshold.max(0),
            gesture: None,
        }
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    pub fn operation(&self) -> Operation {
        self.gesture.map_or(Operation::None, |g| g.operation)
    }

    pub fn is_gesture_open(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn feedback(&self) -> LaneFeedback {
        match self.gesture {
            Some(g) if g.operation == Operation::RectSelect => {
                LaneFeedback::SelectionRect(PixelRect::from_corners(g.down, g.drag))
            }
            Some(g) if g.operation != Operation::None => {
                let (dx, dy) = g.allowed_offset(g.drag);
                LaneFeedback::SelectedOffset { dx, dy }
            }
            _ => LaneFeedback::None,
        }
    }

    pub fn pointer_down(
        &mut self,
        lane: &dyn Lane,
        ctx: &mut LaneContext<'_>,
        point: Point,
        modifiers: Modifiers,
    ) -> LaneResponse {
        if let Some(open) = self.gesture.take() {
            tracing::warn!("Pointer down during open {:?} gesture; dropping it", open.operation);
        }

        let mut gesture = Gesture::new(point);
        let mut response = LaneResponse::refresh();

        match lane.event_at(ctx.sequence, ctx.time, point) {
            None => {
                gesture.operation = Operation::RectSelect;
                if !modifiers.shift {
                    ctx.sequence.select_none();
                    // Pressing exactly on the cursor over empty space creates an event there
                    if point == self.cursor {
                        if let Some(id) = lane.create_at(ctx, point) {
                            mark(ctx.sequence, id, true);
                            gesture.operation = Operation::AddEvent;
                            response.created = Some(id);
                        }
                    }
                }
            }
            Some(id) if ctx.sequence.is_selected(id) => {
                if modifiers.shift {
                    mark(ctx.sequence, id, false);
                } else {
                    gesture.operation = Operation::DragEvents;
                }
            }
            Some(id) => {
                if !modifiers.shift {
                    ctx.sequence.select_none();
                    gesture.operation = Operation::DragEventsAndMoveCursor;
                }
                mark(ctx.sequence, id, true);
            }
        }

        tracing::debug!("{}: pointer down at ({}, {}) -> {:?}", lane.name(), point.x, point.y, gesture.operation);
        self.gesture = Some(gesture);
        response
    }

    /// Track the pointer. Returns whether the lane needs a repaint.
    pub fn pointer_move(&mut self, lane: &dyn Lane, point: Point) -> bool {
        let Some(gesture) = self.gesture.as_mut() else { return false };
        if gesture.operation == Operation::None {
            return false;
        }

        gesture.drag = point;
        let axes = lane.axes();
        if axes.x && (point.x - gesture.down.x).abs() > self.drag_threshold {
            gesture.x_allowed = true;
        }
        if axes.y && (point.y - gesture.down.y).abs() > self.drag_threshold {
            gesture.y_allowed = true;
        }
        true
    }

    /// Finish the gesture. Fails if no pointer-down opened one.
    pub fn pointer_up(&mut self, lane: &dyn Lane, ctx: &mut LaneContext<'_>, point: Point) -> Result<LaneResponse> {
        let gesture = self.gesture.take().ok_or(SeqerError::GestureNotStarted)?;
        let mut response = LaneResponse::refresh();

        match gesture.operation {
            op if op.drags_events() => {
                let dragged = (gesture.x_allowed && point.x != gesture.down.x)
                    || (gesture.y_allowed && point.y != gesture.down.y);

                if dragged {
                    let (dx, dy) = gesture.allowed_offset(point);
                    lane.move_by(ctx, dx, dy);
                    response.moved = Some((dx, dy));
                    tracing::debug!("{}: moved selection by ({}, {})", lane.name(), dx, dy);
                } else if op != Operation::AddEvent {
                    response.focus_inspector = true;
                }

                if matches!(op, Operation::AddEvent | Operation::DragEventsAndMoveCursor) {
                    self.move_cursor_to_event_at(lane, ctx, point);
                }
            }
            Operation::RectSelect => {
                if point == gesture.down {
                    self.cursor = point;
                } else {
                    self.select_in_rect(lane, ctx, PixelRect::from_corners(gesture.down, point));
                }
            }
            _ => {}
        }

        Ok(response)
    }

    /// Add every event whose anchor lies in `rect` to the selection. Returns
    /// how many events the rectangle caught.
    pub fn select_in_rect(&mut self, lane: &dyn Lane, ctx: &mut LaneContext<'_>, rect: PixelRect) -> usize {
        let ids = lane.events_in_rect(ctx.sequence, ctx.time, rect);
        for &id in &ids {
            mark(ctx.sequence, id, true);
        }
        ids.len()
    }

    /// Abandon the open gesture without committing anything
    pub fn cancel(&mut self) -> bool {
        match self.gesture.take() {
            Some(g) => {
                tracing::debug!("Cancelled {:?} gesture", g.operation);
                true
            }
            None => false,
        }
    }

    fn move_cursor_to_event_at(&mut self, lane: &dyn Lane, ctx: &LaneContext<'_>, point: Point) {
        let target = lane
            .event_at(ctx.sequence, ctx.time, point)
            .and_then(|id| lane.point_of(ctx.sequence, ctx.time, id));
        if let Some(p) = target {
            self.cursor = p;
        }
    }

    // Keyboard commands acting at the cursor

    /// With nothing selected, select the event at the cursor (creating one if
    /// the spot is empty); with a selection, ask for the inspector.
    pub fn edit_event(&mut self, lane: &dyn Lane, ctx: &mut LaneContext<'_>) -> LaneResponse {
        if ctx.sequence.has_selection() {
            return LaneResponse { focus_inspector: true, ..Default::default() };
        }

        match lane.event_at(ctx.sequence, ctx.time, self.cursor) {
            Some(id) => {
                mark(ctx.sequence, id, true);
                LaneResponse { refresh: true, focus_inspector: true, ..Default::default() }
            }
            None => match lane.create_at(ctx, self.cursor) {
                Some(id) => {
                    mark(ctx.sequence, id, true);
                    LaneResponse { created: Some(id), ..LaneResponse::refresh() }
                }
                None => LaneResponse::default(),
            },
        }
    }

    /// Select only the event at the cursor
    pub fn select_event(&mut self, lane: &dyn Lane, ctx: &mut LaneContext<'_>) -> LaneResponse {
        let target = lane.event_at(ctx.sequence, ctx.time, self.cursor);
        ctx.sequence.select_none();
        if let Some(id) = target {
            mark(ctx.sequence, id, true);
        }
        LaneResponse::refresh()
    }

    pub fn toggle_event_selection(&mut self, lane: &dyn Lane, ctx: &mut LaneContext<'_>) -> LaneResponse {
        match lane.event_at(ctx.sequence, ctx.time, self.cursor) {
            Some(id) => {
                if let Err(e) = ctx.sequence.toggle(id) {
                    tracing::warn!("Toggle failed: {}", e);
                }
            }
            None => ctx.sequence.select_none(),
        }
        LaneResponse::refresh()
    }

    pub fn cursor_left(&mut self) {
        self.cursor.x -= 1;
    }

    pub fn cursor_right(&mut self) {
        self.cursor.x += 1;
    }

    pub fn cursor_up(&mut self) {
        self.cursor.y -= 1;
    }

    pub fn cursor_down(&mut self) {
        self.cursor.y += 1;
    }

    /// Zoom the time axis around the cursor
    pub fn zoom_time(&mut self, time: &mut TimeScale, factor: f64) {
        self.cursor.x = time.zoom_by(factor, self.cursor.x);
    }
}

fn mark(sequence: &mut Sequence, id: EventId, selected: bool) {
    if let Err(e) = sequence.set_selected(id, selected) {
        tracing::warn!("Selection change failed: {}", e);
    }
}
