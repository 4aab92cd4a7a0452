//! seqer-core: Grid indexing and pointer editing for a MIDI sequence editor

mod config;
mod cursor;
mod editor;
mod error;
mod event;
mod filter;
pub mod lane;
pub mod music;
mod row_model;
mod sequence;
mod session;
mod step;

pub use config::{EditorConfig, InsertionConfig};
pub use cursor::{Column, GridCursor, ScrollRequest};
pub use editor::SequenceEditor;
pub use error::{Result, SeqerError};
pub use event::{Event, EventId, EventKind, EventType};
pub use filter::EventFilter;
pub use lane::{
    Axes, ControllerLane, Lane, LaneContext, LaneFeedback, LaneInteraction, LaneResponse,
    MarkerLane, Modifiers, NoteLane, Operation, PixelRect, Point, TimeScale, VelocityLane,
};
pub use row_model::{Row, RowEvent, RowModel, StepSummary};
pub use sequence::{DEFAULT_PPQ, Sequence};
pub use session::{Session, ViewId};
pub use step::{StepIndex, StepSize};
