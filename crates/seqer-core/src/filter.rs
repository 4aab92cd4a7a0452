//! Event membership predicate for grid views

use serde::{Deserialize, Serialize};

use crate::event::{Event, EventType};

/// Restricts which events a view shows. An empty list places no restriction
/// on that axis; every non-empty axis must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub event_types: Vec<EventType>,
    #[serde(default)]
    pub tracks: Vec<u16>,
    /// Only applies to channel-scoped events
    #[serde(default)]
    pub channels: Vec<u8>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_types(mut self, event_types: impl IntoIterator<Item = EventType>) -> Self {
        self.event_types = event_types.into_iter().collect();
        self
    }

    pub fn with_tracks(mut self, tracks: impl IntoIterator<Item = u16>) -> Self {
        self.tracks = tracks.into_iter().collect();
        self
    }

    pub fn with_channels(mut self, channels: impl IntoIterator<Item = u8>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    pub fn accepts(&self, event: &Event) -> bool {
        if !self.event_types.is_empty() && !self.event_types.contains(&event.event_type()) {
            return false;
        }
        if !self.tracks.is_empty() && !self.tracks.contains(&event.track) {
            return false;
        }
        match event.kind.channel() {
            Some(channel) if !self.channels.is_empty() => self.channels.contains(&channel),
            _ => true,
        }
    }
}
