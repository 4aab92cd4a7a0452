//! Sequence events and their classification

use serde::{Deserialize, Serialize};

/// Unique identifier for events within a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// Payload of a sequence event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    Note {
        channel: u8,
        /// MIDI note number (0-127, 60 = middle C)
        note: u8,
        velocity: u8,
        /// Length in ticks
        duration: u64,
    },
    ControlChange {
        channel: u8,
        number: u8,
        value: u8,
    },
    ProgramChange {
        channel: u8,
        number: u8,
    },
    /// Key pressure when `note` is set, channel pressure otherwise
    Aftertouch {
        channel: u8,
        note: Option<u8>,
        amount: u8,
    },
    PitchBend {
        channel: u8,
        /// 14-bit value, 8192 = center
        value: u16,
    },
    SystemExclusive(Vec<u8>),
    Text(String),
    Lyric(String),
    Marker(String),
    Port(String),
    Tempo {
        bpm: f64,
    },
    TimeSignature {
        numerator: u8,
        denominator: u8,
    },
    /// `number` counts sharps (positive) or flats (negative)
    KeySignature {
        number: i8,
        minor: bool,
    },
}

/// Coarse classification used by filters and the event list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Note,
    ControlChange,
    ProgramChange,
    Aftertouch,
    PitchBend,
    SystemExclusive,
    Text,
    Lyric,
    Marker,
    Port,
    Tempo,
    TimeSignature,
    KeySignature,
}

impl EventType {
    pub const ALL: [EventType; 13] = [
        Self::Note,
        Self::ControlChange,
        Self::ProgramChange,
        Self::Aftertouch,
        Self::PitchBend,
        Self::SystemExclusive,
        Self::Text,
        Self::Lyric,
        Self::Marker,
        Self::Port,
        Self::Tempo,
        Self::TimeSignature,
        Self::KeySignature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::ControlChange => "Control change",
            Self::ProgramChange => "Program change",
            Self::Aftertouch => "Aftertouch",
            Self::PitchBend => "Pitch bend",
            Self::SystemExclusive => "System exclusive",
            Self::Text => "Text",
            Self::Lyric => "Lyric",
            Self::Marker => "Marker",
            Self::Port => "Port",
            Self::Tempo => "Tempo",
            Self::TimeSignature => "Time signature",
            Self::KeySignature => "Key signature",
        }
    }

    /// Parse a name as produced by [`EventType::name`], case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl EventKind {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Note { .. } => EventType::Note,
            Self::ControlChange { .. } => EventType::ControlChange,
            Self::ProgramChange { .. } => EventType::ProgramChange,
            Self::Aftertouch { .. } => EventType::Aftertouch,
            Self::PitchBend { .. } => EventType::PitchBend,
            Self::SystemExclusive(_) => EventType::SystemExclusive,
            Self::Text(_) => EventType::Text,
            Self::Lyric(_) => EventType::Lyric,
            Self::Marker(_) => EventType::Marker,
            Self::Port(_) => EventType::Port,
            Self::Tempo { .. } => EventType::Tempo,
            Self::TimeSignature { .. } => EventType::TimeSignature,
            Self::KeySignature { .. } => EventType::KeySignature,
        }
    }

    /// Channel of channel-scoped (voice) events
    pub fn channel(&self) -> Option<u8> {
        match self {
            Self::Note { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::Aftertouch { channel, .. }
            | Self::PitchBend { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    pub fn is_voice(&self) -> bool {
        self.channel().is_some()
    }

    pub fn note(&self) -> Option<u8> {
        match self {
            Self::Note { note, .. } => Some(*note),
            _ => None,
        }
    }
}

/// A single time-stamped event owned by a [`crate::Sequence`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Absolute position in ticks
    pub tick: u64,
    /// Track number (1-based; track 0 holds conductor events)
    pub track: u16,
    pub kind: EventKind,
    pub selected: bool,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// End tick for notes, the event tick otherwise
    pub fn end_tick(&self) -> u64 {
        match self.kind {
            EventKind::Note { duration, .. } => self.tick + duration,
            _ => self.tick,
        }
    }
}
