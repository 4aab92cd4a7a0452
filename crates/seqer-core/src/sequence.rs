//! Time-ordered event store shared by every editing surface

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqerError};
use crate::event::{Event, EventId, EventKind};

/// Default pulses per quarter note for new sequences
pub const DEFAULT_PPQ: u16 = 960;

/// All events of a piece, sorted by tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    /// Pulses per quarter note
    pub ppq: u16,
    /// Sorted by tick; events sharing a tick keep insertion order
    events: Vec<Event>,
    next_event_id: u64,
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new(DEFAULT_PPQ)
    }
}

impl Sequence {
    pub fn new(ppq: u16) -> Self {
        Self {
            ppq: ppq.max(1),
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in time order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Mutable access for per-kind fields. Use [`Sequence::set_tick`] to move in time.
    pub fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }

    /// Create an event, placed after any existing events at the same tick
    pub fn create(&mut self, tick: u64, track: u16, kind: EventKind) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        self.insert_sorted(Event {
            id,
            tick,
            track,
            kind,
            selected: false,
        });
        id
    }

    fn insert_sorted(&mut self, event: Event) {
        let idx = self.events.partition_point(|e| e.tick <= event.tick);
        self.events.insert(idx, event);
    }

    /// Move an event in time, keeping the store sorted
    pub fn set_tick(&mut self, id: EventId, tick: u64) -> Result<()> {
        let pos = self
            .position(id)
            .ok_or(SeqerError::EventNotFound(id.0))?;
        if self.events[pos].tick == tick {
            return Ok(());
        }
        let mut event = self.events.remove(pos);
        event.tick = tick;
        self.insert_sorted(event);
        Ok(())
    }

    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let pos = self.position(id)?;
        Some(self.events.remove(pos))
    }

    /// Delete every selected event, returning how many were removed
    pub fn delete_selected(&mut self) -> usize {
        let before = self.events.len();
        self.events.retain(|e| !e.selected);
        before - self.events.len()
    }

    fn position(&self, id: EventId) -> Option<usize> {
        self.events.iter().position(|e| e.id == id)
    }

    // Selection is the set of events whose flag is on; it spans the whole
    // sequence regardless of which view or filter is looking at it.

    pub fn select_all(&mut self) {
        for event in &mut self.events {
            event.selected = true;
        }
    }

    pub fn select_none(&mut self) {
        for event in &mut self.events {
            event.selected = false;
        }
    }

    pub fn set_selected(&mut self, id: EventId, selected: bool) -> Result<()> {
        let event = self.get_mut(id).ok_or(SeqerError::EventNotFound(id.0))?;
        event.selected = selected;
        Ok(())
    }

    /// Flip the selection flag, returning the new state
    pub fn toggle(&mut self, id: EventId) -> Result<bool> {
        let event = self.get_mut(id).ok_or(SeqerError::EventNotFound(id.0))?;
        event.selected = !event.selected;
        Ok(event.selected)
    }

    pub fn is_selected(&self, id: EventId) -> bool {
        self.get(id).is_some_and(|e| e.selected)
    }

    pub fn has_selection(&self) -> bool {
        self.events.iter().any(|e| e.selected)
    }

    pub fn selected_ids(&self) -> Vec<EventId> {
        self.events
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.id)
            .collect()
    }

    /// Time signature in force at `tick` as (numerator, denominator), 4/4 if none
    pub fn time_signature_at(&self, tick: u64) -> (u8, u8) {
        self.latest_time_signature_for_tick(tick)
            .and_then(|e| match e.kind {
                EventKind::TimeSignature { numerator, denominator } => Some((numerator, denominator)),
                _ => None,
            })
            .unwrap_or((4, 4))
    }

    pub fn latest_time_signature_for_tick(&self, tick: u64) -> Option<&Event> {
        self.events
            .iter()
            .take_while(|e| e.tick <= tick)
            .filter(|e| matches!(e.kind, EventKind::TimeSignature { .. }))
            .last()
    }

    /// Key signature in force at `tick` as sharps (+) / flats (-), C major if none
    pub fn key_signature_at(&self, tick: u64) -> i8 {
        self.events
            .iter()
            .take_while(|e| e.tick <= tick)
            .filter_map(|e| match e.kind {
                EventKind::KeySignature { number, .. } => Some(number),
                _ => None,
            })
            .last()
            .unwrap_or(0)
    }

    /// Time signature changes in time order as (tick, numerator, denominator)
    pub fn time_signatures(&self) -> Vec<(u64, u8, u8)> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::TimeSignature { numerator, denominator } => {
                    Some((e.tick, numerator, denominator))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(name: &str) -> EventKind {
        EventKind::Marker(name.to_string())
    }

    fn ticks(seq: &Sequence) -> Vec<u64> {
        seq.iter().map(|e| e.tick).collect()
    }

    #[test]
    fn test_events_stay_sorted_with_stable_ties() {
        let mut seq = Sequence::default();
        let a = seq.create(480, 1, marker("a"));
        let b = seq.create(0, 1, marker("b"));
        let c = seq.create(480, 1, marker("c"));
        assert_eq!(ticks(&seq), vec![0, 480, 480]);
        let order: Vec<_> = seq.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn test_set_tick_moves_after_existing_ties() {
        let mut seq = Sequence::default();
        let a = seq.create(0, 1, marker("a"));
        let b = seq.create(960, 1, marker("b"));
        seq.set_tick(a, 960).unwrap();
        let order: Vec<_> = seq.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a]);
        assert_eq!(seq.set_tick(EventId(99), 0), Err(SeqerError::EventNotFound(99)));
    }

    #[test]
    fn test_selection_ops() {
        let mut seq = Sequence::default();
        let a = seq.create(0, 1, marker("a"));
        let b = seq.create(10, 1, marker("b"));
        assert!(!seq.has_selection());

        seq.select_all();
        assert_eq!(seq.selected_ids(), vec![a, b]);
        seq.select_all();
        assert_eq!(seq.selected_ids(), vec![a, b]);

        assert!(!seq.toggle(a).unwrap());
        assert_eq!(seq.selected_ids(), vec![b]);

        seq.select_none();
        assert!(!seq.has_selection());
    }

    #[test]
    fn test_delete_selected() {
        let mut seq = Sequence::default();
        let a = seq.create(0, 1, marker("a"));
        seq.create(10, 1, marker("b"));
        seq.set_selected(a, true).unwrap();
        assert_eq!(seq.delete_selected(), 1);
        assert_eq!(seq.len(), 1);
        assert!(seq.get(a).is_none());
    }

    #[test]
    fn test_signature_lookups() {
        let mut seq = Sequence::default();
        assert_eq!(seq.time_signature_at(0), (4, 4));
        seq.create(0, 0, EventKind::TimeSignature { numerator: 3, denominator: 4 });
        seq.create(2880, 0, EventKind::TimeSignature { numerator: 6, denominator: 8 });
        seq.create(960, 0, EventKind::KeySignature { number: -2, minor: false });
        assert_eq!(seq.time_signature_at(2879), (3, 4));
        assert_eq!(seq.time_signature_at(2880), (6, 8));
        assert_eq!(seq.key_signature_at(959), 0);
        assert_eq!(seq.key_signature_at(5000), -2);
        assert_eq!(seq.time_signatures(), vec![(0, 3, 4), (2880, 6, 8)]);
    }
}
