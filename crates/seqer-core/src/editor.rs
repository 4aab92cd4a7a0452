//! Event-list view: quantized rows over a filtered sequence

use crate::config::{EditorConfig, InsertionConfig};
use crate::cursor::{GridCursor, ScrollRequest};
use crate::error::{Result, SeqerError};
use crate::event::{Event, EventId, EventKind};
use crate::filter::EventFilter;
use crate::music::{chromatic_from_diatonic_in_key, match_note_octave};
use crate::row_model::{Row, RowModel};
use crate::sequence::Sequence;
use crate::step::{StepIndex, StepSize};

/// One grid view over a sequence. Holds no reference to the sequence; every
/// call that needs events takes it explicitly.
#[derive(Debug, Clone)]
pub struct SequenceEditor {
    step_index: StepIndex,
    filter: EventFilter,
    rows: RowModel,
    cursor: GridCursor,
    row_height: u32,
    insertion: InsertionConfig,
}

impl SequenceEditor {
    pub fn new(config: &EditorConfig, sequence: &Sequence) -> Result<Self> {
        config.validate()?;
        let mut editor = Self {
            step_index: StepIndex::for_sequence(config.step_size(), sequence)?,
            filter: EventFilter::default(),
            rows: RowModel::new(),
            cursor: GridCursor::new(),
            row_height: config.row_height,
            insertion: config.insertion,
        };
        editor.refresh(sequence);
        Ok(editor)
    }

    /// Rebuild rows after the sequence, filter or step size changed
    pub fn refresh(&mut self, sequence: &Sequence) {
        // Time signature edits reshape measure-based steps
        match StepIndex::for_sequence(self.step_index.size(), sequence) {
            Ok(index) => self.step_index = index,
            Err(e) => tracing::warn!("Keeping previous step index: {}", e),
        }
        self.rows.rebuild(sequence.iter(), &self.filter, &self.step_index);
    }

    pub fn step_size(&self) -> StepSize {
        self.step_index.size()
    }

    pub fn step_index(&self) -> &StepIndex {
        &self.step_index
    }

    /// Replace the quantization policy. Invalid policies are rejected and the
    /// current one stays in place.
    pub fn set_step_size(&mut self, size: StepSize, sequence: &Sequence) -> Result<()> {
        self.step_index = StepIndex::for_sequence(size, sequence)?;
        tracing::debug!("Step size set to {:?}", size);
        self.rows.rebuild(sequence.iter(), &self.filter, &self.step_index);
        Ok(())
    }

    /// Finer steps. At the finest step the resolution allows this is a no-op.
    pub fn zoom_in(&mut self, sequence: &Sequence) -> Result<()> {
        match self.set_step_size(self.step_size().zoom_in(), sequence) {
            Err(SeqerError::InvalidStepSize(reason)) => {
                tracing::debug!("Zoom in stopped at {:?}: {}", self.step_size(), reason);
                Ok(())
            }
            other => other,
        }
    }

    pub fn zoom_out(&mut self, sequence: &Sequence) -> Result<()> {
        self.set_step_size(self.step_size().zoom_out(), sequence)
    }

    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: EventFilter, sequence: &Sequence) {
        self.filter = filter;
        self.rows.rebuild(sequence.iter(), &self.filter, &self.step_index);
    }

    pub fn row_model(&self) -> &RowModel {
        &self.rows
    }

    pub fn rows(&self) -> &[Row] {
        self.rows.rows()
    }

    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }

    pub fn step_count(&self) -> usize {
        self.rows.step_count()
    }

    pub fn step_from_tick(&self, tick: u64) -> u64 {
        self.step_index.step_from_tick(tick)
    }

    pub fn fractional_step_from_tick(&self, tick: u64) -> f64 {
        self.step_index.fractional_step_from_tick(tick)
    }

    pub fn first_row_from_step(&self, step: u64) -> usize {
        self.rows.first_row_from_step(step)
    }

    pub fn last_row_from_step(&self, step: u64) -> usize {
        self.rows.last_row_from_step(step)
    }

    pub fn step_from_row(&self, row: usize) -> u64 {
        self.rows.step_from_row(row)
    }

    pub fn tick_from_row(&self, row: usize) -> u64 {
        self.rows.tick_from_row(row, &self.step_index)
    }

    /// Time signature event governing the start of `row`'s step
    pub fn latest_time_signature_for_row<'a>(&self, sequence: &'a Sequence, row: usize) -> Option<&'a Event> {
        let tick = self.step_index.tick_from_step(self.step_from_row(row));
        sequence.latest_time_signature_for_tick(tick)
    }

    // Cursor and viewport

    pub fn cursor(&self) -> &GridCursor {
        &self.cursor
    }

    pub fn current_row(&self) -> usize {
        self.cursor.row()
    }

    pub fn current_column(&self) -> usize {
        self.cursor.column()
    }

    /// Rows that fit in a viewport of `height` pixels
    pub fn visible_rows_for_height(&self, height: u32) -> usize {
        (height / self.row_height) as usize
    }

    pub fn set_viewport(&mut self, first_visible_row: usize, height: u32) {
        let visible = self.visible_rows_for_height(height);
        self.cursor.set_viewport(first_visible_row, visible);
    }

    pub fn set_current_row(&mut self, row: usize) -> Option<ScrollRequest> {
        self.cursor.set_row(row)
    }

    pub fn row_up(&mut self) -> Option<ScrollRequest> {
        self.cursor.row_up()
    }

    pub fn row_down(&mut self) -> Option<ScrollRequest> {
        self.cursor.row_down(self.row_count())
    }

    pub fn page_up(&mut self) -> Option<ScrollRequest> {
        self.cursor.page_up()
    }

    pub fn page_down(&mut self) -> Option<ScrollRequest> {
        self.cursor.page_down(self.row_count())
    }

    pub fn go_to_first_row(&mut self) -> Option<ScrollRequest> {
        self.cursor.go_to_first_row()
    }

    pub fn go_to_last_row(&mut self) -> Option<ScrollRequest> {
        self.cursor.go_to_last_row(self.row_count())
    }

    pub fn column_left(&mut self) {
        self.cursor.column_left();
    }

    pub fn column_right(&mut self) {
        self.cursor.column_right();
    }

    pub fn go_to_column(&mut self, column: usize) {
        self.cursor.go_to_column(column);
    }

    // Note entry

    pub fn insertion(&self) -> &InsertionConfig {
        &self.insertion
    }

    pub fn insertion_mut(&mut self) -> &mut InsertionConfig {
        &mut self.insertion
    }

    /// Insert a one-step note at the cursor row. `diatonic` is the scale
    /// degree (0 = C .. 6 = B), spelled in the key signature at that time.
    pub fn insert_note(&mut self, sequence: &mut Sequence, diatonic: u8) -> EventId {
        let start_step = self.step_from_row(self.cursor.row());
        let start_tick = self.step_index.tick_from_step(start_step);
        let end_tick = self.step_index.tick_from_step(start_step + 1);

        let chromatic = chromatic_from_diatonic_in_key(diatonic, sequence.key_signature_at(start_tick));
        let previous = self.insertion.note;
        self.insertion.note = match_note_octave(chromatic, previous);

        let id = sequence.create(
            start_tick,
            self.insertion.track,
            EventKind::Note {
                channel: self.insertion.channel,
                note: self.insertion.note,
                velocity: self.insertion.velocity,
                duration: end_tick - start_tick,
            },
        );

        // Follow the new note: it sorts after the rows already in its step
        let occupied_step = self
            .rows
            .row(self.cursor.row())
            .filter(|row| row.event.is_some())
            .map(|row| row.step);
        if let Some(step) = occupied_step {
            self.cursor.set_row(self.rows.last_row_from_step(step) + 1);
        }

        tracing::debug!("Inserted note {} at tick {}", self.insertion.note, start_tick);
        self.refresh(sequence);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;

    fn editor(seq: &Sequence) -> SequenceEditor {
        SequenceEditor::new(&EditorConfig::default(), seq).unwrap()
    }

    fn note_at(seq: &mut Sequence, tick: u64) -> EventId {
        seq.create(tick, 1, EventKind::Note { channel: 0, note: 60, velocity: 90, duration: 240 })
    }

    #[test]
    fn test_refresh_picks_up_new_events() {
        let mut seq = Sequence::default();
        let mut ed = editor(&seq);
        assert_eq!(ed.row_count(), 0);

        note_at(&mut seq, 2 * 960);
        ed.refresh(&seq);
        assert_eq!(ed.row_count(), 3);
        assert_eq!(ed.tick_from_row(1), 960);
    }

    #[test]
    fn test_zoom_requantizes_without_touching_events() {
        let mut seq = Sequence::default();
        note_at(&mut seq, 960);
        let mut ed = editor(&seq);
        assert_eq!(ed.row_count(), 2);

        ed.zoom_in(&seq).unwrap();
        assert_eq!(ed.step_size(), StepSize::StepsPerMeasure(8));
        assert_eq!(ed.row_count(), 3);
        assert_eq!(seq.iter().next().unwrap().tick, 960);

        ed.zoom_out(&seq).unwrap();
        ed.zoom_out(&seq).unwrap();
        assert_eq!(ed.step_size(), StepSize::StepsPerMeasure(2));
        assert_eq!(ed.row_count(), 1);
    }

    #[test]
    fn test_zoom_in_stops_at_one_tick_steps() {
        let seq = Sequence::default();
        let mut ed = editor(&seq);
        ed.set_step_size(StepSize::StepsPerBeat(960), &seq).unwrap();
        ed.zoom_in(&seq).unwrap();
        assert_eq!(ed.step_size(), StepSize::StepsPerBeat(960));
        assert_eq!(ed.tick_from_row(5), 5);

        ed.set_step_size(StepSize::TicksPerStep(1), &seq).unwrap();
        ed.zoom_in(&seq).unwrap();
        assert_eq!(ed.step_size(), StepSize::TicksPerStep(1));
    }

    #[test]
    fn test_invalid_step_size_keeps_previous() {
        let seq = Sequence::default();
        let mut ed = editor(&seq);
        assert!(ed.set_step_size(StepSize::TicksPerStep(0), &seq).is_err());
        assert_eq!(ed.step_size(), StepSize::StepsPerMeasure(4));
    }

    #[test]
    fn test_filter_change_rebuilds() {
        let mut seq = Sequence::default();
        note_at(&mut seq, 0);
        seq.create(960, 0, EventKind::Marker("A".into()));
        let mut ed = editor(&seq);
        assert_eq!(ed.row_count(), 2);

        ed.set_filter(EventFilter::new().with_event_types([EventType::Marker]), &seq);
        assert_eq!(ed.row_count(), 2);
        assert_eq!(ed.rows()[0].event, None);
    }

    #[test]
    fn test_page_size_follows_viewport() {
        let mut seq = Sequence::default();
        note_at(&mut seq, 960 * 40);
        let mut ed = editor(&seq);
        ed.set_viewport(0, 200);
        assert_eq!(ed.cursor().visible_rows(), 10);
        ed.page_down();
        assert_eq!(ed.current_row(), 10);
        ed.go_to_last_row();
        assert_eq!(ed.current_row(), 40);
    }

    #[test]
    fn test_insert_note_in_key() {
        let mut seq = Sequence::default();
        seq.create(0, 0, EventKind::KeySignature { number: 1, minor: false });
        let mut ed = editor(&seq);
        ed.set_current_row(2);

        // F in G major is F#
        let id = ed.insert_note(&mut seq, 3);
        let event = seq.get(id).unwrap();
        assert_eq!(event.tick, 1920);
        assert_eq!(event.kind, EventKind::Note { channel: 0, note: 66, velocity: 64, duration: 960 });
        // Cursor stayed on an empty row
        assert_eq!(ed.current_row(), 2);
        assert_eq!(ed.row_model().event_at_row(2), Some(id));
    }

    #[test]
    fn test_insert_note_keeps_pitch_class_at_top_of_range() {
        let mut seq = Sequence::default();
        let mut ed = editor(&seq);
        ed.insertion_mut().note = 124;

        let b = ed.insert_note(&mut seq, 6);
        assert_eq!(seq.get(b).unwrap().kind.note(), Some(119));
        // G: 127 is an octave further from 119 than 115
        let g = ed.insert_note(&mut seq, 4);
        assert_eq!(seq.get(g).unwrap().kind.note(), Some(115));

        ed.insertion_mut().note = 126;
        let top = ed.insert_note(&mut seq, 4);
        assert_eq!(seq.get(top).unwrap().kind.note(), Some(127));
    }

    #[test]
    fn test_insert_note_advances_past_occupied_row() {
        let mut seq = Sequence::default();
        let mut ed = editor(&seq);
        ed.set_viewport(0, 200);

        ed.insert_note(&mut seq, 0);
        assert_eq!(ed.current_row(), 0);
        ed.insert_note(&mut seq, 2);
        assert_eq!(ed.current_row(), 1);
        ed.insert_note(&mut seq, 4);

        let notes: Vec<_> = seq.iter().filter_map(|e| e.kind.note()).collect();
        assert_eq!(notes, vec![60, 64, 67]);
        // Repeated entry stacks a chord on the same step
        assert!(seq.iter().all(|e| e.tick == 0));
        assert_eq!(ed.current_row(), 2);
        assert_eq!(ed.step_from_row(2), 0);
    }

    #[test]
    fn test_latest_time_signature_for_row() {
        let mut seq = Sequence::default();
        seq.create(0, 0, EventKind::TimeSignature { numerator: 3, denominator: 4 });
        let ed = editor(&seq);
        let ts = ed.latest_time_signature_for_row(&seq, 5).unwrap();
        assert_eq!(ts.kind, EventKind::TimeSignature { numerator: 3, denominator: 4 });
    }
}
