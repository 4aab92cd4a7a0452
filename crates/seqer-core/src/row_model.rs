//! Dense row list built from the sparse, time-ordered event list

use crate::event::{Event, EventId};
use crate::filter::EventFilter;
use crate::step::StepIndex;

/// Event shown on a row, with its tick as of the last rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEvent {
    pub id: EventId,
    pub tick: u64,
}

/// One line of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub step: u64,
    /// `None` for the placeholder row of a step without events
    pub event: Option<RowEvent>,
}

/// Inclusive range of rows belonging to one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    pub first_row: usize,
    pub last_row: usize,
}

impl StepSummary {
    fn at(row: usize) -> Self {
        Self { first_row: row, last_row: row }
    }

    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }
}

/// Row and step tables. Both are indexed densely: `rows[n]` is row `n`,
/// `steps[s]` is step `s`, covering steps up to the last populated one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowModel {
    rows: Vec<Row>,
    steps: Vec<StepSummary>,
}

impl RowModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute both tables from events in time order
    pub fn rebuild<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
        filter: &EventFilter,
        index: &StepIndex,
    ) {
        self.rows.clear();
        self.steps.clear();

        let mut last_step: Option<u64> = None;

        for event in events {
            if !filter.accepts(event) {
                continue;
            }

            let step = index.step_from_tick(event.tick);

            // One placeholder row for every skipped step
            let mut next = last_step.map_or(0, |s| s + 1);
            while next < step {
                self.rows.push(Row { step: next, event: None });
                self.steps.push(StepSummary::at(self.rows.len() - 1));
                last_step = Some(next);
                next += 1;
            }

            self.rows.push(Row {
                step,
                event: Some(RowEvent { id: event.id, tick: event.tick }),
            });

            match self.steps.last_mut() {
                Some(summary) if last_step == Some(step) => summary.last_row += 1,
                _ => self.steps.push(StepSummary::at(self.rows.len() - 1)),
            }

            last_step = Some(step);
        }

        tracing::debug!("Rebuilt rows: {} rows over {} steps", self.rows.len(), self.steps.len());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn steps(&self) -> &[StepSummary] {
        &self.steps
    }

    pub fn row(&self, row_number: usize) -> Option<&Row> {
        self.rows.get(row_number)
    }

    pub fn step(&self, step_number: u64) -> Option<&StepSummary> {
        self.steps.get(usize::try_from(step_number).ok()?)
    }

    pub fn event_at_row(&self, row_number: usize) -> Option<EventId> {
        self.rows.get(row_number).and_then(|r| r.event).map(|e| e.id)
    }

    /// Row showing `id`, if the event passed the filter
    pub fn row_of_event(&self, id: EventId) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.event.is_some_and(|e| e.id == id))
    }

    /// Beyond the table every step owns exactly one row.
    fn extrapolated_row(&self, step_number: u64) -> usize {
        match self.steps.last() {
            None => usize::try_from(step_number).unwrap_or(usize::MAX),
            Some(last) => {
                let beyond = step_number.saturating_sub(self.steps.len() as u64);
                last.last_row
                    .saturating_add(usize::try_from(beyond).unwrap_or(usize::MAX))
                    .saturating_add(1)
            }
        }
    }

    pub fn first_row_from_step(&self, step_number: u64) -> usize {
        match self.step(step_number) {
            Some(summary) => summary.first_row,
            None => self.extrapolated_row(step_number),
        }
    }

    pub fn last_row_from_step(&self, step_number: u64) -> usize {
        match self.step(step_number) {
            Some(summary) => summary.last_row,
            None => self.extrapolated_row(step_number),
        }
    }

    pub fn step_from_row(&self, row_number: usize) -> u64 {
        match (self.rows.get(row_number), self.rows.last()) {
            (Some(row), _) => row.step,
            (None, Some(last)) => {
                let beyond = row_number.saturating_sub(self.rows.len());
                last.step
                    .saturating_add(u64::try_from(beyond).unwrap_or(u64::MAX))
                    .saturating_add(1)
            }
            (None, None) => u64::try_from(row_number).unwrap_or(u64::MAX),
        }
    }

    /// Exact event tick for event rows, the step's first tick otherwise
    pub fn tick_from_row(&self, row_number: usize, index: &StepIndex) -> u64 {
        if let Some(event) = self.rows.get(row_number).and_then(|r| r.event) {
            return event.tick;
        }
        index.tick_from_step(self.step_from_row(row_number))
    }

    pub fn first_row_from_tick(&self, tick: u64, index: &StepIndex) -> usize {
        self.first_row_from_step(index.step_from_tick(tick))
    }
}
