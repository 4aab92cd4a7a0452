//! Plain-text rendering of one event-list view

use seqer_core::{Column, Event, EventKind, Row, Sequence, SequenceEditor};

fn cell(event: &Event, column: Column) -> String {
    match (column, &event.kind) {
        (Column::Time, _) => event.tick.to_string(),
        (Column::Track, _) => event.track.to_string(),
        (Column::Type, _) => event.event_type().name().to_string(),
        (Column::Channel, kind) => kind.channel().map(|c| (c + 1).to_string()).unwrap_or_default(),
        (Column::Number, EventKind::Note { note, .. }) => note.to_string(),
        (Column::Number, EventKind::ControlChange { number, .. } | EventKind::ProgramChange { number, .. }) => {
            number.to_string()
        }
        (Column::Number, EventKind::Aftertouch { note: Some(note), .. }) => note.to_string(),
        (Column::Number, EventKind::TimeSignature { numerator, denominator }) => format!("{numerator}/{denominator}"),
        (Column::Number, EventKind::KeySignature { number, minor }) => {
            format!("{number}{}", if *minor { "m" } else { "" })
        }
        (Column::Value, EventKind::Note { velocity, .. }) => velocity.to_string(),
        (Column::Value, EventKind::ControlChange { value, .. }) => value.to_string(),
        (Column::Value, EventKind::Aftertouch { amount, .. }) => amount.to_string(),
        (Column::Value, EventKind::PitchBend { value, .. }) => value.to_string(),
        (Column::Value, EventKind::Tempo { bpm }) => format!("{bpm:.2}"),
        (Column::Value, EventKind::Text(s) | EventKind::Lyric(s) | EventKind::Marker(s) | EventKind::Port(s)) => {
            s.clone()
        }
        (Column::Value, EventKind::SystemExclusive(bytes)) => format!("{} bytes", bytes.len()),
        (Column::Length, EventKind::Note { duration, .. }) => duration.to_string(),
        _ => String::new(),
    }
}

fn render_row(view: &SequenceEditor, sequence: &Sequence, index: usize, row: &Row) -> String {
    let marker = if index == view.current_row() { '>' } else { ' ' };
    let mut line = format!("{marker}{:>5} {:>4}", index, row.step);
    for number in Column::FIRST..=Column::LAST {
        let Some(column) = Column::from_number(number) else { continue };
        let text = row
            .event
            .and_then(|e| sequence.get(e.id))
            .map(|event| cell(event, column))
            .unwrap_or_default();
        let selected = row.event.is_some_and(|e| sequence.is_selected(e.id));
        let focus = if index == view.current_row() && number == view.current_column() { '*' } else { ' ' };
        line.push_str(&format!(" {focus}{:<10}", text));
        if number == Column::LAST && selected {
            line.push_str(" [sel]");
        }
    }
    line
}

pub(crate) fn print(title: &str, view: &SequenceEditor, sequence: &Sequence) {
    println!("== {title} ({} rows, {} steps, {:?}) ==", view.row_count(), view.step_count(), view.step_size());
    let mut header = format!(" {:>5} {:>4}", "Row", "Step");
    for number in Column::FIRST..=Column::LAST {
        if let Some(column) = Column::from_number(number) {
            header.push_str(&format!("  {:<10}", column.title()));
        }
    }
    println!("{header}");
    for (index, row) in view.rows().iter().enumerate() {
        println!("{}", render_row(view, sequence, index, row));
    }
    println!();
}
