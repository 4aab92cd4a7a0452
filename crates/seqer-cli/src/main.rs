//! seqer: drive the sequence editor core from the terminal

mod config;
mod grid;

use seqer_core::{
    EventFilter, EventKind, EventType, LaneContext, LaneInteraction, Modifiers, NoteLane, Point, Session, StepSize,
    TimeScale,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("seqer=info".parse()?))
        .init();

    if std::env::args().any(|a| a == "--init-config") {
        return config::save_config(&config::CliConfig::default());
    }

    let config = config::load_config()?.editor;
    tracing::info!("Starting seqer (ppq {}, {} steps per measure)", config.ppq, config.steps_per_measure);

    let mut session = Session::new(config.clone())?;
    let all = session.add_view()?;
    let notes = session.add_view()?;
    session.with_view(notes, |view, seq| {
        view.set_filter(EventFilter::new().with_event_types([EventType::Note]), seq);
        view.set_step_size(StepSize::StepsPerBeat(2), seq)
    })??;

    let ppq = config.ppq as u64;
    session.update(|seq| {
        seq.create(0, 0, EventKind::TimeSignature { numerator: 4, denominator: 4 });
        seq.create(0, 0, EventKind::KeySignature { number: 1, minor: false });
        seq.create(0, 0, EventKind::Marker("Intro".into()));
        seq.create(0, 1, EventKind::ControlChange { channel: 0, number: 7, value: 100 });
        seq.create(ppq * 8, 0, EventKind::TimeSignature { numerator: 3, denominator: 4 });
        seq.create(ppq * 8, 0, EventKind::Marker("Waltz".into()));
    });

    // Keyboard entry: D, F# (G major), A stacked on the cursor step, then a lone G further down
    session.with_view(all, |view, _| view.set_current_row(1))?;
    for diatonic in [1, 3, 5] {
        session.insert_note(all, diatonic)?;
    }
    session.with_view(all, |view, _| view.set_current_row(6))?;
    session.insert_note(all, 4)?;

    // Pointer entry on the note lane: click at the cursor, then drag right one beat
    let mut time = TimeScale::new(config.ppq, config.pixels_per_beat);
    let lane = NoteLane::new(config.key_height as i32, config.insertion);
    let mut interaction = LaneInteraction::new(config.drag_threshold);
    let down = Point::new(time.x_from_tick(ppq * 2), lane.y_from_note(67));
    interaction.set_cursor(down);

    let pressed = session.update(|seq| {
        interaction.pointer_down(&lane, &mut LaneContext::new(seq, &time), down, Modifiers::NONE)
    });
    let up = Point::new(down.x + config.pixels_per_beat as i32, down.y);
    interaction.pointer_move(&lane, up);
    let released = session.update(|seq| interaction.pointer_up(&lane, &mut LaneContext::new(seq, &time), up))?;
    tracing::info!("Lane gesture created {:?}, moved {:?}", pressed.created, released.moved);

    interaction.zoom_time(&mut time, 1.05);

    grid::print("All events", session.view(all)?, session.sequence());
    grid::print("Notes", session.view(notes)?, session.sequence());

    let view = session.view(all)?;
    let last_row = view.row_count().saturating_sub(1);
    if let Some(sig) = view.latest_time_signature_for_row(session.sequence(), last_row) {
        println!("Time signature in force at row {last_row}: {:?} (tick {})", sig.kind, sig.tick);
    }

    Ok(())
}
