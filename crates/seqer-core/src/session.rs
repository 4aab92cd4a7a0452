//! One sequence shared by several grid views

use crate::config::EditorConfig;
use crate::editor::SequenceEditor;
use crate::error::{Result, SeqerError};
use crate::event::EventId;
use crate::sequence::Sequence;

/// Index of a view within a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(pub usize);

/// Owns the sequence and every view over it. Mutations go through
/// [`Session::update`], which rebuilds all views before returning, so no view
/// is ever read in a stale state.
#[derive(Debug, Clone)]
pub struct Session {
    config: EditorConfig,
    sequence: Sequence,
    views: Vec<SequenceEditor>,
    /// Bumped once per committed mutation; undo layers key snapshots on it
    revision: u64,
}

impl Session {
    pub fn new(config: EditorConfig) -> Result<Self> {
        let sequence = Sequence::new(config.ppq);
        Self::with_sequence(config, sequence)
    }

    pub fn with_sequence(config: EditorConfig, sequence: Sequence) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            sequence,
            views: Vec::new(),
            revision: 0,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add_view(&mut self) -> Result<ViewId> {
        let view = SequenceEditor::new(&self.config, &self.sequence)?;
        self.views.push(view);
        Ok(ViewId(self.views.len() - 1))
    }

    pub fn view(&self, id: ViewId) -> Result<&SequenceEditor> {
        self.views.get(id.0).ok_or(SeqerError::ViewNotFound(id.0))
    }

    /// View-local changes (cursor, filter, step size) that do not touch the sequence
    pub fn with_view<R>(&mut self, id: ViewId, f: impl FnOnce(&mut SequenceEditor, &Sequence) -> R) -> Result<R> {
        let view = self.views.get_mut(id.0).ok_or(SeqerError::ViewNotFound(id.0))?;
        Ok(f(view, &self.sequence))
    }

    pub fn views(&self) -> impl Iterator<Item = &SequenceEditor> {
        self.views.iter()
    }

    /// Apply one mutation to the sequence, then rebuild every view
    pub fn update<R>(&mut self, f: impl FnOnce(&mut Sequence) -> R) -> R {
        let result = f(&mut self.sequence);
        self.revision += 1;
        self.refresh_views();
        result
    }

    fn refresh_views(&mut self) {
        for view in &mut self.views {
            view.refresh(&self.sequence);
        }
        tracing::debug!("Revision {}: refreshed {} views", self.revision, self.views.len());
    }

    pub fn select_all(&mut self) {
        self.update(Sequence::select_all);
    }

    pub fn select_none(&mut self) {
        self.update(Sequence::select_none);
    }

    pub fn delete_selected(&mut self) -> usize {
        self.update(Sequence::delete_selected)
    }

    /// Keyboard note entry in one view, visible in all of them
    pub fn insert_note(&mut self, id: ViewId, diatonic: u8) -> Result<EventId> {
        let view = self.views.get_mut(id.0).ok_or(SeqerError::ViewNotFound(id.0))?;
        let event = view.insert_note(&mut self.sequence, diatonic);
        self.revision += 1;
        self.refresh_views();
        Ok(event)
    }
}
