//! Session context: authoritative state, busy gating, conversation log.
//!
//! The shell owns exactly one [`Session`] and routes every trigger —
//! structure loads, UI control edits, free-text commands — through it.
//! A busy flag guards against re-entrant triggers from nested shell
//! callbacks: a request arriving while another is in flight is dropped
//! (logged at debug), never interleaved with a pending transaction.
//! Loads are sequenced strictly: a load completes, including its initial
//! synchronization, before any parameter change can start the next one.

use crate::error::EngineError;
use crate::interpreter::{self, LanguageService};
use crate::scene::SceneEngine;
use crate::source::StructureData;
use crate::state::{StateUpdate, ViewState};
use crate::sync;

/// Who produced a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// The user's typed command.
    User,
    /// The interpreter's reply.
    Assistant,
}

/// One line of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Who said it.
    pub speaker: Speaker,
    /// What was said.
    pub text: String,
}

/// The explicit context object shared by the synchronizer and the
/// interpreter: view state, busy flag, conversation log.
#[derive(Debug, Default)]
pub struct Session {
    state: ViewState,
    busy: bool,
    conversation: Vec<LogEntry>,
}

impl Session {
    /// A session with default visual parameters and no structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// The conversation log, oldest first.
    #[must_use]
    pub fn conversation(&self) -> &[LogEntry] {
        &self.conversation
    }

    /// Load a structure and run the initial synchronization.
    ///
    /// The scene reflects the new structure with the current parameters
    /// before this returns. If the engine rejects the load, the previous
    /// structure id stays authoritative; if the load succeeds but the
    /// initial sync fails, the id tracks the new structure (the engine
    /// holds it now) and the next successful sync catches the scene up.
    pub fn load(
        &mut self,
        engine: &mut dyn SceneEngine,
        data: &StructureData,
    ) -> Result<(), EngineError> {
        if !self.acquire("load") {
            return Ok(());
        }
        let result = engine.load_structure(data).and_then(|()| {
            self.state.structure_id = Some(data.label.clone());
            sync::synchronize(engine, &self.state)
        });
        self.busy = false;
        result
    }

    /// Rebuild the scene from the current state.
    pub fn synchronize(
        &mut self,
        engine: &mut dyn SceneEngine,
    ) -> Result<(), EngineError> {
        if !self.acquire("synchronize") {
            return Ok(());
        }
        let result = sync::synchronize(engine, &self.state);
        self.busy = false;
        result
    }

    /// Apply a direct UI edit and resynchronize.
    pub fn apply(
        &mut self,
        engine: &mut dyn SceneEngine,
        update: &StateUpdate,
    ) -> Result<(), EngineError> {
        if !self.acquire("apply") {
            return Ok(());
        }
        self.state.apply(update);
        let result = sync::synchronize(engine, &self.state);
        self.busy = false;
        result
    }

    /// Run one free-text command through the interpreter, merge the
    /// validated update, resynchronize, and log the exchange.
    ///
    /// Returns the message shown to the user. Interpreter failures are
    /// already degraded to messages; only engine failures surface.
    pub fn command(
        &mut self,
        engine: &mut dyn SceneEngine,
        service: &dyn LanguageService,
        input: &str,
    ) -> Result<String, EngineError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(String::new());
        }
        if !self.acquire("command") {
            return Ok(String::new());
        }

        self.conversation.push(LogEntry {
            speaker: Speaker::User,
            text: input.to_owned(),
        });

        let outcome = interpreter::interpret(service, input, &self.state);
        self.conversation.push(LogEntry {
            speaker: Speaker::Assistant,
            text: outcome.message.clone(),
        });

        let result = if outcome.update.is_empty() {
            Ok(())
        } else {
            self.state.apply(&outcome.update);
            sync::synchronize(engine, &self.state)
        };
        self.busy = false;
        result.map(|()| outcome.message)
    }

    /// Take the busy flag; false means the trigger is dropped.
    fn acquire(&mut self, what: &str) -> bool {
        if self.busy {
            log::debug!("{what} dropped: another operation is in flight");
            return false;
        }
        self.busy = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterpreterError;
    use crate::interpreter::FALLBACK_MESSAGE;
    use crate::scene::{ComponentKind, MemoryEngine};
    use crate::source::{StructureFormat, StructurePayload};
    use crate::state::ReprStyle;

    struct CannedService(Result<String, ()>);

    impl LanguageService for CannedService {
        fn complete(&self, _: &str) -> Result<String, InterpreterError> {
            self.0.clone().map_err(|()| {
                InterpreterError::Service("down".to_owned())
            })
        }
    }

    fn hemoglobin() -> StructureData {
        StructureData {
            format: StructureFormat::Pdb,
            payload: StructurePayload::Text("HEADER".to_owned()),
            label: "4HHB".to_owned(),
        }
    }

    #[test]
    fn load_synchronizes_before_returning() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.load(&mut engine, &hemoglobin()).unwrap();

        assert_eq!(session.state().structure_id.as_deref(), Some("4HHB"));
        // Initial sync already happened: polymer + ligand (hetero on)
        assert_eq!(engine.components_of(ComponentKind::Polymer).len(), 1);
        assert_eq!(engine.components_of(ComponentKind::Ligand).len(), 1);
        assert!(engine.components_of(ComponentKind::Water).is_empty());
    }

    #[test]
    fn apply_merges_and_rebuilds() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.load(&mut engine, &hemoglobin()).unwrap();

        session
            .apply(
                &mut engine,
                &StateUpdate {
                    style: Some(ReprStyle::Surface),
                    ..StateUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(session.state().style, ReprStyle::Surface);
        let polymer = engine.components_of(ComponentKind::Polymer);
        assert_eq!(polymer[0].representations[0].style, ReprStyle::Surface);
    }

    #[test]
    fn command_applies_validated_update_and_logs() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.load(&mut engine, &hemoglobin()).unwrap();

        let service = CannedService(Ok(
            r#"{"updates": {"showWater": true, "style": "bogus"},
                "message": "Waters on."}"#
                .to_owned(),
        ));
        let message =
            session.command(&mut engine, &service, "show water").unwrap();

        assert_eq!(message, "Waters on.");
        assert!(session.state().show_water);
        // Invalid style was dropped, not applied
        assert_eq!(session.state().style, ReprStyle::Cartoon);
        assert_eq!(engine.components_of(ComponentKind::Water).len(), 1);

        let log = session.conversation();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].speaker, Speaker::User);
        assert_eq!(log[0].text, "show water");
        assert_eq!(log[1].speaker, Speaker::Assistant);
        assert_eq!(log[1].text, "Waters on.");
    }

    #[test]
    fn service_failure_leaves_state_and_scene_alone() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.load(&mut engine, &hemoglobin()).unwrap();
        let state_before = session.state().clone();
        let transactions_before = engine.transactions();

        let service = CannedService(Err(()));
        let message = session
            .command(&mut engine, &service, "show water")
            .unwrap();

        assert_eq!(message, FALLBACK_MESSAGE);
        assert_eq!(session.state(), &state_before);
        // No update, so no resynchronization either
        assert_eq!(engine.transactions(), transactions_before);
    }

    #[test]
    fn message_only_reply_skips_resync() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.load(&mut engine, &hemoglobin()).unwrap();
        let transactions_before = engine.transactions();

        let service = CannedService(Ok(
            "Hello, hydrophobicity affects folding.".to_owned(),
        ));
        let message = session
            .command(&mut engine, &service, "what is hydrophobicity?")
            .unwrap();

        assert_eq!(message, "Hello, hydrophobicity affects folding.");
        assert_eq!(engine.transactions(), transactions_before);
    }

    #[test]
    fn empty_input_is_ignored() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        let service = CannedService(Ok("{}".to_owned()));
        let message =
            session.command(&mut engine, &service, "   ").unwrap();
        assert!(message.is_empty());
        assert!(session.conversation().is_empty());
    }

    #[test]
    fn synchronize_without_structure_is_a_noop() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.synchronize(&mut engine).unwrap();
        assert_eq!(engine.transactions(), 0);
    }

    #[test]
    fn failed_initial_sync_keeps_new_structure_id() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        engine.fail_next_transaction();

        assert!(session.load(&mut engine, &hemoglobin()).is_err());
        // The engine holds the new structure, so the id tracks it
        assert_eq!(session.state().structure_id.as_deref(), Some("4HHB"));

        // The next successful sync catches the scene up
        session.synchronize(&mut engine).unwrap();
        assert_eq!(engine.components_of(ComponentKind::Polymer).len(), 1);
    }

    #[test]
    fn engine_failure_keeps_logical_state() {
        let mut session = Session::new();
        let mut engine = MemoryEngine::new();
        session.load(&mut engine, &hemoglobin()).unwrap();

        engine.fail_next_transaction();
        let result = session.apply(
            &mut engine,
            &StateUpdate {
                style: Some(ReprStyle::Putty),
                ..StateUpdate::default()
            },
        );
        assert!(result.is_err());
        // Logical state keeps the new value; the next successful sync
        // catches the scene up
        assert_eq!(session.state().style, ReprStyle::Putty);
        session.synchronize(&mut engine).unwrap();
        let polymer = engine.components_of(ComponentKind::Polymer);
        assert_eq!(polymer[0].representations[0].style, ReprStyle::Putty);
    }
}
