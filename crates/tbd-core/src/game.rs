//! The session controller.
//!
//! `Game` owns the session, the live activation bindings and the address
//! provider. Every transition runs to completion inside one `&mut self`
//! call. The passage is built and saved before the screen is touched, so a
//! transition either lands completely or not at all.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::continuation::{Binding, Bindings, Button, Continuation, Next, PassageCall};
use crate::error::{EngineError, EngineResult};
use crate::identity::{ElementAddress, IdProvider};
use crate::output::{Passage, PassageBuilder, PassageLog};
use crate::render::{RenderCx, check_targets, render_log, render_passage};
use crate::save::{
    GameSession, Storage, encode_session, erase_session, import_session, load_session,
    save_session,
};
use crate::story::{PassageArgs, PassageRegistry, Scene};
use crate::surface::{DisplaySurface, Fragment};

/// Message shown when the saved session cannot be read.
pub const RECOVERY_MESSAGE: &str =
    "<p>The saved game could not be loaded.</p><p>Use reset to start a new game.</p>";

/// Whether a transition is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// A passage is being built and rendered.
    Running,
}

/// Whether the session loaded normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The session is playable.
    Ready,
    /// The saved session was unreadable; only reset is offered.
    Recovery,
}

/// Result of delivering an activation to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing live at that address.
    Ignored,
    /// A passage was run and appended.
    Advanced,
    /// A dialog is now shown.
    DialogOpened,
    /// The dialog was dismissed and the session shown again.
    DialogClosed,
    /// The host must reload and launch again.
    ReloadRequested,
}

/// A running story bound to a display surface and a storage backend.
pub struct Game<S, D, P> {
    config: EngineConfig,
    registry: PassageRegistry<S>,
    session: GameSession<S>,
    ids: IdProvider,
    bindings: Bindings,
    parked: Bindings,
    surface: D,
    storage: P,
    phase: Phase,
    status: Status,
    dialog_open: bool,
}

impl<S, D, P> Game<S, D, P>
where
    S: Clone + Default + Serialize + DeserializeOwned,
    D: DisplaySurface,
    P: Storage,
{
    /// Start the story.
    ///
    /// A saved session is loaded and replayed; an unreadable one puts the
    /// game in [`Status::Recovery`]. Without a saved session the start
    /// passage runs on the default state.
    pub fn launch(
        registry: PassageRegistry<S>,
        config: EngineConfig,
        surface: D,
        storage: P,
    ) -> EngineResult<Self> {
        let mut game = Self {
            ids: IdProvider::new(config.namespace.clone()),
            config,
            registry,
            session: GameSession::new(S::default()),
            bindings: Bindings::new(),
            parked: Bindings::new(),
            surface,
            storage,
            phase: Phase::Idle,
            status: Status::Ready,
            dialog_open: false,
        };
        let reset = game.config.regions.reset.clone();
        game.surface.bind_activation(&reset);

        match load_session::<S>(&game.storage, &game.config.storage_key) {
            Ok(Some(session)) => {
                info!(
                    key = %game.config.storage_key,
                    passages = session.log.len(),
                    "loaded saved session"
                );
                game.session = session;
                game.replay()?;
                let blob = encode_session(&game.session)?;
                game.offer_export(&blob);
            }
            Ok(None) => {
                let start = game
                    .registry
                    .start()
                    .map(str::to_string)
                    .ok_or_else(|| EngineError::UnknownPassage("<start>".to_string()))?;
                info!(start = %start, "starting new session");
                game.run_passage(&start, PassageArgs::new(), false)?;
            }
            Err(EngineError::Deserialization(reason)) => {
                warn!(%reason, "saved session is unreadable, entering recovery");
                game.status = Status::Recovery;
                game.replay()?;
                game.surface.set_display(&game.config.regions.export, "none");
                game.surface.set_display(&game.config.regions.import, "none");
            }
            Err(e) => return Err(e),
        }
        Ok(game)
    }

    /// Run a registered passage.
    ///
    /// The passage runs on a copy of the state and is checked before
    /// anything changes: a failing passage leaves the state, the log, the
    /// save and the live choices as they were. A dialog passage replaces
    /// the view, is neither appended nor saved, and its state changes are
    /// dropped.
    pub fn run_passage(
        &mut self,
        name: &str,
        args: PassageArgs,
        dialog: bool,
    ) -> EngineResult<()> {
        if self.phase == Phase::Running {
            return Err(EngineError::Busy);
        }
        self.phase = Phase::Running;
        let result = self.transition(name, &args, dialog);
        self.phase = Phase::Idle;
        result
    }

    fn transition(&mut self, name: &str, args: &PassageArgs, dialog: bool) -> EngineResult<()> {
        let def = self.registry.get(name)?;

        let mut state = self.session.state.clone();
        let mut out = PassageBuilder::new();
        if !dialog {
            out.emit_timestamp(None);
        }
        def.invoke(&mut Scene::new(&mut state, &mut out), args)?;
        let passage = out.finish();
        check_targets(&passage)?;
        debug!(passage = name, elements = passage.len(), dialog, "built passage");

        if dialog {
            self.present_dialog(&passage)
        } else {
            self.present(passage, state)
        }
    }

    fn present(&mut self, passage: Passage, state: S) -> EngineResult<()> {
        let mut next = GameSession {
            state,
            log: self.session.log.clone(),
        };
        next.log.append(passage.clone());
        let evicted = next.log.trim_to(self.config.max_history);
        let blob = save_session(&mut self.storage, &self.config.storage_key, &next)?;

        if self.dialog_open {
            self.close_dialog()?;
        }
        self.disable_live();

        let output = self.config.regions.output.clone();
        self.render(&passage, &output)?;
        self.session = next;
        if evicted > 0 {
            debug!(evicted, "trimmed passage log");
            self.replay()?;
        }
        self.scroll_output();
        self.offer_export(&blob);
        Ok(())
    }

    /// Deliver an activation event from the host.
    ///
    /// The reset region opens the reset dialog. Anything without a live
    /// binding is ignored.
    pub fn activate(&mut self, at: &ElementAddress) -> EngineResult<Outcome> {
        if *at == self.config.regions.reset {
            self.request_reset()?;
            return Ok(Outcome::DialogOpened);
        }
        let Some(binding) = self.bindings.get(at).cloned() else {
            debug!(address = %at, "ignored activation");
            return Ok(Outcome::Ignored);
        };
        match binding {
            Binding::Button { next } => self.follow(next),
            Binding::TextButton {
                input,
                call,
                value_arg,
                converter,
            } => {
                let raw = self.surface.value(&input).unwrap_or_default();
                let value = converter.convert(&value_arg, &raw)?;
                let mut args = call.args;
                args.insert_missing(value_arg, value);
                self.follow(Next::Passage(PassageCall {
                    passage: call.passage,
                    args,
                }))
            }
        }
    }

    fn follow(&mut self, next: Next) -> EngineResult<Outcome> {
        match next {
            Next::Passage(call) => {
                self.run_passage(&call.passage, call.args, false)?;
                Ok(Outcome::Advanced)
            }
            Next::ConfirmReset => self.confirm_reset(),
            Next::CancelDialog => {
                self.close_dialog()?;
                Ok(Outcome::DialogClosed)
            }
        }
    }

    /// Show the reset confirmation dialog.
    pub fn request_reset(&mut self) -> EngineResult<()> {
        if self.phase == Phase::Running {
            return Err(EngineError::Busy);
        }
        debug!("opening reset dialog");
        self.present_dialog(&reset_dialog())
    }

    /// Erase the saved session and ask the host to reload.
    pub fn confirm_reset(&mut self) -> EngineResult<Outcome> {
        erase_session(&mut self.storage, &self.config.storage_key)?;
        info!(key = %self.config.storage_key, "session erased");
        self.surface.request_reload();
        Ok(Outcome::ReloadRequested)
    }

    /// Dismiss the open dialog and show the session unchanged.
    pub fn close_dialog(&mut self) -> EngineResult<()> {
        if !self.dialog_open {
            return Ok(());
        }
        self.dialog_open = false;
        match self.config.regions.dialog.clone() {
            Some(overlay) => {
                self.surface.clear(&overlay);
                self.surface.set_display(&overlay, "none");
                self.bindings = std::mem::take(&mut self.parked);
                Ok(())
            }
            None => {
                self.parked = Bindings::new();
                self.replay()
            }
        }
    }

    /// Replace the saved session with an exported blob and ask the host to
    /// reload. The blob is validated first; nothing is stored if it is
    /// invalid.
    pub fn import(&mut self, blob: &str) -> EngineResult<Outcome> {
        let session = import_session::<S>(&mut self.storage, &self.config.storage_key, blob)?;
        info!(passages = session.log.len(), "imported session");
        self.surface.request_reload();
        Ok(Outcome::ReloadRequested)
    }

    /// Serialized form of the current session.
    pub fn export(&self) -> EngineResult<String> {
        encode_session(&self.session)
    }

    /// Clear the output and render the whole log again.
    pub fn replay(&mut self) -> EngineResult<()> {
        for at in self.bindings.drain() {
            self.surface.unbind_activation(&at);
        }
        let output = self.config.regions.output.clone();
        match self.status {
            Status::Ready => {
                let container = self.config.regions.output_container.clone();
                let mut cx = RenderCx::new(&mut self.ids, &mut self.surface, &mut self.bindings)
                    .with_scroll_container(container);
                render_log(&mut cx, &self.session.log, &output)?;
            }
            Status::Recovery => {
                self.surface.clear(&output);
                self.surface
                    .insert_end(&output, Fragment::Markup(RECOVERY_MESSAGE.to_string()));
            }
        }
        self.scroll_output();
        Ok(())
    }

    fn render(&mut self, passage: &Passage, root: &ElementAddress) -> EngineResult<()> {
        let container = self.config.regions.output_container.clone();
        let mut cx = RenderCx::new(&mut self.ids, &mut self.surface, &mut self.bindings)
            .with_scroll_container(container);
        render_passage(&mut cx, passage, root, false)
    }

    fn disable_live(&mut self) {
        for at in self.bindings.drain() {
            self.surface.unbind_activation(&at);
            self.surface.set_disabled(&at, true);
        }
    }

    fn offer_export(&mut self, blob: &str) {
        self.surface.offer_download(
            &self.config.regions.export,
            blob,
            &self.config.export_filename,
        );
    }

    fn scroll_output(&mut self) {
        let container = self.config.regions.output_container.clone();
        self.surface.scroll_to_bottom(&container);
    }

    fn dialog_root(&self) -> ElementAddress {
        self.config
            .regions
            .dialog
            .clone()
            .unwrap_or_else(|| self.config.regions.output.clone())
    }
}

impl<S, D, P> Game<S, D, P> {
    /// Application state.
    pub fn state(&self) -> &S {
        &self.session.state
    }

    /// Retained passages.
    pub fn log(&self) -> &PassageLog {
        &self.session.log
    }

    /// The whole session.
    pub fn session(&self) -> &GameSession<S> {
        &self.session
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered passages.
    pub fn registry(&self) -> &PassageRegistry<S> {
        &self.registry
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Load status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether a dialog is shown.
    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    /// Element the player currently interacts with: the dialog overlay
    /// while one is open, the output otherwise.
    pub fn active_root(&self) -> &ElementAddress {
        match (&self.config.regions.dialog, self.dialog_open) {
            (Some(overlay), true) => overlay,
            _ => &self.config.regions.output,
        }
    }

    /// The display surface.
    pub fn surface(&self) -> &D {
        &self.surface
    }

    /// Mutable access to the display surface, e.g. to type into a field.
    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// The storage backend.
    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Mutable access to the storage backend.
    pub fn storage_mut(&mut self) -> &mut P {
        &mut self.storage
    }

    /// Give back the surface and the storage, e.g. to launch again after a
    /// reload request.
    pub fn into_parts(self) -> (D, P) {
        (self.surface, self.storage)
    }
}

/// The built-in reset confirmation passage.
fn reset_dialog() -> Passage {
    let mut out = PassageBuilder::new();
    out.emit_container("h1", "Game reset", Default::default(), None);
    out.emit_container("p", "Are you sure you want to reset?", Default::default(), None);
    out.emit_container(
        "p",
        "This will <b>erase all game data</b>.",
        Default::default(),
        None,
    );
    let zone = out.emit_container(
        "p",
        "",
        [("class".to_string(), "inputzone".to_string())].into(),
        None,
    );
    out.emit_continuation_slot(
        Continuation::Sequence(vec![
            Button::new("Reset", Next::ConfirmReset).into(),
            Button::new("Cancel", Next::CancelDialog).into(),
        ]),
        Some(zone),
    );
    out.finish()
}
