//! Troubadour: an engine for interactive, passage-based stories.
//!
//! A story is a set of named passage functions. Each one reads and updates
//! the application state and emits structured output into a [`Passage`]:
//! markup, nested containers, images and the continuations (buttons, text
//! buttons) that lead onward. The [`Game`] controller renders passages onto
//! a [`DisplaySurface`], keeps a bounded scrollback log, and saves the whole
//! session to a [`Storage`] backend after every step so it can be replayed
//! on the next launch.

pub mod config;
pub mod continuation;
pub mod error;
pub mod game;
pub mod identity;
pub mod output;
pub mod render;
pub mod save;
pub mod story;
pub mod surface;

pub use config::{EngineConfig, Regions};
pub use continuation::{Button, Continuation, Next, PassageCall, TextButton, ValueConverter};
pub use error::{EngineError, EngineResult};
pub use game::{Game, Outcome, Phase, Status};
pub use identity::{ElementAddress, IdProvider};
pub use output::{LocalId, OutputElement, Passage, PassageBuilder, PassageLog, Target};
pub use save::{FileStorage, GameSession, MemoryStorage, Storage};
pub use story::{ArgKind, ParamSpec, PassageArgs, PassageRegistry, Scene};
pub use surface::{DisplaySurface, Fragment, MemorySurface};
