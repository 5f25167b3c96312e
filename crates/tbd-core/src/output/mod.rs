//! Structured passage output: elements, passages and the scrollback log.

pub mod element;
pub mod log;
pub mod passage;

pub use element::{LocalId, OutputElement, Target};
pub use log::PassageLog;
pub use passage::{Passage, PassageBuilder};
