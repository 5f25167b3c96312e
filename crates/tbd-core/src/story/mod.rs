//! Stories: passage functions, their arguments and the scene they write to.

mod args;
mod registry;
mod scene;

pub use args::{ArgKind, ParamSpec, PassageArgs};
pub use registry::{PassageDef, PassageFn, PassageRegistry};
pub use scene::Scene;
