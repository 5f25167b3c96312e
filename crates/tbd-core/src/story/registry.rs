//! Named passage functions.

use std::collections::HashMap;

use super::args::{ParamSpec, PassageArgs, validate};
use super::scene::Scene;
use crate::error::{EngineError, EngineResult};

/// A passage function. It reads and updates the state and emits output
/// (including the continuations leading onward) through the scene.
pub type PassageFn<S> = fn(&mut Scene<'_, S>, &PassageArgs) -> EngineResult<()>;

/// A registered passage.
pub struct PassageDef<S> {
    name: String,
    params: Vec<ParamSpec>,
    run: PassageFn<S>,
}

impl<S> PassageDef<S> {
    /// Passage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Check arguments against the declared parameters.
    pub fn check_args(&self, args: &PassageArgs) -> EngineResult<()> {
        validate(&self.name, &self.params, args)
    }

    /// Run the passage against a scene. Arguments are checked first.
    pub fn invoke(&self, scene: &mut Scene<'_, S>, args: &PassageArgs) -> EngineResult<()> {
        self.check_args(args)?;
        (self.run)(scene, args)
    }
}

/// All passages of a story, plus the one it starts with.
pub struct PassageRegistry<S> {
    passages: HashMap<String, PassageDef<S>>,
    start: Option<String>,
}

impl<S> Default for PassageRegistry<S> {
    fn default() -> Self {
        Self {
            passages: HashMap::new(),
            start: None,
        }
    }
}

impl<S> PassageRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a passage, replacing any passage of the same name.
    pub fn register(&mut self, name: impl Into<String>, params: Vec<ParamSpec>, run: PassageFn<S>) {
        let name = name.into();
        self.passages.insert(
            name.clone(),
            PassageDef { name, params, run },
        );
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(
        mut self,
        name: impl Into<String>,
        params: Vec<ParamSpec>,
        run: PassageFn<S>,
    ) -> Self {
        self.register(name, params, run);
        self
    }

    /// Set the passage a fresh game starts with.
    pub fn with_start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    /// Name of the start passage.
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// Look up a passage.
    pub fn get(&self, name: &str) -> EngineResult<&PassageDef<S>> {
        self.passages
            .get(name)
            .ok_or_else(|| EngineError::UnknownPassage(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.passages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered passages.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether no passage is registered.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PassageBuilder;
    use crate::story::ArgKind;

    fn greet(scene: &mut Scene<'_, u32>, args: &PassageArgs) -> EngineResult<()> {
        *scene.state_mut() += 1;
        scene.paragraph(format!("Hello {}", args.get_str("who").unwrap_or("you")));
        Ok(())
    }

    fn registry() -> PassageRegistry<u32> {
        PassageRegistry::new()
            .with("greet", vec![ParamSpec::required("who", ArgKind::Text)], greet)
            .with_start("greet")
    }

    #[test]
    fn lookup_and_names() {
        let reg = registry();
        assert_eq!(reg.start(), Some("greet"));
        assert_eq!(reg.names(), vec!["greet"]);
        assert!(reg.get("greet").is_ok());
        assert!(matches!(
            reg.get("missing"),
            Err(EngineError::UnknownPassage(name)) if name == "missing"
        ));
    }

    #[test]
    fn invoke_checks_args() {
        let reg = registry();
        let def = reg.get("greet").unwrap();
        let mut state = 0;
        let mut out = PassageBuilder::new();

        let err = def
            .invoke(&mut Scene::new(&mut state, &mut out), &PassageArgs::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArguments { .. }));
        assert_eq!(state, 0);

        let mut args = PassageArgs::new();
        args.insert("who", "Ada");
        def.invoke(&mut Scene::new(&mut state, &mut out), &args)
            .unwrap();
        assert_eq!(state, 1);
        assert_eq!(out.len(), 1);
    }
}
