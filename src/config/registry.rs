//! Named handlers available to declarative app files.

use indexmap::IndexMap;

/// Lookup table from a handler name to the handler value.
#[derive(Debug, Clone)]
pub struct HandlerRegistry<H> {
    handlers: IndexMap<String, H>,
}

impl<H> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }
}

impl<H> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a handler.
    pub fn register(&mut self, name: impl Into<String>, handler: H) -> Option<H> {
        self.handlers.insert(name.into(), handler)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, handler: H) -> Self {
        self.register(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&H> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl HandlerRegistry<String> {
    /// Registry whose handlers are their own names.
    ///
    /// Resolving against it checks references without binding behavior,
    /// which is what plan printing needs.
    pub fn names_of<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names
            .into_iter()
            .fold(Self::new(), |registry, name| registry.with(name, name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = HandlerRegistry::new().with("ok", 1);
        assert_eq!(registry.register("echo", 2), None);
        assert_eq!(registry.register("ok", 3), Some(1));

        assert_eq!(registry.get("ok"), Some(&3));
        assert!(registry.contains("echo"));
        assert!(!registry.contains("missing"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ok", "echo"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_names_of() {
        let registry = HandlerRegistry::<String>::names_of(["a", "b"]);
        assert_eq!(registry.get("b").map(String::as_str), Some("b"));
    }
}
