use super::{ClipEditor, ColumnAlign, Count, Lower, Replace, Sort, Trim, Upper};

/// Constructs a fresh editor instance.
pub type EditorFactory = fn() -> Box<dyn ClipEditor>;

/// Name-to-constructor table of built-in editors.
///
/// Populated once at startup and read-only afterwards, so a single registry
/// can back any number of dispatches.
#[derive(Clone, Default)]
pub struct Registry {
    entries: Vec<(&'static str, EditorFactory)>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}

impl Registry {
    /// A registry with no editors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every editor that ships with the crate.
    pub fn builtin() -> Self {
        Self::empty()
            .with(|| Box::new(ColumnAlign::default()))
            .with(|| Box::new(Count::default()))
            .with(|| Box::new(Lower::default()))
            .with(|| Box::new(Replace::default()))
            .with(|| Box::new(Sort::default()))
            .with(|| Box::new(Trim::default()))
            .with(|| Box::new(Upper::default()))
    }

    /// Register an editor under the name its instances report.
    ///
    /// A later registration with the same name (ignoring case) replaces the earlier one.
    #[must_use]
    pub fn with(mut self, factory: EditorFactory) -> Self {
        let name = factory().name();
        self.entries
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.entries.push((name, factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factory(name).is_some()
    }

    /// A fresh instance of the editor called `name`, ignoring case.
    pub fn create(&self, name: &str) -> Option<Box<dyn ClipEditor>> {
        self.factory(name).map(|factory| factory())
    }

    /// `(name, short description)` for every editor, in registration order.
    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        self.entries
            .iter()
            .map(|(name, factory)| (*name, factory().short_description()))
            .collect()
    }

    /// The long description of `name`, if registered.
    pub fn describe(&self, name: &str) -> Option<&'static str> {
        self.create(name).map(|editor| editor.long_description())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn factory(&self, name: &str) -> Option<EditorFactory> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, factory)| *factory)
    }
}
