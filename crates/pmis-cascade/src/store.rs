//! Per-level option stores.
//!
//! Each level of a cascade owns exactly one [`LevelStore`]: the options
//! currently offered for that level plus a loading flag. Stores are
//! transient display state — they are populated by fetches and discarded
//! whenever an ancestor selection changes. The authoritative Selection
//! never lives here.

use pmis_core::OptionItem;

/// Options and loading state for one level.
#[derive(Debug, Clone, Default)]
pub struct LevelStore {
    options: Vec<OptionItem>,
    loading: bool,
}

impl LevelStore {
    /// The options currently offered for this level.
    pub fn options(&self) -> &[OptionItem] {
        &self.options
    }

    /// Whether a fetch for this level is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Empty and not loading. A level in this state renders as
    /// selectable-but-empty, whether it legitimately has no children or
    /// its fetch failed — the distinction is carried on the event stream,
    /// not in the store.
    pub fn is_empty_idle(&self) -> bool {
        self.options.is_empty() && !self.loading
    }

    pub(crate) fn begin_loading(&mut self) {
        self.options.clear();
        self.loading = true;
    }

    pub(crate) fn commit(&mut self, options: Vec<OptionItem>) {
        self.options = options;
        self.loading = false;
    }

    pub(crate) fn settle_empty(&mut self) {
        self.options.clear();
        self.loading = false;
    }

    pub(crate) fn reset(&mut self) {
        self.options.clear();
        self.loading = false;
    }

    /// Display name of the option with `id`, if present.
    pub(crate) fn name_of(&self, id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmis_core::OptionStatus;

    fn item(id: &str, name: &str) -> OptionItem {
        OptionItem {
            id: id.into(),
            code: String::new(),
            name: name.into(),
            status: OptionStatus::Active,
        }
    }

    #[test]
    fn lifecycle() {
        let mut store = LevelStore::default();
        assert!(store.is_empty_idle());

        store.begin_loading();
        assert!(store.is_loading());
        assert!(!store.is_empty_idle());

        store.commit(vec![item("C1", "Civil")]);
        assert!(!store.is_loading());
        assert_eq!(store.options().len(), 1);
        assert_eq!(store.name_of("C1"), Some("Civil"));
        assert_eq!(store.name_of("C2"), None);

        store.reset();
        assert!(store.is_empty_idle());
    }

    #[test]
    fn settle_empty_clears_loading_and_options() {
        let mut store = LevelStore::default();
        store.begin_loading();
        store.settle_empty();
        assert!(store.is_empty_idle());
    }
}
