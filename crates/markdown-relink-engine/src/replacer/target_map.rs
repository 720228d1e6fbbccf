use std::collections::HashMap;

use crate::link::Link;

/// Resolved reference definitions of one document, keyed by definition id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TargetMap {
    targets: HashMap<String, Link>,
}

impl TargetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved definition under its text. A later definition with
    /// the same id replaces the earlier one.
    pub fn insert(&mut self, link: Link) {
        self.targets.insert(link.text.clone(), link);
    }

    pub fn get(&self, id: &str) -> Option<&Link> {
        self.targets.get(id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keyed_by_text_not_target() {
        let mut map = TargetMap::new();
        map.insert(Link::new("ref1", "../c/page.md"));

        assert!(map.get("ref1").is_some());
        assert!(map.get("../c/page.md").is_none());
    }

    #[test]
    fn last_definition_wins() {
        let mut map = TargetMap::new();
        map.insert(Link::new("ref1", "first.md"));
        map.insert(Link::new("ref1", "second.md"));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("ref1").unwrap().target, "second.md");
    }
}
