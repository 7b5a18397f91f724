//! Clones template styles into a destination style table, once per source index

use ahash::AHashMap;
use report_sheets_core::{Style, StyleId, StyleTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    /// The style used when no source style is given
    Default,
    Source(u32),
}

/// Style-clone cache owned by one engine
///
/// Entries are filled lazily and never evicted, so cloning the same source
/// index twice yields the same destination handle.
#[derive(Debug, Clone, Default)]
pub struct StyleCache {
    source: Option<StyleTable>,
    cache: AHashMap<CacheKey, StyleId>,
}

impl StyleCache {
    pub fn new(source: Option<StyleTable>) -> Self {
        Self {
            source,
            cache: AHashMap::new(),
        }
    }

    pub fn source(&self) -> Option<&StyleTable> {
        self.source.as_ref()
    }

    /// Destination handle for source style `index`
    ///
    /// `None` when there is no source table or it has no such entry.
    pub fn clone_style(&mut self, dest: &mut StyleTable, index: u32) -> Option<StyleId> {
        let source = self.source.as_ref()?;
        if let Some(id) = self.cache.get(&CacheKey::Source(index)) {
            return Some(*id);
        }
        let Some(source_id) = source.id(index) else {
            log::warn!("Style index {index} is not in the source style table");
            return None;
        };
        let id = dest.clone_style(source.resolve(source_id));
        self.cache.insert(CacheKey::Source(index), id);
        Some(id)
    }

    /// A fresh default style, created on first use
    pub fn default_style(&mut self, dest: &mut StyleTable) -> StyleId {
        *self
            .cache
            .entry(CacheKey::Default)
            .or_insert_with(|| dest.push(Style::default()))
    }

    /// Number of cached handles
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> StyleTable {
        let mut table = StyleTable::new();
        for n in 0..6 {
            table.push(Style::new().number_format(&format!("0.{}", "0".repeat(n + 1))));
        }
        table
    }

    #[test]
    fn test_same_index_same_handle() {
        let mut cache = StyleCache::new(Some(source()));
        let mut dest = StyleTable::new();

        let first = cache.clone_style(&mut dest, 5).unwrap();
        let second = cache.clone_style(&mut dest, 5).unwrap();
        let other = cache.clone_style(&mut dest, 3).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert_eq!(dest.len(), 3);
        assert_eq!(dest.resolve(first).number_format.pattern(), "0.00000");
    }

    #[test]
    fn test_without_source() {
        let mut cache = StyleCache::new(None);
        let mut dest = StyleTable::new();
        assert_eq!(cache.clone_style(&mut dest, 1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unknown_index() {
        let mut cache = StyleCache::new(Some(source()));
        let mut dest = StyleTable::new();
        assert_eq!(cache.clone_style(&mut dest, 99), None);
    }

    #[test]
    fn test_default_style_is_cached() {
        let mut cache = StyleCache::new(None);
        let mut dest = StyleTable::new();
        let a = cache.default_style(&mut dest);
        let b = cache.default_style(&mut dest);
        assert_eq!(a, b);
        assert_ne!(a, StyleId::DEFAULT);
    }
}
