//! Append-only style table

use ahash::AHashMap;

use super::{Style, StyleId};

/// Styles of a workbook, addressed by [`StyleId`]
///
/// Entry 0 is the default style. Entries are never removed, so a handle stays
/// valid for the life of the table.
#[derive(Debug, Clone)]
pub struct StyleTable {
    styles: Vec<Style>,
    /// Dedup index used by [`StyleTable::intern`]
    interned: AHashMap<Style, StyleId>,
}

impl StyleTable {
    /// Create a table holding only the default style
    pub fn new() -> Self {
        let mut interned = AHashMap::with_capacity(16);
        interned.insert(Style::default(), StyleId::DEFAULT);
        Self {
            styles: vec![Style::default()],
            interned,
        }
    }

    /// Table whose entry `i` is `styles[i]`, as read from a file's style list
    ///
    /// The first style becomes entry 0; an empty list gives [`StyleTable::new`].
    pub fn from_styles(styles: Vec<Style>) -> Self {
        if styles.is_empty() {
            return Self::new();
        }
        let mut interned = AHashMap::with_capacity(styles.len());
        for (i, style) in styles.iter().enumerate() {
            interned.entry(style.clone()).or_insert(StyleId(i as u32));
        }
        Self { styles, interned }
    }

    /// Append a style and return its handle
    pub fn push(&mut self, style: Style) -> StyleId {
        let id = StyleId(self.styles.len() as u32);
        self.styles.push(style);
        id
    }

    /// Append a copy of `source`; always a new entry
    pub fn clone_style(&mut self, source: &Style) -> StyleId {
        self.push(source.clone())
    }

    /// Handle of an identical style, appending it on first use
    pub fn intern(&mut self, style: Style) -> StyleId {
        if let Some(id) = self.interned.get(&style) {
            return *id;
        }
        let id = self.push(style.clone());
        self.interned.insert(style, id);
        id
    }

    pub fn get(&self, id: StyleId) -> Option<&Style> {
        self.styles.get(id.index() as usize)
    }

    pub fn get_mut(&mut self, id: StyleId) -> Option<&mut Style> {
        self.styles.get_mut(id.index() as usize)
    }

    /// Handle for a raw index, if the table has that entry
    pub fn id(&self, index: u32) -> Option<StyleId> {
        ((index as usize) < self.styles.len()).then_some(StyleId(index))
    }

    /// Style behind a handle, falling back to the default style
    pub fn resolve(&self, id: StyleId) -> &Style {
        self.get(id).unwrap_or(&self.styles[0])
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True when only the default style is present
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &Style)> + '_ {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, style)| (StyleId(i as u32), style))
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_entry() {
        let table = StyleTable::new();
        assert_eq!(table.len(), 1);
        assert!(table.is_empty());
        assert_eq!(table.get(StyleId::DEFAULT), Some(&Style::default()));
    }

    #[test]
    fn test_clone_always_appends() {
        let mut table = StyleTable::new();
        let bold = Style::new().bold(true);
        let a = table.clone_style(&bold);
        let b = table.clone_style(&bold);
        assert_ne!(a, b);
        assert_eq!(table.get(a), table.get(b));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_intern_dedups() {
        let mut table = StyleTable::new();
        let a = table.intern(Style::new().italic(true));
        let b = table.intern(Style::new().italic(true));
        assert_eq!(a, b);
        assert_eq!(table.intern(Style::default()), StyleId::DEFAULT);
        assert_eq!(table.id(1), Some(a));
        assert_eq!(table.id(9), None);
    }

    #[test]
    fn test_from_styles_keeps_file_order() {
        let bold = Style::new().bold(true);
        let table = StyleTable::from_styles(vec![Style::default(), bold.clone(), bold.clone()]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(StyleId(2)), Some(&bold));

        let mut table = table;
        assert_eq!(table.intern(bold), StyleId(1));
        assert_eq!(StyleTable::from_styles(Vec::new()).len(), 1);
    }
}
