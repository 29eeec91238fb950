//! List types.

use serde::{Deserialize, Serialize};

/// An ordered or unordered list. Items may carry a nested list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    /// Numbered (`1.`) or bulleted (`-`)
    #[serde(default)]
    pub ordered: bool,
    /// Items in order
    #[serde(default)]
    pub items: Vec<ListItem>,
}

impl ListBlock {
    /// Create an empty ordered list.
    pub fn ordered() -> Self {
        Self {
            ordered: true,
            items: Vec::new(),
        }
    }

    /// Create an empty unordered list.
    pub fn unordered() -> Self {
        Self::default()
    }

    /// Append a plain item.
    pub fn with_item(mut self, text: impl Into<String>) -> Self {
        self.items.push(ListItem::new(text));
        self
    }

    /// Append an item that carries a nested list.
    pub fn with_nested(mut self, text: impl Into<String>, nested: ListBlock) -> Self {
        self.items.push(ListItem::new(text).with_nested(nested));
        self
    }

    /// Check if the list has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count, nested items included.
    pub fn item_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| 1 + item.nested.as_ref().map_or(0, ListBlock::item_count))
            .sum()
    }

    /// Deepest nesting level; a flat list has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .items
            .iter()
            .filter_map(|item| item.nested.as_ref())
            .map(ListBlock::depth)
            .max()
            .unwrap_or(0)
    }

    /// Get plain text, one item per line.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines.join("\n")
    }

    fn collect_text(&self, out: &mut Vec<String>) {
        for item in &self.items {
            out.push(item.text.clone());
            if let Some(ref nested) = item.nested {
                nested.collect_text(out);
            }
        }
    }
}

/// A single list item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text
    pub text: String,
    /// Nested list rendered one level deeper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<ListBlock>,
}

impl ListItem {
    /// Create a plain item.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            nested: None,
        }
    }

    /// Attach a nested list.
    pub fn with_nested(mut self, nested: ListBlock) -> Self {
        self.nested = Some(nested);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_counts() {
        let list = ListBlock::ordered()
            .with_item("one")
            .with_nested(
                "two",
                ListBlock::unordered()
                    .with_item("a")
                    .with_nested("b", ListBlock::unordered().with_item("i")),
            );

        assert_eq!(list.item_count(), 5);
        assert_eq!(list.depth(), 3);
        assert_eq!(list.plain_text(), "one\ntwo\na\nb\ni");
    }

    #[test]
    fn test_empty_list() {
        let list = ListBlock::unordered();
        assert!(list.is_empty());
        assert_eq!(list.depth(), 1);
        assert_eq!(list.item_count(), 0);
    }
}
