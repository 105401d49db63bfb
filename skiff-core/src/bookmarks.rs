use thiserror::Error;

use crate::address::normalize_input;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    #[error("invalid selection {index} (list has {len} bookmarks)")]
    InvalidSelection { index: usize, len: usize },

    #[error("bookmark URL cannot be empty")]
    EmptyUrl,
}

/// Editable working copy of the bookmark list.
///
/// Nothing reaches the committed list until [`BookmarkEditor::commit`]; dropping
/// the editor discards the session.
#[derive(Debug, Clone)]
pub struct BookmarkEditor {
    original: Vec<String>,
    items: Vec<String>,
}

impl BookmarkEditor {
    pub fn new(committed: &[String]) -> Self {
        BookmarkEditor {
            original: committed.to_vec(),
            items: committed.to_vec(),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the working copy differs from the list it was opened with.
    pub fn is_modified(&self) -> bool {
        self.items != self.original
    }

    fn check(&self, index: usize) -> Result<(), BookmarkError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(BookmarkError::InvalidSelection {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Append a URL typed by the user. Blank input is ignored.
    pub fn add(&mut self, input: &str) -> Option<usize> {
        let url = normalize_input(input)?;
        self.items.push(url);
        Some(self.items.len() - 1)
    }

    pub fn edit(&mut self, index: usize, input: &str) -> Result<(), BookmarkError> {
        self.check(index)?;
        let url = normalize_input(input).ok_or(BookmarkError::EmptyUrl)?;
        self.items[index] = url;
        Ok(())
    }

    /// Remove and return the bookmark at `index`.
    pub fn delete(&mut self, index: usize) -> Result<String, BookmarkError> {
        self.check(index)?;
        Ok(self.items.remove(index))
    }

    /// Swap with the previous item. Returns the item's new index; at the top
    /// this is a no-op returning `index`.
    pub fn move_up(&mut self, index: usize) -> Result<usize, BookmarkError> {
        self.check(index)?;
        if index == 0 {
            return Ok(index);
        }
        self.items.swap(index, index - 1);
        Ok(index - 1)
    }

    /// Swap with the next item. At the bottom this is a no-op returning `index`.
    pub fn move_down(&mut self, index: usize) -> Result<usize, BookmarkError> {
        self.check(index)?;
        if index + 1 == self.items.len() {
            return Ok(index);
        }
        self.items.swap(index, index + 1);
        Ok(index + 1)
    }

    /// Finish the session, handing back the list to persist.
    pub fn commit(self) -> Vec<String> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn move_up_at_top_is_noop() {
        let committed = list(&["http://a", "http://b"]);
        let mut editor = BookmarkEditor::new(&committed);
        assert_eq!(editor.move_up(0), Ok(0));
        assert_eq!(editor.items(), committed.as_slice());
        assert!(!editor.is_modified());
    }

    #[test]
    fn move_down_at_bottom_is_noop() {
        let committed = list(&["http://a", "http://b"]);
        let mut editor = BookmarkEditor::new(&committed);
        assert_eq!(editor.move_down(1), Ok(1));
        assert_eq!(editor.items(), committed.as_slice());
    }

    #[test]
    fn moves_swap_neighbours() {
        let mut editor = BookmarkEditor::new(&list(&["http://a", "http://b", "http://c"]));
        assert_eq!(editor.move_up(2), Ok(1));
        assert_eq!(editor.items(), list(&["http://a", "http://c", "http://b"]).as_slice());
        assert_eq!(editor.move_down(0), Ok(1));
        assert_eq!(editor.items(), list(&["http://c", "http://a", "http://b"]).as_slice());
    }

    #[test]
    fn delete_then_commit_leaves_original_untouched() {
        let committed = list(&["http://a", "http://b", "http://c"]);
        let mut editor = BookmarkEditor::new(&committed);
        assert_eq!(editor.delete(1), Ok("http://b".to_string()));
        assert_eq!(committed, list(&["http://a", "http://b", "http://c"]));
        assert_eq!(editor.commit(), list(&["http://a", "http://c"]));
    }

    #[test]
    fn dropping_editor_discards_changes() {
        let committed = list(&["http://a"]);
        {
            let mut editor = BookmarkEditor::new(&committed);
            editor.add("b.com");
            editor.delete(0).unwrap();
            assert!(editor.is_modified());
        }
        assert_eq!(committed, list(&["http://a"]));
    }

    #[test]
    fn add_normalizes_and_ignores_blank() {
        let mut editor = BookmarkEditor::new(&[]);
        assert_eq!(editor.add("example.com"), Some(0));
        assert_eq!(editor.add("https://x.com"), Some(1));
        assert_eq!(editor.add("  "), None);
        assert_eq!(editor.commit(), list(&["http://example.com", "https://x.com"]));
    }

    #[test]
    fn edit_normalizes() {
        let mut editor = BookmarkEditor::new(&list(&["http://a"]));
        editor.edit(0, "b.org").unwrap();
        assert_eq!(editor.items(), list(&["http://b.org"]).as_slice());
    }

    #[test]
    fn edit_rejects_blank_input() {
        let mut editor = BookmarkEditor::new(&list(&["http://a"]));
        assert_eq!(editor.edit(0, ""), Err(BookmarkError::EmptyUrl));
        assert_eq!(editor.items(), list(&["http://a"]).as_slice());
    }

    #[test]
    fn out_of_range_is_invalid_selection() {
        let mut editor = BookmarkEditor::new(&list(&["http://a"]));
        let err = BookmarkError::InvalidSelection { index: 3, len: 1 };
        assert_eq!(editor.edit(3, "x"), Err(err.clone()));
        assert_eq!(editor.delete(3), Err(err.clone()));
        assert_eq!(editor.move_up(3), Err(err.clone()));
        assert_eq!(editor.move_down(3), Err(err));
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn operations_on_empty_list_are_invalid() {
        let mut editor = BookmarkEditor::new(&[]);
        assert!(editor.is_empty());
        assert!(editor.move_up(0).is_err());
        assert!(editor.move_down(0).is_err());
        assert!(editor.delete(0).is_err());
    }

    #[test]
    fn editor_allows_duplicates() {
        let mut editor = BookmarkEditor::new(&list(&["http://a"]));
        editor.add("http://a");
        assert_eq!(editor.len(), 2);
    }
}
