//! Filterable list of playlist items with id-stable selection.
//!
//! Pollers replace the whole list every few seconds; the selection follows
//! the item id across replacements instead of sticking to a row number.

use remote_proto::protocol::PlaylistItem;

#[derive(Debug, Default)]
pub struct ItemList {
    items: Vec<PlaylistItem>,
    /// Indices into `items` that pass the filter.
    shown: Vec<usize>,
    selected: usize,
    offset: usize,
    filter: String,
}

/// Every whitespace-separated word of `query` appears in title or URI.
pub fn matches(query: &str, item: &PlaylistItem) -> bool {
    if query.is_empty() {
        return true;
    }
    let haystack = format!("{} {}", item.title, item.uri).to_lowercase();
    query
        .split_whitespace()
        .all(|word| haystack.contains(&word.to_lowercase()))
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&mut self, items: &[PlaylistItem]) {
        let keep = self.selected_item().map(|item| item.id);
        self.items = items.to_vec();
        self.rebuild();
        if let Some(id) = keep {
            self.select_id(id);
        }
    }

    pub fn set_filter(&mut self, query: &str) {
        let keep = self.selected_item().map(|item| item.id);
        self.filter = query.to_string();
        self.rebuild();
        self.offset = 0;
        match keep {
            Some(id) => {
                self.select_id(id);
            }
            None => self.selected = 0,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn rebuild(&mut self) {
        self.shown = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| matches(&self.filter, item))
            .map(|(i, _)| i)
            .collect();
        if self.selected >= self.shown.len() {
            self.selected = self.shown.len().saturating_sub(1);
        }
    }

    /// Select the first shown item with `id`. Returns false if none is shown.
    pub fn select_id(&mut self, id: i64) -> bool {
        match self.shown.iter().position(|&i| self.items[i].id == id) {
            Some(pos) => {
                self.selected = pos;
                true
            }
            None => false,
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        self.selected = (self.selected + n).min(self.shown.len().saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.shown.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&PlaylistItem> {
        self.shown.get(self.selected).map(|&i| &self.items[i])
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }

    /// Items in the `height` rows starting at the scroll offset.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = &PlaylistItem> {
        self.shown
            .iter()
            .skip(self.offset)
            .take(height)
            .map(|&i| &self.items[i])
    }

    pub fn selected_row(&self) -> usize {
        self.selected.saturating_sub(self.offset)
    }

    /// Select the item drawn at `row` of the list area.
    pub fn click(&mut self, row: usize) -> bool {
        let target = self.offset + row;
        if target < self.shown.len() {
            self.selected = target;
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, title: &str) -> PlaylistItem {
        PlaylistItem {
            id,
            title: title.to_string(),
            uri: format!("file:///music/{}.flac", title),
            duration_secs: Some(60),
            current: false,
        }
    }

    #[test]
    fn selection_follows_id_across_replace() {
        let mut list = ItemList::new();
        list.set_items(&[item(1, "a"), item(2, "b"), item(3, "c")]);
        list.select_down(1);
        assert_eq!(list.selected_item().map(|i| i.id), Some(2));

        // New snapshot with an item inserted before the selection.
        list.set_items(&[item(4, "d"), item(1, "a"), item(2, "b"), item(3, "c")]);
        assert_eq!(list.selected_item().map(|i| i.id), Some(2));
    }

    #[test]
    fn removing_last_selected_row_clamps() {
        let mut list = ItemList::new();
        list.set_items(&[item(1, "a"), item(2, "b")]);
        list.select_last();
        list.set_items(&[item(1, "a")]);
        assert_eq!(list.selected_item().map(|i| i.id), Some(1));
    }

    #[test]
    fn filter_matches_all_words_in_title_or_uri() {
        let mut list = ItemList::new();
        list.set_items(&[item(1, "Blue Train"), item(2, "Giant Steps"), item(3, "Blue Monk")]);
        list.set_filter("blue music");
        assert_eq!(list.len(), 2);
        list.set_filter("blue monk");
        assert_eq!(list.selected_item().map(|i| i.id), Some(3));
        list.set_filter("");
        assert_eq!(list.len(), 3);
        assert_eq!(list.selected_item().map(|i| i.id), Some(3));
    }

    #[test]
    fn scrolling_keeps_selection_on_screen() {
        let mut list = ItemList::new();
        let items: Vec<_> = (0..20).map(|i| item(i, "x")).collect();
        list.set_items(&items);
        list.select_down(12);
        list.ensure_visible(5);
        assert_eq!(list.selected_row(), 4);
        assert_eq!(list.visible(5).next().map(|i| i.id), Some(8));
        assert!(list.click(0));
        assert_eq!(list.selected_item().map(|i| i.id), Some(8));
        assert!(!list.click(50));
    }

    #[test]
    fn filter_with_no_match_resets_to_first_row() {
        let mut list = ItemList::new();
        list.set_items(&[item(1, "a"), item(2, "b"), item(3, "c")]);
        list.select_last();
        list.set_filter("zzz");
        assert!(list.selected_item().is_none());
        list.set_filter("");
        assert_eq!(list.selected_item().map(|i| i.id), Some(1));
    }
}
