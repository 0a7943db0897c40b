//! Item-list view plumbing: search filter, pagination tiers and the
//! weight-percentage readout.

use crate::layout::{effective_weight, Item};

/// Page size grows with the list so huge wheels stay navigable.
pub fn items_per_page(total: usize) -> usize {
    if total <= 20 {
        10
    } else if total <= 100 {
        20
    } else {
        50
    }
}

/// An item's share of the wheel, in percent, from its effective weight.
pub fn percentage(items: &[Item], index: usize) -> f64 {
    let total: f64 = items.iter().map(effective_weight).sum();
    if total <= 0.0 || index >= items.len() {
        return 0.0;
    }
    effective_weight(&items[index]) / total * 100.0
}

/// Search and paging state over an item list the roster does not own.
#[derive(Debug, Default)]
pub struct Roster {
    search: String,
    page: usize,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Changing the filter always jumps back to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub fn reset(&mut self) {
        self.search.clear();
        self.page = 1;
    }

    pub fn change_page(&mut self, page: usize, items: &[Item]) {
        if page >= 1 && page <= self.total_pages(items) {
            self.page = page;
        }
    }

    /// Indices of items matching the search term, case-insensitively.
    pub fn filtered<'a>(&self, items: &'a [Item]) -> Vec<(usize, &'a Item)> {
        let needle = self.search.to_lowercase();
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.label.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn total_pages(&self, items: &[Item]) -> usize {
        let filtered = self.filtered(items).len();
        let per_page = items_per_page(items.len());
        filtered.div_ceil(per_page).max(1)
    }

    /// The page in effect for a given list: the stored page, clamped in
    /// case the list shrank underneath it.
    fn current_page(&self, items: &[Item]) -> usize {
        self.page().min(self.total_pages(items))
    }

    /// The current page of filtered items.
    pub fn page_items<'a>(&self, items: &'a [Item]) -> Vec<(usize, &'a Item)> {
        let per_page = items_per_page(items.len());
        let start = (self.current_page(items) - 1) * per_page;
        self.filtered(items)
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect()
    }

    /// Human-readable "start - end / total" range for the current page.
    pub fn display_range(&self, items: &[Item]) -> String {
        let filtered = self.filtered(items).len();
        let per_page = items_per_page(items.len());
        if filtered == 0 {
            return "0 - 0 / 0".to_string();
        }
        let page = self.current_page(items);
        let start = (page - 1) * per_page + 1;
        let end = (page * per_page).min(filtered);
        format!("{start} - {end} / {filtered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("Item {i}"), Some(1.0), "#FF6B6B"))
            .collect()
    }

    #[test]
    fn page_size_tiers() {
        assert_eq!(items_per_page(5), 10);
        assert_eq!(items_per_page(20), 10);
        assert_eq!(items_per_page(21), 20);
        assert_eq!(items_per_page(100), 20);
        assert_eq!(items_per_page(101), 50);
    }

    #[test]
    fn percentages_use_the_weight_fallback() {
        let items = vec![
            Item::new("a", Some(1.0), "red"),
            Item::new("b", Some(-5.0), "red"), // falls back to 1
            Item::new("c", Some(2.0), "red"),
        ];
        assert!((percentage(&items, 0) - 25.0).abs() < 1e-9);
        assert!((percentage(&items, 1) - 25.0).abs() < 1e-9);
        assert!((percentage(&items, 2) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn pagination_walks_the_list() {
        let list = items(25); // tier: 20 per page
        let mut roster = Roster::new();
        assert_eq!(roster.total_pages(&list), 2);
        assert_eq!(roster.page_items(&list).len(), 20);
        roster.change_page(2, &list);
        let page = roster.page_items(&list);
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].0, 20);
        assert_eq!(roster.display_range(&list), "21 - 25 / 25");
        // Out-of-range page changes are ignored.
        roster.change_page(9, &list);
        assert_eq!(roster.page(), 2);
    }

    #[test]
    fn stale_page_clamps_when_the_list_shrinks() {
        let mut roster = Roster::new();
        roster.change_page(2, &items(25));
        // The list shrinks under the roster, as after removing a winner.
        let shrunk = items(5);
        let page = roster.page_items(&shrunk);
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].0, 0);
        assert_eq!(roster.display_range(&shrunk), "1 - 5 / 5");
    }

    #[test]
    fn search_filters_and_resets_paging() {
        let mut list = items(30);
        list.push(Item::new("Needle", Some(1.0), "red"));
        let mut roster = Roster::new();
        roster.change_page(2, &list);
        roster.set_search("needle");
        assert_eq!(roster.page(), 1);
        let hits = roster.filtered(&list);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1.label, "Needle");
        roster.reset();
        assert_eq!(roster.filtered(&list).len(), 31);
    }

    #[test]
    fn empty_filter_range_reads_zero() {
        let list = items(3);
        let mut roster = Roster::new();
        roster.set_search("no such label");
        assert_eq!(roster.display_range(&list), "0 - 0 / 0");
        assert_eq!(roster.total_pages(&list), 1);
    }
}
