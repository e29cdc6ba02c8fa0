//! Read-side filtering and pagination over the collection.

use serde::{Deserialize, Serialize};

use crate::product::Product;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Conjunctive filter set; a record must satisfy every supplied criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring of the display title.
    pub title: Option<String>,
    /// Record must carry every one of these genre ids.
    pub genres: Vec<String>,
}

impl GameFilter {
    pub fn matches(&self, game: &Product) -> bool {
        if self.min_price.is_some_and(|min| game.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| game.price > max) {
            return false;
        }
        if let Some(needle) = &self.title {
            let haystack = game.title.to_lowercase();
            if !haystack.contains(&needle.to_lowercase()) {
                return false;
            }
        }
        // Subset check: every required id must appear among the record's
        // genres; one miss disqualifies.
        self.genres
            .iter()
            .all(|id| game.genres.iter().any(|g| g.title == *id))
    }
}

/// 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }
}

/// One page of results plus the totals the storefront paginates by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub content: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

/// Filter then paginate; totals are counted before the page window so an
/// out-of-range page still reports them correctly.
pub fn run(games: &[Product], filter: &GameFilter, page: PageRequest) -> PageResult<Product> {
    let matched: Vec<&Product> = games.iter().filter(|g| filter.matches(g)).collect();
    let total_elements = matched.len();
    // A zero page size would divide by zero below; treat it as 1.
    let page_size = page.page_size.max(1);
    let total_pages = std::cmp::max(1, total_elements.div_ceil(page_size));
    let start = page.page.saturating_sub(1).saturating_mul(page_size);
    let content: Vec<Product> = matched
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();
    PageResult {
        content,
        page_number: page.page,
        page_size,
        total_elements,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::GenreRef;

    fn game(id: i64, title: &str, price: f64, genres: &[&str]) -> Product {
        Product {
            id,
            title: title.to_string(),
            price,
            genres: genres.iter().map(|g| GenreRef::new(*g)).collect(),
            ..Product::default()
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            game(1, "Alpha", 10.0, &["FPS"]),
            game(2, "Beta", 30.0, &["PUZZLE"]),
            game(3, "Gamma Strike", 20.0, &["FPS", "SCI_FI", "HORROR"]),
        ]
    }

    #[test]
    fn price_window_filters_conjunctively() {
        let filter = GameFilter {
            min_price: Some(5.0),
            max_price: Some(20.0),
            ..GameFilter::default()
        };
        let page = run(&catalog()[..2], &filter, PageRequest::default());
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.content[0].title, "Alpha");
    }

    #[test]
    fn title_match_is_case_insensitive_substring() {
        let filter = GameFilter { title: Some("gAmMa".into()), ..GameFilter::default() };
        let page = run(&catalog(), &filter, PageRequest::default());
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].id, 3);
    }

    #[test]
    fn required_genres_is_a_subset_check() {
        let games = vec![game(1, "Tagged", 5.0, &["A", "B", "C"])];

        let hit = GameFilter { genres: vec!["A".into(), "B".into()], ..GameFilter::default() };
        assert_eq!(run(&games, &hit, PageRequest::default()).total_elements, 1);

        let miss = GameFilter { genres: vec!["A".into(), "D".into()], ..GameFilter::default() };
        assert_eq!(run(&games, &miss, PageRequest::default()).total_elements, 0);
    }

    #[test]
    fn pagination_windows_and_totals() {
        let games: Vec<Product> = (1..=7)
            .map(|i| game(i, &format!("Game {i}"), 10.0, &[]))
            .collect();
        let filter = GameFilter::default();

        let first = run(&games, &filter, PageRequest::new(1, 3));
        assert_eq!(first.content.len(), 3);
        assert_eq!(first.total_elements, 7);
        assert_eq!(first.total_pages, 3);

        let last = run(&games, &filter, PageRequest::new(3, 3));
        assert_eq!(last.content.len(), 1);

        let beyond = run(&games, &filter, PageRequest::new(9, 3));
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 7);
        assert_eq!(beyond.total_pages, 3);
        assert_eq!(beyond.page_number, 9);
    }

    #[test]
    fn empty_result_still_reports_one_page() {
        let filter = GameFilter { title: Some("nothing matches".into()), ..GameFilter::default() };
        let page = run(&catalog(), &filter, PageRequest::default());
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn returned_records_are_independent_copies() {
        let games = catalog();
        let mut page = run(&games, &GameFilter::default(), PageRequest::default());
        page.content[0].title = "Mutated".into();
        assert_eq!(games[0].title, "Alpha");
    }
}
