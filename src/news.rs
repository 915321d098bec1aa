//! News panel state: fetching, category grouping, tab selection, bookmarks.
//!
//! Everything here is a pure state transition; the panel never touches the
//! network. Background tasks call [`NewsPanel::begin_fetch`] to obtain a
//! sequence number, perform the HTTP call, and hand the outcome back through
//! [`NewsPanel::apply_fetch`]. Overlapping refreshes are resolved by the
//! sequence guard: only the most recently issued fetch may apply its result,
//! so a slow stale response can never overwrite a newer one.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::api::{ApiError, Article, ArticleId};

/// Bucket name for articles whose `category` field is absent or empty.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Category tabs the panel always shows, in display order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

/// User-facing message when a fetch fails. The underlying error goes to the
/// log; the panel shows only this.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching news. Please try again later.";

/// Start of the fetch window: now minus one day, in epoch milliseconds.
///
/// Every fetch (initial and manual refresh) re-seeds this, matching the
/// service's `timestamp` query parameter contract.
pub fn fetch_window_start_ms() -> i64 {
    (Utc::now() - chrono::Duration::days(1)).timestamp_millis()
}

// ============================================================================
// Grouping
// ============================================================================

/// The ordered articles of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub name: String,
    pub articles: Vec<Article>,
}

/// Articles grouped by category.
///
/// Derived data: rebuilt in full by [`group_by_category`] on every
/// successful fetch, never mutated incrementally. Bucket order is
/// first-appearance order of each category in the fetched list; order
/// within a bucket preserves the fetched order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouped {
    buckets: Vec<Bucket>,
}

impl Grouped {
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.name.as_str())
    }

    /// Total articles across all buckets. Always equals the length of the
    /// list the grouping was built from.
    pub fn total_articles(&self) -> usize {
        self.buckets.iter().map(|b| b.articles.len()).sum()
    }
}

/// Groups a fetched article list by category.
///
/// Single pass: each article lands in exactly one bucket, keyed by its
/// `category` field, with absent or empty categories normalized to
/// [`UNCATEGORIZED`]. Relative order within a bucket matches the input.
pub fn group_by_category(articles: &[Article]) -> Grouped {
    let mut buckets: Vec<Bucket> = Vec::new();

    for article in articles {
        let name = article
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);

        match buckets.iter_mut().find(|b| b.name == name) {
            Some(bucket) => bucket.articles.push(article.clone()),
            None => buckets.push(Bucket {
                name: name.to_string(),
                articles: vec![article.clone()],
            }),
        }
    }

    Grouped { buckets }
}

// ============================================================================
// Bookmarks
// ============================================================================

/// Session-scoped set of bookmarked article ids.
///
/// Append-only for the lifetime of the process; there is no unbookmark and
/// nothing is persisted. Insertion is idempotent.
#[derive(Debug, Default)]
pub struct BookmarkSet {
    ids: HashSet<ArticleId>,
}

impl BookmarkSet {
    /// Adds an id. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ArticleId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: ArticleId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ============================================================================
// Panel State
// ============================================================================

/// State of the news panel.
///
/// Owns the last successfully fetched article list (shared via `Arc` so
/// render code can hold it cheaply), the grouping derived from it, the
/// session's bookmarks, and the tab/selection cursor. All mutation goes
/// through the reducer methods below.
pub struct NewsPanel {
    /// Categories that always render as tabs, in configured order.
    canonical: Vec<String>,
    /// Last successful fetch result. Untouched by failed fetches.
    pub articles: Arc<Vec<Article>>,
    /// Grouping derived from `articles`.
    pub grouped: Grouped,
    /// Index into `tabs()`.
    pub selected_tab: usize,
    /// Index into `visible_articles()` of the current tab.
    pub selected_article: usize,
    pub bookmarks: BookmarkSet,
    /// User-facing fetch error, cleared by the next successful fetch.
    pub error: Option<String>,
    /// Whether the most recently issued fetch is still unanswered.
    pub in_flight: bool,
    /// Sequence number of the most recently issued fetch.
    fetch_seq: u64,
}

impl NewsPanel {
    pub fn new(canonical: Vec<String>) -> Self {
        Self {
            canonical,
            articles: Arc::new(Vec::new()),
            grouped: Grouped::default(),
            selected_tab: 0,
            selected_article: 0,
            bookmarks: BookmarkSet::default(),
            error: None,
            in_flight: false,
            fetch_seq: 0,
        }
    }

    // ------------------------------------------------------------------
    // Fetch lifecycle
    // ------------------------------------------------------------------

    /// Registers a new fetch and returns its sequence number.
    ///
    /// The caller passes the number back to [`apply_fetch`]; any fetch
    /// issued before the latest one is stale on arrival.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq = self.fetch_seq.wrapping_add(1);
        self.in_flight = true;
        self.fetch_seq
    }

    /// Applies a fetch outcome. Returns `false` for discarded stale results.
    ///
    /// On success the article list is replaced wholesale and the grouping
    /// recomputed; on failure prior data is left untouched and only the
    /// user-facing error message changes.
    pub fn apply_fetch(&mut self, seq: u64, result: Result<Vec<Article>, ApiError>) -> bool {
        if seq != self.fetch_seq {
            tracing::debug!(seq = seq, latest = self.fetch_seq, "Discarding stale fetch result");
            return false;
        }
        self.in_flight = false;

        match result {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "Articles updated");
                self.articles = Arc::new(articles);
                self.grouped = group_by_category(&self.articles);
                self.error = None;
                self.clamp_selection();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, keeping previous articles");
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Tabs and selection
    // ------------------------------------------------------------------

    /// Tab names in display order: the canonical categories, then any
    /// bucket the data introduced (e.g. "Uncategorized"), so every fetched
    /// article is reachable.
    pub fn tabs(&self) -> Vec<&str> {
        let mut tabs: Vec<&str> = self.canonical.iter().map(String::as_str).collect();
        for name in self.grouped.names() {
            if !tabs.contains(&name) {
                tabs.push(name);
            }
        }
        tabs
    }

    pub fn current_tab(&self) -> Option<&str> {
        self.tabs().get(self.selected_tab).copied()
    }

    /// Bucket behind the selected tab, if the last fetch produced one.
    pub fn current_bucket(&self) -> Option<&Bucket> {
        let tabs = self.tabs();
        let name = tabs.get(self.selected_tab)?;
        self.grouped.bucket(name)
    }

    /// Articles of the current tab that render: those carrying an image.
    /// Imageless articles stay in the bucket but are skipped here.
    pub fn visible_articles(&self) -> Vec<&Article> {
        self.current_bucket()
            .map(|b| b.articles.iter().filter(|a| a.has_image()).collect())
            .unwrap_or_default()
    }

    pub fn selected_visible_article(&self) -> Option<&Article> {
        self.visible_articles().get(self.selected_article).copied()
    }

    /// Pure local tab switch; never re-fetches.
    pub fn select_tab(&mut self, index: usize) {
        let count = self.tabs().len();
        if count == 0 {
            return;
        }
        self.selected_tab = index.min(count - 1);
        self.selected_article = 0;
    }

    pub fn next_tab(&mut self) {
        let count = self.tabs().len();
        if count > 0 {
            self.select_tab((self.selected_tab + 1) % count);
        }
    }

    pub fn prev_tab(&mut self) {
        let count = self.tabs().len();
        if count > 0 {
            self.select_tab((self.selected_tab + count - 1) % count);
        }
    }

    pub fn nav_up(&mut self) {
        self.selected_article = self.selected_article.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let count = self.visible_articles().len();
        if count > 0 {
            self.selected_article = (self.selected_article + 1).min(count - 1);
        }
    }

    /// Clamp cursor indices after the underlying lists changed.
    pub fn clamp_selection(&mut self) {
        let tab_count = self.tabs().len();
        if tab_count == 0 {
            self.selected_tab = 0;
        } else {
            self.selected_tab = self.selected_tab.min(tab_count - 1);
        }

        let visible = self.visible_articles().len();
        if visible == 0 {
            self.selected_article = 0;
        } else {
            self.selected_article = self.selected_article.min(visible - 1);
        }
    }

    // ------------------------------------------------------------------
    // Bookmarks
    // ------------------------------------------------------------------

    /// Records a confirmed bookmark save. Idempotent.
    pub fn mark_bookmarked(&mut self, id: ArticleId) {
        self.bookmarks.insert(id);
    }

    /// Bookmarked articles from the current list, in fetched order.
    /// Backs the logged-in view of the account panel.
    pub fn bookmarked_articles(&self) -> Vec<&Article> {
        self.articles
            .iter()
            .filter(|a| self.bookmarks.contains(a.id))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn article(id: ArticleId, category: Option<&str>, image: Option<&str>) -> Article {
        Article {
            id,
            title: format!("Article {}", id),
            url: Some(format!("https://example.com/{}", id)),
            image_url: image.map(String::from),
            category: category.map(String::from),
            published_at: Some(1_722_902_400_000),
        }
    }

    fn default_panel() -> NewsPanel {
        NewsPanel::new(DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect())
    }

    // ------------------------------------------------------------------
    // Grouping
    // ------------------------------------------------------------------

    #[test]
    fn test_group_missing_category_is_uncategorized() {
        let articles = vec![
            article(1, Some("business"), Some("x")),
            article(2, None, Some("y")),
        ];
        let grouped = group_by_category(&articles);

        let names: Vec<&str> = grouped.names().collect();
        assert_eq!(names, vec!["business", UNCATEGORIZED]);
        assert_eq!(grouped.bucket("business").unwrap().articles.len(), 1);
        assert_eq!(grouped.bucket(UNCATEGORIZED).unwrap().articles.len(), 1);
    }

    #[test]
    fn test_group_empty_category_is_uncategorized() {
        let articles = vec![article(1, Some(""), None)];
        let grouped = group_by_category(&articles);
        assert!(grouped.bucket(UNCATEGORIZED).is_some());
    }

    #[test]
    fn test_group_preserves_order_within_bucket() {
        let articles = vec![
            article(1, Some("science"), None),
            article(2, Some("sports"), None),
            article(3, Some("science"), None),
            article(4, Some("science"), None),
        ];
        let grouped = group_by_category(&articles);
        let ids: Vec<ArticleId> = grouped
            .bucket("science")
            .unwrap()
            .articles
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_group_empty_list() {
        let grouped = group_by_category(&[]);
        assert_eq!(grouped.buckets().len(), 0);
        assert_eq!(grouped.total_articles(), 0);
    }

    proptest! {
        /// Every article lands in exactly one bucket, and each bucket is
        /// exactly the input filtered to that category, in input order.
        #[test]
        fn prop_grouping_partitions_input(
            spec in prop::collection::vec((0i64..1000, prop::option::of(0usize..4)), 0..50)
        ) {
            let pool = ["business", "science", "sports", ""];
            let articles: Vec<Article> = spec
                .into_iter()
                .enumerate()
                .map(|(i, (id, cat))| article(id + i as i64 * 1000, cat.map(|c| pool[c]), None))
                .collect();

            let grouped = group_by_category(&articles);
            prop_assert_eq!(grouped.total_articles(), articles.len());

            for bucket in grouped.buckets() {
                let expected: Vec<&Article> = articles
                    .iter()
                    .filter(|a| {
                        a.category.as_deref().filter(|c| !c.is_empty()).unwrap_or(UNCATEGORIZED)
                            == bucket.name
                    })
                    .collect();
                let actual: Vec<&Article> = bucket.articles.iter().collect();
                prop_assert_eq!(actual, expected);
            }
        }
    }

    // ------------------------------------------------------------------
    // Fetch lifecycle and the sequence guard
    // ------------------------------------------------------------------

    #[test]
    fn test_apply_fetch_success_replaces_and_groups() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        assert!(panel.in_flight);

        let applied = panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, Some("business"), Some("x")),
                article(2, None, Some("y")),
            ]),
        );

        assert!(applied);
        assert!(!panel.in_flight);
        assert_eq!(panel.articles.len(), 2);
        assert!(panel.grouped.bucket("business").is_some());
        assert!(panel.grouped.bucket(UNCATEGORIZED).is_some());
        assert!(panel.error.is_none());
    }

    #[test]
    fn test_apply_fetch_failure_keeps_previous_data() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(seq, Ok(vec![article(1, Some("business"), Some("x"))]));

        let seq = panel.begin_fetch();
        panel.apply_fetch(seq, Err(ApiError::HttpStatus(500)));

        assert_eq!(panel.articles.len(), 1);
        assert!(panel.grouped.bucket("business").is_some());
        assert_eq!(panel.error.as_deref(), Some(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_success_clears_error() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(seq, Err(ApiError::Timeout));
        assert!(panel.error.is_some());

        let seq = panel.begin_fetch();
        panel.apply_fetch(seq, Ok(vec![]));
        assert!(panel.error.is_none());
    }

    #[test]
    fn test_stale_fetch_discarded() {
        let mut panel = default_panel();
        let first = panel.begin_fetch();
        let second = panel.begin_fetch();

        // The second (latest) fetch resolves first.
        assert!(panel.apply_fetch(second, Ok(vec![article(2, Some("science"), Some("y"))])));

        // The first resolves late with different data; it must be dropped.
        let applied = panel.apply_fetch(first, Ok(vec![article(1, Some("business"), Some("x"))]));
        assert!(!applied);
        assert_eq!(panel.articles.len(), 1);
        assert_eq!(panel.articles[0].id, 2);
    }

    #[test]
    fn test_stale_failure_does_not_clear_in_flight() {
        let mut panel = default_panel();
        let first = panel.begin_fetch();
        let second = panel.begin_fetch();

        assert!(!panel.apply_fetch(first, Err(ApiError::Timeout)));
        assert!(panel.in_flight, "latest fetch is still outstanding");
        assert!(panel.error.is_none(), "stale failure must not surface");

        assert!(panel.apply_fetch(second, Ok(vec![])));
        assert!(!panel.in_flight);
    }

    // ------------------------------------------------------------------
    // Tabs, visibility, selection
    // ------------------------------------------------------------------

    #[test]
    fn test_tabs_are_canonical_plus_extras() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, None, Some("x")),
                article(2, Some("weather"), Some("y")),
                article(3, Some("business"), Some("z")),
            ]),
        );

        let tabs = panel.tabs();
        assert_eq!(&tabs[..7], DEFAULT_CATEGORIES);
        assert_eq!(&tabs[7..], &[UNCATEGORIZED, "weather"]);
    }

    #[test]
    fn test_select_tab_is_local_and_resets_cursor() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, Some("business"), Some("a")),
                article(2, Some("science"), Some("b")),
                article(3, Some("science"), Some("c")),
            ]),
        );

        panel.selected_article = 1;
        panel.select_tab(4); // science
        assert_eq!(panel.current_tab(), Some("science"));
        assert_eq!(panel.selected_article, 0);
        assert_eq!(panel.visible_articles().len(), 2);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut panel = default_panel();
        assert_eq!(panel.selected_tab, 0);
        panel.prev_tab();
        assert_eq!(panel.selected_tab, DEFAULT_CATEGORIES.len() - 1);
        panel.next_tab();
        assert_eq!(panel.selected_tab, 0);
    }

    #[test]
    fn test_imageless_articles_hidden_but_kept() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, Some("business"), Some("img")),
                article(2, Some("business"), None),
                article(3, Some("business"), Some("")),
            ]),
        );
        panel.select_tab(0);

        // All three occupy the bucket; only the one with an image renders.
        assert_eq!(panel.current_bucket().unwrap().articles.len(), 3);
        let visible = panel.visible_articles();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn test_nav_clamps_to_visible_range() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, Some("business"), Some("a")),
                article(2, Some("business"), Some("b")),
            ]),
        );
        panel.select_tab(0);

        panel.nav_up();
        assert_eq!(panel.selected_article, 0);
        panel.nav_down();
        panel.nav_down();
        panel.nav_down();
        assert_eq!(panel.selected_article, 1);
    }

    #[test]
    fn test_refetch_clamps_stale_cursor() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, Some("business"), Some("a")),
                article(2, Some("business"), Some("b")),
                article(3, Some("business"), Some("c")),
            ]),
        );
        panel.select_tab(0);
        panel.selected_article = 2;

        let seq = panel.begin_fetch();
        panel.apply_fetch(seq, Ok(vec![article(9, Some("business"), Some("z"))]));
        assert_eq!(panel.selected_article, 0);
    }

    // ------------------------------------------------------------------
    // Bookmarks
    // ------------------------------------------------------------------

    #[test]
    fn test_bookmark_insert_is_idempotent() {
        let mut set = BookmarkSet::default();
        assert!(set.insert(42));
        assert!(!set.insert(42));
        assert_eq!(set.len(), 1);
        assert!(set.contains(42));
    }

    #[test]
    fn test_bookmarked_articles_in_fetched_order() {
        let mut panel = default_panel();
        let seq = panel.begin_fetch();
        panel.apply_fetch(
            seq,
            Ok(vec![
                article(1, Some("business"), Some("a")),
                article(2, Some("science"), Some("b")),
                article(3, Some("sports"), Some("c")),
            ]),
        );

        panel.mark_bookmarked(3);
        panel.mark_bookmarked(1);
        panel.mark_bookmarked(1);

        let ids: Vec<ArticleId> = panel.bookmarked_articles().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(panel.bookmarks.len(), 2);
    }
}
