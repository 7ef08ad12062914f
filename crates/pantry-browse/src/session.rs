//! State container for one catalog page
//!
//! A `CatalogSession` owns everything one page needs: the loaded items, the
//! memoized search index, the filter, and the reveal controller. It is the
//! only writer of that state. Fetching is split into a synchronous begin step
//! that hands out a [`PageTicket`] and an apply step that takes the result,
//! so a driver can run the request wherever it likes and late results can be
//! recognized by their epoch. Tickets also carry the filter generation, so a
//! growth step that outlives a filter change does not widen the new results.

use pantry_client::{ClientError, PageFetcher};
use pantry_core::{CatalogFields, CoreError, ItemId, PageRequest, PageResult};
use pantry_search::{categories, resolve_positions, suggestion_positions, FilterState, IndexCache};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::collection::ItemCollection;
use crate::config::BrowseConfig;
use crate::error::Result;
use crate::reveal::{GrowthStep, GrowthTrigger, RevealController, RevealPhase, RevealState};
use crate::view::{CatalogView, ViewStatus};

/// A page request tagged with the session epoch it was issued in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub epoch: u64,
    /// Filter generation when the request was issued
    pub generation: u64,
    pub request: PageRequest,
}

/// Identifies a reveal step for [`CatalogSession::complete_reveal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    pub epoch: u64,
    pub generation: u64,
}

pub struct CatalogSession<T> {
    config: BrowseConfig,
    collection: ItemCollection<T>,
    index: IndexCache,
    filter: FilterState,
    /// Query as typed, ahead of the debounced commit
    draft: String,
    reveal: RevealController,
    /// Collection positions passing the filter, in result order
    filtered: Vec<usize>,
    suggested: Vec<usize>,
    /// Why the first page could not be loaded
    failure: Option<String>,
    notice: Option<String>,
    /// Bumped on every reload; fetches from older epochs are stale
    epoch: u64,
    /// Bumped on every query, category or suggestion change
    generation: u64,
}

impl<T: CatalogFields + Clone> CatalogSession<T> {
    pub fn new(config: BrowseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            index: IndexCache::new(config.index),
            reveal: RevealController::new(config.page_size),
            config,
            collection: ItemCollection::new(),
            filter: FilterState::new(),
            draft: String::new(),
            filtered: Vec::new(),
            suggested: Vec::new(),
            failure: None,
            notice: None,
            epoch: 0,
            generation: 0,
        })
    }

    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn items(&self) -> &[T] {
        self.collection.items()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// How many times the search index has been built
    pub fn index_rebuilds(&self) -> u64 {
        self.index.rebuilds()
    }

    pub fn state(&self) -> RevealState {
        self.reveal.state(self.filtered.len())
    }

    pub fn phase(&self) -> RevealPhase {
        self.reveal.phase(self.filtered.len())
    }

    /// Where the next growth fetch would start
    pub fn next_request(&self) -> PageRequest {
        self.reveal.next_request()
    }

    pub fn status(&self) -> ViewStatus {
        if let Some(message) = &self.failure {
            return ViewStatus::Failed {
                message: message.clone(),
            };
        }
        if !self.reveal.has_loaded() {
            return if self.reveal.is_loading() {
                ViewStatus::Loading
            } else {
                ViewStatus::NotLoaded
            };
        }
        if self.filtered.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        }
    }

    /// Discard everything loaded and start over at page 0
    pub fn begin_load(&mut self) -> PageTicket {
        self.epoch += 1;
        self.collection.clear();
        self.failure = None;
        self.notice = None;
        self.filtered.clear();
        self.suggested.clear();
        let request = self.reveal.restart(self.config.page_size);
        debug!(
            "Loading page {} ({} per page), epoch {}",
            request.page_index, request.page_size, self.epoch
        );
        self.ticket(request)
    }

    /// Switch to a new page size, which reloads from page 0
    pub fn set_page_size(&mut self, page_size: u32) -> Result<PageTicket> {
        if page_size == 0 {
            return Err(CoreError::InvalidPageSize(page_size).into());
        }
        info!("Page size {} -> {}", self.config.page_size, page_size);
        self.config.page_size = page_size;
        Ok(self.begin_load())
    }

    /// Update the query as typed; only suggestions follow it
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<()> {
        self.draft = text.into();
        self.refresh()
    }

    /// Apply a query to the results
    pub fn set_query(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.draft = text.clone();
        self.filter.set_query(text);
        self.refilter()
    }

    /// Apply a category; `None` or an empty name keeps every category
    pub fn set_category(&mut self, category: Option<String>) -> Result<()> {
        self.filter.set_category(category);
        self.refilter()
    }

    /// Collapse results to a suggested item
    ///
    /// Returns false when the id is not among the loaded items.
    pub fn select_suggestion(&mut self, id: &ItemId) -> Result<bool> {
        let Some(item) = self.collection.get(id) else {
            warn!("Selected suggestion {} is not loaded", id);
            return Ok(false);
        };
        self.filter.select_suggestion(item);
        self.draft = self.filter.query_text.clone();
        self.refilter()?;
        Ok(true)
    }

    /// Handle a growth trigger
    ///
    /// `Reveal` must be followed by [`complete_reveal`](Self::complete_reveal)
    /// and `Fetch` by [`apply_page`](Self::apply_page) with a ticket from
    /// [`ticket`](Self::ticket).
    pub fn begin_growth(&mut self, trigger: GrowthTrigger) -> GrowthStep {
        let step = self.reveal.trigger(self.filtered.len());
        match step {
            GrowthStep::Ignored => debug!("{:?} ignored", trigger),
            GrowthStep::Reveal => debug!("{:?}: revealing loaded items", trigger),
            GrowthStep::Fetch(request) => {
                debug!("{:?}: fetching page {}", trigger, request.page_index);
                if !self.reveal.has_loaded() {
                    self.failure = None;
                }
            }
        }
        step
    }

    /// Tag a request with the current epoch and filter generation
    pub fn ticket(&self, request: PageRequest) -> PageTicket {
        PageTicket {
            epoch: self.epoch,
            generation: self.generation,
            request,
        }
    }

    /// Tag a reveal step with the current epoch and filter generation
    pub fn reveal_ticket(&self) -> RevealTicket {
        RevealTicket {
            epoch: self.epoch,
            generation: self.generation,
        }
    }

    /// Finish a reveal step
    ///
    /// A step from an older epoch is dropped. A step that outlived a filter
    /// change releases the loading gate but leaves the window at its baseline.
    pub fn complete_reveal(&mut self, ticket: RevealTicket) {
        if ticket.epoch != self.epoch {
            debug!("Dropping reveal from epoch {}", ticket.epoch);
            return;
        }
        if ticket.generation != self.generation {
            debug!("Filter changed during reveal, keeping the baseline");
            self.reveal.abandon();
        } else {
            self.reveal.finish_reveal(self.filtered.len());
        }
        self.notice = None;
    }

    /// Merge a fetched page
    ///
    /// A page from an older epoch still lands in the collection, but its
    /// pagination is ignored and it does not release the loading gate. A page
    /// requested under an older filter advances pagination without growing
    /// the revealed window. A failure is recorded on the session and also
    /// returned.
    pub fn apply_page(
        &mut self,
        ticket: PageTicket,
        result: std::result::Result<PageResult<T>, ClientError>,
    ) -> Result<()> {
        if ticket.epoch != self.epoch {
            return self.apply_stale(ticket, result);
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.reveal.fail();
                if self.reveal.has_loaded() {
                    warn!("Growth fetch of page {} failed: {}", ticket.request.page_index, e);
                    self.notice = Some(e.to_string());
                } else {
                    warn!("Initial fetch failed: {}", e);
                    self.failure = Some(e.to_string());
                }
                return Err(e.into());
            }
        };

        let appended = self.collection.merge(page.items);
        let refreshed = self.refresh();
        let (index, filtered_len) = (ticket.request.page_index, self.filtered.len());
        if ticket.generation == self.generation {
            self.reveal.finish_page(index, page.total_pages, filtered_len);
        } else {
            debug!("Filter changed while page {} was in flight", index);
            self.reveal.settle_page(index, page.total_pages, filtered_len);
        }
        self.notice = None;
        refreshed?;

        debug!(
            "Page {} merged {} new items ({} loaded, {} pages)",
            ticket.request.page_index,
            appended,
            self.collection.len(),
            page.total_pages
        );
        Ok(())
    }

    fn apply_stale(
        &mut self,
        ticket: PageTicket,
        result: std::result::Result<PageResult<T>, ClientError>,
    ) -> Result<()> {
        match result {
            Ok(page) => {
                let appended = self.collection.merge(page.items);
                debug!(
                    "Stale page {} from epoch {} merged {} items",
                    ticket.request.page_index, ticket.epoch, appended
                );
                if appended > 0 {
                    self.refresh()?;
                }
            }
            Err(e) => debug!("Stale fetch from epoch {} failed: {}", ticket.epoch, e),
        }
        Ok(())
    }

    /// Snapshot for rendering
    pub fn view(&self) -> CatalogView<T> {
        let items = self.collection.items();
        let revealed = self.reveal.revealed(self.filtered.len());

        CatalogView {
            items: self.filtered[..revealed].iter().map(|&p| items[p].clone()).collect(),
            suggestions: self.suggested.iter().map(|&p| items[p].clone()).collect(),
            categories: categories(items),
            filter: self.filter.clone(),
            reveal: self.state(),
            phase: self.phase(),
            total_filtered: self.filtered.len(),
            total_loaded: items.len(),
            status: self.status(),
            notice: self.notice.clone(),
        }
    }

    /// Load the first page through `fetcher`
    pub async fn load<F>(&mut self, fetcher: &F) -> Result<()>
    where
        F: PageFetcher<Item = T> + ?Sized,
    {
        let ticket = self.begin_load();
        let result = fetcher.fetch_page(ticket.request).await;
        self.apply_page(ticket, result)
    }

    /// Run one growth step to completion
    pub async fn grow<F>(&mut self, fetcher: &F, trigger: GrowthTrigger) -> Result<GrowthStep>
    where
        F: PageFetcher<Item = T> + ?Sized,
    {
        let step = self.begin_growth(trigger);
        match step {
            GrowthStep::Ignored => {}
            GrowthStep::Reveal => {
                let ticket = self.reveal_ticket();
                sleep(self.config.reveal_delay).await;
                self.complete_reveal(ticket);
            }
            GrowthStep::Fetch(request) => {
                let ticket = self.ticket(request);
                let result = fetcher.fetch_page(request).await;
                self.apply_page(ticket, result)?;
            }
        }
        Ok(step)
    }

    /// Recompute filter results and reset the reveal window
    fn refilter(&mut self) -> Result<()> {
        self.generation += 1;
        self.notice = None;
        self.refresh()?;
        self.reveal.rebaseline(self.filtered.len());
        Ok(())
    }

    /// Recompute derived positions from the collection, filter and draft
    fn refresh(&mut self) -> Result<()> {
        let items = self.collection.items();
        let index = self.index.get(self.collection.version(), items);

        self.filtered = resolve_positions(items, index, &self.filter)?;
        self.suggested = if self.filter.pinned.is_some() {
            Vec::new()
        } else {
            suggestion_positions(items, index, &self.draft, self.config.suggestion_limit)?
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use pantry_client::MemoryFetcher;
    use pantry_core::CatalogItem;

    use crate::error::BrowseError;

    fn numbered(n: usize) -> Vec<CatalogItem> {
        (1..=n)
            .map(|i| CatalogItem::new(i.to_string(), format!("Item {}", i)))
            .collect()
    }

    fn menu() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("1", "Chicken Wrap").with_category("Wraps"),
            CatalogItem::new("2", "Iced Tea").with_category("Drinks"),
            CatalogItem::new("3", "Chai Latte").with_category("Drinks"),
            CatalogItem::new("4", "Chicken Soup").with_category("Soups"),
            CatalogItem::new("5", "Lemonade").with_category("Drinks"),
            CatalogItem::new("6", "Chocolate Shake").with_category("Drinks"),
        ]
    }

    fn session(page_size: u32) -> CatalogSession<CatalogItem> {
        let config = BrowseConfig::default()
            .with_page_size(page_size)
            .with_reveal_delay(Duration::ZERO);
        CatalogSession::new(config).unwrap()
    }

    fn names(view: &CatalogView<CatalogItem>) -> Vec<&str> {
        view.items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = BrowseConfig::default().with_page_size(0);
        assert!(CatalogSession::<CatalogItem>::new(config).is_err());

        let mut session = session(6);
        assert!(matches!(
            session.set_page_size(0),
            Err(BrowseError::Core(CoreError::InvalidPageSize(0)))
        ));
    }

    #[test]
    fn test_status_before_and_during_load() {
        let mut session = session(6);
        assert_eq!(session.status(), ViewStatus::NotLoaded);
        session.begin_load();
        assert_eq!(session.status(), ViewStatus::Loading);
    }

    #[test]
    fn test_single_page_of_nine() {
        let mut session = session(6);
        let ticket = session.begin_load();
        let page = PageResult::with_totals(numbered(9), Some(9), Some(1), 6);
        session.apply_page(ticket, Ok(page)).unwrap();

        let view = session.view();
        assert_eq!(view.items.len(), 6);
        assert_eq!(view.total_filtered, 9);
        assert_eq!(view.status, ViewStatus::Ready);
        assert_eq!(view.phase, RevealPhase::Idle);

        assert_eq!(session.begin_growth(GrowthTrigger::SentinelVisible), GrowthStep::Reveal);
        assert!(session.view().show_spinner());
        session.complete_reveal(session.reveal_ticket());

        assert_eq!(session.view().items.len(), 9);
        assert_eq!(session.phase(), RevealPhase::Exhausted);
        assert_eq!(session.begin_growth(GrowthTrigger::LoadMore), GrowthStep::Ignored);
    }

    #[tokio::test]
    async fn test_growth_fetches_next_page() {
        let fetcher = MemoryFetcher::new(numbered(9));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();
        assert_eq!(session.view().items.len(), 6);

        let step = session.grow(&fetcher, GrowthTrigger::SentinelVisible).await.unwrap();
        assert_eq!(step, GrowthStep::Fetch(PageRequest::new(1, 6).unwrap()));

        let view = session.view();
        assert_eq!(view.items.len(), 9);
        assert_eq!(view.phase, RevealPhase::Exhausted);
        assert_eq!(
            fetcher.requests(),
            vec![PageRequest::new(0, 6).unwrap(), PageRequest::new(1, 6).unwrap()]
        );
    }

    #[test]
    fn test_trigger_while_loading_is_noop() {
        let mut session = session(6);
        let ticket = session.begin_load();
        session
            .apply_page(ticket, Ok(PageResult::with_totals(numbered(6), Some(18), None, 6)))
            .unwrap();

        assert!(matches!(session.begin_growth(GrowthTrigger::SentinelVisible), GrowthStep::Fetch(_)));
        let before = session.state();
        assert_eq!(session.begin_growth(GrowthTrigger::SentinelVisible), GrowthStep::Ignored);
        assert_eq!(session.begin_growth(GrowthTrigger::LoadMore), GrowthStep::Ignored);
        assert_eq!(session.state(), before);
    }

    #[tokio::test]
    async fn test_abbreviated_query_finds_item() {
        let fetcher = MemoryFetcher::new(menu());
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        session.set_draft("chk").unwrap();
        let view = session.view();
        assert!(view.suggestions.iter().any(|i| i.name == "Chicken Wrap"));
        // typing alone leaves the results alone
        assert_eq!(view.items.len(), 6);

        session.set_query("chk").unwrap();
        assert!(names(&session.view()).contains(&"Chicken Wrap"));
    }

    #[tokio::test]
    async fn test_query_and_category_combine() {
        let fetcher = MemoryFetcher::new(menu());
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        session.set_query("ch").unwrap();
        session.set_category(Some("Drinks".to_string())).unwrap();

        let view = session.view();
        assert!(!view.items.is_empty());
        for item in &view.items {
            assert_eq!(item.category.as_deref(), Some("Drinks"));
        }
        assert!(!names(&view).contains(&"Chicken Wrap"));
        assert_eq!(view.categories, vec!["Wraps", "Drinks", "Soups"]);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_failure() {
        let fetcher = MemoryFetcher::new(menu());
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        session.set_query("qqqqqq").unwrap();
        let view = session.view();
        assert!(view.is_empty());
        assert!(!view.is_failed());
        assert_eq!(view.phase, RevealPhase::Exhausted);
    }

    #[tokio::test]
    async fn test_select_suggestion_collapses_results() {
        let fetcher = MemoryFetcher::new(menu());
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        session.set_draft("chicken").unwrap();
        assert!(session.select_suggestion(&ItemId::new("4")).unwrap());

        let view = session.view();
        assert_eq!(names(&view), vec!["Chicken Soup"]);
        assert!(view.suggestions.is_empty());
        assert_eq!(session.draft(), "Chicken Soup");

        assert!(!session.select_suggestion(&ItemId::new("99")).unwrap());
    }

    #[tokio::test]
    async fn test_filter_change_rebaselines_reveal() {
        let fetcher = MemoryFetcher::new(numbered(24));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();
        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();
        assert_eq!(session.state().revealed_count, 12);

        session.set_query("item 1").unwrap();
        let filtered = session.view().total_filtered;
        assert_eq!(session.state().revealed_count, filtered.min(6));

        session.set_query("").unwrap();
        assert_eq!(session.state().revealed_count, 6);
        assert_eq!(session.phase(), RevealPhase::Idle);
    }

    #[tokio::test]
    async fn test_revealed_count_is_monotonic() {
        let fetcher = MemoryFetcher::new(numbered(20));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        let mut last = session.state().revealed_count;
        while session.phase() != RevealPhase::Exhausted {
            session.grow(&fetcher, GrowthTrigger::SentinelVisible).await.unwrap();
            let now = session.state().revealed_count;
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 20);
    }

    #[tokio::test]
    async fn test_page_size_change_restarts_pagination() {
        let fetcher = MemoryFetcher::new(numbered(30));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();
        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();
        assert_eq!(session.items().len(), 12);

        let ticket = session.set_page_size(24).unwrap();
        assert_eq!(ticket.request, PageRequest::new(0, 24).unwrap());
        assert!(session.items().is_empty());

        let result = fetcher.fetch_page(ticket.request).await;
        session.apply_page(ticket, result).unwrap();

        assert_eq!(session.state().revealed_count, 24);
        assert_eq!(session.next_request(), PageRequest::new(1, 24).unwrap());
    }

    #[tokio::test]
    async fn test_growth_failure_keeps_items() {
        let fetcher = MemoryFetcher::new(numbered(18));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        fetcher.fail_next(1);
        let err = session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap_err();
        assert!(matches!(err, BrowseError::Client(ClientError::Network { .. })));

        let view = session.view();
        assert_eq!(view.items.len(), 6);
        assert_eq!(view.phase, RevealPhase::Idle);
        assert_eq!(view.status, ViewStatus::Ready);
        assert!(view.notice.is_some());

        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();
        let view = session.view();
        assert_eq!(view.items.len(), 12);
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn test_initial_failure_then_retry() {
        let fetcher = MemoryFetcher::new(numbered(6));
        let mut session = session(6);

        fetcher.fail_next(1);
        assert!(session.load(&fetcher).await.is_err());
        let view = session.view();
        assert!(view.is_failed());
        assert!(!view.is_empty());

        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();
        assert_eq!(session.status(), ViewStatus::Ready);
        assert_eq!(session.view().items.len(), 6);
    }

    #[tokio::test]
    async fn test_stale_page_is_merged_without_pagination() {
        let fetcher = MemoryFetcher::new(numbered(30));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();
        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();

        // page 2 at the old size is still in flight when the size changes
        let GrowthStep::Fetch(request) = session.begin_growth(GrowthTrigger::LoadMore) else {
            panic!("expected a fetch");
        };
        let stale = session.ticket(request);

        let fresh = session.set_page_size(12).unwrap();
        let result = fetcher.fetch_page(fresh.request).await;
        session.apply_page(fresh, result).unwrap();
        assert_eq!(session.items().len(), 12);

        let result = fetcher.fetch_page(stale.request).await;
        session.apply_page(stale, result).unwrap();

        // items 13-18 land, pagination still follows the new size
        assert_eq!(session.items().len(), 18);
        assert_eq!(session.next_request(), PageRequest::new(1, 12).unwrap());
        assert!(!session.state().is_loading_more);
        assert_eq!(session.state().revealed_count, 12);
    }

    #[tokio::test]
    async fn test_stale_failure_is_ignored() {
        let fetcher = MemoryFetcher::new(numbered(12));
        let mut session = session(6);
        let stale = session.begin_load();
        let fresh = session.begin_load();

        session
            .apply_page(stale, Err(ClientError::network("connection reset")))
            .unwrap();
        assert_eq!(session.status(), ViewStatus::Loading);

        let result = fetcher.fetch_page(fresh.request).await;
        session.apply_page(fresh, result).unwrap();
        assert_eq!(session.status(), ViewStatus::Ready);
    }

    #[tokio::test]
    async fn test_query_during_fetch_keeps_new_baseline() {
        let fetcher = MemoryFetcher::new(numbered(30));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        let GrowthStep::Fetch(request) = session.begin_growth(GrowthTrigger::SentinelVisible) else {
            panic!("expected a fetch");
        };
        let ticket = session.ticket(request);
        session.set_query("item").unwrap();
        assert_eq!(session.state().revealed_count, 6);

        let result = fetcher.fetch_page(ticket.request).await;
        session.apply_page(ticket, result).unwrap();

        // the page lands and pagination moves on, the window does not grow
        assert_eq!(session.items().len(), 12);
        assert_eq!(session.view().total_filtered, 12);
        assert_eq!(session.state().revealed_count, 6);
        assert!(!session.state().is_loading_more);
        assert_eq!(session.next_request(), PageRequest::new(2, 6).unwrap());

        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();
        assert_eq!(session.state().revealed_count, 12);
    }

    #[tokio::test]
    async fn test_query_before_first_page() {
        let fetcher = MemoryFetcher::new(numbered(30));
        let mut session = session(6);
        let ticket = session.begin_load();
        session.set_query("item 2").unwrap();

        let result = fetcher.fetch_page(ticket.request).await;
        session.apply_page(ticket, result).unwrap();

        let view = session.view();
        assert_eq!(view.status, ViewStatus::Ready);
        assert_eq!(view.items.len(), view.total_filtered.min(6));
        assert_eq!(names(&view)[0], "Item 2");
    }

    #[test]
    fn test_query_during_reveal_keeps_new_baseline() {
        let mut session = session(6);
        let ticket = session.begin_load();
        let page = PageResult::with_totals(numbered(9), Some(9), Some(1), 6);
        session.apply_page(ticket, Ok(page)).unwrap();

        assert_eq!(session.begin_growth(GrowthTrigger::SentinelVisible), GrowthStep::Reveal);
        let reveal = session.reveal_ticket();
        session.set_query("item").unwrap();
        session.complete_reveal(reveal);

        assert_eq!(session.view().total_filtered, 9);
        assert_eq!(session.state().revealed_count, 6);
        assert_eq!(session.phase(), RevealPhase::Idle);
    }

    #[tokio::test]
    async fn test_filter_change_clears_notice() {
        let fetcher = MemoryFetcher::new(numbered(18));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();

        fetcher.fail_next(1);
        assert!(session.grow(&fetcher, GrowthTrigger::LoadMore).await.is_err());
        assert!(session.view().notice.is_some());

        session.set_category(Some("Drinks".to_string())).unwrap();
        assert!(session.view().notice.is_none());
    }

    #[tokio::test]
    async fn test_index_rebuilt_only_when_items_change() {
        let fetcher = MemoryFetcher::new(numbered(12));
        let mut session = session(6);
        session.load(&fetcher).await.unwrap();
        let after_load = session.index_rebuilds();

        for query in ["i", "it", "ite", "item", "item 1"] {
            session.set_draft(query).unwrap();
            session.set_query(query).unwrap();
        }
        assert_eq!(session.index_rebuilds(), after_load);

        session.set_query("").unwrap();
        session.grow(&fetcher, GrowthTrigger::LoadMore).await.unwrap();
        assert_eq!(session.index_rebuilds(), after_load + 1);
    }
}
