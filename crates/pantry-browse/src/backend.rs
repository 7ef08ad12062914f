//! Background thread driving a catalog session
//!
//! A UI toolkit usually owns the main thread and its own event loop. We:
//! 1. Spawn a background thread with a single-threaded tokio runtime
//! 2. Take commands from the UI over a channel and apply them to the session
//! 3. Run fetches and reveal delays as tasks, so triggers arriving meanwhile
//!    hit the loading gate instead of queueing
//! 4. Push a fresh view back and signal the UI to redraw

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use pantry_client::{ClientError, PageFetcher};
use pantry_core::{CatalogFields, ItemId, PageResult};
use tokio::runtime::Builder;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::config::BrowseConfig;
use crate::debounce::Debouncer;
use crate::error::{BrowseError, Result};
use crate::reveal::{GrowthStep, GrowthTrigger};
use crate::session::{CatalogSession, PageTicket, RevealTicket};
use crate::view::CatalogView;

const EVENT_CAPACITY: usize = 100;

/// Commands sent from UI to the browse loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// (Re)load from page 0
    Load,

    /// The search box changed; applied after the debounce period
    SetQuery(String),

    /// Apply the typed query now (e.g. on Enter)
    CommitQuery,

    SetCategory(Option<String>),
    SelectSuggestion(ItemId),
    LoadMore,
    SentinelVisible,
    SetPageSize(u32),
}

/// Events sent from the browse loop to UI
#[derive(Debug, Clone)]
pub enum BrowseEvent<T> {
    ViewUpdated(CatalogView<T>),
    Error { message: String },
}

/// Completions of work spawned by the loop
enum Completion<T> {
    Page {
        ticket: PageTicket,
        result: std::result::Result<PageResult<T>, ClientError>,
    },
    Revealed {
        ticket: RevealTicket,
    },
}

/// Handle to communicate with the browse loop
///
/// Dropping the handle stops the loop and joins its thread.
pub struct BrowseHandle<T> {
    cmd_tx: Option<UnboundedSender<BrowseCommand>>,
    event_rx: Receiver<BrowseEvent<T>>,
    thread: Option<JoinHandle<()>>,
}

impl<T> BrowseHandle<T>
where
    T: CatalogFields + Clone + Send + Sync + 'static,
{
    /// Spawn the browse thread and return a handle
    pub fn spawn<F>(fetcher: F, config: BrowseConfig, signal_ui: impl Fn() + Send + 'static) -> Result<Self>
    where
        F: PageFetcher<Item = T> + 'static,
    {
        let session = CatalogSession::new(config)?;
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = bounded(EVENT_CAPACITY);
        let fetcher = Arc::new(fetcher);

        let thread = thread::Builder::new()
            .name("pantry-browse".to_string())
            .spawn(move || {
                runtime.block_on(browse_loop(session, fetcher, cmd_rx, event_tx, signal_ui));
                debug!("Browse loop stopped");
            })?;

        Ok(Self {
            cmd_tx: Some(cmd_tx),
            event_rx,
            thread: Some(thread),
        })
    }
}

impl<T> BrowseHandle<T> {
    /// Send a command to the browse loop (non-blocking)
    pub fn send(&self, cmd: BrowseCommand) -> Result<()> {
        self.cmd_tx
            .as_ref()
            .ok_or(BrowseError::Disconnected)?
            .send(cmd)
            .map_err(|_| BrowseError::Disconnected)
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv(&self) -> Option<BrowseEvent<T>> {
        self.event_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<BrowseEvent<T>>> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(BrowseError::Disconnected),
        }
    }

    /// The raw event receiver, for use with `crossbeam_channel::select!`
    pub fn events(&self) -> &Receiver<BrowseEvent<T>> {
        &self.event_rx
    }
}

impl<T> Drop for BrowseHandle<T> {
    fn drop(&mut self) {
        self.cmd_tx.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Browse thread panicked");
            }
        }
    }
}

struct BrowseLoop<T, F> {
    session: CatalogSession<T>,
    fetcher: Arc<F>,
    debouncer: Debouncer<String>,
    done_tx: UnboundedSender<Completion<T>>,
    event_tx: Sender<BrowseEvent<T>>,
}

async fn browse_loop<T, F>(
    session: CatalogSession<T>,
    fetcher: Arc<F>,
    mut cmd_rx: UnboundedReceiver<BrowseCommand>,
    event_tx: Sender<BrowseEvent<T>>,
    signal_ui: impl Fn(),
) where
    T: CatalogFields + Clone + Send + Sync + 'static,
    F: PageFetcher<Item = T> + 'static,
{
    let (debouncer, mut debounced_rx) = Debouncer::new(session.config().debounce);
    let (done_tx, mut done_rx) = unbounded_channel();
    let mut state = BrowseLoop {
        session,
        fetcher,
        debouncer,
        done_tx,
        event_tx,
    };

    info!("Browse loop started");

    loop {
        let changed = tokio::select! {
            cmd = cmd_rx.recv() => {
                // Channel closed, exit
                let Some(cmd) = cmd else { break };
                state.process_command(cmd)
            }
            Some(delivered) = debounced_rx.recv() => {
                match state.debouncer.accept(delivered) {
                    Some(query) => state.commit_query(query),
                    None => false,
                }
            }
            Some(done) = done_rx.recv() => state.complete(done),
        };

        if changed {
            state.emit(BrowseEvent::ViewUpdated(state.session.view()));
            signal_ui();
        }
    }
}

impl<T, F> BrowseLoop<T, F>
where
    T: CatalogFields + Clone + Send + Sync + 'static,
    F: PageFetcher<Item = T> + 'static,
{
    /// Apply a command; returns whether the view changed
    fn process_command(&mut self, cmd: BrowseCommand) -> bool {
        debug!("Browse command {:?}", cmd);
        match cmd {
            BrowseCommand::Load => {
                let ticket = self.session.begin_load();
                self.spawn_fetch(ticket);
                true
            }

            BrowseCommand::SetQuery(text) => {
                self.debouncer.schedule(text.clone());
                let result = self.session.set_draft(text);
                self.report(result)
            }

            BrowseCommand::CommitQuery => {
                self.debouncer.cancel();
                let draft = self.session.draft().to_string();
                self.commit_query(draft)
            }

            BrowseCommand::SetCategory(category) => {
                let result = self.session.set_category(category);
                self.report(result)
            }

            BrowseCommand::SelectSuggestion(id) => {
                self.debouncer.cancel();
                let result = self.session.select_suggestion(&id).map(|_| ());
                self.report(result)
            }

            BrowseCommand::LoadMore => self.grow(GrowthTrigger::LoadMore),
            BrowseCommand::SentinelVisible => self.grow(GrowthTrigger::SentinelVisible),

            BrowseCommand::SetPageSize(page_size) => match self.session.set_page_size(page_size) {
                Ok(ticket) => {
                    self.spawn_fetch(ticket);
                    true
                }
                Err(e) => self.report(Err(e)),
            },
        }
    }

    fn commit_query(&mut self, query: String) -> bool {
        let result = self.session.set_query(query);
        self.report(result)
    }

    fn grow(&mut self, trigger: GrowthTrigger) -> bool {
        match self.session.begin_growth(trigger) {
            GrowthStep::Ignored => false,
            GrowthStep::Reveal => {
                let ticket = self.session.reveal_ticket();
                let delay = self.session.config().reveal_delay;
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = done_tx.send(Completion::Revealed { ticket });
                });
                true
            }
            GrowthStep::Fetch(request) => {
                let ticket = self.session.ticket(request);
                self.spawn_fetch(ticket);
                true
            }
        }
    }

    fn spawn_fetch(&self, ticket: PageTicket) {
        let fetcher = Arc::clone(&self.fetcher);
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch_page(ticket.request).await;
            let _ = done_tx.send(Completion::Page { ticket, result });
        });
    }

    fn complete(&mut self, done: Completion<T>) -> bool {
        match done {
            Completion::Page { ticket, result } => {
                let applied = self.session.apply_page(ticket, result);
                self.report(applied);
                true
            }
            Completion::Revealed { ticket } => {
                self.session.complete_reveal(ticket);
                true
            }
        }
    }

    /// Forward an error to the UI; returns true so the view is refreshed
    fn report(&self, result: Result<()>) -> bool {
        if let Err(e) = result {
            self.emit(BrowseEvent::Error {
                message: e.to_string(),
            });
        }
        true
    }

    fn emit(&self, event: BrowseEvent<T>) {
        if self.event_tx.try_send(event).is_err() {
            warn!("Browse event dropped, UI is not draining events");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use async_trait::async_trait;
    use pantry_client::MemoryFetcher;
    use pantry_core::{CatalogItem, PageRequest};

    use crate::reveal::RevealPhase;
    use crate::view::ViewStatus;

    const WAIT: Duration = Duration::from_secs(5);

    /// Adds latency to every page fetch
    struct SlowFetcher {
        inner: Arc<MemoryFetcher<CatalogItem>>,
        latency: Duration,
    }

    #[async_trait]
    impl PageFetcher for SlowFetcher {
        type Item = CatalogItem;

        async fn fetch_page(&self, request: PageRequest) -> pantry_client::Result<PageResult<CatalogItem>> {
            tokio::time::sleep(self.latency).await;
            self.inner.fetch_page(request).await
        }

        async fn fetch_item(&self, id: &ItemId) -> pantry_client::Result<CatalogItem> {
            self.inner.fetch_item(id).await
        }
    }

    fn numbered(n: usize) -> Vec<CatalogItem> {
        (1..=n)
            .map(|i| CatalogItem::new(i.to_string(), format!("Item {}", i)))
            .collect()
    }

    fn config() -> BrowseConfig {
        BrowseConfig::default()
            .with_reveal_delay(Duration::from_millis(10))
            .with_debounce(Duration::from_millis(50))
    }

    /// Collect views until one satisfies `done`
    fn wait_for(
        handle: &BrowseHandle<CatalogItem>,
        mut done: impl FnMut(&CatalogView<CatalogItem>) -> bool,
    ) -> (CatalogView<CatalogItem>, Vec<CatalogView<CatalogItem>>, Vec<String>) {
        let deadline = Instant::now() + WAIT;
        let mut seen = Vec::new();
        let mut errors = Vec::new();
        while Instant::now() < deadline {
            match handle.recv_timeout(Duration::from_millis(100)).unwrap() {
                Some(BrowseEvent::ViewUpdated(view)) => {
                    if done(&view) {
                        return (view, seen, errors);
                    }
                    seen.push(view);
                }
                Some(BrowseEvent::Error { message }) => errors.push(message),
                None => {}
            }
        }
        panic!("timed out waiting for view; errors: {:?}", errors);
    }

    fn settled(view: &CatalogView<CatalogItem>) -> bool {
        view.status == ViewStatus::Ready && !view.reveal.is_loading_more
    }

    #[test]
    fn test_load_and_grow() {
        let fetcher = MemoryFetcher::new(numbered(9));
        let handle = BrowseHandle::spawn(fetcher, config(), || {}).unwrap();

        handle.send(BrowseCommand::Load).unwrap();
        let (view, _, _) = wait_for(&handle, settled);
        assert_eq!(view.items.len(), 6);
        assert_eq!(view.phase, RevealPhase::Idle);

        handle.send(BrowseCommand::SentinelVisible).unwrap();
        let (view, _, _) = wait_for(&handle, |v| v.phase == RevealPhase::Exhausted);
        assert_eq!(view.items.len(), 9);
    }

    #[test]
    fn test_overlapping_triggers_fetch_once() {
        let inner = Arc::new(MemoryFetcher::new(numbered(30)));
        let fetcher = SlowFetcher {
            inner: Arc::clone(&inner),
            latency: Duration::from_millis(100),
        };
        let handle = BrowseHandle::spawn(fetcher, config(), || {}).unwrap();

        handle.send(BrowseCommand::Load).unwrap();
        wait_for(&handle, settled);

        for _ in 0..3 {
            handle.send(BrowseCommand::SentinelVisible).unwrap();
        }
        handle.send(BrowseCommand::LoadMore).unwrap();

        let (view, _, _) = wait_for(&handle, |v| settled(v) && v.items.len() == 12);
        assert_eq!(view.phase, RevealPhase::Idle);
        assert_eq!(
            inner.requests(),
            vec![PageRequest::new(0, 6).unwrap(), PageRequest::new(1, 6).unwrap()]
        );
    }

    #[test]
    fn test_typing_is_debounced() {
        let items = vec![
            CatalogItem::new("1", "Chicken Wrap"),
            CatalogItem::new("2", "Iced Tea"),
            CatalogItem::new("3", "Cheese Plate"),
        ];
        let handle = BrowseHandle::spawn(MemoryFetcher::new(items), config(), || {}).unwrap();
        handle.send(BrowseCommand::Load).unwrap();
        wait_for(&handle, settled);

        for text in ["c", "ch", "chk"] {
            handle.send(BrowseCommand::SetQuery(text.to_string())).unwrap();
        }

        let (view, before, _) = wait_for(&handle, |v| v.filter.query() == "chk");
        assert!(view.items.iter().any(|i| i.name == "Chicken Wrap"));
        for earlier in &before {
            assert!(earlier.filter.query().is_empty(), "committed {:?} early", earlier.filter.query());
        }
        // suggestions followed the typing before the commit
        assert!(before.iter().any(|v| !v.suggestions.is_empty()));
    }

    #[test]
    fn test_commit_query_skips_debounce() {
        let fetcher = MemoryFetcher::new(numbered(9));
        let config = config().with_debounce(Duration::from_secs(60));
        let handle = BrowseHandle::spawn(fetcher, config, || {}).unwrap();
        handle.send(BrowseCommand::Load).unwrap();
        wait_for(&handle, settled);

        handle.send(BrowseCommand::SetQuery("item 9".to_string())).unwrap();
        handle.send(BrowseCommand::CommitQuery).unwrap();
        let (view, _, _) = wait_for(&handle, |v| v.filter.query() == "item 9");
        assert_eq!(view.items[0].name, "Item 9");
    }

    #[test]
    fn test_query_while_fetching_keeps_baseline() {
        let inner = Arc::new(MemoryFetcher::new(numbered(30)));
        let fetcher = SlowFetcher {
            inner: Arc::clone(&inner),
            latency: Duration::from_millis(200),
        };
        let handle = BrowseHandle::spawn(fetcher, config(), || {}).unwrap();
        handle.send(BrowseCommand::Load).unwrap();
        wait_for(&handle, settled);

        handle.send(BrowseCommand::SentinelVisible).unwrap();
        handle.send(BrowseCommand::SetQuery("item".to_string())).unwrap();
        handle.send(BrowseCommand::CommitQuery).unwrap();

        let (view, _, _) = wait_for(&handle, |v| settled(v) && v.total_loaded == 12);
        assert_eq!(view.filter.query(), "item");
        assert_eq!(view.total_filtered, 12);
        assert_eq!(view.items.len(), 6);
    }

    #[test]
    fn test_growth_failure_reports_error() {
        let fetcher = Arc::new(MemoryFetcher::new(numbered(18)));
        let handle = BrowseHandle::spawn(Arc::clone(&fetcher), config(), || {}).unwrap();
        handle.send(BrowseCommand::Load).unwrap();
        wait_for(&handle, settled);

        fetcher.fail_next(1);
        handle.send(BrowseCommand::LoadMore).unwrap();
        let (view, _, errors) = wait_for(&handle, |v| v.notice.is_some());
        assert_eq!(errors.len(), 1);
        assert_eq!(view.items.len(), 6);
        assert_eq!(view.phase, RevealPhase::Idle);

        handle.send(BrowseCommand::LoadMore).unwrap();
        let (view, _, _) = wait_for(&handle, |v| settled(v) && v.items.len() == 12);
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_page_size_change_reloads() {
        let fetcher = Arc::new(MemoryFetcher::new(numbered(30)));
        let handle = BrowseHandle::spawn(Arc::clone(&fetcher), config(), || {}).unwrap();
        handle.send(BrowseCommand::Load).unwrap();
        wait_for(&handle, settled);

        handle.send(BrowseCommand::SetPageSize(24)).unwrap();
        let (view, _, _) = wait_for(&handle, |v| settled(v) && v.items.len() == 24);
        assert_eq!(view.total_loaded, 24);
        assert_eq!(fetcher.requests().last(), Some(&PageRequest::new(0, 24).unwrap()));

        handle.send(BrowseCommand::SetPageSize(0)).unwrap();
        let deadline = Instant::now() + WAIT;
        loop {
            assert!(Instant::now() < deadline, "no error for zero page size");
            if let Some(BrowseEvent::Error { .. }) = handle.recv_timeout(Duration::from_millis(100)).unwrap() {
                break;
            }
        }
    }

    #[test]
    fn test_signal_ui_called() {
        let (tx, rx) = bounded(EVENT_CAPACITY);
        let handle = BrowseHandle::spawn(MemoryFetcher::new(numbered(3)), config(), move || {
            let _ = tx.try_send(());
        })
        .unwrap();
        handle.send(BrowseCommand::Load).unwrap();
        assert!(rx.recv_timeout(WAIT).is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected_at_spawn() {
        let result = BrowseHandle::spawn(MemoryFetcher::new(numbered(3)), config().with_page_size(0), || {});
        assert!(matches!(result, Err(BrowseError::Core(_))));
    }
}
