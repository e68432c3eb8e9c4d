//! The responsive quote view.
//!
//! ## Lifecycle
//!
//! `QuoteView::mount()`:
//!   1. spawns the one-shot quote fetch (detached, never retried)
//!   2. subscribes to the breakpoint media query and stores its current match
//!
//! Both write into one shared [`ViewState`]; every effective change is
//! published on a `watch` channel so renderers can redraw. Dropping the
//! [`MountedView`] deregisters the viewport listener. A fetch still in flight
//! at that point runs to completion and its result is discarded.

pub mod html;
pub mod text;

use crate::config::AppConfig;
use crate::models::{Field, Quote};
use crate::source::QuoteSource;
use crate::viewport::{MediaQuery, MediaQueryError, MediaQuerySubscription, ViewportPlatform};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub use self::html::render_html;
pub use self::text::render_text;

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    quotes: Vec<Quote>,
    compact: bool,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        if self.quotes.is_empty() {
            Phase::Loading
        } else {
            Phase::Loaded
        }
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Replace the quote set. An empty batch leaves the state untouched, so
    /// a loaded view never falls back to loading.
    pub fn apply_quotes(&mut self, quotes: Vec<Quote>) -> bool {
        if quotes.is_empty() {
            return false;
        }
        self.quotes = quotes;
        true
    }

    pub fn apply_viewport(&mut self, compact: bool) -> bool {
        let changed = self.compact != compact;
        self.compact = compact;
        changed
    }

    pub fn render(&self) -> Screen {
        match (self.phase(), self.compact) {
            (Phase::Loading, _) => Screen::Loading,
            (Phase::Loaded, true) => Screen::Cards(self.quotes.iter().map(QuoteCard::from).collect()),
            (Phase::Loaded, false) => Screen::Table(QuoteTable::new(&self.quotes)),
        }
    }
}

// ── Rendered layout ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Cards(Vec<QuoteCard>),
    Table(QuoteTable),
}

/// One block of the compact layout.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteCard {
    pub symbol: String,
    pub name: String,
    /// `Field::CARD` with display values, in order.
    pub fields: Vec<(Field, String)>,
}

impl From<&Quote> for QuoteCard {
    fn from(quote: &Quote) -> Self {
        Self {
            symbol: quote.symbol.clone(),
            name: quote.cell(Field::Name),
            fields: Field::CARD.iter().map(|&f| (f, quote.cell(f))).collect(),
        }
    }
}

/// The wide layout: one column per `Field::ALL` entry, one row per quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteTable {
    pub header: Vec<Field>,
    pub rows: Vec<Vec<String>>,
}

impl QuoteTable {
    pub fn new(quotes: &[Quote]) -> Self {
        Self {
            header: Field::ALL.to_vec(),
            rows: quotes
                .iter()
                .map(|q| Field::ALL.iter().map(|&f| q.cell(f)).collect())
                .collect(),
        }
    }
}

// ── Component ─────────────────────────────────────────────────────────────────

/// An unmounted view: its dependencies and the symbols it will ask for.
pub struct QuoteView {
    source: Arc<dyn QuoteSource>,
    platform: Arc<dyn ViewportPlatform>,
    symbols: Vec<String>,
    query: MediaQuery,
}

impl QuoteView {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        platform: Arc<dyn ViewportPlatform>,
        symbols: Vec<String>,
        query: MediaQuery,
    ) -> Self {
        Self {
            source,
            platform,
            symbols,
            query,
        }
    }

    pub fn from_config(
        source: Arc<dyn QuoteSource>,
        platform: Arc<dyn ViewportPlatform>,
        config: &AppConfig,
    ) -> Result<Self, MediaQueryError> {
        let query = MediaQuery::parse(&config.view.breakpoint_query)?;
        Ok(Self::new(source, platform, config.fetcher.symbols.clone(), query))
    }

    /// Start the fetch and the viewport subscription. Must be called from
    /// within a Tokio runtime.
    pub fn mount(self) -> MountedView {
        let (tx, _rx) = watch::channel(ViewState::default());
        let state = Arc::new(tx);

        let fetch = {
            let state = Arc::downgrade(&state);
            let source = self.source;
            let symbols = self.symbols;
            tokio::spawn(async move {
                let quotes = match source.fetch_quotes(&symbols).await {
                    Ok(quotes) => quotes,
                    Err(e) => {
                        // No error state: the view keeps showing the loader.
                        warn!("Quote fetch failed: {}", e);
                        return;
                    }
                };

                let Some(state) = state.upgrade() else {
                    debug!("View unmounted before {} quotes arrived, discarding", quotes.len());
                    return;
                };

                let n = quotes.len();
                if state.send_if_modified(|s| s.apply_quotes(quotes)) {
                    info!("Loaded {} quotes", n);
                } else {
                    debug!("Quote endpoint returned no quotes, still loading");
                }
            })
        };

        let subscription = {
            let state = Arc::clone(&state);
            MediaQuerySubscription::register(self.platform, self.query, move |compact| {
                if state.send_if_modified(|s| s.apply_viewport(compact)) {
                    debug!("Layout switched to {}", if compact { "cards" } else { "table" });
                }
            })
        };

        MountedView {
            subscription,
            state,
            fetch: Some(fetch),
        }
    }
}

/// A mounted view. Dropping it unmounts.
pub struct MountedView {
    // Declared first so the listener is gone before the state is released.
    subscription: MediaQuerySubscription,
    state: Arc<watch::Sender<ViewState>>,
    fetch: Option<JoinHandle<()>>,
}

impl MountedView {
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn render(&self) -> Screen {
        self.state.borrow().render()
    }

    /// Receiver notified on every effective state change.
    pub fn changes(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn query(&self) -> MediaQuery {
        self.subscription.query()
    }

    /// Wait for the mount-time fetch to finish, whatever its outcome.
    pub async fn settled(&mut self) {
        if let Some(handle) = self.fetch.take() {
            if let Err(e) = handle.await {
                error!("Quote fetch task failed: {}", e);
            }
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for MountedView {
    fn drop(&mut self) {
        debug!("Unmounting quote view");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use crate::viewport::SimulatedViewport;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;

    enum Reply {
        Quotes(Vec<Quote>),
        Fail,
    }

    struct MockSource {
        reply: Reply,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl MockSource {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(reply: Reply, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(reply)
            }
        }
    }

    #[async_trait]
    impl QuoteSource for MockSource {
        async fn fetch_quotes(&self, _symbols: &[String]) -> Result<Vec<Quote>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.reply {
                Reply::Quotes(quotes) => Ok(quotes.clone()),
                Reply::Fail => Err(FetchError::Status(500)),
            }
        }
    }

    fn quotes(symbols: &[&str]) -> Vec<Quote> {
        symbols.iter().map(|s| Quote::bare(*s)).collect()
    }

    fn mount(source: Arc<MockSource>, platform: Arc<SimulatedViewport>) -> MountedView {
        QuoteView::new(
            source,
            platform,
            vec!["AAPL".into(), "FB".into(), "GOOGL".into(), "AMZN".into()],
            MediaQuery::max_width(900),
        )
        .mount()
    }

    #[tokio::test]
    async fn test_loads_n_table_rows() {
        let source = Arc::new(MockSource::new(Reply::Quotes(quotes(&["AAPL", "FB", "AMZN"]))));
        let mut view = mount(source, Arc::new(SimulatedViewport::new(1440)));
        assert_eq!(view.render(), Screen::Loading);

        view.settled().await;

        assert_eq!(view.state().phase(), Phase::Loaded);
        let Screen::Table(table) = view.render() else {
            panic!("expected table layout");
        };
        assert_eq!(table.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_loads_n_cards_when_compact() {
        let source = Arc::new(MockSource::new(Reply::Quotes(quotes(&["AAPL", "FB"]))));
        let mut view = mount(source, Arc::new(SimulatedViewport::new(375)));
        view.settled().await;

        let Screen::Cards(cards) = view.render() else {
            panic!("expected card layout");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].symbol, "FB");
        let labels: Vec<Field> = cards[0].fields.iter().map(|(f, _)| *f).collect();
        assert_eq!(labels, Field::CARD.to_vec());
    }

    #[tokio::test]
    async fn test_empty_response_stays_loading() {
        let source = Arc::new(MockSource::new(Reply::Quotes(Vec::new())));
        let mut view = mount(source, Arc::new(SimulatedViewport::new(1440)));
        view.settled().await;

        assert_eq!(view.state().phase(), Phase::Loading);
        assert_eq!(view.render(), Screen::Loading);
    }

    #[tokio::test]
    async fn test_failed_fetch_stays_loading() {
        let source = Arc::new(MockSource::new(Reply::Fail));
        let mut view = mount(source.clone(), Arc::new(SimulatedViewport::new(1440)));
        view.settled().await;

        assert_eq!(view.render(), Screen::Loading);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_compact_iff_width_at_most_breakpoint() {
        for (width, compact) in [(320, true), (900, true), (901, false), (1920, false)] {
            let source = Arc::new(MockSource::new(Reply::Quotes(Vec::new())));
            let view = mount(source, Arc::new(SimulatedViewport::new(width)));
            assert_eq!(view.state().is_compact(), compact, "width {}", width);
        }
    }

    #[tokio::test]
    async fn test_resize_switches_layout_without_refetch() {
        let source = Arc::new(MockSource::new(Reply::Quotes(quotes(&["AAPL", "GOOGL"]))));
        let platform = Arc::new(SimulatedViewport::new(1280));
        let mut view = mount(source.clone(), platform.clone());
        view.settled().await;
        let mut rx = view.changes();
        assert!(matches!(view.render(), Screen::Table(_)));

        platform.set_width(800);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_compact());
        assert!(matches!(view.render(), Screen::Cards(_)));

        platform.set_width(700);
        assert!(!rx.has_changed().unwrap());

        platform.set_width(1024);
        assert!(matches!(view.render(), Screen::Table(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_table_order_ignores_json_key_order() {
        let quote: Quote = serde_json::from_value(json!({
            "pe": 30, "eps": 5, "previousClose": 148.8, "open": 149,
            "avgVolume": 900, "volume": 1000, "dayHigh": 152, "dayLow": 148,
            "change": 1.2, "price": 150, "name": "Apple", "symbol": "AAPL"
        }))
        .unwrap();
        let source = Arc::new(MockSource::new(Reply::Quotes(vec![quote])));
        let mut view = mount(source, Arc::new(SimulatedViewport::new(1440)));
        view.settled().await;

        let Screen::Table(table) = view.render() else {
            panic!("expected table layout");
        };
        let header: Vec<&str> = table.header.iter().map(|f| f.key()).collect();
        assert_eq!(
            header,
            vec![
                "symbol", "name", "price", "change", "dayLow", "dayHigh", "volume",
                "avgVolume", "open", "previousClose", "eps", "pe"
            ]
        );
        assert_eq!(
            table.rows,
            vec![vec![
                "AAPL", "Apple", "150", "1.2", "148", "152", "1000", "900", "149", "148.8",
                "5", "30"
            ]]
        );
    }

    #[tokio::test]
    async fn test_sparse_batch_loads_every_row() {
        let batch: Vec<Quote> = serde_json::from_value(json!([
            { "symbol": "AAPL", "name": "Apple", "price": 150.0 },
            { "name": "Unnamed", "price": 1 },
            { "symbol": "GOOGL", "name": null, "eps": true }
        ]))
        .unwrap();
        let source = Arc::new(MockSource::new(Reply::Quotes(batch)));
        let mut view = mount(source, Arc::new(SimulatedViewport::new(1440)));
        view.settled().await;

        assert_eq!(view.state().phase(), Phase::Loaded);
        let Screen::Table(table) = view.render() else {
            panic!("expected table layout");
        };
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0][2], "150");
        assert_eq!(table.rows[1][..3], ["", "Unnamed", "1"]);
        assert_eq!(table.rows[2][10], "");
    }

    #[tokio::test]
    async fn test_unmount_deregisters_listener() {
        let source = Arc::new(MockSource::new(Reply::Quotes(quotes(&["AAPL"]))));
        let platform = Arc::new(SimulatedViewport::new(1440));
        let mut view = mount(source, platform.clone());
        view.settled().await;
        assert_eq!(platform.listener_count(), 1);

        let rx = view.changes();
        view.unmount();
        assert_eq!(platform.listener_count(), 0);

        platform.set_width(400);
        assert!(!rx.borrow().is_compact());
    }

    #[tokio::test]
    async fn test_fetch_after_unmount_is_discarded() {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(MockSource::gated(
            Reply::Quotes(quotes(&["AAPL"])),
            gate.clone(),
        ));
        let view = mount(source.clone(), Arc::new(SimulatedViewport::new(1440)));
        let rx = view.changes();
        view.unmount();

        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(rx.borrow().phase(), Phase::Loading);
    }

    #[tokio::test]
    async fn test_from_config_reads_symbols_and_breakpoint() {
        let mut config = AppConfig::default();
        config.view.breakpoint_query = "screen and (max-width: 600px)".to_string();
        let source = Arc::new(MockSource::new(Reply::Quotes(Vec::new())));

        let view = QuoteView::from_config(source, Arc::new(SimulatedViewport::new(700)), &config)
            .unwrap()
            .mount();
        assert_eq!(view.query(), MediaQuery::max_width(600));
        assert!(!view.state().is_compact());

        config.view.breakpoint_query = "(max-width: wide)".to_string();
        let source = Arc::new(MockSource::new(Reply::Quotes(Vec::new())));
        assert!(matches!(
            QuoteView::from_config(source, Arc::new(SimulatedViewport::new(700)), &config),
            Err(MediaQueryError::Length(_))
        ));
    }

    #[test]
    fn test_loaded_never_reverts_to_loading() {
        let mut state = ViewState::default();
        assert!(state.apply_quotes(quotes(&["AAPL"])));
        assert!(!state.apply_quotes(Vec::new()));
        assert_eq!(state.phase(), Phase::Loaded);
        assert_eq!(state.quotes()[0].symbol, "AAPL");
    }
}
