//! Address autocomplete
//!
//! One `AutocompleteController` per input field. The controller runs as a
//! tokio task that owns its [`SearchSession`], the debounce timer and the
//! channel on which search responses come back. Callers talk to it through
//! an [`AutocompleteHandle`] and watch the rendered state on a
//! `tokio::sync::watch` channel.
//!
//! In-flight searches are never aborted; the session discards their
//! responses on arrival when a newer search has already rendered.

pub mod session;

use crate::config::AutocompleteConfig;
use crate::directory::{AddressSuggestion, LocationDirectory, LocationDirectoryClient, NodeId};
use crate::error::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::debug;

pub use session::{AutocompleteView, InputOutcome, Phase, SearchSession, SearchTicket};

/// Callback invoked with the chosen suggestion
pub type OnSelect = Box<dyn FnMut(AddressSuggestion) + Send>;

/// User events delivered to the controller
#[derive(Debug)]
pub enum AutocompleteEvent {
    /// The input text changed
    Input(String),
    /// A suggestion was activated (pointer or keyboard)
    Select(usize),
    /// Interaction outside the input and the result panel
    Dismiss,
    /// Fire any pending search now; reply once every issued search answered
    Flush(oneshot::Sender<AutocompleteView>),
}

/// Settings for one autocomplete field
#[derive(Debug, Clone)]
pub struct AutocompleteSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    /// Restrict searches to one region
    pub region: Option<NodeId>,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self::from(&AutocompleteConfig::default())
    }
}

impl From<&AutocompleteConfig> for AutocompleteSettings {
    fn from(config: &AutocompleteConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_len: config.min_query_len,
            region: None,
        }
    }
}

/// Handle to a running autocomplete controller
#[derive(Debug, Clone)]
pub struct AutocompleteHandle {
    events: mpsc::UnboundedSender<AutocompleteEvent>,
    view: watch::Receiver<AutocompleteView>,
}

impl AutocompleteHandle {
    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        self.send(AutocompleteEvent::Input(text.into()))
    }

    pub fn select(&self, index: usize) -> Result<()> {
        self.send(AutocompleteEvent::Select(index))
    }

    pub fn dismiss(&self) -> Result<()> {
        self.send(AutocompleteEvent::Dismiss)
    }

    /// Wait until the controller has handled every event sent so far and
    /// no search is pending or in flight, then return the final view
    ///
    /// A debounce timer still running is cut short.
    pub async fn settle(&self) -> Result<AutocompleteView> {
        let (reply, settled) = oneshot::channel();
        self.send(AutocompleteEvent::Flush(reply))?;
        settled
            .await
            .map_err(|_| Error::ControllerStopped("autocomplete"))
    }

    /// Current rendered state
    pub fn view(&self) -> AutocompleteView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<AutocompleteView> {
        self.view.clone()
    }

    fn send(&self, event: AutocompleteEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| Error::ControllerStopped("autocomplete"))
    }
}

/// Debounced, race-safe autocomplete for one input field
pub struct AutocompleteController<D> {
    client: Arc<LocationDirectoryClient<D>>,
    settings: AutocompleteSettings,
    session: SearchSession,
    on_select: OnSelect,
    view: watch::Sender<AutocompleteView>,
}

impl<D: LocationDirectory + 'static> AutocompleteController<D> {
    /// Start a controller task
    ///
    /// The task stops once every handle has been dropped.
    pub fn spawn(
        client: Arc<LocationDirectoryClient<D>>,
        settings: AutocompleteSettings,
        on_select: OnSelect,
    ) -> (AutocompleteHandle, JoinHandle<()>) {
        let session = SearchSession::new(settings.min_query_len);
        let (view_tx, view_rx) = watch::channel(session.view());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let controller = Self {
            client,
            settings,
            session,
            on_select,
            view: view_tx,
        };
        let task = tokio::spawn(controller.run(events_rx));

        (
            AutocompleteHandle {
                events: events_tx,
                view: view_rx,
            },
            task,
        )
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<AutocompleteEvent>) {
        let (results_tx, mut results) = mpsc::unbounded_channel::<(u64, Vec<AddressSuggestion>)>();

        let debounce = sleep(self.settings.debounce);
        tokio::pin!(debounce);
        let mut armed = false;
        let mut waiters: Vec<oneshot::Sender<AutocompleteView>> = Vec::new();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        AutocompleteEvent::Input(text) => match self.session.input(&text) {
                            InputOutcome::Debounce => {
                                debounce.as_mut().reset(Instant::now() + self.settings.debounce);
                                armed = true;
                            }
                            InputOutcome::Cleared => armed = false,
                        },
                        AutocompleteEvent::Select(index) => {
                            if let Some(chosen) = self.session.select(index) {
                                armed = false;
                                (self.on_select)(chosen);
                            }
                        }
                        AutocompleteEvent::Dismiss => self.session.dismiss(),
                        AutocompleteEvent::Flush(reply) => {
                            if armed {
                                armed = false;
                                if let Some(ticket) = self.session.begin_search() {
                                    self.issue(ticket, results_tx.clone());
                                }
                            }
                            waiters.push(reply);
                        }
                    }
                    self.publish();
                }
                () = &mut debounce, if armed => {
                    armed = false;
                    if let Some(ticket) = self.session.begin_search() {
                        self.issue(ticket, results_tx.clone());
                        self.publish();
                    }
                }
                Some((sequence, suggestions)) = results.recv() => {
                    if self.session.receive(sequence, suggestions) {
                        self.publish();
                    }
                }
            }

            if !waiters.is_empty() && !armed && self.session.is_settled() {
                let view = self.session.view();
                for waiter in waiters.drain(..) {
                    let _ = waiter.send(view.clone());
                }
            }
        }

        debug!("autocomplete controller stopped");
    }

    fn issue(&self, ticket: SearchTicket, reply: mpsc::UnboundedSender<(u64, Vec<AddressSuggestion>)>) {
        debug!(sequence = ticket.sequence, query = %ticket.query, "issuing address search");
        let client = Arc::clone(&self.client);
        let region = self.settings.region.clone();

        tokio::spawn(async move {
            let suggestions = client.search(&ticket.query, region.as_ref()).await;
            // The controller may be gone; nothing to render then
            let _ = reply.send((ticket.sequence, suggestions));
        });
    }

    fn publish(&self) {
        self.view.send_replace(self.session.view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::{Call, StubDirectory};
    use std::sync::Mutex;

    fn descriptions(view: &AutocompleteView) -> Vec<String> {
        view.suggestions.iter().map(|s| s.description.clone()).collect()
    }

    fn spawn(stub: StubDirectory) -> AutocompleteHandle {
        let client = Arc::new(LocationDirectoryClient::new(stub));
        let (handle, _task) =
            AutocompleteController::spawn(client, AutocompleteSettings::default(), Box::new(|_| {}));
        handle
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_issues_single_search() {
        let stub = StubDirectory::default().with_suggestions("Madina", &["Marché Madina"]);
        let calls = stub.calls();
        let handle = spawn(stub);

        for text in ["Ma", "Mad", "Madi", "Madin", "Madina"] {
            handle.input(text).unwrap();
            sleep(ms(100)).await;
        }
        sleep(ms(400)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![Call::Search("Madina".to_string(), None)]
        );
        let view = handle.view();
        assert_eq!(view.phase, Phase::Rendered);
        assert!(view.panel_visible);
        assert_eq!(descriptions(&view), ["Marché Madina"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_stale_response_does_not_overwrite() {
        let stub = StubDirectory::default()
            .with_suggestions("ab", &["ab result"])
            .with_suggestions("abc", &["abc result"])
            .with_delay("ab", ms(500))
            .with_delay("abc", ms(50));
        let handle = spawn(stub);

        handle.input("ab").unwrap();
        sleep(ms(350)).await;
        handle.input("abc").unwrap();
        sleep(ms(1_000)).await;

        assert_eq!(descriptions(&handle.view()), ["abc result"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_early_response_is_replaced() {
        let stub = StubDirectory::default()
            .with_suggestions("ab", &["ab result"])
            .with_suggestions("abc", &["abc result"])
            .with_delay("ab", ms(10))
            .with_delay("abc", ms(500));
        let handle = spawn(stub);

        handle.input("ab").unwrap();
        sleep(ms(350)).await;
        assert_eq!(descriptions(&handle.view()), ["ab result"]);

        handle.input("abc").unwrap();
        sleep(ms(1_000)).await;
        assert_eq!(descriptions(&handle.view()), ["abc result"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_never_searches() {
        let stub = StubDirectory::default();
        let calls = stub.calls();
        let handle = spawn(stub);

        handle.input("M").unwrap();
        handle.input(" ").unwrap();
        sleep(ms(1_000)).await;

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(handle.view().phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortening_input_clears_results_immediately() {
        let stub = StubDirectory::default().with_suggestions("Ma", &["Madina"]);
        let handle = spawn(stub);

        handle.input("Ma").unwrap();
        sleep(ms(400)).await;
        assert!(handle.view().panel_visible);

        handle.input("M").unwrap();
        sleep(ms(1)).await;
        let view = handle.view();
        assert!(!view.panel_visible);
        assert!(view.suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_invokes_callback_and_resets() {
        let stub = StubDirectory::default().with_suggestions("Ma", &["Madina", "Matam"]);
        let client = Arc::new(LocationDirectoryClient::new(stub));
        let chosen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&chosen);
        let (handle, _task) = AutocompleteController::spawn(
            client,
            AutocompleteSettings::default(),
            Box::new(move |s| sink.lock().unwrap().push(s)),
        );

        handle.input("Ma").unwrap();
        sleep(ms(400)).await;
        handle.select(1).unwrap();
        sleep(ms(1)).await;

        let picked = chosen.lock().unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].description, "Matam");

        let view = handle.view();
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.input, "Matam");
        assert!(!view.panel_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_hides_panel() {
        let stub = StubDirectory::default().with_suggestions("Ma", &["Madina"]);
        let handle = spawn(stub);

        handle.input("Ma").unwrap();
        sleep(ms(400)).await;
        handle.dismiss().unwrap();
        sleep(ms(1)).await;

        let view = handle.view();
        assert!(!view.panel_visible);
        assert_eq!(descriptions(&view), ["Madina"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_region_scope_is_forwarded() {
        let stub = StubDirectory::default();
        let calls = stub.calls();
        let client = Arc::new(LocationDirectoryClient::new(stub));
        let settings = AutocompleteSettings {
            region: Some(NodeId::from("1")),
            ..Default::default()
        };
        let (handle, _task) = AutocompleteController::spawn(client, settings, Box::new(|_| {}));

        handle.input("Kaloum").unwrap();
        sleep(ms(400)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![Call::Search("Kaloum".to_string(), Some(NodeId::from("1")))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_directory_failure_renders_nothing() {
        let handle = spawn(StubDirectory::default().failing());

        handle.input("Madina").unwrap();
        sleep(ms(400)).await;

        let view = handle.view();
        assert!(view.suggestions.is_empty());
        assert!(!view.panel_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_right_after_input_runs_the_search() {
        let stub = StubDirectory::default().with_suggestions("Madina", &["Marché Madina"]);
        let calls = stub.calls();
        let handle = spawn(stub);

        // No yield between the two: the controller has not seen the input yet
        handle.input("Madina").unwrap();
        let view = handle.settle().await.unwrap();

        assert_eq!(view.phase, Phase::Rendered);
        assert_eq!(descriptions(&view), ["Marché Madina"]);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_latest_search() {
        let stub = StubDirectory::default()
            .with_suggestions("Ma", &["Ma result"])
            .with_suggestions("Mad", &["Mad result"])
            .with_delay("Ma", ms(500))
            .with_delay("Mad", ms(2_000));
        let handle = spawn(stub);

        handle.input("Ma").unwrap();
        sleep(ms(350)).await;
        handle.input("Mad").unwrap();
        sleep(ms(550)).await;

        // The older answer is on screen while the newer search is in flight
        let early = handle.view();
        assert_eq!(early.phase, Phase::Rendered);
        assert_eq!(descriptions(&early), ["Ma result"]);

        let view = handle.settle().await.unwrap();
        assert_eq!(descriptions(&view), ["Mad result"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_when_idle_returns_immediately() {
        let stub = StubDirectory::default();
        let calls = stub.calls();
        let handle = spawn(stub);

        handle.input("M").unwrap();
        let view = handle.settle().await.unwrap();

        assert_eq!(view.phase, Phase::Idle);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_controller_stops_when_handles_dropped() {
        let client = Arc::new(LocationDirectoryClient::new(StubDirectory::default()));
        let (handle, task) =
            AutocompleteController::spawn(client, AutocompleteSettings::default(), Box::new(|_| {}));
        drop(handle);
        task.await.unwrap();
    }
}
