//! Cascading region → prefecture → quartier selector
//!
//! Runs as one tokio task owning a [`SelectorState`]. Each level change is
//! applied synchronously (clearing descendants), then the matching list is
//! fetched on a separate task and handed back tagged with the request, so
//! the state can discard it if the parent changed in the meantime.

pub mod state;

use crate::directory::{LocationDirectory, LocationDirectoryClient, LocationNode, NodeId};
use crate::error::{Error, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

pub use state::{Level, LoadRequest, SelectorState};

/// Selection changes delivered to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    Region(Option<NodeId>),
    Prefecture(Option<NodeId>),
    Quartier(Option<NodeId>),
}

/// Handle to a running selector controller
#[derive(Debug, Clone)]
pub struct SelectorHandle {
    events: mpsc::UnboundedSender<SelectorEvent>,
    state: watch::Receiver<SelectorState>,
}

impl SelectorHandle {
    pub fn select_region(&self, region: Option<NodeId>) -> Result<()> {
        self.send(SelectorEvent::Region(region))
    }

    pub fn select_prefecture(&self, prefecture: Option<NodeId>) -> Result<()> {
        self.send(SelectorEvent::Prefecture(prefecture))
    }

    pub fn select_quartier(&self, quartier: Option<NodeId>) -> Result<()> {
        self.send(SelectorEvent::Quartier(quartier))
    }

    pub fn state(&self) -> SelectorState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectorState> {
        self.state.clone()
    }

    fn send(&self, event: SelectorEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| Error::ControllerStopped("selector"))
    }
}

/// Three-level dependent selector
pub struct CascadingSelectorController<D> {
    client: Arc<LocationDirectoryClient<D>>,
    state: SelectorState,
    published: watch::Sender<SelectorState>,
}

impl<D: LocationDirectory + 'static> CascadingSelectorController<D> {
    /// Start a controller task; it stops once every handle is dropped
    pub fn spawn(client: Arc<LocationDirectoryClient<D>>) -> (SelectorHandle, JoinHandle<()>) {
        let state = SelectorState::new();
        let (state_tx, state_rx) = watch::channel(state.clone());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let controller = Self {
            client,
            state,
            published: state_tx,
        };
        let task = tokio::spawn(controller.run(events_rx));

        (
            SelectorHandle {
                events: events_tx,
                state: state_rx,
            },
            task,
        )
    }

    async fn run(mut self, mut events: mpsc::UnboundedReceiver<SelectorEvent>) {
        let (loaded_tx, mut loaded) = mpsc::unbounded_channel::<(LoadRequest, Vec<LocationNode>)>();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let load = match event {
                        SelectorEvent::Region(region) => self.state.select_region(region),
                        SelectorEvent::Prefecture(prefecture) => {
                            self.state.select_prefecture(prefecture)
                        }
                        SelectorEvent::Quartier(quartier) => {
                            self.state.select_quartier(quartier);
                            None
                        }
                    };
                    // Descendants are cleared before the fetch goes out
                    self.publish();
                    if let Some(request) = load {
                        self.fetch(request, loaded_tx.clone());
                    }
                }
                Some((request, options)) = loaded.recv() => {
                    if self.state.apply(&request, options) {
                        self.publish();
                    }
                }
            }
        }

        debug!("selector controller stopped");
    }

    fn fetch(
        &self,
        request: LoadRequest,
        reply: mpsc::UnboundedSender<(LoadRequest, Vec<LocationNode>)>,
    ) {
        debug!(level = ?request.level, parent = %request.parent, "loading options");
        let client = Arc::clone(&self.client);

        tokio::spawn(async move {
            let options = match request.level {
                Level::Prefecture => client.list_prefectures(&request.parent).await,
                Level::Quartier => client.list_quartiers(&request.parent).await,
            };
            let _ = reply.send((request, options));
        });
    }

    fn publish(&self) {
        self.published.send_replace(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::testing::StubDirectory;
    use std::time::Duration;
    use tokio::time::sleep;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn ids(nodes: &[LocationNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn conakry_and_kindia() -> StubDirectory {
        StubDirectory::default()
            .with_prefectures("1", &[("10", "Kaloum"), ("11", "Matam")])
            .with_prefectures("2", &[("20", "Kindia"), ("21", "Coyah")])
            .with_quartiers("10", &[("100", "Boulbinet"), ("101", "Sandervalia")])
            .with_quartiers("11", &[("110", "Madina")])
    }

    fn spawn(stub: StubDirectory) -> SelectorHandle {
        let (handle, _task) =
            CascadingSelectorController::spawn(Arc::new(LocationDirectoryClient::new(stub)));
        handle
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cascade() {
        let handle = spawn(conakry_and_kindia());

        handle.select_region(Some(id("1"))).unwrap();
        sleep(ms(10)).await;
        assert_eq!(ids(&handle.state().prefecture_options), ["10", "11"]);

        handle.select_prefecture(Some(id("10"))).unwrap();
        sleep(ms(10)).await;
        assert_eq!(ids(&handle.state().quartier_options), ["100", "101"]);

        handle.select_quartier(Some(id("101"))).unwrap();
        sleep(ms(10)).await;
        assert_eq!(handle.state().selected_quartier, Some(id("101")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_region_change_keeps_only_latest() {
        let stub = conakry_and_kindia()
            .with_delay("1", ms(500))
            .with_delay("2", ms(50));
        let handle = spawn(stub);

        handle.select_region(Some(id("1"))).unwrap();
        sleep(ms(10)).await;
        handle.select_region(Some(id("2"))).unwrap();

        sleep(ms(100)).await;
        assert_eq!(ids(&handle.state().prefecture_options), ["20", "21"]);

        // R1's slow answer lands later and must be ignored
        sleep(ms(1_000)).await;
        let state = handle.state();
        assert_eq!(state.selected_region, Some(id("2")));
        assert_eq!(ids(&state.prefecture_options), ["20", "21"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unresolved_latest_region_shows_nothing() {
        let stub = conakry_and_kindia()
            .with_delay("1", ms(10))
            .with_delay("2", ms(1_000));
        let handle = spawn(stub);

        handle.select_region(Some(id("1"))).unwrap();
        handle.select_region(Some(id("2"))).unwrap();
        sleep(ms(100)).await;

        assert!(handle.state().prefecture_options.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_region_change_drops_in_flight_quartiers() {
        let stub = conakry_and_kindia().with_delay("10", ms(500));
        let handle = spawn(stub);

        handle.select_region(Some(id("1"))).unwrap();
        sleep(ms(10)).await;
        handle.select_prefecture(Some(id("10"))).unwrap();
        sleep(ms(10)).await;
        handle.select_region(Some(id("2"))).unwrap();
        sleep(ms(1_000)).await;

        let state = handle.state();
        assert!(state.selected_prefecture.is_none());
        assert!(state.quartier_options.is_empty());
        assert_eq!(ids(&state.prefecture_options), ["20", "21"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_region_clears_downstream() {
        let handle = spawn(conakry_and_kindia());

        handle.select_region(Some(id("1"))).unwrap();
        sleep(ms(10)).await;
        handle.select_prefecture(Some(id("11"))).unwrap();
        sleep(ms(10)).await;
        handle.select_region(None).unwrap();
        sleep(ms(10)).await;

        let state = handle.state();
        assert!(state.selected_region.is_none());
        assert!(state.selected_prefecture.is_none());
        assert!(state.prefecture_options.is_empty());
        assert!(state.quartier_options.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_descendants_cleared_before_fetch_resolves() {
        let stub = conakry_and_kindia().with_delay("2", ms(1_000));
        let handle = spawn(stub);

        handle.select_region(Some(id("1"))).unwrap();
        sleep(ms(10)).await;
        handle.select_prefecture(Some(id("10"))).unwrap();
        sleep(ms(10)).await;

        handle.select_region(Some(id("2"))).unwrap();
        sleep(ms(10)).await;
        let state = handle.state();
        assert!(state.prefecture_options.is_empty());
        assert!(state.quartier_options.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_directory_failure_leaves_empty_options() {
        let handle = spawn(conakry_and_kindia().failing());

        handle.select_region(Some(id("1"))).unwrap();
        sleep(ms(10)).await;

        let state = handle.state();
        assert_eq!(state.selected_region, Some(id("1")));
        assert!(state.prefecture_options.is_empty());
    }
}
