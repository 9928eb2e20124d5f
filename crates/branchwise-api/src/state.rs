//! Shared application state.

use std::sync::Arc;

use branchwise_core::clock::{Clock, SystemClock};
use branchwise_core::ports::{ContentSource, KeyValueStore};
use branchwise_scenario::application::loader::GraphLoader;
use branchwise_scenario::application::navigator::Navigator;
use branchwise_scenario::application::progress_store::ProgressStore;
use branchwise_scenario::application::statistics::StrategyStatistics;
use branchwise_storage::file_content_source::FileContentSource;
use branchwise_storage::json_file_store::JsonFileStore;
use tokio::sync::Mutex;

use crate::config::Config;

/// Application state shared across all request handlers.
///
/// The server drives a single navigation session; requests touching it are
/// serialized through the mutex.
#[derive(Debug, Clone)]
pub struct AppState {
    pub navigator: Arc<Mutex<Navigator>>,
    /// Catalogue access without locking the session.
    pub loader: GraphLoader,
    /// Read access to the persisted progress document.
    pub progress: ProgressStore,
}

impl AppState {
    /// Wires a navigator over the given ports. Strategy statistics are folded
    /// into the same store the navigator saves snapshots to.
    #[must_use]
    pub fn new(
        content: Arc<dyn ContentSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let loader = GraphLoader::new(content);
        let progress = ProgressStore::new(store);
        let statistics = Arc::new(StrategyStatistics::new(progress.clone()));
        let navigator = Navigator::new(loader.clone(), progress.clone(), statistics, clock);

        Self {
            navigator: Arc::new(Mutex::new(navigator)),
            loader,
            progress,
        }
    }

    /// Builds state backed by the filesystem locations in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(FileContentSource::new(&config.content_dir)),
            Arc::new(JsonFileStore::new(&config.progress_file)),
            Arc::new(SystemClock),
        )
    }
}
