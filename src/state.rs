use crate::storage::{FileStore, Persistence};
use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub persistence: Persistence<FileStore>,
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(persistence: Persistence<FileStore>, tracker: Tracker) -> Self {
        Self {
            persistence,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    pub async fn load(persistence: Persistence<FileStore>) -> Self {
        let tracker = Tracker::load(&persistence).await;
        Self::new(persistence, tracker)
    }
}
