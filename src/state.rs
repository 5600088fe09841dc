use crate::catalog::Catalogs;
use crate::entries;
use crate::form::FormState;
use crate::models::MoodEntry;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the screen works on: persisted collections plus the draft.
#[derive(Debug, Clone)]
pub struct Session {
    pub entries: Vec<MoodEntry>,
    pub catalogs: Catalogs,
    pub form: FormState,
}

impl Session {
    pub async fn load(store: &dyn KeyValueStore, now: DateTime<Utc>) -> Self {
        Self {
            entries: entries::load(store).await,
            catalogs: Catalogs::load_all(store).await,
            form: FormState::new(now),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KeyValueStore>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, session: Session) -> Self {
        Self {
            store,
            session: Arc::new(Mutex::new(session)),
        }
    }
}
