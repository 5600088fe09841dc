use crate::models::CatalogKind;
use crate::storage::{KeyValueStore, load_json, persist_json};
use serde::Serialize;
use tracing::{error, info, warn};

const DEFAULT_ACTIVITIES: [&str; 5] = [
    "Go out partying",
    "Go to the cinema",
    "Go running",
    "Exercise",
    "Read",
];
const DEFAULT_PLACES: [&str; 5] = ["Park", "Plaza", "Shopping mall", "Home", "Work"];
const DEFAULT_EVENTS: [&str; 5] = [
    "Social gathering",
    "Celebration",
    "Doctor's appointment",
    "Work",
    "Study",
];

pub fn defaults(kind: CatalogKind) -> Vec<String> {
    let seed: &[&str] = match kind {
        CatalogKind::Activity => &DEFAULT_ACTIVITIES,
        CatalogKind::Place => &DEFAULT_PLACES,
        CatalogKind::Event => &DEFAULT_EVENTS,
    };
    seed.iter().map(|label| label.to_string()).collect()
}

/// The three tag vocabularies offered on the entry form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalogs {
    pub activities: Vec<String>,
    pub places: Vec<String>,
    pub events: Vec<String>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self {
            activities: defaults(CatalogKind::Activity),
            places: defaults(CatalogKind::Place),
            events: defaults(CatalogKind::Event),
        }
    }
}

impl Catalogs {
    pub async fn load_all(store: &dyn KeyValueStore) -> Self {
        Self {
            activities: load(store, CatalogKind::Activity).await,
            places: load(store, CatalogKind::Place).await,
            events: load(store, CatalogKind::Event).await,
        }
    }

    pub fn get(&self, kind: CatalogKind) -> &[String] {
        match kind {
            CatalogKind::Activity => &self.activities,
            CatalogKind::Place => &self.places,
            CatalogKind::Event => &self.events,
        }
    }

    pub fn replace(&mut self, kind: CatalogKind, labels: Vec<String>) {
        match kind {
            CatalogKind::Activity => self.activities = labels,
            CatalogKind::Place => self.places = labels,
            CatalogKind::Event => self.events = labels,
        }
    }

    pub fn contains(&self, kind: CatalogKind, label: &str) -> bool {
        self.get(kind).iter().any(|existing| existing == label)
    }
}

/// Loads one catalog, seeding the defaults when nothing usable is stored.
pub async fn load(store: &dyn KeyValueStore, kind: CatalogKind) -> Vec<String> {
    let key = kind.storage_key();
    match load_json(store, key).await {
        Ok(Some(labels)) => labels,
        Ok(None) => defaults(kind),
        Err(err) => {
            warn!(key = err.key(), "falling back to default catalog: {err}");
            defaults(kind)
        }
    }
}

/// Appends `label` and persists the whole catalog. Blank labels are ignored and
/// return `current` unchanged. Duplicates are accepted.
pub async fn add(
    store: &dyn KeyValueStore,
    kind: CatalogKind,
    current: &[String],
    label: &str,
) -> Vec<String> {
    if label.trim().is_empty() {
        return current.to_vec();
    }

    let mut next = current.to_vec();
    next.push(label.to_string());

    let key = kind.storage_key();
    match persist_json(store, key, &next).await {
        Ok(()) => info!(key, label, "catalog label added"),
        Err(err) => error!(key = err.key(), "failed to persist catalog: {err}"),
    }
    next
}
