//! In-progress entry state and its transitions.
//!
//! `FormState::reduce` is a pure `(state, action) -> state` function; the only
//! side effect lives in `FormState::submit`, which hands the finished entry to
//! the entry store.

use crate::entries;
use crate::models::{CatalogKind, MoodEntry, Rating};
use crate::storage::KeyValueStore;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub date: DateTime<Utc>,
    pub rating: Rating,
    pub activities: Vec<String>,
    pub places: Vec<String>,
    pub events: Vec<String>,
    pub notes: String,
}

impl Draft {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            date: now,
            rating: Rating::NEUTRAL,
            activities: Vec::new(),
            places: Vec::new(),
            events: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn selection(&self, kind: CatalogKind) -> &[String] {
        match kind {
            CatalogKind::Activity => &self.activities,
            CatalogKind::Place => &self.places,
            CatalogKind::Event => &self.events,
        }
    }

    fn selection_mut(&mut self, kind: CatalogKind) -> &mut Vec<String> {
        match kind {
            CatalogKind::Activity => &mut self.activities,
            CatalogKind::Place => &mut self.places,
            CatalogKind::Event => &mut self.events,
        }
    }

    pub fn is_selected(&self, kind: CatalogKind, label: &str) -> bool {
        self.selection(kind).iter().any(|item| item == label)
    }

    /// Snapshot of the draft as a stored entry. Selections are copied so later
    /// catalog edits cannot reach it.
    pub fn to_entry(&self, id: String) -> MoodEntry {
        MoodEntry {
            id,
            date: self.date,
            rating: self.rating,
            activities: self.activities.clone(),
            places: self.places.clone(),
            events: self.events.clone(),
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    Editing,
    Committing,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FormAction {
    SetDate { date: DateTime<Utc> },
    SetRating { rating: Rating },
    SetNotes { notes: String },
    Toggle { kind: CatalogKind, label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormState {
    pub phase: FormPhase,
    pub draft: Draft,
}

impl FormState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: FormPhase::Editing,
            draft: Draft::new(now),
        }
    }

    pub fn reduce(mut self, action: FormAction) -> Self {
        if self.phase != FormPhase::Editing {
            debug!(?action, "ignoring form change while committing");
            return self;
        }

        match action {
            FormAction::SetDate { date } => self.draft.date = date,
            FormAction::SetRating { rating } => self.draft.rating = rating,
            FormAction::SetNotes { notes } => self.draft.notes = notes,
            FormAction::Toggle { kind, label } => {
                let selection = self.draft.selection_mut(kind);
                if let Some(position) = selection.iter().position(|item| *item == label) {
                    selection.remove(position);
                } else {
                    selection.push(label);
                }
            }
        }
        self
    }

    /// Commits the draft: appends it to `entries`, persists the result and
    /// resets the form. The draft is discarded whether or not the write lands.
    pub async fn submit(
        &mut self,
        store: &dyn KeyValueStore,
        entries: &[MoodEntry],
        now: DateTime<Utc>,
    ) -> (Vec<MoodEntry>, MoodEntry) {
        self.phase = FormPhase::Committing;

        let id = entries::next_entry_id(now.timestamp_millis(), entries);
        let entry = self.draft.to_entry(id);
        let next = entries::append(entries, entry.clone());
        let persisted = entries::persist(store, &next).await;
        info!(id = %entry.id, rating = entry.rating.value(), persisted, "mood entry saved");

        self.draft = Draft::new(now);
        self.phase = FormPhase::Editing;
        (next, entry)
    }
}

/// Timestamp for a picked calendar day, keeping the wall-clock time of `now`.
pub fn on_day<Tz: TimeZone>(day: NaiveDate, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    let local = day.and_time(now.time());
    now.timezone()
        .from_local_datetime(&local)
        .earliest()
        .map(|date| date.with_timezone(&Utc))
}
