//! In-memory store of finished sessions.

use crate::session::TrackingSession;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Finished sessions in completion order
#[derive(Debug, Clone, Default)]
pub struct SessionArchive {
    sessions: Vec<TrackingSession>,
}

fn start_date(session: &TrackingSession) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(session.start_time).map(|dt| dt.date_naive())
}

impl SessionArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished session; unfinished ones are ignored
    pub fn add(&mut self, session: TrackingSession) {
        if !session.is_finished() {
            log::warn!("Refusing to archive unfinished session {}", session.id);
            return;
        }
        log::info!(
            "Archived session {} ({:.0}s). Sessions in archive: {}",
            session.id,
            session.total_duration,
            self.sessions.len() + 1
        );
        self.sessions.push(session);
    }

    #[must_use]
    pub fn sessions(&self) -> &[TrackingSession] {
        &self.sessions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions that started on `date` (UTC)
    #[must_use]
    pub fn on_date(&self, date: NaiveDate) -> Vec<&TrackingSession> {
        self.sessions
            .iter()
            .filter(|s| start_date(s) == Some(date))
            .collect()
    }

    /// Sessions of one month grouped by start day (UTC)
    #[must_use]
    pub fn by_month(&self, year: i32, month: u32) -> BTreeMap<NaiveDate, Vec<&TrackingSession>> {
        let mut days: BTreeMap<NaiveDate, Vec<&TrackingSession>> = BTreeMap::new();
        for session in &self.sessions {
            if let Some(date) = start_date(session) {
                if date.year() == year && date.month() == month {
                    days.entry(date).or_default().push(session);
                }
            }
        }
        days
    }

    /// Remove a session by id, returning it if present
    pub fn remove(&mut self, id: &str) -> Option<TrackingSession> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        Some(self.sessions.remove(index))
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}
