//! Practice history listing

use serde::Deserialize;

use crate::models::PracticeSession;

/// Optional filters for the history listing. Empty strings match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilter {
    /// Prefix of the RFC 3339 session date, e.g. `2024-05` or `2024-05-03`
    pub date: Option<String>,
    pub instrument: Option<String>,
    pub category: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, session: &PracticeSession) -> bool {
        let date_ok = active(&self.date)
            .map_or(true, |prefix| session.date.to_rfc3339().starts_with(prefix));
        let instrument_ok = active(&self.instrument).map_or(true, |i| session.instrument == i);
        let category_ok = active(&self.category).map_or(true, |c| session.category == c);

        date_ok && instrument_ok && category_ok
    }
}

fn active(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().map(str::trim).filter(|f| !f.is_empty())
}

/// Matching sessions, newest first
pub fn history<'a>(sessions: &'a [PracticeSession], filter: &HistoryFilter) -> Vec<&'a PracticeSession> {
    let mut matching: Vec<_> = sessions.iter().filter(|s| filter.matches(s)).collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn session(instrument: &str, category: &str, day: u32) -> PracticeSession {
        PracticeSession {
            id: Uuid::new_v4(),
            date: Utc.with_ymd_and_hms(2024, 5, day, 18, 0, 0).unwrap(),
            duration: 600,
            instrument: instrument.into(),
            category: category.into(),
            notes: None,
        }
    }

    #[test]
    fn newest_first_without_filters() {
        let sessions = vec![session("Piano", "Scales", 1), session("Piano", "Scales", 3)];
        let listed = history(&sessions, &HistoryFilter::default());
        assert_eq!(listed, vec![&sessions[1], &sessions[0]]);
    }

    #[test]
    fn filters_combine() {
        let sessions = vec![
            session("Piano", "Scales", 1),
            session("Guitar", "Scales", 3),
            session("Piano", "Repertoire", 3),
        ];
        let filter = HistoryFilter {
            date: Some("2024-05-03".into()),
            instrument: Some("Piano".into()),
            category: Some(String::new()),
        };
        assert_eq!(history(&sessions, &filter), vec![&sessions[2]]);

        let by_month = HistoryFilter {
            date: Some("2024-05".into()),
            ..Default::default()
        };
        assert_eq!(history(&sessions, &by_month).len(), 3);
    }
}
