//! Analytics service
//!
//! Free-form event ingestion with naive aggregation. Events live in a bounded
//! in-memory ring (oldest dropped first) and are lost on restart.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::config::AnalyticsConfig;
use crate::errors::{PortfolioError, Result};

/// 热门页面返回条数
pub const TOP_PAGES_LIMIT: usize = 10;

/// Ingestion body: `event` is required, everything unknown goes to `properties`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    #[serde(default, alias = "type", alias = "name")]
    pub event: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    pub properties: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCount {
    pub page: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub period_days: u32,
    pub since: DateTime<Utc>,
    pub total_events: u64,
    pub unique_users: u64,
    pub events_by_type: BTreeMap<String, u64>,
    pub daily_counts: Vec<DailyCount>,
    pub top_pages: Vec<PageCount>,
}

pub struct AnalyticsService {
    events: RwLock<VecDeque<AnalyticsEvent>>,
    max_events: usize,
    default_days: u32,
    max_days: u32,
}

impl AnalyticsService {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            max_events: config.max_events.max(1),
            default_days: config.default_days.max(1),
            max_days: config.max_days.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record one event, returns the stored record
    pub fn record(&self, input: EventInput) -> Result<AnalyticsEvent> {
        let event = input
            .event
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| PortfolioError::validation("Missing 'event' field"))?;

        let mut properties = input.properties;
        for (k, v) in input.extra {
            properties.entry(k).or_insert(v);
        }

        let record = AnalyticsEvent {
            id: uuid::Uuid::new_v4().to_string(),
            event,
            user_id: input.user_id.filter(|u| !u.is_empty()),
            page: input.page.filter(|p| !p.is_empty()),
            properties,
            timestamp: input.timestamp.unwrap_or_else(Utc::now),
        };

        let mut events = self.events.write();
        while events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(record.clone());
        trace!("Analytics event '{}' recorded", record.event);
        Ok(record)
    }

    /// Parse the `days` query parameter, falling back to the default window
    pub fn resolve_days(&self, days: Option<&str>) -> Result<u32> {
        let Some(raw) = days.map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(self.default_days);
        };
        match raw.parse::<u32>() {
            Ok(d) if (1..=self.max_days).contains(&d) => Ok(d),
            _ => Err(PortfolioError::validation(format!(
                "'days' must be an integer between 1 and {}",
                self.max_days
            ))),
        }
    }

    pub fn summary(&self, days: u32) -> AnalyticsSummary {
        self.summary_at(days, Utc::now())
    }

    /// Aggregate the events of the last `days` calendar days ending at `now`
    pub fn summary_at(&self, days: u32, now: DateTime<Utc>) -> AnalyticsSummary {
        let days = days.max(1);
        let today = now.date_naive();
        let first_day = today - Duration::days(i64::from(days) - 1);
        let since = first_day
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or(now);

        let mut daily: BTreeMap<NaiveDate, u64> = (0..i64::from(days))
            .map(|offset| (first_day + Duration::days(offset), 0))
            .collect();
        let mut by_type: BTreeMap<String, u64> = BTreeMap::new();
        let mut pages: HashMap<&str, u64> = HashMap::new();
        let mut users: HashSet<&str> = HashSet::new();
        let mut total = 0u64;

        let events = self.events.read();
        for event in events
            .iter()
            .filter(|e| e.timestamp >= since && e.timestamp <= now)
        {
            total += 1;
            *by_type.entry(event.event.clone()).or_default() += 1;
            if let Some(count) = daily.get_mut(&event.timestamp.date_naive()) {
                *count += 1;
            }
            if let Some(page) = event.page.as_deref() {
                *pages.entry(page).or_default() += 1;
            }
            if let Some(user) = event.user_id.as_deref() {
                users.insert(user);
            }
        }

        let mut top_pages: Vec<PageCount> = pages
            .into_iter()
            .map(|(page, count)| PageCount {
                page: page.to_string(),
                count,
            })
            .collect();
        top_pages.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.page.cmp(&b.page)));
        top_pages.truncate(TOP_PAGES_LIMIT);

        debug!("Analytics summary over {} days: {} events", days, total);

        AnalyticsSummary {
            period_days: days,
            since,
            total_events: total,
            unique_users: users.len() as u64,
            events_by_type: by_type,
            daily_counts: daily
                .into_iter()
                .map(|(date, count)| DailyCount { date, count })
                .collect(),
            top_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service(max_events: usize) -> AnalyticsService {
        AnalyticsService::new(&AnalyticsConfig {
            max_events,
            ..Default::default()
        })
    }

    fn input(value: Value) -> EventInput {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_requires_event_name() {
        let svc = service(10);
        assert!(matches!(
            svc.record(input(json!({"page": "/"}))),
            Err(PortfolioError::Validation(_))
        ));
        assert!(svc.record(input(json!({"event": "  "}))).is_err());
        assert!(svc.is_empty());
    }

    #[test]
    fn test_unknown_fields_become_properties() {
        let svc = service(10);
        let event = svc
            .record(input(json!({
                "type": "click",
                "target": "cta",
                "properties": {"section": "hero"}
            })))
            .unwrap();

        assert_eq!(event.event, "click");
        assert_eq!(event.properties["target"], "cta");
        assert_eq!(event.properties["section"], "hero");
    }

    #[test]
    fn test_ring_drops_oldest() {
        let svc = service(3);
        for i in 0..5 {
            svc.record(input(json!({"event": format!("e{}", i)}))).unwrap();
        }
        assert_eq!(svc.len(), 3);
        let summary = svc.summary(1);
        assert!(!summary.events_by_type.contains_key("e0"));
        assert!(summary.events_by_type.contains_key("e4"));
    }

    #[test]
    fn test_summary_window_and_zero_fill() {
        let svc = service(100);
        let now: DateTime<Utc> = "2024-05-10T12:00:00Z".parse().unwrap();

        for (ts, page, user) in [
            ("2024-05-10T08:00:00Z", "/", "a"),
            ("2024-05-10T09:00:00Z", "/#projects", "b"),
            ("2024-05-08T09:00:00Z", "/", "a"),
            ("2024-04-01T09:00:00Z", "/", "c"),
        ] {
            svc.record(input(json!({
                "event": "page_view",
                "page": page,
                "userId": user,
                "timestamp": ts
            })))
            .unwrap();
        }

        let summary = svc.summary_at(3, now);
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.unique_users, 2);
        assert_eq!(summary.events_by_type["page_view"], 3);
        assert_eq!(
            summary.daily_counts.iter().map(|d| d.count).collect::<Vec<_>>(),
            vec![1, 0, 2]
        );
        assert_eq!(summary.top_pages[0], PageCount { page: "/".into(), count: 2 });
    }

    #[test]
    fn test_resolve_days() {
        let svc = service(10);
        assert_eq!(svc.resolve_days(None).unwrap(), 7);
        assert_eq!(svc.resolve_days(Some("30")).unwrap(), 30);
        assert!(svc.resolve_days(Some("0")).is_err());
        assert!(svc.resolve_days(Some("abc")).is_err());
        assert!(svc.resolve_days(Some("366")).is_err());
    }
}
