//! Conversations list
//!
//! Newest activity first, 20 per page. Filterable by exact phone number and
//! by a date range on the last message.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::ConversationId;
use serde::{Deserialize, Serialize};

use crate::application::controller::ResourceListController;
use crate::domain::query::SortDirection;
use crate::domain::resource::{Resource, Vocabulary};
use crate::domain::source::ListSource;
use crate::error::{ListError, ListResult};

pub const PHONE_NUMBER: &str = "phone_number";
pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";

/// Conversation summary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: ConversationId,
    pub phone_number: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub last_message: String,
    pub last_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Conversation {
    /// Name shown in the list, falling back to the phone number
    pub fn display_name(&self) -> &str {
        self.user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.phone_number.as_str())
    }
}

pub struct Conversations;

impl Resource for Conversations {
    type Item = Conversation;
    const PATH: &'static str = "/api/conversations";
    const ITEMS_KEY: &'static str = "conversations";
    const VOCABULARY: Vocabulary = Vocabulary {
        resource: "conversations",
        filters: &[PHONE_NUMBER, START_DATE, END_DATE],
        sort_keys: &["last_timestamp", "phone_number", "message_count"],
        searchable: true,
        default_sort: Some(("last_timestamp", SortDirection::Desc)),
        default_page_size: 20,
    };
}

fn check_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ListResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ListError::InvalidValue(
            "Start date must be on or before end date".to_string(),
        )),
        _ => Ok(()),
    }
}

impl<S> ResourceListController<Conversations, S>
where
    S: ListSource<Conversations>,
{
    /// Set both ends of the date range with one fetch
    ///
    /// `None` leaves that end open.
    pub async fn set_date_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ListResult<()> {
        check_range(start, end)?;
        let start = start.map(|d| d.format("%Y-%m-%d").to_string());
        let end = end.map(|d| d.format("%Y-%m-%d").to_string());
        self.set_filters(&[(START_DATE, start.as_deref()), (END_DATE, end.as_deref())])
            .await
    }

    pub async fn set_phone_number(&self, phone_number: &str) -> ListResult<()> {
        self.set_filter(PHONE_NUMBER, phone_number).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ListConfig;
    use crate::domain::query::ResourceQuery;
    use crate::domain::result::{Page, Pagination};
    use kernel::error::app_error::AppResult;
    use parking_lot::Mutex;
    use platform::notify::MemoryNotifier;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingSource {
        queries: Mutex<Vec<ResourceQuery>>,
    }

    impl ListSource<Conversations> for RecordingSource {
        async fn fetch(&self, query: &ResourceQuery) -> AppResult<Page<Conversation>> {
            self.queries.lock().push(query.clone());
            Ok(Page {
                items: Vec::new(),
                pagination: Pagination::default(),
            })
        }
    }

    fn controller() -> (
        Arc<RecordingSource>,
        ResourceListController<Conversations, RecordingSource>,
    ) {
        let source = Arc::new(RecordingSource::default());
        let controller = ResourceListController::new(
            source.clone(),
            Arc::new(MemoryNotifier::new()),
            Arc::new(ListConfig::default()),
        );
        (source, controller)
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_defaults() {
        let query = ResourceQuery::defaults(&Conversations::VOCABULARY);
        assert_eq!(query.page_size(), 20);
        let sort = query.sort().unwrap();
        assert_eq!(sort.key, "last_timestamp");
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[tokio::test]
    async fn test_date_range_is_one_fetch() {
        let (source, controller) = controller();
        controller
            .set_date_range(date(2026, 9, 1), date(2026, 9, 30))
            .await
            .unwrap();

        let queries = source.queries.lock().clone();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].filter(START_DATE), Some("2026-09-01"));
        assert_eq!(queries[0].filter(END_DATE), Some("2026-09-30"));

        controller.set_date_range(None, None).await.unwrap();
        let query = controller.query();
        assert_eq!(query.filter(START_DATE), None);
        assert_eq!(query.filter(END_DATE), None);
    }

    #[tokio::test]
    async fn test_inverted_date_range_rejected() {
        let (source, controller) = controller();
        let err = controller
            .set_date_range(date(2026, 10, 2), date(2026, 10, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ListError::InvalidValue(_)));
        assert!(source.queries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_phone_number_filter_trimmed() {
        let (_source, controller) = controller();
        controller.set_phone_number(" +9665000 ").await.unwrap();
        assert_eq!(controller.query().filter(PHONE_NUMBER), Some("+9665000"));
    }

    #[test]
    fn test_row_deserialize() {
        let row: Conversation = serde_json::from_value(json!({
            "conversation_id": "c-1",
            "phone_number": "+9665000",
            "user_name": null,
            "last_message": "شكرا",
            "last_timestamp": "2026-10-01T10:00:00.000Z",
            "message_count": 4,
            "rating": 4.5
        }))
        .unwrap();
        assert_eq!(row.display_name(), "+9665000");
        assert_eq!(row.message_count, 4);
        assert_eq!(row.rating, Some(4.5));
    }
}
