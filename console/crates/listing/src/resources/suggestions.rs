//! FAQ suggestion list
//!
//! AI-proposed FAQs awaiting review. Paged only: no search, filters or sort.
//! Approving turns a suggestion into an active FAQ; either review action
//! takes it off the pending list.

use chrono::{DateTime, Utc};
use kernel::id::SuggestionId;
use serde::{Deserialize, Serialize};

use crate::application::controller::ResourceListController;
use crate::domain::mutation::{Mutation, MutationSink, record_path};
use crate::domain::resource::{Resource, Vocabulary};
use crate::domain::source::ListSource;
use crate::error::ListResult;
use crate::resources::require_len;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    PendingReview,
    Approved,
    Rejected,
}

/// Provenance of a suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSuggestion {
    pub source_conversation_id: String,
    pub source_message_id: String,
    pub confidence_score: f64,
    pub suggested_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "_id")]
    pub id: SuggestionId,
    pub question: String,
    #[serde(default)]
    pub question_ar: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub answer_ar: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub status: SuggestionStatus,
    pub ai_suggestion: AiSuggestion,
    #[serde(default)]
    pub usage_count: Option<u64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Suggestion {
    /// Confidence as a whole percentage, clamped to 0..=100
    pub fn confidence_percent(&self) -> u8 {
        (self.ai_suggestion.confidence_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    pub fn is_pending(&self) -> bool {
        self.status == SuggestionStatus::PendingReview
    }
}

pub struct Suggestions;

impl Resource for Suggestions {
    type Item = Suggestion;
    const PATH: &'static str = "/api/faqs/suggestions";
    const ITEMS_KEY: &'static str = "suggestions";
    const VOCABULARY: Vocabulary = Vocabulary {
        resource: "suggestions",
        filters: &[],
        sort_keys: &[],
        searchable: false,
        default_sort: None,
        default_page_size: 10,
    };
}

/// Reviewer edits applied when approving
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Approval {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Approval {
    /// Approve with the suggested answer unchanged
    pub fn of(suggestion: &Suggestion) -> Self {
        Self {
            answer: suggestion.answer.clone(),
            answer_ar: suggestion.answer_ar.clone(),
            category: suggestion.category.clone(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ListResult<()> {
        require_len("Answer", &self.answer, 1)?;
        if let Some(question) = &self.question {
            require_len("Question", question, 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rejection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
}

fn review_path(id: &SuggestionId, action: &str) -> String {
    format!("{}/{action}", record_path(Suggestions::PATH, id.as_str()))
}

impl<S> ResourceListController<Suggestions, S>
where
    S: ListSource<Suggestions> + MutationSink,
{
    pub async fn approve(&self, id: &SuggestionId, approval: &Approval) -> ListResult<()> {
        approval.validate()?;
        let mutation = Mutation::post(review_path(id, "approve"), approval)?;
        self.submit(mutation, "Suggestion approved and added to FAQs")
            .await
    }

    pub async fn reject(&self, id: &SuggestionId, rejection: &Rejection) -> ListResult<()> {
        let mutation = Mutation::post(review_path(id, "reject"), rejection)?;
        self.submit(mutation, "Suggestion rejected").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ListConfig;
    use crate::domain::mutation::Method;
    use crate::domain::query::ResourceQuery;
    use crate::domain::result::{Page, Pagination};
    use crate::error::ListError;
    use kernel::error::app_error::AppResult;
    use parking_lot::Mutex;
    use platform::notify::MemoryNotifier;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Default)]
    struct ReviewSource {
        writes: Mutex<Vec<Mutation>>,
        fetches: Mutex<u32>,
    }

    impl ListSource<Suggestions> for ReviewSource {
        async fn fetch(&self, _query: &ResourceQuery) -> AppResult<Page<Suggestion>> {
            *self.fetches.lock() += 1;
            Ok(Page {
                items: Vec::new(),
                pagination: Pagination::default(),
            })
        }
    }

    impl MutationSink for ReviewSource {
        async fn apply(&self, mutation: &Mutation) -> AppResult<()> {
            self.writes.lock().push(mutation.clone());
            Ok(())
        }
    }

    fn controller() -> (Arc<ReviewSource>, ResourceListController<Suggestions, ReviewSource>) {
        let source = Arc::new(ReviewSource::default());
        let controller = ResourceListController::new(
            source.clone(),
            Arc::new(MemoryNotifier::new()),
            Arc::new(ListConfig::default()),
        );
        (source, controller)
    }

    #[tokio::test]
    async fn test_review_actions_post_and_refetch() {
        let (source, c) = controller();
        let id = SuggestionId::new("s-1");
        let approval = Approval {
            answer: "Yes, to the GCC.".into(),
            category: Some("shipping".into()),
            ..Approval::default()
        };
        c.approve(&id, &approval).await.unwrap();
        c.reject(&id, &Rejection::default()).await.unwrap();

        let writes = source.writes.lock().clone();
        assert_eq!(writes[0].method, Method::Post);
        assert_eq!(writes[0].path, "/api/faqs/suggestions/s-1/approve");
        assert_eq!(
            writes[0].body,
            Some(json!({ "answer": "Yes, to the GCC.", "category": "shipping" }))
        );
        assert_eq!(writes[1].path, "/api/faqs/suggestions/s-1/reject");
        assert_eq!(writes[1].body, Some(json!({})));
        assert_eq!(*source.fetches.lock(), 2);
    }

    #[tokio::test]
    async fn test_blank_answer_is_not_approved() {
        let (source, c) = controller();
        let err = c
            .approve(&SuggestionId::new("s-1"), &Approval::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Answer is required");
        assert!(source.writes.lock().is_empty());
    }

    #[test]
    fn test_paging_only() {
        let mut query = ResourceQuery::defaults(&Suggestions::VOCABULARY);
        let vocab = Suggestions::VOCABULARY;
        assert!(matches!(
            query.set_search(&vocab, "refund"),
            Err(ListError::SearchUnsupported { .. })
        ));
        assert!(query.set_filter(&vocab, "status", "approved").is_err());
        assert_eq!(
            query.to_params(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
    }

    #[test]
    fn test_row_deserialize() {
        let suggestion: Suggestion = serde_json::from_value(json!({
            "_id": "s-1",
            "question": "Do you ship abroad?",
            "answer": "Yes, to the GCC.",
            "source": "ai_suggested",
            "status": "pending_review",
            "ai_suggestion": {
                "source_conversation_id": "c-1",
                "source_message_id": "m-9",
                "confidence_score": 0.874,
                "suggested_at": "2026-10-01T09:00:00Z",
                "reviewed_by": null
            },
            "is_active": false,
            "created_at": "2026-10-01T09:00:00Z",
            "updated_at": "2026-10-01T09:00:00Z"
        }))
        .unwrap();
        assert!(suggestion.is_pending());
        assert_eq!(suggestion.confidence_percent(), 87);
    }
}
