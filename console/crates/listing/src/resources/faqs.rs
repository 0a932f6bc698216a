//! FAQ list

use chrono::{DateTime, Utc};
use kernel::id::FaqId;
use serde::{Deserialize, Serialize};

use crate::application::controller::ResourceListController;
use crate::domain::mutation::{Mutation, MutationSink, record_path};
use crate::domain::resource::{Resource, Vocabulary};
use crate::domain::source::ListSource;
use crate::error::{ListError, ListResult};
use crate::resources::require_len;

pub const CATEGORY: &str = "category";
pub const STATUS: &str = "status";
pub const SOURCE: &str = "source";
pub const IS_ACTIVE: &str = "is_active";
pub const HAS_ARABIC: &str = "has_arabic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqStatus {
    Active,
    PendingReview,
    Rejected,
}

impl FaqStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqStatus::Active => "active",
            FaqStatus::PendingReview => "pending_review",
            FaqStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqSource {
    Manual,
    AiSuggested,
}

impl FaqSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaqSource::Manual => "manual",
            FaqSource::AiSuggested => "ai_suggested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(rename = "_id")]
    pub id: FaqId,
    pub question: String,
    #[serde(default)]
    pub question_ar: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub answer_ar: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub vector_id: Option<String>,
    pub source: FaqSource,
    pub status: FaqStatus,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Faq {
    /// Whether an Arabic translation is present
    pub fn has_arabic(&self) -> bool {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.question_ar) || filled(&self.answer_ar)
    }
}

pub struct Faqs;

impl Resource for Faqs {
    type Item = Faq;
    const PATH: &'static str = "/api/faqs";
    const ITEMS_KEY: &'static str = "faqs";
    const VOCABULARY: Vocabulary = Vocabulary {
        resource: "faqs",
        filters: &[CATEGORY, STATUS, SOURCE, IS_ACTIVE, HAS_ARABIC],
        sort_keys: &[],
        searchable: true,
        default_sort: None,
        default_page_size: 10,
    };
}

/// New FAQ
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl FaqDraft {
    pub fn validate(&self) -> ListResult<()> {
        require_len("Question", &self.question, 5)?;
        require_len("Answer", &self.answer, 10)
    }
}

/// Partial FAQ update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaqPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FaqStatus>,
}

impl FaqPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> ListResult<()> {
        if self.is_empty() {
            return Err(ListError::InvalidValue("Nothing to update".into()));
        }
        if let Some(question) = &self.question {
            require_len("Question", question, 5)?;
        }
        if let Some(answer) = &self.answer {
            require_len("Answer", answer, 10)?;
        }
        Ok(())
    }
}

fn flag(value: Option<bool>) -> Option<&'static str> {
    value.map(|v| if v { "true" } else { "false" })
}

impl<S> ResourceListController<Faqs, S>
where
    S: ListSource<Faqs>,
{
    pub async fn set_status(&self, status: Option<FaqStatus>) -> ListResult<()> {
        self.set_filters(&[(STATUS, status.map(|s| s.as_str()))])
            .await
    }

    pub async fn set_source(&self, source: Option<FaqSource>) -> ListResult<()> {
        self.set_filters(&[(SOURCE, source.map(|s| s.as_str()))])
            .await
    }

    pub async fn set_active(&self, active: Option<bool>) -> ListResult<()> {
        self.set_filters(&[(IS_ACTIVE, flag(active))]).await
    }

    pub async fn set_has_arabic(&self, has_arabic: Option<bool>) -> ListResult<()> {
        self.set_filters(&[(HAS_ARABIC, flag(has_arabic))]).await
    }
}

impl<S> ResourceListController<Faqs, S>
where
    S: ListSource<Faqs> + MutationSink,
{
    pub async fn create_faq(&self, draft: &FaqDraft) -> ListResult<()> {
        draft.validate()?;
        self.submit(Mutation::post(Faqs::PATH, draft)?, "FAQ created successfully")
            .await
    }

    pub async fn update_faq(&self, id: &FaqId, patch: &FaqPatch) -> ListResult<()> {
        patch.validate()?;
        let path = record_path(Faqs::PATH, id.as_str());
        self.submit(Mutation::put(path, patch)?, "FAQ updated successfully")
            .await
    }

    pub async fn delete_faq(&self, id: &FaqId) -> ListResult<()> {
        let path = record_path(Faqs::PATH, id.as_str());
        self.submit(Mutation::delete(path), "FAQ deleted successfully")
            .await
    }
}
