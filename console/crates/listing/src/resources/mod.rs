//! Console lists
//!
//! Vocabulary and item type of each remote list, plus typed filter and
//! write helpers on their controllers.

use crate::error::{ListError, ListResult};

pub mod conversations;
pub mod faqs;
pub mod suggestions;
pub mod users;

pub use conversations::{Conversation, Conversations};
pub use faqs::{Faq, FaqDraft, FaqPatch, FaqSource, FaqStatus, Faqs};
pub use suggestions::{AiSuggestion, Approval, Rejection, Suggestion, SuggestionStatus, Suggestions};
pub use users::{NewUser, UserPatch, UserSummary, Users};

/// Reject a field shorter than `min` characters once trimmed
pub(crate) fn require_len(field: &str, value: &str, min: usize) -> ListResult<()> {
    match value.trim().chars().count() {
        0 => Err(ListError::InvalidValue(format!("{field} is required"))),
        len if len < min => Err(ListError::InvalidValue(format!(
            "{field} must be at least {min} characters"
        ))),
        _ => Ok(()),
    }
}
