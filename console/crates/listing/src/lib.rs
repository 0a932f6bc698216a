//! Remote List Module
//!
//! One generic controller for every filtered, sorted and paginated list in
//! the console.
//!
//! Clean Architecture structure:
//! - `domain/` - Query, result, resource vocabulary, list source and write ports
//! - `application/` - List controller and its configuration
//! - `infra/` - REST list source
//! - `resources/` - Conversations, FAQs, FAQ suggestions, users
//!
//! ## Race handling
//! Every fetch carries a sequence stamp and a snapshot of the query it was
//! issued for. A response is applied only when both still match the
//! controller's current state; anything else is dropped untouched.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod resources;

// Re-exports for convenience
pub use application::config::ListConfig;
pub use application::controller::ResourceListController;
pub use domain::mutation::{Method, Mutation, MutationSink};
pub use domain::query::{ResourceQuery, Sort, SortDirection};
pub use domain::resource::{Resource, Vocabulary};
pub use domain::result::{ListFailure, ListStatus, Page, Pagination, QueryResult};
pub use domain::source::ListSource;
pub use error::{ListError, ListResult};
pub use infra::http::HttpListSource;
pub use resources::{
    Approval, Conversations, FaqDraft, FaqPatch, Faqs, NewUser, Rejection, Suggestions, UserPatch,
    Users,
};
