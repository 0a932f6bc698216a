//! Domain Layer
//!
//! Query and result models, resource vocabularies, the fetch port and the
//! write port.

pub mod mutation;
pub mod query;
pub mod resource;
pub mod result;
pub mod source;

pub use mutation::{Method, Mutation, MutationSink};
pub use query::{ResourceQuery, Sort, SortDirection};
pub use resource::{Resource, Vocabulary};
pub use result::{ListFailure, ListStatus, Page, Pagination, QueryResult};
pub use source::ListSource;
