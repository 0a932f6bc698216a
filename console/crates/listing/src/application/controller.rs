//! Resource List Controller
//!
//! Owns the query of one list and drives its fetch cycle. Every accepted
//! mutation issues a fetch stamped with a sequence number and the query
//! snapshot; only the response to the latest stamp is ever displayed.
//!
//! Writes go through [`ResourceListController::submit`], which refetches the
//! current query once the server accepts them. A write that empties the
//! current page lands on page 1 through the usual out-of-range rewind.
//!
//! State sits behind a `parking_lot::Mutex` that is released before every
//! `.await`, so several tasks may mutate the same list concurrently.

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use platform::notify::{Notice, Notifier};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::application::config::ListConfig;
use crate::domain::mutation::{Mutation, MutationSink};
use crate::domain::query::{ResourceQuery, SortDirection};
use crate::domain::resource::{Resource, Vocabulary};
use crate::domain::result::{ListFailure, ListStatus, Page, QueryResult};
use crate::domain::source::ListSource;
use crate::error::{ListError, ListResult};

struct ListState<T> {
    query: ResourceQuery,
    result: QueryResult<T>,
    /// Latest issued sequence stamp
    issued: u64,
}

struct Ticket {
    seq: u64,
    query: ResourceQuery,
}

enum Applied {
    Done(ListResult<()>),
    Refetch(Ticket),
}

/// Generic list controller
pub struct ResourceListController<R, S>
where
    R: Resource,
    S: ListSource<R>,
{
    source: Arc<S>,
    notifier: Arc<dyn Notifier>,
    config: Arc<ListConfig>,
    state: Mutex<ListState<R::Item>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> ResourceListController<R, S>
where
    R: Resource,
    S: ListSource<R>,
{
    /// Create a controller with the resource's default query
    ///
    /// Nothing is fetched until the first mutation or [`Self::refresh`].
    pub fn new(source: Arc<S>, notifier: Arc<dyn Notifier>, config: Arc<ListConfig>) -> Self {
        Self {
            source,
            notifier,
            config,
            state: Mutex::new(ListState {
                query: ResourceQuery::defaults(&R::VOCABULARY),
                result: QueryResult::default(),
                issued: 0,
            }),
            _resource: PhantomData,
        }
    }

    pub fn vocabulary(&self) -> Vocabulary {
        R::VOCABULARY
    }

    /// Current query
    pub fn query(&self) -> ResourceQuery {
        self.state.lock().query.clone()
    }

    /// Displayed result snapshot
    pub fn result(&self) -> QueryResult<R::Item> {
        self.state.lock().result.clone()
    }

    pub fn status(&self) -> ListStatus {
        self.state.lock().result.status
    }

    pub fn items(&self) -> Vec<R::Item> {
        self.state.lock().result.items.clone()
    }

    // ========================================================================
    // Query mutations
    // ========================================================================

    pub async fn set_search(&self, text: &str) -> ListResult<()> {
        self.mutate(|query, vocab| query.set_search(vocab, text))
            .await
    }

    pub async fn set_filter(&self, name: &str, value: &str) -> ListResult<()> {
        self.mutate(|query, vocab| query.set_filter(vocab, name, value))
            .await
    }

    pub async fn clear_filter(&self, name: &str) -> ListResult<()> {
        self.mutate(|query, vocab| query.clear_filter(vocab, name))
            .await
    }

    /// Change several filters with a single fetch
    pub async fn set_filters(&self, changes: &[(&str, Option<&str>)]) -> ListResult<()> {
        self.mutate(|query, vocab| query.set_filters(vocab, changes))
            .await
    }

    /// Change the sort; the current page is kept
    pub async fn set_sort(&self, key: &str, direction: SortDirection) -> ListResult<()> {
        self.mutate(|query, vocab| query.set_sort(vocab, key, direction))
            .await
    }

    pub async fn set_page(&self, page: u32) -> ListResult<()> {
        self.mutate(|query, _| query.set_page(page)).await
    }

    pub async fn set_page_size(&self, page_size: u32) -> ListResult<()> {
        let max = self.config.max_page_size;
        self.mutate(|query, _| query.set_page_size(page_size, max))
            .await
    }

    /// Reset the whole query to the resource defaults
    pub async fn clear(&self) -> ListResult<()> {
        self.mutate(|query, vocab| Ok(query.reset(vocab))).await
    }

    /// Fetch the current query again
    pub async fn refresh(&self) -> ListResult<()> {
        let ticket = Self::issue(&mut self.state.lock());
        self.run(ticket).await
    }

    async fn mutate<F>(&self, change: F) -> ListResult<()>
    where
        F: FnOnce(&mut ResourceQuery, &Vocabulary) -> ListResult<bool>,
    {
        let ticket = {
            let mut state = self.state.lock();
            let mut next = state.query.clone();
            match change(&mut next, &R::VOCABULARY) {
                Ok(true) => {
                    state.query = next;
                    Self::issue(&mut state)
                }
                Ok(false) => return Ok(()),
                Err(err) => {
                    err.log(R::VOCABULARY.resource);
                    return Err(err);
                }
            }
        };
        self.run(ticket).await
    }

    // ========================================================================
    // Fetch cycle
    // ========================================================================

    fn issue(state: &mut ListState<R::Item>) -> Ticket {
        state.issued += 1;
        state.result.status = ListStatus::Loading;
        state.result.error = None;
        Ticket {
            seq: state.issued,
            query: state.query.clone(),
        }
    }

    async fn run(&self, mut ticket: Ticket) -> ListResult<()> {
        let resource = R::VOCABULARY.resource;
        loop {
            debug!(
                resource,
                seq = ticket.seq,
                page = ticket.query.page(),
                "Fetching list page"
            );
            let outcome =
                match timeout(self.config.fetch_timeout, self.source.fetch(&ticket.query)).await {
                    Ok(Ok(page)) => Ok(page),
                    Ok(Err(err)) => Err(ListError::Remote(err)),
                    Err(_) => Err(ListError::Timeout(self.config.fetch_timeout)),
                };

            match self.apply(ticket, outcome) {
                Applied::Done(result) => return result,
                Applied::Refetch(next) => ticket = next,
            }
        }
    }

    fn apply(&self, ticket: Ticket, outcome: ListResult<Page<R::Item>>) -> Applied {
        let resource = R::VOCABULARY.resource;
        let mut state = self.state.lock();

        if ticket.seq != state.issued || ticket.query != state.query {
            debug!(
                resource,
                seq = ticket.seq,
                latest = state.issued,
                "Dropping stale list response"
            );
            return Applied::Done(Ok(()));
        }

        match outcome {
            Ok(page) => {
                let last_page = page.pagination.last_page();
                if ticket.query.page() > last_page {
                    info!(
                        resource,
                        requested = ticket.query.page(),
                        last_page,
                        "Requested page out of range, reloading first page"
                    );
                    state.query.rewind();
                    return Applied::Refetch(Self::issue(&mut state));
                }

                debug!(
                    resource,
                    seq = ticket.seq,
                    items = page.items.len(),
                    total = page.pagination.total,
                    "List page applied"
                );
                state.result = QueryResult {
                    items: page.items,
                    pagination: page.pagination,
                    fetched_for: Some(ticket.query),
                    status: ListStatus::Ready,
                    error: None,
                };
                Applied::Done(Ok(()))
            }
            Err(err) => {
                err.log(resource);
                state.result.status = ListStatus::Error;
                state.result.error = Some(ListFailure::from(&err));
                drop(state);

                self.notifier.notify(Notice::from_error(&err.to_app_error()));
                Applied::Done(Err(err))
            }
        }
    }
}

impl<R, S> ResourceListController<R, S>
where
    R: Resource,
    S: ListSource<R> + MutationSink,
{
    /// Send a write, announce `done`, then refetch the current query
    ///
    /// A failed write leaves the list untouched. After a successful write
    /// the refetch result is returned.
    pub async fn submit(&self, mutation: Mutation, done: &str) -> ListResult<()> {
        let resource = R::VOCABULARY.resource;
        debug!(resource, method = ?mutation.method, path = %mutation.path, "Sending list write");

        let outcome = match timeout(self.config.fetch_timeout, self.source.apply(&mutation)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(ListError::Remote(err)),
            Err(_) => Err(ListError::Timeout(self.config.fetch_timeout)),
        };
        if let Err(err) = outcome {
            err.log_write(resource);
            self.notifier.notify(Notice::from_error(&err.to_app_error()));
            return Err(err);
        }

        info!(resource, path = %mutation.path, "List write applied");
        self.notifier.notify(Notice::success(done));
        self.refresh().await
    }
}
