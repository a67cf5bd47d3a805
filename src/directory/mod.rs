//! Query/result state of the member directory and the rules that move it.
//!
//! [`Directory`] owns both halves of the state and only changes through
//! [`Directory::update`], which returns the fetch that has to be issued, if
//! any. Every fetch carries a sequence number and only the response to the
//! latest one is ever applied.

use log::{debug, warn};
use serde::Serialize;

use crate::domain::member::{Member, MemberCounts, MemberPage};
use crate::domain::types::Category;
use crate::pagination::clamp_page;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{MemberListQuery, MemberReader};

pub mod console;
pub mod controller;
pub mod debounce;
pub mod text;

pub use controller::{DirectoryHandle, DirectoryOptions, spawn};
pub use debounce::Debouncer;

/// What the user is currently asking to see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub search: String,
    pub category: Option<Category>,
    /// 1-indexed.
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            page: 1,
        }
    }
}

impl QueryState {
    /// Returns a copy whose page lies in `[1, total_pages]`.
    pub fn clamped(&self, total_pages: Option<usize>) -> Self {
        Self {
            page: clamp_page(self.page, total_pages.unwrap_or(1)),
            ..self.clone()
        }
    }

    pub fn to_list_query(&self) -> MemberListQuery {
        MemberListQuery::new(self.page)
            .search(self.search.trim())
            .category(self.category)
    }
}

/// The most recently applied response, plus loading and error flags.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultState {
    pub members: Vec<Member>,
    pub counts: MemberCounts,
    pub total_pages: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ResultState {
    fn default() -> Self {
        Self::from_page(MemberPage::default())
    }
}

impl ResultState {
    fn from_page(page: MemberPage) -> Self {
        Self {
            members: page.members,
            counts: page.counts,
            total_pages: page.total_pages.max(1),
            loading: false,
            error: None,
        }
    }

    /// Failure clears everything that was shown, aggregates included, so the
    /// counts never describe a list that is no longer on screen.
    pub fn failed(error: &RepositoryError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Inputs accepted by [`Directory::update`].
#[derive(Debug)]
pub enum DirectoryEvent {
    /// The debounced search text settled on a new value.
    SearchSettled(String),
    CategorySelected(Option<Category>),
    PageRequested(usize),
    NextPage,
    PreviousPage,
    /// Re-fetch the current query, e.g. after a successful mutation.
    Refresh,
    PageLoaded {
        seq: u64,
        outcome: RepositoryResult<MemberPage>,
    },
}

/// A fetch the caller must run and report back as [`DirectoryEvent::PageLoaded`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: QueryState,
}

#[derive(Debug, Default)]
pub struct Directory {
    query: QueryState,
    result: ResultState,
    /// Page count from the last successful response.
    known_total_pages: Option<usize>,
    /// Sequence number of the latest issued fetch; 0 before the first one.
    latest_seq: u64,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn result(&self) -> &ResultState {
        &self.result
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn update(&mut self, event: DirectoryEvent) -> Option<FetchTicket> {
        match event {
            DirectoryEvent::SearchSettled(search) => {
                if search == self.query.search {
                    return None;
                }
                self.query.search = search;
                self.query.page = 1;
                Some(self.issue())
            }
            DirectoryEvent::CategorySelected(category) => {
                if category == self.query.category {
                    return None;
                }
                self.query.category = category;
                self.query.page = 1;
                Some(self.issue())
            }
            DirectoryEvent::PageRequested(page) => self.go_to(page),
            DirectoryEvent::NextPage => self.go_to(self.query.page.saturating_add(1)),
            DirectoryEvent::PreviousPage => self.go_to(self.query.page.saturating_sub(1)),
            DirectoryEvent::Refresh => Some(self.issue()),
            DirectoryEvent::PageLoaded { seq, outcome } => self.apply(seq, outcome),
        }
    }

    fn go_to(&mut self, page: usize) -> Option<FetchTicket> {
        let page = clamp_page(page, self.known_total_pages.unwrap_or(1));
        if page == self.query.page {
            return None;
        }
        self.query.page = page;
        Some(self.issue())
    }

    fn issue(&mut self) -> FetchTicket {
        self.query = self.query.clamped(self.known_total_pages);
        self.latest_seq += 1;
        self.result.loading = true;
        FetchTicket {
            seq: self.latest_seq,
            query: self.query.clone(),
        }
    }

    fn apply(&mut self, seq: u64, outcome: RepositoryResult<MemberPage>) -> Option<FetchTicket> {
        if seq != self.latest_seq {
            debug!(
                "Discarding stale response #{seq}, latest is #{}",
                self.latest_seq
            );
            return None;
        }

        match outcome {
            Ok(page) => {
                self.result = ResultState::from_page(page);
                let total_pages = self.result.total_pages;
                self.known_total_pages = Some(total_pages);
                if self.query.page > total_pages {
                    debug!(
                        "Page {} is past the last page {total_pages}, reloading",
                        self.query.page
                    );
                    self.query.page = total_pages;
                    return Some(self.issue());
                }
                None
            }
            Err(err) => {
                warn!("Error fetching members: {err}");
                self.result = ResultState::failed(&err);
                self.known_total_pages = None;
                None
            }
        }
    }
}

/// One-shot fetch for callers that keep no state between requests.
///
/// The page is clamped against `known_total_pages` when given and always
/// kept at or above 1. When the server reports fewer pages than requested,
/// the last page is fetched instead. Returns the query actually served.
pub async fn load_page<R>(
    repo: &R,
    query: &QueryState,
    known_total_pages: Option<usize>,
) -> Result<(QueryState, ResultState), RepositoryError>
where
    R: MemberReader + ?Sized,
{
    let mut query = query.clamped(known_total_pages.or(Some(query.page)));
    let mut page = repo.list_members(&query.to_list_query()).await?;

    let total_pages = page.total_pages.max(1);
    if query.page > total_pages {
        debug!(
            "Page {} is past the last page {total_pages}, reloading",
            query.page
        );
        query.page = total_pages;
        page = repo.list_members(&query.to_list_query()).await?;
    }

    Ok((query, ResultState::from_page(page)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::Member;

    fn page_of(names: &[&str], total_pages: usize) -> MemberPage {
        MemberPage {
            members: names
                .iter()
                .map(|name| Member {
                    full_name: name.to_string(),
                    ..Member::default()
                })
                .collect(),
            counts: MemberCounts {
                total: names.len(),
                ..MemberCounts::default()
            },
            total_pages,
        }
    }

    fn loaded(directory: &mut Directory, ticket: FetchTicket, page: MemberPage) {
        let follow_up = directory.update(DirectoryEvent::PageLoaded {
            seq: ticket.seq,
            outcome: Ok(page),
        });
        assert_eq!(follow_up, None);
    }

    #[test]
    fn refresh_sets_loading_until_response() {
        let mut directory = Directory::new();
        let ticket = directory.update(DirectoryEvent::Refresh).unwrap();

        assert!(directory.result().loading);
        assert_eq!(ticket.query, QueryState::default());

        loaded(&mut directory, ticket, page_of(&["Alice", "Bob"], 1));
        assert!(!directory.result().loading);
        assert_eq!(directory.result().members.len(), 2);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut directory = Directory::new();
        let first = directory.update(DirectoryEvent::Refresh).unwrap();
        loaded(&mut directory, first, page_of(&["a"], 3));

        let page_one = directory.update(DirectoryEvent::Refresh).unwrap();
        let page_two = directory.update(DirectoryEvent::PageRequested(2)).unwrap();
        assert_eq!(page_two.query.page, 2);

        loaded(&mut directory, page_two, page_of(&["page two"], 3));
        let ignored = directory.update(DirectoryEvent::PageLoaded {
            seq: page_one.seq,
            outcome: Ok(page_of(&["page one"], 3)),
        });

        assert_eq!(ignored, None);
        assert_eq!(directory.result().members[0].full_name, "page two");
        assert_eq!(directory.query().page, 2);
    }

    #[test]
    fn page_requests_are_clamped() {
        let mut directory = Directory::new();

        assert_eq!(directory.update(DirectoryEvent::PageRequested(5)), None);
        assert_eq!(directory.update(DirectoryEvent::PageRequested(0)), None);

        let ticket = directory.update(DirectoryEvent::Refresh).unwrap();
        loaded(&mut directory, ticket, page_of(&[], 3));

        let ticket = directory.update(DirectoryEvent::PageRequested(9)).unwrap();
        assert_eq!(ticket.query.page, 3);
        loaded(&mut directory, ticket, page_of(&[], 3));

        assert_eq!(directory.update(DirectoryEvent::NextPage), None);
        let ticket = directory.update(DirectoryEvent::PageRequested(0)).unwrap();
        assert_eq!(ticket.query.page, 1);
    }

    #[test]
    fn filter_changes_reset_to_first_page() {
        let mut directory = Directory::new();
        let ticket = directory.update(DirectoryEvent::Refresh).unwrap();
        loaded(&mut directory, ticket, page_of(&[], 4));
        let ticket = directory.update(DirectoryEvent::PageRequested(3)).unwrap();
        loaded(&mut directory, ticket, page_of(&[], 4));

        let ticket = directory
            .update(DirectoryEvent::CategorySelected(Some(Category::B)))
            .unwrap();
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.category, Some(Category::B));

        assert_eq!(
            directory.update(DirectoryEvent::CategorySelected(Some(Category::B))),
            None
        );

        let ticket = directory
            .update(DirectoryEvent::SearchSettled("car".to_string()))
            .unwrap();
        assert_eq!(ticket.query.search, "car");
        assert_eq!(ticket.query.to_list_query().category, Some(Category::B));
    }

    #[test]
    fn shrinking_result_reloads_last_page() {
        let mut directory = Directory::new();
        let ticket = directory.update(DirectoryEvent::Refresh).unwrap();
        loaded(&mut directory, ticket, page_of(&[], 5));
        let ticket = directory.update(DirectoryEvent::PageRequested(5)).unwrap();

        let follow_up = directory
            .update(DirectoryEvent::PageLoaded {
                seq: ticket.seq,
                outcome: Ok(page_of(&[], 2)),
            })
            .unwrap();

        assert_eq!(follow_up.query.page, 2);
        assert!(directory.result().loading);
    }

    #[test]
    fn failure_clears_result_state() {
        let mut directory = Directory::new();
        let ticket = directory.update(DirectoryEvent::Refresh).unwrap();
        loaded(&mut directory, ticket, page_of(&["Alice", "Bob"], 2));

        let ticket = directory.update(DirectoryEvent::Refresh).unwrap();
        directory.update(DirectoryEvent::PageLoaded {
            seq: ticket.seq,
            outcome: Err(RepositoryError::Status {
                status: 500,
                message: None,
            }),
        });

        let result = directory.result();
        assert!(result.members.is_empty());
        assert_eq!(result.counts, MemberCounts::default());
        assert_eq!(result.total_pages, 1);
        assert!(!result.loading);
        assert!(result.error.as_deref().unwrap().contains("500"));
    }
}
