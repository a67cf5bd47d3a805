use async_trait::async_trait;

use crate::domain::member::{Member, MemberPage, NewMember};
use crate::domain::types::{Category, RecordKey};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

pub use http::HttpRepository;

/// Parameters of one `GET /actors` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberListQuery {
    pub page: usize,
    pub search: String,
    pub category: Option<Category>,
}

impl MemberListQuery {
    pub fn new(page: usize) -> Self {
        Self {
            page: page.max(1),
            search: String::new(),
            category: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }
}

#[async_trait]
pub trait MemberReader {
    async fn list_members(&self, query: &MemberListQuery) -> RepositoryResult<MemberPage>;
}

#[async_trait]
pub trait MemberWriter {
    async fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
    /// Saves `updates` over the record at `key`. The stored id number is
    /// kept whatever `updates.id_no` holds.
    async fn update_member(&self, key: &RecordKey, updates: &NewMember)
    -> RepositoryResult<Member>;
}
