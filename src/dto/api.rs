//! DTOs exposed by the directory's own JSON endpoint.

use serde::{Deserialize, Serialize};

use crate::directory::{QueryState, ResultState};

/// Query parameters accepted by `/api/v1/members`.
#[derive(Debug, Default, Deserialize)]
pub struct MembersQuery {
    /// Optional free-form search string applied to the member list.
    pub search: Option<String>,
    /// `A`, `B`, or empty for every category.
    pub category: Option<String>,
    /// Optional page number for pagination.
    pub page: Option<usize>,
    /// Last page count the caller saw; pages past it are clamped before
    /// the request goes out.
    pub pages: Option<usize>,
}

/// Result payload returned by [`crate::services::api::list_members`].
#[derive(Debug, Serialize)]
pub struct MembersResponse {
    /// The query actually served, page clamped.
    pub query: QueryState,
    #[serde(flatten)]
    pub result: ResultState,
}
