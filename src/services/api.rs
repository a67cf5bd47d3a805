use crate::directory::load_page;
use crate::dto::api::{MembersQuery, MembersResponse};
use crate::repository::MemberReader;
use crate::services::ServiceResult;
use crate::services::main::query_state;

/// Returns one page of members matching the search and category filter.
pub async fn list_members<R>(repo: &R, params: MembersQuery) -> ServiceResult<MembersResponse>
where
    R: MemberReader + ?Sized,
{
    let requested = query_state(
        params.search.as_deref(),
        params.category.as_deref(),
        params.page,
    );

    let (query, result) = load_page(repo, &requested, params.pages).await?;

    Ok(MembersResponse { query, result })
}
