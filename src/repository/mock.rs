//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::member::{Member, MemberPage, NewMember};
use crate::domain::types::RecordKey;
use crate::repository::errors::RepositoryResult;
use crate::repository::{MemberListQuery, MemberReader, MemberWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl MemberReader for Repository {
        async fn list_members(&self, query: &MemberListQuery) -> RepositoryResult<MemberPage>;
    }

    #[async_trait]
    impl MemberWriter for Repository {
        async fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
        async fn update_member(
            &self,
            key: &RecordKey,
            updates: &NewMember,
        ) -> RepositoryResult<Member>;
    }
}
