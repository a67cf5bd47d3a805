use log::{error, warn};

use crate::directory::{QueryState, ResultState, load_page};
use crate::domain::types::Category;
use crate::dto::main::{IndexPageData, MemberModal};
pub use crate::dto::main::IndexQuery;
use crate::forms::member::MemberForm;
use crate::pagination::Paginated;
use crate::repository::MemberReader;

/// Builds the directory query from raw request parameters.
///
/// Blank or unknown categories mean "all categories"; the page is clamped
/// to at least 1.
pub fn query_state(search: Option<&str>, category: Option<&str>, page: Option<usize>) -> QueryState {
    let category = category.unwrap_or_default();
    let category = Category::parse_filter(category).unwrap_or_else(|err| {
        warn!("Ignoring category filter: {err}");
        None
    });

    QueryState {
        search: search.map(str::trim).unwrap_or_default().to_string(),
        category,
        page: page.unwrap_or(1).max(1),
    }
}

/// Loads the members page for the main index page.
///
/// `query.pages`, when present, bounds the page before it is sent.
/// A failed fetch still renders: the error is carried in
/// [`IndexPageData::error`] next to an empty table. `modal` overrides the
/// form opened through the `add`/`edit` parameters.
pub async fn load_index_page<R>(
    repo: &R,
    query: &IndexQuery,
    modal: Option<MemberModal>,
) -> IndexPageData
where
    R: MemberReader + ?Sized,
{
    let requested = query_state(
        query.search.as_deref(),
        query.category.as_deref(),
        query.page,
    );

    let (served, result) = match load_page(repo, &requested, query.pages).await {
        Ok(loaded) => loaded,
        Err(err) => {
            error!("Error fetching members: {err}");
            let result = ResultState::failed(&err);
            (requested, result)
        }
    };

    let modal = modal.or_else(|| requested_modal(query, &result));
    let search_query = Some(served.search.clone()).filter(|s| !s.is_empty());

    IndexPageData {
        members: Paginated::new(result.members, served.page, result.total_pages),
        counts: result.counts,
        search_query,
        category: served.category,
        error: result.error,
        modal,
    }
}

fn requested_modal(query: &IndexQuery, result: &ResultState) -> Option<MemberModal> {
    if let Some(key) = query.edit.as_deref().filter(|k| !k.is_empty()) {
        let member = result
            .members
            .iter()
            .find(|m| m.record_key().is_some_and(|k| k.as_str() == key));
        return match member {
            Some(member) => Some(MemberModal::edit(key, MemberForm::from_member(member))),
            None => {
                warn!("Member {key} is not on the current page, not opening the editor");
                None
            }
        };
    }

    query
        .add
        .unwrap_or(false)
        .then(|| MemberModal::add(MemberForm::default()))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::member::{Member, MemberCounts, MemberPage};
    use crate::domain::types::RecordKey;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn member(key: &str, id_no: &str, name: &str) -> Member {
        Member {
            key: Some(RecordKey::new(key).expect("valid key")),
            id_no: id_no.to_string(),
            full_name: name.to_string(),
            category: Some(Category::A),
            ..Member::default()
        }
    }

    fn two_member_page() -> MemberPage {
        MemberPage {
            members: vec![member("k1", "M1", "Alice"), member("k2", "M2", "Bob")],
            counts: MemberCounts {
                category_a: 2,
                category_b: 0,
                total: 2,
            },
            total_pages: 1,
        }
    }

    #[test]
    fn query_state_normalizes_parameters() {
        let state = query_state(Some("  ali "), Some("b"), Some(0));
        assert_eq!(state.search, "ali");
        assert_eq!(state.category, Some(Category::B));
        assert_eq!(state.page, 1);

        let state = query_state(None, Some("Z"), None);
        assert_eq!(state.category, None);
    }

    #[tokio::test]
    async fn index_passes_filters_to_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_members()
            .withf(|q| q.page == 1 && q.search == "ali" && q.category == Some(Category::A))
            .times(1)
            .returning(|_| Ok(two_member_page()));

        let query = IndexQuery {
            search: Some(" ali".to_string()),
            category: Some("A".to_string()),
            ..IndexQuery::default()
        };
        let data = load_index_page(&repo, &query, None).await;

        assert_eq!(data.members.items.len(), 2);
        assert_eq!(data.counts.total, 2);
        assert_eq!(data.search_query.as_deref(), Some("ali"));
        assert!(data.error.is_none());
        assert!(data.modal.is_none());
    }

    #[tokio::test]
    async fn index_renders_error_with_empty_table() {
        let mut repo = MockRepository::new();
        repo.expect_list_members().times(1).returning(|_| {
            Err(RepositoryError::Status {
                status: 500,
                message: Some("database offline".to_string()),
            })
        });

        let data = load_index_page(&repo, &IndexQuery::default(), None).await;

        assert!(data.members.items.is_empty());
        assert_eq!(data.counts, MemberCounts::default());
        assert_eq!(data.members.total_pages, 1);
        assert_eq!(
            data.error.as_deref(),
            Some("Server responded with 500: database offline")
        );
    }

    #[tokio::test]
    async fn known_page_count_clamps_before_sending() {
        let mut repo = MockRepository::new();
        repo.expect_list_members()
            .withf(|q| q.page == 3)
            .times(1)
            .returning(|_| {
                Ok(MemberPage {
                    total_pages: 3,
                    ..MemberPage::default()
                })
            });

        let query = IndexQuery {
            page: Some(9),
            pages: Some(3),
            ..IndexQuery::default()
        };
        let data = load_index_page(&repo, &query, None).await;

        assert_eq!(data.members.page, 3);
        assert_eq!(data.members.total_pages, 3);
    }

    #[tokio::test]
    async fn edit_parameter_prefills_the_form() {
        let mut repo = MockRepository::new();
        repo.expect_list_members()
            .returning(|_| Ok(two_member_page()));

        let query = IndexQuery {
            edit: Some("k2".to_string()),
            ..IndexQuery::default()
        };
        let data = load_index_page(&repo, &query, None).await;

        let modal = data.modal.expect("editor should be open");
        assert_eq!(modal.key.as_deref(), Some("k2"));
        assert_eq!(modal.form.full_name, "Bob");
    }

    #[tokio::test]
    async fn unknown_edit_key_keeps_modal_closed() {
        let mut repo = MockRepository::new();
        repo.expect_list_members()
            .returning(|_| Ok(two_member_page()));

        let query = IndexQuery {
            edit: Some("missing".to_string()),
            ..IndexQuery::default()
        };
        let data = load_index_page(&repo, &query, None).await;

        assert!(data.modal.is_none());
    }
}
