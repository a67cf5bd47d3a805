use log::error;

use crate::domain::member::{Member, NewMember};
use crate::domain::types::RecordKey;
use crate::forms::member::MemberForm;
use crate::repository::MemberWriter;
use crate::services::{ServiceError, ServiceResult};

/// Validates the add-member form and creates the record remotely.
pub async fn create_member<R>(repo: &R, form: MemberForm) -> ServiceResult<Member>
where
    R: MemberWriter + ?Sized,
{
    let new_member = NewMember::try_from(form).map_err(|err| {
        error!("Failed to validate form: {err}");
        ServiceError::from(err)
    })?;

    repo.create_member(&new_member).await.map_err(|err| {
        error!("Failed to process member: {err}");
        ServiceError::from(err)
    })
}

/// Validates the edit form and saves it over the record at `key`.
pub async fn update_member<R>(repo: &R, key: &str, form: MemberForm) -> ServiceResult<Member>
where
    R: MemberWriter + ?Sized,
{
    let key = RecordKey::new(key)?;
    let updates = NewMember::try_from(form).map_err(|err| {
        error!("Failed to validate form: {err}");
        ServiceError::from(err)
    })?;

    repo.update_member(&key, &updates).await.map_err(|err| {
        error!("Failed to process member: {err}");
        ServiceError::from(err)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::Category;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn carol_form() -> MemberForm {
        MemberForm {
            id_no: "M3".to_string(),
            full_name: "Carol".to_string(),
            phone_number: "555-0103".to_string(),
            category: "A".to_string(),
            dob: "2000-01-01".to_string(),
            ..MemberForm::default()
        }
    }

    #[tokio::test]
    async fn create_sends_validated_member() {
        let mut repo = MockRepository::new();
        repo.expect_create_member()
            .withf(|m| {
                m.id_no.as_str() == "M3"
                    && m.category == Category::A
                    && m.dob.is_some_and(|d| d.to_string() == "2000-01-01")
            })
            .times(1)
            .returning(|m| Ok(m.clone().into_member(None)));

        let member = create_member(&repo, carol_form()).await.expect("created");

        assert_eq!(member.full_name, "Carol");
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_repository() {
        let mut repo = MockRepository::new();
        repo.expect_create_member().times(0);
        let form = MemberForm {
            phone_number: String::new(),
            ..carol_form()
        };

        let result = create_member(&repo, form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn update_targets_record_key() {
        let mut repo = MockRepository::new();
        repo.expect_update_member()
            .withf(|key, m| key.as_str() == "k3" && m.full_name.as_str() == "Carol")
            .times(1)
            .returning(|key, m| Ok(m.clone().into_member(Some(key.clone()))));

        let member = update_member(&repo, "k3", carol_form())
            .await
            .expect("updated");

        assert_eq!(member.key.as_ref().map(|k| k.as_str()), Some("k3"));
    }

    #[tokio::test]
    async fn update_surfaces_server_message() {
        let mut repo = MockRepository::new();
        repo.expect_update_member().returning(|_, _| {
            Err(RepositoryError::Status {
                status: 404,
                message: Some("actor not found".to_string()),
            })
        });

        let err = update_member(&repo, "k9", carol_form()).await.unwrap_err();

        assert_eq!(err.to_string(), "Server responded with 404: actor not found");
    }

    #[tokio::test]
    async fn blank_key_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_update_member().times(0);

        let result = update_member(&repo, "  ", carol_form()).await;

        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }
}
