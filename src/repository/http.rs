//! Repository backed by the remote actor REST service.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response, Url};

use crate::domain::member::{Member, MemberPage, NewMember};
use crate::domain::types::RecordKey;
use crate::dto::remote::{ActorDto, ActorEnvelope, ActorPayload, ActorsEnvelope};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{MemberListQuery, MemberReader, MemberWriter};

/// Path prefix shared by every endpoint of the service.
const API_PREFIX: &str = "/api/v1";

#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RepositoryError::Configuration(format!(
                "base url must be http(s): {base_url:?}"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    /// `path` followed by `key` as a single percent-encoded segment.
    fn keyed_endpoint(&self, path: &str, key: &RecordKey) -> RepositoryResult<Url> {
        let mut url = Url::parse(&self.endpoint(path))
            .map_err(|err| RepositoryError::Configuration(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Configuration("base url cannot have a path".to_string()))?
            .push(key.as_str());
        Ok(url)
    }

    /// Reads the body, turning non-success statuses into errors.
    async fn read_body(response: Response) -> RepositoryResult<Vec<u8>> {
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            Ok(body.to_vec())
        } else {
            Err(RepositoryError::from_status(status.as_u16(), &body))
        }
    }

    /// Interprets a mutation response, falling back to the submitted draft
    /// when the body does not contain a record.
    fn stored_member(body: &[u8], submitted: &NewMember, key: Option<&RecordKey>) -> Member {
        match serde_json::from_slice::<ActorEnvelope>(body) {
            Ok(envelope) => {
                let dto = ActorDto::from(envelope);
                if dto.id_no.as_deref().is_none_or(str::is_empty) {
                    submitted.clone().into_member(key.cloned())
                } else {
                    Member::from(dto)
                }
            }
            Err(err) => {
                debug!("Mutation response did not contain a record: {err}");
                submitted.clone().into_member(key.cloned())
            }
        }
    }
}

#[async_trait]
impl MemberReader for HttpRepository {
    async fn list_members(&self, query: &MemberListQuery) -> RepositoryResult<MemberPage> {
        let category = query.category.map(|c| c.as_str()).unwrap_or("");
        let response = self
            .client
            .get(self.endpoint("/actors"))
            .query(&[
                ("page", query.page.to_string().as_str()),
                ("search", query.search.as_str()),
                ("category", category),
            ])
            .send()
            .await
            .map_err(|err| {
                error!("Error fetching members: {err}");
                RepositoryError::from(err)
            })?;

        let body = Self::read_body(response).await?;
        let envelope: ActorsEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.into())
    }
}

#[async_trait]
impl MemberWriter for HttpRepository {
    async fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member> {
        let response = self
            .client
            .post(self.endpoint("/admin/add-actor"))
            .json(&ActorPayload::from(new_member))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(Self::stored_member(&body, new_member, None))
    }

    async fn update_member(
        &self,
        key: &RecordKey,
        updates: &NewMember,
    ) -> RepositoryResult<Member> {
        let response = self
            .client
            .put(self.keyed_endpoint("/admin/update-actor", key)?)
            .json(&ActorPayload::for_update(updates))
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        Ok(Self::stored_member(&body, updates, Some(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_joined_under_the_api_prefix() {
        let repo = HttpRepository::new("https://actors.example.com/ ", Duration::from_secs(5))
            .unwrap();
        assert_eq!(repo.base_url(), "https://actors.example.com");
        assert_eq!(
            repo.endpoint("/actors"),
            "https://actors.example.com/api/v1/actors"
        );
    }

    #[test]
    fn record_keys_are_escaped_as_one_segment() {
        let repo = HttpRepository::new("https://actors.example.com", Duration::from_secs(5))
            .unwrap();
        let key = RecordKey::new("a/b?c#d").unwrap();

        let url = repo.keyed_endpoint("/admin/update-actor", &key).unwrap();

        assert_eq!(
            url.as_str(),
            "https://actors.example.com/api/v1/admin/update-actor/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let result = HttpRepository::new("actors.example.com", Duration::from_secs(5));
        assert!(matches!(result, Err(RepositoryError::Configuration(_))));
    }
}
