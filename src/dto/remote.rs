//! Wire shapes of the remote actor API.
//!
//! Every field is defaulted: the service is known to omit aggregates and
//! record fields, and a partial response must still render.

use serde::{Deserialize, Serialize};

use crate::domain::member::{Member, MemberCounts, MemberPage, NewMember};
use crate::domain::types::{BirthDate, Category, RecordKey};

/// Body of `GET /actors`.
#[derive(Debug, Default, Deserialize)]
pub struct ActorsEnvelope {
    #[serde(default)]
    pub data: Option<ActorsData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorsData {
    #[serde(default)]
    pub actor: Option<Vec<ActorDto>>,
    #[serde(default, rename = "categoryACount")]
    pub category_a_count: Option<usize>,
    #[serde(default, rename = "categoryBCount")]
    pub category_b_count: Option<usize>,
    #[serde(default)]
    pub total_actor: Option<usize>,
    #[serde(default)]
    pub total_page: Option<usize>,
}

/// A member record exactly as the service stores it.
///
/// Any field may be absent or `null`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorDto {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub id_no: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub category: Option<String>,
    pub dob: Option<String>,
}

/// Body of `POST /admin/add-actor` and `PUT /admin/update-actor/{key}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorPayload<'a> {
    /// Left out of updates: the id number of a stored record never changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_no: Option<&'a str>,
    pub full_name: &'a str,
    pub phone_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_address: Option<&'a str>,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<BirthDate>,
}

/// Success body of a mutation: either wrapped in `data` or the bare record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActorEnvelope {
    Wrapped { data: ActorDto },
    Bare(ActorDto),
}

/// Error body returned by the service on non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

impl From<ActorsEnvelope> for MemberPage {
    fn from(envelope: ActorsEnvelope) -> Self {
        let data = envelope.data.unwrap_or_default();
        Self {
            members: data
                .actor
                .unwrap_or_default()
                .into_iter()
                .map(Member::from)
                .collect(),
            counts: MemberCounts {
                category_a: data.category_a_count.unwrap_or(0),
                category_b: data.category_b_count.unwrap_or(0),
                total: data.total_actor.unwrap_or(0),
            },
            total_pages: data.total_page.unwrap_or(1).max(1),
        }
    }
}

impl From<ActorDto> for Member {
    fn from(dto: ActorDto) -> Self {
        let non_blank = |value: Option<String>| value.filter(|s| !s.trim().is_empty());
        Self {
            key: dto.key.and_then(|k| RecordKey::new(k).ok()),
            id_no: dto.id_no.unwrap_or_default(),
            full_name: dto.full_name.unwrap_or_default(),
            phone_number: dto.phone_number.unwrap_or_default(),
            blood_group: non_blank(dto.blood_group),
            present_address: non_blank(dto.present_address),
            category: dto.category.and_then(|c| c.parse().ok()),
            dob: dto
                .dob
                .and_then(|d| BirthDate::parse_optional(&d).ok().flatten()),
        }
    }
}

impl From<ActorEnvelope> for ActorDto {
    fn from(envelope: ActorEnvelope) -> Self {
        match envelope {
            ActorEnvelope::Wrapped { data } => data,
            ActorEnvelope::Bare(dto) => dto,
        }
    }
}

impl<'a> ActorPayload<'a> {
    /// Payload for `update-actor`, which must not touch the id number.
    pub fn for_update(member: &'a NewMember) -> Self {
        Self {
            id_no: None,
            ..Self::from(member)
        }
    }
}

impl<'a> From<&'a NewMember> for ActorPayload<'a> {
    fn from(member: &'a NewMember) -> Self {
        Self {
            id_no: Some(member.id_no.as_str()),
            full_name: member.full_name.as_str(),
            phone_number: member.phone_number.as_str(),
            blood_group: member.blood_group.as_deref(),
            present_address: member.present_address.as_ref().map(|a| a.as_str()),
            category: member.category,
            dob: member.dob,
        }
    }
}
