use serde::{Deserialize, Serialize};

use crate::domain::types::{
    BirthDate, Category, MemberIdNo, MemberName, MemberPhone, PresentAddress, RecordKey,
};

/// Member record as held by the client for the page currently displayed.
///
/// The authoritative copy lives on the remote service, so reading is
/// lenient: fields the server left out stay empty instead of failing the
/// whole page.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Member {
    /// Server-assigned record key used to address updates.
    pub key: Option<RecordKey>,
    pub id_no: String,
    pub full_name: String,
    pub phone_number: String,
    pub blood_group: Option<String>,
    pub present_address: Option<String>,
    pub category: Option<Category>,
    pub dob: Option<BirthDate>,
}

impl Member {
    /// Key used for `update-actor`: the server key, or the id number for
    /// records that never received one.
    pub fn record_key(&self) -> Option<RecordKey> {
        self.key
            .clone()
            .or_else(|| RecordKey::new(self.id_no.as_str()).ok())
    }
}

/// Aggregates reported by the server alongside each page.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MemberCounts {
    pub category_a: usize,
    pub category_b: usize,
    pub total: usize,
}

/// One server-side page of members plus the aggregates describing it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MemberPage {
    pub members: Vec<Member>,
    pub counts: MemberCounts,
    /// Always at least one, even for an empty directory.
    pub total_pages: usize,
}

impl Default for MemberPage {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            counts: MemberCounts::default(),
            total_pages: 1,
        }
    }
}

/// Validated member data ready to be created or used as an update.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMember {
    pub id_no: MemberIdNo,
    pub full_name: MemberName,
    pub phone_number: MemberPhone,
    pub blood_group: Option<String>,
    pub present_address: Option<PresentAddress>,
    pub category: Category,
    pub dob: Option<BirthDate>,
}

impl NewMember {
    #[must_use]
    pub fn new(
        id_no: MemberIdNo,
        full_name: MemberName,
        phone_number: MemberPhone,
        category: Category,
    ) -> Self {
        Self {
            id_no,
            full_name,
            phone_number,
            blood_group: None,
            present_address: None,
            category,
            dob: None,
        }
    }

    #[must_use]
    pub fn blood_group(mut self, blood_group: Option<String>) -> Self {
        self.blood_group = blood_group
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn present_address(mut self, address: Option<PresentAddress>) -> Self {
        self.present_address = address;
        self
    }

    #[must_use]
    pub fn dob(mut self, dob: Option<BirthDate>) -> Self {
        self.dob = dob;
        self
    }

    /// The member as it would be displayed, used when the server does not
    /// echo the stored record back.
    pub fn into_member(self, key: Option<RecordKey>) -> Member {
        Member {
            key,
            id_no: self.id_no.into_inner(),
            full_name: self.full_name.into_inner(),
            phone_number: self.phone_number.into_inner(),
            blood_group: self.blood_group,
            present_address: self.present_address.map(|a| a.as_str().to_string()),
            category: Some(self.category),
            dob: self.dob,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carol() -> NewMember {
        NewMember::new(
            MemberIdNo::new("M3").unwrap(),
            MemberName::new("Carol").unwrap(),
            MemberPhone::new("555-0103").unwrap(),
            Category::A,
        )
    }

    #[test]
    fn blood_group_is_normalized() {
        let member = carol().blood_group(Some(" o+ ".to_string()));
        assert_eq!(member.blood_group.as_deref(), Some("O+"));

        let member = carol().blood_group(Some("  ".to_string()));
        assert_eq!(member.blood_group, None);
    }

    #[test]
    fn record_key_falls_back_to_id_number() {
        let member = carol().into_member(None);
        assert_eq!(member.record_key().unwrap().as_str(), "M3");

        let keyed = carol().into_member(Some(RecordKey::new("66f0a1").unwrap()));
        assert_eq!(keyed.record_key().unwrap().as_str(), "66f0a1");
    }

    #[test]
    fn empty_page_reports_a_single_page() {
        assert_eq!(MemberPage::default().total_pages, 1);
    }
}
