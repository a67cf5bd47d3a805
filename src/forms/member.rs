use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::member::{Member, NewMember};
use crate::domain::types::{
    BirthDate, Category, MemberIdNo, MemberName, MemberPhone, PresentAddress,
};
use crate::forms::FormError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
/// Form data for adding a member or saving an edited one.
///
/// Only the fields the page marks as required are validated here; the rest
/// is forwarded for the remote service to judge.
pub struct MemberForm {
    /// Identification number.
    #[validate(length(min = 1))]
    pub id_no: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub present_address: String,
    /// `A` or `B`.
    #[validate(length(min = 1))]
    pub category: String,
    /// `YYYY-MM-DD` from a date input, or an ISO timestamp.
    #[serde(default)]
    pub dob: String,
}

impl MemberForm {
    /// Prefills the form from the record being edited.
    pub fn from_member(member: &Member) -> Self {
        Self {
            id_no: member.id_no.clone(),
            full_name: member.full_name.clone(),
            phone_number: member.phone_number.clone(),
            blood_group: member.blood_group.clone().unwrap_or_default(),
            present_address: member.present_address.clone().unwrap_or_default(),
            category: member
                .category
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            dob: member.dob.map(|d| d.to_string()).unwrap_or_default(),
        }
    }
}

impl TryFrom<MemberForm> for NewMember {
    type Error = FormError;

    fn try_from(form: MemberForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let id_no = MemberIdNo::new(form.id_no).map_err(|_| FormError::InvalidIdNo)?;
        let full_name = MemberName::new(form.full_name).map_err(|_| FormError::InvalidName)?;
        let phone_number =
            MemberPhone::new(form.phone_number).map_err(|_| FormError::InvalidPhoneNumber)?;
        let category = form
            .category
            .parse::<Category>()
            .map_err(|_| FormError::InvalidCategory)?;
        let dob = BirthDate::parse_optional(&form.dob).map_err(|_| FormError::InvalidDateOfBirth)?;

        Ok(NewMember::new(id_no, full_name, phone_number, category)
            .blood_group(Some(form.blood_group))
            .present_address(PresentAddress::parse(form.present_address))
            .dob(dob))
    }
}
