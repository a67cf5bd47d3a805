use serde::{Deserialize, Serialize};

use crate::domain::member::{Member, MemberCounts};
use crate::domain::types::Category;
use crate::forms::member::MemberForm;
use crate::pagination::Paginated;

/// Query parameters accepted by the index page service.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Optional search string entered by the user.
    pub search: Option<String>,
    /// Category filter, empty for all.
    pub category: Option<String>,
    /// Page number requested by the user interface.
    pub page: Option<usize>,
    /// Page count the pager was rendered with; bounds `page`.
    pub pages: Option<usize>,
    /// Opens the empty "Add Member" form.
    pub add: Option<bool>,
    /// Opens the edit form for the record with this key.
    pub edit: Option<String>,
}

/// Which modal form is open and with what values.
#[derive(Debug, Clone, Serialize)]
pub struct MemberModal {
    /// Record key when editing; `None` for a new member.
    pub key: Option<String>,
    pub form: MemberForm,
}

impl MemberModal {
    pub fn add(form: MemberForm) -> Self {
        Self { key: None, form }
    }

    pub fn edit(key: impl Into<String>, form: MemberForm) -> Self {
        Self {
            key: Some(key.into()),
            form,
        }
    }
}

/// Data required to render the main index template.
#[derive(Debug)]
pub struct IndexPageData {
    /// Paginated list of members to show in the table.
    pub members: Paginated<Member>,
    pub counts: MemberCounts,
    /// Search query echoed back to the template when present.
    pub search_query: Option<String>,
    pub category: Option<Category>,
    /// Set when the list could not be loaded.
    pub error: Option<String>,
    pub modal: Option<MemberModal>,
}
