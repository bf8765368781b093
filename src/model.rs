//! Entity records as returned by the backend (camelCase JSON).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    InPlanning,
    Active,
    Complete,
    OnHold,
    Deprecated,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::InPlanning,
        Status::Active,
        Status::Complete,
        Status::OnHold,
        Status::Deprecated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InPlanning => "IN_PLANNING",
            Status::Active => "ACTIVE",
            Status::Complete => "COMPLETE",
            Status::OnHold => "ON_HOLD",
            Status::Deprecated => "DEPRECATED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::InPlanning => "In Planning",
            Status::Active => "Active",
            Status::Complete => "Complete",
            Status::OnHold => "On Hold",
            Status::Deprecated => "Deprecated",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssayTypeRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorRef {
    pub id: i64,
    #[serde(default)]
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRef {
    pub id: i64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub program: Option<ProgramRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub program: Option<ProgramRef>,
    #[serde(default)]
    pub legacy: bool,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub collaborator: Option<CollaboratorRef>,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub users: Vec<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assay {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub assay_type: Option<AssayTypeRef>,
    #[serde(default)]
    pub study: Option<StudyRef>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub users: Vec<UserRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssayType {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

// участник: владелец или член команды
pub(crate) fn is_member(owner: Option<&UserRef>, users: &[UserRef], user_id: i64) -> bool {
    owner.is_some_and(|o| o.id == user_id) || users.iter().any(|u| u.id == user_id)
}
