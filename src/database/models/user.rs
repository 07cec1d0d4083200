use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum UserRole {
        #[default]
        Member => "member",
        Admin => "admin",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum AccountStatus {
        #[default]
        Pending => "pending",
        Onboarding => "onboarding",
        Active => "active",
    }
}

/// Profile document in `users`, keyed by uid. Credentials live elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub email_verified: bool,
    pub phone: Option<String>,
    pub roll_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(id: String, email: String, name: String) -> Self {
        Self {
            id,
            email,
            name,
            role: UserRole::Member,
            status: AccountStatus::Pending,
            email_verified: false,
            phone: None,
            roll_number: None,
            department: None,
            year: None,
            avatar_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin && self.status == AccountStatus::Active
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub name: String,
    pub phone: Option<String>,
    pub roll_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProfilePatch {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccessUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RoleInput {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: AccountStatus,
}
