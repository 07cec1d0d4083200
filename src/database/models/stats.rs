use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_events: usize,
    pub open_events: usize,
    pub total_registrations: usize,
    pub attended_registrations: usize,
    pub total_users: usize,
    pub pending_users: usize,
    pub onboarding_users: usize,
    pub active_users: usize,
    pub admins: usize,
    pub total_messages: usize,
    pub unread_messages: usize,
    pub total_resources: usize,
    pub total_team_members: usize,
}
