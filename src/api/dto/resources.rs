use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub join_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Validated form of `CreateMemberRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl CreateMemberRequest {
    /// Returns `None` if any field is missing or blank.
    pub fn validate(self) -> Option<NewMember> {
        fn present(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }

        Some(NewMember {
            full_name: present(self.full_name)?,
            email: present(self.email)?,
            phone: present(self.phone)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: u32,
    pub active_subscriptions: u32,
    pub expiring_in_7_days: u32,
    pub monthly_revenue: u64,
    pub revenue_growth: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub duration_days: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub member_name: String,
    pub email: String,
    pub phone: String,
    pub plan_name: String,
    pub plan_price: u32,
    pub start_date: String,
    pub expiry_date: String,
    pub status: String,
    pub days_remaining: i32,
}
