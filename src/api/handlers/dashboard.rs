use axum::Json;

use crate::api::dto::envelope::DataResponse;
use crate::api::dto::resources::DashboardStats;
use crate::api::extractors::CurrentPrincipal;

pub async fn dashboard_stats(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<DataResponse<DashboardStats>> {
    tracing::info!(subject_id = %principal.subject_id, "fetching dashboard stats");

    Json(DataResponse::ok(DashboardStats {
        total_members: 150,
        active_subscriptions: 120,
        expiring_in_7_days: 8,
        monthly_revenue: 15_000,
        revenue_growth: 12.5,
    }))
}
