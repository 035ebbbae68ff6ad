use axum::Json;

use crate::api::dto::envelope::DataResponse;
use crate::api::dto::resources::SubscriptionResponse;

pub async fn list_subscriptions() -> Json<DataResponse<Vec<SubscriptionResponse>>> {
    Json(DataResponse::ok(vec![SubscriptionResponse {
        id: "1".to_string(),
        user_id: "1".to_string(),
        plan_id: "1".to_string(),
        member_name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: "1234567890".to_string(),
        plan_name: "Basic".to_string(),
        plan_price: 50,
        start_date: "2024-01-15".to_string(),
        expiry_date: "2024-02-15".to_string(),
        status: "active".to_string(),
        days_remaining: 10,
    }]))
}
