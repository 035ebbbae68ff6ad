use axum::Json;

use crate::api::dto::envelope::DataResponse;
use crate::api::dto::resources::PlanResponse;

pub async fn list_plans() -> Json<DataResponse<Vec<PlanResponse>>> {
    Json(DataResponse::ok(vec![
        PlanResponse {
            id: "1".to_string(),
            name: "Basic".to_string(),
            price: 50,
            duration_days: 30,
            description: "Basic gym membership".to_string(),
        },
        PlanResponse {
            id: "2".to_string(),
            name: "Premium".to_string(),
            price: 100,
            duration_days: 30,
            description: "Premium gym membership".to_string(),
        },
    ]))
}
