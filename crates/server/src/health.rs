use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use flack_slack::DeliveryQueue;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    delivery: DeliveryQueue,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub delivery: HealthCheck,
    pub checked_at: String,
}

pub fn router(delivery: DeliveryQueue) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { delivery })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let delivery = delivery_check(&state.delivery);
    let ready = delivery.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "flack-server accepting slack callbacks".to_string(),
        },
        delivery,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn delivery_check(queue: &DeliveryQueue) -> HealthCheck {
    if queue.is_closed() {
        HealthCheck { status: "degraded", detail: "delivery worker has stopped".to_string() }
    } else {
        HealthCheck {
            status: "ready",
            detail: format!("delivery worker running, {} pending", queue.pending()),
        }
    }
}
