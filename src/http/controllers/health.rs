use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::App;

#[tracing::instrument(skip_all, name = "http.health")]
pub async fn check(app: web::Data<App>) -> HttpResponse {
  if app.store().is_healthy() {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
  } else {
    HttpResponse::ServiceUnavailable().json(json!({ "status": "unhealthy" }))
  }
}
