use actix_web::{web, HttpResponse};

use crate::{error::Error, services::GetLeaderboard, App};

#[tracing::instrument(skip_all, name = "http.leaderboard.get")]
pub async fn get(app: web::Data<App>) -> Result<HttpResponse, Error> {
  let entries = GetLeaderboard.perform(&app).await?;
  Ok(HttpResponse::Ok().json(entries))
}
