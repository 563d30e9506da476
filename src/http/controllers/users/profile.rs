use actix_web::{web, HttpResponse};

use crate::{error::Error, http::controllers::parse_id, services::GetUser, App};

#[tracing::instrument(skip(app), name = "http.users.profile")]
pub async fn profile(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse, Error> {
  let id = parse_id(path.into_inner())?;
  let profile = GetUser { id }.perform(&app).await?;
  Ok(HttpResponse::Ok().json(profile))
}
