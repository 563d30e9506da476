use actix_web::{web, HttpResponse};

use crate::{error::Error, http::controllers::parse_id, services::GetPost, App};

#[tracing::instrument(skip(app), name = "http.posts.get")]
pub async fn get(app: web::Data<App>, path: web::Path<u64>) -> Result<HttpResponse, Error> {
  let id = parse_id(path.into_inner())?;
  let detail = GetPost { id }.perform(&app).await?;
  Ok(HttpResponse::Ok().json(detail))
}
