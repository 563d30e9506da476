use actix_web::{web, HttpResponse};

use crate::{
  error::Error,
  http::{controllers::parse_id, Actor},
  schema::LikeTarget,
  services::ToggleLike,
  types::like::LikeResponse,
  App,
};

#[tracing::instrument(skip(app, actor), name = "http.posts.like")]
pub async fn like(
  app: web::Data<App>,
  actor: Actor,
  path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
  let target = LikeTarget::Post(parse_id(path.into_inner())?);
  let user = actor.into_user(&app).await?;
  let outcome = ToggleLike { target }.perform(&app, &user).await?;

  Ok(HttpResponse::Ok().json(LikeResponse {
    success: outcome.is_liked(),
  }))
}
