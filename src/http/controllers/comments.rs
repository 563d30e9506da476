use actix_web::{
  web::{self, Json},
  HttpResponse,
};

use crate::{
  error::Error,
  http::{controllers::parse_id, Actor},
  schema::LikeTarget,
  services::{CreateComment, ToggleLike},
  types::{form::comments::CreateRequest, like::LikeResponse},
  App,
};

#[tracing::instrument(skip_all, fields(post.id = %form.post), name = "http.comments.create")]
pub async fn create(
  app: web::Data<App>,
  actor: Actor,
  form: Json<CreateRequest>,
) -> Result<HttpResponse, Error> {
  let author = actor.into_user(&app).await?;
  let comment = CreateComment {
    post: form.post,
    parent: form.parent,
    content: &form.content,
  }
  .perform(&app, &author)
  .await?;

  Ok(HttpResponse::Created().json(comment))
}

#[tracing::instrument(skip(app, actor), name = "http.comments.like")]
pub async fn like(
  app: web::Data<App>,
  actor: Actor,
  path: web::Path<u64>,
) -> Result<HttpResponse, Error> {
  let target = LikeTarget::Comment(parse_id(path.into_inner())?);
  let user = actor.into_user(&app).await?;
  let outcome = ToggleLike { target }.perform(&app, &user).await?;

  Ok(HttpResponse::Ok().json(LikeResponse {
    success: outcome.is_liked(),
  }))
}
