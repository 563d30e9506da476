use actix_web::{
  web::{self, Json},
  HttpResponse,
};

use crate::{
  error::Error, http::Actor, services::CreatePost, types::form::posts::CreateRequest, App,
};

#[tracing::instrument(skip_all, name = "http.posts.create")]
pub async fn create(
  app: web::Data<App>,
  actor: Actor,
  form: Json<CreateRequest>,
) -> Result<HttpResponse, Error> {
  let author = actor.into_user(&app).await?;
  let post = CreatePost {
    content: &form.content,
  }
  .perform(&app, &author)
  .await?;

  Ok(HttpResponse::Created().json(post))
}
