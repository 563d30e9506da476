use actix_web::{web, HttpResponse};

use crate::{error::Error, services::ListPosts, types::form::posts::ListQuery, App};

#[tracing::instrument(skip(app), name = "http.posts.list")]
pub async fn list(
  app: web::Data<App>,
  query: web::Query<ListQuery>,
) -> Result<HttpResponse, Error> {
  let ListQuery { before, limit } = query.into_inner();
  let posts = ListPosts { before, limit }.perform(&app).await?;
  Ok(HttpResponse::Ok().json(posts))
}
