use actix_web::{
  web::{self, Json},
  HttpResponse,
};

use crate::{error::Error, services::RegisterUser, types::form::users::register, App};

#[tracing::instrument(skip_all, name = "http.users.register")]
pub async fn register(
  app: web::Data<App>,
  form: Json<register::Request>,
) -> Result<HttpResponse, Error> {
  let user = RegisterUser { form: &form }.perform(&app).await?;
  Ok(HttpResponse::Created().json(register::Response {
    id: user.id,
    username: user.username,
  }))
}
