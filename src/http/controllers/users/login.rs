use actix_web::{
  web::{self, Json},
  HttpResponse,
};

use crate::{error::Error, services::LoginUser, types::form::users::login, App};

#[tracing::instrument(skip_all, name = "http.users.login")]
pub async fn login(app: web::Data<App>, form: Json<login::Request>) -> Result<HttpResponse, Error> {
  let response = LoginUser { form: &form }.perform(&app).await?;
  Ok(HttpResponse::Ok().json(response))
}
