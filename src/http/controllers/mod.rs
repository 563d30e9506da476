use actix_web::web;
use thiserror::Error;

use crate::error::Error;
use crate::types::id::{marker::Marker, Id};

pub mod comments;
pub mod health;
pub mod leaderboard;
pub mod posts;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .service(
      web::scope("/posts")
        .service(
          web::resource(["", "/"])
            .route(web::get().to(posts::list))
            .route(web::post().to(posts::create)),
        )
        .service(web::resource(["/{id}", "/{id}/"]).route(web::get().to(posts::get)))
        .service(web::resource(["/{id}/like", "/{id}/like/"]).route(web::post().to(posts::like))),
    )
    .service(
      web::scope("/comments")
        .service(web::resource(["", "/"]).route(web::post().to(comments::create)))
        .service(
          web::resource(["/{id}/like", "/{id}/like/"]).route(web::post().to(comments::like)),
        ),
    )
    .service(
      web::resource(["/leaderboard", "/leaderboard/"]).route(web::get().to(leaderboard::get)),
    )
    .service(
      web::scope("/users")
        .service(web::resource(["/login", "/login/"]).route(web::post().to(users::login)))
        .service(web::resource(["/register", "/register/"]).route(web::post().to(users::register)))
        .service(web::resource(["/{id}", "/{id}/"]).route(web::get().to(users::profile))),
    )
    .service(web::resource(["/health", "/health/"]).route(web::get().to(health::check)));
}

#[derive(Debug, Error)]
#[error("Resource id is not valid")]
struct InvalidId;

/// Ids in paths are never zero, any id that is cannot exist.
fn parse_id<T: Marker>(value: u64) -> Result<Id<T>, Error> {
  Id::new_checked(value).ok_or_else(|| Error::not_found(InvalidId))
}
