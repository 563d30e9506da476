use actix_web::web;

pub mod actor;
pub mod controllers;
pub mod util;

pub use actor::Actor;

/// Mounts every route under `/api` along with extractor settings that
/// turn malformed requests into API errors.
pub fn configure(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(util::json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(util::query_error_handler))
    .app_data(web::PathConfig::default().error_handler(util::path_error_handler))
    .service(web::scope("/api").configure(controllers::configure))
    .default_service(web::to(util::not_found));
}

#[cfg(test)]
mod tests {
  use actix_web::{
    http::{
      header::{self, ContentType},
      StatusCode,
    },
    test, web,
  };
  use assert_json_diff::{assert_json_eq, assert_json_include};
  use chrono::Duration;
  use serde_json::{json, Value};

  use crate::schema::LikeTarget;
  use crate::test_utils;

  macro_rules! init_service {
    ($app:expr) => {
      test::init_service(
        actix_web::App::new()
          .app_data(web::Data::new($app.clone()))
          .configure(super::configure),
      )
      .await
    };
  }

  fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
  }

  #[actix_web::test]
  async fn like_toggle_round_trip() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let bob = test_utils::create_user(&app, "bob").await;
    let service = init_service!(app);

    let req = test::TestRequest::post()
      .uri("/api/posts/")
      .insert_header(bearer(&test_utils::token_for(&app, &alice)))
      .set_json(json!({ "content": "hello world" }))
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let post: Value = test::read_body_json(res).await;
    assert_json_include!(
      actual: &post,
      expected: json!({
        "author": { "id": alice.id, "username": "alice" },
        "content": "hello world",
        "like_count": 0,
      })
    );
    let post_id = post["id"].as_u64().unwrap();

    let bob_token = test_utils::token_for(&app, &bob);
    for expected in [true, false] {
      let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/like/"))
        .insert_header(bearer(&bob_token))
        .to_request();
      let body: Value = test::call_and_read_body_json(&service, req).await;
      assert_json_eq!(body, json!({ "success": expected }));

      let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", alice.id))
        .to_request();
      let profile: Value = test::call_and_read_body_json(&service, req).await;
      let karma = if expected { 5 } else { 0 };
      assert_json_eq!(
        profile,
        json!({ "id": alice.id, "username": "alice", "karma": karma })
      );

      let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
      let detail: Value = test::call_and_read_body_json(&service, req).await;
      assert_eq!(detail["like_count"], json!(i64::from(expected)));
    }
  }

  #[actix_web::test]
  async fn guests_post_as_the_guest_account() {
    let (app, _) = test_utils::build_test_app();
    let service = init_service!(app);

    let req = test::TestRequest::post()
      .uri("/api/posts")
      .set_json(json!({ "content": "hi, I'm new" }))
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let post: Value = test::read_body_json(res).await;
    assert_eq!(post["author"]["username"], json!("guest"));
  }

  #[actix_web::test]
  async fn guests_are_rejected_when_disabled() {
    let (app, _) = test_utils::build_test_app_with(|config| {
      config.auth.allow_guests = false;
    });
    let alice = test_utils::create_user(&app, "alice").await;
    let post = test_utils::create_post(&app, &alice, "members only").await;
    let service = init_service!(app);

    let requests = [
      test::TestRequest::post()
        .uri("/api/posts/")
        .set_json(json!({ "content": "let me in" })),
      test::TestRequest::post()
        .uri("/api/comments/")
        .set_json(json!({ "post": post.id, "content": "let me in" })),
      test::TestRequest::post().uri(&format!("/api/posts/{}/like", post.id)),
    ];

    for req in requests {
      let res = test::call_service(&service, req.to_request()).await;
      assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

      let body: Value = test::read_body_json(res).await;
      assert_json_eq!(body, json!({ "type": "unauthorized" }));
    }

    // reading is still allowed
    let req = test::TestRequest::get().uri("/api/posts/").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn rejects_invalid_tokens() {
    let (app, _) = test_utils::build_test_app();
    let service = init_service!(app);

    for value in ["Bearer not-a-token", "Basic YWxpY2U6aHVudGVyMg=="] {
      let req = test::TestRequest::post()
        .uri("/api/posts/")
        .insert_header((header::AUTHORIZATION, value))
        .set_json(json!({ "content": "hello" }))
        .to_request();
      let res = test::call_service(&service, req).await;
      assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
  }

  #[actix_web::test]
  async fn rejects_parents_from_other_posts() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let first = test_utils::create_post(&app, &alice, "first").await;
    let second = test_utils::create_post(&app, &alice, "second").await;
    let comment = test_utils::create_comment(&app, &alice, first.id, None, "on first").await;
    let service = init_service!(app);

    let req = test::TestRequest::post()
      .uri("/api/comments")
      .insert_header(bearer(&test_utils::token_for(&app, &alice)))
      .set_json(json!({ "post": second.id, "parent": comment.id, "content": "sneaky" }))
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_json_include!(
      actual: body,
      expected: json!({
        "type": "invalid_form_body",
        "data": { "parent": { "_errors": ["Parent comment does not exist in this post"] } },
      })
    );
  }

  #[actix_web::test]
  async fn comments_show_up_as_a_tree() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let post = test_utils::create_post(&app, &alice, "hello").await;
    let service = init_service!(app);

    let token = test_utils::token_for(&app, &alice);
    let req = test::TestRequest::post()
      .uri("/api/comments/")
      .insert_header(bearer(&token))
      .set_json(json!({ "post": post.id, "content": "C1" }))
      .to_request();
    let c1: Value = test::call_and_read_body_json(&service, req).await;

    let req = test::TestRequest::post()
      .uri("/api/comments/")
      .insert_header(bearer(&token))
      .set_json(json!({ "post": post.id, "parent": c1["id"], "content": "C2" }))
      .to_request();
    let c2: Value = test::call_and_read_body_json(&service, req).await;

    let req = test::TestRequest::post()
      .uri(&format!("/api/comments/{}/like/", c2["id"]))
      .insert_header(bearer(&token))
      .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_json_eq!(body, json!({ "success": true }));

    let req = test::TestRequest::get()
      .uri(&format!("/api/posts/{}/", post.id))
      .to_request();
    let detail: Value = test::call_and_read_body_json(&service, req).await;
    assert_json_include!(
      actual: detail,
      expected: json!({
        "id": post.id,
        "comments": [{
          "id": c1["id"],
          "content": "C1",
          "like_count": 0,
          "replies": [{ "id": c2["id"], "content": "C2", "like_count": 1, "replies": [] }],
        }],
      })
    );
  }

  #[actix_web::test]
  async fn leaderboard_falls_back_to_all_time() {
    let (app, store) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let bob = test_utils::create_user(&app, "bob").await;
    let post = test_utils::create_post(&app, &alice, "old news").await;
    let comment = test_utils::create_comment(&app, &alice, post.id, None, "still old").await;
    test_utils::toggle(&app, &bob, LikeTarget::Post(post.id)).await;
    test_utils::toggle(&app, &bob, LikeTarget::Comment(comment.id)).await;
    store.backdate_karma(alice.id, Duration::hours(48)).await;

    let service = init_service!(app);
    let req = test::TestRequest::get().uri("/api/leaderboard").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_json_eq!(
      body,
      json!([{ "user_id": alice.id, "username": "alice", "karma": 6 }])
    );
  }

  #[actix_web::test]
  async fn register_and_login() {
    let (app, _) = test_utils::build_test_app();
    let service = init_service!(app);

    let form = json!({ "username": "alice", "password": "correct horse" });
    let req = test::TestRequest::post()
      .uri("/api/users/register/")
      .set_json(&form)
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user: Value = test::read_body_json(res).await;
    assert_eq!(user["username"], json!("alice"));

    let req = test::TestRequest::post()
      .uri("/api/users/login")
      .set_json(&form)
      .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["id"], user["id"]);

    let token = body["token"].as_str().unwrap();
    let req = test::TestRequest::post()
      .uri("/api/posts/")
      .insert_header(bearer(token))
      .set_json(json!({ "content": "logged in" }))
      .to_request();
    let post: Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(post["author"]["username"], json!("alice"));
  }

  #[actix_web::test]
  async fn malformed_requests() {
    let (app, _) = test_utils::build_test_app();
    let service = init_service!(app);

    let req = test::TestRequest::post()
      .uri("/api/posts/")
      .insert_header(ContentType::json())
      .set_payload("{ not json")
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["type"], json!("invalid_form_body"));

    let req = test::TestRequest::get()
      .uri("/api/posts/?limit=lots")
      .to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    for uri in ["/api/posts/abc", "/api/posts/0/", "/api/users/404", "/api/nope", "/"] {
      let req = test::TestRequest::get().uri(uri).to_request();
      let res = test::call_service(&service, req).await;
      assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");

      let body: Value = test::read_body_json(res).await;
      assert_json_eq!(body, json!({ "type": "not_found" }));
    }
  }

  #[actix_web::test]
  async fn health_check() {
    let (app, _) = test_utils::build_test_app();
    let service = init_service!(app);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;
    assert_json_eq!(body, json!({ "status": "ok" }));
  }
}
