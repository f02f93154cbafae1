use std::sync::Arc;

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use actix_web::{App, http::StatusCode, http::header, test, web};
use serde_json::{Value, json};

use daybook_core::domain::{NewPost, Post, User};
use daybook_core::ports::{BaseRepository, PasswordService, TokenService};
use daybook_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService, PasswordPolicy,
};

use super::configure_routes;
use crate::config::AppConfig;
use crate::state::AppState;

struct Harness {
    state: AppState,
    tokens: Arc<dyn TokenService>,
    users: Arc<InMemoryUserRepository>,
    posts: Arc<InMemoryPostRepository>,
    _uploads: tempfile::TempDir,
}

impl Harness {
    async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                expiration_hours: 1,
                issuer: "daybook-test".to_string(),
                reset_secret: "test-reset-secret".to_string(),
                reset_expiration_minutes: 15,
            },
            password_policy: PasswordPolicy::default(),
            public_base_url: "http://localhost:8080".to_string(),
            upload_dir: uploads.path().to_path_buf(),
            password_reset_url: "http://localhost:4200/reset-password".to_string(),
            #[cfg(feature = "mail")]
            mail: None,
        };

        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new(config.password_policy.clone()));
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let state = AppState::with_repositories(
            users.clone(),
            posts.clone(),
            &config,
            tokens.clone(),
            passwords,
        );

        Self {
            state,
            tokens,
            users,
            posts,
            _uploads: uploads,
        }
    }

    /// Seed a user directly and return a Bearer header value for it.
    async fn bearer(&self, email: &str, is_admin: bool) -> String {
        self.account(email, is_admin).await.1
    }

    async fn account(&self, email: &str, is_admin: bool) -> (Uuid, String) {
        let mut user = User::new(email.to_string(), "unused".to_string());
        user.is_admin = is_admin;
        let user = self.users.create(user).await.unwrap();
        let token = self.tokens.generate_token(user.id, &user.email).unwrap();
        (user.id, format!("Bearer {token}"))
    }

    /// Seed a private post written by `owner` at noon on the given day.
    async fn post_on(&self, owner: Uuid, year: i32, month: u32, day: u32) {
        let at = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .and_then(|dt| dt.and_local_timezone(Local).single())
            .unwrap();
        let draft = NewPost {
            description: format!("Entry for {year}-{month}-{day}"),
            mood: 5,
            temperature: 12.0,
            ..Default::default()
        };
        self.posts
            .create(Post::new_at(owner, draft, at).unwrap())
            .await
            .unwrap();
    }
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .app_data(web::Data::new($harness.tokens.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn new_post(is_public: bool) -> Value {
    json!({
        "description": "Walked along the river",
        "location": "Lyon",
        "mood": 7,
        "temperature": 21.5,
        "isPublic": is_public
    })
}

#[actix_web::test]
async fn health_reports_memory_store() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[actix_web::test]
async fn register_login_and_me() {
    let h = Harness::new().await;
    let app = app!(h);
    let credentials = json!({ "email": "writer@daybook.io", "password": "correct-horse" });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&credentials)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&credentials)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&credentials)
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    let token = login["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["email"], "writer@daybook.io");
    assert_eq!(me["isAdmin"], false);
}

#[actix_web::test]
async fn guest_listing_rejects_unknown_order_and_reports_empty_pages() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/guest/public-posts/sorted/sideways")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/guest/public-posts/random?page=abc")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"], "No public posts found.");
}

#[actix_web::test]
async fn owner_routes_require_a_token() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get().uri("/api/user/posts").to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn moderation_flow() {
    let h = Harness::new().await;
    let member = h.bearer("member@daybook.io", false).await;
    let admin = h.bearer("admin@daybook.io", true).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/user/posts")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .set_json(new_post(true))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let post: Value = test::read_body_json(res).await;
    let id = post["id"].as_str().unwrap().to_string();
    assert_eq!(post["isPublic"], true);
    assert_eq!(post["isApproved"], false);

    // Members cannot moderate.
    let req = test::TestRequest::get()
        .uri("/api/admin/posts/pending")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"], "Only admin users are allowed.");

    let req = test::TestRequest::get()
        .uri("/api/admin/posts/pending")
        .insert_header((header::AUTHORIZATION, admin.clone()))
        .to_request();
    let queue: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(queue["totalItems"], 1);
    assert_eq!(queue["itemsPerPage"], 3);
    assert_eq!(queue["items"][0]["id"], id.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/guest/public-posts/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/posts/pending/{id}/approve"))
        .insert_header((header::AUTHORIZATION, admin.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/posts/pending/{id}/approve"))
        .insert_header((header::AUTHORIZATION, admin.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::get()
        .uri("/api/guest/public-posts/sorted/newest")
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed["currentPage"], 1);
    assert_eq!(feed["totalPages"], 1);
    assert_eq!(feed["items"][0]["id"], id.as_str());
}

#[actix_web::test]
async fn second_post_on_the_same_day_is_rejected() {
    let h = Harness::new().await;
    let member = h.bearer("member@daybook.io", false).await;
    let app = app!(h);

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/user/posts")
            .insert_header((header::AUTHORIZATION, member.clone()))
            .set_json(new_post(false))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), expected);

        if expected == StatusCode::BAD_REQUEST {
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["detail"], "You have already created a post today.");
        }
    }
}

#[actix_web::test]
async fn search_and_photo_routes_are_not_shadowed_by_id() {
    let h = Harness::new().await;
    let member = h.bearer("member@daybook.io", false).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/user/posts")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .set_json(new_post(false))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/user/posts/search?query=RIVER")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["totalItems"], 1);

    let req = test::TestRequest::put()
        .uri(&format!("/api/user/posts/{id}/photo"))
        .insert_header((header::AUTHORIZATION, member.clone()))
        .insert_header((header::CONTENT_TYPE, "image/png"))
        .set_payload(vec![0x89, b'P', b'N', b'G'])
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    let url = updated["photoUrl"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8080/photos/"));
    assert!(url.ends_with(".png"));

    let req = test::TestRequest::put()
        .uri(&format!("/api/user/posts/{id}/photo"))
        .insert_header((header::AUTHORIZATION, member))
        .insert_header((header::CONTENT_TYPE, "application/pdf"))
        .set_payload(vec![1, 2, 3])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
}

#[actix_web::test]
async fn invalid_reset_token_is_unauthorized() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/auth/reset-password/not-a-token")
        .set_json(json!({ "password": "brand-new-pass" }))
        .to_request();

    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn range_listing_filters_by_year_and_validates_bounds() {
    let h = Harness::new().await;
    let (owner, member) = h.account("member@daybook.io", false).await;
    for year in [2019, 2021, 2023] {
        h.post_on(owner, year, 5, 1).await;
    }
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/user/posts/range?startYear=2020&endYear=2023")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["totalItems"], 2);
    assert_eq!(page["items"][0]["createdOn"], "2023-05-01");
    assert_eq!(page["items"][1]["createdOn"], "2021-05-01");

    let req = test::TestRequest::get()
        .uri("/api/user/posts/range?startYear=2023&endYear=2020")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/user/posts/range?startYear=2000&endYear=2010")
        .insert_header((header::AUTHORIZATION, member))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"], "No posts found in this date range.");
}

#[actix_web::test]
async fn on_this_day_lists_matching_days_across_years() {
    let h = Harness::new().await;
    let (owner, member) = h.account("member@daybook.io", false).await;
    h.post_on(owner, 2020, 2, 29).await;
    h.post_on(owner, 2021, 2, 28).await;
    h.post_on(owner, 2024, 2, 29).await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri("/api/user/posts/on-this-day?day=29&month=2")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    let days: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["createdOn"].as_str().unwrap())
        .collect();
    assert_eq!(days, vec!["2024-02-29", "2020-02-29"]);

    let req = test::TestRequest::get()
        .uri("/api/user/posts/on-this-day?day=1&month=13")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/user/posts/on-this-day?day=1&month=1")
        .insert_header((header::AUTHORIZATION, member))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn denied_post_disappears_everywhere() {
    let h = Harness::new().await;
    let member = h.bearer("member@daybook.io", false).await;
    let admin = h.bearer("admin@daybook.io", true).await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/user/posts")
        .insert_header((header::AUTHORIZATION, member.clone()))
        .set_json(new_post(true))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let id = post["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/posts/pending/{id}/deny"))
        .insert_header((header::AUTHORIZATION, admin.clone()))
        .to_request();
    let denied: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(denied["success"], true);
    assert_eq!(denied["postId"], id.as_str());

    for (uri, token) in [
        (format!("/api/admin/posts/pending/{id}"), admin.clone()),
        (format!("/api/user/posts/{id}"), member.clone()),
        ("/api/admin/posts/pending".to_string(), admin.clone()),
        ("/api/user/posts".to_string(), member),
    ] {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header((header::AUTHORIZATION, token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND,
            "{uri}"
        );
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/guest/public-posts/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/posts/pending/{id}/deny"))
        .insert_header((header::AUTHORIZATION, admin))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
