// tests/listing_test.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use blog_server::app;
use blogicum_core::domain::NewPost;

use common::{TestContext, body_text, days_ahead, hours_ago};

#[actix_web::test]
async fn test_home_shows_only_public_posts() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let travel = ctx.category("Travel", "travel").await;
    let secret = ctx.hidden_category("Secret", "secret").await;

    ctx.published_post(&alice, &travel, "Morning in Lisbon").await;
    ctx.post(
        NewPost::new(alice.id, "Tomorrow's draft".into(), "Later".into(), days_ahead(1))
            .in_category(travel.id),
    )
    .await;
    ctx.post(
        NewPost::new(alice.id, "Unpublished notes".into(), "Hidden".into(), hours_ago(1))
            .in_category(travel.id)
            .hidden(),
    )
    .await;
    ctx.published_post(&alice, &secret, "Secret recipe").await;
    ctx.post(NewPost::new(alice.id, "Uncategorised thoughts".into(), "Loose".into(), hours_ago(1)))
        .await;

    let app = test::init_service(app(ctx.state.clone())).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Morning in Lisbon"));
    assert!(!body.contains("Tomorrow"));
    assert!(!body.contains("Unpublished notes"));
    assert!(!body.contains("Secret recipe"));
    assert!(!body.contains("Uncategorised thoughts"));
}

#[actix_web::test]
async fn test_home_lists_newest_first_with_comment_counts() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let travel = ctx.category("Travel", "travel").await;

    ctx.post(
        NewPost::new(alice.id, "Older trip".into(), "Body".into(), hours_ago(5))
            .in_category(travel.id),
    )
    .await;
    let newer = ctx.published_post(&alice, &travel, "Newer trip").await;
    ctx.comment(&newer, &bob, "First!").await;
    ctx.comment(&newer, &bob, "Second!").await;

    let app = test::init_service(app(ctx.state.clone())).await;
    let body = body_text(
        test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await,
    )
    .await;

    let newer_at = body.find("Newer trip").unwrap();
    let older_at = body.find("Older trip").unwrap();
    assert!(newer_at < older_at);
    assert!(body.contains("Comments (2)"));
}

#[actix_web::test]
async fn test_empty_home_renders_first_page() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Nothing has been published yet."));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/?page=18446744073709551615").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_pagination_bounds() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let travel = ctx.category("Travel", "travel").await;
    for i in 0..11 {
        ctx.post(
            NewPost::new(alice.id, format!("Trip number {:02}", i), "Body".into(), hours_ago(i + 1))
                .in_category(travel.id),
        )
        .await;
    }

    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/?page=2").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    // The oldest post is the only one on page 2.
    assert!(body.contains("Trip number 10"));
    assert!(!body.contains("Trip number 00"));
    assert!(body.contains("Page 2 of 2"));

    for uri in [
        "/?page=3",
        "/?page=99",
        "/?page=abc",
        "/?page=0",
        "/?page=18446744073709551615",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_category_page_filters_posts() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let travel = ctx.category("Travel", "travel").await;
    let food = ctx.category("Food", "food").await;
    ctx.published_post(&alice, &travel, "Morning in Lisbon").await;
    ctx.published_post(&alice, &food, "Pastel de nata").await;

    let app = test::init_service(app(ctx.state.clone())).await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/category/travel/").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Morning in Lisbon"));
    assert!(!body.contains("Pastel de nata"));
}

#[actix_web::test]
async fn test_unknown_or_hidden_category_is_not_found() {
    let ctx = TestContext::new();
    ctx.hidden_category("Secret", "secret").await;

    let app = test::init_service(app(ctx.state.clone())).await;

    for uri in ["/category/secret/", "/category/missing/"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_detail_of_hidden_post_is_for_author_only() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let travel = ctx.category("Travel", "travel").await;
    let draft = ctx
        .post(
            NewPost::new(alice.id, "Work in progress".into(), "Soon".into(), hours_ago(1))
                .in_category(travel.id)
                .hidden(),
        )
        .await;
    let uri = format!("/posts/{}/", draft.id);

    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(ctx.bearer(&alice))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Work in progress"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(ctx.bearer(&bob))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_detail_lists_comments_oldest_first() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let travel = ctx.category("Travel", "travel").await;
    let post = ctx.published_post(&alice, &travel, "Morning in Lisbon").await;
    ctx.comment(&post, &bob, "Lovely light").await;
    ctx.comment(&post, &alice, "Thanks, Bob").await;

    let app = test::init_service(app(ctx.state.clone())).await;
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/posts/{}/", post.id))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.find("Lovely light").unwrap() < body.find("Thanks, Bob").unwrap());
    // Anonymous visitors get a sign-in link instead of the form.
    assert!(body.contains("to comment."));
}

#[actix_web::test]
async fn test_missing_post_is_not_found() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/posts/404/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_owner_profile_includes_hidden_posts() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let travel = ctx.category("Travel", "travel").await;
    ctx.published_post(&alice, &travel, "Morning in Lisbon").await;
    ctx.post(
        NewPost::new(alice.id, "Tomorrow's draft".into(), "Later".into(), days_ahead(2))
            .in_category(travel.id),
    )
    .await;

    let app = test::init_service(app(ctx.state.clone())).await;

    let own = body_text(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile/alice/")
                .insert_header(ctx.bearer(&alice))
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(own.contains("Morning in Lisbon"));
    assert!(own.contains("Tomorrow"));
    assert!(own.contains("Edit profile"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/alice/")
            .insert_header(ctx.bearer(&bob))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let theirs = body_text(resp).await;
    assert!(theirs.contains("Morning in Lisbon"));
    assert!(!theirs.contains("Tomorrow"));
    assert!(!theirs.contains("Edit profile"));
}

#[actix_web::test]
async fn test_unknown_profile_renders_not_found_page() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/profile/nobody/").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(resp).await.contains("404"));
}
