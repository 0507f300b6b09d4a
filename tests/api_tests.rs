//! API integration tests against a live PostgreSQL database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use once_cell::sync::Lazy;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio::sync::Mutex;
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::AppConfig,
    models::{Author, AuthorWithBooks},
    repository::Repository,
    seed::SeedData,
    services::Services,
    AppState,
};

/// Tests share one database and truncate it, so they run one at a time
static DB_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

async fn seeded_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE authors, books RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate tables");

    let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog.json");
    SeedData::from_file(fixture)
        .expect("Failed to read fixture")
        .insert(&pool)
        .await
        .expect("Failed to seed");

    pool
}

fn app(pool: PgPool) -> Router {
    let config = AppConfig::default();
    let services = Services::new(Arc::new(Repository::new(pool)), config.pagination);
    api::router(AppState {
        services: Arc::new(services),
    })
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn ids(body: &Value) -> Vec<i64> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
#[ignore]
async fn test_ready() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (status, body) = get_json(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_filter_by_author_and_availability() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (status, body) = get_json(&app, "/books?author_id=1&is_available=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["meta"]["total_books"], 3);
    assert_eq!(body["meta"]["available_books"], 3);
    assert_eq!(body["meta"]["unavailable_books"], 0);
    for book in body["results"].as_array().unwrap() {
        assert_eq!(book["author"], 1);
        assert_eq!(book["is_available"], true);
    }
}

#[tokio::test]
#[ignore]
async fn test_availability_partitions_catalog() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (_, all) = get_json(&app, "/books?page_size=100").await;
    let (_, available) = get_json(&app, "/books?is_available=true&page_size=100").await;
    let (_, unavailable) = get_json(&app, "/books?is_available=false&page_size=100").await;

    let mut union: Vec<i64> = ids(&available);
    union.extend(ids(&unavailable));
    union.sort_unstable();
    let mut everything = ids(&all);
    everything.sort_unstable();

    assert_eq!(union, everything);
    assert!(ids(&available).iter().all(|id| !ids(&unavailable).contains(id)));
    assert_eq!(all["meta"]["unavailable_books"], 1);
}

#[tokio::test]
#[ignore]
async fn test_pages_cover_the_set_once() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (_, first) = get_json(&app, "/books?page_size=2&ordering=title").await;
    assert_eq!(first["total_pages"], 3);
    assert_eq!(first["next"], "/books/?page=2&page_size=2");
    assert!(first["previous"].is_null());

    let mut seen = ids(&first);
    for page in 2..=3 {
        let (status, body) =
            get_json(&app, &format!("/books/?page={page}&page_size=2&ordering=title")).await;
        assert_eq!(status, StatusCode::OK);
        seen.extend(ids(&body));
    }

    let (_, past_end) = get_json(&app, "/books?page=4&page_size=2").await;
    assert!(ids(&past_end).is_empty());

    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
#[ignore]
async fn test_ordering_and_search() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (_, body) = get_json(&app, "/books?ordering=published_date").await;
    let dates: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["published_date"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_unstable();
    assert_eq!(dates, sorted);

    let (_, body) = get_json(&app, "/books?search=klabnik").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["title"], "The Rust Programming Language");

    let (_, body) = get_json(&app, "/books?search=Django%20Beginners").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["title"], "Django for Beginners");

    let (_, body) = get_json(&app, "/books?search=rust,vincent").await;
    assert_eq!(body["count"], 0);

    let (_, body) = get_json(&app, "/books?title_contains=100%25").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
#[ignore]
async fn test_date_range_is_inclusive() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (status, body) =
        get_json(&app, "/books?published_after=2020-08-01&published_before=2021-03-15").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = get_json(&app, "/books?published_after=2020-13-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("published_after"));
}

#[tokio::test]
#[ignore]
async fn test_detail_nests_author() {
    let _guard = DB_LOCK.lock().await;
    let pool = seeded_pool().await;
    let app = app(pool.clone());

    let (status, body) = get_json(&app, "/books/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "The Rust Programming Language");
    assert_eq!(body["author"]["name"], "Steve Klabnik");

    let stored: Author =
        sqlx::query_as("SELECT id, name, email, created_at FROM authors WHERE id = $1")
            .bind(2_i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    let expected = serde_json::to_value(AuthorWithBooks::new(stored, 1)).unwrap();
    assert_eq!(body["author"], expected);

    let (status, _) = get_json(&app, "/books/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_stats_are_global() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (status, body) = get_json(&app, "/books/stats/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_books"], 5);
    assert_eq!(body["available_books"], 4);
    assert_eq!(body["unavailable_books"], 1);
    assert_eq!(body["total_authors"], 2);
    assert_eq!(body["top_authors"][0]["id"], 1);
    assert_eq!(body["top_authors"][0]["books_count"], 4);
}

#[tokio::test]
#[ignore]
async fn test_books_by_year_descending() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (_, body) = get_json(&app, "/books/by-year").await;
    let years: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![2022, 2021, 2020, 2019, 2018]);
}

#[tokio::test]
#[ignore]
async fn test_authors_endpoints() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (_, body) = get_json(&app, "/authors?min_books=2").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["name"], "William S. Vincent");

    let (_, body) = get_json(&app, "/authors/popular").await;
    let popular = body.as_array().unwrap();
    assert_eq!(popular[0]["id"], 1);
    assert_eq!(popular[0]["available_books_count"], 3);
}

#[tokio::test]
#[ignore]
async fn test_recent_books_include_fresh_rows() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (status, body) = get_json(&app, "/books/recent?days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 5);
}

#[tokio::test]
#[ignore]
async fn test_seeding_twice_is_a_no_op() {
    let _guard = DB_LOCK.lock().await;
    let pool = seeded_pool().await;

    let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/catalog.json");
    let seeded = SeedData::from_file(fixture)
        .unwrap()
        .insert(&pool)
        .await
        .unwrap();
    assert!(seeded.is_empty());

    let app = app(pool);
    let (_, body) = get_json(&app, "/books/stats").await;
    assert_eq!(body["total_books"], 5);
    assert_eq!(body["total_authors"], 2);
}

#[tokio::test]
#[ignore]
async fn test_repeated_param_keeps_last_value() {
    let _guard = DB_LOCK.lock().await;
    let app = app(seeded_pool().await);

    let (status, body) = get_json(&app, "/books?author_id=1&author_id=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = get_json(&app, "/books?author_id=1&author_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("author_id"));
}
