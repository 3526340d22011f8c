//! Service tests against a real PostgreSQL
//!
//! Every test gets its own freshly migrated database. `TEST_DATABASE_URL`
//! points at an existing server; without it a throwaway container is started.
//! When neither is reachable the test is skipped with a note on stderr.

mod test_lifecycle;
mod test_recommend;

use std::str::FromStr;
use std::time::Duration;

use shared::error::{AppError, ErrorCode};
use shared::models::{OrderCreate, OrderLineInput};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use testcontainers::{
    ContainerAsync, GenericImage, ImageExt,
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
};

use crate::error::ServiceError;
use crate::util::now_millis;

const SEC: i64 = 1_000;
const HOUR: i64 = 3_600 * SEC;

struct TestDb {
    pool: PgPool,
    _container: Option<ContainerAsync<GenericImage>>,
}

impl TestDb {
    async fn start() -> Option<Self> {
        let (server_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => match start_container().await {
                Ok((url, container)) => (url, Some(container)),
                Err(e) => {
                    eprintln!("skipping database test, no PostgreSQL available: {e}");
                    return None;
                }
            },
        };

        let server = PgConnectOptions::from_str(&server_url).expect("Invalid TEST_DATABASE_URL");
        let admin = connect_with_retry(server.clone()).await;
        let name = format!("menu_test_{}", uuid::Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE DATABASE {name}"))
            .execute(&admin)
            .await
            .expect("Failed to create test database");
        admin.close().await;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(server.database(&name))
            .await
            .expect("Failed to connect to test database");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            _container: container,
        })
    }
}

async fn start_container()
-> Result<(String, ContainerAsync<GenericImage>), testcontainers::TestcontainersError> {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_USER", "menu")
        .with_env_var("POSTGRES_PASSWORD", "menu")
        .with_env_var("POSTGRES_DB", "menu")
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await?;

    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    Ok((format!("postgres://menu:menu@{host}:{port}/menu"), container))
}

/// The container reports ready slightly before it accepts connections
async fn connect_with_retry(options: PgConnectOptions) -> PgPool {
    let mut last_error = None;
    for _ in 0..30 {
        match PgPoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => return pool,
            Err(e) => {
                last_error = Some(e);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }
    panic!("PostgreSQL never accepted connections: {last_error:?}");
}

// ========================================================================
// Fixture: the "cafe-demo" venue
// ========================================================================

const CAFE_SLUG: &str = "cafe-demo";
const CAFE_TABLE: i32 = 5;
const CAFE_TOKEN: &str = "abc123";

struct Cafe {
    venue_id: i64,
    category_id: i64,
    latte: i64,
    croissant: i64,
    muffin: i64,
    cookie: i64,
}

async fn seed_cafe(pool: &PgPool) -> Cafe {
    let now = now_millis();
    let owner_id: i64 =
        sqlx::query_scalar("INSERT INTO users (email, created_at) VALUES ($1, $2) RETURNING id")
            .bind("owner@cafe-demo.test")
            .bind(now)
            .fetch_one(pool)
            .await
            .unwrap();
    let venue_id: i64 = sqlx::query_scalar(
        "INSERT INTO venues (slug, name, owner_id, created_at) VALUES ($1, 'Cafe Demo', $2, $3) RETURNING id",
    )
    .bind(CAFE_SLUG)
    .bind(owner_id)
    .bind(now)
    .fetch_one(pool)
    .await
    .unwrap();
    let category_id: i64 = sqlx::query_scalar(
        "INSERT INTO categories (venue_id, name) VALUES ($1, 'Coffee & Bakery') RETURNING id",
    )
    .bind(venue_id)
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO table_tokens (venue_id, table_number, token, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(venue_id)
    .bind(CAFE_TABLE)
    .bind(CAFE_TOKEN)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();

    Cafe {
        venue_id,
        category_id,
        latte: add_item(pool, category_id, "Latte", 4.50).await,
        croissant: add_item(pool, category_id, "Croissant", 3.20).await,
        muffin: add_item(pool, category_id, "Blueberry Muffin", 3.00).await,
        cookie: add_item(pool, category_id, "Cookie", 2.50).await,
    }
}

async fn add_item(pool: &PgPool, category_id: i64, name: &str, price: f64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO items (category_id, name, price, created_at) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(category_id)
    .bind(name)
    .bind(price)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn set_available(pool: &PgPool, item_id: i64, available: bool) {
    sqlx::query("UPDATE items SET is_available = $1 WHERE id = $2")
        .bind(available)
        .bind(item_id)
        .execute(pool)
        .await
        .unwrap();
}

/// One unit of each item, ordered from table 5 with its QR token
fn table_order(item_ids: &[i64], total: f64) -> OrderCreate {
    OrderCreate {
        venue_slug: CAFE_SLUG.to_string(),
        table_number: CAFE_TABLE,
        table_token: Some(CAFE_TOKEN.to_string()),
        items: item_ids
            .iter()
            .map(|&item_id| OrderLineInput {
                item_id,
                variant_id: None,
                quantity: 1,
                notes: None,
                addon_ids: Vec::new(),
            })
            .collect(),
        total,
        notes: None,
    }
}

/// Pretend the order was placed `age_ms` ago
async fn backdate_order(pool: &PgPool, order_id: i64, age_ms: i64) {
    sqlx::query("UPDATE orders SET created_at = $1 WHERE id = $2")
        .bind(now_millis() - age_ms)
        .bind(order_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn order_status(pool: &PgPool, order_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn associations(pool: &PgPool) -> Vec<(i64, i64, i32)> {
    sqlx::query_as("SELECT item_a_id, item_b_id, co_count FROM item_associations ORDER BY 1, 2")
        .fetch_all(pool)
        .await
        .unwrap()
}

fn code(err: ServiceError) -> ErrorCode {
    AppError::from(err).code
}
