#![allow(dead_code)]

use finance_dashboard::auth::Authenticator;
use finance_dashboard::config::AppConfig;
use finance_dashboard::database::db::{connection, migrate};
use finance_dashboard::database::models::User;
use finance_dashboard::realtime::ChangeFeed;
use finance_dashboard::store::Store;
use rust_decimal::Decimal;

pub const PASSWORD: &str = "correct horse battery";

pub struct Harness {
    pub store: Store,
    pub auth: Authenticator,
}

/// Fresh in-memory database with migrations applied. Password hashing runs a
/// single PBKDF2 round to keep the suite fast.
pub async fn harness() -> Harness {
    let pool = connection::memory().await.expect("in-memory pool");
    migrate::run_migrations(&pool).await.expect("migrations");

    let config = AppConfig::default();
    let store = Store::new(pool.clone(), ChangeFeed::new(64));
    let auth = Authenticator::new(pool, b"integration-test-secret".to_vec(), &config).with_iterations(1);
    Harness { store, auth }
}

impl Harness {
    pub async fn user(&self, email: &str) -> User {
        self.auth
            .sign_up(email, PASSWORD, Some("Test User"))
            .await
            .expect("sign up")
    }
}

pub fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}
