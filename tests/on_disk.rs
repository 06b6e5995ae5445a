mod common;

use common::{d, PASSWORD};
use finance_dashboard::auth::Authenticator;
use finance_dashboard::config::AppConfig;
use finance_dashboard::database::db::{connection, migrate};
use finance_dashboard::database::models::{InvestmentType, NewInvestment};
use finance_dashboard::realtime::ChangeFeed;
use finance_dashboard::store::Store;

#[tokio::test]
async fn data_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("finance.db").display());
    let config = AppConfig::default();

    let user_id = {
        let pool = connection::connect(&url).await.unwrap();
        migrate::run_migrations(&pool).await.unwrap();
        let auth = Authenticator::new(pool.clone(), b"k".to_vec(), &config).with_iterations(1);
        let store = Store::new(pool.clone(), ChangeFeed::default());

        let user = auth.sign_up("ada@example.com", PASSWORD, None).await.unwrap();
        store
            .add_investment(
                user.id,
                NewInvestment {
                    name: "Flat".into(),
                    amount: d("180000.00"),
                    kind: InvestmentType::RealEstate,
                    description: Some("rented out".into()),
                },
            )
            .await
            .unwrap();
        pool.close().await;
        user.id
    };

    let pool = connection::connect(&url).await.unwrap();
    // Applying migrations again is a no-op.
    migrate::run_migrations(&pool).await.unwrap();
    let auth = Authenticator::new(pool.clone(), b"k".to_vec(), &config).with_iterations(1);
    let store = Store::new(pool, ChangeFeed::default());

    let session = auth.sign_in("ada@example.com", PASSWORD).await.unwrap();
    assert_eq!(session.user.id, user_id);

    let investments = store.list_investments(user_id).await.unwrap();
    assert_eq!(investments.len(), 1);
    assert_eq!(investments[0].kind, InvestmentType::RealEstate);
    assert_eq!(investments[0].amount.to_string(), "180000.00");
    assert_eq!(store.summary(user_id).await.unwrap().total_investments, d("180000"));
}
