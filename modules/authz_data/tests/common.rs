#![allow(dead_code)]

use authz_data::{AuthzDataConfig, AuthzDataModule};
use keyset_db::{ConnectOpts, DbHandle};
use sea_orm::DatabaseConnection;

pub async fn setup_with(cfg: AuthzDataConfig) -> (AuthzDataModule, DatabaseConnection) {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("connect")
        .sea();
    AuthzDataModule::migrate(&db).await.expect("migrate");
    let module = AuthzDataModule::new(db.clone(), &cfg).expect("module");
    (module, db)
}

pub async fn setup() -> (AuthzDataModule, DatabaseConnection) {
    setup_with(AuthzDataConfig::default()).await
}
