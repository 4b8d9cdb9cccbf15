use super::*;
use sea_orm::{EntityTrait, PaginatorTrait};

/// Tests inserting a new setting row.
///
/// Expected: Ok with the row created
#[tokio::test]
async fn inserts_missing_setting() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SettingRepository::new(db);
    let row = repo.upsert("global", "log_writes", "10".to_string()).await?;

    assert_eq!(row.scope, "global");
    assert_eq!(row.name, "log_writes");
    assert_eq!(row.value, "10");

    Ok(())
}

/// Tests that upserting an existing key replaces its value instead of adding a row.
///
/// Expected: Ok with one row holding the new value
#[tokio::test]
async fn replaces_existing_setting() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let original = factory::create_global_setting(db, "log_writes", serde_json::json!(10)).await?;

    let repo = SettingRepository::new(db);
    let row = repo.upsert("global", "log_writes", "20".to_string()).await?;

    assert_eq!(row.id, original.id);
    assert_eq!(row.value, "20");
    assert_eq!(entity::prelude::Setting::find().count(db).await?, 1);

    Ok(())
}
