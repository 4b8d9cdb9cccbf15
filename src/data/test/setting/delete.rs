use super::*;

/// Tests deleting a stored setting.
///
/// Expected: Ok(true) and the row is gone
#[tokio::test]
async fn deletes_setting() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_setting(db, 42, "event_roles", serde_json::json!({"1": 2})).await?;

    let repo = SettingRepository::new(db);
    let deleted = repo.delete("42", "event_roles").await?;

    assert!(deleted);
    assert!(repo.find("42", "event_roles").await?.is_none());

    Ok(())
}

/// Tests deleting a key that was never stored.
///
/// Expected: Ok(false)
#[tokio::test]
async fn delete_missing_setting_is_noop() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SettingRepository::new(db);
    let deleted = repo.delete("42", "event_roles").await?;

    assert!(!deleted);

    Ok(())
}
