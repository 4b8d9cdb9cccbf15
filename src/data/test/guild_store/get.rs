use super::*;

/// Tests reading a key that was never stored.
///
/// Expected: Ok with the type's default
#[tokio::test]
async fn missing_key_reads_default() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = GuildStore::new(db.clone());
    let divisions: Vec<String> = store.get(Scope::Guild(1), WIZARD_DIVISIONS).await?;
    let writes: u64 = store.get(Scope::Global, LOG_WRITES).await?;

    assert!(divisions.is_empty());
    assert_eq!(writes, 0);

    Ok(())
}

/// Tests decoding a stored map with integer keys.
///
/// Expected: Ok with the decoded map
#[tokio::test]
async fn decodes_stored_value() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_setting(db, 7, EVENT_ROLES, serde_json::json!({"555": 999})).await?;

    let store = GuildStore::new(db.clone());
    let roles: BTreeMap<u64, u64> = store.get(Scope::Guild(7), EVENT_ROLES).await?;

    assert_eq!(roles.get(&555), Some(&999));

    Ok(())
}

/// Tests that a value written with `set` is read back, and `clear` resets it.
///
/// Expected: Ok with the stored value, then the default
#[tokio::test]
async fn set_then_clear() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = GuildStore::new(db.clone());
    store.set(Scope::Global, LOG_WRITES, &40u64).await?;
    let stored: u64 = store.get(Scope::Global, LOG_WRITES).await?;
    assert_eq!(stored, 40);

    store.clear(Scope::Global, LOG_WRITES).await?;
    let cleared: u64 = store.get(Scope::Global, LOG_WRITES).await?;
    assert_eq!(cleared, 0);

    Ok(())
}

/// Tests that a value which does not decode surfaces as a serde error.
///
/// Expected: Err(AppError::SerdeErr)
#[tokio::test]
async fn undecodable_value_errors() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_global_setting(db, LOG_WRITES, serde_json::json!("not a number")).await?;

    let store = GuildStore::new(db.clone());
    let result: Result<u64, AppError> = store.get(Scope::Global, LOG_WRITES).await;

    assert!(matches!(result, Err(AppError::SerdeErr(_))));

    Ok(())
}
