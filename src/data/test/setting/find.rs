use super::*;

/// Tests finding a stored setting by scope and name.
///
/// Expected: Ok(Some) with the stored raw JSON
#[tokio::test]
async fn finds_setting_in_scope() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_setting(db, 42, "wizard_divisions", serde_json::json!(["Hugin"]))
        .await?;

    let repo = SettingRepository::new(db);
    let found = repo.find("42", "wizard_divisions").await?;

    assert!(found.is_some());
    assert_eq!(found.unwrap().value, r#"["Hugin"]"#);

    Ok(())
}

/// Tests that a setting stored for another guild is not returned.
///
/// Expected: Ok(None)
#[tokio::test]
async fn ignores_other_scopes() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_setting(db, 42, "wizard_divisions", serde_json::json!([])).await?;
    factory::create_global_setting(db, "wizard_divisions", serde_json::json!([])).await?;

    let repo = SettingRepository::new(db);
    let found = repo.find("43", "wizard_divisions").await?;

    assert!(found.is_none());

    Ok(())
}
