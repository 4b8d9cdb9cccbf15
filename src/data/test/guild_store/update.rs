use super::*;
use crate::error::workflow::WorkflowError;

/// Tests that an update persists the mutated value and returns the closure result.
///
/// Expected: Ok with the closure's return value and the new value stored
#[tokio::test]
async fn update_persists_mutation() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = GuildStore::new(db.clone());
    let len = store
        .update(Scope::Guild(1), WIZARD_DIVISIONS, |divisions: &mut Vec<String>| {
            divisions.push("Hugin".to_string());
            Ok(divisions.len())
        })
        .await?;

    let stored: Vec<String> = store.get(Scope::Guild(1), WIZARD_DIVISIONS).await?;
    assert_eq!(len, 1);
    assert_eq!(stored, vec!["Hugin".to_string()]);

    Ok(())
}

/// Tests that a rejected update leaves the stored value untouched.
///
/// Expected: Err from the closure, stored value unchanged
#[tokio::test]
async fn rejected_update_writes_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_guild_setting(db, 1, WIZARD_DIVISIONS, serde_json::json!(["Hugin"])).await?;

    let store = GuildStore::new(db.clone());
    let result: Result<(), AppError> = store
        .update(Scope::Guild(1), WIZARD_DIVISIONS, |divisions: &mut Vec<String>| {
            divisions.clear();
            Err(WorkflowError::NoActiveDraft.into())
        })
        .await;

    let stored: Vec<String> = store.get(Scope::Guild(1), WIZARD_DIVISIONS).await?;
    assert!(matches!(
        result,
        Err(AppError::WorkflowErr(WorkflowError::NoActiveDraft))
    ));
    assert_eq!(stored, vec!["Hugin".to_string()]);

    Ok(())
}

/// Tests that concurrent updates against one key are serialized.
///
/// Expected: every increment is kept
#[tokio::test]
async fn concurrent_updates_do_not_lose_writes() -> Result<(), AppError> {
    let test = TestBuilder::new().with_setting_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let store = GuildStore::new(db.clone());
    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .update(Scope::Global, LOG_WRITES, |count: &mut u64| {
                        *count += 1;
                        Ok(())
                    })
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap()?;
    }

    let count: u64 = store.get(Scope::Global, LOG_WRITES).await?;
    assert_eq!(count, 10);

    Ok(())
}
