use super::*;
use crate::{
    model::draft::{CalendarMode, DraftOptions},
    service::division::DivisionService,
};

/// Tests that starting a draft registers it and renders a preview.
///
/// Expected: draft is active and its preview message is tracked
#[tokio::test]
async fn start_draft_registers_and_renders() -> Result<(), AppError> {
    let h = harness().await;

    let started = h
        .workflow
        .start_draft(GUILD, ORGANIZER, CHANNEL, Some("Raid Night"))
        .await;

    assert!(started.replaced.is_none());
    assert_eq!(started.draft.title, "Raid Night");
    assert!(started.draft.preview_message.is_some());
    assert_eq!(started.draft.wizard_messages.len(), 1);
    assert_eq!(
        h.workflow.active_draft(ORGANIZER).await.map(|d| d.id),
        Some(started.draft.id)
    );
    assert_eq!(h.renderer.previews.lock().unwrap().len(), 1);

    Ok(())
}

/// Tests that a second start replaces the organizer's draft and reports it.
///
/// Expected: `replaced` is set and the old wizard messages are deleted
#[tokio::test]
async fn second_start_replaces_and_warns() -> Result<(), AppError> {
    let h = harness().await;

    let first = h.workflow.start_draft(GUILD, ORGANIZER, CHANNEL, None).await;
    let second = h
        .workflow
        .start_draft(GUILD, ORGANIZER, CHANNEL, Some("Second"))
        .await;

    assert_eq!(second.replaced.as_deref(), Some(first.draft.id.as_str()));
    assert_eq!(
        h.workflow.active_draft(ORGANIZER).await.map(|d| d.title),
        Some("Second".to_string())
    );
    assert_eq!(
        *h.renderer.deleted.lock().unwrap(),
        first.draft.wizard_messages
    );
    assert!(h.log.tail(5).await.contains("replaced by"));

    Ok(())
}

/// Tests that only the organizer may edit a draft.
///
/// Expected: Err(NotOrganizer) and the draft is unchanged
#[tokio::test]
async fn other_user_cannot_edit_draft() -> Result<(), AppError> {
    let h = harness().await;
    let started = h.workflow.start_draft(GUILD, ORGANIZER, CHANNEL, None).await;

    let result = h
        .workflow
        .set_description(ORGANIZER + 1, &started.draft.id, "hijacked")
        .await;

    assert!(matches!(
        result,
        Err(AppError::WorkflowErr(WorkflowError::NotOrganizer))
    ));
    let draft = h.workflow.active_draft(ORGANIZER).await.unwrap();
    assert!(draft.description.is_empty());

    Ok(())
}

/// Tests editing a draft that does not exist.
///
/// Expected: Err(NoActiveDraft)
#[tokio::test]
async fn editing_unknown_draft_fails() -> Result<(), AppError> {
    let h = harness().await;

    let result = h.workflow.set_description(ORGANIZER, "missing", "text").await;

    assert!(matches!(
        result,
        Err(AppError::WorkflowErr(WorkflowError::NoActiveDraft))
    ));

    Ok(())
}

/// Tests that every successful edit triggers a preview re-render.
///
/// Expected: one preview per start and per edit, showing the latest state
#[tokio::test]
async fn edits_rerender_preview() -> Result<(), AppError> {
    let h = harness().await;
    let id = draft_with_role(&h, ORGANIZER, "1").await;

    h.workflow
        .set_description(ORGANIZER, &id, "Bring consumables")
        .await?;

    let previews = h.renderer.previews.lock().unwrap();
    assert_eq!(previews.len(), 3);
    assert!(previews[2].contains("Bring consumables"));
    assert!(previews[2].contains("Tank (cap 1)"));

    Ok(())
}

/// Tests that a duplicate role is rejected and leaves the role set unchanged.
///
/// Expected: Err(DuplicateRole), one role remains
#[tokio::test]
async fn duplicate_role_is_rejected() -> Result<(), AppError> {
    let h = harness().await;
    let id = draft_with_role(&h, ORGANIZER, "1").await;

    let result = h
        .workflow
        .add_role(ORGANIZER, &id, "HUGIN", " 'tank' ", None, None)
        .await;

    assert!(matches!(
        result,
        Err(AppError::WorkflowErr(WorkflowError::DuplicateRole { .. }))
    ));
    assert_eq!(h.workflow.active_draft(ORGANIZER).await.unwrap().roles.len(), 1);

    Ok(())
}

/// Tests adding a role without a division after the same role in `General`.
///
/// Expected: Err(DuplicateRole), one `General` role remains
#[tokio::test]
async fn blank_division_duplicates_general_role() -> Result<(), AppError> {
    let h = harness().await;
    let started = h.workflow.start_draft(GUILD, ORGANIZER, CHANNEL, None).await;
    h.workflow
        .add_role(ORGANIZER, &started.draft.id, "General", "Tank", None, None)
        .await?;

    let division = DivisionService::new(&h.workflow.store).resolve(GUILD, " ").await?;
    let result = h
        .workflow
        .add_role(ORGANIZER, &started.draft.id, &division, "Tank", None, None)
        .await;

    assert!(matches!(
        result,
        Err(AppError::WorkflowErr(WorkflowError::DuplicateRole { .. }))
    ));
    let roles = h.workflow.active_draft(ORGANIZER).await.unwrap().roles;
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].division, "General");

    Ok(())
}

/// Tests setting a role emoji and the unknown-role error.
///
/// Expected: emoji stored on the role; unknown role ID fails
#[tokio::test]
async fn sets_role_emoji() -> Result<(), AppError> {
    let h = harness().await;
    let id = draft_with_role(&h, ORGANIZER, "1").await;

    let draft = h.workflow.set_role_emoji(ORGANIZER, &id, "r1", "🛡️").await?;
    let missing = h.workflow.set_role_emoji(ORGANIZER, &id, "r9", "🛡️").await;

    assert_eq!(draft.roles[0].emoji.as_deref(), Some("🛡️"));
    assert!(matches!(
        missing,
        Err(AppError::WorkflowErr(WorkflowError::UnknownRole(_)))
    ));

    Ok(())
}

/// Tests importing a scheduled event by name and unlinking it again.
///
/// Expected: draft hydrated and linked, then unlinked with sync-back off
#[tokio::test]
async fn import_and_unlink_event() -> Result<(), AppError> {
    let h = harness().await;
    let started = h.workflow.start_draft(GUILD, ORGANIZER, CHANNEL, None).await;

    let event = h.workflow.find_external_event(GUILD, "\"fleet op\"").await?;
    let draft = h
        .workflow
        .hydrate_from_external_event(ORGANIZER, &started.draft.id, &event)
        .await?;
    assert_eq!(draft.title, "Fleet Op");
    assert_eq!(draft.linked_event_id(), Some(555));
    assert!(draft.sync_back);

    let draft = h
        .workflow
        .set_options(
            ORGANIZER,
            &started.draft.id,
            DraftOptions {
                calendar: Some(CalendarMode::Unlinked),
                ..Default::default()
            },
        )
        .await?;
    assert!(draft.linked_event_id().is_none());
    assert!(!draft.sync_back);

    Ok(())
}

/// Tests looking up a scheduled event that does not exist.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn unknown_event_name_is_not_found() -> Result<(), AppError> {
    let h = harness().await;

    let result = h.workflow.find_external_event(GUILD, "Mining Op").await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests cancelling a draft.
///
/// Expected: draft removed, wizard messages deleted, nothing persisted
#[tokio::test]
async fn cancel_discards_draft() -> Result<(), AppError> {
    let h = harness().await;
    let started = h.workflow.start_draft(GUILD, ORGANIZER, CHANNEL, None).await;

    let cancelled = h.workflow.cancel(ORGANIZER, &started.draft.id).await?;

    assert_eq!(cancelled.status, crate::model::draft::DraftStatus::Canceled);
    assert!(h.workflow.active_draft(ORGANIZER).await.is_none());
    assert_eq!(h.renderer.deleted.lock().unwrap().len(), 1);
    assert!(h.workflow.list_posts(GUILD).await?.is_empty());
    assert!(h.log.tail(1).await.contains("Cancelled draft"));

    Ok(())
}

/// Tests that a failing renderer never breaks draft edits.
///
/// Expected: edit succeeds and the failure is written to the log file
#[tokio::test]
async fn render_failure_is_logged_not_fatal() -> Result<(), AppError> {
    let h = harness_with(FakeRenderer::failing(), FakeCalendar::default()).await;
    let started = h.workflow.start_draft(GUILD, ORGANIZER, CHANNEL, None).await;

    let draft = h
        .workflow
        .set_description(ORGANIZER, &started.draft.id, "still works")
        .await?;

    assert_eq!(draft.description, "still works");
    assert!(draft.preview_message.is_none());
    assert!(h.log.tail(1).await.contains("Failed to render preview"));

    Ok(())
}
