use thiserror::Error;

/// Recoverable failures of the event wizard and published post operations.
///
/// Every variant is reported to the acting user as a short message and leaves
/// previously persisted state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// A role with the same normalized `(division, name)` already exists on the draft.
    #[error("A role named **{name}** already exists in division **{division}**.")]
    DuplicateRole { division: String, name: String },

    /// Capacity input was not a number, or the draft already holds the maximum number of roles.
    #[error("{0}")]
    Capacity(String),

    /// A role was added without a name.
    #[error("Role name cannot be empty.")]
    EmptyRoleName,

    /// The linked scheduled event already has a published post.
    #[error("Scheduled event {external_event_id} is already published as post `{post_id}`.")]
    DuplicatePublication {
        external_event_id: u64,
        post_id: String,
    },

    /// The selected role has no free slot left.
    #[error("**{role}** is full ({current}/{capacity}).")]
    RoleFull {
        role: String,
        current: usize,
        capacity: u32,
    },

    /// The post ID is not (or no longer) present in the guild store.
    #[error("Event post `{0}` is not tracked; it may have been deleted.")]
    EventNotTracked(String),

    /// The linked scheduled event vanished or the platform call failed.
    #[error("Scheduled event unavailable: {0}")]
    ExternalEventUnavailable(String),

    /// The acting user has no draft in progress (or the draft ID is stale).
    #[error("You have no event draft in progress. Start one with `wizard start`.")]
    NoActiveDraft,

    /// Someone other than the organizer tried to edit a draft.
    #[error("Only the organizer of this draft can change it.")]
    NotOrganizer,

    /// The requested role does not exist on the post.
    #[error("No role matching `{0}` exists on this event.")]
    UnknownRole(String),
}
