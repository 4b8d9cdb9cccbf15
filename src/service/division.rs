use crate::{
    data::guild_store::{GuildStore, Scope, WIZARD_DIVISIONS},
    error::AppError,
    util::text::{find_by_name, norm_text},
};

/// Divisions offered before a guild customizes its list.
pub const DEFAULT_DIVISIONS: [&str; 5] = ["General", "Tanks", "Healers", "Damage", "Support"];

fn defaults() -> Vec<String> {
    DEFAULT_DIVISIONS.iter().map(|d| d.to_string()).collect()
}

/// Guild vocabulary of role divisions used by the wizard.
///
/// Stored as `Option<Vec<String>>` so an unset key falls back to the defaults while an
/// explicitly emptied list stays empty.
pub struct DivisionService<'a> {
    store: &'a GuildStore,
}

impl<'a> DivisionService<'a> {
    pub fn new(store: &'a GuildStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, guild_id: u64) -> Result<Vec<String>, AppError> {
        let stored: Option<Vec<String>> =
            self.store.get(Scope::Guild(guild_id), WIZARD_DIVISIONS).await?;

        Ok(stored.unwrap_or_else(defaults))
    }

    /// Adds a division unless a normalized equal one exists.
    ///
    /// # Returns
    /// - `Ok(true)` - Division added
    /// - `Ok(false)` - Already present; nothing changed
    /// - `Err(AppError::BadRequest)` - Name is blank
    pub async fn add(&self, guild_id: u64, name: &str) -> Result<bool, AppError> {
        let name = name.trim();
        if norm_text(name).is_empty() {
            return Err(AppError::BadRequest("Division name cannot be empty.".to_string()));
        }

        self.store
            .update(
                Scope::Guild(guild_id),
                WIZARD_DIVISIONS,
                |stored: &mut Option<Vec<String>>| {
                    let list = stored.get_or_insert_with(defaults);
                    if list.iter().any(|d| norm_text(d) == norm_text(name)) {
                        return Ok(false);
                    }
                    list.push(name.to_string());
                    Ok(true)
                },
            )
            .await
    }

    /// Removes the division matching `name` after normalization.
    ///
    /// # Returns
    /// - `Ok(Some(name))` - Stored spelling of the removed division
    /// - `Ok(None)` - No such division
    pub async fn remove(&self, guild_id: u64, name: &str) -> Result<Option<String>, AppError> {
        self.store
            .update(
                Scope::Guild(guild_id),
                WIZARD_DIVISIONS,
                |stored: &mut Option<Vec<String>>| {
                    let list = stored.get_or_insert_with(defaults);
                    let needle = norm_text(name);
                    Ok(list
                        .iter()
                        .position(|d| norm_text(d) == needle)
                        .map(|idx| list.remove(idx)))
                },
            )
            .await
    }

    /// Restores the default list.
    pub async fn reset(&self, guild_id: u64) -> Result<Vec<String>, AppError> {
        self.store
            .clear(Scope::Guild(guild_id), WIZARD_DIVISIONS)
            .await?;

        Ok(defaults())
    }

    /// Maps typed input onto a configured division, keeping the input when none matches.
    pub async fn resolve(&self, guild_id: u64, input: &str) -> Result<String, AppError> {
        let divisions = self.list(guild_id).await?;

        Ok(find_by_name(&divisions, input, |d| d.as_str())
            .cloned()
            .unwrap_or_else(|| input.trim().to_string()))
    }
}
