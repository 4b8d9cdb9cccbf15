//! Database layer for guild-scoped settings.
//!
//! `SettingRepository` performs the raw row operations on the `setting` table. `GuildStore`
//! builds the typed key/value store on top of it that services use: JSON values addressed
//! by `(scope, key)` with an atomic read-modify-write primitive.

pub mod guild_store;
pub mod setting;

#[cfg(test)]
mod test;
