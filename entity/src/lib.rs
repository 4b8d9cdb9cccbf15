//! SeaORM entities backing the guild-scoped settings store.

pub mod prelude;

pub mod setting;
