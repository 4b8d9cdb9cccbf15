//! Factory methods for creating test data.
//!
//! Factories insert rows directly into the `setting` table so tests can start from
//! pre-existing persisted state (a guild that already has published posts, a stale
//! log counter, and so on) without going through the service layer.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let row = factory::setting::SettingFactory::new(&db)
//!     .scope("global")
//!     .name("log_writes")
//!     .value(serde_json::json!(49))
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `setting` - Create raw setting rows
//! - `helpers` - Unique ID generation shared by factories

pub mod helpers;
pub mod setting;

pub use setting::{create_global_setting, create_guild_setting};
