//! DiscoOps Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the DiscoOps
//! bot. This crate offers a builder pattern for creating test contexts with in-memory SQLite
//! databases holding the settings table that backs the guild store.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **factory**: Inserts raw setting rows for tests that need pre-existing state
//! - **serenity**: Builds Serenity API objects (scheduled events) from JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::Setting;
//!
//! #[tokio::test]
//! async fn test_store_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(Setting)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
