use crate::data::setting::SettingRepository;
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod find;
mod upsert;
