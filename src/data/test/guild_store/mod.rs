use std::collections::BTreeMap;

use crate::{
    data::guild_store::{GuildStore, Scope, EVENT_ROLES, LOG_WRITES, WIZARD_DIVISIONS},
    error::AppError,
};
use test_utils::{builder::TestBuilder, factory};

mod get;
mod update;
