//! Small helpers shared by the bot and service layers.

pub mod paginate;
pub mod parse;
pub mod text;
