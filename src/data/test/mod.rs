mod guild_store;
mod setting;
