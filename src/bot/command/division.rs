use crate::{error::AppError, service::division::DivisionService};

use super::{split_word, CommandContext};

pub async fn run(cc: &CommandContext<'_>, args: &str) -> Result<(), AppError> {
    let (sub, name) = split_word(args);
    let service = DivisionService::new(&cc.state.store);

    let reply = match sub.to_lowercase().as_str() {
        "" | "list" => {
            let divisions = service.list(cc.guild_id).await?;
            format!("**Divisions:** {}", divisions.join(", "))
        }
        "add" => {
            if service.add(cc.guild_id, name).await? {
                format!("✅ Added division **{}**.", name)
            } else {
                format!("Division **{}** already exists.", name)
            }
        }
        "remove" => match service.remove(cc.guild_id, name).await? {
            Some(removed) => format!("✅ Removed division **{}**.", removed),
            None => format!("No division named **{}**.", name),
        },
        "reset" => {
            let divisions = service.reset(cc.guild_id).await?;
            format!("✅ Divisions reset to: {}", divisions.join(", "))
        }
        _ => {
            return Err(AppError::BadRequest(
                "Usage: `divisions [list | add <name> | remove <name> | reset]`".to_string(),
            ))
        }
    };

    cc.reply(reply).await?;

    Ok(())
}
