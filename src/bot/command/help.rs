use crate::error::AppError;

use super::CommandContext;

const COMMANDS: &[(&str, &str)] = &[
    ("members new <amount> <days|weeks|months>", "Members who joined recently"),
    ("members role <@role|name>", "Members holding a role"),
    ("events list", "Scheduled events of this server"),
    ("events info <name>", "One scheduled event and its interested members"),
    ("events members <name>", "Alias of `events info`"),
    ("events role <create|sync|delete> <name>", "Manage a role for an event's interested members"),
    ("wizard start [title]", "Start an event draft"),
    ("wizard import <event name>", "Fill the draft from a scheduled event"),
    ("wizard description <text>", "Set the draft description"),
    ("wizard role <division> | <name> [| capacity [| description]]", "Add a signup role"),
    ("wizard options [comms=a,b] [calendar=linked|unlinked] [sync=on|off]", "Draft options"),
    ("wizard channels [search]", "Find a channel to publish to"),
    ("wizard publish <#channel>", "Publish the draft"),
    ("wizard show", "Show your current draft"),
    ("wizard cancel", "Discard the draft"),
    ("post list", "Published event posts"),
    ("post interest <post id>", "Toggle your interest"),
    ("post signup <post id> <role>", "Sign up for a role"),
    ("post withdraw <post id>", "Withdraw your signup"),
    ("post info <post id>", "Show a post with its signups"),
    ("post delete <post id>", "Delete a post"),
    ("divisions [list|add <name>|remove <name>|reset]", "Role divisions offered by the wizard"),
    ("logs [count]", "Recent operator log lines"),
    ("clearlogs", "Delete the operator log"),
    ("debug", "Server and permission snapshot"),
];

/// Lists every command with a one-line description.
pub async fn run(cc: &CommandContext<'_>) -> Result<(), AppError> {
    let prefix = &cc.state.command_prefix;
    let lines: Vec<String> = COMMANDS
        .iter()
        .map(|(usage, about)| format!("`{}do {}` - {}", prefix, usage, about))
        .collect();

    cc.reply_paged(
        &lines,
        Some("**DiscoOps commands**"),
        Some("Management commands require the Manage Server permission."),
    )
    .await
}
