use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{admin, employee, position, Command};
use crate::bot::handlers::{BotContext, Caller, HandlerResult};
use crate::error::BotError;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::log_command_error;

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> HandlerResult {
    let Some(caller) = Caller::from_message(&msg) else {
        return Ok(());
    };

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
            return Ok(());
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "🎂 Hi! I'm the birthday reminder bot.\n\nAdministrators can use /admin to manage employees.\nUse /help to see all commands.",
            )
            .await?;
            return Ok(());
        }
        _ => {}
    }

    if !ctx.is_admin(caller.id) {
        let error = BotError::Authorization(caller.id.0);
        log_command_error(&format!("{cmd:?}"), &caller.username, caller.id.0, &error.to_string());
        CommandFeedback::new(bot, caller.chat_id).report(&error).await?;
        return Ok(());
    }

    match cmd {
        Command::Admin => admin::handle_admin(&bot, &caller, &ctx).await?,
        Command::AddPosition(name) => position::handle_add_position(&bot, &caller, &name, &ctx).await?,
        Command::AddEmployee(args) => employee::handle_add_employee(&bot, &caller, &args, &ctx).await?,
        Command::Employees => employee::handle_list_employees(&bot, &caller, &ctx).await?,
        Command::Cancel => employee::handle_cancel(&bot, &caller, &ctx).await?,
        Command::Help | Command::Start => {}
    }

    Ok(())
}
