use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::commands::position::format_position_list;
use crate::bot::handlers::{BotContext, Caller, HandlerResult};
use crate::database::models::Position;
use crate::utils::logging::{log_command_start, log_database_error};

pub const ADD_POSITION: &str = "addposition";
pub const ADD_EMPLOYEE: &str = "addemployee";
pub const LIST_EMPLOYEES: &str = "getemployees";

pub fn admin_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("➕ Add position", ADD_POSITION),
            InlineKeyboardButton::callback("👤 Add employee", ADD_EMPLOYEE),
        ],
        vec![InlineKeyboardButton::callback("📋 List all employees", LIST_EMPLOYEES)],
    ])
}

pub async fn handle_admin(bot: &Bot, caller: &Caller, ctx: &BotContext) -> HandlerResult {
    log_command_start("admin", &caller.username, caller.id.0, None);

    let positions = match Position::list(&ctx.db.pool).await {
        Ok(positions) => format_position_list(&positions),
        Err(e) => {
            log_database_error("select", "positions", &e.to_string());
            "Positions are unavailable right now.".to_string()
        }
    };

    let schedule = format!(
        "Welcome to the admin panel.\n\nBirthday announcements go out daily at {:02}:{:02} ({}).\n\n{}",
        ctx.config.notify_hour, ctx.config.notify_minute, ctx.config.timezone, positions
    );

    bot.send_message(caller.chat_id, schedule)
        .reply_markup(admin_keyboard())
        .await?;

    Ok(())
}
