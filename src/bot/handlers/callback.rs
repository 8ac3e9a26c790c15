use teloxide::prelude::*;

use crate::bot::commands::{admin, employee};
use crate::bot::handlers::{BotContext, Caller, HandlerResult};
use crate::error::BotError;

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    let caller = Caller::from_callback(&q);

    let Some(data) = q.data.clone() else {
        bot.answer_callback_query(q.id)
            .text("Invalid callback data format")
            .await?;
        return Ok(());
    };

    tracing::info!(
        "Callback received: '{}' from user {} ({}) in chat {}",
        data,
        caller.username,
        caller.id.0,
        caller.chat_id.0
    );

    if !ctx.is_admin(caller.id) {
        bot.answer_callback_query(q.id)
            .text(BotError::Authorization(caller.id.0).user_message())
            .await?;
        return Ok(());
    }

    match data.as_str() {
        admin::ADD_POSITION => {
            bot.answer_callback_query(q.id).await?;
            bot.send_message(
                caller.chat_id,
                "Send /addposition followed by the position name, for example:\n/addposition Engineer",
            )
            .await?;
        }
        admin::ADD_EMPLOYEE => {
            bot.answer_callback_query(q.id).await?;
            employee::start_intake(&bot, &caller, &ctx).await?;
        }
        admin::LIST_EMPLOYEES => {
            bot.answer_callback_query(q.id).await?;
            employee::handle_list_employees(&bot, &caller, &ctx).await?;
        }
        _ => {
            bot.answer_callback_query(q.id).text("Unknown action").await?;
        }
    }

    Ok(())
}
