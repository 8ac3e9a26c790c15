use teloxide::prelude::*;

use crate::bot::handlers::{BotContext, Caller, HandlerResult};
use crate::database::models::Position;
use crate::error::BotError;
use crate::utils::{
    feedback::CommandFeedback,
    logging::{log_command_error, log_command_success, log_database_error},
    validation::validate_position_name,
};

pub async fn handle_add_position(
    bot: &Bot,
    caller: &Caller,
    name: &str,
    ctx: &BotContext,
) -> HandlerResult {
    let feedback = CommandFeedback::new(bot.clone(), caller.chat_id);

    let name = match validate_position_name(name) {
        Ok(name) => name,
        Err(e) => {
            feedback
                .validation_error(&e.to_string(), "Use /addposition <name>, for example /addposition Engineer")
                .await?;
            return Ok(());
        }
    };

    match Position::create(&ctx.db.pool, &name).await {
        Ok(position) => {
            log_command_success("addposition", &caller.username, caller.id.0, Some(&position.name));
            feedback
                .success(&format!("Position '{}' was added.", position.name))
                .await?;
        }
        Err(e) => {
            if let BotError::Storage(db_error) = &e {
                log_database_error("insert", "positions", &db_error.to_string());
            }
            log_command_error("addposition", &caller.username, caller.id.0, &e.to_string());
            feedback.report(&e).await?;
        }
    }

    Ok(())
}

/// Reminds the admin which position names exist after a lookup missed.
pub async fn suggest_known_positions(feedback: &CommandFeedback, ctx: &BotContext) -> HandlerResult {
    match Position::list(&ctx.db.pool).await {
        Ok(positions) => {
            feedback.info(&format_position_list(&positions)).await?;
        }
        Err(e) => log_database_error("select", "positions", &e.to_string()),
    }

    Ok(())
}

pub fn format_position_list(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "No positions yet. Add one with /addposition <name>.".to_string();
    }

    let names: Vec<&str> = positions.iter().map(|p| p.name.as_str()).collect();
    format!("Known positions: {}", names.join(", "))
}
