use teloxide::prelude::*;

use crate::bot::commands::position;
use crate::bot::handlers::{BotContext, Caller, HandlerResult};
use crate::bot::workflow::Progress;
use crate::error::{BotError, Result};
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_success};

/// Routes a non-command message: an admin with an open form gets the next
/// step, everything else falls through to the catch-all replies.
pub async fn handle_message(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    let Some(caller) = Caller::from_message(&msg) else {
        return Ok(());
    };
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);

    let looks_like_command = msg.text().is_some_and(|t| t.starts_with('/'));
    if !ctx.is_admin(caller.id) || looks_like_command {
        return handle_general_message(&feedback, &msg).await;
    }

    let active = match ctx.workflow.current_step(caller.id).await {
        Ok(step) => step.is_some(),
        Err(e) => {
            log_command_error("form", &caller.username, caller.id.0, &e.to_string());
            feedback.report(&e).await?;
            return Ok(());
        }
    };

    let photo = largest_photo(&msg);
    if !active && photo.is_none() {
        return handle_general_message(&feedback, &msg).await;
    }

    let outcome: Result<Progress> = if let Some(text) = msg.text() {
        ctx.workflow.submit_text(caller.id, text).await
    } else if let Some(photo) = photo {
        ctx.workflow.submit_photo(caller.id, &photo).await
    } else {
        feedback.warning("Please answer with a text message or a photo.").await?;
        return Ok(());
    };

    match outcome {
        Ok(Progress::Next { prompt, .. }) => {
            feedback.prompt(prompt).await?;
        }
        Ok(Progress::Completed(employee)) => {
            log_command_success(
                "addemployee",
                &caller.username,
                caller.id.0,
                Some(&format!("employee {} via form", employee.id)),
            );
            feedback
                .success(&format!(
                    "Employee {} {} was added.",
                    employee.first_name, employee.last_name
                ))
                .await?;
        }
        Err(e) => {
            if !matches!(e, BotError::Validation(_)) {
                log_command_error("form", &caller.username, caller.id.0, &e.to_string());
            }
            feedback.report(&e).await?;
            if matches!(e, BotError::UnknownPosition(_)) {
                position::suggest_known_positions(&feedback, &ctx).await?;
            }
        }
    }

    Ok(())
}

/// File id of the highest resolution size of an attached photo.
pub fn largest_photo(msg: &Message) -> Option<String> {
    msg.photo()
        .and_then(|sizes| sizes.iter().max_by_key(|size| size.width * size.height))
        .map(|size| size.file.id.clone())
}

async fn handle_general_message(feedback: &CommandFeedback, msg: &Message) -> HandlerResult {
    if let Some(text) = msg.text() {
        let lowered = text.to_lowercase();
        if text.starts_with('/') {
            let error_msg = format!(
                "Unknown command: {}",
                text.split_whitespace().next().unwrap_or(text)
            );
            feedback
                .validation_error(&error_msg, "Use /help to see all available commands.")
                .await?;
        } else if lowered.contains("birthday") || lowered.contains("employee") {
            feedback
                .info("Administrators can add employees with /addemployee and view them with /employees.")
                .await?;
        }
        // Other chatter gets no reply
    }

    Ok(())
}
