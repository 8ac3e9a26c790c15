use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::error::BotError;
use crate::utils::markdown::escape_markdown;

/// Feedback types for different command outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Success,
    Warning,
    Error,
    Info,
    Prompt,
}

impl FeedbackType {
    fn emoji(self) -> &'static str {
        match self {
            FeedbackType::Success => "✅",
            FeedbackType::Warning => "⚠️",
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Prompt => "✏️",
        }
    }

    /// Plain text with the emoji prefix, before markdown escaping.
    pub fn decorate(self, message: &str) -> String {
        format!("{} {}", self.emoji(), message)
    }
}

/// Replies to the admin who sent the current message
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, escape_markdown(&feedback_type.decorate(message)))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    pub async fn success(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Success, message).await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn warning(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Warning, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Asks for the next form field
    pub async fn prompt(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Prompt, message).await
    }

    /// Reports a failed interaction using the error's user-facing text
    pub async fn report(&self, error: &BotError) -> ResponseResult<Message> {
        match error {
            BotError::Validation(_) | BotError::DuplicateName(_) => {
                self.warning(&error.user_message()).await
            }
            _ => self.error(&error.user_message()).await,
        }
    }

    /// Send validation error with helpful suggestion
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let message = format!("{error}\n\n💡 Suggestion: {suggestion}");
        self.send(FeedbackType::Error, &message).await
    }
}
