pub mod callback;
pub mod general_message;
pub mod message;

use std::sync::Arc;

use teloxide::{
    dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler},
    prelude::*,
};

use crate::bot::commands::Command;
use crate::bot::conversation::ConversationStore;
use crate::bot::workflow::IntakeWorkflow;
use crate::config::Config;
use crate::database::connection::DatabaseManager;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;

/// Handles passed into every update handler.
#[derive(Clone)]
pub struct BotContext {
    pub db: DatabaseManager,
    pub workflow: IntakeWorkflow,
    pub config: Arc<Config>,
}

impl BotContext {
    pub fn new(db: DatabaseManager, sessions: ConversationStore, config: Arc<Config>) -> Self {
        Self {
            workflow: IntakeWorkflow::new(db.clone(), sessions),
            db,
            config,
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.config.is_admin(user_id.0)
    }
}

/// The user behind an update and the chat to answer in.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: UserId,
    pub chat_id: ChatId,
    pub username: String,
}

impl Caller {
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.from().map(|user| Self {
            id: user.id,
            chat_id: msg.chat.id,
            username: user.username.clone().unwrap_or_else(|| "unknown".to_string()),
        })
    }

    pub fn from_callback(q: &CallbackQuery) -> Self {
        Self {
            id: q.from.id,
            chat_id: q
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(ChatId(q.from.id.0 as i64)),
            username: q.from.username.clone().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        let ctx_command = self.ctx.clone();
        let ctx_message = self.ctx.clone();
        let ctx_callback = self.ctx.clone();

        let messages = Update::filter_message()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = ctx_command.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
            .branch(dptree::endpoint(move |bot: Bot, msg: Message| {
                let ctx = ctx_message.clone();
                async move { general_message::handle_message(bot, msg, ctx).await }
            }));

        dptree::entry()
            .branch(messages)
            .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let ctx = ctx_callback.clone();
                async move { callback::callback_handler(bot, q, ctx).await }
            }))
    }
}
