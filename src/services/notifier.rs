use std::future::Future;

use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::error::Result;

/// Delivery of birthday announcements to admin chats.
///
/// Implemented for the teloxide [`Bot`]; tests substitute a recorder.
pub trait Notifier: Send + Sync {
    fn send_text(&self, to: ChatId, text: String) -> impl Future<Output = Result<()>> + Send;

    /// `photo` is a Telegram file id or an HTTP URL.
    fn send_photo(
        &self,
        to: ChatId,
        photo: String,
        caption: String,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl Notifier for Bot {
    fn send_text(&self, to: ChatId, text: String) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.send_message(to, text).await?;
            Ok(())
        }
    }

    fn send_photo(
        &self,
        to: ChatId,
        photo: String,
        caption: String,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            Requester::send_photo(self, to, InputFile::file_id(photo))
                .caption(caption)
                .await?;
            Ok(())
        }
    }
}
