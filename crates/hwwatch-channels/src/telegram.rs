use async_trait::async_trait;
use hwwatch_core::ChatSink;
use teloxide::prelude::*;
use teloxide::types::Recipient;

/// Sends plain-text messages to one fixed Telegram chat.
pub struct TelegramSink {
    bot: Bot,
    chat: Recipient,
}

impl TelegramSink {
    pub fn new(token: impl Into<String>, chat_id: &str) -> Self {
        Self {
            bot: Bot::new(token),
            chat: parse_recipient(chat_id),
        }
    }

    /// Points the bot at a different Bot API server.
    pub fn with_api_url(mut self, url: url::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }

    pub fn recipient(&self) -> &Recipient {
        &self.chat
    }
}

#[async_trait]
impl ChatSink for TelegramSink {
    fn channel_type(&self) -> &str {
        "telegram"
    }

    async fn send_text(&self, text: &str) -> anyhow::Result<()> {
        self.bot.send_message(self.chat.clone(), text).await?;
        tracing::debug!(chat = ?self.chat, "delivered message to Telegram");
        Ok(())
    }
}

/// Numeric ids (negative for groups) address a chat directly, anything else
/// is treated as a public channel username such as `@my_channel`.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}
