pub mod sender;

use crate::model::NotifyError;
use crate::notifier::MessageSender;
use reqwest::Client;

pub struct TelegramNotifier {
    pub bot_token: String,
    pub chat_id: i64,
    pub client: Client,
    pub api_base: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: i64, client: Client) -> Self {
        Self {
            bot_token,
            chat_id,
            client,
            api_base: "https://api.telegram.org".to_string(),
        }
    }

    pub(crate) fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }
}

#[async_trait::async_trait]
impl MessageSender for TelegramNotifier {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
        sender::send_text(self, text).await
    }

    async fn send_image(&self, png: Vec<u8>, file_name: &str) -> Result<(), NotifyError> {
        sender::send_photo(self, png, file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let notifier = TelegramNotifier::new("123:abc".into(), -100, Client::new());
        assert_eq!(
            notifier.method_url("sendPhoto"),
            "https://api.telegram.org/bot123:abc/sendPhoto"
        );
    }
}
