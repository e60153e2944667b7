// Delivery channel for finished alerts.

pub mod telegram;

pub use telegram::TelegramNotifier;

use crate::model::NotifyError;

#[async_trait::async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<(), NotifyError>;
    async fn send_image(&self, png: Vec<u8>, file_name: &str) -> Result<(), NotifyError>;
}
