// notifier/telegram/sender.rs

use crate::model::NotifyError;
use crate::notifier::telegram::TelegramNotifier;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const PHOTO_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends a Markdown text message to the configured chat.
pub async fn send_text(notifier: &TelegramNotifier, text: &str) -> Result<(), NotifyError> {
    let url = notifier.method_url("sendMessage");
    let params = [
        ("chat_id", notifier.chat_id.to_string()),
        ("text", text.to_string()),
        ("parse_mode", "Markdown".to_string()),
    ];
    let request = notifier.client.post(&url).form(&params).send();
    let response = match timeout(SEND_TIMEOUT, request).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            warn!("❌ Telegram sendMessage failed: {:?}", e);
            return Err(NotifyError::ApiError(format!("Send failed: {}", e)));
        }
        Err(_) => {
            warn!("⏳ Telegram sendMessage timed out");
            return Err(NotifyError::Unreachable);
        }
    };
    check_response("sendMessage", response).await
}

/// Uploads a PNG as a photo to the configured chat.
pub async fn send_photo(notifier: &TelegramNotifier, png: Vec<u8>, file_name: &str) -> Result<(), NotifyError> {
    let url = notifier.method_url("sendPhoto");
    let part = Part::bytes(png)
        .file_name(file_name.to_string())
        .mime_str("image/png")
        .map_err(|e| NotifyError::ApiError(format!("Bad photo part: {}", e)))?;
    let form = Form::new()
        .text("chat_id", notifier.chat_id.to_string())
        .part("photo", part);

    let request = notifier.client.post(&url).multipart(form).send();
    let response = match timeout(PHOTO_TIMEOUT, request).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            warn!("❌ Telegram sendPhoto failed: {:?}", e);
            return Err(NotifyError::ApiError(format!("Upload failed: {}", e)));
        }
        Err(_) => {
            warn!("⏳ Telegram sendPhoto timed out");
            return Err(NotifyError::Unreachable);
        }
    };
    check_response("sendPhoto", response).await
}

async fn check_response(method: &str, response: Response) -> Result<(), NotifyError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_else(|_| "unknown".into());
    if !status.is_success() {
        warn!("❌ Telegram {} responded [{}]: {}", method, status, body);
        return Err(NotifyError::ApiError(format!("{} returned {}", method, status)));
    }
    debug!("✅ Telegram {} [{}]: {}", method, status, body);
    Ok(())
}
