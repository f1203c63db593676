//! Forwarding shims for webhook registration.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::client::AirtableClient;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<String>,
    #[serde(default)]
    pub is_hook_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WebhookList {
    #[serde(default)]
    webhooks: Vec<Webhook>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWebhook {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_secret_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,
}

impl AirtableClient {
    fn webhooks_path(&self) -> String {
        format!("/v0/bases/{}/webhooks", self.base_id())
    }

    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        let list: WebhookList = self.request(Method::GET, &self.webhooks_path(), None).await?;
        Ok(list.webhooks)
    }

    /// Register a webhook; `specification` is forwarded as-is.
    pub async fn create_webhook(
        &self,
        notification_url: Option<&str>,
        specification: &Value,
    ) -> Result<CreatedWebhook> {
        let mut body = json!({"specification": specification});
        if let Some(url) = notification_url {
            body["notificationUrl"] = json!(url);
        }
        self.request(Method::POST, &self.webhooks_path(), Some(&body))
            .await
    }

    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let path = format!("{}/{}", self.webhooks_path(), webhook_id);
        let _: Value = self.request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}
