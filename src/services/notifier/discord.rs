use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::{Notifier, NotifyError, NotifyResult, OutboundMessage};
use crate::dao::models::{ChannelId, MessageId};

/// Notifier backed by the Discord channel messages REST API.
#[derive(Clone)]
pub struct DiscordNotifier {
    client: Client,
    base_url: Arc<str>,
    token: Arc<str>,
}

#[derive(Deserialize)]
struct CreatedMessage {
    id: String,
}

impl DiscordNotifier {
    /// Build a notifier authenticating with a bot token.
    pub fn new(base_url: &str, token: &str) -> NotifyResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            token: Arc::from(token),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    async fn dispatch(builder: RequestBuilder) -> NotifyResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(NotifyError::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(NotifyError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

impl Notifier for DiscordNotifier {
    fn send(
        &self,
        channel: ChannelId,
        message: OutboundMessage,
    ) -> BoxFuture<'static, NotifyResult<MessageId>> {
        let builder = self
            .request(Method::POST, &format!("channels/{channel}/messages"))
            .json(&message);
        Box::pin(async move {
            let response = Self::dispatch(builder).await?;
            let created: CreatedMessage = response
                .json()
                .await
                .map_err(|err| NotifyError::Transport(err.to_string()))?;
            created
                .id
                .parse()
                .map_err(|_| NotifyError::Transport(format!("unexpected message id `{}`", created.id)))
        })
    }

    fn edit(
        &self,
        channel: ChannelId,
        message_id: MessageId,
        message: OutboundMessage,
    ) -> BoxFuture<'static, NotifyResult<()>> {
        let builder = self
            .request(
                Method::PATCH,
                &format!("channels/{channel}/messages/{message_id}"),
            )
            .json(&message);
        Box::pin(async move { Self::dispatch(builder).await.map(|_| ()) })
    }

    fn delete(
        &self,
        channel: ChannelId,
        message_id: MessageId,
    ) -> BoxFuture<'static, NotifyResult<()>> {
        let builder = self.request(
            Method::DELETE,
            &format!("channels/{channel}/messages/{message_id}"),
        );
        Box::pin(async move { Self::dispatch(builder).await.map(|_| ()) })
    }
}
