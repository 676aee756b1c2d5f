use tracing::{info, warn};

use crate::{services::notifier::OutboundMessage, state::SharedState};

const ONLINE_NOTICE: &str = "Bot is now online in this channel!";

/// Tell the configured announce channel the service is up.
///
/// Returns whether the notice was posted. Failures are logged and never stop startup.
pub async fn announce_online(state: &SharedState) -> bool {
    let Some(channel) = state.config().announce_channel_id else {
        info!("no announce channel configured; skipping startup notice");
        return false;
    };

    let message = OutboundMessage::default().with_content(ONLINE_NOTICE);
    match state.notifier().send(channel, message).await {
        Ok(message_id) => {
            info!(channel = %channel, message_id = %message_id, "posted startup notice");
            true
        }
        Err(err) => {
            warn!(channel = %channel, error = %err, "failed to post startup notice");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ANNOUNCE_CHANNEL, TestContext};

    #[tokio::test]
    async fn posts_to_the_announce_channel() {
        let ctx = TestContext::new(&["Tama"]);
        assert!(announce_online(&ctx.state).await);

        let messages = ctx.notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].1.channel, ANNOUNCE_CHANNEL);
        assert_eq!(messages[0].1.message.content.as_deref(), Some(ONLINE_NOTICE));
    }

    #[tokio::test]
    async fn stays_quiet_without_a_channel() {
        let ctx = TestContext::without_announce_channel(&["Tama"]);
        assert!(!announce_online(&ctx.state).await);
        assert!(ctx.notifier.messages().is_empty());
    }
}
