// src/notify/discord.rs

use crate::config::DiscordConfig;
use crate::domain::{Classified, Group};
use crate::notify::embed::{render_message, WebhookMessage};
use crate::notify::{NotifyError, Notifier};
use chrono::Utc;
use reqwest::blocking::{Client, Response};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const MAX_ATTEMPTS: u32 = 3;
const MAX_RETRY_AFTER_SECS: f64 = 30.0;

/// Posts one message per listing to a Discord webhook, routing new and
/// changed listings to their configured threads.
pub struct DiscordNotifier {
    client: Client,
    config: DiscordConfig,
}

/// Body of a 429 answer.
#[derive(Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

impl DiscordNotifier {
    pub fn new(config: DiscordConfig, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn post(&self, message: &WebhookMessage, url: &Url) -> Result<(), NotifyError> {
        for attempt in 1..=MAX_ATTEMPTS {
            let resp = self
                .client
                .post(url.clone())
                .json(message)
                .send()
                .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

            let status = resp.status();
            if status.is_success() {
                return Ok(());
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt == MAX_ATTEMPTS {
                    log::warn!("Discord rate limited (attempt {attempt}), giving up");
                    break;
                }
                let wait = retry_after(resp);
                log::warn!("Discord rate limited (attempt {attempt}), waiting {wait:?}");
                std::thread::sleep(wait);
                continue;
            }

            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(NotifyError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Err(NotifyError::RateLimited(MAX_ATTEMPTS))
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, group: Group, item: &Classified) -> Result<(), NotifyError> {
        let message = render_message(item, &self.config.currency_symbol, Utc::now());
        let url = self.config.target_url(group);

        self.post(&message, &url)?;
        log::info!("Sent {} to Discord ({} thread)", item.listing.id, group.as_str());
        Ok(())
    }
}

/// Wait time from a 429 answer: the JSON body first, then the header.
fn retry_after(resp: Response) -> Duration {
    let header_secs = resp
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok());

    let body_secs = resp
        .json::<RateLimitBody>()
        .ok()
        .map(|b| b.retry_after);

    wait_for(body_secs, header_secs)
}

fn wait_for(body_secs: Option<f64>, header_secs: Option<f64>) -> Duration {
    let secs = body_secs
        .filter(|s| s.is_finite())
        .or(header_secs.filter(|s| s.is_finite()))
        .unwrap_or(1.0);
    Duration::from_secs_f64(secs.clamp(0.0, MAX_RETRY_AFTER_SECS))
}
