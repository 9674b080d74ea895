use crate::config::{ClientConfig, Labels};
use crate::cookie::{CSRF_COOKIE, CSRF_HEADER, CsrfToken};
use crate::errors::ToggleError;
use crate::models::{ToggleResult, TweetId};
use crate::page::Page;
use crate::paths::{action_path, counter_name};
use reqwest::{Client, Url, header::{CONTENT_TYPE, COOKIE}};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

pub type SharedPage = Arc<Mutex<Page>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied(ToggleResult),
    /// A request for the same button was still outstanding; nothing was sent.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct ToggleAction {
    client: Client,
    base_url: Url,
    csrf: CsrfToken,
    labels: Labels,
    timeout: Duration,
}

impl ToggleAction {
    pub fn new(config: ClientConfig, csrf: CsrfToken) -> Self {
        Self::with_client(Client::new(), config, csrf)
    }

    pub fn with_client(client: Client, config: ClientConfig, csrf: CsrfToken) -> Self {
        Self {
            client,
            base_url: config.base_url,
            csrf,
            labels: config.labels,
            timeout: config.timeout,
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Toggles the like state of `id`'s button.
    ///
    /// The page lock is released while the request is in flight; the button is
    /// marked busy instead, so a second activation before the answer arrives
    /// is skipped. On any error, or if this future is dropped, the page is
    /// left as it was with the button usable again.
    pub async fn activate(&self, page: &SharedPage, id: TweetId) -> Result<ToggleOutcome, ToggleError> {
        let url = {
            let mut page = page.lock().await;
            let target = page.target_mut(id).ok_or(ToggleError::UnknownTarget(id))?;
            if target.in_flight {
                debug!(tweet_id = id, "like request already in flight, skipping");
                return Ok(ToggleOutcome::Skipped);
            }
            target.in_flight = true;
            target.action_url.clone()
        };
        let guard = InFlight {
            page: Arc::clone(page),
            id,
            armed: true,
        };

        let outcome = self.send(&url).await;

        let mut page = page.lock().await;
        clear_in_flight(&mut page, id);
        guard.disarm();

        match outcome {
            Ok(result) => {
                reconcile(&mut page, id, &result, &self.labels);
                Ok(ToggleOutcome::Applied(result))
            }
            Err(err) => {
                error!(tweet_id = id, url = %url, "like request failed: {err}");
                Err(err)
            }
        }
    }

    async fn send(&self, action_url: &str) -> Result<ToggleResult, ToggleError> {
        let url = self
            .base_url
            .join(action_url)
            .map_err(|err| ToggleError::InvalidUrl {
                url: action_url.to_string(),
                reason: err.to_string(),
            })?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(CSRF_HEADER, self.csrf.as_str())
            .header(COOKIE, format!("{CSRF_COOKIE}={}", self.csrf.as_str()))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ToggleError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToggleError::ResponseStatus(status));
        }

        let body = response.bytes().await.map_err(ToggleError::Transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Clears a button's busy flag if `activate` is dropped mid-request.
struct InFlight {
    page: SharedPage,
    id: TweetId,
    armed: bool,
}

impl InFlight {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // The page lock is never held across the request, so this normally succeeds.
        if let Ok(mut page) = self.page.try_lock() {
            clear_in_flight(&mut page, self.id);
            return;
        }
        let page = Arc::clone(&self.page);
        let id = self.id;
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    clear_in_flight(&mut *page.lock().await, id);
                });
            }
            Err(_) => warn!(tweet_id = id, "like request cancelled outside a runtime, button left busy"),
        }
    }
}

fn clear_in_flight(page: &mut Page, id: TweetId) {
    if let Some(target) = page.target_mut(id) {
        target.in_flight = false;
    }
}

/// Applies a server answer to the button that triggered it.
///
/// The button's url and label are written together from `result.is_active`,
/// and the counter always takes the server's count. A page without a
/// matching counter only gets its button updated.
pub fn reconcile(page: &mut Page, target_id: TweetId, result: &ToggleResult, labels: &Labels) {
    let Some(target) = page.target_mut(target_id) else {
        warn!(tweet_id = target_id, "like button vanished before the response arrived");
        return;
    };
    target.action_url = action_path(result.entity_id, result.is_active);
    target.label = labels.for_state(result.is_active).to_string();

    let name = counter_name(result.entity_id);
    match page.counter_mut(&name) {
        Some(counter) => *counter = result.count.to_string(),
        None => warn!(counter = %name, "no counter display for tweet, count not shown"),
    }
}
