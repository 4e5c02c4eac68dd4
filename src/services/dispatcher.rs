use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::push::{Notification, Sender};
use super::router::route_tokens;
use super::secrets::{PROVIDER_SECRET_KEYS, SecretResolver};
use crate::models::requests::NotificationRequest;
use crate::models::responses::{DispatchResponse, ProviderResult};

/// Fans a decoded request out to every registered sender with work to do.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: SecretResolver,
    senders: Vec<Arc<dyn Sender>>,
    provider_timeout: Duration,
}

impl Dispatcher {
    /// Results follow the order of `senders`.
    pub fn new(
        resolver: SecretResolver,
        senders: Vec<Arc<dyn Sender>>,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            senders,
            provider_timeout,
        }
    }

    pub async fn dispatch(&self, request: &NotificationRequest) -> DispatchResponse {
        let routed = route_tokens(&request.provider_tokens());
        if routed.dropped > 0 {
            tracing::warn!(
                dropped = routed.dropped,
                routed = routed.routed(),
                "Ignoring tokens with unrecognized provider"
            );
        }

        let active: Vec<(&Arc<dyn Sender>, &[String])> = self
            .senders
            .iter()
            .map(|s| (s, routed.batch(s.provider())))
            .filter(|(_, batch)| !batch.is_empty())
            .collect();

        if active.is_empty() {
            return DispatchResponse {
                success: true,
                results: Vec::new(),
            };
        }

        let secrets = self.resolver.resolve(&PROVIDER_SECRET_KEYS).await;
        let notification = Notification {
            title: request.title.clone(),
            body: request.body.clone(),
            data: request.data.clone(),
        };

        let runs = active.into_iter().map(|(sender, batch)| {
            let notification = &notification;
            let secrets = &secrets;
            async move {
                let provider = sender.provider();
                match tokio::time::timeout(
                    self.provider_timeout,
                    sender.send(batch, notification, secrets),
                )
                .await
                {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::error!(
                            provider = %provider,
                            timeout = ?self.provider_timeout,
                            "Provider timed out"
                        );
                        ProviderResult::failed(
                            provider,
                            format!("{provider} timed out after {:?}", self.provider_timeout),
                        )
                    }
                }
            }
        });

        let results = join_all(runs).await;

        DispatchResponse {
            success: true,
            results,
        }
    }
}
