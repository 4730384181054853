use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};

use tokio_util::sync::CancellationToken;

use crate::{ProviderError, ZoneError, ZoneResult};

/// Keeps track of the most recent provider request. Starting a new request
/// cancels the one in flight, and only the newest one may report a result.
#[derive(Default)]
pub(crate) struct LatestRequest {
    generation: AtomicU64,
    pending: Mutex<Option<CancellationToken>>,
}

impl LatestRequest {
    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        // bumped under the lock so generation and token always match
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = pending.replace(token.clone()) {
            previous.cancel();
        }
        (generation, token)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Cancels the request in flight, if any. Its caller sees `Superseded`.
    pub(crate) fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
    }

    /// Runs `request` as the newest request, bounded by `timeout`.
    pub(crate) async fn run<T, F>(&self, timeout: Option<Duration>, request: F) -> ZoneResult<T>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let (generation, token) = self.begin();

        let bounded = async {
            match timeout {
                Some(timeout) => tokio::time::timeout(timeout, request)
                    .await
                    .unwrap_or(Err(ProviderError::Timeout)),
                None => request.await,
            }
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => return Err(ZoneError::Superseded),
            outcome = bounded => outcome,
        };

        if !self.is_current(generation) {
            return Err(ZoneError::Superseded);
        }
        Ok(outcome?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn newer_request_supersedes_older_one() {
        let latest = Arc::new(LatestRequest::default());
        let (release, wait) = oneshot::channel::<()>();

        let slow = {
            let latest = latest.clone();
            tokio::spawn(async move {
                latest
                    .run(None, async move {
                        let _ = wait.await;
                        Ok::<_, ProviderError>("slow")
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;

        let fast = latest.run(None, async { Ok("fast") }).await;
        let _ = release.send(());

        assert!(matches!(fast, Ok("fast")));
        assert!(matches!(slow.await.unwrap(), Err(ZoneError::Superseded)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_request_times_out() {
        let latest = LatestRequest::default();
        let result = latest
            .run(Some(Duration::from_secs(5)), async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, ProviderError>(())
            })
            .await;
        assert!(matches!(
            result,
            Err(ZoneError::Provider(ProviderError::Timeout))
        ));
    }

    #[tokio::test]
    async fn cancel_supersedes_pending_request() {
        let latest = Arc::new(LatestRequest::default());
        let pending = {
            let latest = latest.clone();
            tokio::spawn(async move {
                latest
                    .run(None, std::future::pending::<Result<(), ProviderError>>())
                    .await
            })
        };
        tokio::task::yield_now().await;
        latest.cancel();
        assert!(matches!(pending.await.unwrap(), Err(ZoneError::Superseded)));
    }

    #[tokio::test]
    async fn provider_errors_pass_through() {
        let latest = LatestRequest::default();
        let result = latest
            .run(None, async {
                Err::<(), _>(ProviderError::Quota("daily".to_owned()))
            })
            .await;
        assert!(matches!(
            result,
            Err(ZoneError::Provider(ProviderError::Quota(_)))
        ));
    }
}
