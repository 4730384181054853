use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use model::geocode::{GeocodeCandidate, RegionBias};

use crate::{supersede::LatestRequest, ProviderError, ZoneError, ZoneResult};

/// Provider that turns free-text addresses into coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates in provider ranking order, empty when nothing matched.
    async fn geocode(
        &self,
        query: &str,
        bias: &RegionBias,
    ) -> Result<Vec<GeocodeCandidate>, ProviderError>;
}

#[async_trait]
impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    async fn geocode(
        &self,
        query: &str,
        bias: &RegionBias,
    ) -> Result<Vec<GeocodeCandidate>, ProviderError> {
        (**self).geocode(query, bias).await
    }
}

/// Resolves address queries through a [`Geocoder`]. Only the latest query
/// is answered, older ones in flight end with [`ZoneError::Superseded`].
pub struct GeocodingAdapter<G> {
    provider: G,
    default_bias: RegionBias,
    timeout: Option<Duration>,
    latest: LatestRequest,
}

impl<G: Geocoder> GeocodingAdapter<G> {
    pub fn new(provider: G) -> Self {
        Self {
            provider,
            default_bias: RegionBias::default(),
            timeout: None,
            latest: LatestRequest::default(),
        }
    }

    pub fn with_default_bias(mut self, bias: RegionBias) -> Self {
        self.default_bias = bias;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn default_bias(&self) -> &RegionBias {
        &self.default_bias
    }

    /// Ranked candidates for `query`. Blank queries are answered with
    /// `NoMatch` without asking the provider, and still cancel the query in
    /// flight.
    pub async fn resolve(
        &self,
        query: &str,
        bias: Option<&RegionBias>,
    ) -> ZoneResult<Vec<GeocodeCandidate>> {
        let query = collapse_whitespace(query);
        if query.is_empty() {
            self.latest.cancel();
            return Err(ZoneError::NoMatch);
        }
        let bias = bias.unwrap_or(&self.default_bias);

        log::debug!("geocoding {query:?}");
        let candidates = self
            .latest
            .run(self.timeout, self.provider.geocode(&query, bias))
            .await?;
        if candidates.is_empty() {
            return Err(ZoneError::NoMatch);
        }
        Ok(candidates)
    }

    /// Drops the query in flight, e.g. because the input was cleared.
    pub fn cancel_pending(&self) {
        self.latest.cancel();
    }
}

/// Trims the query and reduces inner whitespace runs to single spaces.
pub fn collapse_whitespace(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use model::{geometry::Point, ExampleData};
    use tokio::sync::Notify;

    use super::*;

    /// Answers every query with one candidate named after the query, after
    /// waiting for a release if the query starts with "slow".
    #[derive(Default)]
    struct StubGeocoder {
        calls: AtomicUsize,
        queries: Mutex<Vec<(String, RegionBias)>>,
        release: Notify,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(
            &self,
            query: &str,
            bias: &RegionBias,
        ) -> Result<Vec<GeocodeCandidate>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries
                .lock()
                .unwrap()
                .push((query.to_owned(), bias.clone()));
            if query.starts_with("slow") {
                self.release.notified().await;
            }
            if query == "nowhere" {
                return Ok(vec![]);
            }
            Ok(vec![GeocodeCandidate {
                formatted_address: query.to_owned(),
                coordinate: Point::new(17.4126, 78.4392),
                ..GeocodeCandidate::example_data()
            }])
        }
    }

    struct SlowGeocoder;

    #[async_trait]
    impl Geocoder for SlowGeocoder {
        async fn geocode(
            &self,
            _query: &str,
            _bias: &RegionBias,
        ) -> Result<Vec<GeocodeCandidate>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  Road  No.\t12 \n Hyderabad "), "Road No. 12 Hyderabad");
        assert_eq!(collapse_whitespace(" \t\n"), "");
    }

    #[tokio::test]
    async fn blank_query_never_reaches_provider() {
        let provider = Arc::new(StubGeocoder::default());
        let adapter = GeocodingAdapter::new(provider.clone());
        for query in ["", "   ", "\t\n"] {
            assert!(matches!(adapter.resolve(query, None).await, Err(ZoneError::NoMatch)));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn query_is_normalized_and_biased() {
        let provider = Arc::new(StubGeocoder::default());
        let adapter = GeocodingAdapter::new(provider.clone())
            .with_default_bias(RegionBias::region("in").with_country("IN"));

        let candidates = adapter
            .resolve("  Banjara   Hills ", None)
            .await
            .unwrap();
        assert_eq!(candidates[0].formatted_address, "Banjara Hills");

        let explicit = RegionBias::region("de");
        adapter.resolve("Kiel", Some(&explicit)).await.unwrap();

        let queries = provider.queries.lock().unwrap();
        assert_eq!(queries[0], ("Banjara Hills".to_owned(), RegionBias::region("in").with_country("IN")));
        assert_eq!(queries[1], ("Kiel".to_owned(), explicit));
    }

    #[tokio::test]
    async fn empty_provider_answer_is_no_match() {
        let adapter = GeocodingAdapter::new(StubGeocoder::default());
        assert!(matches!(
            adapter.resolve("nowhere", None).await,
            Err(ZoneError::NoMatch)
        ));
    }

    #[tokio::test]
    async fn newer_query_supersedes_older_one() {
        let provider = Arc::new(StubGeocoder::default());
        let adapter = Arc::new(GeocodingAdapter::new(provider.clone()));

        let older = {
            let adapter = adapter.clone();
            tokio::spawn(async move { adapter.resolve("slow query", None).await })
        };
        while provider.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let newer = adapter.resolve("fast query", None).await.unwrap();
        provider.release.notify_waiters();

        assert_eq!(newer[0].formatted_address, "fast query");
        assert!(matches!(older.await.unwrap(), Err(ZoneError::Superseded)));
    }

    #[tokio::test]
    async fn clearing_the_input_cancels_pending_query() {
        let provider = Arc::new(StubGeocoder::default());
        let adapter = Arc::new(GeocodingAdapter::new(provider.clone()));

        let pending = {
            let adapter = adapter.clone();
            tokio::spawn(async move { adapter.resolve("slow query", None).await })
        };
        while provider.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(matches!(adapter.resolve(" ", None).await, Err(ZoneError::NoMatch)));
        assert!(matches!(pending.await.unwrap(), Err(ZoneError::Superseded)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let adapter = GeocodingAdapter::new(SlowGeocoder).with_timeout(Duration::from_secs(5));
        assert!(matches!(
            adapter.resolve("Hyderabad", None).await,
            Err(ZoneError::Provider(ProviderError::Timeout))
        ));
    }
}
