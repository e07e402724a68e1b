//! Rate-limited HTTP client for the Nominatim reverse-geocoding API.

use super::GeoPlace;
use bon::bon;
use log::{debug, error, warn};
use std::time::{Duration, Instant};

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = "PhotoOrganizer/0.1";
const DEFAULT_API_DELAY: Duration = Duration::from_secs(2);

/// Nominatim's usage policy requires at least one second between calls.
const MIN_API_DELAY: Duration = Duration::from_secs(1);

/// One external place lookup.
///
/// The trait is the test seam of the geocoding path: cache behavior is
/// verified against a counting fake instead of a live service.
#[allow(async_fn_in_trait)]
pub trait PlaceLookup {
    /// Resolves coordinates to a place, or `None` on any service fault.
    async fn lookup(&mut self, lat: f64, lon: f64) -> Option<GeoPlace>;
}

/// Calls the public Nominatim endpoint, waiting out the configured delay
/// between consecutive requests.
pub struct NominatimClient {
    http: reqwest::Client,
    endpoint: String,
    api_delay: Duration,
    last_call: Option<Instant>,
}

#[bon]
impl NominatimClient {
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_USER_AGENT.to_string())] user_agent: String,
        #[builder(default = DEFAULT_API_DELAY)] api_delay: Duration,
        #[builder(default = NOMINATIM_ENDPOINT.to_string())] endpoint: String,
    ) -> Result<Self, reqwest::Error> {
        let api_delay = if api_delay < MIN_API_DELAY {
            warn!(
                "API delay below the usage-policy minimum, using {}s instead",
                DEFAULT_API_DELAY.as_secs()
            );
            DEFAULT_API_DELAY
        } else {
            api_delay
        };
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            api_delay,
            last_call: None,
        })
    }
}

impl PlaceLookup for NominatimClient {
    async fn lookup(&mut self, lat: f64, lon: f64) -> Option<GeoPlace> {
        // The delay is measured from the completion of the previous call,
        // not from its start.
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.api_delay {
                tokio::time::sleep(self.api_delay - elapsed).await;
            }
        }

        let result = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
                ("accept-language", "en".to_string()),
            ])
            .send()
            .await;
        self.last_call = Some(Instant::now());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Reverse geocoding request failed for [{lat}, {lon}]: {e}");
                return None;
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            error!(
                "Reverse geocoding failed for [{lat}, {lon}]: HTTP {}",
                response.status()
            );
            return None;
        }
        match response.json::<GeoPlace>().await {
            Ok(place) => {
                debug!("Reverse geocoded [{lat}, {lon}]");
                Some(place)
            }
            Err(e) => {
                error!("Unusable reverse geocoding response for [{lat}, {lon}]: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_api_delay_is_raised_to_the_default() {
        let client = NominatimClient::builder()
            .api_delay(Duration::from_millis(200))
            .build()
            .unwrap();
        assert_eq!(client.api_delay, DEFAULT_API_DELAY);
    }

    #[test]
    fn configured_api_delay_is_kept() {
        let client = NominatimClient::builder()
            .api_delay(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.api_delay, Duration::from_secs(5));
    }
}
