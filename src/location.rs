//! User location resolution for the salon finder.
//!
//! [`LocationResolver`] asks an ordered list of IP-geolocation providers where
//! the user appears to be. The first-party proxy goes first, then the public
//! services. Each provider's JSON is normalized into a [`ResolvedLocation`] by
//! its [`ProviderKind`]. A whole sweep that fails is retried after a linear
//! back-off; when every attempt is exhausted the answer is simply `None`.

use crate::config::ResolverConfig;
use crate::error::ProviderError;
use crate::models::ResolvedLocation;
use color_eyre::Result;
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Response shape a provider speaks. Owns the field mapping for that shape.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// First-party proxy: `latitude`, `longitude`, `city`, `region`, `country`.
    Proxy,
    /// ipapi.co: like the proxy, but the country is `country_name`.
    IpapiCo,
    /// ip-api.com: `lat`, `lon`, `regionName`, `country`.
    IpApiCom,
}

impl ProviderKind {
    /// Maps a raw provider body onto the common shape.
    pub fn parse(self, data: &Value) -> Result<ResolvedLocation, ProviderError> {
        let (lat_key, lon_key, region_key, country_key) = match self {
            ProviderKind::Proxy => ("latitude", "longitude", "region", "country"),
            ProviderKind::IpapiCo => ("latitude", "longitude", "region", "country_name"),
            ProviderKind::IpApiCom => ("lat", "lon", "regionName", "country"),
        };

        let location = ResolvedLocation {
            latitude: number(data, lat_key).unwrap_or(0.0),
            longitude: number(data, lon_key).unwrap_or(0.0),
            city: text(data, "city"),
            region: text(data, region_key),
            country: text(data, country_key),
        };

        match location.coordinate() {
            Some(_) => Ok(location),
            None => Err(ProviderError::MissingCoordinates),
        }
    }
}

// Some services send coordinates as strings.
fn number(data: &Value, key: &str) -> Option<f64> {
    match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// One configured geolocation provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProviderSpec {
    pub name: String,
    pub url: String,
    pub timeout_ms: u64,
    pub kind: ProviderKind,
}

impl ProviderSpec {
    pub fn new(name: &str, url: &str, timeout_ms: u64, kind: ProviderKind) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            timeout_ms,
            kind,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Preference order used when config.toml doesn't list providers.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                "proxy",
                "http://localhost:8888/.netlify/functions/whoami",
                2000,
                ProviderKind::Proxy,
            ),
            Self::new("ipapi.co", "https://ipapi.co/json/", 3000, ProviderKind::IpapiCo),
            Self::new("ip-api.com", "http://ip-api.com/json/", 3000, ProviderKind::IpApiCom),
        ]
    }
}

/// Delay before the attempt after `attempt` (zero-based): `base * (attempt + 1)`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt.saturating_add(1))
}

pub struct LocationResolver {
    client: Client,
    providers: Vec<ProviderSpec>,
    backoff_base: Duration,
    max_retries: u32,
}

impl LocationResolver {
    pub fn new(providers: Vec<ProviderSpec>, backoff_base: Duration, max_retries: u32) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            providers,
            backoff_base,
            max_retries,
        })
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        Self::new(
            config.providers.clone(),
            Duration::from_millis(config.backoff_base_ms),
            config.max_retries,
        )
    }

    /// Resolves with the configured retry count.
    pub async fn resolve_default(&self) -> Option<ResolvedLocation> {
        self.resolve(self.max_retries).await
    }

    /// Sweeps the providers in order up to `max_retries` times (at least once).
    ///
    /// The first provider to return usable coordinates wins and nothing after
    /// it is contacted. Provider failures are logged and swallowed; `None`
    /// means every provider failed on every attempt.
    pub async fn resolve(&self, max_retries: u32) -> Option<ResolvedLocation> {
        let attempts = max_retries.max(1);

        for attempt in 0..attempts {
            for provider in &self.providers {
                match self.query(provider).await {
                    Ok(location) => {
                        info!(
                            provider = %provider.name,
                            attempt = attempt + 1,
                            lat = location.latitude,
                            lon = location.longitude,
                            "Location loaded"
                        );
                        return Some(location);
                    }
                    Err(e) => {
                        warn!(
                            provider = %provider.name,
                            attempt = attempt + 1,
                            error = %e,
                            "Geolocation provider failed"
                        );
                    }
                }
            }

            if attempt + 1 < attempts {
                let delay = backoff_delay(self.backoff_base, attempt);
                info!(delay_ms = delay.as_millis() as u64, "Retrying geolocation after back-off");
                tokio::time::sleep(delay).await;
            }
        }

        warn!(attempts, "All location providers failed after retries");
        None
    }

    async fn query(&self, provider: &ProviderSpec) -> Result<ResolvedLocation, ProviderError> {
        let response = self
            .client
            .get(&provider.url)
            .header(ACCEPT, "application/json")
            .timeout(provider.timeout())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let body = response.bytes().await?;
        let data: Value = serde_json::from_slice(&body)?;
        provider.kind.parse(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proxy_shape_maps_directly() {
        let data = json!({
            "ip": "203.0.113.7",
            "latitude": -33.8688,
            "longitude": 151.2093,
            "city": "Sydney",
            "region": "New South Wales",
            "country": "Australia"
        });
        let loc = ProviderKind::Proxy.parse(&data).unwrap();
        assert_eq!(loc.latitude, -33.8688);
        assert_eq!(loc.region.as_deref(), Some("New South Wales"));
        assert_eq!(loc.country.as_deref(), Some("Australia"));
    }

    #[test]
    fn ipapi_co_reads_country_name() {
        let data = json!({
            "latitude": -37.8136,
            "longitude": 144.9631,
            "city": "Melbourne",
            "region": "Victoria",
            "country": "AU",
            "country_name": "Australia"
        });
        let loc = ProviderKind::IpapiCo.parse(&data).unwrap();
        assert_eq!(loc.country.as_deref(), Some("Australia"));
    }

    #[test]
    fn ip_api_com_renames_fields() {
        let data = json!({
            "status": "success",
            "lat": -27.4698,
            "lon": 153.0251,
            "city": "Brisbane",
            "region": "QLD",
            "regionName": "Queensland",
            "country": "Australia"
        });
        let loc = ProviderKind::IpApiCom.parse(&data).unwrap();
        assert_eq!(loc.latitude, -27.4698);
        assert_eq!(loc.longitude, 153.0251);
        assert_eq!(loc.region.as_deref(), Some("Queensland"));
    }

    #[test]
    fn string_coordinates_are_accepted() {
        let data = json!({"latitude": "-31.95", "longitude": "115.86"});
        let loc = ProviderKind::Proxy.parse(&data).unwrap();
        assert_eq!(loc.longitude, 115.86);
    }

    #[test]
    fn null_or_zero_coordinates_are_a_failure() {
        let nulls = json!({"latitude": null, "longitude": null, "city": null});
        assert!(matches!(
            ProviderKind::Proxy.parse(&nulls),
            Err(ProviderError::MissingCoordinates)
        ));

        let zeros = json!({"lat": 0, "lon": 0});
        assert!(matches!(
            ProviderKind::IpApiCom.parse(&zeros),
            Err(ProviderError::MissingCoordinates)
        ));

        // A proxy-shaped body given to ip-api.com has none of its keys.
        let wrong_shape = json!({"latitude": -33.8, "longitude": 151.2});
        assert!(ProviderKind::IpApiCom.parse(&wrong_shape).is_err());
    }

    #[test]
    fn backoff_grows_with_each_attempt() {
        let base = Duration::from_millis(500);
        let delays: Vec<Duration> = (0..4).map(|a| backoff_delay(base, a)).collect();
        assert_eq!(delays[0], Duration::from_millis(500));
        assert_eq!(delays[2], Duration::from_millis(1500));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn default_order_puts_the_proxy_first() {
        let kinds: Vec<ProviderKind> = ProviderSpec::defaults().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![ProviderKind::Proxy, ProviderKind::IpapiCo, ProviderKind::IpApiCom]
        );
    }

    #[test]
    fn provider_kind_uses_snake_case_in_config() {
        let spec: ProviderSpec = toml::from_str(
            r#"
            name = "ip-api.com"
            url = "http://ip-api.com/json/"
            timeout_ms = 3000
            kind = "ip_api_com"
            "#,
        )
        .unwrap();
        assert_eq!(spec.kind, ProviderKind::IpApiCom);
        assert_eq!(spec.timeout(), Duration::from_secs(3));
    }
}
