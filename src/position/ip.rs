//! IP-based position sensor
//!
//! Uses ip-api.com when the host has no GNSS receiver. The fix is city level,
//! so it is reported with a coarse accuracy radius.

use crate::constants::api::IP_API_URL;
use crate::constants::geo::IP_FIX_ACCURACY_METERS;
use crate::coord::Coordinate;
use crate::error::{Error, LocationError, Result};
use crate::position::PositionSensor;
use serde::Deserialize;
use tracing::debug;

/// IP geolocation sensor
#[derive(Debug, Clone)]
pub struct IpSensor {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl IpSensor {
    /// Create a sensor against ip-api.com
    pub fn new(user_agent: &str) -> Result<Self> {
        Self::with_url(IP_API_URL, user_agent)
    }

    /// Create a sensor against a specific endpoint
    pub fn with_url(url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn fetch(&self) -> std::result::Result<IpApiResponse, reqwest::Error> {
        self.client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

impl PositionSensor for IpSensor {
    async fn read(&self, _high_accuracy: bool) -> std::result::Result<Coordinate, LocationError> {
        let data = self.fetch().await.map_err(|e| {
            debug!(error = %e, "IP location request failed");
            LocationError::PositionUnavailable
        })?;

        if data.status != "success" {
            debug!(message = ?data.message, "IP location lookup refused");
            return Err(LocationError::PositionUnavailable);
        }

        match (data.lat, data.lon) {
            (Some(lat), Some(lng)) => {
                debug!(city = ?data.city, "IP location resolved");
                Ok(Coordinate::new(lat, lng).with_accuracy(IP_FIX_ACCURACY_METERS))
            }
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_sensor_creation() {
        let sensor = IpSensor::new("test").unwrap();
        assert_eq!(sensor.url, IP_API_URL);
    }

    #[test]
    fn test_failed_response_parses() {
        let data: IpApiResponse =
            serde_json::from_str(r#"{"status":"fail","message":"private range"}"#).unwrap();
        assert_eq!(data.status, "fail");
        assert!(data.lat.is_none());
        assert_eq!(data.message.as_deref(), Some("private range"));
    }

    #[tokio::test]
    #[ignore = "Requires network access to ip-api.com"]
    async fn test_ip_sensor_live() {
        let sensor = IpSensor::new("guinea-geo-test").unwrap();
        let fix = sensor.read(true).await.unwrap();
        assert!(fix.validate().is_ok());
    }
}
