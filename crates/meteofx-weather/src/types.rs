use chrono::{DateTime, NaiveDateTime, Utc};
use meteofx_core::{AppError, NetworkError};
use serde::{Deserialize, Deserializer, Serialize};

/// Weather condition codes reported by the provider
/// See: https://api.meteo.lt/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCode {
    Clear,
    PartlyCloudy,
    CloudyWithSunnyIntervals,
    Cloudy,
    LightRain,
    Rain,
    HeavyRain,
    Thunder,
    IsolatedThunderstorms,
    Thunderstorms,
    HeavyRainWithThunderstorms,
    LightSleet,
    Sleet,
    FreezingRain,
    Hail,
    LightSnow,
    Snow,
    HeavySnow,
    Fog,
    /// Codes this build does not know about, and `null`
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConditionCode {
    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::CloudyWithSunnyIntervals => "Cloudy with Sunny Intervals",
            Self::Cloudy => "Cloudy",
            Self::LightRain => "Light Rain",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Thunder => "Thunder",
            Self::IsolatedThunderstorms => "Isolated Thunderstorms",
            Self::Thunderstorms => "Thunderstorms",
            Self::HeavyRainWithThunderstorms => "Heavy Rain with Thunderstorms",
            Self::LightSleet => "Light Sleet",
            Self::Sleet => "Sleet",
            Self::FreezingRain => "Freezing Rain",
            Self::Hail => "Hail",
            Self::LightSnow => "Light Snow",
            Self::Snow => "Snow",
            Self::HeavySnow => "Heavy Snow",
            Self::Fog => "Fog",
            Self::Unknown => "Unknown",
        }
    }

    /// Emoji icon for terminal and plain-text output
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::PartlyCloudy => "⛅",
            Self::CloudyWithSunnyIntervals => "🌤️",
            Self::Cloudy => "☁️",
            Self::LightRain => "🌦️",
            Self::Rain | Self::FreezingRain => "🌧️",
            Self::HeavyRain | Self::Thunderstorms | Self::HeavyRainWithThunderstorms => "⛈️",
            Self::Thunder => "⚡",
            Self::IsolatedThunderstorms => "🌩️",
            Self::LightSleet | Self::Sleet | Self::Hail | Self::LightSnow => "🌨️",
            Self::Snow | Self::HeavySnow => "❄️",
            Self::Fog => "🌫️",
            Self::Unknown => "🌡️",
        }
    }
}

fn nullable_condition<'de, D>(deserializer: D) -> Result<ConditionCode, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ConditionCode>::deserialize(deserializer)?.unwrap_or_default())
}

/// Provider timestamps look like `2024-05-01 12:00:00` and are UTC.
mod provider_time {
    use super::*;

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .or_else(|_| DateTime::parse_from_rfc3339(&raw).map(|dt| dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Entry of the provider's places list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceListItem {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub administrative_division: String,
    #[serde(default)]
    pub country_code: String,
    pub coordinates: Coordinates,
}

/// Place details embedded in a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub administrative_division: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    pub coordinates: Coordinates,
}

/// One forecast reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastTimestamp {
    #[serde(with = "provider_time")]
    pub forecast_time_utc: DateTime<Utc>,
    pub air_temperature: f64,
    pub feels_like_temperature: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: f64,
    pub cloud_cover: f64,
    pub sea_level_pressure: f64,
    pub relative_humidity: f64,
    pub total_precipitation: f64,
    #[serde(default, deserialize_with = "nullable_condition")]
    pub condition_code: ConditionCode,
}

/// Complete long-term forecast for a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub place: Place,
    pub forecast_type: String,
    #[serde(with = "provider_time")]
    pub forecast_creation_time_utc: DateTime<Utc>,
    pub forecast_timestamps: Vec<ForecastTimestamp>,
}

impl WeatherForecast {
    /// Interpret a raw forecast payload.
    pub fn from_value(value: serde_json::Value) -> Result<Self, WeatherError> {
        serde_json::from_value(value).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Place code is required")]
    InvalidPlaceCode,
    #[error("Place not found: {0}")]
    PlaceNotFound(String),
    #[error("API responded with status: {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::PlaceNotFound(code) => AppError::PlaceNotFound(code),
            WeatherError::InvalidPlaceCode => AppError::Validation(err.to_string()),
            other => AppError::Weather(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn condition(raw: &str) -> ConditionCode {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_condition_code_kebab_case() {
        assert_eq!(condition("\"clear\""), ConditionCode::Clear);
        assert_eq!(condition("\"partly-cloudy\""), ConditionCode::PartlyCloudy);
        assert_eq!(
            condition("\"heavy-rain-with-thunderstorms\""),
            ConditionCode::HeavyRainWithThunderstorms
        );
    }

    #[test]
    fn test_condition_code_unknown() {
        assert_eq!(condition("\"volcanic-ash\""), ConditionCode::Unknown);
    }

    #[test]
    fn test_condition_description() {
        assert_eq!(ConditionCode::Clear.description(), "Clear");
        assert_eq!(
            ConditionCode::CloudyWithSunnyIntervals.description(),
            "Cloudy with Sunny Intervals"
        );
        assert_eq!(ConditionCode::Unknown.description(), "Unknown");
    }

    #[test]
    fn test_condition_icon() {
        assert_eq!(ConditionCode::Clear.icon(), "☀️");
        assert_eq!(ConditionCode::Snow.icon(), "❄️");
        assert_eq!(ConditionCode::Unknown.icon(), "🌡️");
    }

    #[test]
    fn test_forecast_timestamp_parsing() {
        let ts: ForecastTimestamp = serde_json::from_value(serde_json::json!({
            "forecastTimeUtc": "2024-05-01 12:00:00",
            "airTemperature": 14.2,
            "feelsLikeTemperature": 12.9,
            "windSpeed": 4,
            "windGust": 9,
            "windDirection": 250,
            "cloudCover": 40,
            "seaLevelPressure": 1015,
            "relativeHumidity": 60,
            "totalPrecipitation": 0,
            "conditionCode": null
        }))
        .unwrap();

        assert_eq!(ts.forecast_time_utc.to_rfc3339(), "2024-05-01T12:00:00+00:00");
        assert_eq!(ts.condition_code, ConditionCode::Unknown);
        assert_eq!(ts.wind_direction, 250.0);
    }

    #[test]
    fn test_not_found_maps_to_app_error() {
        let app: AppError = WeatherError::PlaceNotFound("atlantis".into()).into();
        assert!(matches!(app, AppError::PlaceNotFound(_)));

        let app: AppError = WeatherError::Status(502).into();
        assert_eq!(app.user_message(), "Failed to fetch weather data");
    }
}
