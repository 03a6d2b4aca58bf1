//! Weather forwarder: one call to the weather provider per request,
//! reshaped to a fixed nine-field schema.

use crate::config::AppState;
use crate::error::ApiError;
use crate::{api, response};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};

const WEATHER_ERROR: &str =
    "Could not fetch weather data. Please check the city name and try again.";
const MISSING_KEY_ERROR: &str = "Weather API key is not configured.";

// Subset of the provider response we actually consume; everything else is
// dropped on deserialization.
#[derive(Debug, Deserialize)]
struct UpstreamWeather {
    name: String,
    sys: UpstreamSys,
    main: UpstreamMain,
    weather: Vec<UpstreamCondition>,
    wind: UpstreamWind,
}

#[derive(Debug, Deserialize)]
struct UpstreamSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamMain {
    temp: f64,
    feels_like: f64,
    humidity: u64,
}

#[derive(Debug, Deserialize)]
struct UpstreamCondition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamWind {
    speed: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherResponse {
    success: bool,
    city: String,
    country: String,
    temperature: f64,
    feels_like: f64,
    condition: String,
    description: String,
    humidity: u64,
    wind_speed: f64,
    icon: String,
}

pub async fn handle(state: &AppState, city: Option<String>) -> Response<Full<Bytes>> {
    match fetch(state, city).await {
        Ok(body) => response::json(StatusCode::OK, &body),
        Err(err) => api::failure("/api/weather", err, WEATHER_ERROR),
    }
}

async fn fetch(state: &AppState, city: Option<String>) -> Result<WeatherResponse, ApiError> {
    let api_key = state
        .config
        .weather
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Config(MISSING_KEY_ERROR.to_string()))?;

    let city = city.unwrap_or_else(|| state.config.weather.default_city.clone());

    let upstream = state
        .http
        .get(&state.config.weather.base_url)
        .query(&[("q", city.as_str()), ("appid", api_key), ("units", "metric")])
        .send()
        .await?;

    let status = upstream.status();
    if !status.is_success() {
        let detail = upstream.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "weather provider returned {status}: {detail}"
        )));
    }

    reshape(upstream.json().await?)
}

fn reshape(upstream: UpstreamWeather) -> Result<WeatherResponse, ApiError> {
    let condition = upstream
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::Upstream("weather provider returned no conditions".to_string()))?;

    Ok(WeatherResponse {
        success: true,
        city: upstream.name,
        country: upstream.sys.country,
        temperature: upstream.main.temp,
        feels_like: upstream.main.feels_like,
        condition: condition.main,
        description: condition.description,
        humidity: upstream.main.humidity,
        wind_speed: upstream.wind.speed,
        icon: condition.icon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, spawn_upstream, state_with, unreachable_upstream};
    use crate::config;

    // Trimmed capture of a real provider payload
    const SAMPLE: &str = r#"{
        "coord": {"lon": 2.3488, "lat": 48.8534},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "base": "stations",
        "main": {"temp": 21.3, "feels_like": 20.9, "temp_min": 19.2, "temp_max": 23.1,
                 "pressure": 1015, "humidity": 56},
        "visibility": 10000,
        "wind": {"speed": 4.6, "deg": 240},
        "sys": {"country": "FR", "sunrise": 1700000000, "sunset": 1700040000},
        "name": "Paris",
        "cod": 200
    }"#;

    fn weather_state(base_url: String, api_key: Option<&str>) -> crate::config::AppState {
        let mut cfg = config::test_config();
        cfg.weather.base_url = base_url;
        cfg.weather.api_key = api_key.map(ToString::to_string);
        state_with(cfg)
    }

    #[test]
    fn test_reshape_keeps_only_the_nine_fields() {
        let upstream: UpstreamWeather = serde_json::from_str(SAMPLE).unwrap();
        let reshaped = reshape(upstream).unwrap();

        assert_eq!(reshaped.city, "Paris");
        assert_eq!(reshaped.country, "FR");
        assert!((reshaped.temperature - 21.3).abs() < f64::EPSILON);
        assert!((reshaped.feels_like - 20.9).abs() < f64::EPSILON);
        assert_eq!(reshaped.condition, "Clouds");
        assert_eq!(reshaped.description, "broken clouds");
        assert_eq!(reshaped.humidity, 56);
        assert!((reshaped.wind_speed - 4.6).abs() < f64::EPSILON);
        assert_eq!(reshaped.icon, "04d");
    }

    #[test]
    fn test_reshape_rejects_empty_conditions() {
        let mut value: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        value["weather"] = serde_json::json!([]);
        let upstream: UpstreamWeather = serde_json::from_value(value).unwrap();

        assert!(matches!(reshape(upstream), Err(ApiError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_success_response_shape() {
        let base_url = spawn_upstream(StatusCode::OK, SAMPLE).await;
        let state = weather_state(base_url, Some("test-key"));

        let response = handle(&state, Some("Paris".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["city"], "Paris");
        assert_eq!(body["feelsLike"], 20.9);
        assert_eq!(body["windSpeed"], 4.6);
        assert_eq!(body.as_object().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_config_failure() {
        // Upstream would answer, but the key check comes first
        let base_url = spawn_upstream(StatusCode::OK, SAMPLE).await;
        let state = weather_state(base_url, None);

        let response = handle(&state, None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Weather API key is not configured.");
    }

    #[tokio::test]
    async fn test_provider_error_status_collapses_to_generic_message() {
        let base_url = spawn_upstream(
            StatusCode::NOT_FOUND,
            r#"{"cod":"404","message":"city not found"}"#,
        )
        .await;
        let state = weather_state(base_url, Some("test-key"));

        let response = handle(&state, Some("Nowhereville".to_string())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], WEATHER_ERROR);
    }

    #[tokio::test]
    async fn test_provider_unreachable_collapses_to_generic_message() {
        let state = weather_state(unreachable_upstream().await, Some("test-key"));

        let response = handle(&state, Some("Paris".to_string())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], WEATHER_ERROR);
    }
}
