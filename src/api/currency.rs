//! Currency forwarder: converts a fixed base currency into USD and EUR
//! using live rates from the exchange-rate provider.

use crate::config::AppState;
use crate::error::ApiError;
use crate::{api, response};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CURRENCY_ERROR: &str = "Could not fetch currency conversion data.";
const INVALID_AMOUNT_ERROR: &str = "Please provide a valid amount.";

#[derive(Debug, Deserialize)]
struct UpstreamRates {
    rates: HashMap<String, f64>,
    date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrencyResponse {
    success: bool,
    amount: f64,
    from: String,
    conversions: CurrencyPair,
    rates: CurrencyPair,
    last_updated: String,
}

// Formatted as strings: conversions to 2 decimal places, rates to 4
#[derive(Debug, Serialize)]
struct CurrencyPair {
    #[serde(rename = "USD")]
    usd: String,
    #[serde(rename = "EUR")]
    eur: String,
}

pub async fn handle(state: &AppState, amount: Option<String>) -> Response<Full<Bytes>> {
    match fetch(state, amount.as_deref()).await {
        Ok(body) => response::json(StatusCode::OK, &body),
        Err(err) => api::failure("/api/currency", err, CURRENCY_ERROR),
    }
}

/// Amount precedence: absent or blank falls back to the configured
/// default; anything supplied must parse to a finite number > 0.
fn parse_amount(raw: Option<&str>, default: f64) -> Result<f64, ApiError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }

    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ApiError::BadRequest(INVALID_AMOUNT_ERROR.to_string()))?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::BadRequest(INVALID_AMOUNT_ERROR.to_string()));
    }

    Ok(amount)
}

async fn fetch(state: &AppState, amount: Option<&str>) -> Result<CurrencyResponse, ApiError> {
    // Validation happens before any upstream call
    let amount = parse_amount(amount, state.config.currency.default_amount)?;

    let url = format!(
        "{}/{}",
        state.config.currency.base_url, state.config.currency.base_currency
    );
    let upstream = state.http.get(&url).send().await?;

    let status = upstream.status();
    if !status.is_success() {
        let detail = upstream.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "exchange-rate provider returned {status}: {detail}"
        )));
    }

    reshape(
        amount,
        &state.config.currency.base_currency,
        upstream.json().await?,
    )
}

fn reshape(
    amount: f64,
    base_currency: &str,
    upstream: UpstreamRates,
) -> Result<CurrencyResponse, ApiError> {
    let rate = |code: &str| -> Result<f64, ApiError> {
        upstream
            .rates
            .get(code)
            .copied()
            .ok_or_else(|| ApiError::Upstream(format!("exchange-rate response missing {code}")))
    };
    let usd = rate("USD")?;
    let eur = rate("EUR")?;

    Ok(CurrencyResponse {
        success: true,
        amount,
        from: base_currency.to_string(),
        conversions: CurrencyPair {
            usd: format!("{:.2}", amount * usd),
            eur: format!("{:.2}", amount * eur),
        },
        rates: CurrencyPair {
            usd: format!("{usd:.4}"),
            eur: format!("{eur:.4}"),
        },
        last_updated: upstream.date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{body_json, spawn_upstream, state_with, unreachable_upstream};
    use crate::config;

    const SAMPLE: &str = r#"{
        "base": "INR",
        "date": "2024-05-17",
        "time_last_updated": 1715904001,
        "rates": {"INR": 1, "USD": 0.012, "EUR": 0.011, "GBP": 0.0094}
    }"#;

    fn currency_state(base_url: String) -> crate::config::AppState {
        let mut cfg = config::test_config();
        cfg.currency.base_url = base_url;
        state_with(cfg)
    }

    #[test]
    fn test_parse_amount_defaults_when_missing() {
        assert!((parse_amount(None, 100.0).unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((parse_amount(Some(""), 100.0).unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((parse_amount(Some("  "), 100.0).unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_amount_accepts_positive_numbers() {
        assert!((parse_amount(Some("250.5"), 100.0).unwrap() - 250.5).abs() < f64::EPSILON);
        assert!((parse_amount(Some("1"), 100.0).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_amount_rejects_invalid_input() {
        for raw in ["abc", "-5", "0", "NaN", "inf", "1e999", "12,50"] {
            assert!(
                matches!(parse_amount(Some(raw), 100.0), Err(ApiError::BadRequest(_))),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn test_reshape_formatting() {
        let upstream: UpstreamRates = serde_json::from_str(SAMPLE).unwrap();
        let reshaped = reshape(1000.0, "INR", upstream).unwrap();

        assert_eq!(reshaped.conversions.usd, "12.00");
        assert_eq!(reshaped.conversions.eur, "11.00");
        assert_eq!(reshaped.rates.usd, "0.0120");
        assert_eq!(reshaped.rates.eur, "0.0110");
        assert_eq!(reshaped.last_updated, "2024-05-17");
    }

    #[test]
    fn test_reshape_missing_target_rate() {
        let upstream: UpstreamRates = serde_json::from_str(
            r#"{"base":"INR","date":"2024-05-17","rates":{"USD":0.012}}"#,
        )
        .unwrap();

        assert!(matches!(
            reshape(100.0, "INR", upstream),
            Err(ApiError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_success_response_shape() {
        let base_url = spawn_upstream(StatusCode::OK, SAMPLE).await;
        let state = currency_state(base_url);

        let response = handle(&state, Some("1000".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["amount"], 1000.0);
        assert_eq!(body["from"], "INR");
        assert_eq!(body["conversions"]["USD"], "12.00");
        assert_eq!(body["conversions"]["EUR"], "11.00");
        assert_eq!(body["rates"]["USD"], "0.0120");
        assert_eq!(body["rates"]["EUR"], "0.0110");
        assert_eq!(body["lastUpdated"], "2024-05-17");
    }

    #[tokio::test]
    async fn test_missing_amount_defaults_to_100() {
        let base_url = spawn_upstream(StatusCode::OK, SAMPLE).await;
        let state = currency_state(base_url);

        let body = body_json(handle(&state, None).await).await;
        assert_eq!(body["amount"], 100.0);
        assert_eq!(body["conversions"]["USD"], "1.20");
    }

    #[tokio::test]
    async fn test_invalid_amount_short_circuits() {
        // The unreachable upstream proves validation happens first
        let state = currency_state(unreachable_upstream().await);

        let response = handle(&state, Some("-5".to_string())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Please provide a valid amount.");
    }

    #[tokio::test]
    async fn test_provider_unreachable_collapses_to_generic_message() {
        let state = currency_state(unreachable_upstream().await);

        let response = handle(&state, Some("1000".to_string())).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], CURRENCY_ERROR);
    }
}
