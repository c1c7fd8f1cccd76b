//! Sentinel Hub Process API request construction and (feature `api`)
//! the network client that fetches vegetation-index rasters.

use crate::evalscript::{MaskedAs, VegetationIndex};
use crate::green_space::GreenSpace;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

#[cfg(feature = "api")]
use crate::config::SentinelConfig;
#[cfg(feature = "api")]
use crate::raster::Raster;
#[cfg(feature = "api")]
use anyhow::Context;
#[cfg(feature = "api")]
use log::{info, warn};
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::time::Duration;

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Build the Process API request body for one vegetation-index raster.
///
/// The body requests a single FLOAT32 TIFF band over the green space
/// polygon, mosaicked least-cloud-cover over the time range.
pub fn build_process_body(
    green_space: &GreenSpace,
    start: NaiveDate,
    end: NaiveDate,
    index: VegetationIndex,
    masked_as: MaskedAs,
    width: usize,
    height: usize,
) -> serde_json::Value {
    json!({
        "input": {
            "bounds": {
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [&green_space.ring],
                },
                "properties": {
                    "crs": "http://www.opengis.net/def/crs/OGC/1.3/CRS84"
                }
            },
            "data": [{
                "type": "sentinel-2-l2a",
                "dataFilter": {
                    "timeRange": {
                        "from": format!("{}T00:00:00Z", start.format("%Y-%m-%d")),
                        "to": format!("{}T23:59:59Z", end.format("%Y-%m-%d")),
                    },
                    "mosaickingOrder": "leastCC"
                }
            }]
        },
        "output": {
            "width": width,
            "height": height,
            "responses": [{
                "identifier": "default",
                "format": { "type": "image/tiff" }
            }]
        },
        "evalscript": index.evalscript(masked_as),
    })
}

/// Fetch an OAuth2 access token via the client-credentials grant.
#[cfg(feature = "api")]
pub async fn fetch_token(client: &Client, config: &SentinelConfig) -> anyhow::Result<String> {
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];
    let response = client
        .post(&config.token_url)
        .form(&params)
        .send()
        .await
        .context("token request failed")?;
    anyhow::ensure!(
        response.status() == StatusCode::OK,
        "token endpoint returned {}",
        response.status()
    );
    let token: TokenResponse = response
        .json()
        .await
        .context("failed to parse token response")?;
    Ok(token.access_token)
}

/// Decode a single-band FLOAT32 GeoTIFF body into a raster.
#[cfg(feature = "api")]
pub fn decode_float_tiff(body: &[u8]) -> anyhow::Result<Raster> {
    use tiff::decoder::{Decoder, DecodingResult};

    let mut decoder =
        Decoder::new(std::io::Cursor::new(body)).context("response is not a valid TIFF")?;
    let (width, height) = decoder.dimensions().context("TIFF has no dimensions")?;
    match decoder.read_image().context("failed to decode TIFF image")? {
        DecodingResult::F32(samples) => {
            Raster::from_f32_samples(width as usize, height as usize, &samples)
        }
        other => anyhow::bail!("expected FLOAT32 samples, got {:?}", sample_kind(&other)),
    }
}

#[cfg(feature = "api")]
fn sample_kind(result: &tiff::decoder::DecodingResult) -> &'static str {
    use tiff::decoder::DecodingResult;
    match result {
        DecodingResult::U8(_) => "U8",
        DecodingResult::U16(_) => "U16",
        DecodingResult::U32(_) => "U32",
        DecodingResult::U64(_) => "U64",
        DecodingResult::I8(_) => "I8",
        DecodingResult::I16(_) => "I16",
        DecodingResult::I32(_) => "I32",
        DecodingResult::I64(_) => "I64",
        DecodingResult::F32(_) => "F32",
        DecodingResult::F64(_) => "F64",
    }
}

/// Fetch one vegetation-index raster for a green space and time range,
/// with retry and exponential backoff.
///
/// Returns `None` when all attempts fail, so callers can skip a year the
/// way they would skip a station that is offline.
#[cfg(feature = "api")]
#[allow(clippy::too_many_arguments)]
pub async fn fetch_raster(
    client: &Client,
    config: &SentinelConfig,
    token: &str,
    green_space: &GreenSpace,
    start: NaiveDate,
    end: NaiveDate,
    index: VegetationIndex,
    masked_as: MaskedAs,
    width: usize,
    height: usize,
) -> Option<Raster> {
    let max_tries = 3;
    let mut sleep_millis: u64 = 1000;
    let body = build_process_body(green_space, start, end, index, masked_as, width, height);

    for attempt in 1..=max_tries {
        match client
            .post(&config.process_url)
            .bearer_auth(token)
            .header("Accept", "image/tiff")
            .json(&body)
            .send()
            .await
        {
            Ok(response) => {
                if response.status() != StatusCode::OK {
                    warn!(
                        "Attempt {}/{}: Bad response status for {} ({} to {}): {}",
                        attempt,
                        max_tries,
                        green_space.name,
                        start,
                        end,
                        response.status()
                    );
                } else {
                    match response.bytes().await {
                        Ok(bytes) => {
                            if bytes.len() <= 2 {
                                warn!(
                                    "Attempt {}/{}: Empty response for {}",
                                    attempt, max_tries, green_space.name
                                );
                            } else {
                                match decode_float_tiff(&bytes) {
                                    Ok(raster) => return Some(raster),
                                    Err(e) => {
                                        warn!(
                                            "Attempt {}/{}: Undecodable response for {}: {}",
                                            attempt, max_tries, green_space.name, e
                                        );
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Failed to read response body for {}: {}",
                                attempt, max_tries, green_space.name, e
                            );
                        }
                    }
                }
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{}: Request failed for {}: {}",
                    attempt, max_tries, green_space.name, e
                );
            }
        }

        if attempt < max_tries {
            info!(
                "Sleeping for {} milliseconds before retry for {}",
                sleep_millis, green_space.name
            );
            tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
            sleep_millis *= 2;
        }
    }

    warn!("All attempts failed for {}", green_space.name);
    None
}

#[cfg(test)]
mod tests {
    use super::build_process_body;
    use crate::evalscript::{MaskedAs, VegetationIndex};
    use crate::green_space::GreenSpace;
    use chrono::NaiveDate;

    #[test]
    fn test_build_process_body() {
        let green_space = GreenSpace::find_by_slug("trnava").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        let body = build_process_body(
            &green_space,
            start,
            end,
            VegetationIndex::Ndvi,
            MaskedAs::Nan,
            500,
            500,
        );

        assert_eq!(body["input"]["bounds"]["geometry"]["type"], "Polygon");
        assert_eq!(
            body["input"]["data"][0]["dataFilter"]["timeRange"]["from"],
            "2024-06-01T00:00:00Z"
        );
        assert_eq!(
            body["input"]["data"][0]["dataFilter"]["mosaickingOrder"],
            "leastCC"
        );
        assert_eq!(body["output"]["width"], 500);
        let evalscript = body["evalscript"].as_str().unwrap();
        assert!(evalscript.starts_with("//VERSION=3"));
    }
}
