//! Service configuration from the environment.

use std::env;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use ras_model::DEFAULT_DESTINATION_EPSG;
use storage::{ObjectStorageConfig, S3Config};

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where model files are read from
    pub storage: ObjectStorageConfig,

    /// EPSG code geospatial data is delivered in
    pub destination_epsg: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let storage = match env::var("STORE_TYPE")
            .unwrap_or_else(|_| "S3".to_string())
            .to_uppercase()
            .as_str()
        {
            "S3" => ObjectStorageConfig::S3(s3_from_env()),
            "LOCAL" => ObjectStorageConfig::Local {
                root: env::var("LOCAL_ROOT").unwrap_or_else(|_| ".".to_string()),
            },
            "MEMORY" => ObjectStorageConfig::Memory,
            other => bail!("Unsupported STORE_TYPE '{}', expected S3 or LOCAL", other),
        };

        let destination_epsg = match env::var("DESTINATION_CRS") {
            Ok(raw) => parse_epsg(&raw)?,
            Err(_) => DEFAULT_DESTINATION_EPSG,
        };

        Ok(Self {
            storage,
            destination_epsg,
        })
    }
}

fn s3_from_env() -> S3Config {
    let defaults = S3Config::default();
    S3Config {
        endpoint: env::var("S3_ENDPOINT").unwrap_or(defaults.endpoint),
        bucket: env::var("S3_BUCKET").unwrap_or(defaults.bucket),
        access_key_id: env::var("S3_ACCESS_KEY").unwrap_or(defaults.access_key_id),
        secret_access_key: env::var("S3_SECRET_KEY").unwrap_or(defaults.secret_access_key),
        region: env::var("S3_REGION").unwrap_or(defaults.region),
        allow_http: env::var("S3_ALLOW_HTTP")
            .map(|v| v == "true")
            .unwrap_or(defaults.allow_http),
    }
}

/// Accepts `4326` or `EPSG:4326`.
pub fn parse_epsg(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    let code = raw
        .strip_prefix("EPSG:")
        .or_else(|| raw.strip_prefix("epsg:"))
        .unwrap_or(raw);
    match code.parse::<u32>() {
        Ok(code) => Ok(code),
        Err(_) => bail!("Invalid EPSG code '{}'", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_epsg() {
        assert_eq!(parse_epsg("4326").unwrap(), 4326);
        assert_eq!(parse_epsg("EPSG:26916").unwrap(), 26916);
        assert_eq!(parse_epsg(" epsg:5070 ").unwrap(), 5070);
        assert!(parse_epsg("WGS84").is_err());
    }
}
