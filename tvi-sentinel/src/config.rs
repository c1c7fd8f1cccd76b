use anyhow::Context;

/// Default Copernicus Data Space endpoints.
pub const DEFAULT_TOKEN_URL: &str =
    "https://identity.dataspace.copernicus.eu/auth/realms/CDSE/protocol/openid-connect/token";
pub const DEFAULT_PROCESS_URL: &str = "https://sh.dataspace.copernicus.eu/api/v1/process";

/// Sentinel Hub credentials and endpoints, built once at startup and passed
/// into the orchestration layer explicitly.
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub process_url: String,
}

impl SentinelConfig {
    pub fn new(client_id: String, client_secret: String) -> SentinelConfig {
        SentinelConfig {
            client_id,
            client_secret,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            process_url: DEFAULT_PROCESS_URL.to_string(),
        }
    }

    /// Read credentials from `TVI_CLIENT_ID` / `TVI_CLIENT_SECRET`.
    pub fn from_env() -> anyhow::Result<SentinelConfig> {
        let client_id = std::env::var("TVI_CLIENT_ID")
            .context("TVI_CLIENT_ID is not set; Sentinel Hub requests will fail without it")?;
        let client_secret = std::env::var("TVI_CLIENT_SECRET")
            .context("TVI_CLIENT_SECRET is not set; Sentinel Hub requests will fail without it")?;
        Ok(SentinelConfig::new(client_id, client_secret))
    }
}

#[cfg(test)]
mod tests {
    use super::SentinelConfig;

    #[test]
    fn test_new_uses_default_endpoints() {
        let config = SentinelConfig::new("id".to_string(), "secret".to_string());
        assert!(config.token_url.contains("openid-connect/token"));
        assert!(config.process_url.ends_with("/process"));
    }
}
