use eyre::{Result, eyre};
use slotshare_core::session::SessionConfig;
use std::env;
use uuid::Uuid;

pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";

/// Configuration for talking to a SlotShare server as one professional.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, e.g. "http://localhost:3000"
    pub api_url: String,
    /// Professional the client acts for on operator endpoints
    pub professional_id: Uuid,
    /// Origin share links are built on
    pub public_base_url: String,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("SLOTSHARE_API_URL")
            .map_err(|_| eyre!("SLOTSHARE_API_URL environment variable not set"))?;

        let professional_id = env::var("SLOTSHARE_PROFESSIONAL_ID")
            .map_err(|_| eyre!("SLOTSHARE_PROFESSIONAL_ID environment variable not set"))?;
        let professional_id = Uuid::parse_str(professional_id.trim())
            .map_err(|_| eyre!("SLOTSHARE_PROFESSIONAL_ID must be a valid UUID"))?;

        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_BASE_URL.to_string());

        Ok(Self {
            api_url,
            professional_id,
            public_base_url,
        })
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            professional_id: self.professional_id,
            public_base_url: self.public_base_url.clone(),
        }
    }
}
