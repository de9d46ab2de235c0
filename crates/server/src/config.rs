use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use scrivener_core::ExtractorConfig;

/// Extra time a request may take beyond the upstream fetch timeout.
const REQUEST_GRACE: Duration = Duration::from_secs(5);

/// Server settings, read from flags with environment fallbacks.
#[derive(Parser, Debug, Clone)]
#[command(name = "scrivener-server")]
#[command(version)]
#[command(about = "HTTP API for importing posts from web pages", long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "SCRIVENER_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// Upstream fetch timeout in seconds
    #[arg(long, env = "SCRIVENER_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// User-Agent sent to source sites
    #[arg(long, env = "SCRIVENER_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Minimum text length for a content candidate to be accepted
    #[arg(long, env = "SCRIVENER_MIN_CONTENT_LENGTH", default_value_t = 200)]
    pub min_content_length: usize,

    /// Origin allowed by CORS (any origin when unset)
    #[arg(long, env = "SCRIVENER_CORS_ORIGIN")]
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Upper bound for a whole request, fetch included.
    pub fn request_timeout(&self) -> Duration {
        self.fetch_timeout() + REQUEST_GRACE
    }

    pub fn extractor_config(&self) -> ExtractorConfig {
        let mut builder = ExtractorConfig::builder()
            .timeout(self.fetch_timeout())
            .min_content_length(self.min_content_length);
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        builder.build()
    }
}
