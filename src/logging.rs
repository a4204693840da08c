use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where a Loki push goes and how the stream is labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct LokiTarget {
    pub url: String,
    pub service_name: String,
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_level: String,
    pub loki: Option<LokiTarget>,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, String> {
        let enabled = std::env::var("LOKI_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        let loki = loki_url(enabled, std::env::var("LOKI_URL").ok())?.map(|url| LokiTarget {
            url,
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "crypto-prices".to_string()),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        });

        Ok(Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            loki,
        })
    }

    /// `--log-level` from the command line wins over `RUST_LOG`.
    pub fn with_level(mut self, level: Option<&str>) -> Self {
        if let Some(level) = level {
            self.log_level = level.to_string();
        }
        self
    }
}

fn loki_url(enabled: bool, url: Option<String>) -> Result<Option<String>, String> {
    match (enabled, url) {
        (false, _) => Ok(None),
        (true, Some(url)) => Ok(Some(url)),
        (true, None) => Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string()),
    }
}

/// Console output always; events are also shipped to Loki when a target is set
/// and the `loki` feature is on.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_level)?)
        .with(tracing_subscriber::fmt::layer());

    #[cfg(feature = "loki")]
    {
        if let Some(target) = &config.loki {
            let (loki_layer, task) = tracing_loki::builder()
                .label("service", &target.service_name)?
                .label("environment", &target.environment)?
                .build_url(url::Url::parse(&target.url)?)?;
            // needs a running tokio runtime
            tokio::spawn(task);

            registry.with(loki_layer).try_init()?;
            tracing::info!("Loki logging initialized at {}", target.url);
            return Ok(());
        }
    }

    registry.try_init()?;
    if config.loki.is_some() {
        tracing::warn!("LOKI_ENABLED is set but this build has no `loki` feature");
    }
    Ok(())
}
