mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{
    ApiSettings, ChannelSettings, LoggingSettings, SessionSettings, Settings,
};

/// Loads the configuration from `.env`, `config/default.*` and `VOTELIVE_*`
/// environment variables, merged over the defaults.
///
/// Nested keys use a double underscore: `VOTELIVE_API__BASE_URL`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("VOTELIVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    Ok(Settings {
        api: ApiSettings {
            base_url: partial
                .api
                .as_ref()
                .and_then(|a| a.base_url.clone())
                .unwrap_or(default.api.base_url),
            path: partial
                .api
                .as_ref()
                .and_then(|a| a.path.clone())
                .unwrap_or(default.api.path),
            timeout_secs: partial
                .api
                .as_ref()
                .and_then(|a| a.timeout_secs)
                .unwrap_or(default.api.timeout_secs),
        },
        channel: ChannelSettings {
            url: partial
                .channel
                .as_ref()
                .and_then(|c| c.url.clone())
                .unwrap_or(default.channel.url),
        },
        session: SessionSettings {
            store_path: partial
                .session
                .as_ref()
                .and_then(|s| s.store_path.clone())
                .unwrap_or(default.session.store_path),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}
