use serde::Deserialize;

/// Top-level configuration settings for the client.
///
/// Groups the REST API, push channel, session store and logging settings.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub channel: ChannelSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
}

/// Where the remote REST API lives.
///
/// Requests go to `base_url` joined with `path`.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub path: String,
    pub timeout_secs: u64,
}

impl ApiSettings {
    /// Full API root, e.g. `http://127.0.0.1:5000/api`.
    pub fn root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_matches('/')
        )
        .trim_end_matches('/')
        .to_string()
    }
}

/// Push channel endpoint used for live result updates.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelSettings {
    pub url: String,
}

/// Location of the on-disk session token store.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub store_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub api: Option<PartialApiSettings>,
    pub channel: Option<PartialChannelSettings>,
    pub session: Option<PartialSessionSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialApiSettings {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialChannelSettings {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialSessionSettings {
    pub store_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: "http://127.0.0.1:5000".to_string(),
                path: "/api".to_string(),
                timeout_secs: 10,
            },
            channel: ChannelSettings {
                url: "ws://127.0.0.1:5000/live".to_string(),
            },
            session: SessionSettings {
                store_path: ".votelive/session".to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
