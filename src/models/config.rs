use std::path::PathBuf;

use serde::Deserialize;

fn default_saved_events_path() -> PathBuf {
    PathBuf::from("saved_events.csv")
}

/// Configuration options for the event-discovery application.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Location of the CSV file holding every user's saved events.
    #[serde(default = "default_saved_events_path")]
    pub saved_events_path: PathBuf,
    /// Username treated as logged in when none is given on the command line.
    #[serde(default)]
    pub current_user: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            saved_events_path: default_saved_events_path(),
            current_user: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.saved_events_path, PathBuf::from("saved_events.csv"));
    }

    #[test]
    fn reads_all_fields() {
        let config: AppConfig =
            serde_json::from_str(r#"{"saved_events_path":"/tmp/x.csv","current_user":"alice"}"#)
                .unwrap();
        assert_eq!(config.saved_events_path, PathBuf::from("/tmp/x.csv"));
        assert_eq!(config.current_user.as_deref(), Some("alice"));
    }
}
