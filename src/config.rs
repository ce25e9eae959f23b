//! Session configuration.

use heapless::String;
use serde::Deserialize;

use crate::{Error, MAX_HOST_LEN};

/// Host label used when none is configured.
pub const DEFAULT_HOST: &str = "evshell";

/// Banner printed once when a session starts.
pub const DEFAULT_WELCOME: &str = "====================================\r\n\
+        e v s h e l l             +\r\n\
+    s h e l l   r e a d y .       +\r\n\
====================================\r\n";

/// Immutable settings of a shell session.
///
/// Buffer sizes and the command table size are const generic parameters of
/// [`Shell`](crate::Shell); everything else lives here.
///
/// # Examples
///
/// ```rust
/// use evshell::Config;
///
/// let config = Config::new("sensor-7").unwrap().with_welcome("");
/// assert_eq!(config.host.as_str(), "sensor-7");
///
/// let config = Config::from_json(r#"{"host":"gateway"}"#).unwrap();
/// assert_eq!(config.host.as_str(), "gateway");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Label shown in the prompt as `root@<host> $ `.
    pub host: String<MAX_HOST_LEN>,
    /// Banner printed before the first prompt. Empty disables it.
    pub welcome: &'static str,
}

#[derive(Deserialize)]
struct Document {
    host: String<MAX_HOST_LEN>,
}

impl Config {
    /// Creates a configuration for `host` with the default banner.
    ///
    /// Fails with [`Error::InvalidConfig`] if `host` is longer than
    /// [`MAX_HOST_LEN`] bytes.
    pub fn new(host: &str) -> Result<Self, Error> {
        let mut label = String::new();
        label.push_str(host).map_err(|_| {
            error!("host label exceeds {} bytes", MAX_HOST_LEN);
            Error::InvalidConfig
        })?;
        Ok(Self {
            host: label,
            welcome: DEFAULT_WELCOME,
        })
    }

    /// Replaces the banner.
    pub fn with_welcome(mut self, welcome: &'static str) -> Self {
        self.welcome = welcome;
        self
    }

    /// Parses a JSON document of the form `{"host": "..."}`.
    ///
    /// Unknown fields are ignored; the banner keeps its default.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let (doc, _) = serde_json_core::from_str::<Document>(json).map_err(|_| {
            error!("configuration document rejected");
            Error::InvalidConfig
        })?;
        Ok(Self {
            host: doc.host,
            welcome: DEFAULT_WELCOME,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut host = String::new();
        // DEFAULT_HOST is shorter than MAX_HOST_LEN.
        let _ = host.push_str(DEFAULT_HOST);
        Self {
            host,
            welcome: DEFAULT_WELCOME,
        }
    }
}
