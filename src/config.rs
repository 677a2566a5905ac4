//! `key=value` configuration files.
//!
//! ```text
//! # sieve.env
//! listen=0.0.0.0:8080   # or `:8080`
//! ```
//!
//! Everything after the first `#` on a line is a comment. Keys and values are
//! trimmed. Lines that do not contain exactly one `=` are ignored, and a key
//! repeated later in the file overrides the earlier value.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Error;

const LISTEN: &str = "listen";

/// Parsed configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    listen: String,
    values: HashMap<String, String>,
}

impl Config {
    /// Reads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "configuration loaded");
        Self::parse(&text)
    }

    /// Parses configuration text. `listen` is required.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let values: HashMap<String, String> = text.lines().filter_map(parse_line).collect();
        let listen = values.get(LISTEN).cloned().ok_or(Error::Config(LISTEN))?;
        Ok(Self { listen, values })
    }

    /// The address the server binds, as written in the file.
    pub fn listen(&self) -> &str {
        &self.listen
    }

    /// Any key from the file.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let content = line.split('#').next().unwrap_or_default();
    let mut parts = content.split('=');
    let (key, value) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_owned(), value.trim().to_owned()))
}
