// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outbound request URLs with ordered query parameters.

use std::fmt;

/// Builds `host + path?key=value&...`.
///
/// Parameters render in the order they were added. Duplicate keys are kept.
/// Construct a fresh builder per request.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    host: String,
    path: String,
    params: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(host: &str, path: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            path: path.to_string(),
            params: Vec::new(),
        }
    }

    /// Append a query parameter. Strings and numbers both work.
    pub fn add_query_param(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }
}

impl fmt::Display for UrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.host, self.path)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(
                f,
                "{}{}={}",
                sep,
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}
