// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 docker-build-step contributors

//! Secret redaction for diagnostic logging

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder written in place of secret values
pub const REDACTED: &str = "******";

static SENSITIVE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(PASS|SECRET|TOKEN|KEY|CREDENTIAL|AUTH|NETRC)")
        .expect("sensitive key regex is valid")
});

/// Render environment variables as `KEY=value` pairs, masking secret values
///
/// Used when credentials are missing, so operators can see which variables
/// the step actually received without the log exposing their contents.
pub fn redacted_environment<I, K, V>(vars: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<String> = vars
        .into_iter()
        .map(|(key, value)| {
            let key = key.as_ref();
            if SENSITIVE_KEY.is_match(key) && !value.as_ref().is_empty() {
                format!("{}={}", key, REDACTED)
            } else {
                format!("{}={}", key, value.as_ref())
            }
        })
        .collect();

    pairs.sort();
    pairs.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_key_regex_compiles() {
        assert!(SENSITIVE_KEY.is_match("PLUGIN_PASSWORD"));
        assert!(!SENSITIVE_KEY.is_match("DRONE_COMMIT_SHA"));
    }

    #[test]
    fn test_sensitive_keys() {
        for key in [
            "PLUGIN_PASSWORD",
            "DOCKER_PASSWORD",
            "drone_netrc_password",
            "AWS_SECRET_ACCESS_KEY",
            "GITHUB_TOKEN",
        ] {
            assert_eq!(redacted_environment([(key, "x")]), format!("{}=******", key));
        }
        for key in ["PLUGIN_USERNAME", "DRONE_COMMIT_SHA", "PLUGIN_EDITION"] {
            assert_eq!(redacted_environment([(key, "x")]), format!("{}=x", key));
        }
    }

    #[test]
    fn test_redacts_secret_values() {
        let rendered = redacted_environment(vec![
            ("PLUGIN_USERNAME", "grafanabot"),
            ("PLUGIN_PASSWORD", "hunter2"),
            ("DRONE_COMMIT_SHA", "abc123"),
        ]);

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("PLUGIN_PASSWORD=******"));
        assert!(rendered.contains("PLUGIN_USERNAME=grafanabot"));
        assert_eq!(
            rendered,
            "DRONE_COMMIT_SHA=abc123, PLUGIN_PASSWORD=******, PLUGIN_USERNAME=grafanabot"
        );
    }

    #[test]
    fn test_empty_secret_stays_visible() {
        // An empty password is the interesting fact when credentials are missing
        let rendered = redacted_environment(vec![("PLUGIN_PASSWORD", "")]);
        assert_eq!(rendered, "PLUGIN_PASSWORD=");
    }
}
