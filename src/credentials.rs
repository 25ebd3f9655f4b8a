//! EUIPO client credentials loaded from the process environment.
//!
//! Secrets never live in the TOML config file. They are read from
//! `EUIPO_CLIENT_ID` and `EUIPO_CLIENT_SECRET`, trimmed, and redacted
//! from `Debug`.

use std::fmt;

/// Environment variable holding the OAuth2 client id.
pub const CLIENT_ID_VAR: &str = "EUIPO_CLIENT_ID";

/// Environment variable holding the OAuth2 client secret.
pub const CLIENT_SECRET_VAR: &str = "EUIPO_CLIENT_SECRET";

/// Resolved client credentials. Empty strings mean "not configured".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoadedCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for LoadedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .finish()
    }
}

fn redact(s: &str) -> &str {
    if s.is_empty() { "" } else { "[REDACTED]" }
}

impl LoadedCredentials {
    /// Read both secrets from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both secrets through `lookup`. Missing values become empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).unwrap_or_default();
        Self {
            client_id: read(CLIENT_ID_VAR),
            client_secret: read(CLIENT_SECRET_VAR),
        }
    }

    /// Whether both secrets are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    /// Names of the variables that are missing, for diagnostics.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push(CLIENT_ID_VAR);
        }
        if self.client_secret.is_empty() {
            missing.push(CLIENT_SECRET_VAR);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_and_trims_both_values() {
        let creds = LoadedCredentials::from_lookup(lookup(&[
            (CLIENT_ID_VAR, " id \n"),
            (CLIENT_SECRET_VAR, "secret"),
        ]));
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
        assert!(creds.is_complete());
        assert!(creds.missing().is_empty());
    }

    #[test]
    fn missing_values_are_empty() {
        let creds = LoadedCredentials::from_lookup(lookup(&[(CLIENT_ID_VAR, "id")]));
        assert!(!creds.is_complete());
        assert_eq!(creds.missing(), vec![CLIENT_SECRET_VAR]);
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let creds = LoadedCredentials::from_lookup(lookup(&[
            (CLIENT_ID_VAR, "   "),
            (CLIENT_SECRET_VAR, "\t"),
        ]));
        assert_eq!(creds.missing(), vec![CLIENT_ID_VAR, CLIENT_SECRET_VAR]);
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = LoadedCredentials {
            client_id: "id".into(),
            client_secret: "hunter2".into(),
        };
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
