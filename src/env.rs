//! Snapshot of the process environment and the workflow runner's input conventions.
//!
//! Every phase reads its inputs, persisted state and runner metadata from an
//! [`EnvConfig`] captured once at startup, which keeps the context builder and
//! stage resolver free of global reads.

use std::collections::HashMap;

/// Immutable snapshot of environment variables
#[derive(Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

// Values may hold the API token, so only names are printed.
impl std::fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.vars.keys().collect();
        keys.sort();
        f.debug_struct("EnvConfig").field("keys", &keys).finish()
    }
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Return a copy with one variable set
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Return a copy with one variable removed
    pub fn without(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }

    /// Raw variable lookup; empty values count as absent
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    /// Action input lookup (`INPUT_<NAME>`), trimmed; empty values count as absent
    pub fn input(&self, name: &str) -> Option<String> {
        self.vars
            .get(&input_key(name))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    /// Persisted state lookup (`STATE_<key>`); empty values count as absent
    pub fn state(&self, key: &str) -> Option<String> {
        self.get(&format!("STATE_{key}"))
    }
}

/// Environment variable name the runner uses for an action input
pub fn input_key(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Parse a boolean input the way the runner documents it
pub fn to_boolean(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

/// Split a whitespace-delimited input into its entries
pub fn parse_array(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_key_normalisation() {
        assert_eq!(input_key("required_contexts"), "INPUT_REQUIRED_CONTEXTS");
        assert_eq!(input_key("environment name"), "INPUT_ENVIRONMENT_NAME");
    }

    #[test]
    fn test_input_trims_and_skips_blank() {
        let env = EnvConfig::from_pairs([("INPUT_REF", "  main  "), ("INPUT_VERSION", "   ")]);
        assert_eq!(env.input("ref").as_deref(), Some("main"));
        assert_eq!(env.input("version"), None);
        assert_eq!(env.input("token"), None);
    }

    #[test]
    fn test_to_boolean() {
        for truthy in ["true", "TRUE", "1", "on", "Yes", " true "] {
            assert!(to_boolean(truthy), "{truthy} should be true");
        }
        for falsy in ["", "false", "0", "off", "no", "truthy"] {
            assert!(!to_boolean(falsy), "{falsy} should be false");
        }
    }

    #[test]
    fn test_parse_array() {
        assert!(parse_array("").is_empty());
        assert!(parse_array("   ").is_empty());
        assert_eq!(parse_array(" ci/test\n lint  build "), vec!["ci/test", "lint", "build"]);
    }

    #[test]
    fn test_debug_hides_values() {
        let env = EnvConfig::from_pairs([("INPUT_TOKEN", "secret-token")]);
        let rendered = format!("{env:?}");
        assert!(rendered.contains("INPUT_TOKEN"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn test_state_lookup() {
        let env = EnvConfig::default().with("STATE_preHasRun", "true");
        assert_eq!(env.state("preHasRun").as_deref(), Some("true"));
        assert_eq!(env.state("mainHasRun"), None);
        assert_eq!(env.without("STATE_preHasRun").state("preHasRun"), None);
    }
}
