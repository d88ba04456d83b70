//! Connection settings resolution.
//!
//! Each field is looked up through an ordered chain of resolvers
//! (command-line flag, then environment variable). The first non-empty
//! value wins; a required field with no value is a startup error.

use std::collections::HashMap;

use crate::bus::nats::NatsEndpoint;
use crate::config::loader::ConfigError;

/// A resolvable setting and the names it goes by in each source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub flag: &'static str,
    pub env: &'static str,
}

impl Field {
    pub const USER: Field = Field { name: "user", flag: "--user", env: "NATS_USER" };
    pub const PASS: Field = Field { name: "pass", flag: "--pass", env: "NATS_PASS" };
    pub const HOST: Field = Field { name: "host", flag: "--host", env: "NATS_HOST" };
    pub const PORT: Field = Field { name: "port", flag: "--port", env: "NATS_PORT" };
    pub const TEST: Field = Field { name: "test", flag: "--test", env: "NATS_TEST" };
}

/// A single source of setting values.
pub trait Resolver: Send + Sync {
    /// Source label for logs.
    fn source(&self) -> &'static str;

    /// Value for `field`, if this source has one.
    fn lookup(&self, field: &Field) -> Option<String>;
}

/// Values given on the command line, keyed by field name.
#[derive(Debug, Default, Clone)]
pub struct FlagResolver {
    values: HashMap<&'static str, String>,
}

impl FlagResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the flag value for `field`, if one was given.
    pub fn with(mut self, field: Field, value: Option<String>) -> Self {
        if let Some(value) = value {
            self.values.insert(field.name, value);
        }
        self
    }
}

impl Resolver for FlagResolver {
    fn source(&self) -> &'static str {
        "flag"
    }

    fn lookup(&self, field: &Field) -> Option<String> {
        self.values.get(field.name).cloned()
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source. The lookup is injectable for tests.
pub struct EnvResolver {
    lookup: EnvLookup,
}

impl EnvResolver {
    /// Read from the process environment.
    pub fn from_process() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Resolver for EnvResolver {
    fn source(&self) -> &'static str {
        "env"
    }

    fn lookup(&self, field: &Field) -> Option<String> {
        (self.lookup)(field.env)
    }
}

/// Ordered list of resolvers tried in sequence.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver; earlier resolvers take precedence.
    pub fn with(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// First non-empty value for `field`.
    pub fn resolve(&self, field: &Field) -> Option<String> {
        self.resolvers.iter().find_map(|resolver| {
            let value = resolver.lookup(field).filter(|v| !v.is_empty())?;
            tracing::debug!(field = field.name, source = resolver.source(), "Setting resolved");
            Some(value)
        })
    }

    /// Like `resolve`, but a missing value is an error.
    pub fn require(&self, field: &Field) -> Result<String, ConfigError> {
        self.resolve(field).ok_or(ConfigError::Unresolved {
            field: field.name,
            flag: field.flag,
            env: field.env,
        })
    }

    /// Required TCP port, 1..=65535.
    pub fn require_port(&self, field: &Field) -> Result<u16, ConfigError> {
        let raw = self.require(field)?;
        match raw.trim().parse::<u16>() {
            Ok(0) => Err(ConfigError::InvalidValue {
                field: field.name,
                value: raw,
                reason: "port must be between 1 and 65535".to_string(),
            }),
            Ok(port) => Ok(port),
            Err(e) => Err(ConfigError::InvalidValue {
                field: field.name,
                value: raw,
                reason: e.to_string(),
            }),
        }
    }
}

/// Resolved bus endpoint and optional diagnostic topic.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub endpoint: NatsEndpoint,
    /// When set, the process runs the diagnostic subscriber instead of HTTP.
    pub test_topic: Option<String>,
}

impl ConnectionSettings {
    /// Resolve every connection field through `chain`.
    pub fn resolve(chain: &ResolverChain) -> Result<Self, ConfigError> {
        let endpoint = NatsEndpoint {
            user: chain.require(&Field::USER)?,
            pass: chain.require(&Field::PASS)?,
            host: chain.require(&Field::HOST)?,
            port: chain.require_port(&Field::PORT)?,
        };
        Ok(Self {
            endpoint,
            test_topic: chain.resolve(&Field::TEST),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&'static str, &'static str)]) -> EnvResolver {
        let map: HashMap<&'static str, &'static str> = pairs.iter().copied().collect();
        EnvResolver::with_lookup(move |key| map.get(key).map(|v| v.to_string()))
    }

    fn full_env() -> EnvResolver {
        env(&[
            ("NATS_USER", "env-user"),
            ("NATS_PASS", "env-pass"),
            ("NATS_HOST", "env-host"),
            ("NATS_PORT", "4222"),
        ])
    }

    #[test]
    fn test_flag_takes_precedence_over_env() {
        let chain = ResolverChain::new()
            .with(FlagResolver::new().with(Field::USER, Some("flag-user".to_string())))
            .with(full_env());

        assert_eq!(chain.resolve(&Field::USER).as_deref(), Some("flag-user"));
        assert_eq!(chain.resolve(&Field::PASS).as_deref(), Some("env-pass"));
    }

    #[test]
    fn test_empty_flag_falls_through() {
        let chain = ResolverChain::new()
            .with(FlagResolver::new().with(Field::HOST, Some(String::new())))
            .with(full_env());

        assert_eq!(chain.resolve(&Field::HOST).as_deref(), Some("env-host"));
    }

    #[test]
    fn test_missing_required_field_is_unresolved() {
        let chain = ResolverChain::new()
            .with(FlagResolver::new())
            .with(env(&[("NATS_USER", "u"), ("NATS_PASS", "p"), ("NATS_HOST", "h")]));

        let err = ConnectionSettings::resolve(&chain).unwrap_err();
        match err {
            ConfigError::Unresolved { field, env, .. } => {
                assert_eq!(field, "port");
                assert_eq!(env, "NATS_PORT");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_port_does_not_read_host_variable() {
        let chain = ResolverChain::new().with(env(&[
            ("NATS_USER", "u"),
            ("NATS_PASS", "p"),
            ("NATS_HOST", "4222"),
        ]));

        assert!(matches!(
            chain.require_port(&Field::PORT),
            Err(ConfigError::Unresolved { field: "port", .. })
        ));
    }

    #[test]
    fn test_invalid_port_values() {
        for bad in ["abc", "0", "70000"] {
            let chain = ResolverChain::new()
                .with(FlagResolver::new().with(Field::PORT, Some(bad.to_string())));
            assert!(
                matches!(chain.require_port(&Field::PORT), Err(ConfigError::InvalidValue { .. })),
                "port {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_full_resolution() {
        let chain = ResolverChain::new()
            .with(
                FlagResolver::new()
                    .with(Field::PORT, Some("4443".to_string()))
                    .with(Field::TEST, Some("diag.echo".to_string())),
            )
            .with(full_env());

        let settings = ConnectionSettings::resolve(&chain).unwrap();
        assert_eq!(settings.endpoint.user, "env-user");
        assert_eq!(settings.endpoint.host, "env-host");
        assert_eq!(settings.endpoint.port, 4443);
        assert_eq!(settings.test_topic.as_deref(), Some("diag.echo"));
    }

    #[test]
    fn test_test_topic_is_optional() {
        let chain = ResolverChain::new().with(full_env());
        let settings = ConnectionSettings::resolve(&chain).unwrap();
        assert!(settings.test_topic.is_none());
    }
}
