//! Configuration sanity checks.

use crate::config::schema::{LogFormat, LogOutput, Mode, TetherConfig};
use crate::error::{ConfigError, ConfigResult};

const KNOWN_SCHEMES: &[&str] = &["tcp", "udp", "tls", "quic", "ws", "unixsock-stream"];

/// Validates an extracted configuration.
///
/// Catches the inconsistencies figment cannot: malformed endpoints,
/// role/endpoint mismatches and impossible logging setups.
pub fn validate(config: &TetherConfig) -> ConfigResult<()> {
    for endpoint in config.connect.iter().chain(&config.listen) {
        validate_endpoint(endpoint)?;
    }

    if config.mode == Mode::Client && !config.listen.is_empty() {
        return Err(ConfigError::Validation(
            "a client does not listen; remove `listen` or switch mode".to_string(),
        ));
    }

    if config.scouting.multicast_enabled && !config.scouting.multicast_address.contains(':') {
        return Err(ConfigError::Validation(format!(
            "multicast address {:?} is missing a port",
            config.scouting.multicast_address
        )));
    }

    if config.scouting.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "scouting timeout must be non-zero".to_string(),
        ));
    }

    if config.logging.output == LogOutput::File && config.logging.file_path.is_none() {
        return Err(ConfigError::Validation(
            "file log output requires `logging.file_path`".to_string(),
        ));
    }

    if config.logging.format == LogFormat::Json && cfg!(not(feature = "json-log")) {
        return Err(ConfigError::Validation(
            "JSON log format requires the `json-log` feature".to_string(),
        ));
    }

    Ok(())
}

fn validate_endpoint(endpoint: &str) -> ConfigResult<()> {
    let Some((scheme, address)) = endpoint.split_once('/') else {
        return Err(ConfigError::Validation(format!(
            "endpoint {endpoint:?} must look like `scheme/address`",
        )));
    };
    if !KNOWN_SCHEMES.contains(&scheme) {
        return Err(ConfigError::Validation(format!(
            "endpoint {endpoint:?} uses unknown scheme {scheme:?}",
        )));
    }
    if address.is_empty() {
        return Err(ConfigError::Validation(format!(
            "endpoint {endpoint:?} has an empty address",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&TetherConfig::default()).is_ok());
    }

    #[test]
    fn endpoints_must_carry_a_known_scheme() {
        let mut config = TetherConfig::default();
        config.connect.push("tcp/127.0.0.1:7447".to_string());
        assert!(validate(&config).is_ok());

        config.connect.push("127.0.0.1:7447".to_string());
        assert!(validate(&config).is_err());

        config.connect.pop();
        config.connect.push("carrier-pigeon/coop:1".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn clients_must_not_listen() {
        let mut config = TetherConfig::default();
        config.mode = Mode::Client;
        config.listen.push("tcp/0.0.0.0:7447".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn scouting_timeout_must_be_positive() {
        let mut config = TetherConfig::default();
        config.scouting.timeout_ms = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn file_output_requires_a_path() {
        let mut config = TetherConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate(&config).is_err());
        config.logging.file_path = Some("/tmp/tether.log".into());
        assert!(validate(&config).is_ok());
    }
}
