//! Tracing subscriber setup.
//!
//! Library code only emits `tracing` events; binaries and tests that want
//! to see them call [`init_tracing`] once at startup.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;

/// Install a `fmt` subscriber filtered at `config.log_level`.
///
/// `RUST_LOG`, when set, takes precedence over the configured level. Returns
/// `false` if a global subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init_tracing(config: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let config = GeneralConfig {
            log_level: "debug".to_string(),
        };
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
