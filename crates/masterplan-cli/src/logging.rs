use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins when set; otherwise the masterplan crates log at `level`
/// and everything else at `warn`.
pub fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(format!(
            "warn,masterplan_engine={level},masterplan_cli={level},masterplan={level}"
        ))?),
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only the JSON result.
pub fn init_logging(config: &LoggingConfig, verbose: bool, json: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level)?)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if json || config.json { builder.json().try_init() } else { builder.try_init() };
    installed.map_err(|err| anyhow::anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_filter_for_every_level() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(env_filter(level).is_ok());
        }
    }
}
