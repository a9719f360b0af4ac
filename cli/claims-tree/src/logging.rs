use tracing_subscriber::EnvFilter;

/// Maps `-v` repetitions to a default filter: 0 → info, 1 → debug, 2+ → trace.
pub fn level_from_verbosity(count: u8) -> &'static str {
    match count {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_from_verbosity(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(level_from_verbosity(0), "info");
        assert_eq!(level_from_verbosity(1), "debug");
        assert_eq!(level_from_verbosity(2), "trace");
        assert_eq!(level_from_verbosity(10), "trace");
    }
}
