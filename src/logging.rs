use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Level filter for a number of `-v` flags on top of the configured level
pub fn level_for(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing compact logs to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Calling this a second time is
/// harmless: the existing subscriber stays in place and the error is returned.
pub fn init(level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
