use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;
use crate::defaults::Defaults;

/// Install the global subscriber. `RUST_LOG` wins; otherwise only warnings
/// and errors are shown so the menu screen stays readable.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(Defaults::LOG_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second init (tests, embedding) keeps whichever subscriber came first.
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
}
