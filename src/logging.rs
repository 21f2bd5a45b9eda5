use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Maps a config level name to a tracing level; unknown names mean INFO.
pub(crate) fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Installs the global fmt subscriber. Safe to call more than once.
pub(crate) fn init(level: &str) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
