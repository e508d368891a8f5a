use tracing_subscriber::EnvFilter;

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {{
        ::tracing::debug!($($arg)*)
    }};
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {{
        ::tracing::warn!($($arg)*)
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        ::tracing::error!($($arg)*)
    }};
}

#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {{
        ::tracing::info!($($arg)*)
    }};
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
