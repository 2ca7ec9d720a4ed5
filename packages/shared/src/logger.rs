//! Logging setup utilities for the Easel binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for the given crate targets.
///
/// `tower_http` is always included so that request traces follow the same level.
pub fn default_filter(targets: &[&str], default_log_level: &str) -> String {
    targets
        .iter()
        .chain(std::iter::once(&"tower_http"))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `targets` - Crate names whose logs should be enabled (e.g. `["easel-server"]`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use easel_shared::logger::setup_logger;
///
/// setup_logger(&["easel-server"], "info");
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(targets, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_crate_names() {
        // テスト項目: クレート名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let targets = ["easel-server", "easel-shared"];

        // when (操作):
        let filter = default_filter(&targets, "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "easel_server=debug,easel_shared=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_default_filter_without_targets() {
        // テスト項目: ターゲットが空でも tower_http のディレクティブは含まれる
        // given (前提条件):
        let targets: [&str; 0] = [];

        // when (操作):
        let filter = default_filter(&targets, "warn");

        // then (期待する結果):
        assert_eq!(filter, "tower_http=warn");
    }
}
