//! Logging setup utilities for the relay server and client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Sets the level for the binary's own target, `yamabiko_shared` and `tower_http`.
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "yamabiko-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use yamabiko_shared::logger::setup_logger;
///
/// setup_logger("yamabiko-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(
        "Logger initialized for {} (default level: {})",
        binary_name,
        default_log_level
    );
}

/// Build the default filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let target = binary_name.replace('-', "_");
    format!(
        "{}={},{}={},tower_http={}",
        target,
        default_log_level,
        env!("CARGO_PKG_NAME").replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_binary_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let binary_name = "yamabiko-server";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            filter,
            "yamabiko_server=info,yamabiko_shared=info,tower_http=info"
        );
    }

    #[test]
    fn test_setup_logger_installs_global_subscriber() {
        // テスト項目: ロガーの初期化でグローバルな subscriber が設定される
        // given (前提条件):
        let binary_name = "yamabiko-server";

        // when (操作):
        setup_logger(binary_name, "debug");

        // then (期待する結果):
        assert!(tracing::dispatcher::has_been_set());
    }
}
