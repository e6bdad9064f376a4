//! Logging setup shared by the Chatterfly binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the Chatterfly library crates and the calling binary.
/// It can be overridden entirely with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chatterfly-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use chatterfly_shared::logger::setup_logger;
///
/// setup_logger("chatterfly-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Logger initialized for {}", binary_name);
}

/// Build the default `EnvFilter` directive string.
fn default_filter(binary_name: &str, level: &str) -> String {
    let mut targets = vec![
        "chatterfly_server".to_string(),
        "chatterfly_client".to_string(),
        "tower_http".to_string(),
    ];
    let binary_target = binary_name.replace('-', "_");
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_library_crates_and_binary() {
        // テスト項目: デフォルトのフィルタにライブラリとバイナリの両方が含まれる
        // given (前提条件):
        let binary_name = "chatterfly-server";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果): バイナリ名はライブラリ名と重複しないので追加されない
        assert_eq!(
            filter,
            "chatterfly_server=info,chatterfly_client=info,tower_http=info"
        );
    }

    #[test]
    fn test_default_filter_adds_unknown_binary() {
        // テスト項目: ライブラリ以外のバイナリ名はフィルタに追加される
        // given (前提条件):
        let binary_name = "load-test";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert!(filter.ends_with(",load_test=debug"));
    }
}
