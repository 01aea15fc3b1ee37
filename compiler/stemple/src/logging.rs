use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Filter directives for stemple's own diagnostics; `RUST_LOG` is the fallback.
const LOG_VAR: &str = "STEMPLE_LOG";

/// When set, spans print as an indented tree instead of flat lines.
const TREE_VAR: &str = "STEMPLE_LOG_TREE";

/// Install the stderr subscriber.
///
/// Nothing is installed unless `STEMPLE_LOG` or `RUST_LOG` is set, e.g.
/// `STEMPLE_LOG=stemple_expand=debug`. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(directives) = std::env::var(LOG_VAR).or_else(|_| std::env::var("RUST_LOG")) else {
            return;
        };
        let registry = tracing_subscriber::registry().with(EnvFilter::new(directives));

        if std::env::var_os(TREE_VAR).is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_writer(std::io::stderr)
                        .with_targets(true),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    });
}
