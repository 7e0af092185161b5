//! Tracing subscriber installation.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a formatting subscriber for binder tracing output.
///
/// Safe to call more than once. Does nothing unless `RUNE_LOG` or
/// `RUST_LOG` is set; `RUNE_LOG` wins when both are, e.g.
/// `RUNE_LOG=rune_bind=debug` or `RUNE_LOG=rune_bind::graph=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let directives = std::env::var("RUNE_LOG").or_else(|_| std::env::var("RUST_LOG"));
        if let Ok(directives) = directives {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::new(directives))
                .init();
        }
    });
}
