// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// tracing-subscriber set-up for the demo binaries and tests.

use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

static TEST_INIT: Once = Once::new();

/// Install a global subscriber printing one line per event, prefixed with the
/// worker span. `RUST_LOG` overrides `default_level`.
pub fn init(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_names(true)
        .with_span_events(FmtSpan::NONE);
    let subscriber = Registry::default().with(env_filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Route events to the test harness's captured output. Safe to call from
/// every test; only the first call installs anything.
pub fn init_for_tests() {
    TEST_INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let fmt_layer = fmt::layer().with_target(false).with_test_writer();
        let subscriber = Registry::default().with(env_filter).with(fmt_layer);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
