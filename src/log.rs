// src/log.rs
//
// Thin macro layer over `tracing`. The subscriber is installed by the
// frontend (see src/cli.rs); without one the events are dropped.

pub const TARGET: &str = "datsemshift";

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        ::tracing::info!(target: $crate::log::TARGET, $($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: $crate::log::TARGET, $($arg)*)
    };
}

/// Warn-level logging (skipped pages/records, data-quality notes)
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: $crate::log::TARGET, $($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        ::tracing::error!(target: $crate::log::TARGET, $($arg)*)
    };
}
