//! Canonical logging macros
//!
//! Every comparison entry point brackets its work with one start event and
//! exactly one end or end_error event. Paths resolve through `$crate`, so
//! callers need neither `tracing` nor `structdiff-core-types` in scope.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use structdiff_core::log_op_start;
/// log_op_start!("compare");
/// log_op_start!("compare", type_name = "Order");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {{
        $crate::__macro_support::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::schema::EVENT_START,
            $($($field)+)?
        );
    }};
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use structdiff_core::log_op_end;
/// log_op_end!("compare", duration_ms = 42);
/// log_op_end!("compare", duration_ms = 42, difference_count = 3usize);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        $crate::__macro_support::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        );
    }};
}

/// Log an operation error
///
/// Anything convertible into [`ExError`](crate::errors::ExError) is accepted;
/// the event carries its kind and stable code.
///
/// # Example
///
/// ```
/// # use structdiff_core::{log_op_error, errors::CompareError};
/// let err = CompareError::DuplicateOverride { member: "Order.id".to_string() };
/// log_op_error!("add_member_override", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__macro_support::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::__macro_support::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)+)?
        );
    }};
}
