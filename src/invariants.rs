//! Debug-only assertions for the ring's cursor and registration invariants.
//!
//! These are compiled out entirely in release builds (`debug_assertions` off),
//! so they cost nothing on target. They exist to catch a broken invariant at
//! the call site that violated it rather than as a mysterious corruption three
//! calls later.

/// `cons <= prod <= cons + capacity`.
macro_rules! debug_assert_cursors_bounded {
    ($cons:expr, $prod:expr, $capacity:expr) => {
        debug_assert!(
            $cons <= $prod && $prod - $cons <= $capacity as u64,
            "cursor invariant violated: cons={} prod={} capacity={}",
            $cons,
            $prod,
            $capacity
        )
    };
}

/// A cursor only ever moves forward.
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "{} moved backward: {} -> {}",
            $name,
            $old,
            $new
        )
    };
}

/// A sample's payload size is within the wire-format bounds.
macro_rules! debug_assert_valid_sample_size {
    ($size:expr) => {
        debug_assert!(
            crate::sample::is_valid_sample_size($size),
            "sample size {} outside [2, 6]",
            $size
        )
    };
}

/// `registered_count` never exceeds the table's fixed capacity.
macro_rules! debug_assert_registered_count_bounded {
    ($count:expr, $max:expr) => {
        debug_assert!(
            $count <= $max,
            "registered_count {} exceeds capacity {}",
            $count,
            $max
        )
    };
}

pub(crate) use debug_assert_cursors_bounded;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_registered_count_bounded;
pub(crate) use debug_assert_valid_sample_size;
