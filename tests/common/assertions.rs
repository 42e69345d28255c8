//! Custom assertion macros and utilities
//!
//! Status checks with the response body in the failure message.

/// Assert a response has the given status, printing the body otherwise
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        assert_eq!(
            response.status_code().as_u16(),
            $status,
            "unexpected status, body: {}",
            response.text()
        );
    }};
}

/// Assert that two values are approximately equal (for floating point)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {
        let diff = ($left - $right).abs();
        assert!(
            diff < $epsilon,
            "Values are not approximately equal: {} vs {} (diff: {})",
            $left,
            $right,
            diff
        );
    };
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
