//! Custom assertion macros

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a duration lies within `[low, high]`
#[macro_export]
macro_rules! assert_elapsed_between {
    ($elapsed:expr, $low:expr, $high:expr) => {
        let elapsed = $elapsed;
        assert!(
            elapsed >= $low && elapsed <= $high,
            "Elapsed {:?} not within [{:?}, {:?}]",
            elapsed,
            $low,
            $high
        );
    };
}
