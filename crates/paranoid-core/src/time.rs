//! Clock helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time in microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_positive() {
        assert!(now_micros() > 0);
    }
}
