//! Collection of helper functions

use std::num::ParseIntError;
use std::time::Duration;

/// Parses a string containing a number of seconds into a [`Duration`]
pub fn parse_seconds(src: &str) -> Result<Duration, ParseIntError> {
    Ok(Duration::from_secs(src.parse::<u64>()?))
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn parse_valid_second_counts() {
        assert_eq!(parse_seconds("30"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_seconds("0"), Ok(Duration::from_secs(0)));
    }

    #[test]
    fn reject_garbage() {
        assert!(parse_seconds("ten").is_err());
        assert!(parse_seconds("-1").is_err());
    }
}
