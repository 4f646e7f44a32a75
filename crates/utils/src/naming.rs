//! Output file naming.

use std::fmt::Display;

use chrono::Local;

/// Local generation time as `YYYYMMDDHHMMSS`.
#[must_use]
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// `{name}_{start}_{end}_{timestamp}.{ext}`.
///
/// The range keeps runs over different windows apart and the timestamp
/// keeps reruns from overwriting each other.
#[must_use]
pub fn dated_file_name(name: &str, start: impl Display, end: impl Display, ext: &str) -> String {
    format!("{name}_{start}_{end}_{}.{ext}", timestamp())
}

/// `{prefix}_{timestamp}.{ext}`.
#[must_use]
pub fn stamped_file_name(prefix: &str, ext: &str) -> String {
    format!("{prefix}_{}.{ext}", timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_fourteen_digits() {
        let ts = timestamp();
        assert_eq!(ts.len(), 14);
        assert!(ts.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn dated_name_encodes_range() {
        let name = dated_file_name("features", "20180101", "20200101", "csv");
        assert!(name.starts_with("features_20180101_20200101_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "features_20180101_20200101_".len() + 14 + 4);
    }

    #[test]
    fn stamped_name_has_prefix() {
        let name = stamped_file_name("winloss_ridge", "json");
        assert!(name.starts_with("winloss_ridge_"));
        assert!(name.ends_with(".json"));
    }
}
