use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> = Lazy::new(|| {
    // CSI sequences: ESC [ params intermediates final-byte
    Regex::new(r"\x1B\[[0-?]*[ -/]*[@-~]").expect("ANSI pattern is valid")
});

/// Storage quota figures scraped from the login banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaInfo {
    pub available: String,
    pub used: String,
    pub max_files: String,
    pub current_files: String,
}

impl fmt::Display for QuotaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Available Space: {} Used Space: {} Max File Quota: {} Files Used: {}",
            self.available, self.used, self.max_files, self.current_files
        )
    }
}

pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE.replace_all(text, "").into_owned()
}

/// Find the quota row for `location` in a login banner.
///
/// The row is the first line where `location` is a whole token followed by
/// at least four more tokens.
pub fn parse_quota(banner: &str, location: &str) -> Option<QuotaInfo> {
    let clean = strip_ansi(banner);

    for line in clean.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(pos) = tokens.iter().position(|token| *token == location) else {
            continue;
        };
        if let [available, used, max_files, current_files, ..] = &tokens[pos + 1..] {
            return Some(QuotaInfo {
                available: available.to_string(),
                used: used.to_string(),
                max_files: max_files.to_string(),
                current_files: current_files.to_string(),
            });
        }
    }

    tracing::debug!("No quota row for {} in banner", location);
    None
}

/// Status text shown under the connection details.
pub fn describe(info: Option<&QuotaInfo>) -> String {
    match info {
        Some(info) => info.to_string(),
        None => "Storage info not found.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: &str = "\
Welcome to skirit.metacentrum.cz

\x1B[1;34mQuotas\x1B[0m
  storage          space-free  space-used  files-max  files-used
  brno12-cerit     1.2T        300G        4000000    12000
  \x1B[32mbrno2\x1B[0m            120G        80G         2000000    543211
";

    #[test]
    fn parses_row_for_location() {
        let info = parse_quota("brno2 120G 80G 2000000 543211", "brno2").unwrap();
        assert_eq!(info.available, "120G");
        assert_eq!(info.used, "80G");
        assert_eq!(info.max_files, "2000000");
        assert_eq!(info.current_files, "543211");
    }

    #[test]
    fn strips_colour_codes_before_matching() {
        let info = parse_quota(BANNER, "brno2").unwrap();
        assert_eq!(info.available, "120G");
        assert_eq!(info.current_files, "543211");
    }

    #[test]
    fn location_must_match_a_whole_token() {
        // Prefixes of longer storage names do not count.
        let banner = "brno21 1T 2G 3 4\nbrno2-x 5T 6G 7 8";
        assert_eq!(parse_quota(banner, "brno2"), None);
        assert_eq!(parse_quota(BANNER, "brno12").map(|i| i.used), None);
    }

    #[test]
    fn short_rows_are_skipped() {
        let banner = "brno2 quota below\nbrno2 10G 1G 100 5";
        let info = parse_quota(banner, "brno2").unwrap();
        assert_eq!(info.available, "10G");
    }

    #[test]
    fn missing_location_is_not_found() {
        assert_eq!(parse_quota(BANNER, "plzen1"), None);
        assert_eq!(parse_quota("", "brno2"), None);
        assert_eq!(describe(None), "Storage info not found.");
    }

    #[test]
    fn describe_formats_all_figures() {
        let info = parse_quota("brno2 120G 80G 2000000 543211", "brno2");
        assert_eq!(
            describe(info.as_ref()),
            "Available Space: 120G Used Space: 80G Max File Quota: 2000000 Files Used: 543211"
        );
    }
}
