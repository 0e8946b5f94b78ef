//! Bin names from folder names.
//!
//! A bin name is `"{date prefix} - {label}"`: the date comes from the root
//! folder, the label from the subfolder with any trailing `D/D/YYYY` note
//! removed. A trailing `L<n>` on the bin name is the load number used to pick
//! a load video.
//!
//! Every function here is total; absence is reported with defaults or
//! [`None`], never an error.

use crate::consts::{DATE_REGEX, LOAD_NUMBER_REGEX, TRAILING_DATE_REGEX};
use time::{Date, OffsetDateTime};

/// The first `YYYY-MM-DD` shaped substring of `root_name`, or today's local
/// date in the same format.
///
/// ```
/// use reel_reconcile::naming::derive_date_prefix;
///
/// assert_eq!(derive_date_prefix("2024-11-22 ShootDay"), "2024-11-22");
/// ```
pub fn derive_date_prefix(root_name: &str) -> String {
    date_prefix_or(root_name, today())
}

/// Like [`derive_date_prefix`] with an explicit fallback date.
pub fn date_prefix_or(root_name: &str, fallback: Date) -> String {
    match DATE_REGEX.find(root_name) {
        Some(found) => found.as_str().to_string(),
        None => format_date(fallback),
    }
}

fn format_date(date: Date) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

fn today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(e) => {
            // Determining the local offset is unsound in some multi-threaded
            // environments, and `time` refuses rather than guesses.
            tracing::debug!(error = %e, "Local offset unavailable; using UTC date");
            OffsetDateTime::now_utc().date()
        },
    }
}

/// Strip a trailing `D/D/YYYY` (and anything after it) from a subfolder name,
/// then trim surrounding whitespace.
///
/// ```
/// use reel_reconcile::naming::clean_subfolder_label;
///
/// assert_eq!(clean_subfolder_label("Alexii - Russ - L2 11/22/2024 notes"), "Alexii - Russ - L2");
/// ```
pub fn clean_subfolder_label(name: &str) -> String {
    TRAILING_DATE_REGEX.replace_all(name, "").trim().to_string()
}

/// The composite bin name for a subfolder label.
pub fn bin_name(date_prefix: &str, label: &str) -> String {
    format!("{date_prefix} - {label}")
}

/// The number in a trailing `L<digits>` token, if the bin name ends with one.
///
/// Numbers too large to be a load number are treated as absent.
pub fn extract_load_number(bin_name: &str) -> Option<u32> {
    LOAD_NUMBER_REGEX.captures(bin_name)?.get(1)?.as_str().parse().ok()
}
