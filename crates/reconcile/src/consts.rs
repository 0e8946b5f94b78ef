use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// First ISO-shaped date anywhere in the root folder name. Not validated as a calendar date.
regex!(DATE_REGEX, r"\d{4}-\d{2}-\d{2}");
// Trailing "D/D/YYYY" (plus anything after it) on a subfolder name.
regex!(TRAILING_DATE_REGEX, r"\s*\d{1,2}/\d{1,2}/\d{4}.*$");
regex!(LOAD_NUMBER_REGEX, r"L([0-9]+)$");
regex!(DIGIT_RUN_REGEX, r"[0-9]+");
