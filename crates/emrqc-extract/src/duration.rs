#![deny(unsafe_code)]

use std::sync::LazyLock;

use regex::Regex;

/// A duration expression: a count (digits or Chinese numerals) followed by
/// a time-unit token, e.g. 3天, 2周, 半月, 十余年, 48小时.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:\d+(?:\.\d+)?|[一二两三四五六七八九十百半数几]+)\s*(?:个|多|余)*\s*(?:秒|分钟|小时|天|日|周|星期|月|年)",
    )
    .expect("duration pattern")
});

/// Whether the text contains at least one duration expression.
pub fn contains_duration(text: &str) -> bool {
    DURATION_RE.is_match(text)
}

/// Byte span of the first duration expression, if any.
pub fn find_duration(text: &str) -> Option<(usize, usize)> {
    DURATION_RE.find(text).map(|hit| (hit.start(), hit.end()))
}
