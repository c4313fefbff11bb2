//! Date-bearing directory name patterns.
//!
//! A directory component (after dropping a leading `DCIM-`) can carry:
//! - `YYYYMMDD...`   a literal date, label kept verbatim
//! - `YYYY-MM-DD...` a literal date, label rewritten to `YYYYMMDD...`
//! - `YYYY-nodate...` an explicit "no day-precision date here" marker
//!
//! Components are scanned from the innermost outward and the first one
//! matching any pattern decides.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

const DCIM_PREFIX: &str = "DCIM-";

static RE_COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})([0-9]{2})([0-9]{2})").expect("valid regex"));
static RE_DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid regex"));
static RE_NODATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-nodate").expect("valid regex"));

/// What the directory chain says about a file's date and target label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathHint {
    /// A component carries a calendar date; `label` is the normalized component text.
    Dated { label: String, date: NaiveDate },
    /// The nearest matching component is a `YYYY-nodate` marker.
    Undated { label: String, year: i32 },
    /// No component matched.
    Absent,
}

impl PathHint {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            PathHint::Dated { date, .. } => Some(*date),
            _ => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            PathHint::Dated { label, .. } | PathHint::Undated { label, .. } => Some(label),
            PathHint::Absent => None,
        }
    }

    /// Year bucket named by the matched component.
    pub fn year(&self) -> Option<i32> {
        match self {
            PathHint::Dated { date, .. } => Some(date.year()),
            PathHint::Undated { year, .. } => Some(*year),
            PathHint::Absent => None,
        }
    }
}

/// Drop a single leading `DCIM-`.
pub fn strip_dcim(component: &str) -> &str {
    component.strip_prefix(DCIM_PREFIX).unwrap_or(component)
}

/// Match one component against the three patterns.
pub fn match_component(component: &str) -> Option<PathHint> {
    let clean = strip_dcim(component);

    if let Some(date) = RE_COMPACT.captures(clean).and_then(|c| ymd(&c)) {
        return Some(PathHint::Dated {
            label: clean.to_string(),
            date,
        });
    }

    if let Some(date) = RE_DASHED.captures(clean).and_then(|c| ymd(&c)) {
        // "YYYY-MM-DD" is 10 bytes of ASCII; the tail is kept as-is.
        let label = format!("{}{}", date.format("%Y%m%d"), &clean[10..]);
        return Some(PathHint::Dated { label, date });
    }

    if let Some(year) = RE_NODATE
        .captures(clean)
        .and_then(|c| c.get(1)?.as_str().parse().ok())
    {
        return Some(PathHint::Undated {
            label: clean.to_string(),
            year,
        });
    }

    None
}

/// Scan components innermost (last) to outermost (first); first match wins.
pub fn scan_components<S: AsRef<str>>(components: &[S]) -> PathHint {
    components
        .iter()
        .rev()
        .find_map(|c| match_component(c.as_ref()))
        .unwrap_or(PathHint::Absent)
}

fn ymd(caps: &regex::Captures<'_>) -> Option<NaiveDate> {
    let y = caps.get(1)?.as_str().parse().ok()?;
    let m = caps.get(2)?.as_str().parse().ok()?;
    let d = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn compact_label_is_verbatim() {
        assert_eq!(
            match_component("20230615a_beach"),
            Some(PathHint::Dated {
                label: "20230615a_beach".into(),
                date: date(2023, 6, 15)
            })
        );
    }

    #[test]
    fn dashed_label_loses_date_hyphens_only() {
        assert_eq!(
            match_component("DCIM-2023-06-15_trip-north"),
            Some(PathHint::Dated {
                label: "20230615_trip-north".into(),
                date: date(2023, 6, 15)
            })
        );
    }

    #[test]
    fn nodate_marker_keeps_text() {
        assert_eq!(
            match_component("2019-nodate scans"),
            Some(PathHint::Undated {
                label: "2019-nodate scans".into(),
                year: 2019
            })
        );
    }

    #[test]
    fn impossible_dates_do_not_match() {
        assert_eq!(match_component("20231399"), None);
        assert_eq!(match_component("2023-02-30_x"), None);
        assert_eq!(match_component("holiday"), None);
        assert_eq!(match_component("2023"), None);
    }

    #[test]
    fn non_ascii_digits_do_not_match() {
        assert_eq!(match_component("２０１９-nodate"), None);
        assert_eq!(match_component("DCIM-２０２３-０６-１５_trip"), None);
        assert_eq!(match_component("٢٠٢٣٠٦١٥"), None);
    }

    #[test]
    fn only_one_dcim_prefix_is_removed() {
        assert_eq!(strip_dcim("DCIM-DCIM-x"), "DCIM-x");
        assert_eq!(strip_dcim("dcim-x"), "dcim-x");
    }

    #[test]
    fn nearest_component_wins() {
        let hint = scan_components(&["photos", "20200101_party", "2019-nodate"]);
        assert_eq!(
            hint,
            PathHint::Undated {
                label: "2019-nodate".into(),
                year: 2019
            }
        );
        let hint = scan_components(&["2019-nodate", "20200101_party", "misc"]);
        assert_eq!(hint.date(), Some(date(2020, 1, 1)));
        assert_eq!(hint.label(), Some("20200101_party"));
        assert_eq!(scan_components(&["a", "b"]), PathHint::Absent);
    }
}
