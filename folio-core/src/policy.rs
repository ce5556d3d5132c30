//! Availability windows and ignore declarations.
//!
//! Both are declared by a directory about its direct children:
//!
//! ```yaml
//! availability:
//!   - file: exam.md
//!     start: 2024-05-01 09:00
//!     end: ragnarok
//! ignore:
//!   - file: scratch
//!     ignore: true
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::error::PolicyError;

pub const AVAILABILITY_KEY: &str = "availability";
pub const IGNORE_KEY: &str = "ignore";

// ---------------------------------------------------------------------------
// TimeBound
// ---------------------------------------------------------------------------

/// One end of an availability window.
///
/// Variant order matters: the derived `Ord` places `BigBang` before every
/// concrete instant and `Ragnarok` after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBound {
    BigBang,
    At(DateTime<Utc>),
    Ragnarok,
}

impl TimeBound {
    /// Parse a sentinel, an RFC 3339 timestamp, `YYYY-MM-DD HH:MM[:SS]` or
    /// `YYYY-MM-DD`. The last two are read in local time.
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        let s = raw.trim();
        match s {
            "big-bang" => return Ok(TimeBound::BigBang),
            "ragnarok" => return Ok(TimeBound::Ragnarok),
            _ => {}
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(TimeBound::At(dt.with_timezone(&Utc)));
        }
        let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            });
        naive
            .and_then(|n| Local.from_local_datetime(&n).earliest())
            .map(|dt| TimeBound::At(dt.with_timezone(&Utc)))
            .ok_or_else(|| PolicyError::InvalidTimestamp {
                value: raw.to_string(),
            })
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            TimeBound::At(t) => Some(*t),
            _ => None,
        }
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBound::BigBang => write!(f, "big-bang"),
            TimeBound::Ragnarok => write!(f, "ragnarok"),
            TimeBound::At(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}

// ---------------------------------------------------------------------------
// AvailabilityWindow
// ---------------------------------------------------------------------------

/// A well-formed `[start, end]` window. Construct with [`AvailabilityWindow::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityWindow {
    start: TimeBound,
    end: TimeBound,
}

impl AvailabilityWindow {
    /// The open window `[big-bang, ragnarok]`.
    pub const ALWAYS: AvailabilityWindow = AvailabilityWindow {
        start: TimeBound::BigBang,
        end: TimeBound::Ragnarok,
    };

    /// Validate a window. With the bound ordering this single comparison
    /// rejects a `ragnarok` start, a `big-bang` end and `start >= end`.
    pub fn new(start: TimeBound, end: TimeBound) -> Result<Self, PolicyError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(PolicyError::IllFormedWindow {
                start: start.to_string(),
                end: end.to_string(),
            })
        }
    }

    pub fn start(&self) -> TimeBound {
        self.start
    }

    pub fn end(&self) -> TimeBound {
        self.end
    }

    /// Inclusive at both ends.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        let now = TimeBound::At(now);
        self.start <= now && now <= self.end
    }

    /// Earliest concrete endpoint strictly after `now`.
    pub fn next_transition(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        [self.start, self.end]
            .iter()
            .filter_map(TimeBound::instant)
            .filter(|t| *t > now)
            .min()
    }
}

/// Check a raw `(start, end)` pair against `now`.
///
/// An ill-formed window is an error; callers treat it as unavailable.
pub fn check_availability(
    start: TimeBound,
    end: TimeBound,
    now: DateTime<Utc>,
) -> Result<bool, PolicyError> {
    AvailabilityWindow::new(start, end).map(|w| w.is_available(now))
}

// ---------------------------------------------------------------------------
// DirectoryPolicy
// ---------------------------------------------------------------------------

/// What to do with one direct child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Produce,
    Ignored,
    Unavailable,
}

/// Declarations one directory made about its direct children.
#[derive(Debug, Clone, Default)]
pub struct DirectoryPolicy {
    /// `None` marks an ill-formed window: the target stays unavailable.
    windows: BTreeMap<String, Option<AvailabilityWindow>>,
    ignored: BTreeSet<String>,
    rejected: Vec<PolicyError>,
}

impl DirectoryPolicy {
    /// Build from the raw `availability` and `ignore` values of a directory.
    ///
    /// `exists(name)` reports whether the directory has a direct child with
    /// that name. Rejected declarations are logged on `folio::policy` and
    /// dropped; they are kept in [`DirectoryPolicy::rejected`] for callers.
    pub fn from_declarations<F>(
        availability: Option<&Value>,
        ignore: Option<&Value>,
        exists: F,
    ) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut policy = DirectoryPolicy::default();

        for decl in entries(AVAILABILITY_KEY, availability, &mut policy.rejected) {
            let file = match target(&decl, &exists) {
                Ok(file) => file,
                Err(e) => {
                    policy.reject(e);
                    continue;
                }
            };
            let window = parse_window(&decl).and_then(|(s, e)| AvailabilityWindow::new(s, e));
            match window {
                Ok(w) => {
                    policy.windows.insert(file, Some(w));
                }
                Err(e) => {
                    tracing::warn!(target: "folio::policy", file = %file, error = %e, "treating as unavailable");
                    policy.rejected.push(e);
                    policy.windows.insert(file, None);
                }
            }
        }

        for decl in entries(IGNORE_KEY, ignore, &mut policy.rejected) {
            match target(&decl, &exists) {
                Ok(file) => {
                    let flag = match &decl {
                        Value::Object(map) => map.get("ignore").map_or(true, truthy),
                        _ => true,
                    };
                    if flag {
                        policy.ignored.insert(file);
                    } else {
                        policy.ignored.remove(&file);
                    }
                }
                Err(e) => policy.reject(e),
            }
        }

        policy
    }

    fn reject(&mut self, e: PolicyError) {
        tracing::warn!(target: "folio::policy", error = %e, "declaration dropped");
        self.rejected.push(e);
    }

    pub fn verdict(&self, name: &str, now: DateTime<Utc>) -> Verdict {
        if self.ignored.contains(name) {
            return Verdict::Ignored;
        }
        match self.windows.get(name) {
            None => Verdict::Produce,
            Some(Some(w)) if w.is_available(now) => Verdict::Produce,
            Some(_) => Verdict::Unavailable,
        }
    }

    /// Earliest future transition across every well-formed window.
    pub fn next_transition(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.windows
            .values()
            .flatten()
            .filter_map(|w| w.next_transition(now))
            .min()
    }

    pub fn rejected(&self) -> &[PolicyError] {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty() && self.ignored.is_empty()
    }
}

fn entries(key: &'static str, value: Option<&Value>, rejected: &mut Vec<PolicyError>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.clone(),
        Some(single @ Value::Object(_)) => vec![single.clone()],
        Some(other) => {
            let e = PolicyError::Malformed {
                key,
                message: format!("expected a list, got {other}"),
            };
            tracing::warn!(target: "folio::policy", error = %e, "declaration dropped");
            rejected.push(e);
            Vec::new()
        }
    }
}

fn target<F: Fn(&str) -> bool>(decl: &Value, exists: &F) -> Result<String, PolicyError> {
    let file = match decl {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("file") {
            Some(Value::String(s)) => s.clone(),
            _ => {
                return Err(PolicyError::Malformed {
                    key: "file",
                    message: format!("missing 'file' in {decl}"),
                })
            }
        },
        other => {
            return Err(PolicyError::Malformed {
                key: "file",
                message: format!("unexpected entry {other}"),
            })
        }
    };
    if file.is_empty() || file == "." || file == ".." || file.contains(['/', '\\']) {
        return Err(PolicyError::OutsideDirectory { file });
    }
    if !exists(&file) {
        return Err(PolicyError::UnknownTarget { file });
    }
    Ok(file)
}

fn parse_window(decl: &Value) -> Result<(TimeBound, TimeBound), PolicyError> {
    let bound = |key: &str, default: TimeBound| match decl.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(s)) => TimeBound::parse(s),
        Some(other) => TimeBound::parse(&other.to_string()),
    };
    Ok((
        bound("start", TimeBound::BigBang)?,
        bound("end", TimeBound::Ragnarok)?,
    ))
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !matches!(s.as_str(), "" | "false" | "no" | "0"),
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;
    use serde_json::json;

    fn t(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[rstest]
    #[case(TimeBound::BigBang, TimeBound::Ragnarok, true)]
    #[case(TimeBound::Ragnarok, TimeBound::Ragnarok, false)]
    #[case(TimeBound::Ragnarok, TimeBound::At(t("2030-01-01T00:00:00Z")), false)]
    #[case(TimeBound::BigBang, TimeBound::BigBang, false)]
    #[case(TimeBound::At(t("2020-01-01T00:00:00Z")), TimeBound::BigBang, false)]
    #[case(TimeBound::At(t("2020-01-01T00:00:00Z")), TimeBound::At(t("2021-01-01T00:00:00Z")), true)]
    #[case(TimeBound::At(t("2021-01-01T00:00:00Z")), TimeBound::At(t("2020-01-01T00:00:00Z")), false)]
    #[case(TimeBound::At(t("2021-01-01T00:00:00Z")), TimeBound::At(t("2021-01-01T00:00:00Z")), false)]
    fn window_validity(#[case] start: TimeBound, #[case] end: TimeBound, #[case] valid: bool) {
        assert_eq!(AvailabilityWindow::new(start, end).is_ok(), valid);
    }

    #[test]
    fn open_window_is_always_available() {
        for now in [t("1970-01-01T00:00:00Z"), Utc::now(), t("2999-12-31T23:59:59Z")] {
            assert_eq!(
                check_availability(TimeBound::BigBang, TimeBound::Ragnarok, now),
                Ok(true)
            );
        }
    }

    #[test]
    fn availability_is_inclusive() {
        let start = t("2024-05-01T09:00:00Z");
        let end = t("2024-05-02T09:00:00Z");
        let w = AvailabilityWindow::new(TimeBound::At(start), TimeBound::At(end)).unwrap();
        assert!(!w.is_available(start - Duration::seconds(1)));
        assert!(w.is_available(start));
        assert!(w.is_available(end));
        assert!(!w.is_available(end + Duration::seconds(1)));
    }

    #[test]
    fn next_transition_skips_past_and_sentinels() {
        let start = t("2024-05-01T09:00:00Z");
        let end = t("2024-05-02T09:00:00Z");
        let w = AvailabilityWindow::new(TimeBound::At(start), TimeBound::At(end)).unwrap();
        assert_eq!(w.next_transition(start - Duration::hours(1)), Some(start));
        assert_eq!(w.next_transition(start), Some(end));
        assert_eq!(w.next_transition(end), None);
        assert_eq!(AvailabilityWindow::ALWAYS.next_transition(start), None);
    }

    #[rstest]
    #[case("big-bang", TimeBound::BigBang)]
    #[case("ragnarok", TimeBound::Ragnarok)]
    #[case("2024-05-01T09:00:00Z", TimeBound::At(t("2024-05-01T09:00:00Z")))]
    fn parse_bounds(#[case] raw: &str, #[case] expected: TimeBound) {
        assert_eq!(TimeBound::parse(raw).unwrap(), expected);
    }

    #[test]
    fn parse_local_formats_and_rejects_garbage() {
        assert!(TimeBound::parse("2024-05-01 09:00").is_ok());
        assert!(TimeBound::parse("2024-05-01 09:00:30").is_ok());
        assert!(TimeBound::parse("2024-05-01").is_ok());
        assert!(matches!(
            TimeBound::parse("next tuesday"),
            Err(PolicyError::InvalidTimestamp { .. })
        ));
    }

    fn exists(name: &str) -> bool {
        matches!(name, "exam.md" | "scratch" | "notes.md")
    }

    #[test]
    fn declarations_build_verdicts() {
        let now = t("2024-06-01T00:00:00Z");
        let availability = json!([
            {"file": "exam.md", "start": "2024-07-01T00:00:00Z"},
            {"file": "notes.md", "start": "2024-01-01T00:00:00Z", "end": "ragnarok"},
        ]);
        let ignore = json!([{"file": "scratch", "ignore": true}]);
        let policy = DirectoryPolicy::from_declarations(Some(&availability), Some(&ignore), exists);

        assert_eq!(policy.verdict("exam.md", now), Verdict::Unavailable);
        assert_eq!(policy.verdict("notes.md", now), Verdict::Produce);
        assert_eq!(policy.verdict("scratch", now), Verdict::Ignored);
        assert_eq!(policy.verdict("other.md", now), Verdict::Produce);
        assert_eq!(policy.next_transition(now), Some(t("2024-07-01T00:00:00Z")));
        assert!(policy.rejected().is_empty());
    }

    #[test]
    fn outside_and_unknown_targets_are_dropped() {
        let now = Utc::now();
        let ignore = json!([
            {"file": "../exam.md"},
            {"file": "sub/notes.md"},
            {"file": "ghost.md"},
        ]);
        let policy = DirectoryPolicy::from_declarations(None, Some(&ignore), exists);
        assert_eq!(policy.rejected().len(), 3);
        assert!(matches!(policy.rejected()[0], PolicyError::OutsideDirectory { .. }));
        assert!(matches!(policy.rejected()[2], PolicyError::UnknownTarget { .. }));
        assert_eq!(policy.verdict("exam.md", now), Verdict::Produce);
        assert!(policy.is_empty());
    }

    #[test]
    fn ill_formed_window_is_unavailable() {
        let availability = json!([{"file": "exam.md", "start": "ragnarok"}]);
        let policy = DirectoryPolicy::from_declarations(Some(&availability), None, exists);
        assert_eq!(policy.verdict("exam.md", Utc::now()), Verdict::Unavailable);
        assert_eq!(policy.rejected().len(), 1);
        assert_eq!(policy.next_transition(Utc::now()), None);
    }

    #[test]
    fn ignore_false_and_bare_names() {
        let ignore = json!(["scratch", {"file": "notes.md", "ignore": false}]);
        let policy = DirectoryPolicy::from_declarations(None, Some(&ignore), exists);
        let now = Utc::now();
        assert_eq!(policy.verdict("scratch", now), Verdict::Ignored);
        assert_eq!(policy.verdict("notes.md", now), Verdict::Produce);
    }

    #[test]
    fn non_list_declaration_is_malformed() {
        let policy = DirectoryPolicy::from_declarations(Some(&json!(42)), None, exists);
        assert!(matches!(policy.rejected()[0], PolicyError::Malformed { .. }));
    }
}
