//! Promotion Activity Window

use jiff::Timestamp;

/// Optional start and end instants bounding when a promotion may apply.
///
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityWindow {
    /// First instant the promotion applies, if bounded
    pub starts_at: Option<Timestamp>,

    /// Last instant the promotion applies, if bounded
    pub ends_at: Option<Timestamp>,
}

impl ActivityWindow {
    /// A window with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            starts_at: None,
            ends_at: None,
        }
    }

    /// A window bounded on both sides.
    #[must_use]
    pub const fn between(starts_at: Timestamp, ends_at: Timestamp) -> Self {
        Self {
            starts_at: Some(starts_at),
            ends_at: Some(ends_at),
        }
    }

    /// A window that opens at `starts_at` and never closes.
    #[must_use]
    pub const fn starting(starts_at: Timestamp) -> Self {
        Self {
            starts_at: Some(starts_at),
            ends_at: None,
        }
    }

    /// A window that is open until `ends_at`.
    #[must_use]
    pub const fn ending(ends_at: Timestamp) -> Self {
        Self {
            starts_at: None,
            ends_at: Some(ends_at),
        }
    }

    /// Whether `at` falls inside the window.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.starts_at.is_none_or(|starts_at| starts_at <= at)
            && self.ends_at.is_none_or(|ends_at| ends_at >= at)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn unbounded_contains_any_instant() -> TestResult {
        let at: Timestamp = "2026-10-19T12:00:00Z".parse()?;

        assert!(ActivityWindow::unbounded().contains(at));

        Ok(())
    }

    #[test]
    fn bounds_are_inclusive() -> TestResult {
        let start: Timestamp = "2026-10-01T00:00:00Z".parse()?;
        let end: Timestamp = "2026-10-31T23:59:59Z".parse()?;
        let window = ActivityWindow::between(start, end);

        assert!(window.contains(start));
        assert!(window.contains(end));

        Ok(())
    }

    #[test]
    fn excludes_instants_outside_bounds() -> TestResult {
        let start: Timestamp = "2026-10-01T00:00:00Z".parse()?;
        let end: Timestamp = "2026-10-31T23:59:59Z".parse()?;

        assert!(!ActivityWindow::starting(start).contains("2026-09-30T23:59:59Z".parse()?));
        assert!(!ActivityWindow::ending(end).contains("2026-11-01T00:00:00Z".parse()?));

        Ok(())
    }
}
