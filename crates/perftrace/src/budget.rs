//! Paint latency budgets and violation tracking

use serde::{Deserialize, Serialize};

/// Acceptable cold-start paint latencies.
///
/// When a finished trace exceeds its budget, a [`BudgetViolation`] is
/// generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintBudget {
    /// Maximum time from process start to first contentful paint.
    pub max_first_contentful_paint_ms: f64,

    /// Maximum time from process start to the page being fully painted.
    pub max_full_paint_ms: f64,

    /// Maximum time from process start to the main page being created.
    pub max_page_ready_ms: f64,
}

impl PaintBudget {
    /// Create a budget with custom thresholds.
    pub fn new(max_first_contentful_paint_ms: f64, max_full_paint_ms: f64, max_page_ready_ms: f64) -> Self {
        Self {
            max_first_contentful_paint_ms,
            max_full_paint_ms,
            max_page_ready_ms,
        }
    }

    /// A relaxed budget for low-end devices and debug builds.
    pub fn relaxed() -> Self {
        Self {
            max_first_contentful_paint_ms: 3000.0,
            max_full_paint_ms: 5000.0,
            max_page_ready_ms: 2000.0,
        }
    }

    /// A strict budget for performance testing.
    pub fn strict() -> Self {
        Self {
            max_first_contentful_paint_ms: 800.0,
            max_full_paint_ms: 1500.0,
            max_page_ready_ms: 500.0,
        }
    }

    /// Builder method to set the first contentful paint budget.
    pub fn with_first_contentful_paint(mut self, ms: f64) -> Self {
        self.max_first_contentful_paint_ms = ms;
        self
    }

    /// Builder method to set the full paint budget.
    pub fn with_full_paint(mut self, ms: f64) -> Self {
        self.max_full_paint_ms = ms;
        self
    }

    /// Builder method to set the page ready budget.
    pub fn with_page_ready(mut self, ms: f64) -> Self {
        self.max_page_ready_ms = ms;
        self
    }

    /// Compare a measurement against a threshold.
    ///
    /// Returns a violation if `actual_ms` exceeds `budget_ms`.
    pub fn check(category: &str, actual_ms: f64, budget_ms: f64) -> Option<BudgetViolation> {
        (actual_ms > budget_ms).then(|| {
            BudgetViolation::new(category, actual_ms, budget_ms, violation_severity(actual_ms, budget_ms))
        })
    }
}

impl Default for PaintBudget {
    /// Default budget targets a sub-second first paint.
    fn default() -> Self {
        Self {
            max_first_contentful_paint_ms: 1000.0,
            max_full_paint_ms: 2500.0,
            max_page_ready_ms: 700.0,
        }
    }
}

/// Calculate violation severity based on how much the actual exceeds budget.
fn violation_severity(actual: f64, budget: f64) -> ViolationSeverity {
    let ratio = actual / budget;
    if ratio > 3.0 {
        ViolationSeverity::Critical
    } else if ratio > 2.0 {
        ViolationSeverity::High
    } else if ratio > 1.5 {
        ViolationSeverity::Medium
    } else {
        ViolationSeverity::Low
    }
}

/// Severity level of a budget violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Minor violation (1-1.5x budget)
    Low,
    /// Moderate violation (1.5-2x budget)
    Medium,
    /// Significant violation (2-3x budget)
    High,
    /// Severe violation (>3x budget)
    Critical,
}

/// A budget violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetViolation {
    /// What was measured (usually the trace name)
    pub category: String,
    /// Actual measured time in milliseconds
    pub actual_ms: f64,
    /// Budget threshold in milliseconds
    pub budget_ms: f64,
    /// Severity of the violation
    pub severity: ViolationSeverity,
}

impl BudgetViolation {
    /// Create a new budget violation.
    pub fn new(
        category: impl Into<String>,
        actual_ms: f64,
        budget_ms: f64,
        severity: ViolationSeverity,
    ) -> Self {
        Self {
            category: category.into(),
            actual_ms,
            budget_ms,
            severity,
        }
    }

    /// How much the actual time exceeds the budget.
    pub fn excess_ms(&self) -> f64 {
        self.actual_ms - self.budget_ms
    }

    /// Ratio of actual to budget (e.g., 2.0 means 2x over budget).
    pub fn ratio(&self) -> f64 {
        self.actual_ms / self.budget_ms
    }

    /// Check if this is a critical violation.
    pub fn is_critical(&self) -> bool {
        matches!(self.severity, ViolationSeverity::Critical)
    }
}

impl std::fmt::Display for BudgetViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:.0}ms (budget: {:.0}ms, {:.1}x over)",
            self.category,
            self.actual_ms,
            self.budget_ms,
            self.ratio()
        )
    }
}

/// Violations collected over one cold start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    /// All violations in this report
    pub violations: Vec<BudgetViolation>,
    /// Number of critical violations
    pub critical_count: usize,
    /// Number of high severity violations
    pub high_count: usize,
}

impl BudgetReport {
    /// Create a report from violations.
    pub fn from_violations(violations: Vec<BudgetViolation>) -> Self {
        let count = |severity: ViolationSeverity| violations.iter().filter(|v| v.severity == severity).count();
        let critical_count = count(ViolationSeverity::Critical);
        let high_count = count(ViolationSeverity::High);

        Self {
            violations,
            critical_count,
            high_count,
        }
    }

    /// Check if there are any violations.
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Check if the report passes (no high or critical violations).
    pub fn passes(&self) -> bool {
        self.critical_count == 0 && self.high_count == 0
    }
}

impl std::fmt::Display for BudgetReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "No budget violations");
        }
        writeln!(f, "Budget Report: {} violations", self.violations.len())?;
        for v in &self.violations {
            writeln!(f, "  - {}", v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_defaults() {
        let budget = PaintBudget::default();
        assert_eq!(budget.max_first_contentful_paint_ms, 1000.0);
        assert_eq!(budget.max_full_paint_ms, 2500.0);

        assert_eq!(PaintBudget::new(3000.0, 5000.0, 2000.0), PaintBudget::relaxed());
    }

    #[test]
    fn test_budget_builder() {
        let budget = PaintBudget::strict().with_full_paint(1200.0).with_page_ready(300.0);

        assert_eq!(budget.max_first_contentful_paint_ms, 800.0);
        assert_eq!(budget.max_full_paint_ms, 1200.0);
        assert_eq!(budget.max_page_ready_ms, 300.0);
    }

    #[test]
    fn test_check_within_budget() {
        assert!(PaintBudget::check("FCP", 900.0, 1000.0).is_none());
        assert!(PaintBudget::check("FCP", 1000.0, 1000.0).is_none());
    }

    #[test]
    fn test_check_violation() {
        let violation = PaintBudget::check("FPT", 7600.0, 2500.0).unwrap();
        assert_eq!(violation.category, "FPT");
        assert!(violation.is_critical());
        assert_eq!(violation.excess_ms(), 5100.0);
    }

    #[test]
    fn test_violation_severity() {
        assert_eq!(violation_severity(55.0, 50.0), ViolationSeverity::Low);
        assert_eq!(violation_severity(80.0, 50.0), ViolationSeverity::Medium);
        assert_eq!(violation_severity(110.0, 50.0), ViolationSeverity::High);
        assert_eq!(violation_severity(200.0, 50.0), ViolationSeverity::Critical);
    }

    #[test]
    fn test_violation_display() {
        let violation = BudgetViolation::new("FCP", 2000.0, 1000.0, ViolationSeverity::Medium);
        assert_eq!(violation.to_string(), "FCP: 2000ms (budget: 1000ms, 2.0x over)");
    }

    #[test]
    fn test_budget_report() {
        let report = BudgetReport::from_violations(vec![
            BudgetViolation::new("FCP", 2100.0, 1000.0, ViolationSeverity::High),
            BudgetViolation::new("FPT", 2600.0, 2500.0, ViolationSeverity::Low),
        ]);

        assert!(report.has_violations());
        assert_eq!(report.high_count, 1);
        assert!(!report.passes());
        assert!(report.to_string().contains("2 violations"));
    }

    #[test]
    fn test_empty_report_passes() {
        let report = BudgetReport::from_violations(Vec::new());
        assert!(report.passes());
        assert_eq!(report.to_string(), "No budget violations");
    }
}
