// SPDX-License-Identifier: AGPL-3.0-only

//! Pass/fail accumulator for the operator validation binary.
//!
//! Each check records what was measured, what it was compared against and
//! the tolerance from [`crate::tolerances`]. [`ValidationHarness::finish`]
//! prints the report and exits 0 when everything passed, 1 otherwise.

use std::fmt::{self, Write};
use std::process;

use crate::lattice::complex_f64::Complex64;
use crate::lattice::spinor::max_abs_diff;

/// How a check compares observation and reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckKind {
    /// |observed - expected| < tolerance
    Absolute,
    /// observed < threshold
    UpperBound,
    /// Largest componentwise difference of two vectors < tolerance
    VectorMaxAbs,
    /// Boolean property
    Property,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Absolute => "abs",
            Self::UpperBound => "<",
            Self::VectorMaxAbs => "max|Δ|",
            Self::Property => "bool",
        };
        f.write_str(tag)
    }
}

/// One recorded check.
#[derive(Clone, Debug)]
pub struct Check {
    /// What was checked.
    pub label: String,
    /// Outcome.
    pub passed: bool,
    /// Measured value (the deviation for vector checks).
    pub observed: f64,
    /// Reference value or threshold.
    pub expected: f64,
    /// Allowed deviation.
    pub tolerance: f64,
    /// Comparison used.
    pub kind: CheckKind,
}

/// Collects checks and turns them into a report and exit code.
#[derive(Debug, Default)]
#[must_use]
pub struct ValidationHarness {
    name: String,
    checks: Vec<Check>,
}

impl ValidationHarness {
    /// Empty harness for a named run.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            checks: Vec::new(),
        }
    }

    fn record(&mut self, label: &str, passed: bool, observed: f64, expected: f64, tolerance: f64, kind: CheckKind) {
        self.checks.push(Check {
            label: label.to_string(),
            passed,
            observed,
            expected,
            tolerance,
            kind,
        });
    }

    /// |observed - expected| < tolerance
    pub fn check_abs(&mut self, label: &str, observed: f64, expected: f64, tolerance: f64) {
        let passed = (observed - expected).abs() < tolerance;
        self.record(label, passed, observed, expected, tolerance, CheckKind::Absolute);
    }

    /// |observed - expected| < tolerance for complex numbers.
    pub fn check_complex(&mut self, label: &str, observed: Complex64, expected: Complex64, tolerance: f64) {
        let dev = (observed - expected).abs();
        self.record(label, dev < tolerance, dev, 0.0, tolerance, CheckKind::Absolute);
    }

    /// observed < threshold
    pub fn check_upper(&mut self, label: &str, observed: f64, threshold: f64) {
        self.record(label, observed < threshold, observed, threshold, threshold, CheckKind::UpperBound);
    }

    /// Two vectors agree componentwise within `tolerance`.
    ///
    /// Vectors of different length always fail.
    pub fn check_vectors(&mut self, label: &str, observed: &[Complex64], expected: &[Complex64], tolerance: f64) {
        let dev = max_abs_diff(observed, expected);
        self.record(label, dev < tolerance, dev, 0.0, tolerance, CheckKind::VectorMaxAbs);
    }

    /// Boolean property.
    pub fn check_bool(&mut self, label: &str, passed: bool) {
        self.record(label, passed, f64::from(u8::from(passed)), 1.0, 0.0, CheckKind::Property);
    }

    /// Recorded checks.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Number of passing checks.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Number of checks.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.checks.len()
    }

    /// True when no check failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Human-readable report.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "═══ {}: {}/{} checks passed ═══",
            self.name,
            self.passed_count(),
            self.total_count()
        );
        for c in &self.checks {
            let icon = if c.passed { "✓" } else { "✗" };
            let _ = writeln!(
                s,
                "  {icon} {}: observed={:.6e}, expected={:.6e}, tol={:.2e} ({})",
                c.label, c.observed, c.expected, c.tolerance, c.kind
            );
        }
        if !self.all_passed() {
            let failed: Vec<&str> = self
                .checks
                .iter()
                .filter(|c| !c.passed)
                .map(|c| c.label.as_str())
                .collect();
            let _ = writeln!(s, "FAILED CHECKS: {}", failed.join(", "));
        }
        s
    }

    /// Print the report and exit 0 (all passed) or 1.
    pub fn finish(&self) -> ! {
        println!();
        print!("{}", self.summary());
        if self.all_passed() {
            println!("ALL CHECKS PASSED");
            process::exit(0);
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pass_and_fail() {
        let mut h = ValidationHarness::new("t");
        h.check_abs("exact", 1.0, 1.0, 1e-12);
        h.check_abs("far", 2.0, 1.0, 1e-3);
        h.check_upper("small", 1e-14, 1e-12);
        assert_eq!(h.passed_count(), 2);
        assert_eq!(h.total_count(), 3);
        assert!(!h.all_passed());
    }

    #[test]
    fn upper_bound_is_strict() {
        let mut h = ValidationHarness::new("t");
        h.check_upper("at", 1.0, 1.0);
        assert!(!h.checks()[0].passed);
    }

    #[test]
    fn vector_check_measures_worst_component() {
        let mut h = ValidationHarness::new("t");
        let a = vec![Complex64::ONE, Complex64::I];
        let b = vec![Complex64::ONE, Complex64::new(0.0, 1.5)];
        h.check_vectors("close", &a, &a, 1e-15);
        h.check_vectors("off", &a, &b, 0.1);
        h.check_vectors("short", &a, &b[..1], 1.0);
        assert!(h.checks()[0].passed);
        assert!((h.checks()[1].observed - 0.5).abs() < 1e-15);
        assert!(!h.checks()[1].passed);
        assert!(!h.checks()[2].passed);
    }

    #[test]
    fn complex_check_uses_modulus() {
        let mut h = ValidationHarness::new("t");
        h.check_complex("z", Complex64::new(3.0, 4.0), Complex64::ZERO, 5.1);
        assert!(h.all_passed());
        assert!((h.checks()[0].observed - 5.0).abs() < 1e-15);
    }

    #[test]
    fn summary_lists_failures() {
        let mut h = ValidationHarness::new("wilson");
        h.check_bool("involution", true);
        h.check_bool("linearity", false);
        let s = h.summary();
        assert!(s.contains("wilson: 1/2"));
        assert!(s.contains("FAILED CHECKS: linearity"));
        assert!(s.contains("(bool)"));
    }

    #[test]
    fn empty_harness_passes_vacuously() {
        let h = ValidationHarness::new("empty");
        assert!(h.all_passed());
        assert_eq!(h.total_count(), 0);
    }
}
