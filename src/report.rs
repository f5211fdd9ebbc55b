//! Side-by-side timing comparison of two pipeline runs.

use std::fmt;

use crate::bench::StageTiming;

/// How one stage of the local run compares to the reference run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    /// Both runs timed the stage and the reference duration is non-zero.
    Improvement {
        /// `reference - local`, in milliseconds.
        difference_ms: f64,
        /// `(reference - local) / reference * 100`.
        percent: f64,
    },
    /// Both runs timed the stage but the reference took no measurable time,
    /// so the percentage has no value. Rendered as `n/a`.
    Undefined { difference_ms: f64 },
    /// Only one of the runs has this stage.
    NotApplicable,
}

impl Comparison {
    /// Compares two durations, guarding the percentage against a zero reference.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sobel_bench::Comparison;
    ///
    /// assert_eq!(
    ///     Comparison::between(20.0, 15.0),
    ///     Comparison::Improvement { difference_ms: 5.0, percent: 25.0 }
    /// );
    /// assert_eq!(
    ///     Comparison::between(0.0, 3.0),
    ///     Comparison::Undefined { difference_ms: -3.0 }
    /// );
    /// ```
    pub fn between(reference_ms: f64, local_ms: f64) -> Self {
        let difference_ms = reference_ms - local_ms;
        if reference_ms > 0.0 && reference_ms.is_finite() {
            Comparison::Improvement {
                difference_ms,
                percent: difference_ms / reference_ms * 100.0,
            }
        } else {
            Comparison::Undefined { difference_ms }
        }
    }

    pub fn difference_ms(&self) -> Option<f64> {
        match *self {
            Comparison::Improvement { difference_ms, .. }
            | Comparison::Undefined { difference_ms } => Some(difference_ms),
            Comparison::NotApplicable => None,
        }
    }

    /// The percentage improvement, `None` when undefined or not applicable.
    pub fn percent(&self) -> Option<f64> {
        match *self {
            Comparison::Improvement { percent, .. } => Some(percent),
            _ => None,
        }
    }
}

/// One table row: a stage and its duration in each run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportRow {
    pub stage_name: String,
    pub reference: Option<StageTiming>,
    pub local: Option<StageTiming>,
    pub comparison: Comparison,
}

/// Timing comparison between a reference and a local pipeline run.
///
/// Rows follow the reference run's stage order, followed by stages only the
/// local run recorded. The report is immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BenchmarkReport {
    reference_label: String,
    local_label: String,
    rows: Vec<ReportRow>,
}

impl BenchmarkReport {
    /// Builds a report from the stage timings of two runs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sobel_bench::{BenchmarkReport, StageTiming};
    ///
    /// let reference = vec![
    ///     StageTiming::new("decode", 4.0),
    ///     StageTiming::new("edge_detect", 8.0),
    /// ];
    /// let local = vec![
    ///     StageTiming::new("grayscale", 1.0),
    ///     StageTiming::new("edge_detect", 10.0),
    /// ];
    /// let report = BenchmarkReport::compare(&reference, &local);
    ///
    /// let edge = report.row("edge_detect").unwrap();
    /// assert_eq!(edge.comparison.percent(), Some(-25.0));
    /// assert_eq!(report.row("decode").unwrap().comparison.percent(), None);
    /// println!("{report}");
    /// ```
    pub fn compare(reference: &[StageTiming], local: &[StageTiming]) -> Self {
        let mut rows: Vec<ReportRow> = reference
            .iter()
            .map(|timing| {
                let matching = local.iter().find(|t| t.stage_name == timing.stage_name);
                let comparison = match matching {
                    Some(other) => Comparison::between(timing.duration_ms, other.duration_ms),
                    None => Comparison::NotApplicable,
                };
                ReportRow {
                    stage_name: timing.stage_name.clone(),
                    reference: Some(timing.clone()),
                    local: matching.cloned(),
                    comparison,
                }
            })
            .collect();

        rows.extend(
            local
                .iter()
                .filter(|timing| !reference.iter().any(|t| t.stage_name == timing.stage_name))
                .map(|timing| ReportRow {
                    stage_name: timing.stage_name.clone(),
                    reference: None,
                    local: Some(timing.clone()),
                    comparison: Comparison::NotApplicable,
                }),
        );

        Self {
            reference_label: "reference".to_string(),
            local_label: "local".to_string(),
            rows,
        }
    }

    /// Replaces the column headings used when the report is displayed.
    pub fn with_labels(mut self, reference: impl Into<String>, local: impl Into<String>) -> Self {
        self.reference_label = reference.into();
        self.local_label = local.into();
        self
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// The row for `stage_name`, if either run recorded that stage.
    pub fn row(&self, stage_name: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|row| row.stage_name == stage_name)
    }

    pub fn reference_label(&self) -> &str {
        &self.reference_label
    }

    pub fn local_label(&self) -> &str {
        &self.local_label
    }
}

fn fmt_ms(timing: &Option<StageTiming>) -> String {
    match timing {
        Some(t) => format!("{:.2}", t.duration_ms),
        None => "-".to_string(),
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reference = format!("{} (ms)", self.reference_label);
        let local = format!("{} (ms)", self.local_label);
        writeln!(
            f,
            "{:<12} {:>16} {:>16} {:>12} {:>12}",
            "stage", reference, local, "difference", "improvement"
        )?;
        for row in &self.rows {
            let (difference, improvement) = match row.comparison {
                Comparison::Improvement {
                    difference_ms,
                    percent,
                } => (format!("{difference_ms:.2}"), format!("{percent:.0}%")),
                Comparison::Undefined { difference_ms } => {
                    (format!("{difference_ms:.2}"), "n/a".to_string())
                }
                Comparison::NotApplicable => ("-".to_string(), "-".to_string()),
            };
            writeln!(
                f,
                "{:<12} {:>16} {:>16} {:>12} {:>12}",
                row.stage_name,
                fmt_ms(&row.reference),
                fmt_ms(&row.local),
                difference,
                improvement
            )?;
        }
        Ok(())
    }
}
