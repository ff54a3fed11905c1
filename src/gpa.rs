//! Average GPA of an instructor in a course, from per-section grade records.
//!
//! The statistic is the plain mean of each record's own average, not a
//! student-weighted pooled average. A small section weighs as much as a
//! large one.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::planetterp::{GradeBucket, GradeEntry, GradeRecord};

/// Display text for "no grade history": First Time Teaching.
pub const FTC: &str = "FTC";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GpaStatistic {
    Value(f64),
    FirstTimeTeaching,
}

impl GpaStatistic {
    pub fn value(&self) -> Option<f64> {
        match self {
            GpaStatistic::Value(v) => Some(*v),
            GpaStatistic::FirstTimeTeaching => None,
        }
    }
}

impl fmt::Display for GpaStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpaStatistic::Value(v) => write!(f, "{:.2}", v),
            GpaStatistic::FirstTimeTeaching => f.write_str(FTC),
        }
    }
}

impl Serialize for GpaStatistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Average grade points of one record, 0 when the record has no students.
pub fn record_average(record: &GradeRecord) -> f64 {
    let students = record.total_students();
    if students == 0 {
        return 0.0;
    }
    let points: f64 = GradeBucket::ALL
        .iter()
        .map(|b| record.count(*b) as f64 * b.grade_points())
        .sum();
    points / students as f64
}

fn entry_average(entry: &GradeEntry) -> f64 {
    match entry {
        GradeEntry::Record(record) => record_average(record),
        GradeEntry::Malformed(_) => 0.0,
    }
}

/// Mean of the per-record averages, or FTC when there are no records.
pub fn compute_gpa(entries: &[GradeEntry]) -> GpaStatistic {
    if entries.is_empty() {
        return GpaStatistic::FirstTimeTeaching;
    }
    let total: f64 = entries.iter().map(entry_average).sum();
    let mean = total / entries.len() as f64;
    if mean.is_finite() {
        GpaStatistic::Value(mean)
    } else {
        GpaStatistic::FirstTimeTeaching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GradeRecord {
        GradeRecord::new("CMSC131", "Jane Doe", "202008", "0101")
    }

    fn entry(r: GradeRecord) -> GradeEntry {
        GradeEntry::Record(r)
    }

    #[test]
    fn test_no_records_is_ftc() {
        assert_eq!(compute_gpa(&[]), GpaStatistic::FirstTimeTeaching);
        assert_eq!(compute_gpa(&[]).to_string(), "FTC");
    }

    #[test]
    fn test_all_zero_record_is_zero_not_nan() {
        let stat = compute_gpa(&[entry(record())]);
        assert_eq!(stat.to_string(), "0.00");
    }

    #[test]
    fn test_mean_of_record_averages() {
        let b = record().with_count(GradeBucket::B, 10);
        let a = record().with_count(GradeBucket::A, 1);
        assert_eq!(compute_gpa(&[entry(b), entry(a)]).to_string(), "3.50");
    }

    #[test]
    fn test_unweighted_across_sections() {
        // Pooled would be (100*4 + 1*0) / 101 = 3.96; per-record mean is 2.00.
        let big = record().with_count(GradeBucket::APlus, 100);
        let tiny = record().with_count(GradeBucket::F, 1);
        assert_eq!(compute_gpa(&[entry(big), entry(tiny)]).to_string(), "2.00");
    }

    #[test]
    fn test_zero_denominator_record_still_counts() {
        let a = record().with_count(GradeBucket::A, 3);
        assert_eq!(compute_gpa(&[entry(a), entry(record())]).to_string(), "2.00");
    }

    #[test]
    fn test_failing_buckets_count_in_denominator() {
        let r = record()
            .with_count(GradeBucket::A, 1)
            .with_count(GradeBucket::W, 1)
            .with_count(GradeBucket::Other, 1)
            .with_count(GradeBucket::F, 1);
        assert_eq!(record_average(&r), 1.0);
    }

    #[test]
    fn test_bucket_scale() {
        let mut r = record();
        for b in GradeBucket::ALL {
            r.set_count(b, 1);
        }
        let expected = (4.0 + 4.0 + 3.7 + 3.3 + 3.0 + 2.7 + 2.3 + 2.0 + 1.7 + 1.3 + 1.0 + 0.7) / 15.0;
        assert!((record_average(&r) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_entry_contributes_zero() {
        let a = record().with_count(GradeBucket::A, 5);
        let stat = compute_gpa(&[entry(a), GradeEntry::Malformed("bad".to_string())]);
        assert_eq!(stat.to_string(), "2.00");
    }

    #[test]
    fn test_two_decimal_formatting() {
        let r = record()
            .with_count(GradeBucket::A, 2)
            .with_count(GradeBucket::BPlus, 1);
        // (8 + 3.3) / 3 = 3.7666...
        assert_eq!(compute_gpa(&[entry(r)]).to_string(), "3.77");
    }

    #[test]
    fn test_serializes_as_display_string() {
        let json = serde_json::to_string(&GpaStatistic::Value(3.0)).unwrap();
        assert_eq!(json, "\"3.00\"");
        let json = serde_json::to_string(&GpaStatistic::FirstTimeTeaching).unwrap();
        assert_eq!(json, "\"FTC\"");
    }
}
