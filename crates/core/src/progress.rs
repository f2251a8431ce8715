//! Competition-lift progress: per-day best efforts and the dated history they
//! merge into.

use serde::{Deserialize, Serialize};

use crate::one_rep_max::{estimate_one_rep_max, valid_effort};
use crate::training::Exercise;
use crate::types::{CalendarDate, DbId};

// ---------------------------------------------------------------------------
// Competition lifts
// ---------------------------------------------------------------------------

pub const COMP_SQUAT: &str = "Comp SQ";
pub const COMP_BENCH: &str = "Comp BP";
pub const COMP_DEADLIFT: &str = "Comp DL";

/// Exercise names tracked in progress history. Matched exactly.
pub const COMPETITION_LIFTS: [&str; 3] = [COMP_SQUAT, COMP_BENCH, COMP_DEADLIFT];

pub fn is_competition_lift(name: &str) -> bool {
    COMPETITION_LIFTS.contains(&name)
}

// ---------------------------------------------------------------------------
// Per-day summaries
// ---------------------------------------------------------------------------

/// Best effort for one competition lift within one submitted day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftSummary {
    pub exercise_name: String,
    #[serde(rename = "bestE1rm")]
    pub best_e1rm: f64,
    pub actual_max: f64,
}

impl LiftSummary {
    /// Only summaries carrying a positive value are written to history.
    pub fn is_trackable(&self) -> bool {
        self.best_e1rm > 0.0 || self.actual_max > 0.0
    }
}

/// Summarize one exercise, or `None` if it is not a competition lift or has
/// no set with positive weight and reps.
pub fn summarize_exercise(exercise: &Exercise) -> Option<LiftSummary> {
    if !is_competition_lift(&exercise.name) {
        return None;
    }

    let mut best_e1rm = 0.0_f64;
    let mut actual_max = 0.0_f64;
    let mut seen_valid = false;

    for set in &exercise.sets {
        let Some((weight, reps)) = valid_effort(set.weight, set.reps) else {
            continue;
        };
        seen_valid = true;
        actual_max = actual_max.max(weight);
        best_e1rm = best_e1rm.max(estimate_one_rep_max(weight, reps, set.rpe));
    }

    seen_valid.then(|| LiftSummary {
        exercise_name: exercise.name.clone(),
        best_e1rm,
        actual_max,
    })
}

/// Summarize a day's exercises: one entry per competition lift present.
///
/// Repeated exercises with the same name collapse into a single summary
/// holding the max of each value, in first-seen order.
pub fn summarize_day(exercises: &[Exercise]) -> Vec<LiftSummary> {
    let mut summaries: Vec<LiftSummary> = Vec::new();
    for summary in exercises.iter().filter_map(summarize_exercise) {
        match summaries
            .iter_mut()
            .find(|s| s.exercise_name == summary.exercise_name)
        {
            Some(existing) => {
                existing.best_e1rm = existing.best_e1rm.max(summary.best_e1rm);
                existing.actual_max = existing.actual_max.max(summary.actual_max);
            }
            None => summaries.push(summary),
        }
    }
    summaries.retain(LiftSummary::is_trackable);
    summaries
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: CalendarDate,
    pub estimated_max: f64,
    pub actual_max: f64,
}

/// Dated best-effort history for one (user, exercise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub user_id: DbId,
    pub exercise_name: String,
    pub history: Vec<ProgressEntry>,
}

/// What [`ProgressRecord::merge`] did to the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Raised,
    Unchanged,
}

impl ProgressRecord {
    pub fn new(user_id: DbId, exercise_name: impl Into<String>) -> Self {
        Self {
            user_id,
            exercise_name: exercise_name.into(),
            history: Vec::new(),
        }
    }

    pub fn entry_for(&self, date: CalendarDate) -> Option<&ProgressEntry> {
        self.history.iter().find(|e| e.date == date)
    }

    /// Same-day upsert: raise an existing entry for `date` to the max of old
    /// and new values, or insert a new entry keeping history date-ordered.
    /// Values are never lowered.
    pub fn merge(&mut self, date: CalendarDate, summary: &LiftSummary) -> MergeOutcome {
        if let Some(entry) = self.history.iter_mut().find(|e| e.date == date) {
            let mut raised = false;
            if summary.best_e1rm > entry.estimated_max {
                entry.estimated_max = summary.best_e1rm;
                raised = true;
            }
            if summary.actual_max > entry.actual_max {
                entry.actual_max = summary.actual_max;
                raised = true;
            }
            return if raised {
                MergeOutcome::Raised
            } else {
                MergeOutcome::Unchanged
            };
        }

        let position = self.history.partition_point(|e| e.date < date);
        self.history.insert(
            position,
            ProgressEntry {
                date,
                estimated_max: summary.best_e1rm,
                actual_max: summary.actual_max,
            },
        );
        MergeOutcome::Inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::ExerciseSet;

    fn set(weight: Option<f64>, reps: Option<f64>, rpe: Option<f64>) -> ExerciseSet {
        ExerciseSet {
            weight,
            reps,
            rpe,
            ..ExerciseSet::default()
        }
    }

    fn exercise(name: &str, sets: Vec<ExerciseSet>) -> Exercise {
        Exercise {
            name: name.to_string(),
            sets,
            ..Exercise::default()
        }
    }

    fn date(s: &str) -> CalendarDate {
        s.parse().unwrap()
    }

    fn summary(name: &str, best_e1rm: f64, actual_max: f64) -> LiftSummary {
        LiftSummary {
            exercise_name: name.to_string(),
            best_e1rm,
            actual_max,
        }
    }

    #[test]
    fn competition_names_are_exact() {
        assert!(is_competition_lift("Comp SQ"));
        assert!(is_competition_lift("Comp DL"));
        assert!(!is_competition_lift("comp sq"));
        assert!(!is_competition_lift("Competition Squat"));
        assert!(!is_competition_lift("Leg Press"));
    }

    #[test]
    fn summary_of_single_squat_set() {
        let ex = exercise("Comp SQ", vec![set(Some(160.0), Some(5.0), Some(7.0))]);
        let s = summarize_exercise(&ex).expect("squat should summarize");
        assert_eq!(s.best_e1rm, 203.0);
        assert_eq!(s.actual_max, 160.0);
    }

    #[test]
    fn best_e1rm_and_actual_max_may_come_from_different_sets() {
        let ex = exercise(
            "Comp BP",
            vec![
                set(Some(100.0), Some(8.0), Some(8.0)), // 100 * (1 + 10/30) = 133
                set(Some(120.0), Some(1.0), Some(10.0)), // exact single = 120
            ],
        );
        let s = summarize_exercise(&ex).unwrap();
        assert_eq!(s.best_e1rm, 133.0);
        assert_eq!(s.actual_max, 120.0);
    }

    #[test]
    fn invalid_sets_do_not_contribute() {
        let ex = exercise(
            "Comp DL",
            vec![
                set(Some(0.0), Some(5.0), None),
                set(Some(300.0), Some(0.0), None),
                set(Some(-50.0), Some(3.0), None),
                set(None, Some(3.0), None),
                set(Some(200.0), Some(3.0), Some(8.0)), // 200 * (1 + 5/30) = 233
            ],
        );
        let s = summarize_exercise(&ex).unwrap();
        assert_eq!(s.actual_max, 200.0);
        assert_eq!(s.best_e1rm, 233.0);
    }

    #[test]
    fn exercise_without_valid_sets_is_skipped() {
        assert!(summarize_exercise(&exercise("Comp SQ", vec![])).is_none());
        assert!(
            summarize_exercise(&exercise("Comp SQ", vec![set(None, None, None)])).is_none()
        );
    }

    #[test]
    fn non_competition_exercise_is_ignored() {
        let ex = exercise("Leg Press", vec![set(Some(200.0), Some(10.0), Some(8.0))]);
        assert!(summarize_exercise(&ex).is_none());
        assert!(summarize_day(&[ex]).is_empty());
    }

    #[test]
    fn day_summary_collapses_repeated_lifts() {
        let day = vec![
            exercise("Comp SQ", vec![set(Some(150.0), Some(5.0), Some(8.0))]),
            exercise("Leg Press", vec![set(Some(250.0), Some(10.0), None)]),
            exercise("Comp SQ", vec![set(Some(170.0), Some(1.0), Some(9.0))]),
            exercise("Comp BP", vec![set(Some(100.0), Some(5.0), Some(8.0))]),
        ];
        let summaries = summarize_day(&day);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].exercise_name, "Comp SQ");
        // 150 * (1 + 7/30) = 185; 170 * (1 + 2/30) = 181.33 -> 181
        assert_eq!(summaries[0].best_e1rm, 185.0);
        assert_eq!(summaries[0].actual_max, 170.0);
        assert_eq!(summaries[1].exercise_name, "Comp BP");
    }

    #[test]
    fn merge_inserts_new_dates_in_order() {
        let mut record = ProgressRecord::new(1, "Comp SQ");
        assert_eq!(
            record.merge(date("2024-03-10"), &summary("Comp SQ", 200.0, 180.0)),
            MergeOutcome::Inserted
        );
        assert_eq!(
            record.merge(date("2024-03-03"), &summary("Comp SQ", 195.0, 175.0)),
            MergeOutcome::Inserted
        );
        let dates: Vec<_> = record.history.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date("2024-03-03"), date("2024-03-10")]);
    }

    #[test]
    fn same_day_merge_never_lowers() {
        let today = date("2024-03-10");
        let mut record = ProgressRecord::new(1, "Comp SQ");
        record.merge(today, &summary("Comp SQ", 203.0, 160.0));

        assert_eq!(
            record.merge(today, &summary("Comp SQ", 190.0, 150.0)),
            MergeOutcome::Unchanged
        );
        let entry = record.entry_for(today).unwrap();
        assert_eq!(entry.estimated_max, 203.0);
        assert_eq!(entry.actual_max, 160.0);

        assert_eq!(
            record.merge(today, &summary("Comp SQ", 199.0, 170.0)),
            MergeOutcome::Raised
        );
        let entry = record.entry_for(today).unwrap();
        assert_eq!(entry.estimated_max, 203.0);
        assert_eq!(entry.actual_max, 170.0);
        assert_eq!(record.history.len(), 1);
    }
}
