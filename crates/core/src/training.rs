//! Training block document: weeks -> days -> exercises -> sets.
//!
//! A block is persisted as a single document, so these types are both the
//! wire format (camelCase JSON) and the storage format (JSONB).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::error::CoreError;
use crate::one_rep_max::estimate_from_inputs;

pub const SOURCE_PERSONAL: &str = "personal";
pub const SOURCE_ASSIGNED: &str = "assigned";

/// Name given to the single day of a freshly created block.
pub const DEFAULT_DAY_NAME: &str = "Day 1";

/// Who authored a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockSource {
    /// Written by the athlete; freely editable by them.
    #[default]
    Personal,
    /// Written by a coach (or admin) for the athlete; structurally locked to
    /// the athlete.
    Assigned,
}

impl BlockSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal => SOURCE_PERSONAL,
            Self::Assigned => SOURCE_ASSIGNED,
        }
    }
}

impl fmt::Display for BlockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SOURCE_PERSONAL => Ok(Self::Personal),
            SOURCE_ASSIGNED => Ok(Self::Assigned),
            other => Err(CoreError::Validation(format!(
                "Invalid block source '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub week_number: u32,
    #[serde(default)]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub day_name: String,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub athlete_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub sets: Vec<ExerciseSet>,
}

/// One prescribed / performed set.
///
/// Numeric inputs are lenient: JSON numbers and numeric strings are accepted,
/// anything else reads as absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    #[serde(default)]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "loose_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_reps: Option<String>,
    #[serde(
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0, max = 10.0))]
    pub target_rpe: Option<f64>,
    #[serde(
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
    #[serde(
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub reps: Option<f64>,
    #[serde(
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 0.0, max = 10.0))]
    pub rpe: Option<f64>,
    #[serde(
        rename = "estimated1rm",
        default,
        deserialize_with = "loose_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_1rm: Option<f64>,
    #[serde(default)]
    pub is_completed: bool,
}

impl ExerciseSet {
    /// e1RM of this set, or `None` if weight/reps are not usable.
    pub fn estimate(&self) -> Option<f64> {
        estimate_from_inputs(self.weight, self.reps, self.rpe)
    }
}

/// Body of a day-completion request: the full replacement exercise list.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DaySubmission {
    #[validate(nested)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub athlete_notes: Option<String>,
}

impl DaySubmission {
    /// Reject RPE values outside the 0-10 scale.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(CoreError::from)
    }
}

impl Day {
    /// Replace this day's work with a submission and mark it complete.
    ///
    /// Per-set `estimated1rm` values are recomputed server-side so stored
    /// estimates always agree with the progress aggregation.
    pub fn apply_submission(&mut self, submission: &DaySubmission) {
        let mut exercises = submission.exercises.clone();
        for set in exercises.iter_mut().flat_map(|e| e.sets.iter_mut()) {
            set.estimated_1rm = set.estimate();
        }
        assign_exercise_ids(&mut exercises);

        self.exercises = exercises;
        self.is_completed = true;
        if let Some(notes) = &submission.athlete_notes {
            self.athlete_notes = Some(notes.clone());
        }
    }
}

/// Find a day by id anywhere in a block's weeks.
pub fn find_day_mut<'a>(weeks: &'a mut [Week], day_id: &str) -> Option<&'a mut Day> {
    weeks
        .iter_mut()
        .flat_map(|week| week.days.iter_mut())
        .find(|day| day.id == day_id)
}

/// Skeleton for a new block: one week holding one empty day.
pub fn default_weeks() -> Vec<Week> {
    let mut weeks = vec![Week {
        id: String::new(),
        week_number: 1,
        days: vec![Day {
            day_name: DEFAULT_DAY_NAME.to_string(),
            ..Day::default()
        }],
    }];
    assign_missing_ids(&mut weeks);
    weeks
}

/// Give every week, day, exercise and set without an id a fresh UUID.
///
/// Existing ids are kept, so client references stay stable across saves.
pub fn assign_missing_ids(weeks: &mut [Week]) {
    for week in weeks.iter_mut() {
        fill_id(&mut week.id);
        for day in week.days.iter_mut() {
            fill_id(&mut day.id);
            assign_exercise_ids(&mut day.exercises);
        }
    }
}

fn assign_exercise_ids(exercises: &mut [Exercise]) {
    for exercise in exercises.iter_mut() {
        fill_id(&mut exercise.id);
        for set in exercise.sets.iter_mut() {
            fill_id(&mut set.id);
        }
    }
}

fn fill_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

/// Deserialize a JSON number or numeric string; anything else is `None`.
pub fn loose_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn submission(value: Value) -> DaySubmission {
        serde_json::from_value(value).expect("submission should deserialize")
    }

    #[test]
    fn set_numbers_accept_strings_and_ignore_garbage() {
        let set: ExerciseSet = serde_json::from_value(json!({
            "id": "s1",
            "weight": "160",
            "reps": 5,
            "rpe": "abc",
            "targetReps": 5,
            "isCompleted": true
        }))
        .unwrap();

        assert_eq!(set.weight, Some(160.0));
        assert_eq!(set.reps, Some(5.0));
        assert_eq!(set.rpe, None);
        assert_eq!(set.target_reps.as_deref(), Some("5"));
        assert!(set.is_completed);
    }

    #[test]
    fn set_serializes_camel_case() {
        let set = ExerciseSet {
            id: "s1".into(),
            weight: Some(100.0),
            reps: Some(5.0),
            estimated_1rm: Some(117.0),
            ..ExerciseSet::default()
        };
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["estimated1rm"].as_f64(), Some(117.0));
        assert_eq!(value["isCompleted"], json!(false));
        assert!(value.get("rpe").is_none());
    }

    #[test]
    fn find_day_searches_every_week() {
        let mut weeks = vec![
            Week {
                id: "w1".into(),
                week_number: 1,
                days: vec![Day {
                    id: "d1".into(),
                    ..Day::default()
                }],
            },
            Week {
                id: "w2".into(),
                week_number: 2,
                days: vec![
                    Day {
                        id: "d2".into(),
                        ..Day::default()
                    },
                    Day {
                        id: "d3".into(),
                        day_name: "Deadlift day".into(),
                        ..Day::default()
                    },
                ],
            },
        ];

        let day = find_day_mut(&mut weeks, "d3").expect("d3 exists");
        assert_eq!(day.day_name, "Deadlift day");
        assert!(find_day_mut(&mut weeks, "missing").is_none());
    }

    #[test]
    fn apply_submission_replaces_exercises_and_completes() {
        let mut day = Day {
            id: "d1".into(),
            day_name: "Squat".into(),
            exercises: vec![Exercise {
                id: "old".into(),
                name: "Leg Press".into(),
                ..Exercise::default()
            }],
            ..Day::default()
        };

        let sub = submission(json!({
            "exercises": [
                { "name": "Comp SQ", "sets": [ { "weight": 160, "reps": 5, "rpe": 7 } ] }
            ],
            "athleteNotes": "Felt fast"
        }));
        day.apply_submission(&sub);

        assert!(day.is_completed);
        assert_eq!(day.exercises.len(), 1);
        assert_eq!(day.exercises[0].name, "Comp SQ");
        assert!(!day.exercises[0].id.is_empty());
        assert_eq!(day.exercises[0].sets[0].estimated_1rm, Some(203.0));
        assert_eq!(day.athlete_notes.as_deref(), Some("Felt fast"));
    }

    #[test]
    fn apply_submission_keeps_notes_when_absent() {
        let mut day = Day {
            athlete_notes: Some("earlier".into()),
            ..Day::default()
        };
        day.apply_submission(&submission(json!({ "exercises": [] })));
        assert!(day.is_completed);
        assert_eq!(day.athlete_notes.as_deref(), Some("earlier"));
    }

    #[test]
    fn check_rejects_out_of_scale_rpe() {
        let sub = submission(json!({
            "exercises": [ { "name": "Comp BP", "sets": [ { "weight": 100, "reps": 3, "rpe": 11 } ] } ]
        }));
        assert_matches!(sub.check(), Err(CoreError::Validation(_)));

        let ok = submission(json!({
            "exercises": [ { "name": "Comp BP", "sets": [ { "weight": 100, "reps": 3, "rpe": 9.5 } ] } ]
        }));
        assert!(ok.check().is_ok());
    }

    #[test]
    fn missing_ids_are_filled_and_existing_kept() {
        let mut weeks = vec![Week {
            id: "w1".into(),
            week_number: 1,
            days: vec![Day::default()],
        }];
        assign_missing_ids(&mut weeks);
        assert_eq!(weeks[0].id, "w1");
        assert!(Uuid::parse_str(&weeks[0].days[0].id).is_ok());
    }

    #[test]
    fn default_weeks_has_one_open_day() {
        let weeks = default_weeks();
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].week_number, 1);
        assert_eq!(weeks[0].days.len(), 1);
        assert_eq!(weeks[0].days[0].day_name, DEFAULT_DAY_NAME);
        assert!(!weeks[0].days[0].is_completed);
    }

    #[test]
    fn block_source_parses() {
        assert_eq!("assigned".parse::<BlockSource>().unwrap(), BlockSource::Assigned);
        assert_matches!("borrowed".parse::<BlockSource>(), Err(CoreError::Validation(_)));
    }
}
