use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MOOD: u8 = 3;
pub const DEFAULT_ENERGY: u8 = 3;
pub const DEFAULT_SLEEP_QUALITY: u8 = 3;
pub const DEFAULT_BED_TIME: &str = "23:00";
pub const DEFAULT_WAKE_TIME: &str = "07:00";
pub const DEFAULT_WATER_INTAKE: u32 = 4;

/// A habit the tracker offers for toggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Habit {
    pub id: &'static str,
    pub label: &'static str,
}

pub const DEFAULT_HABITS: &[Habit] = &[
    Habit { id: "exercise", label: "Exercise" },
    Habit { id: "noPhoneMorning", label: "No Morning Phone" },
    Habit { id: "deepWork", label: "Deep Work Session" },
    Habit { id: "read", label: "Reading" },
    Habit { id: "meditate", label: "Meditation" },
    Habit { id: "planTomorrow", label: "Plan Tomorrow" },
];

/// Everything tracked for one calendar day. Serialized field names match the
/// durable slot format. Counts written as `null` (a cleared number input)
/// read back as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: String,
    pub habits: BTreeMap<String, bool>,
    pub mood: u8,
    pub energy: u8,
    pub bed_time: String,
    pub wake_time: String,
    pub sleep_quality: u8,
    #[serde(deserialize_with = "null_as_zero")]
    pub instagram_minutes: u32,
    #[serde(deserialize_with = "null_as_zero")]
    pub study_minutes: u32,
    #[serde(deserialize_with = "null_as_zero")]
    pub study_sessions: u32,
    pub daily_goal: String,
    pub daily_goal_completed: bool,
    pub reflection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_mentor_insight: Option<String>,
    #[serde(deserialize_with = "null_as_zero")]
    pub water_intake: u32,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

impl DailyRecord {
    /// Fully populated record for a date nobody has touched yet.
    pub fn with_defaults(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            habits: BTreeMap::new(),
            mood: DEFAULT_MOOD,
            energy: DEFAULT_ENERGY,
            bed_time: DEFAULT_BED_TIME.to_string(),
            wake_time: DEFAULT_WAKE_TIME.to_string(),
            sleep_quality: DEFAULT_SLEEP_QUALITY,
            instagram_minutes: 0,
            study_minutes: 0,
            study_sessions: 0,
            daily_goal: String::new(),
            daily_goal_completed: false,
            reflection: String::new(),
            ai_mentor_insight: None,
            water_intake: DEFAULT_WATER_INTAKE,
        }
    }

    pub fn is_habit_done(&self, habit_id: &str) -> bool {
        self.habits.get(habit_id).copied().unwrap_or(false)
    }

    pub fn completed_habits(&self) -> usize {
        self.habits.values().filter(|done| **done).count()
    }

    /// Overwrites every field the patch carries. `habits` is replaced as a
    /// whole map, never merged per habit.
    pub fn apply(&mut self, patch: DailyRecordPatch) {
        let DailyRecordPatch {
            habits,
            mood,
            energy,
            bed_time,
            wake_time,
            sleep_quality,
            instagram_minutes,
            study_minutes,
            study_sessions,
            daily_goal,
            daily_goal_completed,
            reflection,
            ai_mentor_insight,
            water_intake,
        } = patch;

        if let Some(habits) = habits {
            self.habits = habits;
        }
        if let Some(mood) = mood {
            self.mood = mood;
        }
        if let Some(energy) = energy {
            self.energy = energy;
        }
        if let Some(bed_time) = bed_time {
            self.bed_time = bed_time;
        }
        if let Some(wake_time) = wake_time {
            self.wake_time = wake_time;
        }
        if let Some(sleep_quality) = sleep_quality {
            self.sleep_quality = sleep_quality;
        }
        if let Some(minutes) = instagram_minutes {
            self.instagram_minutes = minutes;
        }
        if let Some(minutes) = study_minutes {
            self.study_minutes = minutes;
        }
        if let Some(sessions) = study_sessions {
            self.study_sessions = sessions;
        }
        if let Some(goal) = daily_goal {
            self.daily_goal = goal;
        }
        if let Some(done) = daily_goal_completed {
            self.daily_goal_completed = done;
        }
        if let Some(reflection) = reflection {
            self.reflection = reflection;
        }
        if let Some(insight) = ai_mentor_insight {
            self.ai_mentor_insight = Some(insight);
        }
        if let Some(water) = water_intake {
            self.water_intake = water;
        }
    }
}

/// Partial update for a [`DailyRecord`]; `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyRecordPatch {
    pub habits: Option<BTreeMap<String, bool>>,
    pub mood: Option<u8>,
    pub energy: Option<u8>,
    pub bed_time: Option<String>,
    pub wake_time: Option<String>,
    pub sleep_quality: Option<u8>,
    pub instagram_minutes: Option<u32>,
    pub study_minutes: Option<u32>,
    pub study_sessions: Option<u32>,
    pub daily_goal: Option<String>,
    pub daily_goal_completed: Option<bool>,
    pub reflection: Option<String>,
    pub ai_mentor_insight: Option<String>,
    pub water_intake: Option<u32>,
}

/// One chart point. Days without a record are all zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMetric {
    pub date: String,
    pub label: String,
    pub mood: u8,
    pub energy: u8,
    pub sleep_quality: u8,
    pub instagram_minutes: u32,
    pub study_minutes: u32,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSummary {
    pub days: usize,
    pub total_study_minutes: u64,
    pub total_instagram_minutes: u64,
    pub focused_days: usize,
    pub avg_completion_rate: f64,
}
