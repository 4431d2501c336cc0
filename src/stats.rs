use crate::models::{DayMetric, Habit, WindowSummary};
use crate::store::{date_key_for, LogStore};
use chrono::{Duration, Local, NaiveDate};

pub fn derive_window_today(store: &LogStore, window_days: usize, catalog: &[Habit]) -> Vec<DayMetric> {
    derive_window(store, window_days, Local::now().date_naive(), catalog)
}

/// One point per calendar day for the `window_days` days ending on `anchor`,
/// oldest first. Missing days are zero-filled so charts never see gaps.
pub fn derive_window(
    store: &LogStore,
    window_days: usize,
    anchor: NaiveDate,
    catalog: &[Habit],
) -> Vec<DayMetric> {
    let mut points = Vec::with_capacity(window_days);
    for offset in (0..window_days).rev() {
        let date = anchor - Duration::days(offset as i64);
        let key = date_key_for(date);
        let label = date.format("%m/%d").to_string();

        let point = match store.get(&key) {
            Some(record) => DayMetric {
                date: key,
                label,
                mood: record.mood,
                energy: record.energy,
                sleep_quality: record.sleep_quality,
                instagram_minutes: record.instagram_minutes,
                study_minutes: record.study_minutes,
                completion_rate: completion_rate(record.completed_habits(), catalog.len()),
            },
            None => DayMetric {
                date: key,
                label,
                mood: 0,
                energy: 0,
                sleep_quality: 0,
                instagram_minutes: 0,
                study_minutes: 0,
                completion_rate: 0.0,
            },
        };
        points.push(point);
    }
    points
}

/// Percentage of catalog habits done; 0 for an empty catalog.
pub fn completion_rate(completed: usize, catalog_size: usize) -> f64 {
    if catalog_size == 0 {
        return 0.0;
    }
    completed as f64 * 100.0 / catalog_size as f64
}

pub fn summarize(points: &[DayMetric]) -> WindowSummary {
    if points.is_empty() {
        return WindowSummary::default();
    }

    let mut summary = WindowSummary {
        days: points.len(),
        ..Default::default()
    };
    let mut rate_sum = 0.0;
    for point in points {
        summary.total_study_minutes = summary
            .total_study_minutes
            .saturating_add(u64::from(point.study_minutes));
        summary.total_instagram_minutes = summary
            .total_instagram_minutes
            .saturating_add(u64::from(point.instagram_minutes));
        if point.study_minutes > point.instagram_minutes {
            summary.focused_days += 1;
        }
        rate_sum += point.completion_rate;
    }
    summary.avg_completion_rate = rate_sum / points.len() as f64;
    summary
}
