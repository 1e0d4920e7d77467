use crate::models::{Entry, TrendPoint};

/// Mood series in chronological order.
///
/// The collaborator lists newest first; the series is reversed and then
/// stably ordered by date so same-day entries keep their creation order.
pub fn mood_trend(entries: &[Entry]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .rev()
        .map(|entry| TrendPoint {
            date: entry.date.clone(),
            mood_level: entry.mood_level,
        })
        .collect();
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

pub fn average_mood(entries: &[Entry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let total: u32 = entries.iter().map(|entry| u32::from(entry.mood_level)).sum();
    Some(f64::from(total) / entries.len() as f64)
}
