use crate::models::{BarSeries, CategoryCount, ChartsResponse, MoodCategory, MoodEntry, Period};
use chrono::{DateTime, Datelike, Duration, Local, TimeZone, Utc};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_LABELS: [&str; 4] = ["W1", "W2", "W3", "W4"];
const WEEK_WINDOW_DAYS: i64 = 7;
const MONTH_WINDOW_DAYS: i64 = 30;
/// Entries 28 to 30 days old compute a week index of 4. They are inside the
/// month window, so they are folded into the last bucket rather than dropped.
const MONTH_OVERFLOW: usize = MONTH_LABELS.len() - 1;
pub const RECENT_LIMIT: usize = 5;

pub fn build_charts(entries: &[MoodEntry], period: Period) -> ChartsResponse {
    build_charts_at(Local::now(), entries, period)
}

pub fn build_charts_at<Tz: TimeZone>(
    now: DateTime<Tz>,
    entries: &[MoodEntry],
    period: Period,
) -> ChartsResponse {
    let bar = bar_series(&now, entries, period);
    let categories = category_counts(entries);
    ChartsResponse {
        period,
        has_bar_data: bar.has_data(),
        has_category_data: categories.iter().any(|item| item.count > 0),
        bar,
        categories,
        recent: recent_entries(entries, RECENT_LIMIT),
    }
}

/// Average rating per bucket over the entries inside the period window.
/// Empty buckets hold 0.
pub fn bar_series<Tz: TimeZone>(
    now: &DateTime<Tz>,
    entries: &[MoodEntry],
    period: Period,
) -> BarSeries {
    let labels: &[&str] = match period {
        Period::Week => &WEEKDAY_LABELS,
        Period::Month => &MONTH_LABELS,
    };
    let window = match period {
        Period::Week => Duration::days(WEEK_WINDOW_DAYS),
        Period::Month => Duration::days(MONTH_WINDOW_DAYS),
    };

    let tz = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let earliest = now_utc - window;

    let mut sums = vec![0u32; labels.len()];
    let mut counts = vec![0u32; labels.len()];

    for entry in entries
        .iter()
        .filter(|entry| entry.date >= earliest && entry.date <= now_utc)
    {
        let index = match period {
            Period::Week => entry
                .date
                .with_timezone(&tz)
                .weekday()
                .num_days_from_monday() as usize,
            Period::Month => month_bucket(now_utc, entry.date),
        };
        sums[index] += u32::from(entry.rating.value());
        counts[index] += 1;
    }

    let values = sums
        .iter()
        .zip(&counts)
        .map(|(sum, count)| {
            if *count == 0 {
                0.0
            } else {
                f64::from(*sum) / f64::from(*count)
            }
        })
        .collect();

    BarSeries {
        labels: labels.iter().map(|label| label.to_string()).collect(),
        values,
    }
}

fn month_bucket(now: DateTime<Utc>, date: DateTime<Utc>) -> usize {
    let week_ms = Duration::days(7).num_milliseconds();
    let elapsed = (now - date).num_milliseconds().max(0);
    ((elapsed / week_ms) as usize).min(MONTH_OVERFLOW)
}

/// Low/Neutral/High counts over every entry, in that order.
pub fn category_counts(entries: &[MoodEntry]) -> Vec<CategoryCount> {
    let mut counts = [0usize; 3];
    for entry in entries {
        let slot = match MoodCategory::from_rating(entry.rating) {
            MoodCategory::Low => 0,
            MoodCategory::Neutral => 1,
            MoodCategory::High => 2,
        };
        counts[slot] += 1;
    }

    MoodCategory::ALL
        .iter()
        .zip(counts)
        .map(|(category, count)| CategoryCount {
            category: *category,
            label: category.label(),
            count,
            color: category.color(),
        })
        .collect()
}

/// The last `limit` submissions, newest first.
pub fn recent_entries(entries: &[MoodEntry], limit: usize) -> Vec<MoodEntry> {
    entries.iter().rev().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use chrono::FixedOffset;

    // Wednesday.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 7, 18, 0, 0).unwrap()
    }

    fn entry_at(date: DateTime<Utc>, rating: u8) -> MoodEntry {
        MoodEntry {
            id: date.timestamp_millis().to_string(),
            date,
            rating: Rating::try_from(rating).unwrap(),
            activities: Vec::new(),
            places: Vec::new(),
            events: Vec::new(),
            notes: String::new(),
        }
    }

    fn days_ago(days: i64, rating: u8) -> MoodEntry {
        entry_at(now() - Duration::days(days), rating)
    }

    #[test]
    fn empty_collection_has_no_data() {
        let charts = build_charts_at(now(), &[], Period::Week);
        assert_eq!(charts.bar.values, vec![0.0; 7]);
        assert!(!charts.has_bar_data);
        assert!(!charts.has_category_data);
        assert!(charts.categories.iter().all(|item| item.count == 0));
        assert!(charts.recent.is_empty());

        let month = bar_series(&now(), &[], Period::Month);
        assert_eq!(month.values, vec![0.0; 4]);
        assert_eq!(month.labels, vec!["W1", "W2", "W3", "W4"]);
    }

    #[test]
    fn same_day_ratings_are_averaged_into_weekday_bucket() {
        let entries = vec![
            entry_at(now() - Duration::hours(2), 4),
            entry_at(now() - Duration::hours(1), 2),
        ];
        let bar = bar_series(&now(), &entries, Period::Week);
        assert_eq!(bar.labels.len(), 7);
        assert_eq!(bar.values[2], 3.0);
        for (index, value) in bar.values.iter().enumerate() {
            if index != 2 {
                assert_eq!(*value, 0.0, "bucket {index}");
            }
        }
        assert!(bar.has_data());
    }

    #[test]
    fn week_mode_ignores_entries_outside_window() {
        let entries = vec![days_ago(8, 5), days_ago(3, 1)];
        let bar = bar_series(&now(), &entries, Period::Week);
        // three days before Wednesday is Sunday
        assert_eq!(bar.values[6], 1.0);
        assert_eq!(bar.values.iter().filter(|value| **value > 0.0).count(), 1);
    }

    #[test]
    fn week_window_includes_exact_boundary() {
        let entries = vec![days_ago(7, 4)];
        let bar = bar_series(&now(), &entries, Period::Week);
        assert_eq!(bar.values[2], 4.0);
    }

    #[test]
    fn future_entries_are_not_charted() {
        let entries = vec![entry_at(now() + Duration::days(1), 5)];
        assert!(!bar_series(&now(), &entries, Period::Week).has_data());
        assert!(!bar_series(&now(), &entries, Period::Month).has_data());
        assert_eq!(category_counts(&entries)[2].count, 1);
    }

    #[test]
    fn weekday_follows_the_timezone_of_now() {
        // 23:30 UTC Wednesday is already Thursday at UTC+2.
        let date = Utc.with_ymd_and_hms(2026, 1, 7, 23, 30, 0).unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_now = Utc
            .with_ymd_and_hms(2026, 1, 8, 0, 0, 0)
            .unwrap()
            .with_timezone(&offset);
        let bar = bar_series(&local_now, &[entry_at(date, 5)], Period::Week);
        assert_eq!(bar.values[3], 5.0);
        assert_eq!(bar.values[2], 0.0);
    }

    #[test]
    fn month_mode_buckets_by_elapsed_weeks() {
        let entries = vec![
            days_ago(1, 5),
            days_ago(2, 3),
            days_ago(8, 2),
            days_ago(15, 1),
            days_ago(22, 4),
            days_ago(31, 5),
        ];
        let bar = bar_series(&now(), &entries, Period::Month);
        assert_eq!(bar.values, vec![4.0, 2.0, 1.0, 4.0]);
    }

    #[test]
    fn month_entries_older_than_four_weeks_fold_into_last_bucket() {
        let entries = vec![days_ago(22, 2), days_ago(29, 4), days_ago(30, 3)];
        let bar = bar_series(&now(), &entries, Period::Month);
        assert_eq!(bar.values, vec![0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn category_counts_cover_every_entry_in_fixed_order() {
        let entries: Vec<_> = (1..=5u8)
            .chain([1, 5, 5])
            .map(|rating| days_ago(100, rating))
            .collect();
        let counts = category_counts(&entries);
        let labels: Vec<_> = counts.iter().map(|item| item.label).collect();
        assert_eq!(labels, vec!["Low", "Neutral", "High"]);
        assert_eq!(
            counts.iter().map(|item| item.count).collect::<Vec<_>>(),
            vec![3, 1, 4]
        );
        assert_eq!(counts.iter().map(|item| item.count).sum::<usize>(), entries.len());
        assert_eq!(counts[0].color, "#ef4444");
    }

    #[test]
    fn charts_are_deterministic_for_fixed_now() {
        let entries = vec![days_ago(1, 2), days_ago(9, 4), days_ago(40, 5)];
        let first = build_charts_at(now(), &entries, Period::Month);
        let second = build_charts_at(now(), &entries, Period::Month);
        assert_eq!(first.bar, second.bar);
        assert_eq!(first.categories, second.categories);
        assert_eq!(first.recent, second.recent);
    }

    #[test]
    fn recent_entries_are_newest_submission_first() {
        let entries: Vec<_> = (0..7).map(|day| days_ago(day, 3)).collect();
        let recent = recent_entries(&entries, RECENT_LIMIT);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].id, entries[6].id);
        assert_eq!(recent[4].id, entries[2].id);
    }
}
