use crate::models::{
    AttendanceRecord, AttendanceStatus, Overview, Standing, Subject, SubjectStats,
};

pub fn compute_stats(subjects: &[Subject], records: &[AttendanceRecord]) -> Vec<SubjectStats> {
    subjects
        .iter()
        .map(|subject| {
            let (total, present) = records
                .iter()
                .filter(|record| record.subject_id == subject.id)
                .fold((0u32, 0u32), |(total, present), record| {
                    let hit = u32::from(record.status == AttendanceStatus::Present);
                    (total + 1, present + hit)
                });

            let percentage = percentage_of(present, total);
            let threshold = f64::from(subject.min_attendance);

            SubjectStats {
                subject_id: subject.id.clone(),
                subject_name: subject.name.clone(),
                subject_color: subject.color.clone(),
                min_attendance: subject.min_attendance,
                total_lectures: total,
                present_count: present,
                absent_count: total - present,
                percentage,
                status: classify(percentage, subject.min_attendance),
                deficit: round_to(threshold - percentage, 1).max(0.0),
            }
        })
        .collect()
}

pub fn overview(stats: &[SubjectStats], records: &[AttendanceRecord]) -> Overview {
    let total_present = records
        .iter()
        .filter(|record| record.status == AttendanceStatus::Present)
        .count() as u32;
    let total_lectures = records.len() as u32;

    Overview {
        total_subjects: stats.len() as u32,
        total_lectures,
        total_present,
        overall_percentage: percentage_of(total_present, total_lectures),
        critical_subjects: count_standing(stats, Standing::Critical),
        warning_subjects: count_standing(stats, Standing::Warning),
    }
}

/// `critical` more than ten points under the threshold, `warning` under it.
pub fn classify(percentage: f64, threshold: u8) -> Standing {
    let threshold = f64::from(threshold);
    if percentage < threshold - 10.0 {
        Standing::Critical
    } else if percentage < threshold {
        Standing::Warning
    } else {
        Standing::Good
    }
}

pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    // half-up on the scaled value, matching the UI's rounding
    (value * factor + 0.5).floor() / factor
}

fn percentage_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(f64::from(part) / f64::from(whole) * 100.0)
}

fn count_standing(stats: &[SubjectStats], standing: Standing) -> u32 {
    stats.iter().filter(|stat| stat.status == standing).count() as u32
}
