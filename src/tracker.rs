use crate::models::{
    AppSettings, AttendanceRecord, AttendanceStatus, DaySheet, DaySheetEntry, ExportDocument,
    Subject, SubjectStats, SUBJECT_COLORS,
};
use crate::stats::compute_stats;
use crate::storage::{KeyValueStore, Persistence};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Subjects,
    Attendance,
    SubjectsAndAttendance,
    Settings,
    Everything,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tracker {
    subjects: Vec<Subject>,
    records: Vec<AttendanceRecord>,
    settings: AppSettings,
}

impl Tracker {
    pub fn new(
        subjects: Vec<Subject>,
        records: Vec<AttendanceRecord>,
        settings: AppSettings,
    ) -> Self {
        Self {
            subjects,
            records,
            settings,
        }
    }

    pub async fn load<S: KeyValueStore>(persistence: &Persistence<S>) -> Self {
        let mut tracker = Self::new(
            persistence.load_subjects().await,
            persistence.load_attendance().await,
            persistence.load_settings().await,
        );
        let orphans = tracker.prune_orphans();
        if orphans > 0 {
            warn!(orphans, "dropped records of unknown subjects");
        }
        info!(
            subjects = tracker.subjects.len(),
            records = tracker.records.len(),
            "loaded attendance data"
        );
        tracker
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == id)
    }

    pub fn stats(&self) -> Vec<SubjectStats> {
        compute_stats(&self.subjects, &self.records)
    }

    pub fn add_subject(
        &mut self,
        name: &str,
        color: Option<&str>,
        min_attendance: Option<u8>,
    ) -> Option<(Subject, Change)> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let subject = Subject {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.unwrap_or(SUBJECT_COLORS[0]).to_string(),
            created_at: Utc::now().to_rfc3339(),
            min_attendance: min_attendance.unwrap_or(self.settings.default_min_attendance),
            total_lectures: 0,
        };
        info!(id = %subject.id, name = %subject.name, "added subject");
        self.subjects.push(subject.clone());
        Some((subject, Change::Subjects))
    }

    pub fn edit_subject(
        &mut self,
        id: &str,
        name: &str,
        color: &str,
        min_attendance: u8,
    ) -> Option<(Subject, Change)> {
        let subject = self.subjects.iter_mut().find(|subject| subject.id == id)?;
        subject.name = name.to_string();
        subject.color = color.to_string();
        subject.min_attendance = min_attendance;
        info!(id, "edited subject");
        Some((subject.clone(), Change::Subjects))
    }

    /// Removes the subject and every record pointing at it.
    pub fn delete_subject(&mut self, id: &str) -> Option<Change> {
        let before = (self.subjects.len(), self.records.len());
        self.subjects.retain(|subject| subject.id != id);
        self.records.retain(|record| record.subject_id != id);

        let removed = (before.0 - self.subjects.len(), before.1 - self.records.len());
        if removed == (0, 0) {
            debug!(id, "delete of unknown subject ignored");
            return None;
        }
        info!(id, records = removed.1, "deleted subject");
        Some(Change::SubjectsAndAttendance)
    }

    /// Sets the status for (subject, date). An existing record keeps its id
    /// and lecture number; a new one is numbered after the subject's count.
    pub fn mark_attendance(
        &mut self,
        subject_id: &str,
        date: &str,
        status: AttendanceStatus,
    ) -> (AttendanceRecord, Change) {
        if let Some(record) = self
            .records
            .iter_mut()
            .find(|record| record.subject_id == subject_id && record.date == date)
        {
            record.status = status;
            debug!(subject_id, date, ?status, "updated attendance");
            return (record.clone(), Change::Attendance);
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.to_string(),
            date: date.to_string(),
            status,
            lecture_number: self.next_lecture_number(subject_id),
        };
        debug!(subject_id, date, ?status, lecture = record.lecture_number, "marked attendance");
        self.records.push(record.clone());
        (record, Change::Attendance)
    }

    pub fn unmark_attendance(&mut self, subject_id: &str, date: &str) -> Option<Change> {
        let before = self.records.len();
        self.records
            .retain(|record| !(record.subject_id == subject_id && record.date == date));
        if self.records.len() == before {
            return None;
        }
        debug!(subject_id, date, "unmarked attendance");
        Some(Change::Attendance)
    }

    pub fn update_settings(&mut self, settings: AppSettings) -> Change {
        self.settings = settings;
        info!(settings = ?self.settings, "updated settings");
        Change::Settings
    }

    pub fn replace_all(&mut self, document: ExportDocument) -> Change {
        self.subjects = document.subjects;
        self.records = document.attendance;
        self.settings = document.settings;
        info!(
            subjects = self.subjects.len(),
            records = self.records.len(),
            "replaced all data from import"
        );
        Change::Everything
    }

    pub fn next_lecture_number(&self, subject_id: &str) -> u32 {
        let existing = self
            .records
            .iter()
            .filter(|record| record.subject_id == subject_id)
            .count();
        existing as u32 + 1
    }

    pub fn record_for(&self, subject_id: &str, date: &str) -> Option<&AttendanceRecord> {
        self.records
            .iter()
            .find(|record| record.subject_id == subject_id && record.date == date)
    }

    pub fn day_sheet(&self, date: &str) -> DaySheet {
        let entries = self
            .subjects
            .iter()
            .map(|subject| {
                let record = self.record_for(&subject.id, date);
                DaySheetEntry {
                    subject_id: subject.id.clone(),
                    subject_name: subject.name.clone(),
                    subject_color: subject.color.clone(),
                    status: record.map(|record| record.status),
                    lecture_number: record
                        .map(|record| record.lecture_number)
                        .unwrap_or_else(|| self.next_lecture_number(&subject.id)),
                }
            })
            .collect();

        DaySheet {
            date: date.to_string(),
            recorded: self.records.iter().filter(|record| record.date == date).count() as u32,
            entries,
        }
    }

    fn prune_orphans(&mut self) -> usize {
        let before = self.records.len();
        let subjects = &self.subjects;
        self.records
            .retain(|record| subjects.iter().any(|subject| subject.id == record.subject_id));
        before - self.records.len()
    }

    /// Writes the slots named by `change` and returns whether every write
    /// succeeded. Records go out before subjects, and subjects are skipped
    /// when the records write fails, so a cascade never leaves records of a
    /// deleted subject behind.
    pub async fn persist<S: KeyValueStore>(
        &self,
        persistence: &Persistence<S>,
        change: Change,
    ) -> bool {
        match change {
            Change::Subjects => persistence.save_subjects(&self.subjects).await,
            Change::Attendance => persistence.save_attendance(&self.records).await,
            Change::SubjectsAndAttendance => {
                persistence.save_attendance(&self.records).await
                    && persistence.save_subjects(&self.subjects).await
            }
            Change::Settings => persistence.save_settings(&self.settings).await,
            Change::Everything => {
                let collections = persistence.save_attendance(&self.records).await
                    && persistence.save_subjects(&self.subjects).await;
                let settings = persistence.save_settings(&self.settings).await;
                collections && settings
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExportFormat, Standing};
    use crate::errors::StorageError;
    use crate::storage::{MemoryStore, StorageKeys};
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    fn tracker_with(names: &[&str]) -> (Tracker, Vec<String>) {
        let mut tracker = Tracker::default();
        let ids = names
            .iter()
            .map(|name| {
                let (subject, _) = tracker
                    .add_subject(name, None, Some(75))
                    .expect("subject added");
                subject.id
            })
            .collect();
        (tracker, ids)
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut tracker = Tracker::default();
        assert!(tracker.add_subject("   ", None, None).is_none());
        assert!(tracker.add_subject("", Some("#EF4444"), Some(50)).is_none());
        assert!(tracker.subjects().is_empty());
    }

    #[test]
    fn new_subject_uses_settings_default_threshold() {
        let mut tracker = Tracker::default();
        tracker.update_settings(AppSettings {
            default_min_attendance: 60,
            export_format: ExportFormat::Json,
        });

        let (subject, change) = tracker.add_subject("  Physics ", None, None).expect("added");
        assert_eq!(change, Change::Subjects);
        assert_eq!(subject.name, "Physics");
        assert_eq!(subject.min_attendance, 60);
        assert_eq!(subject.color, SUBJECT_COLORS[0]);
        assert_eq!(subject.total_lectures, 0);
        assert!(!subject.created_at.is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let (_, ids) = tracker_with(&["A", "B", "C"]);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn edit_keeps_identity_fields() {
        let (mut tracker, ids) = tracker_with(&["Math"]);
        let original = tracker.subject(&ids[0]).cloned().expect("subject");

        let (edited, _) = tracker
            .edit_subject(&ids[0], "Algebra", "#10B981", 80)
            .expect("edited");
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, original.created_at);
        assert_eq!(edited.name, "Algebra");
        assert_eq!(edited.color, "#10B981");
        assert_eq!(edited.min_attendance, 80);

        assert!(tracker.edit_subject("missing", "X", "#000000", 10).is_none());
        assert_eq!(tracker.subjects().len(), 1);
    }

    #[test]
    fn delete_cascades_to_records() {
        let (mut tracker, ids) = tracker_with(&["Math", "Art"]);
        tracker.mark_attendance(&ids[0], "2026-01-05", AttendanceStatus::Present);
        tracker.mark_attendance(&ids[0], "2026-01-06", AttendanceStatus::Absent);
        tracker.mark_attendance(&ids[1], "2026-01-05", AttendanceStatus::Present);

        assert_eq!(
            tracker.delete_subject(&ids[0]),
            Some(Change::SubjectsAndAttendance)
        );
        assert!(tracker.records().iter().all(|r| r.subject_id != ids[0]));
        assert_eq!(tracker.records().len(), 1);
        assert_eq!(tracker.subjects().len(), 1);

        let snapshot = tracker.clone();
        assert_eq!(tracker.delete_subject(&ids[0]), None);
        assert_eq!(tracker, snapshot);
    }

    #[test]
    fn marking_twice_updates_in_place() {
        let (mut tracker, ids) = tracker_with(&["Math"]);
        let (first, _) = tracker.mark_attendance(&ids[0], "2026-01-05", AttendanceStatus::Present);
        let (second, _) = tracker.mark_attendance(&ids[0], "2026-01-05", AttendanceStatus::Absent);
        let (third, _) = tracker.mark_attendance(&ids[0], "2026-01-05", AttendanceStatus::Present);

        assert_eq!(tracker.records().len(), 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.id, third.id);
        assert_eq!(third.lecture_number, 1);
        assert_eq!(tracker.records()[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn lecture_numbers_follow_live_count() {
        let (mut tracker, ids) = tracker_with(&["Math"]);
        let id = &ids[0];
        tracker.mark_attendance(id, "2026-01-05", AttendanceStatus::Present);
        tracker.mark_attendance(id, "2026-01-06", AttendanceStatus::Present);
        tracker.mark_attendance(id, "2026-01-07", AttendanceStatus::Present);

        // numbers are never recomputed, so a gap leads to a repeat
        tracker.unmark_attendance(id, "2026-01-05");
        let (record, _) = tracker.mark_attendance(id, "2026-01-08", AttendanceStatus::Absent);
        assert_eq!(record.lecture_number, 3);
        let numbers: Vec<u32> = tracker.records().iter().map(|r| r.lecture_number).collect();
        assert_eq!(numbers, vec![2, 3, 3]);
    }

    #[test]
    fn unmark_is_idempotent() {
        let (mut tracker, ids) = tracker_with(&["Math"]);
        tracker.mark_attendance(&ids[0], "2026-01-05", AttendanceStatus::Present);
        tracker.mark_attendance(&ids[0], "2026-01-06", AttendanceStatus::Absent);

        assert_eq!(
            tracker.unmark_attendance(&ids[0], "2026-01-05"),
            Some(Change::Attendance)
        );
        let once = tracker.clone();
        assert_eq!(tracker.unmark_attendance(&ids[0], "2026-01-05"), None);
        assert_eq!(tracker, once);
    }

    #[test]
    fn math_scenario_through_the_controller() {
        let (mut tracker, ids) = tracker_with(&["Math"]);
        let id = &ids[0];
        for (day, status) in [
            ("2026-01-05", AttendanceStatus::Present),
            ("2026-01-06", AttendanceStatus::Present),
            ("2026-01-07", AttendanceStatus::Present),
            ("2026-01-08", AttendanceStatus::Absent),
        ] {
            tracker.mark_attendance(id, day, status);
        }
        let stats = tracker.stats();
        assert_eq!(stats[0].percentage, 75.0);
        assert_eq!(stats[0].status, Standing::Good);

        tracker.mark_attendance(id, "2026-01-09", AttendanceStatus::Absent);
        let stats = tracker.stats();
        assert_eq!(stats[0].percentage, 60.0);
        assert_eq!(stats[0].status, Standing::Critical);
    }

    #[test]
    fn day_sheet_reports_status_and_lecture() {
        let (mut tracker, ids) = tracker_with(&["Math", "Art"]);
        tracker.mark_attendance(&ids[0], "2026-01-05", AttendanceStatus::Present);
        tracker.mark_attendance(&ids[0], "2026-01-06", AttendanceStatus::Absent);

        let sheet = tracker.day_sheet("2026-01-06");
        assert_eq!(sheet.recorded, 1);
        assert_eq!(sheet.entries.len(), 2);
        assert_eq!(sheet.entries[0].status, Some(AttendanceStatus::Absent));
        assert_eq!(sheet.entries[0].lecture_number, 2);
        assert_eq!(sheet.entries[1].status, None);
        assert_eq!(sheet.entries[1].lecture_number, 1);
    }

    #[derive(Clone)]
    struct FlakyRecordsStore {
        inner: MemoryStore,
        failing: Arc<AtomicBool>,
    }

    impl KeyValueStore for FlakyRecordsStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == "attendance_records" && self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Write {
                    key: key.to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.inner.set(key, value).await
        }
    }

    fn has_orphans(tracker: &Tracker) -> bool {
        tracker
            .records()
            .iter()
            .any(|record| tracker.subject(&record.subject_id).is_none())
    }

    #[tokio::test]
    async fn persist_writes_touched_slots_and_reloads() {
        let store = MemoryStore::new();
        let persistence = Persistence::new(store.clone(), StorageKeys::default());

        let mut tracker = Tracker::load(&persistence).await;
        let (subject, change) = tracker.add_subject("Math", None, None).expect("added");
        assert!(tracker.persist(&persistence, change).await);
        assert!(store.raw("attendance_records").is_none());

        let (_, change) =
            tracker.mark_attendance(&subject.id, "2026-01-05", AttendanceStatus::Present);
        assert!(tracker.persist(&persistence, change).await);

        let change = tracker.delete_subject(&subject.id).expect("deleted");
        assert!(tracker.persist(&persistence, change).await);

        let reloaded = Tracker::load(&persistence).await;
        assert_eq!(reloaded, tracker);
        assert!(reloaded.records().is_empty());
    }

    #[tokio::test]
    async fn failed_cascade_write_leaves_no_orphans() {
        let failing = Arc::new(AtomicBool::new(false));
        let store = FlakyRecordsStore {
            inner: MemoryStore::new(),
            failing: Arc::clone(&failing),
        };
        let persistence = Persistence::new(store.clone(), StorageKeys::default());

        let mut tracker = Tracker::load(&persistence).await;
        let (subject, change) = tracker.add_subject("Math", None, None).expect("added");
        assert!(tracker.persist(&persistence, change).await);
        let (_, change) =
            tracker.mark_attendance(&subject.id, "2026-01-05", AttendanceStatus::Present);
        assert!(tracker.persist(&persistence, change).await);

        failing.store(true, Ordering::SeqCst);
        let change = tracker.delete_subject(&subject.id).expect("deleted");
        assert!(!tracker.persist(&persistence, change).await);
        assert!(tracker.subjects().is_empty());

        let reloaded = Tracker::load(&persistence).await;
        assert!(!has_orphans(&reloaded));
        assert_eq!(reloaded.subjects().len(), 1);
        assert_eq!(reloaded.records().len(), 1);
        let raw = store.inner.raw("attendance_subjects").expect("subjects slot");
        assert!(raw.contains(&subject.id));
    }

    #[tokio::test]
    async fn load_drops_records_of_unknown_subjects() {
        let store = MemoryStore::new();
        store.put_raw("attendance_subjects", "[]");
        store.put_raw(
            "attendance_records",
            r#"[{"id":"r1","subjectId":"gone","date":"2026-01-05","status":"present","lectureNumber":1}]"#,
        );
        let persistence = Persistence::new(store, StorageKeys::default());

        let tracker = Tracker::load(&persistence).await;
        assert!(tracker.records().is_empty());
        assert!(!has_orphans(&tracker));
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_authoritative() {
        let store = MemoryStore::with_quota(16);
        let persistence = Persistence::new(store, StorageKeys::default());

        let mut tracker = Tracker::load(&persistence).await;
        let (_, change) = tracker.add_subject("Math", None, None).expect("added");
        assert!(!tracker.persist(&persistence, change).await);
        assert_eq!(tracker.subjects().len(), 1);
        assert!(Tracker::load(&persistence).await.subjects().is_empty());
    }
}
