use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_ATTENDANCE: u8 = 75;

pub const SUBJECT_COLORS: [&str; 10] = [
    "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
    "#F97316", "#6366F1",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
    pub min_attendance: u8,
    /// Informational only; never kept in sync with the record count.
    #[serde(default)]
    pub total_lectures: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub subject_id: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub lecture_number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub default_min_attendance: u8,
    pub export_format: ExportFormat,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_min_attendance: DEFAULT_MIN_ATTENDANCE,
            export_format: ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
    Good,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_color: String,
    pub min_attendance: u8,
    pub total_lectures: u32,
    pub present_count: u32,
    pub absent_count: u32,
    pub percentage: f64,
    pub status: Standing,
    pub deficit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_subjects: u32,
    pub total_lectures: u32,
    pub total_present: u32,
    pub overall_percentage: f64,
    pub critical_subjects: u32,
    pub warning_subjects: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub subjects: Vec<Subject>,
    pub attendance: Vec<AttendanceRecord>,
    pub settings: AppSettings,
    #[serde(default)]
    pub export_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubjectRequest {
    pub name: String,
    pub color: Option<String>,
    pub min_attendance: Option<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSubjectRequest {
    pub name: String,
    pub color: String,
    pub min_attendance: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRequest {
    pub subject_id: String,
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmarkQuery {
    pub subject_id: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySheetEntry {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_color: String,
    pub status: Option<AttendanceStatus>,
    pub lecture_number: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySheet {
    pub date: String,
    pub recorded: u32,
    pub entries: Vec<DaySheetEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub subjects: Vec<SubjectStats>,
    pub overview: Overview,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub subjects: Vec<Subject>,
    pub attendance: Vec<AttendanceRecord>,
    pub settings: AppSettings,
    pub stats: Vec<SubjectStats>,
    pub overview: Overview,
}
