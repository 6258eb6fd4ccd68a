use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    #[serde(rename = "past question")]
    PastQuestion,
    #[serde(rename = "past questions")]
    PastQuestions,
    #[serde(rename = "lecture material")]
    LectureMaterial,
    #[serde(rename = "note")]
    Note,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::PastQuestion => "past question",
            FileType::PastQuestions => "past questions",
            FileType::LectureMaterial => "lecture material",
            FileType::Note => "note",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "past question" => Some(FileType::PastQuestion),
            "past questions" => Some(FileType::PastQuestions),
            "lecture material" => Some(FileType::LectureMaterial),
            "note" => Some(FileType::Note),
            _ => None,
        }
    }

    /// Past-question uploads must carry an academic session (2020/2021 style)
    pub fn requires_session(&self) -> bool {
        matches!(self, FileType::PastQuestion | FileType::PastQuestions)
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Approved,
    Rejected,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Approved => "approved",
            FileStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pending" => Some(FileStatus::Pending),
            "approved" => Some(FileStatus::Approved),
            "rejected" => Some(FileStatus::Rejected),
            _ => None,
        }
    }

    /// pending -> approved | rejected; a reviewed file never goes back
    pub fn can_transition_to(&self, next: FileStatus) -> bool {
        match self {
            FileStatus::Pending => matches!(next, FileStatus::Approved | FileStatus::Rejected),
            FileStatus::Approved | FileStatus::Rejected => *self == next,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uploaded course material awaiting or past review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultFile {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: FileType,
    pub status: FileStatus,
    #[serde(default)]
    pub session: Option<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub course_id: Uuid,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_machine() {
        assert!(FileStatus::Pending.can_transition_to(FileStatus::Approved));
        assert!(FileStatus::Pending.can_transition_to(FileStatus::Rejected));
        assert!(!FileStatus::Approved.can_transition_to(FileStatus::Pending));
        assert!(!FileStatus::Rejected.can_transition_to(FileStatus::Pending));
        assert!(!FileStatus::Approved.can_transition_to(FileStatus::Rejected));
    }

    #[test]
    fn test_session_requirement() {
        assert!(FileType::PastQuestion.requires_session());
        assert!(FileType::PastQuestions.requires_session());
        assert!(!FileType::Note.requires_session());
        assert!(!FileType::LectureMaterial.requires_session());
    }
}
