//! One validation schema per entity form, carrying the domain rules the
//! admin screens enforce before any network call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{FileStatus, FileType, Semester};

use super::{FieldErrors, Rules, Schema};

static ENGINEERING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bengineering$").unwrap());
static SESSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}/\d{4}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub const LEVEL_NAMES: [u32; 5] = [100, 200, 300, 400, 500];

#[derive(Debug, Clone, Default, Serialize)]
pub struct DepartmentDraft {
    pub dept_name: String,
    pub dept_code: String,
}

impl Schema for DepartmentDraft {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();

        if rules.require(
            "dept_name",
            !self.dept_name.trim().is_empty(),
            "Department name is required.",
        ) && !ENGINEERING_RE.is_match(self.dept_name.trim())
        {
            rules.fail("dept_name", "Department name must end with engineering.");
        }

        if rules.require(
            "dept_code",
            !self.dept_code.trim().is_empty(),
            "Department code is required.",
        ) && self.dept_code.trim().chars().count() != 3
        {
            rules.fail("dept_code", "Department code must be exactly 3 characters.");
        }

        rules.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LevelDraft {
    pub level_name: Option<u32>,
}

impl Schema for LevelDraft {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();

        match self.level_name {
            None => rules.fail("level_name", "Level is required."),
            Some(value) if !LEVEL_NAMES.contains(&value) => {
                rules.fail("level_name", "Level must be either: 100, 200, 300, 400 or 500")
            }
            Some(_) => {}
        }

        rules.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseDraft {
    pub course_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_load: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<Uuid>,
    pub title: String,
    pub outline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Schema for CourseDraft {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();

        if rules.require(
            "course_code",
            !self.course_code.trim().is_empty(),
            "Course code is required",
        ) && self.course_code.trim().chars().count() != 6
        {
            rules.fail("course_code", "Course code must be exactly 6 characters.");
        }

        rules.require("semester", self.semester.is_some(), "Semester is required");

        match self.credit_load {
            None => rules.fail("credit_load", "Credit load is required"),
            Some(load) if !(1..=10).contains(&load) => {
                rules.fail("credit_load", "Credit load must be between 1 and 10.")
            }
            Some(_) => {}
        }

        rules.require("level_id", self.level_id.is_some(), "Level id is required");

        let title_len = self.title.trim().chars().count();
        if rules.require("title", title_len > 0, "Course title is required") {
            if title_len < 3 {
                rules.fail("title", "Minimum of three characters.");
            } else if title_len > 500 {
                rules.fail("title", "Maximum of 500 characters.");
            }
        }

        rules.require("outline", !self.outline.trim().is_empty(), "Course outline is required.");
        rules.require("is_active", self.is_active.is_some(), "Active status is required.");

        rules.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserDraft {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_id: Option<Uuid>,
}

impl Schema for UserDraft {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();

        let email = self.email.trim();
        if rules.require("email", !email.is_empty(), "Email is required.") {
            if !EMAIL_RE.is_match(email) {
                rules.fail("email", "Invalid email format.");
            } else if email.chars().count() > 100 {
                rules.fail("email", "Maximum of 100 characters");
            }
        }

        if rules.require("password", !self.password.is_empty(), "Password is required") {
            let pw = &self.password;
            if pw.chars().count() < 8 {
                rules.fail("password", "Password must be at least 8 characters");
            } else if pw.chars().count() > 200 {
                rules.fail("password", "Maximum of 200 characters");
            } else if !pw.chars().any(|c| c.is_ascii_digit()) {
                rules.fail("password", "Password must contain at least one number");
            } else if !pw.chars().any(|c| c.is_ascii_uppercase()) {
                rules.fail("password", "Password must contain at least one uppercase");
            } else if !pw.chars().any(|c| c.is_ascii_lowercase()) {
                rules.fail("password", "Password must contain at least one lowercase");
            }
        }

        rules.require("is_admin", self.is_admin.is_some(), "Is admin required.");
        rules.require("department_id", self.department_id.is_some(), "Department id is required.");
        rules.require("level_id", self.level_id.is_some(), "Level id is required.");

        rules.finish()
    }
}

/// Metadata draft for file review/update. `session` and `rejection_reason`
/// are conditionally required - declarative rules here, not branches in the
/// controllers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Schema for FileDraft {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();

        rules.require("course_id", self.course_id.is_some(), "Course id is required.");
        rules.require(
            "file_type",
            self.file_type.is_some(),
            "File type must be either: lecture material, note or past question(s)",
        );

        match (&self.session, self.file_type) {
            (Some(session), _) if !SESSION_RE.is_match(session) => {
                rules.fail("session", "Session should match this pattern 2020/2021");
            }
            (None, Some(file_type)) if file_type.requires_session() => {
                rules.fail("session", "Session is required when file type is past question(s).");
            }
            _ => {}
        }

        if let Some(reason) = &self.rejection_reason {
            if reason.chars().count() > 1024 {
                rules.fail("rejection_reason", "Maximum 1024 characters");
            }
        }
        if self.status == Some(FileStatus::Rejected)
            && self.rejection_reason.as_deref().map_or(true, |r| r.trim().is_empty())
        {
            rules.fail("rejection_reason", "Rejection reason is required when status is rejected.");
        }

        rules.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginDraft {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Schema for LoginDraft {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();

        let email = self.email.trim();
        if rules.require("email", !email.is_empty(), "Email is required.") && !EMAIL_RE.is_match(email) {
            rules.fail("email", "Invalid email format.");
        }
        rules.require("password", !self.password.is_empty(), "Password is required");

        rules.finish()
    }
}
