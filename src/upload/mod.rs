use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::error::ApiError;
use crate::models::{Course, FileType, VaultFile};
use crate::notify::{Notifier, ToastLevel};
use crate::resources::courses::CourseListQuery;
use crate::resources::files::UploadMetadata;
use crate::resources::{CoursesClient, FilesClient};
use crate::validate::{FieldErrors, Rules};

#[derive(Error, Debug)]
pub enum RowEditError {
    #[error("At least one file row is required")]
    LastRow,

    #[error("No row at index {0}")]
    OutOfRange(usize),

    #[error("Row limit of {0} reached")]
    TooManyRows(usize),
}

/// One file pending upload, with its per-row metadata
#[derive(Debug, Clone, Default)]
pub struct UploadRow {
    pub file_type: Option<FileType>,
    pub session: Option<String>,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadRow {
    fn check(&self) -> FieldErrors {
        let mut rules = Rules::new();
        rules.require(
            "file_type",
            self.file_type.is_some(),
            "File type is required",
        );
        rules.require("file", !self.file_name.is_empty() && !self.bytes.is_empty(), "File is required");
        if let Some(file_type) = self.file_type {
            if file_type.requires_session()
                && self.session.as_deref().map_or(true, |s| s.trim().is_empty())
            {
                rules.fail("session", "Session is required for past questions");
            }
        }
        rules.finish()
    }
}

/// Type-ahead course selection over a locally cached list.
///
/// The query is a plain substring filter on course code; only an explicit
/// `select` confirms a pick, typing again clears it.
#[derive(Debug, Default)]
pub struct CoursePicker {
    cached: Vec<Course>,
    query: String,
    selected: Option<Course>,
}

impl CoursePicker {
    /// Populate the local cache (one page of courses, fetched once on open)
    pub async fn load(&mut self, courses: &CoursesClient) -> Result<(), ApiError> {
        let page = courses
            .fetch_page(CONFIG.upload.course_cache_page_size, 1, &CourseListQuery::default())
            .await?;
        self.cached = page.items;
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = None;
    }

    pub fn suggestions(&self) -> Vec<&Course> {
        let needle = self.query.to_lowercase();
        self.cached
            .iter()
            .filter(|c| c.course_code.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn select(&mut self, course: Course) {
        self.query = course.course_code.clone();
        self.selected = Some(course);
    }

    /// The confirmed pick, if the typed text still corresponds to one
    pub fn confirmed(&self) -> Option<&Course> {
        self.selected.as_ref()
    }
}

/// Result of a batch submit: uploads are independent server-side records, so
/// rows persisted before a failure stay persisted.
#[derive(Debug)]
pub struct UploadReport {
    pub uploaded: Vec<VaultFile>,
    pub failed: Option<ApiError>,
}

impl UploadReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_none()
    }
}

/// Multi-file batch upload for one course.
///
/// A specialization of the form flow: an array of rows instead of one draft,
/// a shared course picked via type-ahead, and a strictly sequential upload
/// loop that stops at the first failure without rolling anything back.
pub struct UploadController {
    files: FilesClient,
    notifier: Arc<dyn Notifier>,
    pub picker: CoursePicker,
    rows: Vec<UploadRow>,
    row_errors: Vec<FieldErrors>,
    uploading: bool,
}

impl UploadController {
    pub fn new(files: FilesClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            files,
            notifier,
            picker: CoursePicker::default(),
            rows: vec![UploadRow::default()],
            row_errors: vec![FieldErrors::new()],
            uploading: false,
        }
    }

    pub fn rows(&self) -> &[UploadRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut UploadRow> {
        self.rows.get_mut(index)
    }

    /// Validation messages per row, aligned with `rows()`
    pub fn row_errors(&self) -> &[FieldErrors] {
        &self.row_errors
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn add_row(&mut self) -> Result<(), RowEditError> {
        if self.rows.len() >= CONFIG.upload.max_rows {
            return Err(RowEditError::TooManyRows(CONFIG.upload.max_rows));
        }
        self.rows.push(UploadRow::default());
        self.row_errors.push(FieldErrors::new());
        Ok(())
    }

    pub fn remove_row(&mut self, index: usize) -> Result<(), RowEditError> {
        if index >= self.rows.len() {
            return Err(RowEditError::OutOfRange(index));
        }
        if self.rows.len() == 1 {
            return Err(RowEditError::LastRow);
        }
        self.rows.remove(index);
        self.row_errors.remove(index);
        Ok(())
    }

    /// Upload every row, sequentially, against the confirmed course.
    ///
    /// Requires a confirmed course pick (typed text alone does not count)
    /// and schema-valid rows. Uploads run one at a time in row order; the
    /// first failure stops the loop, the failed and remaining rows stay in
    /// the form for retry, and rows already uploaded are not rolled back.
    pub async fn submit_all(&mut self) -> Result<UploadReport, ApiError> {
        let course_id = match self.picker.confirmed() {
            Some(course) => course.id,
            None => {
                let message = "Please select a valid course from the dropdown";
                self.notifier.notify(message, ToastLevel::Error);
                let mut errors = FieldErrors::new();
                errors.insert("course_id".to_string(), message.to_string());
                return Err(ApiError::validation(message, errors));
            }
        };

        self.row_errors = self.rows.iter().map(UploadRow::check).collect();
        if self.row_errors.iter().any(|e| !e.is_empty()) {
            let mut errors = FieldErrors::new();
            for (index, row_errors) in self.row_errors.iter().enumerate() {
                for (field, message) in row_errors {
                    errors.insert(format!("files[{}].{}", index, field), message.clone());
                }
            }
            return Err(ApiError::validation("Please fix the highlighted rows.", errors));
        }

        self.uploading = true;
        let mut uploaded = Vec::new();
        let mut failed = None;

        while let Some(row) = self.rows.first().cloned() {
            let metadata = UploadMetadata {
                // Rows were validated above; file_type is present
                file_type: row.file_type.unwrap_or(FileType::Note),
                session: row.session.clone(),
            };

            match self
                .files
                .upload(course_id, &row.file_name, row.bytes.clone(), &metadata)
                .await
            {
                Ok(file) => {
                    uploaded.push(file);
                    self.rows.remove(0);
                    self.row_errors.remove(0);
                }
                Err(e) => {
                    // Already toasted by the transport; the row stays put
                    failed = Some(e);
                    break;
                }
            }
        }

        self.uploading = false;

        if failed.is_none() {
            self.rows = vec![UploadRow::default()];
            self.row_errors = vec![FieldErrors::new()];
            self.notifier.notify(
                &format!("Uploaded {} file(s) successfully.", uploaded.len()),
                ToastLevel::Success,
            );
        }

        Ok(UploadReport { uploaded, failed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Semester;

    fn course(code: &str) -> Course {
        Course {
            id: Uuid::new_v4(),
            course_code: code.to_string(),
            semester: Semester::First,
            credit_load: 3,
            level_id: Uuid::new_v4(),
            title: code.to_string(),
            outline: String::new(),
            is_active: true,
            department_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_picker_filters_by_substring() {
        let mut picker = CoursePicker::default();
        picker.cached = vec![course("MEE301"), course("MEE305"), course("CVE301")];

        picker.set_query("mee");
        let codes: Vec<_> = picker.suggestions().iter().map(|c| c.course_code.clone()).collect();
        assert_eq!(codes, vec!["MEE301", "MEE305"]);
    }

    #[test]
    fn test_typing_clears_confirmed_pick() {
        let mut picker = CoursePicker::default();
        let c = course("MEE301");
        picker.select(c.clone());
        assert!(picker.confirmed().is_some());

        picker.set_query("MEE30");
        assert!(picker.confirmed().is_none());
    }

    #[test]
    fn test_cannot_remove_last_row() {
        let notifier = Arc::new(crate::notify::QueueNotifier::new());
        let http = Arc::new(
            crate::http::Http::new("http://localhost:9", notifier.clone()).unwrap(),
        );
        let mut controller = UploadController::new(FilesClient::new(http), notifier);

        assert!(matches!(controller.remove_row(0), Err(RowEditError::LastRow)));
        controller.add_row().unwrap();
        controller.remove_row(1).unwrap();
        assert_eq!(controller.rows().len(), 1);
    }

    #[test]
    fn test_row_session_rule() {
        let row = UploadRow {
            file_type: Some(FileType::PastQuestion),
            session: None,
            file_name: "mee301-2020.pdf".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(row.check()["session"], "Session is required for past questions");

        let row = UploadRow {
            file_type: Some(FileType::LectureMaterial),
            session: None,
            ..row
        };
        assert!(row.check().is_empty());
    }
}
