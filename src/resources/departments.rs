use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::{Course, Department, PageResult, Semester};
use crate::validate::schemas::DepartmentDraft;

#[derive(Clone)]
pub struct DepartmentsClient {
    http: Arc<Http>,
}

impl DepartmentsClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub async fn create(&self, draft: &DepartmentDraft) -> Result<Department, ApiError> {
        self.http
            .post_json("departments", draft, CallOpts::action("adding departments"))
            .await
    }

    pub async fn fetch_page(
        &self,
        page_size: u32,
        page_num: u32,
    ) -> Result<PageResult<Department>, ApiError> {
        let path = format!("departments/{}/{}", page_size, page_num);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching all departments"))
            .await
    }

    pub async fn fetch_one(&self, id: Uuid) -> Result<Department, ApiError> {
        let path = format!("departments/{}", id);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching departments"))
            .await
    }

    pub async fn update(&self, id: Uuid, draft: &DepartmentDraft) -> Result<Department, ApiError> {
        let path = format!("departments/{}", id);
        self.http
            .put_json(&path, draft, CallOpts::action("updating departments"))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let path = format!("departments/{}", id);
        self.http
            .delete(&path, CallOpts::action("deleting departments"))
            .await
    }

    /// Put a course on a department's offering list (many-to-many assignment)
    pub async fn assign_course(&self, department_id: Uuid, course_id: Uuid) -> Result<(), ApiError> {
        let path = format!("departments/{}/courses/{}", department_id, course_id);
        self.http
            .post_empty(&path, CallOpts::action("adding course to department"))
            .await
    }

    pub async fn remove_course(&self, department_id: Uuid, course_id: Uuid) -> Result<(), ApiError> {
        let path = format!("departments/{}/courses/{}", department_id, course_id);
        self.http
            .delete(&path, CallOpts::action("deleting course from department"))
            .await
    }

    /// Courses offered by a department at a level, optionally one semester
    pub async fn courses_for_level(
        &self,
        department_id: Uuid,
        level_id: Uuid,
        semester: Option<Semester>,
    ) -> Result<Vec<Course>, ApiError> {
        let path = format!("departments/{}/levels/{}/courses", department_id, level_id);
        let mut query = Vec::new();
        if let Some(semester) = semester {
            query.push(("semester", semester.as_str().to_string()));
        }
        self.http
            .get_json(&path, &query, CallOpts::action("fetching department - level courses"))
            .await
    }
}
