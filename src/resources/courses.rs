use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::{Course, PageResult, Semester};
use crate::validate::schemas::CourseDraft;

/// Optional list criteria beyond the page position
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub semester: Option<Semester>,
    pub search: Option<String>,
    pub created_at: Option<String>,
}

impl CourseListQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(semester) = self.semester {
            query.push(("semester", semester.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(created_at) = &self.created_at {
            query.push(("date_time", created_at.clone()));
        }
        query
    }
}

#[derive(Clone)]
pub struct CoursesClient {
    http: Arc<Http>,
}

impl CoursesClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub async fn create(&self, draft: &CourseDraft) -> Result<Course, ApiError> {
        self.http
            .post_json("courses", draft, CallOpts::action("adding courses"))
            .await
    }

    pub async fn fetch_page(
        &self,
        page_size: u32,
        page_num: u32,
        query: &CourseListQuery,
    ) -> Result<PageResult<Course>, ApiError> {
        let path = format!("courses/{}/{}", page_size, page_num);
        self.http
            .get_json(&path, &query.to_query(), CallOpts::action("fetching all courses"))
            .await
    }

    pub async fn fetch_one(&self, id: Uuid) -> Result<Course, ApiError> {
        let path = format!("courses/{}", id);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching courses"))
            .await
    }

    pub async fn update(&self, id: Uuid, draft: &CourseDraft) -> Result<Course, ApiError> {
        let path = format!("courses/{}", id);
        self.http
            .put_json(&path, draft, CallOpts::action("updating courses"))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let path = format!("courses/{}", id);
        self.http.delete(&path, CallOpts::action("deleting courses")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_construction_is_deterministic() {
        // Identical filters must yield identical query parameters
        let query = CourseListQuery {
            semester: Some(Semester::Second),
            search: Some("MEE".to_string()),
            created_at: Some("2025-01-01".to_string()),
        };
        assert_eq!(query.to_query(), query.to_query());
        assert_eq!(
            query.to_query(),
            vec![
                ("semester", "second".to_string()),
                ("search", "MEE".to_string()),
                ("date_time", "2025-01-01".to_string()),
            ]
        );
    }

    #[test]
    fn test_absent_filters_send_no_parameters() {
        assert!(CourseListQuery::default().to_query().is_empty());
    }
}
