use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::{PageResult, User};
use crate::validate::schemas::UserDraft;

/// Optional list criteria for the user table
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Clone)]
pub struct UsersClient {
    http: Arc<Http>,
}

impl UsersClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Account creation goes through the public registration endpoint
    pub async fn register(&self, draft: &UserDraft) -> Result<User, ApiError> {
        self.http
            .post_json("register", draft, CallOpts::action("adding users"))
            .await
    }

    pub async fn fetch_page(
        &self,
        page_size: u32,
        page_num: u32,
        query: &UserListQuery,
    ) -> Result<PageResult<User>, ApiError> {
        let mut params = vec![
            ("page_size", page_size.to_string()),
            ("page_num", page_num.to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let Some(created_at) = &query.created_at {
            params.push(("date_time", created_at.clone()));
        }
        self.http
            .get_json("users", &params, CallOpts::action("fetching all users"))
            .await
    }

    /// Users scoped to one department and level
    pub async fn fetch_by_department_and_level(
        &self,
        department_id: Uuid,
        level_id: Uuid,
        page_size: u32,
        page_num: u32,
    ) -> Result<PageResult<User>, ApiError> {
        let path = format!("users/{}/{}/{}/{}", department_id, level_id, page_size, page_num);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching users by department and level"))
            .await
    }

    pub async fn fetch_one(&self, id: Uuid) -> Result<User, ApiError> {
        let path = format!("users/{}", id);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching user"))
            .await
    }

    pub async fn update(&self, id: Uuid, draft: &UserDraft) -> Result<User, ApiError> {
        let path = format!("users/{}", id);
        self.http
            .put_json(&path, draft, CallOpts::action("updating users"))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let path = format!("users/{}", id);
        self.http.delete(&path, CallOpts::action("deleting users")).await
    }
}
