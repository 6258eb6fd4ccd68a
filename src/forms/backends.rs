//! `FormBackend` wiring for the resource clients.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Course, Department, Level, User, VaultFile};
use crate::resources::{CoursesClient, DepartmentsClient, FilesClient, LevelsClient, UsersClient};
use crate::validate::schemas::{CourseDraft, DepartmentDraft, FileDraft, LevelDraft, UserDraft};

use super::FormBackend;

#[async_trait]
impl FormBackend for DepartmentsClient {
    type Draft = DepartmentDraft;
    type Saved = Department;

    fn entity(&self) -> &'static str {
        "Department"
    }

    async fn create(&self, draft: &DepartmentDraft) -> Result<Department, ApiError> {
        DepartmentsClient::create(self, draft).await
    }

    async fn update(&self, id: Uuid, draft: &DepartmentDraft) -> Result<Department, ApiError> {
        DepartmentsClient::update(self, id, draft).await
    }
}

#[async_trait]
impl FormBackend for LevelsClient {
    type Draft = LevelDraft;
    type Saved = Level;

    fn entity(&self) -> &'static str {
        "Level"
    }

    async fn create(&self, draft: &LevelDraft) -> Result<Level, ApiError> {
        LevelsClient::create(self, draft).await
    }

    async fn update(&self, id: Uuid, draft: &LevelDraft) -> Result<Level, ApiError> {
        LevelsClient::update(self, id, draft).await
    }
}

#[async_trait]
impl FormBackend for CoursesClient {
    type Draft = CourseDraft;
    type Saved = Course;

    fn entity(&self) -> &'static str {
        "Course"
    }

    async fn create(&self, draft: &CourseDraft) -> Result<Course, ApiError> {
        CoursesClient::create(self, draft).await
    }

    async fn update(&self, id: Uuid, draft: &CourseDraft) -> Result<Course, ApiError> {
        CoursesClient::update(self, id, draft).await
    }
}

#[async_trait]
impl FormBackend for UsersClient {
    type Draft = UserDraft;
    type Saved = User;

    fn entity(&self) -> &'static str {
        "User"
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, ApiError> {
        UsersClient::register(self, draft).await
    }

    async fn update(&self, id: Uuid, draft: &UserDraft) -> Result<User, ApiError> {
        UsersClient::update(self, id, draft).await
    }
}

#[async_trait]
impl FormBackend for FilesClient {
    type Draft = FileDraft;
    type Saved = VaultFile;

    fn entity(&self) -> &'static str {
        "File"
    }

    /// Files come into existence through the upload controller, never a form
    async fn create(&self, _draft: &FileDraft) -> Result<VaultFile, ApiError> {
        let mut errors = std::collections::HashMap::new();
        errors.insert(
            "file".to_string(),
            "Files are created through upload.".to_string(),
        );
        Err(ApiError::validation("Files are created through upload.", errors))
    }

    async fn update(&self, id: Uuid, draft: &FileDraft) -> Result<VaultFile, ApiError> {
        FilesClient::update(self, id, draft).await
    }
}
