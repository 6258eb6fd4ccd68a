//! Production `PageFetcher` impls: one per admin list screen, each binding a
//! resource client to the shared filter criteria.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Course, Department, FileStatus, Level, PageResult, User, VaultFile};
use crate::resources::courses::CourseListQuery;
use crate::resources::files::FileListQuery;
use crate::resources::users::UserListQuery;
use crate::resources::{CoursesClient, DepartmentsClient, FilesClient, LevelsClient, UsersClient};

use super::{FilterState, PageFetcher};

pub struct DepartmentFetcher {
    pub client: DepartmentsClient,
}

#[async_trait]
impl PageFetcher for DepartmentFetcher {
    type Item = Department;

    async fn fetch(&self, filter: &FilterState) -> Result<PageResult<Department>, ApiError> {
        self.client.fetch_page(filter.page_size, filter.page_num).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete(id).await
    }
}

pub struct LevelFetcher {
    pub client: LevelsClient,
}

#[async_trait]
impl PageFetcher for LevelFetcher {
    type Item = Level;

    async fn fetch(&self, filter: &FilterState) -> Result<PageResult<Level>, ApiError> {
        self.client.fetch_page(filter.page_size, filter.page_num).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete(id).await
    }
}

pub struct CourseFetcher {
    pub client: CoursesClient,
}

#[async_trait]
impl PageFetcher for CourseFetcher {
    type Item = Course;

    async fn fetch(&self, filter: &FilterState) -> Result<PageResult<Course>, ApiError> {
        let query = CourseListQuery {
            semester: filter.semester,
            search: filter.search.clone(),
            created_at: filter.created_at.clone(),
        };
        self.client
            .fetch_page(filter.page_size, filter.page_num, &query)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete(id).await
    }
}

pub struct UserFetcher {
    pub client: UsersClient,
}

#[async_trait]
impl PageFetcher for UserFetcher {
    type Item = User;

    async fn fetch(&self, filter: &FilterState) -> Result<PageResult<User>, ApiError> {
        // Department+level scoping uses its own endpoint; everything else
        // goes through the general query listing
        if let (Some(department_id), Some(level_id)) = (filter.department_id, filter.level_id) {
            return self
                .client
                .fetch_by_department_and_level(
                    department_id,
                    level_id,
                    filter.page_size,
                    filter.page_num,
                )
                .await;
        }

        let query = UserListQuery {
            search: filter.search.clone(),
            created_at: filter.created_at.clone(),
        };
        self.client
            .fetch_page(filter.page_size, filter.page_num, &query)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete(id).await
    }
}

pub struct FileFetcher {
    pub client: FilesClient,
}

#[async_trait]
impl PageFetcher for FileFetcher {
    type Item = VaultFile;

    async fn fetch(&self, filter: &FilterState) -> Result<PageResult<VaultFile>, ApiError> {
        // The review queue defaults to pending work
        let status = filter.status.unwrap_or(FileStatus::Pending);
        let query = FileListQuery {
            search: filter.search.clone(),
            created_at: filter.created_at.clone(),
        };
        self.client
            .fetch_page(status, filter.page_size, filter.page_num, &query)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client.delete(id).await
    }
}
