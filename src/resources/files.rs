use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::{FileStatus, FileType, PageResult, VaultFile};
use crate::validate::schemas::FileDraft;
use crate::validate::Schema;

/// Metadata carried alongside the blob in an upload request
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub file_type: FileType,
    pub session: Option<String>,
}

/// Optional list criteria for the file review table
#[derive(Debug, Clone, Default)]
pub struct FileListQuery {
    pub search: Option<String>,
    pub created_at: Option<String>,
}

/// Presigned link resolved for a stored file
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadLink {
    pub url: String,
}

#[derive(Clone)]
pub struct FilesClient {
    http: Arc<Http>,
}

impl FilesClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Upload one file for a course: multipart with a `file` blob part and a
    /// `metadata` JSON part
    pub async fn upload(
        &self,
        course_id: Uuid,
        file_name: &str,
        bytes: Vec<u8>,
        metadata: &UploadMetadata,
    ) -> Result<VaultFile, ApiError> {
        let mut meta = serde_json::json!({ "file_type": metadata.file_type });
        if let Some(session) = &metadata.session {
            meta["session"] = serde_json::Value::String(session.clone());
        }

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("metadata", meta.to_string());

        let path = format!("courses/{}/files", course_id);
        self.http
            .post_multipart(&path, form, CallOpts::action("adding files"))
            .await
    }

    pub async fn fetch_page(
        &self,
        status: FileStatus,
        page_size: u32,
        page_num: u32,
        query: &FileListQuery,
    ) -> Result<PageResult<VaultFile>, ApiError> {
        let path = format!("files/{}/{}/{}", status, page_size, page_num);
        let mut params = Vec::new();
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let Some(created_at) = &query.created_at {
            params.push(("date_time", created_at.clone()));
        }
        self.http
            .get_json(&path, &params, CallOpts::action("fetching all files"))
            .await
    }

    pub async fn fetch_one(&self, id: Uuid) -> Result<VaultFile, ApiError> {
        let path = format!("files/{}", id);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching file"))
            .await
    }

    pub async fn update(&self, id: Uuid, draft: &FileDraft) -> Result<VaultFile, ApiError> {
        draft.validate()?;
        let path = format!("files/{}", id);
        self.http
            .put_json(&path, draft, CallOpts::action("updating files"))
            .await
    }

    /// Review a pending file. The status machine only moves forward:
    /// pending -> approved | rejected, never back.
    pub async fn set_status(
        &self,
        file: &VaultFile,
        status: FileStatus,
        rejection_reason: Option<String>,
    ) -> Result<VaultFile, ApiError> {
        if !file.status.can_transition_to(status) {
            let mut errors = std::collections::HashMap::new();
            errors.insert(
                "status".to_string(),
                format!("A {} file cannot change to {}.", file.status, status),
            );
            return Err(ApiError::validation("File has already been reviewed.", errors));
        }

        let draft = FileDraft {
            course_id: Some(file.course_id),
            file_type: Some(file.file_type),
            session: file.session.clone(),
            status: Some(status),
            rejection_reason,
        };
        self.update(file.id, &draft).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let path = format!("files/{}", id);
        self.http.delete(&path, CallOpts::action("deleting files")).await
    }

    /// Resolve the presigned download URL; the caller opens it directly
    pub async fn download_url(&self, id: Uuid) -> Result<DownloadLink, ApiError> {
        self.http
            .get_json(&id.to_string(), &[], CallOpts::action("fetching file download link"))
            .await
    }
}
