use std::sync::Arc;

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::{Level, PageResult};
use crate::validate::schemas::LevelDraft;

#[derive(Clone)]
pub struct LevelsClient {
    http: Arc<Http>,
}

impl LevelsClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub async fn create(&self, draft: &LevelDraft) -> Result<Level, ApiError> {
        self.http
            .post_json("levels", draft, CallOpts::action("adding levels"))
            .await
    }

    pub async fn fetch_page(&self, page_size: u32, page_num: u32) -> Result<PageResult<Level>, ApiError> {
        let path = format!("levels/{}/{}", page_size, page_num);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching all levels"))
            .await
    }

    pub async fn fetch_one(&self, id: Uuid) -> Result<Level, ApiError> {
        let path = format!("levels/{}", id);
        self.http
            .get_json(&path, &[], CallOpts::action("fetching levels"))
            .await
    }

    pub async fn update(&self, id: Uuid, draft: &LevelDraft) -> Result<Level, ApiError> {
        let path = format!("levels/{}", id);
        self.http
            .put_json(&path, draft, CallOpts::action("updating levels"))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let path = format!("levels/{}", id);
        self.http.delete(&path, CallOpts::action("deleting levels")).await
    }
}
