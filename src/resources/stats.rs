use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{CallOpts, Http};
use crate::models::Stats;

#[derive(Clone)]
pub struct StatsClient {
    http: Arc<Http>,
}

impl StatsClient {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    pub async fn fetch(&self) -> Result<Stats, ApiError> {
        self.http
            .get_json("stats", &[], CallOpts::action("fetching stats"))
            .await
    }
}
