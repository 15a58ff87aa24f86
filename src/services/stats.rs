//! Statistics service

use crate::{error::AppResult, models::stats::CatalogStats, repository::Repository};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn catalog(&self) -> AppResult<CatalogStats> {
        self.repository.stats.catalog().await
    }
}
