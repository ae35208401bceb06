use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::data::{industry_insights, job_trends, top_skills, IndustryInsight, JobTrend, TopSkill};
use crate::lifecycle::{CallError, ExternalCall};

/// A mock market-data source: answers with a fixed dataset after a delay
/// standing in for network latency.
pub struct Feed<T> {
    name: &'static str,
    latency: Duration,
    load: fn() -> Vec<T>,
}

impl<T> Clone for Feed<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            latency: self.latency,
            load: self.load,
        }
    }
}

impl<T> Feed<T> {
    pub fn new(name: &'static str, latency: Duration, load: fn() -> Vec<T>) -> Self {
        Self {
            name,
            latency,
            load,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Feed<JobTrend> {
    pub fn job_trends() -> Self {
        Self::new("job_trends", Duration::from_millis(1000), job_trends)
    }
}

impl Feed<TopSkill> {
    pub fn top_skills() -> Self {
        Self::new("top_skills", Duration::from_millis(1500), top_skills)
    }
}

impl Feed<IndustryInsight> {
    pub fn industry_insights() -> Self {
        Self::new("industry_insights", Duration::from_millis(1200), industry_insights)
    }
}

#[async_trait]
impl<T> ExternalCall for Feed<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Input = ();
    type Output = Vec<T>;

    async fn call(&self, _input: &()) -> Result<Vec<T>, CallError> {
        tokio::time::sleep(self.latency).await;
        let rows = (self.load)();
        debug!(feed = self.name, rows = rows.len(), "market feed answered");
        Ok(rows)
    }
}
