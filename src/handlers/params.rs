use serde::Deserialize;
use uuid::Uuid;

use crate::config::LimitsConfig;
use crate::database::Page;
use crate::error::ApiError;
use crate::validation::parse_uuid;

/// Query string accepted by list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub client_id: Option<String>,
    pub category: Option<String>,
}

impl ListQuery {
    /// Limit clamped to `1..=max_list_limit`, offset to `>= 0`
    pub fn page(&self, limits: &LimitsConfig) -> Page {
        Page {
            limit: self
                .limit
                .unwrap_or(limits.default_list_limit)
                .clamp(1, limits.max_list_limit.max(1)),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }

    pub fn client_id(&self) -> Result<Option<Uuid>, ApiError> {
        match self.client_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_uuid("client_id", raw).map(Some),
            None => Ok(None),
        }
    }
}
