//! Admin and cache DTOs for the v1 API.

use serde::{Deserialize, Serialize};

/// Response for `POST /api/v1/admin/retention:run`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetentionRunResponse {
    /// Number of artifact files removed by this sweep.
    pub files_removed: u64,
}

/// Response for `POST /api/v1/admin/cache:clear`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheClearResponse {
    pub entries_removed: u64,
}

/// Response for `GET /api/v1/cache/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub entry_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_run_response_serializes_camel_case() {
        let resp = RetentionRunResponse { files_removed: 7 };
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["filesRemoved"], 7);
    }
}
