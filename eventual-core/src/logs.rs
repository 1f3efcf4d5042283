//! Wire types for the authentication log viewer (backend-owned, read-only).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One authentication log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub usuario: String,
    pub provider: String,
    #[serde(rename = "loginType", default)]
    pub login_type: Option<String>,
    /// Token expiry recorded for this login.
    #[serde(default)]
    pub caducidad: Option<DateTime<Utc>>,
    #[serde(rename = "ipAddress", default)]
    pub ip_address: Option<String>,
    #[serde(rename = "userAgent", default)]
    pub user_agent: Option<String>,
}

/// Query parameters for the log listing.
#[derive(Debug, Clone, PartialEq)]
pub struct LogQuery {
    pub page: u32,
    pub limit: u32,
    pub usuario: Option<String>,
    pub provider: Option<String>,
    pub login_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for LogQuery {
    fn default() -> Self {
        LogQuery {
            page: 1,
            limit: 50,
            usuario: None,
            provider: None,
            login_type: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl LogQuery {
    /// Flatten to query-string pairs, omitting inactive filters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(usuario) = &self.usuario {
            params.push(("usuario", usuario.clone()));
        }
        if let Some(provider) = &self.provider {
            params.push(("provider", provider.clone()));
        }
        if let Some(login_type) = &self.login_type {
            params.push(("loginType", login_type.clone()));
        }
        if let Some(start) = self.start_date {
            params.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// One page of log entries plus its pagination envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct LogsPage {
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub total: u64,
    pub limit: u32,
}

/// Aggregate counts from `GET /logs/stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogStats {
    pub total: u64,
    #[serde(rename = "uniqueUsers", default)]
    pub unique_users: u64,
    #[serde(rename = "logsLastWeek", default)]
    pub logs_last_week: u64,
    #[serde(default)]
    pub breakdown: Option<StatsBreakdown>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsBreakdown {
    #[serde(rename = "byProvider", default)]
    pub by_provider: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_omit_inactive_filters() {
        let query = LogQuery {
            usuario: Some("ana@example.com".to_string()),
            ..Default::default()
        };

        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("limit", "50".to_string()),
                ("usuario", "ana@example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_log_entry_deserializes_camel_case_fields() {
        let entry: LogEntry = serde_json::from_str(
            r#"{
                "timestamp": "2026-08-01T10:00:00Z",
                "usuario": "ana@example.com",
                "provider": "google",
                "loginType": "oauth",
                "caducidad": "2026-08-02T10:00:00Z",
                "ipAddress": "10.0.0.1",
                "userAgent": "Mozilla/5.0"
            }"#,
        )
        .unwrap();

        assert_eq!(entry.login_type.as_deref(), Some("oauth"));
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
    }
}
