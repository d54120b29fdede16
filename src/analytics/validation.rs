//! 快照结构校验
//!
//! 只做检查、不做修正：接收端点把问题写进日志，管理面板作为警告显示。

use serde::Serialize;

use super::models::AnalyticsSnapshot;
use super::{CLICK_TEXT_LIMIT, MAX_CLICKS, MAX_PAGE_VIEWS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// 出问题的字段路径，如 `clicks[3].text`
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_snapshot(snapshot: &AnalyticsSnapshot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if snapshot.page_views.len() > MAX_PAGE_VIEWS {
        issues.push(ValidationIssue::new(
            "pageViews",
            format!(
                "{} entries exceeds the limit of {}",
                snapshot.page_views.len(),
                MAX_PAGE_VIEWS
            ),
        ));
    }

    if snapshot.clicks.len() > MAX_CLICKS {
        issues.push(ValidationIssue::new(
            "clicks",
            format!(
                "{} entries exceeds the limit of {}",
                snapshot.clicks.len(),
                MAX_CLICKS
            ),
        ));
    }

    if snapshot.max_scroll_depth > 100 {
        issues.push(ValidationIssue::new(
            "maxScrollDepth",
            format!("{} is not a percentage", snapshot.max_scroll_depth),
        ));
    }

    for (i, click) in snapshot.clicks.iter().enumerate() {
        if click.element.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("clicks[{}].element", i),
                "element tag is empty",
            ));
        }
        if let Some(text) = &click.text
            && text.chars().count() > CLICK_TEXT_LIMIT
        {
            issues.push(ValidationIssue::new(
                format!("clicks[{}].text", i),
                format!("longer than {} characters", CLICK_TEXT_LIMIT),
            ));
        }
    }

    if let Some(visitor) = &snapshot.visitor {
        if visitor.session_id.trim().is_empty() {
            issues.push(ValidationIssue::new(
                "visitor.sessionId",
                "session id is empty",
            ));
        }
        if visitor.visit_count == 0 {
            issues.push(ValidationIssue::new(
                "visitor.visitCount",
                "a captured visitor has at least one visit",
            ));
        }
    }

    for window in snapshot.page_views.windows(2) {
        if window[1].timestamp < window[0].timestamp {
            issues.push(ValidationIssue::new(
                "pageViews",
                "entries are not in chronological order",
            ));
            break;
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::models::ClickRecord;

    fn click(text: Option<&str>) -> ClickRecord {
        ClickRecord {
            timestamp: "2025-06-01T10:00:00Z".parse().unwrap(),
            element: "BUTTON".to_string(),
            id: None,
            class_name: None,
            text: text.map(str::to_string),
            href: None,
        }
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        assert!(validate_snapshot(&AnalyticsSnapshot::default()).is_empty());
    }

    #[test]
    fn test_reports_oversized_parts() {
        let snapshot = AnalyticsSnapshot {
            clicks: (0..101).map(|_| click(Some("ok"))).collect(),
            max_scroll_depth: 120,
            ..Default::default()
        };
        let fields: Vec<String> = validate_snapshot(&snapshot)
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["clicks", "maxScrollDepth"]);
    }

    #[test]
    fn test_reports_long_click_text() {
        let long = "x".repeat(51);
        let snapshot = AnalyticsSnapshot {
            clicks: vec![click(Some("short")), click(Some(&long))],
            ..Default::default()
        };
        let issues = validate_snapshot(&snapshot);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "clicks[1].text");
    }
}
