use actix_web::{HttpResponse, Responder, web};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use super::types::{EndpointUsage, RelayFailure, RelayReceipt, UsageExample};
use crate::analytics::models::AnalyticsSnapshot;
use crate::analytics::validation::validate_snapshot;

/// 访客数据接收端点
///
/// 接受任意 JSON：结构不符合快照格式时只记录日志，仍然返回成功。
pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn receive(body: web::Bytes) -> impl Responder {
        let now = chrono::Utc::now();
        trace!("Analytics payload received: {} bytes", body.len());

        let data: Value = match serde_json::from_slice(&body) {
            Ok(data) => data,
            Err(e) => {
                warn!("Analytics API error: {}", e);
                return HttpResponse::BadRequest().json(RelayFailure {
                    success: false,
                    message: "Failed to process analytics data".to_string(),
                    error: e.to_string(),
                });
            }
        };

        let device = data
            .pointer("/visitor/deviceType")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let page_views = data
            .get("pageViews")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let clicks = data
            .get("clicks")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        info!(
            "Analytics data received: timestamp={}, visitor={}, pageViews={}, clicks={}",
            now.to_rfc3339(),
            device,
            page_views,
            clicks
        );

        match serde_json::from_value::<AnalyticsSnapshot>(data) {
            Ok(snapshot) => {
                for issue in validate_snapshot(&snapshot) {
                    warn!("Analytics payload issue: {}", issue);
                }
            }
            Err(e) => debug!("Analytics payload is not a snapshot: {}", e),
        }

        HttpResponse::Ok().json(RelayReceipt {
            success: true,
            message: "Analytics data received successfully".to_string(),
            timestamp: now.to_rfc3339(),
        })
    }

    pub async fn describe() -> impl Responder {
        HttpResponse::Ok().json(EndpointUsage {
            message: "Analytics API endpoint",
            usage: "POST analytics data to this endpoint",
            example: UsageExample {
                visitor: "Device information",
                page_views: "Array of page views",
                clicks: "Array of click interactions",
            },
        })
    }
}

pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/api/analytics")
        .route("", web::post().to(AnalyticsService::receive))
        .route("", web::get().to(AnalyticsService::describe))
}
