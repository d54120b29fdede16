//! 终端管理面板

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::analytics::models::AnalyticsSnapshot;
use crate::analytics::validate_snapshot;
use crate::interfaces::cli::{CliContext, CliError};
use crate::utils::format_duration;

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

/// 渲染面板（最新的记录在前）
pub fn render_dashboard(snapshot: &AnalyticsSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Visitor Information".bold().green());
    match &snapshot.visitor {
        Some(v) => {
            let _ = writeln!(out, "  {}:  {}", "Device".cyan(), v.device_type);
            if let Some(browser) = &v.browser {
                let _ = writeln!(
                    out,
                    "  {}: {} {} ({} {})",
                    "Browser".cyan(),
                    or_dash(browser.name.as_deref()),
                    or_dash(browser.version.as_deref()),
                    or_dash(browser.os.as_deref()),
                    or_dash(browser.os_version.as_deref())
                );
            }
            let _ = writeln!(out, "  {}: {}", "Platform".cyan(), v.platform);
            let _ = writeln!(
                out,
                "  {}:  {}x{} (viewport {}x{}, {}x)",
                "Screen".cyan(),
                v.screen_width,
                v.screen_height,
                v.viewport_width,
                v.viewport_height,
                v.pixel_ratio
            );
            let _ = writeln!(out, "  {}: {}", "Language".cyan(), v.language);
            let _ = writeln!(out, "  {}: {}", "Timezone".cyan(), v.timezone);
            let _ = writeln!(out, "  {}: {}", "Referrer".cyan(), v.referrer);
            let _ = writeln!(out, "  {}: {}", "Session".cyan(), v.session_id.dimmed());
            let _ = writeln!(out, "  {}: {}", "Captured".cyan(), local_time(v.timestamp));
        }
        None => {
            let _ = writeln!(out, "  {}", "No visitor captured yet".dimmed());
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Engagement Metrics".bold().green());
    let _ = writeln!(out, "  {}:    {}", "Visits".cyan(), snapshot.visit_count);
    let _ = writeln!(
        out,
        "  {}:    {}%",
        "Scroll".cyan(),
        snapshot.max_scroll_depth
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        "On page".cyan(),
        format_duration(snapshot.time_on_page)
    );

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        format!("Page Views ({})", snapshot.page_views.len())
            .bold()
            .green()
    );
    for view in snapshot.page_views.iter().rev() {
        let _ = writeln!(
            out,
            "  {}  {}  {}",
            local_time(view.timestamp).dimmed(),
            view.url,
            or_dash(Some(view.referrer.as_str())).dimmed()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        format!("Click Interactions ({})", snapshot.clicks.len())
            .bold()
            .green()
    );
    for click in snapshot.clicks.iter().rev() {
        let _ = writeln!(
            out,
            "  {}  {:<8} {:<16} {:<24} {}",
            local_time(click.timestamp).dimmed(),
            click.element,
            or_dash(click.id.as_deref()),
            or_dash(click.text.as_deref()),
            or_dash(click.href.as_deref()).blue()
        );
    }

    let issues = validate_snapshot(snapshot);
    if !issues.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Warnings".bold().yellow());
        for issue in issues {
            let _ = writeln!(out, "  {} {}", "⚠".yellow(), issue);
        }
    }

    out
}

fn print_once(ctx: &CliContext, json: bool) -> Result<(), CliError> {
    let reader = ctx.reader();
    if json {
        println!("{}", reader.export_json()?);
    } else {
        print!("{}", render_dashboard(&reader.export()));
    }
    Ok(())
}

pub async fn dashboard(ctx: &CliContext, json: bool, watch: Option<u64>) -> Result<(), CliError> {
    let Some(secs) = watch.filter(|s| *s > 0) else {
        return print_once(ctx, json);
    };

    loop {
        // 会话可能在刷新过程中过期
        ctx.require_admin()?;
        print!("\x1B[2J\x1B[H");
        print_once(ctx, json)?;
        println!(
            "\n{}",
            format!("Refreshing every {}s, Ctrl+C to quit", secs).dimmed()
        );

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}
