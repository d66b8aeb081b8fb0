use crate::summary::RunSummary;
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct CheckRow {
    check: String,
    passed: u64,
    failed: u64,
    #[tabled(display = "percent")]
    pass_rate: f64,
}

#[derive(Tabled)]
struct LatencyRow {
    requests: u64,
    #[tabled(display = "float2")]
    min_ms: f64,
    #[tabled(display = "float2")]
    avg_ms: f64,
    #[tabled(display = "float2")]
    p50_ms: f64,
    #[tabled(display = "float2")]
    p90_ms: f64,
    #[tabled(display = "float2")]
    p95_ms: f64,
    #[tabled(display = "float2")]
    p99_ms: f64,
    #[tabled(display = "float2")]
    max_ms: f64,
}

#[derive(Tabled)]
struct StatusRow {
    status: String,
    count: u64,
}

fn float2(n: &f64) -> String {
    format!("{n:.2}")
}

fn percent(n: &f64) -> String {
    format!("{:.2}%", n * 100.0)
}

fn millis(d: Duration) -> f64 {
    d.as_micros() as f64 / 1000.0
}

/// Print the summary of a finished run to stdout.
pub fn print_summary(scenario_name: &str, summary: &RunSummary) {
    println!(
        "\nSummary of {scenario_name}: {} iterations in {:.2}s ({:.2} it/s)",
        summary.total_iterations,
        summary.wall_clock.as_secs_f64(),
        summary.iterations_per_second()
    );

    let mut check_rows = summary
        .checks
        .iter()
        .map(|(name, counts)| CheckRow {
            check: name.clone(),
            passed: counts.passed,
            failed: counts.failed,
            pass_rate: counts.pass_rate(),
        })
        .collect::<Vec<_>>();
    let total = summary.check_counts();
    check_rows.push(CheckRow {
        check: "total".to_string(),
        passed: total.passed,
        failed: total.failed,
        pass_rate: total.pass_rate(),
    });
    let mut table = Table::new(check_rows);
    table.with(Style::modern());
    println!("{table}");

    let latency = summary.latency.summary();
    let mut table = Table::new([LatencyRow {
        requests: latency.count,
        min_ms: millis(latency.min),
        avg_ms: millis(latency.mean),
        p50_ms: millis(latency.p50),
        p90_ms: millis(latency.p90),
        p95_ms: millis(latency.p95),
        p99_ms: millis(latency.p99),
        max_ms: millis(latency.max),
    }]);
    table.with(Style::modern());
    println!("{table}");

    let mut status_rows = summary
        .status_codes
        .iter()
        .map(|(status, count)| StatusRow {
            status: status.to_string(),
            count: *count,
        })
        .collect::<Vec<_>>();
    if summary.transport_failures > 0 {
        status_rows.push(StatusRow {
            status: "transport error".to_string(),
            count: summary.transport_failures,
        });
    }
    if !status_rows.is_empty() {
        let mut table = Table::new(status_rows);
        table.with(Style::modern());
        println!("{table}");
    }
}
