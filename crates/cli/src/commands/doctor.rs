use shelfhook_core::catalog::loader::CatalogLoader;
use shelfhook_core::config::{AppConfig, LoadOptions};
use shelfhook_storage::catalog_loader;
use serde::Serialize;

use crate::commands::CommandResult;

/// Exit code when any readiness check does not pass.
pub const CHECK_FAILED_EXIT_CODE: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    run_with_options(json_output, LoadOptions::default())
}

pub fn run_with_options(json_output: bool, options: LoadOptions) -> CommandResult {
    let report = build_report(options);
    let exit_code =
        if report.overall_status == CheckStatus::Pass { 0 } else { CHECK_FAILED_EXIT_CODE };

    if json_output {
        return match serde_json::to_string_pretty(&report) {
            Ok(output) => CommandResult { exit_code, output },
            Err(error) => CommandResult {
                exit_code: CHECK_FAILED_EXIT_CODE,
                output: format!(
                    "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                    escape_json(&error.to_string())
                ),
            },
        };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog_reachability(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "catalog_reachability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog_reachability(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "catalog_reachability",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let location = config.catalog.location();
    let result = runtime.block_on(async {
        let loader = catalog_loader(&config.catalog)
            .map_err(|error| format!("failed to build storage client: {error}"))?;
        loader.load(&location).await.map_err(|error| error.to_string())
    });

    match result {
        Ok(catalog) => DoctorCheck {
            name: "catalog_reachability",
            status: CheckStatus::Pass,
            details: format!(
                "loaded `{location}` via {:?} backend ({} stores)",
                config.catalog.backend,
                catalog.len()
            ),
        },
        Err(error) => {
            DoctorCheck { name: "catalog_reachability", status: CheckStatus::Fail, details: error }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
