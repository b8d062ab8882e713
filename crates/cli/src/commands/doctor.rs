use catalog_admin_client::HttpCatalogService;
use catalog_admin_core::config::{AppConfig, LoadOptions};
use catalog_admin_core::service::LookupService;
use catalog_admin_core::session::{FileSessionStore, SessionStore};
use serde::Serialize;

use super::CommandResult;

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

pub async fn run(options: &LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options).await;
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

async fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_session_file(&config));
            checks.push(check_api_reachability(&config).await);
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["session_file", "api_reachability"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
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

fn check_session_file(config: &AppConfig) -> DoctorCheck {
    let store = FileSessionStore::new(&config.session.path);
    let (status, details) = match store.load() {
        Ok(Some(session)) => (
            CheckStatus::Pass,
            format!("signed in as {} (`{}`)", session.display_name(), store.path().display()),
        ),
        Ok(None) => (
            CheckStatus::Pass,
            format!("no owner signed in (`{}`)", store.path().display()),
        ),
        Err(error) => (CheckStatus::Fail, error.to_string()),
    };
    DoctorCheck { name: "session_file", status, details }
}

async fn check_api_reachability(config: &AppConfig) -> DoctorCheck {
    let result = match HttpCatalogService::new(&config.api) {
        Ok(service) => service.list_brands().await.map(|brands| brands.len()),
        Err(error) => Err(error),
    };

    match result {
        Ok(count) => DoctorCheck {
            name: "api_reachability",
            status: CheckStatus::Pass,
            details: format!("reached `{}` ({count} brands)", config.api.base_url),
        },
        Err(error) => DoctorCheck {
            name: "api_reachability",
            status: CheckStatus::Fail,
            details: format!("could not reach `{}`: {error}", config.api.base_url),
        },
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
