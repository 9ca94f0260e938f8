use flack_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use serde::Serialize;

use super::{CommandResult, CHECK_FAILURE_EXIT_CODE};

const ENDPOINTS: [&str; 3] = ["webhook", "command", "action"];
const HEALTH_PATH: &str = "/health";

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
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { CHECK_FAILURE_EXIT_CODE };

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

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_token_readiness(&config));
            checks.push(check_endpoint_layout(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["token_readiness", "endpoint_layout"] {
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

// Slack compares the token byte for byte; stray whitespace from a copy/paste
// makes every request fail silently.
fn check_token_readiness(config: &AppConfig) -> DoctorCheck {
    let token = config.flack.token.expose_secret();

    if token.trim() != token {
        return DoctorCheck {
            name: "token_readiness",
            status: CheckStatus::Fail,
            details: "verification token has leading or trailing whitespace".to_string(),
        };
    }

    DoctorCheck {
        name: "token_readiness",
        status: CheckStatus::Pass,
        details: format!("verification token configured ({} characters)", token.chars().count()),
    }
}

fn check_endpoint_layout(config: &AppConfig) -> DoctorCheck {
    let prefix = config.flack.normalized_prefix();
    let endpoints: Vec<String> =
        ENDPOINTS.iter().map(|endpoint| format!("POST {prefix}/{endpoint}")).collect();

    if prefix == HEALTH_PATH {
        return DoctorCheck {
            name: "endpoint_layout",
            status: CheckStatus::Fail,
            details: format!("url prefix `{prefix}` collides with the health endpoint"),
        };
    }

    DoctorCheck {
        name: "endpoint_layout",
        status: CheckStatus::Pass,
        details: format!(
            "{} on {}:{}",
            endpoints.join(", "),
            config.server.bind_address,
            config.server.port
        ),
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
