//! Health and readiness reporting.
//!
//! Pass-through over the broker connectivity collaborator: the service
//! itself holds no resources, so the only thing worth probing is whether
//! the queue proxy is reachable.

use serde::{Deserialize, Serialize};
use video_mapper_broker::ConnectivityCheck;

/// One health check outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Whether the check passed
    pub ok: bool,
    /// Check output (error description when failed)
    pub output: String,
}

/// Aggregate health report returned by `GET /__health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Service name
    pub name: String,
    /// Overall status: true only when every check passed
    pub ok: bool,
    /// Individual check outcomes
    pub checks: Vec<CheckResult>,
}

/// Run the connectivity check and build the aggregate report.
pub fn health_report(connectivity: &dyn ConnectivityCheck) -> HealthReport {
    let result = match connectivity.check() {
        Ok(()) => CheckResult {
            name: connectivity.name().to_string(),
            ok: true,
            output: "OK".to_string(),
        },
        Err(output) => CheckResult {
            name: connectivity.name().to_string(),
            ok: false,
            output,
        },
    };

    HealthReport {
        name: "video-mapper".to_string(),
        ok: result.ok,
        checks: vec![result],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubCheck(Result<(), String>);

    impl ConnectivityCheck for StubCheck {
        fn name(&self) -> &str {
            "stub check"
        }

        fn check(&self) -> Result<(), String> {
            self.0.clone()
        }
    }

    #[test]
    fn test_report_ok_when_check_passes() {
        let report = health_report(&StubCheck(Ok(())));
        assert!(report.ok);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].name, "stub check");
        assert_eq!(report.checks[0].output, "OK");
    }

    #[test]
    fn test_report_carries_failure_output() {
        let report = health_report(&StubCheck(Err("connection refused".to_string())));
        assert!(!report.ok);
        assert!(!report.checks[0].ok);
        assert_eq!(report.checks[0].output, "connection refused");
    }
}
