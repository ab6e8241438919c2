use serde::Serialize;

use super::LoadProfile;

/// Summary returned once an invocation ran to its deadline.
///
/// Echoes the effective profile, not what was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub ok: bool,
    pub seconds: u64,
    pub workers: usize,
    #[serde(rename = "memMB")]
    pub mem_mb: usize,
    pub io: bool,
    pub host: String,
}

impl LoadReport {
    pub fn completed(profile: &LoadProfile, host: impl Into<String>) -> Self {
        Self {
            ok: true,
            seconds: profile.duration_secs(),
            workers: profile.worker_count(),
            mem_mb: profile.memory_mb(),
            io: profile.io_enabled(),
            host: host.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoadParams;

    #[test]
    fn test_report_serializes_wire_names() {
        let params = LoadParams {
            duration: Some("2".into()),
            workers: Some("2".into()),
            mem_mb: Some("0".into()),
            io: Some("0".into()),
        };
        let profile = LoadProfile::resolve(&params, 4);
        let json = serde_json::to_value(LoadReport::completed(&profile, "node-a")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "ok": true,
                "seconds": 2,
                "workers": 2,
                "memMB": 0,
                "io": false,
                "host": "node-a",
            })
        );
    }
}
