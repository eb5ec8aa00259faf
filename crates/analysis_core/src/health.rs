use std::collections::BTreeMap;

/// Sequence number tagged onto every issued health probe.
pub type ProbeSeq = u64;

/// Classified availability of the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HealthLevel {
    /// Initial state, before any probe has resolved.
    #[default]
    Checking,
    Healthy,
    Degraded,
    Offline,
}

impl HealthLevel {
    /// Parses the `status` string reported by the health endpoint.
    ///
    /// Values this client does not know about fall back to `Checking`, which
    /// renders with the neutral appearance.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "healthy" => HealthLevel::Healthy,
            "degraded" => HealthLevel::Degraded,
            "offline" => HealthLevel::Offline,
            _ => HealthLevel::Checking,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthLevel::Checking => "checking",
            HealthLevel::Healthy => "healthy",
            HealthLevel::Degraded => "degraded",
            HealthLevel::Offline => "offline",
        }
    }
}

/// Result of the most recently applied probe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthStatus {
    pub level: HealthLevel,
    /// Per-subsystem status strings, e.g. `api` or `ga_binary`.
    pub components: BTreeMap<String, String>,
}

impl HealthStatus {
    pub fn checking() -> Self {
        Self::default()
    }

    pub fn offline() -> Self {
        Self {
            level: HealthLevel::Offline,
            components: BTreeMap::new(),
        }
    }

    /// Builds a status from a successfully parsed probe payload.
    ///
    /// Components are only meaningful for a resolved, reachable backend, so
    /// they are dropped for `checking` and `offline`.
    pub fn from_report(raw_status: &str, components: BTreeMap<String, String>) -> Self {
        let level = HealthLevel::from_wire(raw_status);
        let components = match level {
            HealthLevel::Healthy | HealthLevel::Degraded => components,
            HealthLevel::Checking | HealthLevel::Offline => BTreeMap::new(),
        };
        Self { level, components }
    }

    /// Hover text for the status indicator.
    pub fn tooltip(&self) -> String {
        if self.level == HealthLevel::Healthy {
            let api = self.component_or_ok("api");
            let engine = self.component_or_ok("ga_binary");
            format!("API: {api}, GA: {engine}")
        } else {
            "Click to refresh".to_string()
        }
    }

    fn component_or_ok(&self, name: &str) -> &str {
        self.components
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .unwrap_or("ok")
    }
}

/// Presentation of a health level: indicator colour and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthBadge {
    /// `None` means the neutral outline colour of the host theme.
    pub color: Option<&'static str>,
    pub label: &'static str,
}

impl HealthBadge {
    pub fn for_level(level: HealthLevel) -> Self {
        match level {
            HealthLevel::Healthy => Self {
                color: Some("#4CAF50"),
                label: "Backend Online",
            },
            HealthLevel::Degraded => Self {
                color: Some("#FF9800"),
                label: "Degraded",
            },
            HealthLevel::Offline => Self {
                color: Some("#F44336"),
                label: "Offline",
            },
            HealthLevel::Checking => Self {
                color: None,
                label: "Checking...",
            },
        }
    }
}
