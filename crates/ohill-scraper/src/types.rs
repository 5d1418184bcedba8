use serde::{Deserialize, Serialize};

/// A meal window declared by the upstream menu, e.g. `Breakfast`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuPeriod {
    pub id: String,
    pub name: String,
}

/// Where a period's payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadSource {
    Api,
    Html,
}

impl std::fmt::Display for PayloadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadSource::Api => write!(f, "api"),
            PayloadSource::Html => write!(f, "html"),
        }
    }
}

/// Base-page facts that drive the per-period fetch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseModelInfo {
    /// Upstream `MM/DD/YYYY` date, empty when absent.
    pub date: String,
    pub location_id: Option<String>,
    pub selected_period_id: Option<String>,
    pub periods: Vec<MenuPeriod>,
}

impl BaseModelInfo {
    #[must_use]
    pub fn period_name(&self, id: &str) -> Option<&str> {
        self.periods
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }
}
