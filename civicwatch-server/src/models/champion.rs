use serde::{Deserialize, Serialize};

/// A verified community volunteer who reviews citizen reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Champion {
    pub id: String,
    pub name: String,
    pub state: String,
    pub lga: String,
    pub verified_reports: u32,
}
