//! Server-computed analytics, consumed read-only.
//!
//! None of this is derived locally; the server owns the scoring.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::timestamp;

/// A child's current resilience estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulationBattery {
    /// 0-100.
    pub level: u8,
    /// "High", "Moderate", "Low" or "Critical".
    pub status: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub drains: Vec<String>,
    pub recommendation: String,
}

/// A request the child made that was denied, delayed, or left unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenLoop {
    pub id: i64,
    pub request_object: String,
    pub status: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    pub time_elapsed_minutes: i64,
    pub risk_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcStat {
    pub label: String,
    pub count: u32,
    pub percentage: f64,
}

/// Antecedent-behavior-consequence statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcAnalysis {
    #[serde(default)]
    pub top_triggers: Vec<AbcStat>,
    #[serde(default)]
    pub effective_interventions: Vec<AbcStat>,
    pub total_incidents: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// "correlation", "pattern" or "alert".
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub confidence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actionable_tip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_meals: u32,
    pub total_sleep_hours: f64,
    pub avg_sleep_quality: f64,
    pub total_incidents: u32,
    pub regulation_battery: RegulationBattery,
    #[serde(default)]
    pub open_loops: Vec<OpenLoop>,
    pub abc_analysis: AbcAnalysis,
    #[serde(default)]
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Low,
    Medium,
    High,
}

impl AlertLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Shift-change summary produced by the AI endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffSummary {
    pub summary: Vec<String>,
    pub alert_level: AlertLevel,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Result of submitting a free-text log for AI extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceLogResponse {
    pub success: bool,
    #[serde(default)]
    pub processed_types: Vec<String>,
    pub message: String,
}
