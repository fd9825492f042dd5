//! Inventory alert models

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ParseEnumError;

/// Condition that raised an alert
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowStock,
    Overstock,
    Expiring,
    Anomaly,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "LOW_STOCK",
            AlertType::Overstock => "OVERSTOCK",
            AlertType::Expiring => "EXPIRING",
            AlertType::Anomaly => "ANOMALY",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW_STOCK" => Ok(AlertType::LowStock),
            "OVERSTOCK" => Ok(AlertType::Overstock),
            "EXPIRING" => Ok(AlertType::Expiring),
            "ANOMALY" => Ok(AlertType::Anomaly),
            other => Err(ParseEnumError::new("alert type", other)),
        }
    }
}

/// Alert severity, ordered from most to least urgent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::High => "HIGH",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::Low => "LOW",
        }
    }

    /// Sort key: HIGH before MEDIUM before LOW
    pub fn rank(&self) -> u8 {
        match self {
            AlertSeverity::High => 0,
            AlertSeverity::Medium => 1,
            AlertSeverity::Low => 2,
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(AlertSeverity::High),
            "MEDIUM" => Ok(AlertSeverity::Medium),
            "LOW" => Ok(AlertSeverity::Low),
            other => Err(ParseEnumError::new("alert severity", other)),
        }
    }
}

/// A persisted alert.
///
/// Alerts are never deleted. Once `resolved` is true, `resolved_at` and
/// `resolved_by` are always set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub recommendation: String,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Last cycle that saw the triggering condition still present
    pub last_observed_at: DateTime<Utc>,
}

impl Alert {
    /// Mark the alert resolved; repeated calls overwrite resolver and time
    pub fn mark_resolved(&mut self, resolved_by: &str, at: DateTime<Utc>) {
        self.resolved = true;
        self.resolved_by = Some(resolved_by.to_string());
        self.resolved_at = Some(at);
    }
}

/// Alert content produced by the alert generator before persistence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAlert {
    pub product_id: Uuid,
    pub warehouse_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub recommendation: String,
}

impl NewAlert {
    pub fn into_alert(self, id: Uuid, created_at: DateTime<Utc>) -> Alert {
        Alert {
            id,
            product_id: self.product_id,
            warehouse_id: self.warehouse_id,
            alert_type: self.alert_type,
            severity: self.severity,
            message: self.message,
            recommendation: self.recommendation,
            resolved: false,
            resolved_at: None,
            resolved_by: None,
            created_at,
            last_observed_at: created_at,
        }
    }
}

/// Compact alert listing for dashboards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertSummary {
    pub id: Uuid,
    pub product_id: Uuid,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Alert> for AlertSummary {
    fn from(alert: &Alert) -> Self {
        Self {
            id: alert.id,
            product_id: alert.product_id,
            alert_type: alert.alert_type,
            severity: alert.severity,
            message: alert.message.clone(),
            created_at: alert.created_at,
        }
    }
}
