use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::checklist::Checklist;

#[derive(Debug, FromRow, Serialize)]
pub struct Office {
    pub id: Uuid,
    pub office_name: String,
    pub department: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub total_employees: Option<i32>,
    pub checklist: Json<Checklist>,
    pub completion_percent: i32,
    pub certification_tier: String,
    pub certificate_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The writable fields of an office record. Used for creation as-is and as
/// the merged draft during updates; score and tier are never part of it,
/// they are always recomputed from the checklist.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOffice {
    pub office_name: String,
    pub department: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub total_employees: Option<i32>,
    #[serde(default)]
    pub checklist: Checklist,
    pub certificate_date: Option<String>,
    pub notes: Option<String>,
}

/// Partial update payload: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficeUpdate {
    pub office_name: Option<String>,
    pub department: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub total_employees: Option<i32>,
    pub checklist: Option<Checklist>,
    pub certificate_date: Option<String>,
    pub notes: Option<String>,
}
