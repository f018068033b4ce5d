use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ReturnType};

pub const STUDENTS_TABLE: &str = "students";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_id: Option<i64>,
    pub s_name: String,
    pub s_subjects: Option<String>,
    pub s_age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_updated: Option<String>,
}

/// Configuration of the students model
pub fn students() -> ModelConfig {
    ModelConfig::new(STUDENTS_TABLE)
        .primary_key("s_id")
        .return_type(ReturnType::Object)
        .allowed_fields(["s_name", "s_subjects", "s_age"])
        .timestamps("s_date", "s_updated")
}
