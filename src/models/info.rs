//! Free-form named values (last update time, data source versions...)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub id: i32,
    pub name: String,
    pub value: serde_json::Value,
}
