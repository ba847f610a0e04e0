//! Amendments (emendas) proposed to a stage

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amendment {
    pub id: i32,
    pub stage_id: i32,
    pub presented_on: NaiveDate,
    pub venue: String,
    pub author: String,
    /// Link to the full-text document (usually a PDF)
    pub full_text_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAmendment {
    pub stage_id: i32,
    pub presented_on: NaiveDate,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub author: String,
    pub full_text_link: Option<String>,
}

impl NewAmendment {
    pub fn into_amendment(self, id: i32) -> Amendment {
        Amendment {
            id,
            stage_id: self.stage_id,
            presented_on: self.presented_on,
            venue: self.venue,
            author: self.author,
            full_text_link: self.full_text_link,
        }
    }
}
