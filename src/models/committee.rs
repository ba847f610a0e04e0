//! Committee composition (reference data, independent of bills)

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A parliamentarian's seat in a committee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeMember {
    pub id: i32,
    /// Presidente, Vice-presidente, ...
    pub role: Option<String>,
    pub parliamentarian_id: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    /// Titular or suplente
    pub seat: Option<String>,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub committee_code: String,
    /// "camara" or "senado" as published by the source
    pub chamber: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCommitteeMember {
    pub role: Option<String>,
    pub parliamentarian_id: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    pub seat: Option<String>,
    pub name: Option<String>,
    pub photo: Option<String>,
    #[validate(length(min = 1, message = "Committee code is required"))]
    pub committee_code: String,
    #[validate(length(min = 1, message = "Chamber is required"))]
    pub chamber: String,
}

impl NewCommitteeMember {
    pub fn into_member(self, id: i32) -> CommitteeMember {
        CommitteeMember {
            id,
            role: self.role,
            parliamentarian_id: self.parliamentarian_id,
            party: self.party,
            state: self.state,
            seat: self.seat,
            name: self.name,
            photo: self.photo,
            committee_code: self.committee_code,
            chamber: self.chamber,
        }
    }
}
