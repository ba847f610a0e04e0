//! Stage models
//!
//! A stage is one chamber's leg of a bill: a proposição identified by its
//! type, number and year inside the Câmara or the Senado.

use crate::error::{validation_error, AppError};
use crate::links;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Legislative chamber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Camara,
    Senado,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::Camara, Chamber::Senado];

    /// Code stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Chamber::Camara => "camara",
            Chamber::Senado => "senado",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chamber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camara" => Ok(Chamber::Camara),
            "senado" => Ok(Chamber::Senado),
            other => Err(AppError::UnknownChamber(other.to_string())),
        }
    }
}

/// Regime de tramitação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Ordinario,
    Prioridade,
    Urgencia,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Ordinario => "ordinario",
            Regime::Prioridade => "prioridade",
            Regime::Urgencia => "urgencia",
        }
    }
}

impl FromStr for Regime {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ordinario" => Ok(Regime::Ordinario),
            "prioridade" => Ok(Regime::Prioridade),
            "urgencia" => Ok(Regime::Urgencia),
            other => Err(validation_error(format!("Unknown regime '{}'", other))),
        }
    }
}

/// Forma de apreciação: decided by committees alone or by the floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppreciationForm {
    Conclusiva,
    Plenario,
}

impl AppreciationForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppreciationForm::Conclusiva => "conclusiva",
            AppreciationForm::Plenario => "plenario",
        }
    }
}

impl FromStr for AppreciationForm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conclusiva" => Ok(AppreciationForm::Conclusiva),
            "plenario" => Ok(AppreciationForm::Plenario),
            other => Err(validation_error(format!(
                "Unknown appreciation form '{}'",
                other
            ))),
        }
    }
}

/// Stored stage record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: i32,
    /// Id of the proposição in the chamber's own system
    pub external_id: i32,
    /// Owning bill; empty only while a stage is being re-linked
    pub bill_id: Option<i32>,
    pub number: i32,
    /// PL, PLS, PEC...
    pub type_code: String,
    pub presented_on: NaiveDate,
    pub chamber: Chamber,
    pub regime: Option<Regime>,
    pub appreciation: Option<AppreciationForm>,
    pub summary: String,
    pub justification: String,
    pub keywords: String,
    pub author_name: String,
    pub rapporteur_name: String,
    pub origin_chamber: String,
    /// Cached temperature of the latest week
    pub temperature: Option<f64>,
    pub on_agenda: Option<bool>,
    pub nickname: Option<String>,
    pub theme: Option<String>,
}

impl Stage {
    /// Year the proposição was presented
    pub fn year(&self) -> i32 {
        self.presented_on.year()
    }

    /// Short label, e.g. `PL 400/2010`
    pub fn label(&self) -> String {
        format!("{} {}/{}", self.type_code, self.number, self.year())
    }

    /// Page of this proposição on its chamber's website
    pub fn url(&self) -> String {
        links::chamber_url(self.chamber, self.external_id)
    }
}

/// Insert payload for a stage
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStage {
    pub external_id: i32,
    pub bill_id: Option<i32>,
    pub number: i32,
    #[validate(length(min = 1, max = 3, message = "Type code must be between 1 and 3 characters"))]
    pub type_code: String,
    pub presented_on: NaiveDate,
    pub chamber: Chamber,
    pub regime: Option<Regime>,
    pub appreciation: Option<AppreciationForm>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub rapporteur_name: String,
    #[serde(default)]
    pub origin_chamber: String,
    pub temperature: Option<f64>,
    pub on_agenda: Option<bool>,
    pub nickname: Option<String>,
    #[validate(length(max = 40, message = "Theme must be at most 40 characters"))]
    pub theme: Option<String>,
}

impl NewStage {
    /// Minimal payload; descriptive fields start empty
    pub fn new(
        external_id: i32,
        chamber: Chamber,
        type_code: impl Into<String>,
        number: i32,
        presented_on: NaiveDate,
    ) -> Self {
        Self {
            external_id,
            bill_id: None,
            number,
            type_code: type_code.into(),
            presented_on,
            chamber,
            regime: None,
            appreciation: None,
            summary: String::new(),
            justification: String::new(),
            keywords: String::new(),
            author_name: String::new(),
            rapporteur_name: String::new(),
            origin_chamber: String::new(),
            temperature: None,
            on_agenda: None,
            nickname: None,
            theme: None,
        }
    }

    pub fn for_bill(mut self, bill_id: i32) -> Self {
        self.bill_id = Some(bill_id);
        self
    }

    pub fn into_stage(self, id: i32) -> Stage {
        Stage {
            id,
            external_id: self.external_id,
            bill_id: self.bill_id,
            number: self.number,
            type_code: self.type_code,
            presented_on: self.presented_on,
            chamber: self.chamber,
            regime: self.regime,
            appreciation: self.appreciation,
            summary: self.summary,
            justification: self.justification,
            keywords: self.keywords,
            author_name: self.author_name,
            rapporteur_name: self.rapporteur_name,
            origin_chamber: self.origin_chamber,
            temperature: self.temperature,
            on_agenda: self.on_agenda,
            nickname: self.nickname,
            theme: self.theme,
        }
    }
}
