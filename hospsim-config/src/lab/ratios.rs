use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

pub const MAX_TOTAL_RATIO: f64 = 100.0;

/// Share (percent) of all patients that belong to one special type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientTypeRatio {
    pub special_type_id: String,
    pub ratio: f64,
}

/// Ratios of the special patient types; ordinary patients make up the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRatios {
    entries: Vec<PatientTypeRatio>,
}

impl PatientRatios {
    pub fn entries(&self) -> &[PatientTypeRatio] {
        &self.entries
    }

    pub fn ratio_of(&self, special_type_id: &str) -> f64 {
        self.entries
            .iter()
            .find(|e| e.special_type_id == special_type_id)
            .map_or(0.0, |e| e.ratio)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.ratio).sum()
    }

    /// Percentage left for ordinary patients
    pub fn ordinary_share(&self) -> f64 {
        (MAX_TOTAL_RATIO - self.total()).max(0.0)
    }

    /// Sets one type's ratio. Refused when the special types would exceed 100% together,
    /// in which case nothing changes.
    pub fn set_ratio(&mut self, special_type_id: &str, ratio: f64) -> Result<()> {
        if !(0.0..=MAX_TOTAL_RATIO).contains(&ratio) {
            return Err(ConfigError::validation("比例应在0-100之间"));
        }

        let others: f64 = self
            .entries
            .iter()
            .filter(|e| e.special_type_id != special_type_id)
            .map(|e| e.ratio)
            .sum();
        if others + ratio > MAX_TOTAL_RATIO {
            return Err(ConfigError::validation("特殊类型比例总和不能超过100%"));
        }

        match self.entries.iter_mut().find(|e| e.special_type_id == special_type_id) {
            Some(entry) => entry.ratio = ratio,
            None => self.entries.push(PatientTypeRatio {
                special_type_id: special_type_id.to_string(),
                ratio,
            }),
        }
        Ok(())
    }

    /// Drops ratios of types that no longer exist
    pub fn retain_types(&mut self, type_ids: &[String]) {
        self.entries.retain(|e| type_ids.contains(&e.special_type_id));
    }
}
