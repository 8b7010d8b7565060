//! Dog profile record.
//!
//! # Responsibility
//! - Hold the singleton descriptive record about the tracked dog.
//! - Expose the recurring-care dates consumed by the reminder calculator.
//!
//! # Invariants
//! - At most one profile exists; saving replaces it wholesale.
//! - Blank or malformed dates decode to `None`.

use crate::model::lenient::{self, WireKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl WireKey for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn key(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as WireKey>::from_key(value)
    }

    pub fn key(self) -> &'static str {
        <Self as WireKey>::key(self)
    }
}

/// Singleton profile of the tracked dog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional_date")]
    pub birthdate: Option<NaiveDate>,
    /// Kilograms.
    #[serde(deserialize_with = "lenient::optional_number")]
    pub weight: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    pub breed: String,
    #[serde(deserialize_with = "lenient::optional_key")]
    pub gender: Option<Gender>,
    #[serde(deserialize_with = "lenient::text")]
    pub color: String,
    #[serde(deserialize_with = "lenient::text")]
    pub microchip: String,

    #[serde(deserialize_with = "lenient::text")]
    pub chronic_diseases: String,
    #[serde(deserialize_with = "lenient::text")]
    pub food_allergies: String,
    #[serde(deserialize_with = "lenient::text")]
    pub medicine_allergies: String,
    #[serde(deserialize_with = "lenient::text")]
    pub current_medicine: String,
    #[serde(deserialize_with = "lenient::text")]
    pub surgeries: String,

    #[serde(deserialize_with = "lenient::text")]
    pub vet_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub vet_phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub vet_email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub vet_address: String,

    #[serde(deserialize_with = "lenient::optional_date")]
    pub last_vaccination: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::optional_date")]
    pub next_vaccination: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::optional_date")]
    pub last_antiparasitic: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::optional_date")]
    pub next_antiparasitic: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::optional_date")]
    pub last_flea_tick: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::optional_date")]
    pub next_flea_tick: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::text")]
    pub vaccination_notes: String,
    #[serde(deserialize_with = "lenient::text")]
    pub general_notes: String,
}

/// Next due dates for recurring care actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CareSchedule {
    pub next_vaccination: Option<NaiveDate>,
    pub next_antiparasitic: Option<NaiveDate>,
    pub next_flea_tick: Option<NaiveDate>,
}

impl Profile {
    /// Returns the profile name, or `None` when it was never filled in.
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn care_schedule(&self) -> CareSchedule {
        CareSchedule {
            next_vaccination: self.next_vaccination,
            next_antiparasitic: self.next_antiparasitic,
            next_flea_tick: self.next_flea_tick,
        }
    }

    /// Trims every free-text field in place.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.name,
            &mut self.breed,
            &mut self.color,
            &mut self.microchip,
            &mut self.chronic_diseases,
            &mut self.food_allergies,
            &mut self.medicine_allergies,
            &mut self.current_medicine,
            &mut self.surgeries,
            &mut self.vet_name,
            &mut self.vet_phone,
            &mut self.vet_email,
            &mut self.vet_address,
            &mut self.vaccination_notes,
            &mut self.general_notes,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
        self.weight = self.weight.filter(|kg| kg.is_finite());
    }
}
