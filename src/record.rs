//! Provider record model

use std::fmt;

/// Placeholder for absent list fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Marker rendered for remote-only providers
pub const TELEMEDICINE: &str = "Telemedicine";

/// Output column order
pub const COLUMNS: [&str; 7] = [
    "Name",
    "Service Type",
    "Medical Group",
    "Phone",
    "Gender",
    "Languages Spoken",
    "Specialties",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the provider sees patients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceType {
    Telemedicine,
    /// Whitespace-collapsed postal address
    Address(String),
    /// Header block was empty or held no address lines
    Unknown,
}

impl ServiceType {
    pub fn as_str(&self) -> &str {
        match self {
            ServiceType::Telemedicine => TELEMEDICINE,
            ServiceType::Address(address) => address,
            ServiceType::Unknown => "",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider entry pulled out of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRecord {
    pub name: String,
    pub service_type: ServiceType,
    pub medical_group: String,
    /// `(NNN) NNN-NNNN`
    pub phone: String,
    pub gender: Gender,
    pub languages: Vec<String>,
    pub specialties: Vec<String>,
}

impl ProviderRecord {
    /// Languages joined with `" & "`, or `N/A`
    pub fn languages_spoken(&self) -> String {
        join_or_na(&self.languages, " & ")
    }

    /// Specialties joined with `" - "`, or `N/A`
    pub fn specialties_text(&self) -> String {
        join_or_na(&self.specialties, " - ")
    }

    /// Row values in [`COLUMNS`] order
    pub fn to_row(&self) -> [String; 7] {
        [
            self.name.clone(),
            self.service_type.to_string(),
            self.medical_group.clone(),
            self.phone.clone(),
            self.gender.to_string(),
            self.languages_spoken(),
            self.specialties_text(),
        ]
    }
}

fn join_or_na(values: &[String], separator: &str) -> String {
    if values.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        values.join(separator)
    }
}
