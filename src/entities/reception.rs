//! Reception step: complainant and receipt details

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entities::{Step, StepForm};

/// Honorific of the complainant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerTitle {
    Mr,
    Ms,
    Mrs,
}

impl CustomerTitle {
    /// Wire values accepted for the title field
    pub const VALUES: &'static [&'static str] = &["Mr", "Ms", "Mrs"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerTitle::Mr => "Mr",
            CustomerTitle::Ms => "Ms",
            CustomerTitle::Mrs => "Mrs",
        }
    }
}

impl fmt::Display for CustomerTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerTitle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mr" => Ok(CustomerTitle::Mr),
            "Ms" => Ok(CustomerTitle::Ms),
            "Mrs" => Ok(CustomerTitle::Mrs),
            _ => Err(format!("Unknown customer title: {}", s)),
        }
    }
}

/// Sex of the complainant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Wire values accepted for the sex field
    pub const VALUES: &'static [&'static str] = &["Male", "Female"];
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Sex::Male),
            "Female" => Ok(Sex::Female),
            _ => Err(format!("Unknown sex: {}", s)),
        }
    }
}

/// Validated reception details
///
/// Optional text fields keep the distinction between absent (`None`) and
/// explicitly left blank (`Some("")`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    /// Date the evidence was received, `YYYY-MM-DD`
    pub date_received: String,

    /// Time slot the evidence was received, `HH:MM:00`
    pub time_received: String,

    pub customer_title: CustomerTitle,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Date of birth, `DD/MM/YYYY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    /// `Male`, `Female` or blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
}

impl Reception {
    /// Typed sex, `None` when absent or blank
    pub fn sex(&self) -> Option<Sex> {
        self.sex.as_deref().and_then(|s| s.parse().ok())
    }
}

impl StepForm for Reception {
    const STEP: Step = Step::Reception;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reception_uses_camel_case_keys() {
        let reception = Reception {
            date_received: "2024-03-01".to_string(),
            time_received: "10:15:00".to_string(),
            customer_title: CustomerTitle::Mrs,
            customer_name: Some(String::new()),
            first_name: None,
            date_of_birth: Some("01/02/1980".to_string()),
            sex: Some("Female".to_string()),
        };

        let value = serde_json::to_value(&reception).unwrap();
        assert_eq!(
            value,
            json!({
                "dateReceived": "2024-03-01",
                "timeReceived": "10:15:00",
                "customerTitle": "Mrs",
                "customerName": "",
                "dateOfBirth": "01/02/1980",
                "sex": "Female"
            })
        );
        assert_eq!(reception.sex(), Some(Sex::Female));
    }

    #[test]
    fn test_blank_sex_is_none() {
        let reception: Reception = serde_json::from_value(json!({
            "dateReceived": "2024-03-01",
            "timeReceived": "10:15:00",
            "customerTitle": "Mr",
            "sex": ""
        }))
        .unwrap();
        assert_eq!(reception.sex.as_deref(), Some(""));
        assert_eq!(reception.sex(), None);
    }

    #[test]
    fn test_title_parse() {
        assert_eq!("Ms".parse::<CustomerTitle>(), Ok(CustomerTitle::Ms));
        assert!("".parse::<CustomerTitle>().is_err());
        assert!("Dr".parse::<CustomerTitle>().is_err());
    }
}
