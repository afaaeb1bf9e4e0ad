//! Investigating officer step

use serde::{Deserialize, Serialize};

use crate::entities::{Step, StepForm};

/// Validated details of the judicial police officer (OPJ) in charge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    /// Officer name (required)
    pub name_opj: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_police: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opj_grade: Option<String>,

    /// Police report (procès-verbal) number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,

    /// Court (tribunal de grande instance) the case belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tgi_of: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magistrate_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magistrate_grade: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prosecutor_office_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justice_identifier: Option<String>,
}

impl StepForm for Officer {
    const STEP: Step = Step::Officer;
}
