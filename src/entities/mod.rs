//! Intake record types
//!
//! The record is collected in three steps, each validated on its own:
//!
//! - [`Reception`] - complainant and receipt details
//! - [`Officer`] - investigating officer and case references
//! - [`SealList`] - seals, each with proof images and optional [`Sample`]s
//!
//! [`IntakeDraft`] is the editable, not-yet-valid form of the whole record;
//! [`IntakeRecord`] is what a successful final submit produces.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

pub mod officer;
pub mod reception;
pub mod record;
pub mod seal;

pub use officer::Officer;
pub use reception::{CustomerTitle, Reception, Sex};
pub use record::{DraftError, IntakeDraft, IntakeRecord};
pub use seal::{ImageFile, ItemId, Sample, Seal, SealList};

/// One page of the intake wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Reception,
    Officer,
    Seals,
}

impl Step {
    /// Position of the step in the wizard, starting at 1
    pub fn number(&self) -> u8 {
        match self {
            Step::Reception => 1,
            Step::Officer => 2,
            Step::Seals => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Reception => "reception",
            Step::Officer => "officer",
            Step::Seals => "seals",
        }
    }

    pub fn all() -> &'static [Step] {
        &[Step::Reception, Step::Officer, Step::Seals]
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} ({})", self.number(), self.as_str())
    }
}

/// Validated output type of a step
pub trait StepForm: Serialize + DeserializeOwned {
    /// The step whose schema produces this type
    const STEP: Step;
}
