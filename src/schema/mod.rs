//! Schema system - declarative step schemas, validation and the wizard

pub mod path;
pub mod rules;
pub mod steps;
pub mod validator;
pub mod wizard;

pub use path::FieldPath;
pub use rules::{ErrorKind, Field, ObjectSchema};
pub use steps::schema_for;
pub use validator::{
    validate_record, validate_step1, validate_step2, validate_step3, FieldError, StepError,
    ValidationReport,
};
pub use wizard::IntakeWizard;
