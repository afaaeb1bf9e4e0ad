//! Declarative schemas of the three intake steps

use std::sync::LazyLock;

use crate::entities::reception::{CustomerTitle, Sex};
use crate::entities::Step;
use crate::schema::rules::{
    Field, Items, ObjectSchema, DAY_FIRST_DATE, INVALID_INPUT, ISO_DATE, TIME_OF_DAY,
};

/// Step 1: complainant and reception details
pub static RECEPTION_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(|| {
    ObjectSchema::new(vec![
        Field::required_text("dateReceived", "Date received is required")
            .pattern(&ISO_DATE, "Invalid date format"),
        Field::required_text("timeReceived", "Time received is required")
            .pattern(&TIME_OF_DAY, "Invalid time format")
            .time_slot("Invalid time format"),
        // "" is a well-typed value here but is still refused as missing.
        Field::required_text("customerTitle", "Customer title is required")
            .one_of(CustomerTitle::VALUES, INVALID_INPUT),
        Field::optional_text("customerName")
            .max_chars(100, "Customer name must be less than 100 characters"),
        Field::optional_text("firstName")
            .max_chars(100, "First name must be less than 100 characters"),
        Field::optional_text("dateOfBirth")
            .pattern(&DAY_FIRST_DATE, "Invalid date format (DD/MM/YYYY)"),
        Field::optional_text("sex").one_of(Sex::VALUES, INVALID_INPUT),
    ])
});

/// Step 2: investigating officer
pub static OFFICER_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(|| {
    ObjectSchema::new(vec![
        Field::required_text("nameOpj", "OPJ name is required"),
        Field::optional_text("servicePolice")
            .max_chars(100, "Service police must be less than 100 characters"),
        Field::optional_text("opjGrade").max_chars(50, "OPJ grade must be less than 50 characters"),
        Field::optional_text("pvNumber").max_chars(50, "PV number must be less than 50 characters"),
        Field::optional_text("nationality"),
        Field::optional_text("tgiOf"),
        Field::optional_text("magistrateName"),
        Field::optional_text("magistrateGrade"),
        Field::optional_text("prosecutorOfficeNumber")
            .max_chars(50, "Prosecutor office number must be less than 50 characters"),
        Field::optional_text("instructionNumber")
            .max_chars(50, "Instruction number must be less than 50 characters"),
        Field::optional_text("justiceIdentifier")
            .max_chars(50, "Justice identifier must be less than 50 characters"),
    ])
});

fn sample_schema() -> ObjectSchema {
    ObjectSchema::new(vec![
        Field::number("id"),
        Field::required_text("date", "Sample date is required")
            .pattern(&ISO_DATE, "Invalid date format"),
        Field::required_text("time", "Sample time is required")
            .pattern(&TIME_OF_DAY, "Invalid time format")
            .time_slot("Invalid time format"),
        Field::required_text("description", "Description is required"),
        Field::optional_text("analysis"),
    ])
}

fn seal_schema() -> ObjectSchema {
    ObjectSchema::new(vec![
        Field::number("id"),
        Field::required_text("receptionDate", "Reception date is required")
            .pattern(&ISO_DATE, "Invalid date format"),
        Field::required_text("sealState", "Seal state is required"),
        Field::list("images", Items::Files).min_items(1, "At least one image is required"),
        Field::optional_list("samples", Items::Objects(sample_schema())),
    ])
}

/// Step 3: seals with their images and samples
pub static SEALS_SCHEMA: LazyLock<ObjectSchema> = LazyLock::new(|| {
    ObjectSchema::new(vec![Field::list("seals", Items::Objects(seal_schema()))
        .min_items(1, "At least one seal is required")])
});

/// Schema of a step
pub fn schema_for(step: Step) -> &'static ObjectSchema {
    match step {
        Step::Reception => &*RECEPTION_SCHEMA,
        Step::Officer => &*OFFICER_SCHEMA,
        Step::Seals => &*SEALS_SCHEMA,
    }
}
