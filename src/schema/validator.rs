//! Step validation with field-addressable error reporting
//!
//! Every step is validated the same way: declared fields in order, each
//! field's rule chain stopping at its first failure, collections checked for
//! their own minimum before each element is validated under an indexed path.
//! All errors of a step are collected; nothing stops at the first bad field.

use miette::Diagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::{IntakeRecord, Officer, Reception, SealList, Step, StepForm};
use crate::schema::path::FieldPath;
use crate::schema::rules::{
    is_file_like, json_type, ErrorKind, FieldKind, Items, ObjectSchema, Violation, NOT_A_FILE,
};
use crate::schema::steps::schema_for;

/// A single field-level failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic, Serialize)]
#[error("{path}: {message}")]
pub struct FieldError {
    /// Step whose schema reported the error
    pub step: Step,
    /// Address of the offending value, e.g. `seals[0].images`
    pub path: String,
    /// Human-readable message shown next to the field
    pub message: String,
    pub kind: ErrorKind,
}

impl FieldError {
    fn new(step: Step, path: &FieldPath, violation: Violation) -> Self {
        Self {
            step,
            path: path.to_string(),
            message: violation.message,
            kind: violation.kind,
        }
    }
}

/// All field errors found while validating a step or a whole record
#[derive(Debug, Error, Diagnostic)]
#[error("{scope} validation failed: {summary}")]
#[diagnostic(
    code(intake::schema::validation_error),
    help("Correct the listed fields and validate again")
)]
pub struct ValidationReport {
    scope: String,
    summary: String,

    #[related]
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new(scope: impl Into<String>, errors: Vec<FieldError>) -> Self {
        let count = errors.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            scope: scope.into(),
            summary,
            errors,
        }
    }

    /// Errors in the order they were found
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The error reported for a path, if any
    pub fn find(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path == path)
    }

    /// Errors of one step
    pub fn for_step(&self, step: Step) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.step == step)
    }

    /// One `path: message` line per error
    pub fn render(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Why a step (or the whole record) was rejected
#[derive(Debug, Error, Diagnostic)]
pub enum StepError {
    /// The input is not an object at all
    #[error("{scope} input must be an object, received {received}")]
    #[diagnostic(
        code(intake::schema::malformed),
        help("Provide the fields as a JSON object or YAML mapping")
    )]
    Malformed {
        scope: String,
        received: &'static str,
    },

    /// Field-level failures
    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ValidationReport),

    /// Input passed every rule but could not be converted to its typed form
    #[error("{scope} could not be decoded: {message}")]
    #[diagnostic(code(intake::schema::decode))]
    Decode { scope: String, message: String },
}

impl StepError {
    /// The validation report, when the failure is field-level
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            StepError::Invalid(report) => Some(report),
            _ => None,
        }
    }

    /// Field errors, empty for shape and decode failures
    pub fn field_errors(&self) -> &[FieldError] {
        self.report().map(ValidationReport::errors).unwrap_or_default()
    }
}

/// Collect every field error of a step without producing the typed value
pub fn check(step: Step, input: &Value) -> Result<Vec<FieldError>, StepError> {
    let map = input.as_object().ok_or_else(|| StepError::Malformed {
        scope: step.to_string(),
        received: json_type(input),
    })?;

    let mut errors = Vec::new();
    validate_object(step, schema_for(step), map, &FieldPath::root(), &mut errors);
    Ok(errors)
}

/// Validate a step and decode it into its normalized typed form
pub fn validate<T: StepForm>(input: &Value) -> Result<T, StepError> {
    let errors = check(T::STEP, input)?;
    if !errors.is_empty() {
        return Err(ValidationReport::new(T::STEP.to_string(), errors).into());
    }
    decode(&T::STEP.to_string(), input)
}

/// Validate the reception step
pub fn validate_step1(input: &Value) -> Result<Reception, StepError> {
    validate(input)
}

/// Validate the investigating officer step
pub fn validate_step2(input: &Value) -> Result<Officer, StepError> {
    validate(input)
}

/// Validate the seals step
pub fn validate_step3(input: &Value) -> Result<SealList, StepError> {
    validate(input)
}

/// Validate a whole record against all three step schemas
///
/// The record holds `reception` and `officer` objects and a top-level `seals`
/// list. A missing step object is validated as an empty one; each step is
/// checked whatever the outcome of the others, and errors are reported in
/// step order.
pub fn validate_record(input: &Value) -> Result<IntakeRecord, StepError> {
    let record = input.as_object().ok_or_else(|| StepError::Malformed {
        scope: "Record".to_string(),
        received: json_type(input),
    })?;

    let empty = Value::Object(Map::new());
    let mut errors = Vec::new();
    errors.extend(check(Step::Reception, record.get("reception").unwrap_or(&empty))?);
    errors.extend(check(Step::Officer, record.get("officer").unwrap_or(&empty))?);
    errors.extend(check(Step::Seals, input)?);

    if !errors.is_empty() {
        return Err(ValidationReport::new("Record", errors).into());
    }
    decode("Record", input)
}

fn decode<T: serde::de::DeserializeOwned>(scope: &str, input: &Value) -> Result<T, StepError> {
    serde_json::from_value(input.clone()).map_err(|e| StepError::Decode {
        scope: scope.to_string(),
        message: e.to_string(),
    })
}

/// Validate every declared field of an object, appending to `errors`
fn validate_object(
    step: Step,
    schema: &ObjectSchema,
    map: &Map<String, Value>,
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
) {
    for field in schema.fields() {
        let field_path = path.key(field.name);
        let value = map.get(field.name);

        let FieldKind::List { items, .. } = &field.kind else {
            if let Err(violation) = field.check(value) {
                errors.push(FieldError::new(step, &field_path, violation));
            }
            continue;
        };

        match field.check_list(value) {
            Ok(Some(elements)) => validate_items(step, items, elements, &field_path, errors),
            Ok(None) => {}
            Err(violation) => errors.push(FieldError::new(step, &field_path, violation)),
        }
    }
}

/// Validate each collection element under its indexed path
fn validate_items(
    step: Step,
    items: &Items,
    elements: &[Value],
    path: &FieldPath,
    errors: &mut Vec<FieldError>,
) {
    for (index, element) in elements.iter().enumerate() {
        let element_path = path.index(index);
        match items {
            Items::Files => {
                if !is_file_like(element) {
                    let violation = Violation::new(ErrorKind::Type, NOT_A_FILE);
                    errors.push(FieldError::new(step, &element_path, violation));
                }
            }
            Items::Objects(schema) => match element.as_object() {
                Some(map) => validate_object(step, schema, map, &element_path, errors),
                None => {
                    let violation = Violation::type_mismatch("object", element);
                    errors.push(FieldError::new(step, &element_path, violation));
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CustomerTitle;
    use serde_json::json;

    fn valid_step1() -> Value {
        json!({
            "dateReceived": "2024-03-01",
            "timeReceived": "09:15:00",
            "customerTitle": "Mr",
            "customerName": "Traoré",
            "firstName": "Moussa",
            "dateOfBirth": "14/07/1985",
            "sex": "Male"
        })
    }

    fn image(name: &str) -> Value {
        json!({"name": name, "type": "image/jpeg", "size": 20480})
    }

    fn sample(id: u64, description: &str) -> Value {
        json!({
            "id": id,
            "date": "2024-03-02",
            "time": "14:30:00",
            "description": description,
            "analysis": "DNA"
        })
    }

    fn seal(id: u64) -> Value {
        json!({
            "id": id,
            "receptionDate": "2024-03-01",
            "sealState": "Intact, wax unbroken",
            "images": [image("front.jpg")],
            "samples": [sample(id * 10 + 1, "Swab A"), sample(id * 10 + 2, "Swab B")]
        })
    }

    fn paths(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.path.as_str()).collect()
    }

    // ========================================================================
    // Step 1
    // ========================================================================

    #[test]
    fn test_valid_step1() {
        let reception = validate_step1(&valid_step1()).unwrap();
        assert_eq!(reception.customer_title, CustomerTitle::Mr);
        assert_eq!(reception.first_name.as_deref(), Some("Moussa"));
    }

    #[test]
    fn test_step1_optional_fields_blank_or_absent() {
        let input = json!({
            "dateReceived": "2024-03-01",
            "timeReceived": "00:00:00",
            "customerTitle": "Mrs",
            "customerName": "",
            "dateOfBirth": "",
            "sex": ""
        });
        let reception = validate_step1(&input).unwrap();
        assert_eq!(reception.customer_name.as_deref(), Some(""));
        assert_eq!(reception.first_name, None);
    }

    #[test]
    fn test_empty_customer_title_is_required_error() {
        let mut input = valid_step1();
        input["customerTitle"] = json!("");

        let err = validate_step1(&input).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "customerTitle");
        assert_eq!(errors[0].message, "Customer title is required");
        assert_eq!(errors[0].kind, ErrorKind::Required);
    }

    #[test]
    fn test_missing_customer_title_is_required_error() {
        let mut input = valid_step1();
        input.as_object_mut().unwrap().remove("customerTitle");

        let err = validate_step1(&input).unwrap_err();
        assert_eq!(
            err.report().unwrap().find("customerTitle").unwrap().message,
            "Customer title is required"
        );
    }

    #[test]
    fn test_unknown_customer_title() {
        let mut input = valid_step1();
        input["customerTitle"] = json!("Dr");

        let err = validate_step1(&input).unwrap_err();
        let error = err.report().unwrap().find("customerTitle").unwrap();
        assert_eq!(error.message, "Invalid input");
        assert_eq!(error.kind, ErrorKind::Enum);
    }

    #[test]
    fn test_step1_reports_every_bad_field_in_order() {
        let input = json!({
            "dateReceived": "01/03/2024",
            "timeReceived": "09:10:00",
            "customerTitle": "",
            "customerName": "x".repeat(101),
            "firstName": "y".repeat(100),
            "dateOfBirth": "1985-07-14",
            "sex": "Other"
        });

        let err = validate_step1(&input).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(
            paths(errors),
            ["dateReceived", "timeReceived", "customerTitle", "customerName", "dateOfBirth", "sex"]
        );
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Invalid date format",
                "Invalid time format",
                "Customer title is required",
                "Customer name must be less than 100 characters",
                "Invalid date format (DD/MM/YYYY)",
                "Invalid input"
            ]
        );
    }

    #[test]
    fn test_empty_step1_object() {
        let err = validate_step1(&json!({})).unwrap_err();
        let messages: Vec<_> = err.field_errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            ["Date received is required", "Time received is required", "Customer title is required"]
        );
    }

    #[test]
    fn test_non_object_step_fails_fast() {
        let err = validate_step1(&json!(["2024-03-01"])).unwrap_err();
        assert!(matches!(err, StepError::Malformed { received: "array", .. }));
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let mut input = valid_step1();
        input["comment"] = json!("not part of the form");

        let reception = validate_step1(&input).unwrap();
        let normalized = serde_json::to_value(&reception).unwrap();
        assert!(normalized.get("comment").is_none());
        assert_eq!(normalized["customerName"], "Traoré");
    }

    // ========================================================================
    // Step 2
    // ========================================================================

    #[test]
    fn test_valid_step2_minimal() {
        let officer = validate_step2(&json!({"nameOpj": "Lt. Koné"})).unwrap();
        assert_eq!(officer.name_opj, "Lt. Koné");
    }

    #[test]
    fn test_step2_caps() {
        let input = json!({
            "nameOpj": "",
            "servicePolice": "s".repeat(100),
            "opjGrade": "g".repeat(51),
            "pvNumber": "p".repeat(51),
            "nationality": "n".repeat(500),
            "prosecutorOfficeNumber": "o".repeat(51),
            "instructionNumber": "i".repeat(50),
            "justiceIdentifier": "j".repeat(51)
        });

        let err = validate_step2(&input).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(
            paths(report.errors()),
            ["nameOpj", "opjGrade", "pvNumber", "prosecutorOfficeNumber", "justiceIdentifier"]
        );
        assert_eq!(report.find("nameOpj").unwrap().message, "OPJ name is required");
        assert_eq!(
            report.find("pvNumber").unwrap().message,
            "PV number must be less than 50 characters"
        );
        assert!(report.errors()[1..].iter().all(|e| e.kind == ErrorKind::TooLong));
    }

    // ========================================================================
    // Step 3
    // ========================================================================

    #[test]
    fn test_valid_step3() {
        let list = validate_step3(&json!({"seals": [seal(1), seal(2)]})).unwrap();
        assert_eq!(list.seals.len(), 2);
        assert_eq!(list.seals[1].samples().len(), 2);
    }

    #[test]
    fn test_empty_seals_is_collection_error_only() {
        let err = validate_step3(&json!({"seals": []})).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "seals");
        assert_eq!(errors[0].message, "At least one seal is required");
        assert_eq!(errors[0].kind, ErrorKind::TooShort);
    }

    #[test]
    fn test_missing_seals() {
        let err = validate_step3(&json!({})).unwrap_err();
        assert_eq!(err.field_errors()[0].path, "seals");
        assert_eq!(err.field_errors()[0].message, "Required");
    }

    #[test]
    fn test_seal_without_images() {
        let mut bad = seal(1);
        bad["images"] = json!([]);

        let err = validate_step3(&json!({"seals": [bad]})).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "seals[0].images");
        assert_eq!(errors[0].message, "At least one image is required");
    }

    #[test]
    fn test_second_sample_description_path() {
        let mut second = seal(2);
        second["samples"][1]["description"] = json!("");

        let err = validate_step3(&json!({"seals": [seal(1), second]})).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(paths(errors), ["seals[1].samples[1].description"]);
        assert_eq!(errors[0].message, "Description is required");
    }

    #[test]
    fn test_dates_accept_ascii_digits_only() {
        let mut input = valid_step1();
        input["dateReceived"] = json!("٢٠٢٤-٠٣-٠١");
        input["dateOfBirth"] = json!("١٤/٠٧/١٩٨٥");

        let err = validate_step1(&input).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(paths(errors), ["dateReceived", "dateOfBirth"]);
        assert_eq!(errors[0].message, "Invalid date format");
        assert_eq!(errors[1].message, "Invalid date format (DD/MM/YYYY)");

        let mut bad = seal(1);
        bad["receptionDate"] = json!("２０２４-０３-０１");
        bad["samples"][0]["date"] = json!("२०२४-०३-०१");
        bad["samples"][1]["time"] = json!("１４:３０:00");

        let err = validate_step3(&json!({"seals": [bad]})).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(
            paths(errors),
            [
                "seals[0].receptionDate",
                "seals[0].samples[0].date",
                "seals[0].samples[1].time"
            ]
        );
        assert_eq!(errors[0].message, "Invalid date format");
        assert_eq!(errors[1].message, "Invalid date format");
        assert_eq!(errors[2].message, "Invalid time format");
    }

    #[test]
    fn test_images_must_be_files() {
        let mut bad = seal(1);
        bad["images"] = json!(["front.jpg", image("back.jpg"), "https://example.org/x.jpg"]);

        let err = validate_step3(&json!({"seals": [bad]})).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(paths(errors), ["seals[0].images[0]", "seals[0].images[2]"]);
        assert!(errors.iter().all(|e| e.message == "Input not instance of File"));
    }

    #[test]
    fn test_seal_errors_collected_across_seals_and_samples() {
        let first = json!({
            "id": "one",
            "receptionDate": "",
            "sealState": "",
            "images": [],
            "samples": [{"id": 1, "date": "2024/03/02", "time": "14:31:00", "description": "x"}]
        });
        let second = json!({
            "id": 2,
            "receptionDate": "2024-03-01",
            "sealState": "Torn",
            "images": [image("a.jpg")],
            "samples": ["not a sample"]
        });

        let err = validate_step3(&json!({"seals": [first, second]})).unwrap_err();
        let errors = err.field_errors();
        assert_eq!(
            paths(errors),
            [
                "seals[0].id",
                "seals[0].receptionDate",
                "seals[0].sealState",
                "seals[0].images",
                "seals[0].samples[0].date",
                "seals[0].samples[0].time",
                "seals[1].samples[0]"
            ]
        );
        assert_eq!(errors[0].message, "Expected number, received string");
        assert_eq!(errors[1].message, "Reception date is required");
        assert_eq!(errors[4].message, "Invalid date format");
        assert_eq!(errors[5].message, "Invalid time format");
        assert_eq!(errors[6].message, "Expected object, received string");
    }

    #[test]
    fn test_sample_missing_fields() {
        let mut bad = seal(1);
        bad["samples"] = json!([{"id": 7}]);

        let err = validate_step3(&json!({"seals": [bad]})).unwrap_err();
        let messages: Vec<_> = err.field_errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            ["Sample date is required", "Sample time is required", "Description is required"]
        );
    }

    #[test]
    fn test_duplicate_ids_are_not_checked() {
        assert!(validate_step3(&json!({"seals": [seal(1), seal(1)]})).is_ok());
    }

    // ========================================================================
    // Record and idempotence
    // ========================================================================

    #[test]
    fn test_normalized_output_revalidates() {
        let reception = validate_step1(&valid_step1()).unwrap();
        let again = validate_step1(&serde_json::to_value(&reception).unwrap()).unwrap();
        assert_eq!(reception, again);

        let list = validate_step3(&json!({"seals": [seal(3)]})).unwrap();
        let again = validate_step3(&serde_json::to_value(&list).unwrap()).unwrap();
        assert_eq!(list, again);
    }

    #[test]
    fn test_record_collects_all_steps() {
        let mut reception = valid_step1();
        reception["customerTitle"] = json!("");
        let record = json!({
            "reception": reception,
            "officer": {},
            "seals": []
        });

        let err = validate_record(&record).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(paths(report.errors()), ["customerTitle", "nameOpj", "seals"]);
        assert_eq!(report.for_step(Step::Officer).count(), 1);
        assert_eq!(report.errors()[2].step, Step::Seals);
    }

    #[test]
    fn test_valid_record() {
        let record = json!({
            "reception": valid_step1(),
            "officer": {"nameOpj": "Lt. Koné", "pvNumber": "PV-2024-118"},
            "seals": [seal(1)]
        });

        let parsed = validate_record(&record).unwrap();
        assert_eq!(parsed.officer.pv_number.as_deref(), Some("PV-2024-118"));
        assert_eq!(parsed.seals.len(), 1);
        assert!(validate_record(&serde_json::to_value(&parsed).unwrap()).is_ok());
    }

    #[test]
    fn test_record_with_non_object_step() {
        let record = json!({"reception": "none", "officer": {}, "seals": []});
        let err = validate_record(&record).unwrap_err();
        assert!(matches!(err, StepError::Malformed { received: "string", .. }));
    }

    #[test]
    fn test_render_lists_errors_in_field_order() {
        let err = validate_step1(&json!({"dateReceived": "2024-3-1", "customerTitle": "Dr"}))
            .unwrap_err();
        insta::assert_snapshot!(err.report().unwrap().render(), @r"
        dateReceived: Invalid date format
        timeReceived: Time received is required
        customerTitle: Invalid input
        ");
    }

    #[test]
    fn test_report_render() {
        let err = validate_step3(&json!({"seals": []})).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.render(), "seals: At least one seal is required");
        assert_eq!(
            report.to_string(),
            "Step 3 (seals) validation failed: 1 error"
        );
    }
}
