//! Whole intake records: the editable draft and the validated result

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::entities::{ImageFile, ItemId, Officer, Reception, Seal, Step};
use crate::schema::validator::{self, StepError, ValidationReport};

/// A fully validated intake record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub reception: Reception,
    pub officer: Officer,
    pub seals: Vec<Seal>,
}

impl IntakeRecord {
    pub fn sample_count(&self) -> usize {
        self.seals.iter().map(|s| s.samples().len()).sum()
    }

    pub fn image_count(&self) -> usize {
        self.seals.iter().map(|s| s.images.len()).sum()
    }
}

/// Errors raised while editing a draft
#[derive(Debug, Error, Diagnostic)]
pub enum DraftError {
    #[error("No seal with id {0}")]
    #[diagnostic(code(intake::draft::unknown_seal))]
    UnknownSeal(ItemId),

    #[error("Seal {seal} has no sample with id {sample}")]
    #[diagnostic(code(intake::draft::unknown_sample))]
    UnknownSample { seal: ItemId, sample: ItemId },
}

/// The record as it is being filled in
///
/// Values are kept exactly as entered, valid or not. Seals and samples are
/// addressed by their caller-assigned ids; when ids repeat, the first match
/// wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntakeDraft {
    reception: Map<String, Value>,
    officer: Map<String, Value>,
    seals: Vec<Map<String, Value>>,
}

impl IntakeDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reception(&mut self, name: &str, value: impl Into<Value>) {
        self.reception.insert(name.to_string(), value.into());
    }

    pub fn set_officer(&mut self, name: &str, value: impl Into<Value>) {
        self.officer.insert(name.to_string(), value.into());
    }

    /// Append an empty seal and return its position
    pub fn add_seal(&mut self, id: impl Into<ItemId>) -> usize {
        let id: ItemId = id.into();
        let mut seal = Map::new();
        seal.insert("id".to_string(), Value::Number(id.0));
        seal.insert("receptionDate".to_string(), json!(""));
        seal.insert("sealState".to_string(), json!(""));
        seal.insert("images".to_string(), json!([]));
        seal.insert("samples".to_string(), json!([]));
        self.seals.push(seal);
        self.seals.len() - 1
    }

    pub fn remove_seal(&mut self, id: &ItemId) -> Result<(), DraftError> {
        let position = self
            .seals
            .iter()
            .position(|s| has_id(s, id))
            .ok_or_else(|| DraftError::UnknownSeal(id.clone()))?;
        self.seals.remove(position);
        Ok(())
    }

    pub fn set_seal_field(
        &mut self,
        id: &ItemId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), DraftError> {
        self.seal_mut(id)?.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Attach a proof image to a seal
    pub fn attach_image(&mut self, id: &ItemId, image: &ImageFile) -> Result<(), DraftError> {
        let image = json!(image);
        let seal = self.seal_mut(id)?;
        match seal.entry("images").or_insert_with(|| json!([])) {
            Value::Array(images) => images.push(image),
            other => *other = Value::Array(vec![image]),
        }
        Ok(())
    }

    /// Append an empty sample to a seal
    pub fn add_sample(
        &mut self,
        seal_id: &ItemId,
        sample_id: impl Into<ItemId>,
    ) -> Result<(), DraftError> {
        let sample_id: ItemId = sample_id.into();
        let sample = json!({
            "id": Value::Number(sample_id.0),
            "date": "",
            "time": "",
            "description": "",
            "analysis": ""
        });

        let seal = self.seal_mut(seal_id)?;
        match seal.entry("samples").or_insert_with(|| json!([])) {
            Value::Array(samples) => samples.push(sample),
            other => *other = Value::Array(vec![sample]),
        }
        Ok(())
    }

    pub fn remove_sample(&mut self, seal_id: &ItemId, sample_id: &ItemId) -> Result<(), DraftError> {
        let unknown = || DraftError::UnknownSample {
            seal: seal_id.clone(),
            sample: sample_id.clone(),
        };

        let samples = self
            .seal_mut(seal_id)?
            .get_mut("samples")
            .and_then(Value::as_array_mut)
            .ok_or_else(unknown)?;
        let position = samples
            .iter()
            .position(|s| s.as_object().is_some_and(|s| has_id(s, sample_id)))
            .ok_or_else(unknown)?;
        samples.remove(position);
        Ok(())
    }

    pub fn set_sample_field(
        &mut self,
        seal_id: &ItemId,
        sample_id: &ItemId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), DraftError> {
        let sample = self
            .seal_mut(seal_id)?
            .get_mut("samples")
            .and_then(Value::as_array_mut)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object_mut)
            .find(|s| has_id(s, sample_id))
            .ok_or_else(|| DraftError::UnknownSample {
                seal: seal_id.clone(),
                sample: sample_id.clone(),
            })?;
        sample.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn seal_count(&self) -> usize {
        self.seals.len()
    }

    /// Seal at a position, as entered
    pub fn seal(&self, index: usize) -> Option<&Map<String, Value>> {
        self.seals.get(index)
    }

    /// Sample at a position within a seal, as entered
    pub fn sample(&self, seal: usize, sample: usize) -> Option<&Map<String, Value>> {
        self.seal(seal)?
            .get("samples")?
            .as_array()?
            .get(sample)?
            .as_object()
    }

    pub fn seal_id(&self, index: usize) -> Option<ItemId> {
        self.seal(index).and_then(item_id)
    }

    pub fn sample_id(&self, seal: usize, sample: usize) -> Option<ItemId> {
        self.sample(seal, sample).and_then(item_id)
    }

    /// The candidate a step's schema is checked against
    pub fn step_input(&self, step: Step) -> Value {
        match step {
            Step::Reception => Value::Object(self.reception.clone()),
            Step::Officer => Value::Object(self.officer.clone()),
            Step::Seals => json!({ "seals": self.seals }),
        }
    }

    /// Check one step, as done on each wizard transition
    pub fn validate_step(&self, step: Step) -> Result<(), StepError> {
        let errors = validator::check(step, &self.step_input(step))?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport::new(step.to_string(), errors).into())
        }
    }

    /// The whole draft in record shape
    pub fn to_value(&self) -> Value {
        json!({
            "reception": self.reception,
            "officer": self.officer,
            "seals": self.seals,
        })
    }

    /// Validate all three steps together and produce the final record
    pub fn submit(&self) -> Result<IntakeRecord, StepError> {
        validator::validate_record(&self.to_value())
    }

    fn seal_mut(&mut self, id: &ItemId) -> Result<&mut Map<String, Value>, DraftError> {
        self.seals
            .iter_mut()
            .find(|s| has_id(s, id))
            .ok_or_else(|| DraftError::UnknownSeal(id.clone()))
    }
}

fn item_id(item: &Map<String, Value>) -> Option<ItemId> {
    match item.get("id") {
        Some(Value::Number(n)) => Some(ItemId(n.clone())),
        _ => None,
    }
}

fn has_id(item: &Map<String, Value>, id: &ItemId) -> bool {
    matches!(item.get("id"), Some(Value::Number(n)) if id.matches(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageFile {
        ImageFile {
            name: "seal.jpg".to_string(),
            mime: "image/jpeg".to_string(),
            size: 2048,
            last_modified: None,
        }
    }

    fn filled_draft() -> IntakeDraft {
        let mut draft = IntakeDraft::new();
        draft.set_reception("dateReceived", "2024-05-10");
        draft.set_reception("timeReceived", "16:45:00");
        draft.set_reception("customerTitle", "Ms");
        draft.set_reception("customerName", "Bamba");
        draft.set_officer("nameOpj", "Capt. Yao");

        let seal = ItemId::from(1715350000000);
        draft.add_seal(seal.clone());
        draft.set_seal_field(&seal, "receptionDate", "2024-05-10").unwrap();
        draft.set_seal_field(&seal, "sealState", "Intact").unwrap();
        draft.attach_image(&seal, &image()).unwrap();
        draft
    }

    #[test]
    fn test_empty_draft_fails_every_step() {
        let draft = IntakeDraft::new();
        for step in Step::all() {
            let err = draft.validate_step(*step).unwrap_err();
            assert!(!err.field_errors().is_empty(), "{} should fail", step);
        }
    }

    #[test]
    fn test_new_seal_needs_details() {
        let mut draft = IntakeDraft::new();
        draft.add_seal(1u64);

        let err = draft.validate_step(Step::Seals).unwrap_err();
        let paths: Vec<_> = err.field_errors().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            ["seals[0].receptionDate", "seals[0].sealState", "seals[0].images"]
        );
    }

    #[test]
    fn test_submit_filled_draft() {
        let record = filled_draft().submit().unwrap();
        assert_eq!(record.officer.name_opj, "Capt. Yao");
        assert_eq!(record.image_count(), 1);
        assert_eq!(record.sample_count(), 0);
        assert_eq!(record.seals[0].samples, Some(Vec::new()));
    }

    #[test]
    fn test_blank_sample_blocks_submit() {
        let mut draft = filled_draft();
        let seal = ItemId::from(1715350000000);
        let sample = ItemId::from(7);
        draft.add_sample(&seal, sample.clone()).unwrap();
        draft.set_sample_field(&seal, &sample, "date", "2024-05-11").unwrap();
        draft.set_sample_field(&seal, &sample, "time", "08:00:00").unwrap();

        let err = draft.submit().unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.find("seals[0].samples[0].description").unwrap().message,
            "Description is required"
        );

        draft.set_sample_field(&seal, &sample, "description", "Blood swab").unwrap();
        let record = draft.submit().unwrap();
        assert_eq!(record.sample_count(), 1);
        assert_eq!(record.seals[0].samples()[0].analysis.as_deref(), Some(""));
    }

    #[test]
    fn test_remove_sample_and_seal() {
        let mut draft = filled_draft();
        let seal = ItemId::from(1715350000000);
        draft.add_sample(&seal, 1u64).unwrap();
        draft.add_sample(&seal, 2u64).unwrap();

        draft.remove_sample(&seal, &ItemId::from(1)).unwrap();
        assert_eq!(draft.step_input(Step::Seals)["seals"][0]["samples"][0]["id"], 2);

        draft.remove_seal(&seal).unwrap();
        assert_eq!(draft.seal_count(), 0);
        let err = draft.validate_step(Step::Seals).unwrap_err();
        assert_eq!(err.field_errors()[0].message, "At least one seal is required");
    }

    #[test]
    fn test_unknown_ids() {
        let mut draft = filled_draft();
        let missing = ItemId::from(99);

        assert!(matches!(
            draft.set_seal_field(&missing, "sealState", "x"),
            Err(DraftError::UnknownSeal(_))
        ));
        assert!(matches!(
            draft.remove_sample(&ItemId::from(1715350000000), &missing),
            Err(DraftError::UnknownSample { .. })
        ));
        assert_eq!(
            draft.remove_seal(&missing).unwrap_err().to_string(),
            "No seal with id 99"
        );
    }

    #[test]
    fn test_float_ids_are_addressable_as_integers() {
        let mut draft = filled_draft();
        let loaded = ItemId(serde_json::Number::from_f64(3.0).unwrap());
        draft.add_seal(loaded);

        draft
            .set_seal_field(&ItemId::from(3), "sealState", "Torn")
            .unwrap();
        draft.add_sample(&ItemId::from(3), 4u64).unwrap();
        draft.remove_seal(&ItemId::from(3)).unwrap();
        assert_eq!(draft.seal_count(), 1);
    }

    #[test]
    fn test_positional_access() {
        let mut draft = filled_draft();
        let seal = ItemId::from(1715350000000);
        draft.add_sample(&seal, 5u64).unwrap();
        draft.set_sample_field(&seal, &ItemId::from(5), "time", "10:30:00").unwrap();

        assert_eq!(draft.seal_id(0), Some(seal));
        assert_eq!(draft.seal(0).unwrap()["sealState"], "Intact");
        assert_eq!(draft.sample_id(0, 0), Some(ItemId::from(5)));
        assert_eq!(draft.sample(0, 0).unwrap()["time"], "10:30:00");
        assert_eq!(draft.seal_id(1), None);
        assert_eq!(draft.sample(0, 1), None);
    }

    #[test]
    fn test_record_shape() {
        let value = filled_draft().to_value();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert!(keys.contains(&"reception".to_string()));
        assert!(keys.contains(&"officer".to_string()));
        assert_eq!(value["seals"][0]["images"][0]["type"], "image/jpeg");
    }
}
