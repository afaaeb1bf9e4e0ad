//! Schema-driven interactive intake wizard
//!
//! Walks the three steps in order and prompts for every text field the
//! step's schema declares. Each step is validated when the user moves past
//! it: failures raise an error notification, are listed under it, and only
//! the failing fields are asked again. For seals this means the failing seal
//! or sample field on the existing entry, with everything else kept.

use chrono::{Local, Utc};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use std::path::Path;

use crate::core::files::format_file_size;
use crate::core::notify::{ConsoleToaster, NotificationQueue, ToastOptions};
use crate::core::timeslots::{slot_for, slot_index, time_slots};
use crate::entities::{ImageFile, IntakeDraft, IntakeRecord, ItemId, Step};
use crate::schema::rules::{Check, Field, FieldKind, ObjectSchema, Presence, ISO_DATE};
use crate::schema::steps::schema_for;
use crate::schema::validator::{FieldError, StepError};

/// Shown in choice lists for leaving an optional field blank
const NONE_CHOICE: &str = "(none)";

/// How a text field is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    Choice {
        values: &'static [&'static str],
        optional: bool,
    },
    Slot,
    Date,
    Text {
        required: bool,
    },
}

/// Interactive wizard building an [`IntakeRecord`]
pub struct IntakeWizard {
    theme: ColorfulTheme,
    notifications: NotificationQueue<ConsoleToaster>,
    draft: IntakeDraft,
    next_id: u64,
}

impl IntakeWizard {
    pub fn new(options: ToastOptions) -> Self {
        // Ids follow the millisecond clock, like ids minted by a browser form.
        let next_id = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self {
            theme: ColorfulTheme::default(),
            notifications: NotificationQueue::new(ConsoleToaster::stderr(), options),
            draft: IntakeDraft::new(),
            next_id,
        }
    }

    /// Run all steps and submit the record
    pub fn run(mut self) -> Result<IntakeRecord> {
        println!();
        println!("{} New evidence intake", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());

        self.fill_form(Step::Reception)?;
        self.fill_form(Step::Officer)?;
        self.fill_seals()?;

        let record = match self.draft.submit() {
            Ok(record) => record,
            Err(err) => {
                self.report(&err)?;
                return Err(err.into());
            }
        };
        self.notifications
            .success(&format!(
                "Record complete: {} seal(s), {} sample(s), {} image(s)",
                record.seals.len(),
                record.sample_count(),
                record.image_count()
            ))
            .into_diagnostic()?;
        Ok(record)
    }

    fn fill_form(&mut self, step: Step) -> Result<()> {
        self.heading(&step.to_string())?;

        let schema = schema_for(step);
        let mut pending: Vec<&'static Field> = schema.fields().iter().collect();
        loop {
            for field in &pending {
                let current = self.draft.step_input(step)[field.name]
                    .as_str()
                    .map(String::from);
                let Some(value) = self.prompt_field(field, current.as_deref())? else {
                    continue;
                };
                match step {
                    Step::Reception => self.draft.set_reception(field.name, value),
                    _ => self.draft.set_officer(field.name, value),
                }
            }

            match self.draft.validate_step(step) {
                Ok(()) => {
                    self.notifications
                        .success(&format!("{} complete", step))
                        .into_diagnostic()?;
                    return Ok(());
                }
                Err(err) => {
                    self.report(&err)?;
                    let errors = err.field_errors();
                    if errors.is_empty() {
                        return Err(err.into());
                    }
                    pending = schema
                        .fields()
                        .iter()
                        .filter(|f| errors.iter().any(|e| e.path == f.name))
                        .collect();
                }
            }
        }
    }

    fn fill_seals(&mut self) -> Result<()> {
        self.heading(&Step::Seals.to_string())?;

        loop {
            let add = self.draft.seal_count() == 0
                || Confirm::with_theme(&self.theme)
                    .with_prompt("Add another seal?")
                    .default(false)
                    .interact()
                    .into_diagnostic()?;
            if add {
                self.add_seal()?;
                continue;
            }

            let err = match self.draft.validate_step(Step::Seals) {
                Ok(()) => {
                    self.notifications
                        .success(&format!("{} complete", Step::Seals))
                        .into_diagnostic()?;
                    return Ok(());
                }
                Err(err) => err,
            };

            self.report(&err)?;
            let mut revisited = false;
            for target in seal_targets(err.field_errors()) {
                revisited |= self.revisit(&target)?;
            }
            if !revisited {
                return Err(err.into());
            }
        }
    }

    /// Ask again for the seal or sample field an error points at
    ///
    /// Returns false when nothing could be prompted for.
    fn revisit(&mut self, target: &SealTarget) -> Result<bool> {
        let Some(seal_id) = self.draft.seal_id(target.seal) else {
            return Ok(false);
        };

        let (field, current) = match target.sample {
            None if target.field == "images" => {
                self.note(&format!("Seal #{} needs a proof image", target.seal + 1))?;
                self.attach_images(&seal_id)?;
                return Ok(true);
            }
            None => {
                let Some(field) = seal_schema().and_then(|s| s.field(&target.field)) else {
                    return Ok(false);
                };
                (field, self.draft.seal(target.seal).and_then(|s| text_value(s, field)))
            }
            Some(sample) => {
                let Some(field) = sample_schema().and_then(|s| s.field(&target.field)) else {
                    return Ok(false);
                };
                (
                    field,
                    self.draft
                        .sample(target.seal, sample)
                        .and_then(|s| text_value(s, field)),
                )
            }
        };

        let location = match target.sample {
            Some(sample) => format!("Seal #{}, sample #{}", target.seal + 1, sample + 1),
            None => format!("Seal #{}", target.seal + 1),
        };
        self.note(&location)?;
        let Some(value) = self.prompt_field(field, current.as_deref())? else {
            return Ok(false);
        };

        match target.sample {
            Some(sample) => {
                let Some(sample_id) = self.draft.sample_id(target.seal, sample) else {
                    return Ok(false);
                };
                self.draft
                    .set_sample_field(&seal_id, &sample_id, field.name, value)?;
            }
            None => self.draft.set_seal_field(&seal_id, field.name, value)?,
        }
        Ok(true)
    }

    fn add_seal(&mut self) -> Result<()> {
        let id = self.mint_id();
        self.draft.add_seal(id.clone());
        println!();
        println!("{} Seal #{}", style("▸").cyan(), self.draft.seal_count());

        let Some(seal_form) = seal_schema() else {
            return Ok(());
        };

        for field in text_fields(seal_form) {
            if let Some(value) = self.prompt_field(field, None)? {
                self.draft.set_seal_field(&id, field.name, value)?;
            }
        }

        self.attach_images(&id)?;

        let Some(sample_form) = sample_schema() else {
            return Ok(());
        };
        while Confirm::with_theme(&self.theme)
            .with_prompt("Add a sample to this seal?")
            .default(false)
            .interact()
            .into_diagnostic()?
        {
            let sample_id = self.mint_id();
            self.draft.add_sample(&id, sample_id.clone())?;
            for field in text_fields(sample_form) {
                if let Some(value) = self.prompt_field(field, None)? {
                    self.draft.set_sample_field(&id, &sample_id, field.name, value)?;
                }
            }
        }
        Ok(())
    }

    fn attach_images(&mut self, id: &ItemId) -> Result<()> {
        loop {
            let path: String = Input::with_theme(&self.theme)
                .with_prompt("Image path (blank to finish)")
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;
            let path = path.trim();
            if path.is_empty() {
                return Ok(());
            }

            match ImageFile::from_path(Path::new(path)) {
                Ok(image) => {
                    println!(
                        "  {} {} ({}, {})",
                        style("+").green(),
                        image.name,
                        image.category(),
                        format_file_size(image.size)
                    );
                    self.draft.attach_image(id, &image)?;
                }
                Err(e) => {
                    tracing::debug!(path, error = %e, "image rejected");
                    self.notifications
                        .error(&format!("Cannot attach {}: {}", path, e))
                        .into_diagnostic()?;
                    self.notifications.toaster_mut().settle().into_diagnostic()?;
                }
            }
        }
    }

    /// Ask for one field; `None` when the field is not prompted for
    fn prompt_field(&mut self, field: &Field, current: Option<&str>) -> Result<Option<String>> {
        let Some(prompt) = prompt_for(field) else {
            return Ok(None);
        };
        let label = field_label(field.name);
        self.notifications.toaster_mut().settle().into_diagnostic()?;

        let value = match prompt {
            Prompt::Choice { values, optional } => {
                let mut items: Vec<&str> = Vec::with_capacity(values.len() + 1);
                if optional {
                    items.push(NONE_CHOICE);
                }
                items.extend_from_slice(values);
                let default = current
                    .and_then(|c| items.iter().position(|i| *i == c))
                    .unwrap_or(0);

                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&label)
                    .items(&items)
                    .default(default)
                    .interact()
                    .into_diagnostic()?;
                match items[selection] {
                    NONE_CHOICE => String::new(),
                    chosen => chosen.to_string(),
                }
            }

            Prompt::Slot => {
                let default = current
                    .and_then(slot_index)
                    .or_else(|| slot_index(slot_for(Local::now().time())))
                    .unwrap_or(0);
                let selection = Select::with_theme(&self.theme)
                    .with_prompt(&label)
                    .items(time_slots())
                    .default(default)
                    .max_length(12)
                    .interact()
                    .into_diagnostic()?;
                time_slots()[selection].clone()
            }

            Prompt::Date => {
                let default = current
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());
                Input::with_theme(&self.theme)
                    .with_prompt(&label)
                    .default(default)
                    .interact_text()
                    .into_diagnostic()?
            }

            Prompt::Text { required } => {
                let mut input = Input::<String>::with_theme(&self.theme)
                    .with_prompt(&label)
                    .allow_empty(!required);
                if let Some(current) = current.filter(|c| !c.is_empty()) {
                    input = input.with_initial_text(current);
                }
                input.interact_text().into_diagnostic()?
            }
        };

        Ok(Some(value))
    }

    fn report(&mut self, err: &StepError) -> Result<()> {
        self.notifications.error(&err.to_string()).into_diagnostic()?;
        self.notifications.toaster_mut().settle().into_diagnostic()?;
        for error in err.field_errors() {
            eprintln!("  {} {}: {}", style("✗").red(), style(&error.path).bold(), error.message);
        }
        Ok(())
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        self.notifications.toaster_mut().settle().into_diagnostic()?;
        println!();
        println!("{}", style(title).bold());
        Ok(())
    }

    fn note(&mut self, text: &str) -> Result<()> {
        self.notifications.toaster_mut().settle().into_diagnostic()?;
        println!("{} {}", style("▸").cyan(), text);
        Ok(())
    }

    fn mint_id(&mut self) -> ItemId {
        let id = ItemId::from(self.next_id);
        self.next_id += 1;
        id
    }
}

/// Text fields of a schema, in declaration order
fn text_fields(schema: &ObjectSchema) -> impl Iterator<Item = &Field> {
    schema
        .fields()
        .iter()
        .filter(|f| matches!(f.kind, FieldKind::Text { .. }))
}

/// Pick the prompt for a field from its rule chain
fn prompt_for(field: &Field) -> Option<Prompt> {
    let FieldKind::Text { presence, checks } = &field.kind else {
        return None;
    };
    let required = matches!(presence, Presence::Required(_));

    let prompt = checks
        .iter()
        .find_map(|check| match check {
            Check::OneOf { allowed, .. } => Some(Prompt::Choice {
                values: *allowed,
                optional: !required,
            }),
            Check::TimeSlot { .. } => Some(Prompt::Slot),
            Check::Pattern { regex, .. } if std::ptr::eq(*regex, &*ISO_DATE) => Some(Prompt::Date),
            _ => None,
        })
        .unwrap_or(Prompt::Text { required });
    Some(prompt)
}

/// `prosecutorOfficeNumber` -> `Prosecutor Office Number`
fn field_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            label.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            label.push(' ');
            label.push(c);
        } else {
            label.push(c);
        }
    }
    label
}

fn seal_schema() -> Option<&'static ObjectSchema> {
    schema_for(Step::Seals).field("seals").and_then(Field::item_schema)
}

fn sample_schema() -> Option<&'static ObjectSchema> {
    seal_schema()?.field("samples").and_then(Field::item_schema)
}

fn text_value(item: &serde_json::Map<String, Value>, field: &Field) -> Option<String> {
    item.get(field.name).and_then(Value::as_str).map(String::from)
}

/// Seal or sample field named by an error path
#[derive(Debug, Clone, PartialEq, Eq)]
struct SealTarget {
    seal: usize,
    sample: Option<usize>,
    field: String,
}

impl SealTarget {
    /// `seals[2].samples[1].time` -> seal 2, sample 1, `time`
    ///
    /// Element paths such as `seals[0].images[1]` name their list.
    fn parse(path: &str) -> Option<Self> {
        let (seal, rest) = path.strip_prefix("seals[")?.split_once("].")?;
        let seal = seal.parse().ok()?;

        if let Some((sample, field)) = rest
            .strip_prefix("samples[")
            .and_then(|r| r.split_once("]."))
        {
            return Some(Self {
                seal,
                sample: Some(sample.parse().ok()?),
                field: field.to_string(),
            });
        }

        let field = rest.split('[').next().unwrap_or(rest);
        Some(Self {
            seal,
            sample: None,
            field: field.to_string(),
        })
    }
}

/// Distinct seal and sample fields with errors, in report order
fn seal_targets(errors: &[FieldError]) -> Vec<SealTarget> {
    let mut targets: Vec<SealTarget> = Vec::new();
    for target in errors.iter().filter_map(|e| SealTarget::parse(&e.path)) {
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}
