//! Evidence intake: validation engine for forensic seal and sample records
//!
//! Records are collected in three steps (reception, investigating officer,
//! seals with their samples and proof images). Each step is checked against
//! a declarative schema that reports every failing field by path, such as
//! `seals[0].samples[1].description`.

pub mod cli;
pub mod core;
pub mod entities;
pub mod input;
pub mod schema;
