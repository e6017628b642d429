//! # rct-core
//!
//! Core types and pure domain rules for the RCT data-capture service.
//!
//! This crate has no database or HTTP dependency. It provides:
//! - Entity structs for every table (studies, participants, visits, the three
//!   per-visit data-entry records, questionnaire templates and answers,
//!   wearable samples)
//! - Enums with their stored string forms and display labels
//! - Participant identifier formatting and suffix parsing
//! - The data-entry category table and record forms with field validation
//! - Questionnaire selection validation and scoring
//! - The wearable summary computation
//! - Response shapes shared by the CLI and the HTTP server

pub mod category;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod forms;
pub mod identity;
pub mod responses;
pub mod scoring;
pub mod validation;
pub mod wearable;
