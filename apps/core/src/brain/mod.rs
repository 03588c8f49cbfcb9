//! # Brain Module
//!
//! Fast, rule-based analysis of user input, run BEFORE any provider call.
//!
//! ## Components
//! - `intent`: ordered regex classification into a fixed tag set
//! - `emotion`: dominant emotional tone, for formatter emoji
//! - `math`: local arithmetic and prime listings
//! - `complexity`: question complexity, drives prompt and model choice

pub mod complexity;
pub mod emotion;
pub mod intent;
pub mod math;

pub use complexity::{ComplexityAssessment, ComplexityLevel, ComplexityScorer};
pub use intent::{IntentClassifier, IntentTag};
