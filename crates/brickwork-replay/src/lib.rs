//! Headless driver that feeds scripted input into an [`Editor`] and
//! reports the resulting scene.
//!
//! [`Editor`]: brickwork_editor::Editor

pub mod report;
pub mod runner;
pub mod script;
