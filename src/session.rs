//! Caller-owned view state for an interactive checker.
//!
//! The client never stores UI state. Front ends keep a [`CheckerState`] and
//! fold [`Event`]s into it as calls start and finish.

use crate::address::validate_address;
use crate::error::CheckError;
use crate::OwnershipResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerState {
    pub is_loading: bool,
    pub result: Option<OwnershipResult>,
    pub error: Option<String>,
    pub is_initialized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    InitStarted,
    InitSucceeded,
    InitFailed(String),
    CheckStarted,
    CheckSucceeded(OwnershipResult),
    CheckFailed(String),
    Reset,
}

impl CheckerState {
    pub fn apply(self, event: Event) -> Self {
        match event {
            Event::InitStarted => Self {
                is_loading: true,
                error: None,
                ..self
            },
            Event::InitSucceeded => Self {
                is_loading: false,
                is_initialized: true,
                ..self
            },
            Event::InitFailed(message) => Self {
                is_loading: false,
                error: Some(message),
                ..self
            },
            Event::CheckStarted => Self {
                is_loading: true,
                result: None,
                error: None,
                ..self
            },
            Event::CheckSucceeded(result) => Self {
                is_loading: false,
                result: Some(result),
                error: None,
                ..self
            },
            Event::CheckFailed(message) => Self {
                is_loading: false,
                result: None,
                error: Some(message),
                ..self
            },
            Event::Reset => Self {
                is_loading: false,
                result: None,
                error: None,
                ..self
            },
        }
    }

    /// Fold the outcome of a finished check
    pub fn finish_check(self, outcome: &Result<OwnershipResult, CheckError>) -> Self {
        match outcome {
            Ok(result) => self.apply(Event::CheckSucceeded(result.clone())),
            Err(e) => self.apply(Event::CheckFailed(e.to_string())),
        }
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn can_check(&self) -> bool {
        self.is_initialized && !self.is_loading
    }
}

/// Validation feedback for raw user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputValidation {
    pub is_empty: bool,
    pub is_valid: bool,
}

impl InputValidation {
    /// Trims before validating, unlike [`validate_address`] itself
    pub fn of(raw: &str) -> Self {
        let trimmed = raw.trim();
        let is_empty = trimmed.is_empty();

        Self {
            is_empty,
            is_valid: !is_empty && validate_address(trimmed),
        }
    }

    pub fn show_validation(&self) -> bool {
        !self.is_empty
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid && !self.is_empty
    }
}
