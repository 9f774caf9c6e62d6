use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee failed validation on {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("{0}")]
    UsernameUnavailable(UsernameRejection),
    #[error("malformed employee identifier `{token}`")]
    MalformedIdentifier { token: String },
    #[error("employee {0} not found")]
    NotFound(i32),
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum UsernameRejection {
    #[error("Name must be 6-16 letters, digits, '_' or '-', or 2-5 CJK characters")]
    Malformed,
    #[error("Name is already taken")]
    Taken,
}

/// Field name to human-readable message, in stable key order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}
