//! Field rules applied to employees before they are created.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::FieldErrors,
    model::{EmployeeDraft, Gender, NewEmployee},
    username::is_well_formed_name,
};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9_.-]+)@([\da-z.-]+)\.([a-z.]{2,6})$")
        .expect("EMAIL_REGEX is a valid regex pattern")
});

/// Checks every rule and reports all violations at once.
pub fn validate(draft: EmployeeDraft) -> Result<NewEmployee, FieldErrors> {
    let mut errors = FieldErrors::default();

    if draft.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    } else if !is_well_formed_name(&draft.name) {
        errors.insert(
            "name",
            "Name must be 6-16 letters, digits, '_' or '-', or 2-5 CJK characters",
        );
    }

    if draft.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !EMAIL_REGEX.is_match(&draft.email) {
        errors.insert("email", "Email address is malformed");
    }

    let gender = match draft.gender.as_deref() {
        None | Some("") => None,
        Some(raw) => {
            let parsed = Gender::parse(raw);
            if parsed.is_none() {
                errors.insert("gender", "Gender must be M or F");
            }
            parsed
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewEmployee {
        name: draft.name,
        gender,
        email: draft.email,
        department_id: draft.department_id,
    })
}
