//! Username availability: syntax first, then a store lookup.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    error::{HrError, HrResult, UsernameRejection},
    store::EmployeeStore,
};

/// 6-16 ASCII word characters or hyphens, or 2-5 characters from the CJK block.
static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-zA-Z0-9_-]{6,16}|[\x{2E80}-\x{9FFF}]{2,5})$")
        .expect("NAME_REGEX is a valid regex pattern")
});

pub fn is_well_formed_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

pub async fn check_username<S>(store: &S, name: &str) -> HrResult<()>
where
    S: EmployeeStore + ?Sized,
{
    if !is_well_formed_name(name) {
        debug!("username rejected by pattern");
        return Err(HrError::UsernameUnavailable(UsernameRejection::Malformed));
    }
    if store.exists_by_name(name).await? {
        debug!("username already taken");
        return Err(HrError::UsernameUnavailable(UsernameRejection::Taken));
    }
    Ok(())
}
