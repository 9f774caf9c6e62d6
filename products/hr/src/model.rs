use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i32,
    pub name: String,
}

/// A stored employee. `department` is only populated by listings that join it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub gender: Option<Gender>,
    pub email: String,
    pub department_id: Option<i32>,
    pub department: Option<Department>,
}

/// Unchecked create input as submitted by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDraft {
    pub name: String,
    pub gender: Option<String>,
    pub email: String,
    pub department_id: Option<i32>,
}

/// Create input that passed validation; the only shape a store will insert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub gender: Option<Gender>,
    pub email: String,
    pub department_id: Option<i32>,
}

/// Selective update: `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub department_id: Option<i32>,
}

impl EmployeeChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.email.is_none()
            && self.department_id.is_none()
    }
}
