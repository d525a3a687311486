use std::{collections::HashSet, fmt, str::FromStr};

use serde_json::{Map, Value};

use crate::{
    domain::{Employee, EmployeeId},
    error::{BackendError, ProtocolError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// A backend endpoint. Paths are relative so they resolve under whatever base the client is
/// pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub method: Method,
    pub path: String,
}

impl Route {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn list_employees() -> Self {
        Self::new(Method::Get, "api/employees")
    }

    pub fn add_employee() -> Self {
        Self::new(Method::Post, "api/employees")
    }

    // The backend only accepts POST here even though the operation is a replace.
    pub fn edit_employee(id: EmployeeId) -> Self {
        Self::new(Method::Post, format!("api/employee/{id}"))
    }

    pub fn delete_employee(id: EmployeeId) -> Self {
        Self::new(Method::Delete, format!("api/employee/{id}"))
    }

    pub fn debug(action: DebugAction) -> Self {
        match action {
            DebugAction::UndeleteAll => Self::new(Method::Get, "api/debug/undeleteall"),
            DebugAction::DeleteAll => Self::new(Method::Delete, "api/debug/deleteall"),
            DebugAction::TruncateTable => Self::new(Method::Delete, "api/debug/truncatetable"),
            DebugAction::SeedTestEmployees => Self::new(Method::Get, "api/debug/testemployees"),
            DebugAction::CreateTable => Self::new(Method::Get, "api/debug/configure"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method, self.path)
    }
}

/// Developer maintenance operations for resetting backend test data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugAction {
    CreateTable,
    SeedTestEmployees,
    UndeleteAll,
    DeleteAll,
    TruncateTable,
}

impl DebugAction {
    pub const ALL: [DebugAction; 5] = [
        DebugAction::CreateTable,
        DebugAction::SeedTestEmployees,
        DebugAction::UndeleteAll,
        DebugAction::DeleteAll,
        DebugAction::TruncateTable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DebugAction::CreateTable => "create-table",
            DebugAction::SeedTestEmployees => "seed",
            DebugAction::UndeleteAll => "undelete-all",
            DebugAction::DeleteAll => "delete-all",
            DebugAction::TruncateTable => "truncate-table",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DebugAction::CreateTable => "Create the employee table if it does not exist",
            DebugAction::SeedTestEmployees => "Add test employees",
            DebugAction::UndeleteAll => "Restore every soft-deleted employee",
            DebugAction::DeleteAll => "Soft-delete every employee",
            DebugAction::TruncateTable => {
                "Permanently delete all employees and reset the id sequence"
            }
        }
    }
}

impl fmt::Display for DebugAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DebugAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(DebugAction::name).collect();
                format!("unknown debug action `{s}` (expected one of: {})", known.join(", "))
            })
    }
}

/// Employees in the order the server returned them. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeList {
    employees: Vec<Employee>,
}

impl EmployeeList {
    pub fn new(employees: Vec<Employee>) -> Result<Self, ProtocolError> {
        let mut seen = HashSet::with_capacity(employees.len());
        for employee in &employees {
            if !seen.insert(employee.id) {
                return Err(ProtocolError::DuplicateEmployee(employee.id));
            }
        }
        Ok(Self { employees })
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn ids(&self) -> Vec<EmployeeId> {
        self.employees.iter().map(|employee| employee.id).collect()
    }
}

impl<'a> IntoIterator for &'a EmployeeList {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListResponse {
    Employees(EmployeeList),
    Error(BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckResponse {
    Ok { message: Option<String> },
    Error(BackendError),
}

fn parse_object(body: &str) -> Result<Map<String, Value>, ProtocolError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(ProtocolError::UnexpectedShape(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn backend_error(map: &Map<String, Value>) -> Option<BackendError> {
    map.get("error").map(|value| match value {
        Value::String(message) => BackendError::new(message.clone()),
        other => BackendError::new(other.to_string()),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses the plain-text body of `GET api/employees`.
///
/// Each value in the top-level object is one employee, either inline or as a string holding
/// the employee's JSON. Any malformed entry rejects the whole list.
pub fn parse_list_response(body: &str) -> Result<ListResponse, ProtocolError> {
    let map = parse_object(body)?;
    if let Some(err) = backend_error(&map) {
        return Ok(ListResponse::Error(err));
    }

    let mut employees = Vec::with_capacity(map.len());
    for (key, value) in map {
        let parsed = match value {
            Value::String(encoded) => serde_json::from_str::<Employee>(&encoded),
            Value::Object(_) => serde_json::from_value::<Employee>(value),
            other => {
                return Err(ProtocolError::UnexpectedShape(format!(
                    "employee entry `{key}` is {}",
                    json_kind(&other)
                )))
            }
        };
        let employee = parsed.map_err(|source| ProtocolError::MalformedEmployee {
            key: key.clone(),
            source,
        })?;
        employees.push(employee);
    }

    Ok(ListResponse::Employees(EmployeeList::new(employees)?))
}

/// Parses the body of a mutation or debug call: `{}` / `{"message": ..}` or `{"error": ..}`.
pub fn parse_ack_response(body: &str) -> Result<AckResponse, ProtocolError> {
    let map = parse_object(body)?;
    if let Some(err) = backend_error(&map) {
        return Ok(AckResponse::Error(err));
    }
    let message = map
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(AckResponse::Ok { message })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
