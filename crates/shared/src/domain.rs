use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($name)
            }
        }

        // The backend has shipped ids both as JSON numbers and as numeric strings.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum RawId {
                    Number(i64),
                    Text(String),
                }

                match RawId::deserialize(deserializer)? {
                    RawId::Number(value) => Ok($name(value)),
                    RawId::Text(text) => text.parse().map_err(|_| {
                        de::Error::custom(format!("invalid {} `{text}`", stringify!($name)))
                    }),
                }
            }
        }
    };
}

id_newtype!(EmployeeId);

/// Time of day a shift starts or ends, minute precision on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftTime(NaiveTime);

impl ShiftTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for ShiftTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map(|time| Self(time.with_second(0).unwrap_or(time)))
            .map_err(|_| DomainError::InvalidShiftTime(raw.to_string()))
    }
}

impl fmt::Display for ShiftTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for ShiftTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShiftTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The user-editable part of an employee record; the body of add and edit requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    pub shift_start: ShiftTime,
    pub shift_end: ShiftTime,
}

impl EmployeeFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        shift_start: ShiftTime,
        shift_end: ShiftTime,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            shift_start,
            shift_end,
        }
    }

    /// Trims names and rejects blanks. Overnight shifts (end before start) are allowed.
    pub fn normalized(mut self) -> Result<Self, DomainError> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        if self.first_name.is_empty() {
            return Err(DomainError::EmptyName("first_name"));
        }
        if self.last_name.is_empty() {
            return Err(DomainError::EmptyName("last_name"));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub shift_start: ShiftTime,
    pub shift_end: ShiftTime,
}

impl Employee {
    pub fn from_fields(id: EmployeeId, fields: EmployeeFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            shift_start: fields.shift_start,
            shift_end: fields.shift_end,
        }
    }

    pub fn fields(&self) -> EmployeeFields {
        EmployeeFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            shift_start: self.shift_start,
            shift_end: self.shift_end,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn shift_label(&self) -> String {
        format!("{} - {}", self.shift_start, self.shift_end)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
