//! Student records as they travel over the wire and into the store.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Embedded postal address. Both fields are required; there is no partial
/// address anywhere in the API.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Address {
    pub city: String,
    pub country: String,
}

/// A full student record, as created by `POST /students` and returned by
/// `GET /students/{id}`.
///
/// No validation beyond type coercion: empty names and negative ages are
/// stored as given.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Student {
    pub name: String,
    #[serde(deserialize_with = "age::coerce")]
    pub age: i64,
    pub address: Address,
}

/// The `{name, age}` projection returned by the list endpoint.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StudentSummary {
    pub name: String,
    pub age: i64,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self { name: student.name.clone(), age: student.age }
    }
}

/// A partial update. Each field is either present (overwrite) or absent
/// (keep the stored value); JSON `null` counts as absent.
///
/// `address`, when present, replaces the whole embedded object.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StudentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "age::coerce_optional")]
    pub age: Option<i64>,
    #[serde(default)]
    pub address: Option<Address>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.address.is_none()
    }

    /// Overwrites every field present in the patch.
    pub fn apply(self, student: &mut Student) {
        if let Some(name) = self.name {
            student.name = name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(address) = self.address {
            student.address = address;
        }
    }
}

/// Ages arrive as a JSON integer, an integer string (`"20"`), or a float
/// with no fractional part (`20.0`). Anything else is a decoding error.
mod age {
    use super::*;

    struct Age(i64);

    impl<'de> Deserialize<'de> for Age {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(AgeVisitor).map(Age)
        }
    }

    struct AgeVisitor;

    impl Visitor<'_> for AgeVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer, an integer string, or a whole number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            // Range check against 2^63 so the cast below cannot saturate.
            if v.fract() == 0.0 && v >= -9_223_372_036_854_775_808.0 && v < 9_223_372_036_854_775_808.0 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    pub(super) fn coerce<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Age::deserialize(deserializer).map(|a| a.0)
    }

    pub(super) fn coerce_optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Ok(Option::<Age>::deserialize(deserializer)?.map(|a| a.0))
    }
}

/// Optional filters for the list endpoint, combined with logical AND.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StudentFilter {
    /// Exact match on `address.country`.
    pub country: Option<String>,
    /// Inclusive lower bound on `age`.
    pub min_age: Option<i64>,
}

impl StudentFilter {
    pub fn matches(&self, student: &Student) -> bool {
        let country_ok = self.country.as_deref().is_none_or(|c| student.address.country == c);
        let age_ok = self.min_age.is_none_or(|min| student.age >= min);
        country_ok && age_ok
    }
}

/// Response body of `POST /students`.
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

/// Response body of `GET /students`.
#[derive(Debug, Serialize)]
pub struct StudentList {
    pub data: Vec<StudentSummary>,
}

/// Acknowledgement body for mutations that return one.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}
