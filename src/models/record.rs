//! The bound configuration record and its field registration tables

use crate::binder::Bindable;
use crate::types::{AppError, BoundValue, FieldSpec, Result, ValueKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fields of [`Pet`]
pub const PET_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", ValueKind::Text),
    FieldSpec::new("breed", ValueKind::Text),
];

/// Fields of [`ConfigRecord`]; aliases keep the older document spellings bindable
pub const PERSON_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("lastName", ValueKind::Text),
    FieldSpec::new("age", ValueKind::Integer),
    FieldSpec::new("isOwner", ValueKind::Boolean).with_aliases(&["boss"]),
    FieldSpec::new("birthDate", ValueKind::DateTime).with_aliases(&["birth"]),
    FieldSpec::new("attributes", ValueKind::Mapping).with_aliases(&["maps"]),
    FieldSpec::new("tags", ValueKind::Sequence).with_aliases(&["list"]),
    FieldSpec::new("pet", ValueKind::Nested(PET_FIELDS)).with_aliases(&["dog"]),
];

/// Person settings bound from the `person` namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub last_name: Option<String>,
    pub age: Option<i32>,
    pub is_owner: Option<bool>,
    pub birth_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub pet: Option<Pet>,
}

/// Nested pet settings (`person.pet.*`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub name: Option<String>,
    pub breed: Option<String>,
}

impl ConfigRecord {
    /// Bind a record from layered sources with default options
    pub fn bind(sources: &[crate::models::PropertySource]) -> Result<Self> {
        crate::binder::Binder::default().bind(sources)
    }

    /// Whether every field still holds its zero value
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn mismatch(field: &str, value: &BoundValue) -> AppError {
    AppError::internal(format!("field '{}' cannot take a {} value", field, value.type_name()))
}

impl Bindable for ConfigRecord {
    const PREFIX: &'static str = crate::defaults::DEFAULT_PREFIX;

    fn fields() -> &'static [FieldSpec] {
        PERSON_FIELDS
    }

    fn apply(&mut self, field: &'static str, value: BoundValue) -> Result<()> {
        match (field, value) {
            ("lastName", BoundValue::Text(v)) => self.last_name = Some(v),
            ("age", BoundValue::Integer(v)) => self.age = Some(v),
            ("isOwner", BoundValue::Boolean(v)) => self.is_owner = Some(v),
            ("birthDate", BoundValue::DateTime(v)) => self.birth_date = Some(v),
            ("attributes", BoundValue::Mapping(v)) => self.attributes = v,
            ("tags", BoundValue::Sequence(v)) => self.tags = v,
            ("pet", BoundValue::Nested(v)) => self.pet = Some(Pet::from_bound(v)?),
            (field, value) => return Err(mismatch(field, &value)),
        }
        Ok(())
    }
}

impl Bindable for Pet {
    const PREFIX: &'static str = "pet";

    fn fields() -> &'static [FieldSpec] {
        PET_FIELDS
    }

    fn apply(&mut self, field: &'static str, value: BoundValue) -> Result<()> {
        match (field, value) {
            ("name", BoundValue::Text(v)) => self.name = Some(v),
            ("breed", BoundValue::Text(v)) => self.breed = Some(v),
            (field, value) => return Err(mismatch(field, &value)),
        }
        Ok(())
    }
}

struct Quoted<'a>(&'a Option<String>);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "'{}'", v),
            None => write!(f, "null"),
        }
    }
}

fn or_null<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "null".to_string())
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pet{{name={}, breed={}}}", Quoted(&self.name), Quoted(&self.breed))
    }
}

impl fmt::Display for ConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes: Vec<String> = self.attributes.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(
            f,
            "Person{{lastName={}, age={}, isOwner={}, birthDate={}, attributes={{{}}}, tags=[{}], pet={}}}",
            Quoted(&self.last_name),
            or_null(&self.age),
            or_null(&self.is_owner),
            or_null(&self.birth_date),
            attributes.join(", "),
            self.tags.join(", "),
            or_null(&self.pet),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_zero() {
        let record = ConfigRecord::default();
        assert!(record.is_empty());
        assert_eq!(
            record.to_string(),
            "Person{lastName=null, age=null, isOwner=null, birthDate=null, attributes={}, tags=[], pet=null}"
        );
    }

    #[test]
    fn test_apply_sets_fields() {
        let mut record = ConfigRecord::default();
        record.apply("lastName", BoundValue::Text("Li".to_string())).unwrap();
        record.apply("age", BoundValue::Integer(18)).unwrap();

        let mut pet = crate::types::BoundFields::new();
        pet.insert("name", BoundValue::Text("Tom".to_string()));
        record.apply("pet", BoundValue::Nested(pet)).unwrap();

        assert_eq!(record.last_name.as_deref(), Some("Li"));
        assert_eq!(record.age, Some(18));
        assert_eq!(record.pet, Some(Pet { name: Some("Tom".to_string()), breed: None }));
        assert!(record.to_string().contains("pet=Pet{name='Tom', breed=null}"));
    }

    #[test]
    fn test_apply_rejects_mismatched_value() {
        let mut record = ConfigRecord::default();
        let err = record.apply("age", BoundValue::Text("x".to_string())).unwrap_err();
        assert_eq!(err.category(), "INTERNAL");
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = ConfigRecord {
            last_name: Some("Li".to_string()),
            is_owner: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lastName"], "Li");
        assert_eq!(json["isOwner"], true);
        assert!(json["birthDate"].is_null());
    }

    #[test]
    fn test_registration_tables_cover_fields() {
        let names: Vec<_> = PERSON_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["lastName", "age", "isOwner", "birthDate", "attributes", "tags", "pet"]);
        assert!(PERSON_FIELDS.iter().all(|f| f.default.is_none()));
    }
}
