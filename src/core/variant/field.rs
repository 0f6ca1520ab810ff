use crate::{
    constants::{MISSING_VALUE, VALUE_SEPARATOR},
    core::header::{FieldDescriptor, FieldKind, FieldNumber, FieldType},
    error::VcfError,
    utils::util::{
        format_float, genotype_count, Result, MISSING_INTEGER, VECTOR_END_INTEGER,
    },
};
use serde::{Deserialize, Serialize};

/// Value stored in one INFO or FORMAT slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Integer(Vec<Option<i32>>),
    Float(Vec<Option<f32>>),
    String(Vec<Option<String>>),
    Flag(bool),
    Missing,
}

impl FieldValue {
    /// Placeholder returned for a declared field that has no value.
    pub fn missing(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Integer => FieldValue::Integer(vec![None]),
            FieldType::Float => FieldValue::Float(vec![None]),
            FieldType::String => FieldValue::String(vec![None]),
            FieldType::Flag => FieldValue::Flag(false),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Integer(_) => "Integer",
            FieldValue::Float(_) => "Float",
            FieldValue::String(_) => "String",
            FieldValue::Flag(_) => "Flag",
            FieldValue::Missing => "missing",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValue::Integer(values) => values.len(),
            FieldValue::Float(values) => values.len(),
            FieldValue::String(values) => values.len(),
            FieldValue::Flag(_) => 0,
            FieldValue::Missing => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Integer(values) => values.iter().all(Option::is_none),
            FieldValue::Float(values) => values.iter().all(Option::is_none),
            FieldValue::String(values) => values.iter().all(Option::is_none),
            FieldValue::Flag(set) => !set,
            FieldValue::Missing => true,
        }
    }

    pub fn as_integers(&self) -> Option<&[Option<i32>]> {
        match self {
            FieldValue::Integer(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_floats(&self) -> Option<&[Option<f32>]> {
        match self {
            FieldValue::Float(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[Option<String>]> {
        match self {
            FieldValue::String(values) => Some(values),
            _ => None,
        }
    }

    /// First string value, if any.
    pub fn as_str(&self) -> Option<&str> {
        self.as_strings()
            .and_then(|values| values.first())
            .and_then(|value| value.as_deref())
    }

    /// Checks the value against the descriptor and returns the form to store.
    /// Integers are widened into Float fields. `Ok(None)` means the slot
    /// should be cleared.
    pub(crate) fn validate(
        self,
        descriptor: &FieldDescriptor,
        n_alleles: usize,
        ploidy: usize,
    ) -> Result<Option<FieldValue>> {
        let kind = descriptor.kind.as_str();
        let type_mismatch = |got: &'static str| VcfError::TypeMismatch {
            kind,
            id: descriptor.id.clone(),
            expected: descriptor.field_type.to_string(),
            got,
        };

        let value = match (descriptor.field_type, self) {
            (_, FieldValue::Missing) => return Ok(None),
            (FieldType::Flag, FieldValue::Flag(set)) => {
                return Ok(set.then_some(FieldValue::Flag(true)));
            }
            (FieldType::Integer, value @ FieldValue::Integer(_))
            | (FieldType::Float, value @ FieldValue::Float(_))
            | (FieldType::String, value @ FieldValue::String(_)) => value,
            (FieldType::Float, FieldValue::Integer(values)) => FieldValue::Float(
                values
                    .into_iter()
                    .map(|value| value.map(|v| v as f32))
                    .collect(),
            ),
            (_, other) => return Err(type_mismatch(other.type_name())),
        };

        if value.is_empty() {
            return Ok(None);
        }

        let invalid_value = |reason: String| VcfError::InvalidValue {
            kind,
            id: descriptor.id.clone(),
            reason,
        };
        match &value {
            FieldValue::String(values) => {
                let forbidden: &[char] = match descriptor.kind {
                    FieldKind::Format => &['\t', '\n', '\r', ':'],
                    FieldKind::Info => &['\t', '\n', '\r', ';', '='],
                };
                if values.iter().flatten().any(String::is_empty) {
                    return Err(invalid_value(
                        "empty string; use a missing value instead".to_string(),
                    ));
                }
                if let Some(bad) = values
                    .iter()
                    .flatten()
                    .find(|s| s.chars().any(|c| forbidden.contains(&c)))
                {
                    return Err(invalid_value(format!("{bad:?} contains a reserved separator")));
                }
            }
            FieldValue::Integer(values) => {
                if let Some(bad) = values
                    .iter()
                    .flatten()
                    .find(|v| matches!(**v, MISSING_INTEGER | VECTOR_END_INTEGER))
                {
                    return Err(invalid_value(format!("{bad} is reserved for missing values")));
                }
            }
            _ => {}
        }

        let got = value.len();
        let arity_mismatch = |expected: String| VcfError::ArityMismatch {
            kind,
            id: descriptor.id.clone(),
            expected,
            got,
        };
        match descriptor.number {
            FieldNumber::Fixed(n) if got > n => {
                return Err(arity_mismatch(format!("at most {n}")));
            }
            FieldNumber::Fixed(_) | FieldNumber::Variable => {}
            FieldNumber::AltAlleles if got != n_alleles - 1 => {
                return Err(arity_mismatch(format!("{} (Number=A)", n_alleles - 1)));
            }
            FieldNumber::Alleles if got != n_alleles => {
                return Err(arity_mismatch(format!("{n_alleles} (Number=R)")));
            }
            FieldNumber::Genotypes => {
                let expected = genotype_count(n_alleles, ploidy).ok_or_else(|| {
                    crate::vcf_error!(
                        "Genotype count overflows for {n_alleles} alleles at ploidy {ploidy}"
                    )
                })?;
                if got != expected {
                    return Err(arity_mismatch(format!(
                        "{expected} (Number=G, ploidy {ploidy})"
                    )));
                }
            }
            FieldNumber::AltAlleles | FieldNumber::Alleles => {}
        }

        Ok(Some(value))
    }

    /// Text form of a stored value. Numeric values of a fixed count are padded
    /// with missing entries; variable-length numeric values drop trailing
    /// missing entries. Strings are written as given.
    pub fn render(&self, number: FieldNumber) -> String {
        fn join<T>(
            values: &[Option<T>],
            number: FieldNumber,
            fmt: impl Fn(&T) -> String,
        ) -> String {
            let mut tokens: Vec<String> = values
                .iter()
                .map(|value| value.as_ref().map_or_else(|| MISSING_VALUE.to_string(), &fmt))
                .collect();
            match number {
                FieldNumber::Fixed(n) => {
                    while tokens.len() < n {
                        tokens.push(MISSING_VALUE.to_string());
                    }
                }
                FieldNumber::Variable => {
                    let keep = values
                        .iter()
                        .rposition(Option::is_some)
                        .map_or(1, |last| last + 1);
                    tokens.truncate(keep);
                }
                _ => {}
            }
            tokens.join(VALUE_SEPARATOR)
        }

        match self {
            FieldValue::Integer(values) => join(values, number, |v| v.to_string()),
            FieldValue::Float(values) => join(values, number, |v| format_float(*v)),
            FieldValue::String(values) => values
                .iter()
                .map(|value| value.as_deref().unwrap_or(MISSING_VALUE))
                .collect::<Vec<_>>()
                .join(VALUE_SEPARATOR),
            FieldValue::Flag(_) | FieldValue::Missing => MISSING_VALUE.to_string(),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(vec![Some(value)])
    }
}

impl From<Vec<i32>> for FieldValue {
    fn from(values: Vec<i32>) -> Self {
        FieldValue::Integer(values.into_iter().map(Some).collect())
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(vec![Some(value)])
    }
}

impl From<Vec<f32>> for FieldValue {
    fn from(values: Vec<f32>) -> Self {
        FieldValue::Float(values.into_iter().map(Some).collect())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(vec![Some(value.to_string())])
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(vec![Some(value)])
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::String(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(number: FieldNumber, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor {
            id: "X".to_string(),
            kind: FieldKind::Format,
            number,
            field_type,
            description: String::new(),
        }
    }

    #[test]
    fn type_mismatch_is_rejected_at_validation() {
        let desc = descriptor(FieldNumber::Fixed(1), FieldType::Integer);
        let err = FieldValue::from("abc").validate(&desc, 2, 2).unwrap_err();
        assert_eq!(
            err,
            VcfError::TypeMismatch {
                kind: "FORMAT",
                id: "X".to_string(),
                expected: "Integer".to_string(),
                got: "String"
            }
        );

        let desc = descriptor(FieldNumber::Fixed(1), FieldType::String);
        assert!(FieldValue::from(true).validate(&desc, 2, 2).is_err());
    }

    #[test]
    fn integers_widen_into_float_fields() {
        let desc = descriptor(FieldNumber::Fixed(2), FieldType::Float);
        let stored = FieldValue::from(vec![1, 2]).validate(&desc, 2, 2).unwrap();
        assert_eq!(stored, Some(FieldValue::Float(vec![Some(1.0), Some(2.0)])));
    }

    #[test]
    fn empty_and_missing_values_clear_the_slot() {
        let desc = descriptor(FieldNumber::Variable, FieldType::Integer);
        assert_eq!(FieldValue::Missing.validate(&desc, 2, 2).unwrap(), None);
        assert_eq!(
            FieldValue::Integer(Vec::new()).validate(&desc, 2, 2).unwrap(),
            None
        );
    }

    #[test]
    fn arity_follows_declared_number() {
        let fixed = descriptor(FieldNumber::Fixed(2), FieldType::Integer);
        assert!(FieldValue::from(vec![1]).validate(&fixed, 2, 2).is_ok());
        assert!(FieldValue::from(vec![1, 2, 3]).validate(&fixed, 2, 2).is_err());

        let per_allele = descriptor(FieldNumber::Alleles, FieldType::Integer);
        assert!(FieldValue::from(vec![10, 5]).validate(&per_allele, 2, 2).is_ok());
        let err = FieldValue::from(vec![10]).validate(&per_allele, 2, 2).unwrap_err();
        assert!(matches!(err, VcfError::ArityMismatch { got: 1, .. }));

        let per_alt = descriptor(FieldNumber::AltAlleles, FieldType::Float);
        assert!(FieldValue::from(vec![0.5f32, 0.25]).validate(&per_alt, 3, 2).is_ok());
        assert!(FieldValue::from(vec![0.5f32]).validate(&per_alt, 3, 2).is_err());

        let per_genotype = descriptor(FieldNumber::Genotypes, FieldType::Integer);
        assert!(FieldValue::from(vec![0, 10, 100]).validate(&per_genotype, 2, 2).is_ok());
        assert!(FieldValue::from(vec![0, 10]).validate(&per_genotype, 2, 1).is_ok());
        assert!(FieldValue::from(vec![0, 10]).validate(&per_genotype, 2, 2).is_err());

        let variable = descriptor(FieldNumber::Variable, FieldType::String);
        assert!(FieldValue::from(vec!["a", "b", "c"])
            .validate(&variable, 2, 2)
            .is_ok());
    }

    #[test]
    fn strings_with_reserved_separators_are_rejected() {
        let desc = descriptor(FieldNumber::Fixed(1), FieldType::String);
        let err = FieldValue::from("a:b").validate(&desc, 2, 2).unwrap_err();
        assert!(matches!(err, VcfError::InvalidValue { .. }));
        assert!(FieldValue::from("a\tb").validate(&desc, 2, 2).is_err());
        assert!(FieldValue::from("a;b=c").validate(&desc, 2, 2).is_ok());
    }

    #[test]
    fn empty_strings_are_rejected() {
        let desc = descriptor(FieldNumber::Fixed(1), FieldType::String);
        let err = FieldValue::from("").validate(&desc, 2, 2).unwrap_err();
        assert!(err.to_string().contains("empty string"));

        let variable = descriptor(FieldNumber::Variable, FieldType::String);
        assert!(FieldValue::from(vec!["a", ""]).validate(&variable, 2, 2).is_err());
        let with_missing = FieldValue::String(vec![Some("a".to_string()), None]);
        assert!(with_missing.validate(&variable, 2, 2).is_ok());
    }

    #[test]
    fn htslib_integer_sentinels_are_rejected() {
        let desc = descriptor(FieldNumber::Variable, FieldType::Integer);
        for reserved in [i32::MIN, i32::MIN + 1] {
            let err = FieldValue::from(vec![1, reserved]).validate(&desc, 2, 2).unwrap_err();
            assert!(matches!(err, VcfError::InvalidValue { .. }));
        }
        assert!(FieldValue::from(i32::MIN + 2).validate(&desc, 2, 2).is_ok());
        assert!(FieldValue::from(i32::MAX).validate(&desc, 2, 2).is_ok());
    }

    #[test]
    fn render_pads_fixed_numeric_and_truncates_variable_numeric() {
        let padded = FieldValue::Integer(vec![Some(3)]);
        assert_eq!(padded.render(FieldNumber::Fixed(3)), "3,.,.");

        let truncated = FieldValue::Integer(vec![Some(1), None, Some(2), None, None]);
        assert_eq!(truncated.render(FieldNumber::Variable), "1,.,2");

        let all_missing = FieldValue::Float(vec![None, None]);
        assert_eq!(all_missing.render(FieldNumber::Variable), ".");

        let floats = FieldValue::Float(vec![Some(0.5), None]);
        assert_eq!(floats.render(FieldNumber::Alleles), "0.5,.");
    }

    #[test]
    fn render_writes_strings_verbatim() {
        let value = FieldValue::from("Universit\u{00E4}t");
        assert_eq!(value.render(FieldNumber::Fixed(3)), "Universit\u{00E4}t");

        let multi = FieldValue::String(vec![Some("a".to_string()), None, Some("bb".to_string())]);
        assert_eq!(multi.render(FieldNumber::Variable), "a,.,bb");
    }

    #[test]
    fn missing_sentinel_matches_declared_type() {
        assert_eq!(
            FieldValue::missing(FieldType::Integer),
            FieldValue::Integer(vec![None])
        );
        assert_eq!(FieldValue::missing(FieldType::Flag), FieldValue::Flag(false));
        assert!(FieldValue::missing(FieldType::String).is_missing());
        assert!(FieldValue::missing(FieldType::Float).is_missing());
        assert_eq!(FieldValue::missing(FieldType::String).as_str(), None);
        assert_eq!(FieldValue::from("x").as_str(), Some("x"));
    }
}
