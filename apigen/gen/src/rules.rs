//! Field rule extraction for request-parameter structs.
//!
//! Each field of a request struct may carry an `apivalidator` tag:
//!
//! ```text
//! #[apivalidator("paramname=login,required,min=3")]
//! pub login: String,
//! ```
//!
//! The tag is a comma-separated list of directives:
//!
//! | directive | meaning |
//! |-----------|---------|
//! | `required` | the external value must be present and non-empty |
//! | `paramname=<name>` | external parameter name (default: lower-cased field name) |
//! | `default=<value>` | substituted when the external value is empty |
//! | `enum=<a>\|<b>` | allowed values, matched exactly |
//! | `min=<int>` | minimum length (text) or value (integer) |
//! | `max=<int>` | maximum value (integer) |
//!
//! Unknown directives are ignored. Fields without a tag get an unconstrained rule.

use syn::ext::IdentExt;
use syn::{Field, Fields, ItemStruct, LitStr, Type};
use tracing::debug;

use crate::descriptor::{plain_type_name, render};
use crate::errors::GeneratorError;

/// Attribute name carrying a field's validation directives.
pub const TAG_KEY: &str = "apivalidator";

/// Signed integer types accepted as [`FieldKind::Integer`].
const SIGNED_INTEGERS: &[&str] = &["i8", "i16", "i32", "i64", "i128", "isize"];

/// Unsigned integer types accepted as [`FieldKind::Integer`].
const UNSIGNED_INTEGERS: &[&str] = &["u8", "u16", "u32", "u64", "u128", "usize"];

/// The closed set of scalar kinds a validated field may have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// `String`
    Text,
    /// Any primitive integer, parsed base-10 into `ty`.
    Integer { ty: String, signed: bool },
}

impl FieldKind {
    /// Classifies a field type, `None` for anything outside the closed set.
    pub fn from_type(ty: &Type) -> Option<Self> {
        let name = plain_type_name(ty)?;
        if name == "String" {
            Some(Self::Text)
        } else if SIGNED_INTEGERS.contains(&name.as_str()) {
            Some(Self::Integer {
                ty: name,
                signed: true,
            })
        } else if UNSIGNED_INTEGERS.contains(&name.as_str()) {
            Some(Self::Integer {
                ty: name,
                signed: false,
            })
        } else {
            None
        }
    }
}

/// Directives decoded from one `apivalidator` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorTag {
    pub required: bool,
    pub param_name: Option<String>,
    pub default_value: Option<String>,
    pub enum_values: Vec<String>,
    pub min: i64,
    pub max: i64,
}

/// Validation rule for one field of a request struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Field identifier in the struct, `r#` prefix included for raw identifiers.
    pub source_field: String,
    /// Name of the external query/form parameter.
    pub external_name: String,
    pub required: bool,
    pub default_value: Option<String>,
    pub enum_values: Vec<String>,
    pub min: i64,
    pub max: i64,
    pub kind: FieldKind,
}

/// Decodes a tag string into its directives.
///
/// ## Examples
///
/// ```
/// use apigen_gen::rules::parse_tag;
///
/// let tag = parse_tag("sex", "enum=male|female,default=male").unwrap();
/// assert_eq!(tag.enum_values, vec!["male", "female"]);
/// assert_eq!(tag.default_value.as_deref(), Some("male"));
/// assert!(!tag.required);
/// ```
///
/// ## Errors
///
/// Returns `GeneratorError::InvalidBound` if `min=` or `max=` is not a decimal integer.
pub fn parse_tag(field: &str, tag: &str) -> Result<ValidatorTag, GeneratorError> {
    let mut parsed = ValidatorTag::default();

    for directive in tag.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        if directive == "required" {
            parsed.required = true;
            continue;
        }

        let Some((key, value)) = directive.split_once('=') else {
            continue;
        };

        match key.trim() {
            "paramname" => parsed.param_name = Some(value.to_string()).filter(|v| !v.is_empty()),
            "default" => parsed.default_value = Some(value.to_string()).filter(|v| !v.is_empty()),
            "enum" => parsed.enum_values = value.split('|').map(str::to_string).collect(),
            "min" => parsed.min = parse_bound(field, "min", value)?,
            "max" => parsed.max = parse_bound(field, "max", value)?,
            _ => {}
        }
    }

    Ok(parsed)
}

fn parse_bound(field: &str, directive: &'static str, value: &str) -> Result<i64, GeneratorError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| GeneratorError::InvalidBound {
            field: field.to_string(),
            directive,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Extracts the rule for every field of `item`, in declaration order.
///
/// ## Errors
///
/// - `GeneratorError::InvalidTag` if an `apivalidator` argument is not a string literal
/// - `GeneratorError::InvalidBound` for non-numeric bounds, or bounds the field type cannot hold
/// - `GeneratorError::UnsupportedFieldType` for fields that are neither `String` nor an integer
pub fn extract_rules(item: &ItemStruct) -> Result<Vec<FieldRule>, GeneratorError> {
    let Fields::Named(named) = &item.fields else {
        return Ok(Vec::new());
    };

    let type_name = item.ident.to_string();
    let rules = named
        .named
        .iter()
        .map(|field| extract_field_rule(&type_name, field))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        request_type = %type_name,
        fields = rules.len(),
        "extracted field rules"
    );

    Ok(rules)
}

fn extract_field_rule(type_name: &str, field: &Field) -> Result<FieldRule, GeneratorError> {
    let Some(ident) = &field.ident else {
        return Err(GeneratorError::CodeGenError(format!(
            "struct '{}' has an unnamed field",
            type_name
        )));
    };
    let field_name = ident.unraw().to_string();

    let tag = match field.attrs.iter().find(|attr| attr.path().is_ident(TAG_KEY)) {
        Some(attr) => {
            let literal: LitStr = attr.parse_args().map_err(|source| GeneratorError::InvalidTag {
                field: field_name.clone(),
                source,
            })?;
            parse_tag(&field_name, &literal.value())?
        }
        None => ValidatorTag::default(),
    };

    let kind = FieldKind::from_type(&field.ty).ok_or_else(|| GeneratorError::UnsupportedFieldType {
        type_name: type_name.to_string(),
        field: field_name.clone(),
        found: render(&field.ty),
    })?;

    if let FieldKind::Integer { ty, .. } = &kind {
        for (directive, bound) in [("min", tag.min), ("max", tag.max)] {
            if !bound_fits(ty, bound) {
                return Err(GeneratorError::InvalidBound {
                    field: field_name,
                    directive,
                    value: bound.to_string(),
                    reason: format!("out of range for {}", ty),
                });
            }
        }
    }

    Ok(FieldRule {
        external_name: tag.param_name.unwrap_or_else(|| field_name.to_lowercase()),
        source_field: ident.to_string(),
        required: tag.required,
        default_value: tag.default_value,
        enum_values: tag.enum_values,
        min: tag.min,
        max: tag.max,
        kind,
    })
}

/// Whether `bound` is representable in the integer type named `ty`.
fn bound_fits(ty: &str, bound: i64) -> bool {
    match ty {
        "i8" => i8::try_from(bound).is_ok(),
        "i16" => i16::try_from(bound).is_ok(),
        "i32" => i32::try_from(bound).is_ok(),
        "u8" => u8::try_from(bound).is_ok(),
        "u16" => u16::try_from(bound).is_ok(),
        "u32" => u32::try_from(bound).is_ok(),
        "u64" | "u128" | "usize" => bound >= 0,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(src: &str) -> Result<Vec<FieldRule>, GeneratorError> {
        let item: ItemStruct = syn::parse_str(src).expect("fixture should parse");
        extract_rules(&item)
    }

    #[test]
    fn parse_tag_reads_every_directive() {
        let tag = parse_tag("f", "required, paramname=full_name,default=x,enum=a|b|c,min=2,max=10").unwrap();
        assert_eq!(
            tag,
            ValidatorTag {
                required: true,
                param_name: Some("full_name".to_string()),
                default_value: Some("x".to_string()),
                enum_values: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                min: 2,
                max: 10,
            }
        );
    }

    #[test]
    fn parse_tag_ignores_unknown_and_empty_directives() {
        let tag = parse_tag("f", "strict,,color=blue, ").unwrap();
        assert_eq!(tag, ValidatorTag::default());
    }

    #[test]
    fn parse_tag_accepts_negative_bounds() {
        let tag = parse_tag("f", "min=-5").unwrap();
        assert_eq!(tag.min, -5);
    }

    #[test]
    fn parse_tag_non_numeric_bound_is_fatal() {
        match parse_tag("age", "min=ten") {
            Err(GeneratorError::InvalidBound {
                field,
                directive,
                value,
                ..
            }) => {
                assert_eq!(field, "age");
                assert_eq!(directive, "min");
                assert_eq!(value, "ten");
            }
            other => panic!("Expected InvalidBound, got {:?}", other),
        }
        assert!(matches!(
            parse_tag("age", "max=1.5"),
            Err(GeneratorError::InvalidBound { directive: "max", .. })
        ));
    }

    #[test]
    fn empty_default_and_paramname_are_unset() {
        let tag = parse_tag("f", "default=,paramname=").unwrap();
        assert!(tag.default_value.is_none());
        assert!(tag.param_name.is_none());
    }

    #[test]
    fn extracts_rules_in_declaration_order() {
        let rules = rules(
            r#"
            pub struct ProfileParams {
                #[apivalidator("paramname=login,required")]
                pub user_login: String,
                #[apivalidator("enum=male|female,default=male")]
                pub Sex: String,
                #[apivalidator("min=0,max=128")]
                pub age: i32,
            }
            "#,
        )
        .unwrap();

        assert_eq!(rules.len(), 3);

        assert_eq!(rules[0].source_field, "user_login");
        assert_eq!(rules[0].external_name, "login");
        assert!(rules[0].required);
        assert_eq!(rules[0].kind, FieldKind::Text);

        assert_eq!(rules[1].source_field, "Sex");
        assert_eq!(rules[1].external_name, "sex");
        assert_eq!(rules[1].enum_values, vec!["male", "female"]);
        assert_eq!(rules[1].default_value.as_deref(), Some("male"));

        assert_eq!(rules[2].external_name, "age");
        assert_eq!(rules[2].max, 128);
        assert_eq!(
            rules[2].kind,
            FieldKind::Integer {
                ty: "i32".to_string(),
                signed: true
            }
        );
    }

    // A request struct field without any tag degrades to "no constraint"
    // instead of failing generation.
    #[test]
    fn untagged_field_degrades_to_unconstrained() {
        let rules = rules("struct P { #[serde(default)] note: String, count: u64 }").unwrap();

        assert_eq!(rules[0].external_name, "note");
        assert!(!rules[0].required);
        assert!(rules[0].default_value.is_none());
        assert!(rules[0].enum_values.is_empty());
        assert_eq!((rules[0].min, rules[0].max), (0, 0));
        assert_eq!(
            rules[1].kind,
            FieldKind::Integer {
                ty: "u64".to_string(),
                signed: false
            }
        );
    }

    #[test]
    fn raw_identifiers_keep_prefix_but_not_in_external_name() {
        let rules = rules("struct P { r#type: String }").unwrap();
        assert_eq!(rules[0].source_field, "r#type");
        assert_eq!(rules[0].external_name, "type");
    }

    #[test]
    fn unsupported_field_type_is_fatal() {
        match rules("struct P { name: String, ratio: f64 }") {
            Err(GeneratorError::UnsupportedFieldType {
                type_name,
                field,
                found,
            }) => {
                assert_eq!(type_name, "P");
                assert_eq!(field, "ratio");
                assert_eq!(found, "f64");
            }
            other => panic!("Expected UnsupportedFieldType, got {:?}", other),
        }
        assert!(matches!(
            rules("struct P { tags: Vec<String> }"),
            Err(GeneratorError::UnsupportedFieldType { .. })
        ));
    }

    #[test]
    fn non_literal_tag_is_fatal() {
        assert!(matches!(
            rules("struct P { #[apivalidator(required)] name: String }"),
            Err(GeneratorError::InvalidTag { .. })
        ));
    }

    #[test]
    fn negative_bound_on_unsigned_field_is_fatal() {
        assert!(matches!(
            rules(r#"struct P { #[apivalidator("min=-1")] count: u32 }"#),
            Err(GeneratorError::InvalidBound { directive: "min", .. })
        ));
    }

    #[test]
    fn bound_outside_field_type_is_fatal() {
        match rules(r#"struct P { #[apivalidator("max=300")] level: u8 }"#) {
            Err(GeneratorError::InvalidBound {
                directive, reason, ..
            }) => {
                assert_eq!(directive, "max");
                assert_eq!(reason, "out of range for u8");
            }
            other => panic!("Expected InvalidBound, got {:?}", other),
        }
        assert!(rules(r#"struct P { #[apivalidator("min=-128,max=127")] level: i8 }"#).is_ok());
    }

    #[test]
    fn field_kind_classification() {
        let ty: Type = syn::parse_str("String").unwrap();
        assert_eq!(FieldKind::from_type(&ty), Some(FieldKind::Text));

        let ty: Type = syn::parse_str("usize").unwrap();
        assert!(matches!(
            FieldKind::from_type(&ty),
            Some(FieldKind::Integer { signed: false, .. })
        ));

        let ty: Type = syn::parse_str("std::string::String").unwrap();
        assert_eq!(FieldKind::from_type(&ty), None);

        let ty: Type = syn::parse_str("bool").unwrap();
        assert_eq!(FieldKind::from_type(&ty), None);
    }
}
