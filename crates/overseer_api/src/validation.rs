//! # Declarative Property Validation
//!
//! Externally settable surrogate properties carry value rules. The rules are
//! plain data: a table of `(field, rules)` pairs consulted wherever a value
//! enters from outside (a surrogate setter, a configuration file).
//!
//! ```rust
//! use overseer_api::validation::{validate_field, Rule, ValidationError};
//!
//! assert!(validate_field("grenade.fuse_time", 3.0).is_ok());
//! assert!(matches!(
//!     validate_field("grenade.fuse_time", -1.0),
//!     Err(ValidationError { rule: Rule::NonNegative, .. })
//! ));
//! ```

use serde::Serialize;

/// A single value rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Rule {
    /// `value >= 0`
    NonNegative,
    /// `value < bound`, or `value <= bound` when `inclusive` is set
    LessThan { bound: f64, inclusive: bool },
    /// `min <= value <= max`
    InRange { min: f64, max: f64 },
}

impl Rule {
    /// Returns true when `value` satisfies the rule. NaN never does.
    pub fn check(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }

        match *self {
            Rule::NonNegative => value >= 0.0,
            Rule::LessThan { bound, inclusive } => value < bound || (inclusive && value == bound),
            Rule::InRange { min, max } => (min..=max).contains(&value),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::NonNegative => write!(f, "must be non-negative"),
            Rule::LessThan { bound, inclusive: false } => write!(f, "must be less than {bound}"),
            Rule::LessThan { bound, inclusive: true } => write!(f, "must be at most {bound}"),
            Rule::InRange { min, max } => write!(f, "must be between {min} and {max}"),
        }
    }
}

/// Rules attached to one named property.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// A value that broke one of its field's rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value {value} for '{field}': {rule}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: f64,
    pub rule: Rule,
}

/// Every externally settable property with value constraints.
pub const PROPERTY_RULES: &[FieldRule] = &[
    FieldRule { field: "grenade.fuse_time", rules: &[Rule::NonNegative] },
    FieldRule { field: "fpc.walking_speed", rules: &[Rule::NonNegative] },
    FieldRule { field: "fpc.sprinting_speed", rules: &[Rule::NonNegative] },
    FieldRule { field: "fpc.crouching_speed", rules: &[Rule::NonNegative] },
    FieldRule { field: "fpc.jumping_speed", rules: &[Rule::NonNegative] },
    FieldRule {
        field: "fpc.stamina_usage_multiplier",
        rules: &[Rule::NonNegative, Rule::LessThan { bound: 10.0, inclusive: true }],
    },
    FieldRule {
        field: "fpc.stamina_regen_multiplier",
        rules: &[Rule::NonNegative, Rule::LessThan { bound: 10.0, inclusive: true }],
    },
    FieldRule { field: "scp049.sense_distance", rules: &[Rule::NonNegative] },
    FieldRule { field: "scp049.cooldown", rules: &[Rule::NonNegative] },
    FieldRule { field: "scp049.duration", rules: &[Rule::NonNegative] },
    FieldRule { field: "scp939.sound_range", rules: &[Rule::NonNegative] },
    FieldRule { field: "scp3114_ragdoll.reveal_delay", rules: &[Rule::NonNegative] },
    FieldRule { field: "scp3114_ragdoll.reveal_duration", rules: &[Rule::NonNegative] },
    FieldRule { field: "scp3114_ragdoll.reveal_elapsed", rules: &[Rule::NonNegative] },
    FieldRule { field: "door.damage", rules: &[Rule::NonNegative] },
    FieldRule { field: "player.health", rules: &[Rule::NonNegative] },
];

/// Looks up the rules for a field. Unknown fields have no rules.
pub fn rules_for(field: &str) -> &'static [Rule] {
    PROPERTY_RULES
        .iter()
        .find(|entry| entry.field == field)
        .map(|entry| entry.rules)
        .unwrap_or(&[])
}

/// Validates `value` against every rule of `field`, returning the first violation.
pub fn validate_field(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_with(field, rules_for(field), value)
}

/// Validates `value` against an explicit rule list.
pub fn validate_with(field: &'static str, rules: &[Rule], value: f64) -> Result<(), ValidationError> {
    match rules.iter().find(|rule| !rule.check(value)) {
        Some(rule) => Err(ValidationError { field, value, rule: *rule }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        assert!(Rule::NonNegative.check(0.0));
        assert!(Rule::NonNegative.check(12.5));
        assert!(!Rule::NonNegative.check(-0.1));
        assert!(!Rule::NonNegative.check(f64::NAN));
    }

    #[test]
    fn test_less_than_inclusive_and_exclusive() {
        let exclusive = Rule::LessThan { bound: 5.0, inclusive: false };
        let inclusive = Rule::LessThan { bound: 5.0, inclusive: true };

        assert!(exclusive.check(4.9));
        assert!(!exclusive.check(5.0));
        assert!(inclusive.check(5.0));
        assert!(!inclusive.check(5.1));
    }

    #[test]
    fn test_first_violation_is_reported() {
        let err = validate_field("fpc.stamina_usage_multiplier", -1.0).unwrap_err();
        assert_eq!(err.rule, Rule::NonNegative);

        let err = validate_field("fpc.stamina_usage_multiplier", 11.0).unwrap_err();
        assert_eq!(err.rule, Rule::LessThan { bound: 10.0, inclusive: true });
        assert!(err.to_string().contains("fpc.stamina_usage_multiplier"));
    }

    #[test]
    fn test_unknown_field_passes() {
        assert!(rules_for("does.not.exist").is_empty());
        assert!(validate_field("does.not.exist", -100.0).is_ok());
    }

    #[test]
    fn test_table_has_unique_fields() {
        for (i, entry) in PROPERTY_RULES.iter().enumerate() {
            assert!(
                PROPERTY_RULES[i + 1..].iter().all(|other| other.field != entry.field),
                "duplicate rule entry for {}",
                entry.field
            );
        }
    }
}
