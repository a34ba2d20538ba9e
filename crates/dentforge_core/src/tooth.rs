//! Tooth categories and conditions
//!
//! Both are closed sets. Text enters through [`FromStr`], which rejects any
//! unknown name instead of falling back to a default.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::ToothError;

/// Anatomical tooth type, controlling the base silhouette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToothCategory {
    /// Flat crown with a thin cutting edge, single root
    Incisor,
    /// Single pointed cusp, longest root
    Canine,
    /// Two cusps, moderate root
    Premolar,
    /// Four cusps, widest crown, several roots
    Molar,
}

impl ToothCategory {
    /// Every category, in display order
    pub const ALL: [ToothCategory; 4] = [
        ToothCategory::Incisor,
        ToothCategory::Canine,
        ToothCategory::Premolar,
        ToothCategory::Molar,
    ];

    /// Canonical lower-case name
    pub fn name(self) -> &'static str {
        match self {
            ToothCategory::Incisor => "incisor",
            ToothCategory::Canine => "canine",
            ToothCategory::Premolar => "premolar",
            ToothCategory::Molar => "molar",
        }
    }
}

impl fmt::Display for ToothCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToothCategory {
    type Err = ToothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToothCategory::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ToothError::InvalidCategory(s.to_string()))
    }
}

/// Clinical or cosmetic state layered onto the base shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToothCondition {
    /// Untouched tooth
    Healthy,
    /// Pitted crown surface
    Cavity,
    /// Prosthetic cap over the crown
    Crown,
    /// Titanium post below the roots
    Implant,
    /// Bonded shell over the front surface
    Veneer,
    /// Filling insert in the access cavity
    RootCanal,
}

impl ToothCondition {
    /// Every condition, in display order
    pub const ALL: [ToothCondition; 6] = [
        ToothCondition::Healthy,
        ToothCondition::Cavity,
        ToothCondition::Crown,
        ToothCondition::Implant,
        ToothCondition::Veneer,
        ToothCondition::RootCanal,
    ];

    /// Canonical lower-case name
    pub fn name(self) -> &'static str {
        match self {
            ToothCondition::Healthy => "healthy",
            ToothCondition::Cavity => "cavity",
            ToothCondition::Crown => "crown",
            ToothCondition::Implant => "implant",
            ToothCondition::Veneer => "veneer",
            ToothCondition::RootCanal => "root_canal",
        }
    }

    /// Whether generation for this condition draws on the random source
    pub fn is_stochastic(self) -> bool {
        matches!(self, ToothCondition::Cavity)
    }
}

impl fmt::Display for ToothCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToothCondition {
    type Err = ToothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToothCondition::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ToothError::InvalidCondition(s.to_string()))
    }
}

/// Composite cache key and tooth name: `"{category}_{condition}"`
pub fn tooth_key(category: ToothCategory, condition: ToothCondition) -> String {
    format!("{}_{}", category, condition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_round_trip() {
        for category in ToothCategory::ALL {
            assert_eq!(category.name().parse::<ToothCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_condition_names_round_trip() {
        for condition in ToothCondition::ALL {
            assert_eq!(condition.name().parse::<ToothCondition>().unwrap(), condition);
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        for name in ["wisdom", "", "Molar", "molar "] {
            assert_eq!(
                name.parse::<ToothCategory>(),
                Err(ToothError::InvalidCategory(name.to_string()))
            );
        }
    }

    #[test]
    fn test_unknown_condition_rejected() {
        for name in ["braces", "root-canal", "HEALTHY"] {
            assert_eq!(
                name.parse::<ToothCondition>(),
                Err(ToothError::InvalidCondition(name.to_string()))
            );
        }
    }

    #[test]
    fn test_tooth_key() {
        assert_eq!(tooth_key(ToothCategory::Molar, ToothCondition::Implant), "molar_implant");
        assert_eq!(tooth_key(ToothCategory::Canine, ToothCondition::RootCanal), "canine_root_canal");
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let text = ron::to_string(&ToothCondition::RootCanal).unwrap();
        assert_eq!(text, "root_canal");
        let back: ToothCategory = ron::from_str("premolar").unwrap();
        assert_eq!(back, ToothCategory::Premolar);
    }

    #[test]
    fn test_only_cavity_is_stochastic() {
        let stochastic: Vec<_> = ToothCondition::ALL
            .into_iter()
            .filter(|c| c.is_stochastic())
            .collect();
        assert_eq!(stochastic, vec![ToothCondition::Cavity]);
    }
}
