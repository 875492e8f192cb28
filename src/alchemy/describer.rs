use super::catalog::Catalogs;
use super::effect::RealizedEffect;
use std::collections::HashMap;
use std::fmt;

/// Renders realized effects with their catalog description templates.
///
/// Templates use `<mag>` and `<dur>` placeholders, e.g.
/// `"Restore <mag> points of Health."`.
pub struct EffectDescriber<'a> {
    effect_to_template: HashMap<&'a str, &'a str>,
}

impl<'a> EffectDescriber<'a> {
    pub fn new(catalogs: &'a Catalogs) -> Self {
        let mut effect_to_template = HashMap::new();

        for e in catalogs.effects() {
            if let Some(t) = &e.description_template {
                effect_to_template.insert(&e.name[..], &t[..]);
            }
        }

        Self { effect_to_template }
    }

    pub fn description(&self, e: &RealizedEffect) -> String {
        match self.effect_to_template.get(&e.name[..]) {
            Some(t) => t
                .replace("<mag>", &e.magnitude.to_string())
                .replace("<dur>", &e.duration.to_string()),
            None => format!(
                "{}: magnitude {} for {} seconds",
                e.name, e.magnitude, e.duration
            ),
        }
    }

    pub fn describe(&self, e: &RealizedEffect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  - {} ({} gold)", self.description(e), e.value)
    }
}
