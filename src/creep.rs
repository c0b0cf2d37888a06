use crate::constants::MAX_CREEP_SIZE;
use crate::world::Capabilities;
use screeps::Part;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a mobile unit was produced for. Reconciliation counts agents per role.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleTag {
    Worker,
    Harvester,
    Hauler,
    Maintainer,
    Defender,
    Healer,
}

impl RoleTag {
    pub fn label(self) -> &'static str {
        match self {
            RoleTag::Worker => "Worker",
            RoleTag::Harvester => "Harvester",
            RoleTag::Hauler => "Hauler",
            RoleTag::Maintainer => "Maintainer",
            RoleTag::Defender => "Defender",
            RoleTag::Healer => "Healer",
        }
    }

    /// Best guess for a unit that has no record, e.g. one produced by hand.
    pub fn infer(capabilities: Capabilities) -> RoleTag {
        if capabilities.contains(Capabilities::HEAL) {
            RoleTag::Healer
        } else if capabilities.intersects(Capabilities::COMBAT) {
            RoleTag::Defender
        } else if capabilities.contains(Capabilities::WORK) {
            RoleTag::Worker
        } else {
            RoleTag::Hauler
        }
    }

    pub fn body_definition(self, maximum_energy: u32) -> SpawnBodyDefinition<'static> {
        match self {
            RoleTag::Worker => SpawnBodyDefinition {
                maximum_energy,
                minimum_repeat: Some(1),
                maximum_repeat: Some(5),
                pre_body: &[],
                repeat_body: &[Part::Work, Part::Carry, Part::Move],
                post_body: &[],
            },
            RoleTag::Harvester => SpawnBodyDefinition {
                maximum_energy,
                minimum_repeat: Some(1),
                maximum_repeat: Some(5),
                pre_body: &[Part::Carry, Part::Move],
                repeat_body: &[Part::Work],
                post_body: &[],
            },
            RoleTag::Hauler => SpawnBodyDefinition {
                maximum_energy,
                minimum_repeat: Some(1),
                maximum_repeat: Some(8),
                pre_body: &[],
                repeat_body: &[Part::Carry, Part::Carry, Part::Move],
                post_body: &[],
            },
            RoleTag::Maintainer => SpawnBodyDefinition {
                maximum_energy,
                minimum_repeat: Some(1),
                maximum_repeat: Some(4),
                pre_body: &[Part::Carry, Part::Move],
                repeat_body: &[Part::Work, Part::Carry, Part::Move],
                post_body: &[],
            },
            RoleTag::Defender => SpawnBodyDefinition {
                maximum_energy,
                minimum_repeat: Some(1),
                maximum_repeat: Some(10),
                pre_body: &[],
                repeat_body: &[Part::Attack, Part::Move],
                post_body: &[],
            },
            RoleTag::Healer => SpawnBodyDefinition {
                maximum_energy,
                minimum_repeat: Some(1),
                maximum_repeat: Some(5),
                pre_body: &[],
                repeat_body: &[Part::Heal, Part::Move],
                post_body: &[],
            },
        }
    }

    pub fn create_body(self, maximum_energy: u32) -> Option<Vec<Part>> {
        self.body_definition(maximum_energy).build()
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct SpawnBodyDefinition<'a> {
    pub maximum_energy: u32,
    pub minimum_repeat: Option<usize>,
    pub maximum_repeat: Option<usize>,
    pub pre_body: &'a [Part],
    pub repeat_body: &'a [Part],
    pub post_body: &'a [Part],
}

impl<'a> SpawnBodyDefinition<'a> {
    /// Largest body within the energy budget and the size cap. `None` when
    /// not even the minimum number of repeats fits.
    pub fn build(&self) -> Option<Vec<Part>> {
        let spare_energy = self.maximum_energy.checked_sub(body_cost(self.pre_body) + body_cost(self.post_body))?;
        let spare_parts = MAX_CREEP_SIZE.checked_sub(self.pre_body.len() + self.post_body.len())?;

        let fitting_repeats = match (self.repeat_body.len(), body_cost(self.repeat_body)) {
            (0, _) => 0,
            (segment_len, 0) => spare_parts / segment_len,
            (segment_len, segment_cost) => (spare_parts / segment_len).min((spare_energy / segment_cost) as usize),
        };

        if fitting_repeats < self.minimum_repeat.unwrap_or(0) {
            return None;
        }

        let repeats = fitting_repeats.min(self.maximum_repeat.unwrap_or(usize::MAX));

        let body = self
            .pre_body
            .iter()
            .chain(self.repeat_body.iter().cycle().take(repeats * self.repeat_body.len()))
            .chain(self.post_body.iter())
            .copied()
            .collect();

        Some(body)
    }
}

pub fn body_cost(body: &[Part]) -> u32 {
    body.iter().map(|part| part.cost()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_scales_with_energy() {
        let small = RoleTag::Worker.create_body(200).unwrap();
        assert_eq!(small, vec![Part::Work, Part::Carry, Part::Move]);

        let large = RoleTag::Worker.create_body(800).unwrap();
        assert_eq!(large.len(), 12);
        assert!(body_cost(&large) <= 800);
    }

    #[test]
    fn body_respects_maximum_repeat() {
        let body = RoleTag::Healer.create_body(10_000).unwrap();

        assert_eq!(body.iter().filter(|p| **p == Part::Heal).count(), 5);
    }

    #[test]
    fn body_fails_below_minimum() {
        assert!(RoleTag::Defender.create_body(50).is_none());
        assert!(RoleTag::Harvester.create_body(90).is_none());
    }

    #[test]
    fn fixed_parts_over_budget_fit_nothing() {
        let definition = SpawnBodyDefinition {
            maximum_energy: 100,
            minimum_repeat: None,
            maximum_repeat: None,
            pre_body: &[Part::Carry, Part::Move, Part::Move],
            repeat_body: &[Part::Work],
            post_body: &[],
        };

        assert_eq!(definition.build(), None);
    }

    #[test]
    fn role_inference_prefers_support_roles() {
        assert_eq!(RoleTag::infer(Capabilities::HEAL | Capabilities::MOVE), RoleTag::Healer);
        assert_eq!(RoleTag::infer(Capabilities::RANGED_ATTACK | Capabilities::MOVE), RoleTag::Defender);
        assert_eq!(RoleTag::infer(Capabilities::WORK | Capabilities::CARRY), RoleTag::Worker);
        assert_eq!(RoleTag::infer(Capabilities::CARRY | Capabilities::MOVE), RoleTag::Hauler);
    }
}
