use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{EnumIter, EnumString, IntoStaticStr};

pub type CrewId = u32;

#[derive(Debug, Clone, Deserialize, Default, Serialize)]
pub struct Crew(pub BTreeMap<CrewId, CrewMember>);

impl Crew {
    pub fn hire(&mut self, member: CrewMember) -> CrewId {
        let id = self.0.keys().next_back().map(|id| id + 1).unwrap_or(1);
        self.0.insert(id, member);
        id
    }

    pub fn sum_salaries(&self) -> i64 {
        self.0.values().map(|crew| crew.salary()).sum::<i64>()
    }

    pub fn best_skill(&self, skill: Skill) -> u8 {
        self.0
            .values()
            .map(|crew| crew.skill(skill))
            .max()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(EnumIter, EnumString, IntoStaticStr, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[strum(ascii_case_insensitive)]
pub enum Skill {
    Pilot,
    Navigation,
    Engineering,
    Steward,
    Medical,
    Broker,
}

#[derive(EnumIter, EnumString, IntoStaticStr, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum CrewRole {
    Pilot,
    Navigator,
    Engineer,
    Steward,
    Medic,
}

impl CrewRole {
    pub fn monthly_salary(&self) -> i64 {
        match self {
            CrewRole::Pilot => 6_000,
            CrewRole::Navigator => 5_000,
            CrewRole::Engineer => 4_000,
            CrewRole::Steward => 3_000,
            CrewRole::Medic => 2_000,
        }
    }

    pub fn main_skill(&self) -> Skill {
        match self {
            CrewRole::Pilot => Skill::Pilot,
            CrewRole::Navigator => Skill::Navigation,
            CrewRole::Engineer => Skill::Engineering,
            CrewRole::Steward => Skill::Steward,
            CrewRole::Medic => Skill::Medical,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrewMember {
    pub name: String,
    pub role: CrewRole,
    pub skills: BTreeMap<Skill, u8>,
}

impl CrewMember {
    pub fn new(name: &str, role: CrewRole) -> CrewMember {
        let mut skills = BTreeMap::new();
        skills.insert(role.main_skill(), 1);
        CrewMember {
            name: name.to_string(),
            role,
            skills,
        }
    }

    pub fn with_skill(mut self, skill: Skill, level: u8) -> CrewMember {
        self.skills.insert(skill, level);
        self
    }

    #[inline]
    pub fn salary(&self) -> i64 {
        self.role.monthly_salary()
    }

    pub fn skill(&self, skill: Skill) -> u8 {
        self.skills.get(&skill).copied().unwrap_or(0)
    }
}

#[test]
fn test_crew_skills_and_salaries() {
    let mut crew = Crew::default();
    let pilot = crew.hire(CrewMember::new("Jamison", CrewRole::Pilot).with_skill(Skill::Broker, 2));
    let engineer = crew.hire(CrewMember::new("Rhylanor", CrewRole::Engineer).with_skill(Skill::Engineering, 3));
    assert_eq!((pilot, engineer), (1, 2));

    assert_eq!(crew.sum_salaries(), 10_000);
    assert_eq!(crew.best_skill(Skill::Engineering), 3);
    assert_eq!(crew.best_skill(Skill::Broker), 2);
    assert_eq!(crew.best_skill(Skill::Medical), 0);
}
