//! ECS-backed mirror of the host crew roster.

use hecs::{Entity, World};

use crewqueue_logic::roster::{CrewMember, RosterHost};

use crate::components::*;

/// Crew roster stored as `hecs` entities, one per crew member.
pub struct EcsRoster {
    pub world: World,
    next_hire: u64,
}

impl Default for EcsRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl EcsRoster {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_hire: 0,
        }
    }

    /// Add a crew member. Returns `None` if the name is already taken.
    pub fn hire(&mut self, member: CrewMember) -> Option<Entity> {
        if self.find(&member.name).is_some() {
            log::warn!("Not hiring {}: name already on the roster", member.name);
            return None;
        }
        let kerbal = Kerbal {
            hire_order: self.next_hire,
        };
        self.next_hire += 1;
        Some(self.world.spawn((
            kerbal,
            Name::parse(&member.name),
            Profession::new(member.profession),
            Experience::new(member.experience_level),
            member.status,
            member.kind,
        )))
    }

    /// Spawn a crew entity restored from a snapshot.
    pub fn restore(
        &mut self,
        kerbal: Kerbal,
        name: Name,
        profession: Profession,
        experience: Experience,
        status: RosterStatus,
        kind: CrewKind,
    ) -> Entity {
        self.next_hire = self.next_hire.max(kerbal.hire_order + 1);
        self.world
            .spawn((kerbal, name, profession, experience, status, kind))
    }

    /// Remove a crew member (fired, killed). Returns their last snapshot.
    pub fn dismiss(&mut self, name: &str) -> Option<CrewMember> {
        let entity = self.find(name)?;
        let member = self.member(entity);
        self.world.despawn(entity).ok()?;
        member
    }

    pub fn find(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<(&Kerbal, &Name)>()
            .iter()
            .find(|(_, (_, n))| n.as_str() == name)
            .map(|(entity, _)| entity)
    }

    pub fn member(&self, entity: Entity) -> Option<CrewMember> {
        let mut query = self
            .world
            .query_one::<(&Name, &Profession, &Experience, &RosterStatus, &CrewKind)>(entity)
            .ok()?;
        let (name, profession, experience, status, kind) = query.get()?;
        Some(CrewMember {
            name: name.full_name(),
            profession: profession.title.clone(),
            experience_level: experience.level,
            status: *status,
            kind: *kind,
        })
    }

    pub fn get(&self, name: &str) -> Option<CrewMember> {
        self.find(name).and_then(|e| self.member(e))
    }

    /// Move a crew member to a new name. Fails if `new` is taken.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.find(new).is_some() {
            return false;
        }
        let Some(entity) = self.find(old) else {
            return false;
        };
        match self.world.query_one_mut::<&mut Name>(entity) {
            Ok(name) => {
                *name = Name::parse(new);
                true
            }
            Err(_) => false,
        }
    }

    /// Credit a completed flight.
    pub fn log_flight(&mut self, name: &str) -> bool {
        let Some(entity) = self.find(name) else {
            return false;
        };
        match self.world.query_one_mut::<&mut Experience>(entity) {
            Ok(experience) => {
                experience.log_flight();
                true
            }
            Err(_) => false,
        }
    }

    /// Overwrite the experience level with the host's value.
    pub fn set_experience(&mut self, name: &str, level: u8) -> bool {
        let Some(entity) = self.find(name) else {
            return false;
        };
        match self.world.query_one_mut::<&mut Experience>(entity) {
            Ok(experience) => {
                experience.level = level.min(Experience::MAX_LEVEL);
                true
            }
            Err(_) => false,
        }
    }

    pub fn status(&self, name: &str) -> Option<RosterStatus> {
        self.get(name).map(|m| m.status)
    }

    pub fn len(&self) -> usize {
        self.world.query::<&Kerbal>().iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.next_hire = 0;
    }
}

impl RosterHost for EcsRoster {
    fn members(&self) -> Vec<CrewMember> {
        let mut rows: Vec<(u64, CrewMember)> = self
            .world
            .query::<(&Kerbal, &Name, &Profession, &Experience, &RosterStatus, &CrewKind)>()
            .iter()
            .map(|(_, (kerbal, name, profession, experience, status, kind))| {
                (
                    kerbal.hire_order,
                    CrewMember {
                        name: name.full_name(),
                        profession: profession.title.clone(),
                        experience_level: experience.level,
                        status: *status,
                        kind: *kind,
                    },
                )
            })
            .collect();
        rows.sort_by_key(|(order, _)| *order);
        rows.into_iter().map(|(_, member)| member).collect()
    }

    fn set_status(&mut self, name: &str, status: RosterStatus) -> bool {
        let Some(entity) = self.find(name) else {
            return false;
        };
        match self.world.query_one_mut::<&mut RosterStatus>(entity) {
            Ok(current) => {
                *current = status;
                true
            }
            Err(_) => false,
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> EcsRoster {
        let mut roster = EcsRoster::new();
        roster.hire(CrewMember::new("Jebediah Kerman", "Pilot", 3));
        roster.hire(CrewMember::new("Bill Kerman", "Engineer", 1));
        roster.hire(CrewMember::new("Bob Kerman", "Scientist", 1));
        roster
    }

    #[test]
    fn members_keep_hire_order_after_dismissal() {
        let mut roster = roster();
        assert!(roster.dismiss("Jebediah Kerman").is_some());
        roster.hire(CrewMember::new("Valentina Kerman", "Pilot", 3));
        let names: Vec<_> = roster.members().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Bill Kerman", "Bob Kerman", "Valentina Kerman"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut roster = roster();
        assert!(roster.hire(CrewMember::new("Bob Kerman", "Pilot", 0)).is_none());
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn names_are_matched_verbatim() {
        let mut roster = roster();
        assert!(roster.hire(CrewMember::new("Jebediah Kerman", "Pilot", 0)).is_none());
        assert!(roster.hire(CrewMember::new("Jebediah  Kerman", "Pilot", 0)).is_some());
        assert!(roster.hire(CrewMember::new(" Val Kerman", "Pilot", 0)).is_some());
        assert!(roster.hire(CrewMember::new(" Val Kerman", "Pilot", 0)).is_none());

        assert!(roster.contains(" Val Kerman"));
        assert!(!roster.contains("Val Kerman"));
        let names: Vec<_> = roster.members().into_iter().map(|m| m.name).collect();
        assert_eq!(
            names,
            vec![
                "Jebediah Kerman",
                "Bill Kerman",
                "Bob Kerman",
                "Jebediah  Kerman",
                " Val Kerman"
            ]
        );
    }

    #[test]
    fn set_status_updates_component() {
        let mut roster = roster();
        assert!(roster.set_status("Bill Kerman", RosterStatus::Vacation));
        assert_eq!(roster.status("Bill Kerman"), Some(RosterStatus::Vacation));
        assert!(!roster.set_status("Nobody Kerman", RosterStatus::Vacation));
    }

    #[test]
    fn rename_refuses_taken_names() {
        let mut roster = roster();
        assert!(!roster.rename("Bill Kerman", "Bob Kerman"));
        assert!(roster.rename("Bill Kerman", "William Kerman"));
        assert!(roster.contains("William Kerman"));
        assert!(!roster.contains("Bill Kerman"));
    }

    #[test]
    fn log_flight_raises_experience() {
        let mut roster = roster();
        roster.log_flight("Bob Kerman");
        roster.log_flight("Bob Kerman");
        assert_eq!(roster.get("Bob Kerman").map(|m| m.experience_level), Some(2));
    }

    #[test]
    fn host_experience_overrides_flight_count() {
        let mut roster = roster();
        assert!(roster.set_experience("Bill Kerman", 4));
        roster.log_flight("Bill Kerman");
        assert_eq!(roster.get("Bill Kerman").map(|m| m.experience_level), Some(4));
        assert!(roster.set_experience("Bill Kerman", 9));
        assert_eq!(roster.get("Bill Kerman").map(|m| m.experience_level), Some(5));
        assert!(!roster.set_experience("Nobody Kerman", 1));
    }
}
