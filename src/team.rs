use crate::error::{RosterError, SwitchRejection};
use crate::model::Creature;
use std::fmt;

pub const MAX_TEAM_SIZE: usize = 6;

#[derive(Debug, Clone)]
pub struct Team {
    label: String,
    members: Vec<Creature>,
    active: usize,
}

impl Team {
    /// The first non-fainted member leads.
    pub fn new(label: impl Into<String>, members: Vec<Creature>) -> Result<Self, RosterError> {
        let label = label.into();
        if members.is_empty() {
            return Err(RosterError::EmptyTeam(label));
        }
        if members.len() > MAX_TEAM_SIZE {
            return Err(RosterError::TeamTooLarge {
                team: label,
                count: members.len(),
            });
        }
        let active = members.iter().position(|m| !m.is_fainted()).unwrap_or(0);
        Ok(Team {
            label,
            members,
            active,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn members(&self) -> &[Creature] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Creature {
        &self.members[self.active]
    }

    pub(crate) fn active_mut(&mut self) -> &mut Creature {
        &mut self.members[self.active]
    }

    pub fn first_non_fainted(&self) -> Option<usize> {
        self.members.iter().position(|m| !m.is_fainted())
    }

    pub fn is_defeated(&self) -> bool {
        self.members.iter().all(Creature::is_fainted)
    }

    /// Checks that `index` names a healthy member other than the active one.
    pub fn check_switch_target(&self, index: usize) -> Result<(), SwitchRejection> {
        let target = self
            .members
            .get(index)
            .ok_or(SwitchRejection::OutOfRange(index))?;
        if target.is_fainted() {
            return Err(SwitchRejection::Fainted(target.name().to_string()));
        }
        if index == self.active {
            return Err(SwitchRejection::AlreadyActive(target.name().to_string()));
        }
        Ok(())
    }

    /// Leaves the active slot unchanged on rejection.
    pub fn switch_to(&mut self, index: usize) -> Result<(), SwitchRejection> {
        self.check_switch_target(index)?;
        self.active = index;
        Ok(())
    }

    /// Full HP and PP for every member, with the first slot leading again.
    pub fn restore_all(&mut self) {
        for member in &mut self.members {
            member.heal(member.max_hp());
            member.restore_pp();
        }
        self.active = 0;
    }

    /// Replacement after a faint; the fainted active slot is not a valid target.
    pub(crate) fn send_in(&mut self, index: usize) {
        debug_assert!(!self.members[index].is_fainted());
        self.active = index;
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.members.iter().map(Creature::name).collect();
        write!(f, "{}: {}", self.label, names.join(", "))
    }
}
