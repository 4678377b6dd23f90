//! Role type enumeration and the team/side derivations built on it.

use serde::{Deserialize, Serialize};

/// Every role the host can assign.
///
/// Raw ids the host reports that this build does not know are preserved in
/// [`RoleTypeId::Unknown`] rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTypeId {
    None,
    Scp173,
    ClassD,
    Spectator,
    Scp106,
    NtfSpecialist,
    Scp049,
    Scientist,
    Scp079,
    ChaosConscript,
    Scp096,
    Scp0492,
    NtfSergeant,
    NtfCaptain,
    NtfPrivate,
    Tutorial,
    FacilityGuard,
    Scp939,
    CustomRole,
    ChaosRifleman,
    ChaosMarauder,
    ChaosRepressor,
    Overwatch,
    Filmmaker,
    Scp3114,
    Destroyed,
    Unknown(i8),
}

const KNOWN: [(i8, RoleTypeId); 26] = [
    (-1, RoleTypeId::None),
    (0, RoleTypeId::Scp173),
    (1, RoleTypeId::ClassD),
    (2, RoleTypeId::Spectator),
    (3, RoleTypeId::Scp106),
    (4, RoleTypeId::NtfSpecialist),
    (5, RoleTypeId::Scp049),
    (6, RoleTypeId::Scientist),
    (7, RoleTypeId::Scp079),
    (8, RoleTypeId::ChaosConscript),
    (9, RoleTypeId::Scp096),
    (10, RoleTypeId::Scp0492),
    (11, RoleTypeId::NtfSergeant),
    (12, RoleTypeId::NtfCaptain),
    (13, RoleTypeId::NtfPrivate),
    (14, RoleTypeId::Tutorial),
    (15, RoleTypeId::FacilityGuard),
    (16, RoleTypeId::Scp939),
    (17, RoleTypeId::CustomRole),
    (18, RoleTypeId::ChaosRifleman),
    (19, RoleTypeId::ChaosMarauder),
    (20, RoleTypeId::ChaosRepressor),
    (21, RoleTypeId::Overwatch),
    (22, RoleTypeId::Filmmaker),
    (23, RoleTypeId::Scp3114),
    (24, RoleTypeId::Destroyed),
];

/// Team a role fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    SCPs,
    FoundationForces,
    ChaosInsurgency,
    Scientists,
    ClassD,
    Dead,
    OtherAlive,
}

/// Coarser grouping of teams used for win conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Mtf,
    ChaosInsurgency,
    Scp,
    Tutorial,
    None,
}

/// Faction credited when a round ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadingTeam {
    FacilityForces,
    ChaosInsurgency,
    Anomalies,
    Draw,
}

impl RoleTypeId {
    pub fn from_raw(raw: i8) -> Self {
        KNOWN
            .iter()
            .find(|(id, _)| *id == raw)
            .map(|(_, role)| *role)
            .unwrap_or(RoleTypeId::Unknown(raw))
    }

    pub fn raw(&self) -> i8 {
        match self {
            RoleTypeId::Unknown(raw) => *raw,
            known => KNOWN
                .iter()
                .find(|(_, role)| role == known)
                .map(|(id, _)| *id)
                .unwrap_or(-1),
        }
    }

    pub fn team(&self) -> Team {
        use RoleTypeId::*;
        match self {
            Scp173 | Scp106 | Scp049 | Scp079 | Scp096 | Scp0492 | Scp939 | Scp3114 => Team::SCPs,
            NtfSpecialist | NtfSergeant | NtfCaptain | NtfPrivate | FacilityGuard => Team::FoundationForces,
            ChaosConscript | ChaosRifleman | ChaosMarauder | ChaosRepressor => Team::ChaosInsurgency,
            Scientist => Team::Scientists,
            ClassD => Team::ClassD,
            Tutorial | CustomRole => Team::OtherAlive,
            None | Spectator | Overwatch | Filmmaker | Destroyed | Unknown(_) => Team::Dead,
        }
    }

    pub fn side(&self) -> Side {
        self.team().side()
    }

    /// Whether the role is driven by the first-person movement module.
    pub fn is_fpc_role(&self) -> bool {
        use RoleTypeId::*;
        !matches!(self, None | Spectator | Overwatch | Filmmaker | Destroyed | Scp079 | Unknown(_))
    }

    pub fn is_scp(&self) -> bool {
        self.team() == Team::SCPs
    }

    pub fn is_human(&self) -> bool {
        !matches!(self.team(), Team::SCPs | Team::Dead)
    }

    pub fn is_dead(&self) -> bool {
        self.team() == Team::Dead
    }

    /// Display name the game shows for the role.
    pub fn full_name(&self) -> String {
        use RoleTypeId::*;
        let name = match self {
            None => "None",
            Scp173 => "SCP-173",
            ClassD => "Class-D Personnel",
            Spectator => "Spectator",
            Scp106 => "SCP-106",
            NtfSpecialist => "NTF Specialist",
            Scp049 => "SCP-049",
            Scientist => "Scientist",
            Scp079 => "SCP-079",
            ChaosConscript => "Chaos Insurgency Conscript",
            Scp096 => "SCP-096",
            Scp0492 => "SCP-049-2",
            NtfSergeant => "NTF Sergeant",
            NtfCaptain => "NTF Captain",
            NtfPrivate => "NTF Private",
            Tutorial => "Tutorial",
            FacilityGuard => "Facility Guard",
            Scp939 => "SCP-939",
            CustomRole => "Custom Role",
            ChaosRifleman => "Chaos Insurgency Rifleman",
            ChaosMarauder => "Chaos Insurgency Marauder",
            ChaosRepressor => "Chaos Insurgency Repressor",
            Overwatch => "Overwatch",
            Filmmaker => "Filmmaker",
            Scp3114 => "SCP-3114",
            Destroyed => "Destroyed",
            Unknown(raw) => return format!("Unknown role ({raw})"),
        };
        name.to_string()
    }
}

impl Default for RoleTypeId {
    fn default() -> Self {
        RoleTypeId::None
    }
}

impl std::fmt::Display for RoleTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl Team {
    pub fn side(&self) -> Side {
        match self {
            Team::SCPs => Side::Scp,
            Team::FoundationForces | Team::Scientists => Side::Mtf,
            Team::ChaosInsurgency | Team::ClassD => Side::ChaosInsurgency,
            Team::OtherAlive => Side::Tutorial,
            Team::Dead => Side::None,
        }
    }

    pub fn leading_team(&self) -> LeadingTeam {
        match self {
            Team::ClassD | Team::ChaosInsurgency => LeadingTeam::ChaosInsurgency,
            Team::FoundationForces | Team::Scientists => LeadingTeam::FacilityForces,
            Team::SCPs => LeadingTeam::Anomalies,
            Team::Dead | Team::OtherAlive => LeadingTeam::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_ids_round_trip_including_unknown() {
        for (raw, role) in KNOWN {
            assert_eq!(RoleTypeId::from_raw(raw), role);
            assert_eq!(role.raw(), raw);
        }
        assert_eq!(RoleTypeId::from_raw(99), RoleTypeId::Unknown(99));
        assert_eq!(RoleTypeId::Unknown(99).raw(), 99);
    }

    #[test]
    fn test_team_side_and_leading_team() {
        assert_eq!(RoleTypeId::Scientist.side(), Side::Mtf);
        assert_eq!(RoleTypeId::ClassD.side(), Side::ChaosInsurgency);
        assert_eq!(RoleTypeId::Tutorial.side(), Side::Tutorial);
        assert_eq!(RoleTypeId::Spectator.side(), Side::None);
        assert_eq!(RoleTypeId::Scp3114.team().leading_team(), LeadingTeam::Anomalies);
        assert_eq!(Team::ClassD.leading_team(), LeadingTeam::ChaosInsurgency);
        assert_eq!(Team::Dead.leading_team(), LeadingTeam::Draw);
    }

    #[test]
    fn test_classification_helpers() {
        assert!(RoleTypeId::Scp049.is_scp());
        assert!(RoleTypeId::Scp049.is_fpc_role());
        assert!(!RoleTypeId::Scp079.is_fpc_role());
        assert!(RoleTypeId::FacilityGuard.is_human());
        assert!(RoleTypeId::Overwatch.is_dead());
        assert!(RoleTypeId::Unknown(50).is_dead());
        assert_eq!(RoleTypeId::Scp0492.full_name(), "SCP-049-2");
    }
}
