//! Coach/athlete linking.
//!
//! An athlete is `unlinked`, `invited` by one or more coaches, or `linked` to
//! exactly one coach. Accepting an invite clears every pending invite.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// A pending invitation from a coach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachRequest {
    pub coach_id: DbId,
    pub coach_name: String,
}

/// The athlete side of the coach relationship.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteLink {
    pub coach_id: Option<DbId>,
    #[serde(default)]
    pub coach_requests: Vec<CoachRequest>,
}

/// Link state of an athlete relative to one coach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unlinked,
    Invited,
    Linked,
}

impl AthleteLink {
    pub fn state_for(&self, coach_id: DbId) -> LinkState {
        if self.coach_id == Some(coach_id) {
            LinkState::Linked
        } else if self.has_invite_from(coach_id) {
            LinkState::Invited
        } else {
            LinkState::Unlinked
        }
    }

    pub fn has_invite_from(&self, coach_id: DbId) -> bool {
        self.coach_requests.iter().any(|r| r.coach_id == coach_id)
    }

    /// Record an invitation from `coach_id` to the athlete `athlete_id`.
    pub fn invite(
        &mut self,
        athlete_id: DbId,
        coach_id: DbId,
        coach_name: &str,
    ) -> Result<(), CoreError> {
        if athlete_id == coach_id {
            return Err(CoreError::Validation(
                "Cannot add yourself as athlete".into(),
            ));
        }
        match self.state_for(coach_id) {
            LinkState::Linked => Err(CoreError::Conflict(
                "Athlete is already linked to this coach".into(),
            )),
            LinkState::Invited => Err(CoreError::Validation("Invitation already sent".into())),
            LinkState::Unlinked => {
                self.coach_requests.push(CoachRequest {
                    coach_id,
                    coach_name: coach_name.to_string(),
                });
                Ok(())
            }
        }
    }

    /// Accept the invitation from `coach_id`.
    ///
    /// Links the athlete and clears ALL pending invitations. Returns the
    /// previously linked coach, if it was a different one.
    pub fn accept(&mut self, coach_id: DbId) -> Result<Option<DbId>, CoreError> {
        if !self.has_invite_from(coach_id) {
            return Err(CoreError::not_found("Invitation", coach_id));
        }
        Ok(self.link_to(coach_id))
    }

    /// Drop only the invitation from `coach_id`. Returns whether one existed.
    pub fn reject(&mut self, coach_id: DbId) -> bool {
        let before = self.coach_requests.len();
        self.coach_requests.retain(|r| r.coach_id != coach_id);
        self.coach_requests.len() != before
    }

    /// Link directly to `coach_id` without an invitation (admin assignment).
    ///
    /// Same effect as accepting: pending invitations are cleared. Returns the
    /// previously linked coach, if it was a different one.
    pub fn link_to(&mut self, coach_id: DbId) -> Option<DbId> {
        let previous = self.coach_id.filter(|&c| c != coach_id);
        self.coach_id = Some(coach_id);
        self.coach_requests.clear();
        previous
    }

    /// Clear the link if it points at `coach_id`. Returns whether it did.
    pub fn unlink(&mut self, coach_id: DbId) -> bool {
        if self.coach_id == Some(coach_id) {
            self.coach_id = None;
            true
        } else {
            false
        }
    }
}

/// Add an athlete to a coach roster. Idempotent; returns whether it changed.
pub fn add_to_roster(roster: &mut Vec<DbId>, athlete_id: DbId) -> bool {
    if roster.contains(&athlete_id) {
        false
    } else {
        roster.push(athlete_id);
        true
    }
}

/// Remove an athlete from a coach roster. Returns whether it changed.
pub fn remove_from_roster(roster: &mut Vec<DbId>, athlete_id: DbId) -> bool {
    let before = roster.len();
    roster.retain(|&id| id != athlete_id);
    roster.len() != before
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const ATHLETE: DbId = 1;
    const COACH_A: DbId = 2;
    const COACH_B: DbId = 3;

    #[test]
    fn invite_moves_to_invited() {
        let mut link = AthleteLink::default();
        assert_eq!(link.state_for(COACH_A), LinkState::Unlinked);
        link.invite(ATHLETE, COACH_A, "Carlos").unwrap();
        assert_eq!(link.state_for(COACH_A), LinkState::Invited);
        assert_eq!(link.coach_requests[0].coach_name, "Carlos");
    }

    #[test]
    fn duplicate_invite_is_rejected() {
        let mut link = AthleteLink::default();
        link.invite(ATHLETE, COACH_A, "Carlos").unwrap();
        assert_matches!(
            link.invite(ATHLETE, COACH_A, "Carlos"),
            Err(CoreError::Validation(_))
        );
        assert_eq!(link.coach_requests.len(), 1);
    }

    #[test]
    fn self_invite_is_rejected() {
        let mut link = AthleteLink::default();
        assert_matches!(
            link.invite(COACH_A, COACH_A, "Carlos"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn invite_from_current_coach_conflicts() {
        let mut link = AthleteLink {
            coach_id: Some(COACH_A),
            coach_requests: vec![],
        };
        assert_matches!(
            link.invite(ATHLETE, COACH_A, "Carlos"),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn accept_links_and_clears_all_invites() {
        let mut link = AthleteLink::default();
        link.invite(ATHLETE, COACH_A, "Carlos").unwrap();
        link.invite(ATHLETE, COACH_B, "Dana").unwrap();

        let previous = link.accept(COACH_B).unwrap();
        assert_eq!(previous, None);
        assert_eq!(link.coach_id, Some(COACH_B));
        assert!(link.coach_requests.is_empty());
        assert_eq!(link.state_for(COACH_A), LinkState::Unlinked);
        assert_eq!(link.state_for(COACH_B), LinkState::Linked);
    }

    #[test]
    fn accept_without_invite_is_not_found() {
        let mut link = AthleteLink::default();
        assert_matches!(link.accept(COACH_A), Err(CoreError::NotFound { .. }));
        assert_eq!(link.coach_id, None);
    }

    #[test]
    fn accept_reports_replaced_coach() {
        let mut link = AthleteLink {
            coach_id: Some(COACH_A),
            coach_requests: vec![],
        };
        link.invite(ATHLETE, COACH_B, "Dana").unwrap();
        assert_eq!(link.accept(COACH_B).unwrap(), Some(COACH_A));
    }

    #[test]
    fn reject_removes_only_the_target_invite() {
        let mut link = AthleteLink::default();
        link.invite(ATHLETE, COACH_A, "Carlos").unwrap();
        link.invite(ATHLETE, COACH_B, "Dana").unwrap();

        assert!(link.reject(COACH_A));
        assert!(!link.reject(COACH_A));
        assert_eq!(link.coach_id, None);
        assert_eq!(link.coach_requests.len(), 1);
        assert_eq!(link.coach_requests[0].coach_id, COACH_B);
    }

    #[test]
    fn unlink_only_clears_matching_coach() {
        let mut link = AthleteLink {
            coach_id: Some(COACH_A),
            coach_requests: vec![],
        };
        assert!(!link.unlink(COACH_B));
        assert_eq!(link.coach_id, Some(COACH_A));
        assert!(link.unlink(COACH_A));
        assert_eq!(link.coach_id, None);
    }

    #[test]
    fn roster_add_is_idempotent() {
        let mut roster = vec![];
        assert!(add_to_roster(&mut roster, ATHLETE));
        assert!(!add_to_roster(&mut roster, ATHLETE));
        assert_eq!(roster, vec![ATHLETE]);
        assert!(remove_from_roster(&mut roster, ATHLETE));
        assert!(roster.is_empty());
    }
}
