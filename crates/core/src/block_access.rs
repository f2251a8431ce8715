//! Who may view, structurally edit, or delete a training block.
//!
//! Update and delete deliberately differ: the owner of an `assigned` block may
//! delete it but may not edit it.

use crate::error::CoreError;
use crate::training::BlockSource;
use crate::types::DbId;

/// The facts about a block that access decisions depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOwnership {
    pub owner_id: DbId,
    /// The owner's currently linked coach, if any.
    pub owner_coach_id: Option<DbId>,
    pub source: BlockSource,
}

/// The user asking to act on a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: DbId,
    pub is_admin: bool,
}

/// How the requester relates to the block's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Admin,
    Owner,
    LinkedCoach,
    Stranger,
}

impl BlockOwnership {
    pub fn relation_of(&self, requester: &Requester) -> Relation {
        if requester.is_admin {
            Relation::Admin
        } else if requester.user_id == self.owner_id {
            Relation::Owner
        } else if self.owner_coach_id == Some(requester.user_id) {
            Relation::LinkedCoach
        } else {
            Relation::Stranger
        }
    }
}

/// Reading a block: owner, linked coach, or admin.
pub fn authorize_block_view(
    ownership: &BlockOwnership,
    requester: &Requester,
) -> Result<(), CoreError> {
    match ownership.relation_of(requester) {
        Relation::Stranger => Err(CoreError::Forbidden(
            "Not allowed to view this block".into(),
        )),
        _ => Ok(()),
    }
}

/// Structural update (title, schedule, weeks).
///
/// Strangers are rejected; the owner is rejected on `assigned` blocks; the
/// linked coach and admins may always edit.
pub fn authorize_block_update(
    ownership: &BlockOwnership,
    requester: &Requester,
) -> Result<(), CoreError> {
    match ownership.relation_of(requester) {
        Relation::Stranger => Err(CoreError::Forbidden("Unauthorized".into())),
        Relation::Owner if ownership.source == BlockSource::Assigned => {
            Err(CoreError::Forbidden(
                "Cannot edit assigned blocks. Contact your coach for changes.".into(),
            ))
        }
        Relation::Owner | Relation::LinkedCoach | Relation::Admin => Ok(()),
    }
}

/// Deletion: owner or linked coach (or admin), with no assigned-block
/// exception.
pub fn authorize_block_delete(
    ownership: &BlockOwnership,
    requester: &Requester,
) -> Result<(), CoreError> {
    match ownership.relation_of(requester) {
        Relation::Stranger => Err(CoreError::Forbidden(
            "Unauthorized to delete this block".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const ATHLETE: DbId = 10;
    const COACH: DbId = 20;
    const STRANGER: DbId = 30;

    fn block(source: BlockSource, coach: Option<DbId>) -> BlockOwnership {
        BlockOwnership {
            owner_id: ATHLETE,
            owner_coach_id: coach,
            source,
        }
    }

    fn user(id: DbId) -> Requester {
        Requester {
            user_id: id,
            is_admin: false,
        }
    }

    #[test]
    fn owner_can_update_personal_block() {
        let b = block(BlockSource::Personal, Some(COACH));
        assert!(authorize_block_update(&b, &user(ATHLETE)).is_ok());
    }

    #[test]
    fn owner_cannot_update_assigned_block() {
        let b = block(BlockSource::Assigned, Some(COACH));
        assert_matches!(
            authorize_block_update(&b, &user(ATHLETE)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn linked_coach_can_update_assigned_block() {
        let b = block(BlockSource::Assigned, Some(COACH));
        assert!(authorize_block_update(&b, &user(COACH)).is_ok());
    }

    #[test]
    fn stranger_cannot_update_or_delete() {
        let b = block(BlockSource::Personal, Some(COACH));
        assert_matches!(
            authorize_block_update(&b, &user(STRANGER)),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authorize_block_delete(&b, &user(STRANGER)),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authorize_block_view(&b, &user(STRANGER)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn unlinked_coach_is_a_stranger() {
        let b = block(BlockSource::Assigned, None);
        assert_eq!(b.relation_of(&user(COACH)), Relation::Stranger);
    }

    #[test]
    fn owner_can_delete_assigned_block() {
        let b = block(BlockSource::Assigned, Some(COACH));
        assert!(authorize_block_delete(&b, &user(ATHLETE)).is_ok());
        assert!(authorize_block_delete(&b, &user(COACH)).is_ok());
    }

    #[test]
    fn admin_may_do_anything() {
        let b = block(BlockSource::Assigned, None);
        let admin = Requester {
            user_id: STRANGER,
            is_admin: true,
        };
        assert!(authorize_block_view(&b, &admin).is_ok());
        assert!(authorize_block_update(&b, &admin).is_ok());
        assert!(authorize_block_delete(&b, &admin).is_ok());
    }
}
