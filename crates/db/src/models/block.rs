//! Training block entity model and DTOs.

use serde::Serialize;
use totalgrind_core::block_access::BlockOwnership;
use totalgrind_core::training::{BlockSource, Day, Week};
use totalgrind_core::types::{CalendarDate, DbId, Timestamp};

/// A training block with its full weeks document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingBlock {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub source: BlockSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_by: Option<String>,
    pub start_date: CalendarDate,
    pub weeks: Vec<Week>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TrainingBlock {
    /// Access-control facts for this block, given the owner's linked coach.
    pub fn ownership(&self, owner_coach_id: Option<DbId>) -> BlockOwnership {
        BlockOwnership {
            owner_id: self.owner_id,
            owner_coach_id,
            source: self.source,
        }
    }
}

/// DTO for creating a new block.
#[derive(Debug, Clone)]
pub struct CreateBlock {
    pub owner_id: DbId,
    pub title: String,
    pub source: BlockSource,
    pub assigned_by: Option<String>,
    pub start_date: CalendarDate,
    pub weeks: Vec<Week>,
}

/// Result of a successful day completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedDay {
    pub block_id: DbId,
    pub day: Day,
}
