//! Effects - side effects declared by the reducer

use crate::pagination::{PageQuery, Stream};

/// Task key of the pending confirm delay.
pub const CONFIRM_TASK: &str = "confirm_team";

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadTypes,
    /// Fetch one page of a stream on behalf of a selection visit
    FetchPage {
        stream: Stream,
        visit: u64,
        query: PageQuery,
        /// The first page of the visit, cancelled when the visit ends
        initial: bool,
    },
    /// The selection visit ended; cancel its outstanding work
    ReleaseSelectionScope { visit: u64 },
    /// Wait before moving on to the overview
    ConfirmTeam { visit: u64, delay_ms: u64 },
    /// Write the finished team to the log
    RecordTeam(TeamSummary),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamSummary {
    pub player_name: String,
    pub team_name: String,
    pub type_id: u32,
    pub members: Vec<String>,
}

pub fn initial_page_key(stream: Stream, visit: u64) -> String {
    format!("page_{}_{visit}_initial", stream.key())
}

pub fn page_key(stream: Stream, visit: u64, offset: u32) -> String {
    format!("page_{}_{visit}_{offset}", stream.key())
}

/// Keys of the tasks a selection visit may leave running.
pub fn selection_scope_keys(visit: u64) -> Vec<String> {
    let mut keys: Vec<String> = Stream::ALL
        .iter()
        .map(|stream| initial_page_key(*stream, visit))
        .collect();
    keys.push(CONFIRM_TASK.to_string());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_covers_initial_pages_and_confirm() {
        assert_eq!(
            selection_scope_keys(3),
            vec![
                "page_same_3_initial".to_string(),
                "page_other_3_initial".to_string(),
                "confirm_team".to_string(),
            ]
        );
    }

    #[test]
    fn load_more_keys_are_per_offset() {
        assert_ne!(
            page_key(Stream::SameType, 1, 4),
            page_key(Stream::SameType, 1, 8)
        );
        assert_ne!(
            page_key(Stream::SameType, 1, 4),
            page_key(Stream::OtherType, 1, 4)
        );
    }
}
