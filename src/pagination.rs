//! Paged accumulation of catalog results, one cursor per stream.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::Pokemon;

/// The two independent result sets of the selection step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Stream {
    /// Pokemon that have the chosen type
    SameType,
    /// Pokemon that have a type other than the chosen one
    OtherType,
}

impl Stream {
    pub const ALL: [Stream; 2] = [Stream::SameType, Stream::OtherType];

    pub fn index(self) -> usize {
        match self {
            Stream::SameType => 0,
            Stream::OtherType => 1,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Stream::SameType => "same",
            Stream::OtherType => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stream::SameType => "Pokemons of the chosen type",
            Stream::OtherType => "Pokemons of different type",
        }
    }

    pub fn other(self) -> Stream {
        match self {
            Stream::SameType => Stream::OtherType,
            Stream::OtherType => Stream::SameType,
        }
    }

    pub fn filter(self, type_id: u32) -> TypeFilter {
        match self {
            Stream::SameType => TypeFilter::Matching(type_id),
            Stream::OtherType => TypeFilter::Excluding(type_id),
        }
    }
}

/// Catalog predicate on a pokemon's type slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TypeFilter {
    Matching(u32),
    Excluding(u32),
}

impl TypeFilter {
    pub fn type_id(self) -> u32 {
        match self {
            TypeFilter::Matching(id) | TypeFilter::Excluding(id) => id,
        }
    }

    /// GraphQL comparison operator for this predicate.
    pub fn operator(self) -> &'static str {
        match self {
            TypeFilter::Matching(_) => "_eq",
            TypeFilter::Excluding(_) => "_neq",
        }
    }
}

/// One page request against the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageQuery {
    pub filter: TypeFilter,
    pub limit: u32,
    pub offset: u32,
}

/// Offset cursor and accumulated items of one stream.
///
/// The offset only moves after a non-empty page arrives, and an empty page
/// marks the stream exhausted for the rest of the visit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageCursor {
    pub stream: Stream,
    pub offset: u32,
    pub items: Vec<Pokemon>,
    pub is_loading: bool,
    pub is_exhausted: bool,
}

impl PageCursor {
    pub fn new(stream: Stream) -> Self {
        Self {
            stream,
            offset: 0,
            items: Vec::new(),
            is_loading: false,
            is_exhausted: false,
        }
    }

    /// Whether a "load more" may be offered right now.
    pub fn can_fetch(&self) -> bool {
        !self.is_loading && !self.is_exhausted
    }

    /// Mark the cursor busy and hand out the offset to request.
    pub fn begin_fetch(&mut self) -> Option<u32> {
        if !self.can_fetch() {
            return None;
        }
        self.is_loading = true;
        Some(self.offset)
    }

    /// Merge a completed page. Returns how many items were appended.
    pub fn complete(&mut self, items: Vec<Pokemon>, page_size: u32) -> usize {
        self.is_loading = false;
        if items.is_empty() {
            self.is_exhausted = true;
            return 0;
        }
        let before = self.items.len();
        for item in items {
            if !self.contains(item.id) {
                self.items.push(item);
            }
        }
        self.offset += page_size;
        self.items.len() - before
    }

    pub fn fail(&mut self) {
        self.is_loading = false;
    }

    pub fn contains(&self, id: u32) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}
