//! Core domain types for imessage-wrapped
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Message** | An ordinary row in `chat.db`'s `message` table |
//! | **Reaction** | A tapback, stored as its own row pointing at the message it reacts to |
//! | **Associated type** | `message.associated_message_type`; 0 for messages, 2000-2005 for tapbacks |
//! | **Custom emoji** | `message.associated_message_emoji`; any-emoji reactions from iOS 17 on |
//! | **Direction** | Whether a row was sent by the local user or received |

use std::fmt;

// ============================================
// Raw rows
// ============================================

/// One row of the `message` table, decoded once at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// `ROWID`
    pub id: i64,
    /// `date`, in nanoseconds since 2001-01-01 UTC
    pub timestamp: i64,
    /// `is_from_me`
    pub is_from_me: bool,
    /// `associated_message_type`; None or 0 for ordinary messages
    pub associated_type: Option<i64>,
    /// `associated_message_guid`: the message a reaction points at
    pub associated_guid: Option<String>,
    /// `associated_message_emoji`: custom emoji payload (iOS 17+)
    pub custom_emoji: Option<String>,
}

impl RawRecord {
    /// Build an ordinary message row (mostly useful in tests).
    pub fn message(id: i64, timestamp: i64, is_from_me: bool) -> Self {
        Self {
            id,
            timestamp,
            is_from_me,
            associated_type: None,
            associated_guid: None,
            custom_emoji: None,
        }
    }

    /// Build a reaction row with the given associated type code.
    pub fn reaction(id: i64, timestamp: i64, is_from_me: bool, code: i64) -> Self {
        Self {
            associated_type: Some(code),
            ..Self::message(id, timestamp, is_from_me)
        }
    }

    /// Attach a custom emoji payload.
    pub fn with_custom_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.custom_emoji = Some(emoji.into());
        self
    }
}

// ============================================
// Direction
// ============================================

/// Whether a row originated from the local user or from a correspondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Derive direction from `message.is_from_me`.
    pub fn from_is_from_me(is_from_me: bool) -> Self {
        if is_from_me {
            Direction::Sent
        } else {
            Direction::Received
        }
    }
}

// ============================================
// Reaction kinds
// ============================================

/// The built-in tapback kinds, plus `Unknown` for any code we don't recognize.
///
/// Ordering follows declaration order and is used to break ranking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReactionKind {
    Loved,
    Liked,
    Disliked,
    Laughed,
    Emphasized,
    Questioned,
    Unknown,
}

impl ReactionKind {
    /// Every kind, in ranking tie-break order.
    pub const ALL: [ReactionKind; 7] = [
        ReactionKind::Loved,
        ReactionKind::Liked,
        ReactionKind::Disliked,
        ReactionKind::Laughed,
        ReactionKind::Emphasized,
        ReactionKind::Questioned,
        ReactionKind::Unknown,
    ];

    /// Map an associated type code to a kind. Unrecognized codes are `Unknown`;
    /// the schema grows new codes over time.
    pub fn from_code(code: i64) -> Self {
        match code {
            2000 => ReactionKind::Loved,
            2001 => ReactionKind::Liked,
            2002 => ReactionKind::Disliked,
            2003 => ReactionKind::Laughed,
            2004 => ReactionKind::Emphasized,
            2005 => ReactionKind::Questioned,
            _ => ReactionKind::Unknown,
        }
    }

    /// The associated type code for built-in kinds.
    pub fn code(&self) -> Option<i64> {
        match self {
            ReactionKind::Loved => Some(2000),
            ReactionKind::Liked => Some(2001),
            ReactionKind::Disliked => Some(2002),
            ReactionKind::Laughed => Some(2003),
            ReactionKind::Emphasized => Some(2004),
            ReactionKind::Questioned => Some(2005),
            ReactionKind::Unknown => None,
        }
    }

    /// The glyph Messages shows for this tapback.
    pub fn glyph(&self) -> &'static str {
        match self {
            ReactionKind::Loved => "❤️",
            ReactionKind::Liked => "👍",
            ReactionKind::Disliked => "👎",
            ReactionKind::Laughed => "😂",
            ReactionKind::Emphasized => "‼️",
            ReactionKind::Questioned => "❓",
            ReactionKind::Unknown => "?",
        }
    }

    /// Returns the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ReactionKind::Loved => "Loved",
            ReactionKind::Liked => "Liked",
            ReactionKind::Disliked => "Disliked",
            ReactionKind::Laughed => "Laughed",
            ReactionKind::Emphasized => "Emphasized",
            ReactionKind::Questioned => "Questioned",
            ReactionKind::Unknown => "Unknown",
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ReactionKind::Unknown)
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================
// Classified events
// ============================================

/// A row after classification: either an ordinary message or a reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedEvent {
    Message {
        timestamp: i64,
        direction: Direction,
    },
    Reaction {
        timestamp: i64,
        direction: Direction,
        kind: ReactionKind,
        custom_emoji: Option<String>,
    },
}

impl ClassifiedEvent {
    /// Native timestamp of the underlying row.
    pub fn timestamp(&self) -> i64 {
        match self {
            ClassifiedEvent::Message { timestamp, .. }
            | ClassifiedEvent::Reaction { timestamp, .. } => *timestamp,
        }
    }
}
