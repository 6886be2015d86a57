//! Row classification
//!
//! Turns a [`RawRecord`] into a [`ClassifiedEvent`]. Classification is total:
//! every well-formed row becomes exactly one event, and codes we don't know
//! become [`ReactionKind::Unknown`] instead of an error.

use crate::types::{ClassifiedEvent, Direction, RawRecord, ReactionKind};

/// `associated_message_type` value for ordinary messages.
pub const NOT_A_REACTION: i64 = 0;

/// Classify a single `message` row.
///
/// - no associated type (or 0) → [`ClassifiedEvent::Message`]
/// - any other code → [`ClassifiedEvent::Reaction`], kind looked up by code
/// - a non-empty custom emoji is attached to reactions whatever their kind
///
/// Reactions to reactions are classified by the same table; nothing follows
/// `associated_guid`.
pub fn classify(record: &RawRecord) -> ClassifiedEvent {
    let timestamp = record.timestamp;
    let direction = Direction::from_is_from_me(record.is_from_me);

    let code = match record.associated_type {
        None | Some(NOT_A_REACTION) => {
            return ClassifiedEvent::Message {
                timestamp,
                direction,
            }
        }
        Some(code) => code,
    };

    let kind = ReactionKind::from_code(code);
    if kind == ReactionKind::Unknown {
        tracing::debug!(code, row = record.id, "unrecognized associated message type");
    }

    let custom_emoji = record
        .custom_emoji
        .as_deref()
        .filter(|emoji| !emoji.is_empty())
        .map(str::to_owned);

    ClassifiedEvent::Reaction {
        timestamp,
        direction,
        kind,
        custom_emoji,
    }
}
