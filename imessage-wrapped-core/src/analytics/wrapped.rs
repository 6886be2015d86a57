//! Wrapped - Year in Review
//!
//! Aggregates classified message rows into a [`YearStats`] for one calendar
//! year. Rankings ("top reactions") are derived on demand from the counters
//! and never stored.

use std::collections::BTreeMap;

use chrono::{Local, TimeZone};

use crate::classify::classify;
use crate::db::Database;
use crate::time::{calendar_date_in, year_range_in};
use crate::types::{ClassifiedEvent, Direction, ReactionKind};

/// Statistics for one calendar year. Built once by [`aggregate`], read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearStats {
    year: i32,
    total_sent: u64,
    total_received: u64,
    messages_by_month: [u64; 12],
    reactions_given: BTreeMap<ReactionKind, u64>,
    reactions_received: BTreeMap<ReactionKind, u64>,
    custom_emoji: BTreeMap<String, u64>,
    custom_emoji_given: BTreeMap<String, u64>,
    /// Reactions carrying both a built-in kind and a custom emoji, by kind
    emoji_over_kind: BTreeMap<ReactionKind, u64>,
}

/// A row of the combined reaction ranking: a tapback kind or a custom emoji.
///
/// Ordering puts kinds (in kind order) before custom emoji (lexically).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReactionLabel {
    Kind(ReactionKind),
    Custom(String),
}

impl ReactionLabel {
    /// What to print for this reaction.
    pub fn glyph(&self) -> &str {
        match self {
            ReactionLabel::Kind(kind) => kind.glyph(),
            ReactionLabel::Custom(emoji) => emoji,
        }
    }
}

impl YearStats {
    fn empty(year: i32) -> Self {
        Self {
            year,
            total_sent: 0,
            total_received: 0,
            messages_by_month: [0; 12],
            reactions_given: BTreeMap::new(),
            reactions_received: BTreeMap::new(),
            custom_emoji: BTreeMap::new(),
            custom_emoji_given: BTreeMap::new(),
            emoji_over_kind: BTreeMap::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Ordinary messages sent.
    pub fn total_sent(&self) -> u64 {
        self.total_sent
    }

    /// Ordinary messages received.
    pub fn total_received(&self) -> u64 {
        self.total_received
    }

    pub fn total_messages(&self) -> u64 {
        self.total_sent + self.total_received
    }

    /// Ordinary messages per month, January first.
    pub fn messages_by_month(&self) -> &[u64; 12] {
        &self.messages_by_month
    }

    /// Reactions sent, by kind. Kinds never seen are absent.
    pub fn reactions_given_by_kind(&self) -> &BTreeMap<ReactionKind, u64> {
        &self.reactions_given
    }

    /// Reactions received, by kind. Kinds never seen are absent.
    pub fn reactions_received_by_kind(&self) -> &BTreeMap<ReactionKind, u64> {
        &self.reactions_received
    }

    /// Custom emoji reactions in either direction.
    pub fn custom_emoji_counts(&self) -> &BTreeMap<String, u64> {
        &self.custom_emoji
    }

    /// Custom emoji reactions sent by the local user.
    pub fn custom_emoji_given(&self) -> &BTreeMap<String, u64> {
        &self.custom_emoji_given
    }

    pub fn reactions_given_total(&self) -> u64 {
        self.reactions_given.values().sum()
    }

    pub fn reactions_received_total(&self) -> u64 {
        self.reactions_received.values().sum()
    }

    /// True when nothing at all was counted for the year.
    pub fn is_empty(&self) -> bool {
        self.total_messages() == 0
            && self.reactions_given.is_empty()
            && self.reactions_received.is_empty()
    }

    /// Month (1-12) with the most messages, earliest month on ties.
    pub fn busiest_month(&self) -> Option<(u32, u64)> {
        self.messages_by_month
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .max_by(|(a_month, a), (b_month, b)| a.cmp(b).then(b_month.cmp(a_month)))
            .map(|(month, &count)| (month as u32 + 1, count))
    }

    /// Kinds the local user reacted with, most used first.
    pub fn top_reactions_given(&self, limit: usize) -> Vec<(ReactionKind, u64)> {
        rank(self.reactions_given.iter().map(|(k, c)| (*k, *c)), limit)
    }

    /// Kinds across both directions, most used first.
    pub fn top_reactions(&self, limit: usize) -> Vec<(ReactionKind, u64)> {
        let mut combined = self.reactions_given.clone();
        for (kind, count) in &self.reactions_received {
            *combined.entry(*kind).or_insert(0) += count;
        }
        rank(combined, limit)
    }

    /// Custom emoji the local user reacted with, most used first.
    pub fn top_custom_emoji_given(&self, limit: usize) -> Vec<(String, u64)> {
        rank(
            self.custom_emoji_given
                .iter()
                .map(|(emoji, count)| (emoji.clone(), *count)),
            limit,
        )
    }

    /// Built-in tapbacks and custom emoji in one ranking, both directions.
    ///
    /// Each reaction counts once. One carrying an emoji counts under the emoji,
    /// whatever its kind, so `Unknown` never appears here.
    pub fn top_reactions_overall(&self, limit: usize) -> Vec<(ReactionLabel, u64)> {
        let kinds = self
            .top_reactions(usize::MAX)
            .into_iter()
            .filter(|(kind, _)| kind.is_builtin())
            .map(|(kind, count)| {
                let shadowed = self.emoji_over_kind.get(&kind).copied().unwrap_or(0);
                (ReactionLabel::Kind(kind), count.saturating_sub(shadowed))
            });
        let custom = self
            .custom_emoji
            .iter()
            .map(|(emoji, count)| (ReactionLabel::Custom(emoji.clone()), *count));
        rank(kinds.chain(custom), limit)
    }
}

/// Sort by count descending, then by key, dropping zero counts.
fn rank<K: Ord>(counts: impl IntoIterator<Item = (K, u64)>, limit: usize) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = counts.into_iter().filter(|(_, c)| *c > 0).collect();
    ranked.sort_by(|(a_key, a), (b_key, b)| b.cmp(a).then_with(|| a_key.cmp(b_key)));
    ranked.truncate(limit);
    ranked
}

/// Accumulates events for one year.
///
/// Counters are plain sums, so accumulators built over disjoint slices of the
/// input can be combined with [`YearAccumulator::merge`] in any order.
#[derive(Debug, Clone)]
pub struct YearAccumulator<Tz: TimeZone> {
    stats: YearStats,
    tz: Tz,
    dropped: u64,
}

impl<Tz: TimeZone> YearAccumulator<Tz> {
    pub fn with_time_zone(year: i32, tz: Tz) -> Self {
        Self {
            stats: YearStats::empty(year),
            tz,
            dropped: 0,
        }
    }

    /// Count one event. Returns false if it falls outside the year.
    pub fn record(&mut self, event: ClassifiedEvent) -> bool {
        let (year, month) = calendar_date_in(event.timestamp(), &self.tz);
        if year != self.stats.year {
            self.dropped += 1;
            return false;
        }

        let stats = &mut self.stats;
        match event {
            ClassifiedEvent::Message { direction, .. } => {
                match direction {
                    Direction::Sent => stats.total_sent += 1,
                    Direction::Received => stats.total_received += 1,
                }
                stats.messages_by_month[month as usize - 1] += 1;
            }
            ClassifiedEvent::Reaction {
                direction,
                kind,
                custom_emoji,
                ..
            } => {
                let by_kind = match direction {
                    Direction::Sent => &mut stats.reactions_given,
                    Direction::Received => &mut stats.reactions_received,
                };
                *by_kind.entry(kind).or_insert(0) += 1;

                if let Some(emoji) = custom_emoji {
                    if kind.is_builtin() {
                        *stats.emoji_over_kind.entry(kind).or_insert(0) += 1;
                    }
                    if direction == Direction::Sent {
                        *stats.custom_emoji_given.entry(emoji.clone()).or_insert(0) += 1;
                    }
                    *stats.custom_emoji.entry(emoji).or_insert(0) += 1;
                }
            }
        }
        true
    }

    /// Combine with an accumulator for the same year.
    pub fn merge(mut self, other: Self) -> Self {
        debug_assert_eq!(self.stats.year, other.stats.year);
        let stats = &mut self.stats;
        let theirs = other.stats;

        stats.total_sent += theirs.total_sent;
        stats.total_received += theirs.total_received;
        for (mine, their) in stats.messages_by_month.iter_mut().zip(theirs.messages_by_month) {
            *mine += their;
        }
        merge_counts(&mut stats.reactions_given, theirs.reactions_given);
        merge_counts(&mut stats.reactions_received, theirs.reactions_received);
        merge_counts(&mut stats.custom_emoji, theirs.custom_emoji);
        merge_counts(&mut stats.custom_emoji_given, theirs.custom_emoji_given);
        merge_counts(&mut stats.emoji_over_kind, theirs.emoji_over_kind);

        self.dropped += other.dropped;
        self
    }

    /// Events discarded for falling outside the year.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn finish(self) -> YearStats {
        self.stats
    }
}

fn merge_counts<K: Ord>(into: &mut BTreeMap<K, u64>, from: BTreeMap<K, u64>) {
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}

/// Aggregate events into statistics for `year`, bucketing by local time.
///
/// Events outside the year are ignored; no ordering is assumed.
pub fn aggregate(events: impl IntoIterator<Item = ClassifiedEvent>, year: i32) -> YearStats {
    aggregate_in(events, year, &Local)
}

/// [`aggregate`] with an explicit time zone.
pub fn aggregate_in<Tz: TimeZone>(
    events: impl IntoIterator<Item = ClassifiedEvent>,
    year: i32,
    tz: &Tz,
) -> YearStats {
    let mut acc = YearAccumulator::with_time_zone(year, tz.clone());
    let mut retained = 0u64;
    for event in events {
        if acc.record(event) {
            retained += 1;
        }
    }
    tracing::debug!(year, retained, dropped = acc.dropped(), "aggregated events");
    acc.finish()
}

/// Generate wrapped statistics for `year` from the message database.
pub fn generate_wrapped(db: &Database, year: i32) -> crate::Result<YearStats> {
    generate_wrapped_in(db, year, &Local)
}

/// [`generate_wrapped`] with an explicit time zone.
pub fn generate_wrapped_in<Tz: TimeZone>(
    db: &Database,
    year: i32,
    tz: &Tz,
) -> crate::Result<YearStats> {
    let range = year_range_in(year, tz);
    let records = db.get_records_in_range(range)?;
    tracing::info!(year, rows = records.len(), "loaded message rows");

    let stats = aggregate_in(records.iter().map(classify), year, tz);
    if stats.is_empty() {
        tracing::info!(year, "no activity found");
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_utc;
    use crate::types::RawRecord;
    use chrono::Utc;

    const YEAR: i32 = 2024;

    fn ts(month: u32, day: u32) -> i64 {
        from_utc(Utc.with_ymd_and_hms(YEAR, month, day, 12, 0, 0).unwrap())
    }

    fn message(timestamp: i64, direction: Direction) -> ClassifiedEvent {
        ClassifiedEvent::Message {
            timestamp,
            direction,
        }
    }

    fn reaction(
        timestamp: i64,
        direction: Direction,
        kind: ReactionKind,
        emoji: Option<&str>,
    ) -> ClassifiedEvent {
        ClassifiedEvent::Reaction {
            timestamp,
            direction,
            kind,
            custom_emoji: emoji.map(str::to_string),
        }
    }

    fn run(events: Vec<ClassifiedEvent>) -> YearStats {
        aggregate_in(events, YEAR, &Utc)
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = run(vec![]);
        assert_eq!(stats.year(), YEAR);
        assert_eq!(stats.total_sent(), 0);
        assert_eq!(stats.total_received(), 0);
        assert_eq!(stats.messages_by_month(), &[0; 12]);
        assert!(stats.reactions_given_by_kind().is_empty());
        assert!(stats.reactions_received_by_kind().is_empty());
        assert!(stats.custom_emoji_counts().is_empty());
        assert!(stats.is_empty());
        assert_eq!(stats.busiest_month(), None);
        assert!(stats.top_reactions_overall(10).is_empty());
    }

    #[test]
    fn test_single_sent_message_in_march() {
        let stats = run(vec![message(ts(3, 14), Direction::Sent)]);
        assert_eq!(stats.total_sent(), 1);
        assert_eq!(stats.total_received(), 0);
        let mut expected = [0; 12];
        expected[2] = 1;
        assert_eq!(stats.messages_by_month(), &expected);
        assert!(stats.reactions_given_by_kind().is_empty());
        assert!(stats.reactions_received_by_kind().is_empty());
        assert_eq!(stats.busiest_month(), Some((3, 1)));
    }

    #[test]
    fn test_received_like() {
        let stats = run(vec![reaction(
            ts(5, 1),
            Direction::Received,
            ReactionKind::Liked,
            None,
        )]);
        assert_eq!(stats.reactions_received_by_kind().get(&ReactionKind::Liked), Some(&1));
        assert!(stats.reactions_given_by_kind().is_empty());
        assert_eq!(stats.total_messages(), 0);
        assert_eq!(stats.messages_by_month(), &[0; 12]);
        assert!(!stats.is_empty());
    }

    #[test]
    fn test_custom_emoji_fires_both_counters() {
        let stats = run(vec![reaction(
            ts(6, 1),
            Direction::Sent,
            ReactionKind::Loved,
            Some("🥳"),
        )]);
        assert_eq!(stats.reactions_given_by_kind().get(&ReactionKind::Loved), Some(&1));
        assert_eq!(stats.custom_emoji_counts().get("🥳"), Some(&1));
        assert_eq!(stats.custom_emoji_given().get("🥳"), Some(&1));
    }

    #[test]
    fn test_received_custom_emoji_not_counted_as_given() {
        let stats = run(vec![reaction(
            ts(6, 1),
            Direction::Received,
            ReactionKind::Unknown,
            Some("🫠"),
        )]);
        assert_eq!(stats.custom_emoji_counts().get("🫠"), Some(&1));
        assert!(stats.custom_emoji_given().is_empty());
        assert_eq!(
            stats.reactions_received_by_kind().get(&ReactionKind::Unknown),
            Some(&1)
        );
    }

    #[test]
    fn test_top_reactions_ranking() {
        let mut events = vec![reaction(ts(1, 2), Direction::Sent, ReactionKind::Loved, None)];
        for day in 1..=3 {
            events.push(reaction(ts(2, day), Direction::Sent, ReactionKind::Liked, None));
        }
        let stats = run(events);

        assert_eq!(
            stats.top_reactions(10),
            vec![(ReactionKind::Liked, 3), (ReactionKind::Loved, 1)]
        );
        assert_eq!(stats.top_reactions_given(1), vec![(ReactionKind::Liked, 3)]);
    }

    #[test]
    fn test_ranking_ties_are_deterministic() {
        let stats = run(vec![
            reaction(ts(1, 1), Direction::Sent, ReactionKind::Questioned, None),
            reaction(ts(1, 1), Direction::Received, ReactionKind::Laughed, None),
            reaction(ts(1, 1), Direction::Sent, ReactionKind::Loved, Some("🙃")),
            reaction(ts(1, 1), Direction::Sent, ReactionKind::Unknown, Some("🐢")),
        ]);

        assert_eq!(
            stats.top_reactions(10),
            vec![
                (ReactionKind::Loved, 1),
                (ReactionKind::Laughed, 1),
                (ReactionKind::Questioned, 1),
                (ReactionKind::Unknown, 1),
            ]
        );
        assert_eq!(
            stats.top_custom_emoji_given(10),
            vec![("🐢".to_string(), 1), ("🙃".to_string(), 1)]
        );
        assert_eq!(
            stats.top_reactions_overall(10),
            vec![
                (ReactionLabel::Kind(ReactionKind::Laughed), 1),
                (ReactionLabel::Kind(ReactionKind::Questioned), 1),
                (ReactionLabel::Custom("🐢".to_string()), 1),
                (ReactionLabel::Custom("🙃".to_string()), 1),
            ]
        );
    }

    #[test]
    fn test_overall_ranking_mixes_kinds_and_emoji() {
        let mut events = Vec::new();
        for day in 1..=4 {
            events.push(reaction(
                ts(4, day),
                Direction::Received,
                ReactionKind::Unknown,
                Some("🔥"),
            ));
        }
        for day in 1..=2 {
            events.push(reaction(ts(4, day), Direction::Sent, ReactionKind::Laughed, None));
        }
        let stats = run(events);

        let overall = stats.top_reactions_overall(10);
        assert_eq!(
            overall,
            vec![
                (ReactionLabel::Custom("🔥".to_string()), 4),
                (ReactionLabel::Kind(ReactionKind::Laughed), 2),
            ]
        );
        assert_eq!(overall[0].0.glyph(), "🔥");
        assert_eq!(overall[1].0.glyph(), "😂");
    }

    #[test]
    fn test_overall_ranking_counts_emoji_over_kind_once() {
        let mut events = vec![
            reaction(ts(5, 1), Direction::Sent, ReactionKind::Loved, Some("🥳")),
            reaction(ts(5, 2), Direction::Received, ReactionKind::Loved, Some("🥳")),
        ];
        events.push(reaction(ts(5, 3), Direction::Sent, ReactionKind::Loved, None));
        let stats = run(events.clone());

        // Kind counters still see every Loved
        assert_eq!(stats.top_reactions(10), vec![(ReactionKind::Loved, 3)]);
        assert_eq!(
            stats.top_reactions_overall(10),
            vec![
                (ReactionLabel::Custom("🥳".to_string()), 2),
                (ReactionLabel::Kind(ReactionKind::Loved), 1),
            ]
        );

        let mut left = YearAccumulator::with_time_zone(YEAR, Utc);
        let mut right = YearAccumulator::with_time_zone(YEAR, Utc);
        let mut events = events.into_iter();
        left.record(events.next().unwrap());
        for event in events {
            right.record(event);
        }
        assert_eq!(left.merge(right).finish(), stats);
    }

    #[test]
    fn test_unknown_code_lands_in_unknown_bucket() {
        let event = classify(&RawRecord::reaction(1, ts(8, 8), false, 9999));
        let stats = run(vec![event]);
        assert_eq!(
            stats.reactions_received_by_kind().get(&ReactionKind::Unknown),
            Some(&1)
        );
    }

    #[test]
    fn test_events_outside_year_are_ignored() {
        let last_year = from_utc(Utc.with_ymd_and_hms(YEAR - 1, 12, 31, 23, 59, 59).unwrap());
        let next_year = from_utc(Utc.with_ymd_and_hms(YEAR + 1, 1, 1, 0, 0, 0).unwrap());

        let stats = run(vec![
            message(last_year, Direction::Sent),
            message(next_year, Direction::Received),
            reaction(last_year, Direction::Sent, ReactionKind::Loved, Some("🥳")),
            reaction(next_year, Direction::Received, ReactionKind::Liked, None),
        ]);
        assert!(stats.is_empty());
        assert!(stats.custom_emoji_counts().is_empty());
        assert_eq!(stats, run(vec![]));
    }

    #[test]
    fn test_sum_invariants() {
        let events = vec![
            message(ts(1, 1), Direction::Sent),
            message(ts(1, 2), Direction::Received),
            message(ts(7, 4), Direction::Sent),
            message(ts(12, 31), Direction::Received),
            reaction(ts(2, 1), Direction::Sent, ReactionKind::Liked, None),
            reaction(ts(2, 2), Direction::Sent, ReactionKind::Emphasized, Some("✨")),
            reaction(ts(2, 3), Direction::Received, ReactionKind::Disliked, None),
        ];
        let stats = run(events);

        let month_sum: u64 = stats.messages_by_month().iter().sum();
        assert_eq!(month_sum, stats.total_messages());
        assert_eq!(stats.total_messages(), 4);
        assert_eq!(stats.reactions_given_total(), 2);
        assert_eq!(stats.reactions_received_total(), 1);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let events = vec![
            message(ts(2, 2), Direction::Sent),
            reaction(ts(3, 3), Direction::Received, ReactionKind::Laughed, Some("🤣")),
        ];
        assert_eq!(run(events.clone()), run(events));
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let events = vec![
            message(ts(1, 5), Direction::Sent),
            message(ts(9, 5), Direction::Received),
            reaction(ts(3, 5), Direction::Sent, ReactionKind::Loved, Some("💯")),
            reaction(ts(4, 5), Direction::Received, ReactionKind::Loved, None),
            message(
                from_utc(Utc.with_ymd_and_hms(YEAR + 2, 1, 1, 0, 0, 0).unwrap()),
                Direction::Sent,
            ),
        ];

        let whole = run(events.clone());

        let (left, right) = events.split_at(2);
        let mut a = YearAccumulator::with_time_zone(YEAR, Utc);
        let mut b = YearAccumulator::with_time_zone(YEAR, Utc);
        left.iter().cloned().for_each(|e| {
            a.record(e);
        });
        right.iter().cloned().for_each(|e| {
            b.record(e);
        });

        let merged = b.merge(a);
        assert_eq!(merged.dropped(), 1);
        assert_eq!(merged.finish(), whole);
    }
}
