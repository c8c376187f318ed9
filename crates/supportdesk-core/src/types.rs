// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the supportdesk crates.
//!
//! Enum values serialize to the exact lowercase strings persisted in the
//! store and exchanged over HTTP (`open`, `pending_supporter`, ...).

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::DeskError;

/// Returns the current UTC time as an RFC 3339 string with millisecond precision.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Generates a new entity identifier (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

// --- Ticket attribute enums ---

/// Lifecycle status of a ticket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Just created; triage has not produced an outcome yet.
    Open,
    /// Awaiting a supporter reply.
    PendingSupporter,
    /// A supporter or the bot replied; awaiting the user.
    PendingUser,
    /// Terminal for triage purposes, though a later reply re-opens it.
    Resolved,
}

impl TicketStatus {
    /// Every status, in declaration order.
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::PendingSupporter,
        TicketStatus::PendingUser,
        TicketStatus::Resolved,
    ];
}

/// Ticket priority assigned by the requester or by triage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Triage-assigned complexity tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Inferred emotional state of the requester.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Happy,
    Neutral,
    Frustrated,
    Angry,
    Confused,
}

/// Who authored a ticket message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    User,
    Supporter,
    Bot,
}

/// Account role, stored as `user_type`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Supporter,
    User,
}

/// Sort direction for listing queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// --- Status filter ---

/// A validated, non-empty set of statuses used as a membership filter.
///
/// Parsed from the comma-separated `status` query parameter, e.g.
/// `"open,pending_supporter"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSet(BTreeSet<TicketStatus>);

impl StatusSet {
    /// Builds a set from the given statuses. Returns `None` when empty.
    pub fn from_statuses(statuses: impl IntoIterator<Item = TicketStatus>) -> Option<Self> {
        let set: BTreeSet<_> = statuses.into_iter().collect();
        if set.is_empty() { None } else { Some(Self(set)) }
    }

    /// Returns true if the status is a member of the set.
    pub fn contains(&self, status: TicketStatus) -> bool {
        self.0.contains(&status)
    }

    /// Iterates members in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = TicketStatus> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for StatusSet {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = BTreeSet::new();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let status = TicketStatus::from_str(token)
                .map_err(|_| DeskError::Validation(format!("unknown ticket status `{token}`")))?;
            set.insert(status);
        }
        if set.is_empty() {
            return Err(DeskError::Validation(
                "status filter must name at least one status".to_string(),
            ));
        }
        Ok(Self(set))
    }
}

// --- Partial update wrapper ---

/// A field in a partial update.
///
/// Distinguishes a field that was not supplied ([`Patch::Absent`], left
/// untouched) from one explicitly set to null ([`Patch::Null`], cleared).
/// Use with `#[serde(default)]` so a missing key deserializes as `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Returns the supplied value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Writes the patch into `target`: `Absent` keeps, `Null` clears, `Value` replaces.
    pub fn apply(&self, target: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Value(v) => *target = Some(v.clone()),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

// --- Entities ---

/// A support request tracked through the status lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub ticket_priority: Option<Priority>,
    pub ticket_content: Option<String>,
    pub ticket_tone: Option<Tone>,
    pub ticket_difficulty: Option<Difficulty>,
    pub team_id: Option<String>,
    /// The requester.
    pub user_id: String,
    pub status: TicketStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Ticket {
    /// Builds a fresh `open` ticket with a generated id.
    pub fn new(new: NewTicket) -> Self {
        let now = now_timestamp();
        Self {
            ticket_id: new_id(),
            ticket_priority: new.priority,
            ticket_content: new.content,
            ticket_tone: new.tone,
            ticket_difficulty: new.difficulty,
            team_id: new.team_id,
            user_id: new.requester_id,
            status: TicketStatus::Open,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Ticket content with surrounding whitespace removed, if non-empty.
    pub fn content_text(&self) -> Option<&str> {
        self.ticket_content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Fields supplied when a requester opens a ticket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTicket {
    pub priority: Option<Priority>,
    pub content: Option<String>,
    pub tone: Option<Tone>,
    pub difficulty: Option<Difficulty>,
    pub team_id: Option<String>,
    pub requester_id: String,
}

/// Partial update of a ticket. Only supplied fields are written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TicketPatch {
    #[serde(default, rename = "ticket_priority")]
    pub priority: Patch<Priority>,
    #[serde(default, rename = "ticket_content")]
    pub content: Patch<String>,
    #[serde(default, rename = "ticket_tone")]
    pub tone: Patch<Tone>,
    #[serde(default, rename = "ticket_difficulty")]
    pub difficulty: Patch<Difficulty>,
    #[serde(default)]
    pub team_id: Patch<String>,
    #[serde(default, rename = "user_id")]
    pub requester_id: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

impl TicketPatch {
    /// Returns true if no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.priority.is_absent()
            && self.content.is_absent()
            && self.tone.is_absent()
            && self.difficulty.is_absent()
            && self.team_id.is_absent()
            && self.requester_id.is_none()
            && self.status.is_none()
    }

    /// Applies the supplied fields to `ticket` and bumps `updated_at`.
    pub fn apply_to(&self, ticket: &mut Ticket) {
        self.priority.apply(&mut ticket.ticket_priority);
        self.content.apply(&mut ticket.ticket_content);
        self.tone.apply(&mut ticket.ticket_tone);
        self.difficulty.apply(&mut ticket.ticket_difficulty);
        self.team_id.apply(&mut ticket.team_id);
        if let Some(requester) = &self.requester_id {
            ticket.user_id = requester.clone();
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        ticket.updated_at = now_timestamp();
    }
}

/// A message in a ticket conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketMessage {
    pub message_id: String,
    pub ticket_id: String,
    pub sender_type: SenderType,
    pub content: String,
    pub created_at: String,
}

impl TicketMessage {
    pub fn new(ticket_id: impl Into<String>, sender_type: SenderType, content: impl Into<String>) -> Self {
        Self {
            message_id: new_id(),
            ticket_id: ticket_id.into(),
            sender_type,
            content: content.into(),
            created_at: now_timestamp(),
        }
    }
}

/// A ticket together with its transcript, oldest message first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketWithMessages {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub messages: Vec<TicketMessage>,
}

/// A knowledge-base entry: a (problem, solution) pair owned by a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub solution_id: String,
    pub team_id: String,
    /// Originating ticket; `None` when authored manually.
    pub ticket_id: Option<String>,
    pub problem: String,
    pub solution: String,
    pub created_at: String,
}

impl Solution {
    pub fn new(
        team_id: impl Into<String>,
        ticket_id: Option<String>,
        problem: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            solution_id: new_id(),
            team_id: team_id.into(),
            ticket_id,
            problem: problem.into(),
            solution: solution.into(),
            created_at: now_timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: String,
    pub team_name: String,
    pub team_description: Option<String>,
    pub created_at: String,
}

/// A supporter profile linking a user account to a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supporter {
    pub supporter_id: String,
    pub user_id: String,
    pub team_id: Option<String>,
    pub supporter_name: String,
    pub created_at: String,
}

/// A user account. The API token hash is never part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub user_name: String,
    pub user_type: UserRole,
    pub created_at: String,
}

/// Store-level ticket filter. Every `Some` field narrows the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    pub statuses: Option<StatusSet>,
    pub team_id: Option<String>,
    pub requester_id: Option<String>,
    pub priority: Option<Priority>,
    /// Order by creation time; `None` keeps insertion order.
    pub date_order: Option<SortOrder>,
}

// --- Assistant verdicts ---

/// Structured verdict from the ticket classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "ticket_difficulty")]
    pub difficulty: Difficulty,
    #[serde(rename = "ticket_priority")]
    pub priority: Priority,
    #[serde(rename = "ticket_tone")]
    pub tone: Tone,
    /// Assigned team; `None` when no team fits.
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Result of matching a ticket against a team's known solutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchVerdict {
    pub found_match: bool,
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub confidence: f64,
}

impl MatchVerdict {
    pub fn no_match() -> Self {
        Self {
            found_match: false,
            solution: None,
            confidence: 0.0,
        }
    }

    /// The matched solution text if the verdict clears `threshold` (strictly greater).
    pub fn accepted_solution(&self, threshold: f64) -> Option<&str> {
        if !self.found_match || self.confidence <= threshold {
            return None;
        }
        self.solution
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Condensed (problem, solution) pair produced from a resolved transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionSummary {
    pub problem: String,
    pub solution: String,
    pub should_remember: bool,
}

// --- Provider types ---

/// A single-shot request to an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: Option<String>,
    pub prompt: String,
    /// JSON schema the response must follow; `None` for free text.
    pub response_schema: Option<serde_json::Value>,
    /// Thinking budget in tokens; `Some(0)` disables thinking, `Some(-1)` is dynamic.
    pub thinking_budget: Option<i32>,
}

/// Token usage reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completed response from an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_are_snake_case() {
        assert_eq!(TicketStatus::PendingSupporter.to_string(), "pending_supporter");
        assert_eq!(
            TicketStatus::from_str("pending_user").unwrap(),
            TicketStatus::PendingUser
        );
        let json = serde_json::to_string(&TicketStatus::Resolved).unwrap();
        assert_eq!(json, "\"resolved\"");
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        assert!(TicketStatus::from_str("Open").is_err());
        assert!(TicketStatus::from_str("RESOLVED").is_err());
    }

    #[test]
    fn status_set_parses_comma_list() {
        let set: StatusSet = "open, pending_supporter".parse().unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(TicketStatus::Open));
        assert!(set.contains(TicketStatus::PendingSupporter));
        assert!(!set.contains(TicketStatus::Resolved));
    }

    #[test]
    fn status_set_ignores_empty_tokens_and_duplicates() {
        let set: StatusSet = ",open,,open,".parse().unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn status_set_rejects_unknown_and_empty() {
        let err = "open,closed".parse::<StatusSet>().unwrap_err();
        assert!(matches!(err, DeskError::Validation(ref m) if m.contains("closed")));
        assert!(matches!(
            " , ".parse::<StatusSet>(),
            Err(DeskError::Validation(_))
        ));
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: TicketPatch =
            serde_json::from_str(r#"{"ticket_priority": null, "ticket_tone": "angry"}"#).unwrap();
        assert_eq!(patch.priority, Patch::Null);
        assert_eq!(patch.tone, Patch::Value(Tone::Angry));
        assert_eq!(patch.difficulty, Patch::Absent);
        assert!(patch.status.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn empty_patch_body_is_empty() {
        let patch: TicketPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn patch_apply_only_touches_supplied_fields() {
        let mut ticket = Ticket::new(NewTicket {
            priority: Some(Priority::High),
            content: Some("printer on fire".into()),
            tone: Some(Tone::Angry),
            team_id: Some("team-a".into()),
            requester_id: "u1".into(),
            ..NewTicket::default()
        });
        let patch = TicketPatch {
            priority: Patch::Null,
            status: Some(TicketStatus::Resolved),
            ..TicketPatch::default()
        };
        patch.apply_to(&mut ticket);
        assert_eq!(ticket.ticket_priority, None);
        assert_eq!(ticket.ticket_tone, Some(Tone::Angry));
        assert_eq!(ticket.team_id.as_deref(), Some("team-a"));
        assert_eq!(ticket.status, TicketStatus::Resolved);
    }

    #[test]
    fn new_ticket_starts_open() {
        let ticket = Ticket::new(NewTicket {
            requester_id: "u1".into(),
            ..NewTicket::default()
        });
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.content_text().is_none());
        assert_eq!(ticket.created_at, ticket.updated_at);
    }

    #[test]
    fn match_verdict_threshold_is_strict() {
        let verdict = MatchVerdict {
            found_match: true,
            solution: Some("Reset via the login page".into()),
            confidence: 0.8,
        };
        assert!(verdict.accepted_solution(0.8).is_none());
        let verdict = MatchVerdict {
            confidence: 0.81,
            ..verdict
        };
        assert_eq!(verdict.accepted_solution(0.8), Some("Reset via the login page"));
    }

    #[test]
    fn match_verdict_requires_solution_text() {
        let verdict = MatchVerdict {
            found_match: true,
            solution: Some("   ".into()),
            confidence: 0.95,
        };
        assert!(verdict.accepted_solution(0.8).is_none());
    }

    #[test]
    fn classification_deserializes_wire_names() {
        let json = r#"{"ticket_difficulty":"easy","ticket_priority":"low","ticket_tone":"confused"}"#;
        let c: Classification = serde_json::from_str(json).unwrap();
        assert_eq!(c.difficulty, Difficulty::Easy);
        assert_eq!(c.tone, Tone::Confused);
        assert!(c.team_id.is_none());
    }

    #[test]
    fn summary_uses_camel_case() {
        let json = r#"{"problem":"p","solution":"s","shouldRemember":true}"#;
        let s: ResolutionSummary = serde_json::from_str(json).unwrap();
        assert!(s.should_remember);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn status_strategy() -> impl Strategy<Value = TicketStatus> {
            prop::sample::select(TicketStatus::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn status_set_roundtrips_through_comma_list(statuses in prop::collection::vec(status_strategy(), 1..6)) {
                let raw = statuses.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(",");
                let set: StatusSet = raw.parse().unwrap();
                for s in &statuses {
                    prop_assert!(set.contains(*s));
                }
                prop_assert!(set.len() <= statuses.len());
            }
        }
    }
}
