// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket CRUD and filtered listing.

use rusqlite::{OptionalExtension, Row, params, params_from_iter};
use supportdesk_core::types::{SortOrder, TicketStatus, now_timestamp};
use supportdesk_core::DeskError;

use crate::database::{Database, map_tr_err, parse_column, parse_opt_column};
use crate::models::{Ticket, TicketFilter, TicketMessage, TicketPatch};

pub(crate) const TICKET_COLUMNS: &str = "ticket_id, ticket_priority, ticket_content, ticket_tone, \
     ticket_difficulty, team_id, user_id, status, created_at, updated_at";

pub(crate) fn map_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        ticket_id: row.get(0)?,
        ticket_priority: parse_opt_column(1, row.get(1)?)?,
        ticket_content: row.get(2)?,
        ticket_tone: parse_opt_column(3, row.get(3)?)?,
        ticket_difficulty: parse_opt_column(4, row.get(4)?)?,
        team_id: row.get(5)?,
        user_id: row.get(6)?,
        status: parse_column(7, row.get(7)?)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn select_ticket(conn: &rusqlite::Connection, ticket_id: &str) -> rusqlite::Result<Option<Ticket>> {
    conn.query_row(
        &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_id = ?1"),
        params![ticket_id],
        map_ticket,
    )
    .optional()
}

fn write_ticket(conn: &rusqlite::Connection, ticket: &Ticket) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE tickets SET ticket_priority = ?2, ticket_content = ?3, ticket_tone = ?4,
             ticket_difficulty = ?5, team_id = ?6, user_id = ?7, status = ?8, updated_at = ?9
         WHERE ticket_id = ?1",
        params![
            ticket.ticket_id,
            ticket.ticket_priority.map(|p| p.to_string()),
            ticket.ticket_content,
            ticket.ticket_tone.map(|t| t.to_string()),
            ticket.ticket_difficulty.map(|d| d.to_string()),
            ticket.team_id,
            ticket.user_id,
            ticket.status.to_string(),
            ticket.updated_at,
        ],
    )
}

/// Insert a new ticket.
pub async fn insert_ticket(db: &Database, ticket: &Ticket) -> Result<(), DeskError> {
    let ticket = ticket.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO tickets ({TICKET_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                params![
                    ticket.ticket_id,
                    ticket.ticket_priority.map(|p| p.to_string()),
                    ticket.ticket_content,
                    ticket.ticket_tone.map(|t| t.to_string()),
                    ticket.ticket_difficulty.map(|d| d.to_string()),
                    ticket.team_id,
                    ticket.user_id,
                    ticket.status.to_string(),
                    ticket.created_at,
                    ticket.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a ticket by ID.
pub async fn get_ticket(db: &Database, ticket_id: &str) -> Result<Option<Ticket>, DeskError> {
    let ticket_id = ticket_id.to_string();
    db.connection()
        .call(move |conn| select_ticket(conn, &ticket_id))
        .await
        .map_err(map_tr_err)
}

/// Apply a partial update inside a transaction and return the new row.
pub async fn update_ticket(
    db: &Database,
    ticket_id: &str,
    patch: &TicketPatch,
) -> Result<Option<Ticket>, DeskError> {
    let ticket_id = ticket_id.to_string();
    let patch = patch.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let Some(mut ticket) = select_ticket(&tx, &ticket_id)? else {
                return Ok(None);
            };
            patch.apply_to(&mut ticket);
            write_ticket(&tx, &ticket)?;
            tx.commit()?;
            Ok(Some(ticket))
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a reply and set the ticket status atomically.
///
/// Nothing is written when the ticket does not exist.
pub async fn record_reply(
    db: &Database,
    message: &TicketMessage,
    status: TicketStatus,
) -> Result<Option<Ticket>, DeskError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let changed = tx.execute(
                "UPDATE tickets SET status = ?2, updated_at = ?3 WHERE ticket_id = ?1",
                params![message.ticket_id, status.to_string(), now_timestamp()],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            crate::queries::messages::insert_message_sync(&tx, &message)?;
            let ticket = select_ticket(&tx, &message.ticket_id)?;
            tx.commit()?;
            Ok(ticket)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a ticket. Messages cascade; solutions keep their text but lose the link.
pub async fn delete_ticket(db: &Database, ticket_id: &str) -> Result<bool, DeskError> {
    let ticket_id = ticket_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM tickets WHERE ticket_id = ?1", params![ticket_id])?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Build the SELECT statement and its positional arguments for a filter.
fn build_list_query(filter: &TicketFilter) -> (String, Vec<String>) {
    let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE 1 = 1");
    let mut args = Vec::new();

    if let Some(statuses) = &filter.statuses {
        let placeholders = vec!["?"; statuses.len()].join(", ");
        sql.push_str(&format!(" AND status IN ({placeholders})"));
        args.extend(statuses.iter().map(|s| s.to_string()));
    }
    if let Some(team_id) = &filter.team_id {
        sql.push_str(" AND team_id = ?");
        args.push(team_id.clone());
    }
    if let Some(requester_id) = &filter.requester_id {
        sql.push_str(" AND user_id = ?");
        args.push(requester_id.clone());
    }
    if let Some(priority) = filter.priority {
        sql.push_str(" AND ticket_priority = ?");
        args.push(priority.to_string());
    }

    sql.push_str(match filter.date_order {
        Some(SortOrder::Asc) => " ORDER BY created_at ASC, rowid ASC",
        Some(SortOrder::Desc) => " ORDER BY created_at DESC, rowid DESC",
        None => " ORDER BY rowid ASC",
    });
    (sql, args)
}

/// List tickets matching every supplied filter field.
pub async fn list_tickets(db: &Database, filter: &TicketFilter) -> Result<Vec<Ticket>, DeskError> {
    let (sql, args) = build_list_query(filter);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(args.iter()), map_ticket)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{open_temp, team};
    use crate::queries::directory::insert_team;
    use crate::queries::messages::list_messages;
    use supportdesk_core::types::{Patch, Priority, SenderType, StatusSet, Tone};

    fn ticket(id: &str, team_id: Option<&str>, user: &str, created_at: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            ticket_priority: None,
            ticket_content: Some(format!("content of {id}")),
            ticket_tone: None,
            ticket_difficulty: None,
            team_id: team_id.map(str::to_string),
            user_id: user.to_string(),
            status: TicketStatus::Open,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let (db, _dir) = open_temp().await;
        let mut t = ticket("t1", None, "u1", "2026-01-01T00:00:00.000Z");
        t.ticket_priority = Some(Priority::High);
        t.ticket_tone = Some(Tone::Confused);
        insert_ticket(&db, &t).await.unwrap();

        let loaded = get_ticket(&db, "t1").await.unwrap().unwrap();
        assert_eq!(loaded, t);
        assert!(get_ticket(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_writes_only_supplied_fields() {
        let (db, _dir) = open_temp().await;
        insert_team(&db, &team("team-a")).await.unwrap();
        let mut t = ticket("t1", Some("team-a"), "u1", "2026-01-01T00:00:00.000Z");
        t.ticket_priority = Some(Priority::Low);
        insert_ticket(&db, &t).await.unwrap();

        let patch = TicketPatch {
            tone: Patch::Value(Tone::Angry),
            status: Some(TicketStatus::PendingSupporter),
            ..TicketPatch::default()
        };
        let updated = update_ticket(&db, "t1", &patch).await.unwrap().unwrap();
        assert_eq!(updated.ticket_tone, Some(Tone::Angry));
        assert_eq!(updated.ticket_priority, Some(Priority::Low));
        assert_eq!(updated.team_id.as_deref(), Some("team-a"));
        assert_eq!(updated.status, TicketStatus::PendingSupporter);
        assert_eq!(get_ticket(&db, "t1").await.unwrap().unwrap(), updated);
    }

    #[tokio::test]
    async fn update_null_clears_field() {
        let (db, _dir) = open_temp().await;
        insert_team(&db, &team("team-a")).await.unwrap();
        insert_ticket(&db, &ticket("t1", Some("team-a"), "u1", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        let patch = TicketPatch {
            team_id: Patch::Null,
            ..TicketPatch::default()
        };
        let updated = update_ticket(&db, "t1", &patch).await.unwrap().unwrap();
        assert!(updated.team_id.is_none());
    }

    #[tokio::test]
    async fn update_missing_ticket_returns_none() {
        let (db, _dir) = open_temp().await;
        let patch = TicketPatch {
            status: Some(TicketStatus::Resolved),
            ..TicketPatch::default()
        };
        assert!(update_ticket(&db, "nope", &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn record_reply_is_atomic() {
        let (db, _dir) = open_temp().await;
        insert_ticket(&db, &ticket("t1", None, "u1", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();

        let msg = TicketMessage::new("t1", SenderType::Supporter, "on it");
        let updated = record_reply(&db, &msg, TicketStatus::PendingUser)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TicketStatus::PendingUser);
        assert_eq!(list_messages(&db, "t1").await.unwrap(), vec![msg]);

        let orphan = TicketMessage::new("ghost", SenderType::User, "hello?");
        assert!(record_reply(&db, &orphan, TicketStatus::PendingSupporter)
            .await
            .unwrap()
            .is_none());
        assert!(list_messages(&db, "ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_messages() {
        let (db, _dir) = open_temp().await;
        insert_ticket(&db, &ticket("t1", None, "u1", "2026-01-01T00:00:00.000Z"))
            .await
            .unwrap();
        crate::queries::messages::insert_message(
            &db,
            &TicketMessage::new("t1", SenderType::User, "help"),
        )
        .await
        .unwrap();

        assert!(delete_ticket(&db, "t1").await.unwrap());
        assert!(!delete_ticket(&db, "t1").await.unwrap());
        assert!(list_messages(&db, "t1").await.unwrap().is_empty());
    }

    async fn seed_listing(db: &Database) {
        insert_team(db, &team("team-a")).await.unwrap();
        insert_team(db, &team("team-b")).await.unwrap();
        let rows = [
            ("t1", Some("team-b"), "u1", "2026-01-01T00:00:03.000Z", TicketStatus::Open),
            ("t2", Some("team-b"), "u2", "2026-01-01T00:00:01.000Z", TicketStatus::PendingSupporter),
            ("t3", Some("team-b"), "u1", "2026-01-01T00:00:02.000Z", TicketStatus::Resolved),
            ("t4", Some("team-a"), "u1", "2026-01-01T00:00:04.000Z", TicketStatus::Open),
            ("t5", None, "u2", "2026-01-01T00:00:05.000Z", TicketStatus::Open),
        ];
        for (id, team_id, user, at, status) in rows {
            let mut t = ticket(id, team_id, user, at);
            t.status = status;
            insert_ticket(db, &t).await.unwrap();
        }
    }

    fn ids(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.ticket_id.as_str()).collect()
    }

    #[tokio::test]
    async fn list_filters_by_team_and_status_set() {
        let (db, _dir) = open_temp().await;
        seed_listing(&db).await;

        let filter = TicketFilter {
            statuses: Some("open,pending_supporter".parse::<StatusSet>().unwrap()),
            team_id: Some("team-b".into()),
            ..TicketFilter::default()
        };
        let tickets = list_tickets(&db, &filter).await.unwrap();
        assert_eq!(ids(&tickets), vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn list_orders_by_date() {
        let (db, _dir) = open_temp().await;
        seed_listing(&db).await;

        let filter = TicketFilter {
            team_id: Some("team-b".into()),
            date_order: Some(SortOrder::Asc),
            ..TicketFilter::default()
        };
        assert_eq!(ids(&list_tickets(&db, &filter).await.unwrap()), vec!["t2", "t3", "t1"]);

        let filter = TicketFilter {
            date_order: Some(SortOrder::Desc),
            ..filter
        };
        assert_eq!(ids(&list_tickets(&db, &filter).await.unwrap()), vec!["t1", "t3", "t2"]);
    }

    #[tokio::test]
    async fn list_filters_by_requester_and_priority() {
        let (db, _dir) = open_temp().await;
        seed_listing(&db).await;
        let patch = TicketPatch {
            priority: Patch::Value(Priority::High),
            ..TicketPatch::default()
        };
        update_ticket(&db, "t4", &patch).await.unwrap();

        let filter = TicketFilter {
            requester_id: Some("u1".into()),
            ..TicketFilter::default()
        };
        assert_eq!(ids(&list_tickets(&db, &filter).await.unwrap()), vec!["t1", "t3", "t4"]);

        let filter = TicketFilter {
            priority: Some(Priority::High),
            ..filter
        };
        assert_eq!(ids(&list_tickets(&db, &filter).await.unwrap()), vec!["t4"]);
    }

    #[tokio::test]
    async fn list_is_repeatable() {
        let (db, _dir) = open_temp().await;
        seed_listing(&db).await;
        let filter = TicketFilter::default();
        let first = list_tickets(&db, &filter).await.unwrap();
        let second = list_tickets(&db, &filter).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }
}
