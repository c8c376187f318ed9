// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ticket message operations. Messages are append-only.

use rusqlite::params;
use supportdesk_core::DeskError;

use crate::database::{Database, map_tr_err, parse_column};
use crate::models::TicketMessage;

/// Insert on an already borrowed connection or transaction.
pub(crate) fn insert_message_sync(
    conn: &rusqlite::Connection,
    msg: &TicketMessage,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO ticket_messages (message_id, ticket_id, sender_type, content, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            msg.message_id,
            msg.ticket_id,
            msg.sender_type.to_string(),
            msg.content,
            msg.created_at,
        ],
    )?;
    Ok(())
}

/// Append a message to a ticket.
pub async fn insert_message(db: &Database, msg: &TicketMessage) -> Result<(), DeskError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| insert_message_sync(conn, &msg))
        .await
        .map_err(map_tr_err)
}

/// Messages for a ticket in chronological order.
///
/// Messages written within the same millisecond keep insertion order.
pub async fn list_messages(db: &Database, ticket_id: &str) -> Result<Vec<TicketMessage>, DeskError> {
    let ticket_id = ticket_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT message_id, ticket_id, sender_type, content, created_at
                 FROM ticket_messages WHERE ticket_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![ticket_id], |row| {
                Ok(TicketMessage {
                    message_id: row.get(0)?,
                    ticket_id: row.get(1)?,
                    sender_type: parse_column(2, row.get(2)?)?,
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::open_temp;
    use crate::models::Ticket;
    use crate::queries::tickets::insert_ticket;
    use supportdesk_core::types::{SenderType, TicketStatus};

    async fn setup_db_with_ticket() -> (Database, tempfile::TempDir) {
        let (db, dir) = open_temp().await;
        let ticket = Ticket {
            ticket_id: "t1".to_string(),
            ticket_priority: None,
            ticket_content: Some("vpn down".to_string()),
            ticket_tone: None,
            ticket_difficulty: None,
            team_id: None,
            user_id: "u1".to_string(),
            status: TicketStatus::Open,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        insert_ticket(&db, &ticket).await.unwrap();
        (db, dir)
    }

    fn make_msg(id: &str, sender: SenderType, content: &str, timestamp: &str) -> TicketMessage {
        TicketMessage {
            message_id: id.to_string(),
            ticket_id: "t1".to_string(),
            sender_type: sender,
            content: content.to_string(),
            created_at: timestamp.to_string(),
        }
    }

    #[tokio::test]
    async fn messages_come_back_in_chronological_order() {
        let (db, _dir) = setup_db_with_ticket().await;
        insert_message(&db, &make_msg("m2", SenderType::Bot, "second", "2026-01-01T00:00:02.000Z"))
            .await
            .unwrap();
        insert_message(&db, &make_msg("m1", SenderType::User, "first", "2026-01-01T00:00:01.000Z"))
            .await
            .unwrap();

        let msgs = list_messages(&db, "t1").await.unwrap();
        let ids: Vec<_> = msgs.iter().map(|m| m.message_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert_eq!(msgs[1].sender_type, SenderType::Bot);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let (db, _dir) = setup_db_with_ticket().await;
        let at = "2026-01-01T00:00:01.000Z";
        for id in ["a", "c", "b"] {
            insert_message(&db, &make_msg(id, SenderType::User, id, at))
                .await
                .unwrap();
        }
        let msgs = list_messages(&db, "t1").await.unwrap();
        let ids: Vec<_> = msgs.iter().map(|m| m.message_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn message_for_unknown_ticket_is_rejected() {
        let (db, _dir) = setup_db_with_ticket().await;
        let mut msg = make_msg("m1", SenderType::User, "hi", "2026-01-01T00:00:01.000Z");
        msg.ticket_id = "ghost".to_string();
        let err = insert_message(&db, &msg).await.unwrap_err();
        assert!(matches!(err, DeskError::Storage { .. }));
    }
}
