// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Teams, supporters, and user accounts.

use rusqlite::{OptionalExtension, Row, params};
use supportdesk_core::DeskError;

use crate::database::{Database, map_tr_err, parse_column};
use crate::models::{Supporter, Team, User};

// --- Teams ---

fn map_team(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        team_id: row.get(0)?,
        team_name: row.get(1)?,
        team_description: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub async fn insert_team(db: &Database, team: &Team) -> Result<(), DeskError> {
    let team = team.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO teams (team_id, team_name, team_description, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![team.team_id, team.team_name, team.team_description, team.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_team(db: &Database, team_id: &str) -> Result<Option<Team>, DeskError> {
    let team_id = team_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT team_id, team_name, team_description, created_at
                 FROM teams WHERE team_id = ?1",
                params![team_id],
                map_team,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// All teams ordered by name.
pub async fn list_teams(db: &Database) -> Result<Vec<Team>, DeskError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT team_id, team_name, team_description, created_at
                 FROM teams ORDER BY team_name ASC, rowid ASC",
            )?;
            let rows = stmt.query_map([], map_team)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a team. Its tickets and supporters are unassigned; its solutions are removed.
pub async fn delete_team(db: &Database, team_id: &str) -> Result<bool, DeskError> {
    let team_id = team_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute("DELETE FROM teams WHERE team_id = ?1", params![team_id])?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

// --- Supporters ---

const SUPPORTER_COLUMNS: &str = "supporter_id, user_id, team_id, supporter_name, created_at";

fn map_supporter(row: &Row<'_>) -> rusqlite::Result<Supporter> {
    Ok(Supporter {
        supporter_id: row.get(0)?,
        user_id: row.get(1)?,
        team_id: row.get(2)?,
        supporter_name: row.get(3)?,
        created_at: row.get(4)?,
    })
}

async fn find_supporter(
    db: &Database,
    column: &'static str,
    value: &str,
) -> Result<Option<Supporter>, DeskError> {
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {SUPPORTER_COLUMNS} FROM supporters WHERE {column} = ?1"),
                params![value],
                map_supporter,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn insert_supporter(db: &Database, supporter: &Supporter) -> Result<(), DeskError> {
    let s = supporter.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!("INSERT INTO supporters ({SUPPORTER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                params![s.supporter_id, s.user_id, s.team_id, s.supporter_name, s.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_supporter(db: &Database, supporter_id: &str) -> Result<Option<Supporter>, DeskError> {
    find_supporter(db, "supporter_id", supporter_id).await
}

pub async fn get_supporter_by_user(
    db: &Database,
    user_id: &str,
) -> Result<Option<Supporter>, DeskError> {
    find_supporter(db, "user_id", user_id).await
}

pub async fn list_supporters(db: &Database) -> Result<Vec<Supporter>, DeskError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SUPPORTER_COLUMNS} FROM supporters ORDER BY supporter_name ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map([], map_supporter)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_supporter(db: &Database, supporter_id: &str) -> Result<bool, DeskError> {
    let supporter_id = supporter_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM supporters WHERE supporter_id = ?1",
                params![supporter_id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

// --- Users ---

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        user_name: row.get(1)?,
        user_type: parse_column(2, row.get(2)?)?,
        created_at: row.get(3)?,
    })
}

async fn find_user(
    db: &Database,
    column: &'static str,
    value: &str,
) -> Result<Option<User>, DeskError> {
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT user_id, user_name, user_type, created_at FROM users WHERE {column} = ?1"
                ),
                params![value],
                map_user,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn insert_user(db: &Database, user: &User, token_hash: &str) -> Result<(), DeskError> {
    let user = user.clone();
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (user_id, user_name, user_type, token_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.user_id,
                    user.user_name,
                    user.user_type.to_string(),
                    token_hash,
                    user.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_user(db: &Database, user_id: &str) -> Result<Option<User>, DeskError> {
    find_user(db, "user_id", user_id).await
}

pub async fn find_user_by_token_hash(
    db: &Database,
    token_hash: &str,
) -> Result<Option<User>, DeskError> {
    find_user(db, "token_hash", token_hash).await
}

pub async fn list_users(db: &Database) -> Result<Vec<User>, DeskError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, user_name, user_type, created_at FROM users
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map([], map_user)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a user together with their tickets. The supporter profile cascades.
pub async fn delete_user(db: &Database, user_id: &str) -> Result<bool, DeskError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let n = tx.execute("DELETE FROM users WHERE user_id = ?1", params![user_id])?;
            if n > 0 {
                tx.execute("DELETE FROM tickets WHERE user_id = ?1", params![user_id])?;
            }
            tx.commit()?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{open_temp, team, user};
    use supportdesk_core::UserRole;

    fn supporter(id: &str, user_id: &str, team_id: Option<&str>) -> Supporter {
        Supporter {
            supporter_id: id.to_string(),
            user_id: user_id.to_string(),
            team_id: team_id.map(str::to_string),
            supporter_name: format!("supporter {id}"),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn user_lookup_by_token_hash() {
        let (db, _dir) = open_temp().await;
        insert_user(&db, &user("u1", UserRole::User), "hash-1").await.unwrap();
        insert_user(&db, &user("u2", UserRole::Admin), "hash-2").await.unwrap();

        let found = find_user_by_token_hash(&db, "hash-2").await.unwrap().unwrap();
        assert_eq!(found.user_id, "u2");
        assert_eq!(found.user_type, UserRole::Admin);
        assert!(find_user_by_token_hash(&db, "nope").await.unwrap().is_none());
        assert_eq!(list_users(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_token_hash_is_rejected() {
        let (db, _dir) = open_temp().await;
        insert_user(&db, &user("u1", UserRole::User), "same").await.unwrap();
        let err = insert_user(&db, &user("u2", UserRole::User), "same").await.unwrap_err();
        assert!(matches!(err, DeskError::Storage { .. }));
    }

    #[tokio::test]
    async fn supporter_resolves_by_user() {
        let (db, _dir) = open_temp().await;
        insert_team(&db, &team("team-b")).await.unwrap();
        insert_user(&db, &user("u1", UserRole::Supporter), "h1").await.unwrap();
        insert_supporter(&db, &supporter("s1", "u1", Some("team-b"))).await.unwrap();

        let s = get_supporter_by_user(&db, "u1").await.unwrap().unwrap();
        assert_eq!(s.supporter_id, "s1");
        assert_eq!(s.team_id.as_deref(), Some("team-b"));
        assert!(get_supporter_by_user(&db, "u2").await.unwrap().is_none());
        assert_eq!(get_supporter(&db, "s1").await.unwrap(), Some(s));
    }

    #[tokio::test]
    async fn deleting_team_unassigns_supporters() {
        let (db, _dir) = open_temp().await;
        insert_team(&db, &team("team-b")).await.unwrap();
        insert_user(&db, &user("u1", UserRole::Supporter), "h1").await.unwrap();
        insert_supporter(&db, &supporter("s1", "u1", Some("team-b"))).await.unwrap();

        assert!(delete_team(&db, "team-b").await.unwrap());
        let s = get_supporter(&db, "s1").await.unwrap().unwrap();
        assert!(s.team_id.is_none());
        assert!(list_teams(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_user_cascades_supporter_profile() {
        let (db, _dir) = open_temp().await;
        insert_user(&db, &user("u1", UserRole::Supporter), "h1").await.unwrap();
        insert_supporter(&db, &supporter("s1", "u1", None)).await.unwrap();

        assert!(delete_user(&db, "u1").await.unwrap());
        assert!(!delete_user(&db, "u1").await.unwrap());
        assert!(list_supporters(&db).await.unwrap().is_empty());
        assert!(get_user(&db, "u1").await.unwrap().is_none());
    }
}
