// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base (solution) CRUD operations.

use rusqlite::{OptionalExtension, Row, params};
use supportdesk_core::DeskError;

use crate::database::{Database, map_tr_err};
use crate::models::Solution;

const SOLUTION_COLUMNS: &str = "solution_id, team_id, ticket_id, problem, solution, created_at";

fn map_solution(row: &Row<'_>) -> rusqlite::Result<Solution> {
    Ok(Solution {
        solution_id: row.get(0)?,
        team_id: row.get(1)?,
        ticket_id: row.get(2)?,
        problem: row.get(3)?,
        solution: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub async fn insert_solution(db: &Database, solution: &Solution) -> Result<(), DeskError> {
    let s = solution.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!("INSERT INTO solutions ({SOLUTION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                params![s.solution_id, s.team_id, s.ticket_id, s.problem, s.solution, s.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_solution(db: &Database, solution_id: &str) -> Result<Option<Solution>, DeskError> {
    let solution_id = solution_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {SOLUTION_COLUMNS} FROM solutions WHERE solution_id = ?1"),
                params![solution_id],
                map_solution,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace problem and solution text, returning the updated row.
pub async fn update_solution(
    db: &Database,
    solution_id: &str,
    problem: &str,
    solution: &str,
) -> Result<Option<Solution>, DeskError> {
    let (solution_id, problem, solution) =
        (solution_id.to_string(), problem.to_string(), solution.to_string());
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE solutions SET problem = ?2, solution = ?3 WHERE solution_id = ?1",
                params![solution_id, problem, solution],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            conn.query_row(
                &format!("SELECT {SOLUTION_COLUMNS} FROM solutions WHERE solution_id = ?1"),
                params![solution_id],
                map_solution,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_solution(db: &Database, solution_id: &str) -> Result<bool, DeskError> {
    let solution_id = solution_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM solutions WHERE solution_id = ?1",
                params![solution_id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Solutions newest first, optionally for a single team.
pub async fn list_solutions(
    db: &Database,
    team_id: Option<&str>,
) -> Result<Vec<Solution>, DeskError> {
    let team_id = team_id.map(str::to_string);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SOLUTION_COLUMNS} FROM solutions
                 WHERE ?1 IS NULL OR team_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![team_id], map_solution)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
