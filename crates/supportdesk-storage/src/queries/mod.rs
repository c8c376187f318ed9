// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on stored entities.

pub mod directory;
pub mod messages;
pub mod solutions;
pub mod tickets;
