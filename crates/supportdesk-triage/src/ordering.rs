// SPDX-FileCopyrightText: 2026 Supportdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory priority ordering for ticket listings.

use supportdesk_core::{Priority, SortOrder, Ticket};

/// Severity weight used for priority ordering; unset priority weighs 0.
pub fn priority_weight(priority: Option<Priority>) -> u8 {
    match priority {
        Some(Priority::High) => 3,
        Some(Priority::Medium) => 2,
        Some(Priority::Low) => 1,
        None => 0,
    }
}

/// Stable sort by priority weight. Ties keep the order the store returned.
pub fn sort_by_priority(tickets: &mut [Ticket], order: SortOrder) {
    tickets.sort_by(|a, b| {
        let ord = priority_weight(a.ticket_priority).cmp(&priority_weight(b.ticket_priority));
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use supportdesk_core::NewTicket;

    fn ticket(priority: Option<Priority>) -> Ticket {
        Ticket::new(NewTicket {
            priority,
            requester_id: "u1".to_string(),
            ..NewTicket::default()
        })
    }

    #[test]
    fn weights_follow_severity() {
        assert_eq!(priority_weight(Some(Priority::High)), 3);
        assert_eq!(priority_weight(Some(Priority::Medium)), 2);
        assert_eq!(priority_weight(Some(Priority::Low)), 1);
        assert_eq!(priority_weight(None), 0);
    }

    #[test]
    fn descending_puts_high_first_and_unset_last() {
        let mut tickets = vec![
            ticket(None),
            ticket(Some(Priority::Low)),
            ticket(Some(Priority::High)),
            ticket(Some(Priority::Medium)),
        ];
        sort_by_priority(&mut tickets, SortOrder::Desc);
        let order: Vec<_> = tickets.iter().map(|t| t.ticket_priority).collect();
        assert_eq!(
            order,
            vec![
                Some(Priority::High),
                Some(Priority::Medium),
                Some(Priority::Low),
                None
            ]
        );
    }

    #[test]
    fn ties_keep_store_order() {
        let first = ticket(Some(Priority::Medium));
        let second = ticket(Some(Priority::Medium));
        let ids = (first.ticket_id.clone(), second.ticket_id.clone());
        let mut tickets = vec![first, ticket(Some(Priority::High)), second];

        sort_by_priority(&mut tickets, SortOrder::Asc);
        assert_eq!(tickets[0].ticket_id, ids.0);
        assert_eq!(tickets[1].ticket_id, ids.1);
    }

    fn priority_strategy() -> impl Strategy<Value = Option<Priority>> {
        prop_oneof![
            Just(None),
            Just(Some(Priority::Low)),
            Just(Some(Priority::Medium)),
            Just(Some(Priority::High)),
        ]
    }

    proptest! {
        #[test]
        fn sorted_output_is_monotonic(priorities in proptest::collection::vec(priority_strategy(), 0..40)) {
            let mut tickets: Vec<Ticket> = priorities.into_iter().map(ticket).collect();
            sort_by_priority(&mut tickets, SortOrder::Desc);
            for pair in tickets.windows(2) {
                prop_assert!(
                    priority_weight(pair[0].ticket_priority) >= priority_weight(pair[1].ticket_priority)
                );
            }
        }

        #[test]
        fn sorting_is_idempotent(priorities in proptest::collection::vec(priority_strategy(), 0..40)) {
            let mut once: Vec<Ticket> = priorities.into_iter().map(ticket).collect();
            sort_by_priority(&mut once, SortOrder::Asc);
            let mut twice = once.clone();
            sort_by_priority(&mut twice, SortOrder::Asc);
            prop_assert_eq!(once, twice);
        }
    }
}
