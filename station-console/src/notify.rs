//! User-facing notifications for mutation outcomes.
//!
//! Every create/update/delete ends in exactly one [`Notice`], drawn from a
//! fixed catalogue of six title/description pairs.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// The kind of write a notice reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    /// Verb used in messages and logs.
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Whether the mutation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Presentation variant of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// A notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
    pub variant: NoticeVariant,
}

impl Notice {
    /// The fixed notice for a mutation outcome.
    pub fn for_mutation(kind: MutationKind, outcome: Outcome) -> Self {
        let (title, description) = match (kind, outcome) {
            (MutationKind::Create, Outcome::Success) => (
                "Station Created",
                "A new charging station has been added successfully.",
            ),
            (MutationKind::Update, Outcome::Success) => (
                "Station Updated",
                "The charging station has been updated successfully.",
            ),
            (MutationKind::Delete, Outcome::Success) => (
                "Station Deleted",
                "The charging station has been removed successfully.",
            ),
            (MutationKind::Create, Outcome::Failure) => {
                ("Error", "Failed to create station. Please try again.")
            }
            (MutationKind::Update, Outcome::Failure) => {
                ("Error", "Failed to update station. Please try again.")
            }
            (MutationKind::Delete, Outcome::Failure) => {
                ("Error", "Failed to delete station. Please try again.")
            }
        };

        let variant = match outcome {
            Outcome::Success => NoticeVariant::Default,
            Outcome::Failure => NoticeVariant::Destructive,
        };

        Self {
            title,
            description,
            variant,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, notice: Notice);
}

/// Queue of pending notices, drained by the next rendered page.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    pending: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [MutationKind; 3] = [
        MutationKind::Create,
        MutationKind::Update,
        MutationKind::Delete,
    ];

    #[test]
    fn six_distinct_messages() {
        let mut seen = std::collections::HashSet::new();
        for kind in KINDS {
            for outcome in [Outcome::Success, Outcome::Failure] {
                let notice = Notice::for_mutation(kind, outcome);
                seen.insert((notice.title, notice.description));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn failures_are_destructive_and_name_the_operation() {
        for kind in KINDS {
            let notice = Notice::for_mutation(kind, Outcome::Failure);
            assert!(notice.is_destructive());
            assert_eq!(notice.title, "Error");
            assert_eq!(
                notice.description,
                format!("Failed to {} station. Please try again.", kind.verb())
            );
        }
    }

    #[test]
    fn create_success_text() {
        let notice = Notice::for_mutation(MutationKind::Create, Outcome::Success);
        assert_eq!(notice.title, "Station Created");
        assert_eq!(
            notice.description,
            "A new charging station has been added successfully."
        );
        assert!(!notice.is_destructive());
    }

    #[test]
    fn board_drains_in_order() {
        let board = NoticeBoard::new();
        board.notify(Notice::for_mutation(MutationKind::Create, Outcome::Success));
        board.notify(Notice::for_mutation(MutationKind::Delete, Outcome::Failure));
        assert_eq!(board.len(), 2);

        let drained = board.drain();
        assert_eq!(drained[0].title, "Station Created");
        assert_eq!(drained[1].title, "Error");
        assert!(board.is_empty());
    }
}
