// src/watch/filter.rs

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

/// Class of filesystem change a subscription reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// The watched file was written, replaced, renamed or removed.
    FileModified,
    /// A new entry appeared directly or indirectly under the watched directory.
    EntryAdded,
    /// Any create / modify / remove / rename under the watched directory.
    AnyEvent,
}

impl EventFilter {
    /// Whether the subscription target is a directory rather than a file.
    pub fn watches_directory(&self) -> bool {
        !matches!(self, EventFilter::FileModified)
    }

    /// Whether an event of this kind qualifies.
    ///
    /// Access events and metadata-only changes never qualify.
    pub fn matches(&self, kind: &EventKind) -> bool {
        match self {
            EventFilter::FileModified | EventFilter::AnyEvent => match kind {
                EventKind::Create(_) | EventKind::Remove(_) | EventKind::Any => true,
                EventKind::Modify(ModifyKind::Metadata(_)) => false,
                EventKind::Modify(_) => true,
                _ => false,
            },
            EventFilter::EntryAdded => matches!(
                kind,
                EventKind::Create(_)
                    | EventKind::Modify(ModifyKind::Name(
                        RenameMode::To | RenameMode::Both | RenameMode::Any
                    ))
            ),
        }
    }
}
