//! Incoming/completed key layout and participant file naming.

use super::{move_object, BlobStore, StoreError};

const INCOMING: &str = "incoming-participants/";
const COMPLETED: &str = "completed-participants/";
const PHOTO_EXT: &str = ".jpg";

/// Key layout for one party: `<root>incoming-participants/<file>` and
/// `<root>completed-participants/<file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitions {
    root: String,
}

impl Partitions {
    /// `root` gets a trailing slash if it lacks one.
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        if !root.is_empty() && !root.ends_with('/') {
            root.push('/');
        }
        Self { root }
    }

    pub fn root(&self) -> &str { &self.root }

    pub fn incoming_prefix(&self) -> String { format!("{}{INCOMING}", self.root) }

    pub fn completed_prefix(&self) -> String { format!("{}{COMPLETED}", self.root) }

    pub fn incoming_key(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.incoming_prefix())
    }

    pub fn completed_key(&self, file_name: &str) -> String {
        format!("{}{file_name}", self.completed_prefix())
    }

    /// Whether `key` is a well-formed participant photo in the incoming partition.
    pub fn is_participant_key(&self, key: &str) -> bool {
        key.strip_prefix(&self.incoming_prefix()).is_some_and(is_participant_file)
    }

    /// Same check for the completed partition.
    pub fn is_completed_key(&self, key: &str) -> bool {
        key.strip_prefix(&self.completed_prefix()).is_some_and(is_participant_file)
    }
}

/// `Mary Jane` becomes `Mary_Jane.jpg`. `None` when nothing usable is left.
pub fn file_name_for(name: &str) -> Option<String> {
    let stem = name.split_whitespace().collect::<Vec<_>>().join("_");
    let file = format!("{stem}{PHOTO_EXT}");
    is_participant_file(&file).then_some(file)
}

/// `parties/x/incoming-participants/Mary_Jane.jpg` becomes `Mary Jane`.
pub fn display_name(key: &str) -> String {
    let file = file_segment(key);
    file.strip_suffix(PHOTO_EXT).unwrap_or(file).replace('_', " ")
}

pub fn file_segment(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn is_participant_file(file: &str) -> bool {
    file.strip_suffix(PHOTO_EXT)
        .is_some_and(|stem| !stem.is_empty() && stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}

/// Moves a winner's photo out of the incoming partition.
pub async fn complete<S: BlobStore>(store: &S, parts: &Partitions, file_name: &str) -> Result<(), StoreError> {
    move_object(store, &parts.incoming_key(file_name), &parts.completed_key(file_name)).await
}

/// Puts a completed participant back into the incoming partition.
pub async fn restore<S: BlobStore>(store: &S, parts: &Partitions, file_name: &str) -> Result<(), StoreError> {
    move_object(store, &parts.completed_key(file_name), &parts.incoming_key(file_name)).await
}
