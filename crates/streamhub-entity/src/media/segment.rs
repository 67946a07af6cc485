//! Path-component matching between media records and folders.
//!
//! A media record belongs to folder `F` of owner login `L` when its URL or
//! path contains the adjacent components `L/F` followed by at least one
//! more component. Matching is on whole components, so `L/F_archive/x`
//! and `other/F/x` never match `L/F`.

use serde::{Deserialize, Serialize};

use super::model::{MediaPathUpdate, MediaReference};

/// The `<login>/<folder>` component pair identifying a folder inside paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderSegment {
    login: String,
    folder: String,
}

impl FolderSegment {
    /// Create a segment for `login`/`folder`.
    pub fn new(login: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            folder: folder.into(),
        }
    }

    /// Owner login component.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Folder component.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// The same owner with a different folder component.
    pub fn with_folder(&self, folder: impl Into<String>) -> Self {
        Self::new(self.login.clone(), folder)
    }

    /// Substring every matching value contains; usable as a coarse pre-filter.
    pub fn needle(&self) -> String {
        format!("{}/{}/", self.login, self.folder)
    }

    /// Whether `value` contains this segment as whole path components.
    pub fn matches(&self, value: &str) -> bool {
        let (path, _) = split_suffix(value);
        let parts: Vec<&str> = path.split('/').collect();
        !self.positions(&parts).is_empty()
    }

    /// Whether either location field of `media` points into this folder.
    pub fn references(&self, media: &MediaReference) -> bool {
        self.matches(&media.url) || self.matches(&media.path)
    }

    /// Replace the folder component in `value`, if present.
    pub fn rewrite(&self, value: &str, new_folder: &str) -> Option<String> {
        let (path, suffix) = split_suffix(value);
        let mut parts: Vec<&str> = path.split('/').collect();
        let positions = self.positions(&parts);
        if positions.is_empty() {
            return None;
        }
        for i in positions {
            parts[i] = new_folder;
        }
        Some(format!("{}{}", parts.join("/"), suffix))
    }

    /// New URL and path for `media`, or `None` when neither field matches.
    pub fn rewrite_reference(
        &self,
        media: &MediaReference,
        new_folder: &str,
    ) -> Option<MediaPathUpdate> {
        let url = self.rewrite(&media.url, new_folder);
        let path = self.rewrite(&media.path, new_folder);
        if url.is_none() && path.is_none() {
            return None;
        }
        Some(MediaPathUpdate {
            id: media.id,
            url: url.unwrap_or_else(|| media.url.clone()),
            path: path.unwrap_or_else(|| media.path.clone()),
        })
    }

    /// Indices of folder components that follow the login component and
    /// are themselves followed by another component. Non-overlapping.
    fn positions(&self, parts: &[&str]) -> Vec<usize> {
        let mut found = Vec::new();
        let mut i = 0;
        while i + 2 < parts.len() {
            if parts[i] == self.login && parts[i + 1] == self.folder {
                found.push(i + 1);
                i += 2;
            } else {
                i += 1;
            }
        }
        found
    }
}

/// Split off a URL query or fragment so it never takes part in matching.
fn split_suffix(value: &str) -> (&str, &str) {
    match value.find(['?', '#']) {
        Some(idx) => value.split_at(idx),
        None => (value, ""),
    }
}
