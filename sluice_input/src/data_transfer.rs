// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag payload and drag operations.
//!
//! A [`DataTransfer`] holds string items keyed by format, dropped files and
//! opaque custom formats. Its [`DataTransferAccess`] follows the drag phase:
//! writable during `dragstart`, protected (types only) while the drag is over
//! targets, readable during `drop`.

use bitflags::bitflags;
use sluice_tree::{DropZone, DropZoneOperation};

bitflags! {
    /// Drag operations, used both as an allowed mask and as a single operation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DragOperation: u8 {
        /// Copy the data.
        const COPY    = 1 << 0;
        /// Link to the data.
        const LINK    = 1 << 1;
        /// Platform-defined generic operation.
        const GENERIC = 1 << 2;
        /// Application-private operation.
        const PRIVATE = 1 << 3;
        /// Move the data.
        const MOVE    = 1 << 4;
        /// Delete the source data.
        const DELETE  = 1 << 5;
        /// Every operation.
        const EVERY   = Self::COPY.bits()
            | Self::LINK.bits()
            | Self::GENERIC.bits()
            | Self::PRIVATE.bits()
            | Self::MOVE.bits()
            | Self::DELETE.bits();
    }
}

impl DragOperation {
    /// The operation to perform when the target accepted the drag but never
    /// chose one, given what the source allows.
    ///
    /// `EVERY` collapses to copy; otherwise move beats copy beats link.
    pub fn default_for_allowed(allowed: Self) -> Self {
        if allowed == Self::EVERY {
            Self::COPY
        } else if allowed.is_empty() {
            Self::empty()
        } else if allowed.intersects(Self::MOVE | Self::GENERIC) {
            Self::MOVE
        } else if allowed.contains(Self::COPY) {
            Self::COPY
        } else if allowed.contains(Self::LINK) {
            Self::LINK
        } else {
            Self::GENERIC
        }
    }

    /// Operation declared by a drop zone.
    pub fn from_zone(op: DropZoneOperation) -> Self {
        match op {
            DropZoneOperation::Copy => Self::COPY,
            DropZoneOperation::Move => Self::MOVE,
            DropZoneOperation::Link => Self::LINK,
        }
    }

    /// Parse an `effectAllowed` keyword. `uninitialized` means every operation.
    pub fn from_effect_allowed(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "none" => Self::empty(),
            "copy" => Self::COPY,
            "link" => Self::LINK,
            "move" => Self::MOVE | Self::GENERIC,
            "copyLink" => Self::COPY | Self::LINK,
            "copyMove" => Self::COPY | Self::MOVE | Self::GENERIC,
            "linkMove" => Self::LINK | Self::MOVE | Self::GENERIC,
            "all" | "uninitialized" => Self::EVERY,
            _ => return None,
        })
    }

    /// Parse a `dropEffect` keyword.
    pub fn from_drop_effect(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "none" => Self::empty(),
            "copy" => Self::COPY,
            "link" => Self::LINK,
            "move" => Self::MOVE,
            _ => return None,
        })
    }
}

/// What listeners may do with a [`DataTransfer`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DataTransferAccess {
    /// Read and write (`dragstart`).
    ReadWrite,
    /// Read only (`drop`).
    ReadOnly,
    /// Types visible, data hidden (everything else).
    #[default]
    Protected,
}

/// A dropped file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedFile {
    /// Path or name.
    pub path: String,
    /// MIME type.
    pub mime: String,
}

/// The richest representation of a payload, used for editable drops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    /// Application-specific data.
    Custom {
        /// Format name.
        format: String,
        /// Raw bytes.
        data: Vec<u8>,
    },
    /// Markup.
    Html(String),
    /// Dropped files, by path.
    Files(Vec<String>),
    /// Plain text.
    Text(String),
}

/// Drag payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataTransfer {
    items: Vec<(String, String)>,
    files: Vec<DroppedFile>,
    custom: Vec<(String, Vec<u8>)>,
    /// Operations the source allows.
    pub effect_allowed: DragOperation,
    drop_effect: Option<DragOperation>,
    access: DataTransferAccess,
}

impl Default for DataTransfer {
    fn default() -> Self {
        Self::new(DataTransferAccess::ReadWrite)
    }
}

impl DataTransfer {
    /// An empty payload allowing every operation.
    pub fn new(access: DataTransferAccess) -> Self {
        Self {
            items: Vec::new(),
            files: Vec::new(),
            custom: Vec::new(),
            effect_allowed: DragOperation::EVERY,
            drop_effect: None,
            access,
        }
    }

    /// Current access mode.
    pub fn access(&self) -> DataTransferAccess {
        self.access
    }

    pub(crate) fn set_access(&mut self, access: DataTransferAccess) {
        self.access = access;
    }

    /// Store a string item, replacing one of the same format. Ignored unless writable.
    pub fn set_data(&mut self, format: &str, data: impl Into<String>) {
        if self.access != DataTransferAccess::ReadWrite {
            return;
        }
        let format = format.to_ascii_lowercase();
        let data = data.into();
        if let Some(slot) = self.items.iter_mut().find(|(f, _)| *f == format) {
            slot.1 = data;
        } else {
            self.items.push((format, data));
        }
    }

    /// Read a string item. Hidden while protected.
    pub fn get_data(&self, format: &str) -> Option<&str> {
        if self.access == DataTransferAccess::Protected {
            return None;
        }
        let format = format.to_ascii_lowercase();
        self.items
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, d)| d.as_str())
    }

    /// Store application-specific data. Ignored unless writable.
    pub fn set_custom(&mut self, format: &str, data: Vec<u8>) {
        if self.access != DataTransferAccess::ReadWrite {
            return;
        }
        self.custom.retain(|(f, _)| f != format);
        self.custom.push((format.into(), data));
    }

    /// Add a dropped file. Ignored unless writable.
    pub fn add_file(&mut self, path: impl Into<String>, mime: impl Into<String>) {
        if self.access != DataTransferAccess::ReadWrite {
            return;
        }
        self.files.push(DroppedFile {
            path: path.into(),
            mime: mime.into().to_ascii_lowercase(),
        });
    }

    /// Files, hidden while protected.
    pub fn files(&self) -> &[DroppedFile] {
        if self.access == DataTransferAccess::Protected {
            &[]
        } else {
            &self.files
        }
    }

    /// Formats present, visible in every mode. Includes `Files` when files are present.
    pub fn types(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.items.iter().map(|(f, _)| f.as_str()).collect();
        out.extend(self.custom.iter().map(|(f, _)| f.as_str()));
        if !self.files.is_empty() {
            out.push("Files");
        }
        out
    }

    /// Whether nothing at all is carried.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.files.is_empty() && self.custom.is_empty()
    }

    /// Set `dropEffect`. Listeners call this from `dragenter`/`dragover`.
    pub fn set_drop_effect(&mut self, effect: DragOperation) {
        self.drop_effect = Some(effect);
    }

    /// `dropEffect`, `None` while uninitialized.
    pub fn drop_effect(&self) -> Option<DragOperation> {
        self.drop_effect
    }

    pub(crate) fn reset_drop_effect(&mut self) {
        self.drop_effect = None;
    }

    /// Operation a target that canceled `dragenter`/`dragover` asked for.
    ///
    /// An uninitialized `dropEffect` falls back to the source's preference. A
    /// `dropEffect` the source does not allow yields no operation.
    pub fn negotiated_operation(&self) -> DragOperation {
        match self.drop_effect {
            None => DragOperation::default_for_allowed(self.effect_allowed),
            Some(effect) if self.effect_allowed.contains(effect) => effect,
            Some(_) => DragOperation::empty(),
        }
    }

    /// Whether a drop zone token matches the payload.
    ///
    /// `string:<type>` matches a string item of that type, `file:<type>` a file of
    /// that MIME type. Matching ignores ASCII case.
    pub fn matches_token(&self, token: &str) -> bool {
        let token = token.to_ascii_lowercase();
        if let Some(ty) = token.strip_prefix("string:") {
            self.items.iter().any(|(f, _)| *f == ty)
        } else if let Some(ty) = token.strip_prefix("file:") {
            self.files.iter().any(|f| f.mime == ty)
        } else {
            false
        }
    }

    /// Whether the drop zone accepts this payload.
    pub fn matches_zone(&self, zone: &DropZone) -> bool {
        zone.accepts.iter().any(|t| self.matches_token(t))
    }

    /// The richest representation of the payload: custom data, then markup, then
    /// files, then plain text.
    pub fn richest_fragment(&self) -> Option<Fragment> {
        if let Some((format, data)) = self.custom.first() {
            return Some(Fragment::Custom {
                format: format.clone(),
                data: data.clone(),
            });
        }
        let item = |fmt: &str| {
            self.items
                .iter()
                .find(|(f, _)| f == fmt)
                .map(|(_, d)| d.clone())
        };
        if let Some(html) = item("text/html") {
            return Some(Fragment::Html(html));
        }
        if !self.files.is_empty() {
            return Some(Fragment::Files(
                self.files.iter().map(|f| f.path.clone()).collect(),
            ));
        }
        item("text/plain")
            .or_else(|| item("text/uri-list"))
            .map(Fragment::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_operation_prefers_move_then_copy_then_link() {
        assert_eq!(
            DragOperation::default_for_allowed(DragOperation::EVERY),
            DragOperation::COPY
        );
        assert_eq!(
            DragOperation::default_for_allowed(DragOperation::COPY | DragOperation::MOVE),
            DragOperation::MOVE
        );
        assert_eq!(
            DragOperation::default_for_allowed(DragOperation::COPY | DragOperation::LINK),
            DragOperation::COPY
        );
        assert_eq!(
            DragOperation::default_for_allowed(DragOperation::LINK),
            DragOperation::LINK
        );
        assert_eq!(
            DragOperation::default_for_allowed(DragOperation::empty()),
            DragOperation::empty()
        );
    }

    #[test]
    fn effect_keywords() {
        assert_eq!(DragOperation::from_effect_allowed("uninitialized"), Some(DragOperation::EVERY));
        assert_eq!(
            DragOperation::from_effect_allowed("copyMove"),
            Some(DragOperation::COPY | DragOperation::MOVE | DragOperation::GENERIC)
        );
        assert_eq!(DragOperation::from_effect_allowed("none"), Some(DragOperation::empty()));
        assert_eq!(DragOperation::from_effect_allowed("copymove"), None);
        assert_eq!(DragOperation::from_drop_effect("move"), Some(DragOperation::MOVE));
        assert_eq!(DragOperation::from_drop_effect("all"), None);
    }

    #[test]
    fn disallowed_drop_effect_negotiates_nothing() {
        let mut dt = DataTransfer {
            effect_allowed: DragOperation::COPY,
            ..DataTransfer::default()
        };
        assert_eq!(dt.negotiated_operation(), DragOperation::COPY);
        dt.set_drop_effect(DragOperation::MOVE);
        assert_eq!(dt.negotiated_operation(), DragOperation::empty());
        dt.set_drop_effect(DragOperation::COPY);
        assert_eq!(dt.negotiated_operation(), DragOperation::COPY);
    }

    #[test]
    fn protected_payload_hides_data_but_not_types() {
        let mut dt = DataTransfer::default();
        dt.set_data("Text/Plain", "hello");
        dt.add_file("a.png", "image/png");
        dt.set_access(DataTransferAccess::Protected);
        assert_eq!(dt.get_data("text/plain"), None);
        assert!(dt.files().is_empty());
        assert_eq!(dt.types(), vec!["text/plain", "Files"]);
        dt.set_data("text/plain", "changed");
        dt.set_access(DataTransferAccess::ReadOnly);
        assert_eq!(dt.get_data("text/plain"), Some("hello"));
    }

    #[test]
    fn tokens_match_strings_and_files() {
        let mut dt = DataTransfer::default();
        dt.set_data("text/plain", "x");
        dt.add_file("a.png", "IMAGE/PNG");
        assert!(dt.matches_token("string:text/plain"));
        assert!(dt.matches_token("FILE:image/png"));
        assert!(!dt.matches_token("string:text/html"));
        assert!(!dt.matches_token("text/plain"));
    }

    #[test]
    fn richest_fragment_order() {
        let mut dt = DataTransfer::default();
        dt.set_data("text/plain", "plain");
        assert_eq!(dt.richest_fragment(), Some(Fragment::Text("plain".into())));
        dt.add_file("f.txt", "text/plain");
        assert_eq!(dt.richest_fragment(), Some(Fragment::Files(vec!["f.txt".into()])));
        dt.set_data("text/html", "<b>x</b>");
        assert_eq!(dt.richest_fragment(), Some(Fragment::Html("<b>x</b>".into())));
        dt.set_custom("app/x", vec![1, 2]);
        assert!(matches!(dt.richest_fragment(), Some(Fragment::Custom { .. })));
    }
}
