//! Inline segment length editing.
//!
//! Clicking a segment label turns it into an edit field pre-filled with the
//! label's numeric value. Committing moves the far vertex of that segment so
//! it measures the typed length; anything that cannot be applied reverts the
//! label instead. Reverts are ordinary outcomes, not errors surfaced to the
//! user.

use mapsketch_core::{parse_length, EditError, LengthFormat, LengthUnit, Point, SessionId};

use crate::measure;
use crate::overlay::SegmentOverlay;

/// An open edit field on one segment label
#[derive(Debug, Clone, PartialEq)]
pub struct LengthEdit {
    session: SessionId,
    index: usize,
    unit: LengthUnit,
    label: String,
    text: String,
}

impl LengthEdit {
    /// Open an edit on an overlay, capturing the unit its label is shown in
    pub fn begin(session: SessionId, overlay: &SegmentOverlay, format: &LengthFormat) -> Self {
        Self {
            session,
            index: overlay.index,
            unit: LengthUnit::from_label(&overlay.display),
            label: overlay.display.clone(),
            text: format.format_value(overlay.length_m),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Index of the segment's far vertex
    pub fn index(&self) -> usize {
        self.index
    }

    /// Unit typed values are interpreted in
    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Label shown before the edit opened
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current contents of the edit field
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// Result of committing an edit
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The far vertex moved
    Applied {
        index: usize,
        previous: Point,
        vertex: Point,
        length_m: f64,
    },
    /// The label went back to its previous text
    Reverted { label: String, reason: EditError },
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A vertex move computed from a committed edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedEdit {
    pub index: usize,
    pub previous: Point,
    pub vertex: Point,
    pub target_m: f64,
    /// Great-circle length of the segment once the vertex has moved
    pub length_m: f64,
}

/// Turns typed lengths into vertex moves
#[derive(Debug, Clone, Copy)]
pub struct LengthEditor {
    min_segment_length_m: f64,
}

impl Default for LengthEditor {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl LengthEditor {
    pub fn new(min_segment_length_m: f64) -> Self {
        Self {
            min_segment_length_m,
        }
    }

    pub fn min_segment_length_m(&self) -> f64 {
        self.min_segment_length_m
    }

    /// Compute where the far vertex of the edited segment must go
    ///
    /// `vertices` are the committed vertices of the edit's session. The
    /// rubber-band segment is never part of them and so cannot be edited.
    pub fn resolve(
        &self,
        edit: &LengthEdit,
        text: &str,
        vertices: &[Point],
    ) -> Result<ResolvedEdit, EditError> {
        let invalid = || EditError::InvalidInput {
            input: text.to_string(),
        };
        let target_m = parse_length(text, edit.unit).map_err(|_| invalid())?;
        if target_m <= 0.0 {
            return Err(invalid());
        }

        let index = edit.index;
        if index == 0 || index >= vertices.len() {
            return Err(EditError::SegmentNotEditable { index });
        }

        let (c1, c2) = (vertices[index - 1], vertices[index]);
        let vertex = measure::rescale_segment(c1, c2, target_m, self.min_segment_length_m)?;
        Ok(ResolvedEdit {
            index,
            previous: c2,
            vertex,
            target_m,
            length_m: measure::segment_length(c1, vertex),
        })
    }
}
