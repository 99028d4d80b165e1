//! Document seam
//!
//! The live document is an external collaborator; the session only
//! needs the handful of mutations below. [`MemoryPage`] is the in-crate
//! reference implementation used by tests and examples: it models each
//! element's content as a flat node list that is rebuilt on every
//! highlight and merged back to plain text on clear.

use crate::error::ReaderError;
use crate::highlight::HighlightLayout;
use lector_core::{ElementId, Rect, ScrollTarget, Viewport};
use std::collections::HashMap;

/// Glyph shown by the inline play/pause affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceGlyph {
    Play,
    Pause,
}

/// Bounding box and document offset of the rendered line highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Viewport-relative bounding box
    pub rect: Rect,
    /// Document-space top offset
    pub offset_top: f64,
}

/// Trait for document access
///
/// Implementors supply traversal, node surgery, and scrolling;
/// the session decides when to invoke them.
pub trait PageAccess: Send {
    /// Full text content of an element (excluding the affordance)
    fn element_text(&self, element: ElementId) -> Result<String, ReaderError>;

    /// Replace any existing highlight pair in the document, then wrap
    /// `element`'s content per `layout`. At most one pair exists at a
    /// time, document-wide.
    fn apply_highlight(
        &mut self,
        element: ElementId,
        layout: &HighlightLayout,
    ) -> Result<(), ReaderError>;

    /// Remove both highlight containers and merge adjacent text nodes.
    /// Idempotent when no highlight is active.
    fn clear_highlight(&mut self) -> Result<(), ReaderError>;

    /// Visually mark an element as the current selection
    fn mark_selected(&mut self, element: ElementId) -> Result<(), ReaderError>;

    /// Remove the selection mark and the inline affordance, if any
    fn clear_selection_mark(&mut self) -> Result<(), ReaderError>;

    /// Prepend the inline play/pause affordance to an element
    fn attach_affordance(&mut self, element: ElementId) -> Result<(), ReaderError>;

    /// Flip the affordance glyph; no-op when none is attached
    fn set_affordance_glyph(&mut self, glyph: AffordanceGlyph) -> Result<(), ReaderError>;

    /// Metrics of the rendered line highlight, if one exists
    fn line_metrics(&self) -> Option<LineMetrics>;

    /// Current viewport size
    fn viewport(&self) -> Viewport;

    /// Scroll the page
    fn scroll_to(&mut self, target: ScrollTarget);
}

/// Rendered content of one element
#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Plain(String),
    Highlighted {
        prefix: String,
        line_prefix: String,
        word: String,
        line_suffix: String,
        suffix: String,
    },
}

impl Content {
    fn text(&self) -> String {
        match self {
            Content::Plain(text) => text.clone(),
            Content::Highlighted {
                prefix,
                line_prefix,
                word,
                line_suffix,
                suffix,
            } => format!("{prefix}{line_prefix}{word}{line_suffix}{suffix}"),
        }
    }
}

/// In-memory page for tests, examples, and headless runs
#[derive(Debug)]
pub struct MemoryPage {
    elements: HashMap<ElementId, Content>,
    metrics: HashMap<ElementId, LineMetrics>,
    highlighted: Option<ElementId>,
    selected: Option<ElementId>,
    affordance: Option<(ElementId, AffordanceGlyph)>,
    viewport: Viewport,
    last_scroll: Option<ScrollTarget>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            metrics: HashMap::new(),
            highlighted: None,
            selected: None,
            affordance: None,
            viewport: Viewport::new(1280.0, 800.0),
            last_scroll: None,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Add an element with the given text content
    pub fn insert(&mut self, element: ElementId, text: impl Into<String>) {
        self.elements.insert(element, Content::Plain(text.into()));
    }

    /// Attach line-highlight metrics reported for an element
    pub fn set_metrics(&mut self, element: ElementId, metrics: LineMetrics) {
        self.metrics.insert(element, metrics);
    }

    /// Rendered text content of an element
    pub fn rendered_text(&self, element: ElementId) -> Option<String> {
        self.elements.get(&element).map(Content::text)
    }

    /// Text inside the line container, if `element` holds the highlight
    pub fn line_text(&self, element: ElementId) -> Option<String> {
        match self.elements.get(&element)? {
            Content::Highlighted {
                line_prefix,
                word,
                line_suffix,
                ..
            } => Some(format!("{line_prefix}{word}{line_suffix}")),
            Content::Plain(_) => None,
        }
    }

    /// Text inside the word container, if `element` holds the highlight
    pub fn word_text(&self, element: ElementId) -> Option<String> {
        match self.elements.get(&element)? {
            Content::Highlighted { word, .. } => Some(word.clone()),
            Content::Plain(_) => None,
        }
    }

    pub fn highlighted(&self) -> Option<ElementId> {
        self.highlighted
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn affordance(&self) -> Option<(ElementId, AffordanceGlyph)> {
        self.affordance
    }

    pub fn last_scroll(&self) -> Option<ScrollTarget> {
        self.last_scroll
    }
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl PageAccess for MemoryPage {
    fn element_text(&self, element: ElementId) -> Result<String, ReaderError> {
        self.elements
            .get(&element)
            .map(Content::text)
            .ok_or_else(|| ReaderError::Page(format!("No such element: {element}")))
    }

    fn apply_highlight(
        &mut self,
        element: ElementId,
        layout: &HighlightLayout,
    ) -> Result<(), ReaderError> {
        self.clear_highlight()?;

        let text = self.element_text(element)?;
        let len = text.len();
        if layout.suffix.end != len || layout.line.word.end > len {
            return Err(ReaderError::Page(format!(
                "Highlight layout does not match content of {element}"
            )));
        }

        self.elements.insert(
            element,
            Content::Highlighted {
                prefix: text[layout.prefix.clone()].to_string(),
                line_prefix: text[layout.line.prefix.clone()].to_string(),
                word: text[layout.line.word.clone()].to_string(),
                line_suffix: text[layout.line.suffix.clone()].to_string(),
                suffix: text[layout.suffix.clone()].to_string(),
            },
        );
        self.highlighted = Some(element);
        Ok(())
    }

    fn clear_highlight(&mut self) -> Result<(), ReaderError> {
        if let Some(element) = self.highlighted.take() {
            if let Some(content) = self.elements.get(&element) {
                let merged = content.text();
                self.elements.insert(element, Content::Plain(merged));
            }
        }
        Ok(())
    }

    fn mark_selected(&mut self, element: ElementId) -> Result<(), ReaderError> {
        if !self.elements.contains_key(&element) {
            return Err(ReaderError::Page(format!("No such element: {element}")));
        }
        self.selected = Some(element);
        Ok(())
    }

    fn clear_selection_mark(&mut self) -> Result<(), ReaderError> {
        self.selected = None;
        self.affordance = None;
        Ok(())
    }

    fn attach_affordance(&mut self, element: ElementId) -> Result<(), ReaderError> {
        if !self.elements.contains_key(&element) {
            return Err(ReaderError::Page(format!("No such element: {element}")));
        }
        self.affordance = Some((element, AffordanceGlyph::Play));
        Ok(())
    }

    fn set_affordance_glyph(&mut self, glyph: AffordanceGlyph) -> Result<(), ReaderError> {
        if let Some((element, _)) = self.affordance {
            self.affordance = Some((element, glyph));
        }
        Ok(())
    }

    fn line_metrics(&self) -> Option<LineMetrics> {
        let element = self.highlighted?;
        self.metrics.get(&element).copied()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_to(&mut self, target: ScrollTarget) {
        self.last_scroll = Some(target);
    }
}
