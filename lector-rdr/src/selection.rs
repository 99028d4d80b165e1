//! Selection tracking
//!
//! Page-wide clicks arrive classified by target: clicks landing on the
//! player widget or the inline affordance never change the selection,
//! and an element with no trimmed text is ignored outright. Everything
//! else replaces the selection wholesale.

use lector_core::ElementId;

/// The currently selected text element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub element: ElementId,
    /// Trimmed text content, captured at click time. A non-owning
    /// snapshot: the element may later change or disappear without
    /// the selection noticing.
    pub text: String,
}

/// What a page click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// An ordinary page element
    Page,
    /// The floating player widget
    Widget,
    /// The inline play/pause affordance
    Affordance,
}

/// A click observed in the capture phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub element: ElementId,
    /// Raw text content of the clicked element
    pub text: String,
    pub target: ClickTarget,
}

impl ClickEvent {
    pub fn on_page(element: ElementId, text: impl Into<String>) -> Self {
        Self {
            element,
            text: text.into(),
            target: ClickTarget::Page,
        }
    }
}

/// Session-level interpretation of a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No state change
    Ignored,
    /// The inline affordance toggles play/pause without reselecting
    ToggleAffordance,
    /// Replace the current selection
    Select(Selection),
}

/// Classify a click per the capture-phase rules
pub fn classify(click: &ClickEvent) -> ClickOutcome {
    match click.target {
        ClickTarget::Widget => ClickOutcome::Ignored,
        ClickTarget::Affordance => ClickOutcome::ToggleAffordance,
        ClickTarget::Page => {
            let text = click.text.trim();
            if text.is_empty() {
                ClickOutcome::Ignored
            } else {
                ClickOutcome::Select(Selection {
                    element: click.element,
                    text: text.to_string(),
                })
            }
        }
    }
}
