//! Textual visualisation of an assistant's page flow.
//!
//! ```
//! use horizon_assistant::debug::{FlowDebug, FlowStyle};
//! use horizon_assistant::{Assistant, Page, PageKind};
//! use horizon_assistant_core::PageId;
//!
//! let mut assistant = Assistant::new();
//! assistant.append_page(Page::new(PageId::new()).with_kind(PageKind::Intro).with_title("Welcome")).unwrap();
//! assistant.append_page(Page::new(PageId::new()).with_kind(PageKind::Summary)).unwrap();
//! assistant.map();
//!
//! let text = FlowDebug::new().with_style(FlowStyle::Ascii).format(&assistant);
//! assert!(text.contains("intro \"Welcome\""));
//! ```

use std::fmt::Write as FmtWrite;

use crate::assistant::Assistant;
use crate::page::Page;

/// Style options for flow visualisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowStyle {
    /// ASCII characters for the page list.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for flow debug output.
#[derive(Debug, Clone)]
pub struct FlowFormatOptions {
    /// The style of visualisation.
    pub style: FlowStyle,
    /// Whether to show page identities.
    pub show_ids: bool,
    /// Whether to show page titles.
    pub show_titles: bool,
    /// Whether to list the history stack.
    pub show_history: bool,
}

impl Default for FlowFormatOptions {
    fn default() -> Self {
        Self {
            style: FlowStyle::default(),
            show_ids: false,
            show_titles: true,
            show_history: false,
        }
    }
}

impl FlowFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_ids: true,
            show_history: true,
            ..Default::default()
        }
    }
}

/// Renders the page list of an [`Assistant`].
#[derive(Debug, Clone, Default)]
pub struct FlowDebug {
    options: FlowFormatOptions,
}

impl FlowDebug {
    /// Create a visualiser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualiser with custom options.
    pub fn with_options(options: FlowFormatOptions) -> Self {
        Self { options }
    }

    /// Set the style using builder pattern.
    pub fn with_style(mut self, style: FlowStyle) -> Self {
        self.options.style = style;
        self
    }

    /// Format the flow of `assistant`.
    pub fn format(&self, assistant: &Assistant) -> String {
        if self.options.style == FlowStyle::Compact {
            return self.format_compact(assistant);
        }

        let mut output = String::new();
        writeln!(
            output,
            "Assistant flow ({} pages, history depth {}{}):",
            assistant.get_n_pages(),
            assistant.history().len(),
            if assistant.is_committed() { ", committed" } else { "" }
        )
        .expect("write to String");

        let pages = assistant.pages();
        if pages.is_empty() {
            writeln!(output, "  (empty)").expect("write to String");
        }

        let last = pages.len().saturating_sub(1);
        for (index, page) in pages.iter().enumerate() {
            output.push_str(self.connector(index == last));
            write!(output, "[{}] ", index).expect("write to String");
            self.describe(page, &mut output);
            if assistant.current_page() == Some(page.id()) {
                output.push_str(self.current_marker());
            }
            output.push('\n');
        }

        if self.options.show_history && !assistant.history().is_empty() {
            let entries: Vec<String> = assistant
                .history()
                .iter()
                .map(|id| match assistant.page_index(id) {
                    Some(index) => format!("[{}]", index),
                    None => id.to_string(),
                })
                .collect();
            writeln!(output, "history: {}", entries.join(" ")).expect("write to String");
        }

        output
    }

    fn format_compact(&self, assistant: &Assistant) -> String {
        let separator = " > ";
        let parts: Vec<String> = assistant
            .pages()
            .iter()
            .map(|page| {
                let mut part = String::new();
                if assistant.current_page() == Some(page.id()) {
                    part.push('*');
                }
                part.push_str(page.kind().name());
                if !page.is_visible() {
                    part.push_str("(hidden)");
                }
                part
            })
            .collect();
        parts.join(separator)
    }

    fn describe(&self, page: &Page, output: &mut String) {
        output.push_str(page.kind().name());

        if self.options.show_titles {
            match page.title() {
                Some(title) if !title.is_empty() => {
                    write!(output, " {:?}", title).expect("write to String");
                }
                _ => output.push_str(" (untitled)"),
            }
        }

        if self.options.show_ids {
            write!(output, " {}", page.id()).expect("write to String");
        }

        if page.is_complete() {
            output.push_str(match self.options.style {
                FlowStyle::Unicode => " \u{2713}",
                _ => " done",
            });
        }
        if !page.is_visible() {
            output.push_str(" hidden");
        }
    }

    fn connector(&self, is_last: bool) -> &'static str {
        match (self.options.style, is_last) {
            (FlowStyle::Unicode, false) => "\u{251c}\u{2500}\u{2500} ",
            (FlowStyle::Unicode, true) => "\u{2514}\u{2500}\u{2500} ",
            (_, false) => "+-- ",
            (_, true) => "`-- ",
        }
    }

    fn current_marker(&self) -> &'static str {
        match self.options.style {
            FlowStyle::Unicode => " \u{25c0} current",
            _ => " <- current",
        }
    }
}
