//! Card rendering and the loading/error affordances.
//!
//! The controller only talks to the [`View`] trait. [`TerminalView`] is the
//! stdout implementation: it keeps the currently displayed collection, swaps it
//! wholesale on every render and then reveals each card in order.

use std::cell::{Cell, RefCell};
use std::fmt::Write as _;
use std::io::Write;

use tracing::{debug, warn};

use crate::models::DisplayArticle;

/// Everything a refresh cycle shows to the user, apart from the status line.
pub trait View {
    /// Show the loading indicator, disable the refresh trigger, hide any error.
    fn show_loading(&self);

    /// Restore the idle affordance and re-enable the refresh trigger.
    fn hide_loading(&self);

    /// Clear the displayed collection and show the error affordance.
    fn show_error(&self);

    /// Replace the displayed collection with `articles`, in order.
    fn render(&self, articles: &[DisplayArticle]);
}

/// Format one article as a text card.
///
/// The image and link lines are left out when the article has no URL for them.
pub fn format_card(article: &DisplayArticle) -> String {
    let mut card = String::new();

    let _ = writeln!(card, "Article #{}", article.ordinal);
    if let Some(image) = &article.image_url {
        let _ = writeln!(card, "  [image] {}", image);
    }
    let _ = writeln!(card, "  {}", article.title);
    let _ = writeln!(card, "  {} | {}", article.source_name, article.published_date);
    let _ = writeln!(card, "  {}", article.description);
    if let Some(url) = &article.article_url {
        let _ = writeln!(card, "  Read Full Article: {}", url);
    }

    card
}

/// Terminal [`View`] writing cards to any `Write` sink (stdout in the binary).
pub struct TerminalView<W: Write> {
    out: RefCell<W>,
    cards: RefCell<Vec<DisplayArticle>>,
    loading: Cell<bool>,
    error_visible: Cell<bool>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            cards: RefCell::new(Vec::new()),
            loading: Cell::new(false),
            error_visible: Cell::new(false),
        }
    }

    #[cfg(test)]
    fn cards(&self) -> Vec<DisplayArticle> {
        self.cards.borrow().clone()
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out.into_inner()
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    /// Hand a freshly inserted card to the reveal step.
    fn reveal(&self, article: &DisplayArticle) {
        self.emit(&format_card(article));
        self.emit("\n");
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_loading(&self) {
        self.loading.set(true);
        let retrying = self.error_visible.replace(false);
        self.emit(if retrying { "Retrying...\n" } else { "Loading News...\n" });
    }

    fn hide_loading(&self) {
        if self.loading.replace(false) {
            self.emit("Ready. Commands: [r] refresh  [q] quit  [h] help\n");
        }
    }

    fn show_error(&self) {
        self.cards.borrow_mut().clear();
        self.error_visible.set(true);
        self.emit("\n!! Unable to load news right now. Press r to try again.\n\n");
    }

    fn render(&self, articles: &[DisplayArticle]) {
        self.error_visible.set(false);
        *self.cards.borrow_mut() = articles.to_vec();

        self.emit(&format!("\n==== Top headlines ({}) ====\n\n", articles.len()));
        for article in articles {
            self.reveal(article);
        }
        debug!(count = articles.len(), "Rendered article cards");
    }
}
