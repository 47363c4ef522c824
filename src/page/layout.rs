//! Simulated document geometry.
//!
//! The page is laid out in virtual CSS pixels, top to bottom:
//!
//! ```text
//! ┌ hero wrapper (2.5 viewports tall) ──────────┐
//! │  sticky stage: hero image, greeting, lines  │
//! └─────────────────────────────────────────────┘
//!   card grid (3 columns)
//!   loose cards (one per row)
//!   footer
//! ```
//!
//! The stage is `position: sticky` inside the wrapper: it stays pinned to the
//! viewport top until the wrapper's bottom edge reaches the viewport bottom.

use crate::core::geometry::{ElementRect, ViewportSample};
use crate::core::target::ElementId;
use crate::core::visibility::ObservedCard;

const WRAPPER_VIEWPORTS: f64 = 2.5;

// Stage layout, as fractions of the viewport height.
const HERO_TOP: f64 = 0.06;
const HERO_HEIGHT: f64 = 0.46;
const TEXT_TOP: f64 = 0.54;
const TEXT_HEIGHT: f64 = 0.08;
const LINES_TOP: f64 = 0.64;
const LINE_HEIGHT: f64 = 0.06;

const SECTION_GAP: f64 = 0.12;
const GRID_COLUMNS: usize = 3;
const GRID_CARD_HEIGHT: f64 = 0.42;
const CARD_GAP_PX: f64 = 24.0;
const LOOSE_CARD_HEIGHT: f64 = 0.36;
const FOOTER: f64 = 0.3;

/// What the page contains.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub line_count: usize,
    pub grid_cards: usize,
    pub loose_cards: usize,
    /// Render the managed grid container at all.
    pub with_grid: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            line_count: 5,
            grid_cards: 6,
            loose_cards: 4,
            with_grid: true,
        }
    }
}

/// Position of a card in the document plus its horizontal slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardSlot {
    pub id: ElementId,
    /// Document-space top, px.
    pub top: f64,
    pub height: f64,
    /// Column index and number of columns in its row.
    pub column: usize,
    pub columns: usize,
}

impl CardSlot {
    pub fn rect(&self, scroll: f64) -> ElementRect {
        ElementRect::new(self.top - scroll, self.height)
    }
}

/// Concrete document geometry for one viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub options: PageOptions,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub wrapper_height: f64,
    /// Document-space grid container extent, when present.
    pub grid: Option<(f64, f64)>,
    pub grid_cards: Vec<CardSlot>,
    pub loose_cards: Vec<CardSlot>,
    pub document_height: f64,
}

impl PageLayout {
    pub fn new(options: PageOptions, viewport_width: f64, viewport_height: f64) -> Self {
        let vh = viewport_height.max(1.0);
        let wrapper_height = WRAPPER_VIEWPORTS * vh;
        let mut cursor = wrapper_height + SECTION_GAP * vh;

        let mut grid = None;
        let mut grid_cards = Vec::new();
        if options.with_grid && options.grid_cards > 0 {
            let card_h = GRID_CARD_HEIGHT * vh;
            let rows = options.grid_cards.div_ceil(GRID_COLUMNS);
            let height = rows as f64 * card_h + rows.saturating_sub(1) as f64 * CARD_GAP_PX;
            for i in 0..options.grid_cards {
                let row = i / GRID_COLUMNS;
                let in_row = (options.grid_cards - row * GRID_COLUMNS).min(GRID_COLUMNS);
                grid_cards.push(CardSlot {
                    id: ElementId::GridCard(i),
                    top: cursor + row as f64 * (card_h + CARD_GAP_PX),
                    height: card_h,
                    column: i % GRID_COLUMNS,
                    columns: in_row,
                });
            }
            grid = Some((cursor, height));
            cursor += height + SECTION_GAP * vh;
        }

        let mut loose_cards = Vec::new();
        let loose_h = LOOSE_CARD_HEIGHT * vh;
        for i in 0..options.loose_cards {
            loose_cards.push(CardSlot {
                id: ElementId::LooseCard(i),
                top: cursor,
                height: loose_h,
                column: 0,
                columns: 1,
            });
            cursor += loose_h + CARD_GAP_PX;
        }

        Self {
            options,
            viewport_width,
            viewport_height: vh,
            wrapper_height,
            grid,
            grid_cards,
            loose_cards,
            document_height: cursor + FOOTER * vh,
        }
    }

    /// Largest valid scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height - self.viewport_height).max(0.0)
    }

    pub fn clamp_scroll(&self, scroll: f64) -> f64 {
        scroll.clamp(0.0, self.max_scroll())
    }

    /// Viewport-space top of the sticky stage.
    pub fn stage_top(&self, scroll: f64) -> f64 {
        let pinned = scroll.clamp(0.0, (self.wrapper_height - self.viewport_height).max(0.0));
        pinned - scroll
    }

    pub fn hero_rect(&self, scroll: f64) -> ElementRect {
        let vh = self.viewport_height;
        ElementRect::new(self.stage_top(scroll) + HERO_TOP * vh, HERO_HEIGHT * vh)
    }

    pub fn text_rect(&self, scroll: f64) -> ElementRect {
        let vh = self.viewport_height;
        ElementRect::new(self.stage_top(scroll) + TEXT_TOP * vh, TEXT_HEIGHT * vh)
    }

    pub fn line_rect(&self, index: usize, scroll: f64) -> ElementRect {
        let vh = self.viewport_height;
        let top = LINES_TOP + index as f64 * LINE_HEIGHT;
        ElementRect::new(self.stage_top(scroll) + top * vh, LINE_HEIGHT * vh)
    }

    pub fn grid_rect(&self, scroll: f64) -> Option<ElementRect> {
        self.grid.map(|(top, height)| ElementRect::new(top - scroll, height))
    }

    /// Read the page geometry at `scroll`, like a round of
    /// `getBoundingClientRect()` calls.
    pub fn sample(&self, scroll: f64) -> ViewportSample {
        let grid = self.grid_rect(scroll);
        ViewportSample {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            wrapper: Some(ElementRect::new(-scroll, self.wrapper_height)),
            hero: Some(self.hero_rect(scroll)),
            text: Some(self.text_rect(scroll)),
            grid,
            line_count: self.options.line_count,
            card_count: if grid.is_some() { self.grid_cards.len() } else { 0 },
        }
    }

    /// Every card on the page, tagged with grid membership.
    pub fn observed_cards(&self, scroll: f64) -> Vec<ObservedCard> {
        let grid = self.grid_cards.iter().map(|slot| ObservedCard {
            id: slot.id,
            rect: slot.rect(scroll),
            in_managed_grid: true,
        });
        let loose = self.loose_cards.iter().map(|slot| ObservedCard {
            id: slot.id,
            rect: slot.rect(scroll),
            in_managed_grid: false,
        });
        grid.chain(loose).collect()
    }
}
