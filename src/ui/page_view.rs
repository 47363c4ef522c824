//! Renders the simulated page into the terminal viewport.
//!
//! Geometry comes from [`PageLayout`] in CSS pixels; computed styles come
//! from [`PageStyles::resolve`].  Pixels map to cells through `px_per_row`
//! (a cell is assumed to be half as wide as it is tall).  Opacity is emulated
//! by blending colours toward the page background.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Paragraph, Sparkline, Widget},
};

use crate::core::target::ElementId;
use crate::page::data::{DashboardCard, Series, GREETING, HERO_LINES, PAD_SIDE};
use crate::page::layout::{CardSlot, PageLayout};
use crate::page::styles::{PageStyles, StyleContext};
use crate::ui::theme::Theme;

/// Below this opacity an element is not drawn at all.
const MIN_OPACITY: f64 = 0.03;
/// Horizontal page margin, in cells.
const MARGIN: u16 = 2;
const COLUMN_GAP: u16 = 2;

pub struct PageView<'a> {
    pub layout: &'a PageLayout,
    pub styles: &'a PageStyles,
    pub ctx: StyleContext,
    pub scroll: f64,
    pub px_per_row: f64,
    pub grid_cards: &'a [DashboardCard],
    pub loose_cards: &'a [DashboardCard],
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::page_style());
        if area.width <= MARGIN * 2 || area.height == 0 {
            return;
        }

        self.render_hero(area, buf);
        self.render_greeting(area, buf);
        self.render_lines(area, buf);
        self.render_grid(area, buf);
        self.render_loose(area, buf);
    }
}

impl PageView<'_> {
    /// Viewport pixels → fractional terminal row offset.
    fn rows(&self, px: f64) -> f64 {
        px / self.px_per_row
    }

    fn cols(&self, px: f64) -> f64 {
        px / (self.px_per_row / 2.0)
    }

    /// Clip a pixel-space vertical span onto `area` at the given columns.
    fn place(&self, area: Rect, top_px: f64, height_px: f64, x: u16, width: u16) -> Option<Rect> {
        let top = area.y as f64 + self.rows(top_px);
        let bottom = top + self.rows(height_px);
        let y0 = top.round().max(area.y as f64);
        let y1 = bottom.round().min(area.bottom() as f64);
        if y1 <= y0 {
            return None;
        }
        let x0 = x.max(area.x);
        let x1 = x.saturating_add(width).min(area.right());
        if x1 <= x0 {
            return None;
        }
        Some(Rect::new(x0, y0 as u16, x1 - x0, (y1 - y0) as u16))
    }

    fn render_hero(&self, area: Rect, buf: &mut Buffer) {
        let rect = self.layout.hero_rect(self.scroll);
        let style = self.styles.resolve(ElementId::HeroImage, &self.ctx);

        let natural_w = (area.width - MARGIN * 2) as f64;
        let width = (natural_w * style.scale).round().max(4.0) as u16;
        let height_px = rect.height * style.scale;
        // Scale about the centre, then translate.
        let centre_px = rect.top + rect.height / 2.0 + style.dy;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let Some(hero) = self.place(area, centre_px - height_px / 2.0, height_px, x, width) else {
            return;
        };

        let block = Block::default()
            .title(" ☀ smart panel ")
            .title_alignment(Alignment::Center)
            .title_style(Theme::card_title(1.0))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::card_border(1.0));
        let inner = block.inner(hero);
        block.render(hero, buf);

        // Solar-cell texture.
        let cell = Style::default().fg(Theme::fade(Theme::ACCENT_BLUE, 0.9));
        let glint = Style::default().fg(Theme::fade(Theme::SOLAR, 0.9));
        let lines: Vec<Line> = (0..inner.height)
            .map(|row| {
                let text: String = (0..inner.width)
                    .map(|col| if (col / 2 + row) % 4 == 0 { '▞' } else { '▦' })
                    .collect();
                let style = if row == 0 { glint } else { cell };
                Line::from(Span::styled(text, style))
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_greeting(&self, area: Rect, buf: &mut Buffer) {
        let rect = self.layout.text_rect(self.scroll);
        let style = self.styles.resolve(ElementId::Greeting, &self.ctx);
        if style.opacity < MIN_OPACITY {
            return;
        }
        let x = area.x + MARGIN;
        let Some(row) = self.place(area, rect.top + style.dy, rect.height, x, area.width - MARGIN * 2) else {
            return;
        };
        Paragraph::new(Line::from(Span::styled(GREETING, Theme::heading(style.opacity))))
            .alignment(Alignment::Center)
            .render(row, buf);
    }

    fn render_lines(&self, area: Rect, buf: &mut Buffer) {
        for i in 0..self.layout.options.line_count {
            let Some(text) = HERO_LINES.get(i) else {
                break;
            };
            let el = ElementId::Line(i);
            let style = self.styles.resolve(el, &self.ctx);
            if style.opacity < MIN_OPACITY {
                continue;
            }
            let rect = self.layout.line_rect(i, self.scroll);
            let indent = (area.width / 4) as f64 + self.cols(style.dx);
            let x = area.x.saturating_add(indent.round().max(0.0) as u16);
            let width = area.right().saturating_sub(x);
            let Some(row) = self.place(area, rect.top + style.dy, rect.height, x, width) else {
                continue;
            };
            let line = Line::from(vec![
                Span::styled("› ", Style::default().fg(Theme::fade(Theme::ACCENT_ORANGE, style.opacity))),
                Span::styled(*text, Theme::text(style.opacity)),
            ]);
            Paragraph::new(line).render(row, buf);
        }
    }

    /// Column span of a card slot.
    fn slot_columns(&self, area: Rect, slot: &CardSlot) -> (u16, u16) {
        let usable = area.width - MARGIN * 2;
        let columns = slot.columns.max(1) as u16;
        let gaps = COLUMN_GAP * (columns - 1);
        let width = usable.saturating_sub(gaps) / columns;
        let x = area.x + MARGIN + slot.column as u16 * (width + COLUMN_GAP);
        (x, width)
    }

    fn render_grid(&self, area: Rect, buf: &mut Buffer) {
        if self.layout.grid.is_none() {
            return;
        }
        let container = self.styles.resolve(ElementId::GridContainer, &self.ctx);
        for (slot, card) in self.layout.grid_cards.iter().zip(self.grid_cards) {
            let style = self.styles.resolve(slot.id, &self.ctx);
            // Opacity multiplies down the tree; transforms add up.
            let opacity = style.opacity * container.opacity;
            let rect = slot.rect(self.scroll);
            let (x, width) = self.slot_columns(area, slot);
            if let Some(target) = self.place(area, rect.top + container.dy + style.dy, rect.height, x, width) {
                render_card(card, target, opacity, container.interactive, buf);
            }
        }
    }

    fn render_loose(&self, area: Rect, buf: &mut Buffer) {
        for (slot, card) in self.layout.loose_cards.iter().zip(self.loose_cards) {
            let style = self.styles.resolve(slot.id, &self.ctx);
            let rect = slot.rect(self.scroll);
            let (x, width) = self.slot_columns(area, slot);
            if let Some(target) = self.place(area, rect.top + style.dy, rect.height, x, width) {
                render_card(card, target, style.opacity, style.interactive, buf);
            }
        }
    }
}

// ───────────────────────────────────────── cards ─────────────

/// Inert cards (pointer events off) get square corners.
fn render_card(card: &DashboardCard, area: Rect, opacity: f64, interactive: bool, buf: &mut Buffer) {
    if opacity < MIN_OPACITY {
        return;
    }

    let mut title = vec![Span::styled(format!(" {} ", card.title), Theme::card_title(opacity))];
    if let Some(v) = card.headline() {
        title.push(Span::styled(format!("{v:.2} {} ", card.unit), Theme::text(opacity)));
    }
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(if interactive { BorderType::Rounded } else { BorderType::Plain })
        .border_style(Theme::card_border(opacity));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match &card.series {
        Series::Line { points } => render_line(points, inner, opacity, buf),
        Series::Bars { labels, values } => render_bars(labels, values, inner, opacity, buf),
        Series::Compare { labels, series } => render_compare(labels, series, inner, opacity, buf),
        Series::Split { labels, values } => render_split(labels, values, inner, opacity, buf),
        Series::Pad { tiles } => render_pad(tiles, inner, opacity, buf),
    }
}

fn render_line(points: &[f64], area: Rect, opacity: f64, buf: &mut Buffer) {
    let max = points.iter().copied().fold(0.0_f64, f64::max);
    let data: Vec<u64> = points
        .iter()
        .map(|&p| if max > 0.0 { (p / max * 100.0).round() as u64 } else { 0 })
        .collect();
    Sparkline::default()
        .data(&data)
        .max(100)
        .style(Style::default().fg(Theme::fade(Theme::ACCENT_GREEN, opacity)))
        .render(area, buf);
}

fn render_bars(labels: &[&str], values: &[f64], area: Rect, opacity: f64, buf: &mut Buffer) {
    if values.is_empty() {
        return;
    }
    let n = values.len() as u16;
    let bar_width = (area.width / n).saturating_sub(1).max(1);
    let bars: Vec<Bar> = labels
        .iter()
        .zip(values)
        .map(|(label, &v)| {
            let colour = Theme::SERIES[0];
            Bar::default()
                .value((v * 10.0).round() as u64)
                .text_value(format!("{v}"))
                .label(Line::from(*label))
                .style(Style::default().fg(Theme::fade(colour, opacity)))
                .value_style(Style::default().fg(Theme::fade(Theme::BACKGROUND, 1.0)).bg(Theme::fade(colour, opacity)))
        })
        .collect();
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(Style::default().fg(Theme::fade(Theme::MUTED, opacity)))
        .render(area, buf);
}

/// Grouped bars, one colour per series, with a legend row on top.
fn render_compare(
    labels: &[&str],
    series: &[(&str, Vec<f64>)],
    area: Rect,
    opacity: f64,
    buf: &mut Buffer,
) {
    if labels.is_empty() || series.is_empty() || area.height < 2 {
        return;
    }
    let colour = |i: usize| Theme::SERIES[i % Theme::SERIES.len()];

    let legend: Vec<Span> = series
        .iter()
        .enumerate()
        .flat_map(|(i, (name, _))| {
            [
                Span::styled("■ ", Style::default().fg(Theme::fade(colour(i), opacity))),
                Span::styled(format!("{name}  "), Theme::text(opacity)),
            ]
        })
        .collect();
    buf.set_line(area.x, area.y, &Line::from(legend), area.width);

    let chart_area = Rect::new(area.x, area.y + 1, area.width, area.height - 1);
    let per_group = series.len() as u16;
    let group_width = chart_area.width / labels.len() as u16;
    let bar_width = (group_width.saturating_sub(1) / per_group).max(1);

    let mut chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(0)
        .group_gap(1)
        .label_style(Style::default().fg(Theme::fade(Theme::MUTED, opacity)));
    for (day, label) in labels.iter().enumerate() {
        let bars: Vec<Bar> = series
            .iter()
            .enumerate()
            .filter_map(|(i, (_, values))| {
                let v = *values.get(day)?;
                Some(
                    Bar::default()
                        .value(v.round() as u64)
                        .text_value(String::new())
                        .style(Style::default().fg(Theme::fade(colour(i), opacity))),
                )
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(*label)).bars(&bars));
    }
    chart.render(chart_area, buf);
}

fn render_split(labels: &[&str], values: &[f64], area: Rect, opacity: f64, buf: &mut Buffer) {
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return;
    }
    for (i, (label, &v)) in labels.iter().zip(values).enumerate() {
        let row = i as u16 * 2;
        if row >= area.height {
            break;
        }
        let share = v / total;
        let colour = Theme::SERIES[i % Theme::SERIES.len()];
        Gauge::default()
            .gauge_style(Style::default().fg(Theme::fade(colour, opacity)))
            .ratio(share.clamp(0.0, 1.0))
            .label(Span::styled(
                format!("{label} {:.0}%", share * 100.0),
                Theme::text(opacity),
            ))
            .render(Rect::new(area.x, area.y + row, area.width, 1), buf);
    }
}

fn render_pad(tiles: &[u8], area: Rect, opacity: f64, buf: &mut Buffer) {
    let rows: Vec<Line> = tiles
        .chunks(PAD_SIDE)
        .take(area.height as usize)
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|&v| Span::styled("██", Style::default().fg(Theme::heat(v, opacity))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    Paragraph::new(rows).alignment(Alignment::Center).render(area, buf);
}
