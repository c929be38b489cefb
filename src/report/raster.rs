// src/report/raster.rs
//
// Raster rendition of the result sheet: A4-proportioned PNG pages. Layout is
// computed first as a plain list of (y, item) placements per page, then each
// page is drawn with the bitmap backend; content that overflows one page
// continues on the next file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use super::model::{InfoEntry, ScoreCard};
use super::{band_palette, ReportModel};

/// A4 at 150 dpi.
pub const PAGE_WIDTH: u32 = 1240;
pub const PAGE_HEIGHT: u32 = 1754;

const MARGIN: i32 = 70;
const FOOTER_HEIGHT: i32 = 90;
const USABLE_BOTTOM: i32 = PAGE_HEIGHT as i32 - MARGIN - FOOTER_HEIGHT;

const HEADER_HEIGHT: i32 = 150;
const INFO_HEADING_HEIGHT: i32 = 56;
const INFO_LINE_HEIGHT: i32 = 44;
const SCORES_HEADING_HEIGHT: i32 = 64;
const EMPTY_HEIGHT: i32 = 60;

const CARD_COLUMNS: usize = 3;
const CARD_GAP: i32 = 20;
const CARD_HEIGHT: i32 = 170;
const CARD_ROW_HEIGHT: i32 = CARD_HEIGHT + CARD_GAP;
const CARD_WIDTH: i32 =
    (PAGE_WIDTH as i32 - 2 * MARGIN - (CARD_COLUMNS as i32 - 1) * CARD_GAP) / CARD_COLUMNS as i32;

const TEXT: RGBColor = RGBColor(15, 23, 42);
const MUTED: RGBColor = RGBColor(100, 116, 139);
const FAINT: RGBColor = RGBColor(148, 163, 184);
const RULE: RGBColor = RGBColor(226, 232, 240);
const TRACK: RGBColor = RGBColor(241, 245, 249);

enum Item<'a> {
    PageHeader,
    InfoHeading,
    InfoLine(&'a InfoEntry),
    ScoresHeading,
    CardRow(&'a [ScoreCard]),
    EmptyScores,
}

/// Write the report as one PNG file per page and return the paths in page
/// order.
pub fn render(model: &ReportModel, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let pages = paginate(model);
    let total = pages.len();
    let mut written = Vec::with_capacity(total);

    for (idx, items) in pages.iter().enumerate() {
        let path = out_dir.join(format!("result-page-{:02}.png", idx + 1));
        draw_page(&path, items, model, idx + 1, total)
            .with_context(|| format!("rendering {}", path.display()))?;
        written.push(path);
    }

    info!(pages = total, dir = %out_dir.display(), "raster pages written");
    Ok(written)
}

struct Layout<'a> {
    pages: Vec<Vec<(i32, Item<'a>)>>,
    current: Vec<(i32, Item<'a>)>,
    y: i32,
}

impl<'a> Layout<'a> {
    fn place(&mut self, item: Item<'a>, height: i32) {
        if self.y + height > USABLE_BOTTOM && !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = MARGIN;
        }
        self.current.push((self.y, item));
        self.y += height;
    }

    fn finish(mut self) -> Vec<Vec<(i32, Item<'a>)>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn paginate(model: &ReportModel) -> Vec<Vec<(i32, Item<'_>)>> {
    let mut layout = Layout {
        pages: Vec::new(),
        current: Vec::new(),
        y: MARGIN,
    };

    layout.place(Item::PageHeader, HEADER_HEIGHT);
    layout.place(Item::InfoHeading, INFO_HEADING_HEIGHT);
    for entry in &model.info {
        layout.place(Item::InfoLine(entry), INFO_LINE_HEIGHT);
    }
    layout.place(Item::ScoresHeading, SCORES_HEADING_HEIGHT);
    if model.scores.is_empty() {
        layout.place(Item::EmptyScores, EMPTY_HEIGHT);
    } else {
        for chunk in model.scores.chunks(CARD_COLUMNS) {
            layout.place(Item::CardRow(chunk), CARD_ROW_HEIGHT);
        }
    }
    layout.finish()
}

fn draw_err<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow::anyhow!("drawing failed: {err}")
}

fn draw_page(
    path: &Path,
    items: &[(i32, Item<'_>)],
    model: &ReportModel,
    page: usize,
    total: usize,
) -> Result<()> {
    let root = BitMapBackend::new(path, (PAGE_WIDTH, PAGE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    for (y, item) in items {
        match item {
            Item::PageHeader => draw_header(&root, model, *y)?,
            Item::InfoHeading => draw_text(
                &root,
                &model.meta.info_heading,
                (MARGIN, *y),
                ("sans-serif", 28).into_font().color(&TEXT),
            )?,
            Item::InfoLine(entry) => draw_info_line(&root, entry, *y)?,
            Item::ScoresHeading => draw_text(
                &root,
                &model.meta.scores_heading,
                (MARGIN, *y + 8),
                ("sans-serif", 28).into_font().color(&TEXT),
            )?,
            Item::CardRow(cards) => draw_card_row(&root, cards, *y)?,
            Item::EmptyScores => draw_text(
                &root,
                &model.meta.empty_scores,
                (PAGE_WIDTH as i32 / 2, *y + 16),
                ("sans-serif", 22)
                    .into_font()
                    .color(&FAINT)
                    .pos(Pos::new(HPos::Center, VPos::Top)),
            )?,
        }
    }

    draw_footer(&root, model, page, total)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_text<'a, S: Into<TextStyle<'a>>>(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    text: &str,
    pos: (i32, i32),
    style: S,
) -> Result<()> {
    root.draw(&Text::new(text.to_string(), pos, style.into()))
        .map_err(draw_err)
}

fn draw_header(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    model: &ReportModel,
    y: i32,
) -> Result<()> {
    let center = PAGE_WIDTH as i32 / 2;
    draw_text(
        root,
        &model.meta.title,
        (center, y + 10),
        ("sans-serif", 34)
            .into_font()
            .color(&TEXT)
            .pos(Pos::new(HPos::Center, VPos::Top)),
    )?;
    draw_text(
        root,
        &model.meta.subtitle,
        (center, y + 64),
        ("sans-serif", 22)
            .into_font()
            .color(&MUTED)
            .pos(Pos::new(HPos::Center, VPos::Top)),
    )?;
    root.draw(&PathElement::new(
        vec![(MARGIN, y + 116), (PAGE_WIDTH as i32 - MARGIN, y + 116)],
        RULE.stroke_width(2),
    ))
    .map_err(draw_err)?;
    Ok(())
}

fn draw_info_line(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    entry: &InfoEntry,
    y: i32,
) -> Result<()> {
    draw_text(
        root,
        &entry.label,
        (MARGIN, y + 8),
        ("sans-serif", 18).into_font().color(&MUTED),
    )?;
    draw_text(
        root,
        &entry.value,
        (MARGIN + 380, y + 4),
        ("sans-serif", 24).into_font().color(&TEXT),
    )?;
    Ok(())
}

fn draw_card_row(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    cards: &[ScoreCard],
    y: i32,
) -> Result<()> {
    for (i, card) in cards.iter().enumerate() {
        let x = MARGIN + i as i32 * (CARD_WIDTH + CARD_GAP);
        draw_card(root, card, x, y)?;
    }
    Ok(())
}

fn draw_card(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    card: &ScoreCard,
    x: i32,
    y: i32,
) -> Result<()> {
    let [accent, background, border] = band_palette(card.cell.band);
    let accent = RGBColor(accent.0, accent.1, accent.2);
    let background = RGBColor(background.0, background.1, background.2);
    let border = RGBColor(border.0, border.1, border.2);

    root.draw(&Rectangle::new(
        [(x, y), (x + CARD_WIDTH, y + CARD_HEIGHT)],
        background.filled(),
    ))
    .map_err(draw_err)?;
    root.draw(&Rectangle::new(
        [(x, y), (x + CARD_WIDTH, y + CARD_HEIGHT)],
        border.stroke_width(2),
    ))
    .map_err(draw_err)?;

    draw_text(
        root,
        &card.label,
        (x + 18, y + 18),
        ("sans-serif", 17).into_font().color(&accent),
    )?;
    draw_text(
        root,
        &card.cell.display,
        (x + 18, y + 52),
        ("sans-serif", 44).into_font().color(&accent),
    )?;
    draw_text(
        root,
        &format!("/ {}", card.cell.denominator),
        (x + CARD_WIDTH - 18, y + 80),
        ("sans-serif", 17)
            .into_font()
            .color(&MUTED)
            .pos(Pos::new(HPos::Right, VPos::Top)),
    )?;

    // graded bar; the drawn width clamps at 100% of the track
    let track_left = x + 18;
    let track_right = x + CARD_WIDTH - 18;
    let track_top = y + CARD_HEIGHT - 40;
    root.draw(&Rectangle::new(
        [(track_left, track_top), (track_right, track_top + 12)],
        TRACK.filled(),
    ))
    .map_err(draw_err)?;
    let ratio = (card.cell.percentage.min(100.0) / 100.0).max(0.0);
    let fill_right = track_left + ((track_right - track_left) as f64 * ratio) as i32;
    if fill_right > track_left {
        root.draw(&Rectangle::new(
            [(track_left, track_top), (fill_right, track_top + 12)],
            accent.filled(),
        ))
        .map_err(draw_err)?;
    }
    Ok(())
}

fn draw_footer(
    root: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    model: &ReportModel,
    page: usize,
    total: usize,
) -> Result<()> {
    let top = PAGE_HEIGHT as i32 - MARGIN - FOOTER_HEIGHT + 24;
    root.draw(&PathElement::new(
        vec![(MARGIN, top), (PAGE_WIDTH as i32 - MARGIN, top)],
        RULE.stroke_width(1),
    ))
    .map_err(draw_err)?;

    let small = ("sans-serif", 16).into_font().color(&FAINT);
    draw_text(root, &model.meta.produced_by, (MARGIN, top + 14), small.clone())?;
    draw_text(
        root,
        &format!("{}: {}", model.meta.issued_label, model.issued),
        (MARGIN, top + 38),
        small.clone(),
    )?;

    let right = Pos::new(HPos::Right, VPos::Top);
    draw_text(
        root,
        &model.meta.credit,
        (PAGE_WIDTH as i32 - MARGIN, top + 14),
        ("sans-serif", 16).into_font().color(&MUTED).pos(right),
    )?;
    if total > 1 {
        draw_text(
            root,
            &format!("หน้า {page}/{total}"),
            (PAGE_WIDTH as i32 - MARGIN, top + 38),
            ("sans-serif", 16).into_font().color(&FAINT).pos(right),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Band, ScoreCell};
    use crate::report::{InfoEntry, ReportMeta, ReportModel};

    fn score(label: &str, percentage: f64) -> ScoreCard {
        ScoreCard {
            label: label.to_string(),
            cell: ScoreCell {
                display: format!("{percentage:.2}"),
                denominator: 100.0,
                percentage,
                band: Band::from_percentage(percentage),
            },
        }
    }

    fn model(info_lines: usize, score_cards: usize) -> ReportModel {
        ReportModel {
            meta: ReportMeta::default(),
            issued: "7 สิงหาคม 2568".to_string(),
            info: (0..info_lines)
                .map(|i| InfoEntry {
                    label: format!("ข้อมูล {i}"),
                    value: format!("ค่า {i}"),
                })
                .collect(),
            scores: (0..score_cards)
                .map(|i| score(&format!("วิชา {i}"), 50.0 + i as f64))
                .collect(),
        }
    }

    #[test]
    fn short_report_fits_one_page() {
        let model = model(6, 6);
        let pages = paginate(&model);
        assert_eq!(pages.len(), 1);
        // header first, at the top margin
        assert_eq!(pages[0][0].0, MARGIN);
    }

    #[test]
    fn long_report_overflows_to_more_pages() {
        let model = model(60, 30);
        let pages = paginate(&model);
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(!page.is_empty());
            for (y, _) in page {
                assert!(*y >= MARGIN);
                assert!(*y < USABLE_BOTTOM);
            }
        }
        // continuation pages restart at the top margin
        assert_eq!(pages[1][0].0, MARGIN);
    }

    #[test]
    fn cards_group_in_rows_of_three() {
        let model = model(0, 7);
        let pages = paginate(&model);
        let rows: usize = pages
            .iter()
            .flatten()
            .filter(|(_, item)| matches!(item, Item::CardRow(_)))
            .count();
        assert_eq!(rows, 3); // 3 + 3 + 1
        let last_row_len = pages
            .iter()
            .flatten()
            .filter_map(|(_, item)| match item {
                Item::CardRow(cards) => Some(cards.len()),
                _ => None,
            })
            .last();
        assert_eq!(last_row_len, Some(1));
    }

    #[test]
    fn empty_scores_still_paginate() {
        let model = model(2, 0);
        let pages = paginate(&model);
        assert_eq!(pages.len(), 1);
        assert!(pages[0]
            .iter()
            .any(|(_, item)| matches!(item, Item::EmptyScores)));
    }
}
