// src/report/html.rs
//
// Self-contained HTML rendition of the result sheet: inline CSS, no external
// assets, deterministic output, so the file opens and prints the same
// anywhere. Layout mirrors the issued document: header block, student info
// block, score-card grid with graded bars, footer with the issue date.

use std::fmt::Write as _;

use super::{band_palette, hex, ReportModel};

pub fn render(model: &ReportModel) -> String {
    let mut out = String::with_capacity(16 * 1024);

    out.push_str("<!DOCTYPE html>\n<html lang=\"th\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", esc(&model.meta.title));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n<main class=\"page\">\n");

    render_header(&mut out, model);
    render_info(&mut out, model);
    render_scores(&mut out, model);
    render_footer(&mut out, model);

    out.push_str("</main>\n</body>\n</html>\n");
    out
}

const STYLE: &str = r#"body { margin: 0; background: #f8fafc; color: #0f172a; font-family: 'TH Sarabun New', 'Sarabun', sans-serif; }
.page { max-width: 210mm; margin: 0 auto; padding: 14mm; background: #f8fafc; }
.head { text-align: center; border-bottom: 1px solid #e2e8f0; padding-bottom: 18px; margin-bottom: 24px; }
.head h1 { font-size: 22px; margin: 0; }
.head p { color: #64748b; margin: 6px 0 0; }
.panel { background: #ffffff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 20px; margin-bottom: 24px; }
.panel h2 { font-size: 17px; margin: 0 0 12px; border-bottom: 1px solid #f1f5f9; padding-bottom: 8px; }
.info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 10px 32px; }
.info-grid .label { display: block; font-size: 12px; color: #64748b; }
.info-grid .value { font-weight: 600; overflow-wrap: anywhere; }
.cards { display: grid; grid-template-columns: repeat(3, 1fr); gap: 14px; }
.card { border: 1px solid; border-radius: 12px; background: #ffffff; padding: 14px; }
.card .label { font-size: 12px; font-weight: 700; opacity: .7; }
.card .value { font-size: 30px; font-weight: 800; }
.card .denom { font-size: 12px; color: #64748b; }
.bar { height: 8px; border-radius: 4px; background: #f1f5f9; margin-top: 10px; overflow: hidden; }
.bar span { display: block; height: 100%; border-radius: 4px; }
.scores-heading { font-size: 17px; margin: 0 0 14px; }
.empty { border: 1px dashed #cbd5e1; border-radius: 12px; color: #94a3b8; text-align: center; padding: 28px; }
.foot { display: flex; justify-content: space-between; align-items: flex-end; border-top: 1px solid #e2e8f0; margin-top: 32px; padding-top: 14px; font-size: 12px; color: #94a3b8; }
"#;

fn render_header(out: &mut String, model: &ReportModel) {
    out.push_str("<header class=\"head\">\n");
    let _ = writeln!(out, "<h1>{}</h1>", esc(&model.meta.title));
    let _ = writeln!(out, "<p>{}</p>", esc(&model.meta.subtitle));
    out.push_str("</header>\n");
}

fn render_info(out: &mut String, model: &ReportModel) {
    out.push_str("<section class=\"panel\">\n");
    let _ = writeln!(out, "<h2>{}</h2>", esc(&model.meta.info_heading));
    out.push_str("<div class=\"info-grid\">\n");
    for entry in &model.info {
        let _ = writeln!(
            out,
            "<div><span class=\"label\">{}</span><span class=\"value\">{}</span></div>",
            esc(&entry.label),
            esc(&entry.value)
        );
    }
    out.push_str("</div>\n</section>\n");
}

fn render_scores(out: &mut String, model: &ReportModel) {
    out.push_str("<section>\n");
    let _ = writeln!(
        out,
        "<h2 class=\"scores-heading\">{}</h2>",
        esc(&model.meta.scores_heading)
    );

    if model.scores.is_empty() {
        let _ = writeln!(out, "<div class=\"empty\">{}</div>", esc(&model.meta.empty_scores));
        out.push_str("</section>\n");
        return;
    }

    out.push_str("<div class=\"cards\">\n");
    for card in &model.scores {
        let [accent, background, border] = band_palette(card.cell.band);
        // the drawn bar clamps at 100 even when the percentage runs past it
        let width = card.cell.percentage.min(100.0);
        let _ = writeln!(
            out,
            "<div class=\"card\" style=\"border-color:{border};\">\n\
             <div class=\"label\" style=\"color:{accent};\">{label}</div>\n\
             <div><span class=\"value\" style=\"color:{accent};\">{value}</span> \
             <span class=\"denom\">/ {denom}</span></div>\n\
             <div class=\"bar\" style=\"background:{background};\">\
             <span style=\"width:{width:.1}%;background:{accent};\"></span></div>\n\
             </div>",
            border = hex(border),
            accent = hex(accent),
            background = hex(background),
            label = esc(&card.label),
            value = esc(&card.cell.display),
            denom = card.cell.denominator,
        );
    }
    out.push_str("</div>\n</section>\n");
}

fn render_footer(out: &mut String, model: &ReportModel) {
    out.push_str("<footer class=\"foot\">\n<div>\n");
    let _ = writeln!(out, "<p>{}</p>", esc(&model.meta.produced_by));
    let _ = writeln!(
        out,
        "<p>{}: {}</p>",
        esc(&model.meta.issued_label),
        esc(&model.issued)
    );
    out.push_str("</div>\n");
    let _ = writeln!(out, "<div>{}</div>", esc(&model.meta.credit));
    out.push_str("</footer>\n");
}

fn esc(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportMeta, ReportModel};
    use crate::sheet;
    use chrono::{Local, TimeZone};

    fn model() -> ReportModel {
        let (headers, records) = sheet::parse::parse(
            "ชื่อ-นามสกุล,คะแนนภาษาไทย,ลำดับที่สอบ,ปีการศึกษา\n\
             เด็กชายสมชาย <ใจดี>,85.50,25,2567\n",
        );
        let issued = Local.with_ymd_and_hms(2025, 8, 7, 12, 0, 0).unwrap();
        ReportModel::build(&headers, &records[0], ReportMeta::default(), issued)
    }

    #[test]
    fn document_is_complete_and_escaped() {
        let html = render(&model());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("รายงานผลการทดสอบทางการศึกษาระดับชาติขั้นพื้นฐาน"));
        assert!(html.contains("เด็กชายสมชาย &lt;ใจดี&gt;"));
        assert!(!html.contains("<ใจดี>"));
        // no external assets
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn score_cards_carry_band_colors_and_clamped_bars() {
        let html = render(&model());
        // 85.5 of 100: excellent accent
        assert!(html.contains("#059669"));
        assert!(html.contains("85.50"));
        assert!(html.contains("/ 100"));
        // rank 25 of 20: percentage 125 draws as a full bar
        assert!(html.contains("width:100.0%"));
        assert!(html.contains("/ 20"));
        // the year column is info, not a card
        assert!(html.contains("ปีการศึกษา"));
        assert!(!html.contains("2567.00"));
    }

    #[test]
    fn empty_scores_fall_back_to_notice() {
        let (headers, records) = sheet::parse::parse("ชื่อ,หมายเหตุ\nสมชาย,ขาดสอบ\n");
        let issued = Local.with_ymd_and_hms(2025, 8, 7, 12, 0, 0).unwrap();
        let model = ReportModel::build(&headers, &records[0], ReportMeta::default(), issued);
        let html = render(&model);
        assert!(html.contains("ไม่พบข้อมูลคะแนนสอบ"));
        assert!(!html.contains("class=\"card\""));
    }
}
