// One report page as a standalone SVG image.
//
// The header row is drawn with dark fill and white bold text, body rows with
// light fill and dark text. The HTML format embeds these same pages, so the
// contrast holds in every output format.
use super::layout::{PageLayout, HEADER_LABELS};
use super::RenderedRow;
use crate::util::escape_xml;
use std::fmt::Write as _;

pub const HEADER_FILL: &str = "#1F3864";
pub const HEADER_TEXT: &str = "#FFFFFF";
pub const BODY_TEXT: &str = "#1A1A1A";
pub const BODY_FILLS: [&str; 2] = ["#FFFFFF", "#F2F2F2"];
pub const GRID: &str = "#BFBFBF";

/// Everything a page needs besides its rows.
pub(crate) struct PageContext<'a> {
    pub layout: &'a PageLayout,
    pub organization: &'a str,
    pub title: &'a str,
    pub edition_label: &'a str,
    pub logo_data_uri: &'a str,
    pub footer_note: &'a str,
}

enum Anchor {
    Start,
    Middle,
}

pub(crate) fn render_page(
    ctx: &PageContext<'_>,
    rows: &[RenderedRow],
    page_number: usize,
    page_count: usize,
) -> String {
    let l = ctx.layout;
    let first = page_number == 1;
    let mut out = String::with_capacity(4096 + rows.len() * 512);

    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="Helvetica, Arial, sans-serif">"#,
        w = l.width,
        h = l.height
    );
    let _ = write!(
        out,
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#FFFFFF"/>"##,
        l.width, l.height
    );

    if first {
        write_branding(&mut out, ctx);
        write_title_block(&mut out, ctx);
    }

    let left = l.table_left();
    let mut y = l.table_top(first);
    write_header_row(&mut out, l, left, y);
    y += l.header_row_height;

    for (i, row) in rows.iter().enumerate() {
        write_body_row(&mut out, l, left, y, row, BODY_FILLS[i % 2]);
        y += l.row_height;
    }

    let footer = format!("Página {} de {} · {}", page_number, page_count, ctx.footer_note);
    write_text(
        &mut out,
        l.width / 2.0,
        l.height - l.margin,
        &footer,
        9.0,
        "#595959",
        false,
        Anchor::Middle,
    );

    out.push_str("</svg>");
    out
}

fn write_branding(out: &mut String, ctx: &PageContext<'_>) {
    let l = ctx.layout;
    let logo_w = 240.0;
    let logo_h = l.branding_height - 10.0;
    let _ = write!(
        out,
        r#"<image class="branding" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" href="{uri}" xlink:href="{uri}"/>"#,
        (l.width - logo_w) / 2.0,
        l.margin,
        logo_w,
        logo_h,
        uri = ctx.logo_data_uri
    );
}

fn write_title_block(out: &mut String, ctx: &PageContext<'_>) {
    let l = ctx.layout;
    let x = l.width / 2.0;
    let base = l.margin + l.branding_height;
    out.push_str(r#"<g class="title-block">"#);
    let lines = [
        (ctx.organization, 13.0, false),
        (ctx.title, 15.0, true),
        (ctx.edition_label, 13.0, true),
    ];
    for (i, (text, size, bold)) in lines.into_iter().enumerate() {
        let y = base + (i as f64 + 1.0) * l.title_line_height - 6.0;
        write_text(out, x, y, text, size, BODY_TEXT, bold, Anchor::Middle);
    }
    out.push_str("</g>");
}

fn write_header_row(out: &mut String, l: &PageLayout, left: f64, y: f64) {
    out.push_str(r#"<g class="header-row">"#);
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        left,
        y,
        l.table_width(),
        l.header_row_height,
        HEADER_FILL
    );
    let baseline = y + l.header_row_height / 2.0 + l.font_size * 0.35;
    let mut x = left;
    for (col, label) in HEADER_LABELS.iter().enumerate() {
        let (tx, anchor) = cell_anchor(l, x, col);
        write_text(out, tx, baseline, label, l.font_size, HEADER_TEXT, true, anchor);
        x += l.columns[col];
    }
    out.push_str("</g>");
}

fn write_body_row(out: &mut String, l: &PageLayout, left: f64, y: f64, row: &RenderedRow, fill: &str) {
    out.push_str(r#"<g class="row">"#);
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="0.5"/>"#,
        left,
        y,
        l.table_width(),
        l.row_height,
        fill,
        GRID
    );
    let baseline = y + l.row_height / 2.0 + l.font_size * 0.35;
    let cells = [row.rank.as_str(), row.school.as_str(), row.percentage.as_str()];
    let mut x = left;
    for (col, text) in cells.iter().enumerate() {
        let (tx, anchor) = cell_anchor(l, x, col);
        write_text(out, tx, baseline, text, l.font_size, BODY_TEXT, false, anchor);
        x += l.columns[col];
    }
    out.push_str("</g>");
}

// School names are left aligned, the numeric columns centred.
fn cell_anchor(l: &PageLayout, x: f64, col: usize) -> (f64, Anchor) {
    if col == 1 {
        (x + l.cell_padding, Anchor::Start)
    } else {
        (x + l.columns[col] / 2.0, Anchor::Middle)
    }
}

#[allow(clippy::too_many_arguments)]
fn write_text(
    out: &mut String,
    x: f64,
    y: f64,
    text: &str,
    size: f64,
    fill: &str,
    bold: bool,
    anchor: Anchor,
) {
    let anchor = match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
    };
    let weight = if bold { "bold" } else { "normal" };
    let _ = write!(
        out,
        r#"<text x="{:.1}" y="{:.1}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
        x,
        y,
        size,
        weight,
        fill,
        anchor,
        escape_xml(text)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(layout: &PageLayout) -> PageContext<'_> {
        PageContext {
            layout,
            organization: "SECRETARIA DE EDUCAÇÃO",
            title: "RANKING",
            edition_label: "EDIÇÃO 2023",
            logo_data_uri: "data:image/png;base64,AAAA",
            footer_note: "Gerado em 15/10/2026",
        }
    }

    fn row(rank: usize, school: &str) -> RenderedRow {
        RenderedRow {
            rank: rank.to_string(),
            school: school.to_string(),
            percentage: "50.0%".to_string(),
        }
    }

    #[test]
    fn first_page_has_branding_and_title() {
        let layout = PageLayout::default();
        let svg = render_page(&ctx(&layout), &[row(1, "Escola A")], 1, 1);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"class="branding""#));
        assert!(svg.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(svg.contains(r#" href="data:image/png;base64,AAAA""#));
        assert!(svg.contains(r#"xlink:href="data:image/png;base64,AAAA""#));
        assert!(svg.contains("EDIÇÃO 2023"));
        assert!(svg.contains("Página 1 de 1"));
        assert_eq!(svg.matches(r#"class="header-row""#).count(), 1);
        assert_eq!(svg.matches(r#"class="row""#).count(), 1);
    }

    #[test]
    fn continuation_page_repeats_header_without_branding() {
        let layout = PageLayout::default();
        let svg = render_page(&ctx(&layout), &[row(35, "Escola Z")], 2, 2);
        assert!(!svg.contains(r#"class="branding""#));
        assert!(!svg.contains("title-block"));
        assert_eq!(svg.matches(r#"class="header-row""#).count(), 1);
        assert!(svg.contains("Página 2 de 2"));
    }

    #[test]
    fn header_contrast_is_inverted() {
        let layout = PageLayout::default();
        let svg = render_page(&ctx(&layout), &[row(1, "Escola A")], 1, 1);
        let header = &svg[svg.find(r#"class="header-row""#).unwrap()..];
        let header = &header[..header.find("</g>").unwrap()];
        assert!(header.contains(HEADER_FILL));
        assert!(header.contains(HEADER_TEXT));
        assert!(header.contains(r#"font-weight="bold""#));
        let body = &svg[svg.find(r#"class="row""#).unwrap()..];
        assert!(!body[..body.find("</g>").unwrap()].contains(HEADER_FILL));
    }

    #[test]
    fn escapes_school_names() {
        let layout = PageLayout::default();
        let svg = render_page(&ctx(&layout), &[row(1, "Escola <A&B>")], 1, 1);
        assert!(svg.contains("Escola &lt;A&amp;B&gt;"));
    }
}
