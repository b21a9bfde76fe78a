// Printable HTML document holding every SVG page of the report.
use super::layout::PageLayout;
use crate::util::escape_xml;
use std::fmt::Write as _;

pub(crate) fn render_document(title: &str, layout: &PageLayout, pages: &[String]) -> String {
    let mut out = String::with_capacity(pages.iter().map(String::len).sum::<usize>() + 1024);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n\
         @page {{ size: {w}px {h}px; margin: 0; }}\n\
         body {{ margin: 0; background: #E7E6E6; }}\n\
         .page {{ width: {w}px; height: {h}px; margin: 0 auto 16px; background: #FFFFFF; page-break-after: always; }}\n\
         .page:last-child {{ page-break-after: auto; }}\n\
         @media print {{ body {{ background: none; }} .page {{ margin: 0; }} }}\n\
         </style>\n</head>\n<body>\n",
        escape_xml(title),
        w = layout.width,
        h = layout.height,
    );
    for (i, svg) in pages.iter().enumerate() {
        let _ = writeln!(out, "<section class=\"page\" id=\"page-{}\">{}</section>", i + 1, svg);
    }
    out.push_str("</body>\n</html>\n");
    out
}
