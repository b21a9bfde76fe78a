//! Ranking report rendering.
//!
//! A ranking is laid out on fixed-size pages: branding image, title block,
//! then the `ORD | ESCOLA | PERCENTUAL` table. Rows that do not fit start a
//! new page, which repeats the table header. The whole artifact is built in
//! memory before anything is written.

mod html;
pub mod layout;
mod svg;

pub use layout::{paginate, PageLayout, HEADER_LABELS};
pub use svg::{BODY_FILLS, BODY_TEXT, HEADER_FILL, HEADER_TEXT};

use crate::config::ReportSettings;
use crate::error::RenderError;
use crate::types::RankingEntry;
use crate::util::{format_percent, truncate_chars};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One SVG image per page.
    Svg,
    /// A single printable HTML document.
    Html,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Svg => "svg",
            ReportFormat::Html => "html",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ReportFormat::Svg => "image/svg+xml",
            ReportFormat::Html => "text/html; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branding {
    pub organization: String,
    pub title: String,
    pub logo_path: PathBuf,
}

impl From<&ReportSettings> for Branding {
    fn from(s: &ReportSettings) -> Self {
        Branding {
            organization: s.organization.clone(),
            title: s.title.clone(),
            logo_path: s.logo_path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: ReportFormat,
    pub layout: PageLayout,
    pub generated_on: NaiveDate,
}

impl RenderOptions {
    pub fn new(format: ReportFormat, generated_on: NaiveDate) -> Self {
        RenderOptions {
            format,
            layout: PageLayout::default(),
            generated_on,
        }
    }
}

/// A table row as printed: rank, (possibly truncated) school name, `95.5%`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub rank: String,
    pub school: String,
    pub percentage: String,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub number: usize,
    pub header: [&'static str; 3],
    pub rows: Vec<RenderedRow>,
    pub svg: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub edition: i32,
    pub format: ReportFormat,
    pub pages: Vec<RenderedPage>,
    pub files: Vec<ArtifactFile>,
}

impl ReportArtifact {
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &RenderedRow> {
        self.pages.iter().flat_map(|p| p.rows.iter())
    }
}

/// `ranking_2023.html`; multi-page SVG output adds `_p<n>`.
pub fn artifact_file_name(edition: i32, format: ReportFormat, page: Option<usize>) -> String {
    match page {
        Some(n) => format!("ranking_{}_p{}.{}", edition, n, format.extension()),
        None => format!("ranking_{}.{}", edition, format.extension()),
    }
}

fn logo_data_uri(path: &Path) -> Result<String, RenderError> {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        _ => return Err(RenderError::UnsupportedBranding(path.to_path_buf())),
    };
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RenderError::MissingBranding(path.to_path_buf()),
        _ => RenderError::Io(e),
    })?;
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}

/// Render a ranking of one edition.
///
/// Fails when an entry belongs to another edition, when the layout cannot
/// hold a row, or when the branding image is missing or of unknown type.
pub fn render_ranking(
    entries: &[RankingEntry],
    edition: i32,
    branding: &Branding,
    options: &RenderOptions,
) -> Result<ReportArtifact, RenderError> {
    let layout = &options.layout;
    layout.validate()?;
    if let Some(e) = entries.iter().find(|e| e.edition != edition) {
        return Err(RenderError::MixedEditions {
            expected: edition,
            found: e.edition,
        });
    }
    let logo = logo_data_uri(&branding.logo_path)?;

    let name_chars = layout.max_chars(1);
    let rows: Vec<RenderedRow> = entries
        .iter()
        .map(|e| RenderedRow {
            rank: e.rank.to_string(),
            school: truncate_chars(&e.school_name, name_chars),
            percentage: format_percent(e.percentage),
        })
        .collect();

    let edition_label = format!("EDIÇÃO {}", edition);
    let footer_note = format!("Gerado em {}", options.generated_on.format("%d/%m/%Y"));
    let ctx = svg::PageContext {
        layout,
        organization: &branding.organization,
        title: &branding.title,
        edition_label: &edition_label,
        logo_data_uri: &logo,
        footer_note: &footer_note,
    };

    let ranges = paginate(rows.len(), layout);
    let page_count = ranges.len();
    let pages: Vec<RenderedPage> = ranges
        .into_iter()
        .enumerate()
        .map(|(i, range)| {
            let page_rows = rows[range].to_vec();
            let svg = svg::render_page(&ctx, &page_rows, i + 1, page_count);
            RenderedPage {
                number: i + 1,
                header: HEADER_LABELS,
                rows: page_rows,
                svg,
            }
        })
        .collect();
    debug!(edition, rows = rows.len(), pages = page_count, "ranking laid out");

    let files = match options.format {
        ReportFormat::Html => {
            let svgs: Vec<String> = pages.iter().map(|p| p.svg.clone()).collect();
            let title = format!("{} - {}", branding.title, edition_label);
            vec![ArtifactFile {
                name: artifact_file_name(edition, ReportFormat::Html, None),
                mime: ReportFormat::Html.mime(),
                bytes: html::render_document(&title, layout, &svgs).into_bytes(),
            }]
        }
        ReportFormat::Svg => pages
            .iter()
            .map(|p| ArtifactFile {
                name: artifact_file_name(
                    edition,
                    ReportFormat::Svg,
                    (page_count > 1).then_some(p.number),
                ),
                mime: ReportFormat::Svg.mime(),
                bytes: p.svg.clone().into_bytes(),
            })
            .collect(),
    };

    Ok(ReportArtifact {
        edition,
        format: options.format,
        pages,
        files,
    })
}

/// Write every file of `artifact` into `dir`, creating it if needed.
///
/// Files are staged as `.<name>.tmp` and renamed into place only after every
/// write succeeded, so a failed write leaves no part of the artifact behind.
pub fn write_artifact(artifact: &ReportArtifact, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    std::fs::create_dir_all(dir)?;
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(artifact.files.len());
    for file in &artifact.files {
        let tmp = dir.join(format!(".{}.tmp", file.name));
        if let Err(e) = std::fs::write(&tmp, &file.bytes) {
            let _ = std::fs::remove_file(&tmp);
            discard_staged(&staged);
            return Err(e.into());
        }
        staged.push((tmp, dir.join(&file.name)));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(e) = std::fs::rename(tmp, path) {
            discard_staged(&staged[i..]);
            return Err(e.into());
        }
        debug!(path = %path.display(), "report file committed");
        written.push(path.clone());
    }
    for (file, path) in artifact.files.iter().zip(&written) {
        info!(path = %path.display(), bytes = file.bytes.len(), "report written");
    }
    Ok(written)
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = std::fs::remove_file(tmp) {
            debug!(path = %tmp.display(), error = %e, "staged file not removed");
        }
    }
}
