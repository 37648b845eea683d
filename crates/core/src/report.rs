//! Plain-text PDF reports for a single project or the dashboard summary.
//!
//! Each report is a title followed by `label: value` lines in Helvetica on
//! 600x400 pages. Lines that do not fit continue on a new page.

use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::dashboard::DashboardSummary;
use crate::dates::format_iso;
use crate::error::CoreError;
use crate::project::Project;
use crate::types::Timestamp;

const PAGE_WIDTH: i64 = 600;
const PAGE_HEIGHT: i64 = 400;
const MARGIN_X: i64 = 50;
const TOP_OFFSET: i64 = 50;
const TITLE_SIZE: i64 = 20;
const TITLE_GAP: i64 = 40;
const BODY_SIZE: i64 = 14;
const LINE_HEIGHT: i64 = 20;
const BOTTOM_MARGIN: i64 = 30;

pub const PROJECT_REPORT_TITLE: &str = "Project Information";
pub const SUMMARY_REPORT_TITLE: &str = "Project Summary";

/// One `label: value` line of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: &'static str,
    pub value: String,
}

impl ReportLine {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

fn opt_date(value: Option<Timestamp>) -> String {
    value.as_ref().map(format_iso).unwrap_or_default()
}

fn opt_display<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Report lines for one project, in display order.
pub fn project_lines(project: &Project) -> Vec<ReportLine> {
    vec![
        ReportLine::new("permit_no", project.permit_no.clone()),
        ReportLine::new("year", opt_display(project.year)),
        ReportLine::new("layout_no", project.layout_no.clone()),
        ReportLine::new("town", project.town.clone()),
        ReportLine::new("project_type", project.project_type.as_str()),
        ReportLine::new("address", project.address.clone()),
        ReportLine::new("const_start_date", opt_date(project.const_start_date)),
        ReportLine::new("const_end_date", opt_date(project.const_end_date)),
        ReportLine::new("rest_start_date", opt_date(project.rest_start_date)),
        ReportLine::new("rest_end_date", opt_date(project.rest_end_date)),
        ReportLine::new("remarks", project.remarks.clone().unwrap_or_default()),
        ReportLine::new("permit_closeout", opt_display(project.permit_closeout)),
        ReportLine::new("project_status", opt_display(project.project_status)),
        ReportLine::new("latitude", opt_display(project.latitude)),
        ReportLine::new("longitude", opt_display(project.longitude)),
    ]
}

/// Report lines for the dashboard summary.
pub fn summary_lines(summary: &DashboardSummary) -> Vec<ReportLine> {
    vec![
        ReportLine::new("totalPermit", summary.total_permit.to_string()),
        ReportLine::new("totalEmergency", summary.total_emergency.to_string()),
        ReportLine::new(
            "completedConstructions",
            summary.completed_constructions.to_string(),
        ),
        ReportLine::new(
            "completedRestorations",
            summary.completed_restorations.to_string(),
        ),
    ]
}

/// Render a titled report into PDF bytes.
pub fn render_pdf(title: &str, lines: &[ReportLine]) -> Result<Vec<u8>, CoreError> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.new_object_id();
    let resources_id = doc.new_object_id();

    doc.objects.insert(
        font_id,
        Object::Dictionary(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        }),
    );
    doc.objects.insert(
        resources_id,
        Object::Dictionary(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        }),
    );

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for content in layout_pages(title, lines) {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_count = page_ids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<Object>>(),
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| CoreError::Report(e.to_string()))?;
    tracing::debug!(title, pages = page_count, bytes = buffer.len(), "Rendered PDF report");
    Ok(buffer)
}

/// Build one content stream per page. The title goes on the first page only.
fn layout_pages(title: &str, lines: &[ReportLine]) -> Vec<String> {
    let top = PAGE_HEIGHT - TOP_OFFSET;
    let mut pages = Vec::new();

    let mut content = String::new();
    push_text(&mut content, TITLE_SIZE, top, title);
    let mut y = top - TITLE_GAP;

    for line in lines {
        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut content));
            y = top;
        }
        push_text(
            &mut content,
            BODY_SIZE,
            y,
            &format!("{}: {}", line.label, line.value),
        );
        y -= LINE_HEIGHT;
    }

    pages.push(content);
    pages
}

fn push_text(content: &mut String, size: i64, y: i64, text: &str) {
    content.push_str(&format!(
        "BT\n/F1 {size} Tf\n{MARGIN_X} {y} Td\n({}) Tj\nET\n",
        escape_pdf_string(text)
    ));
}

/// Escape a string for a PDF literal. Characters outside printable ASCII
/// are replaced with `?` since the base font has no glyphs for them.
fn escape_pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}
