//! One-page-or-more PDF resume.
//!
//! Rendering happens in two passes. `layout_resume` turns the document into
//! pages of positioned draw operations using the static font tables, with
//! coordinates in points measured from the top-left corner. `write_pdf` then
//! replays those operations through printpdf's built-in Helvetica faces.

use std::fs;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Pt,
};
use tracing::info;

use crate::errors::AppError;
use crate::layout::{get_metrics, wrap_lines, Font};
use crate::models::resume::{Basics, ResumeDocument, SiteMetadata};
use crate::render::dates::{format_short, school_span_pdf};
use crate::visibility::{visible_section, Channel};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry and palette
// ────────────────────────────────────────────────────────────────────────────

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN_TOP: f32 = 40.0;
pub const MARGIN_BOTTOM: f32 = 40.0;
pub const MARGIN_SIDE: f32 = 50.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_SIDE;
const RIGHT_EDGE: f32 = PAGE_WIDTH - MARGIN_SIDE;

/// Line advance as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.15;
/// Baseline offset from the top of a line, as a multiple of the font size.
const ASCENT: f32 = 0.72;
const BULLET_INDENT: f32 = 85.0;
/// Projects start on a fresh page when the cursor is already this low.
const PROJECTS_PAGE_BREAK_Y: f32 = 650.0;
const MAX_PROJECTS: usize = 4;
const MAX_PROJECT_HIGHLIGHTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const PRIMARY: Rgb = Rgb(0x01, 0x48, 0x7a);
pub const SECONDARY: Rgb = Rgb(0x02, 0x93, 0xf8);
pub const TEXT: Rgb = Rgb(0x37, 0x40, 0x54);
pub const LIGHT_TEXT: Rgb = Rgb(0x5c, 0x67, 0x70);
pub const LINE: Rgb = Rgb(0xdc, 0xd9, 0xd9);
pub const ACCENT: Rgb = Rgb(0x74, 0xd4, 0x63);

// ────────────────────────────────────────────────────────────────────────────
// Layout plan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the baseline, measured from the top of the page.
    Text {
        x: f32,
        y: f32,
        text: String,
        font: Font,
        size: f32,
        color: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PageOps {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone)]
pub struct ResumeLayout {
    pub pages: Vec<PageOps>,
}

#[cfg(test)]
impl ResumeLayout {
    /// Text runs in drawing order across all pages.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| p.ops.iter()).filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

/// Cursor-driven page builder. Breaks to a new page whenever the next line
/// would cross the bottom margin.
struct Composer {
    pages: Vec<PageOps>,
    y: f32,
}

impl Composer {
    fn new() -> Self {
        Self {
            pages: vec![PageOps::default()],
            y: MARGIN_TOP,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageOps::default());
        self.y = MARGIN_TOP;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y + height > PAGE_HEIGHT - MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn move_down(&mut self, lines: f32, size: f32) {
        self.y += lines * size * LINE_HEIGHT;
    }

    fn text_at(&mut self, x: f32, text: &str, font: Font, size: f32, color: Rgb) {
        self.push(DrawOp::Text {
            x,
            y: self.y + size * ASCENT,
            text: text.to_string(),
            font,
            size,
            color,
        });
    }

    /// One line of text at `x`, advancing the cursor.
    fn line(&mut self, x: f32, text: &str, font: Font, size: f32, color: Rgb) {
        self.ensure_room(size * LINE_HEIGHT);
        self.text_at(x, text, font, size, color);
        self.y += size * LINE_HEIGHT;
    }

    fn paragraph(&mut self, x: f32, width: f32, text: &str, font: Font, size: f32, color: Rgb) {
        for line in wrap_lines(text, get_metrics(font), size, width) {
            self.line(x, &line, font, size, color);
        }
    }

    fn centered(&mut self, text: &str, font: Font, size: f32, color: Rgb) {
        let metrics = get_metrics(font);
        for line in wrap_lines(text, metrics, size, CONTENT_WIDTH) {
            let x = (PAGE_WIDTH - metrics.width_pt(&line, size)) / 2.0;
            self.line(x, &line, font, size, color);
        }
    }

    /// Bold label followed by regular text on the same line, wrapping the
    /// remainder at the full content width.
    fn labelled(&mut self, label: &str, label_color: Rgb, body: &str, body_color: Rgb, size: f32) {
        let bold = get_metrics(Font::HelveticaBold);
        let regular = get_metrics(Font::Helvetica);
        let label_w = bold.width_pt(label, size);

        self.ensure_room(size * LINE_HEIGHT);
        self.text_at(MARGIN_SIDE, label, Font::HelveticaBold, size, label_color);

        let first_lines = wrap_lines(body, regular, size, CONTENT_WIDTH - label_w);
        let Some(first) = first_lines.first() else {
            self.y += size * LINE_HEIGHT;
            return;
        };
        self.text_at(MARGIN_SIDE + label_w, first, Font::Helvetica, size, body_color);
        self.y += size * LINE_HEIGHT;

        let taken = first.split_whitespace().count();
        let rest: Vec<&str> = body.split_whitespace().skip(taken).collect();
        if !rest.is_empty() {
            self.paragraph(
                MARGIN_SIDE,
                CONTENT_WIDTH,
                &rest.join(" "),
                Font::Helvetica,
                size,
                body_color,
            );
        }
    }

    fn rule(&mut self, y: f32, thickness: f32, color: Rgb) {
        self.push(DrawOp::Rule {
            x1: MARGIN_SIDE,
            x2: RIGHT_EDGE,
            y,
            thickness,
            color,
        });
    }

    fn section_header(&mut self, title: &str) {
        self.move_down(0.8, 12.0);
        // keep the heading with at least one following line
        self.ensure_room(12.0 * LINE_HEIGHT + 10.0 * LINE_HEIGHT);
        self.line(
            MARGIN_SIDE,
            &title.to_uppercase(),
            Font::HelveticaBold,
            12.0,
            PRIMARY,
        );
        self.rule(self.y + 3.0, 1.5, PRIMARY);
        self.move_down(0.5, 12.0);
    }

    fn bullet(&mut self, text: &str) {
        let size = 9.0;
        let width = RIGHT_EDGE - BULLET_INDENT;
        let lines = wrap_lines(text, get_metrics(Font::Helvetica), size, width);
        for (i, line) in lines.iter().enumerate() {
            self.ensure_room(size * LINE_HEIGHT);
            if i == 0 {
                self.text_at(BULLET_INDENT - 15.0, "-", Font::Helvetica, size, LIGHT_TEXT);
            }
            self.text_at(BULLET_INDENT, line, Font::Helvetica, size, LIGHT_TEXT);
            self.y += size * LINE_HEIGHT;
        }
        self.move_down(0.1, size);
    }

    fn finish(self) -> ResumeLayout {
        ResumeLayout { pages: self.pages }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Lays out every section visible on the resume channel.
pub fn layout_resume(document: &ResumeDocument) -> ResumeLayout {
    let mut c = Composer::new();
    header(&mut c, &document.basics);
    skills(&mut c, document);
    experience(&mut c, document);
    education(&mut c, document);
    volunteer(&mut c, document);
    projects(&mut c, document);
    c.finish()
}

/// `email | site | GitHub: user | LinkedIn: linkedin.com/in/user`
pub fn contact_line(basics: &Basics) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !basics.email.is_empty() {
        parts.push(basics.email.clone());
    }
    if !basics.website.is_empty() {
        let site = basics
            .website
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        parts.push(site.to_string());
    }
    for profile in &basics.profiles {
        match profile.network.as_str() {
            "GitHub" => parts.push(format!("GitHub: {}", profile.username)),
            "LinkedIn" => parts.push(format!("LinkedIn: linkedin.com/in/{}", profile.username)),
            _ => {}
        }
    }
    parts.join(" | ")
}

fn header(c: &mut Composer, basics: &Basics) {
    let size = 24.0;
    let bold = get_metrics(Font::HelveticaBold);
    let upper = basics.name.to_uppercase();
    let mut words: Vec<&str> = upper.split_whitespace().collect();
    let last = words.pop().unwrap_or_default();
    let first = if words.is_empty() {
        String::new()
    } else {
        format!("{} ", words.join(" "))
    };

    let first_w = bold.width_pt(&first, size);
    let total = first_w + bold.width_pt(last, size);
    let x = (PAGE_WIDTH - total) / 2.0;
    if !first.is_empty() {
        c.text_at(x, first.trim_end(), Font::HelveticaBold, size, PRIMARY);
    }
    c.text_at(x + first_w, last, Font::HelveticaBold, size, ACCENT);
    c.y += size * LINE_HEIGHT;
    c.move_down(0.5, size);

    if !basics.label.is_empty() {
        c.centered(&basics.label, Font::Helvetica, 12.0, SECONDARY);
    }
    c.move_down(0.3, 12.0);
    c.centered(&contact_line(basics), Font::Helvetica, 9.0, TEXT);
    c.move_down(0.4, 9.0);
    c.rule(c.y, 0.5, LINE);
    c.move_down(0.5, 9.0);
}

fn skills(c: &mut Composer, document: &ResumeDocument) {
    let Some(categories) =
        visible_section(document.skills.hidden, &document.skills.skills, Channel::Resume)
    else {
        return;
    };
    c.section_header("Technical Skills");
    for category in categories {
        c.labelled(
            &format!("{}: ", category.name),
            TEXT,
            &category.keywords.join(", "),
            LIGHT_TEXT,
            9.0,
        );
        c.move_down(0.2, 9.0);
    }
    c.move_down(0.4, 9.0);
}

fn experience(c: &mut Composer, document: &ResumeDocument) {
    let Some(jobs) = visible_section(document.work.hidden, &document.work.jobs, Channel::Resume)
    else {
        return;
    };
    c.section_header("Professional Experience");
    let regular = get_metrics(Font::Helvetica);
    let count = jobs.len();
    for (index, job) in jobs.into_iter().enumerate() {
        c.line(MARGIN_SIDE, &job.position, Font::HelveticaBold, 11.0, TEXT);

        let dates = format!(
            "{} - {}",
            format_short(&job.start_date),
            format_short(&job.end_date)
        );
        c.ensure_room(10.0 * LINE_HEIGHT);
        c.text_at(MARGIN_SIDE, &job.company, Font::HelveticaBold, 10.0, PRIMARY);
        let dates_x = RIGHT_EDGE - regular.width_pt(&dates, 10.0);
        c.text_at(dates_x, &dates, Font::Helvetica, 10.0, LIGHT_TEXT);
        c.y += 10.0 * LINE_HEIGHT;
        c.move_down(0.2, 10.0);

        for highlight in &job.highlights {
            c.bullet(highlight);
        }
        if index + 1 < count {
            c.move_down(0.4, 10.0);
        }
    }
    c.move_down(0.6, 10.0);
}

fn education(c: &mut Composer, document: &ResumeDocument) {
    let Some(schools) = visible_section(
        document.education.hidden,
        &document.education.schools,
        Channel::Resume,
    ) else {
        return;
    };
    c.section_header("Education");
    let count = schools.len();
    for (index, school) in schools.into_iter().enumerate() {
        c.labelled(
            &format!("{} ", school.study_type),
            TEXT,
            &format!("in {}", school.area),
            TEXT,
            10.0,
        );
        c.labelled(
            &format!("{} ", school.institution),
            PRIMARY,
            &format!("| {}", school_span_pdf(school)),
            LIGHT_TEXT,
            9.0,
        );
        if index + 1 < count {
            c.move_down(0.3, 9.0);
        }
    }
    c.move_down(0.6, 9.0);
}

fn volunteer(c: &mut Composer, document: &ResumeDocument) {
    let Some(entries) = visible_section(
        document.volunteer.hidden,
        &document.volunteer.volunteer,
        Channel::Resume,
    ) else {
        return;
    };
    c.section_header("Volunteer & Community Service");
    let count = entries.len();
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.position.is_empty() {
            c.line(MARGIN_SIDE, &entry.position, Font::HelveticaBold, 10.0, TEXT);
        }
        c.line(MARGIN_SIDE, &entry.organization, Font::Helvetica, 9.0, PRIMARY);
        if !entry.summary.is_empty() {
            c.move_down(0.1, 9.0);
            c.paragraph(
                MARGIN_SIDE,
                CONTENT_WIDTH,
                &entry.summary,
                Font::Helvetica,
                9.0,
                LIGHT_TEXT,
            );
        }
        if index + 1 < count {
            c.move_down(0.3, 9.0);
        }
    }
    c.move_down(0.5, 9.0);
}

fn projects(c: &mut Composer, document: &ResumeDocument) {
    let Some(projects) = visible_section(
        document.projects.hidden,
        &document.projects.projects,
        Channel::Resume,
    ) else {
        return;
    };
    if c.y > PROJECTS_PAGE_BREAK_Y {
        c.new_page();
    }
    c.section_header("Notable Projects");
    let top: Vec<_> = projects.into_iter().take(MAX_PROJECTS).collect();
    let count = top.len();
    for (index, project) in top.into_iter().enumerate() {
        c.line(MARGIN_SIDE, &project.name, Font::HelveticaBold, 11.0, TEXT);
        c.move_down(0.2, 11.0);
        c.paragraph(
            MARGIN_SIDE,
            CONTENT_WIDTH,
            &project.description,
            Font::Helvetica,
            10.0,
            LIGHT_TEXT,
        );
        if !project.highlights.is_empty() {
            c.move_down(0.2, 10.0);
            for highlight in project.highlights.iter().take(MAX_PROJECT_HIGHLIGHTS) {
                c.bullet(highlight);
            }
        }
        if index + 1 < count {
            c.move_down(0.6, 10.0);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// printpdf backend
// ────────────────────────────────────────────────────────────────────────────

/// `Jordan Avery` → `Jordan_Avery_Resume.pdf`.
pub fn output_file_name(name: &str) -> String {
    let joined = name.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{joined}_Resume.pdf")
    }
}

/// Lays out the resume and writes it under `output_dir`, creating the
/// directory when needed.
pub fn render_pdf(document: &ResumeDocument, output_dir: &Path) -> Result<PathBuf, AppError> {
    let layout = layout_resume(document);
    let bytes = write_pdf(document, &layout)?;
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(output_file_name(&document.basics.name));
    fs::write(&path, bytes)?;
    info!(
        "Wrote {} ({} page(s))",
        path.display(),
        layout.pages.len()
    );
    Ok(path)
}

fn pdf_error<E: std::fmt::Debug>(e: E) -> AppError {
    AppError::Internal(anyhow::anyhow!("PDF rendering failed: {e:?}"))
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        rgb.0 as f32 / 255.0,
        rgb.1 as f32 / 255.0,
        rgb.2 as f32 / 255.0,
        None,
    ))
}

/// PDF user space has its origin at the bottom-left.
fn point(x: f32, y_from_top: f32) -> (Mm, Mm) {
    (Mm::from(Pt(x)), Mm::from(Pt(PAGE_HEIGHT - y_from_top)))
}

/// Replays the plan and returns the encoded document.
pub fn write_pdf(document: &ResumeDocument, layout: &ResumeLayout) -> Result<Vec<u8>, AppError> {
    let name = &document.basics.name;
    let meta = SiteMetadata::resolve(document.metadata.as_ref());
    let keywords = if meta.keywords.is_empty() {
        vec!["resume".to_string()]
    } else {
        meta.keywords
    };

    let width = Mm::from(Pt(PAGE_WIDTH));
    let height = Mm::from(Pt(PAGE_HEIGHT));
    let (pdf, first_page, first_layer) =
        PdfDocument::new(format!("{name} - Resume"), width, height, "Resume");
    let pdf = pdf
        .with_author(name.clone())
        .with_subject("Professional Resume")
        .with_keywords(keywords);

    let regular = pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = pdf
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = pdf.add_page(width, height, "Resume");
            pdf.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &regular, &bold);
    }

    pdf.save_to_bytes().map_err(pdf_error)
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &PageOps,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                text,
                font,
                size,
                color,
            } => {
                let face = match font {
                    Font::Helvetica => regular,
                    Font::HelveticaBold => bold,
                };
                let (px, py) = point(*x, *y);
                layer.set_fill_color(to_color(*color));
                layer.use_text(text.as_str(), *size, px, py, face);
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                let (ax, ay) = point(*x1, *y);
                let (bx, by) = point(*x2, *y);
                layer.set_outline_color(to_color(*color));
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![(Point::new(ax, ay), false), (Point::new(bx, by), false)],
                    is_closed: false,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{fixture_document, Job};
    use crate::visibility::Visibility;

    fn texts(document: &ResumeDocument) -> Vec<String> {
        layout_resume(document).texts().map(str::to_string).collect()
    }

    fn position_of(texts: &[String], needle: &str) -> usize {
        texts
            .iter()
            .position(|t| t == needle)
            .unwrap_or_else(|| panic!("{needle:?} not found in {texts:?}"))
    }

    #[test]
    fn test_sections_in_resume_order() {
        let t = texts(&fixture_document());
        let skills = position_of(&t, "TECHNICAL SKILLS");
        let work = position_of(&t, "PROFESSIONAL EXPERIENCE");
        let edu = position_of(&t, "EDUCATION");
        let projects = position_of(&t, "NOTABLE PROJECTS");
        assert!(skills < work && work < edu && edu < projects);
    }

    #[test]
    fn test_resume_channel_filtering() {
        let t = texts(&fixture_document());
        assert!(t.iter().any(|s| s == "Northwind Logistics"));
        assert!(!t.iter().any(|s| s == "Blue Finch Studio"), "hidden from resume");
        assert!(!t.iter().any(|s| s == "Campus IT"), "hidden everywhere");
        assert!(
            !t.iter().any(|s| s.contains("VOLUNTEER")),
            "volunteer section is marked resume"
        );
        assert!(t.iter().any(|s| s == "Ledger CLI"), "site marker is inert");
        assert!(!t.iter().any(|s| s == "Old Experiment"));
    }

    #[test]
    fn test_section_marked_resume_omits_heading() {
        let mut doc = fixture_document();
        doc.work.hidden = Visibility::HiddenFromResume;
        let t = texts(&doc);
        assert!(!t.iter().any(|s| s == "PROFESSIONAL EXPERIENCE"));
        assert!(!t.iter().any(|s| s == "Northwind Logistics"));
    }

    #[test]
    fn test_header_name_colours_and_contact_line() {
        let layout = layout_resume(&fixture_document());
        let first_ops = &layout.pages[0].ops;
        assert!(matches!(
            &first_ops[0],
            DrawOp::Text { text, color, .. } if text == "JORDAN" && *color == PRIMARY
        ));
        assert!(matches!(
            &first_ops[1],
            DrawOp::Text { text, color, .. } if text == "AVERY" && *color == ACCENT
        ));
        assert_eq!(
            contact_line(&fixture_document().basics),
            "jordan@example.com | jordanavery.dev | GitHub: javery | LinkedIn: linkedin.com/in/jordan-avery"
        );
    }

    #[test]
    fn test_dates_and_education_spans() {
        let t = texts(&fixture_document());
        assert!(t.iter().any(|s| s == "Apr 2021 - Present"));
        assert!(t.iter().any(|s| s == "| Graduated 2014"));
        assert!(t.iter().any(|s| s == "| 2014 - 2018"));
    }

    #[test]
    fn test_project_highlights_capped() {
        let t = texts(&fixture_document());
        assert!(t.iter().any(|s| s == "Offline-first storage"));
        assert!(t.iter().any(|s| s == "End-to-end encrypted sync"));
        assert!(!t.iter().any(|s| s == "Widget support"));
    }

    #[test]
    fn test_long_document_paginates_within_margins() {
        let mut doc = fixture_document();
        doc.work.jobs = (0..30)
            .map(|i| Job {
                company: format!("Company {i}"),
                position: "Engineer".into(),
                start_date: "2020-01".into(),
                end_date: "2021-01".into(),
                highlights: vec![
                    "Shipped a long list of improvements to a service that many teams depend on every day".into(),
                ],
                ..Default::default()
            })
            .collect();
        let layout = layout_resume(&doc);
        assert!(layout.pages.len() > 1, "expected more than one page");
        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::Text { x, y, .. } = op {
                    assert!(*y > MARGIN_TOP && *y < PAGE_HEIGHT - MARGIN_BOTTOM, "y={y}");
                    assert!(*x >= MARGIN_SIDE - 1.0, "x={x}");
                }
            }
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("Jordan Avery"), "Jordan_Avery_Resume.pdf");
        assert_eq!(output_file_name("  Ana  de  Souza "), "Ana_de_Souza_Resume.pdf");
        assert_eq!(output_file_name(""), "Resume.pdf");
    }

    #[test]
    fn test_render_pdf_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pdf/output");
        let path = render_pdf(&fixture_document(), &out).unwrap();
        assert_eq!(path, out.join("Jordan_Avery_Resume.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "not a PDF");
    }
}
