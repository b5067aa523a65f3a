//! Static portfolio page.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use maud::{html, Markup, DOCTYPE};
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::{
    Basics, Job, Project, ResumeDocument, School, SiteMetadata, SkillCategory, VolunteerEntry,
};
use crate::render::dates::{format_long, school_span_site};
use crate::visibility::{visible_section, Channel};

/// Link target of the lead's resume button.
pub const RESUME_PDF_HREF: &str = "/Resume.pdf";

/// Renders the page and writes `index.html` into `output_dir`.
pub fn render_site(document: &ResumeDocument, output_dir: &Path) -> Result<PathBuf, AppError> {
    fs::create_dir_all(output_dir)?;
    let page = render_page(document, chrono::Utc::now().year());
    let path = output_dir.join("index.html");
    fs::write(&path, page.into_string())?;
    info!("Wrote {}", path.display());
    Ok(path)
}

/// Builds the whole document. `year` feeds the footer copyright.
pub fn render_page(document: &ResumeDocument, year: i32) -> Markup {
    let meta = SiteMetadata::resolve(document.metadata.as_ref());
    let keywords = meta.keywords.join(", ");
    let basics = &document.basics;

    let jobs = visible_section(document.work.hidden, &document.work.jobs, Channel::Site);
    let projects = visible_section(
        document.projects.hidden,
        &document.projects.projects,
        Channel::Site,
    );
    let schools = visible_section(
        document.education.hidden,
        &document.education.schools,
        Channel::Site,
    );
    let volunteer = visible_section(
        document.volunteer.hidden,
        &document.volunteer.volunteer,
        Channel::Site,
    );
    let skills = visible_section(document.skills.hidden, &document.skills.skills, Channel::Site);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                @if !keywords.is_empty() {
                    meta name="keywords" content=(keywords);
                }
                meta property="og:title" content=(meta.title);
                meta property="og:description" content=(meta.description);
                @if let Some(url) = &meta.site_url {
                    meta property="og:url" content=(url);
                }
                @if let Some(name) = &meta.site_name {
                    meta property="og:site_name" content=(name);
                }
                meta property="og:locale" content=(meta.locale);
            }
            body {
                main {
                    (lead(basics))
                    (about(basics))
                    @if let Some(jobs) = &jobs { (experience(jobs)) }
                    @if let Some(projects) = &projects { (project_list(projects)) }
                    @if let Some(schools) = &schools { (education(schools)) }
                    @if let Some(entries) = &volunteer { (volunteering(entries)) }
                    @if let Some(categories) = &skills { (skill_list(categories)) }
                    (contact(basics))
                }
                (footer(basics, year))
            }
        }
    }
}

fn lead(basics: &Basics) -> Markup {
    html! {
        div #lead {
            h1 { (basics.name) }
            h2 { (basics.label) }
            a.btn-rounded-white href=(RESUME_PDF_HREF) { "View Resume" }
        }
    }
}

fn about(basics: &Basics) -> Markup {
    html! {
        div #about {
            h2.heading { "About Me" }
            @for paragraph in basics.summary_paragraphs() {
                p { (paragraph) }
            }
        }
    }
}

fn experience(jobs: &[&Job]) -> Markup {
    html! {
        div #experience {
            h2.heading { "Experience" }
            @for job in jobs {
                div.vtimeline-point {
                    div.vtimeline-date {
                        (format_long(&job.start_date)) " - " (format_long(&job.end_date))
                    }
                    div.vtimeline-content {
                        h3 { (job.company) }
                        h4 { (job.position) }
                        @if !job.summary.is_empty() {
                            p { (job.summary) }
                        }
                        @if !job.highlights.is_empty() {
                            ul {
                                @for highlight in &job.highlights {
                                    li { (highlight) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn project_list(projects: &[&Project]) -> Markup {
    html! {
        div #projects {
            h2.heading { "Projects" }
            @for project in projects {
                div.project.no-image[project.image.is_none()] id=(project.key()) {
                    div.project-image {
                        @if let Some(image) = &project.image {
                            img src={ "/images/" (image) } alt=(project.name);
                        }
                    }
                    div.project-info {
                        h3 { (project.name) }
                        p { (project.description) }
                        @if let Some(links) = &project.links {
                            div.project-links {
                                @for (label, url) in links.labelled() {
                                    a href=(url) target="_blank" rel="noopener noreferrer" { (label) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn education(schools: &[&School]) -> Markup {
    html! {
        div #education {
            h2.heading { "Education" }
            @for school in schools {
                div.education-block {
                    h3 { (school.institution) }
                    span.education-date { (school_span_site(school)) }
                    h4 { (school.study_type) " in " (school.area) }
                    @if !school.description.is_empty() {
                        p { (school.description) }
                    }
                }
            }
        }
    }
}

fn volunteering(entries: &[&VolunteerEntry]) -> Markup {
    html! {
        div #volunteer {
            h2.heading { "Volunteer and Community Service" }
            @for entry in entries {
                div.optional-section-block {
                    h3 { (entry.organization) }
                    @if !entry.position.is_empty() {
                        h4 { (entry.position) }
                    }
                    @if !entry.summary.is_empty() {
                        p { (entry.summary) }
                    }
                }
            }
        }
    }
}

/// Every keyword across categories, first occurrence wins.
pub fn unique_keywords<'a>(categories: &[&'a SkillCategory]) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for keyword in categories.iter().copied().flat_map(|c| c.keywords.iter()) {
        if !seen.contains(&keyword.as_str()) {
            seen.push(keyword);
        }
    }
    seen
}

fn skill_list(categories: &[&SkillCategory]) -> Markup {
    html! {
        div #skills {
            h2.heading { "Skills" }
            ul {
                @for keyword in unique_keywords(categories) {
                    li { (keyword) }
                }
            }
        }
    }
}

fn contact(basics: &Basics) -> Markup {
    html! {
        div #contact {
            h2 { "Get in Touch" }
            @if !basics.email.is_empty() {
                a href={ "mailto:" (basics.email) } { (basics.email) }
            }
            @if !basics.profiles.is_empty() {
                ul.profiles {
                    @for profile in &basics.profiles {
                        li {
                            a href=(profile.url) target="_blank" rel="noopener noreferrer" {
                                (profile.network)
                            }
                        }
                    }
                }
            }
        }
    }
}

fn footer(basics: &Basics, year: i32) -> Markup {
    let github = basics.profile("GitHub");
    let linkedin = basics.profile("LinkedIn");
    html! {
        footer {
            p.copyright { "Copyright © " (year) " " (basics.name) }
            ul.social {
                @if let Some(p) = github {
                    li { a href=(p.url) target="_blank" rel="noopener noreferrer" { "GitHub" } }
                }
                @if let Some(p) = linkedin {
                    li { a href=(p.url) target="_blank" rel="noopener noreferrer" { "LinkedIn" } }
                }
            }
        }
    }
}
