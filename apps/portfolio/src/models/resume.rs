use std::path::Path;

use serde::Deserialize;

use crate::errors::AppError;
use crate::visibility::{Hideable, Visibility};

/// The canonical resume document, as stored in `resume.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub metadata: Option<SiteMetadata>,
    #[serde(default)]
    pub basics: Basics,
    #[serde(default)]
    pub work: WorkSection,
    #[serde(default)]
    pub education: EducationSection,
    #[serde(default)]
    pub volunteer: VolunteerSection,
    #[serde(default)]
    pub skills: SkillsSection,
    #[serde(default)]
    pub projects: ProjectsSection,
}

impl ResumeDocument {
    /// Reads and parses the canonical file. Called fresh for every operation.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    pub locale: Option<String>,
}

/// Metadata with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    pub locale: String,
}

const DEFAULT_TITLE: &str = "Portfolio";
const DEFAULT_DESCRIPTION: &str = "Software Engineer Portfolio";
const DEFAULT_LOCALE: &str = "en_US";

impl SiteMetadata {
    pub fn resolve(metadata: Option<&SiteMetadata>) -> ResolvedMetadata {
        let non_empty = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();
        match metadata {
            Some(m) => ResolvedMetadata {
                title: non_empty(&m.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
                description: non_empty(&m.description)
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                keywords: m.keywords.clone(),
                site_url: non_empty(&m.site_url),
                site_name: non_empty(&m.site_name),
                locale: non_empty(&m.locale).unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            },
            None => ResolvedMetadata {
                title: DEFAULT_TITLE.to_string(),
                description: DEFAULT_DESCRIPTION.to_string(),
                keywords: Vec::new(),
                site_url: None,
                site_name: None,
                locale: DEFAULT_LOCALE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Basics {
    /// Summary split on blank lines, trimmed, with empty paragraphs dropped.
    pub fn summary_paragraphs(&self) -> Vec<&str> {
        self.summary
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    pub fn profile(&self, network: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.network.eq_ignore_ascii_case(network))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSection {
    #[serde(default)]
    pub hidden: Visibility,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    pub website: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub hidden: Visibility,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationSection {
    #[serde(default)]
    pub hidden: Visibility,
    #[serde(default)]
    pub schools: Vec<School>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub study_type: String,
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hidden: Visibility,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerSection {
    #[serde(default)]
    pub hidden: Visibility,
    #[serde(default)]
    pub volunteer: Vec<VolunteerEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerEntry {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub hidden: Visibility,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillsSection {
    #[serde(default)]
    pub hidden: Visibility,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsSection {
    #[serde(default)]
    pub hidden: Visibility,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    pub url: Option<String>,
    /// Image filename under `/images/`.
    pub image: Option<String>,
    pub links: Option<ProjectLinks>,
    #[serde(default)]
    pub hidden: Visibility,
}

impl Project {
    /// Stable key derived from the name: lowercased, whitespace runs collapsed to `-`.
    pub fn key(&self) -> String {
        project_key(&self.name)
    }
}

pub fn project_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                key.push('-');
            }
            in_whitespace = true;
        } else {
            key.push(c);
            in_whitespace = false;
        }
    }
    key
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLinks {
    pub website: Option<String>,
    pub github: Option<String>,
    pub codepen: Option<String>,
    pub android: Option<String>,
    pub ios: Option<String>,
}

impl ProjectLinks {
    /// Populated link slots in display order, with their labels.
    pub fn labelled(&self) -> Vec<(&'static str, &str)> {
        [
            ("View Project", &self.website),
            ("View on GitHub", &self.github),
            ("View on CodePen", &self.codepen),
            ("Get it on Android", &self.android),
            ("Get it on iOS", &self.ios),
        ]
        .into_iter()
        .filter_map(|(label, url)| {
            url.as_deref()
                .filter(|u| !u.trim().is_empty())
                .map(|u| (label, u))
        })
        .collect()
    }
}

impl Hideable for Job {
    fn visibility(&self) -> Visibility {
        self.hidden
    }
}

impl Hideable for School {
    fn visibility(&self) -> Visibility {
        self.hidden
    }
}

impl Hideable for VolunteerEntry {
    fn visibility(&self) -> Visibility {
        self.hidden
    }
}

impl Hideable for Project {
    fn visibility(&self) -> Visibility {
        self.hidden
    }
}

/// Skill categories carry no marker of their own.
impl Hideable for SkillCategory {
    fn visibility(&self) -> Visibility {
        Visibility::Visible
    }
}

#[cfg(test)]
pub(crate) fn fixture_document() -> ResumeDocument {
    serde_json::from_str(include_str!("../../fixtures/resume.json"))
        .expect("fixture resume.json must parse")
}
