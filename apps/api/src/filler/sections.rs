//! Section writers, one renderer per template region.
//!
//! Renderers are pure: they turn a slice of the record into paragraphs and never
//! look at the table. `write_section` then clears each target cell and writes the
//! same paragraphs into it, which is how the two-cell SUMMARY and EXPERIENCE
//! regions stay identical.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::document::{CellRef, DocumentError, StyledParagraph, TemplateTable, TextRun};
use crate::filler::dates::parse_sort_date;
use crate::filler::layout::{TemplateLayout, LABEL_COLOR};
use crate::filler::skills::categorize_skills;
use crate::models::cv::{EducationEntry, PersonalInfo, ProjectEntry};

const NAME_PT: u8 = 16;
const POSITION_PT: u8 = 11;
const LABEL_PT: u8 = 10;
const BODY_PT: u8 = 9;
const TECHNOLOGIES_PT: u8 = 8;

/// The five template regions, in fill order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Summary,
    EducationAndIndustry,
    Skills,
    ProfessionalExperience,
}

impl Section {
    pub const ORDER: [Section; 5] = [
        Section::Header,
        Section::Summary,
        Section::EducationAndIndustry,
        Section::Skills,
        Section::ProfessionalExperience,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Summary => "summary",
            Section::EducationAndIndustry => "education_and_industry",
            Section::Skills => "skills",
            Section::ProfessionalExperience => "professional_experience",
        }
    }

    /// Cells this section owns under `layout`.
    pub fn targets(&self, layout: &TemplateLayout) -> Vec<CellRef> {
        match self {
            Section::Header => vec![layout.header],
            Section::Summary => layout.summary.clone(),
            Section::EducationAndIndustry => vec![layout.education_and_industry],
            Section::Skills => vec![layout.skills],
            Section::ProfessionalExperience => layout.experience.clone(),
        }
    }
}

/// Clears every target and writes `paragraphs` into each, independently.
pub fn write_section<T>(
    table: &mut T,
    targets: &[CellRef],
    paragraphs: &[StyledParagraph],
) -> Result<(), DocumentError>
where
    T: TemplateTable + ?Sized,
{
    for &target in targets {
        table.write_cell(target, paragraphs)?;
    }
    Ok(())
}

fn label(text: &str) -> StyledParagraph {
    StyledParagraph::of(TextRun::new(text, LABEL_PT).bold().color(LABEL_COLOR))
}

fn body(text: impl Into<String>) -> StyledParagraph {
    StyledParagraph::of(TextRun::new(text, BODY_PT))
}

// ────────────────────────────────────────────────────────────────────────────
// Renderers
// ────────────────────────────────────────────────────────────────────────────

/// Name in large bold, then the position line.
pub fn render_header(info: &PersonalInfo, layout: &TemplateLayout) -> Vec<StyledParagraph> {
    let position = info
        .position()
        .unwrap_or_else(|| layout.fallback_position.clone());
    vec![
        StyledParagraph::of(TextRun::new(info.name.clone(), NAME_PT).bold()),
        StyledParagraph::of(TextRun::new(position, POSITION_PT)),
    ]
}

pub fn render_summary(summary: &str) -> Vec<StyledParagraph> {
    vec![label("SUMMARY"), body(summary)]
}

/// EDUCATION entries, a two-line gap, then the sorted distinct project industries.
pub fn render_education_and_industry(
    education: &[EducationEntry],
    projects: &[ProjectEntry],
) -> Vec<StyledParagraph> {
    let mut paragraphs = vec![label("EDUCATION")];
    paragraphs.extend(education.iter().map(|edu| {
        body(format!(
            "{} in {} - {}",
            edu.degree, edu.field_of_study, edu.institution
        ))
    }));

    paragraphs.push(StyledParagraph::blank());
    paragraphs.push(StyledParagraph::blank());

    paragraphs.push(label("INDUSTRY KNOWLEDGE"));
    let industries: BTreeSet<String> = projects.iter().filter_map(|p| p.industry()).collect();
    paragraphs.extend(industries.into_iter().map(body));
    paragraphs
}

/// Categorized technical skills, then at most `soft_skill_limit` soft skills.
pub fn render_skills(
    programming_skills: &[String],
    soft_skills: &[String],
    layout: &TemplateLayout,
) -> Vec<StyledParagraph> {
    let mut paragraphs = vec![label("SKILLS")];
    for group in categorize_skills(programming_skills, layout.skill_rules) {
        paragraphs.push(body(format!(
            "{}: {}",
            group.category,
            group.skills.join(", ")
        )));
    }

    if !soft_skills.is_empty() {
        let shown = &soft_skills[..soft_skills.len().min(layout.soft_skill_limit)];
        paragraphs.push(body(format!("Soft Skills: {}", shown.join(", "))));
    }
    paragraphs
}

/// Projects ordered most recent first. Equal start dates keep their input order.
pub fn sort_projects_by_recency(projects: &[ProjectEntry], now: NaiveDateTime) -> Vec<&ProjectEntry> {
    let mut keyed: Vec<(NaiveDateTime, &ProjectEntry)> = projects
        .iter()
        .map(|p| (parse_sort_date(&p.start_date, now), p))
        .collect();
    // `sort_by` is stable.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// "Name (start - end)", or just "Name" when neither date is given.
pub fn project_heading(project: &ProjectEntry) -> String {
    if project.start_date.is_empty() && project.end_date.is_empty() {
        project.name.clone()
    } else {
        format!(
            "{} ({} - {})",
            project.name, project.start_date, project.end_date
        )
    }
}

pub fn render_experience(projects: &[ProjectEntry], now: NaiveDateTime) -> Vec<StyledParagraph> {
    let mut paragraphs = vec![label("PROFESSIONAL EXPERIENCE")];
    for project in sort_projects_by_recency(projects, now) {
        paragraphs.push(StyledParagraph::blank());
        paragraphs.push(StyledParagraph::of(
            TextRun::new(project_heading(project), BODY_PT).bold(),
        ));
        paragraphs.push(body(project.description.clone()));
        if !project.technologies.is_empty() {
            paragraphs.push(StyledParagraph::of(
                TextRun::new(
                    format!("Technologies: {}", project.technologies.join(", ")),
                    TECHNOLOGIES_PT,
                )
                .italic(),
            ));
        }
    }
    paragraphs
}
