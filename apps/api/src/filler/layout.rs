//! The fixed shape of the CV template, declared once.
//!
//! The template is a 3×3 table:
//!
//! ```text
//!          col 0        col 1        col 2
//! row 0    -            HEADER       -
//! row 1    SUMMARY      SUMMARY      EDUCATION / INDUSTRY
//! row 2    EXPERIENCE   EXPERIENCE   SKILLS
//! ```
//!
//! SUMMARY and EXPERIENCE span two underlying cells; both receive identical content
//! so the merged rendering is the same whichever cell Word chooses to display.

use crate::document::{CellRef, Rgb};
use crate::filler::skills::{SkillRule, SKILL_RULES};

/// Section label colour.
pub const LABEL_COLOR: Rgb = Rgb(192, 0, 0);

/// Title shown when `personal_info.additional.position` is absent.
pub const FALLBACK_POSITION: &str = "Integration Developer";

/// The SKILLS cell has room for three soft skills; the rest are dropped.
pub const SOFT_SKILL_LIMIT: usize = 3;

/// Cell coordinates and template-specific constants consumed by the section writers.
#[derive(Debug, Clone)]
pub struct TemplateLayout {
    /// Index of the table to fill among the document's top-level tables.
    pub table_index: usize,
    pub header: CellRef,
    pub summary: Vec<CellRef>,
    pub education_and_industry: CellRef,
    pub skills: CellRef,
    pub experience: Vec<CellRef>,
    pub fallback_position: String,
    pub soft_skill_limit: usize,
    pub skill_rules: &'static [SkillRule],
}

impl TemplateLayout {
    /// Every cell any writer touches, in writer order.
    pub fn cells(&self) -> Vec<CellRef> {
        let mut cells = vec![self.header];
        cells.extend(self.summary.iter().copied());
        cells.push(self.education_and_industry);
        cells.push(self.skills);
        cells.extend(self.experience.iter().copied());
        cells
    }
}

/// The layout of the shipped CV template.
pub fn default_template_layout() -> TemplateLayout {
    TemplateLayout {
        table_index: 0,
        header: CellRef::new(0, 1),
        summary: vec![CellRef::new(1, 0), CellRef::new(1, 1)],
        education_and_industry: CellRef::new(1, 2),
        skills: CellRef::new(2, 2),
        experience: vec![CellRef::new(2, 0), CellRef::new(2, 1)],
        fallback_position: FALLBACK_POSITION.to_string(),
        soft_skill_limit: SOFT_SKILL_LIMIT,
        skill_rules: SKILL_RULES,
    }
}
