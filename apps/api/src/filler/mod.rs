// CV filling: maps a validated CvRecord onto the fixed template table.
// Synchronous and CPU-bound; HTTP callers run it inside tokio::task::spawn_blocking.

pub mod dates;
pub mod handlers;
pub mod layout;
pub mod sections;
pub mod skills;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

use crate::document::{
    DocumentError, DocxTemplate, StyledParagraph, TemplateDocument, TemplateTable,
};
use crate::filler::layout::TemplateLayout;
use crate::filler::sections::{
    render_education_and_industry, render_experience, render_header, render_skills,
    render_summary, write_section, Section,
};
use crate::models::cv::CvRecord;

pub use layout::default_template_layout;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FillError {
    #[error("Template document does not contain any tables")]
    MissingTable,

    #[error("Template table has no cell at row {row}, column {column}")]
    MissingCell { row: usize, column: usize },

    #[error(transparent)]
    Document(DocumentError),
}

impl From<DocumentError> for FillError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MissingCell { row, column } => FillError::MissingCell { row, column },
            other => FillError::Document(other),
        }
    }
}

/// Fills the five template regions from a record.
pub struct CvFiller<'a> {
    layout: &'a TemplateLayout,
}

impl<'a> CvFiller<'a> {
    pub fn new(layout: &'a TemplateLayout) -> Self {
        Self { layout }
    }

    /// Fills `document` in place, using the wall clock as "now" for date sorting.
    pub fn fill<'d, D: TemplateDocument>(
        &self,
        document: &'d mut D,
        record: &CvRecord,
    ) -> Result<&'d mut D, FillError> {
        self.fill_at(document, record, Local::now().naive_local())
    }

    /// Same as [`CvFiller::fill`] with an explicit "now".
    ///
    /// Every precondition is checked before the first write, so on error the
    /// document is untouched.
    pub fn fill_at<'d, D: TemplateDocument>(
        &self,
        document: &'d mut D,
        record: &CvRecord,
        now: NaiveDateTime,
    ) -> Result<&'d mut D, FillError> {
        if document.table_count() == 0 {
            return Err(FillError::MissingTable);
        }
        let table = document
            .table_mut(self.layout.table_index)
            .ok_or(FillError::MissingTable)?;

        if let Some(cell) = self.layout.cells().into_iter().find(|&c| !table.has_cell(c)) {
            return Err(FillError::MissingCell {
                row: cell.row,
                column: cell.column,
            });
        }

        for section in Section::ORDER {
            let paragraphs = self.render(section, record, now);
            let targets = section.targets(self.layout);
            debug!(
                "Writing {} section: {} paragraphs into {} cell(s)",
                section.name(),
                paragraphs.len(),
                targets.len()
            );
            write_section(table, &targets, &paragraphs)?;
        }

        Ok(document)
    }

    fn render(&self, section: Section, record: &CvRecord, now: NaiveDateTime) -> Vec<StyledParagraph> {
        match section {
            Section::Header => render_header(&record.personal_info, self.layout),
            Section::Summary => render_summary(&record.other_info),
            Section::EducationAndIndustry => {
                render_education_and_industry(&record.education, &record.projects)
            }
            Section::Skills => render_skills(
                &record.programming_skills,
                &record.soft_skills,
                self.layout,
            ),
            Section::ProfessionalExperience => render_experience(&record.projects, now),
        }
    }
}

/// Opens a DOCX template, fills it and serializes the result.
///
/// Each call owns its document, so concurrent calls never share state.
pub fn fill_template_bytes(
    template: &[u8],
    record: &CvRecord,
    layout: &TemplateLayout,
) -> Result<Vec<u8>, FillError> {
    let mut document = DocxTemplate::from_bytes(template)?;
    CvFiller::new(layout).fill(&mut document, record)?;
    Ok(document.to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, MemoryTable};
    use crate::models::cv::{EducationEntry, PersonalInfo, ProjectEntry};
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn sample_record() -> CvRecord {
        let mut info = PersonalInfo {
            name: "Jordan Reyes".to_string(),
            ..Default::default()
        };
        info.additional.insert("position".to_string(), json!("Senior Integration Engineer"));

        let mut esb = ProjectEntry {
            name: "ESB Migration".to_string(),
            description: "Moved 40 flows to MuleSoft".to_string(),
            technologies: vec!["MuleSoft".to_string(), "Java".to_string()],
            start_date: "January 2023".to_string(),
            end_date: "current".to_string(),
            ..Default::default()
        };
        esb.additional.insert("industry".to_string(), json!("Banking"));
        let payments = ProjectEntry {
            name: "Payments Hub".to_string(),
            description: "Card settlement integrations".to_string(),
            start_date: "May 2020".to_string(),
            end_date: "December 2022".to_string(),
            ..Default::default()
        };

        CvRecord {
            personal_info: info,
            education: vec![EducationEntry {
                institution: "University of Porto".to_string(),
                degree: "MSc".to_string(),
                field_of_study: "Informatics".to_string(),
                ..Default::default()
            }],
            soft_skills: vec!["Ownership".to_string()],
            programming_skills: vec!["Java".to_string(), "Docker".to_string()],
            projects: vec![payments, esb],
            other_info: "Integration engineer.".to_string(),
            ..Default::default()
        }
    }

    fn grid_document() -> MemoryDocument {
        MemoryDocument {
            tables: vec![MemoryTable::new(3, 3)],
        }
    }

    #[test]
    fn test_no_table_is_missing_table_error() {
        let layout = default_template_layout();
        let mut document = MemoryDocument::default();
        let err = CvFiller::new(&layout)
            .fill_at(&mut document, &sample_record(), now())
            .unwrap_err();
        assert_eq!(err, FillError::MissingTable);
    }

    #[test]
    fn test_too_small_grid_fails_before_any_write() {
        let layout = default_template_layout();
        let mut document = MemoryDocument {
            tables: vec![MemoryTable::new(2, 3)],
        };
        let err = CvFiller::new(&layout)
            .fill_at(&mut document, &sample_record(), now())
            .unwrap_err();
        assert_eq!(err, FillError::MissingCell { row: 2, column: 2 });
        assert!(document.tables[0].cells.is_empty());
    }

    #[test]
    fn test_fill_populates_every_region() {
        let layout = default_template_layout();
        let mut document = grid_document();
        CvFiller::new(&layout)
            .fill_at(&mut document, &sample_record(), now())
            .unwrap();
        let table = &document.tables[0];

        assert_eq!(
            table.lines(0, 1),
            vec!["", "Jordan Reyes", "Senior Integration Engineer"]
        );
        assert_eq!(table.lines(1, 0), vec!["", "SUMMARY", "Integration engineer."]);
        assert_eq!(table.cell(1, 0), table.cell(1, 1));
        assert_eq!(
            table.lines(1, 2),
            vec![
                "",
                "EDUCATION",
                "MSc in Informatics - University of Porto",
                "",
                "",
                "INDUSTRY KNOWLEDGE",
                "Banking",
            ]
        );
        assert_eq!(
            table.lines(2, 2),
            vec![
                "",
                "SKILLS",
                "Programming Language: Java",
                "Cloud & DevOps: Docker",
                "Soft Skills: Ownership",
            ]
        );
        assert_eq!(table.cell(2, 0), table.cell(2, 1));
        assert_eq!(
            table.lines(2, 0),
            vec![
                "",
                "PROFESSIONAL EXPERIENCE",
                "",
                "ESB Migration (January 2023 - current)",
                "Moved 40 flows to MuleSoft",
                "Technologies: MuleSoft, Java",
                "",
                "Payments Hub (May 2020 - December 2022)",
                "Card settlement integrations",
            ]
        );
        // Cells outside the layout are left alone.
        assert!(table.cell(0, 0).is_empty());
        assert!(table.cell(0, 2).is_empty());
    }

    #[test]
    fn test_filling_twice_gives_identical_cells() {
        let layout = default_template_layout();
        let record = sample_record();
        let mut first = grid_document();
        let mut second = grid_document();
        let filler = CvFiller::new(&layout);
        filler.fill_at(&mut first, &record, now()).unwrap();
        filler.fill_at(&mut second, &record, now()).unwrap();
        filler.fill_at(&mut second, &record, now()).unwrap();
        assert_eq!(first.tables[0].cells, second.tables[0].cells);
    }

    fn docx_bytes(docx: docx_rs::Docx) -> Vec<u8> {
        DocxTemplate::from_docx(docx).to_bytes().unwrap()
    }

    fn grid_template_bytes() -> Vec<u8> {
        use docx_rs::{Docx, Table, TableCell, TableRow};
        let rows = (0..3)
            .map(|_| TableRow::new(vec![TableCell::new(), TableCell::new(), TableCell::new()]))
            .collect();
        docx_bytes(Docx::new().add_table(Table::new(rows)))
    }

    #[test]
    fn test_fill_template_bytes_produces_readable_docx() {
        let layout = default_template_layout();
        let filled = fill_template_bytes(&grid_template_bytes(), &sample_record(), &layout).unwrap();
        let reopened = DocxTemplate::from_bytes(&filled).unwrap();
        assert_eq!(reopened.table_count(), 1);
    }

    #[test]
    fn test_fill_template_bytes_without_table() {
        let layout = default_template_layout();
        let template = docx_bytes(docx_rs::Docx::new().add_paragraph(docx_rs::Paragraph::new()));
        let err = fill_template_bytes(&template, &sample_record(), &layout).unwrap_err();
        assert_eq!(err, FillError::MissingTable);
    }

    #[test]
    fn test_fill_template_bytes_rejects_non_docx() {
        let layout = default_template_layout();
        let err = fill_template_bytes(b"%PDF-1.7", &sample_record(), &layout).unwrap_err();
        assert!(matches!(err, FillError::Document(DocumentError::Unreadable(_))));
    }

    /// Text of each paragraph in every `<w:tc>` of `row`, in physical order.
    fn docx_row_lines(template: &mut DocxTemplate, row: usize) -> Vec<Vec<String>> {
        use docx_rs::{ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};
        let table = template.table_mut(0).unwrap();
        let TableChild::TableRow(row) = &table.rows[row];
        row.cells
            .iter()
            .map(|TableRowChild::TableCell(cell)| {
                cell.children
                    .iter()
                    .filter_map(|content| match content {
                        TableCellContent::Paragraph(p) => Some(
                            p.children
                                .iter()
                                .filter_map(|child| match child {
                                    ParagraphChild::Run(run) => Some(run),
                                    _ => None,
                                })
                                .flat_map(|run| run.children.iter())
                                .filter_map(|child| match child {
                                    RunChild::Text(text) => Some(text.text.clone()),
                                    _ => None,
                                })
                                .collect::<String>(),
                        ),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_fill_writes_summary_and_experience_into_spanning_cells() {
        use docx_rs::{Docx, Table, TableCell, TableRow};
        let full = TableRow::new(vec![TableCell::new(), TableCell::new(), TableCell::new()]);
        let merged = || TableRow::new(vec![TableCell::new().grid_span(2), TableCell::new()]);
        let template = docx_bytes(Docx::new().add_table(Table::new(vec![full, merged(), merged()])));

        let layout = default_template_layout();
        let filled = fill_template_bytes(&template, &sample_record(), &layout).unwrap();
        let mut reopened = DocxTemplate::from_bytes(&filled).unwrap();

        let summary_row = docx_row_lines(&mut reopened, 1);
        assert_eq!(summary_row.len(), 2);
        assert_eq!(summary_row[0], vec!["", "SUMMARY", "Integration engineer."]);
        assert_eq!(summary_row[1][1], "EDUCATION");

        let experience_row = docx_row_lines(&mut reopened, 2);
        assert_eq!(experience_row.len(), 2);
        assert_eq!(experience_row[0][1], "PROFESSIONAL EXPERIENCE");
        assert_eq!(
            experience_row[0]
                .iter()
                .filter(|line| line.as_str() == "PROFESSIONAL EXPERIENCE")
                .count(),
            1
        );
        assert_eq!(experience_row[1][1], "SKILLS");
    }

    #[test]
    fn test_document_error_maps_missing_cell() {
        let err: FillError = DocumentError::MissingCell { row: 1, column: 4 }.into();
        assert_eq!(err, FillError::MissingCell { row: 1, column: 4 });
        let err: FillError = DocumentError::Unwritable("disk".to_string()).into();
        assert!(matches!(err, FillError::Document(_)));
    }
}
