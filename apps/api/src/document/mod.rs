// Document layer: formatted-text model plus the table surface the filler writes into.
// The filler only ever talks to the traits below; `DocxTemplate` backs them with docx-rs.

pub mod docx;

use thiserror::Error;

pub use docx::DocxTemplate;

// ────────────────────────────────────────────────────────────────────────────
// Formatted text
// ────────────────────────────────────────────────────────────────────────────

/// 24-bit text colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Upper-case hex form used by WordprocessingML (`C00000`).
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// A span of text carrying its own formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub size_pt: u8,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<Rgb>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, size_pt: u8) -> Self {
        Self {
            text: text.into(),
            size_pt,
            bold: false,
            italic: false,
            color: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// One paragraph of runs. An empty run list is a blank spacer line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledParagraph {
    pub runs: Vec<TextRun>,
}

impl StyledParagraph {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn of(run: TextRun) -> Self {
        Self { runs: vec![run] }
    }

    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Table surface
// ────────────────────────────────────────────────────────────────────────────

/// Grid coordinate of a template cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Cannot read DOCX template: {0}")]
    Unreadable(String),

    #[error("Cannot write DOCX document: {0}")]
    Unwritable(String),

    #[error("Template table has no cell at row {row}, column {column}")]
    MissingCell { row: usize, column: usize },
}

/// Write access to the cells of one table.
pub trait TemplateTable {
    fn has_cell(&self, at: CellRef) -> bool;

    /// Removes all content, leaving a single empty paragraph behind.
    fn clear_cell(&mut self, at: CellRef) -> Result<(), DocumentError>;

    fn append_paragraph(
        &mut self,
        at: CellRef,
        paragraph: &StyledParagraph,
    ) -> Result<(), DocumentError>;

    /// Clears the cell then appends `paragraphs` in order.
    fn write_cell(
        &mut self,
        at: CellRef,
        paragraphs: &[StyledParagraph],
    ) -> Result<(), DocumentError> {
        self.clear_cell(at)?;
        for paragraph in paragraphs {
            self.append_paragraph(at, paragraph)?;
        }
        Ok(())
    }
}

/// An opened, writable document holding zero or more tables.
pub trait TemplateDocument {
    type Table: TemplateTable;

    fn table_count(&self) -> usize;

    fn table_mut(&mut self, index: usize) -> Option<&mut Self::Table>;
}
