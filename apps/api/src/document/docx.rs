//! DOCX-backed template document built on `docx-rs`.
//!
//! Cells are addressed by grid column, the way Word lays a row out: a cell with
//! `gridSpan=2` occupies two columns, and a `vMerge` continuation resolves to the
//! cell where the merge starts. Writing to any column of a merged cell writes the
//! same `<w:tc>`.

use std::io::Cursor;

use docx_rs::{
    read_docx, DocumentChild, Docx, Paragraph, Run, Table, TableCell, TableCellContent,
    TableChild, TableRow, TableRowChild,
};
use tracing::debug;

use super::{CellRef, DocumentError, StyledParagraph, TemplateDocument, TemplateTable};

/// An opened template, owned by exactly one fill.
#[derive(Debug)]
pub struct DocxTemplate {
    docx: Docx,
}

impl DocxTemplate {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let docx = read_docx(bytes).map_err(|e| DocumentError::Unreadable(e.to_string()))?;
        let template = Self { docx };
        debug!(
            "Opened DOCX template ({} bytes, {} tables)",
            bytes.len(),
            template.table_count()
        );
        Ok(template)
    }

    pub fn from_docx(docx: Docx) -> Self {
        Self { docx }
    }

    /// Serializes the (possibly mutated) document to a DOCX package.
    pub fn to_bytes(self) -> Result<Vec<u8>, DocumentError> {
        let mut cursor = Cursor::new(Vec::new());
        self.docx
            .build()
            .pack(&mut cursor)
            .map_err(|e| DocumentError::Unwritable(e.to_string()))?;
        Ok(cursor.into_inner())
    }

    fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.docx
            .document
            .children
            .iter_mut()
            .filter_map(|child| match child {
                DocumentChild::Table(table) => {
                    let table: &mut Table = table;
                    Some(table)
                }
                _ => None,
            })
    }
}

impl TemplateDocument for DocxTemplate {
    type Table = Table;

    fn table_count(&self) -> usize {
        self.docx
            .document
            .children
            .iter()
            .filter(|child| matches!(child, DocumentChild::Table(_)))
            .count()
    }

    fn table_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.tables_mut().nth(index)
    }
}

/// Grid placement of one `<w:tc>`: how many grid columns it spans and whether it
/// continues a vertical merge from the row above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellSpan {
    columns: usize,
    continues_above: bool,
}

/// docx-rs keeps `gridSpan`/`vMerge` private; its serde form exposes them.
fn cell_span(cell: &TableCell) -> CellSpan {
    let property = serde_json::to_value(&cell.property).unwrap_or_default();
    let columns = property["gridSpan"]
        .as_u64()
        .and_then(|span| usize::try_from(span).ok())
        .filter(|&span| span > 0)
        .unwrap_or(1);
    CellSpan {
        columns,
        continues_above: property["verticalMerge"] == "continue",
    }
}

/// Index of the `<w:tc>` in `row` whose grid span covers `column`.
fn covering_cell(row: &TableRow, column: usize) -> Option<(usize, CellSpan)> {
    let mut grid_start = 0;
    for (index, TableRowChild::TableCell(cell)) in row.cells.iter().enumerate() {
        let span = cell_span(cell);
        if column < grid_start + span.columns {
            return Some((index, span));
        }
        grid_start += span.columns;
    }
    None
}

/// Resolves a grid coordinate to `(row, tc index)`.
///
/// A cell spanning several grid columns answers for each of them, and a vertical
/// merge continuation answers with the cell that starts the merge.
fn resolve_cell(table: &Table, at: CellRef) -> Option<(usize, usize)> {
    let mut row_index = at.row;
    loop {
        let TableChild::TableRow(row) = table.rows.get(row_index)?;
        let (cell_index, span) = covering_cell(row, at.column)?;
        if !span.continues_above || row_index == 0 {
            return Some((row_index, cell_index));
        }
        row_index -= 1;
    }
}

fn cell_ref_mut(table: &mut Table, at: CellRef) -> Option<&mut TableCell> {
    let (row, column) = resolve_cell(table, at)?;
    let TableChild::TableRow(row) = table.rows.get_mut(row)?;
    let TableRowChild::TableCell(cell) = row.cells.get_mut(column)?;
    Some(cell)
}

fn missing(at: CellRef) -> DocumentError {
    DocumentError::MissingCell {
        row: at.row,
        column: at.column,
    }
}

impl TemplateTable for Table {
    fn has_cell(&self, at: CellRef) -> bool {
        resolve_cell(self, at).is_some()
    }

    fn clear_cell(&mut self, at: CellRef) -> Result<(), DocumentError> {
        let cell = cell_ref_mut(self, at).ok_or_else(|| missing(at))?;
        // A cell must keep at least one paragraph to stay valid WordprocessingML.
        cell.children = vec![TableCellContent::Paragraph(Box::new(Paragraph::new()))];
        Ok(())
    }

    fn append_paragraph(
        &mut self,
        at: CellRef,
        paragraph: &StyledParagraph,
    ) -> Result<(), DocumentError> {
        let cell = cell_ref_mut(self, at).ok_or_else(|| missing(at))?;
        cell.children
            .push(TableCellContent::Paragraph(Box::new(to_docx_paragraph(
                paragraph,
            ))));
        Ok(())
    }
}

/// Converts a styled paragraph into its docx-rs form. Sizes are stored in half-points.
fn to_docx_paragraph(paragraph: &StyledParagraph) -> Paragraph {
    paragraph.runs.iter().fold(Paragraph::new(), |p, styled| {
        let mut run = Run::new()
            .add_text(styled.text.clone())
            .size(usize::from(styled.size_pt) * 2);
        if styled.bold {
            run = run.bold();
        }
        if styled.italic {
            run = run.italic();
        }
        if let Some(color) = styled.color {
            run = run.color(color.hex());
        }
        p.add_run(run)
    })
}
