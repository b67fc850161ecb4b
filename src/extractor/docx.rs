use crate::error::ExtractionError;
use crate::extractor::{isolate, DocumentFormat, TextExtractor};
use crate::models::ExtractionMethod;
use docx_rs::{
    DocumentChild, ParagraphChild, RunChild, Table, TableCellContent, TableChild, TableRowChild,
};

/// DOCX extractor returning body paragraph text, one paragraph per line.
/// Table cells are read row by row, hyperlink text inline with its paragraph.
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    fn read_paragraphs(bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractionError::Malformed {
            format: "docx",
            message: e.to_string(),
        })?;

        let mut paragraphs: Vec<String> = Vec::new();
        for child in docx.document.children.iter() {
            match child {
                DocumentChild::Paragraph(para) => paragraphs.push(paragraph_text(&para.children)),
                DocumentChild::Table(table) => collect_table(table, &mut paragraphs),
                _ => {}
            }
        }

        let text = paragraphs.join("\n");
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty("docx"));
        }
        Ok(text)
    }
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    if let RunChild::Text(t) = rc {
                        text.push_str(&t.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}

// Nested tables are flattened into the same paragraph list
fn collect_table(table: &Table, paragraphs: &mut Vec<String>) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(para) => {
                        paragraphs.push(paragraph_text(&para.children))
                    }
                    TableCellContent::Table(inner) => collect_table(inner, paragraphs),
                    _ => {}
                }
            }
        }
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Docx
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        isolate("docx", || Self::read_paragraphs(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{
        Docx, Hyperlink, HyperlinkType, Paragraph, Run, Table, TableCell, TableRow,
    };

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_extracts_paragraphs() {
        let bytes = build_docx(&["MUTUAL NON-DISCLOSURE AGREEMENT", "The parties agree as follows."]);
        let text = DocxExtractor::new().extract(&bytes).unwrap();
        assert!(text.contains("MUTUAL NON-DISCLOSURE AGREEMENT"));
        assert!(text.contains("The parties agree as follows."));
    }

    fn pack(docx: Docx) -> Vec<u8> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).unwrap();
        buffer.into_inner()
    }

    fn cell(text: &str) -> TableCell {
        TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
    }

    #[test]
    fn test_extracts_table_cells() {
        let nested = Table::new(vec![TableRow::new(vec![cell("Late fee: 1.5% per month")])]);
        let fees = Table::new(vec![
            TableRow::new(vec![cell("Milestone"), cell("Fee")]),
            TableRow::new(vec![cell("Final delivery"), cell("$75,000").add_table(nested)]),
        ]);
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Fee Schedule")))
            .add_table(fees);

        let text = DocxExtractor::new().extract(&pack(docx)).unwrap();
        assert!(text.starts_with("Fee Schedule"));
        assert!(text.contains("Final delivery"));
        assert!(text.contains("$75,000"));
        assert!(text.contains("Late fee: 1.5% per month"));
    }

    #[test]
    fn test_extracts_hyperlink_text() {
        let link = Hyperlink::new("exhibit_a", HyperlinkType::Anchor)
            .add_run(Run::new().add_text("Exhibit A"));
        let para = Paragraph::new()
            .add_run(Run::new().add_text("Services are described in "))
            .add_hyperlink(link);

        let text = DocxExtractor::new().extract(&pack(Docx::new().add_paragraph(para))).unwrap();
        assert!(text.starts_with("Services are described in"));
        assert!(text.ends_with("Exhibit A"));
    }

    #[test]
    fn test_garbage_is_malformed_not_panic() {
        let result = DocxExtractor::new().extract(b"PK\x03\x04 definitely not a docx");
        assert!(result.is_err());
    }

    #[test]
    fn test_supports_docx_only() {
        let extractor = DocxExtractor::new();
        assert!(extractor.supports(DocumentFormat::Docx));
        assert!(!extractor.supports(DocumentFormat::Rtf));
    }
}
