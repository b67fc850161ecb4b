/// Constants used throughout the docintel pipeline
/// Tunable thresholds live in `config`; these are fixed vocabularies

/// Tokens that show up when a PDF/DOCX container is dumped as text instead of
/// its content. Matched case-insensitively as substrings, so no entry may
/// contain another (e.g. "startxref" is covered by "xref").
pub const STRUCTURE_MARKERS: &[&str] = &[
    "endobj",
    "endstream",
    "xref",
    "trailer",
    "/flatedecode",
    "/filter",
    "/length",
    "/type /page",
    "/font",
    "/xobject",
    "/mediabox",
    "/procset",
    "obj <<",
    "%pdf-",
    "%%eof",
    "[content_types].xml",
    "word/document.xml",
];

/// Document type rules, checked in order; first match wins.
/// Keywords match on whole words, so "nda" does not hit "calendar".
pub const DOCUMENT_TYPE_RULES: &[(&[&str], &str)] = &[
    (&["non-disclosure", "nondisclosure", "nda", "confidential", "confidentiality"], "NDA"),
    (&["lease", "rental", "tenant", "landlord"], "Lease Agreement"),
    (&["letter of intent", "loi"], "Letter of Intent"),
    (&["term sheet"], "Term Sheet"),
    (&["employment", "employee", "offer letter"], "Employment Agreement"),
    (&["purchase agreement", "asset purchase", "stock purchase"], "Purchase Agreement"),
    (&["services agreement", "service agreement", "statement of work"], "Service Agreement"),
    (&["partnership", "operating agreement"], "Partnership Agreement"),
    (&["loan", "promissory note"], "Loan Agreement"),
    (&["license", "licensing"], "License Agreement"),
    (&["agreement", "contract"], "Agreement"),
];

/// How much of the text is scanned for document type keywords
pub const DOCUMENT_TYPE_SCAN_CHARS: usize = 2000;

/// Used when no rule matches
pub const DEFAULT_DOCUMENT_TYPE: &str = "Legal Document";

/// Appended to the prompt text when the document was cut
pub const TRUNCATION_MARKER: &str = "\n\n[Document truncated for analysis]";

/// Returned with every analysis result
pub const ANALYSIS_DISCLAIMER: &str = "AI-generated analysis for informational purposes only. \
It is not legal advice and may be incomplete or inaccurate; review the source document \
and consult qualified counsel before relying on it.";

/// Mime types grouped by the extractor that handles them
pub const PLAIN_TEXT_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/csv",
    "text/x-markdown",
];

pub const RTF_MIME_TYPES: &[&str] = &["application/rtf", "text/rtf", "application/x-rtf"];

pub const DOCX_MIME_TYPES: &[&str] =
    &["application/vnd.openxmlformats-officedocument.wordprocessingml.document"];

pub const PDF_MIME_TYPES: &[&str] = &["application/pdf", "application/x-pdf"];
