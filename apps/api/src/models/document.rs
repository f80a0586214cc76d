use bytes::Bytes;
use serde::Serialize;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

/// Declared format of an uploaded document.
///
/// Resolved once at the upload boundary; every stage below matches on it
/// exhaustively instead of comparing MIME strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
    /// The declared tag, kept for error messages.
    Unsupported(String),
}

impl DocumentFormat {
    /// Maps a declared MIME type. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => DocumentFormat::Pdf,
            DOCX_MIME => DocumentFormat::Docx,
            TEXT_MIME => DocumentFormat::PlainText,
            _ => DocumentFormat::Unsupported(essence),
        }
    }

    pub fn from_file_name(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            "txt" => DocumentFormat::PlainText,
            _ => DocumentFormat::Unsupported(file_name.to_string()),
        }
    }

    /// Declared content type wins; the file extension is only consulted when
    /// the client sent nothing useful (missing or `application/octet-stream`).
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Self {
        let declared = content_type.map(DocumentFormat::from_mime);
        match (declared, file_name) {
            (Some(DocumentFormat::Unsupported(tag)), Some(name))
                if tag.is_empty() || tag == "application/octet-stream" =>
            {
                DocumentFormat::from_file_name(name)
            }
            (Some(format), _) => format,
            (None, Some(name)) => DocumentFormat::from_file_name(name),
            (None, None) => DocumentFormat::Unsupported(String::new()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::PlainText => "plain-text",
            DocumentFormat::Unsupported(tag) => tag,
        }
    }
}

/// An uploaded document. The bytes are shared, never written to.
#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Bytes,
    pub format: DocumentFormat,
    pub file_name: Option<String>,
}

impl Document {
    pub fn new(bytes: impl Into<Bytes>, format: DocumentFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// Plain text pulled out of a document, segments joined with `\n` in source order.
///
/// A segment is a PDF page or a DOCX paragraph. `empty_segments` counts the
/// ones that contributed nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub segments: usize,
    pub empty_segments: usize,
}

impl ExtractedText {
    pub fn from_segments(segments: Vec<String>) -> Self {
        let empty_segments = segments.iter().filter(|s| s.trim().is_empty()).count();
        Self {
            segments: segments.len(),
            empty_segments,
            text: segments.join("\n"),
        }
    }

    /// True when nothing but whitespace came out of the document.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A freshly built `docx`, distinct from the upload it was derived from.
#[derive(Debug, Clone)]
pub struct AugmentedDocument {
    pub bytes: Bytes,
}

impl AugmentedDocument {
    pub const FILE_NAME: &'static str = "Improved_Resume.docx";
    pub const MIME: &'static str = DOCX_MIME;
}
