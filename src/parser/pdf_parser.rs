//! PDF document parser.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::detect::detect_header_from_bytes;
use crate::error::{Error, Result};
use crate::model::{DecodedPage, TextUnit};

use super::backend::{LopdfBackend, PdfBackend};
use super::content::ContentInterpreter;
use super::extractor::TextUnitExtractor;
use super::options::ParseOptions;

/// PDF document parser.
///
/// Decodes pages on demand; nothing is cached between calls, so one parser
/// can serve pages to several threads.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    version: String,
    options: ParseOptions,
    source: Option<Vec<u8>>,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let parser = Self::from_vec(std::fs::read(path)?, options)?;
        log::debug!("opened {} (PDF {})", path.display(), parser.version);
        Ok(parser)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Self::from_vec(data.to_vec(), options)
    }

    /// Validate the header, load the document and keep the bytes for rendering.
    fn from_vec(data: Vec<u8>, options: ParseOptions) -> Result<Self> {
        let header = detect_header_from_bytes(&data)?;
        let backend = LopdfBackend::load_bytes(&data)?;
        Ok(Self::with_backend(backend, header.version, options).with_source(data))
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_vec(data, options)
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Wrap an already loaded backend.
    pub fn with_backend(backend: B, version: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            backend,
            version: version.into(),
            options,
            source: None,
        }
    }

    /// Attach the raw document bytes, used by rasterizers that render the
    /// page content itself.
    pub fn with_source(mut self, data: Vec<u8>) -> Self {
        self.source = Some(data);
        self
    }

    /// The raw document bytes, if known.
    pub fn source(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// All page numbers in ascending order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.backend.pages().keys().copied().collect()
    }

    /// Get the PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Decode one page (1-indexed) into its text runs.
    pub fn decode_page(&self, page_num: u32) -> Result<DecodedPage> {
        let pages = self.backend.pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let [llx, lly, urx, ury] = self.backend.media_box(page_id)?;
        let mut page = DecodedPage::new(page_num, (urx - llx).abs(), (ury - lly).abs());

        let fonts: HashMap<Vec<u8>, _> = self
            .backend
            .page_fonts(page_id)?
            .into_iter()
            .map(|font| (font.name.clone(), font))
            .collect();

        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(page);
        }
        let ops = self
            .backend
            .decode_content(&content)
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page_num, e)))?;

        let interpreter = ContentInterpreter::new(&fonts, &self.options.font_names, [llx, lly, urx, ury]);
        page.runs = interpreter.run(&ops, |font, bytes| {
            self.backend.decode_text(page_id, font, bytes)
        });

        log::trace!("page {}: {} runs", page_num, page.runs.len());
        Ok(page)
    }

    /// Decode one page and extract its comparable text units.
    pub fn extract_units(&self, page_num: u32) -> Result<Vec<TextUnit>> {
        let page = self.decode_page(page_num)?;
        Ok(self.extractor().extract(&page))
    }

    /// The unit extractor configured by the parse options.
    pub fn extractor(&self) -> TextUnitExtractor {
        TextUnitExtractor::new().with_coalesce(self.options.coalesce_runs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::parser::backend::{decode_text_simple, BackendFontInfo, ContentOp, PageId, PdfValue};
    use crate::parser::fonts::FontMetrics;

    /// In-memory backend with one op list per page.
    struct MockBackend {
        pages: Vec<Vec<ContentOp>>,
        broken_page: Option<u32>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            (1..=self.pages.len() as u32).map(|n| (n, (n, 0))).collect()
        }

        fn media_box(&self, _page: PageId) -> Result<[f32; 4]> {
            Ok([0.0, 0.0, 200.0, 100.0])
        }

        fn page_fonts(&self, _page: PageId) -> Result<Vec<BackendFontInfo>> {
            Ok(vec![BackendFontInfo {
                name: b"F1".to_vec(),
                base_font: "XYZABC+Courier".to_string(),
                metrics: FontMetrics::simple(0, Vec::new(), Some(600.0)),
            }])
        }

        fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
            if self.broken_page == Some(page.0) {
                return Err(Error::PdfParse("damaged stream".to_string()));
            }
            // The "stream" is just the page number
            Ok(vec![page.0 as u8])
        }

        fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
            Ok(self.pages[data[0] as usize - 1].clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn show(text: &str, x: i64, y: i64) -> Vec<ContentOp> {
        vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new("Tf", vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(10)]),
            ContentOp::new("Td", vec![PdfValue::Integer(x), PdfValue::Integer(y)]),
            ContentOp::new("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())]),
            ContentOp::new("ET", vec![]),
        ]
    }

    fn parser(pages: Vec<Vec<ContentOp>>, broken_page: Option<u32>) -> PdfParser<MockBackend> {
        PdfParser::with_backend(
            MockBackend { pages, broken_page },
            "1.7",
            ParseOptions::default(),
        )
    }

    #[test]
    fn test_page_numbers() {
        let parser = parser(vec![show("a", 0, 0), show("b", 0, 0)], None);
        assert_eq!(parser.page_count(), 2);
        assert_eq!(parser.page_numbers(), vec![1, 2]);
        assert_eq!(parser.version(), "1.7");
    }

    #[test]
    fn test_decode_page() {
        let parser = parser(vec![show("Hello", 20, 50)], None);
        let page = parser.decode_page(1).unwrap();
        assert_eq!(page.dimensions(), (200.0, 100.0));
        assert_eq!(page.runs.len(), 1);
        assert_eq!(page.runs[0].font_name, "Courier");
        assert_eq!(page.runs[0].bbox.x0, 20.0);
        // 5 glyphs at 600/1000 em, 10pt
        assert_eq!(page.runs[0].bbox.x1, 50.0);
    }

    #[test]
    fn test_extract_units() {
        let mut ops = show("Hello", 20, 50);
        ops.extend(show("  ", 20, 20));
        let parser = parser(vec![ops], None);
        let units = parser.extract_units(1).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].text, "Hello");
    }

    #[test]
    fn test_missing_page() {
        let parser = parser(vec![show("a", 0, 0)], None);
        assert!(matches!(
            parser.decode_page(3),
            Err(Error::PageOutOfRange(3, 1))
        ));
    }

    #[test]
    fn test_broken_page_fails_alone() {
        let parser = parser(vec![show("a", 0, 0), show("b", 0, 0)], Some(1));
        assert!(parser.decode_page(1).is_err());
        assert_eq!(parser.extract_units(2).unwrap()[0].text, "b");
    }

    #[test]
    fn test_source_bytes() {
        let parser = parser(vec![show("a", 0, 0)], None);
        assert!(parser.source().is_none());

        let parser = parser.with_source(b"%PDF-1.7".to_vec());
        assert_eq!(parser.source(), Some(&b"%PDF-1.7"[..]));
    }

    #[test]
    fn test_from_bytes_rejects_non_pdf() {
        let result = PdfParser::from_bytes(b"this is not a pdf at all");
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
