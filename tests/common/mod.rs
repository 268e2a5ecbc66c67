//! Helpers for building small PDF documents in tests.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};

/// A page's content stream plus an optional media box override.
pub struct PageSpec {
    pub content: String,
    pub media_box: Option<[i64; 4]>,
}

impl PageSpec {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            media_box: None,
        }
    }

    pub fn with_media_box(mut self, media_box: [i64; 4]) -> Self {
        self.media_box = Some(media_box);
        self
    }
}

/// Show `text` with font `font` at baseline (x, y) in default user space.
pub fn show(font: &str, size: f32, x: f32, y: f32, text: &str) -> String {
    format!("BT /{} {} Tf {} {} Td ({}) Tj ET\n", font, size, x, y, text)
}

/// [`show`] in a given fill colour.
pub fn show_rgb(font: &str, size: f32, x: f32, y: f32, text: &str, rgb: [f32; 3]) -> String {
    format!(
        "q {} {} {} rg {}Q\n",
        rgb[0],
        rgb[1],
        rgb[2],
        show(font, size, x, y, text)
    )
}

/// Build a Letter-size PDF with one page per content string.
///
/// Fonts: `F1` Helvetica, `F2` Helvetica-Bold, `F3` a subset-tagged
/// Courier with explicit 600-unit widths for codes 32..=126.
pub fn pdf(pages: &[&str]) -> Vec<u8> {
    let specs: Vec<PageSpec> = pages.iter().map(|c| PageSpec::new(*c)).collect();
    pdf_with_specs(&specs)
}

/// Build a PDF from page specs. The page tree carries a Letter media box
/// that pages inherit unless they set their own.
pub fn pdf_with_specs(pages: &[PageSpec]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let widths: Vec<Object> = (32..=126).map(|_| Object::Integer(600)).collect();
    let mono = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "ABCDEF+Courier",
        "FirstChar" => Object::Integer(32),
        "LastChar" => Object::Integer(126),
        "Widths" => widths,
    });

    let resources = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => Object::Reference(regular),
            "F2" => Object::Reference(bold),
            "F3" => Object::Reference(mono),
        },
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for spec in pages {
        let stream = Stream::new(dictionary! {}, spec.content.as_bytes().to_vec());
        let content_id = doc.add_object(stream);
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources),
        };
        if let Some(mb) = spec.media_box {
            page.set("MediaBox", mb.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>());
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Write a PDF into `dir` and return its path.
pub fn write_pdf(dir: &std::path::Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

/// Names of the PNG files in a directory, sorted.
pub fn png_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".png"))
        .collect();
    names.sort();
    names
}
