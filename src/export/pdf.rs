use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, StringFormat, Stream,
};

use super::layout::{DocumentLayout, Font, PageLayout, Shape};
use crate::errors::ExportError;

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Builds an in-memory PDF with one page per layout page.
pub fn build_document(layout: &DocumentLayout) -> Result<Document, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let bytes = content
            .encode()
            .map_err(|err| ExportError::Pdf(err.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let media_box: Vec<Object> = vec![
            0.into(),
            0.into(),
            page.size.width.into(),
            page.size.height.into(),
        ];
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => media_box,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    Ok(doc)
}

/// Serializes `doc` to `path`. The file handle is closed on every exit path.
pub fn write_document(doc: &mut Document, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    writer.flush().map_err(io_error)?;
    Ok(())
}

fn page_operations(page: &PageLayout) -> Vec<Operation> {
    let mut ops = Vec::new();
    for shape in &page.shapes {
        match shape {
            Shape::Fill { rect, color } => {
                ops.push(color_op("rg", color.components()));
                ops.push(rect_op(rect.x, rect.y, rect.width, rect.height));
                ops.push(Operation::new("f", vec![]));
            }
            Shape::Stroke { rect, color, width } => {
                ops.push(color_op("RG", color.components()));
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(rect_op(rect.x, rect.y, rect.width, rect.height));
                ops.push(Operation::new("S", vec![]));
            }
            Shape::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                let font_name = match font {
                    Font::Regular => REGULAR_FONT,
                    Font::Bold => BOLD_FONT,
                };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font_name.to_vec()), (*size).into()],
                ));
                ops.push(color_op("rg", color.components()));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_latin1(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

fn color_op(operator: &str, [r, g, b]: [f32; 3]) -> Operation {
    Operation::new(operator, vec![r.into(), g.into(), b.into()])
}

fn rect_op(x: f32, y: f32, width: f32, height: f32) -> Operation {
    Operation::new("re", vec![x.into(), y.into(), width.into(), height.into()])
}

/// Standard Type1 fonts use a single-byte encoding; characters outside
/// Latin-1 are replaced with `?`.
pub(crate) fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
        .collect()
}
