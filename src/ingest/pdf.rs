use anyhow::{Context, Result};
use lopdf::Document;
use tracing::debug;

/// Extract the embedded text layer of every page, in page order.
///
/// A page whose text layer cannot be parsed yields an empty string rather
/// than failing the document; a document where every page comes back empty
/// is the caller's signal that the OCR path is required.
pub fn extract_page_texts(bytes: &[u8]) -> Result<Vec<String>> {
    let doc = Document::load_mem(bytes).context("failed to parse PDF")?;
    Ok(page_texts(&doc))
}

pub fn extract_page_texts_from_path(path: &std::path::Path) -> Result<Vec<String>> {
    let doc = Document::load(path)
        .with_context(|| format!("failed to parse PDF at {:?}", path))?;
    Ok(page_texts(&doc))
}

fn page_texts(doc: &Document) -> Vec<String> {
    let mut pages = Vec::new();
    for (page_num, _page_id) in doc.get_pages() {
        // Per-page extraction so one broken content stream doesn't take the
        // whole document down with it.
        let text = doc.extract_text(&[page_num]).unwrap_or_default();
        pages.push(text.trim().to_string());
    }
    debug!(
        page_count = pages.len(),
        nonempty = pages.iter().filter(|p| !p.is_empty()).count(),
        "embedded text extracted"
    );
    pages
}

/// Newline-join the non-empty pages of one document. Skipped pages leave no
/// blank-line artifacts.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    use super::*;

    /// Build a minimal digitally-authored PDF with one text page per entry.
    fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
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
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn extracts_one_text_per_page_in_order() {
        let bytes = pdf_with_pages(&["first page", "second page"]);
        let pages = extract_page_texts(&bytes).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("first page"));
        assert!(pages[1].contains("second page"));
    }

    #[test]
    fn join_skips_empty_pages_without_blank_lines() {
        let pages = vec![
            "first page".to_string(),
            String::new(),
            "third page".to_string(),
            String::new(),
        ];
        assert_eq!(join_pages(&pages), "first page\nthird page");
    }

    #[test]
    fn join_of_all_empty_pages_is_empty() {
        let pages = vec![String::new(), String::new()];
        assert_eq!(join_pages(&pages), "");
    }

    #[test]
    fn unparseable_bytes_error_out() {
        assert!(extract_page_texts(b"not a pdf at all").is_err());
    }
}
