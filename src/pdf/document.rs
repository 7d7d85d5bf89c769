use super::decode_pdf_string;
use anyhow::{Context, Result};
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
    pub path: String,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let doc =
            Document::load(&path).with_context(|| format!("Failed to open PDF: {}", path_str))?;
        Ok(PdfDocument {
            doc,
            path: path_str,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = get_string_from_dict(dict, b"Title");
                info.author = get_string_from_dict(dict, b"Author");
                info.creator = get_string_from_dict(dict, b"Creator");
                info.producer = get_string_from_dict(dict, b"Producer");
                info.creation_date = get_string_from_dict(dict, b"CreationDate");
                info.mod_date = get_string_from_dict(dict, b"ModDate");
                info.subject = get_string_from_dict(dict, b"Subject");
                info.keywords = get_string_from_dict(dict, b"Keywords");
            }
        }

        info.page_count = self.page_count();
        info
    }

    /// Copy the inclusive page span `start..=end` (1-based) into a new document.
    ///
    /// The source is left untouched; objects only reachable from dropped
    /// pages are pruned from the copy.
    pub fn extract_range(&self, start: u32, end: u32) -> Result<Document> {
        let total = self.page_count();
        if start == 0 || start > end || end > total {
            anyhow::bail!("Page range {}-{} is out of range (1-{})", start, end, total);
        }

        let mut new_doc = self.doc.clone();
        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .into_iter()
            .map(|(num, _)| num)
            .filter(|num| *num < start || *num > end)
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        doc.save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    })
}
