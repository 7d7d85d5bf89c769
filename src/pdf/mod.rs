pub mod document;
pub mod page_labels;

pub use document::PdfDocument;

/// Decode a PDF text string (UTF-16BE with BOM, otherwise PDFDocEncoding).
pub(crate) fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let u16_chars: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|chunk| {
                if chunk.len() == 2 {
                    Some(u16::from_be_bytes([chunk[0], chunk[1]]))
                } else {
                    None
                }
            })
            .collect();
        String::from_utf16_lossy(&u16_chars)
    } else {
        // Latin-1 is close enough to PDFDocEncoding for labels and metadata
        bytes.iter().map(|&b| b as char).collect()
    }
}
