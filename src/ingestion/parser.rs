//! PDF text extraction

use crate::error::{Error, Result};

/// Thin wrapper over the external PDF text extractor
pub struct PdfParser;

impl PdfParser {
    /// Extract text from in-memory PDF bytes
    pub fn extract(data: &[u8]) -> Result<String> {
        let content = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::PdfParse(format!("{}", e)))?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(Error::PdfParse(
                "No text content could be extracted from PDF".to_string(),
            ));
        }

        Ok(content)
    }
}
