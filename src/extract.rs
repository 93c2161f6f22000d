//! Turning PDF bytes into the plain text the strategies read.

use crate::error::ExtractError;

pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)?;
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}
