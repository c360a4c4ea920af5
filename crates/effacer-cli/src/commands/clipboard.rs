use anyhow::Result;

/// Put `text` on the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}
