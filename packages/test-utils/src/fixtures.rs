//! Sample documents

use base64::Engine;
use mathpaste_core::MathDocument;

/// Bytes standing in for a rendered drawing
pub const DRAWING_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

/// Math with no drawing
pub fn text_document() -> MathDocument {
    MathDocument::from_math("e^{i\\pi} + 1 = 0\n\n\\sum_{n=1}^\\infty 1/n^2 = \\pi^2/6\n")
}

/// Math plus a drawing, as the page exports it
pub fn drawing_document() -> MathDocument {
    MathDocument {
        math: "\\triangle ABC".to_string(),
        image_string: "m0,0l40,0l20,30z".to_string(),
        image_data_url: Some(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(DRAWING_PNG)
        )),
    }
}
