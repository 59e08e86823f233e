//! Scripted stand-in for the embedded page

use mathpaste_core::{ContentSource, ExtractError, ExtractResult, MathDocument};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A page that always gives the same answer
pub struct ScriptedContentSource {
    answer: ExtractResult<MathDocument>,
    calls: AtomicUsize,
}

impl ScriptedContentSource {
    /// A loaded page showing `document`
    pub fn returning(document: MathDocument) -> Self {
        Self {
            answer: Ok(document),
            calls: AtomicUsize::new(0),
        }
    }

    /// A page whose export fails with `error`
    pub fn failing(error: ExtractError) -> Self {
        Self {
            answer: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// A page that has not loaded MathPaste yet
    pub fn not_loaded() -> Self {
        Self::failing(ExtractError::NotLoaded)
    }

    /// How many times the document was requested
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentSource for ScriptedContentSource {
    async fn extract_content(&self) -> ExtractResult<MathDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returning_counts_calls() {
        let page = ScriptedContentSource::returning(MathDocument::from_math("a"));
        assert_eq!(page.extract_content().await.unwrap().math, "a");
        assert_eq!(page.extract_content().await.unwrap().math, "a");
        assert_eq!(page.calls(), 2);
    }

    #[tokio::test]
    async fn test_not_loaded() {
        let page = ScriptedContentSource::not_loaded();
        assert_eq!(page.extract_content().await, Err(ExtractError::NotLoaded));
    }
}
