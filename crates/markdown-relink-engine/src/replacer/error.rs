/// A link occurrence or definition that could not be rewritten.
///
/// Always handled per match: logged at debug level and the original text is
/// kept (or the definition is left out of the target map).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokenLink {
    #[error("Could not extract link from '{raw}'")]
    Unextractable { raw: String },
    #[error("No target for link '{raw}'")]
    NoTarget { raw: String },
    #[error("'{target}' not found (in '{raw}')")]
    NotFound { target: String, raw: String },
}

/// A registered pattern failed to compile. This is a setup bug, not a
/// property of any document.
#[derive(Debug, thiserror::Error)]
#[error("Invalid link pattern: {0}")]
pub struct PatternError(#[from] pub regex::Error);
