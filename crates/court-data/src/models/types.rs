use std::borrow::Cow;

/// Source identifier - mostly static constants
pub type SourceId = Cow<'static, str>;
