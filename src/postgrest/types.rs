//! Types shared by the PostgREST builders

/// Options for returning data after a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOption {
    /// Return representation (the written rows)
    Representation,

    /// Return minimal data
    Minimal,
}

impl ReturnOption {
    /// Value for the `Prefer` header
    pub fn as_prefer(&self) -> &'static str {
        match self {
            ReturnOption::Representation => "return=representation",
            ReturnOption::Minimal => "return=minimal",
        }
    }
}
