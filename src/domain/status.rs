use std::fmt;

/// Case-insensitive on parse, lowercase on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Approved,
    Failed,
    Pending,
}

impl Status {
    /// Anything that isn't a case-insensitive match for "approved"/"failed" is `Pending`.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("approved") {
            Self::Approved
        } else if raw.eq_ignore_ascii_case("failed") {
            Self::Failed
        } else {
            Self::Pending
        }
    }

    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Failed => "failed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_owned()
    }
}
