use thiserror::Error;

/// Member name reported when the container itself cannot be read
pub const CONTAINER: &str = "<container>";

/// Decode failures. Both are permanent for the archive that produced them.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed archive member `{member}`: {reason}")]
    MalformedArchive { member: String, reason: String },

    #[error("unknown archive shape, members: [{}]", .members.join(", "))]
    UnknownShape { members: Vec<String> },
}

impl DecodeError {
    pub fn malformed(member: impl Into<String>, reason: impl ToString) -> Self {
        DecodeError::MalformedArchive {
            member: member.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize member `{member}`")]
    Serialize {
        member: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write archive container: {reason}")]
    Container { reason: String },
}

impl From<zip::result::ZipError> for EncodeError {
    fn from(err: zip::result::ZipError) -> Self {
        EncodeError::Container {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Container {
            reason: err.to_string(),
        }
    }
}
