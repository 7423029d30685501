use thiserror::Error;

/// Field-level faults while decoding a datastore record into an entity.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing property '{0}'")]
    MissingProperty(String),

    #[error("invalid property '{name}': {reason}")]
    InvalidProperty { name: String, reason: String },

    #[error("record kind mismatch: expected '{expected}', got '{actual}'")]
    KindMismatch { expected: String, actual: String },
}

impl RecordError {
    /// Convenience constructor for an invalid-property fault.
    pub fn invalid(name: impl Into<String>, reason: impl ToString) -> Self {
        RecordError::InvalidProperty {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Faults raised by a backing `Datastore` implementation.
#[derive(Debug, Error)]
pub enum DatastoreError {
    #[error("datastore backend error: {0}")]
    Backend(String),

    #[error("datastore unavailable")]
    Unavailable,
}

/// The single persistent-store error kind.
///
/// Load-time occurrences are fatal at process startup (the process must
/// not serve with an unhydrated store); write-time occurrences propagate
/// to the caller that requested the mutation.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Datastore(#[from] DatastoreError),

    #[error("failed to decode {kind} record '{key}': {source}")]
    Decode {
        kind: String,
        key: String,
        #[source]
        source: RecordError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let err = RecordError::MissingProperty("title".to_string());
        assert_eq!(err.to_string(), "missing property 'title'");
    }

    #[test]
    fn test_invalid_property_display() {
        let err = RecordError::invalid("created_at", "not RFC 3339");
        assert!(err.to_string().contains("created_at"));
        assert!(err.to_string().contains("not RFC 3339"));
    }

    #[test]
    fn test_persist_error_wraps_decode() {
        let err = PersistError::Decode {
            kind: "chat-users".to_string(),
            key: "abc".to_string(),
            source: RecordError::MissingProperty("username".to_string()),
        };
        assert!(err.to_string().contains("chat-users"));
        assert!(err.to_string().contains("abc"));
    }
}
