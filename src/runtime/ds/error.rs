use thiserror::Error;

/// Every failure the runtime reports.
///
/// All variants are raised synchronously at the offending call and are never
/// retried or swallowed internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtoError {
    /// Structurally invalid input at blueprint construction or composition time.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Super dispatch found no ancestor that directly defines the method.
    #[error("Method {0} is not defined.")]
    MethodNotFoundError(String),
    /// `mixIn` called on an instance whose blueprint disallows mixins.
    #[error("Mixins are not allowed for this prototype.")]
    MixinsDisabledError,
    /// Misuse of the object substrate (non-object receiver, non-callable call).
    #[error("Type error: {0}")]
    TypeError(String),
}

impl ProtoError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ProtoError::ConfigurationError(message.into())
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        ProtoError::TypeError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found_names_the_method() {
        let err = ProtoError::MethodNotFoundError("missingMethod".to_string());
        assert_eq!(err.to_string(), "Method missingMethod is not defined.");
    }

    #[test]
    fn test_configuration_message() {
        let err = ProtoError::configuration("Given superProto is not an object.");
        assert_eq!(
            err.to_string(),
            "Configuration error: Given superProto is not an object."
        );
    }
}
