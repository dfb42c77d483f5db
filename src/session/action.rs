use crate::error::SessionError;

/// The closed set of user actions the router dispatches on. Unrecognized
/// tags are rejected as [`SessionError::UnknownAction`] instead of falling
/// through silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    Lint,
    Refactor,
    Debug,
    Custom(String),
    Edit,
    Retry,
    Discard,
    Cancel,
    Validate,
}

impl EditAction {
    pub fn parse(tag: &str, value: Option<&str>) -> Result<Self, SessionError> {
        match tag {
            "lint" => Ok(Self::Lint),
            "refactor" => Ok(Self::Refactor),
            "debug" => Ok(Self::Debug),
            "custom" => Ok(Self::Custom(value.unwrap_or_default().to_string())),
            "edit" => Ok(Self::Edit),
            "retry" => Ok(Self::Retry),
            "discard" => Ok(Self::Discard),
            "cancel" => Ok(Self::Cancel),
            "validate" => Ok(Self::Validate),
            other => Err(SessionError::UnknownAction(other.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Refactor => "refactor",
            Self::Debug => "debug",
            Self::Custom(_) => "custom",
            Self::Edit => "edit",
            Self::Retry => "retry",
            Self::Discard => "discard",
            Self::Cancel => "cancel",
            Self::Validate => "validate",
        }
    }

    /// True for the actions that build and send a prompt.
    pub fn sends_prompt(&self) -> bool {
        matches!(
            self,
            Self::Lint | Self::Refactor | Self::Debug | Self::Custom(_) | Self::Edit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_known_tags() {
        for tag in [
            "lint", "refactor", "debug", "edit", "retry", "discard", "cancel", "validate",
        ] {
            let action = EditAction::parse(tag, None).unwrap();
            assert_eq!(action.tag(), tag);
        }

        let action = EditAction::parse("custom", Some("add types")).unwrap();
        assert_eq!(action, EditAction::Custom("add types".to_string()));
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        let err = EditAction::parse("explode", None).unwrap_err();
        assert!(matches!(err, SessionError::UnknownAction(tag) if tag == "explode"));
    }
}
