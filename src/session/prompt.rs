use super::action::EditAction;
use crate::api::logging::emit_empty_buffer;
use crate::error::SessionError;
use crate::types::{ConversationMessage, Role};

/// Map an action to the instruction text sent as the next user message.
///
/// `Ok(None)` means the action was skipped silently (empty buffer for the
/// templated actions); `Err(EmptyBuffer)` is the blocking variant reserved
/// for `edit`. Buffer selection: once any assistant message exists, the
/// continuously-extracted modified buffer is quoted instead of the original.
pub fn build_prompt(
    action: &EditAction,
    original: &str,
    modified: Option<&str>,
    messages: &[ConversationMessage],
) -> Result<Option<String>, SessionError> {
    let has_assistant = messages.iter().any(|m| m.role == Role::Assistant);
    let chosen = if has_assistant {
        modified.unwrap_or_default()
    } else {
        original
    };

    match action {
        EditAction::Lint => Ok(templated(action.tag(), chosen, lint_prompt)),
        EditAction::Refactor => Ok(templated(action.tag(), chosen, refactor_prompt)),
        EditAction::Debug => Ok(templated(action.tag(), chosen, debug_prompt)),
        EditAction::Custom(prompt) => Ok(Some(custom_prompt(prompt, chosen, messages))),
        EditAction::Edit => {
            let buffer = match modified {
                Some(m) if !m.is_empty() => m,
                _ => original,
            };
            if buffer.is_empty() {
                return Err(SessionError::EmptyBuffer { action: "edit" });
            }
            Ok(Some(buffer.to_string()))
        }
        // Retry/discard/cancel/validate never build a prompt.
        _ => Ok(None),
    }
}

fn templated(tag: &str, code: &str, template: fn(&str) -> String) -> Option<String> {
    if code.is_empty() {
        emit_empty_buffer(tag);
        return None;
    }
    Some(template(code))
}

fn custom_prompt(prompt: &str, code: &str, messages: &[ConversationMessage]) -> String {
    let last_reply = messages
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .map(|m| m.content.as_str());

    match last_reply {
        None if !code.is_empty() => format!("Here is my code:\n\n{code}\n\n{prompt}"),
        Some(reply) if !code.is_empty() && !reply.contains(code) => format!(
            "The code has been updated. Here's the new version:\n\n{code}\n\n{prompt}"
        ),
        // The model's own last reply already quotes the buffer verbatim;
        // re-sending it would be redundant.
        _ => prompt.to_string(),
    }
}

pub fn lint_prompt(code: &str) -> String {
    format!(
        "\nI have this piece of code that I want you to lint.\n\n\
Although the script is functional, I'm concerned about its adherence to coding standards, overall code quality, and consistency across different sections.\n\
I haven't yet applied any linting tools or standardized guidelines to the codebase, and I believe this is an essential step before moving further with the project development.\n\
I want you to modify and return to me the full script following these objectives:\n\n\
Code Quality Improvement: Enhance the overall quality of the code by identifying and fixing common coding errors, potential bugs, and performance issues.\n\
Consistency Enforcement: Ensure that the code follows a consistent style, making it easier to read, maintain, and collaborate on with others.\n\
Adherence to Standards: Align the code with established coding standards and best practices to improve its robustness and reliability.\n\
Automated Linting Setup: Integrate an automated linting tool into the development workflow to continuously monitor code quality and standards compliance.\n\
Documentation on Linting Decisions: Provide guidelines or documentation on the chosen linting standards, configurations, and any custom rules or exceptions applied to the project.\n\n\
{code}\n\n\
Please apply the above guidelines on this code and return to me the full modified version.\n"
    )
}

pub fn refactor_prompt(code: &str) -> String {
    format!(
        "\nI have this piece of code that I want to refactor.\n\n\
I've observed that the script's current implementation could be improved in terms of efficiency, organization, and modularity. It's also challenging to adapt and reuse portions of the code for different projects due to its monolithic structure.\n\
I want you to modify and return to me the full script with the following goals in mind:\n\n\
- Improve Efficiency: Make the code more efficient, particularly for processing large datasets.\n\
- Enhance Readability: Revise the code to adhere to the best practices of software development, enhancing its clarity and making it more intuitive for others to understand and maintain.\n\
- Increase Modularity: Transform the script into a set of smaller, reusable components that can be easily imported and utilized in various projects.\n\
- Robust Error Handling: Integrate comprehensive error handling to effectively manage exceptions and provide clear, helpful error messages.\n\
- Comprehensive Documentation: Include detailed comments and documentation to explain the functionality and usage of each component of the script.\n\n\
Here's the code:\n\n\
{code}\n\n\
Please apply the above guidelines on this code and return to me the full modified version.\n"
    )
}

pub fn debug_prompt(code: &str) -> String {
    format!(
        "I'm encountering an issue with the following code snippet, and I suspect it contains bugs or logical errors. Could you please review it and send it back along with corrections or improvements you see fit to fix the issue? Here's the code:\n\n\
{code}\n\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_with_empty_history_frames_original() {
        let action = EditAction::Custom("fix it".to_string());
        let prompt = build_prompt(&action, "x", None, &[]).unwrap().unwrap();
        assert_eq!(prompt, "Here is my code:\n\nx\n\nfix it");
    }

    #[test]
    fn test_custom_after_assistant_reply_containing_buffer_sends_prompt_alone() {
        let action = EditAction::Custom("explain".to_string());
        let messages = vec![
            ConversationMessage::user("lint this"),
            ConversationMessage::assistant("```python\nprint(1)\n```"),
        ];
        let prompt = build_prompt(&action, "orig", Some("print(1)\n"), &messages)
            .unwrap()
            .unwrap();
        assert_eq!(prompt, "explain");
    }

    #[test]
    fn test_custom_detects_updated_buffer_and_requotes() {
        let action = EditAction::Custom("now add docs".to_string());
        let messages = vec![
            ConversationMessage::user("lint this"),
            ConversationMessage::assistant("sure, here: ```python\nprint(1)\n```"),
        ];
        let prompt = build_prompt(&action, "orig", Some("print(2)\n"), &messages)
            .unwrap()
            .unwrap();
        assert!(prompt.starts_with("The code has been updated. Here's the new version:\n\nprint(2)\n"));
        assert!(prompt.ends_with("now add docs"));
    }

    #[test]
    fn test_lint_quotes_original_before_any_assistant_reply() {
        let prompt = build_prompt(&EditAction::Lint, "print(1)\n", None, &[])
            .unwrap()
            .unwrap();
        assert!(prompt.contains("want you to lint"));
        assert!(prompt.contains("print(1)\n"));
    }

    #[test]
    fn test_lint_quotes_modified_once_assistant_replied() {
        let messages = vec![
            ConversationMessage::user("debug this"),
            ConversationMessage::assistant("```python\nfixed()\n```"),
        ];
        let prompt = build_prompt(&EditAction::Lint, "orig()", Some("fixed()\n"), &messages)
            .unwrap()
            .unwrap();
        assert!(prompt.contains("fixed()\n"));
        assert!(!prompt.contains("orig()"));
    }

    #[test]
    fn test_templated_actions_skip_silently_on_empty_buffer() {
        assert!(build_prompt(&EditAction::Lint, "", None, &[])
            .unwrap()
            .is_none());
        assert!(build_prompt(&EditAction::Debug, "", None, &[])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_edit_blocks_on_empty_buffers() {
        let err = build_prompt(&EditAction::Edit, "", None, &[]).unwrap_err();
        assert!(matches!(err, SessionError::EmptyBuffer { action: "edit" }));
    }

    #[test]
    fn test_edit_prefers_modified_buffer() {
        let prompt = build_prompt(&EditAction::Edit, "orig", Some("new"), &[])
            .unwrap()
            .unwrap();
        assert_eq!(prompt, "new");
    }
}
