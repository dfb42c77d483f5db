use crate::error::SessionError;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

/// Where the original snippet comes from. Piped stdin is read fully before
/// the UI starts; an empty scratch buffer starts a from-scratch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetSource {
    File(PathBuf),
    Stdin,
    Scratch,
}

/// Resolve the snippet source from command-line arguments:
/// a path argument wins, `--scratch` forces an empty buffer, and piped
/// stdin is treated as pasted content.
pub fn resolve_source(mut args: impl Iterator<Item = String>) -> SnippetSource {
    match args.next() {
        Some(arg) if arg == "--scratch" => SnippetSource::Scratch,
        Some(path) => SnippetSource::File(PathBuf::from(path)),
        None => {
            if std::io::stdin().is_terminal() {
                SnippetSource::Scratch
            } else {
                SnippetSource::Stdin
            }
        }
    }
}

pub fn read_snippet(source: &SnippetSource) -> Result<String, SessionError> {
    match source {
        SnippetSource::File(path) => {
            std::fs::read_to_string(path).map_err(|error| SessionError::SnippetRead {
                origin: path.display().to_string(),
                reason: error.to_string(),
            })
        }
        SnippetSource::Stdin => {
            let mut buffer = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut buffer)
                .map_err(|error| SessionError::SnippetRead {
                    origin: "stdin".to_string(),
                    reason: error.to_string(),
                })?;
            Ok(buffer)
        }
        SnippetSource::Scratch => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_resolve_source_path_argument() {
        assert_eq!(
            resolve_source(args(&["snippet.py"])),
            SnippetSource::File(PathBuf::from("snippet.py"))
        );
    }

    #[test]
    fn test_resolve_source_scratch_flag() {
        assert_eq!(resolve_source(args(&["--scratch"])), SnippetSource::Scratch);
    }

    #[test]
    fn test_read_snippet_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snippet.py");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "print(1)\n").unwrap();

        let snippet = read_snippet(&SnippetSource::File(path)).unwrap();
        assert_eq!(snippet, "print(1)\n");
    }

    #[test]
    fn test_read_snippet_missing_file_names_the_source() {
        let err = read_snippet(&SnippetSource::File(PathBuf::from("/no/such/file.py")))
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/file.py"));
    }

    #[test]
    fn test_read_snippet_scratch_is_empty() {
        assert_eq!(read_snippet(&SnippetSource::Scratch).unwrap(), "");
    }
}
