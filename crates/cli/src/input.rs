//! Reading input texts for the `label` command.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};

use crate::cli::InputArgs;

pub fn read_texts(args: &InputArgs) -> Result<Vec<String>> {
    if !args.text.is_empty() {
        return Ok(args.text.clone());
    }

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file '{}'", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    parse_texts(&raw, args.json)
}

/// Split raw input into texts: a JSON array of strings, or one text per line.
pub fn parse_texts(raw: &str, json: bool) -> Result<Vec<String>> {
    if json {
        serde_json::from_str(raw).context("input must be a JSON array of strings")
    } else {
        Ok(raw.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_input() {
        let texts = parse_texts("hello\r\nurgent now\n\nlast", false).unwrap();
        assert_eq!(texts, vec!["hello", "urgent now", "", "last"]);
    }

    #[test]
    fn json_input_keeps_newlines() {
        let texts = parse_texts(r#"["a\nb", "c"]"#, true).unwrap();
        assert_eq!(texts, vec!["a\nb", "c"]);
        assert!(parse_texts(r#"{"a": 1}"#, true).is_err());
    }

    #[test]
    fn explicit_texts_win() {
        let args = InputArgs {
            text: vec!["one".to_string(), "two".to_string()],
            input: None,
            json: false,
        };
        assert_eq!(read_texts(&args).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn texts_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("texts.txt");
        fs::write(&path, "a\nb\n").unwrap();
        let args = InputArgs {
            text: Vec::new(),
            input: Some(path),
            json: false,
        };
        assert_eq!(read_texts(&args).unwrap(), vec!["a", "b"]);
    }
}
