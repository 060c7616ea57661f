//! TOML test case loader
//!
//! Loads evaluation cases from external TOML files so new quiz profiles can
//! be added without recompiling.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cases::TestCase;
use recommender::Answers;

/// External TOML case format
#[derive(Debug, Deserialize)]
struct TomlCase {
    case: CaseMeta,
    answers: Answers,
}

#[derive(Debug, Deserialize)]
struct CaseMeta {
    name: String,
    expected_program: String,
    #[serde(default)]
    expected_keywords: Vec<String>,
}

/// Load a test case from a TOML file
pub fn load_case(path: &Path) -> Result<TestCase> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read test case file: {}", path.display()))?;

    parse_case(&content)
        .with_context(|| format!("Failed to parse test case file: {}", path.display()))
}

/// Load all test cases from a directory
pub fn load_cases_from_dir(dir: &Path) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read test cases directory: {}", dir.display()))?
    {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };

        if path.extension().map_or(false, |ext| ext == "toml") {
            match load_case(&path) {
                Ok(case) => {
                    tracing::info!("Loaded test case: {} from {}", case.name, path.display());
                    cases.push(case);
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {:#}", path.display(), e);
                }
            }
        }
    }

    // Sort by name for consistent ordering
    cases.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(cases)
}

fn parse_case(content: &str) -> Result<TestCase> {
    let toml_case: TomlCase = toml::from_str(content)?;
    let case = TestCase {
        name: toml_case.case.name,
        answers: toml_case.answers,
        expected_program: toml_case.case.expected_program,
        expected_keywords: toml_case.case.expected_keywords,
    };
    case.validate()?;
    Ok(case)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"
[case]
name = "Profil D - Test"
expected_program = "Kizomba"
expected_keywords = ["corps", "présence"]

[answers]
q1 = "D. Première réponse"
q2 = "D. Deuxième réponse"
"#;

    #[test]
    fn test_parse_simple_case() {
        let case = parse_case(SIMPLE).unwrap();

        assert_eq!(case.name, "Profil D - Test");
        assert_eq!(case.expected_program, "Kizomba");
        assert_eq!(case.expected_keywords, vec!["corps", "présence"]);
        assert_eq!(case.answers.len(), 2);
        assert_eq!(case.answers["q1"], "D. Première réponse");
    }

    #[test]
    fn test_missing_answers_rejected() {
        let toml_str = r#"
[case]
name = "empty"
expected_program = "Kizomba"

[answers]
"#;
        let err = parse_case(toml_str).unwrap_err();
        assert!(err.to_string().contains("has no answers"));
    }

    #[test]
    fn test_missing_expected_program_rejected() {
        let toml_str = r#"
[case]
name = "no program"

[answers]
q1 = "A"
"#;
        assert!(parse_case(toml_str).is_err());
    }

    #[test]
    fn test_load_dir_skips_invalid_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.toml"),
            SIMPLE.replace("Profil D - Test", "Zeta"),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.toml"),
            SIMPLE.replace("Profil D - Test", "Alpha"),
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not = [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let cases = load_cases_from_dir(dir.path()).unwrap();
        let names: Vec<_> = cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_load_dir_skips_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested.toml")).unwrap();
        std::fs::write(dir.path().join("ok.toml"), SIMPLE).unwrap();

        let cases = load_cases_from_dir(dir.path()).unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].name, "Profil D - Test");
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_cases_from_dir(&dir.path().join("nope")).is_err());
    }
}
