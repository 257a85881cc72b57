use anyhow::{Context, Result};
use kwsearch_core::Document;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read every document under `input`: a `.json`/`.jsonl` file or a directory of them.
pub fn load_corpus(input: &Path) -> Result<Vec<Document>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(extension(p), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("corpus input {} does not exist", input.display());
    }

    let mut docs = Vec::new();
    for file in files {
        let before = docs.len();
        let read = if extension(&file) == Some("jsonl") {
            read_jsonl(&file, &mut docs)
        } else {
            read_json(&file, &mut docs)
        };
        read.with_context(|| format!("reading corpus file {}", file.display()))?;
        tracing::debug!(file = %file.display(), docs = docs.len() - before, "read corpus file");
    }
    tracing::info!(num_docs = docs.len(), input = %input.display(), "loaded corpus");
    Ok(docs)
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn read_jsonl(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: Document = serde_json::from_str(&line).with_context(|| format!("line {}", lineno + 1))?;
        docs.push(doc);
    }
    Ok(())
}

fn read_json(file: &Path, docs: &mut Vec<Document>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                docs.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(mut obj) => match obj.remove("movies") {
            Some(serde_json::Value::Array(arr)) => {
                for v in arr {
                    docs.push(serde_json::from_value(v)?);
                }
            }
            Some(_) => anyhow::bail!("\"movies\" must be an array"),
            None => docs.push(serde_json::from_value(serde_json::Value::Object(obj))?),
        },
        _ => anyhow::bail!("expected a JSON array or object"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_movies_wrapper() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(
            &path,
            r#"{"movies": [
                {"id": 1, "title": "Brave", "description": "a princess with a bow and arrow"},
                {"id": 2, "title": "Cars"}
            ]}"#,
        )
        .unwrap();
        let docs = load_corpus(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].title, "Brave");
        assert_eq!(docs[1].description, "");
    }

    #[test]
    fn walks_directories_in_name_order() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"id\": 3, \"title\": \"C\", \"description\": \"\"}\n\n").unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"id": 1, "title": "A", "description": "x"}]"#).unwrap();
        fs::write(dir.path().join("nested/c.json"), r#"{"id": 2, "title": "B", "description": "y"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<_> = load_corpus(dir.path()).unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_corpus(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn bad_line_reports_its_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        fs::write(&path, "{\"id\": 1, \"title\": \"A\"}\nnot json\n").unwrap();
        let err = format!("{:#}", load_corpus(&path).unwrap_err());
        assert!(err.contains("line 2"), "{err}");
    }
}
