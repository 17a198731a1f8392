use storage::models::{FileChange, Hunk};

/// Parse `git show --format= --unified=N` output into per-file hunks.
///
/// Header lines (`+++`, `---`) are skipped; hunks without added or removed
/// lines and files without hunks are dropped.
pub fn parse_unified_diff(diff_output: &str) -> Vec<FileChange> {
    let mut files = Vec::new();
    let mut current: Option<(FileChange, Hunk)> = None;

    for line in diff_output.split('\n') {
        if line.starts_with("diff --git") {
            if let Some(finished) = current.take() {
                flush_file(finished, &mut files);
            }

            let filename = match line.rsplit_once(" b/") {
                Some((_, name)) => name.to_string(),
                None => "unknown".to_string(),
            };
            current = Some((
                FileChange {
                    filename,
                    changes: Vec::new(),
                },
                Hunk::default(),
            ));
        } else if line.starts_with("+++") || line.starts_with("---") {
            continue;
        } else if let Some((file, hunk)) = current.as_mut() {
            if let Some(added) = line.strip_prefix('+') {
                hunk.added.push(added.to_string());
            } else if let Some(removed) = line.strip_prefix('-') {
                hunk.removed.push(removed.to_string());
            } else if line.starts_with("@@") {
                let finished = std::mem::take(hunk);
                if !finished.is_empty() {
                    file.changes.push(finished);
                }
            }
        }
    }

    if let Some(finished) = current.take() {
        flush_file(finished, &mut files);
    }

    files
}

fn flush_file((mut file, hunk): (FileChange, Hunk), files: &mut Vec<FileChange>) {
    if !hunk.is_empty() {
        file.changes.push(hunk);
    }
    if !file.changes.is_empty() {
        files.push(file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_OUTPUT: &str = "\
diff --git a/app/sentiment.py b/app/sentiment.py
index 3b18e51..a9c1f2d 100644
--- a/app/sentiment.py
+++ b/app/sentiment.py
@@ -10,7 +10,7 @@ def classify(text):
     scores = analyzer.polarity_scores(text)
-    if scores['compound'] > 0.5:
+    if scores['compound'] >= 0.05:
         return 'positive'
@@ -40,3 +40,4 @@ def summarize(rows):
     total = len(rows)
+    logger.info('rows: %d', total)
     return total
diff --git a/README.md b/README.md
index 1111111..2222222 100644
--- a/README.md
+++ b/README.md
";

    #[test]
    fn test_files_and_hunks() {
        let files = parse_unified_diff(SHOW_OUTPUT);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "app/sentiment.py");
        assert_eq!(files[0].changes.len(), 2);
        assert_eq!(
            files[0].changes[0],
            Hunk {
                added: vec!["    if scores['compound'] >= 0.05:".to_string()],
                removed: vec!["    if scores['compound'] > 0.5:".to_string()],
            }
        );
        assert_eq!(files[0].changes[1].added, vec!["    logger.info('rows: %d', total)"]);
        assert!(files[0].changes[1].removed.is_empty());
    }

    #[test]
    fn test_lines_before_first_file_are_ignored() {
        let files = parse_unified_diff("+stray\n-stray\n@@ -1 +1 @@\n");
        assert!(files.is_empty());
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_unified_diff("").is_empty());
    }
}
