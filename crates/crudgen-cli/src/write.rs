use crudgen_schema::Reporter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub dry_run: bool,
    pub check: bool,
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub changed: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
}

/// Write generated files that differ from what is on disk.
///
/// Each file is written atomically as a whole (tmp then rename), so an
/// interrupted run never leaves a partial artifact behind.
pub fn apply_generated_files(
    files: &[GeneratedFile],
    opts: WriteOptions,
    reporter: &dyn Reporter,
) -> anyhow::Result<WriteSummary> {
    let mut files = files.to_vec();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut summary = WriteSummary::default();

    for f in &files {
        let existing = std::fs::read_to_string(&f.path).ok();
        if existing.as_deref() != Some(f.content.as_str()) {
            summary.changed.push(f.path.clone());
        }
    }

    if opts.dry_run {
        for p in &summary.changed {
            reporter.info(&format!("would write {}", p.display()));
        }
        return Ok(summary);
    }

    if opts.check {
        if !summary.changed.is_empty() {
            anyhow::bail!("generated files are out of date");
        }
        return Ok(summary);
    }

    for f in &files {
        if !summary.changed.contains(&f.path) {
            continue;
        }
        write_atomic(&f.path, &f.content)?;
        summary.written.push(f.path.clone());
    }

    for p in &summary.written {
        reporter.info(&format!("wrote {}", p.display()));
    }

    Ok(summary)
}

fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("failed to create directory {}: {e}", parent.display()))?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        anyhow::anyhow!(
            "failed to rename {} -> {}: {e}",
            tmp.display(),
            path.display()
        )
    })?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingReporter {
        infos: RefCell<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn info(&self, msg: &str) {
            self.infos.borrow_mut().push(msg.to_string());
        }
        fn warn(&self, _msg: &str) {}
    }

    #[test]
    fn dry_run_reports_changes_without_touching_disk() {
        let path = std::env::temp_dir()
            .join("crudgen-write-tests-nonexistent")
            .join("ProductController.cs");
        let files = vec![GeneratedFile {
            path: path.clone(),
            content: "// generated".to_string(),
        }];

        let reporter = RecordingReporter::default();
        let summary = apply_generated_files(
            &files,
            WriteOptions {
                dry_run: true,
                check: false,
            },
            &reporter,
        )
        .unwrap();

        assert_eq!(summary.changed, vec![path.clone()]);
        assert!(summary.written.is_empty());
        assert!(!path.exists());

        let infos = reporter.infos.borrow();
        assert_eq!(infos.len(), 1);
        assert!(infos[0].starts_with("would write"));
    }

    #[test]
    fn check_mode_fails_on_pending_changes() {
        let path = std::env::temp_dir()
            .join("crudgen-write-tests-nonexistent")
            .join("IProductService.cs");
        let files = vec![GeneratedFile {
            path,
            content: "// generated".to_string(),
        }];

        let err = apply_generated_files(
            &files,
            WriteOptions {
                dry_run: false,
                check: true,
            },
            &RecordingReporter::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of date"));
    }
}
