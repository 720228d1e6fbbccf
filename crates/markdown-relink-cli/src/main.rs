use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use markdown_relink_config::Config;
use markdown_relink_engine::{FileIndex, Replacer, io};
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Command::Init { force } => init(cli.config.as_deref(), force),
        Command::Rewrite { docs, out } => {
            let config = load_config(cli.config.as_deref())?;
            let site = Site::open(&config, docs)?;
            let summary = site.rewrite(out.as_deref())?;
            log::info!(
                "[relink] {} of {} documents changed in {}",
                summary.changed,
                summary.documents,
                site.docs.display()
            );
            Ok(())
        }
        Command::File { doc, docs } => {
            let config = load_config(cli.config.as_deref())?;
            let site = Site::open(&config, docs)?;
            print!("{}", site.rewrite_one(RelativePath::new(&doc))?);
            Ok(())
        }
    }
}

/// An explicitly named config file must exist; the default one is optional.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("Config file not found: {}", path.display())),
        None => Ok(Config::load()?.unwrap_or_default()),
    }
}

fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path.map_or_else(Config::config_path, Path::to_path_buf);
    if path.exists() && !force {
        bail!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }

    Config::default()
        .save_to_path(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("[relink] wrote {}", path.display());
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    documents: usize,
    changed: usize,
}

/// A docs tree with its index and a compiled replacer.
struct Site {
    docs: PathBuf,
    excludes: Vec<glob::Pattern>,
    replacer: Replacer<FileIndex>,
}

impl Site {
    fn open(config: &Config, docs: Option<PathBuf>) -> Result<Self> {
        let docs = docs.unwrap_or_else(|| config.docs_path.clone());
        let excludes = config.exclude_patterns()?;

        let index = FileIndex::from_dir(&docs, |path| is_excluded(&excludes, path))
            .with_context(|| format!("Failed to index {}", docs.display()))?
            .with_warn_ambiguities(config.links.warn_ambiguities);
        log::debug!("[relink] indexed {} files under {}", index.len(), docs.display());

        let replacer = Replacer::from_options(index, config.use_directory_urls, &config.links)?;

        Ok(Self {
            docs,
            excludes,
            replacer,
        })
    }

    fn skip(&self, path: &RelativePath) -> bool {
        is_excluded(&self.excludes, path)
    }

    fn rewrite_one(&self, doc: &RelativePath) -> Result<String> {
        let content = io::read_file(doc, &self.docs)
            .with_context(|| format!("Failed to read {doc}"))?;
        Ok(self.replacer.replace(doc, &content))
    }

    /// Rewrite every document. In place when `out` is `None`; otherwise the
    /// whole tree, assets included, is written under `out`.
    fn rewrite(&self, out: Option<&Path>) -> Result<Summary> {
        if let Some(out) = out {
            self.check_out_dir(out)?;
        }

        let files = io::scan_files(&self.docs, |path| self.skip(path))?;
        let mut summary = Summary::default();

        for file in &files {
            if !io::is_markdown(file) {
                if let Some(out) = out {
                    io::copy_file(file, &self.docs, out)
                        .with_context(|| format!("Failed to copy {file}"))?;
                }
                continue;
            }

            let content = io::read_file(file, &self.docs)
                .with_context(|| format!("Failed to read {file}"))?;
            let rewritten = self.replacer.replace(file, &content);
            summary.documents += 1;

            let changed = rewritten != content;
            if changed {
                summary.changed += 1;
                log::debug!("[relink] rewrote {file}");
            }

            let target = match out {
                Some(out) => out,
                None if changed => self.docs.as_path(),
                None => continue,
            };
            io::write_file(file, target, &rewritten)
                .with_context(|| format!("Failed to write {file}"))?;
        }

        Ok(summary)
    }

    /// `out` must not sit inside the docs tree, or the next run would index
    /// the written copies. Both paths are compared fully resolved.
    fn check_out_dir(&self, out: &Path) -> Result<()> {
        fs::create_dir_all(out)
            .with_context(|| format!("Failed to create {}", out.display()))?;
        let docs = fs::canonicalize(&self.docs)
            .with_context(|| format!("Failed to resolve {}", self.docs.display()))?;
        let resolved = fs::canonicalize(out)
            .with_context(|| format!("Failed to resolve {}", out.display()))?;

        ensure!(
            !resolved.starts_with(&docs),
            "Output directory {} is inside the docs directory",
            out.display()
        );
        Ok(())
    }
}

fn is_excluded(excludes: &[glob::Pattern], path: &RelativePath) -> bool {
    excludes.iter().any(|pattern| pattern.matches(path.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site_in(dir: &TempDir, config: Config) -> Site {
        let docs = dir.path().join("docs");
        write(&docs, "index.md", "See [[Setup]] and [[Missing]].");
        write(&docs, "guide/setup.md", "Back to [[index|home]].");
        write(&docs, "drafts/wip.md", "[[Setup]]");
        write(&docs, "img/logo.png", "png");
        write(&docs, "guide/plain.md", "No links here.");
        Site::open(&config, Some(docs)).unwrap()
    }

    #[test]
    fn rewrite_in_place_only_touches_changed_documents() {
        // Given a docs tree with one document that has no links
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir, Config::default());
        let docs = dir.path().join("docs");
        let plain = docs.join("guide/plain.md");
        let old_mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        fs::File::options()
            .write(true)
            .open(&plain)
            .unwrap()
            .set_modified(old_mtime)
            .unwrap();

        // When rewriting in place
        let summary = site.rewrite(None).unwrap();

        // Then links are relative to each document
        assert_eq!(
            summary,
            Summary {
                documents: 4,
                changed: 3
            }
        );
        // And the unchanged document was not written
        assert_eq!(fs::metadata(&plain).unwrap().modified().unwrap(), old_mtime);
        assert_eq!(fs::read_to_string(&plain).unwrap(), "No links here.");
        assert_eq!(
            fs::read_to_string(docs.join("index.md")).unwrap(),
            "See [Setup](guide/setup.md) and [[Missing]]."
        );
        assert_eq!(
            fs::read_to_string(docs.join("guide/setup.md")).unwrap(),
            "Back to [home](../index.md)."
        );
    }

    #[test]
    fn rewrite_to_out_copies_assets_and_leaves_source_alone() {
        // Given a docs tree and a separate output directory
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir, Config::default());
        let out = dir.path().join("site");

        // When rewriting into the output directory
        site.rewrite(Some(&out)).unwrap();

        // Then the output has every file and the source is unchanged
        assert_eq!(
            fs::read_to_string(out.join("index.md")).unwrap(),
            "See [Setup](guide/setup.md) and [[Missing]]."
        );
        assert!(out.join("img/logo.png").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/index.md")).unwrap(),
            "See [[Setup]] and [[Missing]]."
        );
    }

    #[test]
    fn excluded_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            exclude: vec!["drafts/*".to_string()],
            ..Config::default()
        };
        let site = site_in(&dir, config);

        let summary = site.rewrite(None).unwrap();

        assert_eq!(summary.documents, 3);
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/drafts/wip.md")).unwrap(),
            "[[Setup]]"
        );
    }

    #[test]
    fn rewrite_one_document() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir, Config::default());

        let out = site.rewrite_one(RelativePath::new("guide/setup.md")).unwrap();

        assert_eq!(out, "Back to [home](../index.md).");
    }

    #[test]
    fn out_inside_docs_is_rejected() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir, Config::default());

        let result = site.rewrite(Some(&dir.path().join("docs/site")));

        assert!(result.is_err());
    }

    #[test]
    fn out_inside_docs_is_rejected_through_unnormalized_paths() {
        // Given an output path that only reaches the docs tree via `..`
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir, Config::default());
        fs::create_dir_all(dir.path().join("other")).unwrap();
        let out = dir.path().join("other/../docs/site");

        // When rewriting into it
        let result = site.rewrite(Some(&out));

        // Then the run is refused before anything is written
        assert!(result.is_err());
        assert!(!dir.path().join("docs/site/index.md").exists());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("relink.toml");

        init(Some(&path), false).unwrap();
        assert!(init(Some(&path), false).is_err());
        init(Some(&path), true).unwrap();

        let loaded = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let result = load_config(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }
}
