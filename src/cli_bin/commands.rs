//! CLI command handlers that bridge CLI arguments to library operations

use crate::cli_bin::args::*;
use crate::cli_bin::terminal::TerminalPrompter;
use blogmatter::config::CONFIG_FILE_NAME;
use blogmatter::core::document::to_slash;
use blogmatter::error::Result;
use blogmatter::io::index::link_prefix_for;
use blogmatter::io::fs::normalize;
use blogmatter::{
    collect_article_info, render_index, select_draft, write_index, Aggregator, Area, AreaLayout,
    BlogConfig, Document, DocumentStore, IndexOptions, Prompter, TagPath,
};
use colored::Colorize;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Delimiter for `draft --tags`
pub const DRAFT_TAG_DELIMITER: &str = ",";
/// Delimiter for `new --tags`
pub const NEW_TAG_DELIMITER: &str = "/";

/// Everything a command needs: the configuration and where it applies
pub struct Context {
    pub config: BlogConfig,
    pub layout: AreaLayout,
    pub cwd: PathBuf,
    pub quiet: bool,
}

impl Context {
    /// Load the configuration for `cwd`.
    ///
    /// An explicit file must exist. Otherwise `cwd` and then `home` are searched
    /// and, when nothing is found, a default `config.yaml` is written to `cwd`.
    pub fn load(
        cwd: PathBuf,
        home: Option<&Path>,
        explicit: Option<&Path>,
        quiet: bool,
    ) -> Result<Self> {
        let config = match explicit {
            Some(path) => BlogConfig::load(cwd.join(path))?,
            None => match BlogConfig::discover(&cwd, home)? {
                Some((config, from)) => {
                    debug!("Using configuration {}", from.display());
                    config
                }
                None => {
                    let config = BlogConfig::default();
                    let path = cwd.join(CONFIG_FILE_NAME);
                    config.write_new(&path)?;
                    info!("Wrote default configuration to {}", path.display());
                    config
                }
            },
        };
        let layout = config.layout(&cwd);
        Ok(Self {
            config,
            layout,
            cwd,
            quiet,
        })
    }

    fn store(&self) -> DocumentStore {
        DocumentStore::new(self.layout.clone())
    }

    fn status(&self, label: &str, message: impl std::fmt::Display) {
        if !self.quiet {
            println!("{} {}", label.green().bold(), message);
        }
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, Path> {
        match path.strip_prefix(&self.cwd) {
            Ok(relative) => relative.into(),
            Err(_) => path.into(),
        }
    }
}

/// Execute the draft command
pub fn draft_command(ctx: &Context, args: DraftArgs) -> Result<()> {
    debug!("Executing draft command with args: {:?}", args);
    let store = ctx.store();
    let (title, tags) = article_info(
        &store,
        args.title,
        args.tags.as_deref(),
        DRAFT_TAG_DELIMITER,
        &mut TerminalPrompter::stdio(),
    )?;
    let path = store.create_draft(&title, &tags)?;
    ctx.status("Created draft", ctx.display_path(&path).display());
    Ok(())
}

/// Execute the new command
pub fn new_command(ctx: &Context, args: NewArgs) -> Result<()> {
    debug!("Executing new command with args: {:?}", args);
    let store = ctx.store();
    let (title, tags) = article_info(
        &store,
        args.title,
        args.tags.as_deref(),
        NEW_TAG_DELIMITER,
        &mut TerminalPrompter::stdio(),
    )?;
    let path = store.create_published(&title, &tags)?;
    ctx.status("Created post", ctx.display_path(&path).display());
    Ok(())
}

/// Title and tag path from arguments, or from the prompter when no title was given
fn article_info<P: Prompter>(
    store: &DocumentStore,
    title: Option<String>,
    tags: Option<&str>,
    delimiter: &str,
    prompter: &mut P,
) -> Result<(String, TagPath)> {
    match title {
        Some(title) => {
            let tags = TagPath::resolve(tags.unwrap_or_default(), delimiter, false)?;
            Ok((title, tags))
        }
        None => {
            let info = collect_article_info(prompter, &store.known_tag_paths(), delimiter)?;
            Ok((info.title, info.tags))
        }
    }
}

/// Execute the pub command
pub fn pub_command(ctx: &Context, args: PubArgs) -> Result<()> {
    debug!("Executing pub command with args: {:?}", args);
    let store = ctx.store();
    let input = match args.path {
        Some(path) => path,
        None => select_draft(
            &mut TerminalPrompter::stdio(),
            &store.draft_choices(),
            ctx.layout.draft_root(),
        )?,
    };
    let outcome = store.publish(&input)?;
    ctx.status(
        "Published",
        format!(
            "{} -> {}",
            ctx.display_path(&outcome.source).display(),
            ctx.display_path(&outcome.destination).display()
        ),
    );
    Ok(())
}

/// Execute the gen command
pub fn gen_command(ctx: &Context, args: GenArgs) -> Result<()> {
    debug!("Executing gen command with args: {:?}", args);
    let output = normalize(&ctx.cwd.join(
        args.output
            .unwrap_or_else(|| PathBuf::from(ctx.config.index_output())),
    ));

    let aggregation = Aggregator::new(ctx.layout.clone()).aggregate();
    for skipped in &aggregation.skipped {
        warn!("Left out {}: {}", to_slash(&skipped.path), skipped.reason);
    }

    let options = IndexOptions {
        title: ctx.config.index.title.clone(),
        link_prefix: link_prefix_for(&output, ctx.layout.published_root()),
        generated_at: chrono::Local::now().into(),
    };
    let content = render_index(&aggregation.groups, &options);

    if args.dry_run {
        print!("{}", content);
        return Ok(());
    }

    write_index(&output, &content)?;
    ctx.status(
        "Generated",
        format!(
            "{} ({} groups, {} documents)",
            ctx.display_path(&output).display(),
            aggregation.groups.len(),
            aggregation.document_count()
        ),
    );
    if !aggregation.skipped.is_empty() && !ctx.quiet {
        println!(
            "{} {} document(s) could not be read",
            "Skipped".yellow().bold(),
            aggregation.skipped.len()
        );
    }
    Ok(())
}

/// Execute the list command
pub fn list_command(ctx: &Context, args: ListArgs) -> Result<()> {
    debug!("Executing list command with args: {:?}", args);
    let area = match args.area {
        AreaArg::Draft => Area::Draft,
        AreaArg::Published => Area::Published,
    };
    let store = ctx.store();

    let mut documents: Vec<Document> = Vec::new();
    for relative in store.list_documents(area) {
        match store.load(area, &relative) {
            Ok(doc) => documents.push(doc),
            Err(e) => warn!("Skipping {}: {}", to_slash(&relative), e),
        }
    }

    match args.format {
        OutputFormat::Text => {
            for doc in &documents {
                let date = doc
                    .published_at
                    .or(doc.created_at)
                    .map(|ts| ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                println!("{}  {}  {}", date.dimmed(), doc.link_path(), doc.title.bold());
            }
        }
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&documents)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&documents)?),
    }
    Ok(())
}

/// Execute the tags command
pub fn tags_command(ctx: &Context) -> Result<()> {
    for tags in ctx.store().known_tag_paths() {
        println!("{}", tags);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    struct Scripted(VecDeque<String>);

    impl Prompter for Scripted {
        fn ask_text(&mut self, _message: &str, _help: Option<&str>) -> Result<String> {
            Ok(self.0.pop_front().unwrap_or_default())
        }

        fn ask_select(&mut self, _message: &str, _options: &[String]) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_context_writes_default_config() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::load(dir.path().to_path_buf(), None, None, true).unwrap();
        assert!(dir.path().join(CONFIG_FILE_NAME).is_file());
        assert_eq!(ctx.layout.draft_root(), dir.path().join("_draft"));
    }

    #[test]
    fn test_context_rejects_missing_explicit_config() {
        let dir = TempDir::new().unwrap();
        let result = Context::load(
            dir.path().to_path_buf(),
            None,
            Some(Path::new("nope.yaml")),
            true,
        );
        assert!(result.is_err());
        assert!(!dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_article_info_from_arguments_and_prompts() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::new(AreaLayout::new(dir.path(), "_draft", "blogs"));
        let mut unused = Scripted(VecDeque::new());

        let (title, tags) = article_info(
            &store,
            Some("Hello".to_string()),
            Some("Go, Basics"),
            DRAFT_TAG_DELIMITER,
            &mut unused,
        )
        .unwrap();
        assert_eq!(title, "Hello");
        assert_eq!(tags.joined(), "Go/Basics");

        let mut scripted = Scripted(VecDeque::from(vec!["Asked".to_string(), "Rust/Async".to_string()]));
        let (title, tags) =
            article_info(&store, None, None, NEW_TAG_DELIMITER, &mut scripted).unwrap();
        assert_eq!(title, "Asked");
        assert_eq!(tags.joined(), "Rust/Async");
    }
}
