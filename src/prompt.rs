//! Interactive flows over an abstract prompt provider
//!
//! The flows only see strings and indices; how the answers are collected is
//! up to the [`Prompter`] implementation.

use crate::core::tag_path::TagPath;
use crate::error::{BlogMatterError, Result};
use crate::io::store::DraftChoice;
use std::path::{Path, PathBuf};

/// Menu entry that switches to typing a new tag path
pub const NEW_TAG_PATH_OPTION: &str = "Enter a new tag path";

/// Source of interactive answers
pub trait Prompter {
    /// Ask for free text
    fn ask_text(&mut self, message: &str, help: Option<&str>) -> Result<String>;

    /// Ask to pick one of `options`; returns its index
    fn ask_select(&mut self, message: &str, options: &[String]) -> Result<usize>;
}

/// Title and tag path collected for a new document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInfo {
    pub title: String,
    pub tags: TagPath,
}

/// Ask for a title, then for a tag path.
///
/// When tag paths already exist they are offered first, behind an entry for
/// typing a new one. New paths are split on `delimiter`.
pub fn collect_article_info<P: Prompter + ?Sized>(
    prompter: &mut P,
    known: &[TagPath],
    delimiter: &str,
) -> Result<ArticleInfo> {
    let title = prompter.ask_text("Title:", Some("The main heading of the post"))?;
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(BlogMatterError::empty_input("title"));
    }

    let picked = if known.is_empty() {
        None
    } else {
        let mut options = vec![NEW_TAG_PATH_OPTION.to_string()];
        options.extend(known.iter().map(TagPath::joined));
        let index = prompter.ask_select("Tag path:", &options)?;
        match index {
            0 => None,
            i => Some(
                known
                    .get(i - 1)
                    .cloned()
                    .ok_or_else(|| BlogMatterError::prompt(format!("no option {}", i)))?,
            ),
        }
    };

    let tags = match picked {
        Some(tags) => tags,
        None => {
            let help = format!(
                "Segments separated by {:?} become nested directories, e.g. Go{}Patterns",
                delimiter, delimiter
            );
            let raw = prompter.ask_text("New tag path:", Some(&help))?;
            TagPath::resolve(&raw, delimiter, false)?
        }
    };

    Ok(ArticleInfo { title, tags })
}

/// Ask which draft to publish; returns its path relative to the draft root
pub fn select_draft<P: Prompter + ?Sized>(
    prompter: &mut P,
    choices: &[DraftChoice],
    draft_root: &Path,
) -> Result<PathBuf> {
    if choices.is_empty() {
        return Err(BlogMatterError::not_found(draft_root));
    }
    let labels: Vec<String> = choices.iter().map(DraftChoice::label).collect();
    let index = prompter.ask_select("Draft to publish:", &labels)?;
    choices
        .get(index)
        .map(|c| c.relative.clone())
        .ok_or_else(|| BlogMatterError::prompt(format!("no option {}", index)))
}
