//! Stage orchestration shared by the CLI commands.
//!
//! [`load`] runs config, content and flatten; [`build`] renders and publishes.
//! Each stage's error converts into [`BuildError`], so callers see one type.

use crate::config::{self, ConfigError, SiteConfig};
use crate::content::{self, ContentError, ContentStore};
use crate::flatten::{self, FlattenError, Flattened, ShapeMode};
use crate::publish::{self, PublishError, PublishReport};
use crate::render::{self, RenderError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Flatten(#[from] FlattenError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Everything read from the content path.
#[derive(Debug)]
pub struct Loaded {
    pub config: SiteConfig,
    pub store: ContentStore,
    pub flattened: Flattened,
}

/// Load config and content, then flatten. `strict` overrides
/// `content.shape_mode` when set.
pub fn load(content_path: &Path, strict: bool) -> Result<Loaded, BuildError> {
    let config = config::load_config(content_path)?;
    let mode = if strict {
        ShapeMode::Strict
    } else {
        config.content.shape_mode
    };
    let store = content::load_sections(content_path)?;
    let flattened = flatten::flatten(&store.sections, mode)?;
    Ok(Loaded {
        config,
        store,
        flattened,
    })
}

/// Output and legacy paths. `--output` wins over `output.path`, and then the
/// configured legacy file is only touched when `remove_legacy` is set.
pub fn output_paths(
    config: &SiteConfig,
    output: Option<&Path>,
    remove_legacy: bool,
) -> (PathBuf, Option<PathBuf>) {
    let legacy = || config.output.legacy_path.as_ref().map(PathBuf::from);
    match output {
        Some(path) => (path.to_path_buf(), legacy().filter(|_| remove_legacy)),
        None => (PathBuf::from(&config.output.path), legacy()),
    }
}

/// Render the loaded records and publish the document.
pub fn build(
    loaded: &Loaded,
    output: Option<&Path>,
    remove_legacy: bool,
) -> Result<PublishReport, BuildError> {
    let markup = render::render(&loaded.flattened.records, &loaded.config)?;
    let (path, legacy) = output_paths(&loaded.config, output, remove_legacy);
    let report = publish::publish(&markup.into_string(), &path, legacy.as_deref())?;
    Ok(report)
}
