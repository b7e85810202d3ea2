//! CLI commands for ecrf

use anyhow::{Context as _, Result, bail};
use ecrf_core::factory::TITLE_KEY;
use ecrf_core::{
    Container, ContainerId, ControlId, EngineConfig, FileStore, Form, FormRepository, FormStore,
    OptionMap, validate as validate_form,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded configuration and the form repository it points at.
pub struct Context {
    pub config: EngineConfig,
    pub repository: FormRepository,
}

impl Context {
    /// Load the config and open the file store.
    ///
    /// An explicit `--store` wins over `storage_dir` from the config.
    pub fn open(store: Option<PathBuf>, config: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => EngineConfig::load(path)?,
            None => match EngineConfig::default_path() {
                Ok(path) => EngineConfig::load(&path)?,
                Err(_) => EngineConfig::default(),
            },
        };

        let dir = store
            .or_else(|| config.storage_dir())
            .context("Could not determine storage directory")?;
        log::debug!("Using form store at {}", dir.display());

        let backend = FileStore::new(&dir)?;
        let repository =
            FormRepository::with_namespace(Arc::new(backend), config.storage_namespace.clone());
        Ok(Self { config, repository })
    }

    fn load(&self, key: &str) -> Result<Form> {
        self.repository
            .load(key)
            .with_context(|| format!("Failed to load form '{}'", key))
    }
}

/// Create a new form
pub fn new_form(context: &Context, title: &str, key: Option<&str>) -> Result<String> {
    let form = Form::new(title);
    let key = context.repository.save(&form, key)?;
    println!("Created form '{}' ({})", form.title, key);
    Ok(key)
}

/// List stored forms
pub fn list(context: &Context, json: bool) -> Result<()> {
    let forms = context.repository.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forms)?);
        return Ok(());
    }

    if forms.is_empty() {
        println!("No forms found.");
        return Ok(());
    }

    for meta in &forms {
        println!(
            "{:<38} {:<30} {:<10} {:>3} controls  updated {}",
            meta.key,
            meta.title,
            meta.status.to_string(),
            meta.control_count,
            meta.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Show a stored form
pub fn show(context: &Context, key: &str, json: bool) -> Result<()> {
    let form = context.load(key)?;

    if json {
        println!("{}", form.to_json()?);
        return Ok(());
    }

    println!("{} [{}] v{}", form.title, form.status, form.version);
    if !form.description.is_empty() {
        println!("{}", form.description);
    }
    println!();
    for line in outline(&form.container, 0) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per control, indented by nesting level.
fn outline(container: &Container, depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    let mut lines = Vec::new();

    for control in container.iter() {
        lines.push(format!(
            "{}- {} ({}) {}",
            indent,
            control.label(),
            control.kind(),
            control.id()
        ));
        if let Some(columns) = control.as_columns() {
            for (index, column) in columns.columns().iter().enumerate() {
                lines.push(format!(
                    "{}  Column {} [{}]",
                    indent,
                    index + 1,
                    columns.container_id(index)
                ));
                if let Some(inner) = &column.container {
                    lines.extend(outline(inner, depth + 2));
                }
            }
        }
    }
    lines
}

/// Validate a stored form, or a form JSON file when `source` is a path
pub fn validate(context: &Context, source: &str) -> Result<()> {
    let path = Path::new(source);
    let form = if path.is_file() {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Form::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))?
    } else {
        context.load(source)?
    };

    let report = validate_form(&form);
    if report.valid {
        println!("'{}' is valid", form.title);
        return Ok(());
    }

    for error in &report.errors {
        println!("  {}", error);
    }
    bail!("Form has {} validation error(s)", report.errors.len())
}

/// Arguments of the `add` command.
pub struct AddArgs<'a> {
    pub key: &'a str,
    pub type_tag: &'a str,
    pub title: Option<&'a str>,
    pub target: &'a str,
    pub index: Option<usize>,
    pub options: Option<&'a str>,
}

/// Add a control to a stored form
pub fn add(context: &Context, args: AddArgs<'_>) -> Result<ControlId> {
    let form = context.load(args.key)?;
    let target: ContainerId = args.target.parse()?;

    let mut options = match args.options {
        Some(json) => {
            serde_json::from_str::<OptionMap>(json).context("Options must be a JSON object")?
        }
        None => OptionMap::new(),
    };
    if let Some(title) = args.title {
        options.insert(TITLE_KEY.to_string(), Value::String(title.to_string()));
    }

    let mut store =
        FormStore::new(form, context.config.clone()).with_repository(context.repository.clone());
    let id = store.add_control(args.type_tag, options, &target, args.index.unwrap_or(usize::MAX))?;

    if store.save(Some(args.key)).is_none() {
        bail!("Failed to save form '{}'", args.key);
    }
    println!("Added {} to {}", id, target);
    Ok(id)
}

/// Delete a stored form
pub fn delete(context: &Context, key: &str) -> Result<()> {
    if !context.repository.exists(key)? {
        bail!("Form '{}' not found", key);
    }
    context.repository.delete(key)?;
    println!("Deleted form '{}'", key);
    Ok(())
}
