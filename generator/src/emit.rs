// Licensed under the Apache-2.0 license

//! Output file emission.
//!
//! The emitter turns rendered template text into files under one output
//! directory. Template files are recognized by a trailing `.in` suffix;
//! anything else found in a template search path is copied through
//! untouched. Destination names are themselves templates, so one template
//! file can fan out to one output file per address map
//! (`{name}_pkg.vhd.in` and friends).
//!
//! Two write modes cover the two kinds of artifact:
//! - [`WriteMode::Overwrite`]: each render replaces the destination.
//! - [`WriteMode::Merge`]: renders append, so successive address maps
//!   accumulate into one file (map files, documentation rollups). The
//!   first touch of a destination in a run deletes what a previous run
//!   left behind.
//!
//! Parsed templates are cached per path, so rendering one template against
//! many address maps parses it once.

use crate::error::{Error, Result};
use crate::template::{Template, DEFAULT_RECURSION_LIMIT};
use crate::value::Record;
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WriteMode {
    Overwrite,
    Merge,
}

pub struct Emitter {
    out_dir: PathBuf,
    mode: WriteMode,
    recursion_limit: usize,
    templates: Vec<(PathBuf, Template)>,
    written: Vec<PathBuf>,
    cleaned: Vec<PathBuf>,
}

/// A template file carries a trailing `.in` on top of its real extension.
pub fn is_template(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".in"))
}

/// Output name a template file maps to when the destination is not
/// templated: the file name with the `.in` suffix dropped.
pub fn default_target_name(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".in"))
}

impl Emitter {
    pub fn new(out_dir: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            out_dir: out_dir.into(),
            mode,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            templates: Vec::new(),
            written: Vec::new(),
            cleaned: Vec::new(),
        }
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Render `template_path` against `record` and write the result to
    /// `dest_name_template` (itself rendered against the same record)
    /// inside the output directory.
    pub fn process_template(
        &mut self,
        template_path: &Path,
        dest_name_template: &str,
        record: &Record,
    ) -> Result<PathBuf> {
        let index = self.parsed(template_path)?;
        let body = self.templates[index]
            .1
            .render_with_limit(record, self.recursion_limit)?;

        let dest_name = Template::parse_named(dest_name_template, dest_name_template)
            .render_with_limit(record, self.recursion_limit)?;
        if dest_name.trim().is_empty() {
            return Err(Error::EmptyDestination {
                template: template_path.display().to_string(),
            });
        }

        let dest = self.out_dir.join(&dest_name);
        self.write_file(&dest, &body)?;
        info!(
            "rendered `{}` -> `{}`",
            template_path.display(),
            dest.display()
        );
        Ok(dest)
    }

    /// Copy a non-template file into the output directory unchanged.
    pub fn copy_through(&mut self, src: &Path) -> Result<PathBuf> {
        let Some(name) = src.file_name() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("`{}` has no file name to copy under", src.display()),
            )
            .into());
        };
        let dest = self.out_dir.join(name);
        fs::create_dir_all(&self.out_dir)?;
        fs::copy(src, &dest)?;
        self.track(&dest);
        info!("copied `{}` -> `{}`", src.display(), dest.display());
        Ok(dest)
    }

    /// Every destination written so far, in first-write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn parsed(&mut self, path: &Path) -> Result<usize> {
        if let Some(index) = self.templates.iter().position(|(p, _)| p == path) {
            return Ok(index);
        }
        let text = fs::read_to_string(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("template");
        debug!("parsed template `{}`", path.display());
        self.templates
            .push((path.to_path_buf(), Template::parse_named(name, &text)));
        Ok(self.templates.len() - 1)
    }

    fn write_file(&mut self, dest: &Path, text: &str) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        match self.mode {
            WriteMode::Overwrite => fs::write(dest, text)?,
            WriteMode::Merge => {
                // first touch in this run drops whatever an earlier run left
                if !self.written.iter().any(|p| p == dest) {
                    match fs::remove_file(dest) {
                        Ok(()) => {
                            debug!("removed stale `{}`", dest.display());
                            self.cleaned.push(dest.to_path_buf());
                        }
                        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                        Err(err) => return Err(err.into()),
                    }
                }
                let mut file = fs::OpenOptions::new().create(true).append(true).open(dest)?;
                file.write_all(text.as_bytes())?;
            }
        }
        self.track(dest);
        Ok(())
    }

    fn track(&mut self, dest: &Path) {
        if !self.written.iter().any(|p| p == dest) {
            self.written.push(dest.to_path_buf());
        }
    }
}
