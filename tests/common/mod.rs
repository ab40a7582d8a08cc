//! Shared fixtures for integration tests: an in-memory CAD host and progress indicator.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;
use variant_export::HostError;
use variant_export::host::{BodyHandle, Component, Design, HostExportOptions, ProgressIndicator};

/// Host call as seen by [`FakeDesign`], in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetParameter(String, String),
    Recompute,
    RefreshView,
    Export(Utf8PathBuf),
}

/// Design with named user parameters and a single root component.
///
/// Exports write a small text file to the requested path so tests can inspect the output tree.
pub struct FakeDesign {
    pub active: bool,
    pub parameters: HashMap<String, String>,
    pub bodies: Vec<String>,
    pub calls: Vec<HostCall>,
    /// Exports of this body fail with a host error
    pub failing_body: Option<String>,
}

impl FakeDesign {
    pub fn new(parameters: &[&str], bodies: &[&str]) -> Self {
        Self {
            active: true,
            parameters: parameters
                .iter()
                .map(|name| (name.to_string(), "0".to_string()))
                .collect(),
            bodies: bodies.iter().map(|b| b.to_string()).collect(),
            calls: Vec::new(),
            failing_body: None,
        }
    }

    pub fn exports(&self) -> Vec<&Utf8PathBuf> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Export(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &HostCall) -> usize {
        self.calls.iter().filter(|call| *call == wanted).count()
    }
}

impl Design for FakeDesign {
    fn is_active(&self) -> bool {
        self.active
    }

    fn components(&self) -> Result<Vec<Component>, HostError> {
        Ok(vec![Component {
            name: "Root".to_string(),
            bodies: self
                .bodies
                .iter()
                .enumerate()
                .map(|(id, name)| BodyHandle {
                    id: id as u64,
                    name: name.clone(),
                })
                .collect(),
        }])
    }

    fn parameter_expression(&self, name: &str) -> Result<String, HostError> {
        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::ParameterNotFound(name.to_string()))
    }

    fn set_parameter_expression(&mut self, name: &str, expression: &str) -> Result<(), HostError> {
        let slot = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| HostError::ParameterNotFound(name.to_string()))?;
        *slot = expression.to_string();
        self.calls
            .push(HostCall::SetParameter(name.to_string(), expression.to_string()));
        Ok(())
    }

    fn recompute(&mut self) -> Result<(), HostError> {
        self.calls.push(HostCall::Recompute);
        Ok(())
    }

    fn refresh_view(&mut self) {
        self.calls.push(HostCall::RefreshView);
    }

    fn is_stable(&self) -> Option<bool> {
        None
    }

    fn process_events(&mut self) {}

    fn export(&mut self, options: &HostExportOptions) -> Result<(), HostError> {
        if self.failing_body.as_deref() == Some(options.body().name.as_str()) {
            return Err(HostError::Failed("export manager rejected the body".to_string()));
        }

        fs::write(options.filename(), options.body().name.as_bytes())
            .map_err(|e| HostError::Failed(e.to_string()))?;
        self.calls
            .push(HostCall::Export(options.filename().to_path_buf()));
        Ok(())
    }
}

/// Progress indicator whose cancel flag turns on once `cancel_at` values have been shown
#[derive(Default)]
pub struct FakeProgress {
    pub cancel_at: Option<usize>,
    pub value: usize,
    pub messages: Vec<String>,
    pub visible: bool,
}

impl FakeProgress {
    pub fn cancelling_after(variants: usize) -> Self {
        Self {
            cancel_at: Some(variants),
            ..Self::default()
        }
    }
}

impl ProgressIndicator for FakeProgress {
    fn show(&mut self, _title: &str, message: &str, _min: usize, _max: usize) {
        self.visible = true;
        self.messages.push(message.to_string());
    }

    fn set_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn set_value(&mut self, value: usize) {
        self.value = value;
    }

    fn was_cancelled(&self) -> bool {
        self.cancel_at.is_some_and(|at| self.value >= at)
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

pub fn temp_root() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, root)
}

/// Write a run configuration file and return its path
pub fn write_config(dir: &Utf8Path, name: &str, contents: &str) -> Utf8PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// All regular files below `dir`, relative to it, sorted
pub fn files_below(dir: &Utf8Path) -> Vec<String> {
    let mut found = Vec::new();
    collect(dir, dir, &mut found);
    found.sort();
    found
}

fn collect(root: &Utf8Path, dir: &Utf8Path, found: &mut Vec<String>) {
    let Ok(entries) = dir.read_dir_utf8() else {
        return;
    };
    for entry in entries {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.is_dir() {
            collect(root, path, found);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            found.push(relative.as_str().replace('\\', "/"));
        }
    }
}
