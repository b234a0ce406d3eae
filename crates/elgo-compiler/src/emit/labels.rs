//! Label bookkeeping.
//!
//! A label is created before it is used and bound to an instruction
//! position exactly once. Both rules are checked: binding twice fails
//! immediately, and [`LabelTable::resolve`] refuses to finish a function
//! that still has an unbound or never-referenced label.

use elgo_core::CompilationError;

use crate::bytecode::Label;

type Result<T> = std::result::Result<T, CompilationError>;

#[derive(Debug)]
struct LabelInfo {
    name: &'static str,
    position: Option<usize>,
    used: bool,
}

/// Arena of labels for one function.
#[derive(Debug, Default)]
pub struct LabelTable {
    labels: Vec<LabelInfo>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a new label. `name` is only used in diagnostics.
    pub fn create(&mut self, name: &'static str) -> Label {
        let label = Label(self.labels.len() as u32);
        self.labels.push(LabelInfo {
            name,
            position: None,
            used: false,
        });
        label
    }

    fn info_mut(&mut self, label: Label) -> Result<&mut LabelInfo> {
        self.labels
            .get_mut(label.0 as usize)
            .ok_or_else(|| CompilationError::internal(format!("unknown label {label}")))
    }

    /// Record a jump to `label`.
    pub fn mark_used(&mut self, label: Label) -> Result<()> {
        self.info_mut(label)?.used = true;
        Ok(())
    }

    /// Bind `label` to instruction index `position`.
    pub fn bind(&mut self, label: Label, position: usize) -> Result<()> {
        let info = self.info_mut(label)?;
        if let Some(previous) = info.position {
            return Err(CompilationError::internal(format!(
                "label '{}' ({label}) bound twice, at {previous} and {position}",
                info.name
            )));
        }
        info.position = Some(position);
        Ok(())
    }

    /// Whether `label` has been bound.
    pub fn is_bound(&self, label: Label) -> bool {
        self.labels
            .get(label.0 as usize)
            .is_some_and(|info| info.position.is_some())
    }

    /// Number of labels created.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check every label is bound and used; return positions by label id.
    pub fn resolve(&self) -> Result<Vec<usize>> {
        self.labels
            .iter()
            .enumerate()
            .map(|(id, info)| match (info.position, info.used) {
                (Some(position), true) => Ok(position),
                (None, _) => Err(CompilationError::internal(format!(
                    "label '{}' (L{id}) was never bound",
                    info.name
                ))),
                (Some(_), false) => Err(CompilationError::internal(format!(
                    "label '{}' (L{id}) was never used",
                    info.name
                ))),
            })
            .collect()
    }
}
