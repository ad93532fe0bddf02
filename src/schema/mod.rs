//! Schema revisions and the linear chain they form.
//!
//! Each revision names its single parent. Walking parents from the head
//! reaches the root, and every revision carries the statements that undo it.

mod revisions;

use std::collections::{HashMap, HashSet};

use crate::error::SchemaError;

pub use revisions::akowe_revisions;

/// One unit of work inside a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A DDL or DML statement.
    Sql(&'static str),
    /// Link legacy income rows to invoices by invoice number.
    LinkIncomeInvoices,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: &'static str,
    pub parent: Option<&'static str>,
    pub summary: &'static str,
    pub upgrade: &'static [Step],
    pub downgrade: &'static [Step],
}

/// A validated, root-first ordering of revisions.
#[derive(Debug, Clone)]
pub struct RevisionChain {
    revisions: Vec<Revision>,
}

impl RevisionChain {
    pub fn new(revisions: Vec<Revision>) -> Result<Self, SchemaError> {
        if revisions.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::new();
        for revision in &revisions {
            if !seen.insert(revision.id) {
                return Err(SchemaError::DuplicateRevision(revision.id.to_string()));
            }
            if revision.downgrade.is_empty() {
                return Err(SchemaError::MissingDowngrade(revision.id.to_string()));
            }
        }

        let mut roots = Vec::new();
        let mut children: HashMap<&str, Vec<&Revision>> = HashMap::new();
        for revision in &revisions {
            match revision.parent {
                None => roots.push(revision),
                Some(parent) if !seen.contains(parent) => {
                    return Err(SchemaError::MissingParent {
                        revision: revision.id.to_string(),
                        parent: parent.to_string(),
                    });
                }
                Some(parent) => children.entry(parent).or_default().push(revision),
            }
        }

        if roots.len() > 1 {
            let mut ids: Vec<String> = roots.iter().map(|r| r.id.to_string()).collect();
            ids.sort();
            return Err(SchemaError::MultipleRoots(ids));
        }
        let Some(root) = roots.first() else {
            // every revision has a parent, so the parents form a cycle
            return Err(SchemaError::Unreachable(revisions[0].id.to_string()));
        };

        if let Some((parent, kids)) = children.iter().find(|(_, kids)| kids.len() > 1) {
            let mut ids: Vec<String> = kids.iter().map(|r| r.id.to_string()).collect();
            ids.sort();
            return Err(SchemaError::Branch {
                parent: parent.to_string(),
                children: ids,
            });
        }

        let mut ordered = Vec::with_capacity(revisions.len());
        let mut current: &Revision = root;
        loop {
            ordered.push(current.clone());
            match children.get(current.id).and_then(|kids| kids.first()) {
                Some(next) => current = *next,
                None => break,
            }
        }

        if ordered.len() != revisions.len() {
            let reached: HashSet<&str> = ordered.iter().map(|r| r.id).collect();
            let stray = revisions
                .iter()
                .find(|r| !reached.contains(r.id))
                .map(|r| r.id.to_string())
                .unwrap_or_default();
            return Err(SchemaError::Unreachable(stray));
        }

        Ok(Self { revisions: ordered })
    }

    /// The chain shipped with Akowe.
    pub fn akowe() -> Result<Self, SchemaError> {
        Self::new(akowe_revisions())
    }

    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn head(&self) -> &Revision {
        // non-empty by construction
        &self.revisions[self.revisions.len() - 1]
    }

    pub fn position(&self, id: &str) -> Result<usize, SchemaError> {
        self.revisions
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| SchemaError::UnknownRevision(id.to_string()))
    }

    /// Revisions to apply, oldest first, to move from `current` up to `target`.
    ///
    /// `current == None` means an empty database; `target == None` means head.
    pub fn pending(
        &self,
        current: Option<&str>,
        target: Option<&str>,
    ) -> Result<&[Revision], SchemaError> {
        let start = match current {
            Some(id) => self.position(id)? + 1,
            None => 0,
        };
        let end = match target {
            Some(id) => self.position(id)? + 1,
            None => self.revisions.len(),
        };
        if end < start {
            return Ok(&[]);
        }
        Ok(&self.revisions[start..end])
    }

    /// Revisions to undo, newest first, to move from `current` down to `target`.
    ///
    /// The target itself stays applied; `target == None` undoes everything.
    pub fn rollback(
        &self,
        current: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<&Revision>, SchemaError> {
        let Some(current) = current else {
            return match target {
                Some(id) => Err(SchemaError::NotAnAncestor {
                    from: "base".to_string(),
                    target: id.to_string(),
                }),
                None => Ok(Vec::new()),
            };
        };
        let from = self.position(current)?;
        let keep = match target {
            Some(id) => {
                let to = self.position(id)?;
                if to > from {
                    return Err(SchemaError::NotAnAncestor {
                        from: current.to_string(),
                        target: id.to_string(),
                    });
                }
                to + 1
            }
            None => 0,
        };
        Ok(self.revisions[keep..=from].iter().rev().collect())
    }
}
