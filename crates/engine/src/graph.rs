//! Dependency validation for the active module set.
//!
//! `requires` edges are resolved against the active set only: a name absent
//! from the set means "never publishes" and the consuming module skips at
//! run time, so missing names are not build errors. Cycles are rejected here,
//! before any worker is scheduled.

use crate::core::module::ModuleDescriptor;
use crate::error::EngineError;
use std::collections::{HashMap, HashSet};

/// Validated execution context for one run: the active descriptors plus the
/// set of names that will publish.
#[derive(Debug)]
pub struct ExecutionPlan {
    pub modules: Vec<ModuleDescriptor>,
    scheduled: HashSet<String>,
}

impl ExecutionPlan {
    pub fn is_scheduled(&self, name: &str) -> bool {
        self.scheduled.contains(name)
    }

    pub fn scheduled_names(&self) -> impl Iterator<Item = &str> {
        self.scheduled.iter().map(String::as_str)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Unvisited,
    InProgress,
    Done,
}

/// Validate the `requires` relation over `active` and reject cycles.
pub fn build(active: Vec<ModuleDescriptor>) -> Result<ExecutionPlan, EngineError> {
    let scheduled: HashSet<String> = active.iter().map(|m| m.name.clone()).collect();
    let index: HashMap<&str, &ModuleDescriptor> =
        active.iter().map(|m| (m.name.as_str(), m)).collect();

    let mut state: HashMap<&str, Visit> = active
        .iter()
        .map(|m| (m.name.as_str(), Visit::Unvisited))
        .collect();

    for module in &active {
        if state[module.name.as_str()] == Visit::Unvisited {
            let mut path = Vec::new();
            visit(module.name.as_str(), &index, &mut state, &mut path)?;
        }
    }

    Ok(ExecutionPlan {
        modules: active,
        scheduled,
    })
}

fn visit<'a>(
    name: &'a str,
    index: &HashMap<&'a str, &'a ModuleDescriptor>,
    state: &mut HashMap<&'a str, Visit>,
    path: &mut Vec<&'a str>,
) -> Result<(), EngineError> {
    state.insert(name, Visit::InProgress);
    path.push(name);

    let module = index[name];
    for dep in &module.requires {
        // Absent from the active set: the consumer resolves to "no result"
        // at run time, not an error here.
        let Some(&dep_module) = index.get(dep.as_str()) else {
            continue;
        };
        match state[dep_module.name.as_str()] {
            Visit::Done => {}
            Visit::Unvisited => visit(dep_module.name.as_str(), index, state, path)?,
            Visit::InProgress => {
                let start = path
                    .iter()
                    .position(|n| *n == dep_module.name.as_str())
                    .unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|n| n.to_string()).collect();
                cycle.push(dep_module.name.clone());
                return Err(EngineError::DependencyCycle { modules: cycle });
            }
        }
    }

    path.pop();
    state.insert(name, Visit::Done);
    Ok(())
}
