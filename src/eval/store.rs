use super::value::Value;
use crate::error::{DResult, DiceError};
use crate::ops::Die;
use crate::parse::ast::Expression;
use std::collections::HashMap;

/// Persistent storage for named expressions.
pub trait FunctionLoader {
    fn load(&self, name: &str) -> Option<Expression>;

    fn save(&mut self, name: &str, expr: Expression);

    /// Returns whether anything was removed.
    fn unsave(&mut self, name: &str) -> bool;
}

/// A [`FunctionLoader`] that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    functions: HashMap<String, Expression>,
}

impl FunctionLoader for MemoryLoader {
    fn load(&self, name: &str) -> Option<Expression> {
        self.functions.get(name).cloned()
    }

    fn save(&mut self, name: &str, expr: Expression) {
        self.functions.insert(name.to_string(), expr);
    }

    fn unsave(&mut self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }
}

/// Returns the 1-based argument index a positional name like `2` refers to.
pub fn positional_index(name: &str) -> Option<usize> {
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok().filter(|&i| i > 0)
}

fn primitive(name: &str) -> Option<Expression> {
    let sides = match name {
        "!d" => 6,
        "!c" => 2,
        _ => return None,
    };
    Some(Expression::prefix(Die, Expression::literal(sides)))
}

/// Named expressions visible to an evaluation: call frames for positional
/// arguments, session-local transients, and the persistent loader.
pub struct SavedFunctions {
    loader: Box<dyn FunctionLoader>,
    frames: Vec<Vec<Expression>>,
    transients: HashMap<String, Expression>,
}

impl SavedFunctions {
    pub fn new(loader: Box<dyn FunctionLoader>) -> Self {
        Self {
            loader,
            frames: Vec::new(),
            transients: HashMap::new(),
        }
    }

    /// Looks up a named expression. Primitives shadow transients, which
    /// shadow saved functions.
    pub fn resolve(&self, name: &str) -> DResult<Expression> {
        if let Some(expr) = primitive(name) {
            return Ok(expr);
        }
        if let Some(expr) = self.transients.get(name) {
            return Ok(expr.clone());
        }
        self.loader
            .load(name)
            .ok_or_else(|| DiceError::UnknownReference(name.to_string()))
    }

    /// The `index`-th (1-based) argument of the innermost call.
    pub fn lookup_positional(&self, index: usize) -> DResult<Expression> {
        let frame = self
            .frames
            .last()
            .ok_or_else(|| DiceError::argument(format!("{{{}}} used outside of a function", index)))?;
        index
            .checked_sub(1)
            .and_then(|i| frame.get(i))
            .cloned()
            .ok_or_else(|| {
                DiceError::argument(format!(
                    "argument {{{}}} was requested but only {} were given",
                    index,
                    frame.len()
                ))
            })
    }

    pub fn push_frame(&mut self, args: Vec<Expression>) {
        tracing::trace!("entering call frame {} with {} argument(s)", self.frames.len(), args.len());
        self.frames.push(args);
    }

    pub fn pop_frame(&mut self) -> Option<Vec<Expression>> {
        let frame = self.frames.pop();
        tracing::trace!("left call frame {}", self.frames.len());
        frame
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn save(&mut self, name: &str, expr: Expression) -> DResult<()> {
        check_assignable(name)?;
        self.loader.save(name, expr);
        Ok(())
    }

    pub fn unsave(&mut self, name: &str) -> DResult<()> {
        check_assignable(name)?;
        if self.loader.unsave(name) {
            Ok(())
        } else {
            Err(DiceError::UnknownReference(name.to_string()))
        }
    }

    pub fn save_transient(&mut self, name: &str, value: Value) {
        self.save_transient_expr(name, Expression::from(value));
    }

    pub fn save_transient_expr(&mut self, name: &str, expr: Expression) {
        self.transients.insert(name.to_string(), expr);
    }

    pub fn clear_transient(&mut self, name: &str) {
        self.transients.remove(name);
    }

    pub fn transient(&self, name: &str) -> Option<&Expression> {
        self.transients.get(name)
    }
}

impl Default for SavedFunctions {
    fn default() -> Self {
        Self::new(Box::new(MemoryLoader::default()))
    }
}

fn check_assignable(name: &str) -> DResult<()> {
    if name.trim().is_empty() {
        Err(DiceError::argument("a saved function needs a name"))
    } else if positional_index(name).is_some() {
        Err(DiceError::argument("can't overwrite parameters in a function"))
    } else if primitive(name).is_some() {
        Err(DiceError::argument(format!("{{{}}} is built in and can't be changed", name)))
    } else {
        Ok(())
    }
}
