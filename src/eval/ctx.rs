use super::history::{FunctionHistory, HistoryEntry};
use super::roller::Randomizer;
use super::store::{positional_index, FunctionLoader, MemoryLoader, SavedFunctions};
use super::value::{Number, Value};
use crate::config::Config;
use crate::error::{DResult, DiceError};
use crate::ops::{BinaryOperate, PostfixOperate, PrefixOperate};
use crate::parse::{
    ast::{Expression, Operation},
    parse,
    visit::{Accept, AstVisitor},
};

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Nested references allowed before evaluation gives up.
const MAX_CALL_DEPTH: usize = 64;

/// The outcome of one successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub expression: Expression,
    pub value: Value,
    pub history: FunctionHistory,
}

/// Evaluation state: the randomness source, the operation limit, saved
/// functions and the history of the evaluation in progress.
pub struct Session<R = DefaultRoller> {
    roller: R,
    limit: usize,
    store: SavedFunctions,
    history: FunctionHistory,
    depth: usize,
}

impl<R: Randomizer> Session<R> {
    pub fn new(config: Config, roller: R, loader: Box<dyn FunctionLoader>) -> Self {
        Self {
            roller,
            limit: config.operation_limit,
            store: SavedFunctions::new(loader),
            history: FunctionHistory::new(),
            depth: 0,
        }
    }

    /// A session with the default limit and an in-memory store.
    pub fn with_roller(roller: R) -> Self {
        Self::new(Config::default(), roller, Box::new(MemoryLoader::default()))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn roller(&mut self) -> &mut R {
        &mut self.roller
    }

    pub fn store(&self) -> &SavedFunctions {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SavedFunctions {
        &mut self.store
    }

    /// Parses and evaluates `input`.
    pub fn evaluate(&mut self, input: &str) -> DResult<Evaluation> {
        let expression = parse(input)?;
        self.evaluate_expression(expression)
    }

    pub fn evaluate_expression(&mut self, expression: Expression) -> DResult<Evaluation> {
        self.history = FunctionHistory::new();
        self.depth = 0;
        let result = self.eval(&expression);
        let history = std::mem::take(&mut self.history);
        let value = result?;

        self.store.save_transient_expr("_last", expression.clone());
        self.store.save_transient("_ans", value.clone());
        Ok(Evaluation {
            expression,
            value,
            history,
        })
    }

    /// Evaluates a subexpression as part of the evaluation in progress.
    pub fn eval(&mut self, expr: &Expression) -> DResult<Value> {
        expr.accept(self)
    }

    /// Parses `source` and saves it as `name`.
    pub fn save(&mut self, name: &str, source: &str) -> DResult<()> {
        let expr = parse(source)?;
        self.store.save(name, expr)
    }

    pub fn unsave(&mut self, name: &str) -> DResult<()> {
        self.store.unsave(name)
    }

    /// A session-local variable such as `_ans` or `_u`.
    pub fn variable(&self, name: &str) -> Option<&Expression> {
        self.store.transient(name)
    }

    pub(crate) fn set_variable(&mut self, name: &str, value: Value) {
        self.store.save_transient(name, value);
    }

    pub(crate) fn clear_variable(&mut self, name: &str) {
        self.store.clear_transient(name);
    }

    /// Fails if `count` random draws would exceed the operation limit.
    pub(crate) fn check_limit(&self, count: usize) -> DResult<()> {
        if count > self.limit || self.limit == 0 {
            Err(DiceError::LimitExceeded(self.limit))
        } else {
            Ok(())
        }
    }

    pub(crate) fn roll_die(&mut self, sides: u64) -> Number {
        self.roller.roll_die(sides)
    }

    /// Evaluates a saved expression, in a new call frame when `args` is given.
    fn nested(&mut self, expr: &Expression, args: Option<Vec<Expression>>) -> DResult<Value> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(DiceError::argument("too many nested references"));
        }
        let framed = args.is_some();
        if let Some(args) = args {
            self.store.push_frame(args);
        }
        self.depth += 1;
        let result = self.eval(expr);
        self.depth -= 1;
        if framed {
            self.store.pop_frame();
        }
        result
    }

    /// Evaluates a positional argument in the scope of the caller.
    fn argument(&mut self, index: usize) -> DResult<Value> {
        let arg = self.store.lookup_positional(index)?;
        let frame = self.store.pop_frame();
        let result = self.eval(&arg);
        if let Some(frame) = frame {
            self.store.push_frame(frame);
        }
        result
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(
            Config::from_env(),
            rand::thread_rng(),
            Box::new(MemoryLoader::default()),
        )
    }
}

impl<R: Randomizer> AstVisitor for Session<R> {
    type Output = DResult<Value>;

    fn visit_literal(&mut self, x: &Number) -> Self::Output {
        Ok(Value::Number(*x))
    }

    fn visit_list(&mut self, items: &[Expression]) -> Self::Output {
        let items = items
            .iter()
            .map(|item| self.eval(item))
            .collect::<DResult<Vec<_>>>()?;
        Ok(Value::List(items))
    }

    fn visit_string(&mut self, s: &str) -> Self::Output {
        Ok(Value::String(s.to_string()))
    }

    fn visit_var(&mut self, name: &str) -> Self::Output {
        if let Some(index) = positional_index(name) {
            return self.argument(index);
        }
        let expr = self.store.resolve(name)?;
        self.nested(&expr, None)
    }

    fn visit_operation(&mut self, op: &Operation) -> Self::Output {
        let value = match op {
            Operation::Prefix(o, r) => o.operate(self, r)?,
            Operation::Binary(l, o, r) => o.operate(self, l, r)?,
            Operation::Postfix(l, o) => o.operate(self, l)?,
        };

        let code = op.to_string();
        if !value.is_finite() {
            return Err(DiceError::argument(format!("{} is out of range", code)));
        }
        if code != value.to_code() {
            let text = format!("{} => {}", code, value);
            tracing::trace!("{}", text);
            self.history.push(HistoryEntry::new(op.priority(), text));
        }
        Ok(value)
    }

    fn visit_call(&mut self, name: &str, args: &[Expression]) -> Self::Output {
        if positional_index(name).is_some() {
            return Err(DiceError::argument(format!("{{{}}} is a parameter, not a function", name)));
        }
        let expr = self.store.resolve(name)?;
        self.nested(&expr, Some(args.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::ScriptedRoller;
    use crate::test_utils::scripted as session;

    fn check(s: &str, expected: &str) {
        let value = session(&[1]).evaluate(s).unwrap().value;
        assert_eq!(value.to_code(), expected);
    }

    fn check_err(s: &str, expected: DiceError) {
        assert_eq!(session(&[1]).evaluate(s), Err(expected));
    }

    #[test]
    fn test_arith() {
        check("3/-2", "(-1.5)");
        check("2*(-1+5)", "8");
        check("2^10", "1024");
        check("1 - 3", "(-2)");
        check("#[1,2,3]", "3");
        check("$[1,2,3]", "6");
    }

    #[test]
    fn test_join() {
        check("[1,2] + 3", "[1,2,3]");
        check(r#""Hello" + [32] + "World""#, r#""Hello World""#);
        check(r#""a" + 1"#, r#""a1""#);
    }

    #[test]
    fn test_errors() {
        check_err("1/0", DiceError::argument("cannot divide by zero"));
        check_err("{nope}", DiceError::UnknownReference("nope".to_string()));
        check_err("{1}", DiceError::argument("{1} used outside of a function"));
    }

    #[test]
    fn test_history() {
        let eval = session(&[3, 1, 5]).evaluate("3d6 + 4").unwrap();
        assert_eq!(eval.value.to_code(), "[3,1,5,4]");
        assert_eq!(eval.value.as_single().value, 13.0);
        let texts: Vec<_> = eval.history.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["(3d6) => 9 [3, 1, 5]", "((3d6)+4) => 13 [3, 1, 5, 4]"]);

        // Operations that only restate their result leave no trace.
        let eval = session(&[1]).evaluate("(-2)").unwrap();
        assert!(eval.history.is_empty());
    }

    #[test]
    fn test_transients() {
        let mut s = session(&[4]);
        s.evaluate("2d6").unwrap();
        assert_eq!(s.variable("_ans").map(Expression::to_code).as_deref(), Some("[4,4]"));
        assert_eq!(s.variable("_last").map(Expression::to_code).as_deref(), Some("(2d6)"));
        assert_eq!(s.evaluate("{_ans} + 1").unwrap().value.to_code(), "[4,4,1]");

        assert!(s.evaluate("1/0").is_err());
        assert_eq!(s.variable("_last").map(Expression::to_code).as_deref(), Some("({_ans}+1)"));
    }

    #[test]
    fn test_functions() {
        let mut s = session(&[1]);
        s.save("twice", "{1} * 2").unwrap();
        s.save("add", "{1} + {2}").unwrap();
        assert_eq!(s.evaluate("{twice, 21}").unwrap().value.to_code(), "42");
        assert_eq!(s.evaluate("{add, 1, {twice, 3}}").unwrap().value.to_code(), "7");
        assert!(s.evaluate("{add, 1}").is_err());
        assert_eq!(s.store().depth(), 0);

        // Arguments see the caller's parameters, not the callee's.
        s.save("outer", "{twice, {1}}").unwrap();
        assert_eq!(s.evaluate("{outer, 5}").unwrap().value.to_code(), "10");

        s.save("loop", "{loop}").unwrap();
        assert!(matches!(s.evaluate("{loop}"), Err(DiceError::Argument(_))));
        assert_eq!(s.store().depth(), 0);
    }

    #[test]
    fn test_builtin_dice() {
        let mut s = session(&[5]);
        assert_eq!(s.evaluate("{!d}").unwrap().value.to_code(), "5");
        assert_eq!(s.evaluate("{!c}").unwrap().value.to_code(), "1");
    }

    #[test]
    fn test_limit() {
        let mut s = Session::new(
            Config::new(3),
            ScriptedRoller::new(vec![1]),
            Box::new(MemoryLoader::default()),
        );
        assert!(s.evaluate("3d6").is_ok());
        assert_eq!(s.evaluate("4d6"), Err(DiceError::LimitExceeded(3)));
    }
}
