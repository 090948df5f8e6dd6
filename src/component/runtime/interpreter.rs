//! Tree-walking interpreter for generated scripts

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{debug, trace};

use super::dispatch::{SlotDispatcher, SlotKeys};
use super::registry::{first_defined, Fragment, Registry};
use super::value::{escape_html, ChildrenFn, Context, Native, Value};
use crate::component::config::ComponentConfig;
use crate::component::error::RenderError;
use crate::component::script::{BinaryOp, Expr, Literal, Stmt};

/// Name under which a call's `with {...}` object is visible in the fragment body
pub const ATTRIBUTES: &str = "attributes";

struct Shared {
    keys: SlotKeys,
    natives: BTreeMap<String, Native>,
    registry: RefCell<Registry>,
    output: RefCell<String>,
    globals: RefCell<Context>,
    /// First error raised inside caller content invoked through a native
    parked: RefCell<Option<RenderError>>,
}

/// Variables of one block plus the caller content `children;` renders
#[derive(Clone)]
struct Scope {
    vars: Context,
    block: Option<ChildrenFn>,
    root: bool,
}

impl Scope {
    fn nested(&self) -> Scope {
        Scope {
            vars: self.vars.clone(),
            block: self.block.clone(),
            root: false,
        }
    }
}

/// Runs a script program and collects its output.
///
/// Handles are cheap to clone and share their state, which lets caller-content closures
/// write into the same output buffer as the fragment invoking them.
#[derive(Clone)]
pub struct Interpreter {
    shared: Rc<Shared>,
}

impl Interpreter {
    /// Builds an interpreter with the slot dispatcher and the disambiguation helper
    /// registered under their configured names.
    pub fn new(config: &ComponentConfig) -> Self {
        let keys = SlotKeys::from_config(&config.slots);
        let mut natives = BTreeMap::new();

        let dispatcher = SlotDispatcher::new(keys.clone());
        let dispatcher_name = config.slots.dispatcher.clone();
        natives.insert(
            dispatcher_name.clone(),
            Native::new(dispatcher_name.clone(), move |_, args| {
                let mut args = args.into_iter();
                let name = match args.next() {
                    Some(Value::Str(name)) => name,
                    other => {
                        return Err(RenderError::BadArguments {
                            function: dispatcher_name.clone(),
                            message: format!("expected a slot name, got {:?}", other),
                        })
                    }
                };
                let context = match args.next() {
                    Some(Value::Object(map)) => Context::from(map),
                    _ => Context::new(),
                };
                Ok(Value::Bool(dispatcher.dispatch(&name, &context)))
            }),
        );

        let helper_name = config.helpers.first_defined.clone();
        natives.insert(
            helper_name.clone(),
            Native::new(helper_name.clone(), move |registry, args| {
                let candidates = args
                    .into_iter()
                    .map(|arg| match arg {
                        Value::Str(name) => Ok(name),
                        other => Err(RenderError::BadArguments {
                            function: helper_name.clone(),
                            message: format!("expected a fragment name, got {:?}", other),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                first_defined(registry, candidates.as_slice()).map(Value::Str)
            }),
        );

        Interpreter {
            shared: Rc::new(Shared {
                keys,
                natives,
                registry: RefCell::new(Registry::new()),
                output: RefCell::new(String::new()),
                globals: RefCell::new(Context::new()),
                parked: RefCell::new(None),
            }),
        }
    }

    /// Renders `program` with `context` as its root variables
    pub fn run(&self, program: &[Stmt], context: Context) -> Result<String, RenderError> {
        self.shared.output.borrow_mut().clear();
        self.shared.parked.borrow_mut().take();
        *self.shared.globals.borrow_mut() = context.clone();

        for stmt in program {
            if let Stmt::Fragment { name, params, body } = stmt {
                self.define(name, params, body);
            }
        }

        let mut scope = Scope {
            vars: context,
            block: None,
            root: true,
        };
        self.exec_block(program, &mut scope)?;
        self.take_parked()?;
        Ok(std::mem::take(&mut *self.shared.output.borrow_mut()))
    }

    /// Names of every fragment defined so far
    pub fn fragment_names(&self) -> Vec<String> {
        self.shared.registry.borrow().names().cloned().collect()
    }

    fn define(&self, name: &str, params: &[String], body: &Rc<[Stmt]>) {
        trace!("defining fragment '{}'", name);
        self.shared.registry.borrow_mut().define(
            name,
            Fragment {
                params: params.to_vec(),
                body: Rc::clone(body),
            },
        );
    }

    fn park(&self, err: RenderError) {
        let mut parked = self.shared.parked.borrow_mut();
        if parked.is_none() {
            *parked = Some(err);
        }
    }

    fn take_parked(&self) -> Result<(), RenderError> {
        match self.shared.parked.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn exec_block(&self, stmts: &[Stmt], scope: &mut Scope) -> Result<(), RenderError> {
        for stmt in stmts {
            self.exec(stmt, scope)?;
        }
        Ok(())
    }

    fn exec(&self, stmt: &Stmt, scope: &mut Scope) -> Result<(), RenderError> {
        match stmt {
            Stmt::Assign(name, expr) => {
                let value = self.eval(expr, scope)?;
                if scope.root {
                    self.shared
                        .globals
                        .borrow_mut()
                        .insert(name.clone(), value.clone());
                }
                scope.vars.insert(name.clone(), value);
            }
            Stmt::Echo(expr) => {
                let text = self.eval(expr, scope)?.to_output();
                self.shared.output.borrow_mut().push_str(&text);
            }
            Stmt::Expr(expr) => {
                self.eval(expr, scope)?;
            }
            Stmt::If {
                condition,
                then,
                otherwise,
            } => {
                let branch = if self.eval(condition, scope)?.is_truthy() {
                    then
                } else {
                    otherwise
                };
                self.exec_block(branch, &mut scope.nested())?;
            }
            Stmt::Scope(body) => self.exec_block(body, &mut scope.nested())?,
            Stmt::Fragment { name, params, body } => self.define(name, params, body),
            Stmt::Call {
                name,
                args,
                attributes,
                content,
            } => self.call_fragment(name, args, attributes.as_ref(), content, scope)?,
            Stmt::Children => {
                if let Some(block) = &scope.block {
                    block.call(Context::new());
                    self.take_parked()?;
                }
            }
        }
        Ok(())
    }

    fn call_fragment(
        &self,
        name: &Expr,
        args: &[Expr],
        attributes: Option<&Expr>,
        content: &Rc<[Stmt]>,
        scope: &Scope,
    ) -> Result<(), RenderError> {
        let name = match self.eval(name, scope)? {
            Value::Str(name) => name,
            other => {
                return Err(RenderError::NotCallable {
                    name: format!("{:?}", other),
                })
            }
        };
        let fragment = self
            .shared
            .registry
            .borrow()
            .get(&name)
            .cloned()
            .ok_or_else(|| RenderError::FragmentNotFound { name: name.clone() })?;

        let mut vars = self.shared.globals.borrow().clone();
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, scope)?);
        }
        let mut values = values.into_iter();
        for param in &fragment.params {
            vars.insert(param.clone(), values.next().unwrap_or(Value::Null));
        }
        let attributes = match attributes {
            Some(expr) => self.eval(expr, scope)?,
            None => Value::Object(BTreeMap::new()),
        };
        vars.insert(ATTRIBUTES, attributes);

        let children = self.caller_content(content, scope);
        vars.insert(self.shared.keys.children_variable.clone(), children.clone());

        debug!("calling fragment '{}'", name);
        let mut body_scope = Scope {
            vars,
            block: Some(children),
            root: false,
        };
        self.exec_block(&fragment.body, &mut body_scope)
    }

    /// Wraps a call's content into a closure rendering it in the caller's scope.
    ///
    /// The context handed to the closure contributes only the slot variable and fill
    /// callbacks; everything else comes from the caller. When the caller is itself a
    /// fragment body, its own caller content stays visible under the children key, so a
    /// `slot` inside the content forwards to it.
    fn caller_content(&self, content: &Rc<[Stmt]>, scope: &Scope) -> ChildrenFn {
        let interpreter = self.clone();
        let content = Rc::clone(content);
        let captured = scope.vars.clone();
        let block = scope.block.clone();

        ChildrenFn::new(move |context: Context| {
            let mut vars = captured.clone();
            for (key, value) in context.iter() {
                if interpreter.shared.keys.is_reserved(key) {
                    vars.insert(key.clone(), value.clone());
                }
            }
            let mut scope = Scope {
                vars,
                block: block.clone(),
                root: false,
            };
            if let Err(err) = interpreter.exec_block(&content, &mut scope) {
                interpreter.park(err);
            }
        })
    }

    fn eval(&self, expr: &Expr, scope: &Scope) -> Result<Value, RenderError> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Null => Value::Null,
                Literal::Bool(value) => Value::Bool(*value),
                Literal::Int(value) => Value::Int(*value),
                Literal::Str(value) => Value::Str(value.clone()),
            }),
            Expr::Var(name) => Ok(scope.vars.get(name).cloned().unwrap_or(Value::Null)),
            Expr::Path(path) => Ok(self
                .shared
                .natives
                .get(&path.join("::"))
                .cloned()
                .map(Value::Function)
                .unwrap_or(Value::Null)),
            Expr::Member(object, field) => Ok(match self.eval(object, scope)? {
                Value::Object(map) => map.get(field).cloned().unwrap_or(Value::Null),
                _ => Value::Null,
            }),
            Expr::Call { callee, args } => self.call(callee, args, scope),
            Expr::Object(pairs) => {
                let mut map = BTreeMap::new();
                for (key, value) in pairs {
                    map.insert(key.clone(), self.eval(value, scope)?);
                }
                Ok(Value::Object(map))
            }
            Expr::Not(inner) => Ok(Value::Bool(!self.eval(inner, scope)?.is_truthy())),
            Expr::Binary(op, left, right) => {
                let left = self.eval(left, scope)?;
                match op {
                    BinaryOp::Eq => Ok(Value::Bool(left == self.eval(right, scope)?)),
                    BinaryOp::Ne => Ok(Value::Bool(left != self.eval(right, scope)?)),
                    BinaryOp::And if !left.is_truthy() => Ok(left),
                    BinaryOp::Or if left.is_truthy() => Ok(left),
                    BinaryOp::And | BinaryOp::Or => self.eval(right, scope),
                }
            }
        }
    }

    fn call(&self, callee: &[String], args: &[Expr], scope: &Scope) -> Result<Value, RenderError> {
        let path = callee.join("::");
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, scope)?);
        }

        match path.as_str() {
            "defined_vars" => return Ok(Value::Object(scope.vars.clone().into_inner())),
            "escape" => {
                let text = values.first().map(Value::to_output).unwrap_or_default();
                return Ok(Value::Str(escape_html(&text)));
            }
            _ => {}
        }

        let native = match (callee, scope.vars.get(&path)) {
            ([_], Some(Value::Function(native))) => native.clone(),
            ([_], Some(Value::Callback(fill))) => {
                fill.call();
                return Ok(Value::Null);
            }
            ([_], Some(_)) => return Err(RenderError::NotCallable { name: path }),
            _ => self
                .shared
                .natives
                .get(&path)
                .cloned()
                .ok_or(RenderError::NotCallable { name: path })?,
        };

        let registry = self.shared.registry.borrow().clone();
        let result = native.call(&registry, values);
        self.take_parked()?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::script::parse_program;

    fn render(source: &str, context: Context) -> Result<String, RenderError> {
        let program = parse_program(source).expect("script parses");
        Interpreter::new(&ComponentConfig::default()).run(&program, context)
    }

    #[test]
    fn test_echo_and_branches() {
        let output = render(
            r#"x = "a"; if x == "a" { echo "yes"; } else { echo "no"; }"#,
            Context::new(),
        )
        .unwrap();
        assert_eq!(output, "yes");
    }

    #[test]
    fn test_nested_scope_does_not_leak() {
        let output = render(r#"x = "outer"; { x = "inner"; } echo x;"#, Context::new()).unwrap();
        assert_eq!(output, "outer");
    }

    #[test]
    fn test_call_binds_params_and_children() {
        let source = r#"
            fragment "wrap"(label) { echo "["; echo label; children; echo "]"; }
            call "wrap"("x") { echo "body"; }
        "#;
        assert_eq!(render(source, Context::new()).unwrap(), "[xbody]");
    }

    #[test]
    fn test_root_variables_are_global() {
        let source = r#"
            greeting = "hi";
            fragment "show"() { echo greeting; }
            call "show"();
        "#;
        assert_eq!(render(source, Context::new()).unwrap(), "hi");
    }

    #[test]
    fn test_unknown_fragment() {
        let err = render(r#"call "missing"();"#, Context::new()).unwrap_err();
        assert_eq!(
            err,
            RenderError::FragmentNotFound {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_escape_intrinsic() {
        let output = render(r#"echo escape(v);"#, Context::new().with("v", "<b>")).unwrap();
        assert_eq!(output, "&lt;b&gt;");
    }

    #[test]
    fn test_fragments_are_hoisted() {
        let program = parse_program(r#"call "late"(); fragment "late"() { echo "ok"; }"#)
            .expect("script parses");
        let interpreter = Interpreter::new(&ComponentConfig::default());
        assert_eq!(interpreter.run(&program, Context::new()).unwrap(), "ok");
        assert_eq!(interpreter.fragment_names(), vec!["late".to_string()]);
    }

    #[test]
    fn test_callback_variables_are_callable() {
        let flag = crate::component::runtime::dispatch::FillFlag::new();
        let source = "fill && fill(); missing && missing();";
        let output = render(source, Context::new().with("fill", flag.callback())).unwrap();
        assert_eq!(output, "");
        assert!(flag.is_filled());
    }

    #[test]
    fn test_first_defined_native() {
        let source = r#"
            fragment "b"() { echo "B"; }
            call (component_slots::first_defined("a", "b"))();
        "#;
        assert_eq!(render(source, Context::new()).unwrap(), "B");
    }

    #[test]
    fn test_error_inside_caller_content_surfaces() {
        let source = r#"
            fragment "wrap"() { children; }
            call "wrap"() { call "missing"(); }
        "#;
        assert!(matches!(
            render(source, Context::new()),
            Err(RenderError::FragmentNotFound { .. })
        ));
    }
}
