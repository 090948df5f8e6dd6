//! Render-time values and the variable context

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use super::registry::Registry;
use crate::component::error::RenderError;

type NativeBody = dyn Fn(&Registry, Vec<Value>) -> Result<Value, RenderError>;

/// A function provided by the host, callable from scripts
#[derive(Clone)]
pub struct Native {
    name: String,
    body: Rc<NativeBody>,
}

impl Native {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Registry, Vec<Value>) -> Result<Value, RenderError> + 'static,
    {
        Native {
            name: name.into(),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, registry: &Registry, args: Vec<Value>) -> Result<Value, RenderError> {
        (self.body)(registry, args)
    }
}

/// Deferred caller content; invoking it renders the content under the given context
#[derive(Clone)]
pub struct ChildrenFn(Rc<dyn Fn(Context)>);

impl ChildrenFn {
    pub fn new<F: Fn(Context) + 'static>(body: F) -> Self {
        ChildrenFn(Rc::new(body))
    }

    pub fn call(&self, context: Context) {
        (self.0)(context)
    }
}

/// A parameterless callback, used for fill signaling
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn()>);

impl Callback {
    pub fn new<F: Fn() + 'static>(body: F) -> Self {
        Callback(Rc::new(body))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
    Object(BTreeMap<String, Value>),
    Function(Native),
    Children(ChildrenFn),
    Callback(Callback),
}

impl Value {
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(value) => *value,
            Value::Int(value) => *value != 0,
            Value::Str(value) => !value.is_empty(),
            Value::Object(_) | Value::Function(_) | Value::Children(_) | Value::Callback(_) => true,
        }
    }

    /// Text written by `echo`
    pub fn to_output(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(value) => value.to_string(),
            Value::Int(value) => value.to_string(),
            Value::Str(value) => value.clone(),
            Value::Object(_) | Value::Function(_) | Value::Children(_) | Value::Callback(_) => {
                String::new()
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.body, &b.body),
            (Value::Children(a), Value::Children(b)) => Rc::ptr_eq(&a.0, &b.0),
            (Value::Callback(a), Value::Callback(b)) => Rc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(value) => write!(f, "Bool({})", value),
            Value::Int(value) => write!(f, "Int({})", value),
            Value::Str(value) => write!(f, "Str({:?})", value),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Function(native) => write!(f, "Function({})", native.name),
            Value::Children(_) => write!(f, "Children"),
            Value::Callback(_) => write!(f, "Callback"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<ChildrenFn> for Value {
    fn from(value: ChildrenFn) -> Self {
        Value::Children(value)
    }
}

impl From<Callback> for Value {
    fn from(value: Callback) -> Self {
        Value::Callback(value)
    }
}

/// Variables visible to a rendering scope. Passed by value: every scope works on its
/// own copy.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Context(BTreeMap<String, Value>);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Context::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Context(map)
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Context(iter.into_iter().collect())
    }
}

/// Escapes text for HTML output
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(Value::str("x").is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Object(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn test_callables_compare_by_identity() {
        let callback = Callback::new(|| {});
        let same = Value::Callback(callback.clone());
        assert_eq!(Value::Callback(callback), same);
        assert_ne!(Value::Callback(Callback::new(|| {})), same);
    }

    #[test]
    fn test_context_builder() {
        let context = Context::new().with("a", 1i64).with("b", "two");
        assert_eq!(context.get("a"), Some(&Value::Int(1)));
        assert_eq!(context.get("b").and_then(Value::as_str), Some("two"));
        assert_eq!(context.len(), 2);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
