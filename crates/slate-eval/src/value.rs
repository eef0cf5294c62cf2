//! Runtime values produced by the interpreter.
//!
//! Worksheet output is text, so every value knows how to render itself in
//! the form a reader of the annotated sheet expects: strings and chars
//! without quotes, floating-point numbers always with a decimal point,
//! collections as `List(1, 2, 3)`, and instances as `Name(args)`.

use slate_types::ast::DefDef;

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Unit,
    /// A `List(...)` or `Seq(...)` collection.
    List(Vec<Value>),
    /// A `Some(...)` or `None` optional.
    Opt(Option<Box<Value>>),
    /// An instance of a user-declared class, trait refinement, or object.
    Instance(Instance),
}

/// An instantiated class, anonymous refinement, or object singleton.
///
/// Methods are collected once at instantiation time, nearest declaration
/// first, so dispatch is a linear scan over `methods`.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub type_name: String,
    pub kind: InstanceKind,
    /// Constructor parameters and evaluated `val` members, in declaration order.
    pub fields: Vec<(String, Value)>,
    /// Concrete methods visible on this instance.
    pub methods: Vec<DefDef>,
}

/// How an instance came to exist, which decides how it renders.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceKind {
    /// `new C(...)` or case-class application; renders as `C(args)`.
    Class { ctor_args: Vec<Value> },
    /// `new T { ... }` over a trait or abstract class; renders as `new T {}`.
    Anon,
    /// The singleton of an `object` declaration; renders as its name.
    Object,
}

impl Value {
    /// Renders the value as it should appear in a worksheet annotation.
    pub fn render(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Float(x) => render_float(*x),
            Value::Double(x) => render_double(*x),
            Value::Bool(b) => b.to_string(),
            Value::Char(c) => c.to_string(),
            Value::Str(s) => s.clone(),
            Value::Unit => "()".to_string(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::render).collect();
                format!("List({})", parts.join(", "))
            }
            Value::Opt(Some(inner)) => format!("Some({})", inner.render()),
            Value::Opt(None) => "None".to_string(),
            Value::Instance(inst) => inst.render(),
        }
    }

    /// The value's type name, for error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "Int".to_string(),
            Value::Long(_) => "Long".to_string(),
            Value::Float(_) => "Float".to_string(),
            Value::Double(_) => "Double".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::Char(_) => "Char".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Unit => "Unit".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Opt(_) => "Option".to_string(),
            Value::Instance(inst) => inst.type_name.clone(),
        }
    }

    /// True for numeric values, the only operands `-`, `*`, and friends accept.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)
        )
    }
}

impl Instance {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Looks up a method by name; first match wins.
    pub fn method(&self, name: &str) -> Option<&DefDef> {
        self.methods.iter().find(|m| m.name.name == name)
    }

    fn render(&self) -> String {
        match &self.kind {
            InstanceKind::Class { ctor_args } => {
                let parts: Vec<String> = ctor_args.iter().map(Value::render).collect();
                format!("{}({})", self.type_name, parts.join(", "))
            }
            InstanceKind::Anon => format!("new {} {{}}", self.type_name),
            InstanceKind::Object => self.type_name.clone(),
        }
    }
}

// Scala-style float rendering: whole numbers keep a trailing `.0`, and the
// IEEE specials spell out as Infinity and NaN rather than `inf`/`NaN`.

fn render_double(x: f64) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if x == x.trunc() {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

fn render_float(x: f32) -> String {
    if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if x == x.trunc() {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}
