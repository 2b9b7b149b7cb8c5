//! Generated Units
//!
//! Synthesis builds these values; [`crate::render`] turns them into text.
//! Keeping the two apart lets tests ask *what* was generated (which
//! operations, which intrinsics they call) without matching on output text.

use crate::descriptor::RegisterType;
use crate::synth::Operation;

/// A typed parameter, `ty` already spelled as it should be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Param {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// What a call expression calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// A platform entry point; must be present in the catalog
    Intrinsic(String),
    /// A member of the enclosing type
    Method(String),
    /// A generated free function
    Function(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A name in scope: parameter, field, template parameter or constant
    Ident(String),
    /// `object.field`
    Field(String, String),
    Call {
        callee: Callee,
        template_arg: Option<String>,
        args: Vec<Expr>,
    },
    /// `reinterpret_cast<ty>(expr)`
    Cast(String, Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn field(object: impl Into<String>, field: impl Into<String>) -> Self {
        Expr::Field(object.into(), field.into())
    }

    pub fn intrinsic(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Intrinsic(name.into()),
            template_arg: None,
            args,
        }
    }

    pub fn method(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Method(name.into()),
            template_arg: None,
            args,
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Callee::Function(name.into()),
            template_arg: None,
            args,
        }
    }

    pub fn cast(ty: impl Into<String>, expr: Expr) -> Self {
        Expr::Cast(ty.into(), Box::new(expr))
    }

    /// Attach an explicit template argument to a call; no-op otherwise
    pub fn with_template_arg(self, arg: impl Into<String>) -> Self {
        match self {
            Expr::Call { callee, args, .. } => Expr::Call {
                callee,
                template_arg: Some(arg.into()),
                args,
            },
            other => other,
        }
    }

    fn visit_calls<'a>(&'a self, found: &mut Vec<&'a Callee>) {
        match self {
            Expr::Call { callee, args, .. } => {
                found.push(callee);
                for arg in args {
                    arg.visit_calls(found);
                }
            }
            Expr::Cast(_, inner) => inner.visit_calls(found),
            Expr::Ident(_) | Expr::Field(_, _) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Return(Expr),
    /// `target = expr;`
    Assign(String, Expr),
    /// Expression evaluated for its effect
    Eval(Expr),
}

impl Stmt {
    fn expr(&self) -> &Expr {
        match self {
            Stmt::Return(e) | Stmt::Assign(_, e) | Stmt::Eval(e) => e,
        }
    }
}

fn calls_in<'a>(stmts: &'a [Stmt], extra: Option<&'a Expr>) -> Vec<&'a Callee> {
    let mut found = Vec::new();
    if let Some(e) = extra {
        e.visit_calls(&mut found);
    }
    for stmt in stmts {
        stmt.expr().visit_calls(&mut found);
    }
    found
}

fn intrinsic_names(callees: Vec<&Callee>) -> Vec<String> {
    callees
        .into_iter()
        .filter_map(|c| match c {
            Callee::Intrinsic(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// The shape of a struct member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// Constructor, optionally initializing `v`
    Constructor { init: Option<Expr> },
    /// `T operator<token>(...)`
    Operator { token: &'static str },
    /// `operator <target>()`
    Conversion { target: String },
    /// Named member function
    Method { name: String, ret: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The operation this member implements
    pub op: Operation,
    pub kind: MemberKind,
    /// `template <int NAME>` parameter name, if any
    pub template_param: Option<String>,
    pub params: Vec<Param>,
    pub is_const: bool,
    pub body: Vec<Stmt>,
}

impl Member {
    pub fn new(op: Operation, kind: MemberKind) -> Self {
        Member {
            op,
            kind,
            template_param: None,
            params: Vec::new(),
            is_const: false,
            body: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Param>) -> Self {
        self.params = params;
        self
    }

    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template_param = Some(name.into());
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = body;
        self
    }

    fn init(&self) -> Option<&Expr> {
        match &self.kind {
            MemberKind::Constructor { init } => init.as_ref(),
            _ => None,
        }
    }

    /// Intrinsic entry points this member calls
    pub fn entry_points(&self) -> Vec<String> {
        intrinsic_names(calls_in(&self.body, self.init()))
    }

    /// Other members of the same type this member calls
    pub fn method_calls(&self) -> Vec<String> {
        calls_in(&self.body, self.init())
            .into_iter()
            .filter_map(|c| match c {
                Callee::Method(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Name this member is called by from other members, if any
    pub fn method_name(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Method { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// One binding type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub register: RegisterType,
    pub members: Vec<Member>,
}

impl StructDef {
    /// Operations this type ended up with, in emission order
    pub fn operations(&self) -> Vec<Operation> {
        self.members.iter().map(|m| m.op).collect()
    }

    pub fn has(&self, op: Operation) -> bool {
        self.members.iter().any(|m| m.op == op)
    }

    pub fn member(&self, op: Operation) -> Option<&Member> {
        self.members.iter().find(|m| m.op == op)
    }
}

/// A `static inline` non-member function over one binding type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeFunction {
    pub name: String,
    pub ret: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

/// Predicate accepting exactly the generated type names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityConstraint {
    pub name: String,
    pub members: Vec<String>,
}

impl CapabilityConstraint {
    pub fn accepts(&self, type_name: &str) -> bool {
        self.members.iter().any(|m| m == type_name)
    }
}

/// Algorithm written once over every type the constraint accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericAlgorithm {
    pub name: String,
    /// Constraint the type parameter `T` must satisfy
    pub constraint: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Struct(StructDef),
    Function(FreeFunction),
    Constraint(CapabilityConstraint),
    Generic(GenericAlgorithm),
}

impl Unit {
    /// Every intrinsic entry point referenced by this unit
    pub fn entry_points(&self) -> Vec<String> {
        match self {
            Unit::Struct(s) => s.members.iter().flat_map(|m| m.entry_points()).collect(),
            Unit::Function(f) => intrinsic_names(calls_in(&f.body, None)),
            Unit::Generic(g) => intrinsic_names(calls_in(&g.body, None)),
            Unit::Constraint(_) => Vec::new(),
        }
    }
}
