//! C++ text rendering of Generated Units.

use crate::unit::{
    Callee, CapabilityConstraint, Expr, FreeFunction, GenericAlgorithm, Member, MemberKind,
    Param, Stmt, StructDef, Unit,
};
use std::fmt::{self, Write as _};

const INDENT: &str = "    ";

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `const T &name`, `float *dst`, but `float value`
        if self.ty.ends_with('&') || self.ty.ends_with('*') {
            write!(f, "{}{}", self.ty, self.name)
        } else {
            write!(f, "{} {}", self.ty, self.name)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => f.write_str(name),
            Expr::Field(object, field) => write!(f, "{}.{}", object, field),
            Expr::Call {
                callee,
                template_arg,
                args,
            } => {
                let name = match callee {
                    Callee::Intrinsic(n) | Callee::Method(n) | Callee::Function(n) => n,
                };
                f.write_str(name)?;
                if let Some(arg) = template_arg {
                    write!(f, "<{}>", arg)?;
                }
                f.write_str("(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::Cast(ty, inner) => write!(f, "reinterpret_cast<{}>({})", ty, inner),
        }
    }
}

fn write_list<T: fmt::Display>(out: &mut impl fmt::Write, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write!(out, "{}", item)?;
    }
    Ok(())
}

fn write_block(out: &mut String, indent: &str, body: &[Stmt]) -> fmt::Result {
    writeln!(out, "{}{{", indent)?;
    for stmt in body {
        match stmt {
            Stmt::Return(e) => writeln!(out, "{}{}return {};", indent, INDENT, e)?,
            Stmt::Assign(target, e) => writeln!(out, "{}{}{} = {};", indent, INDENT, target, e)?,
            Stmt::Eval(e) => writeln!(out, "{}{}{};", indent, INDENT, e)?,
        }
    }
    writeln!(out, "{}}}", indent)
}

fn render_member(out: &mut String, type_name: &str, member: &Member) -> fmt::Result {
    if let Some(param) = &member.template_param {
        writeln!(out, "{}template <int {}>", INDENT, param)?;
    }

    out.push_str(INDENT);
    match &member.kind {
        MemberKind::Constructor { .. } => out.push_str(type_name),
        MemberKind::Operator { token } => write!(out, "{} operator{}", type_name, token)?,
        MemberKind::Conversion { target } => write!(out, "operator {}", target)?,
        MemberKind::Method { name, ret } => write!(out, "{} {}", ret, name)?,
    }
    out.push('(');
    write_list(out, &member.params)?;
    out.push(')');
    if member.is_const {
        out.push_str(" const");
    }
    out.push_str(" noexcept");

    match &member.kind {
        MemberKind::Constructor { init: Some(init) } => {
            writeln!(out, " :")?;
            writeln!(out, "{}{}v{{ {} }}", INDENT, INDENT, init)?;
        }
        _ => out.push('\n'),
    }
    write_block(out, INDENT, &member.body)
}

fn render_struct(out: &mut String, def: &StructDef) -> fmt::Result {
    writeln!(out, "struct {}", def.name)?;
    writeln!(out, "{{")?;
    writeln!(out, "public:")?;
    writeln!(out, "{}using value_type = {};", INDENT, def.register)?;
    for member in &def.members {
        out.push('\n');
        render_member(out, &def.name, member)?;
    }
    writeln!(out)?;
    writeln!(out, "public:")?;
    writeln!(out, "{}{} v;", INDENT, def.register)?;
    writeln!(out, "}};")
}

fn render_function(out: &mut String, func: &FreeFunction) -> fmt::Result {
    write!(out, "static inline {} {}(", func.ret, func.name)?;
    write_list(out, &func.params)?;
    writeln!(out, ") noexcept")?;
    write_block(out, "", &func.body)
}

fn render_constraint(out: &mut String, constraint: &CapabilityConstraint) -> fmt::Result {
    writeln!(out, "template <class T>")?;
    if constraint.members.is_empty() {
        return writeln!(out, "concept {} = false;", constraint.name);
    }
    writeln!(out, "concept {} =", constraint.name)?;
    let last = constraint.members.len() - 1;
    for (i, name) in constraint.members.iter().enumerate() {
        let sep = if i == last { ";" } else { " ||" };
        writeln!(out, "{}std::same_as<T, {}>{}", INDENT, name, sep)?;
    }
    Ok(())
}

fn render_generic(out: &mut String, generic: &GenericAlgorithm) -> fmt::Result {
    writeln!(out, "template <{} T>", generic.constraint)?;
    write!(out, "inline T {}(", generic.name)?;
    write_list(out, &generic.params)?;
    writeln!(out, ") noexcept")?;
    write_block(out, "", &generic.body)
}

/// Append one unit's text to `out`
pub fn render_unit(out: &mut String, unit: &Unit) -> fmt::Result {
    match unit {
        Unit::Struct(def) => render_struct(out, def),
        Unit::Function(func) => render_function(out, func),
        Unit::Constraint(c) => render_constraint(out, c),
        Unit::Generic(g) => render_generic(out, g),
    }
}
