//! Per-type member synthesis.

use super::operation::{EntryForm, EntryPoint, METHOD_OPERATIONS, Operation, Resolution};
use crate::catalog::SymbolCatalog;
use crate::descriptor::{ElementFamily, TypeDescriptor};
use crate::unit::{Expr, Member, MemberKind, Param, Stmt, StructDef};
use tracing::debug;

/// Rounding-mode immediates used when floor/ceil route through `round`
const FLOOR_MODE: &str = "_MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC";
const CEIL_MODE: &str = "_MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC";

/// Build the binding type for one descriptor, keeping only the members
/// whose entry points (or fallback routes) exist in `catalog`.
pub fn synthesize_type(desc: &TypeDescriptor, catalog: &SymbolCatalog) -> StructDef {
    let name = desc.name();
    let mut members = Vec::new();

    for op in METHOD_OPERATIONS {
        if !op.applies_to(desc) {
            continue;
        }
        let member = match op.resolve(desc, catalog) {
            Resolution::Always => unconditional_member(op, desc),
            Resolution::Direct(ep) => routed_member(op, &Route::Entry(ep), desc, &name),
            Resolution::Fallback(via) => {
                debug!("{}: {:?} routed through {:?}", name, op, via);
                routed_member(op, &Route::Via(via), desc, &name)
            }
            Resolution::Absent => {
                debug!("{}: omitting {:?}, no entry point", name, op);
                None
            }
        };
        members.extend(member);
    }

    StructDef {
        name,
        register: desc.register(),
        members,
    }
}

/// Where a gated member's work is done
enum Route {
    Entry(EntryPoint),
    Via(Operation),
}

fn self_ref(type_name: &str, param: &str) -> Param {
    Param::new(format!("const {} &", type_name), param)
}

/// Name a member is reachable by when another member routes through it
fn routed_name(op: Operation) -> &'static str {
    match op {
        Operation::Load => "load",
        Operation::Store => "store",
        Operation::LoadUnaligned => "loadu",
        Operation::StoreUnaligned => "storeu",
        Operation::Round => "round",
        Operation::Floor => "floor",
        Operation::Ceil => "ceil",
        Operation::FusedMultiplyAdd => "fmadd",
        Operation::Shuffle => "shuffle",
        Operation::NarrowToBytes => "cvt2uint8",
        Operation::RoundToInt32 => "cvt2int32",
        _ => "",
    }
}

/// Call `route` with `args`; whole-register entry points get their
/// memory operand (the first argument) reinterpreted
fn route_call(route: &Route, desc: &TypeDescriptor, mut args: Vec<Expr>, read_only: bool) -> Expr {
    match route {
        Route::Entry(ep) => {
            if ep.form == EntryForm::WholeRegister && !args.is_empty() {
                let qualifier = if read_only { "const " } else { "" };
                let ptr = args.remove(0);
                args.insert(
                    0,
                    Expr::cast(format!("{}{} *", qualifier, desc.register()), ptr),
                );
            }
            Expr::intrinsic(&ep.name, args)
        }
        Route::Via(op) => Expr::method(routed_name(*op), args),
    }
}

fn method(op: Operation, ret: impl Into<String>) -> Member {
    Member::new(op, MemberKind::Method {
        name: routed_name(op).to_string(),
        ret: ret.into(),
    })
}

/// Members that need no entry point
fn unconditional_member(op: Operation, desc: &TypeDescriptor) -> Option<Member> {
    let register = desc.register();
    let member = match op {
        Operation::DefaultConstructor => Member::new(op, MemberKind::Constructor { init: None }),
        Operation::FromRegister => Member::new(op, MemberKind::Constructor {
            init: Some(Expr::ident("other")),
        })
        .with_params(vec![Param::new(register.to_string(), "other")]),
        Operation::MutableAccessor => Member::new(op, MemberKind::Conversion {
            target: format!("{} &", register),
        })
        .with_body(vec![Stmt::Return(Expr::ident("v"))]),
        Operation::ConstAccessor => Member::new(op, MemberKind::Conversion {
            target: format!("const {} &", register),
        })
        .constant()
        .with_body(vec![Stmt::Return(Expr::ident("v"))]),
        _ => return None,
    };
    Some(member)
}

/// Members backed by an entry point or routed through another member
fn routed_member(
    op: Operation,
    route: &Route,
    desc: &TypeDescriptor,
    type_name: &str,
) -> Option<Member> {
    let register = desc.register();
    let scalar = desc.element.c_type();

    let member = match op {
        Operation::Broadcast => Member::new(op, MemberKind::Constructor {
            init: Some(route_call(route, desc, vec![Expr::ident("value")], true)),
        })
        .with_params(vec![Param::new(scalar, "value")]),
        Operation::PerLane => {
            let lanes: Vec<String> = (0..desc.lanes()).map(|i| format!("_{}", i)).collect();
            Member::new(op, MemberKind::Constructor {
                init: Some(route_call(
                    route,
                    desc,
                    lanes.iter().map(Expr::ident).collect(),
                    true,
                )),
            })
            .with_params(lanes.iter().map(|lane| Param::new(scalar, lane)).collect())
        }
        Operation::Arithmetic(arith) => Member::new(op, MemberKind::Operator {
            token: arith.token(),
        })
        .with_params(vec![self_ref(type_name, "other")])
        .constant()
        .with_body(vec![Stmt::Return(route_call(
            route,
            desc,
            vec![Expr::ident("v"), Expr::field("other", "v")],
            true,
        ))]),
        Operation::Load | Operation::LoadUnaligned => {
            let call = route_call(route, desc, vec![Expr::ident("src")], true);
            let stmt = match route {
                Route::Entry(_) => Stmt::Assign("v".to_string(), call),
                Route::Via(_) => Stmt::Eval(call),
            };
            method(op, "void")
                .with_params(vec![Param::new(format!("const {} *", scalar), "src")])
                .with_body(vec![stmt])
        }
        Operation::Store | Operation::StoreUnaligned => {
            let args = match route {
                Route::Entry(_) => vec![Expr::ident("dst"), Expr::ident("v")],
                Route::Via(_) => vec![Expr::ident("dst")],
            };
            method(op, "void")
                .with_params(vec![Param::new(format!("{} *", scalar), "dst")])
                .with_body(vec![Stmt::Eval(route_call(route, desc, args, false))])
        }
        Operation::NarrowToBytes => method(op, register.level_down().to_string())
            .constant()
            .with_body(vec![Stmt::Return(route_call(
                route,
                desc,
                vec![Expr::ident("v")],
                true,
            ))]),
        Operation::RoundToInt32 => {
            // 32-bit results are half as wide as double lanes
            let target = match desc.family() {
                ElementFamily::Double => register.as_integer().level_down(),
                _ => register.as_integer(),
            };
            method(op, target.to_string())
                .constant()
                .with_body(vec![Stmt::Return(route_call(
                    route,
                    desc,
                    vec![Expr::ident("v")],
                    true,
                ))])
        }
        Operation::FusedMultiplyAdd => method(op, type_name)
            .with_params(vec![self_ref(type_name, "b"), self_ref(type_name, "c")])
            .constant()
            .with_body(vec![Stmt::Return(route_call(
                route,
                desc,
                vec![Expr::ident("v"), Expr::field("b", "v"), Expr::field("c", "v")],
                true,
            ))]),
        Operation::Shuffle => method(op, type_name)
            .with_template("Imm")
            .with_params(vec![self_ref(type_name, "other")])
            .constant()
            .with_body(vec![Stmt::Return(route_call(
                route,
                desc,
                vec![Expr::ident("v"), Expr::field("other", "v"), Expr::ident("Imm")],
                true,
            ))]),
        Operation::Round => method(op, type_name)
            .with_template("Mode")
            .constant()
            .with_body(vec![Stmt::Return(route_call(
                route,
                desc,
                vec![Expr::ident("v"), Expr::ident("Mode")],
                true,
            ))]),
        Operation::Floor | Operation::Ceil => {
            let expr = match route {
                Route::Entry(_) => route_call(route, desc, vec![Expr::ident("v")], true),
                Route::Via(_) => {
                    let mode = if op == Operation::Floor { FLOOR_MODE } else { CEIL_MODE };
                    route_call(route, desc, vec![], true).with_template_arg(mode)
                }
            };
            method(op, type_name)
                .constant()
                .with_body(vec![Stmt::Return(expr)])
        }
        Operation::DefaultConstructor
        | Operation::FromRegister
        | Operation::MutableAccessor
        | Operation::ConstAccessor => return None,
    };
    Some(member)
}
