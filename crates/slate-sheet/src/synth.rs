//! Type-directed synthesis of sample arguments and instances.

use slate_types::ast::{DefDef, Expr, ExprKind, Param, Stmt, TypeDef, TypeExpr, TypeKind, ValDef};
use slate_types::Span;

use crate::pool::SamplePool;

/// Synthesizes a sample expression for `ty`, drawing literals from `pool`
/// and resolving user-defined names against the type definitions visible in
/// `context`. Returns `None` when the type cannot be satisfied.
///
/// Pool cursors advance as draws are made, so a synthesis that fails partway
/// still consumes the draws made before the failing leg. Callers treat
/// `None` as "suppress this node", never as something to retry.
pub fn sample_value(ty: &TypeExpr, context: &[Stmt], pool: &mut SamplePool) -> Option<Expr> {
    match &ty.kind {
        TypeKind::Name(name) => match pool.get(name) {
            Some(literal) => Some(literal),
            None => custom_type_sample(name, context, pool),
        },
        TypeKind::Applied { head, args } => match (head.as_str(), args.as_slice()) {
            ("List" | "Seq", [elem]) => {
                let length = pool.next_collection_length();
                let mut items = Vec::with_capacity(length);
                for _ in 0..length {
                    items.push(sample_value(elem, context, pool)?);
                }
                Some(call(head, items))
            }
            ("Option", [elem]) => {
                if pool.next_option_present() {
                    let inner = sample_value(elem, context, pool)?;
                    Some(call("Some", vec![inner]))
                } else {
                    Some(synthetic(ExprKind::Name("None".to_string())))
                }
            }
            _ => None,
        },
        TypeKind::UpperBounded(bound) => sample_value(bound, context, pool),
        TypeKind::Function { .. } => None,
    }
}

/// Synthesizes one `(name, value)` pair per parameter, preserving group
/// structure. Declared defaults pass through verbatim instead of being
/// sampled. The first unsatisfiable parameter aborts the whole synthesis.
pub fn sample_params(
    groups: &[Vec<Param>],
    context: &[Stmt],
    pool: &mut SamplePool,
) -> Option<Vec<Vec<(String, Expr)>>> {
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        let mut sampled = Vec::with_capacity(group.len());
        for param in group {
            let value = match &param.default {
                Some(default) => default.clone(),
                None => sample_value(&param.declared_type, context, pool)?,
            };
            sampled.push((param.name.name.clone(), value));
        }
        out.push(sampled);
    }
    Some(out)
}

/// Resolves a non-builtin type name against the context: first a concrete
/// type of that exact name, then a concrete type that extends it, then the
/// abstract definition itself for an anonymous refinement.
fn custom_type_sample(name: &str, context: &[Stmt], pool: &mut SamplePool) -> Option<Expr> {
    let defs: Vec<&TypeDef> = context
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Type(def) => Some(def),
            _ => None,
        })
        .collect();

    let resolved = defs
        .iter()
        .find(|d| d.name.name == name && d.is_concrete())
        .or_else(|| defs.iter().find(|d| d.is_concrete() && d.has_parent(name)))
        .or_else(|| defs.iter().find(|d| d.name.name == name))
        .copied()?;

    if resolved.is_concrete() {
        concrete_sample(resolved, context, pool)
    } else {
        abstract_sample(resolved, context, pool)
    }
}

fn concrete_sample(def: &TypeDef, context: &[Stmt], pool: &mut SamplePool) -> Option<Expr> {
    let groups = sample_params(std::slice::from_ref(&def.params), context, pool)?;
    let args: Vec<Expr> = groups
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    if def.is_case {
        Some(call(&def.name.name, args))
    } else {
        Some(synthetic(ExprKind::New {
            class: def.name.clone(),
            args,
            body: None,
        }))
    }
}

/// Builds `new T { impls }` with a synthesized implementation for every
/// abstract member. Abstract classes that take constructor parameters are
/// not sampled.
fn abstract_sample(def: &TypeDef, context: &[Stmt], pool: &mut SamplePool) -> Option<Expr> {
    if !def.params.is_empty() {
        return None;
    }
    let mut impls = Vec::new();
    for member in &def.members {
        match member {
            Stmt::Val(v) if v.init.is_none() => {
                let ty = v.declared_type.as_ref()?;
                let value = sample_value(ty, context, pool)?;
                impls.push(Stmt::Val(ValDef {
                    name: v.name.clone(),
                    declared_type: v.declared_type.clone(),
                    init: Some(value),
                    span: Span::synthetic(),
                }));
            }
            Stmt::Def(d) if d.body.is_none() => {
                let ty = d.declared_type.as_ref()?;
                let body = sample_value(ty, context, pool)?;
                impls.push(Stmt::Def(DefDef {
                    name: d.name.clone(),
                    param_groups: d.param_groups.clone(),
                    declared_type: d.declared_type.clone(),
                    body: Some(body),
                    span: Span::synthetic(),
                }));
            }
            _ => {}
        }
    }
    Some(synthetic(ExprKind::New {
        class: def.name.clone(),
        args: Vec::new(),
        body: Some(impls),
    }))
}

fn synthetic(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::synthetic())
}

fn call(name: &str, args: Vec<Expr>) -> Expr {
    synthetic(ExprKind::Call {
        callee: Box::new(synthetic(ExprKind::Name(name.to_string()))),
        args,
    })
}
