//! `phpty subtype`: decide `SUB <: SUPER`

use super::{class_scope, class_table, load_type, Argument, Context};
use anyhow::bail;
use phpty_types::{NoImports, SubtypingContext};
use serde::Serialize;

#[derive(Serialize)]
struct SubtypeReport {
    sub: String,
    sup: String,
    subtype: bool,
    uncovered: Vec<String>,
}

pub fn execute(
    ctx: &Context,
    sub: &str,
    sup: &str,
    classes: &[String],
    self_class: Option<&str>,
) -> anyhow::Result<()> {
    let (table, specs) = class_table(classes)?;
    let scope = self_class.map(|name| class_scope(&specs, name));

    let mut out = ctx.output();
    let sub_arg = Argument::new("<sub>", sub);
    let sup_arg = Argument::new("<super>", sup);
    let (_, sub_ty) = load_type(ctx, &mut out, &sub_arg, &NoImports)?;
    let (_, sup_ty) = load_type(ctx, &mut out, &sup_arg, &NoImports)?;

    let mut subtyping = SubtypingContext::new(&table);
    if let Some(scope) = &scope {
        subtyping = subtyping.with_scope(scope);
    }

    let holds = subtyping.is_subtype(&sub_ty, &sup_ty);
    let uncovered: Vec<String> = subtyping
        .uncovered_members(&sub_ty, &sup_ty)
        .iter()
        .map(ToString::to_string)
        .collect();

    if ctx.is_json() {
        let report = SubtypeReport {
            sub: sub_ty.to_string(),
            sup: sup_ty.to_string(),
            subtype: holds,
            uncovered: uncovered.clone(),
        };
        out.line(&serde_json::to_string_pretty(&report)?);
    } else {
        out.bold(&format!("{} <: {}", sub_ty, sup_ty));
        out.plain("  ");
        if holds {
            out.success("yes");
        } else {
            out.error("no");
        }
        out.newline();
        if !uncovered.is_empty() {
            out.field("not covered", &uncovered.join(", "));
        }
    }

    if !holds {
        bail!("{} is not a subtype of {}", sub_ty, sup_ty);
    }
    Ok(())
}
