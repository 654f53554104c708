//! `phpty variance`: check an overriding declaration against its base

use super::{
    check_declaration, class_table, load_type, parse_kind, report, Argument, Context, FILE_ID,
};
use anyhow::bail;
use phpty_parser::Diagnostic;
use phpty_types::{DeclarationKind, NoImports, SubtypingContext, VarianceChecker};
use serde::Serialize;

#[derive(Serialize)]
struct VarianceReport {
    kind: DeclarationKind,
    base: String,
    #[serde(rename = "override")]
    overriding: String,
    compatible: bool,
}

pub fn execute(
    ctx: &Context,
    kind: &str,
    base: &str,
    overriding: &str,
    classes: &[String],
) -> anyhow::Result<()> {
    let kind = parse_kind(kind)?;
    let (table, _) = class_table(classes)?;

    let mut out = ctx.output();
    let base_arg = Argument::new("<base>", base);
    let override_arg = Argument::new("<override>", overriding);

    let base_loaded = load_type(ctx, &mut out, &base_arg, &NoImports)?;
    check_declaration(ctx, &mut out, &base_arg, kind, &base_loaded)?;
    let override_loaded = load_type(ctx, &mut out, &override_arg, &NoImports)?;
    check_declaration(ctx, &mut out, &override_arg, kind, &override_loaded)?;

    let (base_ty, override_ty) = (&base_loaded.1, &override_loaded.1);
    let checker = VarianceChecker::new(SubtypingContext::new(&table));
    let result = checker.check(kind, base_ty, override_ty);

    if ctx.is_json() && result.is_ok() {
        let report = VarianceReport {
            kind,
            base: base_ty.to_string(),
            overriding: override_ty.to_string(),
            compatible: true,
        };
        out.line(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match result {
        Ok(()) => {
            out.bold(&format!("{} type {} -> {}", kind, base_ty, override_ty));
            out.plain("  ");
            out.success("compatible");
            out.newline();
            Ok(())
        }
        Err(err) => {
            let diag = Diagnostic::from_declaration_error(&err, &override_loaded.0, FILE_ID)
                .with_note(format!("the parent declares {}", base_ty));
            report(ctx, &mut out, &diag, &override_arg)?;
            bail!(
                "{} type {} is not compatible with {}",
                kind,
                override_ty,
                base_ty
            );
        }
    }
}
