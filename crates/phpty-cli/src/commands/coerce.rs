//! `phpty coerce`: pass a value to a typed location

use super::{check_declaration, class_table, load_type, report, Argument, Context, FILE_ID};
use anyhow::bail;
use phpty_parser::{parse_value, Diagnostic};
use phpty_types::{
    CoercionMode, CoercionResolver, DeclarationKind, NoImports, SubtypingContext, Value,
};
use serde::Serialize;

#[derive(Serialize)]
struct CoerceReport {
    #[serde(rename = "type")]
    ty: String,
    input: Value,
    result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

pub fn execute(
    ctx: &Context,
    ty: &str,
    value: &str,
    strict: bool,
    classes: &[String],
) -> anyhow::Result<()> {
    let (table, _) = class_table(classes)?;
    let mode = if strict {
        CoercionMode::Strict
    } else {
        CoercionMode::Weak
    };

    let mut out = ctx.output();
    let type_arg = Argument::new("<type>", ty);
    let value_arg = Argument::new("<value>", value);

    let loaded = load_type(ctx, &mut out, &type_arg, &NoImports)?;
    check_declaration(ctx, &mut out, &type_arg, DeclarationKind::Parameter, &loaded)?;
    let target = loaded.1;

    let input = match parse_value(value) {
        Ok(input) => input,
        Err(err) => {
            report(ctx, &mut out, &Diagnostic::from_parse_error(&err, FILE_ID), &value_arg)?;
            bail!("could not parse value '{}'", value);
        }
    };

    let resolver = CoercionResolver::new(SubtypingContext::new(&table), mode);
    let coerced = match resolver.coerce(&input, &target) {
        Ok(coerced) => coerced,
        Err(err) => {
            let diag = Diagnostic::from_type_error(&err, FILE_ID, value_arg.span());
            report(ctx, &mut out, &diag, &value_arg)?;
            bail!("{} is not accepted by {}", input, target);
        }
    };

    if ctx.is_json() {
        let report = CoerceReport {
            ty: target.to_string(),
            input,
            notice: coerced.notice.as_ref().map(ToString::to_string),
            result: coerced.value,
        };
        out.line(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(notice) = &coerced.notice {
        let diag = Diagnostic::from_notice(notice, FILE_ID, value_arg.span());
        report(ctx, &mut out, &diag, &value_arg)?;
    }

    out.field("input", &input.to_string());
    out.info(&format!("{:<12}", "result:"));
    if coerced.value.same_representation(&input) {
        out.plain(&coerced.value.to_string());
    } else {
        out.warning(&coerced.value.to_string());
    }
    out.newline();
    out.field("mode", if strict { "strict" } else { "weak" });
    Ok(())
}
