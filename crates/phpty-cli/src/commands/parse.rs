//! `phpty parse`: normalize a type and show its reflection

use super::{check_declaration, load_type, parse_kind, Argument, Context};
use anyhow::anyhow;
use phpty_types::{reflect, DeclarationKind, Imports, ReflectionType};
use serde::Serialize;

#[derive(Serialize)]
struct ParseReport<'a> {
    source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<DeclarationKind>,
    normalized: String,
    reflection: ReflectionType,
}

pub fn execute(
    ctx: &Context,
    ty: &str,
    kind: Option<&str>,
    namespace: Option<&str>,
    uses: &[String],
) -> anyhow::Result<()> {
    let kind = kind.map(parse_kind).transpose()?;
    let imports = imports(namespace, uses)?;

    let mut out = ctx.output();
    let arg = Argument::new("<type>", ty);
    let loaded = load_type(ctx, &mut out, &arg, &imports)?;
    if let Some(kind) = kind {
        check_declaration(ctx, &mut out, &arg, kind, &loaded)?;
    }

    let normalized = loaded.1;
    let reflection = reflect(&normalized);

    if ctx.is_json() {
        let report = ParseReport {
            source: ty,
            kind,
            normalized: normalized.to_string(),
            reflection,
        };
        out.line(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    out.field("type", &normalized.to_string());
    if let Some(kind) = kind {
        out.field("declared", &format!("{} type", kind));
    }
    out.field("reflection", &describe(&reflection));
    out.field("allows null", if reflection.allows_null() { "yes" } else { "no" });
    Ok(())
}

/// Build the name resolver from `--namespace` and `--use ALIAS=NAME`
fn imports(namespace: Option<&str>, uses: &[String]) -> anyhow::Result<Imports> {
    let mut imports = match namespace {
        Some(namespace) => Imports::new().with_namespace(namespace),
        None => Imports::new(),
    };
    for spec in uses {
        let (alias, target) = spec
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid import '{}', expected ALIAS=NAME", spec))?;
        imports.add_use(target.trim(), alias.trim());
    }
    Ok(imports)
}

fn describe(reflection: &ReflectionType) -> String {
    match reflection {
        ReflectionType::Named(named) => {
            let origin = if named.is_builtin() { "builtin" } else { "class" };
            format!("ReflectionNamedType {} ({})", named.name(), origin)
        }
        ReflectionType::Union(union) => {
            let members: Vec<&str> = union.types().iter().map(|t| t.name()).collect();
            format!("ReflectionUnionType [{}]", members.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpty_types::{ClassName, NameResolver, Type};

    #[test]
    fn test_imports_from_flags() {
        let uses = vec!["Items=Lib\\Collection".to_string()];
        let resolver = imports(Some("App"), &uses).unwrap();
        assert_eq!(
            resolver.resolve_class(&ClassName::new("Items")),
            ClassName::new("Lib\\Collection")
        );
        assert_eq!(resolver.resolve_class(&ClassName::new("User")), ClassName::new("App\\User"));

        assert!(imports(None, &["Items".to_string()]).is_err());
    }

    #[test]
    fn test_describe_reflection() {
        let nullable = reflect(&Type::union(vec![Type::int(), Type::NullLiteral]).unwrap());
        assert_eq!(describe(&nullable), "ReflectionNamedType int (builtin)");

        let union = reflect(&Type::union(vec![Type::int(), Type::class("Foo")]).unwrap());
        assert_eq!(describe(&union), "ReflectionUnionType [int, Foo]");
    }
}
