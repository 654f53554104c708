//! phpty command-line tool
//!
//! Parses, compares and applies PHP-style union type declarations:
//! normalization and reflection, subtyping, inheritance variance and
//! weak-mode coercion.

mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use commands::Context;

#[derive(Parser)]
#[command(name = "phpty")]
#[command(about = "PHP-style union type toolkit", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// When to use colors (auto, always, never)
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// How results and diagnostics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and normalize a type, and show its reflection
    Parse {
        /// Type expression (e.g. "int|string|null")
        ty: String,
        /// Check the type against a declaration site (return, parameter, property)
        #[arg(short, long)]
        kind: Option<String>,
        /// Namespace that unqualified class names resolve into
        #[arg(short, long)]
        namespace: Option<String>,
        /// Import alias, as ALIAS=NAME (repeatable)
        #[arg(short, long = "use", value_name = "ALIAS=NAME")]
        uses: Vec<String>,
    },

    /// Check whether one type is a subtype of another
    Subtype {
        /// Candidate subtype
        sub: String,
        /// Candidate supertype
        sup: String,
        /// Declare a class, as NAME[:PARENT,INTERFACE...] (repeatable)
        #[arg(short, long = "class", value_name = "NAME[:SUPER,...]")]
        classes: Vec<String>,
        /// Class that `self` refers to
        #[arg(long = "self", value_name = "NAME")]
        self_class: Option<String>,
    },

    /// Check that an overriding declaration is compatible with its base
    Variance {
        /// Declaration site (return, parameter, property)
        kind: String,
        /// Type declared by the parent
        base: String,
        /// Type declared by the child
        #[arg(value_name = "OVERRIDE")]
        overriding: String,
        /// Declare a class, as NAME[:PARENT,INTERFACE...] (repeatable)
        #[arg(short, long = "class", value_name = "NAME[:SUPER,...]")]
        classes: Vec<String>,
    },

    /// Pass a value to a typed location and show the coerced result
    Coerce {
        /// Declared type
        ty: String,
        /// Value literal (e.g. 42, "42", 1e100, true, [1, 2], new Foo("text"))
        value: String,
        /// Use strict typing instead of weak-mode coercion
        #[arg(long)]
        strict: bool,
        /// Declare a class, as NAME[:PARENT,INTERFACE...] (repeatable)
        #[arg(short, long = "class", value_name = "NAME[:SUPER,...]")]
        classes: Vec<String>,
    },
}

fn main() {
    logging::init_tracing();

    let cli = Cli::parse();
    let ctx = Context::new(cli.format, output::resolve_color_choice(cli.color.as_deref()));

    let result = match cli.command {
        Commands::Parse {
            ty,
            kind,
            namespace,
            uses,
        } => commands::parse::execute(&ctx, &ty, kind.as_deref(), namespace.as_deref(), &uses),
        Commands::Subtype {
            sub,
            sup,
            classes,
            self_class,
        } => commands::subtype::execute(&ctx, &sub, &sup, &classes, self_class.as_deref()),
        Commands::Variance {
            kind,
            base,
            overriding,
            classes,
        } => commands::variance::execute(&ctx, &kind, &base, &overriding, &classes),
        Commands::Coerce {
            ty,
            value,
            strict,
            classes,
        } => commands::coerce::execute(&ctx, &ty, &value, strict, &classes),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
