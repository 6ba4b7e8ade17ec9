//! Command-line interface for xml2class

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xml2class::bulk;
#[cfg(feature = "cli")]
use xml2class::loaders::Loader;
#[cfg(feature = "cli")]
use xml2class::locations::Location;
#[cfg(feature = "cli")]
use xml2class::{Generator, GeneratorOptions, Limits};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xml2class")]
#[command(author, version, about = "Creates pyxmlmapper classes from sample XML documents", long_about = None)]
struct Cli {
    /// Use strict resource limits
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate classes for one XML document
    Generate {
        /// Path to the XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit fields for attributes of container elements
        #[arg(short, long)]
        attributes: bool,

        /// Omit the source file comment at the top
        #[arg(long)]
        no_source_comment: bool,
    },

    /// Generate classes for every XML document in a directory
    Bulk {
        /// Input directory
        #[arg(value_name = "IN_DIR")]
        in_dir: PathBuf,

        /// Output directory
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,

        /// Emit fields for attributes of container elements
        #[arg(short, long)]
        attributes: bool,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Read XML members of the *.zip archives in IN_DIR
        #[arg(short = 'z', long = "from-zip")]
        from_zip: bool,
    },

    /// Print the structural tree inferred from an XML document
    Tree {
        /// Path to the XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include attributes of container elements
        #[arg(short, long)]
        attributes: bool,
    },

    /// List the inferred classes and fields
    Inspect {
        /// Path to the XML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include attributes of container elements
        #[arg(short, long)]
        attributes: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = if cli.strict {
        Limits::strict()
    } else {
        Limits::default()
    };

    let result = match cli.command {
        Commands::Generate {
            file,
            output,
            attributes,
            no_source_comment,
        } => {
            let options = GeneratorOptions::new()
                .with_limits(limits)
                .with_attributes(attributes)
                .with_source_comment(!no_source_comment);
            cmd_generate(file, output, options)
        }
        Commands::Bulk {
            in_dir,
            out_dir,
            attributes,
            jobs,
            from_zip,
        } => {
            let options = GeneratorOptions::new()
                .with_limits(limits)
                .with_attributes(attributes);
            cmd_bulk(in_dir, out_dir, jobs, from_zip, options)
        }
        Commands::Tree { file, attributes } => {
            let options = GeneratorOptions::new()
                .with_limits(limits)
                .with_attributes(attributes);
            cmd_tree(file, options)
        }
        Commands::Inspect {
            file,
            attributes,
            json,
        } => {
            let options = GeneratorOptions::new()
                .with_limits(limits)
                .with_attributes(attributes);
            cmd_inspect(file, json, options)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn read_document(file: &PathBuf, options: &GeneratorOptions) -> Result<String, Box<dyn std::error::Error>> {
    let xml = Loader::new()
        .with_limits(options.limits.clone())
        .load(&Location::path(file))?;
    Ok(xml)
}

#[cfg(feature = "cli")]
fn cmd_generate(
    file: PathBuf,
    output: Option<PathBuf>,
    options: GeneratorOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let code = Generator::with_options(options).generate_file(&file)?;

    if let Some(output_path) = output {
        fs::write(output_path, &code)?;
    } else {
        print!("{}", code);
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_bulk(
    in_dir: PathBuf,
    out_dir: PathBuf,
    jobs: Option<usize>,
    from_zip: bool,
    options: GeneratorOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("in_dir: {}, out_dir: {}", in_dir.display(), out_dir.display());

    let generator = Generator::with_options(options);
    let report = if from_zip {
        bulk::generate_archives(&generator, &in_dir, &out_dir, jobs)?
    } else {
        bulk::generate_dir(&generator, &in_dir, &out_dir, jobs)?
    };

    for output in &report.generated {
        println!("  ✓ {}", output.display());
    }
    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.input.display(), failure.error);
    }
    println!();
    println!(
        "Processed {} document(s): {} generated, {} failed",
        report.total(),
        report.generated.len(),
        report.failed.len()
    );

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_tree(file: PathBuf, options: GeneratorOptions) -> Result<(), Box<dyn std::error::Error>> {
    let xml = read_document(&file, &options)?;
    let printed = Generator::with_options(options).print_tree(&xml)?;
    print!("{}", printed);
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    file: PathBuf,
    json_output: bool,
    options: GeneratorOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let xml = read_document(&file, &options)?;
    let model = Generator::with_options(options).model(&xml)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    println!("xml2class v{}", xml2class::VERSION);
    println!();
    println!("Classes: {}", model.len());
    for class in model.emission_order() {
        println!();
        println!("  {} ({} fields)", class.class_name, class.fields.len());
        for field in &class.fields {
            match &field.target {
                Some(target) => println!("    {} : {} -> {} {}", field.attribute, field.kind, target, field.query),
                None => println!("    {} : {} {}", field.attribute, field.kind, field.query),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
