use clap::Parser;
use docshelf::{
    Catalog,
    ReportsRoot,
    cli::{Cli, Command, FoldersArgs, InfoArgs, SearchArgs, SeedArgs},
    config,
    error,
    filter,
    search,
    seed,
    server,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCSHELF_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    // Before parsing, so clap's env fallbacks see the file's values.
    let dotenv = config::load_dotenv()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let root = ReportsRoot::resolve(cli.root.as_deref())?;
    let catalog = Catalog::new(root);

    match cli.command {
        Command::Serve(args) => server::run(catalog, &args.bind)?,
        Command::Folders(args) => cmd_folders(&catalog, &args)?,
        Command::Search(args) => cmd_search(&catalog, &args)?,
        Command::Info(args) => cmd_info(&catalog, &args)?,
        Command::Seed(args) => cmd_seed(&catalog, &args)?,
        Command::Completions(_) => {}
    }

    Ok(())
}

fn cmd_folders(catalog: &Catalog, args: &FoldersArgs) -> error::Result<()> {
    let cutoff = filter::resolve_cutoff(args.at.as_deref())?;
    let folders = catalog.folders(cutoff)?;

    if args.json {
        return print_json(&folders);
    }

    if folders.is_empty() {
        println!("No folders found in {}.", catalog.root().path().display());
        return Ok(());
    }

    for folder in &folders {
        println!("{} ({})", folder.name, folder.document_count);
        for doc in &folder.documents {
            println!(
                "  {}\t{}\t{} bytes",
                doc.name,
                doc.modified_at.format("%Y-%m-%d %H:%M:%S"),
                doc.size
            );
        }
    }
    Ok(())
}

fn cmd_search(catalog: &Catalog, args: &SearchArgs) -> error::Result<()> {
    let cutoff = filter::resolve_cutoff(args.at.as_deref())?;
    let results = catalog.search(&args.query, cutoff)?;

    if args.json {
        print_json(&results)
    } else {
        search::format_human(&results);
        Ok(())
    }
}

fn cmd_info(catalog: &Catalog, args: &InfoArgs) -> error::Result<()> {
    let doc = catalog.document(&args.folder, &args.file)?;

    if args.json {
        return print_json(&doc);
    }

    println!("file: {}", doc.path);
    println!("folder: {}", doc.folder);
    println!("size: {} bytes", doc.size);
    println!("created: {}", doc.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("modified: {}", doc.modified_at.format("%Y-%m-%d %H:%M:%S"));
    if doc.text.is_empty() {
        println!("\n(no extractable text)");
    } else {
        println!("\n{}", doc.text);
    }
    Ok(())
}

fn cmd_seed(catalog: &Catalog, args: &SeedArgs) -> error::Result<()> {
    let root = catalog.root().path();
    let report = seed::seed(root, args.force)?;

    for path in &report.written {
        println!("wrote {}", path.display());
    }
    println!(
        "Seeded {}: {} written, {} already present",
        root.display(),
        report.written.len(),
        report.skipped.len()
    );
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> error::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
