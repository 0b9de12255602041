use clap::Parser;
use docfind::{
    builder,
    cli::{self, Cli, Command},
    data_dir::DataDir,
    error,
    filter::Facets,
    live::LiveIndex,
    mcp,
    search::{self, SearchHandle, SearchOptions},
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCFIND_LOG") {
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
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;

    match cli.command {
        Command::Build(args) => cmd_build(&data_dir, &args)?,
        Command::Search(args) => cmd_search(&data_dir, &args)?,
        Command::Status(args) => cmd_status(&data_dir, &args)?,
        Command::Mcp(args) => {
            let path = data_dir.index_file_or(args.index.as_deref());
            let index = LiveIndex::open(&path, SearchOptions::default());
            mcp::run_mcp(index)?;
        }
        Command::Completions(_) => {}
    }

    Ok(())
}

fn cmd_build(data_dir: &DataDir, args: &cli::BuildArgs) -> error::Result<()> {
    let output = data_dir.index_file_or(args.output.as_deref());

    if !args.content_root.is_dir() {
        eprintln!(
            "Warning: content root does not exist: {}",
            args.content_root.display()
        );
    }

    let (records, report) =
        builder::build_index_with_report(&args.content_root);
    builder::save_index(&records, &output)?;

    eprintln!("  Found {} documents", report.discovered);
    eprintln!("  Indexed {} documents", report.indexed);
    if report.skipped > 0 {
        eprintln!("  Skipped {} documents (see warnings)", report.skipped);
    }
    eprintln!("Wrote {}", output.display());
    Ok(())
}

fn cmd_search(data_dir: &DataDir, args: &cli::SearchArgs) -> error::Result<()> {
    if args.query.trim().is_empty() {
        return Err(error::Error::Config("query must not be empty".into()));
    }

    let path = data_dir.index_file_or(args.index.as_deref());
    let records = match builder::load_index(&path) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(path = %path.display(), "no usable index: {e}");
            Vec::new()
        }
    };

    let options = SearchOptions {
        threshold: args.threshold,
        limit: args.limit,
        include_matches: args.matches,
        ..SearchOptions::default()
    };
    let handle = SearchHandle::new(records, options);
    let facets = Facets {
        audience: args.audience,
        category: args.category.clone(),
        doc_type: args.doc_type,
    };

    let results = if facets.is_empty() {
        handle.search(&args.query)
    } else {
        let mut results =
            facets.apply(handle.search_with(&args.query, Some(usize::MAX)));
        results.truncate(args.limit);
        results
    };

    if args.json {
        search::format_json(&results, &args.query)?;
    } else {
        search::format_human(&results);
    }
    Ok(())
}

fn cmd_status(data_dir: &DataDir, args: &cli::StatusArgs) -> error::Result<()> {
    let path = data_dir.index_file_or(args.index.as_deref());
    let builder::IndexStatus {
        exists,
        records,
        error,
    } = builder::inspect_index(&path);

    if args.json {
        let mut out = serde_json::json!({
            "dataDir": data_dir.root(),
            "index": path,
            "exists": exists,
            "records": records.len(),
        });
        if let Some(error) = &error {
            out["error"] = serde_json::Value::from(error.as_str());
        }
        println!("{out}");
        return Ok(());
    }

    println!("Data directory: {}", data_dir.root().display());
    println!("Index: {}", path.display());
    if !exists {
        println!("Records: 0 (no index built yet)");
    } else if let Some(error) = error {
        println!("Records: 0 (index unreadable: {error})");
    } else {
        println!("Records: {}", records.len());
        let mut by_audience = std::collections::BTreeMap::new();
        for r in &records {
            *by_audience.entry(r.audience.as_str()).or_insert(0usize) += 1;
        }
        for (audience, count) in by_audience {
            println!("  {audience}: {count}");
        }
    }
    Ok(())
}
