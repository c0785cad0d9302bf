use clap::Parser;
use tracing_subscriber::EnvFilter;

use docsift::{
    Error, IndexBundle, Result,
    cli::{BuildArgs, Cli, Command, InspectArgs, SearchArgs},
    config::SearchConfig,
    highlight::Highlighter,
    ingest,
    loader::{AnyIndexSource, IndexSource},
    query::{self, QueryDecision},
    render::{self, ResultTemplate, ResultsContainer},
    search,
    term_index::MatchResult,
};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("DOCSIFT_LOG") {
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

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Build(args) => cmd_build(&args)?,
        Command::Search(args) => cmd_search(&args).await?,
        Command::Inspect(args) => cmd_inspect(&args).await?,
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

fn cmd_build(args: &BuildArgs) -> Result<()> {
    // Validate the directory exists and is readable
    if !args.dir.exists() {
        return Err(Error::Config(format!(
            "directory does not exist: {}",
            args.dir.display()
        )));
    }
    if !args.dir.is_dir() {
        return Err(Error::Config(format!(
            "path is not a directory: {}",
            args.dir.display()
        )));
    }

    let bundle = ingest::build_bundle(&args.dir)?;
    let payload = if args.pretty {
        serde_json::to_vec_pretty(&bundle)?
    } else {
        serde_json::to_vec(&bundle)?
    };
    std::fs::write(&args.out, payload)?;

    println!(
        "Indexed {} document(s) -> {}",
        bundle.docs.len(),
        args.out.display()
    );
    Ok(())
}

async fn cmd_search(args: &SearchArgs) -> Result<()> {
    let config = SearchConfig {
        min_query_len: args.min_len,
        mode: args.mode,
        ..SearchConfig::default()
    };

    let bundle = AnyIndexSource::from_location(&args.index).load().await?;

    let normalized = match query::normalize(&args.query, &config) {
        QueryDecision::Empty => {
            return Err(Error::Config("query is empty".into()));
        }
        QueryDecision::TooShort => {
            return Err(Error::Config(format!(
                "query needs at least {} alphanumeric character(s)",
                config.min_query_len
            )));
        }
        QueryDecision::Run(normalized) => normalized,
    };

    let shaped = search::shape_query(&normalized, config.mode);
    let mut matches = search::execute(&bundle, &shaped);
    matches.truncate(args.count);

    if let Some(ref template_path) = args.template {
        let raw = std::fs::read_to_string(template_path)?;
        let template = ResultTemplate::parse(&raw);
        let highlighter = Highlighter::new(shaped.split(' '));
        let mut container = ResultsContainer::new();
        render::render_results(
            &mut container,
            &template,
            &bundle,
            &matches,
            &highlighter,
        );
        for node in container.nodes() {
            println!("{}", node.html);
        }
    } else if args.json {
        print_json(&bundle, &args.query, &matches);
    } else {
        print_human(&bundle, &matches);
    }

    Ok(())
}

fn print_human(bundle: &IndexBundle, matches: &[MatchResult]) {
    if matches.is_empty() {
        println!("No results found.");
        return;
    }

    for (i, m) in matches.iter().enumerate() {
        let record = bundle.document(&m.document_id);
        let url = record
            .map(|r| r.location_url(&m.document_id))
            .unwrap_or(&m.document_id);
        println!("{:>3}. [{:.3}] {url}", i + 1, m.score);
        if let Some(record) = record
            && !record.title.is_empty()
        {
            println!("     {}", record.title);
        }
    }
    println!("\n{} result(s)", matches.len());
}

fn print_json(bundle: &IndexBundle, query: &str, matches: &[MatchResult]) {
    let results: Vec<_> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let record = bundle.document(&m.document_id);
            serde_json::json!({
                "rank": i + 1,
                "score": m.score,
                "id": m.document_id,
                "url": record.map(|r| r.location_url(&m.document_id)),
                "title": record.map(|r| r.title.as_str()),
            })
        })
        .collect();

    let payload = serde_json::json!({
        "query": query,
        "result_count": matches.len(),
        "results": results,
    });
    println!("{payload}");
}

async fn cmd_inspect(args: &InspectArgs) -> Result<()> {
    let bundle = AnyIndexSource::from_location(&args.index).load().await?;
    let index = &bundle.index;

    if args.json {
        let payload = serde_json::json!({
            "version": index.version,
            "documents": bundle.docs.len(),
            "terms": index.terms.len(),
            "avg_title_len": index.avg_title_len,
            "avg_body_len": index.avg_body_len,
        });
        println!("{payload}");
    } else {
        println!("Format version: {}", index.version);
        println!("Documents: {}", bundle.docs.len());
        println!("Terms: {}", index.terms.len());
        println!("Average title length: {:.1} token(s)", index.avg_title_len);
        println!("Average body length: {:.1} token(s)", index.avg_body_len);
    }
    Ok(())
}
