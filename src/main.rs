use anyhow::{Context, Result};
use docs_search::docs::{DocModule, PackageMeta};
use docs_search::{Corpus, RankedResult, SearchConfig, Session};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

const USAGE: &str = "usage: docs-search <modules.json> [packages.json]";

/// Answers one query per stdin line against the given declarations.
#[tokio::main]
async fn main() -> Result<()> {
    docs_search::tracing::init();

    let mut args = std::env::args().skip(1);
    let Some(modules_path) = args.next() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let modules: Vec<DocModule> = read_json(Path::new(&modules_path)).await?;
    let packages: Vec<PackageMeta> = match args.next() {
        Some(path) => read_json(Path::new(&path)).await?,
        None => vec![],
    };

    let config = SearchConfig::discover()?;
    let session = Session::start(
        config,
        Corpus {
            modules,
            packages,
            scores: None,
        },
    )
    .await?;

    answer_queries(
        &session,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Writes the ranked results for each input line, followed by a blank line.
async fn answer_queries<R, W>(session: &Session, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read query from stdin")?
    {
        let mut block = String::new();
        for result in session.query(&line).await {
            block.push_str(&format_result(&result));
            block.push('\n');
        }
        block.push('\n');

        output
            .write_all(block.as_bytes())
            .await
            .context("Failed to write results")?;
        output.flush().await.context("Failed to write results")?;
    }
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn format_result(result: &RankedResult) -> String {
    let rank = match result.penalty() {
        Some(penalty) => format!("-{}", penalty),
        None => result.score().to_string(),
    };
    let kind = result.info().map_or_else(
        || match result {
            RankedResult::Package { .. } => "package",
            _ => "module",
        },
        |info| info.kind_name(),
    );
    let location = match (result.module_name(), result.declaration()) {
        (Some(module), Some(_)) => format!("{}.{}", module, result.name()),
        _ => result.name().to_string(),
    };
    let signature = result
        .info()
        .and_then(|info| info.declared_type())
        .map(|ty| format!(" :: {}", ty))
        .unwrap_or_default();

    format!("{}\t{}\t{}{}\t{}", rank, kind, location, signature, result.package())
}
