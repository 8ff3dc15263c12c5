use box_core::config::resolve_seed_file;
use box_core::{
    build_children, build_item, tags::document_tags, to_json, BoxContext, BoxError, CoreConfig,
    DocRef, Document, DocumentSession, MemoryRepository,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "boxctl")]
#[command(about = "Inspect a document repository through its Box API representation")]
struct Cli {
    /// Repository seed (YAML). Defaults to the bundled fixtures/repository.yaml
    #[arg(long, global = true)]
    seed: Option<PathBuf>,
    /// Login to act as
    #[arg(long, global = true, default_value = "Administrator")]
    user: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a folder with its first page of children
    Folder {
        /// Folder id
        id: String,
    },
    /// Print a file
    File {
        /// File id
        id: String,
    },
    /// Print one page of a folder's children
    Items {
        /// Folder id
        id: String,
        #[arg(long)]
        limit: Option<String>,
        #[arg(long)]
        offset: Option<String>,
        #[arg(long)]
        fields: Option<String>,
    },
    /// List the acting user's tags on a document
    Tags {
        /// Document id
        id: String,
    },
}

/// Fetches `id`, rejecting a folder where a file is expected and the reverse.
fn load(session: &dyn DocumentSession, id: &str, folderish: bool) -> Result<Document, BoxError> {
    let doc = session.get_document(&DocRef::new(id))?;
    if doc.folderish != folderish {
        let kind = if folderish { "folder" } else { "file" };
        return Err(BoxError::Lookup(format!("{id} is not a {kind}")));
    }
    Ok(doc)
}

fn run(cli: Cli) -> Result<String, BoxError> {
    let seed = resolve_seed_file(cli.seed)?;
    let repo = MemoryRepository::from_yaml_file(&seed)?;
    let session = repo.session(cli.user);
    let config = CoreConfig::default();
    let ctx = BoxContext::new(&session, &repo, &repo, &config);

    match cli.command {
        Commands::Folder { id } => to_json(&build_item(&ctx, &load(&session, &id, true)?)?),
        Commands::File { id } => to_json(&build_item(&ctx, &load(&session, &id, false)?)?),
        Commands::Items {
            id,
            limit,
            offset,
            fields,
        } => {
            let folder = load(&session, &id, true)?;
            let page = build_children(
                &ctx,
                &folder,
                limit.as_deref().unwrap_or(config.default_limit()),
                offset.as_deref().unwrap_or(config.default_offset()),
                fields.as_deref().unwrap_or(config.default_fields()),
            )?;
            to_json(&page)
        }
        Commands::Tags { id } => {
            let doc = session.get_document(&DocRef::new(id))?;
            let labels = document_tags(&repo, &session, &doc)?;
            Ok(labels.join("\n"))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let output = run(cli)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
