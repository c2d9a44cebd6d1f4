//! Arbitrarium CLI
//!
//! Command-line access to the frame engine:
//! - Suggesting frames for a set of semantic ids (`suggest`) or for an
//!   entity's word sense (`suggest-entity`)
//! - Binding entities to frame roles inside a world snapshot (`apply`)
//! - Inspecting the corpus (`frame`, `ancestors`, `descendants`, `search`)

use anyhow::{anyhow, Context, Result};
use arb_engine::{EngineConfig, FrameApplicator, FrameSuggestionService};
use arb_framenet::{Corpus, Frame, FrameRef, InMemoryCorpus, InheritanceGraph};
use arb_world::{EntityId, EnvironmentId, InMemoryRepository};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

mod render;

#[derive(Parser)]
#[command(name = "arb")]
#[command(author, version, about = "Arbitrarium: FrameNet frame suggestion and role binding")]
struct Cli {
    /// Corpus file (JSON)
    #[arg(long, global = true, default_value = "corpus.json")]
    corpus: PathBuf,

    /// Engine config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank frames for a set of semantic ids (frame, element or lexical unit ids)
    Suggest {
        /// Semantic ids
        #[arg(required = true)]
        ids: Vec<String>,
        /// World snapshot, required with --env
        #[arg(long, requires = "env")]
        world: Option<PathBuf>,
        /// Restrict to frames materialized in this environment
        #[arg(long, requires = "world")]
        env: Option<EnvironmentId>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Frames evoked by an entity's word sense
    SuggestEntity {
        /// World snapshot
        #[arg(long)]
        world: PathBuf,
        /// Environment holding the entity
        #[arg(long)]
        env: EnvironmentId,
        /// Entity id
        #[arg(long)]
        entity: EntityId,
        /// Maximum results
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Bind entities to the roles of a frame
    Apply {
        /// World snapshot
        #[arg(long)]
        world: PathBuf,
        /// Environment holding the entities
        #[arg(long)]
        env: EnvironmentId,
        /// Frame id or name
        #[arg(long)]
        frame: String,
        /// ROLE=ENTITY_ID, repeatable
        #[arg(long = "role", value_parser = parse_role, required = true)]
        roles: Vec<(String, EntityId)>,
        /// Validate and report without saving the world
        #[arg(long)]
        dry_run: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Transitive super-frames of a frame
    Ancestors {
        /// Frame id or name
        frame: String,
    },

    /// Frames inheriting (transitively) from a frame
    Descendants {
        /// Frame id or name
        frame: String,
    },

    /// Show a frame: elements, relations, lexical units
    Frame {
        /// Frame id or name
        frame: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search frames by name/definition, or by lemma
    Search {
        query: String,
        /// Treat the query as a lemma and match lexical units
        #[arg(long)]
        lemma: bool,
        /// Part of speech filter for --lemma (e.g. `v`, `n`)
        #[arg(long, requires = "lemma")]
        pos: Option<String>,
        /// Maximum results
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let corpus = InMemoryCorpus::from_path(&cli.corpus)
        .with_context(|| format!("loading corpus {}", cli.corpus.display()))?;
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Suggest {
            ids,
            world,
            env,
            json,
        } => cmd_suggest(&corpus, config, &ids, world.as_ref(), env, json),
        Commands::SuggestEntity {
            world,
            env,
            entity,
            limit,
            json,
        } => cmd_suggest_entity(&corpus, &world, env, entity, limit, json),
        Commands::Apply {
            world,
            env,
            frame,
            roles,
            dry_run,
            json,
        } => cmd_apply(&corpus, &world, env, &frame, roles, dry_run, json),
        Commands::Ancestors { frame } => cmd_ancestors(&corpus, &frame),
        Commands::Descendants { frame } => cmd_descendants(&corpus, &frame),
        Commands::Frame { frame, json } => cmd_frame(&corpus, &frame, json),
        Commands::Search {
            query,
            lemma,
            pos,
            limit,
        } => cmd_search(&corpus, &query, lemma, pos.as_deref(), limit),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_role(raw: &str) -> Result<(String, EntityId), String> {
    let (role, entity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ROLE=ENTITY_ID, got `{raw}`"))?;
    let role = role.trim();
    if role.is_empty() {
        return Err(format!("empty role name in `{raw}`"));
    }
    let entity = entity
        .trim()
        .parse::<EntityId>()
        .map_err(|e| format!("bad entity id in `{raw}`: {e}"))?;
    Ok((role.to_string(), entity))
}

fn lookup_frame<'c>(corpus: &'c InMemoryCorpus, raw: &str) -> Result<&'c Frame> {
    corpus
        .frame_by_ref(&FrameRef::parse(raw))
        .ok_or_else(|| anyhow!("frame `{raw}` not found in corpus"))
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_suggest(
    corpus: &InMemoryCorpus,
    config: EngineConfig,
    ids: &[String],
    world: Option<&PathBuf>,
    env: Option<EnvironmentId>,
    json: bool,
) -> Result<()> {
    let repo = world
        .map(|path| {
            InMemoryRepository::load(path)
                .with_context(|| format!("loading world {}", path.display()))
        })
        .transpose()?;

    let mut service = FrameSuggestionService::new(corpus).with_config(config);
    if let Some(repo) = &repo {
        service = service.with_repository(repo);
    }
    let suggestions = service.suggest_frames(ids, env);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    if suggestions.is_empty() {
        println!("{} no matching frames", "info:".yellow().bold());
        return Ok(());
    }
    render::suggestions(&suggestions);
    Ok(())
}

fn cmd_suggest_entity(
    corpus: &InMemoryCorpus,
    world: &PathBuf,
    env: EnvironmentId,
    entity: EntityId,
    limit: usize,
    json: bool,
) -> Result<()> {
    let repo = InMemoryRepository::load(world)
        .with_context(|| format!("loading world {}", world.display()))?;
    let entity = repo
        .entity(env, entity)
        .ok_or_else(|| anyhow!("entity {entity} not found in environment {env}"))?;
    let suggestions = FrameSuggestionService::new(corpus).suggest_for_entity(&entity, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }
    if suggestions.is_empty() {
        let sense = entity.sense_id.as_deref().unwrap_or("no sense");
        println!("{} {} ({sense}) evokes no frames", "info:".yellow().bold(), entity.name);
        return Ok(());
    }
    render::suggestions(&suggestions);
    Ok(())
}

fn cmd_apply(
    corpus: &InMemoryCorpus,
    world: &PathBuf,
    env: EnvironmentId,
    frame: &str,
    roles: Vec<(String, EntityId)>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let repo = InMemoryRepository::load(world)
        .with_context(|| format!("loading world {}", world.display()))?;
    let roles: BTreeMap<String, EntityId> = roles.into_iter().collect();

    let applicator = FrameApplicator::new(corpus, &repo);
    let outcome = applicator.apply_frame(env, &FrameRef::parse(frame), &roles);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render::outcome(&outcome);
    }

    if !outcome.success {
        return Err(anyhow!("frame not applied"));
    }
    if dry_run {
        eprintln!("{} dry run, world not saved", "info:".yellow().bold());
    } else {
        repo.save(world)
            .with_context(|| format!("saving world {}", world.display()))?;
        eprintln!("{} {}", "wrote".green().bold(), world.display().to_string().bold());
    }
    Ok(())
}

fn cmd_ancestors(corpus: &InMemoryCorpus, raw: &str) -> Result<()> {
    let frame = lookup_frame(corpus, raw)?;
    let graph = InheritanceGraph::new(corpus);
    println!("{} {}", "Ancestors of".green().bold(), frame.name.bold());
    render::frame_list(&graph.ancestor_frames(frame));
    Ok(())
}

fn cmd_descendants(corpus: &InMemoryCorpus, raw: &str) -> Result<()> {
    let frame = lookup_frame(corpus, raw)?;
    let graph = InheritanceGraph::new(corpus);
    println!("{} {}", "Descendants of".green().bold(), frame.name.bold());
    render::frame_list(&graph.descendant_frames(frame));
    Ok(())
}

fn cmd_frame(corpus: &InMemoryCorpus, raw: &str, json: bool) -> Result<()> {
    let frame = lookup_frame(corpus, raw)?;
    if json {
        println!("{}", serde_json::to_string_pretty(frame)?);
        return Ok(());
    }
    let units: Vec<String> = corpus
        .lexical_units()
        .filter(|lu| lu.frame.id == frame.id)
        .map(|lu| lu.name().to_string())
        .collect();
    render::frame_detail(corpus, frame, &units);
    Ok(())
}

fn cmd_search(
    corpus: &InMemoryCorpus,
    query: &str,
    lemma: bool,
    pos: Option<&str>,
    limit: usize,
) -> Result<()> {
    let mut hits = if lemma {
        corpus.frames_by_lemma(query, pos)
    } else {
        corpus.search_frames(query, limit)
    };
    hits.truncate(limit);

    println!(
        "{} {} ({} hits)",
        "Searching".green().bold(),
        query.bold(),
        hits.len()
    );
    render::frame_list(&hits);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arb_framenet::fixtures;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn role_arguments_parse() {
        assert_eq!(parse_role("giver=1").unwrap(), ("giver".to_string(), 1));
        assert_eq!(
            parse_role(" Recipient = 42 ").unwrap(),
            ("Recipient".to_string(), 42)
        );
        assert!(parse_role("giver").is_err());
        assert!(parse_role("=1").is_err());
        assert!(parse_role("giver=alice").is_err());
    }

    #[test]
    fn apply_collects_repeated_roles() {
        let cli = Cli::try_parse_from([
            "arb", "apply", "--world", "w.json", "--env", "1", "--frame", "Giving", "--role",
            "giver=1", "--role", "recipient=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Apply { roles, dry_run, .. } => {
                assert_eq!(roles.len(), 2);
                assert!(!dry_run);
            }
            _ => panic!("expected apply"),
        }
    }

    #[test]
    fn suggest_entity_needs_world_env_and_entity() {
        let cli = Cli::try_parse_from([
            "arb", "suggest-entity", "--world", "w.json", "--env", "1", "--entity", "7",
        ])
        .unwrap();
        match cli.command {
            Commands::SuggestEntity { entity, limit, .. } => {
                assert_eq!(entity, 7);
                assert_eq!(limit, 5);
            }
            _ => panic!("expected suggest-entity"),
        }
        assert!(Cli::try_parse_from(["arb", "suggest-entity", "--env", "1"]).is_err());
    }

    #[test]
    fn suggest_env_requires_world() {
        assert!(Cli::try_parse_from(["arb", "suggest", "139", "--env", "1"]).is_err());
        assert!(Cli::try_parse_from(["arb", "suggest", "139"]).is_ok());
    }

    #[test]
    fn frames_resolve_by_id_or_name() {
        let corpus = fixtures::synthetic_corpus();
        assert_eq!(lookup_frame(&corpus, "139").unwrap().name, "Giving");
        assert_eq!(lookup_frame(&corpus, "commerce_buy").unwrap().id, 171);
        assert!(lookup_frame(&corpus, "Teleporting").is_err());
    }
}
