//! Genlib Tree - kommandoradsverktyg
//!
//! Läser en datamängd i JSON och skriver motorns resultat som JSON på stdout.
//! Loggning går till stderr.
//!
//! ```bash
//! genlib-tree familj.json person f1
//! genlib-tree familj.json layout focus s1 --up 2
//! genlib-tree familj.json outline --expand-all --scroll 560
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;

use genlib_tree::services::insights::InsightsService;
use genlib_tree::services::outline::{row_index, LifeStatus, OutlineFilter, OutlineService};
use genlib_tree::services::path::PathResolver;
use genlib_tree::services::relations::{level_ids, RelationshipService};
use genlib_tree::services::virtualize::Viewport;
use genlib_tree::services::visible::ViewMode;
use genlib_tree::services::FamilyTreeService;
use genlib_tree::utils::date::parse_date;
use genlib_tree::{load_index, AppError, Normalizer, Person, TreeIndex, TreeSettings};

#[derive(Parser)]
#[command(name = "genlib-tree")]
#[command(version)]
#[command(about = "Relationsfrågor och layout för släktträd")]
struct Cli {
    /// Datamängd i JSON (people, unions, selfId)
    dataset: PathBuf,

    /// Inställningsfil (TOML), annars standardsökvägen
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Utförlig loggning
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Föräldrar, partners, barn, förfäder, ättlingar och härstamning
    Person {
        id: String,

        /// Generationer förfäder
        #[arg(long, default_value_t = 2)]
        up: usize,

        /// Generationer ättlingar
        #[arg(long, default_value_t = 2)]
        down: usize,
    },

    /// Rutnätslayout med noder och länkar
    Layout {
        #[command(subcommand)]
        mode: LayoutMode,
    },

    /// Utfällbar översikt med virtuellt fönster
    Outline(OutlineArgs),

    /// Statistik över datamängden
    Stats {
        /// Referensdatum (ÅÅÅÅ-MM-DD), annars dagens datum
        #[arg(long)]
        today: Option<String>,
    },

    /// Sök på namn
    Search {
        query: String,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Dataproblem som upptäcktes vid inläsning
    Diagnostics,
}

#[derive(Subcommand)]
enum LayoutMode {
    /// Radie kring en person
    Focus {
        id: String,

        #[arg(long, default_value_t = 1)]
        up: usize,

        #[arg(long, default_value_t = 1)]
        down: usize,
    },
    /// Hela datamängden
    Full,
}

#[derive(clap::Args)]
struct OutlineArgs {
    /// Rotperson, annars selfId eller första personen
    #[arg(long)]
    root: Option<String>,

    /// Visa bara grenen under denna person
    #[arg(long, value_name = "ID")]
    branch_only: Option<String>,

    /// Fäll ut dessa personer
    #[arg(long, value_name = "ID")]
    expand: Vec<String>,

    /// Fäll ut allt (begränsat)
    #[arg(long)]
    expand_all: bool,

    /// Fäll ut vägen till personen och scrolla dit
    #[arg(long, value_name = "ID")]
    select: Option<String>,

    /// Scrollposition i pixlar
    #[arg(long)]
    scroll: Option<u32>,

    /// Höjd på synligt område i pixlar
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Delsträng i relationstexten
    #[arg(long)]
    relation: Option<String>,

    #[arg(long, value_enum, default_value_t = StatusArg::Any)]
    status: StatusArg,

    #[arg(long)]
    has_photo: bool,

    #[arg(long)]
    has_note: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Any,
    Alive,
    Deceased,
}

impl From<StatusArg> for LifeStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Any => LifeStatus::Any,
            StatusArg::Alive => LifeStatus::Alive,
            StatusArg::Deceased => LifeStatus::Deceased,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = match &cli.config {
        Some(path) => TreeSettings::load_from(path)
            .with_context(|| format!("Kunde inte läsa inställningar {}", path.display()))?,
        None => TreeSettings::load(),
    };

    let json = std::fs::read_to_string(&cli.dataset)
        .with_context(|| format!("Kunde inte läsa {}", cli.dataset.display()))?;
    let index = load_index(&json, &Normalizer::from_settings(&settings))
        .with_context(|| format!("Ogiltig datamängd {}", cli.dataset.display()))?;

    tracing::info!(
        "Läste {} ({} personer)",
        cli.dataset.display(),
        index.len()
    );

    match &cli.command {
        Commands::Person { id, up, down } => person(&index, &settings, id, *up, *down),
        Commands::Layout { mode } => layout(&index, &settings, mode),
        Commands::Outline(args) => outline(&index, &settings, args),
        Commands::Stats { today } => stats(&index, &settings, today.as_deref()),
        Commands::Search { query, limit } => {
            let limit = limit.unwrap_or(settings.search_limit);
            let insights = InsightsService::new(&index);
            let hits: Vec<_> = insights
                .search(query, limit)
                .into_iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "name": p.name,
                        "meta": insights.meta_text(p, cli.verbose),
                    })
                })
                .collect();
            print_json(&hits)
        }
        Commands::Diagnostics => print_json(index.diagnostics()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require<'a>(index: &'a TreeIndex, id: &str) -> Result<&'a Person> {
    index
        .person(id)
        .ok_or_else(|| AppError::not_found(format!("person {}", id)).into())
}

fn person(
    index: &TreeIndex,
    settings: &TreeSettings,
    id: &str,
    up: usize,
    down: usize,
) -> Result<()> {
    let person = require(index, id)?;
    let relations = RelationshipService::new(index);
    let ids = |people: Vec<&Person>| -> Vec<String> {
        people.into_iter().map(|p| p.id.clone()).collect()
    };

    let up = up.min(settings.max_generation_depth);
    let down = down.min(settings.max_generation_depth);
    let chain = PathResolver::new(index).ancestry_chain(id, settings.ancestry_hop_limit);

    let today = chrono::Local::now().date_naive();
    print_json(&json!({
        "person": person,
        "years": person.years_display(),
        "age": person.age(today),
        "meta": InsightsService::new(index).meta_text(person, false),
        "parents": ids(relations.parents(id)),
        "spouses": ids(relations.spouses(id)),
        "children": ids(relations.children(id)),
        "ancestors": level_ids(&relations.ancestors(id, up)),
        "descendants": level_ids(&relations.descendants(id, down)),
        "ancestry": chain,
    }))
}

fn layout(index: &TreeIndex, settings: &TreeSettings, mode: &LayoutMode) -> Result<()> {
    let mode = match mode {
        LayoutMode::Focus { id, up, down } => {
            require(index, id)?;
            ViewMode::focus_with_depth(
                id.as_str(),
                (*up).min(settings.max_generation_depth),
                (*down).min(settings.max_generation_depth),
            )
        }
        LayoutMode::Full => ViewMode::Full,
    };

    let tree = FamilyTreeService::new(index)
        .with_config(settings.layout)
        .with_max_iterations(settings.depth_iteration_limit)
        .build_tree(&mode);

    if tree.exhausted {
        tracing::warn!("Layouten är ofullständig, iterationsgränsen nåddes");
    }
    print_json(&tree)
}

fn outline(index: &TreeIndex, settings: &TreeSettings, args: &OutlineArgs) -> Result<()> {
    let service = OutlineService::new(index);
    let root = match &args.root {
        Some(root) => Some(root.clone()),
        None => service.root_id(args.branch_only.as_deref(), args.branch_only.is_some()),
    };
    let Some(root) = root else {
        return print_json(&json!({ "rows": [], "total": 0 }));
    };
    require(index, &root)?;

    let mut expanded = service.collapse_all(&root);
    expanded.extend(args.expand.iter().cloned());

    let mut expand_truncated = false;
    if args.expand_all {
        let result = service.expand_all(&root, settings.expand_all_budget);
        expand_truncated = result.truncated;
        expanded.extend(result.expanded);
    }
    if let Some(selected) = &args.select {
        PathResolver::new(index).expand_path_to(selected, &mut expanded);
    }

    let built = service.build(&root, &expanded, settings.outline_row_limit);
    let filter = OutlineFilter {
        relation: args.relation.clone(),
        status: args.status.into(),
        has_photo: args.has_photo,
        has_note: args.has_note,
    };
    let rows = service.filter(built.rows, &filter);

    let mut viewport =
        Viewport::new(settings.row_height, args.height).with_overscan(settings.overscan);
    let scroll = match (args.scroll, &args.select) {
        (Some(scroll), _) => scroll,
        (None, Some(selected)) => row_index(&rows, selected)
            .map(|row| viewport.scroll_to_row(row))
            .unwrap_or(0),
        (None, None) => 0,
    };
    viewport = viewport.with_scroll(scroll);

    let window = viewport.window(rows.len());
    print_json(&json!({
        "root": root,
        "total": rows.len(),
        "truncated": built.truncated,
        "expand_truncated": expand_truncated,
        "window": window,
        "rows": &rows[window.start..window.end],
    }))
}

fn stats(index: &TreeIndex, settings: &TreeSettings, today: Option<&str>) -> Result<()> {
    let today: NaiveDate = match today {
        Some(text) => parse_date(text)
            .ok_or_else(|| AppError::other(format!("Ogiltigt datum: {}", text)))?,
        None => chrono::Local::now().date_naive(),
    };

    let stats = InsightsService::new(index)
        .with_relation_keywords(settings.relation_keywords.clone())
        .stats(today);
    print_json(&stats)
}
