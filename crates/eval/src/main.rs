//! Evaluation CLI for inspecting cocktail recommendations.
//!
//! Usage:
//!     eval --catalog data/cocktails.json recommend 102
//!     eval --catalog data/cocktails.json classify "Maraschino Cherry" "Lime"
//!     eval --catalog data/cocktails.json distribution
//!     eval --catalog data/cocktails.json vibe --intensity light --flavor fizzy

use anyhow::{bail, Context, Result};
use barcart_explain::{badge, explain_recommendation, render_text};
use barcart_features::{classify, IngredientDistribution};
use barcart_model::{validate_catalog, FlavorFamily, IngredientFamily, Item};
use barcart_query::{
    filter_by_vibe, find_by_id, find_by_slug, CatalogFilter, FilterOptions, FlavorProfile,
    Intensity, Vibe,
};
use barcart_recommend::{RecommendConfig, Recommender};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Default log levels for the library crates and this binary.
const LOG_DIRECTIVES: [&str; 2] = ["barcart=info", "eval=info"];

#[derive(Parser)]
#[command(name = "eval")]
#[command(about = "Inspect cocktail recommendations over a catalog file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog file (JSON array of cocktails)
    #[arg(long, env = "BARCART_CATALOG", default_value = "data/cocktails.json")]
    catalog: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend cocktails similar to one in the catalog
    Recommend {
        /// Cocktail id or slug
        id: String,

        /// Curated ids to use instead of the cocktail's own (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        manual: Option<Vec<String>>,

        /// Maximum results
        #[arg(long, default_value = "6")]
        max_results: usize,

        /// Minimum score for algorithmic picks
        #[arg(long, default_value = "40")]
        min_score: i32,

        /// Families in fewer than this percentage of cocktails are rare
        #[arg(long, default_value = "10")]
        rarity_percent: usize,
    },

    /// Classify ingredients into flavor families
    Classify {
        /// Ingredient names
        #[arg(required = true)]
        ingredients: Vec<String>,
    },

    /// Show how many cocktails contain each flavor family
    Distribution {
        #[arg(long, default_value = "10")]
        rarity_percent: usize,
    },

    /// Pick cocktails by intensity and flavor profile
    Vibe {
        /// light, medium, heavy or any
        #[arg(short, long, default_value = "any")]
        intensity: String,

        /// fizzy, sour/sweet, bittersweet or any
        #[arg(long, default_value = "any")]
        flavor: String,

        /// Maximum results
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Filter the catalog by attributes and free text
    Filter {
        #[arg(long, value_delimiter = ',')]
        base: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        body: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        method: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        ingredient: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        glassware: Vec<String>,
        /// Free-text search
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List the distinct values available for each filter
    Options,

    /// Check catalog invariants
    Validate,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(EnvFilter::from_default_env())?)
        .init();

    let cli = Cli::parse();
    let json = cli.format == "json";

    let path = cli.catalog;

    match cli.command {
        Commands::Recommend {
            id,
            manual,
            max_results,
            min_score,
            rarity_percent,
        } => {
            let config = RecommendConfig {
                max_results,
                min_score,
                rarity_percent,
                ..Default::default()
            };
            run_recommend(&load_catalog(&path)?, &id, manual, config, json)?;
        }
        Commands::Classify { ingredients } => {
            run_classify(&ingredients, json)?;
        }
        Commands::Distribution { rarity_percent } => {
            run_distribution(&load_catalog(&path)?, rarity_percent, json)?;
        }
        Commands::Vibe {
            intensity,
            flavor,
            limit,
        } => {
            let catalog = load_catalog(&path)?;
            let vibe = Vibe::new(intensity.parse::<Intensity>()?, flavor.parse::<FlavorProfile>()?);
            let picks: Vec<&Item> = filter_by_vibe(&catalog, &vibe).into_iter().take(limit).collect();
            print_items(&picks, json)?;
        }
        Commands::Filter {
            base,
            body,
            method,
            ingredient,
            glassware,
            query,
        } => {
            let filter = CatalogFilter {
                base,
                body,
                method,
                ingredients: ingredient,
                glassware,
                query,
            };
            let catalog = load_catalog(&path)?;
            print_items(&filter.apply(&catalog), json)?;
        }
        Commands::Options => {
            let catalog = load_catalog(&path)?;
            let options = FilterOptions::from_catalog(&catalog);
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                println!("Base spirits: {}", options.base_spirit.join(", "));
                println!("Body levels:  {}", options.body_level.join(", "));
                println!("Methods:      {}", options.method.join(", "));
                println!("Ingredients:  {}", options.ingredients.join(", "));
            }
        }
        Commands::Validate => {
            let catalog = load_catalog(&path)?;
            let errors = validate_catalog(&catalog);
            if errors.is_empty() {
                println!("OK: {} cocktails", catalog.len());
            } else {
                for e in &errors {
                    println!("{}", e);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn log_filter(base: EnvFilter) -> Result<EnvFilter> {
    let mut filter = base;
    for directive in LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

fn load_catalog(path: &Path) -> Result<Vec<Item>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog: Vec<Item> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    for problem in validate_catalog(&catalog) {
        warn!(%problem, "catalog invariant violated");
    }
    info!(count = catalog.len(), path = %path.display(), "catalog loaded");

    Ok(catalog)
}

fn run_recommend(
    catalog: &[Item],
    id: &str,
    manual: Option<Vec<String>>,
    config: RecommendConfig,
    json: bool,
) -> Result<()> {
    let Some(target) = find_by_id(catalog, id).or_else(|| find_by_slug(catalog, id)) else {
        bail!("No cocktail with id or slug '{}'", id);
    };

    let recommender = Recommender::new(catalog, config);
    let recs = match &manual {
        Some(ids) => recommender.recommend(target, ids.as_slice()),
        None => recommender.recommend_for(target),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recs)?);
        return Ok(());
    }

    println!("Recommendations for: {} ({})", target.name, target.id);
    println!(
        "Up to {} results, min score {}, rarity threshold {}",
        recommender.config().max_results,
        recommender.config().min_score,
        recommender.distribution().threshold()
    );
    println!("---");
    for (i, rec) in recs.iter().enumerate() {
        println!("\n{}. {} (id: {}) [{}]", i + 1, rec.item.name, rec.item.id, badge(rec));
        for line in render_text(&explain_recommendation(rec)).lines() {
            println!("   {}", line);
        }
    }
    println!("\n---");
    println!("Total: {} results", recs.len());

    Ok(())
}

fn run_classify(ingredients: &[String], json: bool) -> Result<()> {
    let families: Vec<_> = ingredients.iter().map(|i| (i, classify(i))).collect();

    if json {
        let rows: Vec<_> = families
            .iter()
            .map(|(ingredient, family)| serde_json::json!({ "ingredient": ingredient, "family": family }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for (ingredient, family) in &families {
            let label = match family.flavor() {
                Some(f) => f.to_string(),
                None => format!("(unclassified: {})", family),
            };
            println!("{:<30} {}", ingredient, label);
        }
    }

    Ok(())
}

fn run_distribution(catalog: &[Item], rarity_percent: usize, json: bool) -> Result<()> {
    let distribution = IngredientDistribution::with_rarity_percent(catalog, rarity_percent);
    let entries = distribution.entries();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{} cocktails, rarity threshold {} (families in fewer cocktails are rare)",
        distribution.total_items(),
        distribution.threshold()
    );
    println!("---");
    for family in FlavorFamily::ALL {
        let family = IngredientFamily::from(family);
        let count = distribution.count(&family);
        let label = if count == 0 {
            "-"
        } else if distribution.is_rare(&family) {
            "rare"
        } else {
            "common"
        };
        println!("{:<20} {:>4}  {}", family.to_string(), count, label);
    }
    let unclassified = entries.iter().filter(|e| e.family.flavor().is_none()).count();
    println!("---");
    println!("{} unclassified ingredients", unclassified);

    Ok(())
}

fn print_items(items: &[&Item], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    for item in items {
        println!(
            "{} (id: {}) | {} | {} | {}",
            item.name,
            item.id,
            item.base_spirit,
            item.body_level,
            item.ingredients.join(", ")
        );
    }
    println!("---");
    println!("Total: {} cocktails", items.len());

    Ok(())
}
