use anyhow::{Context, Result};

use fitment::catalog::{CatalogClient, ChildTypesQuery, FitmentCatalog, root_types_or_empty};
use fitment::model::{DropdownLevel, FitmentTypeId, RootTypeId, SelectionPair, ValueId, compare_values};
use fitment::pairs::{decode_pairs, encode_pairs};
use fitment::redirect::RedirectTable;
use fitment::resolver::{Phase, Resolver, Restore};
use fitment::search::search_url;

use crate::Commands;
use crate::cli_runtime::{GlobalArgs, load_config, open_catalog};

#[derive(serde::Serialize)]
struct CascadeReport<'a> {
    root_type: Option<RootTypeId>,
    levels: &'a [DropdownLevel],
    fitment_pairs: String,
    search_url: String,
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    requested: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restored: Option<usize>,
}

pub(crate) fn handle_command(global: &GlobalArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Status => handle_status(global)?,

        Commands::RootTypes { json } => {
            let catalog = open_catalog(global)?;
            let roots = catalog.root_types().context("fetch root types")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&roots).context("serialize root types json")?
                );
            } else {
                for r in roots {
                    println!("{}\t{}", r.id, r.label());
                }
            }
        }

        Commands::Values {
            type_id,
            pairs,
            json,
        } => {
            let catalog = open_catalog(global)?;
            let context = decode_pairs(pairs.as_deref().unwrap_or(""));
            let mut values = catalog
                .fitment_values(FitmentTypeId::from(type_id), &context)
                .with_context(|| format!("fetch values for type {}", type_id))?;
            values.sort_by(compare_values);
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&values).context("serialize values json")?
                );
            } else {
                for v in values {
                    println!("{}\t{}", v.id, v.label());
                }
            }
        }

        Commands::ChildTypes {
            root_id,
            pairs,
            json,
        } => {
            let catalog = open_catalog(global)?;
            let query = ChildTypesQuery::new(
                RootTypeId::from(root_id),
                decode_pairs(pairs.as_deref().unwrap_or("")),
            );
            let types = catalog
                .child_types(&query)
                .with_context(|| format!("fetch child types for root {}", root_id))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&types).context("serialize child types json")?
                );
            } else if types.is_empty() {
                println!("(no further types)");
            } else {
                for t in types {
                    let position = t.position.map(|p| p.to_string()).unwrap_or_default();
                    println!("{}\t{}\t{}", t.id, position, t.label());
                }
            }
        }

        Commands::Select { root, values, json } => {
            let catalog = open_catalog(global)?;
            let mut resolver = Resolver::new();
            let root = pick_root(&mut resolver, &catalog, root)?;
            resolver.select_root_type(&catalog, root);

            for (i, value) in values.into_iter().enumerate() {
                let value = ValueId::from(value);
                let Some(level) = resolver.levels().get(i) else {
                    anyhow::bail!(
                        "no level {} to select {} (cascade ended after {} levels)",
                        i + 1,
                        value,
                        resolver.levels().len()
                    );
                };
                let Some(label) = level.find_value(value).map(|v| v.label().to_string()) else {
                    anyhow::bail!("{} {} is not offered here", level.type_name(), value);
                };
                resolver.select_value(&catalog, i, value, &label);
            }

            print_cascade(&resolver, None, json)?;
        }

        Commands::Restore { pairs, root, json } => {
            let catalog = open_catalog(global)?;
            let mut resolver = Resolver::new();
            if let Some(root) = root {
                let root = pick_root(&mut resolver, &catalog, Some(root))?;
                resolver.preselect_root(root);
            }
            let outcome = resolver.initialize_from_pairs(&catalog, &pairs);
            print_cascade(&resolver, Some(outcome), json)?;
        }

        Commands::Decode { pairs } => {
            for p in decode_pairs(&pairs) {
                println!("{}\t{}", p.type_id, p.value_id);
            }
        }

        Commands::Encode { pairs } => {
            let joined = pairs.join(",");
            let decoded: Vec<SelectionPair> = decode_pairs(&joined);
            if decoded.len() < pairs.len() {
                tracing::warn!(
                    given = pairs.len(),
                    kept = decoded.len(),
                    "dropped malformed pairs"
                );
            }
            println!("{}", encode_pairs(&decoded));
        }

        Commands::Redirect { path, redirects } => {
            let table = RedirectTable::load(&redirects)?;
            match table.resolve(&path) {
                Some(to) => println!("{}", to),
                None => anyhow::bail!("no redirect for {}", path),
            }
        }

        Commands::Tui { pairs } => {
            let catalog = open_catalog(global)?;
            let opts = fitment::tui::TuiRunOptions { pairs };
            if let Some(url) = fitment::tui::run_with_options(catalog, opts)? {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

fn handle_status(global: &GlobalArgs) -> Result<()> {
    if let Some(path) = &global.fixture {
        let catalog = open_catalog(global)?;
        println!("catalog: fixture {}", path.display());
        println!("status: active");
        println!("root_types: {}", root_types_or_empty(&catalog).len());
        return Ok(());
    }

    let cfg = load_config(global)?;
    let client = CatalogClient::new(&cfg)?;
    println!("catalog: {}", client.base_url());
    if client.ping() {
        println!("status: active");
        println!("root_types: {}", root_types_or_empty(&client).len());
    } else {
        println!("status: inactive");
    }
    Ok(())
}

fn pick_root<C: FitmentCatalog + ?Sized>(
    resolver: &mut Resolver,
    catalog: &C,
    requested: Option<u64>,
) -> Result<RootTypeId> {
    let roots = resolver.load_root_types(catalog);
    match requested {
        Some(id) => {
            let id = RootTypeId::from(id);
            if !roots.iter().any(|r| r.id == id) {
                tracing::warn!(root = %id, "root type not listed by the catalog");
            }
            Ok(id)
        }
        None => roots
            .first()
            .map(|r| r.id)
            .context("catalog lists no root types"),
    }
}

fn print_cascade(resolver: &Resolver, outcome: Option<Restore>, json: bool) -> Result<()> {
    let (requested, restored) = match outcome {
        Some(Restore::Replayed {
            requested,
            restored,
        }) => (Some(requested), Some(restored)),
        _ => (None, None),
    };
    let selection = resolver.selection();

    if json {
        let report = CascadeReport {
            root_type: resolver.selected_root(),
            levels: resolver.levels(),
            fitment_pairs: encode_pairs(&selection),
            search_url: search_url(&selection),
            complete: resolver.is_complete(),
            requested,
            restored,
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize cascade json")?
        );
        return Ok(());
    }

    if let (Some(requested), Some(restored)) = (requested, restored) {
        if restored < requested {
            println!(
                "restored {} of {} pairs (the rest are no longer offered)",
                restored, requested
            );
        } else {
            println!("restored {} pairs", restored);
        }
    }

    for level in resolver.levels() {
        if level.is_selected() {
            println!(
                "{}: {} ({}:{})",
                level.type_name(),
                level.selected_value,
                level.type_id(),
                level.selected_id
            );
        } else {
            println!(
                "{}: choose one of {} options",
                level.type_name(),
                level.values.len()
            );
        }
    }

    match resolver.phase() {
        Phase::Error { level } => println!("lookup failed at level {}", level + 1),
        _ if resolver.is_complete() => println!("vehicle complete"),
        _ => {}
    }
    println!("{}", search_url(&selection));
    Ok(())
}
