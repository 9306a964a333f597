use stringslator::{Catalog, EntityKind, InfoTarget, ListFilter, SearchMode};

use stringslator_cli::render::{
    NOTHING_FOUND, render_export_csv, render_info, render_json, render_named_rows, render_titles,
    render_translations,
};

/// What `list` should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    Entities {
        kind: EntityKind,
        filter: Option<ListFilter>,
    },
    Keys {
        file_id: i64,
    },
}

pub fn run_list_command(catalog: &Catalog, request: ListRequest) -> Result<(), String> {
    let rendered = match request {
        ListRequest::Entities { kind, filter } => {
            let rows = catalog
                .list(kind, filter.as_ref())
                .map_err(|e| format!("Failed to list {}s: {}", kind, e))?;
            render_named_rows(&rows)
        }
        ListRequest::Keys { file_id } => {
            let rows = catalog
                .list_titles(file_id)
                .map_err(|e| format!("Failed to list keys: {}", e))?;
            render_titles(&rows)
        }
    };
    println!("{}", rendered);
    Ok(())
}

pub fn run_search_command(catalog: &Catalog, pattern: &str, mode: &SearchMode) -> Result<(), String> {
    let rows = catalog
        .search(pattern, mode)
        .map_err(|e| format!("Failed to search: {}", e))?;
    println!("{}", render_translations(&rows));
    Ok(())
}

pub fn run_export_command(catalog: &Catalog, component_id: i64, key: &str, json: bool) -> Result<(), String> {
    let rows = catalog
        .export(component_id, key)
        .map_err(|e| format!("Failed to export: {}", e))?;
    if json {
        println!("{}", render_json(&rows)?);
    } else if rows.is_empty() {
        println!("{}", NOTHING_FOUND);
    } else {
        println!("{}", render_export_csv(&rows)?);
    }
    Ok(())
}

pub fn run_info_command(catalog: &Catalog, target: InfoTarget) -> Result<(), String> {
    let info = catalog
        .info(target)
        .map_err(|e| format!("Failed to read info: {}", e))?;
    match info {
        Some(info) => println!("{}", render_info(&info)),
        None => {
            let what = match target {
                InfoTarget::File(_) => "File",
                InfoTarget::Component(_) => "Component",
            };
            println!("{} id does not exist. Try search for an id:", what);
            println!("  stringslator list -f %Finder%");
        }
    }
    Ok(())
}
