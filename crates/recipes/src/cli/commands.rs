//! Dispatch from parsed arguments to the API, and from `CmdResult` to the terminal.
//!
//! Handlers never touch storage directly: each one makes one `RecipesApi` call
//! and hands the result to `print`.

use super::logging::{self, Verbosity};
use super::print::{
    eprint_notices, print_full_recipes, print_json, print_messages, print_recipes, print_status,
};
use super::setup::{Cli, Commands, RecipeFields};
use anyhow::Result;
use clap::Parser;
use recipeapp::api::RecipesApi;
use recipeapp::codec::Encoding;
use recipeapp::commands::CmdResult;
use recipeapp::error::RecipeError;
use recipeapp::init::{initialize, InitOptions};
use recipeapp::query::{RecipeQuery, SortKey};
use serde_json::json;
use std::path::PathBuf;

struct AppContext {
    api: RecipesApi,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::List {
            search,
            category,
            sort,
            reverse,
        }) => handle_list(&ctx, search, category, sort, reverse),
        Some(Commands::View { ids }) => handle_view(&mut ctx, ids),
        Some(Commands::Add { fields }) => handle_add(&ctx, fields),
        Some(Commands::Edit { id, fields }) => handle_edit(&ctx, id, fields),
        Some(Commands::Delete { ids }) => handle_delete(&ctx, ids),
        Some(Commands::Import { file }) => handle_import(&ctx, file),
        Some(Commands::Export { file, encoding }) => handle_export(&ctx, file, encoding),
        Some(Commands::Write) => handle_write(&ctx),
        Some(Commands::Grant { dir }) => handle_grant(&mut ctx, dir),
        Some(Commands::Attach { id, image }) => handle_attach(&mut ctx, id, image),
        Some(Commands::Status) => handle_status(&ctx),
        None => handle_list(&ctx, None, None, SortKey::default(), false),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let context = initialize(InitOptions {
        data_override: cli.data.clone(),
        directory: cli.dir.clone(),
    })?;
    Ok(AppContext {
        api: context.api,
        json: cli.json,
    })
}

fn handle_list(
    ctx: &AppContext,
    search: Option<String>,
    category: Option<String>,
    sort: SortKey,
    reverse: bool,
) -> Result<()> {
    let mut query = RecipeQuery::new().sort(sort).reversed(reverse);
    if let Some(search) = search {
        query = query.search(search);
    }
    if let Some(category) = category {
        query = query.category(category);
    }

    let result = ctx.api.list(&query)?;
    if ctx.json {
        return print_json(&result.listed);
    }
    print_recipes(&result.listed);
    print_messages(&result.messages);
    Ok(())
}

fn handle_view(ctx: &mut AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.view(ids.as_slice())?;
    if ctx.json {
        eprint_notices(&result.messages);
        return print_json(&result.listed);
    }
    print_full_recipes(&result.listed, &result.paths);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &AppContext, fields: RecipeFields) -> Result<()> {
    let result = ctx.api.add(&fields.to_draft())?;
    finish_modification(ctx, result)
}

/// Flags overlay the stored record, so unspecified fields keep their values.
fn handle_edit(ctx: &AppContext, id: String, fields: RecipeFields) -> Result<()> {
    let existing = ctx
        .api
        .store()
        .get(&id)
        .ok_or_else(|| RecipeError::RecordNotFound(id.clone()))?;
    let mut row = existing.to_row();
    row.merge(fields.to_draft());

    let result = ctx.api.update(&id, &row)?;
    finish_modification(ctx, result)
}

fn handle_delete(ctx: &AppContext, ids: Vec<String>) -> Result<()> {
    let result = ctx.api.delete(ids.as_slice())?;
    finish_modification(ctx, result)
}

fn handle_import(ctx: &AppContext, file: PathBuf) -> Result<()> {
    let result = ctx.api.import(&file)?;
    if ctx.json {
        eprint_notices(&result.messages);
        return print_json(&json!({
            "report": result.import,
            "records": result.affected.len(),
        }));
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(ctx: &AppContext, file: PathBuf, encoding: Option<Encoding>) -> Result<()> {
    let result = ctx.api.export(&file, encoding)?;
    finish_messages(ctx, &result)
}

fn handle_write(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.write_now()?;
    finish_messages(ctx, &result)
}

fn handle_grant(ctx: &mut AppContext, dir: PathBuf) -> Result<()> {
    let result = ctx.api.grant_directory(&dir)?;
    finish_messages(ctx, &result)
}

fn handle_attach(ctx: &mut AppContext, id: String, image: PathBuf) -> Result<()> {
    let result = ctx.api.attach_image(&id, &image)?;
    finish_modification(ctx, result)
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    if ctx.json {
        return print_json(&json!({
            "status": result.status,
            "categories": result.categories,
        }));
    }
    if let Some(status) = &result.status {
        print_status(status, &result.categories);
    }
    print_messages(&result.messages);
    Ok(())
}

fn finish_modification(ctx: &AppContext, result: CmdResult) -> Result<()> {
    if ctx.json {
        eprint_notices(&result.messages);
        return print_json(&result.affected);
    }
    print_messages(&result.messages);
    Ok(())
}

fn finish_messages(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    if ctx.json {
        eprint_notices(&result.messages);
        return print_json(&result.messages);
    }
    print_messages(&result.messages);
    Ok(())
}
