use colored::Colorize;
use recipeapp::commands::{CmdMessage, MessageLevel};
use recipeapp::model::{format_number, Recipe};
use recipeapp::store::StoreStatus;
use serde::Serialize;
use std::path::PathBuf;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 12;
const CATEGORY_WIDTH: usize = 18;
const TIME_WIDTH: usize = 9;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// In JSON mode stdout carries the document only; anything worth a human's
/// attention goes to stderr.
pub(super) fn eprint_notices(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
            MessageLevel::Info | MessageLevel::Success => {}
        }
    }
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes found.");
        return;
    }

    let title_width = LINE_WIDTH - ID_WIDTH - CATEGORY_WIDTH - TIME_WIDTH - 3;
    for recipe in recipes {
        let id = pad_to_width(&truncate_to_width(&recipe.id, ID_WIDTH), ID_WIDTH);
        let title = if recipe.title.is_empty() {
            "(untitled)".to_string()
        } else {
            recipe.title.clone()
        };
        let title = pad_to_width(&truncate_to_width(&title, title_width), title_width);
        let category = pad_to_width(
            &truncate_to_width(&recipe.category, CATEGORY_WIDTH),
            CATEGORY_WIDTH,
        );
        let time = match recipe.total_minutes() {
            Some(minutes) => format!("{} min", format_number(Some(minutes))),
            None => String::new(),
        };

        println!(
            "{} {} {} {}",
            id.yellow(),
            title.bold(),
            category.cyan(),
            format!("{:>width$}", time, width = TIME_WIDTH).dimmed()
        );
    }
}

pub(super) fn print_full_recipes(recipes: &[Recipe], image_paths: &[PathBuf]) {
    for (i, recipe) in recipes.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        println!("{} {}", recipe.id.yellow(), recipe.title.bold());
        println!("--------------------------------");

        if !recipe.category.is_empty() {
            println!("{} {}", "Category:".dimmed(), recipe.category);
        }
        if !recipe.tags.is_empty() {
            println!("{} {}", "Tags:".dimmed(), recipe.tags.join(", "));
        }
        let numbers = [
            ("Prep", recipe.prep_minutes, " min"),
            ("Cook", recipe.cook_minutes, " min"),
            ("Total", recipe.total_minutes(), " min"),
            ("Servings", recipe.servings, ""),
            ("Calories", recipe.calories, ""),
        ];
        let shown: Vec<String> = numbers
            .iter()
            .filter_map(|(label, value, unit)| {
                value.map(|v| format!("{}: {}{}", label, format_number(Some(v)), unit))
            })
            .collect();
        if !shown.is_empty() {
            println!("{}", shown.join("  ").dimmed());
        }

        if !recipe.ingredients.is_empty() {
            println!("\n{}", "Ingredients".bold());
            for item in &recipe.ingredients {
                println!("  - {}", item);
            }
        }
        if !recipe.steps.is_empty() {
            println!("\n{}", "Steps".bold());
            for (n, step) in recipe.steps.iter().enumerate() {
                println!("  {}. {}", n + 1, step);
            }
        }
        if !recipe.image_url.is_empty() {
            println!("\n{} {}", "Image:".dimmed(), recipe.image_url);
        }
    }

    for path in image_paths {
        println!("{} {}", "File:".dimmed(), path.display());
    }
}

pub(super) fn print_status(status: &StoreStatus, categories: &[String]) {
    let writable = if status.writable {
        "writable".green()
    } else {
        "read-only".red()
    };
    println!("{} {} ({})", "Backend:".dimmed(), status.backend, writable);
    if let Some(location) = &status.location {
        println!("{} {}", "Location:".dimmed(), location);
    }
    println!("{} {}", "Recipes:".dimmed(), status.records);
    if !categories.is_empty() {
        println!("{} {}", "Categories:".dimmed(), categories.join(", "));
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}
