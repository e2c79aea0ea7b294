use clap::{Args, Parser, Subcommand};
use recipeapp::codec::Encoding;
use recipeapp::model::{RawRow, INGREDIENT_DELIMITER, STEP_DELIMITER, TAG_DELIMITER};
use recipeapp::query::SortKey;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "recipes", bin_name = "recipes", version)]
#[command(about = "Local-first recipe collection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Store recipes in this directory for this run
    #[arg(long, global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Private data directory (overrides RECIPES_DATA)
    #[arg(long, global = true, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recipes
    #[command(alias = "ls")]
    List {
        /// Match against title, ingredients and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Only recipes in this category (exact match)
        #[arg(short, long)]
        category: Option<String>,

        /// category, title, time, calories or servings
        #[arg(long, default_value = "category", value_parser = parse_sort)]
        sort: SortKey,

        /// Reverse the sorted order
        #[arg(short, long)]
        reverse: bool,
    },

    /// Show full recipes by id
    #[command(alias = "v")]
    View {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Add a recipe
    #[command(alias = "n")]
    Add {
        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Change fields of an existing recipe
    #[command(alias = "e")]
    Edit {
        id: String,

        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Delete recipes by id
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Replace the collection with the contents of a CSV file
    Import { file: PathBuf },

    /// Write the collection to a CSV file
    Export {
        file: PathBuf,

        /// native or spreadsheet (defaults to the configured encoding)
        #[arg(long, value_parser = parse_encoding)]
        encoding: Option<Encoding>,
    },

    /// Write the collection to the active backend again
    Write,

    /// Switch to a directory and load the recipes stored there
    Grant { dir: PathBuf },

    /// Copy an image into the store and link it to a recipe
    Attach { id: String, image: PathBuf },

    /// Show the active backend and record count
    Status,
}

/// Field flags shared by `add` and `edit`. Only flags that were given end up
/// in the draft.
#[derive(Args, Debug, Default)]
pub struct RecipeFields {
    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub category: Option<String>,

    /// Repeatable
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Repeatable
    #[arg(short, long = "ingredient", value_name = "INGREDIENT")]
    pub ingredients: Vec<String>,

    /// Repeatable, in order
    #[arg(short, long = "step", value_name = "STEP")]
    pub steps: Vec<String>,

    /// Prep time in minutes
    #[arg(long)]
    pub prep: Option<String>,

    /// Cook time in minutes
    #[arg(long)]
    pub cook: Option<String>,

    #[arg(long)]
    pub servings: Option<String>,

    #[arg(long)]
    pub calories: Option<String>,

    /// Image URL or a path relative to the store
    #[arg(long)]
    pub image: Option<String>,
}

impl RecipeFields {
    pub fn to_draft(&self) -> RawRow {
        let mut row = RawRow::new();
        let single = [
            ("title", &self.title),
            ("category", &self.category),
            ("prep_minutes", &self.prep),
            ("cook_minutes", &self.cook),
            ("servings", &self.servings),
            ("calories", &self.calories),
            ("image_url", &self.image),
        ];
        for (column, value) in single {
            if let Some(value) = value {
                row.insert(column, value.as_str());
            }
        }

        let lists = [
            ("tags", &self.tags, TAG_DELIMITER),
            ("ingredients", &self.ingredients, INGREDIENT_DELIMITER),
            ("steps", &self.steps, STEP_DELIMITER),
        ];
        for (column, items, delimiter) in lists {
            if !items.is_empty() {
                row.insert(column, recipeapp::model::join_list(items, delimiter));
            }
        }
        row
    }
}

fn parse_sort(value: &str) -> Result<SortKey, String> {
    value.parse().map_err(|e: recipeapp::error::RecipeError| e.to_string())
}

fn parse_encoding(value: &str) -> Result<Encoding, String> {
    value.parse().map_err(|e: recipeapp::error::RecipeError| e.to_string())
}
