use clap::{Parser, Subcommand, ValueEnum};
use folio::model::{AnimeType, ContentKind, MAX_RATING, MIN_RATING};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio", version)]
#[command(
    about = "Add photos, chess posts and anime entries to a site's content store",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site root holding the data and asset directories (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data and asset directories
    Init,

    /// Add a record to a catalog
    #[command(subcommand, alias = "a")]
    Add(AddCommands),

    /// List the records of a catalog
    #[command(alias = "ls")]
    List {
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// Check catalogs for duplicate ids and missing assets
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Add a photo
    Photo {
        /// Image file to add
        file: String,

        /// Title (defaults to one derived from the file name)
        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long, default_value = "")]
        location: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Add a chess post
    Chess {
        #[arg(short, long)]
        title: String,

        /// Thoughts / analysis
        #[arg(short, long)]
        content: String,

        /// Optional image for the post
        #[arg(short, long)]
        image: Option<String>,
    },

    /// Add an anime or manga entry
    Anime {
        /// Cover image file
        file: String,

        #[arg(short, long)]
        title: String,

        #[arg(short, long, value_enum, default_value_t = TypeArg::Anime)]
        kind: TypeArg,

        /// Rating from 1 to 5
        #[arg(
            long,
            default_value_t = MAX_RATING,
            value_parser = clap::value_parser!(u8).range(MIN_RATING as i64..=MAX_RATING as i64)
        )]
        rating: u8,

        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum KindArg {
    Photo,
    Chess,
    Anime,
}

impl From<KindArg> for ContentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Photo => ContentKind::Photo,
            KindArg::Chess => ContentKind::Chess,
            KindArg::Anime => ContentKind::Anime,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Anime,
    Manga,
}

impl From<TypeArg> for AnimeType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Anime => AnimeType::Anime,
            TypeArg::Manga => AnimeType::Manga,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_photo() {
        let cli = Cli::try_parse_from([
            "folio", "--root", "/site", "add", "photo", "pier.jpg", "--title", "Pier",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/site")));
        match cli.command {
            Commands::Add(AddCommands::Photo { file, title, .. }) => {
                assert_eq!(file, "pier.jpg");
                assert_eq!(title.as_deref(), Some("Pier"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_rating_out_of_range() {
        let parsed = Cli::try_parse_from([
            "folio", "add", "anime", "cover.png", "--title", "X", "--rating", "9",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn chess_image_is_optional() {
        let cli =
            Cli::try_parse_from(["folio", "add", "chess", "-t", "Game", "-c", "1.e4"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Add(AddCommands::Chess { image: None, .. })
        ));
    }
}
