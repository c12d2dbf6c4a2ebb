use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use spritemeta_core::source::{self, AssetResolver, ObjectRef, RenderMesh};
use spritemeta_core::{config, ImportOptions, TextureMeta, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "spritemeta",
    version = VERSION,
    about = "Rebuild sprite import settings from extracted assets"
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize an asset table dump (YAML or JSON)
    Inspect { path: String },
    /// Print the meta file for a single sprite
    Sprite {
        path: String,
        #[arg(long)]
        id: i64,
        /// Import options YAML
        #[arg(long)]
        options: Option<String>,
        /// Print the reconstructed model as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Print the meta file for one atlas page
    Atlas {
        path: String,
        #[arg(long)]
        atlas: i64,
        #[arg(long)]
        texture: i64,
        #[arg(long)]
        options: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn load_options(path: Option<&str>) -> Result<ImportOptions> {
    match path {
        Some(p) => {
            config::load_options_from_path(p).with_context(|| format!("reading options {p}"))
        }
        None => Ok(ImportOptions::default()),
    }
}

fn print_meta(meta: &TextureMeta, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(meta)?);
    } else {
        print!("{}", meta.to_meta_string());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.cmd {
        Command::Inspect { path } => {
            let table = source::load_from_path(&path).with_context(|| format!("loading {path}"))?;
            println!(
                "Loaded {}: {} sprites, {} atlases, {} textures",
                path,
                table.sprites.len(),
                table.atlases.len(),
                table.textures.len()
            );
            for (r, s) in &table.sprites {
                let mesh = match &s.render_data.mesh {
                    RenderMesh::Legacy { indices, .. } => {
                        format!("legacy, {} indices", indices.len())
                    }
                    RenderMesh::Stream { sub_meshes, .. } => {
                        format!("stream, {} submeshes", sub_meshes.len())
                    }
                };
                let packed = s.atlas.map(|a| format!(" atlas={}", a.0)).unwrap_or_default();
                println!(
                    "  [{}] {} ({}x{} @ {} ppu, {} bones, {}){}",
                    r.0,
                    s.name,
                    s.rect.width,
                    s.rect.height,
                    s.pixels_to_units,
                    s.bones.len(),
                    mesh,
                    packed
                );
            }
            for (r, a) in &table.atlases {
                println!(
                    "  atlas [{}] {}: {} packed, {} render-data entries",
                    r.0,
                    a.name,
                    a.packed_sprites.len(),
                    a.render_data_map.len()
                );
            }
        }
        Command::Sprite { path, id, options, json } => {
            let table = source::load_from_path(&path).with_context(|| format!("loading {path}"))?;
            let opts = load_options(options.as_deref())?;
            let sprite =
                table.sprite(ObjectRef(id)).ok_or_else(|| anyhow!("no sprite with id {id}"))?;
            let meta = TextureMeta::from_sprite(sprite, &table, &opts)?;
            print_meta(&meta, json)?;
        }
        Command::Atlas { path, atlas, texture, options, json } => {
            let table = source::load_from_path(&path).with_context(|| format!("loading {path}"))?;
            let opts = load_options(options.as_deref())?;
            let atlas = table
                .atlas(ObjectRef(atlas))
                .ok_or_else(|| anyhow!("no atlas with id {atlas}"))?;
            let texture = table
                .texture(ObjectRef(texture))
                .ok_or_else(|| anyhow!("no texture with id {texture}"))?;
            let meta = TextureMeta::from_atlas(texture, atlas, &table, &opts);
            print_meta(&meta, json)?;
        }
    }
    Ok(())
}
