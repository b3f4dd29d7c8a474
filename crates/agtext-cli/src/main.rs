// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `agtext` developer CLI.
//!
//! Decodes wire text into JSON (`agtext vertex 'v[3.1]{}'`) and encodes JSON
//! back into wire text (`agtext encode ids '["1.1",null]'`). Values are read
//! from the positional argument, or from stdin when it is omitted; `--null`
//! decodes the absent value. Logs go to stderr, filtered by `RUST_LOG`.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use agtext::{Codec, CodecConfig, Edge, EmptyProperties, GraphId, IdRange, Path, Source, Vertex};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "agtext", author, version, about = "Decode and encode graph query wire values")]
struct Cli {
    /// Codec config file (JSON). The policy flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Reject graph ids with a zero label or local component.
    #[arg(long, global = true)]
    nonzero_ids: bool,
    /// Read an entity without a property object as `{}`.
    #[arg(long, global = true)]
    implicit_empty_properties: bool,
    /// Log codec activity at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Input {
    /// Wire text; read from stdin when omitted.
    value: Option<String>,
    /// Decode the absent (SQL NULL) value.
    #[arg(long, conflicts_with = "value")]
    null: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a graph id (`3.1`).
    Id(Input),
    /// Decode a graph id array (`{1.1,NULL}`).
    Ids(Input),
    /// Decode a vertex (`label[id]{...}`).
    Vertex(Input),
    /// Decode an edge (`label[id][start,end]{...}`).
    Edge(Input),
    /// Decode a vertex array (`[v[3.1]{},NULL]`).
    Vertices(Input),
    /// Decode an edge array.
    Edges(Input),
    /// Decode a path (`[v,e,v]`).
    Path(Input),
    /// Encode a JSON document as wire text. An absent value prints nothing.
    Encode {
        /// Wire type to produce.
        #[arg(value_enum)]
        kind: Kind,
        /// JSON document; read from stdin when omitted.
        json: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Id,
    Ids,
    Vertex,
    Edge,
    Vertices,
    Edges,
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let codec = Codec::new(load_config(&cli)?);
    run(&codec, cli.command)
}

fn load_config(cli: &Cli) -> Result<CodecConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            CodecConfig::from_json_slice(&bytes)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => CodecConfig::default(),
    };
    if cli.nonzero_ids {
        config = config.with_id_range(IdRange::NonZero);
    }
    if cli.implicit_empty_properties {
        config = config.with_empty_properties(EmptyProperties::ImplicitEmpty);
    }
    debug!(?config, "codec config");
    Ok(config)
}

fn run(codec: &Codec, command: Command) -> Result<()> {
    match command {
        Command::Id(input) => {
            let text = input.read()?;
            let id = codec.decode_id(source(text.as_deref())).context("cannot decode graphid")?;
            emit_json(&id)
        }
        Command::Ids(input) => {
            let text = input.read()?;
            let ids = codec
                .decode_ids(source(text.as_deref()))
                .context("cannot decode graphid array")?;
            emit_json(&ids)
        }
        Command::Vertex(input) => {
            let text = input.read()?;
            let mut vertex: Vertex = Vertex::default();
            codec
                .decode_entity(source(text.as_deref()), &mut vertex)
                .context("cannot decode vertex")?;
            emit_json(&vertex)
        }
        Command::Edge(input) => {
            let text = input.read()?;
            let mut edge: Edge = Edge::default();
            codec
                .decode_entity(source(text.as_deref()), &mut edge)
                .context("cannot decode edge")?;
            emit_json(&edge)
        }
        Command::Vertices(input) => {
            let text = input.read()?;
            let vertices = codec
                .decode_entities::<Vertex>(source(text.as_deref()))
                .context("cannot decode vertex array")?;
            emit_json(&vertices)
        }
        Command::Edges(input) => {
            let text = input.read()?;
            let edges = codec
                .decode_entities::<Edge>(source(text.as_deref()))
                .context("cannot decode edge array")?;
            emit_json(&edges)
        }
        Command::Path(input) => {
            let text = input.read()?;
            let mut path: Path = Path::default();
            codec
                .decode_path(source(text.as_deref()), &mut path)
                .context("cannot decode graphpath")?;
            emit_json(&path)
        }
        Command::Encode { kind, json } => {
            let json = match json {
                Some(json) => json,
                None => read_stdin()?,
            };
            let wire = encode(codec, kind, &json)?;
            emit_wire(wire.as_deref())
        }
    }
}

impl Input {
    fn read(self) -> Result<Option<String>> {
        if self.null {
            return Ok(None);
        }
        match self.value {
            Some(value) => Ok(Some(value)),
            None => read_stdin().map(Some),
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf.trim_end_matches(['\n', '\r']).to_owned())
}

fn source(text: Option<&str>) -> Source<'_> {
    text.map_or(Source::Null, Source::Text)
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T> {
    serde_json::from_str(json).with_context(|| format!("invalid {what} JSON"))
}

fn encode(codec: &Codec, kind: Kind, json: &str) -> Result<Option<Vec<u8>>> {
    let wire = match kind {
        Kind::Id => codec.encode_id(&parse::<GraphId>(json, "graphid")?),
        Kind::Ids => {
            codec.encode_ids(parse::<Option<Vec<GraphId>>>(json, "graphid array")?.as_deref())
        }
        Kind::Vertex => codec.encode_entity(&parse::<Vertex>(json, "vertex")?)?,
        Kind::Edge => codec.encode_entity(&parse::<Edge>(json, "edge")?)?,
        Kind::Vertices => codec
            .encode_entities(parse::<Option<Vec<Vertex>>>(json, "vertex array")?.as_deref())?,
        Kind::Edges => {
            codec.encode_entities(parse::<Option<Vec<Edge>>>(json, "edge array")?.as_deref())?
        }
        Kind::Path => codec.encode_path(&parse::<Path>(json, "graphpath")?)?,
    };
    Ok(wire)
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value).context("failed to render JSON")?;
    let mut out = io::stdout().lock();
    writeln!(out, "{json}").context("failed to write stdout")
}

fn emit_wire(wire: Option<&[u8]>) -> Result<()> {
    let Some(wire) = wire else {
        debug!("absent value, nothing to print");
        return Ok(());
    };
    let mut out = io::stdout().lock();
    out.write_all(wire).context("failed to write stdout")?;
    writeln!(out).context("failed to write stdout")
}
