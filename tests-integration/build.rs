//! Runs the generator over `routes.json` and writes the glue to `OUT_DIR`.

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use routegen::{
    Generator, GeneratorConfig, RouteDeclaration, TypeCatalog, assemble_library,
};
use serde::Deserialize;

const FIXTURE: &str = "routes.json";

/// Same shape the CLI reads.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    types: TypeCatalog,
    declarations: Vec<RouteDeclaration>,
}

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed={FIXTURE}");

    let source = fs::read_to_string(FIXTURE).with_context(|| format!("failed to read {FIXTURE}"))?;
    let fixture: Fixture =
        serde_json::from_str(&source).with_context(|| format!("failed to parse {FIXTURE}"))?;

    // The mock runtime is a module of this crate, not an external crate.
    let config = GeneratorConfig::from_toml_str("runtime_path = \"crate::route_runtime\"\n")?;
    let generator = Generator::new(&fixture.types, &config);

    let mut outputs = Vec::with_capacity(fixture.declarations.len());
    for result in generator.generate_batch(&fixture.declarations) {
        match result {
            Ok(output) => outputs.push(output),
            Err(error) => bail!("{FIXTURE}: {error}"),
        }
    }

    let out = PathBuf::from(env::var("OUT_DIR")?).join("routes.rs");
    fs::write(&out, assemble_library(&outputs))
        .with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
